use std::path::PathBuf;

use tracing::warn;

use crate::result::NightlyResult;

/**
    Splits the raw `files` input into individual glob patterns.

    Patterns may be separated by newlines, commas, or spaces, in any
    combination. Empty segments are dropped.
*/
pub(super) fn parse_file_patterns(input: &str) -> Vec<String> {
    input
        .split(['\n', '\r', ',', ' '])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/**
    Expands the raw `files` input into concrete artifact paths.

    Patterns are expanded in input order so that the uploaded asset
    list matches the order the caller wrote. Only regular files are
    kept; unreadable matches are skipped with a warning.
*/
pub(super) fn resolve_files(input: &str) -> NightlyResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in parse_file_patterns(input) {
        for entry in glob::glob(&pattern)? {
            match entry {
                Ok(path) if path.is_file() => files.push(path),
                Ok(_) => {}
                Err(e) => warn!("skipping unreadable path: {e}"),
            }
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn parse_patterns_newline_separated() {
        assert_eq!(
            parse_file_patterns("dist/*.zip\ndist/*.tar.gz"),
            vec!["dist/*.zip", "dist/*.tar.gz"]
        );
    }

    #[test]
    fn parse_patterns_comma_and_space_separated() {
        assert_eq!(
            parse_file_patterns("a.zip, b.zip c.zip"),
            vec!["a.zip", "b.zip", "c.zip"]
        );
    }

    #[test]
    fn parse_patterns_drops_empty_segments() {
        assert_eq!(parse_file_patterns(""), Vec::<String>::new());
        assert_eq!(parse_file_patterns(" , \n ,"), Vec::<String>::new());
    }

    #[test]
    fn resolve_files_expands_globs_in_input_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.zip"), b"a").unwrap();
        fs::write(dir.path().join("b.txt"), b"b").unwrap();
        fs::create_dir(dir.path().join("sub.zip")).unwrap();

        let input = format!(
            "{root}/*.txt {root}/*.zip",
            root = dir.path().display()
        );
        let files = resolve_files(&input).unwrap();

        // Directories are filtered out, and the txt pattern comes first
        assert_eq!(files.len(), 2);
        assert_eq!(files[0], dir.path().join("b.txt"));
        assert_eq!(files[1], dir.path().join("a.zip"));
    }

    #[test]
    fn resolve_files_rejects_invalid_patterns() {
        assert!(resolve_files("a[").is_err());
    }

    #[test]
    fn resolve_files_empty_input_is_empty() {
        assert!(resolve_files("").unwrap().is_empty());
    }
}

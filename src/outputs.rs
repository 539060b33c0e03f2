use std::fs::OpenOptions;
use std::io::Write;

use anyhow::{Context, Result};

/**
    Appends a `key=value` pair to the `GITHUB_OUTPUT` file.

    Outside of a workflow run (no `GITHUB_OUTPUT` set) this is a no-op,
    which makes local invocations work without ceremony.
*/
pub fn write(key: &str, value: &str) -> Result<()> {
    let Some(mut file) = open_output_file()? else {
        return Ok(());
    };
    writeln!(file, "{key}={value}").context("Failed to write GITHUB_OUTPUT entry")?;
    Ok(())
}

/// Uses heredoc format to preserve JSON and special characters.
pub fn write_multiline(key: &str, value: &str) -> Result<()> {
    let Some(mut file) = open_output_file()? else {
        return Ok(());
    };
    let delimiter = unique_delimiter(value);
    writeln!(file, "{key}<<{delimiter}").context("Failed to write GITHUB_OUTPUT header")?;
    writeln!(file, "{value}").context("Failed to write GITHUB_OUTPUT value body")?;
    writeln!(file, "{delimiter}").context("Failed to write GITHUB_OUTPUT footer")?;
    Ok(())
}

fn open_output_file() -> Result<Option<std::fs::File>> {
    let Some(path) = std::env::var_os("GITHUB_OUTPUT") else {
        return Ok(None);
    };

    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .context("Failed to open GITHUB_OUTPUT file")?;
    Ok(Some(file))
}

fn unique_delimiter(value: &str) -> String {
    let base = "__NIGHTLY_RELEASE_OUTPUT__";
    if !value.contains(base) {
        return base.to_string();
    }
    for idx in 1..=u32::MAX {
        let candidate = format!("{base}_{idx}");
        if !value.contains(&candidate) {
            return candidate;
        }
    }
    "__NIGHTLY_RELEASE_OUTPUT_FALLBACK__".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimiter_avoids_collisions_with_the_value() {
        let plain = unique_delimiter("{\"id\":1}");
        assert_eq!(plain, "__NIGHTLY_RELEASE_OUTPUT__");

        let colliding = unique_delimiter("text __NIGHTLY_RELEASE_OUTPUT__ text");
        assert_ne!(colliding, "__NIGHTLY_RELEASE_OUTPUT__");
        assert!(!"text __NIGHTLY_RELEASE_OUTPUT__ text".contains(&colliding));
    }
}

use std::path::Path;

use bytes::Bytes;

use crate::result::{NightlyError, NightlyResult};

/**
    A build artifact read fully into memory, ready to be uploaded
    as a release asset.
*/
#[derive(Debug, Clone)]
pub struct AssetFile {
    pub name: String,
    pub mime: &'static str,
    pub data: Bytes,
}

impl AssetFile {
    /**
        Reads the file at the given path into memory.

        The asset name is the file's base name and the MIME type is
        derived from its extension.

        # Errors

        - If the file does not exist or could not be read.
        - If the path has no usable base name.
    */
    pub async fn read(path: impl AsRef<Path>) -> NightlyResult<Self> {
        let path = path.as_ref();

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| NightlyError::InvalidFileName(path.to_path_buf()))?
            .to_string();

        let data = match tokio::fs::read(path).await {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(NightlyError::FileNotFound(path.into()));
            }
            Err(e) => return Err(e.into()),
            Ok(bytes) => Bytes::from(bytes),
        };

        Ok(Self {
            name,
            mime: mime_for_path(path),
            data,
        })
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

fn mime_for_path(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("zip") => "application/zip",
        Some("gz" | "tgz") => "application/gzip",
        Some("tar") => "application/x-tar",
        Some("deb") => "application/vnd.debian.binary-package",
        Some("rpm") => "application/x-rpm",
        Some("exe" | "msi") => "application/x-msdownload",
        Some("dmg") => "application/x-apple-diskimage",
        Some("AppImage") => "application/x-executable",
        Some("json") => "application/json",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn mime_known_extensions() {
        assert_eq!(mime_for_path(Path::new("tool.zip")), "application/zip");
        assert_eq!(mime_for_path(Path::new("tool.tar.gz")), "application/gzip");
        assert_eq!(
            mime_for_path(Path::new("tool.AppImage")),
            "application/x-executable"
        );
    }

    #[test]
    fn mime_unknown_extension_falls_back() {
        assert_eq!(
            mime_for_path(Path::new("tool.xyz")),
            "application/octet-stream"
        );
        assert_eq!(mime_for_path(Path::new("tool")), "application/octet-stream");
    }

    #[tokio::test]
    async fn read_derives_name_size_and_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nightly.zip");
        fs::write(&path, b"zip bytes").unwrap();

        let asset = AssetFile::read(&path).await.unwrap();
        assert_eq!(asset.name, "nightly.zip");
        assert_eq!(asset.mime, "application/zip");
        assert_eq!(asset.size(), 9);
        assert_eq!(&asset.data[..], b"zip bytes");
    }

    #[tokio::test]
    async fn read_missing_file_is_an_error() {
        let result = AssetFile::read(PathBuf::from("/does/not/exist.zip")).await;
        assert!(matches!(result, Err(NightlyError::FileNotFound(_))));
    }
}

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::warn;

use crate::result::{NightlyError, NightlyResult};

mod files;
mod name;

const DEFAULT_BODY: &str = "No release body provided.";

/**
    The raw option set, as handed over by the CI environment.

    Flag-like options arrive as strings: only the literal `"true"`
    counts as enabled, everything else is off.
*/
#[derive(Debug, Clone, Default)]
pub struct RawInputs {
    pub tag_name: String,
    pub draft: String,
    pub prerelease: String,
    pub name: String,
    pub body: Option<String>,
    pub body_path: Option<PathBuf>,
    pub files: Option<String>,
}

/**
    Fully resolved release configuration: flags parsed, the name
    placeholder substituted, the body chosen, and file patterns
    expanded to concrete paths.
*/
#[derive(Debug, Clone)]
pub struct ReleaseConfig {
    pub tag_name: String,
    pub name: String,
    pub body: String,
    pub draft: bool,
    pub prerelease: bool,
    pub files: Vec<PathBuf>,
}

impl RawInputs {
    /**
        Resolves the raw inputs into a [`ReleaseConfig`].

        # Errors

        - If the body file could not be read.
        - If a file pattern is not a valid glob.
    */
    pub async fn resolve(self) -> NightlyResult<ReleaseConfig> {
        let draft = self.draft == "true";
        if draft {
            warn!("deprecated, draft must be turned off for nightly builds");
        }

        let prerelease = self.prerelease == "true";

        let name = name::substitute_build_date(&self.name, Utc::now().date_naive());

        let body = resolve_body(self.body_path.as_deref(), self.body.as_deref()).await?;

        let files = files::resolve_files(self.files.as_deref().unwrap_or_default())?;

        Ok(ReleaseConfig {
            tag_name: self.tag_name,
            name,
            body,
            // Draft is always forced off for nightly builds
            draft: false,
            prerelease,
            files,
        })
    }
}

async fn resolve_body(path: Option<&Path>, inline: Option<&str>) -> NightlyResult<String> {
    let file_text = match path {
        None => None,
        Some(path) => match tokio::fs::read_to_string(path).await {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(NightlyError::FileNotFound(path.into()));
            }
            Err(e) => return Err(e.into()),
            Ok(s) => Some(s),
        },
    };
    Ok(choose_body(file_text.as_deref(), inline))
}

fn choose_body(file_text: Option<&str>, inline: Option<&str>) -> String {
    file_text
        .filter(|s| !s.is_empty())
        .or_else(|| inline.filter(|s| !s.is_empty()))
        .map_or_else(|| DEFAULT_BODY.to_string(), str::to_string)
}

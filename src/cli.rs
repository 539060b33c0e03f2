use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use nightly_release::github::{ReleasesClient, Repository};
use nightly_release::inputs::RawInputs;
use nightly_release::publish::{PublishPlan, publish};

use crate::outputs;

/// Publish a nightly release: recreate its assets, repoint the tag,
/// and update the release metadata.
#[derive(Debug, Parser)]
#[clap(author, version, about)]
pub struct Cli {
    /// The tag to publish the nightly release under.
    #[clap(long, env = "INPUT_TAG_NAME")]
    pub tag_name: String,
    /// Requested draft state. Deprecated: "true" is forced off with a warning.
    #[clap(long, env = "INPUT_DRAFT", default_value = "false")]
    pub draft: String,
    /// Requested prerelease state ("true" to enable).
    #[clap(long, env = "INPUT_PRERELEASE", default_value = "false")]
    pub prerelease: String,
    /// Display name for the release. `$$` expands to today's UTC date
    /// as YYYYMMDD.
    #[clap(long, env = "INPUT_NAME", default_value = "Nightly Release")]
    pub name: String,
    /// Inline release body text.
    #[clap(long, env = "INPUT_BODY")]
    pub body: Option<String>,
    /// Path to a file whose content becomes the release body.
    /// Takes precedence over the inline body.
    #[clap(long, env = "INPUT_BODY_PATH")]
    pub body_path: Option<PathBuf>,
    /// Newline/comma/space separated glob patterns selecting the
    /// artifacts to upload.
    #[clap(long, env = "INPUT_FILES")]
    pub files: Option<String>,
    /// Token used when GITHUB_TOKEN is not set.
    #[clap(long, env = "INPUT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let repo: Repository = env_var("GITHUB_REPOSITORY")?
            .parse()
            .context("Failed to parse GITHUB_REPOSITORY")?;
        let target_sha = env_var("GITHUB_SHA")?;
        let token = std::env::var("GITHUB_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .or(self.token)
            .context("A GitHub token is required - set GITHUB_TOKEN or the `token` input")?;

        let config = RawInputs {
            tag_name: self.tag_name,
            draft: self.draft,
            prerelease: self.prerelease,
            name: self.name,
            body: self.body,
            body_path: self.body_path,
            files: self.files,
        }
        .resolve()
        .await
        .context("Failed to resolve release inputs")?;

        let client = ReleasesClient::new(&token).context("Failed to create GitHub client")?;
        let plan = PublishPlan::new(config, target_sha);

        let published = publish(&client, &repo, &plan).await?;

        info!("release ready at {}", published.release.html_url);

        if !published.assets.is_empty() {
            let assets = serde_json::to_string(&published.assets)
                .context("Failed to serialize asset records")?;
            outputs::write_multiline("assets", &assets)?;
        }
        outputs::write("url", published.release.html_url.as_str())?;
        outputs::write("id", &published.release.id.to_string())?;
        outputs::write("upload_url", &published.release.upload_url)?;

        Ok(())
    }
}

fn env_var(name: &str) -> Result<String> {
    std::env::var(name).with_context(|| format!("{name} is not set"))
}

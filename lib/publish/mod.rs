use std::path::PathBuf;

use futures::{StreamExt, TryStreamExt, stream};
use serde_json::Value;
use tracing::{info, warn};

use crate::github::{NewRelease, Release, ReleasePatch, ReleasesClient, Repository};
use crate::inputs::ReleaseConfig;
use crate::result::{NightlyError, NightlyResult};

mod asset;

pub use self::asset::AssetFile;

/// Placeholder name given to a freshly created release, before the
/// metadata update applies the configured one.
const CREATED_RELEASE_NAME: &str = "Nightly Release";

/// Upload fan-out cap. Keeps large asset sets from tripping API rate
/// limits while leaving small batches effectively unlimited.
const UPLOAD_CONCURRENCY: usize = 8;

/**
    Everything the publish workflow needs, resolved up front
    and immutable for the duration of the run.
*/
#[derive(Debug, Clone)]
pub struct PublishPlan {
    pub tag_name: String,
    pub target_sha: String,
    pub name: String,
    pub body: String,
    pub draft: bool,
    pub prerelease: bool,
    pub files: Vec<PathBuf>,
}

impl PublishPlan {
    #[must_use]
    pub fn new(config: ReleaseConfig, target_sha: String) -> Self {
        Self {
            tag_name: config.tag_name,
            target_sha,
            name: config.name,
            body: config.body,
            draft: config.draft,
            prerelease: config.prerelease,
            files: config.files,
        }
    }
}

/**
    The final state of a successful run: the updated release snapshot
    and the uploaded asset records, in input file order.
*/
#[derive(Debug, Clone)]
pub struct PublishedRelease {
    pub release: Release,
    pub assets: Vec<Value>,
}

/**
    Runs the nightly publish workflow against the given repository:

    1. Look up the release for the tag, or create a draft one.
    2. Delete all assets currently attached to it.
    3. Point the tag ref at the target commit.
    4. Apply name, body, draft, and prerelease in a single update.
    5. Upload the planned files as new assets.

    Each step receives an immutable release snapshot from the step
    before it. The first failing step aborts the run; there is no
    rollback, and re-running the whole workflow is the recovery path.

    # Errors

    - If any GitHub API call fails, or an artifact could not be read.
*/
pub async fn publish(
    client: &ReleasesClient,
    repo: &Repository,
    plan: &PublishPlan,
) -> NightlyResult<PublishedRelease> {
    let release = resolve_release(client, repo, plan).await?;
    info!(
        "release found: {} by {}",
        release.name.as_deref().unwrap_or(release.tag_name.as_str()),
        release
            .author
            .as_ref()
            .map_or("unknown", |author| author.login.as_str()),
    );

    purge_assets(client, repo, &release).await?;

    reconcile_tag_ref(client, repo, &plan.tag_name, &plan.target_sha).await?;

    info!("updating release info: {}", plan.name);
    let release = client
        .update_release(
            repo,
            release.id,
            &ReleasePatch {
                name: Some(plan.name.clone()),
                body: Some(plan.body.clone()),
                draft: Some(plan.draft),
                prerelease: Some(plan.prerelease),
            },
        )
        .await?;

    let assets = if plan.files.is_empty() {
        warn!("no files matched the configured patterns, nothing to upload");
        Vec::new()
    } else {
        upload_assets(client, &release.upload_url, &plan.files).await?
    };

    Ok(PublishedRelease { release, assets })
}

/**
    Finds the release for the planned tag, or creates one.

    A found release is put on hold as a draft before anything else
    touches it; the requested draft state is only restored by the
    metadata update at the end of the workflow. A created release is
    re-fetched by id so later steps see a fully populated snapshot.
*/
async fn resolve_release(
    client: &ReleasesClient,
    repo: &Repository,
    plan: &PublishPlan,
) -> NightlyResult<Release> {
    if let Some(release) = client.get_release_by_tag(repo, &plan.tag_name).await? {
        client
            .update_release(
                repo,
                release.id,
                &ReleasePatch {
                    draft: Some(true),
                    ..ReleasePatch::default()
                },
            )
            .await?;
        return Ok(release);
    }

    let created = client
        .create_release(
            repo,
            &NewRelease {
                tag_name: plan.tag_name.clone(),
                target_commitish: plan.target_sha.clone(),
                name: CREATED_RELEASE_NAME.to_string(),
                draft: true,
            },
        )
        .await?;

    Ok(client.get_release(repo, created.id).await?)
}

/**
    Deletes every asset attached to the release, sequentially.

    A failed deletion is logged and re-raised; assets already deleted
    stay deleted.
*/
async fn purge_assets(
    client: &ReleasesClient,
    repo: &Repository,
    release: &Release,
) -> NightlyResult<()> {
    if release.assets.is_empty() {
        return Ok(());
    }

    info!("deleting {} old release assets", release.assets.len());
    for asset in &release.assets {
        info!("deleting {}", asset.name);
        if let Err(e) = client.delete_asset(repo, asset.id).await {
            warn!("failed to delete {}: {e}", asset.name);
            return Err(e.into());
        }
    }
    info!("deleted {} assets", release.assets.len());

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RefAction {
    Create,
    Update,
    Keep,
}

// Exact string equality, no short-sha normalization.
fn ref_action(existing: Option<&str>, target: &str) -> RefAction {
    match existing {
        None => RefAction::Create,
        Some(sha) if sha == target => RefAction::Keep,
        Some(_) => RefAction::Update,
    }
}

/**
    Ensures the tag ref exists and points at the target commit:
    created when absent, updated when it points elsewhere, left
    alone when it already matches.
*/
async fn reconcile_tag_ref(
    client: &ReleasesClient,
    repo: &Repository,
    tag: &str,
    sha: &str,
) -> NightlyResult<()> {
    let current = client
        .get_tag_ref(repo, tag)
        .await?
        .map(|git_ref| git_ref.object.sha);

    match ref_action(current.as_deref(), sha) {
        RefAction::Create => {
            info!("setting ref tags/{tag} to {sha}");
            client.create_tag_ref(repo, tag, sha).await?;
        }
        RefAction::Update => {
            info!(
                "updating ref tags/{tag} from {} to {sha}",
                current.as_deref().unwrap_or_default()
            );
            client.update_tag_ref(repo, tag, sha).await?;
        }
        RefAction::Keep => {
            info!("ref tags/{tag} is {sha}, keeping it");
        }
    }

    Ok(())
}

/**
    Uploads all planned files as release assets.

    Uploads run concurrently up to [`UPLOAD_CONCURRENCY`], fail fast
    on the first rejection, and yield their results in input file
    order regardless of completion order.
*/
async fn upload_assets(
    client: &ReleasesClient,
    upload_url: &str,
    files: &[PathBuf],
) -> NightlyResult<Vec<Value>> {
    info!("uploading {} new release assets", files.len());

    let uploads = files.iter().map(|path| async move {
        let file = AssetFile::read(path).await?;
        info!("uploading {} ({} bytes)", file.name, file.size());
        let record = client
            .upload_asset(upload_url, &file.name, file.mime, file.data)
            .await?;
        Ok::<Value, NightlyError>(record)
    });

    stream::iter(uploads)
        .buffered(UPLOAD_CONCURRENCY)
        .try_collect()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ref_action_creates_missing_refs() {
        assert_eq!(ref_action(None, "def456"), RefAction::Create);
    }

    #[test]
    fn ref_action_updates_stale_refs() {
        assert_eq!(ref_action(Some("abc123"), "def456"), RefAction::Update);
    }

    #[test]
    fn ref_action_keeps_matching_refs() {
        assert_eq!(ref_action(Some("def456"), "def456"), RefAction::Keep);
    }

    #[test]
    fn ref_action_compares_exact_strings() {
        // A short sha of the same commit is still an update
        assert_eq!(ref_action(Some("def456"), "def456789"), RefAction::Update);
    }
}

#![allow(clippy::missing_errors_doc)]

use bytes::Bytes;
use reqwest_middleware::ClientWithMiddleware;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tracing::{debug, instrument};
use url::Url;

use reqwest::{
    Method, StatusCode,
    header::{ACCEPT, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue},
};

mod client;
mod models;
mod repository;
mod result;

use self::client::create_client;

pub use self::models::{GitRef, GitRefObject, NewRelease, Release, ReleaseAsset, ReleaseAuthor, ReleasePatch};
pub use self::repository::{Repository, RepositoryParseError};
pub use self::result::{GithubError, GithubResult};

const BASE_URL: &str = "https://api.github.com";

/**
    A client for the GitHub releases and git refs REST endpoints.

    Authentication is explicit: the token is injected at construction
    time and the client never consults the environment itself.
*/
#[derive(Debug, Clone)]
pub struct ReleasesClient {
    client: ClientWithMiddleware,
}

impl ReleasesClient {
    pub fn new(token: impl AsRef<str>) -> GithubResult<Self> {
        let token = token.as_ref().trim();
        let headers = {
            let mut headers = HeaderMap::new();
            headers.insert(
                HeaderName::from_static("x-github-api-version"),
                HeaderValue::from_static("2022-11-28"),
            );
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {token}"))?,
            );
            headers
        };

        let client = create_client(headers)?;

        Ok(Self { client })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> GithubResult<T> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/vnd.github.v3+json")
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: &impl Serialize,
    ) -> GithubResult<T> {
        let response = self
            .client
            .request(method, url)
            .header(ACCEPT, "application/vnd.github.v3+json")
            .json(body)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    /**
        Fetches the release for the given tag, if one exists.
    */
    #[instrument(skip(self), level = "debug")]
    pub async fn get_release_by_tag(
        &self,
        repo: &Repository,
        tag: &str,
    ) -> GithubResult<Option<Release>> {
        debug!(%repo, tag, "fetching release by tag");

        let url = format!("{BASE_URL}/repos/{repo}/releases/tags/{tag}");
        match self.get_json(&url).await {
            Ok(release) => Ok(Some(release)),
            Err(e) if is_404(&e) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /**
        Fetches a release by its id.
    */
    #[instrument(skip(self), level = "debug")]
    pub async fn get_release(&self, repo: &Repository, release_id: u64) -> GithubResult<Release> {
        let url = format!("{BASE_URL}/repos/{repo}/releases/{release_id}");
        self.get_json(&url).await
    }

    /**
        Creates a new release.
    */
    #[instrument(skip(self, new_release), level = "debug")]
    pub async fn create_release(
        &self,
        repo: &Repository,
        new_release: &NewRelease,
    ) -> GithubResult<Release> {
        debug!(%repo, tag = %new_release.tag_name, "creating release");

        let url = format!("{BASE_URL}/repos/{repo}/releases");
        self.send_json(Method::POST, &url, new_release).await
    }

    /**
        Applies the given patch to a release and returns the
        updated representation.
    */
    #[instrument(skip(self, patch), level = "debug")]
    pub async fn update_release(
        &self,
        repo: &Repository,
        release_id: u64,
        patch: &ReleasePatch,
    ) -> GithubResult<Release> {
        let url = format!("{BASE_URL}/repos/{repo}/releases/{release_id}");
        self.send_json(Method::PATCH, &url, patch).await
    }

    /**
        Deletes a single release asset.
    */
    #[instrument(skip(self), level = "debug")]
    pub async fn delete_asset(&self, repo: &Repository, asset_id: u64) -> GithubResult<()> {
        let url = format!("{BASE_URL}/repos/{repo}/releases/assets/{asset_id}");
        self.client
            .delete(&url)
            .header(ACCEPT, "application/vnd.github.v3+json")
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /**
        Fetches the tag ref `tags/<tag>`, if it exists.
    */
    #[instrument(skip(self), level = "debug")]
    pub async fn get_tag_ref(&self, repo: &Repository, tag: &str) -> GithubResult<Option<GitRef>> {
        let url = format!("{BASE_URL}/repos/{repo}/git/ref/tags/{tag}");
        match self.get_json(&url).await {
            Ok(git_ref) => Ok(Some(git_ref)),
            Err(e) if is_404(&e) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /**
        Creates the tag ref `refs/tags/<tag>` pointing at the given commit.
    */
    #[instrument(skip(self), level = "debug")]
    pub async fn create_tag_ref(
        &self,
        repo: &Repository,
        tag: &str,
        sha: &str,
    ) -> GithubResult<GitRef> {
        let url = format!("{BASE_URL}/repos/{repo}/git/refs");
        let body = json!({ "ref": format!("refs/tags/{tag}"), "sha": sha });
        self.send_json(Method::POST, &url, &body).await
    }

    /**
        Force-updates the tag ref `tags/<tag>` to the given commit.

        A moving nightly tag is almost never a fast-forward, so the
        update is always forced.
    */
    #[instrument(skip(self), level = "debug")]
    pub async fn update_tag_ref(
        &self,
        repo: &Repository,
        tag: &str,
        sha: &str,
    ) -> GithubResult<GitRef> {
        let url = format!("{BASE_URL}/repos/{repo}/git/refs/tags/{tag}");
        let body = json!({ "sha": sha, "force": true });
        self.send_json(Method::PATCH, &url, &body).await
    }

    /**
        Uploads a release asset by POSTing raw bytes to the release's
        upload endpoint, with the asset name as a query parameter.

        Expects HTTP 201; anything else is surfaced as an error that
        carries the file name, status code, and the server's message.
        On success the parsed response body is returned as-is, minus
        the noisy `uploader` field.
    */
    #[instrument(skip(self, data), fields(size = data.len()), level = "debug")]
    pub async fn upload_asset(
        &self,
        upload_url: &str,
        name: &str,
        mime: &str,
        data: Bytes,
    ) -> GithubResult<Value> {
        let endpoint = upload_endpoint(upload_url, name)?;

        let response = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, mime)
            .header(CONTENT_LENGTH, data.len())
            .body(data)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let json: Value = serde_json::from_str(&body).unwrap_or(Value::Null);

        if status != StatusCode::CREATED {
            return Err(GithubError::AssetUploadRejected {
                name: name.to_string(),
                status,
                message: json
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                errors: json.get("errors").cloned().unwrap_or(Value::Null).to_string(),
            });
        }

        let mut asset = json;
        if let Some(fields) = asset.as_object_mut() {
            fields.remove("uploader");
        }
        Ok(asset)
    }
}

/**
    Builds the concrete upload endpoint from the templated `upload_url`
    a release carries, attaching the asset name as a query parameter.
*/
fn upload_endpoint(template: &str, name: &str) -> GithubResult<Url> {
    // upload_url is an RFC 6570 template ending in `{?name,label}`
    let base = template.split('{').next().unwrap_or(template);
    let mut url = Url::parse(base)?;
    url.query_pairs_mut().append_pair("name", name);
    Ok(url)
}

fn is_404(err: &GithubError) -> bool {
    let status = match err {
        GithubError::Reqwest(e)
        | GithubError::ReqwestMiddleware(reqwest_middleware::Error::Reqwest(e)) => e.status(),
        _ => None,
    };
    status == Some(StatusCode::NOT_FOUND)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_endpoint_strips_template_suffix() {
        let url = upload_endpoint(
            "https://uploads.github.com/repos/a/b/releases/1/assets{?name,label}",
            "tool.zip",
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://uploads.github.com/repos/a/b/releases/1/assets?name=tool.zip"
        );
    }

    #[test]
    fn upload_endpoint_accepts_plain_urls() {
        // A non-templated url should pass through unchanged
        let url = upload_endpoint(
            "https://uploads.github.com/repos/a/b/releases/1/assets",
            "tool.zip",
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://uploads.github.com/repos/a/b/releases/1/assets?name=tool.zip"
        );
    }

    #[test]
    fn upload_endpoint_encodes_names() {
        let url = upload_endpoint(
            "https://uploads.github.com/repos/a/b/releases/1/assets{?name,label}",
            "my tool.zip",
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://uploads.github.com/repos/a/b/releases/1/assets?name=my+tool.zip"
        );
    }
}

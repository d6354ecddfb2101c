//! Travis CI build trigger.
//!
//! Requests a build of one branch through the Travis v3 API.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

pub const TRAVIS_API: &str = "https://api.travis-ci.org";
pub const DEFAULT_REPO: &str = "amalgam8/testing";
pub const DEFAULT_BRANCH: &str = "master";
pub const TOKEN_ENV: &str = "TRAVIS_TOKEN";

#[derive(Debug, Error)]
pub enum CiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Travis API returned status {status}: {body}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },
}

#[derive(Debug, Serialize)]
struct TriggerBody<'a> {
    request: BranchRequest<'a>,
}

#[derive(Debug, Serialize)]
struct BranchRequest<'a> {
    branch: &'a str,
}

/// A build request for `branch` of `repo` (`owner/name`).
#[derive(Debug, Clone)]
pub struct BuildTrigger {
    pub api_base: String,
    pub repo: String,
    pub branch: String,
    pub token: String,
}

impl BuildTrigger {
    /// `<api>/repo/<repo, url-encoded>/requests`. The slash in the repo slug
    /// is encoded as `%2F`.
    pub fn requests_url(&self) -> String {
        let slug: String = url::form_urlencoded::byte_serialize(self.repo.as_bytes()).collect();
        format!("{}/repo/{}/requests", self.api_base.trim_end_matches('/'), slug)
    }

    /// POST the request and return the API's JSON reply.
    pub async fn send(&self, client: &reqwest::Client) -> Result<Value, CiError> {
        let body = TriggerBody {
            request: BranchRequest {
                branch: &self.branch,
            },
        };

        let res = client
            .post(self.requests_url())
            .header("Travis-API-Version", "3")
            .header(reqwest::header::AUTHORIZATION, format!("token {}", self.token))
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(CiError::Rejected { status, body });
        }

        Ok(res.json().await?)
    }
}

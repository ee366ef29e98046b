use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const SHARING_API: &str = "apps/files_sharing/api/v1";

/// The sharing endpoints a listing can be assembled from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShareEndpoint {
    /// `shares?shared_with_me=true`
    SharedWithMe,
    /// `shares?shared_with_me=false`
    SharedWithOthers,
    /// `remote_shares`
    Remote,
    /// `shares/pending`
    Pending,
    /// `remote_shares/pending`
    RemotePending,
    /// `deletedshares`
    Deleted,
}

impl ShareEndpoint {
    /// Path below the OCS root
    pub fn path(&self) -> String {
        let suffix = match self {
            ShareEndpoint::SharedWithMe | ShareEndpoint::SharedWithOthers => "shares",
            ShareEndpoint::Remote => "remote_shares",
            ShareEndpoint::Pending => "shares/pending",
            ShareEndpoint::RemotePending => "remote_shares/pending",
            ShareEndpoint::Deleted => "deletedshares",
        };
        format!("{}/{}", SHARING_API, suffix)
    }

    /// Query string parameters, in request order
    pub fn query(&self) -> Vec<(&'static str, &'static str)> {
        let mut params = Vec::new();
        match self {
            ShareEndpoint::SharedWithMe => params.push(("shared_with_me", "true")),
            ShareEndpoint::SharedWithOthers => params.push(("shared_with_me", "false")),
            _ => {}
        }
        params.push(("include_tags", "true"));
        params.push(("format", "json"));
        params
    }

    pub fn label(&self) -> &'static str {
        match self {
            ShareEndpoint::SharedWithMe => "shares shared with me",
            ShareEndpoint::SharedWithOthers => "shares",
            ShareEndpoint::Remote => "remote shares",
            ShareEndpoint::Pending => "pending shares",
            ShareEndpoint::RemotePending => "remote pending shares",
            ShareEndpoint::Deleted => "deleted shares",
        }
    }
}

/// Where share records come from
///
/// The aggregator only ever talks to this trait, so listings can be built
/// against something other than a live server.
#[async_trait]
pub trait ShareSource: Send + Sync {
    /// Fetch the `ocs.data` array of one endpoint
    async fn fetch_shares(&self, endpoint: ShareEndpoint) -> Result<Vec<Value>>;
}

/// Server-side share actions
#[async_trait]
pub trait ShareActionClient: Send + Sync {
    async fn accept_share(&self, share_id: &str, remote: bool) -> Result<()>;
    async fn reject_share(&self, share_id: &str, remote: bool, accepted: bool) -> Result<()>;
    async fn restore_share(&self, share_id: &str) -> Result<()>;
}

/// Standard OCS response wrapper
#[derive(Debug, Deserialize)]
struct OcsResponse<T> {
    ocs: OcsEnvelope<T>,
}

#[derive(Debug, Deserialize)]
struct OcsEnvelope<T> {
    #[serde(default)]
    #[allow(dead_code)]
    meta: Option<OcsMeta>,
    data: T,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct OcsMeta {
    status: String,
    statuscode: u32,
    message: Option<String>,
}

#[derive(Clone)]
pub struct OcsClient {
    base_url: String,
    username: String,
    app_password: String,
    client: Client,
}

impl OcsClient {
    pub fn new(base_url: String, username: String, app_password: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            username,
            app_password,
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Render a server-relative OCS path into a full URL
    pub fn ocs_url(&self, path: &str) -> String {
        format!("{}/ocs/v2.php/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .basic_auth(&self.username, Some(&self.app_password))
            .header("OCS-APIRequest", "true")
            .header(ACCEPT, "application/json")
    }

    fn endpoint_url(&self, endpoint: ShareEndpoint) -> String {
        let query = endpoint
            .query()
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.ocs_url(&endpoint.path()), query)
    }

    /// Send a body-less OCS call, failing on any non-2xx status
    async fn send_action(&self, method: Method, path: &str, what: &str) -> Result<()> {
        let url = format!("{}?format=json", self.ocs_url(path));
        self.request(method, &url)
            .send()
            .await
            .with_context(|| format!("Failed to {}", what))?
            .error_for_status()
            .with_context(|| format!("Failed to {}", what))?;

        Ok(())
    }
}

fn share_base(remote: bool) -> &'static str {
    if remote {
        "remote_shares"
    } else {
        "shares"
    }
}

fn accept_path(share_id: &str, remote: bool) -> String {
    format!(
        "{}/{}/pending/{}",
        SHARING_API,
        share_base(remote),
        urlencoding::encode(share_id)
    )
}

fn reject_path(share_id: &str, remote: bool, accepted: bool) -> String {
    let id = urlencoding::encode(share_id);
    if accepted {
        format!("{}/{}/{}", SHARING_API, share_base(remote), id)
    } else {
        format!("{}/{}/pending/{}", SHARING_API, share_base(remote), id)
    }
}

fn restore_path(share_id: &str) -> String {
    format!(
        "{}/deletedshares/{}",
        SHARING_API,
        urlencoding::encode(share_id)
    )
}

#[async_trait]
impl ShareSource for OcsClient {
    async fn fetch_shares(&self, endpoint: ShareEndpoint) -> Result<Vec<Value>> {
        let url = self.endpoint_url(endpoint);
        tracing::debug!(endpoint = endpoint.label(), %url, "fetching shares");

        let response = self
            .request(Method::GET, &url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", endpoint.label()))?
            .error_for_status()
            .with_context(|| format!("Failed to fetch {}", endpoint.label()))?;

        let body: OcsResponse<Vec<Value>> = response
            .json()
            .await
            .with_context(|| format!("Failed to parse {}", endpoint.label()))?;

        Ok(body.ocs.data)
    }
}

#[async_trait]
impl ShareActionClient for OcsClient {
    /// Accept a pending share
    ///
    /// Uses POST {shares|remote_shares}/pending/{id}
    async fn accept_share(&self, share_id: &str, remote: bool) -> Result<()> {
        let path = accept_path(share_id, remote);
        self.send_action(Method::POST, &path, "accept share").await
    }

    /// Reject a share
    ///
    /// Shares that were never accepted are removed from the pending list,
    /// accepted ones are deleted outright.
    async fn reject_share(&self, share_id: &str, remote: bool, accepted: bool) -> Result<()> {
        let path = reject_path(share_id, remote, accepted);
        self.send_action(Method::DELETE, &path, "reject share").await
    }

    /// Restore a share the user left
    ///
    /// Uses POST deletedshares/{id}
    async fn restore_share(&self, share_id: &str) -> Result<()> {
        let path = restore_path(share_id);
        self.send_action(Method::POST, &path, "restore share").await
    }
}

//! Normalized nodes
//!
//! Every share record, whatever its shape, ends up as a [`Node`] addressed by
//! its WebDAV source URL.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::api::ShareEndpoint;
use crate::model::share::{Permission, Provenance, ShareType};

/// Tag name the server uses to mark favorites
pub const DEFAULT_FAVORITE_TAG: &str = "_$!<Favorite>!$_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Folder,
}

/// Request-scoped caller context
///
/// Passed explicitly to everything that needs to know who is asking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    pub current_user_id: Option<String>,
    /// e.g. `https://cloud.example/remote.php/dav`
    pub dav_remote_url: String,
    /// e.g. `/files/alice`
    pub dav_root_path: String,
    pub favorite_tag: String,
}

impl Context {
    /// Build the context for `user` on the server at `base_url`
    pub fn new(base_url: &str, user: &str) -> Self {
        Self {
            current_user_id: Some(user.to_string()),
            dav_remote_url: format!("{}/remote.php/dav", base_url.trim_end_matches('/')),
            dav_root_path: format!("/files/{}", user),
            favorite_tag: DEFAULT_FAVORITE_TAG.to_string(),
        }
    }

    pub fn with_favorite_tag(mut self, tag: impl Into<String>) -> Self {
        self.favorite_tag = tag.into();
        self
    }

    /// Source URL of the DAV root
    pub fn root_source(&self) -> String {
        format!("{}{}", self.dav_remote_url, self.dav_root_path)
    }

    /// Source URL of `path` below the DAV root, leading slashes stripped
    pub fn source_for(&self, path: &str) -> String {
        format!("{}/{}", self.root_source(), path.trim_start_matches('/'))
    }
}

/// The person or group a share points at
///
/// Present whenever the record has a `share_with` field. Link shares
/// without a password send it as `null`, which leaves `id` empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sharee {
    pub id: Option<String>,
    pub display_name: Option<String>,
    pub share_type: ShareType,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeAttributes {
    pub share_id: String,
    pub owner_id: Option<String>,
    pub owner_display_name: Option<String>,
    pub has_preview: bool,
    pub hide_download: bool,
    /// This record's own share type, before merging
    pub share_type: ShareType,
    /// Share types of every record merged into this node, in first-seen order
    pub share_types: Vec<ShareType>,
    /// JSON-encoded `{scope, key, value}` tuples
    pub share_attributes: String,
    pub sharee: Option<Sharee>,
    pub favorite: bool,
    pub provenance: Provenance,
    pub endpoint: ShareEndpoint,
    pub remote: Option<String>,
    pub accepted: Option<bool>,
    /// The record as the server sent it
    pub raw: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub id: String,
    pub source: String,
    pub kind: NodeKind,
    pub owner: Option<String>,
    pub mime: String,
    pub mtime: Option<DateTime<Utc>>,
    pub size: Option<u64>,
    pub permissions: Permission,
    pub root: String,
    /// Path below `root`, always with a leading slash
    pub relative_path: String,
    pub attributes: NodeAttributes,
}

impl Node {
    /// Last path segment of the source
    pub fn basename(&self) -> &str {
        self.source
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(&self.source)
    }

    /// Path relative to the DAV root
    pub fn path(&self) -> &str {
        &self.relative_path
    }

    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }
}

/// Synthetic folder the listing hangs off
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RootFolder {
    pub id: u64,
    pub source: String,
    pub owner: Option<String>,
}

impl RootFolder {
    pub fn for_context(ctx: &Context) -> Self {
        Self {
            id: 0,
            source: ctx.root_source(),
            owner: ctx.current_user_id.clone(),
        }
    }
}

/// A record that was dropped during normalization
#[derive(Debug, Clone, Serialize)]
pub struct SkippedRecord {
    /// Position in the flattened record sequence
    pub index: usize,
    pub endpoint: ShareEndpoint,
    pub reason: String,
}

/// Result of one aggregation
#[derive(Debug, Clone, Serialize)]
pub struct Contents {
    pub folder: RootFolder,
    pub nodes: Vec<Node>,
    pub skipped: Vec<SkippedRecord>,
}

impl Contents {
    /// Fail when more than `limit` records were dropped
    pub fn ensure_skipped_within(self, limit: usize) -> anyhow::Result<Self> {
        if self.skipped.len() > limit {
            anyhow::bail!(
                "{} share records could not be read (limit {}); first error: {}",
                self.skipped.len(),
                limit,
                self.skipped[0].reason
            );
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_urls() {
        let ctx = Context::new("https://cloud.example/", "alice");
        assert_eq!(ctx.root_source(), "https://cloud.example/remote.php/dav/files/alice");
        assert_eq!(
            ctx.source_for("//Documents/a.txt"),
            "https://cloud.example/remote.php/dav/files/alice/Documents/a.txt"
        );
        assert_eq!(ctx.favorite_tag, DEFAULT_FAVORITE_TAG);
    }

    #[test]
    fn test_root_folder_for_context() {
        let ctx = Context::new("https://cloud.example", "alice");
        let root = RootFolder::for_context(&ctx);
        assert_eq!(root.id, 0);
        assert_eq!(root.owner.as_deref(), Some("alice"));

        let anonymous = Context {
            current_user_id: None,
            ..ctx
        };
        assert_eq!(RootFolder::for_context(&anonymous).owner, None);
    }

    #[test]
    fn test_ensure_skipped_within() {
        let ctx = Context::new("https://cloud.example", "alice");
        let contents = Contents {
            folder: RootFolder::for_context(&ctx),
            nodes: Vec::new(),
            skipped: vec![SkippedRecord {
                index: 3,
                endpoint: ShareEndpoint::SharedWithMe,
                reason: "malformed".to_string(),
            }],
        };
        assert!(contents.clone().ensure_skipped_within(1).is_ok());
        assert!(contents.ensure_skipped_within(0).is_err());
    }
}

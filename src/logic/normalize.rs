//! Record normalization
//!
//! Turns one raw share record into a [`Node`]. Failures are returned, never
//! thrown past the caller; the aggregator decides what to do with them.

use serde_json::Value;

use crate::api::ShareEndpoint;
use crate::model::node::{Context, Node, NodeAttributes, Sharee};
use crate::model::share::{NormalizeError, RawShare};

const FALLBACK_MIME: &str = "application/octet-stream";

/// Normalize one record returned by `endpoint`
pub fn normalize_record(
    record: &Value,
    endpoint: ShareEndpoint,
    ctx: &Context,
) -> Result<Node, NormalizeError> {
    let raw = RawShare::from_record(record, endpoint)?;
    build_node(&raw, record, endpoint, ctx)
}

fn build_node(
    raw: &RawShare,
    record: &Value,
    endpoint: ShareEndpoint,
    ctx: &Context,
) -> Result<Node, NormalizeError> {
    let path = raw.path().ok_or_else(|| NormalizeError::MissingPath {
        id: raw.share_id().to_string(),
    })?;
    let meta = raw.meta();
    let (owner_id, owner_display_name) = raw.owner();
    let share_type = raw.share_type();

    // Key presence decides, a null `share_with` still yields a sharee
    let sharee = record.get("share_with").map(|_| Sharee {
        id: meta.share_with.clone(),
        display_name: meta
            .share_with_displayname
            .clone()
            .filter(|name| !name.is_empty())
            .or_else(|| meta.share_with.clone()),
        share_type,
    });

    let attributes = NodeAttributes {
        share_id: raw.share_id().to_string(),
        owner_id: owner_id.map(str::to_string),
        owner_display_name: owner_display_name.map(str::to_string),
        has_preview: meta.has_preview(),
        hide_download: meta.hide_download(),
        share_type,
        share_types: vec![share_type],
        share_attributes: meta
            .attributes
            .clone()
            .unwrap_or_else(|| "[]".to_string()),
        sharee,
        favorite: meta.tags.iter().any(|tag| *tag == ctx.favorite_tag),
        provenance: raw.provenance(),
        endpoint,
        remote: raw.remote().map(str::to_string),
        accepted: raw.accepted(),
        raw: record.as_object().cloned().unwrap_or_default(),
    };

    Ok(Node {
        id: raw.file_id().to_string(),
        source: ctx.source_for(path),
        kind: raw.kind(),
        owner: owner_id.map(str::to_string),
        mime: raw.mimetype().unwrap_or(FALLBACK_MIME).to_string(),
        mtime: raw.mtime(),
        size: meta.item_size,
        permissions: raw.permissions(),
        root: ctx.dav_root_path.clone(),
        relative_path: format!("/{}", path.trim_start_matches('/')),
        attributes,
    })
}

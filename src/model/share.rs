//! Raw share records
//!
//! The sharing endpoints return records in several loosely-typed shapes.
//! Each record is decoded into a [`RawShare`] variant keyed on where it came
//! from, and every field lookup goes through the variant instead of probing
//! optional fields ad hoc.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::api::ShareEndpoint;
use crate::model::node::NodeKind;

/// Mountpoint placeholder the server reports for federated shares that
/// have not been mounted yet
const TEMPORARY_MOUNT_POINT: &str = "TemporaryMountPointName";

/// How a resource is shared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum ShareType {
    User,
    Group,
    Link,
    Email,
    Remote,
    Team,
    Guest,
    RemoteGroup,
    Room,
    Deck,
    ScienceMesh,
}

impl ShareType {
    pub fn from_i32(v: i32) -> Option<Self> {
        match v {
            0 => Some(Self::User),
            1 => Some(Self::Group),
            3 => Some(Self::Link),
            4 => Some(Self::Email),
            6 => Some(Self::Remote),
            7 => Some(Self::Team),
            8 => Some(Self::Guest),
            9 => Some(Self::RemoteGroup),
            10 => Some(Self::Room),
            12 => Some(Self::Deck),
            15 => Some(Self::ScienceMesh),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> i32 {
        match self {
            Self::User => 0,
            Self::Group => 1,
            Self::Link => 3,
            Self::Email => 4,
            Self::Remote => 6,
            Self::Team => 7,
            Self::Guest => 8,
            Self::RemoteGroup => 9,
            Self::Room => 10,
            Self::Deck => 12,
            Self::ScienceMesh => 15,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Group => "group",
            Self::Link => "link",
            Self::Email => "email",
            Self::Remote => "remote",
            Self::Team => "team",
            Self::Guest => "guest",
            Self::RemoteGroup => "remote-group",
            Self::Room => "room",
            Self::Deck => "deck",
            Self::ScienceMesh => "sciencemesh",
        }
    }
}

impl TryFrom<i32> for ShareType {
    type Error = String;

    fn try_from(v: i32) -> Result<Self, Self::Error> {
        Self::from_i32(v).ok_or_else(|| format!("unknown share type {}", v))
    }
}

impl From<ShareType> for i32 {
    fn from(share_type: ShareType) -> Self {
        share_type.as_i32()
    }
}

impl std::str::FromStr for ShareType {
    type Err = String;

    /// Accepts either the numeric wire value or the lowercase name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(v) = s.parse::<i32>() {
            return Self::try_from(v);
        }
        let lower = s.to_lowercase();
        [
            Self::User,
            Self::Group,
            Self::Link,
            Self::Email,
            Self::Remote,
            Self::Team,
            Self::Guest,
            Self::RemoteGroup,
            Self::Room,
            Self::Deck,
            Self::ScienceMesh,
        ]
        .into_iter()
        .find(|t| t.as_str() == lower)
        .ok_or_else(|| format!("unknown share type '{}'", s))
    }
}

/// Share permission bitmask
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(pub u32);

impl Permission {
    pub const NONE: Permission = Permission(0);
    pub const READ: u32 = 1;
    pub const UPDATE: u32 = 2;
    pub const CREATE: u32 = 4;
    pub const DELETE: u32 = 8;
    pub const SHARE: u32 = 16;
    pub const ALL: u32 = 31;

    pub fn can_read(&self) -> bool {
        self.0 & Self::READ != 0
    }
    pub fn can_update(&self) -> bool {
        self.0 & Self::UPDATE != 0
    }
    pub fn can_create(&self) -> bool {
        self.0 & Self::CREATE != 0
    }
    pub fn can_delete(&self) -> bool {
        self.0 & Self::DELETE != 0
    }
    pub fn can_share(&self) -> bool {
        self.0 & Self::SHARE != 0
    }
}

/// Which family of endpoint a record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Local,
    Federated,
    Pending,
    Deleted,
}

/// Why a single record could not be turned into a node
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("share record is not a JSON object")]
    NotAnObject,

    #[error("malformed share record: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("share record {id} has no path, file target or name")]
    MissingPath { id: String },
}

/// Ids arrive as numbers from some endpoints and strings from others
#[derive(Deserialize)]
#[serde(untagged)]
enum IdValue {
    Num(u64),
    Str(String),
}

impl IdValue {
    fn into_id(self) -> Option<String> {
        match self {
            IdValue::Num(0) => None,
            IdValue::Num(n) => Some(n.to_string()),
            IdValue::Str(s) if s.is_empty() => None,
            IdValue::Str(s) => Some(s),
        }
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    IdValue::deserialize(deserializer)?
        .into_id()
        .ok_or_else(|| serde::de::Error::custom("empty share id"))
}

fn deserialize_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<IdValue>::deserialize(deserializer)?;
    Ok(opt.and_then(IdValue::into_id))
}

/// Helper function to deserialize null as empty vector
fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let opt = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

/// Fields every record shape shares
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShareMeta {
    #[serde(default)]
    pub has_preview: Value,
    #[serde(default)]
    pub hide_download: Value,
    /// JSON-encoded array of `{scope, key, value}` tuples
    #[serde(default)]
    pub attributes: Option<String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub share_with: Option<String>,
    #[serde(default)]
    pub share_with_displayname: Option<String>,
    #[serde(default)]
    pub item_size: Option<u64>,
}

impl ShareMeta {
    pub fn has_preview(&self) -> bool {
        self.has_preview == Value::Bool(true)
    }

    pub fn hide_download(&self) -> bool {
        self.hide_download.as_i64() == Some(1)
    }
}

/// A share stored on this server (own, received, pending or deleted)
#[derive(Debug, Clone, Deserialize)]
pub struct LocalShare {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub file_source: Option<String>,
    pub share_type: ShareType,
    #[serde(default)]
    pub uid_owner: Option<String>,
    #[serde(default)]
    pub displayname_owner: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub file_target: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub item_type: Option<String>,
    #[serde(default)]
    pub mimetype: Option<String>,
    #[serde(default)]
    pub item_mtime: Option<i64>,
    #[serde(default)]
    pub stime: Option<i64>,
    #[serde(default)]
    pub item_permissions: Option<u32>,
    #[serde(default)]
    pub permissions: Option<u32>,
    #[serde(flatten)]
    pub meta: ShareMeta,
}

/// A share whose origin is another server instance
#[derive(Debug, Clone, Deserialize)]
pub struct FederatedShare {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub remote_id: String,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub file_id: Option<String>,
    #[serde(default = "default_remote_share_type")]
    pub share_type: ShareType,
    pub owner: String,
    pub name: String,
    #[serde(default)]
    pub mountpoint: Option<String>,
    #[serde(default)]
    pub file_target: Option<String>,
    #[serde(default)]
    pub mimetype: Option<String>,
    #[serde(default)]
    pub mtime: Option<i64>,
    #[serde(default)]
    pub stime: Option<i64>,
    #[serde(default, rename = "type")]
    pub item_type: Option<String>,
    /// Base URL of the originating server
    #[serde(default)]
    pub remote: Option<String>,
    #[serde(default)]
    pub accepted: Value,
    #[serde(flatten)]
    pub meta: ShareMeta,
}

fn default_remote_share_type() -> ShareType {
    ShareType::Remote
}

/// A decoded share record, tagged by provenance
#[derive(Debug, Clone)]
pub enum RawShare {
    Local(LocalShare),
    Federated(FederatedShare),
    Pending(LocalShare),
    Deleted(LocalShare),
}

impl RawShare {
    /// Decode one record returned by `endpoint`
    ///
    /// Any record carrying a `remote_id` is federated, whichever endpoint
    /// returned it.
    pub fn from_record(record: &Value, endpoint: ShareEndpoint) -> Result<Self, NormalizeError> {
        let object = record.as_object().ok_or(NormalizeError::NotAnObject)?;

        if object.get("remote_id").is_some_and(|v| !v.is_null()) {
            let mut share: FederatedShare = serde_json::from_value(record.clone())?;
            if share.mimetype.is_none() {
                // Names without an extension stay unknown
                share.mimetype = mime_guess::from_path(&share.name)
                    .first()
                    .map(|m| m.essence_str().to_string());
            }
            if first_non_empty(&[share.file_target.as_deref(), share.mountpoint.as_deref()])
                .is_some_and(|t| t.contains(TEMPORARY_MOUNT_POINT))
            {
                share.file_target = Some(share.name.clone());
            }
            return Ok(RawShare::Federated(share));
        }

        let share: LocalShare = serde_json::from_value(record.clone())?;
        Ok(match endpoint {
            ShareEndpoint::Pending | ShareEndpoint::RemotePending => RawShare::Pending(share),
            ShareEndpoint::Deleted => RawShare::Deleted(share),
            _ => RawShare::Local(share),
        })
    }

    pub fn provenance(&self) -> Provenance {
        match self {
            RawShare::Local(_) => Provenance::Local,
            RawShare::Federated(_) => Provenance::Federated,
            RawShare::Pending(_) => Provenance::Pending,
            RawShare::Deleted(_) => Provenance::Deleted,
        }
    }

    /// Row id of the share itself
    pub fn share_id(&self) -> &str {
        match self {
            RawShare::Federated(s) => &s.id,
            RawShare::Local(s) | RawShare::Pending(s) | RawShare::Deleted(s) => &s.id,
        }
    }

    /// Id of the shared file, falling back to the share row id
    pub fn file_id(&self) -> &str {
        match self {
            RawShare::Federated(s) => s.file_id.as_deref().unwrap_or(&s.id),
            RawShare::Local(s) | RawShare::Pending(s) | RawShare::Deleted(s) => {
                s.file_source.as_deref().unwrap_or(&s.id)
            }
        }
    }

    pub fn path(&self) -> Option<&str> {
        match self {
            RawShare::Federated(s) => first_non_empty(&[
                s.file_target.as_deref(),
                s.mountpoint.as_deref(),
                Some(s.name.as_str()),
            ]),
            RawShare::Local(s) | RawShare::Pending(s) | RawShare::Deleted(s) => first_non_empty(&[
                s.path.as_deref(),
                s.file_target.as_deref(),
                s.name.as_deref(),
            ]),
        }
    }

    /// Owner id and display name
    ///
    /// Federated shares report the remote owner for both.
    pub fn owner(&self) -> (Option<&str>, Option<&str>) {
        match self {
            RawShare::Federated(s) => (Some(s.owner.as_str()), Some(s.owner.as_str())),
            RawShare::Local(s) | RawShare::Pending(s) | RawShare::Deleted(s) => {
                (s.uid_owner.as_deref(), s.displayname_owner.as_deref())
            }
        }
    }

    /// Item mtime, or the share time when that is more recent
    pub fn mtime(&self) -> Option<DateTime<Utc>> {
        let (item_mtime, stime) = match self {
            RawShare::Federated(s) => (s.mtime, s.stime),
            RawShare::Local(s) | RawShare::Pending(s) | RawShare::Deleted(s) => {
                (s.item_mtime, s.stime)
            }
        };
        let effective = match stime {
            Some(stime) if stime > item_mtime.unwrap_or(0) => Some(stime),
            _ => item_mtime.filter(|t| *t != 0),
        };
        effective.and_then(|secs| Utc.timestamp_opt(secs, 0).single())
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            RawShare::Federated(s) => match s.item_type.as_deref() {
                Some("dir") | Some("folder") => NodeKind::Folder,
                Some(t) if !t.is_empty() => NodeKind::File,
                _ if s.mimetype.is_some() => NodeKind::File,
                _ => NodeKind::Folder,
            },
            RawShare::Local(s) | RawShare::Pending(s) | RawShare::Deleted(s) => {
                if s.item_type.as_deref() == Some("folder") {
                    NodeKind::Folder
                } else {
                    NodeKind::File
                }
            }
        }
    }

    pub fn mimetype(&self) -> Option<&str> {
        match self {
            RawShare::Federated(s) => s.mimetype.as_deref(),
            RawShare::Local(s) | RawShare::Pending(s) | RawShare::Deleted(s) => {
                s.mimetype.as_deref()
            }
        }
        .filter(|m| !m.is_empty())
    }

    /// Effective permissions
    ///
    /// Federated shares carry no actionable rights on this server.
    pub fn permissions(&self) -> Permission {
        match self {
            RawShare::Federated(_) => Permission::NONE,
            RawShare::Local(s) | RawShare::Pending(s) | RawShare::Deleted(s) => {
                match s.item_permissions {
                    Some(p) if p != 0 => Permission(p),
                    _ => Permission(s.permissions.unwrap_or(0)),
                }
            }
        }
    }

    pub fn share_type(&self) -> ShareType {
        match self {
            RawShare::Federated(s) => s.share_type,
            RawShare::Local(s) | RawShare::Pending(s) | RawShare::Deleted(s) => s.share_type,
        }
    }

    pub fn meta(&self) -> &ShareMeta {
        match self {
            RawShare::Federated(s) => &s.meta,
            RawShare::Local(s) | RawShare::Pending(s) | RawShare::Deleted(s) => &s.meta,
        }
    }

    /// Originating server, for federated shares
    pub fn remote(&self) -> Option<&str> {
        match self {
            RawShare::Federated(s) => s.remote.as_deref().filter(|r| !r.is_empty()),
            _ => None,
        }
    }

    /// Whether a federated share has been accepted, when the record says
    pub fn accepted(&self) -> Option<bool> {
        match self {
            RawShare::Federated(s) => match &s.accepted {
                Value::Bool(b) => Some(*b),
                Value::Number(n) => n.as_i64().map(|n| n != 0),
                Value::String(s) => Some(s != "0" && !s.is_empty()),
                _ => None,
            },
            _ => None,
        }
    }
}

fn first_non_empty<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates.iter().flatten().copied().find(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn local(extra: Value) -> Value {
        let mut base = json!({
            "id": "12",
            "share_type": 3,
            "uid_owner": "alice",
            "displayname_owner": "Alice",
            "path": "/Documents/report.pdf",
            "item_type": "file",
            "file_source": 345,
        });
        if let (Some(b), Some(e)) = (base.as_object_mut(), extra.as_object()) {
            for (k, v) in e {
                b.insert(k.clone(), v.clone());
            }
        }
        base
    }

    #[test]
    fn test_share_type_wire_values() {
        for v in [0, 1, 3, 4, 6, 7, 8, 9, 10, 12, 15] {
            let st = ShareType::from_i32(v).unwrap();
            assert_eq!(st.as_i32(), v);
        }
        assert!(ShareType::from_i32(2).is_none());
        assert!(ShareType::from_i32(99).is_none());
    }

    #[test]
    fn test_share_type_from_str() {
        assert_eq!("link".parse::<ShareType>(), Ok(ShareType::Link));
        assert_eq!("3".parse::<ShareType>(), Ok(ShareType::Link));
        assert_eq!("Remote-Group".parse::<ShareType>(), Ok(ShareType::RemoteGroup));
        assert!("bogus".parse::<ShareType>().is_err());
    }

    #[test]
    fn test_local_record_uses_file_source() {
        let raw = RawShare::from_record(&local(json!({})), ShareEndpoint::SharedWithOthers).unwrap();
        assert_eq!(raw.provenance(), Provenance::Local);
        assert_eq!(raw.file_id(), "345");
        assert_eq!(raw.share_id(), "12");
        assert_eq!(raw.path(), Some("/Documents/report.pdf"));
    }

    #[test]
    fn test_local_record_falls_back_to_row_id() {
        let record = local(json!({ "file_source": null }));
        let raw = RawShare::from_record(&record, ShareEndpoint::SharedWithOthers).unwrap();
        assert_eq!(raw.file_id(), "12");
    }

    #[test]
    fn test_path_falls_back_to_target_then_name() {
        let record = local(json!({ "path": null, "file_target": "/Shared/a.txt" }));
        let raw = RawShare::from_record(&record, ShareEndpoint::SharedWithMe).unwrap();
        assert_eq!(raw.path(), Some("/Shared/a.txt"));

        let record = local(json!({ "path": "", "file_target": null, "name": "b.txt" }));
        let raw = RawShare::from_record(&record, ShareEndpoint::SharedWithMe).unwrap();
        assert_eq!(raw.path(), Some("b.txt"));
    }

    #[test]
    fn test_endpoint_sets_provenance() {
        let raw = RawShare::from_record(&local(json!({})), ShareEndpoint::Pending).unwrap();
        assert_eq!(raw.provenance(), Provenance::Pending);
        assert_eq!(raw.accepted(), None);

        let raw = RawShare::from_record(&local(json!({})), ShareEndpoint::Deleted).unwrap();
        assert_eq!(raw.provenance(), Provenance::Deleted);
    }

    #[test]
    fn test_share_time_preferred_when_newer() {
        let record = local(json!({ "item_mtime": 1_000, "stime": 2_000 }));
        let raw = RawShare::from_record(&record, ShareEndpoint::SharedWithMe).unwrap();
        assert_eq!(raw.mtime().unwrap().timestamp(), 2_000);

        let record = local(json!({ "item_mtime": 3_000, "stime": 2_000 }));
        let raw = RawShare::from_record(&record, ShareEndpoint::SharedWithMe).unwrap();
        assert_eq!(raw.mtime().unwrap().timestamp(), 3_000);

        let record = local(json!({}));
        let raw = RawShare::from_record(&record, ShareEndpoint::SharedWithMe).unwrap();
        assert!(raw.mtime().is_none());
    }

    #[test]
    fn test_item_permissions_preferred() {
        let record = local(json!({ "item_permissions": 19, "permissions": 1 }));
        let raw = RawShare::from_record(&record, ShareEndpoint::SharedWithMe).unwrap();
        assert_eq!(raw.permissions(), Permission(19));

        let record = local(json!({ "item_permissions": 0, "permissions": 1 }));
        let raw = RawShare::from_record(&record, ShareEndpoint::SharedWithMe).unwrap();
        assert_eq!(raw.permissions(), Permission(1));
    }

    #[test]
    fn test_unknown_share_type_is_malformed() {
        let record = local(json!({ "share_type": 42 }));
        let err = RawShare::from_record(&record, ShareEndpoint::SharedWithMe).unwrap_err();
        assert!(matches!(err, NormalizeError::Malformed(_)));
    }

    #[test]
    fn test_non_object_record_rejected() {
        let err = RawShare::from_record(&json!("oops"), ShareEndpoint::SharedWithMe).unwrap_err();
        assert!(matches!(err, NormalizeError::NotAnObject));
    }

    #[test]
    fn test_federated_record_overrides() {
        let record = json!({
            "id": 7,
            "remote_id": "99",
            "remote": "https://other.example",
            "owner": "bob",
            "name": "photo.jpg",
            "mountpoint": "/{{TemporaryMountPointName#/photo.jpg}}",
            "mtime": 1_700_000_000,
            "permissions": 31,
            "accepted": 0,
        });
        let raw = RawShare::from_record(&record, ShareEndpoint::RemotePending).unwrap();
        assert_eq!(raw.provenance(), Provenance::Federated);
        assert_eq!(raw.permissions(), Permission::NONE);
        assert_eq!(raw.owner(), (Some("bob"), Some("bob")));
        assert_eq!(raw.path(), Some("photo.jpg"));
        assert_eq!(raw.mimetype(), Some("image/jpeg"));
        assert_eq!(raw.kind(), NodeKind::File);
        assert_eq!(raw.share_type(), ShareType::Remote);
        assert_eq!(raw.file_id(), "7");
        assert_eq!(raw.accepted(), Some(false));
        assert_eq!(raw.remote(), Some("https://other.example"));
    }

    #[test]
    fn test_empty_file_target_still_checks_mountpoint() {
        let record = json!({
            "id": 10,
            "remote_id": "9",
            "owner": "bob",
            "name": "photo.jpg",
            "file_target": "",
            "mountpoint": "/{{TemporaryMountPointName#/photo.jpg}}",
        });
        let raw = RawShare::from_record(&record, ShareEndpoint::RemotePending).unwrap();
        assert_eq!(raw.path(), Some("photo.jpg"));
    }

    #[test]
    fn test_federated_without_extension_is_folder() {
        let record = json!({
            "id": 8,
            "remote_id": 100,
            "owner": "bob",
            "name": "Projects",
            "mountpoint": "/Projects",
        });
        let raw = RawShare::from_record(&record, ShareEndpoint::Remote).unwrap();
        assert_eq!(raw.kind(), NodeKind::Folder);
        assert_eq!(raw.path(), Some("/Projects"));
    }

    #[test]
    fn test_federated_type_field_wins() {
        let record = json!({
            "id": 9,
            "remote_id": 101,
            "owner": "bob",
            "name": "archive.zip",
            "type": "dir",
        });
        let raw = RawShare::from_record(&record, ShareEndpoint::Remote).unwrap();
        assert_eq!(raw.kind(), NodeKind::Folder);
    }

    #[test]
    fn test_meta_flags() {
        let record = local(json!({ "has_preview": true, "hide_download": 1 }));
        let raw = RawShare::from_record(&record, ShareEndpoint::SharedWithMe).unwrap();
        assert!(raw.meta().has_preview());
        assert!(raw.meta().hide_download());

        let record = local(json!({ "has_preview": "true", "hide_download": 0 }));
        let raw = RawShare::from_record(&record, ShareEndpoint::SharedWithMe).unwrap();
        assert!(!raw.meta().has_preview());
        assert!(!raw.meta().hide_download());
    }
}

//! Share Model
//!
//! Types for the two ends of a listing:
//!
//! - **share**: raw records as the server sends them, share types, permissions
//! - **node**: normalized nodes, the caller context and the assembled listing

pub mod node;
pub mod share;

pub use node::{
    Contents, Context, Node, NodeAttributes, NodeKind, RootFolder, Sharee, SkippedRecord,
    DEFAULT_FAVORITE_TAG,
};
pub use share::{NormalizeError, Permission, Provenance, RawShare, ShareType};

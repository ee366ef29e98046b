//! Share-type filtering and merge-by-source
//!
//! The same resource often comes back from several queries (shared with a
//! group and by link, say). Those records collapse into a single node that
//! remembers every share type it was seen with.

use std::collections::HashMap;

use crate::model::node::Node;
use crate::model::share::ShareType;

/// Keep only nodes whose own share type is listed
///
/// An empty list keeps everything.
pub fn filter_by_share_types(nodes: Vec<Node>, share_types: &[ShareType]) -> Vec<Node> {
    if share_types.is_empty() {
        return nodes;
    }
    nodes
        .into_iter()
        .filter(|node| share_types.contains(&node.attributes.share_type))
        .collect()
}

/// Collapse nodes with the same source into their first-seen representative
///
/// Group order and per-group `share_types` order both follow first
/// appearance in `nodes`.
pub fn merge_by_source(nodes: Vec<Node>) -> Vec<Node> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut merged: Vec<Node> = Vec::new();

    for node in nodes {
        match positions.get(&node.source) {
            Some(&pos) => {
                merged[pos]
                    .attributes
                    .share_types
                    .push(node.attributes.share_type);
            }
            None => {
                positions.insert(node.source.clone(), merged.len());
                let mut node = node;
                node.attributes.share_types = vec![node.attributes.share_type];
                merged.push(node);
            }
        }
    }

    merged
}

//! Account filtering
//!
//! Narrows a listing to shares owned by, or shared with, a set of user ids.

use crate::model::node::Node;

/// Whether `node` involves one of `accounts`
///
/// Nodes that carry neither an owner nor a sharee are kept, there is
/// nothing to match them against.
pub fn matches_accounts(node: &Node, accounts: &[String]) -> bool {
    let sharee = node.attributes.sharee.as_ref();
    if node.owner.is_none() && sharee.is_none() {
        return true;
    }

    if let Some(owner) = &node.owner {
        if accounts.contains(owner) {
            return true;
        }
    }

    sharee
        .and_then(|sharee| sharee.id.as_ref())
        .is_some_and(|id| accounts.contains(id))
}

/// Keep nodes matching any of `accounts`; an empty list keeps everything
pub fn filter_by_accounts(nodes: Vec<Node>, accounts: &[String]) -> Vec<Node> {
    if accounts.is_empty() {
        return nodes;
    }
    nodes
        .into_iter()
        .filter(|node| matches_accounts(node, accounts))
        .collect()
}

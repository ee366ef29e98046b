//! Share actions
//!
//! Accept, reject and restore, each only offered in the view it makes sense
//! in. A failing action is logged and reported as `false`; it never fails
//! the rest of a batch.

use futures::future::join_all;
use serde::Serialize;

use crate::api::ShareActionClient;
use crate::logic::views::ShareView;
use crate::model::node::Node;
use crate::model::share::{Provenance, ShareType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShareAction {
    Accept,
    Reject,
    Restore,
}

impl ShareAction {
    pub fn id(&self) -> &'static str {
        match self {
            ShareAction::Accept => "accept-share",
            ShareAction::Reject => "reject-share",
            ShareAction::Restore => "restore-share",
        }
    }

    /// Whether the action applies to `nodes` in `view`
    pub fn enabled(&self, nodes: &[Node], view: ShareView) -> bool {
        if nodes.is_empty() {
            return false;
        }
        match self {
            ShareAction::Accept => view == ShareView::PendingShares,
            // Rejected remote group shares land straight back in the
            // pending list
            ShareAction::Reject => {
                view == ShareView::PendingShares
                    && !nodes.iter().any(|node| {
                        node.attributes.provenance == Provenance::Federated
                            && node.attributes.share_type == ShareType::RemoteGroup
                    })
            }
            ShareAction::Restore => view == ShareView::DeletedShares,
        }
    }

    /// Run the action for one node
    pub async fn exec<C>(&self, client: &C, node: &Node) -> bool
    where
        C: ShareActionClient + ?Sized,
    {
        let share_id = node.attributes.share_id.as_str();
        let remote = node.attributes.remote.is_some();

        let result = match self {
            ShareAction::Accept => client.accept_share(share_id, remote).await,
            ShareAction::Reject => {
                let accepted = node.attributes.accepted != Some(false);
                client.reject_share(share_id, remote, accepted).await
            }
            ShareAction::Restore => client.restore_share(share_id).await,
        };

        match result {
            Ok(()) => {
                tracing::info!(action = self.id(), share_id, "share action done");
                true
            }
            Err(error) => {
                tracing::error!(action = self.id(), share_id, error = %error, "share action failed");
                false
            }
        }
    }

    /// Run the action for every node concurrently
    ///
    /// Results line up with `nodes`.
    pub async fn exec_batch<C>(&self, client: &C, nodes: &[Node]) -> Vec<bool>
    where
        C: ShareActionClient + ?Sized,
    {
        join_all(nodes.iter().map(|node| self.exec(client, node))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ShareEndpoint;
    use crate::logic::normalize::normalize_record;
    use crate::model::node::Context;
    use serde_json::json;

    fn ctx() -> Context {
        Context::new("https://cloud.example", "alice")
    }

    fn pending_local() -> Node {
        let record = json!({ "id": "1", "share_type": 0, "path": "/a" });
        normalize_record(&record, ShareEndpoint::Pending, &ctx()).unwrap()
    }

    fn pending_remote(share_type: i32) -> Node {
        let record = json!({
            "id": "2",
            "remote_id": "20",
            "remote": "https://other.example",
            "owner": "bob",
            "name": "b",
            "share_type": share_type,
            "accepted": 0,
        });
        normalize_record(&record, ShareEndpoint::RemotePending, &ctx()).unwrap()
    }

    #[test]
    fn test_nothing_enabled_without_nodes() {
        assert!(!ShareAction::Accept.enabled(&[], ShareView::PendingShares));
        assert!(!ShareAction::Restore.enabled(&[], ShareView::DeletedShares));
    }

    #[test]
    fn test_accept_only_in_pending_view() {
        let nodes = vec![pending_local()];
        assert!(ShareAction::Accept.enabled(&nodes, ShareView::PendingShares));
        assert!(!ShareAction::Accept.enabled(&nodes, ShareView::Overview));
    }

    #[test]
    fn test_reject_disabled_for_remote_group() {
        let nodes = vec![pending_local(), pending_remote(6)];
        assert!(ShareAction::Reject.enabled(&nodes, ShareView::PendingShares));

        let nodes = vec![pending_local(), pending_remote(9)];
        assert!(!ShareAction::Reject.enabled(&nodes, ShareView::PendingShares));
    }

    #[test]
    fn test_restore_only_in_deleted_view() {
        let nodes = vec![pending_local()];
        assert!(ShareAction::Restore.enabled(&nodes, ShareView::DeletedShares));
        assert!(!ShareAction::Restore.enabled(&nodes, ShareView::PendingShares));
    }
}

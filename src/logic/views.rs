//! Share views
//!
//! Each view is a fixed aggregation query plus an optional filter applied
//! to the merged nodes.

use serde::Serialize;

use crate::logic::attributes::is_file_request;
use crate::model::node::Node;
use crate::model::share::ShareType;

/// Which query groups to include and which share types to keep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharesQuery {
    pub received: bool,
    pub sent: bool,
    pub pending: bool,
    pub deleted: bool,
    /// Empty means no filtering
    pub share_types: Vec<ShareType>,
}

impl SharesQuery {
    pub fn received() -> Self {
        Self {
            received: true,
            ..Self::default()
        }
    }

    pub fn sent() -> Self {
        Self {
            sent: true,
            ..Self::default()
        }
    }

    pub fn pending() -> Self {
        Self {
            pending: true,
            ..Self::default()
        }
    }

    pub fn deleted() -> Self {
        Self {
            deleted: true,
            ..Self::default()
        }
    }

    pub fn with_share_types(mut self, share_types: Vec<ShareType>) -> Self {
        self.share_types = share_types;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ShareView {
    Overview,
    SharedWithYou,
    SharedWithOthers,
    SharedByLink,
    FileRequests,
    DeletedShares,
    PendingShares,
}

impl ShareView {
    pub const ALL: [ShareView; 7] = [
        ShareView::Overview,
        ShareView::SharedWithYou,
        ShareView::SharedWithOthers,
        ShareView::SharedByLink,
        ShareView::FileRequests,
        ShareView::DeletedShares,
        ShareView::PendingShares,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            ShareView::Overview => "shareoverview",
            ShareView::SharedWithYou => "sharingin",
            ShareView::SharedWithOthers => "sharingout",
            ShareView::SharedByLink => "sharinglinks",
            ShareView::FileRequests => "filerequest",
            ShareView::DeletedShares => "deletedshares",
            ShareView::PendingShares => "pendingshares",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShareView::Overview => "Shares",
            ShareView::SharedWithYou => "Shared with you",
            ShareView::SharedWithOthers => "Shared with others",
            ShareView::SharedByLink => "Shared by link",
            ShareView::FileRequests => "File requests",
            ShareView::DeletedShares => "Deleted shares",
            ShareView::PendingShares => "Pending shares",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|view| view.id() == id)
    }

    pub fn query(&self) -> SharesQuery {
        match self {
            ShareView::Overview => SharesQuery {
                received: true,
                sent: true,
                ..SharesQuery::default()
            },
            ShareView::SharedWithYou => SharesQuery::received(),
            ShareView::SharedWithOthers => SharesQuery::sent(),
            ShareView::SharedByLink => SharesQuery::sent().with_share_types(vec![ShareType::Link]),
            ShareView::FileRequests => {
                SharesQuery::sent().with_share_types(vec![ShareType::Link, ShareType::Email])
            }
            ShareView::DeletedShares => SharesQuery::deleted(),
            ShareView::PendingShares => SharesQuery::pending(),
        }
    }

    /// Whether a merged node belongs in this view
    pub fn accepts(&self, node: &Node) -> bool {
        match self {
            ShareView::FileRequests => is_file_request(&node.attributes.share_attributes),
            _ => true,
        }
    }
}

impl std::str::FromStr for ShareView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s).ok_or_else(|| {
            let known: Vec<&str> = Self::ALL.iter().map(|v| v.id()).collect();
            format!("unknown view '{}' (expected one of: {})", s, known.join(", "))
        })
    }
}

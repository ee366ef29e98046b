//! Sorting comparison logic
//!
//! Pure functions for ordering a share listing.

use crate::model::node::Node;
use crate::SortMode;
use std::cmp::Ordering;

/// Compare two nodes according to the given sort mode
///
/// # Sort Rules
/// - `ServerOrder` leaves the listing exactly as aggregated
/// - Otherwise folders come before files
/// - Within same kind, apply sort mode with alphabetical tie-breaking
pub fn compare_nodes(a: &Node, b: &Node, sort_mode: SortMode, reverse: bool) -> Ordering {
    if sort_mode == SortMode::ServerOrder {
        return Ordering::Equal;
    }

    if a.is_folder() != b.is_folder() {
        return if a.is_folder() {
            Ordering::Less
        } else {
            Ordering::Greater
        };
    }

    let by_name = || a.basename().to_lowercase().cmp(&b.basename().to_lowercase());

    let result = match sort_mode {
        SortMode::ServerOrder => Ordering::Equal,
        SortMode::Alphabetical => by_name(),
        // Newest first
        SortMode::LastModified => b.mtime.cmp(&a.mtime).then_with(by_name),
        // Largest first
        SortMode::FileSize => b.size.cmp(&a.size).then_with(by_name),
    };

    if reverse {
        result.reverse()
    } else {
        result
    }
}

/// Sort a listing in place (stable)
pub fn sort_nodes(nodes: &mut [Node], sort_mode: SortMode, reverse: bool) {
    nodes.sort_by(|a, b| compare_nodes(a, b, sort_mode, reverse));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ShareEndpoint;
    use crate::logic::normalize::normalize_record;
    use crate::model::node::Context;
    use serde_json::json;

    fn make(path: &str, folder: bool, size: u64, mtime: i64) -> Node {
        let ctx = Context::new("https://cloud.example", "alice");
        let record = json!({
            "id": path,
            "share_type": 0,
            "path": path,
            "item_type": if folder { "folder" } else { "file" },
            "item_size": size,
            "item_mtime": mtime,
        });
        normalize_record(&record, ShareEndpoint::SharedWithOthers, &ctx).unwrap()
    }

    fn names(nodes: &[Node]) -> Vec<&str> {
        nodes.iter().map(|n| n.basename()).collect()
    }

    #[test]
    fn test_server_order_untouched() {
        let mut nodes = vec![make("/b", false, 1, 1), make("/a", true, 1, 1)];
        sort_nodes(&mut nodes, SortMode::ServerOrder, false);
        assert_eq!(names(&nodes), vec!["b", "a"]);
    }

    #[test]
    fn test_folders_first_alphabetical() {
        let mut nodes = vec![
            make("/b.txt", false, 1, 1),
            make("/Zeta", true, 0, 1),
            make("/A.txt", false, 1, 1),
            make("/alpha", true, 0, 1),
        ];
        sort_nodes(&mut nodes, SortMode::Alphabetical, false);
        assert_eq!(names(&nodes), vec!["alpha", "Zeta", "A.txt", "b.txt"]);
    }

    #[test]
    fn test_last_modified_newest_first() {
        let mut nodes = vec![
            make("/old", false, 1, 100),
            make("/new", false, 1, 300),
            make("/mid", false, 1, 200),
        ];
        sort_nodes(&mut nodes, SortMode::LastModified, false);
        assert_eq!(names(&nodes), vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_size_largest_first_reversed() {
        let mut nodes = vec![
            make("/small", false, 1, 1),
            make("/large", false, 100, 1),
        ];
        sort_nodes(&mut nodes, SortMode::FileSize, true);
        assert_eq!(names(&nodes), vec!["small", "large"]);
    }

    #[test]
    fn test_reverse_keeps_folders_first() {
        let mut nodes = vec![make("/a.txt", false, 1, 1), make("/dir", true, 0, 1)];
        sort_nodes(&mut nodes, SortMode::Alphabetical, true);
        assert_eq!(names(&nodes), vec!["dir", "a.txt"]);
    }
}

//! Formatting and display logic
//!
//! Pure functions for formatting listing rows for human-readable display.

use chrono::{DateTime, Utc};

use crate::model::node::Node;
use crate::model::share::{Permission, ShareType};
use crate::utils::format_bytes;
use crate::{DisplayMode, SortMode};

/// Format aggregated share types, e.g. "group+link"
pub fn format_share_types(share_types: &[ShareType]) -> String {
    let mut seen: Vec<&str> = Vec::new();
    for share_type in share_types {
        let name = share_type.as_str();
        if !seen.contains(&name) {
            seen.push(name);
        }
    }
    seen.join("+")
}

/// Format a permission bitmask as "RUCDS" letters, "-" for missing bits
///
/// # Examples
/// ```
/// use sharelist::logic::formatting::format_permissions;
/// use sharelist::model::Permission;
///
/// assert_eq!(format_permissions(Permission(31)), "RUCDS");
/// assert_eq!(format_permissions(Permission(17)), "R---S");
/// assert_eq!(format_permissions(Permission::NONE), "-----");
/// ```
pub fn format_permissions(permissions: Permission) -> String {
    [
        (permissions.can_read(), 'R'),
        (permissions.can_update(), 'U'),
        (permissions.can_create(), 'C'),
        (permissions.can_delete(), 'D'),
        (permissions.can_share(), 'S'),
    ]
    .iter()
    .map(|(set, letter)| if *set { *letter } else { '-' })
    .collect()
}

pub fn format_mtime(mtime: Option<DateTime<Utc>>) -> String {
    mtime
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Title line above a listing, e.g. "Shared by link: 3 shares (A-Z)"
pub fn format_listing_header(view_name: &str, count: usize, sort_mode: SortMode) -> String {
    let noun = if count == 1 { "share" } else { "shares" };
    format!("{}: {} {} ({})", view_name, count, noun, sort_mode.as_str())
}

/// One line of listing output
pub fn format_node_row(node: &Node, display_mode: DisplayMode) -> String {
    let marker = if node.is_folder() { "/" } else { "" };
    let favorite = if node.attributes.favorite { "*" } else { " " };
    let owner = node
        .attributes
        .owner_display_name
        .as_deref()
        .or(node.owner.as_deref())
        .unwrap_or("-");

    let mut row = format!(
        "{} {:<40} {:<16} {:<5} {}",
        favorite,
        format!("{}{}", node.path().trim_start_matches('/'), marker),
        format_share_types(&node.attributes.share_types),
        format_permissions(node.permissions),
        owner
    );

    match display_mode {
        DisplayMode::Off => {}
        DisplayMode::TimestampOnly => {
            row.push_str(&format!("  {}", format_mtime(node.mtime)));
        }
        DisplayMode::TimestampAndSize => {
            let size = node
                .size
                .map(format_bytes)
                .unwrap_or_else(|| "-".to_string());
            row.push_str(&format!("  {:>10}  {}", size, format_mtime(node.mtime)));
        }
    }

    row
}

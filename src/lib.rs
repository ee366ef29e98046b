//! Share listing library
//!
//! Aggregates the shares of a Nextcloud-style server into one merged listing.

pub mod api;
pub mod config;
pub mod logging;
pub mod logic;
pub mod model;
pub mod services;
pub mod utils;

/// File info display mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DisplayMode {
    #[default]
    Off, // No timestamp or size
    TimestampOnly,    // Show timestamp only
    TimestampAndSize, // Show both size and timestamp
}

/// Sort mode for share listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    #[default]
    ServerOrder, // Order the server returned, after merging
    Alphabetical, // Sort alphabetically
    LastModified, // Sort by last modified time (if available)
    FileSize,     // Sort by file size
}

impl SortMode {
    pub fn as_str(&self) -> &str {
        match self {
            SortMode::ServerOrder => "Server",
            SortMode::Alphabetical => "A-Z",
            SortMode::LastModified => "Timestamp",
            SortMode::FileSize => "Size",
        }
    }
}

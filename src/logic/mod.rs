//! Business Logic
//!
//! This module contains pure business logic functions that can be unit tested:
//! - accounts: Owner/sharee account filtering
//! - attributes: Share attribute parsing and file-request detection
//! - errors: Error classification for display
//! - formatting: Listing row formatting
//! - merge: Share-type filtering and merge-by-source
//! - normalize: Raw record to node conversion
//! - sorting: Listing order
//! - views: Named share views and their queries

pub mod accounts;
pub mod attributes;
pub mod errors;
pub mod formatting;
pub mod merge;
pub mod normalize;
pub mod sorting;
pub mod views;

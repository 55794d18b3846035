//! Presentation layer: recyclable rows and the text listing.

/// Plain-text feed listing.
pub mod listing;
/// Reusable review rows.
pub mod rows;

pub use listing::{ListingError, ListingOptions, ListingSummary, ROW_HEIGHT, run_listing};
pub use rows::{ReviewRow, RowImages};

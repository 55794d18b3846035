//! Plain-text review listing.
//!
//! Scrolls through the feed one screen of rows at a time, recycling a fixed
//! pool of [`ReviewRow`]s and requesting the next page when the scroll
//! position comes within the preload distance of the end.

use std::io::{self, Write};
use std::sync::Arc;

use futures_util::future::join_all;
use thiserror::Error;
use tracing::{debug, warn};

use crate::application::dto::FeedItem;
use crate::application::services::{PageLoad, ReviewFeed, should_load_next_page};
use crate::domain::errors::FeedError;
use crate::domain::ports::ImageLoaderPort;

use super::rows::{ReviewRow, RowImages};

/// Height of one row, in listing units.
pub const ROW_HEIGHT: f64 = 1.0;

/// Listing errors.
#[derive(Debug, Error)]
pub enum ListingError {
    /// The first page could not be loaded.
    #[error(transparent)]
    Feed(#[from] FeedError),

    /// Output could not be written.
    #[error("failed to write listing: {0}")]
    Output(#[from] io::Error),
}

/// Listing options.
#[derive(Debug, Clone)]
pub struct ListingOptions {
    /// Rows per screen, and size of the row pool.
    pub visible_rows: usize,
    /// Stop after this many pages.
    pub max_pages: Option<usize>,
    /// Look-ahead, in screens, for loading the next page.
    pub preload_screens: f64,
}

/// What a listing run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListingSummary {
    /// Pages loaded.
    pub pages: usize,
    /// Rows written, footer included.
    pub rows: usize,
}

/// Writes the feed to `out`, loading pages as the listing scrolls.
///
/// # Errors
/// Returns error if the first page fails or `out` cannot be written. A
/// failure on a later page ends the listing early.
#[allow(clippy::cast_precision_loss)]
pub async fn run_listing<W: Write>(
    feed: &mut ReviewFeed,
    loader: Arc<dyn ImageLoaderPort>,
    options: &ListingOptions,
    out: &mut W,
) -> Result<ListingSummary, ListingError> {
    let screen = options.visible_rows.max(1);
    let mut rows: Vec<ReviewRow> = (0..screen).map(|_| ReviewRow::new()).collect();
    let mut summary = ListingSummary::default();

    if let PageLoad::Loaded { .. } = feed.load_next_page().await? {
        summary.pages += 1;
    }

    let mut position = 0;
    loop {
        let end = (position + screen).min(feed.items().len());
        if position >= end {
            break;
        }

        let window = &feed.items()[position..end];
        let mut loads = Vec::with_capacity(window.len());
        for (row, item) in rows.iter_mut().zip(window) {
            row.prepare_for_reuse();
            if let FeedItem::Review(review) = item {
                loads.push(row.bind(review, loader.clone()));
            }
        }
        join_all(loads).await;

        for (row, item) in rows.iter().zip(window) {
            write_item(out, item, &row.images())?;
            summary.rows += 1;
        }
        position = end;

        let page_limit_reached = options
            .max_pages
            .is_some_and(|max| summary.pages >= max);
        if !feed.has_more() || page_limit_reached {
            continue;
        }

        let viewport = screen as f64 * ROW_HEIGHT;
        let content = feed.items().len() as f64 * ROW_HEIGHT;
        let target = position as f64 * ROW_HEIGHT;
        if !should_load_next_page(viewport, content, target, options.preload_screens) {
            continue;
        }

        match feed.load_next_page().await {
            Ok(PageLoad::Loaded { added, .. }) => {
                summary.pages += 1;
                debug!(added, pages = summary.pages, "Listing loaded another page");
            }
            Ok(PageLoad::Skipped) => {}
            Err(e) => {
                warn!(
                    error = %e,
                    recoverable = e.is_recoverable(),
                    "Stopping listing after page failure"
                );
                writeln!(out, "(could not load more reviews: {e})")?;
                break;
            }
        }
    }

    out.flush()?;
    Ok(summary)
}

fn write_item<W: Write>(out: &mut W, item: &FeedItem, images: &RowImages) -> io::Result<()> {
    let review = match item {
        FeedItem::Review(review) => review,
        FeedItem::TotalCount(total) => return writeln!(out, "{}", total.text),
    };

    let avatar = images.avatar.as_ref().map_or_else(
        || "[ ]".to_string(),
        |image| format!("[{}x{}]", image.width(), image.height()),
    );
    writeln!(out, "{avatar} {}  {}", review.user_name, review.rating)?;
    for line in review.visible_lines() {
        writeln!(out, "    {line}")?;
    }
    if review.can_expand() {
        writeln!(out, "    Show more...")?;
    }
    if !review.photos.is_empty() {
        let shown = images.photos.iter().filter(|photo| photo.is_some()).count();
        writeln!(out, "    photos: {shown}/{}", review.photos.len())?;
    }
    writeln!(out, "    {}", review.created)
}

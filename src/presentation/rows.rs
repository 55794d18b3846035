//! Reusable review rows.
//!
//! A row is bound to one feed item at a time. Binding starts image loads
//! under a fresh cancellation token; rebinding or reuse cancels it, so a
//! recycled row never waits on images it no longer shows.

use std::sync::Arc;

use futures_util::future::join_all;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::trace;
use uuid::Uuid;

use crate::application::dto::ReviewItem;
use crate::domain::entities::{DecodedImage, ImageKey};
use crate::domain::ports::ImageLoaderPort;

/// Images currently shown by a row. `None` means placeholder.
#[derive(Debug, Clone, Default)]
pub struct RowImages {
    /// Avatar.
    pub avatar: Option<Arc<DecodedImage>>,
    /// Photo strip, in item order.
    pub photos: Vec<Option<Arc<DecodedImage>>>,
}

#[derive(Debug, Clone, Copy)]
enum Target {
    Avatar,
    Photo(usize),
}

#[derive(Debug, Default)]
struct RowSlot {
    item_id: Option<Uuid>,
    images: RowImages,
}

/// A recyclable review row.
#[derive(Debug)]
pub struct ReviewRow {
    slot: Arc<Mutex<RowSlot>>,
    token: CancellationToken,
}

impl ReviewRow {
    /// Creates an unbound row.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Mutex::new(RowSlot::default())),
            token: CancellationToken::new(),
        }
    }

    /// Binds the row to `item` and starts loading its images.
    ///
    /// Images already resident are shown at once. The returned task finishes
    /// when every load has completed or been cancelled.
    pub fn bind(&mut self, item: &ReviewItem, loader: Arc<dyn ImageLoaderPort>) -> JoinHandle<()> {
        self.token.cancel();
        self.token = CancellationToken::new();

        {
            let mut slot = self.slot.lock();
            slot.item_id = Some(item.id);
            slot.images = RowImages {
                avatar: item.avatar.as_ref().and_then(|key| loader.cached(key)),
                photos: item.photos.iter().map(|key| loader.cached(key)).collect(),
            };
        }

        let mut pending: Vec<(Target, ImageKey)> = Vec::new();
        if let Some(avatar) = &item.avatar {
            pending.push((Target::Avatar, avatar.clone()));
        }
        pending.extend(
            item.photos
                .iter()
                .enumerate()
                .map(|(index, key)| (Target::Photo(index), key.clone())),
        );

        let slot = self.slot.clone();
        let token = self.token.clone();
        let id = item.id;

        tokio::spawn(async move {
            let loads = pending.iter().map(|(target, key)| {
                let (slot, loader, token) = (&slot, &loader, &token);
                async move {
                    if let Some(image) = loader.fetch_cancellable(key, token).await {
                        apply(slot, id, *target, image);
                    }
                }
            });
            join_all(loads).await;
        })
    }

    /// Cancels outstanding loads and resets every image to its placeholder.
    pub fn prepare_for_reuse(&mut self) {
        self.token.cancel();
        let mut slot = self.slot.lock();
        slot.item_id = None;
        slot.images = RowImages::default();
    }

    /// Id of the bound item.
    #[must_use]
    pub fn bound_item(&self) -> Option<Uuid> {
        self.slot.lock().item_id
    }

    /// Snapshot of the row's images.
    #[must_use]
    pub fn images(&self) -> RowImages {
        self.slot.lock().images.clone()
    }
}

impl Default for ReviewRow {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ReviewRow {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

fn apply(slot: &Mutex<RowSlot>, id: Uuid, target: Target, image: Arc<DecodedImage>) {
    let mut slot = slot.lock();
    if slot.item_id != Some(id) {
        trace!(%id, "Dropping image for a row that was rebound");
        return;
    }
    match target {
        Target::Avatar => slot.images.avatar = Some(image),
        Target::Photo(index) => {
            if let Some(photo) = slot.images.photos.get_mut(index) {
                *photo = Some(image);
            }
        }
    }
}

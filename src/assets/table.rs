use std::{collections::HashMap, sync::Arc};

use crate::{assets::raster::Raster, foundation::core::ImageId, foundation::error::CutResult};

/// Terminal outcome of loading an image.
#[derive(Clone, Debug)]
pub enum DecodeOutcome {
    /// Decoded pixels.
    Loaded(Arc<Raster>),
    /// Decode failed; the reason is kept for diagnostics only.
    Failed(String),
    /// Pixels were released after the owning image was removed.
    Released,
}

/// What a renderer sees when it looks an image up.
#[derive(Clone, Copy, Debug)]
pub enum DecodeStatus<'a> {
    /// No outcome recorded yet.
    Pending,
    /// Ready to draw.
    Ready(&'a Raster),
    /// Permanently broken.
    Failed,
    /// Released; nothing to draw.
    Released,
}

/// Append-only table of decode outcomes keyed by image id.
///
/// An id never changes outcome once recorded, except `Loaded -> Released`, so a broken source is
/// never retried and a released id is never reloaded.
#[derive(Clone, Debug, Default)]
pub struct DecodeTable {
    outcomes: HashMap<ImageId, DecodeOutcome>,
}

impl DecodeTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Status for `id`; a missing entry reads as pending.
    pub fn status(&self, id: ImageId) -> DecodeStatus<'_> {
        match self.outcomes.get(&id) {
            None => DecodeStatus::Pending,
            Some(DecodeOutcome::Loaded(r)) => DecodeStatus::Ready(r.as_ref()),
            Some(DecodeOutcome::Failed(_)) => DecodeStatus::Failed,
            Some(DecodeOutcome::Released) => DecodeStatus::Released,
        }
    }

    /// Whether `id` already has a recorded outcome.
    pub fn has_outcome(&self, id: ImageId) -> bool {
        self.outcomes.contains_key(&id)
    }

    /// Record an outcome. Returns `false` (and changes nothing) if `id` already has one.
    pub fn record(&mut self, id: ImageId, outcome: DecodeOutcome) -> bool {
        if self.has_outcome(id) {
            return false;
        }
        self.outcomes.insert(id, outcome);
        true
    }

    /// Run `loader` for `id` unless an outcome exists, recording success or failure.
    pub fn load_with<F>(&mut self, id: ImageId, loader: F) -> DecodeStatus<'_>
    where
        F: FnOnce() -> CutResult<Raster>,
    {
        if !self.outcomes.contains_key(&id) {
            let outcome = match loader() {
                Ok(raster) => DecodeOutcome::Loaded(Arc::new(raster)),
                Err(err) => {
                    tracing::warn!(image = %id, error = %err, "image decode failed");
                    DecodeOutcome::Failed(err.to_string())
                }
            };
            self.outcomes.insert(id, outcome);
        }
        self.status(id)
    }

    /// Drop decoded pixels for `id`, leaving a tombstone.
    pub fn release(&mut self, id: ImageId) {
        if let Some(outcome) = self.outcomes.get_mut(&id) {
            if matches!(outcome, DecodeOutcome::Loaded(_)) {
                tracing::debug!(image = %id, "released decoded pixels");
                *outcome = DecodeOutcome::Released;
            }
        } else {
            self.outcomes.insert(id, DecodeOutcome::Released);
        }
    }

    /// Number of ids currently holding decoded pixels.
    pub fn loaded_count(&self) -> usize {
        self.outcomes
            .values()
            .filter(|o| matches!(o, DecodeOutcome::Loaded(_)))
            .count()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/table.rs"]
mod tests;

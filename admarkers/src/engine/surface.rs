//! Store-plus-renderer plumbing shared by both engines.

use crate::marker::{MarkerKey, MarkerStore, TimeExtractor};
use crate::render::{MarkerPosition, MarkerRenderer};

/// Couples the marker store with the rendering collaborator so every store
/// mutation is mirrored by the matching visual-element side effect.
pub(crate) struct MarkerSurface<M> {
    pub(crate) store: MarkerStore<M>,
    renderer: Box<dyn MarkerRenderer<M>>,
}

impl<M: 'static> MarkerSurface<M> {
    pub(crate) fn new(extract: TimeExtractor<M>, renderer: Box<dyn MarkerRenderer<M>>) -> Self {
        Self {
            store: MarkerStore::from_extractor(extract),
            renderer,
        }
    }

    /// Insert payloads and create one visual element per marker, positioned
    /// as a percentage of `duration`.
    pub(crate) fn add(&mut self, payloads: Vec<M>, duration: f64) -> Vec<MarkerKey> {
        let inserted = self.store.add(payloads);
        for &key in &inserted {
            if let Some(marker) = self.store.get_by_key(key) {
                let position = MarkerPosition::new(self.store.time_of(marker), duration);
                self.renderer.create(marker, position);
            }
        }
        inserted
    }

    /// Remove by current position and drop the matching visual elements.
    pub(crate) fn remove(&mut self, indices: &[usize]) -> Vec<MarkerKey> {
        let removed = self.store.remove(indices);
        for &key in &removed {
            self.renderer.remove(key);
        }
        removed
    }

    /// Remove everything, visual elements included.
    pub(crate) fn remove_all(&mut self) -> Vec<MarkerKey> {
        let removed = self.store.remove_all();
        for &key in &removed {
            self.renderer.remove(key);
        }
        removed
    }
}

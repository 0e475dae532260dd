//! Rendering-collaborator boundary.
//!
//! Drawing markers is not this crate's concern. The engines tell a
//! [`MarkerRenderer`] when a marker needs a visual element and where on the
//! seek bar it belongs; what the element looks like (including any visual
//! subtype selected from payload fields) is entirely up to the
//! collaborator.

use crate::marker::{Marker, MarkerKey};

/// Horizontal placement of a marker's visual element on the seek bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerPosition {
    /// Offset from the left edge as a percentage of the full bar width.
    pub percent: f64,
}

impl MarkerPosition {
    /// Position for a marker at `time` on a timeline of `duration`.
    pub fn new(time: f64, duration: f64) -> Self {
        let percent = if duration > 0.0 {
            time / duration * 100.0
        } else {
            0.0
        };
        Self { percent }
    }
}

/// Creates and removes visual elements for markers.
///
/// Implementations receive the full marker (payload included) on creation
/// and are expected to correlate elements with markers by key. Callbacks
/// are invoked synchronously from engine mutations and must return
/// promptly.
pub trait MarkerRenderer<M>: Send {
    /// Create a visual element for a newly added marker.
    fn create(&mut self, marker: &Marker<M>, position: MarkerPosition);

    /// Remove the visual element for a removed marker.
    fn remove(&mut self, key: MarkerKey);
}

/// Renderer that draws nothing, for headless hosts and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl<M> MarkerRenderer<M> for NullRenderer {
    fn create(&mut self, _marker: &Marker<M>, _position: MarkerPosition) {}

    fn remove(&mut self, _key: MarkerKey) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_is_percent_of_duration() {
        let position = MarkerPosition::new(30.0, 120.0);
        assert_eq!(position.percent, 25.0);
    }

    #[test]
    fn test_position_with_zero_duration_clamps_to_origin() {
        let position = MarkerPosition::new(30.0, 0.0);
        assert_eq!(position.percent, 0.0);
    }
}

//! Public engine surface.
//!
//! An engine is an explicit handle returned by its constructor and owned by
//! whoever registered with the host player; there is no hidden per-player
//! singleton. Two engines share one surface:
//!
//! - [`MarkerEngine`] fires a "marker reached" callback each time the clock
//!   crosses into a new marker interval.
//! - [`AdEngine`] runs the two-phase prepare → fire ad-insertion protocol
//!   and pauses tracking while a fired ad occupies playback.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized ──metadata ready──► Active ──destroy()──► Destroyed
//! ```
//!
//! Engines start uninitialized: marker screen positions depend on the media
//! duration, so nothing happens until the host reports metadata. All public
//! methods are no-ops outside the Active state, and a second metadata
//! notification while Active is ignored, since re-initializing mid-playback
//! would desynchronize scheduling state from what the host has actually
//! played. `destroy()` detaches the engine from its clock; no callback can
//! fire afterwards.

mod ads;
mod config;
mod markers;
mod surface;

#[cfg(test)]
pub(crate) mod test_support;

pub use ads::AdEngine;
pub use config::{AdEngineConfig, MarkerCallback, MarkerEngineConfig, DEFAULT_ANNOUNCE_TIME};
pub use markers::MarkerEngine;

/// Engine lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Constructed, waiting for the host's metadata-ready notification.
    Uninitialized,
    /// Tracking clock samples.
    Active,
    /// Detached; all notifications and mutations are no-ops.
    Destroyed,
}

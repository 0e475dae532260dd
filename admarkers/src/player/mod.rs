//! Host-player boundary.
//!
//! The engines never talk to a concrete media framework. They read the
//! playback position and media duration through [`PlayerClock`], and the
//! host forwards its "time advanced" and "metadata ready" notifications as
//! plain method calls on the engine. Delivery is serial and synchronous:
//! one notification is handled to completion before the next arrives, with
//! no assumption about cadence; samples may be sparse, repeated, or move
//! backward after a seek.

/// Current time reported by hosts before playback has started.
///
/// Many players report a position of exactly `0.0` between loading and the
/// first real playback sample. The ad scheduler skips samples at this value
/// when deciding whether a cue is due, so a pre-start sample is never
/// mistaken for a genuine seek to the start of the timeline.
pub const NO_TIME: f64 = 0.0;

/// Read access to the host player's clock.
///
/// `current_time` and `duration` use the same unit (conventionally
/// seconds). `duration` is only meaningful once the host has reported its
/// metadata-ready notification; the engines do not read the clock before
/// then.
pub trait PlayerClock: Send {
    /// The current playback position.
    fn current_time(&self) -> f64;

    /// The total media duration.
    fn duration(&self) -> f64;
}

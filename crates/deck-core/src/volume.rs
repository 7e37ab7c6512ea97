//! Volume and fade bounds
//!
//! All volume multipliers (per-sound, per-group, global) live in [0, 1].
//! Fade durations live in [100, 5000] milliseconds.

/// Minimum fade duration (ms).
pub const MIN_FADE_MS: u32 = 100;

/// Maximum fade duration (ms).
pub const MAX_FADE_MS: u32 = 5000;

/// Default fade duration for new groups (ms).
pub const DEFAULT_FADE_MS: u32 = 1000;

/// Clamp a volume multiplier to the unit interval.
///
/// NaN clamps to 0 so a bad slider value can never poison the mix.
#[inline]
pub fn clamp_volume(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// Clamp a fade duration to the supported range.
#[inline]
pub fn clamp_fade_ms(ms: u32) -> u32 {
    ms.clamp(MIN_FADE_MS, MAX_FADE_MS)
}

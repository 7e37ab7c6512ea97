//! Volume resolver
//!
//! Effective playback volume is the product of the three multipliers:
//! sound x group x global. Pure and recomputed on every change; sliders fire
//! continuously during a drag, so a cached value is a correctness bug, not
//! an optimization target.

use crate::model::{Sound, SoundGroup};
use deck_core::clamp_volume;

/// Compose the three volume levels into the effective playback volume.
#[inline]
pub fn effective_volume(sound: f32, group: f32, global: f32) -> f32 {
    clamp_volume(sound) * clamp_volume(group) * clamp_volume(global)
}

/// [`effective_volume`] for a sound in its owning group.
#[inline]
pub fn effective_sound_volume(sound: &Sound, group: &SoundGroup, global: f32) -> f32 {
    effective_volume(sound.volume, group.group_volume, global)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_law() {
        assert_eq!(effective_volume(1.0, 1.0, 1.0), 1.0);
        assert_eq!(effective_volume(0.0, 1.0, 1.0), 0.0);
        assert!((effective_volume(0.5, 0.5, 0.5) - 0.125).abs() < 1e-6);
    }

    #[test]
    fn test_scenario_from_board() {
        // Group with A (.5) and B (.8); group volume .5, global 1.
        assert!((effective_volume(0.5, 0.5, 1.0) - 0.25).abs() < 1e-6);
        assert!((effective_volume(0.8, 0.5, 1.0) - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_monotonic_in_each_argument() {
        let steps: Vec<f32> = (0..=10).map(|i| i as f32 / 10.0).collect();
        for &a in &steps {
            for &b in &steps {
                let mut prev = 0.0;
                for &x in &steps {
                    let v = effective_volume(x, a, b);
                    assert!(v >= prev - 1e-6);
                    assert_eq!(v, effective_volume(a, x, b));
                    assert_eq!(v, effective_volume(a, b, x));
                    prev = v;
                }
            }
        }
    }

    #[test]
    fn test_out_of_range_inputs_are_clamped() {
        assert_eq!(effective_volume(2.0, 1.0, 1.0), 1.0);
        assert_eq!(effective_volume(-1.0, 1.0, 1.0), 0.0);
        assert_eq!(effective_volume(f32::NAN, 1.0, 1.0), 0.0);
    }

    #[test]
    fn test_sound_in_group() {
        let mut group = SoundGroup::new("Group 1", "Music");
        group.set_group_volume(0.5);
        let sound = Sound::new("A", "blob:a", 0.5);
        assert!((effective_sound_volume(&sound, &group, 1.0) - 0.25).abs() < 1e-6);
    }
}

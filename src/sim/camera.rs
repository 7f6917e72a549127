//! Dead-zone camera follow

use glam::Vec2;

/// Move one camera axis toward `target` once it leaves the dead zone.
/// The camera closes the excess beyond the dead zone by at most `max_step`.
#[inline]
fn follow_axis(camera: f32, target: f32, dead_zone: f32, max_step: f32) -> f32 {
    let delta = target - camera;
    if delta > dead_zone {
        camera + (delta - dead_zone).min(max_step)
    } else if delta < -dead_zone {
        camera + (delta + dead_zone).max(-max_step)
    } else {
        camera
    }
}

/// Camera position for this frame
pub fn follow(camera: Vec2, player: Vec2, dead_zone: f32, max_step: f32) -> Vec2 {
    Vec2::new(
        follow_axis(camera.x, player.x, dead_zone, max_step),
        follow_axis(camera.y, player.y, dead_zone, max_step),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{CAMERA_DEAD_ZONE, CAMERA_MAX_STEP};
    use proptest::prelude::*;

    #[test]
    fn test_inside_dead_zone_holds_still() {
        let cam = Vec2::new(10.0, 10.0);
        let out = follow(cam, Vec2::new(15.0, 5.0), CAMERA_DEAD_ZONE, CAMERA_MAX_STEP);
        assert_eq!(out, cam);
    }

    #[test]
    fn test_small_excess_closes_exactly() {
        let out = follow(Vec2::ZERO, Vec2::new(5.2, -5.3), CAMERA_DEAD_ZONE, CAMERA_MAX_STEP);
        assert!((out.x - 0.2).abs() < 1e-5);
        assert!((out.y + 0.3).abs() < 1e-5);
    }

    #[test]
    fn test_large_excess_is_rate_limited() {
        let out = follow(Vec2::ZERO, Vec2::new(20.0, -20.0), CAMERA_DEAD_ZONE, CAMERA_MAX_STEP);
        assert_eq!(out, Vec2::new(0.5, -0.5));
    }

    proptest! {
        #[test]
        fn prop_never_moves_inside_dead_zone(cx in -100.0f32..100.0, offset in -5.0f32..=5.0) {
            let out = follow_axis(cx, cx + offset, CAMERA_DEAD_ZONE, CAMERA_MAX_STEP);
            // cx + offset - cx can round past the zone edge by an ulp
            if (cx + offset - cx).abs() <= CAMERA_DEAD_ZONE {
                prop_assert_eq!(out, cx);
            }
        }

        #[test]
        fn prop_never_overshoots(cx in -100.0f32..100.0, px in -100.0f32..100.0) {
            let out = follow_axis(cx, px, CAMERA_DEAD_ZONE, CAMERA_MAX_STEP);
            prop_assert!((out - cx).abs() <= CAMERA_MAX_STEP + 1e-4);
            prop_assert!((px - out).abs() >= CAMERA_DEAD_ZONE.min((px - cx).abs()) - 1e-3);
        }
    }
}

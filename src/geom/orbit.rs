use crate::Direction;

/// Ground-track bearing of a sun-synchronous pass at `lat_deg`, in degrees
/// (positive = counter-clockwise from grid north in the local metric plane).
///
/// Closed-form approximation `asin(cos(i) / cos(lat))`. The latitude is clamped to
/// `±inclination` and the ratio to `[-1, 1]`, so every input yields a finite angle.
/// Descending passes (`NE->SW`) take the angle as is; ascending passes flip its sign.
pub fn orbit_angle(lat_deg: f64, inclination_deg: f64, direction: Direction) -> f64 {
    let limit = inclination_deg.abs();
    let lat = if lat_deg.is_nan() { 0.0 } else { lat_deg.clamp(-limit, limit) };

    let ratio = inclination_deg.to_radians().cos() / lat.to_radians().cos();
    let ratio = if ratio.is_nan() { 0.0 } else { ratio.clamp(-1.0, 1.0) };

    let angle = ratio.asin().to_degrees();
    if direction.is_ascending() { -angle } else { angle }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::config::SSO_INCLINATION_DEG;

    #[test]
    fn equator_matches_hand_computed_value() {
        // cos(97.8°) = -0.135716..., asin of that = -7.8°
        let expected = 97.8_f64.to_radians().cos().asin().to_degrees();
        let angle = orbit_angle(0.0, SSO_INCLINATION_DEG, Direction::NeToSw);
        assert_abs_diff_eq!(angle, expected, epsilon = 1e-12);
        assert_abs_diff_eq!(angle, -7.8, epsilon = 1e-9);
    }

    #[test]
    fn directions_are_mirror_images() {
        for lat in [-82.0, -60.0, -12.5, 0.0, 33.3, 54.9783, 81.9] {
            let descending = orbit_angle(lat, SSO_INCLINATION_DEG, Direction::NeToSw);
            let ascending = orbit_angle(lat, SSO_INCLINATION_DEG, Direction::SeToNw);
            assert_eq!(descending, -ascending);
        }
    }

    #[test]
    fn latitude_beyond_inclination_is_clamped() {
        for direction in [Direction::NeToSw, Direction::SeToNw] {
            assert_eq!(orbit_angle(70.0, 50.0, direction), orbit_angle(50.0, 50.0, direction));
            assert_eq!(orbit_angle(-89.0, 50.0, direction), orbit_angle(-50.0, 50.0, direction));
        }
    }

    #[test]
    fn angle_grows_with_latitude() {
        let low = orbit_angle(10.0, SSO_INCLINATION_DEG, Direction::NeToSw).abs();
        let high = orbit_angle(60.0, SSO_INCLINATION_DEG, Direction::NeToSw).abs();
        assert!(high > low);
    }

    #[test]
    fn ratio_overshoot_near_pole_stays_finite() {
        for lat in [89.999_999, 90.0, -90.0, 97.8, 1e9, f64::NAN] {
            let angle = orbit_angle(lat, SSO_INCLINATION_DEG, Direction::NeToSw);
            assert!(angle.is_finite());
            assert!(angle.abs() <= 90.0);
        }
    }
}

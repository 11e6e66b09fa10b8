//! Conversion between map resolution and the standardized scale denominator.
//!
//! Rule scale windows are expressed as scale denominators computed with the standardized rendering pixel of
//! 0.28 mm.

use geomark_types::rect::Rect;

/// Size of the standardized rendering pixel in meters.
pub const STANDARD_PIXEL_SIZE: f64 = 0.00028;

/// Length of one degree along the equator of the WGS84 ellipsoid, in meters.
pub const METERS_PER_DEGREE: f64 = 6_378_137.0 * 2.0 * std::f64::consts::PI / 360.0;

/// Scale denominator of the map with the given resolution (map units per pixel).
///
/// Set `geographic` if the map units are degrees. Returns `None` if the resolution is not a positive finite number.
pub fn resolution_to_scale(resolution: f64, geographic: bool) -> Option<f64> {
    if !resolution.is_finite() || resolution <= 0.0 {
        return None;
    }

    let meters_per_unit = if geographic { METERS_PER_DEGREE } else { 1.0 };
    Some(resolution * meters_per_unit / STANDARD_PIXEL_SIZE)
}

/// Scale denominator of the map showing `extent` in an image `width_px` pixels wide.
pub fn scale_denominator(extent: &Rect, width_px: u32, geographic: bool) -> Option<f64> {
    if width_px == 0 {
        return None;
    }

    resolution_to_scale(extent.width() / width_px as f64, geographic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn projected_scale() {
        let extent = Rect::new(0.0, 0.0, 2800.0, 1000.0);
        let scale = scale_denominator(&extent, 1000, false).expect("valid extent");
        assert_relative_eq!(scale, 10_000.0, max_relative = 1e-9);
    }

    #[test]
    fn geographic_scale() {
        let scale = resolution_to_scale(1.0, true).expect("valid resolution");
        assert_relative_eq!(scale, 397_569_609.9, max_relative = 1e-6);
    }

    #[test]
    fn degenerate_inputs() {
        let extent = Rect::new(0.0, 0.0, 0.0, 0.0);
        assert_eq!(scale_denominator(&extent, 100, false), None);
        assert_eq!(scale_denominator(&Rect::new(0.0, 0.0, 1.0, 1.0), 0, false), None);
        assert_eq!(resolution_to_scale(f64::NAN, false), None);
    }
}

//! Point quantization.

use cgmath::Point3;

/// Millimetres per foot.
pub const FEET_TO_MM: f64 = 25.4 * 12.0;

/// Source lengths smaller than this are treated as zero.
const EPSILON: f64 = 1.0e-9;

/// Point snapped to integer millimetres.
///
/// Equality and hashing are exact, so nearly coincident source points weld
/// into one vertex without any tolerance-based comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QuantizedPoint {
    /// X.
    pub x: i64,
    /// Y.
    pub y: i64,
    /// Z.
    pub z: i64,
}

impl QuantizedPoint {
    /// Quantizes a point given in feet.
    ///
    /// With `switch_axes`, the result is converted to a Y-up viewer frame:
    /// X is negated and Y and Z are swapped.
    pub fn new(p: Point3<f64>, switch_axes: bool) -> Self {
        let x = feet_to_mm(p.x);
        let y = feet_to_mm(p.y);
        let z = feet_to_mm(p.z);
        if switch_axes {
            Self { x: -x, y: z, z: y }
        } else {
            Self { x, y, z }
        }
    }

    /// Returns the coordinates multiplied by `scale`.
    pub fn scaled(self, scale: f64) -> [f64; 3] {
        [
            scale * self.x as f64,
            scale * self.y as f64,
            scale * self.z as f64,
        ]
    }
}

/// Quantizes a point given in feet.
pub fn quantize(p: Point3<f64>, switch_axes: bool) -> QuantizedPoint {
    QuantizedPoint::new(p, switch_axes)
}

/// Converts feet to millimetres, rounding half away from zero.
fn feet_to_mm(d: f64) -> i64 {
    if d.abs() < EPSILON {
        0
    } else {
        (FEET_TO_MM * d).round() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_feet_to_millimetres() {
        let q = quantize(Point3::new(1.0, -1.0, 0.5), false);
        assert_eq!(q, QuantizedPoint { x: 305, y: -305, z: 152 });
    }

    #[test]
    fn rounds_symmetrically() {
        // 152.4 and 762.0 mm.
        let q = quantize(Point3::new(0.5, -0.5, -2.5), false);
        assert_eq!(q, QuantizedPoint { x: 152, y: -152, z: -762 });
        assert_eq!(feet_to_mm(-3.0), -feet_to_mm(3.0));
    }

    #[test]
    fn clamps_tiny_values_to_zero() {
        let q = quantize(Point3::new(1e-12, -1e-12, -0.0), false);
        assert_eq!(q, QuantizedPoint { x: 0, y: 0, z: 0 });
    }

    #[test]
    fn switches_axes() {
        let p = Point3::new(1.0, 2.0, 3.0);
        let plain = quantize(p, false);
        let switched = quantize(p, true);
        assert_eq!(switched.x, -plain.x);
        assert_eq!(switched.y, plain.z);
        assert_eq!(switched.z, plain.y);
    }

    #[test]
    fn nearby_points_collapse() {
        // Both within the same millimetre cell.
        let a = Point3::new(10.0, 20.0, 30.0);
        let b = Point3::new(10.0 + 0.2 / FEET_TO_MM, 20.0 - 0.2 / FEET_TO_MM, 30.0);
        assert_eq!(quantize(a, true), quantize(b, true));
    }

    #[test]
    fn distant_points_stay_apart() {
        let sixteenth_inch_in_feet = 1.0 / (16.0 * 12.0);
        let a = Point3::new(10.0, 20.0, 30.0);
        let b = Point3::new(10.0 + sixteenth_inch_in_feet, 20.0, 30.0);
        assert_ne!(quantize(a, false), quantize(b, false));
    }

    #[test]
    fn scales_output() {
        let q = QuantizedPoint { x: 1000, y: -2000, z: 0 };
        assert_eq!(q.scaled(0.5), [500.0, -1000.0, 0.0]);
    }
}

//! Fixed-format numeric renderers shared by every T3D block.
//!
//! The engine's importer reads these fields by name and position, so the
//! label set, separators and precision here are part of the file format.

use std::f32::consts::TAU;
use std::fmt;

use cgmath::Vector3;

use crate::math::Vec3;

/// Radians to the engine's 16-bit angular unit (one turn = 65536).
pub const EULER_TO_URU: f32 = 65536.0 / TAU;

const URU_PER_TURN: i64 = 65536;
const URU_HALF_TURN: i64 = 32768;

/// Render a float the way every coordinate in the file is rendered.
///
/// Negative zero, which the Y mirror produces for every zero Y, prints as `0.000000`.
pub struct Float(pub f32);

impl fmt::Display for Float {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0 + 0.0)
    }
}

/// Booleans use the engine's `True`/`False` spelling.
pub struct Flag(pub bool);

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.0 { "True" } else { "False" })
    }
}

/// Unlabeled `x,y,z` triple used inside polygon blocks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point(pub Vec3);

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", Float(self.0.x), Float(self.0.y), Float(self.0.z))
    }
}

/// `X=,Y=,Z=` triple; also used for `DrawScale3D` and zipline spline points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location(pub Vec3);

impl Location {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Location(Vector3::new(x, y, z))
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "X={},Y={},Z={}",
            Float(self.0.x),
            Float(self.0.y),
            Float(self.0.z)
        )
    }
}

/// Which label goes with which rotation component.
///
/// The component values are positional; only the labels differ between
/// actor families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationOrder {
    /// Brush volumes and lights.
    PitchRollYaw,
    /// Static meshes and spawn points.
    RollPitchYaw,
}

impl RotationOrder {
    fn labels(self) -> [&'static str; 3] {
        match self {
            RotationOrder::PitchRollYaw => ["Pitch", "Roll", "Yaw"],
            RotationOrder::RollPitchYaw => ["Roll", "Pitch", "Yaw"],
        }
    }
}

/// Rotation in engine angular units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    pub value: Vec3,
    pub order: RotationOrder,
}

impl Rotation {
    pub fn zero(order: RotationOrder) -> Self {
        Rotation {
            value: Vector3::new(0.0, 0.0, 0.0),
            order,
        }
    }

    /// Convert radians to engine units.
    pub fn from_radians(radians: Vec3, order: RotationOrder) -> Self {
        Rotation {
            value: radians * EULER_TO_URU,
            order,
        }
    }

    /// Rounded components wrapped into the signed 16-bit turn range.
    pub fn to_units(&self) -> [i32; 3] {
        [
            wrap_units(self.value.x),
            wrap_units(self.value.y),
            wrap_units(self.value.z),
        ]
    }
}

fn wrap_units(value: f32) -> i32 {
    let rounded = value.round_ties_even() as i64;
    ((rounded + URU_HALF_TURN).rem_euclid(URU_PER_TURN) - URU_HALF_TURN) as i32
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.order.labels();
        let [x, y, z] = self.to_units();
        write!(f, "{a}={x},{b}={y},{c}={z}")
    }
}

/// Light color mapped from unit range to byte range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color(pub Vec3);

impl Color {
    pub fn from_unit(rgb: [f32; 3]) -> Self {
        Color(Vector3::from(rgb) * 255.0)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R={:.0},G={:.0},B={:.0}", self.0.x, self.0.y, self.0.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn location_uses_six_decimals() {
        let loc = Location::new(100.0, -200.0, 0.5);
        assert_eq!(loc.to_string(), "X=100.000000,Y=-200.000000,Z=0.500000");
    }

    #[test]
    fn location_component_round_trips() {
        for v in [0.0f32, 1.0, -1.5, 123.456_78, -98765.43, 1e-7, 3.333_333_3] {
            let text = Float(v).to_string();
            let parsed: f64 = text.parse().unwrap();
            assert!((parsed - v as f64).abs() <= 1e-6 + (v as f64).abs() * 1e-7, "{v} -> {text}");
        }
    }

    #[test]
    fn negative_zero_prints_unsigned() {
        assert_eq!(Float(-0.0).to_string(), "0.000000");
        assert_eq!(Location::new(0.0, -0.0, 0.0).to_string(), "X=0.000000,Y=0.000000,Z=0.000000");
    }

    #[test]
    fn point_has_no_labels() {
        let p = Point(Vector3::new(1.0, -2.0, 3.0));
        assert_eq!(p.to_string(), "1.000000,-2.000000,3.000000");
    }

    #[test]
    fn rotation_labels_follow_order() {
        let pry = Rotation::from_radians(Vector3::new(PI / 2.0, 0.0, -PI / 2.0), RotationOrder::PitchRollYaw);
        assert_eq!(pry.to_string(), "Pitch=16384,Roll=0,Yaw=-16384");

        let rpy = Rotation {
            value: pry.value,
            order: RotationOrder::RollPitchYaw,
        };
        assert_eq!(rpy.to_string(), "Roll=16384,Pitch=0,Yaw=-16384");
    }

    #[test]
    fn half_turn_wraps_to_negative() {
        let r = Rotation::from_radians(Vector3::new(PI, -PI, 2.0 * PI), RotationOrder::PitchRollYaw);
        assert_eq!(r.to_units(), [-32768, -32768, 0]);
    }

    #[test]
    fn rotation_units_stay_in_range_over_full_turns() {
        let mut angle = -2.0 * PI;
        while angle <= 2.0 * PI {
            let r = Rotation::from_radians(Vector3::new(angle, angle * 0.5, -angle), RotationOrder::RollPitchYaw);
            for u in r.to_units() {
                assert!((-32768..=32767).contains(&u), "{angle} -> {u}");
            }
            angle += 0.01;
        }
    }

    #[test]
    fn color_maps_unit_range_to_bytes() {
        let c = Color::from_unit([1.0, 0.5, 0.0]);
        assert_eq!(c.to_string(), "R=255,G=128,B=0");
    }

    #[test]
    fn flags_use_engine_spelling() {
        assert_eq!(Flag(true).to_string(), "True");
        assert_eq!(Flag(false).to_string(), "False");
    }
}

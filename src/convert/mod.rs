//! Editor space to engine space.
//!
//! The editor is right-handed with Z up and meters; the engine is
//! left-handed with Z up and its own length unit. Positions are scaled and
//! mirrored component-wise, orientations go through a mirrored quaternion.

use std::f32::consts::FRAC_PI_2;

use cgmath::{Quaternion, Vector3};

use crate::math::{angle_between, mul_components, quaternion_to_euler_xyz, rotate_vector, Vec3};
use crate::t3d::{Location, Rotation, RotationOrder};

/// Default handedness flip: negate Y.
pub const DEFAULT_MIRROR: [f32; 3] = [1.0, -1.0, 1.0];

/// Unit scale and axis mirror applied to everything that leaves the editor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateSpace {
    pub unit_scale: f32,
    pub mirror: Vec3,
}

impl CoordinateSpace {
    pub fn new(unit_scale: f32, mirror: [f32; 3]) -> Self {
        CoordinateSpace {
            unit_scale,
            mirror: Vector3::from(mirror),
        }
    }

    /// Flip axes only.
    pub fn mirror(&self, v: Vec3) -> Vec3 {
        mul_components(v, self.mirror)
    }

    /// `p * unit_scale * mirror`.
    pub fn to_export_point(&self, p: Vec3) -> Vec3 {
        self.mirror(p * self.unit_scale)
    }

    pub fn to_export_location(&self, world_translation: Vec3) -> Location {
        Location(self.to_export_point(world_translation))
    }

    /// Euler angles (radians) of the mirrored orientation, pitch and roll
    /// axes already swapped.
    ///
    /// The quaternion reflection is fixed to the Y flip: `self.mirror` is not
    /// consulted, so a custom mirror moves geometry but not orientations.
    pub fn mirrored_euler(&self, world_rotation: Quaternion<f32>) -> Vec3 {
        let mut q = world_rotation;
        q.v.x = -q.v.x;
        q.s = -q.s;
        let e = quaternion_to_euler_xyz(q);
        Vector3::new(e.y, e.x, e.z)
    }

    /// Rotation for solid actors.
    pub fn to_export_rotation(&self, world_rotation: Quaternion<f32>, order: RotationOrder) -> Rotation {
        Rotation::from_radians(self.mirrored_euler(world_rotation), order)
    }

    /// Rotation for directional and spot lights, which aim along their local -Z.
    pub fn light_rotation(&self, world_rotation: Quaternion<f32>) -> Rotation {
        let direction = rotate_vector(world_rotation, Vector3::new(0.0, 0.0, -1.0));
        let Vector3 { x, y, z } = direction;

        let pitch = x.hypot(y).atan2(-z);
        let yaw = x.atan2(-y) + FRAC_PI_2;

        // Reflect the heading across the mirrored Y axis.
        let a = angle_between(Vector3::new(0.0, -1.0, 0.0), direction);

        Rotation::from_radians(
            Vector3::new(pitch - FRAC_PI_2, 0.0, yaw - a * 2.0),
            RotationOrder::PitchRollYaw,
        )
    }

    /// Area lights face along a different default axis than other actors.
    pub fn area_light_rotation(&self, world_rotation: Quaternion<f32>) -> Rotation {
        let e = self.mirrored_euler(world_rotation);
        Rotation::from_radians(
            Vector3::new(e.x, e.y - FRAC_PI_2, e.z),
            RotationOrder::PitchRollYaw,
        )
    }
}

impl Default for CoordinateSpace {
    fn default() -> Self {
        Self::new(100.0, DEFAULT_MIRROR)
    }
}

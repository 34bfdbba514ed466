use cgmath::{
    ElementWise, InnerSpace, Matrix3, Matrix4, Quaternion, Rad, Rotation, Vector3, Vector4,
};
use serde::{Deserialize, Serialize};

/// Editor-space vectors are single precision, like the host editor's own math types.
pub type Vec3 = Vector3<f32>;

/// Threshold below which the Euler decomposition treats the matrix as gimbal locked.
const GIMBAL_EPSILON: f32 = 16.0 * f32::EPSILON;

/// Object-to-world matrix of a scene object.
///
/// Serialized as four rows, which is how the editor prints `matrix_world`;
/// stored column-major like every other cgmath matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[[f32; 4]; 4]", into = "[[f32; 4]; 4]")]
pub struct WorldMatrix(pub Matrix4<f32>);

impl From<[[f32; 4]; 4]> for WorldMatrix {
    fn from(r: [[f32; 4]; 4]) -> Self {
        WorldMatrix(Matrix4::new(
            r[0][0], r[1][0], r[2][0], r[3][0],
            r[0][1], r[1][1], r[2][1], r[3][1],
            r[0][2], r[1][2], r[2][2], r[3][2],
            r[0][3], r[1][3], r[2][3], r[3][3],
        ))
    }
}

impl From<WorldMatrix> for [[f32; 4]; 4] {
    fn from(m: WorldMatrix) -> Self {
        let m = &m.0;
        [
            [m.x.x, m.y.x, m.z.x, m.w.x],
            [m.x.y, m.y.y, m.z.y, m.w.y],
            [m.x.z, m.y.z, m.z.z, m.w.z],
            [m.x.w, m.y.w, m.z.w, m.w.w],
        ]
    }
}

impl Default for WorldMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl WorldMatrix {
    pub fn identity() -> Self {
        WorldMatrix(Matrix4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ))
    }

    /// Compose translation * rotation * scale, the order the editor builds `matrix_world` in.
    pub fn from_trs(translation: Vec3, rotation: Quaternion<f32>, scale: Vec3) -> Self {
        WorldMatrix(
            Matrix4::from_translation(translation)
                * Matrix4::from(rotation.normalize())
                * Matrix4::from_nonuniform_scale(scale.x, scale.y, scale.z),
        )
    }

    pub fn translation(&self) -> Vec3 {
        self.0.w.truncate()
    }

    /// Transform a point (w = 1).
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        (self.0 * p.extend(1.0)).truncate()
    }

    /// Transform a homogeneous point as-is; curve control points carry their own weight.
    pub fn transform_vector4(&self, p: Vector4<f32>) -> Vector4<f32> {
        self.0 * p
    }

    /// Upper 3x3 block, scale included.
    pub fn linear(&self) -> Matrix3<f32> {
        Matrix3::from_cols(self.0.x.truncate(), self.0.y.truncate(), self.0.z.truncate())
    }

    /// World orientation with scale removed from each basis column.
    pub fn rotation(&self) -> Quaternion<f32> {
        let mut col0 = self.0.x.truncate();
        let mut col1 = self.0.y.truncate();
        let mut col2 = self.0.z.truncate();

        let scale_x = col0.magnitude();
        let scale_y = col1.magnitude();
        let scale_z = col2.magnitude();

        if scale_x != 0.0 {
            col0 /= scale_x;
        }
        if scale_y != 0.0 {
            col1 /= scale_y;
        }
        if scale_z != 0.0 {
            col2 /= scale_z;
        }

        Quaternion::from(Matrix3::from_cols(col0, col1, col2)).normalize()
    }
}

/// Decompose a rotation into XYZ Euler angles (radians), X applied first.
///
/// Both candidate solutions are computed and the one with the smaller total
/// magnitude wins, so results match the editor's own `to_euler()`.
pub fn quaternion_to_euler_xyz(q: Quaternion<f32>) -> Vec3 {
    let m = Matrix3::from(q.normalize());
    let cy = m.x.x.hypot(m.x.y);

    if cy > GIMBAL_EPSILON {
        let e1 = Vector3::new(
            m.y.z.atan2(m.z.z),
            (-m.x.z).atan2(cy),
            m.x.y.atan2(m.x.x),
        );
        let e2 = Vector3::new(
            (-m.y.z).atan2(-m.z.z),
            (-m.x.z).atan2(-cy),
            (-m.x.y).atan2(-m.x.x),
        );

        let sum1 = e1.x.abs() + e1.y.abs() + e1.z.abs();
        let sum2 = e2.x.abs() + e2.y.abs() + e2.z.abs();
        if sum1 > sum2 {
            e2
        } else {
            e1
        }
    } else {
        Vector3::new((-m.z.y).atan2(m.y.y), (-m.x.z).atan2(cy), 0.0)
    }
}

/// Rotate a vector by a quaternion.
pub fn rotate_vector(q: Quaternion<f32>, v: Vec3) -> Vec3 {
    q.normalize().rotate_vector(v)
}

/// Angle between two vectors in radians, in [0, π].
pub fn angle_between(a: Vec3, b: Vec3) -> f32 {
    let Rad(angle) = a.angle(b);
    angle
}

/// Component-wise product, the building block of every unit/mirror conversion.
pub fn mul_components(a: Vec3, b: Vec3) -> Vec3 {
    a.mul_element_wise(b)
}

/// Newell's method; robust for non-planar and concave loops.
pub fn newell_normal(points: &[Vec3]) -> Vec3 {
    let mut n = Vector3::new(0.0, 0.0, 0.0);
    for (i, cur) in points.iter().enumerate() {
        let next = points[(i + 1) % points.len()];
        n.x += (cur.y - next.y) * (cur.z + next.z);
        n.y += (cur.z - next.z) * (cur.x + next.x);
        n.z += (cur.x - next.x) * (cur.y + next.y);
    }
    if n.magnitude2() > 0.0 {
        n.normalize()
    } else {
        n
    }
}

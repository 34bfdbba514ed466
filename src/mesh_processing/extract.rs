//! Mesh faces to oriented brush polygons.
//!
//! Each face is reversed (the engine winds the other way), moved into engine
//! space and given an explicit origin/normal/tangent basis.

use cgmath::{InnerSpace, Matrix, Matrix3, SquareMatrix, Vector3};

use crate::convert::CoordinateSpace;
use crate::math::{newell_normal, Vec3, WorldMatrix};
use crate::scene::Mesh;
use crate::t3d::Polygon;

/// Tangents shorter than this are treated as collapsed edges.
const MIN_TANGENT_LENGTH: f32 = 1e-6;

/// Squared normal length below which a face has no usable plane.
const MIN_NORMAL_LENGTH2: f32 = 1e-12;

/// Why a face produced no polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceIssue {
    TooFewVertices,
    VertexOutOfRange,
    ZeroLengthEdge,
    /// Distinct but collinear vertices, no plane to orient.
    ZeroAreaFace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedFace {
    pub face: usize,
    pub issue: FaceIssue,
}

#[derive(Debug, Clone, Default)]
pub struct PolygonExtraction {
    /// One polygon per usable face, in face order.
    pub polygons: Vec<Polygon>,
    pub skipped: Vec<SkippedFace>,
}

/// Convert every face of `mesh` into an export-space [`Polygon`].
///
/// With `apply_world_transform` the vertices go through the full world
/// matrix (which already carries the object scale); otherwise they stay
/// object-local and only `object_scale` is applied, the actor's own
/// Location/Rotation placing them in the level.
pub fn extract_polygons(
    mesh: &Mesh,
    world: &WorldMatrix,
    object_scale: Vec3,
    space: &CoordinateSpace,
    apply_world_transform: bool,
) -> PolygonExtraction {
    let linear = if apply_world_transform {
        world.linear()
    } else {
        Matrix3::from_diagonal(object_scale)
    };
    // Normals transform with the inverse transpose so non-uniform scale keeps them perpendicular.
    let normal_matrix = linear.invert().map(|inv| inv.transpose());

    let to_export = |p: Vec3| -> Vec3 {
        let placed = if apply_world_transform {
            world.transform_point(p)
        } else {
            linear * p
        };
        space.to_export_point(placed)
    };

    let mut out = PolygonExtraction::default();

    for (face_index, face) in mesh.faces.iter().enumerate() {
        if face.vertices.len() < 3 {
            out.skipped.push(SkippedFace { face: face_index, issue: FaceIssue::TooFewVertices });
            continue;
        }

        let local: Option<Vec<Vec3>> = face
            .vertices
            .iter()
            .map(|&i| mesh.vertices.get(i).map(|v| Vector3::from(*v)))
            .collect();
        let Some(local) = local else {
            out.skipped.push(SkippedFace { face: face_index, issue: FaceIssue::VertexOutOfRange });
            continue;
        };

        let u = space.mirror(linear * (local[1] - local[0]));
        if u.magnitude() < MIN_TANGENT_LENGTH {
            out.skipped.push(SkippedFace { face: face_index, issue: FaceIssue::ZeroLengthEdge });
            continue;
        }
        let u = u.normalize();

        let local_normal = face
            .normal
            .map(Vector3::from)
            .unwrap_or_else(|| newell_normal(&local));
        let n = match normal_matrix {
            Some(m) => m * local_normal,
            None => local_normal,
        };
        let n = space.mirror(n);
        if n.magnitude2() < MIN_NORMAL_LENGTH2 {
            out.skipped.push(SkippedFace { face: face_index, issue: FaceIssue::ZeroAreaFace });
            continue;
        }
        let n = n.normalize();

        let v = n.cross(u);

        let vertices: Vec<Vec3> = local.iter().rev().map(|p| to_export(*p)).collect();
        out.polygons.push(Polygon::new(vertices[0], n, u, v, vertices));
    }

    if !out.skipped.is_empty() {
        log::debug!(
            "skipped {} of {} faces while extracting polygons",
            out.skipped.len(),
            mesh.faces.len()
        );
    }

    out
}

// Common test utilities and helpers
#![allow(dead_code)]

use std::path::PathBuf;

use cgmath::{Quaternion, Vector3};
use medge_t3d::math::WorldMatrix;
use medge_t3d::scene::{ActorType, Face, Mesh, ObjectData, SceneObject};

/// Load a scene snapshot fixture
pub fn fixture(filename: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/fixtures");
    path.push(filename);

    assert!(path.exists(), "Test fixture not found: {}", path.display());
    path
}

/// Axis-aligned 2x2x2 cube centred on the origin, 8 vertices and 6 quads.
pub fn cube_mesh() -> Mesh {
    let vertices = vec![
        [-1.0, -1.0, -1.0],
        [1.0, -1.0, -1.0],
        [1.0, 1.0, -1.0],
        [-1.0, 1.0, -1.0],
        [-1.0, -1.0, 1.0],
        [1.0, -1.0, 1.0],
        [1.0, 1.0, 1.0],
        [-1.0, 1.0, 1.0],
    ];
    let quads: [[usize; 4]; 6] = [
        [0, 3, 2, 1],
        [4, 5, 6, 7],
        [0, 1, 5, 4],
        [1, 2, 6, 5],
        [2, 3, 7, 6],
        [3, 0, 4, 7],
    ];
    let normals = [
        [0.0, 0.0, -1.0],
        [0.0, 0.0, 1.0],
        [0.0, -1.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [-1.0, 0.0, 0.0],
    ];
    let faces = quads
        .iter()
        .zip(normals)
        .map(|(q, n)| Face { vertices: q.to_vec(), normal: Some(n) })
        .collect();
    Mesh { vertices, faces }
}

pub fn cube_object(name: &str, actor_type: ActorType) -> SceneObject {
    SceneObject::new(name, actor_type, ObjectData::Mesh(cube_mesh()))
}

pub fn empty_object(name: &str, actor_type: ActorType) -> SceneObject {
    SceneObject::new(name, actor_type, ObjectData::Empty)
}

/// Move an object to `(x, y, z)` without rotation or scale.
pub fn placed(mut obj: SceneObject, x: f32, y: f32, z: f32) -> SceneObject {
    obj.matrix_world = WorldMatrix::from_trs(
        Vector3::new(x, y, z),
        Quaternion::new(1.0, 0.0, 0.0, 0.0),
        Vector3::new(1.0, 1.0, 1.0),
    );
    obj
}

/// Count occurrences of `token` in `text`.
pub fn count(text: &str, token: &str) -> usize {
    text.matches(token).count()
}

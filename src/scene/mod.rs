//! Scene snapshot handed over by the editor.
//!
//! The core never touches live editor objects. The editor side dumps every
//! object it wants exported, with its world matrix, mesh/curve/light payload
//! and actor properties, plus the container tree, into one JSON document.

pub mod collection_paths;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::math::WorldMatrix;
use crate::t3d::TrackIndex;

pub use collection_paths::CollectionPaths;

// ============================================================================
// Classification
// ============================================================================

/// Actor type attached to an object by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActorType {
    #[default]
    None,
    Brush,
    StaticMesh,
    Ladder,
    Swing,
    Zipline,
    BlockingVolume,
    TriggerVolume,
    KillVolume,
    PlayerStart,
    Checkpoint,
    Springboard,
}

impl ActorType {
    pub fn as_str(self) -> &'static str {
        match self {
            ActorType::None => "None",
            ActorType::Brush => "Brush",
            ActorType::StaticMesh => "StaticMesh",
            ActorType::Ladder => "Ladder",
            ActorType::Swing => "Swing",
            ActorType::Zipline => "Zipline",
            ActorType::BlockingVolume => "BlockingVolume",
            ActorType::TriggerVolume => "TriggerVolume",
            ActorType::KillVolume => "KillVolume",
            ActorType::PlayerStart => "PlayerStart",
            ActorType::Checkpoint => "Checkpoint",
            ActorType::Springboard => "Springboard",
        }
    }
}

impl FromStr for ActorType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "None" | "NONE" | "" => ActorType::None,
            "Brush" | "BRUSH" => ActorType::Brush,
            "StaticMesh" | "STATIC_MESH" => ActorType::StaticMesh,
            "Ladder" | "LadderVolume" | "LADDER_VOLUME" => ActorType::Ladder,
            "Swing" | "SwingVolume" | "SWING_VOLUME" => ActorType::Swing,
            "Zipline" | "ZIPLINE" => ActorType::Zipline,
            "BlockingVolume" | "BLOCKING_VOLUME" => ActorType::BlockingVolume,
            "TriggerVolume" | "TRIGGER_VOLUME" => ActorType::TriggerVolume,
            "KillVolume" | "KILL_VOLUME" => ActorType::KillVolume,
            "PlayerStart" | "PLAYER_START" => ActorType::PlayerStart,
            "Checkpoint" | "CHECKPOINT" => ActorType::Checkpoint,
            "Springboard" | "SPRINGBOARD" => ActorType::Springboard,
            other => return Err(other.to_string()),
        })
    }
}

/// Unknown tags mean "not exported".
impl From<String> for ActorType {
    fn from(s: String) -> Self {
        s.parse().unwrap_or_else(|unknown| {
            log::debug!("unknown actor type tag {unknown:?}, object will not be exported");
            ActorType::None
        })
    }
}

impl From<ActorType> for String {
    fn from(t: ActorType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for ActorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Object payloads
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Face {
    /// Indices into the mesh's vertex list, in the editor's winding order.
    pub vertices: Vec<usize>,
    /// Evaluated face normal in object space.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal: Option<[f32; 3]>,
}

/// Evaluated mesh in object-local space.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<[f32; 3]>,
    pub faces: Vec<Face>,
}

/// Control points of the first spline, homogeneous `[x, y, z, w]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    pub points: Vec<[f32; 4]>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightKind {
    Point,
    Sun,
    Spot,
    Area,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightData {
    pub kind: LightKind,
    #[serde(default = "white")]
    pub color: [f32; 3],
    #[serde(default)]
    pub energy: f32,
    #[serde(default)]
    pub cutoff_distance: f32,
    /// Full cone angle in radians.
    #[serde(default)]
    pub spot_size: f32,
    /// Edge length of an area light.
    #[serde(default)]
    pub size: f32,
}

fn white() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn one() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ObjectData {
    #[default]
    Empty,
    Mesh(Mesh),
    Curve(Curve),
    Light(LightData),
}

// ============================================================================
// Actor properties
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticMeshProps {
    pub use_prefab: bool,
    /// Name of the prefab object; resolved through the container tree.
    pub prefab: Option<String>,
    pub material: Option<String>,
    pub is_hidden_game: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerStartProps {
    pub is_time_trial: bool,
    pub track_index: TrackIndex,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckpointProps {
    pub track_index: TrackIndex,
    pub order_index: i32,
    pub no_intermediate_time: bool,
    pub custom_height: f32,
    pub custom_width_scale: f32,
    pub no_respawn: bool,
    pub enabled: bool,
    pub should_be_based: bool,
}

impl Default for CheckpointProps {
    fn default() -> Self {
        CheckpointProps {
            track_index: TrackIndex::default(),
            order_index: 0,
            no_intermediate_time: false,
            custom_height: 0.0,
            custom_width_scale: 0.0,
            no_respawn: false,
            enabled: true,
            should_be_based: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushProps {
    pub material: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LadderProps {
    pub is_pipe: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockingVolumeProps {
    pub phys_material: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZiplineProps {
    /// Name of the curve object carrying the spline.
    pub curve: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightProps {
    pub sample_factor: f32,
}

impl Default for LightProps {
    fn default() -> Self {
        LightProps { sample_factor: 1.0 }
    }
}

/// Everything the editor panels store on an object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorProps {
    pub static_mesh: StaticMeshProps,
    pub player_start: PlayerStartProps,
    pub checkpoint: CheckpointProps,
    pub brush: BrushProps,
    pub ladder: LadderProps,
    pub blocking_volume: BlockingVolumeProps,
    pub zipline: ZiplineProps,
    pub light: LightProps,
}

// ============================================================================
// Snapshot
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub name: String,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub matrix_world: WorldMatrix,
    /// Local scale, kept separate from the world matrix.
    #[serde(default = "one")]
    pub scale: [f32; 3],
    #[serde(default)]
    pub actor_type: ActorType,
    #[serde(default)]
    pub data: ObjectData,
    #[serde(default)]
    pub props: ActorProps,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, actor_type: ActorType, data: ObjectData) -> Self {
        SceneObject {
            name: name.into(),
            selected: false,
            matrix_world: WorldMatrix::identity(),
            scale: one(),
            actor_type,
            data,
            props: ActorProps::default(),
        }
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        match &self.data {
            ObjectData::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn light(&self) -> Option<&LightData> {
        match &self.data {
            ObjectData::Light(light) => Some(light),
            _ => None,
        }
    }
}

/// Node of the editor's container tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionNode {
    pub name: String,
    #[serde(default)]
    pub selected: bool,
    /// Names of objects directly in this container.
    #[serde(default)]
    pub objects: Vec<String>,
    #[serde(default)]
    pub children: Vec<CollectionNode>,
}

impl CollectionNode {
    /// Depth-first search by name.
    pub fn find(&self, name: &str) -> Option<&CollectionNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    /// Object names in this container and every descendant, without duplicates.
    pub fn all_objects(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_objects(&mut names);
        names
    }

    fn collect_objects<'a>(&'a self, names: &mut Vec<&'a str>) {
        for name in &self.objects {
            if !names.contains(&name.as_str()) {
                names.push(name.as_str());
            }
        }
        for child in &self.children {
            child.collect_objects(names);
        }
    }

    fn collect_selected<'a>(&'a self, out: &mut Vec<&'a CollectionNode>) {
        if self.selected {
            out.push(self);
        }
        for child in &self.children {
            child.collect_selected(out);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    /// Objects in the editor's iteration order.
    #[serde(default)]
    pub objects: Vec<SceneObject>,
    /// Top-level containers.
    #[serde(default)]
    pub collections: Vec<CollectionNode>,
}

impl SceneSnapshot {
    pub fn from_json_str(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene snapshot {}", path.display()))?;
        let snapshot = Self::from_json_str(&text)
            .with_context(|| format!("Failed to parse scene snapshot {}", path.display()))?;
        log::info!(
            "loaded {} objects, {} top-level collections from {}",
            snapshot.objects.len(),
            snapshot.collections.len(),
            path.display()
        );
        Ok(snapshot)
    }

    pub fn object(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    pub fn find_collection(&self, name: &str) -> Option<&CollectionNode> {
        self.collections.iter().find_map(|c| c.find(name))
    }

    pub fn selected_objects(&self) -> Vec<&SceneObject> {
        self.objects.iter().filter(|o| o.selected).collect()
    }

    pub fn selected_collections(&self) -> Vec<&CollectionNode> {
        let mut out = Vec::new();
        for c in &self.collections {
            c.collect_selected(&mut out);
        }
        out
    }

    /// Objects of a container subtree, in snapshot order.
    pub fn objects_in(&self, collection: &CollectionNode) -> Vec<&SceneObject> {
        let names = collection.all_objects();
        self.objects
            .iter()
            .filter(|o| names.contains(&o.name.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "objects": [
            {
                "name": "Floor",
                "selected": true,
                "actor_type": "Brush",
                "data": {
                    "type": "mesh",
                    "vertices": [[0,0,0],[1,0,0],[1,1,0]],
                    "faces": [{"vertices": [0,1,2]}]
                },
                "props": {"brush": {"material": "Concrete"}}
            },
            {
                "name": "Lamp",
                "matrix_world": [[1,0,0,2],[0,1,0,3],[0,0,1,4],[0,0,0,1]],
                "data": {"type": "light", "kind": "spot", "energy": 10.0, "spot_size": 0.8}
            },
            {"name": "Mystery", "actor_type": "Teleporter"}
        ],
        "collections": [
            {"name": "GenericBrowser", "children": [
                {"name": "Walls", "selected": true, "objects": ["Floor"]}
            ]}
        ]
    }"#;

    #[test]
    fn parses_objects_and_defaults() {
        let snap = SceneSnapshot::from_json_str(SNAPSHOT).unwrap();
        assert_eq!(snap.objects.len(), 3);

        let floor = &snap.objects[0];
        assert_eq!(floor.actor_type, ActorType::Brush);
        assert_eq!(floor.scale, [1.0, 1.0, 1.0]);
        assert_eq!(floor.mesh().unwrap().faces[0].vertices, vec![0, 1, 2]);
        assert_eq!(floor.props.brush.material.as_deref(), Some("Concrete"));
        assert!(floor.props.checkpoint.enabled);

        let lamp = snap.object("Lamp").unwrap();
        assert_eq!(lamp.matrix_world.translation().z, 4.0);
        let light = lamp.light().unwrap();
        assert_eq!(light.kind, LightKind::Spot);
        assert_eq!(light.color, [1.0, 1.0, 1.0]);
        assert_eq!(lamp.props.light.sample_factor, 1.0);
    }

    #[test]
    fn unknown_tag_becomes_none() {
        let snap = SceneSnapshot::from_json_str(SNAPSHOT).unwrap();
        assert_eq!(snap.objects[2].actor_type, ActorType::None);
    }

    #[test]
    fn legacy_tag_spellings_are_accepted() {
        assert_eq!("LADDER_VOLUME".parse::<ActorType>(), Ok(ActorType::Ladder));
        assert_eq!("SwingVolume".parse::<ActorType>(), Ok(ActorType::Swing));
    }

    #[test]
    fn selection_queries() {
        let snap = SceneSnapshot::from_json_str(SNAPSHOT).unwrap();
        let selected: Vec<_> = snap.selected_objects().iter().map(|o| o.name.as_str()).collect();
        assert_eq!(selected, vec!["Floor"]);

        let collections = snap.selected_collections();
        assert_eq!(collections.len(), 1);
        assert_eq!(collections[0].name, "Walls");
        let members: Vec<_> = snap.objects_in(collections[0]).iter().map(|o| o.name.as_str()).collect();
        assert_eq!(members, vec!["Floor"]);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = SceneSnapshot::from_json_str("{\"objects\": 3}").unwrap_err();
        assert!(matches!(err, crate::error::ExportError::SceneParse(_)));
    }
}

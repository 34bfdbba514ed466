//! T3D text model: primitives, polygons, actors and the map writer.

pub mod actor;
pub mod names;
pub mod polygon;
pub mod primitives;
pub mod writer;

pub use actor::{
    kind_class_name, Actor, ActorKind, Brush, BrushClass, Checkpoint, CsgOper, LightParams,
    PlayerStart, StaticMesh, TrackIndex,
};
pub use names::NameAllocator;
pub use polygon::{assign_links, Polygon, POLY_FLAGS};
pub use primitives::{Color, Flag, Float, Location, Point, Rotation, RotationOrder, EULER_TO_URU};
pub use writer::{render_map, write_t3d, MAP_FOOTER, MAP_HEADER};

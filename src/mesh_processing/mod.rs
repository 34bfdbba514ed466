pub mod extract;

pub use extract::{extract_polygons, FaceIssue, PolygonExtraction, SkippedFace};

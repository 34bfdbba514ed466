pub mod builder;
pub mod companion;
pub mod config;
pub mod convert;
pub mod error;
pub mod export;
pub mod math;
pub mod mesh_processing;
pub mod scene;
pub mod t3d;

pub use builder::{BuildOutput, Diagnostic, ExportReport, SceneBuilder};
pub use config::{ExportConfig, UnitMode};
pub use error::{ExportError, Result};
pub use export::{export, ExportOptions, ExportScope};
pub use scene::SceneSnapshot;

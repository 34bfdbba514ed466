//! Export configuration, loaded from an optional TOML file.
//!
//! ```toml
//! mirror = [1.0, -1.0, 1.0]
//! collection_root = "GenericBrowser"
//! light_power_scale = 1.0
//!
//! [units]
//! meters = 100.0
//! native = 1.0
//!
//! [skylight]
//! location = [0.0, 0.0, 10.0]
//! color = [1.0, 1.0, 1.0]
//! brightness = 0.5
//! sample_factor = 1.0
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::convert::{CoordinateSpace, DEFAULT_MIRROR};

/// Length unit the editor scene is authored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitMode {
    #[default]
    Meters,
    Native,
}

impl UnitMode {
    pub fn as_str(self) -> &'static str {
        match self {
            UnitMode::Meters => "meters",
            UnitMode::Native => "native",
        }
    }
}

impl FromStr for UnitMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "meters" | "m" => Ok(UnitMode::Meters),
            "native" | "unreal" | "u" => Ok(UnitMode::Native),
            other => Err(format!("unknown unit mode '{other}' (expected meters or native)")),
        }
    }
}

impl fmt::Display for UnitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Engine units per editor unit for each mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitScales {
    pub meters: f32,
    pub native: f32,
}

impl Default for UnitScales {
    fn default() -> Self {
        UnitScales { meters: 100.0, native: 1.0 }
    }
}

/// Ambient sky light emitted ahead of every other actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkylightConfig {
    /// Editor-space location.
    #[serde(default)]
    pub location: [f32; 3],
    #[serde(default = "white")]
    pub color: [f32; 3],
    #[serde(default = "one")]
    pub brightness: f32,
    #[serde(default = "one")]
    pub sample_factor: f32,
}

fn white() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn one() -> f32 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub units: UnitScales,
    /// Axis flip for positions and polygon geometry. Rotations always use
    /// the Y-flip convention whatever this is set to.
    pub mirror: [f32; 3],
    /// Root container the package paths are computed from.
    pub collection_root: String,
    /// Editor light energy to engine brightness.
    pub light_power_scale: f32,
    pub skylight: Option<SkylightConfig>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            units: UnitScales::default(),
            mirror: DEFAULT_MIRROR,
            collection_root: "GenericBrowser".to_string(),
            light_power_scale: 1.0,
            skylight: None,
        }
    }
}

impl ExportConfig {
    pub fn from_toml_str(text: &str) -> crate::error::Result<Self> {
        let config: ExportConfig = toml::from_str(text)?;
        if config.mirror != DEFAULT_MIRROR {
            log::warn!(
                "mirror {:?} only applies to positions; rotations keep the Y flip",
                config.mirror
            );
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::from_toml_str(&text)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        log::debug!("loaded export config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    pub fn unit_scale(&self, mode: UnitMode) -> f32 {
        match mode {
            UnitMode::Meters => self.units.meters,
            UnitMode::Native => self.units.native,
        }
    }

    pub fn coordinate_space(&self, mode: UnitMode) -> CoordinateSpace {
        CoordinateSpace::new(self.unit_scale(mode), self.mirror)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = ExportConfig::from_toml_str("").unwrap();
        assert_eq!(config, ExportConfig::default());
        assert_eq!(config.unit_scale(UnitMode::Meters), 100.0);
        assert_eq!(config.unit_scale(UnitMode::Native), 1.0);
        assert!(config.skylight.is_none());
    }

    #[test]
    fn legacy_meter_scale_and_skylight() {
        let config = ExportConfig::from_toml_str(
            r#"
            light_power_scale = 0.25

            [units]
            meters = 60.352

            [skylight]
            location = [0.0, 0.0, 10.0]
            brightness = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(config.unit_scale(UnitMode::Meters), 60.352);
        assert_eq!(config.units.native, 1.0);
        assert_eq!(config.light_power_scale, 0.25);
        let sky = config.skylight.unwrap();
        assert_eq!(sky.location, [0.0, 0.0, 10.0]);
        assert_eq!(sky.color, [1.0, 1.0, 1.0]);
        assert_eq!(sky.sample_factor, 1.0);
    }

    #[test]
    fn bad_toml_is_a_config_error() {
        let err = ExportConfig::from_toml_str("mirror = \"sideways\"").unwrap_err();
        assert!(matches!(err, crate::error::ExportError::Config(_)));
    }

    #[test]
    fn unit_mode_parses_aliases() {
        assert_eq!("Meters".parse::<UnitMode>(), Ok(UnitMode::Meters));
        assert_eq!("unreal".parse::<UnitMode>(), Ok(UnitMode::Native));
        assert!("feet".parse::<UnitMode>().is_err());
    }
}

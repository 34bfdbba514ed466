use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Severity of a per-object finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The object was skipped.
    Error,
    /// The object was exported, possibly incomplete.
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    /// Static mesh marked "use prefab" with no prefab assigned.
    MissingPrefab,
    /// Zipline without a resolvable curve object.
    MissingCurve,
    /// Zipline curve with fewer than three control points.
    InvalidCurve,
    /// Brush-family object without mesh data.
    MissingMesh,
    /// Brush whose faces were all unusable.
    EmptyBrush,
    /// Some faces of a mesh were skipped.
    DegenerateFaces,
}

impl DiagnosticCode {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticCode::MissingPrefab => "MISSING_PREFAB",
            DiagnosticCode::MissingCurve => "MISSING_CURVE",
            DiagnosticCode::InvalidCurve => "INVALID_CURVE",
            DiagnosticCode::MissingMesh => "MISSING_MESH",
            DiagnosticCode::EmptyBrush => "EMPTY_BRUSH",
            DiagnosticCode::DegenerateFaces => "DEGENERATE_FACES",
        }
    }
}

/// One problem found while building a single object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Name of the scene object.
    pub object: String,
    pub code: DiagnosticCode,
    pub message: String,
    pub severity: Severity,
}

impl Diagnostic {
    pub fn error(object: &str, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Diagnostic {
            object: object.to_string(),
            code,
            message: message.into(),
            severity: Severity::Error,
        }
    }

    pub fn warning(object: &str, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            ..Self::error(object, code, message)
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.as_str(), self.object, self.message)
    }
}

/// A T3D file produced by an export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub actor_count: usize,
}

/// Outcome of an export run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportReport {
    pub files: Vec<WrittenFile>,
    pub diagnostics: Vec<Diagnostic>,
    /// Objects skipped because of an error.
    pub error_count: u32,
    pub warning_count: u32,
}

impl ExportReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic and update counts.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => self.error_count += 1,
            Severity::Warning => self.warning_count += 1,
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn record_file(&mut self, path: PathBuf, actor_count: usize) {
        self.files.push(WrittenFile { path, actor_count });
    }

    pub fn total_actors(&self) -> usize {
        self.files.iter().map(|f| f.actor_count).sum()
    }

    /// True when no object had to be skipped.
    pub fn is_clean(&self) -> bool {
        self.error_count == 0
    }
}

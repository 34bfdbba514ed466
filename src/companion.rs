//! External static-mesh exporter run after the T3D files are written.

use std::path::Path;
use std::process::Command;

use crate::config::UnitMode;
use crate::error::{ExportError, Result};
use crate::export::ExportScope;

/// Program plus fixed leading arguments, e.g. `python3 ase_export.py`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanionCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl CompanionCommand {
    /// Split a command line on whitespace. Returns `None` for a blank line.
    pub fn parse(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(CompanionCommand {
            program,
            args: parts.collect(),
        })
    }

    /// Full argument list passed to the exporter.
    pub fn arguments(&self, output: &Path, units: UnitMode, scope: ExportScope) -> Vec<String> {
        let mut args = self.args.clone();
        args.extend([
            "--output".to_string(),
            output.display().to_string(),
            "--units".to_string(),
            units.as_str().to_string(),
            "--scope".to_string(),
            scope.as_str().to_string(),
        ]);
        args
    }

    /// Run the exporter and wait for it.
    pub fn run(&self, output: &Path, units: UnitMode, scope: ExportScope) -> Result<()> {
        let args = self.arguments(output, units, scope);
        log::info!("running static mesh exporter: {} {}", self.program, args.join(" "));

        let result = Command::new(&self.program).args(&args).output();
        let failed = |message: String| ExportError::CompanionFailed {
            path: output.to_path_buf(),
            message,
        };

        let out = result.map_err(|e| failed(format!("could not start {}: {e}", self.program)))?;
        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            return Err(failed(format!("{} ({})", out.status, stderr.trim())));
        }

        let stdout = String::from_utf8_lossy(&out.stdout);
        for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
            log::debug!("[static mesh exporter] {line}");
        }
        Ok(())
    }
}

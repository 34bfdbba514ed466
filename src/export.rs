//! Export entry point: scope selection, building, writing, companion run.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::builder::{ExportReport, SceneBuilder};
use crate::companion::CompanionCommand;
use crate::config::{ExportConfig, UnitMode};
use crate::error::{ExportError, Result};
use crate::scene::{CollectionNode, SceneObject, SceneSnapshot};
use crate::t3d::write_t3d;

/// Which objects go into which file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportScope {
    /// Every object, one file.
    #[default]
    Scene,
    /// Selected objects, one file.
    SelectedObjects,
    /// One `<container>.t3d` per selected container, next to the output path.
    SelectedCollections,
}

impl ExportScope {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportScope::Scene => "scene",
            ExportScope::SelectedObjects => "selected-objects",
            ExportScope::SelectedCollections => "selected-collections",
        }
    }
}

impl FromStr for ExportScope {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "scene" => Ok(ExportScope::Scene),
            "selected-objects" | "objects" => Ok(ExportScope::SelectedObjects),
            "selected-collections" | "collections" => Ok(ExportScope::SelectedCollections),
            other => Err(format!(
                "unknown scope '{other}' (expected scene, selected-objects or selected-collections)"
            )),
        }
    }
}

impl fmt::Display for ExportScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub config: ExportConfig,
    pub units: UnitMode,
    pub scope: ExportScope,
    /// Containers to export in addition to the ones flagged selected.
    pub collections: Vec<String>,
    pub companion: Option<CompanionCommand>,
}

/// Export `snapshot` to `output` according to `options`.
///
/// Per-object problems end up in the report; only I/O, unknown containers
/// and a failing companion exporter are errors. The companion runs after
/// every T3D file is on disk.
pub fn export(snapshot: &SceneSnapshot, output: &Path, options: &ExportOptions) -> Result<ExportReport> {
    let builder = SceneBuilder::new(snapshot, &options.config, options.units);
    let mut report = ExportReport::new();

    for (path, objects) in plan(snapshot, output, options)? {
        let built = builder.build(&objects);
        write_t3d(&path, &built.actors)?;
        log::info!("wrote {} ({} actors)", path.display(), built.actors.len());

        report.record_file(path, built.actors.len());
        for diagnostic in built.diagnostics {
            report.add(diagnostic);
        }
    }

    if let Some(companion) = &options.companion {
        companion.run(output, options.units, options.scope)?;
    }

    Ok(report)
}

/// Output files and the objects each one receives.
fn plan<'s>(
    snapshot: &'s SceneSnapshot,
    output: &Path,
    options: &ExportOptions,
) -> Result<Vec<(PathBuf, Vec<&'s SceneObject>)>> {
    match options.scope {
        ExportScope::Scene => Ok(vec![(output.to_path_buf(), snapshot.objects.iter().collect())]),
        ExportScope::SelectedObjects => Ok(vec![(output.to_path_buf(), snapshot.selected_objects())]),
        ExportScope::SelectedCollections => {
            let mut collections: Vec<&CollectionNode> = snapshot.selected_collections();
            for name in &options.collections {
                let node = snapshot
                    .find_collection(name)
                    .ok_or_else(|| ExportError::MissingCollection(name.clone()))?;
                if !collections.iter().any(|c| c.name == node.name) {
                    collections.push(node);
                }
            }
            if collections.is_empty() {
                log::warn!("no collections selected, nothing to export");
            }

            let dir = output.parent().unwrap_or_else(|| Path::new(""));
            Ok(collections
                .into_iter()
                .map(|c| (dir.join(format!("{}.t3d", c.name)), snapshot.objects_in(c)))
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{ActorType, ObjectData};

    fn snapshot() -> SceneSnapshot {
        let mut a = SceneObject::new("A", ActorType::PlayerStart, ObjectData::Empty);
        a.selected = true;
        let b = SceneObject::new("B", ActorType::PlayerStart, ObjectData::Empty);
        SceneSnapshot {
            objects: vec![a, b],
            collections: vec![CollectionNode {
                name: "Level".into(),
                selected: true,
                objects: vec!["B".into()],
                children: vec![],
            }],
        }
    }

    #[test]
    fn scope_parses_and_prints() {
        for scope in [ExportScope::Scene, ExportScope::SelectedObjects, ExportScope::SelectedCollections] {
            assert_eq!(scope.as_str().parse::<ExportScope>(), Ok(scope));
        }
        assert!("everything".parse::<ExportScope>().is_err());
    }

    #[test]
    fn plan_follows_scope() {
        let snap = snapshot();
        let out = Path::new("maps/level.t3d");

        let mut options = ExportOptions::default();
        let whole = plan(&snap, out, &options).unwrap();
        assert_eq!(whole[0].1.len(), 2);

        options.scope = ExportScope::SelectedObjects;
        let selected = plan(&snap, out, &options).unwrap();
        assert_eq!(selected[0].1[0].name, "A");

        options.scope = ExportScope::SelectedCollections;
        let per_collection = plan(&snap, out, &options).unwrap();
        assert_eq!(per_collection.len(), 1);
        assert_eq!(per_collection[0].0, PathBuf::from("maps/Level.t3d"));
        assert_eq!(per_collection[0].1[0].name, "B");
    }

    #[test]
    fn unknown_named_collection_is_an_error() {
        let snap = snapshot();
        let options = ExportOptions {
            scope: ExportScope::SelectedCollections,
            collections: vec!["Nowhere".into()],
            ..ExportOptions::default()
        };
        let err = plan(&snap, Path::new("level.t3d"), &options).unwrap_err();
        assert!(matches!(err, ExportError::MissingCollection(name) if name == "Nowhere"));
    }
}

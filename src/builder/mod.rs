//! Scene objects to actors.
//!
//! One [`SceneBuilder::build`] call is one export: it owns the name
//! counters and the diagnostics for that run and nothing else survives it.

mod actors;
pub mod report;

use crate::config::{ExportConfig, UnitMode};
use crate::convert::CoordinateSpace;
use crate::scene::{ActorType, CollectionPaths, SceneObject, SceneSnapshot};
use crate::t3d::{Actor, BrushClass, NameAllocator};

pub use report::{Diagnostic, DiagnosticCode, ExportReport, Severity, WrittenFile};

/// Actors in output order plus the per-object findings.
#[derive(Debug, Clone, Default)]
pub struct BuildOutput {
    pub actors: Vec<Actor>,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct SceneBuilder<'a> {
    snapshot: &'a SceneSnapshot,
    config: &'a ExportConfig,
    space: CoordinateSpace,
    paths: CollectionPaths,
}

impl<'a> SceneBuilder<'a> {
    pub fn new(snapshot: &'a SceneSnapshot, config: &'a ExportConfig, units: UnitMode) -> Self {
        let paths = CollectionPaths::build(&snapshot.collections, &config.collection_root);
        SceneBuilder {
            snapshot,
            config,
            space: config.coordinate_space(units),
            paths,
        }
    }

    /// Build every object of the snapshot.
    pub fn build_all(&self) -> BuildOutput {
        let objects: Vec<&SceneObject> = self.snapshot.objects.iter().collect();
        self.build(&objects)
    }

    /// Build `objects` in order. The configured sky light, if any, comes first.
    pub fn build(&self, objects: &[&SceneObject]) -> BuildOutput {
        let mut ctx = actors::BuildContext {
            snapshot: self.snapshot,
            config: self.config,
            space: &self.space,
            paths: &self.paths,
            names: NameAllocator::new(),
            models: NameAllocator::new(),
            diagnostics: Vec::new(),
        };
        let mut actors = Vec::new();

        if let Some(sky) = &self.config.skylight {
            actors.push(ctx.skylight(sky));
        }

        for obj in objects {
            match self.build_object(&mut ctx, obj) {
                Ok(Some(actor)) => {
                    log::debug!("{} -> {}", obj.name, actor.name);
                    actors.push(actor);
                }
                Ok(None) => {}
                Err(diagnostic) => {
                    log::warn!("{diagnostic}");
                    ctx.diagnostics.push(diagnostic);
                }
            }
        }

        log::info!(
            "built {} actors from {} objects ({} diagnostics)",
            actors.len(),
            objects.len(),
            ctx.diagnostics.len()
        );

        BuildOutput {
            actors,
            diagnostics: ctx.diagnostics,
        }
    }

    fn build_object(
        &self,
        ctx: &mut actors::BuildContext<'_>,
        obj: &SceneObject,
    ) -> Result<Option<Actor>, Diagnostic> {
        // Lights are classified by their light kind, not the actor tag.
        if let Some(light) = obj.light() {
            return Ok(Some(ctx.light(obj, light)));
        }

        let actor = match obj.actor_type {
            ActorType::None => return Ok(None),
            ActorType::PlayerStart => ctx.player_start(obj),
            ActorType::Checkpoint => ctx.checkpoint(obj),
            ActorType::StaticMesh => ctx.static_mesh(obj)?,
            ActorType::Springboard => ctx.springboard(obj),
            ActorType::Zipline => ctx.zipline(obj)?,
            ActorType::Brush => ctx.brush(obj)?,
            ActorType::Ladder => ctx.volume(obj, BrushClass::LadderVolume)?,
            ActorType::Swing => ctx.volume(obj, BrushClass::SwingVolume)?,
            ActorType::BlockingVolume => ctx.volume(obj, BrushClass::BlockingVolume)?,
            ActorType::TriggerVolume => ctx.volume(obj, BrushClass::TriggerVolume)?,
            ActorType::KillVolume => ctx.volume(obj, BrushClass::KillVolume)?,
        };
        Ok(Some(actor))
    }
}

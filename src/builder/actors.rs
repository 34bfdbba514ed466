//! One routine per actor variant.

use cgmath::{Vector3, Vector4};

use crate::config::{ExportConfig, SkylightConfig};
use crate::convert::CoordinateSpace;
use crate::math::{mul_components, Vec3};
use crate::mesh_processing::{extract_polygons, FaceIssue};
use crate::scene::{CollectionPaths, LightData, LightKind, ObjectData, SceneObject, SceneSnapshot};
use crate::t3d::{
    kind_class_name, Actor, ActorKind, Brush, BrushClass, Checkpoint, Color, LightParams, Location,
    NameAllocator, PlayerStart, Polygon, Rotation, RotationOrder, StaticMesh,
};

use super::report::{Diagnostic, DiagnosticCode};

pub const SPRINGBOARD_MESH: &str = "P_Gameplay.SpringBoard.SpringBoardHigh_ColMesh";

pub(super) struct BuildContext<'a> {
    pub snapshot: &'a SceneSnapshot,
    pub config: &'a ExportConfig,
    pub space: &'a CoordinateSpace,
    pub paths: &'a CollectionPaths,
    pub names: NameAllocator,
    /// Brush models are counted separately from actors.
    pub models: NameAllocator,
    /// Non-fatal findings for objects that were still exported.
    pub diagnostics: Vec<Diagnostic>,
}

impl BuildContext<'_> {
    fn actor(
        &mut self,
        kind: ActorKind,
        location: Location,
        rotation: Rotation,
        draw_scale_3d: Option<Location>,
    ) -> Actor {
        Actor {
            name: self.names.next(kind_class_name(&kind)),
            location,
            rotation,
            draw_scale_3d,
            kind,
        }
    }

    fn location(&self, obj: &SceneObject) -> Location {
        self.space.to_export_location(obj.matrix_world.translation())
    }

    fn rotation(&self, obj: &SceneObject, order: RotationOrder) -> Rotation {
        self.space.to_export_rotation(obj.matrix_world.rotation(), order)
    }

    fn polygons(&mut self, obj: &SceneObject, apply_world_transform: bool) -> Result<Vec<Polygon>, Diagnostic> {
        let Some(mesh) = obj.mesh() else {
            return Err(Diagnostic::error(
                &obj.name,
                DiagnosticCode::MissingMesh,
                format!("{} needs mesh data", obj.actor_type),
            ));
        };

        let out = extract_polygons(
            mesh,
            &obj.matrix_world,
            Vector3::from(obj.scale),
            self.space,
            apply_world_transform,
        );

        if !out.skipped.is_empty() {
            let faces: Vec<String> = out
                .skipped
                .iter()
                .map(|s| {
                    let why = match s.issue {
                        FaceIssue::TooFewVertices => "fewer than 3 vertices",
                        FaceIssue::VertexOutOfRange => "vertex index out of range",
                        FaceIssue::ZeroLengthEdge => "zero-length first edge",
                        FaceIssue::ZeroAreaFace => "collinear vertices",
                    };
                    format!("#{} ({why})", s.face)
                })
                .collect();
            let diagnostic = Diagnostic::warning(
                &obj.name,
                DiagnosticCode::DegenerateFaces,
                format!("skipped faces {}", faces.join(", ")),
            );
            log::warn!("{diagnostic}");
            self.diagnostics.push(diagnostic);
        }

        if out.polygons.is_empty() {
            return Err(Diagnostic::error(
                &obj.name,
                DiagnosticCode::EmptyBrush,
                "no usable faces",
            ));
        }
        Ok(out.polygons)
    }

    // ------------------------------------------------------------------------
    // Gameplay actors
    // ------------------------------------------------------------------------

    pub fn player_start(&mut self, obj: &SceneObject) -> Actor {
        let props = &obj.props.player_start;
        let kind = ActorKind::PlayerStart(PlayerStart {
            is_time_trial: props.is_time_trial,
            track_index: props.track_index,
        });
        let location = self.location(obj);
        let rotation = self.rotation(obj, RotationOrder::RollPitchYaw);
        self.actor(kind, location, rotation, None)
    }

    pub fn checkpoint(&mut self, obj: &SceneObject) -> Actor {
        let p = &obj.props.checkpoint;
        let kind = ActorKind::Checkpoint(Checkpoint {
            track_index: p.track_index,
            order_index: p.order_index,
            no_intermediate_time: p.no_intermediate_time,
            custom_height: p.custom_height,
            custom_width_scale: p.custom_width_scale,
            no_respawn: p.no_respawn,
            enabled: p.enabled,
            should_be_based: p.should_be_based,
        });
        let location = self.location(obj);
        self.actor(kind, location, Rotation::zero(RotationOrder::PitchRollYaw), None)
    }

    pub fn static_mesh(&mut self, obj: &SceneObject) -> Result<Actor, Diagnostic> {
        let props = &obj.props.static_mesh;

        let mesh_name = if props.use_prefab {
            match props.prefab.as_deref().filter(|p| !p.is_empty()) {
                Some(prefab) => prefab,
                None => {
                    return Err(Diagnostic::error(
                        &obj.name,
                        DiagnosticCode::MissingPrefab,
                        "uses prefab, but has no prefab selected",
                    ))
                }
            }
        } else {
            obj.name.as_str()
        };

        let kind = ActorKind::StaticMesh(StaticMesh {
            mesh: self.paths.qualify(mesh_name),
            material: props
                .material
                .as_deref()
                .filter(|m| !m.is_empty())
                .map(|m| self.paths.qualify(m)),
            hidden_game: props.is_hidden_game,
        });
        let location = self.location(obj);
        let rotation = self.rotation(obj, RotationOrder::RollPitchYaw);
        Ok(self.actor(kind, location, rotation, Some(Location(Vector3::from(obj.scale)))))
    }

    pub fn springboard(&mut self, obj: &SceneObject) -> Actor {
        let kind = ActorKind::StaticMesh(StaticMesh {
            mesh: SPRINGBOARD_MESH.to_string(),
            material: None,
            hidden_game: obj.props.static_mesh.is_hidden_game,
        });
        let location = self.location(obj);
        let rotation = self.rotation(obj, RotationOrder::RollPitchYaw);
        self.actor(kind, location, rotation, Some(Location::new(1.0, 1.0, 1.0)))
    }

    // ------------------------------------------------------------------------
    // Brushes
    // ------------------------------------------------------------------------

    /// Level geometry: vertices are baked into world space, the actor sits at the origin.
    pub fn brush(&mut self, obj: &SceneObject) -> Result<Actor, Diagnostic> {
        let mut polygons = self.polygons(obj, true)?;

        if let Some(material) = obj.props.brush.material.as_deref().filter(|m| !m.is_empty()) {
            let texture = self.paths.qualify(material);
            for poly in &mut polygons {
                poly.texture = Some(texture.clone());
            }
        }

        let brush = Brush::new(BrushClass::Brush, self.models.next("Model"), polygons);
        Ok(self.actor(
            ActorKind::Brush(brush),
            Location::zero(),
            Rotation::zero(RotationOrder::PitchRollYaw),
            None,
        ))
    }

    /// Gameplay volumes keep object-local geometry placed by Location/Rotation.
    pub fn volume(&mut self, obj: &SceneObject, class: BrushClass) -> Result<Actor, Diagnostic> {
        let polygons = self.polygons(obj, false)?;
        let model = self.models.next("Model");

        let brush = match class {
            BrushClass::LadderVolume => Brush::ladder(model, polygons, obj.props.ladder.is_pipe),
            BrushClass::BlockingVolume => {
                let phys = obj
                    .props
                    .blocking_volume
                    .phys_material
                    .as_deref()
                    .map(|m| self.paths.qualify(m));
                Brush::blocking_volume(model, polygons, phys.as_deref())
            }
            other => Brush::new(other, model, polygons),
        };

        let location = self.location(obj);
        let rotation = self.rotation(obj, RotationOrder::PitchRollYaw);
        Ok(self.actor(ActorKind::Brush(brush), location, rotation, None))
    }

    /// Zipline volume anchored at the start of its paired curve.
    pub fn zipline(&mut self, obj: &SceneObject) -> Result<Actor, Diagnostic> {
        let curve_name = obj
            .props
            .zipline
            .curve
            .as_deref()
            .filter(|c| !c.is_empty())
            .ok_or_else(|| {
                Diagnostic::error(&obj.name, DiagnosticCode::MissingCurve, "no curve assigned")
            })?;

        let snapshot = self.snapshot;
        let curve_obj = snapshot.object(curve_name).ok_or_else(|| {
            Diagnostic::error(
                &obj.name,
                DiagnosticCode::MissingCurve,
                format!("curve '{curve_name}' not found"),
            )
        })?;

        let ObjectData::Curve(curve) = &curve_obj.data else {
            return Err(Diagnostic::error(
                &obj.name,
                DiagnosticCode::MissingCurve,
                format!("'{curve_name}' is not a curve"),
            ));
        };
        if curve.points.len() < 3 {
            return Err(Diagnostic::error(
                &obj.name,
                DiagnosticCode::InvalidCurve,
                format!("curve '{curve_name}' has {} points, needs 3", curve.points.len()),
            ));
        }

        let factor = self.space.mirror(Vector3::new(1.0, 1.0, 1.0) * self.space.unit_scale);
        let spline_point = |i: usize| -> Location {
            let p = curve_obj.matrix_world.transform_vector4(Vector4::from(curve.points[i]));
            Location(mul_components(p.truncate(), factor))
        };
        let start = spline_point(0);
        let middle = spline_point(1);
        let end = spline_point(2);

        let polygons = self.polygons(obj, false)?;
        let brush = Brush::zipline(self.models.next("Model"), polygons, start, middle, end);
        let rotation = self.rotation(obj, RotationOrder::PitchRollYaw);
        Ok(self.actor(ActorKind::Brush(brush), start, rotation, None))
    }

    // ------------------------------------------------------------------------
    // Lights
    // ------------------------------------------------------------------------

    pub fn light(&mut self, obj: &SceneObject, light: &LightData) -> Actor {
        let unit_scale = self.space.unit_scale;
        let power_scale = self.config.light_power_scale;
        let params = |brightness: f32| LightParams {
            color: Color::from_unit(light.color),
            brightness,
            sample_factor: obj.props.light.sample_factor,
        };
        let location = self.location(obj);
        let world_rotation = obj.matrix_world.rotation();
        let radius = light.cutoff_distance * unit_scale;

        match light.kind {
            LightKind::Point => self.actor(
                ActorKind::PointLight { light: params(light.energy * power_scale), radius },
                location,
                Rotation::zero(RotationOrder::PitchRollYaw),
                None,
            ),
            // Sun energy is already normalized.
            LightKind::Sun => {
                let rotation = self.space.light_rotation(world_rotation);
                self.actor(ActorKind::DirectionalLight(params(light.energy)), location, rotation, None)
            }
            LightKind::Spot => {
                let rotation = self.space.light_rotation(world_rotation);
                self.actor(
                    ActorKind::SpotLight {
                        light: params(light.energy * power_scale),
                        radius,
                        outer_cone_angle: light.spot_size.to_degrees() / 2.0,
                    },
                    location,
                    rotation,
                    None,
                )
            }
            LightKind::Area => {
                let rotation = self.space.area_light_rotation(world_rotation);
                let size_x = light.size * obj.scale[0] * unit_scale;
                let size_z = light.size * obj.scale[1] * unit_scale;
                self.actor(
                    ActorKind::AreaLight { light: params(light.energy * power_scale), radius },
                    location,
                    rotation,
                    Some(Location::new(size_x, 1.0, size_z)),
                )
            }
        }
    }

    pub fn skylight(&mut self, sky: &SkylightConfig) -> Actor {
        let kind = ActorKind::SkyLight(LightParams {
            color: Color::from_unit(sky.color),
            brightness: sky.brightness,
            sample_factor: sky.sample_factor,
        });
        let location = self.space.to_export_location(Vec3::from(sky.location));
        self.actor(kind, location, Rotation::zero(RotationOrder::PitchRollYaw), None)
    }
}

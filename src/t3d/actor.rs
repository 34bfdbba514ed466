//! Exportable actors and their T3D block grammar.
//!
//! Every actor renders as a `Begin Actor ... End Actor` block; sub-components
//! nest as `Begin Object ... End Object` and brush geometry as
//! `Begin Brush ... End Brush`. Rendering is pure: names, links and unit
//! conversion are all settled by the builder before an actor exists.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::polygon::{assign_links, Polygon};
use super::primitives::{Color, Flag, Float, Location, Rotation};

// ============================================================================
// Shared enums
// ============================================================================

/// Time trial track a spawn point or checkpoint belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TrackIndex {
    None,
    CranesA01,
    CranesB01,
    CranesB02,
    CranesC01,
    CranesD01,
    EdgeA01,
    StormdrainA01,
    StormdrainA02,
    StormdrainB01,
    StormdrainB02,
    StormdrainB03,
    ConvoyA01,
    ConvoyA02,
    ConvoyB01,
    ConvoyB02,
    MallA01,
    #[default]
    TutorialA01,
    TutorialA02,
    TutorialA03,
    FactoryA01,
    SkyscraperA01,
    SkyscraperB01,
    EscapeA01,
    EscapeB01,
}

const TRACK_INDICES: [(TrackIndex, &str); 25] = [
    (TrackIndex::None, "ETTS_NONE"),
    (TrackIndex::CranesA01, "ETTS_CRANESA01"),
    (TrackIndex::CranesB01, "ETTS_CRANESB01"),
    (TrackIndex::CranesB02, "ETTS_CRANESB02"),
    (TrackIndex::CranesC01, "ETTS_CRANESC01"),
    (TrackIndex::CranesD01, "ETTS_CRANESD01"),
    (TrackIndex::EdgeA01, "ETTS_EDGEA01"),
    (TrackIndex::StormdrainA01, "ETTS_STORMDRAINA01"),
    (TrackIndex::StormdrainA02, "ETTS_STORMDRAINA02"),
    (TrackIndex::StormdrainB01, "ETTS_STORMDRAINB01"),
    (TrackIndex::StormdrainB02, "ETTS_STORMDRAINB02"),
    (TrackIndex::StormdrainB03, "ETTS_STORMDRAINB03"),
    (TrackIndex::ConvoyA01, "ETTS_CONVOYA01"),
    (TrackIndex::ConvoyA02, "ETTS_CONVOYA02"),
    (TrackIndex::ConvoyB01, "ETTS_CONVOYB01"),
    (TrackIndex::ConvoyB02, "ETTS_CONVOYB02"),
    (TrackIndex::MallA01, "ETTS_MALLA01"),
    (TrackIndex::TutorialA01, "ETTS_TUTORIALA01"),
    (TrackIndex::TutorialA02, "ETTS_TUTORIALA02"),
    (TrackIndex::TutorialA03, "ETTS_TUTORIALA03"),
    (TrackIndex::FactoryA01, "ETTS_FACTORYA01"),
    (TrackIndex::SkyscraperA01, "ETTS_SKYSCRAPERA01"),
    (TrackIndex::SkyscraperB01, "ETTS_SKYSCRAPERB01"),
    (TrackIndex::EscapeA01, "ETTS_ESCAPEA01"),
    (TrackIndex::EscapeB01, "ETTS_ESCAPEB01"),
];

impl TrackIndex {
    pub fn as_str(self) -> &'static str {
        TRACK_INDICES
            .iter()
            .find(|(t, _)| *t == self)
            .map(|(_, s)| *s)
            .unwrap_or("ETTS_NONE")
    }
}

impl FromStr for TrackIndex {
    type Err = String;

    /// Accepts both `ETTS_CRANESA01` and the older `ETTS_CRANES_A01` spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s.chars().filter(|c| *c != '_').collect();
        TRACK_INDICES
            .iter()
            .find(|(_, name)| name.chars().filter(|c| *c != '_').eq(wanted.chars()))
            .map(|(t, _)| *t)
            .ok_or_else(|| format!("unknown track index: {s}"))
    }
}

impl TryFrom<String> for TrackIndex {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TrackIndex> for String {
    fn from(t: TrackIndex) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for TrackIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a brush combines with level geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsgOper {
    Add,
    Active,
}

impl fmt::Display for CsgOper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CsgOper::Add => "CSG_Add",
            CsgOper::Active => "CSG_Active",
        })
    }
}

// ============================================================================
// Variants
// ============================================================================

/// Brush-derived actor classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrushClass {
    Brush,
    LadderVolume,
    SwingVolume,
    ZiplineVolume,
    BlockingVolume,
    TriggerVolume,
    KillVolume,
}

impl BrushClass {
    pub fn class_name(self) -> &'static str {
        match self {
            BrushClass::Brush => "Brush",
            BrushClass::LadderVolume => "TdLadderVolume",
            BrushClass::SwingVolume => "TdSwingVolume",
            BrushClass::ZiplineVolume => "TdZiplineVolume",
            BrushClass::BlockingVolume => "BlockingVolume",
            BrushClass::TriggerVolume => "TdTriggerVolume",
            BrushClass::KillVolume => "TdKillVolume",
        }
    }

    /// Default object the class archetype points at.
    pub fn package(self) -> &'static str {
        match self {
            BrushClass::Brush => "Engine.Default__Brush",
            BrushClass::LadderVolume => "TdGame.Default__TdLadderVolume",
            BrushClass::SwingVolume => "TdGame.Default__TdSwingVolume",
            BrushClass::ZiplineVolume => "TdGame.Default__TdZiplineVolume",
            BrushClass::BlockingVolume => "Engine.Default__BlockingVolume",
            BrushClass::TriggerVolume => "TdGame.Default__TdTriggerVolume",
            BrushClass::KillVolume => "TdGame.Default__TdKillVolume",
        }
    }

    pub fn default_csg(self) -> CsgOper {
        match self {
            BrushClass::Brush => CsgOper::Add,
            _ => CsgOper::Active,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Brush {
    pub class: BrushClass,
    pub csg_oper: CsgOper,
    /// Name of the brush model, `Model_N`.
    pub model_name: String,
    /// Lines inside the BrushComponent block.
    pub object_settings: Vec<String>,
    /// Class-specific actor property lines.
    pub actor_settings: Vec<String>,
    pub polygons: Vec<Polygon>,
}

impl Brush {
    /// Links are numbered here, so every brush leaves construction with
    /// texture and link already mutually exclusive.
    pub fn new(class: BrushClass, model_name: String, mut polygons: Vec<Polygon>) -> Self {
        assign_links(&mut polygons);
        Brush {
            class,
            csg_oper: class.default_csg(),
            model_name,
            object_settings: vec![],
            actor_settings: vec![],
            polygons,
        }
    }

    pub fn ladder(model_name: String, polygons: Vec<Polygon>, is_pipe: bool) -> Self {
        let mut brush = Self::new(BrushClass::LadderVolume, model_name, polygons);
        if is_pipe {
            brush.actor_settings.push("LadderType=LT_Pipe".to_string());
        }
        brush
    }

    pub fn zipline(
        model_name: String,
        polygons: Vec<Polygon>,
        start: Location,
        middle: Location,
        end: Location,
    ) -> Self {
        let mut brush = Self::new(BrushClass::ZiplineVolume, model_name, polygons);
        brush.actor_settings.extend([
            format!("Start=({start})"),
            format!("End=({end})"),
            format!("Middle=({middle})"),
            "bHideSplineMarkers=False".to_string(),
            "bAllowSplineControl=True".to_string(),
            format!("OldScale=({})", Location::new(1.0, 1.0, 1.0)),
            format!("OldLocation=({start})"),
        ]);
        brush
    }

    pub fn blocking_volume(
        model_name: String,
        polygons: Vec<Polygon>,
        phys_material: Option<&str>,
    ) -> Self {
        let mut brush = Self::new(BrushClass::BlockingVolume, model_name, polygons);
        if let Some(material) = phys_material.filter(|m| !m.is_empty()) {
            brush
                .object_settings
                .push(format!("PhysMaterialOverride=PhysicalMaterial'{material}'"));
        }
        brush
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StaticMesh {
    /// Fully qualified static mesh path.
    pub mesh: String,
    pub material: Option<String>,
    pub hidden_game: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerStart {
    pub is_time_trial: bool,
    pub track_index: TrackIndex,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Checkpoint {
    pub track_index: TrackIndex,
    pub order_index: i32,
    pub no_intermediate_time: bool,
    pub custom_height: f32,
    pub custom_width_scale: f32,
    pub no_respawn: bool,
    pub enabled: bool,
    pub should_be_based: bool,
}

/// Values shared by every light component.
#[derive(Debug, Clone, PartialEq)]
pub struct LightParams {
    pub color: Color,
    pub brightness: f32,
    pub sample_factor: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActorKind {
    Brush(Brush),
    StaticMesh(StaticMesh),
    PlayerStart(PlayerStart),
    Checkpoint(Checkpoint),
    DirectionalLight(LightParams),
    PointLight { light: LightParams, radius: f32 },
    SpotLight { light: LightParams, radius: f32, outer_cone_angle: f32 },
    /// Rectangular extent travels in the actor's DrawScale3D.
    AreaLight { light: LightParams, radius: f32 },
    SkyLight(LightParams),
}

// ============================================================================
// Actor
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    /// Unique instance name, `<Class>_<N>`.
    pub name: String,
    pub location: Location,
    pub rotation: Rotation,
    pub draw_scale_3d: Option<Location>,
    pub kind: ActorKind,
}

impl Actor {
    /// Engine class this actor is instantiated as.
    pub fn class_name(&self) -> &'static str {
        kind_class_name(&self.kind)
    }

    /// Render the actor block.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

/// Class name for a variant, needed before the actor exists to allocate its name.
pub fn kind_class_name(kind: &ActorKind) -> &'static str {
    match kind {
        ActorKind::Brush(brush) => brush.class.class_name(),
        ActorKind::StaticMesh(_) => "StaticMeshActor",
        ActorKind::PlayerStart(start) if start.is_time_trial => "TdTimeTrialStart",
        ActorKind::PlayerStart(_) => "PlayerStart",
        ActorKind::Checkpoint(_) => "TdTimerCheckpoint",
        ActorKind::DirectionalLight(_) => "DirectionalLight",
        ActorKind::PointLight { .. } => "PointLight",
        ActorKind::SpotLight { .. } => "SpotLight",
        ActorKind::AreaLight { .. } => "TdAreaLight",
        ActorKind::SkyLight(_) => "SkyLight",
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ActorKind::Brush(brush) => write_brush(f, self, brush),
            ActorKind::StaticMesh(mesh) => write_static_mesh(f, self, mesh),
            ActorKind::PlayerStart(start) => write_player_start(f, self, start),
            ActorKind::Checkpoint(checkpoint) => write_checkpoint(f, self, checkpoint),
            ActorKind::DirectionalLight(light) => {
                write_actor_header(f, self, "Engine.Default__DirectionalLight")?;
                write_object_header(f, "DirectionalLightComponent", "Engine.Default__DirectionalLight")?;
                write_light_params(f, light)?;
                f.write_str("End Object\n")?;
                write_placement(f, self, true)
            }
            ActorKind::PointLight { light, radius } => {
                write_actor_header(f, self, "Engine.Default__PointLight")?;
                write_object_header(f, "PointLightComponent", "Engine.Default__PointLight")?;
                writeln!(f, "Radius={}", Float(*radius))?;
                write_light_params(f, light)?;
                f.write_str("End Object\n")?;
                write_placement(f, self, false)
            }
            ActorKind::SpotLight { light, radius, outer_cone_angle } => {
                write_actor_header(f, self, "Engine.Default__SpotLight")?;
                write_object_header(f, "SpotLightComponent", "Engine.Default__SpotLight")?;
                writeln!(f, "OuterConeAngle={}", Float(*outer_cone_angle))?;
                writeln!(f, "Radius={}", Float(*radius))?;
                write_light_params(f, light)?;
                f.write_str("End Object\n")?;
                write_placement(f, self, true)
            }
            ActorKind::AreaLight { light, radius } => {
                write_actor_header(f, self, "TdGame.Default__TdAreaLight")?;
                write_object_header(f, "PointLightComponent", "TdGame.Default__TdAreaLight")?;
                writeln!(f, "Radius={}", Float(*radius))?;
                write_light_params(f, light)?;
                f.write_str("End Object\n")?;
                write_placement(f, self, true)
            }
            ActorKind::SkyLight(light) => {
                write_actor_header(f, self, "Engine.Default__SkyLight")?;
                write_object_header(f, "SkyLightComponent", "Engine.Default__SkyLight")?;
                write_light_params(f, light)?;
                f.write_str("End Object\n")?;
                writeln!(f, "Location=({})", self.location)?;
                writeln!(f, "DrawScale={}", Float(3.0))?;
                f.write_str("End Actor\n")
            }
        }
    }
}

// ============================================================================
// Block writers
// ============================================================================

fn write_actor_header(f: &mut fmt::Formatter<'_>, actor: &Actor, package: &str) -> fmt::Result {
    let class = actor.class_name();
    writeln!(
        f,
        "Begin Actor Class={class} Name={} Archetype={class}'{package}'",
        actor.name
    )
}

/// Component objects are always instance `<Class>0` of the actor's default object.
fn write_object_header(f: &mut fmt::Formatter<'_>, class: &str, package: &str) -> fmt::Result {
    writeln!(
        f,
        "Begin Object Class={class} Name={class}0 Archetype={class}'{package}:{class}0'"
    )
}

fn write_light_params(f: &mut fmt::Formatter<'_>, light: &LightParams) -> fmt::Result {
    writeln!(f, "Brightness={}", Float(light.brightness))?;
    writeln!(f, "LightColor=({},A=0)", light.color)?;
    writeln!(f, "SampleFactor={}", Float(light.sample_factor))
}

/// Trailing Location/Rotation/DrawScale3D lines and the closing token.
fn write_placement(f: &mut fmt::Formatter<'_>, actor: &Actor, with_rotation: bool) -> fmt::Result {
    writeln!(f, "Location=({})", actor.location)?;
    if with_rotation {
        writeln!(f, "Rotation=({})", actor.rotation)?;
    }
    if let Some(scale) = &actor.draw_scale_3d {
        writeln!(f, "DrawScale3D=({scale})")?;
    }
    f.write_str("End Actor\n")
}

fn write_brush(f: &mut fmt::Formatter<'_>, actor: &Actor, brush: &Brush) -> fmt::Result {
    let package = brush.class.package();
    write_actor_header(f, actor, package)?;

    writeln!(
        f,
        "Begin Object Class=BrushComponent Name=BrushComponent0 Archetype=BrushComponent'{package}:BrushComponent0'"
    )?;
    for line in &brush.object_settings {
        writeln!(f, "{line}")?;
    }
    f.write_str("End Object\n")?;

    writeln!(f, "Begin Brush Name={}", brush.model_name)?;
    f.write_str("Begin PolyList\n")?;
    for poly in &brush.polygons {
        write!(f, "{poly}")?;
    }
    f.write_str("End PolyList\n")?;
    f.write_str("End Brush\n")?;
    writeln!(f, "Brush=Model'{}'", brush.model_name)?;

    writeln!(f, "CsgOper={}", brush.csg_oper)?;
    for line in &brush.actor_settings {
        writeln!(f, "{line}")?;
    }
    write_placement(f, actor, true)
}

fn write_static_mesh(f: &mut fmt::Formatter<'_>, actor: &Actor, mesh: &StaticMesh) -> fmt::Result {
    write_actor_header(f, actor, "Engine.Default__StaticMeshActor")?;
    write_object_header(f, "StaticMeshComponent", "Engine.Default__StaticMeshActor")?;
    writeln!(f, "StaticMesh=StaticMesh'{}'", mesh.mesh)?;
    writeln!(f, "HiddenGame={}", Flag(mesh.hidden_game))?;
    if let Some(material) = &mesh.material {
        writeln!(f, "Materials(0)=Material'{material}'")?;
    }
    f.write_str("End Object\n")?;
    write_placement(f, actor, true)
}

fn write_player_start(f: &mut fmt::Formatter<'_>, actor: &Actor, start: &PlayerStart) -> fmt::Result {
    if start.is_time_trial {
        write_actor_header(f, actor, "TdGame.Default__TdTimeTrialStart")?;
        f.write_str(
            "Begin Object Class=RequestedTextureResources Name=RequestedTextureResources_0 \
Archetype=RequestedTextureResources'TdGame.Default__TdTimeTrialStart:PlayerStartTextureResourcesObject'\n",
        )?;
        f.write_str("End Object\n")?;
        writeln!(f, "TrackIndex={}", start.track_index)?;
    } else {
        write_actor_header(f, actor, "Engine.Default__PlayerStart")?;
    }
    write_placement(f, actor, true)
}

fn write_checkpoint(f: &mut fmt::Formatter<'_>, actor: &Actor, checkpoint: &Checkpoint) -> fmt::Result {
    write_actor_header(f, actor, "TdGame.Default__TdTimerCheckpoint")?;
    writeln!(
        f,
        "BelongToTracks(0)=(TrackIndex={},OrderIndex={},bNoIntermediateTime={})",
        checkpoint.track_index,
        checkpoint.order_index,
        Flag(checkpoint.no_intermediate_time)
    )?;
    writeln!(f, "CustomHeight={}", Float(checkpoint.custom_height))?;
    writeln!(f, "CustomWidthScale={}", Float(checkpoint.custom_width_scale))?;
    writeln!(f, "bNoRespawn={}", Flag(checkpoint.no_respawn))?;
    writeln!(f, "bEnabled={}", Flag(checkpoint.enabled))?;
    writeln!(f, "bShouldBeBased={}", Flag(checkpoint.should_be_based))?;
    write_placement(f, actor, false)
}

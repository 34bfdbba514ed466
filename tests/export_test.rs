// End-to-end export tests: scene objects in, .t3d text out.

use medge_t3d::builder::{DiagnosticCode, SceneBuilder, Severity};
use medge_t3d::config::{ExportConfig, UnitMode};
use medge_t3d::export::{export, ExportOptions, ExportScope};
use medge_t3d::scene::{ActorType, CollectionNode, SceneSnapshot};
use medge_t3d::t3d::{render_map, ActorKind, MAP_FOOTER, MAP_HEADER};

#[path = "common/mod.rs"]
mod common;

use common::{count, cube_object, empty_object, placed};

fn snapshot(objects: Vec<medge_t3d::scene::SceneObject>) -> SceneSnapshot {
    SceneSnapshot { objects, collections: vec![] }
}

fn render(snapshot: &SceneSnapshot) -> String {
    let config = ExportConfig::default();
    let built = SceneBuilder::new(snapshot, &config, UnitMode::Meters).build_all();
    render_map(&built.actors)
}

#[test]
fn cube_brush_exports_six_linked_quads() {
    let snap = snapshot(vec![cube_object("Cube", ActorType::Brush)]);
    let text = render(&snap);

    assert_eq!(count(&text, "Begin Actor"), 1);
    assert!(text.contains("Begin Actor Class=Brush Name=Brush_0 Archetype=Brush'Engine.Default__Brush'\n"));
    assert!(text.contains("CsgOper=CSG_Add\n"));
    assert_eq!(count(&text, "Begin Polygon"), 6);
    assert_eq!(count(&text, "End Polygon"), 6);
    assert_eq!(count(&text, "\tVertex   "), 24);

    let links: Vec<&str> = text
        .lines()
        .filter(|l| l.starts_with("Begin Polygon"))
        .map(|l| l.rsplit("Link=").next().unwrap())
        .collect();
    assert_eq!(links, vec!["0", "1", "2", "3", "4", "5"]);

    for block in text.split("Begin Polygon").skip(1) {
        let body = block.split("End Polygon").next().unwrap();
        assert_eq!(count(body, "\tVertex   "), 4);
    }
}

#[test]
fn cube_vertices_are_scaled_and_mirrored() {
    let snap = snapshot(vec![cube_object("Cube", ActorType::Brush)]);
    let text = render(&snap);
    // Bottom face [0, 3, 2, 1] reversed starts at vertex 1 = (1, -1, -1).
    assert!(text.contains(
        "Begin Polygon Flags=3584 Link=0\n\tOrigin   100.000000,100.000000,-100.000000\n"
    ));
    assert!(text.contains("\tNormal   0.000000,0.000000,-1.000000\n"));
}

#[test]
fn player_start_location_is_mirrored_on_y() {
    let snap = snapshot(vec![placed(empty_object("Start", ActorType::PlayerStart), 1.0, 2.0, 0.0)]);
    let text = render(&snap);
    assert!(text.contains("Location=(X=100.000000,Y=-200.000000,Z=0.000000)\n"));
    assert!(text.contains("Rotation=(Roll=0,Pitch=0,Yaw=0)\n"));
}

#[test]
fn empty_scene_is_header_and_footer_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.t3d");

    let report = export(&snapshot(vec![]), &path, &ExportOptions::default()).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();

    assert_eq!(written, format!("{MAP_HEADER}{MAP_FOOTER}"));
    assert_eq!(report.files.len(), 1);
    assert_eq!(report.total_actors(), 0);
}

#[test]
fn prefab_without_target_is_skipped_and_reported() {
    let mut broken = empty_object("Crate", ActorType::StaticMesh);
    broken.props.static_mesh.use_prefab = true;
    let snap = snapshot(vec![
        broken,
        placed(empty_object("Start", ActorType::PlayerStart), 1.0, 0.0, 0.0),
        cube_object("Wall", ActorType::Brush),
    ]);

    let config = ExportConfig::default();
    let built = SceneBuilder::new(&snap, &config, UnitMode::Meters).build_all();

    assert_eq!(built.actors.len(), 2);
    assert_eq!(built.actors[0].name, "PlayerStart_0");
    assert_eq!(built.actors[1].name, "Brush_0");
    assert_eq!(built.diagnostics.len(), 1);
    assert_eq!(built.diagnostics[0].object, "Crate");
    assert_eq!(built.diagnostics[0].code, DiagnosticCode::MissingPrefab);
    assert_eq!(built.diagnostics[0].severity, Severity::Error);
}

#[test]
fn every_actor_kind_has_matched_blocks() {
    let mut mesh = placed(empty_object("Crate", ActorType::StaticMesh), 0.0, 0.0, 1.0);
    mesh.props.static_mesh.material = Some("Wood".into());
    let mut blocking = cube_object("Block", ActorType::BlockingVolume);
    blocking.props.blocking_volume.phys_material = Some("Metal".into());
    let snap = snapshot(vec![
        cube_object("Wall", ActorType::Brush),
        cube_object("Ladder", ActorType::Ladder),
        cube_object("Swing", ActorType::Swing),
        blocking,
        cube_object("Trigger", ActorType::TriggerVolume),
        cube_object("Kill", ActorType::KillVolume),
        mesh,
        empty_object("Start", ActorType::PlayerStart),
        empty_object("Check", ActorType::Checkpoint),
        empty_object("Jump", ActorType::Springboard),
    ]);

    let config = ExportConfig::default();
    let built = SceneBuilder::new(&snap, &config, UnitMode::Meters).build_all();
    assert_eq!(built.actors.len(), 10);

    for actor in &built.actors {
        let text = actor.render();
        assert_eq!(count(&text, "Begin Actor"), count(&text, "End Actor"), "{text}");
        assert_eq!(count(&text, "Begin Object"), count(&text, "End Object"), "{text}");
        assert_eq!(count(&text, "Begin Brush"), count(&text, "End Brush"), "{text}");
    }

    let names: Vec<&str> = built.actors.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Brush_0",
            "TdLadderVolume_0",
            "TdSwingVolume_0",
            "BlockingVolume_0",
            "TdTriggerVolume_0",
            "TdKillVolume_0",
            "StaticMeshActor_0",
            "PlayerStart_0",
            "TdTimerCheckpoint_0",
            "StaticMeshActor_1",
        ]
    );

    let models: Vec<&str> = built
        .actors
        .iter()
        .filter_map(|a| match &a.kind {
            ActorKind::Brush(b) => Some(b.model_name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(models, vec!["Model_0", "Model_1", "Model_2", "Model_3", "Model_4", "Model_5"]);
}

#[test]
fn names_restart_for_each_export() {
    let snap = snapshot(vec![cube_object("A", ActorType::Brush), cube_object("B", ActorType::Brush)]);
    let config = ExportConfig::default();
    let builder = SceneBuilder::new(&snap, &config, UnitMode::Meters);
    let first = builder.build_all();
    let second = builder.build_all();
    assert_eq!(first.actors[1].name, "Brush_1");
    assert_eq!(second.actors[0].name, "Brush_0");
}

#[test]
fn native_units_do_not_scale() {
    let snap = snapshot(vec![placed(empty_object("Start", ActorType::PlayerStart), 1.0, 2.0, 3.0)]);
    let config = ExportConfig::default();
    let built = SceneBuilder::new(&snap, &config, UnitMode::Native).build_all();
    assert_eq!(
        built.actors[0].location.to_string(),
        "X=1.000000,Y=-2.000000,Z=3.000000"
    );
}

#[test]
fn selected_collections_write_one_file_each() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("level.t3d");

    let snap = SceneSnapshot {
        objects: vec![
            cube_object("Wall", ActorType::Brush),
            empty_object("Start", ActorType::PlayerStart),
            empty_object("Other", ActorType::PlayerStart),
        ],
        collections: vec![CollectionNode {
            name: "Map".into(),
            selected: false,
            objects: vec!["Other".into()],
            children: vec![
                CollectionNode {
                    name: "Geometry".into(),
                    selected: true,
                    objects: vec!["Wall".into()],
                    children: vec![],
                },
                CollectionNode {
                    name: "Gameplay".into(),
                    selected: true,
                    objects: vec!["Start".into()],
                    children: vec![],
                },
            ],
        }],
    };
    let options = ExportOptions {
        scope: ExportScope::SelectedCollections,
        ..ExportOptions::default()
    };

    let report = export(&snap, &output, &options).unwrap();

    assert_eq!(report.files.len(), 2);
    assert!(!output.exists());
    let geometry = std::fs::read_to_string(dir.path().join("Geometry.t3d")).unwrap();
    let gameplay = std::fs::read_to_string(dir.path().join("Gameplay.t3d")).unwrap();
    assert_eq!(count(&geometry, "Begin Actor Class=Brush"), 1);
    assert_eq!(count(&gameplay, "Begin Actor Class=PlayerStart"), 1);
    assert!(!gameplay.contains("Other"));
}

#[test]
fn unwritable_output_fails_the_export() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("no_such_dir").join("level.t3d");
    let err = export(&snapshot(vec![]), &output, &ExportOptions::default()).unwrap_err();
    assert!(matches!(err, medge_t3d::ExportError::Io(_)));
}

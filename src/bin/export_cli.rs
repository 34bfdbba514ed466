use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use ptree::{print_tree, TreeBuilder};

use medge_t3d::companion::CompanionCommand;
use medge_t3d::scene::{CollectionNode, CollectionPaths};
use medge_t3d::{export, ExportConfig, ExportOptions, ExportScope, SceneSnapshot, UnitMode};

#[derive(Parser)]
#[command(name = "medge-t3d")]
#[command(about = "Export an editor scene snapshot to a Mirror's Edge .t3d map")]
#[command(version)]
struct Cli {
    /// Scene snapshot (.json) written by the editor
    scene: PathBuf,

    /// Output .t3d path; per-collection exports are written next to it
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Length unit of the scene: meters or native
    #[arg(short, long, default_value = "meters")]
    units: UnitMode,

    /// scene, selected-objects or selected-collections
    #[arg(short, long, default_value = "scene")]
    scope: ExportScope,

    /// Extra collection to export with --scope selected-collections (repeatable)
    #[arg(long = "collection")]
    collections: Vec<String>,

    /// Export config (.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Static mesh exporter to run afterwards, e.g. "python3 ase_export.py"
    #[arg(long)]
    static_mesh_exporter: Option<String>,

    /// Print the collection tree with package paths and exit
    #[arg(long)]
    print_collections: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Export failed: {:?}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => ExportConfig::load(path)?,
        None => ExportConfig::default(),
    };
    let snapshot = SceneSnapshot::load(&cli.scene)?;

    if cli.print_collections {
        print_collections(&snapshot.collections, &config.collection_root)?;
        return Ok(ExitCode::SUCCESS);
    }

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.scene.with_extension("t3d"));

    let options = ExportOptions {
        config,
        units: cli.units,
        scope: cli.scope,
        collections: cli.collections,
        companion: cli
            .static_mesh_exporter
            .as_deref()
            .and_then(CompanionCommand::parse),
    };

    eprintln!("Exporting {} ...", cli.scene.display());
    eprintln!("  Output: {}", output.display());
    eprintln!(
        "  Units: {} (scale {})",
        options.units,
        options.config.unit_scale(options.units)
    );
    eprintln!("  Scope: {}", options.scope);

    let report = export(&snapshot, &output, &options)
        .with_context(|| format!("Failed to export {}", output.display()))?;

    eprintln!("Export complete!");
    for file in &report.files {
        eprintln!("  {}: {} actors", file.path.display(), file.actor_count);
    }
    if !report.diagnostics.is_empty() {
        eprintln!(
            "  {} skipped, {} warnings:",
            report.error_count, report.warning_count
        );
        for diagnostic in &report.diagnostics {
            eprintln!("    {}", diagnostic);
        }
    }

    Ok(if report.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    })
}

fn print_collections(collections: &[CollectionNode], root: &str) -> Result<()> {
    let paths = CollectionPaths::build(collections, root);
    let mut tree = TreeBuilder::new("collections".to_string());
    for node in collections {
        add_collection_to_tree(node, &paths, &mut tree);
    }
    print_tree(&tree.build()).context("Failed to print collection tree")?;
    Ok(())
}

fn add_collection_to_tree(node: &CollectionNode, paths: &CollectionPaths, tree: &mut TreeBuilder) {
    let label = if node.selected {
        format!("{} *", node.name)
    } else {
        node.name.clone()
    };
    tree.begin_child(label);
    for obj in &node.objects {
        tree.add_empty_child(paths.qualify(obj));
    }
    for child in &node.children {
        add_collection_to_tree(child, paths, tree);
    }
    tree.end_child();
}

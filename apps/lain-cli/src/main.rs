use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use glam::Vec3;
use lain_assets::ModelCatalog;
use lain_common::{ModelType, Transform};
use lain_editor::{EditorConfig, LevelEditor};
use lain_input::{Action, EditorModeRequest, InputState, Key};
use lain_persist::{LevelFormat, LevelStore};
use lain_render::{DebugTextRenderer, Renderer};
use lain_tools::LevelInspector;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lain-cli", about = "Level editor tooling: inspect, convert and script levels")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Editor config file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding .level files; overrides the config
    #[arg(short, long)]
    levels_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions
    Info,
    /// List stored levels
    List,
    /// Load a level and print its entities
    Inspect {
        /// Level name
        name: String,
    },
    /// Rewrite a level in another format
    Convert {
        /// Level name
        name: String,
        /// Target format
        #[arg(long, value_enum, default_value = "versioned")]
        to: FormatArg,
        /// Name to write; defaults to overwriting the source
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Run a scripted editor session
    Demo {
        /// Number of entities to place
        #[arg(short, long, default_value = "4")]
        entities: usize,
        /// Save the result under this level name
        #[arg(short, long)]
        save: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Legacy,
    Versioned,
}

impl From<FormatArg> for LevelFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Legacy => LevelFormat::Legacy,
            FormatArg::Versioned => LevelFormat::Versioned,
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<EditorConfig> {
    let mut config = match &cli.config {
        Some(path) => EditorConfig::from_json_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => EditorConfig::default(),
    };
    if let Some(dir) = &cli.levels_dir {
        config.levels_dir = dir.clone();
    }
    tracing::debug!(levels_dir = %config.levels_dir.display(), format = %config.save_format, "config resolved");
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = load_config(&cli)?;

    match cli.command {
        Commands::Info => {
            println!("lain-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", lain_common::crate_info());
            println!("geom: {}", lain_geom::crate_info());
            println!("ecs: {}", lain_ecs::crate_info());
            println!("input: {}", lain_input::crate_info());
            println!("assets: {}", lain_assets::crate_info());
            println!("render: {}", lain_render::crate_info());
            println!("persist: {}", lain_persist::crate_info());
            println!("tools: {}", lain_tools::crate_info());
            println!("editor: {}", lain_editor::crate_info());
        }
        Commands::List => {
            let store = LevelStore::new(&config.levels_dir);
            let names = store.list()?;
            if names.is_empty() {
                println!("No levels in {}", store.root().display());
            }
            for name in names {
                let (level, format) = store.load_with_format(&name)?;
                println!("{name}: {} entities, {format}", level.len());
            }
        }
        Commands::Inspect { name } => {
            let format = LevelStore::new(&config.levels_dir)
                .load_with_format(&name)
                .with_context(|| format!("reading level {name}"))?
                .1;
            let mut editor = LevelEditor::new(config, ModelCatalog::with_builtin_shapes());
            editor.load_level(&name)?;

            let registry = editor.registry();
            println!("{name} ({format})");
            println!("{}", LevelInspector::summary(registry));
            for id in LevelInspector::list_entities(registry) {
                if let Some(info) = LevelInspector::inspect_entity(registry, id) {
                    println!("  {info}");
                }
            }
        }
        Commands::Convert { name, to, output } => {
            let store = LevelStore::new(&config.levels_dir);
            let (level, from) = store
                .load_with_format(&name)
                .with_context(|| format!("reading level {name}"))?;
            let target = output.unwrap_or_else(|| name.clone());
            let path = store.save(&target, &level, to.into())?;
            println!(
                "Converted {name} ({from}) -> {target} ({}): {} entities, {}",
                LevelFormat::from(to),
                level.len(),
                path.display()
            );
        }
        Commands::Demo { entities, save } => {
            let mut editor = LevelEditor::new(config, ModelCatalog::with_builtin_shapes());
            println!("Demo session: placing {entities} entities along +X");

            for i in 0..entities {
                let model = if i % 2 == 0 { ModelType::Ball } else { ModelType::Maze };
                editor.apply(Action::AddEntity(model))?;
                editor.apply(Action::SetSelectedTransform(Transform::from_position(Vec3::new(
                    12.0 * (i + 1) as f32,
                    0.0,
                    0.0,
                ))))?;
            }
            editor.apply(Action::Deselect)?;

            // Half a second of holding W at 60 fps.
            let mut input = InputState::new();
            input.set_key(Key::W, true);
            for _ in 0..30 {
                editor.process_input(&input);
                editor.update(1.0 / 60.0);
                input.begin_frame();
            }
            let eye = editor.camera().position;
            println!("Camera flew to ({:.2}, {:.2}, {:.2})", eye.x, eye.y, eye.z);

            editor.apply(Action::SwitchMode(EditorModeRequest::Edit))?;
            editor.apply(Action::ToggleDebugDraw)?;
            let centre = editor.viewport().center();
            match editor.pick_at(centre) {
                Some(id) => println!("Picked {id} through the screen centre"),
                None => println!("Nothing under the screen centre"),
            }
            editor.update(1.0 / 60.0);
            print!("{}", DebugTextRenderer::verbose().render(&editor.render()));

            if let Some(name) = save {
                let path = editor.save_level(&name)?;
                println!("Saved {} entities to {}", editor.registry().len(), path.display());
            }
        }
    }

    Ok(())
}

use crate::config::{Config, load_config};
use crate::editor::Editor;
use crate::layout::{LayoutFrame, compute_connections, compute_layout};
use crate::layout_dump::{LayoutDump, write_layout_dump};
use crate::model::{LayoutKind, NodeId, Size};
use crate::render::{LogNotifier, SvgRenderer, write_output_svg};
use crate::store::FileStore;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mindcanvas", version, about = "Mind-map workspaces from the command line")]
pub struct Args {
    /// Directory holding the workspace store
    #[arg(short = 's', long = "store", global = true)]
    pub store: Option<PathBuf>,

    /// Config file (JSON or JSON5)
    #[arg(short = 'c', long = "configFile", global = true)]
    pub config: Option<PathBuf>,

    /// Canvas width
    #[arg(short = 'w', long = "width", global = true)]
    pub width: Option<f64>,

    /// Canvas height
    #[arg(short = 'H', long = "height", global = true)]
    pub height: Option<f64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List workspaces, most recently modified first
    List,
    /// Create a workspace and make it active
    Create { name: Option<String> },
    /// Make a workspace active
    Switch { id: String },
    /// Rename a workspace
    Rename { id: String, name: String },
    /// Delete a workspace
    Delete { id: String },
    /// Add a node; without --parent it becomes the root
    Add {
        #[arg(short = 'p', long = "parent")]
        parent: Option<u64>,
        text: String,
    },
    /// Remove a node and its subtree
    Remove { node: u64 },
    /// Change a node's text
    Edit { node: u64, text: String },
    /// Apply a layout strategy to the active workspace
    Layout {
        kind: String,
        /// Write computed positions and connections as JSON
        #[arg(long = "dump")]
        dump: Option<PathBuf>,
    },
    /// Render the active workspace
    Render {
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
        #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
        output_format: OutputFormat,
    },
    /// Export the active workspace as JSON
    Export {
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
    /// Import an exported workspace file
    Import { file: PathBuf },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }
    let store_dir = match args.store.clone() {
        Some(dir) => dir,
        None => default_store_dir()?,
    };

    let container = Size::new(config.render.width, config.render.height);
    let renderer = SvgRenderer::new(
        config.theme.clone(),
        config.layout.node.clone(),
        config.render.clone(),
    );
    let mut editor = Editor::open(
        FileStore::new(store_dir),
        renderer,
        LogNotifier,
        config,
        container,
    )?;

    let outcome = execute(&mut editor, args.command);
    editor.end_session()?;
    outcome
}

fn execute(
    editor: &mut Editor<FileStore, SvgRenderer, LogNotifier>,
    command: Command,
) -> Result<()> {
    match command {
        Command::List => {
            for summary in editor.workspaces() {
                let marker = if summary.active { "*" } else { " " };
                println!(
                    "{marker} {}\t{}\t{} nodes",
                    summary.id, summary.name, summary.node_count
                );
            }
        }
        Command::Create { name } => {
            let id = editor.create_workspace(name.as_deref())?;
            println!("{id}");
        }
        Command::Switch { id } => editor.switch_workspace(&id)?,
        Command::Rename { id, name } => editor.rename_workspace(&id, &name)?,
        Command::Delete { id } => editor.delete_workspace(&id)?,
        Command::Add { parent, text } => {
            let id = match parent {
                Some(parent) => editor.add_child(NodeId(parent), &text)?,
                None => editor.add_root(&text)?,
            };
            println!("{id}");
        }
        Command::Remove { node } => {
            let removed = editor.delete_node(NodeId(node))?;
            if removed.is_empty() {
                anyhow::bail!("unknown node {node}");
            }
        }
        Command::Edit { node, text } => editor.edit_text(NodeId(node), &text)?,
        Command::Layout { kind, dump } => {
            let kind = LayoutKind::from_token(&kind).ok_or_else(|| {
                anyhow::anyhow!("unknown layout `{kind}` (free, tree, org, fishbone)")
            })?;
            editor.apply_layout(kind)?;
            if let Some(path) = dump {
                dump_layout(editor, kind, &path)?;
            }
        }
        Command::Render {
            output,
            output_format,
        } => {
            let svg = editor.renderer().to_svg();
            match output_format {
                OutputFormat::Svg => write_output_svg(&svg, output.as_deref())?,
                OutputFormat::Png => write_png(&svg, output.as_deref(), editor.config())?,
            }
        }
        Command::Export { output } => {
            let exported = editor.export_active()?;
            let json = exported.to_json()?;
            let path = output.unwrap_or_else(|| PathBuf::from(&exported.file_name));
            std::fs::write(&path, json)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("{}", path.display());
        }
        Command::Import { file } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let id = editor.import(&raw)?;
            println!("{id}");
        }
    }
    Ok(())
}

fn dump_layout(
    editor: &Editor<FileStore, SvgRenderer, LogNotifier>,
    kind: LayoutKind,
    path: &Path,
) -> Result<()> {
    let working = editor.working();
    let config = editor.config();
    let frame = LayoutFrame::new(editor.container(), working.viewport.pan_zoom());
    let positions = compute_layout(&working.nodes, kind, &config.layout, &frame);
    let connections = compute_connections(&working.nodes, kind, &config.layout.node);
    let dump = LayoutDump::new(&working.nodes, kind, &positions, &connections, &config.layout.node);
    write_layout_dump(path, &dump)
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: Option<&Path>, config: &Config) -> Result<()> {
    let output = output.ok_or_else(|| anyhow::anyhow!("Output path required for png output"))?;
    crate::render::write_output_png(svg, output, &config.render, &config.theme)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: Option<&Path>, _config: &Config) -> Result<()> {
    anyhow::bail!("PNG output requires the `png` feature")
}

fn default_store_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join("mindcanvas"))
        .ok_or_else(|| anyhow::anyhow!("No data directory available; pass --store"))
}

use crate::model::Point;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "osintree")]
#[command(about = "Render and explore hierarchical OSINT reference trees")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Render the tree to a static SVG document
    Render(RenderArgs),

    /// Print the visible part of the tree with pass statistics
    Show(ShowArgs),

    /// Launch the interactive tree viewer
    Serve(ServeArgs),

    /// Generate a starter .osintree.toml configuration file
    Init(InitArgs),
}

/// Tree source plus the initial view state shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct ViewArgs {
    /// Tree JSON file
    pub tree: PathBuf,

    /// Config file (defaults to .osintree.toml next to the tree file)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Expand a node by id (repeatable)
    #[arg(short, long = "expand")]
    pub expand: Vec<String>,

    /// Expand every node that has children
    #[arg(long)]
    pub expand_all: bool,

    /// Expand every ancestor of a node so it becomes visible (repeatable)
    #[arg(long)]
    pub reveal: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct RenderArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    /// Highlight a node as hovered
    #[arg(long)]
    pub hover: Option<String>,

    /// Zoom factor
    #[arg(long, default_value = "1.0")]
    pub zoom: f64,

    /// Pan offset as X,Y
    #[arg(long, value_parser = parse_pan, allow_hyphen_values = true)]
    pub pan: Option<Point>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct ShowArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    /// Output format
    #[arg(short, long, default_value = "markdown")]
    pub format: OutputFormat,

    /// Only list nodes whose name contains this text
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    /// Port for HTTP server
    #[arg(long, default_value = "3000")]
    pub port: u16,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Directory where to create .osintree.toml (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

fn parse_pan(value: &str) -> Result<Point, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{}'", value))?;
    let x: f64 = x
        .trim()
        .parse()
        .map_err(|_| format!("invalid pan x: '{}'", x))?;
    let y: f64 = y
        .trim()
        .parse()
        .map_err(|_| format!("invalid pan y: '{}'", y))?;
    Ok(Point::new(x, y))
}

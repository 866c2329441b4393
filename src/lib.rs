pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod fs;
pub mod interaction;
pub mod layout;
pub mod model;
pub mod palette;
pub mod render;
pub mod server;
pub mod style;
pub mod svg;
pub mod viewport;

pub use api::{
    OsintreeError, ViewOptions, build_view, load_config, load_config_with_fs, load_tree,
    load_tree_with_fs, parse_tree, render_document, render_initial,
};
pub use cli::Cli;
pub use commands::{cmd_init, cmd_render, cmd_serve, cmd_show};
pub use config::Config;
pub use interaction::{Dispatched, Gesture, GestureKind, TreeCallbacks, ViewState};
pub use model::{NodeFlags, Point, TreeIndex, TreeNode};
pub use render::{AdvanceReport, PassReport, RenderError, TreeRenderer};
pub use viewport::Viewport;

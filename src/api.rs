//! Library API for osintree.
//!
//! These functions return proper `Result` types instead of printing and
//! returning exit codes like the CLI commands do.
//!
//! # Example
//!
//! ```no_run
//! use osintree::{ViewOptions, load_tree, render_document};
//! use std::path::Path;
//!
//! let tree = load_tree(Path::new("osint.json"))?;
//! let options = ViewOptions {
//!     expand: vec![tree.id.clone()],
//!     ..Default::default()
//! };
//! let svg = render_document(tree, Default::default(), &options)?;
//! println!("{}", svg);
//! # Ok::<(), osintree::OsintreeError>(())
//! ```

use crate::config::{Config, ConfigError};
use crate::fs::{FileSystem, default_fs};
use crate::interaction::ViewState;
use crate::model::{Point, TreeIndex, TreeNode};
use crate::render::{PassReport, RenderError, TreeRenderer};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Errors that can occur during osintree operations.
#[derive(Debug, Error)]
pub enum OsintreeError {
    /// The specified path could not be found or resolved.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The tree file is not valid tree JSON.
    #[error("Invalid tree JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

/// Initial view state requested by a caller.
#[derive(Debug, Clone)]
pub struct ViewOptions {
    /// Node ids to expand.
    pub expand: Vec<String>,
    /// Expand every node that has children.
    pub expand_all: bool,
    /// Node ids whose ancestors get expanded so they become visible.
    pub reveal: Vec<String>,
    pub hover: Option<String>,
    pub zoom: f64,
    pub pan: Point,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            expand: Vec::new(),
            expand_all: false,
            reveal: Vec::new(),
            hover: None,
            zoom: 1.0,
            pan: Point::default(),
        }
    }
}

/// Read and parse a tree JSON file.
pub fn load_tree(path: &Path) -> Result<TreeNode, OsintreeError> {
    load_tree_with_fs(path, default_fs())
}

pub fn load_tree_with_fs(path: &Path, fs: &dyn FileSystem) -> Result<TreeNode, OsintreeError> {
    if !fs.exists(path) {
        return Err(OsintreeError::PathNotFound(path.to_path_buf()));
    }
    let content = fs.read_to_string(path)?;
    parse_tree(&content)
}

pub fn parse_tree(json: &str) -> Result<TreeNode, OsintreeError> {
    Ok(serde_json::from_str(json)?)
}

/// Load the config for a tree file.
///
/// An explicit path must exist. Otherwise `.osintree.toml` next to the tree
/// file is used when present, and defaults when not.
pub fn load_config(tree_path: &Path, explicit: Option<&Path>) -> Result<Config, OsintreeError> {
    load_config_with_fs(tree_path, explicit, default_fs())
}

pub fn load_config_with_fs(
    tree_path: &Path,
    explicit: Option<&Path>,
    fs: &dyn FileSystem,
) -> Result<Config, OsintreeError> {
    if let Some(path) = explicit {
        if !fs.exists(path) {
            return Err(OsintreeError::PathNotFound(path.to_path_buf()));
        }
        return Ok(Config::from_file(path, fs)?);
    }
    let dir = tree_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    Ok(Config::load(dir, fs)?)
}

/// Turn caller options into a [`ViewState`], resolving reveals against `index`.
pub fn build_view(index: &TreeIndex, options: &ViewOptions) -> ViewState {
    let mut view = ViewState::new();
    view.zoom = options.zoom;
    view.pan = options.pan;
    view.hovered = options.hover.clone();

    if options.expand_all {
        view.expand_all(index);
    }
    for id in &options.expand {
        if !index.contains(id) {
            warn!(%id, "expanding unknown node");
        }
        view.expand(id);
    }
    for id in &options.reveal {
        if !view.reveal(index, id) {
            warn!(%id, "cannot reveal unknown node");
        }
    }
    view
}

/// Build a renderer for `tree` and run the first pass for `options`.
pub fn render_initial(
    tree: TreeNode,
    config: Config,
    options: &ViewOptions,
) -> Result<(TreeRenderer, ViewState, PassReport), OsintreeError> {
    let mut renderer = TreeRenderer::with_tree(tree, config);
    let view = build_view(renderer.index(), options);
    let report = renderer.render(&view)?;
    Ok((renderer, view, report))
}

/// Render `tree` as a complete SVG document.
pub fn render_document(
    tree: TreeNode,
    config: Config,
    options: &ViewOptions,
) -> Result<String, OsintreeError> {
    let (renderer, _, _) = render_initial(tree, config, options)?;
    Ok(crate::svg::render_svg(&renderer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFs;

    const TREE: &str = r#"{
        "id": "root",
        "name": "OSINT Framework",
        "children": [
            {"id": "u", "name": "Username", "children": [
                {"id": "u0", "name": "Namechk", "url": "https://namechk.com", "tool": true}
            ]},
            {"id": "d", "name": "Dark Web", "darkweb": true, "children": []}
        ]
    }"#;

    #[test]
    fn test_load_tree_from_mock_fs() {
        let fs = MockFs::with_files([(Path::new("/data/tree.json"), TREE)]);
        let tree = load_tree_with_fs(Path::new("/data/tree.json"), &fs).unwrap();

        assert_eq!(tree.id, "root");
        assert_eq!(tree.subtree_size(), 4);
        let namechk = &tree.children()[0].children()[0];
        assert!(namechk.flags.tool);
        assert_eq!(namechk.url.as_deref(), Some("https://namechk.com"));
        assert!(!tree.children()[1].has_children());
    }

    #[test]
    fn test_missing_tree_file() {
        let fs = MockFs::new();
        let result = load_tree_with_fs(Path::new("/nope.json"), &fs);
        assert!(matches!(result, Err(OsintreeError::PathNotFound(_))));
    }

    #[test]
    fn test_config_next_to_tree_comes_from_injected_fs() {
        let fs = MockFs::with_files([
            (Path::new("/data/tree.json"), TREE),
            (Path::new("/data/.osintree.toml"), "[layout]\ncolumn_spacing = 150\n"),
        ]);
        let config = load_config_with_fs(Path::new("/data/tree.json"), None, &fs).unwrap();
        assert_eq!(config.layout.column_spacing, 150.0);

        let bare = MockFs::with_files([(Path::new("/data/tree.json"), TREE)]);
        let config = load_config_with_fs(Path::new("/data/tree.json"), None, &bare).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_explicit_config_missing_from_injected_fs() {
        let fs = MockFs::with_files([(Path::new("/data/tree.json"), TREE)]);
        let result = load_config_with_fs(
            Path::new("/data/tree.json"),
            Some(Path::new("/etc/osintree.toml")),
            &fs,
        );
        assert!(matches!(result, Err(OsintreeError::PathNotFound(_))));
    }

    #[test]
    fn test_malformed_tree_json() {
        let result = parse_tree(r#"{"id": "root"}"#);
        assert!(matches!(result, Err(OsintreeError::Json(_))));
    }

    #[test]
    fn test_build_view_reveal_and_expand_all() {
        let tree = parse_tree(TREE).unwrap();
        let index = TreeIndex::build(&tree);

        let view = build_view(
            &index,
            &ViewOptions {
                reveal: vec!["u0".to_string(), "ghost".to_string()],
                ..Default::default()
            },
        );
        assert!(view.is_expanded("root"));
        assert!(view.is_expanded("u"));
        assert!(!view.is_expanded("u0"));

        let all = build_view(
            &index,
            &ViewOptions {
                expand_all: true,
                ..Default::default()
            },
        );
        assert_eq!(all.expanded.len(), 2);
    }

    #[test]
    fn test_render_initial_reports_visible_nodes() {
        let tree = parse_tree(TREE).unwrap();
        let options = ViewOptions {
            expand: vec!["root".to_string(), "u".to_string()],
            ..Default::default()
        };
        let (renderer, _, report) = render_initial(tree, Config::default(), &options).unwrap();

        assert!(report.initial);
        assert_eq!(report.visible_nodes, 4);
        assert_eq!(renderer.scene().edge_count(), 3);
    }

    #[test]
    fn test_render_document_rejects_bad_zoom() {
        let tree = parse_tree(TREE).unwrap();
        let options = ViewOptions {
            zoom: 0.0,
            ..Default::default()
        };
        let result = render_document(tree, Config::default(), &options);
        assert!(matches!(
            result,
            Err(OsintreeError::Render(RenderError::InvalidZoom(_)))
        ));
    }
}

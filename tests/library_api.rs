//! Integration tests for the osintree library API.

use osintree::{
    Config, Gesture, GestureKind, OsintreeError, Point, TreeNode, TreeRenderer, ViewOptions,
    ViewState, load_config, load_tree, render_document,
};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

const TREE: &str = r#"{
    "id": "root",
    "name": "OSINT Framework",
    "children": [
        {
            "id": "user",
            "name": "Username",
            "children": [
                {"id": "namechk", "name": "Namechk", "url": "https://namechk.com", "tool": true},
                {"id": "knowem", "name": "KnowEm", "url": "https://knowem.com", "registration": true},
                {"id": "search", "name": "Search Engines", "children": [
                    {"id": "google", "name": "Google", "url": "https://google.com", "manual": true}
                ]}
            ]
        },
        {"id": "dark", "name": "Dark Web", "darkweb": true, "children": [
            {"id": "tor", "name": "Tor Search", "url": "http://example.onion", "darkweb": true}
        ]},
        {"id": "email", "name": "Email Address"}
    ]
}"#;

fn write_tree(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("osint.json");
    fs::write(&path, TREE).unwrap();
    path
}

#[test]
fn test_load_tree_and_default_config() {
    let dir = TempDir::new().unwrap();
    let path = write_tree(&dir);

    let tree = load_tree(&path).unwrap();
    assert_eq!(tree.subtree_size(), 9);

    let config = load_config(&path, None).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_next_to_tree_is_used() {
    let dir = TempDir::new().unwrap();
    let path = write_tree(&dir);
    fs::write(
        dir.path().join(".osintree.toml"),
        "[layout]\ncolumn_spacing = 300\n\n[canvas]\nwidth = 640\n",
    )
    .unwrap();

    let config = load_config(&path, None).unwrap();
    assert_eq!(config.layout.column_spacing, 300.0);
    assert_eq!(config.canvas.width, 640);
    assert_eq!(config.canvas.height, 800);
}

#[test]
fn test_explicit_config_must_exist() {
    let dir = TempDir::new().unwrap();
    let path = write_tree(&dir);
    let missing = dir.path().join("nope.toml");

    let result = load_config(&path, Some(&missing));
    assert!(matches!(result, Err(OsintreeError::PathNotFound(_))));
}

#[test]
fn test_invalid_config_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = write_tree(&dir);
    fs::write(
        dir.path().join(".osintree.toml"),
        "[layout]\nmin_spacing = 50\nbase_spacing = 35\n",
    )
    .unwrap();

    let result = load_config(&path, None);
    assert!(matches!(result, Err(OsintreeError::Config(_))));
}

#[test]
fn test_load_missing_tree() {
    let result = load_tree(std::path::Path::new("/nonexistent/osint.json"));
    match result {
        Err(OsintreeError::PathNotFound(_)) => {}
        Err(e) => panic!("Expected PathNotFound error, got: {:?}", e),
        Ok(_) => panic!("Expected error for missing tree"),
    }
}

#[test]
fn test_render_document_with_reveal() {
    let dir = TempDir::new().unwrap();
    let tree = load_tree(&write_tree(&dir)).unwrap();

    let svg = render_document(
        tree,
        Config::default(),
        &ViewOptions {
            reveal: vec!["google".to_string()],
            ..Default::default()
        },
    )
    .unwrap();

    assert!(svg.contains("data-id=\"google\""));
    assert!(svg.contains("data-id=\"search\""));
    // Revealing google expands root, user and search only.
    assert!(!svg.contains("data-id=\"tor\""));
    assert_eq!(svg.matches("<circle").count(), 8);
}

/// Drives the renderer through a full browse session the way an interactive
/// front end would.
#[test]
fn test_browse_session() {
    let dir = TempDir::new().unwrap();
    let tree: TreeNode = load_tree(&write_tree(&dir)).unwrap();
    let mut renderer = TreeRenderer::with_tree(tree, Config::default());
    let mut view = ViewState::new().with_expanded(["root"]);

    let first = renderer.render(&view).unwrap();
    assert!(first.initial);
    assert_eq!(first.visible_nodes, 4);

    // Expand the username branch.
    renderer
        .dispatch(&Gesture::new("user", GestureKind::Click), &mut view)
        .unwrap();
    let expanded = renderer.render(&view).unwrap();
    assert_eq!(expanded.stats.created_nodes, 3);
    assert!(renderer.scene().node("namechk").unwrap().is_entering());

    renderer.advance(Duration::from_secs(1));
    assert!(!renderer.is_animating());

    // Hover moves the highlight without a relayout.
    renderer
        .dispatch(&Gesture::new("knowem", GestureKind::Enter), &mut view)
        .unwrap();
    let hovered = renderer.render(&view).unwrap();
    assert!(hovered.hover_changed);
    assert!(!hovered.layout_recomputed);
    assert!(renderer.scene().node("knowem").unwrap().hovered);

    // Collapse, then re-expand before the exit finishes.
    renderer
        .dispatch(&Gesture::new("user", GestureKind::Click), &mut view)
        .unwrap();
    renderer.render(&view).unwrap();
    renderer.advance(Duration::from_millis(120));
    renderer
        .dispatch(&Gesture::new("user", GestureKind::Click), &mut view)
        .unwrap();
    renderer.render(&view).unwrap();
    let later = renderer.advance(Duration::from_secs(2));

    assert_eq!(later.removed_nodes, 0);
    for id in ["namechk", "knowem", "search"] {
        assert!(!renderer.scene().node(id).unwrap().is_exiting(), "{}", id);
    }

    // Zoom leaves every visual untouched.
    let before = renderer.scene().node("search").unwrap().clone();
    view.zoom = 0.5;
    view.pan = Point::new(30.0, 0.0);
    let zoomed = renderer.render(&view).unwrap();
    assert!(!zoomed.layout_recomputed);
    assert_eq!(renderer.scene().node("search").unwrap(), &before);
    assert_eq!(renderer.viewport().transform(), "translate(30, 0) scale(0.5)");
}

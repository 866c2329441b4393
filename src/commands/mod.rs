mod init;
mod render;
mod serve;
mod show;

pub use init::{cmd_init, cmd_init_with_fs};
pub use render::cmd_render;
pub use serve::cmd_serve;
pub use show::{cmd_show, outline_markdown};

use crate::api::{self, ViewOptions};
use crate::cli::ViewArgs;
use crate::config::Config;
use crate::fs::FileSystem;
use crate::model::TreeNode;
use crate::style;
use std::path::PathBuf;

/// Loaded tree and config shared by the tree-reading commands.
pub struct CommandContext {
    pub tree_path: PathBuf,
    pub tree: TreeNode,
    pub config: Config,
}

impl CommandContext {
    /// Load the tree and its config. Returns Err(exit_code) after reporting
    /// the problem.
    pub fn new(args: &ViewArgs, fs: &dyn FileSystem) -> Result<Self, i32> {
        let tree = match api::load_tree_with_fs(&args.tree, fs) {
            Ok(tree) => tree,
            Err(e) => {
                style::error(&format!(
                    "Could not load tree {}: {}",
                    style::path(&args.tree),
                    e
                ));
                return Err(1);
            }
        };

        let config = match api::load_config_with_fs(&args.tree, args.config.as_deref(), fs) {
            Ok(config) => config,
            // An explicitly requested config must load.
            Err(e) if args.config.is_some() => {
                style::error(&format!("Failed to load config: {}", e));
                return Err(1);
            }
            Err(e) => {
                style::warning(&format!("Failed to load config: {}. Using defaults.", e));
                Config::default()
            }
        };

        Ok(Self {
            tree_path: args.tree.clone(),
            tree,
            config,
        })
    }
}

impl From<&ViewArgs> for ViewOptions {
    fn from(args: &ViewArgs) -> Self {
        Self {
            expand: args.expand.clone(),
            expand_all: args.expand_all,
            reveal: args.reveal.clone(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFs;
    use std::path::Path;

    const TREE: &str = r#"{"id": "root", "name": "Root", "children": [{"id": "a", "name": "A"}]}"#;

    fn args(config: Option<&str>) -> ViewArgs {
        ViewArgs {
            tree: PathBuf::from("/data/tree.json"),
            config: config.map(PathBuf::from),
            ..ViewArgs::default()
        }
    }

    #[test]
    fn test_context_reads_config_from_injected_fs() {
        let fs = MockFs::with_files([
            (Path::new("/data/tree.json"), TREE),
            (Path::new("/data/.osintree.toml"), "[canvas]\nheight = 320\n"),
        ]);
        let ctx = CommandContext::new(&args(None), &fs).unwrap();
        assert_eq!(ctx.tree.id, "root");
        assert_eq!(ctx.config.canvas.height, 320);
    }

    #[test]
    fn test_context_falls_back_on_broken_sibling_config() {
        let fs = MockFs::with_files([
            (Path::new("/data/tree.json"), TREE),
            (Path::new("/data/.osintree.toml"), "[layout\n"),
        ]);
        let ctx = CommandContext::new(&args(None), &fs).unwrap();
        assert_eq!(ctx.config, Config::default());
    }

    #[test]
    fn test_context_requires_explicit_config() {
        let fs = MockFs::with_files([(Path::new("/data/tree.json"), TREE)]);
        let result = CommandContext::new(&args(Some("/data/custom.toml")), &fs);
        assert!(matches!(result, Err(1)));
    }
}

use crate::api::{self, ViewOptions};
use crate::cli::RenderArgs;
use crate::fs::{FileSystem, default_fs};
use crate::style;
use crate::svg::render_svg;
use std::io::{self, Write};

use super::CommandContext;

pub fn cmd_render(args: RenderArgs) -> i32 {
    cmd_render_with_fs(args, default_fs())
}

fn cmd_render_with_fs(args: RenderArgs, fs: &dyn FileSystem) -> i32 {
    let ctx = match CommandContext::new(&args.view, fs) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let options = ViewOptions {
        hover: args.hover.clone(),
        zoom: args.zoom,
        pan: args.pan.unwrap_or_default(),
        ..ViewOptions::from(&args.view)
    };

    let (renderer, _, report) = match api::render_initial(ctx.tree, ctx.config, &options) {
        Ok(rendered) => rendered,
        Err(e) => {
            style::error(&e.to_string());
            return 1;
        }
    };
    tracing::info!(
        tree = %ctx.tree_path.display(),
        visible = report.visible_nodes,
        "rendered tree"
    );

    let svg = render_svg(&renderer);
    match args.output {
        Some(path) => {
            if let Err(e) = fs.write(&path, &svg) {
                style::error(&format!("Failed to write output file: {}", e));
                return 1;
            }
            style::success(&format!(
                "Rendered {} nodes to {}",
                report.visible_nodes,
                style::path(&path)
            ));
        }
        None => {
            let mut stdout = io::stdout().lock();
            if let Err(e) = writeln!(stdout, "{}", svg) {
                style::error(&format!("Failed to write output: {}", e));
                return 1;
            }
        }
    }
    0
}

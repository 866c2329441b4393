use crate::api::{self, ViewOptions};
use crate::cli::ServeArgs;
use crate::fs::default_fs;
use crate::render::TreeRenderer;
use crate::server::{Session, serve};
use crate::style;

use super::CommandContext;

pub fn cmd_serve(args: ServeArgs) -> i32 {
    let ctx = match CommandContext::new(&args.view, default_fs()) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let renderer = TreeRenderer::with_tree(ctx.tree, ctx.config);
    let view = api::build_view(renderer.index(), &ViewOptions::from(&args.view));
    let session = Session::new(renderer, view);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            style::error(&format!("Failed to start async runtime: {}", e));
            return 1;
        }
    };

    if let Err(e) = rt.block_on(serve(session, args.port, args.open)) {
        style::error(&format!("Server failed: {}", e));
        return 1;
    }
    0
}

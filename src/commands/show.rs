use crate::api::{self, ViewOptions};
use crate::cli::{OutputFormat, ShowArgs};
use crate::fs::{FileSystem, default_fs};
use crate::model::{NodeFlags, Point};
use crate::render::{PassReport, TreeRenderer};
use crate::style;
use serde::Serialize;
use std::collections::BTreeSet;
use std::io::{self, Write};

use super::CommandContext;

pub fn cmd_show(args: ShowArgs) -> i32 {
    cmd_show_with_fs(args, default_fs(), &mut io::stdout().lock())
}

fn cmd_show_with_fs(args: ShowArgs, fs: &dyn FileSystem, out: &mut dyn Write) -> i32 {
    let ctx = match CommandContext::new(&args.view, fs) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let options = ViewOptions::from(&args.view);
    let (renderer, _, report) = match api::render_initial(ctx.tree, ctx.config, &options) {
        Ok(rendered) => rendered,
        Err(e) => {
            style::error(&e.to_string());
            return 1;
        }
    };

    let matches: Option<BTreeSet<String>> = args
        .search
        .as_deref()
        .map(|q| renderer.index().search(q).into_iter().collect());

    let written = match args.format {
        OutputFormat::Markdown => {
            let markdown = outline_markdown(&renderer, &report, matches.as_ref());
            style::render_markdown(&markdown, out)
        }
        OutputFormat::Json => {
            let listing = Listing::new(&renderer, report, matches.as_ref());
            match serde_json::to_string_pretty(&listing) {
                Ok(json) => writeln!(out, "{}", json),
                Err(e) => {
                    style::error(&format!("Failed to serialize listing: {}", e));
                    return 1;
                }
            }
        }
    };
    if let Err(e) = written {
        style::error(&format!("Failed to write output: {}", e));
        return 1;
    }
    0
}

#[derive(Debug, Serialize)]
struct ListedNode<'a> {
    id: &'a str,
    name: &'a str,
    depth: usize,
    position: Point,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    #[serde(flatten)]
    flags: NodeFlags,
    expanded: bool,
}

#[derive(Debug, Serialize)]
struct Listing<'a> {
    report: PassReport,
    nodes: Vec<ListedNode<'a>>,
}

impl<'a> Listing<'a> {
    fn new(renderer: &'a TreeRenderer, report: PassReport, only: Option<&BTreeSet<String>>) -> Self {
        let nodes = renderer
            .layout()
            .map(|layout| layout.entries())
            .unwrap_or_default()
            .iter()
            .filter(|entry| only.is_none_or(|ids| ids.contains(&entry.id)))
            .filter_map(|entry| {
                let node = renderer.scene().node(&entry.id)?;
                Some(ListedNode {
                    id: &node.id,
                    name: &node.label,
                    depth: entry.depth,
                    position: entry.position,
                    url: node.url.as_deref(),
                    flags: node.flags,
                    expanded: node.expanded,
                })
            })
            .collect();
        Self { report, nodes }
    }
}

fn badges(flags: NodeFlags) -> String {
    let mut out = String::new();
    for (set, name) in [
        (flags.tool, "tool"),
        (flags.registration, "registration"),
        (flags.darkweb, "darkweb"),
        (flags.manual, "manual"),
    ] {
        if set {
            out.push_str(&format!(" `{}`", name));
        }
    }
    out
}

/// Backslash-escape inline markdown metacharacters.
fn escape_markdown(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '*' | '_' | '`' | '~' | '[' | ']' | '|' | '#') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Visible nodes as a nested markdown list, followed by pass statistics.
pub fn outline_markdown(
    renderer: &TreeRenderer,
    report: &PassReport,
    only: Option<&BTreeSet<String>>,
) -> String {
    let mut md = String::new();
    let title = renderer.tree().map(|t| t.name.as_str()).unwrap_or("(no tree)");
    md.push_str(&format!("# {}\n\n", escape_markdown(title)));

    let entries = renderer
        .layout()
        .map(|layout| layout.entries())
        .unwrap_or_default();
    for entry in entries {
        if only.is_some_and(|ids| !ids.contains(&entry.id)) {
            continue;
        }
        let Some(node) = renderer.scene().node(&entry.id) else {
            continue;
        };
        let marker = match (node.expandable, node.expanded) {
            (true, true) => "▾ ",
            (true, false) => "▸ ",
            _ => "",
        };
        md.push_str(&format!(
            "{}- {}**{}**{}",
            "  ".repeat(entry.depth),
            marker,
            escape_markdown(&node.label),
            badges(node.flags)
        ));
        if let Some(url) = &node.url {
            md.push_str(&format!(" *{}*", escape_markdown(url)));
        }
        md.push('\n');
    }

    md.push_str("\n## Pass\n\n");
    md.push_str(&format!("- visible nodes: {}\n", report.visible_nodes));
    md.push_str(&format!("- created: {}\n", report.stats.created_nodes));
    md.push_str(&format!(
        "- branches: {}\n",
        renderer.index().branch_ids().len()
    ));
    md
}

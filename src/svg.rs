//! Static SVG snapshot of a scene at one clock instant.

use crate::config::CanvasSettings;
use crate::model::fmt_coord;
use crate::palette::{GLOW_FILTER, LINK_GLYPH, Palette, SHADOW_FILTER};
use crate::render::{Phase, Scene, TransitionKind, TreeRenderer, VisualEdge, VisualNode};
use crate::viewport::Viewport;
use std::time::Duration;

const NODE_RADIUS: f64 = 6.0;
const LABEL_GAP: f64 = 12.0;

/// Render the renderer's current scene with its own palette and viewport.
pub fn render_svg(renderer: &TreeRenderer) -> String {
    render_scene(
        renderer.scene(),
        renderer.palette(),
        renderer.viewport(),
        &renderer.config().canvas,
        renderer.now(),
    )
}

pub fn render_scene(
    scene: &Scene,
    palette: &Palette,
    viewport: Viewport,
    canvas: &CanvasSettings,
    now: Duration,
) -> String {
    let mut svg = String::new();
    let (width, height) = (canvas.width, canvas.height);

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">"
    ));
    svg.push_str("<defs>");
    svg.push_str(&format!(
        "<filter id=\"{GLOW_FILTER}\" x=\"-50%\" y=\"-50%\" width=\"200%\" height=\"200%\"><feGaussianBlur stdDeviation=\"3\" result=\"blur\"/><feMerge><feMergeNode in=\"blur\"/><feMergeNode in=\"SourceGraphic\"/></feMerge></filter>"
    ));
    svg.push_str(&format!(
        "<filter id=\"{SHADOW_FILTER}\"><feDropShadow dx=\"0\" dy=\"0\" stdDeviation=\"2.5\" flood-color=\"#000\"/></filter>"
    ));
    svg.push_str("</defs>");

    svg.push_str(&format!("<g transform=\"{}\">", viewport.transform()));

    let mut edges: Vec<&VisualEdge> = scene.edges().collect();
    edges.sort_by(|a, b| a.key.cmp(&b.key));
    svg.push_str("<g class=\"links\">");
    for edge in edges {
        svg.push_str(&edge_svg(edge, palette, now));
    }
    svg.push_str("</g>");

    let mut nodes: Vec<&VisualNode> = scene.nodes().collect();
    nodes.sort_by(|a, b| a.id.cmp(&b.id));
    svg.push_str("<g class=\"nodes\">");
    for node in nodes {
        svg.push_str(&node_svg(node, palette, now));
    }
    svg.push_str("</g>");

    svg.push_str("</g></svg>");
    svg
}

fn phase_class(phase: &Phase) -> &'static str {
    match phase {
        Phase::Entering(t) if t.kind == TransitionKind::DrawIn => " drawing",
        Phase::Entering(_) => " entering",
        Phase::Present => "",
        Phase::Exiting(_) => " exiting",
    }
}

fn edge_svg(edge: &VisualEdge, palette: &Palette, now: Duration) -> String {
    // Draw-in reveals the stroke through a normalised dash offset.
    let dash = match edge.phase {
        Phase::Entering(t) if t.kind == TransitionKind::DrawIn => format!(
            " pathLength=\"1\" stroke-dasharray=\"1\" stroke-dashoffset=\"{}\"",
            fmt_coord(1.0 - t.progress(now))
        ),
        _ => String::new(),
    };
    let opacity = match edge.phase {
        Phase::Exiting(_) => edge.phase.opacity(now),
        _ => 1.0,
    };
    format!(
        "<path class=\"link{}\" data-id=\"{}\" d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.5\" opacity=\"{}\"{}/>",
        phase_class(&edge.phase),
        escape_xml(&edge.key.to_string()),
        edge.path,
        palette.edge(),
        fmt_coord(opacity),
        dash
    )
}

fn node_svg(node: &VisualNode, palette: &Palette, now: Duration) -> String {
    let appearance = palette.appearance(node);
    let x = fmt_coord(node.position.x);
    let y = fmt_coord(node.position.y);
    let id = escape_xml(&node.id);

    let mut classes = String::from("node");
    classes.push_str(phase_class(&node.phase));
    if node.expandable {
        classes.push_str(if node.expanded { " open" } else { " closed" });
    }
    if node.hovered {
        classes.push_str(" hovered");
    }

    let mut out = format!(
        "<g class=\"{classes}\" data-id=\"{id}\" transform=\"translate({x},{y})\" opacity=\"{}\">",
        fmt_coord(node.opacity(now))
    );

    let filter = appearance
        .filter
        .map(|f| format!(" filter=\"url(#{f})\""))
        .unwrap_or_default();
    out.push_str(&format!(
        "<circle r=\"{}\" fill=\"{}\"{filter}/>",
        fmt_coord(NODE_RADIUS),
        appearance.fill
    ));

    // Branches carry their label on the left, leaves on the right.
    let (label_x, anchor) = if node.expandable {
        (-LABEL_GAP, "end")
    } else {
        (LABEL_GAP, "start")
    };
    out.push_str(&format!(
        "<text x=\"{}\" dy=\"0.35em\" text-anchor=\"{anchor}\" fill=\"{}\">{}</text>",
        fmt_coord(label_x),
        palette.label(),
        escape_xml(&node.label)
    ));

    if appearance.link_glyph {
        if let Some(url) = &node.url {
            let glyph_x = if node.expandable { LABEL_GAP } else { -LABEL_GAP };
            out.push_str(&format!(
                "<a class=\"link-out\" href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\"><text x=\"{}\" dy=\"0.35em\" text-anchor=\"middle\" fill=\"{}\">{LINK_GLYPH}</text></a>",
                escape_xml(url),
                fmt_coord(glyph_x),
                palette.label()
            ));
        }
    }

    out.push_str("</g>");
    out
}

pub fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::interaction::ViewState;
    use crate::model::{NodeFlags, Point, TreeNode};

    fn renderer() -> TreeRenderer {
        let tree = TreeNode::new("root", "OSINT <Framework>").with_children(vec![
            TreeNode::new("dw", "Dark Web").with_flags(NodeFlags {
                darkweb: true,
                ..NodeFlags::default()
            }),
            TreeNode::new("wb", "Wayback").with_url("https://web.archive.org/?a=1&b=2"),
        ]);
        TreeRenderer::with_tree(tree, Config::default())
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&apos;");
    }

    #[test]
    fn test_document_structure() {
        let mut r = renderer();
        r.render(&ViewState::new().with_expanded(["root"])).unwrap();
        let svg = render_svg(&r);

        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"1200\""));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("<filter id=\"glow\""));
        assert!(svg.contains("<filter id=\"shadow\""));
        assert!(svg.contains("transform=\"translate(0, 0) scale(1)\""));
        assert_eq!(svg.matches("<circle").count(), 3);
        assert_eq!(svg.matches("<path class=\"link").count(), 2);
        assert!(svg.contains("OSINT &lt;Framework&gt;"));
    }

    #[test]
    fn test_flags_and_link_glyph() {
        let mut r = renderer();
        r.render(&ViewState::new().with_expanded(["root"])).unwrap();
        let svg = render_svg(&r);

        assert!(svg.contains("fill=\"#a855f7\" filter=\"url(#shadow)\""));
        assert!(svg.contains("href=\"https://web.archive.org/?a=1&amp;b=2\""));
        assert_eq!(svg.matches(LINK_GLYPH).count(), 1);
    }

    #[test]
    fn test_viewport_and_hover_are_reflected() {
        let mut r = renderer();
        let mut view = ViewState::new().with_expanded(["root"]);
        view.zoom = 2.0;
        view.pan = Point::new(10.0, -5.0);
        view.hovered = Some("wb".to_string());
        r.render(&view).unwrap();
        let svg = render_svg(&r);

        assert!(svg.contains("transform=\"translate(10, -5) scale(2)\""));
        assert!(svg.contains("fill=\"#38bdf8\" filter=\"url(#glow)\""));
        assert!(svg.contains("class=\"node hovered\" data-id=\"wb\""));
    }

    #[test]
    fn test_entering_visuals_carry_transition_state() {
        let mut r = renderer();
        let mut view = ViewState::new();
        r.render(&view).unwrap();
        view.expand("root");
        r.render(&view).unwrap();

        let svg = render_svg(&r);
        assert!(svg.contains("class=\"node entering\" data-id=\"dw\""));
        assert!(svg.contains("class=\"link drawing\""));
        assert!(svg.contains("stroke-dashoffset=\"1\""));

        r.advance(Duration::from_secs(1));
        let settled = render_svg(&r);
        assert!(!settled.contains("entering"));
        assert!(!settled.contains("stroke-dasharray"));
    }

    #[test]
    fn test_exiting_visuals_fade() {
        let mut r = renderer();
        let mut view = ViewState::new().with_expanded(["root"]);
        r.render(&view).unwrap();
        view.collapse("root");
        r.render(&view).unwrap();
        r.advance(Duration::from_millis(150));

        let svg = render_svg(&r);
        assert!(svg.contains("class=\"node exiting\" data-id=\"dw\" transform=\"translate(340,359)\" opacity=\"0.5\""));
    }
}

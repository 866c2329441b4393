//! Attribute-driven node styling.

use crate::config::PaletteSettings;
use crate::model::NodeFlags;
use crate::render::VisualNode;

pub const GLOW_FILTER: &str = "glow";
pub const SHADOW_FILTER: &str = "shadow";
pub const LINK_GLYPH: &str = "\u{2197}";

/// Resolved appearance of one node visual.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appearance<'a> {
    pub fill: &'a str,
    pub filter: Option<&'static str>,
    pub link_glyph: bool,
}

#[derive(Debug, Clone)]
pub struct Palette {
    settings: PaletteSettings,
}

impl Palette {
    pub fn new(settings: PaletteSettings) -> Self {
        Self { settings }
    }

    pub fn edge(&self) -> &str {
        &self.settings.edge
    }

    pub fn label(&self) -> &str {
        &self.settings.label
    }

    pub fn hover(&self) -> &str {
        &self.settings.hover
    }

    /// Body colour for a flag combination.
    ///
    /// Flags are checked in the order tool, registration, darkweb, manual and
    /// the last one set wins.
    pub fn fill(&self, flags: NodeFlags) -> &str {
        let mut fill = self.settings.default.as_str();
        if flags.tool {
            fill = self.settings.tool.as_str();
        }
        if flags.registration {
            fill = self.settings.registration.as_str();
        }
        if flags.darkweb {
            fill = self.settings.darkweb.as_str();
        }
        if flags.manual {
            fill = self.settings.manual.as_str();
        }
        fill
    }

    pub fn appearance(&self, node: &VisualNode) -> Appearance<'_> {
        if node.hovered {
            return Appearance {
                fill: &self.settings.hover,
                filter: Some(GLOW_FILTER),
                link_glyph: node.url.is_some(),
            };
        }
        Appearance {
            fill: self.fill(node.flags),
            filter: node.flags.darkweb.then_some(SHADOW_FILTER),
            link_glyph: node.url.is_some(),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(PaletteSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(tool: bool, registration: bool, darkweb: bool, manual: bool) -> NodeFlags {
        NodeFlags {
            tool,
            registration,
            darkweb,
            manual,
        }
    }

    #[test]
    fn test_single_flags_get_distinct_colours() {
        let palette = Palette::default();
        let colours = [
            palette.fill(flags(false, false, false, false)),
            palette.fill(flags(true, false, false, false)),
            palette.fill(flags(false, true, false, false)),
            palette.fill(flags(false, false, true, false)),
            palette.fill(flags(false, false, false, true)),
        ];
        for (i, a) in colours.iter().enumerate() {
            for b in &colours[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_last_checked_flag_wins() {
        let palette = Palette::default();
        let settings = PaletteSettings::default();

        assert_eq!(palette.fill(flags(true, true, false, false)), settings.registration);
        assert_eq!(palette.fill(flags(true, false, true, false)), settings.darkweb);
        assert_eq!(palette.fill(flags(true, true, true, true)), settings.manual);
    }
}

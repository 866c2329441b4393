use crate::fs::FileSystem;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = ".osintree.toml";

/// Upper bound for every `[animation]` duration.
pub const MAX_ANIMATION: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub layout: LayoutSettings,
    pub animation: AnimationSettings,
    pub palette: PaletteSettings,
    pub canvas: CanvasSettings,
}

/// Constants of the recursive tree layout.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSettings {
    pub column_spacing: f64,
    pub base_spacing: f64,
    pub min_spacing: f64,
    pub max_spacing: f64,
    pub shrink_step: f64,
    pub grow_step: f64,
    pub shrink_above: usize,
    pub grow_at_or_below: usize,
    pub recenter_min_children: usize,
    pub recenter_cap: f64,
    pub origin_x: f64,
    pub origin_y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationSettings {
    pub enter: Duration,
    pub exit: Duration,
    pub draw_in: Duration,
    pub stagger: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaletteSettings {
    pub default: String,
    pub tool: String,
    pub registration: String,
    pub darkweb: String,
    pub manual: String,
    pub hover: String,
    pub edge: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CanvasSettings {
    pub width: u32,
    pub height: u32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            column_spacing: 220.0,
            base_spacing: 35.0,
            min_spacing: 30.0,
            max_spacing: 45.0,
            shrink_step: 0.5,
            grow_step: 2.0,
            shrink_above: 8,
            grow_at_or_below: 5,
            recenter_min_children: 3,
            recenter_cap: 50.0,
            origin_x: 120.0,
            origin_y: 400.0,
        }
    }
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            enter: Duration::from_millis(300),
            exit: Duration::from_millis(300),
            draw_in: Duration::from_millis(500),
            stagger: Duration::from_millis(40),
        }
    }
}

impl Default for PaletteSettings {
    fn default() -> Self {
        Self {
            default: "#64748b".to_string(),
            tool: "#22c55e".to_string(),
            registration: "#eab308".to_string(),
            darkweb: "#a855f7".to_string(),
            manual: "#f97316".to_string(),
            hover: "#38bdf8".to_string(),
            edge: "#475569".to_string(),
            label: "#e2e8f0".to_string(),
        }
    }
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    layout: Option<RawLayout>,
    animation: Option<RawAnimation>,
    palette: Option<RawPalette>,
    canvas: Option<RawCanvas>,
}

#[derive(Debug, Deserialize)]
struct RawLayout {
    column_spacing: Option<f64>,
    base_spacing: Option<f64>,
    min_spacing: Option<f64>,
    max_spacing: Option<f64>,
    shrink_step: Option<f64>,
    grow_step: Option<f64>,
    shrink_above: Option<usize>,
    grow_at_or_below: Option<usize>,
    recenter_min_children: Option<usize>,
    recenter_cap: Option<f64>,
    origin_x: Option<f64>,
    origin_y: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawAnimation {
    enter_ms: Option<u64>,
    exit_ms: Option<u64>,
    draw_in_ms: Option<u64>,
    stagger_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawPalette {
    default: Option<String>,
    tool: Option<String>,
    registration: Option<String>,
    darkweb: Option<String>,
    manual: Option<String>,
    hover: Option<String>,
    edge: Option<String>,
    label: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCanvas {
    width: Option<u32>,
    height: Option<u32>,
}

impl Config {
    /// Load `.osintree.toml` from `dir`, falling back to defaults when absent.
    pub fn load(dir: &Path, fs: &dyn FileSystem) -> Result<Self, ConfigError> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if !fs.exists(&config_path) {
            return Ok(Self::default());
        }

        Self::from_file(&config_path, fs)
    }

    pub fn from_file(path: &Path, fs: &dyn FileSystem) -> Result<Self, ConfigError> {
        let content = fs.read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content)?;
        let defaults = Config::default();

        let layout = match raw.layout {
            Some(l) => {
                let d = defaults.layout;
                LayoutSettings {
                    column_spacing: l.column_spacing.unwrap_or(d.column_spacing),
                    base_spacing: l.base_spacing.unwrap_or(d.base_spacing),
                    min_spacing: l.min_spacing.unwrap_or(d.min_spacing),
                    max_spacing: l.max_spacing.unwrap_or(d.max_spacing),
                    shrink_step: l.shrink_step.unwrap_or(d.shrink_step),
                    grow_step: l.grow_step.unwrap_or(d.grow_step),
                    shrink_above: l.shrink_above.unwrap_or(d.shrink_above),
                    grow_at_or_below: l.grow_at_or_below.unwrap_or(d.grow_at_or_below),
                    recenter_min_children: l
                        .recenter_min_children
                        .unwrap_or(d.recenter_min_children),
                    recenter_cap: l.recenter_cap.unwrap_or(d.recenter_cap),
                    origin_x: l.origin_x.unwrap_or(d.origin_x),
                    origin_y: l.origin_y.unwrap_or(d.origin_y),
                }
            }
            None => defaults.layout,
        };

        let animation = match raw.animation {
            Some(a) => {
                let d = defaults.animation;
                AnimationSettings {
                    enter: a.enter_ms.map(Duration::from_millis).unwrap_or(d.enter),
                    exit: a.exit_ms.map(Duration::from_millis).unwrap_or(d.exit),
                    draw_in: a.draw_in_ms.map(Duration::from_millis).unwrap_or(d.draw_in),
                    stagger: a.stagger_ms.map(Duration::from_millis).unwrap_or(d.stagger),
                }
            }
            None => defaults.animation,
        };

        let palette = match raw.palette {
            Some(p) => {
                let d = defaults.palette;
                PaletteSettings {
                    default: p.default.unwrap_or(d.default),
                    tool: p.tool.unwrap_or(d.tool),
                    registration: p.registration.unwrap_or(d.registration),
                    darkweb: p.darkweb.unwrap_or(d.darkweb),
                    manual: p.manual.unwrap_or(d.manual),
                    hover: p.hover.unwrap_or(d.hover),
                    edge: p.edge.unwrap_or(d.edge),
                    label: p.label.unwrap_or(d.label),
                }
            }
            None => defaults.palette,
        };

        let canvas = match raw.canvas {
            Some(c) => CanvasSettings {
                width: c.width.unwrap_or(defaults.canvas.width),
                height: c.height.unwrap_or(defaults.canvas.height),
            },
            None => defaults.canvas,
        };

        let config = Self {
            layout,
            animation,
            palette,
            canvas,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let l = &self.layout;
        let floats = [
            ("column_spacing", l.column_spacing),
            ("base_spacing", l.base_spacing),
            ("min_spacing", l.min_spacing),
            ("max_spacing", l.max_spacing),
            ("shrink_step", l.shrink_step),
            ("grow_step", l.grow_step),
            ("recenter_cap", l.recenter_cap),
            ("origin_x", l.origin_x),
            ("origin_y", l.origin_y),
        ];
        if let Some((name, value)) = floats.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "layout.{} must be finite, got {}",
                name, value
            )));
        }
        if !(l.min_spacing <= l.base_spacing && l.base_spacing <= l.max_spacing) {
            return Err(ConfigError::Invalid(format!(
                "spacing must satisfy min ({}) <= base ({}) <= max ({})",
                l.min_spacing, l.base_spacing, l.max_spacing
            )));
        }
        if l.min_spacing <= 0.0 || l.column_spacing <= 0.0 {
            return Err(ConfigError::Invalid(
                "spacing values must be positive".to_string(),
            ));
        }
        if l.shrink_step < 0.0 || l.grow_step < 0.0 || l.recenter_cap < 0.0 {
            return Err(ConfigError::Invalid(
                "step and cap values must not be negative".to_string(),
            ));
        }
        let a = &self.animation;
        let durations = [
            ("enter_ms", a.enter),
            ("exit_ms", a.exit),
            ("draw_in_ms", a.draw_in),
            ("stagger_ms", a.stagger),
        ];
        if let Some((name, _)) = durations.iter().find(|(_, d)| *d > MAX_ANIMATION) {
            return Err(ConfigError::Invalid(format!(
                "animation.{} must not exceed {} ms",
                name,
                MAX_ANIMATION.as_millis()
            )));
        }
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(ConfigError::Invalid(
                "canvas dimensions must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Generate a starter config file with the default values spelled out.
pub fn generate_config_template() -> String {
    let d = Config::default();
    format!(
        r#"# osintree configuration

[layout]
# Horizontal distance between a parent and its children
column_spacing = {column}
# Vertical distance between siblings before fan-out adjustment
base_spacing = {base}
min_spacing = {min}
max_spacing = {max}
# Spacing shrinks by shrink_step per child above shrink_above
shrink_step = {shrink}
shrink_above = {shrink_above}
# Spacing grows by grow_step per child below grow_at_or_below
grow_step = {grow}
grow_at_or_below = {grow_below}
# Large child clusters push the parent's anchor down by up to recenter_cap
recenter_min_children = {recenter_min}
recenter_cap = {recenter_cap}
origin_x = {ox}
origin_y = {oy}

[animation]
enter_ms = {enter}
exit_ms = {exit}
draw_in_ms = {draw}
stagger_ms = {stagger}

[palette]
default = "{p_default}"
tool = "{p_tool}"
registration = "{p_reg}"
darkweb = "{p_dark}"
manual = "{p_manual}"
hover = "{p_hover}"
edge = "{p_edge}"
label = "{p_label}"

[canvas]
width = {width}
height = {height}
"#,
        column = d.layout.column_spacing,
        base = d.layout.base_spacing,
        min = d.layout.min_spacing,
        max = d.layout.max_spacing,
        shrink = d.layout.shrink_step,
        shrink_above = d.layout.shrink_above,
        grow = d.layout.grow_step,
        grow_below = d.layout.grow_at_or_below,
        recenter_min = d.layout.recenter_min_children,
        recenter_cap = d.layout.recenter_cap,
        ox = d.layout.origin_x,
        oy = d.layout.origin_y,
        enter = d.animation.enter.as_millis(),
        exit = d.animation.exit.as_millis(),
        draw = d.animation.draw_in.as_millis(),
        stagger = d.animation.stagger.as_millis(),
        p_default = d.palette.default,
        p_tool = d.palette.tool,
        p_reg = d.palette.registration,
        p_dark = d.palette.darkweb,
        p_manual = d.palette.manual,
        p_hover = d.palette.hover,
        p_edge = d.palette.edge,
        p_label = d.palette.label,
        width = d.canvas.width,
        height = d.canvas.height,
    )
}

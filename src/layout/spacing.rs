//! Fan-out dependent spacing rules.

use crate::config::LayoutSettings;

/// Vertical distance between siblings for a parent with `child_count` children.
///
/// Large fan-outs shrink toward `min_spacing`, small ones grow toward
/// `max_spacing`, and counts in between use `base_spacing`.
pub fn child_spacing(child_count: usize, settings: &LayoutSettings) -> f64 {
    let base = settings.base_spacing;
    if child_count > settings.shrink_above {
        let excess = (child_count - settings.shrink_above) as f64;
        (base - excess * settings.shrink_step).max(settings.min_spacing)
    } else if child_count <= settings.grow_at_or_below {
        let deficit = (settings.grow_at_or_below - child_count) as f64;
        (base + deficit * settings.grow_step).min(settings.max_spacing)
    } else {
        base
    }
}

/// Downward shift applied to the anchor of a large child cluster.
///
/// Zero unless the parent has more than `recenter_min_children` children;
/// halved for the root.
pub fn recenter_offset(child_count: usize, level: usize, settings: &LayoutSettings) -> f64 {
    if child_count <= settings.recenter_min_children {
        return 0.0;
    }
    let total_height = child_count as f64 * child_spacing(child_count, settings);
    let offset = (total_height / 3.0).min(settings.recenter_cap);
    if level == 0 { offset / 2.0 } else { offset }
}

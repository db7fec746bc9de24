use std::f32::consts::{FRAC_PI_2, TAU};

use crate::config::RadarConfig;
use crate::ir::RadarEntry;

use super::{AxisLine, GridRing, LabelAnchor, RadarLayout, RadarPoint, TextAlign};

pub const GRID_FRACTIONS: [f32; 5] = [0.2, 0.4, 0.6, 0.8, 1.0];

pub fn compute_radar_layout(entries: &[RadarEntry], config: &RadarConfig) -> RadarLayout {
    let size = config.size.max(1.0);
    let center = (size / 2.0, size / 2.0);
    let radius = size * config.radius_ratio;
    let count = entries.len();

    let mut layout = RadarLayout {
        width: size,
        height: size,
        center,
        radius,
        rings: Vec::new(),
        axes: Vec::new(),
        polygon: Vec::new(),
        points: Vec::new(),
    };
    if count == 0 {
        return layout;
    }

    let step = TAU / count as f32;
    let angles: Vec<f32> = (0..count).map(|i| i as f32 * step - FRAC_PI_2).collect();

    layout.rings = GRID_FRACTIONS
        .iter()
        .map(|&fraction| GridRing {
            fraction,
            points: angles
                .iter()
                .map(|&angle| polar(center, radius * fraction, angle))
                .collect(),
        })
        .collect();

    layout.axes = angles
        .iter()
        .map(|&angle| AxisLine {
            angle,
            start: center,
            end: polar(center, radius, angle),
        })
        .collect();

    let mut clamped = 0usize;
    for (entry, &angle) in entries.iter().zip(&angles) {
        let value = clamp_value(entry.value);
        if value != entry.value {
            clamped += 1;
        }
        let (x, y) = polar(center, radius * value / 100.0, angle);
        layout.points.push(RadarPoint {
            label: entry.label.clone(),
            category: entry.category.clone(),
            value,
            raw_value: entry.value,
            angle,
            x,
            y,
            label_anchor: label_anchor(&entry.label, center, radius, angle, config),
        });
    }
    layout.polygon = layout.points.iter().map(|p| (p.x, p.y)).collect();

    if clamped > 0 {
        tracing::debug!(clamped, "radar values outside 0..=100 were clamped");
    }
    layout
}

fn clamp_value(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

fn polar(center: (f32, f32), distance: f32, angle: f32) -> (f32, f32) {
    (
        center.0 + distance * angle.cos(),
        center.1 + distance * angle.sin(),
    )
}

fn label_anchor(
    label: &str,
    center: (f32, f32),
    radius: f32,
    angle: f32,
    config: &RadarConfig,
) -> LabelAnchor {
    let (x, y) = polar(center, radius + config.label_offset, angle);
    let dx = x - center.0;
    let align = if dx.abs() < config.align_epsilon {
        TextAlign::Middle
    } else if dx > 0.0 {
        TextAlign::Start
    } else {
        TextAlign::End
    };
    LabelAnchor {
        x,
        y,
        align,
        lines: label.split_whitespace().map(str::to_string).collect(),
        line_spacing: config.label_line_spacing,
    }
}

use crate::config::LayoutConfig;
#[cfg(feature = "png")]
use crate::config::RenderConfig;
use crate::layout::{
    CardLayout, DocumentLayout, DocumentView, Layout, RadarLayout, StepTone, TextAlign, TextBlock,
};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

/// Renders any layout. `hovered` only affects radar charts.
pub fn render_svg(
    layout: &Layout,
    hovered: Option<usize>,
    theme: &Theme,
    config: &LayoutConfig,
) -> String {
    match layout {
        Layout::Radar(radar) => render_radar_svg(radar, hovered, theme, config),
        Layout::Document(view) => render_document_svg(view, theme, config),
    }
}

pub fn render_radar_svg(
    layout: &RadarLayout,
    hovered: Option<usize>,
    theme: &Theme,
    config: &LayoutConfig,
) -> String {
    let theme = &escaped_theme(theme);
    let radar = &config.radar;
    let hovered = hovered.filter(|idx| *idx < layout.points.len());
    let mut svg = open_svg(layout.width, layout.height, theme);

    for ring in &layout.rings {
        svg.push_str(&format!(
            "<polygon points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1\"/>",
            points_attr(&ring.points),
            theme.grid_color
        ));
    }

    for axis in &layout.axes {
        svg.push_str(&format!(
            "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"1\"/>",
            axis.start.0, axis.start.1, axis.end.0, axis.end.1, theme.axis_color
        ));
    }

    if !layout.polygon.is_empty() {
        svg.push_str(&format!(
            "<path d=\"{} Z\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\" stroke-linejoin=\"round\"/>",
            points_to_path(&layout.polygon),
            theme.accent_fill,
            theme.accent_color,
            radar.polygon_stroke_width
        ));
    }

    for (idx, point) in layout.points.iter().enumerate() {
        let active = hovered == Some(idx);
        let (r, fill) = if active {
            (radar.hovered_marker_radius, theme.accent_color.as_str())
        } else {
            (radar.marker_radius, theme.marker_fill.as_str())
        };
        svg.push_str(&format!(
            "<circle data-index=\"{idx}\" cx=\"{:.2}\" cy=\"{:.2}\" r=\"{r}\" fill=\"{fill}\" stroke=\"{}\" stroke-width=\"{}\"/>",
            point.x, point.y, theme.accent_color, radar.marker_stroke_width
        ));
    }

    for (idx, point) in layout.points.iter().enumerate() {
        let anchor = &point.label_anchor;
        let fill = if hovered == Some(idx) {
            &theme.accent_color
        } else {
            &theme.muted_text_color
        };
        svg.push_str(&format!(
            "<text x=\"{x:.2}\" y=\"{:.2}\" text-anchor=\"{}\" dominant-baseline=\"middle\" font-family=\"{}\" font-size=\"{}\" font-weight=\"900\" fill=\"{fill}\">",
            anchor.y,
            anchor.align.as_svg(),
            theme.font_family,
            radar.label_font_size,
            x = anchor.x,
        ));
        for (line_idx, word) in anchor.lines.iter().enumerate() {
            let dy = if line_idx == 0 { 0.0 } else { anchor.line_spacing };
            svg.push_str(&format!(
                "<tspan x=\"{:.2}\" dy=\"{dy}\">{}</tspan>",
                anchor.x,
                escape_xml(word)
            ));
        }
        svg.push_str("</text>");
    }

    if let Some(point) = hovered.map(|idx| &layout.points[idx]) {
        let (cx, cy) = layout.center;
        let x = cx - radar.panel_width / 2.0;
        let y = cy - radar.panel_height / 2.0;
        svg.push_str(&format!(
            "<g class=\"detail-panel\"><rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{}\" height=\"{}\" rx=\"12\" ry=\"12\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1\"/>",
            radar.panel_width, radar.panel_height, theme.panel_fill, theme.accent_color
        ));
        let rows = [
            (8.0, &theme.accent_color, point.category.clone(), y + 20.0),
            (14.0, &theme.text_color, point.label.clone(), y + 42.0),
            (24.0, &theme.accent_color, format!("{}%", point.raw_value), y + 72.0),
        ];
        for (size, color, text, baseline) in rows {
            svg.push_str(&format!(
                "<text x=\"{cx:.2}\" y=\"{baseline:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{size}\" font-weight=\"900\" fill=\"{color}\">{}</text>",
                theme.font_family,
                escape_xml(&text)
            ));
        }
        svg.push_str("</g>");
    }

    svg.push_str("</svg>");
    svg
}

pub fn render_document_svg(view: &DocumentView, theme: &Theme, config: &LayoutConfig) -> String {
    let theme = &escaped_theme(theme);
    match view {
        DocumentView::Empty {
            message,
            width,
            height,
        } => {
            let mut svg = open_svg(*width, *height, theme);
            svg.push_str(&format!(
                "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"middle\" font-family=\"{}\" font-size=\"{}\" font-weight=\"700\" fill=\"{}\">{}</text>",
                width / 2.0,
                height / 2.0,
                theme.font_family,
                theme.font_size,
                theme.muted_text_color,
                escape_xml(message)
            ));
            svg.push_str("</svg>");
            svg
        }
        DocumentView::Tree(layout) => render_tree(layout, theme, config),
    }
}

fn render_tree(layout: &DocumentLayout, theme: &Theme, config: &LayoutConfig) -> String {
    let tree = &config.tree;
    let mut svg = open_svg(layout.width, layout.height, theme);

    for connector in &layout.connectors {
        svg.push_str(&format!(
            "<path d=\"M {:.2} {:.2} C {:.2} {:.2}, {:.2} {:.2}, {:.2} {:.2}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\"/>",
            connector.from.0,
            connector.from.1,
            connector.control1.0,
            connector.control1.1,
            connector.control2.0,
            connector.control2.1,
            connector.to.0,
            connector.to.1,
            theme.connector_color
        ));
    }

    let root = &layout.root;
    let root_cx = root.x + root.width / 2.0;
    svg.push_str(&format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"16\" ry=\"16\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1.4\"/>",
        root.x, root.y, root.width, root.height, theme.card_fill, theme.accent_color
    ));
    let caption_top = root.y + tree.root_padding_y;
    push_text(
        &mut svg,
        TextRun {
            x: root_cx,
            top: caption_top,
            lines: std::slice::from_ref(&root.caption),
            font_size: tree.caption_font_size,
            align: TextAlign::Middle,
            fill: &theme.accent_color,
            weight: 900,
        },
        theme,
        config,
    );
    let title_top = caption_top + tree.caption_font_size * config.label_line_height + 4.0;
    push_block(
        &mut svg,
        root_cx,
        title_top,
        &root.title,
        tree.title_font_size,
        TextAlign::Middle,
        &theme.text_color,
        theme,
        config,
    );

    for card in &layout.cards {
        render_card(&mut svg, card, theme, config);
    }

    svg.push_str("</svg>");
    svg
}

fn render_card(svg: &mut String, card: &CardLayout, theme: &Theme, config: &LayoutConfig) {
    let tree = &config.tree;
    svg.push_str(&format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{r}\" ry=\"{r}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1\"/>",
        card.x,
        card.y,
        card.width,
        card.height,
        theme.card_fill,
        theme.card_border,
        r = tree.card_radius
    ));

    let badge_x = card.x + tree.card_padding;
    let badge_y = card.y + tree.card_padding;
    let size = tree.index_badge_size;
    svg.push_str(&format!(
        "<rect x=\"{badge_x:.2}\" y=\"{badge_y:.2}\" width=\"{size}\" height=\"{size}\" rx=\"8\" ry=\"8\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1\"/>",
        theme.accent_fill, theme.accent_color
    ));
    svg.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"{}\" font-weight=\"900\" fill=\"{}\">{}</text>",
        badge_x + size / 2.0,
        badge_y + size / 2.0,
        theme.font_family,
        theme.font_size,
        theme.accent_color,
        card.index
    ));

    push_block(
        svg,
        badge_x,
        card.name_y,
        &card.name,
        tree.name_font_size,
        TextAlign::Start,
        &theme.text_color,
        theme,
        config,
    );

    let badge = tree.step_badge_size;
    for step in &card.steps {
        let color = tone_color(step.tone, theme);
        let cx = step.x + badge / 2.0;
        let cy = step.y + badge / 2.0;
        svg.push_str(&format!(
            "<circle cx=\"{cx:.2}\" cy=\"{cy:.2}\" r=\"{:.2}\" fill=\"{color}\" fill-opacity=\"0.1\" stroke=\"{color}\" stroke-opacity=\"0.4\" stroke-width=\"1\"/>",
            badge / 2.0
        ));
        svg.push_str(&format!(
            "<text x=\"{cx:.2}\" y=\"{cy:.2}\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"{}\" font-weight=\"900\" fill=\"{color}\">{}</text>",
            theme.font_family,
            tree.caption_font_size,
            escape_xml(&step.badge)
        ));
        let caption = step.keyword.to_uppercase();
        push_text(
            svg,
            TextRun {
                x: step.text_x,
                top: step.caption_y,
                lines: std::slice::from_ref(&caption),
                font_size: tree.caption_font_size,
                align: TextAlign::Start,
                fill: &theme.muted_text_color,
                weight: 900,
            },
            theme,
            config,
        );
        push_block(
            svg,
            step.text_x,
            step.text_y,
            &step.text,
            tree.step_font_size,
            TextAlign::Start,
            &theme.text_color,
            theme,
            config,
        );
    }
}

fn tone_color(tone: StepTone, theme: &Theme) -> &str {
    match tone {
        StepTone::Given => &theme.given_color,
        StepTone::When => &theme.when_color,
        StepTone::Then => &theme.then_color,
        StepTone::Neutral => &theme.neutral_step_color,
    }
}

struct TextRun<'a> {
    x: f32,
    top: f32,
    lines: &'a [String],
    font_size: f32,
    align: TextAlign,
    fill: &'a str,
    weight: u16,
}

#[allow(clippy::too_many_arguments)]
fn push_block(
    svg: &mut String,
    x: f32,
    top: f32,
    block: &TextBlock,
    font_size: f32,
    align: TextAlign,
    fill: &str,
    theme: &Theme,
    config: &LayoutConfig,
) {
    push_text(
        svg,
        TextRun {
            x,
            top,
            lines: &block.lines,
            font_size,
            align,
            fill,
            weight: 500,
        },
        theme,
        config,
    );
}

fn push_text(svg: &mut String, run: TextRun<'_>, theme: &Theme, config: &LayoutConfig) {
    let baseline = run.top + run.font_size;
    let line_step = run.font_size * config.label_line_height;
    svg.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{baseline:.2}\" text-anchor=\"{}\" font-family=\"{}\" font-size=\"{}\" font-weight=\"{}\" fill=\"{}\">",
        run.x,
        run.align.as_svg(),
        theme.font_family,
        run.font_size,
        run.weight,
        run.fill
    ));
    for (idx, line) in run.lines.iter().enumerate() {
        let dy = if idx == 0 { 0.0 } else { line_step };
        svg.push_str(&format!(
            "<tspan x=\"{:.2}\" dy=\"{dy:.2}\">{}</tspan>",
            run.x,
            escape_xml(line)
        ));
    }
    svg.push_str("</text>");
}

/// Theme values land in attributes, so user-supplied colours are escaped once here.
fn escaped_theme(theme: &Theme) -> Theme {
    let mut safe = theme.clone();
    for field in [
        &mut safe.font_family,
        &mut safe.background,
        &mut safe.text_color,
        &mut safe.muted_text_color,
        &mut safe.accent_color,
        &mut safe.accent_fill,
        &mut safe.grid_color,
        &mut safe.axis_color,
        &mut safe.marker_fill,
        &mut safe.card_fill,
        &mut safe.card_border,
        &mut safe.connector_color,
        &mut safe.given_color,
        &mut safe.when_color,
        &mut safe.then_color,
        &mut safe.neutral_step_color,
        &mut safe.panel_fill,
    ] {
        *field = escape_xml(field);
    }
    safe
}

fn open_svg(width: f32, height: f32, theme: &Theme) -> String {
    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">"
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));
    svg
}

fn points_attr(points: &[(f32, f32)]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("{x:.2},{y:.2}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn points_to_path(points: &[(f32, f32)]) -> String {
    if points.is_empty() {
        return String::new();
    }
    let mut d = String::new();
    d.push_str(&format!("M {:.2} {:.2}", points[0].0, points[0].1));
    for point in points.iter().skip(1) {
        d.push_str(&format!(" L {:.2} {:.2}", point.0, point.1));
    }
    d
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "Inter".to_string();
    if let Some(size) = usvg::Size::from_wh(render_cfg.width, render_cfg.height) {
        opt.default_size = size;
    }

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    if let Some(color) = parse_hex_color(&render_cfg.background) {
        pixmap.fill(color);
    }
    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

/// `#rgb`, `#rrggbb` or `#rrggbbaa`.
#[cfg(feature = "png")]
fn parse_hex_color(value: &str) -> Option<resvg::tiny_skia::Color> {
    let hex = value.trim().strip_prefix('#')?;
    let channel = |i: usize, len: usize| u8::from_str_radix(hex.get(i..i + len)?, 16).ok();
    let (r, g, b, a) = match hex.len() {
        3 => {
            let short = |i| channel(i, 1).map(|v| v * 17);
            (short(0)?, short(1)?, short(2)?, 255)
        }
        6 => (channel(0, 2)?, channel(2, 2)?, channel(4, 2)?, 255),
        8 => (channel(0, 2)?, channel(2, 2)?, channel(4, 2)?, channel(6, 2)?),
        _ => return None,
    };
    Some(resvg::tiny_skia::Color::from_rgba8(r, g, b, a))
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

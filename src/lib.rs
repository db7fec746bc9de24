#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod generate;
pub mod input;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod text_metrics;
pub mod theme;
pub mod view;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, load_config};
pub use ir::{Group, ParsedDocument, RadarEntry, Step, StepKeyword};
pub use layout::{Diagram, DocumentView, Layout, RadarLayout, compute_layout};
pub use parser::parse_document;
pub use render::render_svg;
pub use theme::Theme;

/// Theme plus layout settings for the one-call render helpers.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub theme: Theme,
    pub layout: LayoutConfig,
}

impl RenderOptions {
    pub fn cyber() -> Self {
        Self {
            theme: Theme::cyber(),
            layout: LayoutConfig::default(),
        }
    }

    pub fn light() -> Self {
        Self {
            theme: Theme::light(),
            layout: LayoutConfig::default(),
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::cyber()
    }
}

/// Parses Gherkin-like text and renders it as a tree (or the empty state).
pub fn render_gherkin(text: &str, options: &RenderOptions) -> String {
    let diagram = Diagram::Document(parse_document(text));
    let layout = compute_layout(&diagram, &options.theme, &options.layout);
    render_svg(&layout, None, &options.theme, &options.layout)
}

pub fn render_radar(entries: &[RadarEntry], hovered: Option<usize>, options: &RenderOptions) -> String {
    let layout = layout::compute_radar_layout(entries, &options.layout.radar);
    render::render_radar_svg(&layout, hovered, &options.theme, &options.layout)
}

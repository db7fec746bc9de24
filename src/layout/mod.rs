mod radar;
mod text;
mod tree;
pub(crate) mod types;
pub use radar::{GRID_FRACTIONS, compute_radar_layout};
pub use tree::compute_document_layout;
pub use types::*;

use crate::config::LayoutConfig;
use crate::ir::{ParsedDocument, RadarEntry};
use crate::theme::Theme;
use serde::Serialize;

/// Input for a single drawing.
#[derive(Debug, Clone)]
pub enum Diagram {
    Radar(Vec<RadarEntry>),
    Document(ParsedDocument),
}

#[derive(Debug, Clone, Serialize)]
pub enum Layout {
    Radar(RadarLayout),
    Document(DocumentView),
}

impl Layout {
    pub fn size(&self) -> (f32, f32) {
        match self {
            Self::Radar(radar) => (radar.width, radar.height),
            Self::Document(view) => view.size(),
        }
    }
}

pub fn compute_layout(diagram: &Diagram, theme: &Theme, config: &LayoutConfig) -> Layout {
    match diagram {
        Diagram::Radar(entries) => Layout::Radar(compute_radar_layout(entries, &config.radar)),
        Diagram::Document(doc) => Layout::Document(compute_document_layout(doc, theme, config)),
    }
}

use serde::Serialize;

use crate::ir::StepKeyword;

#[derive(Debug, Clone, Serialize)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextAlign {
    Start,
    Middle,
    End,
}

impl TextAlign {
    pub fn as_svg(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GridRing {
    pub fraction: f32,
    pub points: Vec<(f32, f32)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AxisLine {
    pub angle: f32,
    pub start: (f32, f32),
    pub end: (f32, f32),
}

#[derive(Debug, Clone, Serialize)]
pub struct LabelAnchor {
    pub x: f32,
    pub y: f32,
    pub align: TextAlign,
    /// One entry per whitespace-separated word, stacked downwards.
    pub lines: Vec<String>,
    pub line_spacing: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RadarPoint {
    pub label: String,
    pub category: String,
    /// Value after clamping to 0..=100.
    pub value: f32,
    pub raw_value: f32,
    pub angle: f32,
    pub x: f32,
    pub y: f32,
    pub label_anchor: LabelAnchor,
}

#[derive(Debug, Clone, Serialize)]
pub struct RadarLayout {
    pub width: f32,
    pub height: f32,
    pub center: (f32, f32),
    pub radius: f32,
    pub rings: Vec<GridRing>,
    pub axes: Vec<AxisLine>,
    pub polygon: Vec<(f32, f32)>,
    pub points: Vec<RadarPoint>,
}

impl RadarLayout {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StepTone {
    Given,
    When,
    Then,
    Neutral,
}

impl StepTone {
    pub fn from_keyword(keyword: Option<StepKeyword>) -> Self {
        match keyword {
            Some(StepKeyword::Given) => Self::Given,
            Some(StepKeyword::When) => Self::When,
            Some(StepKeyword::Then) => Self::Then,
            _ => Self::Neutral,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RootBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub caption: String,
    pub title: TextBlock,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepRow {
    pub x: f32,
    pub y: f32,
    pub badge: String,
    pub keyword: String,
    pub text: TextBlock,
    pub tone: StepTone,
    pub height: f32,
    pub text_x: f32,
    pub caption_y: f32,
    pub text_y: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardLayout {
    pub index: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub name: TextBlock,
    pub name_y: f32,
    pub steps: Vec<StepRow>,
}

/// Cubic curve from the root box to a card: start, two controls, end.
#[derive(Debug, Clone, Serialize)]
pub struct Connector {
    pub from: (f32, f32),
    pub control1: (f32, f32),
    pub control2: (f32, f32),
    pub to: (f32, f32),
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentLayout {
    pub width: f32,
    pub height: f32,
    pub root: RootBox,
    pub cards: Vec<CardLayout>,
    pub connectors: Vec<Connector>,
}

#[derive(Debug, Clone, Serialize)]
pub enum DocumentView {
    Empty {
        message: String,
        width: f32,
        height: f32,
    },
    Tree(DocumentLayout),
}

impl DocumentView {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }

    pub fn size(&self) -> (f32, f32) {
        match self {
            Self::Empty { width, height, .. } => (*width, *height),
            Self::Tree(layout) => (layout.width, layout.height),
        }
    }
}

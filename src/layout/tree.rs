use crate::config::LayoutConfig;
use crate::ir::{Group, ParsedDocument};
use crate::theme::Theme;

use super::text::{measure_wrapped, text_width};
use super::{CardLayout, Connector, DocumentLayout, DocumentView, RootBox, StepRow, StepTone};

const BADGE_TEXT_GAP: f32 = 16.0;
const CAPTION_GAP: f32 = 4.0;

pub fn compute_document_layout(
    doc: &ParsedDocument,
    theme: &Theme,
    config: &LayoutConfig,
) -> DocumentView {
    let tree = &config.tree;
    if doc.is_empty() {
        return DocumentView::Empty {
            message: tree.empty_message.clone(),
            width: tree.min_width,
            height: tree.empty_height,
        };
    }

    let count = doc.groups.len();
    let row_width = count as f32 * tree.card_width + (count - 1) as f32 * tree.card_gap;
    let width = tree.min_width.max(row_width + tree.padding * 2.0);

    let root = root_box(&doc.title, width, theme, config);
    let cards_y = root.y + root.height + tree.rank_gap;
    let row_x = (width - row_width) / 2.0;

    let cards: Vec<CardLayout> = doc
        .groups
        .iter()
        .enumerate()
        .map(|(idx, group)| {
            let x = row_x + idx as f32 * (tree.card_width + tree.card_gap);
            card_layout(idx, group, x, cards_y, theme, config)
        })
        .collect();

    let from = (width / 2.0, root.y + root.height);
    let connectors = cards
        .iter()
        .map(|card| {
            let to = (card.x + card.width / 2.0, card.y);
            let mid_y = from.1 + (to.1 - from.1) / 2.0;
            Connector {
                from,
                control1: (from.0, mid_y),
                control2: (to.0, mid_y),
                to,
            }
        })
        .collect();

    let tallest = cards.iter().map(|card| card.height).fold(0.0, f32::max);
    let height = cards_y + tallest + tree.padding;

    tracing::debug!(cards = count, width, height, "computed document tree layout");
    DocumentView::Tree(DocumentLayout {
        width,
        height,
        root,
        cards,
        connectors,
    })
}

fn root_box(title: &str, canvas_width: f32, theme: &Theme, config: &LayoutConfig) -> RootBox {
    let tree = &config.tree;
    let inner_max = (tree.root_max_width - tree.root_padding_x * 2.0).max(1.0);
    let title_block = measure_wrapped(
        title,
        tree.title_font_size,
        inner_max,
        &theme.font_family,
        config,
    );
    let caption_width = text_width(
        &tree.root_caption,
        tree.caption_font_size,
        &theme.font_family,
        config.fast_text_metrics,
    );
    let caption_height = tree.caption_font_size * config.label_line_height;
    let content_width = title_block.width.max(caption_width).min(inner_max);
    let width = content_width + tree.root_padding_x * 2.0;
    let height = tree.root_padding_y * 2.0 + caption_height + CAPTION_GAP + title_block.height;
    RootBox {
        x: (canvas_width - width) / 2.0,
        y: tree.padding,
        width,
        height,
        caption: tree.root_caption.clone(),
        title: title_block,
    }
}

fn card_layout(
    index: usize,
    group: &Group,
    x: f32,
    y: f32,
    theme: &Theme,
    config: &LayoutConfig,
) -> CardLayout {
    let tree = &config.tree;
    let inner_x = x + tree.card_padding;
    let inner_width = (tree.card_width - tree.card_padding * 2.0).max(1.0);

    let name_y = y + tree.card_padding + tree.index_badge_size + tree.section_gap;
    let name = measure_wrapped(
        &group.name,
        tree.name_font_size,
        inner_width,
        &theme.font_family,
        config,
    );

    let caption_height = tree.caption_font_size * config.label_line_height;
    let text_x = inner_x + tree.step_badge_size + BADGE_TEXT_GAP;
    let text_width_max = (inner_width - tree.step_badge_size - BADGE_TEXT_GAP).max(1.0);

    let mut cursor = name_y + name.height + tree.section_gap;
    let mut steps = Vec::with_capacity(group.steps.len());
    for (idx, step) in group.steps.iter().enumerate() {
        if idx > 0 {
            cursor += tree.step_gap;
        }
        let text = measure_wrapped(
            &step.text,
            tree.step_font_size,
            text_width_max,
            &theme.font_family,
            config,
        );
        let height = tree
            .step_badge_size
            .max(caption_height + CAPTION_GAP + text.height);
        let badge = step
            .keyword
            .chars()
            .next()
            .map(|ch| ch.to_uppercase().to_string())
            .unwrap_or_default();
        steps.push(StepRow {
            x: inner_x,
            y: cursor,
            badge,
            keyword: step.keyword.clone(),
            tone: StepTone::from_keyword(step.kind()),
            height,
            text_x,
            caption_y: cursor,
            text_y: cursor + caption_height + CAPTION_GAP,
            text,
        });
        cursor += height;
    }

    CardLayout {
        index: index + 1,
        x,
        y,
        width: tree.card_width,
        height: cursor + tree.card_padding - y,
        name,
        name_y,
        steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_document;

    fn fast_config() -> LayoutConfig {
        LayoutConfig {
            fast_text_metrics: true,
            ..Default::default()
        }
    }

    fn layout_of(input: &str) -> DocumentView {
        compute_document_layout(&parse_document(input), &Theme::cyber(), &fast_config())
    }

    #[test]
    fn empty_document_is_an_explicit_state() {
        let view = layout_of("Feature: Only a title\nGiven nothing");
        match view {
            DocumentView::Empty { message, .. } => {
                assert_eq!(message, "No valid Gherkin found for visualization")
            }
            DocumentView::Tree(_) => panic!("expected empty view"),
        }
    }

    #[test]
    fn one_card_and_connector_per_group() {
        let view = layout_of("Feature: F\nScenario: a\nGiven x\nScenario: b\nScenario: c\nThen y");
        let DocumentView::Tree(layout) = view else {
            panic!("expected tree");
        };
        assert_eq!(layout.cards.len(), 3);
        assert_eq!(layout.connectors.len(), 3);
        assert_eq!(layout.cards[0].index, 1);
        assert_eq!(layout.cards[2].index, 3);
        assert!(layout.cards[1].steps.is_empty());
        assert!(layout.cards[0].x < layout.cards[1].x);
        for (card, connector) in layout.cards.iter().zip(&layout.connectors) {
            assert!((connector.to.0 - (card.x + card.width / 2.0)).abs() < 1e-3);
            assert!((connector.to.1 - card.y).abs() < 1e-3);
            assert!((connector.from.0 - layout.width / 2.0).abs() < 1e-3);
        }
    }

    #[test]
    fn canvas_keeps_minimum_width_and_grows_with_cards() {
        let DocumentView::Tree(small) = layout_of("Scenario: a") else {
            panic!("expected tree");
        };
        assert_eq!(small.width, 800.0);
        let many = (0..5)
            .map(|i| format!("Scenario: s{i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let DocumentView::Tree(wide) = layout_of(&many) else {
            panic!("expected tree");
        };
        assert!(wide.width > 5.0 * 320.0);
        let last = wide.cards.last().unwrap();
        assert!(last.x + last.width <= wide.width);
    }

    #[test]
    fn step_rows_stack_and_carry_tone() {
        let view = layout_of("Scenario: s\nGiven a\nwhen b\nThen c\nAnd d");
        let DocumentView::Tree(layout) = view else {
            panic!("expected tree");
        };
        let steps = &layout.cards[0].steps;
        let tones: Vec<StepTone> = steps.iter().map(|s| s.tone).collect();
        assert_eq!(
            tones,
            vec![StepTone::Given, StepTone::When, StepTone::Then, StepTone::Neutral]
        );
        assert_eq!(steps[1].badge, "W");
        for pair in steps.windows(2) {
            assert!(pair[1].y >= pair[0].y + pair[0].height);
        }
        let card = &layout.cards[0];
        let last = steps.last().unwrap();
        assert!(card.y + card.height >= last.y + last.height);
        assert!(layout.height >= card.y + card.height);
    }
}

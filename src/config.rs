use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const EMPTY_DOCUMENT_MESSAGE: &str = "No valid Gherkin found for visualization";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RadarConfig {
    pub size: f32,
    /// Outer ring radius as a fraction of `size`.
    pub radius_ratio: f32,
    pub label_offset: f32,
    /// Labels whose anchor is this close to the vertical axis are centered.
    pub align_epsilon: f32,
    pub label_line_spacing: f32,
    pub label_font_size: f32,
    pub marker_radius: f32,
    pub hovered_marker_radius: f32,
    pub marker_stroke_width: f32,
    pub polygon_stroke_width: f32,
    pub panel_width: f32,
    pub panel_height: f32,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            size: 400.0,
            radius_ratio: 0.35,
            label_offset: 35.0,
            align_epsilon: 10.0,
            label_line_spacing: 12.0,
            label_font_size: 10.0,
            marker_radius: 4.0,
            hovered_marker_radius: 6.0,
            marker_stroke_width: 2.0,
            polygon_stroke_width: 3.0,
            panel_width: 160.0,
            panel_height: 88.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TreeConfig {
    pub padding: f32,
    pub min_width: f32,
    pub root_max_width: f32,
    pub root_padding_x: f32,
    pub root_padding_y: f32,
    pub root_caption: String,
    pub title_font_size: f32,
    pub caption_font_size: f32,
    /// Vertical distance between the root box and the card row.
    pub rank_gap: f32,
    pub card_width: f32,
    pub card_gap: f32,
    pub card_padding: f32,
    pub card_radius: f32,
    pub index_badge_size: f32,
    pub name_font_size: f32,
    pub step_font_size: f32,
    pub step_badge_size: f32,
    pub step_gap: f32,
    pub section_gap: f32,
    pub empty_height: f32,
    pub empty_message: String,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            padding: 40.0,
            min_width: 800.0,
            root_max_width: 448.0,
            root_padding_x: 40.0,
            root_padding_y: 20.0,
            root_caption: "AUDIT VECTOR".to_string(),
            title_font_size: 18.0,
            caption_font_size: 10.0,
            rank_gap: 96.0,
            card_width: 320.0,
            card_gap: 48.0,
            card_padding: 32.0,
            card_radius: 32.0,
            index_badge_size: 32.0,
            name_font_size: 16.0,
            step_font_size: 12.0,
            step_badge_size: 32.0,
            step_gap: 24.0,
            section_gap: 32.0,
            empty_height: 300.0,
            empty_message: EMPTY_DOCUMENT_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub label_line_height: f32,
    /// Skip font loading and use calibrated per-character widths.
    pub fast_text_metrics: bool,
    pub radar: RadarConfig,
    pub tree: TreeConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            label_line_height: 1.5,
            fast_text_metrics: false,
            radar: RadarConfig::default(),
            tree: TreeConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            background: "#020617".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerationConfig {
    pub endpoint: String,
    pub model: String,
    /// Falls back to `GEMINI_API_KEY`, then `API_KEY`, when unset.
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-3-flash-preview".to_string(),
            api_key: None,
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
    pub generation: GenerationConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::cyber();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            render,
            generation: GenerationConfig::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    background: Option<String>,
    text_color: Option<String>,
    muted_text_color: Option<String>,
    accent_color: Option<String>,
    accent_fill: Option<String>,
    grid_color: Option<String>,
    axis_color: Option<String>,
    marker_fill: Option<String>,
    card_fill: Option<String>,
    card_border: Option<String>,
    connector_color: Option<String>,
    given_color: Option<String>,
    when_color: Option<String>,
    then_color: Option<String>,
    neutral_step_color: Option<String>,
    panel_fill: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    fast_text_metrics: Option<bool>,
    label_line_height: Option<f32>,
    radar: Option<RadarConfig>,
    tree: Option<TreeConfig>,
    generation: Option<GenerationConfig>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    let config = parse_config(&contents)?;
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

/// Parses a JSON5 config document on top of the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = json5::from_str(contents)?;
    let mut config = Config::default();

    if let Some(name) = parsed.theme.as_deref() {
        match Theme::by_name(name) {
            Some(theme) => config.theme = theme,
            None => tracing::warn!(theme = name, "unknown theme name, keeping default"),
        }
    }
    if let Some(vars) = parsed.theme_variables {
        apply_theme_variables(&mut config.theme, vars);
    }
    config.render.background = config.theme.background.clone();

    if let Some(v) = parsed.fast_text_metrics {
        config.layout.fast_text_metrics = v;
    }
    if let Some(v) = parsed.label_line_height {
        config.layout.label_line_height = v;
    }
    if let Some(radar) = parsed.radar {
        config.layout.radar = radar;
    }
    if let Some(tree) = parsed.tree {
        config.layout.tree = tree;
    }
    if let Some(generation) = parsed.generation {
        config.generation = generation;
    }
    Ok(config)
}

fn apply_theme_variables(theme: &mut Theme, vars: ThemeVariables) {
    fn set(target: &mut String, value: Option<String>) {
        if let Some(v) = value {
            *target = v;
        }
    }
    set(&mut theme.font_family, vars.font_family);
    if let Some(v) = vars.font_size {
        theme.font_size = v;
    }
    set(&mut theme.background, vars.background);
    set(&mut theme.text_color, vars.text_color);
    set(&mut theme.muted_text_color, vars.muted_text_color);
    set(&mut theme.accent_color, vars.accent_color);
    set(&mut theme.accent_fill, vars.accent_fill);
    set(&mut theme.grid_color, vars.grid_color);
    set(&mut theme.axis_color, vars.axis_color);
    set(&mut theme.marker_fill, vars.marker_fill);
    set(&mut theme.card_fill, vars.card_fill);
    set(&mut theme.card_border, vars.card_border);
    set(&mut theme.connector_color, vars.connector_color);
    set(&mut theme.given_color, vars.given_color);
    set(&mut theme.when_color, vars.when_color);
    set(&mut theme.then_color, vars.then_color);
    set(&mut theme.neutral_step_color, vars.neutral_step_color);
    set(&mut theme.panel_fill, vars.panel_fill);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_site_geometry() {
        let config = Config::default();
        assert_eq!(config.layout.radar.size, 400.0);
        assert!((config.layout.radar.size * config.layout.radar.radius_ratio - 140.0).abs() < 1e-3);
        assert_eq!(config.render.background, config.theme.background);
    }

    #[test]
    fn parse_config_accepts_json5_and_partial_sections() {
        let raw = r##"{
            // comments are allowed
            theme: "light",
            themeVariables: { accentColor: "#FF00FF", fontSize: 14 },
            radar: { labelOffset: 20 },
            generation: { model: "gemini-pro" },
        }"##;
        let config = parse_config(raw).unwrap();
        assert_eq!(config.theme.accent_color, "#FF00FF");
        assert_eq!(config.theme.font_size, 14.0);
        assert_eq!(config.theme.background, Theme::light().background);
        assert_eq!(config.layout.radar.label_offset, 20.0);
        assert_eq!(config.layout.radar.size, 400.0);
        assert_eq!(config.generation.model, "gemini-pro");
        assert!(config.generation.endpoint.starts_with("https://"));
    }

    #[test]
    fn unknown_theme_keeps_default() {
        let config = parse_config(r#"{"theme": "neon"}"#).unwrap();
        assert_eq!(config.theme.background, Theme::cyber().background);
    }

    #[test]
    fn load_config_without_path_is_default() {
        let config = load_config(None).unwrap();
        assert_eq!(config.layout.tree.empty_message, EMPTY_DOCUMENT_MESSAGE);
    }

    #[test]
    fn malformed_config_is_an_error() {
        assert!(parse_config("{ theme: ").is_err());
    }
}

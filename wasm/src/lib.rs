use audit_viz::input::load_entries;
use audit_viz::{RenderOptions, parse_document, render_gherkin, render_radar};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VizRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    font_size: Option<f32>,
    fast_text: Option<bool>,
    hover: Option<usize>,
}

fn parse_options(options_json: Option<String>) -> Result<VizRenderOptions, String> {
    match options_json {
        Some(raw) => serde_json::from_str(&raw).map_err(|error| error.to_string()),
        None => Ok(VizRenderOptions::default()),
    }
}

fn build_render_options(options: &VizRenderOptions) -> RenderOptions {
    let mut render_options = if options.theme.as_deref() == Some("light") {
        RenderOptions::light()
    } else {
        RenderOptions::cyber()
    };

    if let Some(font_family) = &options.font_family {
        render_options.theme.font_family = font_family.clone();
    }
    if let Some(font_size) = options.font_size {
        render_options.theme.font_size = font_size;
    }
    // No system fonts to measure against in the browser.
    render_options.layout.fast_text_metrics = options.fast_text.unwrap_or(true);

    render_options
}

fn radar_svg(entries_json: &str, options_json: Option<String>) -> Result<String, String> {
    let options = parse_options(options_json)?;
    let entries = load_entries(entries_json).map_err(|error| error.to_string())?;
    Ok(render_radar(&entries, options.hover, &build_render_options(&options)))
}

fn gherkin_svg(text: &str, options_json: Option<String>) -> Result<String, String> {
    let options = parse_options(options_json)?;
    Ok(render_gherkin(text, &build_render_options(&options)))
}

#[wasm_bindgen]
pub fn render_radar_svg(entries_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    radar_svg(entries_json, options_json).map_err(|error| JsValue::from_str(&error))
}

#[wasm_bindgen]
pub fn render_gherkin_svg(text: &str, options_json: Option<String>) -> Result<String, JsValue> {
    gherkin_svg(text, options_json).map_err(|error| JsValue::from_str(&error))
}

/// The parsed `{title, groups: [{name, steps: [{keyword, text}]}]}` tree as JSON.
#[wasm_bindgen]
pub fn parse_gherkin_json(text: &str) -> Result<String, JsValue> {
    serde_json::to_string(&parse_document(text)).map_err(|error| JsValue::from_str(&error.to_string()))
}

use crate::config::LayoutConfig;
use crate::text_metrics;

use super::TextBlock;

/// Wraps `text` to `max_width` pixels and measures the resulting block.
pub(super) fn measure_wrapped(
    text: &str,
    font_size: f32,
    max_width: f32,
    font_family: &str,
    config: &LayoutConfig,
) -> TextBlock {
    let fast = config.fast_text_metrics;
    let mut lines = Vec::new();
    for line in text.lines().map(str::trim) {
        lines.extend(wrap_line(line, max_width, font_size, font_family, fast));
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    let width = lines
        .iter()
        .map(|line| text_width(line, font_size, font_family, fast))
        .fold(0.0, f32::max);
    let height = lines.len() as f32 * font_size * config.label_line_height;
    TextBlock {
        lines,
        width,
        height,
    }
}

pub(super) fn char_width_factor(ch: char) -> f32 {
    // Em widths for a typical sans-serif at a 16px baseline.
    match ch {
        ' ' => 0.306,
        '\\' | '.' | ',' | ':' | ';' | '|' | '!' | '(' | ')' | '[' | ']' | '{' | '}' => 0.321,
        'I' | 'i' | 'j' | 'l' => 0.25,
        'f' | 'r' | 't' => 0.34,
        'M' | 'W' | 'm' | 'w' => 0.86,
        'A'..='Z' => 0.66,
        'a'..='z' => 0.56,
        '0'..='9' => 0.6,
        '@' | '#' | '%' | '&' => 0.946,
        _ => 0.568,
    }
}

pub(super) fn wrap_line(
    line: &str,
    max_width: f32,
    font_size: f32,
    font_family: &str,
    fast_metrics: bool,
) -> Vec<String> {
    if text_width(line, font_size, font_family, fast_metrics) <= max_width {
        return vec![line.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in line.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if text_width(&candidate, font_size, font_family, fast_metrics) > max_width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current.push_str(word);
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

pub(super) fn text_width(text: &str, font_size: f32, font_family: &str, fast_metrics: bool) -> f32 {
    if fast_metrics {
        return fallback_text_width(text, font_size);
    }
    text_metrics::measure_text_width(text, font_size, font_family)
        .unwrap_or_else(|| fallback_text_width(text, font_size))
}

fn fallback_text_width(text: &str, font_size: f32) -> f32 {
    text.chars().map(char_width_factor).sum::<f32>() * font_size
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config() -> LayoutConfig {
        LayoutConfig {
            fast_text_metrics: true,
            ..Default::default()
        }
    }

    #[test]
    fn char_width_factor_returns_positive_values() {
        for ch in ['a', 'Z', ' ', '0', '@', '\u{4e2d}'] {
            assert!(char_width_factor(ch) > 0.0, "char {:?} has zero width", ch);
        }
    }

    #[test]
    fn fallback_text_width_scales_with_font_size() {
        let w12 = fallback_text_width("Vault", 12.0);
        let w24 = fallback_text_width("Vault", 24.0);
        assert!((w24 - w12 * 2.0).abs() < 0.01);
    }

    #[test]
    fn wrap_line_keeps_short_text() {
        assert_eq!(wrap_line("short", 1000.0, 12.0, "sans-serif", true).len(), 1);
    }

    #[test]
    fn wrap_line_splits_long_text() {
        let result = wrap_line(
            "the oracle price must not move more than five percent per block",
            100.0,
            12.0,
            "sans-serif",
            true,
        );
        assert!(result.len() > 1, "expected wrapping, got {:?}", result);
        assert_eq!(
            result.join(" "),
            "the oracle price must not move more than five percent per block"
        );
    }

    #[test]
    fn measure_empty_text_yields_one_line() {
        let block = measure_wrapped("", 12.0, 200.0, "sans-serif", &fast_config());
        assert_eq!(block.lines, vec![String::new()]);
        assert!(block.height > 0.0);
    }

    #[test]
    fn measured_height_tracks_line_count() {
        let config = fast_config();
        let block = measure_wrapped("alpha\nbeta", 10.0, 500.0, "sans-serif", &config);
        assert_eq!(block.lines.len(), 2);
        assert!((block.height - 2.0 * 10.0 * config.label_line_height).abs() < 1e-3);
    }
}

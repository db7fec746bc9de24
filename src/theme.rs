use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub background: String,
    pub text_color: String,
    pub muted_text_color: String,
    pub accent_color: String,
    pub accent_fill: String,
    pub grid_color: String,
    pub axis_color: String,
    pub marker_fill: String,
    pub card_fill: String,
    pub card_border: String,
    pub connector_color: String,
    pub given_color: String,
    pub when_color: String,
    pub then_color: String,
    pub neutral_step_color: String,
    pub panel_fill: String,
}

impl Theme {
    /// Dark slate/cyan palette used on the portfolio site.
    pub fn cyber() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 12.0,
            background: "#020617".to_string(),
            text_color: "#CBD5E1".to_string(),
            muted_text_color: "#64748B".to_string(),
            accent_color: "#06B6D4".to_string(),
            accent_fill: "rgba(6, 182, 212, 0.2)".to_string(),
            grid_color: "rgba(6, 182, 212, 0.1)".to_string(),
            axis_color: "rgba(6, 182, 212, 0.15)".to_string(),
            marker_fill: "#020617".to_string(),
            card_fill: "#0F172A".to_string(),
            card_border: "#334155".to_string(),
            connector_color: "rgba(6, 182, 212, 0.4)".to_string(),
            given_color: "#22D3EE".to_string(),
            when_color: "#FBBF24".to_string(),
            then_color: "#34D399".to_string(),
            neutral_step_color: "#64748B".to_string(),
            panel_fill: "rgba(15, 23, 42, 0.9)".to_string(),
        }
    }

    pub fn light() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 12.0,
            background: "#FFFFFF".to_string(),
            text_color: "#1C2430".to_string(),
            muted_text_color: "#7A8AA6".to_string(),
            accent_color: "#0891B2".to_string(),
            accent_fill: "rgba(8, 145, 178, 0.15)".to_string(),
            grid_color: "#D7E0F0".to_string(),
            axis_color: "#C7D2E5".to_string(),
            marker_fill: "#FFFFFF".to_string(),
            card_fill: "#F8FAFF".to_string(),
            card_border: "#C7D2E5".to_string(),
            connector_color: "#7A8AA6".to_string(),
            given_color: "#0891B2".to_string(),
            when_color: "#D97706".to_string(),
            then_color: "#059669".to_string(),
            neutral_step_color: "#7A8AA6".to_string(),
            panel_fill: "#EEF2F8".to_string(),
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "cyber" | "dark" | "default" => Some(Self::cyber()),
            "light" => Some(Self::light()),
            _ => None,
        }
    }
}

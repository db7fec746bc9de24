//! Explicit UI state handed to the renderer instead of ambient globals.

use std::time::Duration;

use serde::Serialize;

use crate::generate::{Session, Tool};
use crate::ir::RadarEntry;

pub const LOADING_STAGE_INTERVAL: Duration = Duration::from_millis(1500);
pub const LAST_LOADING_STAGE: usize = 4;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RadarViewState {
    hovered: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailPanel {
    pub label: String,
    pub category: String,
    pub value: f32,
}

impl RadarViewState {
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Ignored when `index` is not a valid point.
    pub fn hover_enter(&mut self, index: usize, len: usize) {
        if index < len {
            self.hovered = Some(index);
        }
    }

    pub fn hover_leave(&mut self) {
        self.hovered = None;
    }

    pub fn detail(&self, entries: &[RadarEntry]) -> Option<DetailPanel> {
        let entry = entries.get(self.hovered?)?;
        Some(DetailPanel {
            label: entry.label.clone(),
            category: entry.category.clone(),
            value: entry.value,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ViewMode {
    #[default]
    Code,
    Visual,
}

#[derive(Debug, Clone)]
pub struct ToolPanelState {
    pub active_tool: Tool,
    pub input: String,
    pub view_mode: ViewMode,
    pub copied: bool,
}

impl Default for ToolPanelState {
    fn default() -> Self {
        Self {
            active_tool: Tool::QualityBlueprint,
            input: String::new(),
            view_mode: ViewMode::Code,
            copied: false,
        }
    }
}

impl ToolPanelState {
    pub fn select_tool(&mut self, tool: Tool) {
        if tool != self.active_tool {
            self.active_tool = tool;
            self.input.clear();
            self.view_mode = ViewMode::Code;
            self.copied = false;
        }
    }

    pub fn load_sample(&mut self) {
        self.input = self.active_tool.sample_input().to_string();
    }

    /// Only the blueprint tool has a visual mode.
    pub fn toggle_view(&mut self) {
        self.view_mode = match (self.view_mode, self.active_tool.visualizes_gherkin()) {
            (ViewMode::Code, true) => ViewMode::Visual,
            _ => ViewMode::Code,
        };
    }

    pub fn can_submit(&self, session: &Session) -> bool {
        !session.is_pending() && !self.input.trim().is_empty()
    }
}

pub fn loading_stage(elapsed: Duration) -> usize {
    let stage = elapsed.as_millis() / LOADING_STAGE_INTERVAL.as_millis();
    (stage as usize).min(LAST_LOADING_STAGE)
}

pub fn loading_message(tool: Tool, elapsed: Duration) -> &'static str {
    tool.loading_messages()[loading_stage(elapsed)]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<RadarEntry> {
        vec![
            RadarEntry::new("Solidity Auditing", 90.0, "Security"),
            RadarEntry::new("K8s Security", 85.0, "Infrastructure"),
        ]
    }

    #[test]
    fn hover_tracks_a_single_point() {
        let mut state = RadarViewState::default();
        assert!(state.detail(&entries()).is_none());
        state.hover_enter(1, 2);
        assert_eq!(state.hovered(), Some(1));
        let detail = state.detail(&entries()).unwrap();
        assert_eq!(detail.category, "Infrastructure");
        assert_eq!(detail.value, 85.0);
        state.hover_enter(0, 2);
        assert_eq!(state.hovered(), Some(0));
        state.hover_leave();
        assert_eq!(state.hovered(), None);
    }

    #[test]
    fn hover_outside_range_is_ignored() {
        let mut state = RadarViewState::default();
        state.hover_enter(5, 2);
        assert_eq!(state.hovered(), None);
    }

    #[test]
    fn loading_stage_advances_and_caps() {
        assert_eq!(loading_stage(Duration::ZERO), 0);
        assert_eq!(loading_stage(Duration::from_millis(1499)), 0);
        assert_eq!(loading_stage(Duration::from_millis(3000)), 2);
        assert_eq!(loading_stage(Duration::from_secs(60)), LAST_LOADING_STAGE);
        assert_eq!(
            loading_message(Tool::ArchitectureCopilot, Duration::from_secs(60)),
            "Finalizing Topology..."
        );
    }

    #[test]
    fn switching_tools_resets_panel() {
        let mut panel = ToolPanelState::default();
        panel.load_sample();
        panel.toggle_view();
        assert_eq!(panel.view_mode, ViewMode::Visual);
        panel.select_tool(Tool::VulnerabilityAudit);
        assert!(panel.input.is_empty());
        assert_eq!(panel.view_mode, ViewMode::Code);
        panel.toggle_view();
        assert_eq!(panel.view_mode, ViewMode::Code);
    }

    #[test]
    fn submit_requires_input_and_idle_session() {
        let mut panel = ToolPanelState::default();
        let mut session = Session::new();
        assert!(!panel.can_submit(&session));
        panel.load_sample();
        assert!(panel.can_submit(&session));
        session.begin(panel.active_tool, &panel.input).unwrap();
        assert!(!panel.can_submit(&session));
    }
}

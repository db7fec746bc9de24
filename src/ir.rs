use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "Untitled Audit";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StepKeyword {
    Given,
    When,
    Then,
    And,
    But,
}

impl StepKeyword {
    /// Case-insensitive lookup of a single whitespace-delimited token.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "given" => Some(Self::Given),
            "when" => Some(Self::When),
            "then" => Some(Self::Then),
            "and" => Some(Self::And),
            "but" => Some(Self::But),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    pub keyword: String,
    pub text: String,
}

impl Step {
    pub fn kind(&self) -> Option<StepKeyword> {
        StepKeyword::from_token(&self.keyword)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    pub name: String,
    pub steps: Vec<Step>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedDocument {
    pub title: String,
    pub groups: Vec<Group>,
}

impl ParsedDocument {
    pub fn new() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            groups: Vec::new(),
        }
    }

    /// True when there is nothing to draw as a tree.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn step_count(&self) -> usize {
        self.groups.iter().map(|group| group.steps.len()).sum()
    }
}

impl Default for ParsedDocument {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarEntry {
    #[serde(alias = "name")]
    pub label: String,
    #[serde(alias = "level")]
    pub value: f32,
    #[serde(default)]
    pub category: String,
}

impl RadarEntry {
    pub fn new(label: impl Into<String>, value: f32, category: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value,
            category: category.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_keyword_ignores_case() {
        assert_eq!(StepKeyword::from_token("GIVEN"), Some(StepKeyword::Given));
        assert_eq!(StepKeyword::from_token("but"), Some(StepKeyword::But));
        assert_eq!(StepKeyword::from_token("Whenever"), None);
    }

    #[test]
    fn radar_entry_accepts_skill_field_names() {
        let entry: RadarEntry =
            serde_json::from_str(r#"{"name":"K8s Security","level":85,"category":"Infrastructure"}"#)
                .unwrap();
        assert_eq!(entry.label, "K8s Security");
        assert_eq!(entry.value, 85.0);
        assert_eq!(entry.category, "Infrastructure");
    }

    #[test]
    fn new_document_uses_placeholder_title() {
        let doc = ParsedDocument::new();
        assert_eq!(doc.title, DEFAULT_TITLE);
        assert!(doc.is_empty());
        assert_eq!(doc.step_count(), 0);
    }
}

use crate::ir::{Group, ParsedDocument, Step};
use once_cell::sync::Lazy;
use regex::Regex;

static STEP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(given|when|then|and|but)\s").unwrap());

/// Header prefixes recognized by [`parse_document_with`].
#[derive(Debug, Clone, Copy)]
pub struct Markers {
    pub title: &'static str,
    pub groups: &'static [&'static str],
}

pub const DEFAULT_MARKERS: Markers = Markers {
    title: "Feature:",
    groups: &["Scenario:", "Example:"],
};

pub fn parse_document(raw: &str) -> ParsedDocument {
    parse_document_with(raw, &DEFAULT_MARKERS)
}

pub fn parse_document_with(raw: &str, markers: &Markers) -> ParsedDocument {
    let mut doc = ParsedDocument::new();
    let mut current: Option<usize> = None;
    let mut orphan_steps = 0usize;

    for raw_line in raw.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(rest) = line.strip_prefix(markers.title) {
            doc.title = rest.trim().to_string();
            continue;
        }
        if let Some(rest) = strip_group_marker(line, markers) {
            doc.groups.push(Group::new(rest.trim()));
            current = Some(doc.groups.len() - 1);
            continue;
        }
        if !STEP_RE.is_match(line) {
            continue;
        }
        let Some(idx) = current else {
            orphan_steps += 1;
            continue;
        };
        let mut tokens = line.split_whitespace();
        let keyword = tokens.next().unwrap_or_default().to_string();
        let text = tokens.collect::<Vec<_>>().join(" ");
        doc.groups[idx].steps.push(Step { keyword, text });
    }

    tracing::debug!(
        groups = doc.groups.len(),
        steps = doc.step_count(),
        orphan_steps,
        "parsed structured text"
    );
    doc
}

fn strip_group_marker<'a>(line: &'a str, markers: &Markers) -> Option<&'a str> {
    markers
        .groups
        .iter()
        .find_map(|marker| line.strip_prefix(marker))
}

/// Body of a `### <header>` section, up to the next `###` heading or the end.
pub fn extract_section(output: &str, header: &str) -> Option<String> {
    let pattern = format!(r"(?is)###\s*{}(.*?)(?:###|\z)", regex::escape(header));
    let re = Regex::new(&pattern).ok()?;
    re.captures(output)
        .and_then(|caps| caps.get(1))
        .map(|body| body.as_str().trim().to_string())
}

pub fn extract_diagram_blocks(input: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut fence: Option<&'static str> = None;

    for line in input.lines() {
        let trimmed = line.trim();
        match fence {
            None => {
                fence = detect_diagram_fence(trimmed);
            }
            Some(open) if is_fence_end(trimmed, open) => {
                blocks.push(current.join("\n"));
                current.clear();
                fence = None;
            }
            Some(_) => current.push(line),
        }
    }

    blocks
}

/// Drops every fenced diagram block, keeping the surrounding prose.
pub fn strip_diagram_blocks(input: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut fence: Option<&'static str> = None;

    for line in input.lines() {
        let trimmed = line.trim();
        match fence {
            None => match detect_diagram_fence(trimmed) {
                Some(open) => fence = Some(open),
                None => kept.push(line),
            },
            Some(open) => {
                if is_fence_end(trimmed, open) {
                    fence = None;
                }
            }
        }
    }

    kept.join("\n")
}

fn detect_diagram_fence(line: &str) -> Option<&'static str> {
    for (fence, marker) in [("```", '`'), ("~~~", '~'), (":::", ':')] {
        if line.starts_with(fence) {
            let rest = line.trim_start_matches(marker).trim();
            if rest.starts_with("mermaid") {
                return Some(fence);
            }
        }
    }
    None
}

fn is_fence_end(line: &str, fence: &str) -> bool {
    match line.strip_prefix(fence) {
        Some(rest) => rest.trim().is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{DEFAULT_TITLE, StepKeyword};

    #[test]
    fn parse_vault_safety_feature() {
        let input = "Feature: Vault Safety\nScenario: Deposit limits\nGiven a vault\nWhen user deposits over cap\nThen transaction reverts";
        let doc = parse_document(input);
        assert_eq!(doc.title, "Vault Safety");
        assert_eq!(doc.groups.len(), 1);
        let group = &doc.groups[0];
        assert_eq!(group.name, "Deposit limits");
        let keywords: Vec<&str> = group.steps.iter().map(|s| s.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["Given", "When", "Then"]);
        assert_eq!(group.steps[1].text, "user deposits over cap");
    }

    #[test]
    fn groups_follow_line_order() {
        let input = "Scenario: one\nExample: two\n  Scenario:three  \nGiven x";
        let doc = parse_document(input);
        let names: Vec<&str> = doc.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["one", "two", "three"]);
        assert!(doc.groups[0].steps.is_empty());
        assert!(doc.groups[1].steps.is_empty());
        assert_eq!(doc.groups[2].steps.len(), 1);
    }

    #[test]
    fn steps_attach_to_the_preceding_group_only() {
        let input = "Scenario: a\nGiven first\nAnd second\nScenario: b\nThen third\nBut fourth";
        let doc = parse_document(input);
        assert_eq!(doc.groups[0].steps.len(), 2);
        assert_eq!(doc.groups[1].steps.len(), 2);
        assert_eq!(doc.groups[1].steps[0].text, "third");
        assert_eq!(doc.groups[1].steps[1].kind(), Some(StepKeyword::But));
    }

    #[test]
    fn steps_before_any_group_are_dropped() {
        let input = "Given orphan\nFeature: F\nWhen also orphan\nScenario: s\nThen kept";
        let doc = parse_document(input);
        assert_eq!(doc.groups.len(), 1);
        assert_eq!(doc.step_count(), 1);
        assert_eq!(doc.groups[0].steps[0].text, "kept");
    }

    #[test]
    fn keyword_keeps_original_case() {
        let doc = parse_document("Scenario: s\ngiven value > 0\nTHEN   it   holds");
        let steps = &doc.groups[0].steps;
        assert_eq!(steps[0].keyword, "given");
        assert_eq!(steps[0].text, "value > 0");
        assert_eq!(steps[1].keyword, "THEN");
        assert_eq!(steps[1].text, "it holds");
        assert_eq!(steps[1].kind(), Some(StepKeyword::Then));
    }

    #[test]
    fn partial_keyword_tokens_are_not_steps() {
        let doc = parse_document("Scenario: s\nWhenever x happens\nGivenx\nGiven\nAndroid build");
        assert!(doc.groups[0].steps.is_empty());
    }

    #[test]
    fn title_defaults_and_last_title_wins() {
        assert_eq!(parse_document("Scenario: s").title, DEFAULT_TITLE);
        let doc = parse_document("Feature: first\nScenario: s\nFeature: second\nGiven x");
        assert_eq!(doc.title, "second");
        assert_eq!(doc.groups[0].steps.len(), 1);
    }

    #[test]
    fn markers_are_case_sensitive() {
        let doc = parse_document("feature: lower\nscenario: lower\nGiven x");
        assert_eq!(doc.title, DEFAULT_TITLE);
        assert!(doc.is_empty());
    }

    #[test]
    fn custom_markers() {
        let markers = Markers {
            title: "Epic:",
            groups: &["Story:"],
        };
        let doc = parse_document_with("Epic: Bridge\nStory: Withdraw\nWhen delayed", &markers);
        assert_eq!(doc.title, "Bridge");
        assert_eq!(doc.groups[0].name, "Withdraw");
        assert_eq!(doc.groups[0].steps.len(), 1);
    }

    #[test]
    fn handles_crlf_and_blank_lines() {
        let doc = parse_document("Feature: F\r\n\r\nScenario: S\r\n   \r\nGiven a\r\n");
        assert_eq!(doc.title, "F");
        assert_eq!(doc.groups[0].steps[0].text, "a");
    }

    #[test]
    fn extracts_gherkin_section() {
        let output = "intro\n### GHERKIN SCENARIOS\nFeature: X\nScenario: Y\n### TEST HARNESS BLUEPRINT\ncode";
        let section = extract_section(output, "GHERKIN SCENARIOS").unwrap();
        assert_eq!(section, "Feature: X\nScenario: Y");
    }

    #[test]
    fn extract_section_runs_to_end_and_ignores_case() {
        let output = "### gherkin scenarios\nFeature: tail";
        assert_eq!(
            extract_section(output, "GHERKIN SCENARIOS").as_deref(),
            Some("Feature: tail")
        );
        assert_eq!(extract_section("no headers here", "GHERKIN SCENARIOS"), None);
    }

    #[test]
    fn extracts_diagram_blocks() {
        let input = r#"
text
``` mermaid
flowchart LR
  A --> B
```
more
~~~mermaid
flowchart TD
  X --> Y
~~~
::: mermaid
sequenceDiagram
  A->>B: hi
:::
"#;
        let blocks = extract_diagram_blocks(input);
        assert_eq!(blocks.len(), 3);
        assert!(blocks[0].contains("A --> B"));
        assert!(blocks[1].contains("X --> Y"));
        assert!(blocks[2].contains("sequenceDiagram"));
    }

    #[test]
    fn strips_diagram_blocks() {
        let input = "### ARCHITECTURE DIAGRAM\n```mermaid\ngraph TD\nA-->B\n```\n### SECURITY RATIONALE\nreasons";
        let prose = strip_diagram_blocks(input);
        assert!(!prose.contains("graph TD"));
        assert!(prose.contains("### SECURITY RATIONALE"));
        assert!(prose.contains("reasons"));
    }

    #[test]
    fn unterminated_block_is_not_emitted() {
        assert!(extract_diagram_blocks("```mermaid\ngraph TD").is_empty());
    }
}

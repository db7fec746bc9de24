use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the site's text-generation tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    QualityBlueprint,
    VulnerabilityAudit,
    ArchitectureCopilot,
    CodeExplainer,
}

pub const GHERKIN_SECTION: &str = "GHERKIN SCENARIOS";

impl Tool {
    pub const ALL: [Tool; 4] = [
        Tool::QualityBlueprint,
        Tool::VulnerabilityAudit,
        Tool::ArchitectureCopilot,
        Tool::CodeExplainer,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::QualityBlueprint => "blueprint",
            Self::VulnerabilityAudit => "audit",
            Self::ArchitectureCopilot => "architecture",
            Self::CodeExplainer => "explain",
        }
    }

    pub fn temperature(self) -> f32 {
        match self {
            Self::QualityBlueprint => 0.5,
            Self::ArchitectureCopilot => 0.4,
            Self::VulnerabilityAudit | Self::CodeExplainer => 0.3,
        }
    }

    /// Shown in place of an empty completion.
    pub fn empty_response_text(self) -> &'static str {
        match self {
            Self::QualityBlueprint => "Analysis failed.",
            Self::VulnerabilityAudit => "Audit failed.",
            Self::ArchitectureCopilot => "Design failed.",
            Self::CodeExplainer => "Explanation failed.",
        }
    }

    pub fn prompt(self, input: &str) -> String {
        match self {
            Self::QualityBlueprint => format!(
                "As a Web3 Security Lead and QA Architect, analyze this protocol requirement: \"{input}\"\n\n\
                 Provide a dual-part response:\n\
                 1. BEHAVIORAL SPEC (GHERKIN): Comprehensive Feature file including security invariants and edge cases.\n\
                 2. FOUNDRY/JAVA TEST HARNESS: Page Object Model or Test Suite template for validating these behaviors in a Web3 context.\n\n\
                 Format with headers: \"### GHERKIN SCENARIOS\" and \"### TEST HARNESS BLUEPRINT\"."
            ),
            Self::ArchitectureCopilot => format!(
                "As a Senior Blockchain Architect, design a secure, high-availability architecture for: \"{input}\"\n\n\
                 Response must include:\n\
                 1. TOPOLOGY: A valid Mermaid.js graph code block showing protocol layers, oracles, and security gates.\n\
                 2. THREAT MODEL: Rationale focusing on smart contract security, MEV protection, and decentralization.\n\
                 3. AUDIT STACK: Recommended security tools (Foundry, Slither, Halmos, etc.).\n\n\
                 Headers: \"### ARCHITECTURE DIAGRAM\", \"### SECURITY RATIONALE\", \"### AUDIT STACK\"."
            ),
            Self::VulnerabilityAudit => format!(
                "Act as a Security Auditor. Review this implementation for:\n\
                 1. Vulnerabilities (Injection, Logic errors, Re-entrancy patterns).\n\
                 2. Performance bottlenecks in high-frequency data processing.\n\
                 3. Best practices for secure Java backend logic.\n\n\
                 Code:\n```java\n{input}\n```"
            ),
            Self::CodeExplainer => format!(
                "Act as a Technical Security Writer. Explain this logic for both non-technical stakeholders (audit summary)\n\
                 and developers (deep-dive logic breakdown).\n\n\
                 Code:\n```java\n{input}\n```\n\n\
                 Headers: \"### SECURITY SUMMARY\", \"### LOGIC FLOW\", \"### DEVELOPER DEEP DIVE\"."
            ),
        }
    }

    pub fn loading_messages(self) -> [&'static str; 5] {
        match self {
            Self::QualityBlueprint => [
                "Decrypting protocol specs...",
                "Simulating multi-vector attacks...",
                "Defining behavioral invariants...",
                "Generating Foundry test harness...",
                "Synthesizing security blueprint...",
            ],
            Self::VulnerabilityAudit => [
                "Compiling Bytecode AST...",
                "Scanning for Re-entrancy patterns...",
                "Analyzing ownership privilege...",
                "Checking for overflow protection...",
                "Generating audit report...",
            ],
            Self::CodeExplainer => [
                "Deconstructing complex logic...",
                "Translating for auditors...",
                "Mapping data flow dependencies...",
                "Highlighting critical pathways...",
                "Generating Logic Summary...",
            ],
            Self::ArchitectureCopilot => [
                "Processing network constraints...",
                "Designing oracle pathways...",
                "Mapping security gates...",
                "Validating decentralization...",
                "Finalizing Topology...",
            ],
        }
    }

    pub fn sample_input(self) -> &'static str {
        match self {
            Self::QualityBlueprint => {
                "Liquidity pool should prevent re-entrancy during multi-token swaps. Flashloan spikes must not trigger oracle circuit breakers incorrectly."
            }
            Self::VulnerabilityAudit => {
                "public void updatePrice(long price) {\n  if(price < 0) throw new IllegalArgumentException();\n  this.currentPrice = price;\n  notifySubscribers();\n}"
            }
            Self::ArchitectureCopilot => {
                "Architect a cross-chain bridge using LayerZero with decentralized validation nodes and a 24h delay for large withdrawals."
            }
            Self::CodeExplainer => {
                "public List<Transaction> filterSuspect(List<Transaction> txs) {\n  return txs.stream()\n    .filter(t -> t.getAmount() > THRESHOLD)\n    .filter(t -> !t.isVerified())\n    .collect(Collectors.toList());\n}"
            }
        }
    }

    /// Whether the output carries a Gherkin section worth drawing.
    pub fn visualizes_gherkin(self) -> bool {
        matches!(self, Self::QualityBlueprint)
    }

    pub fn emits_diagram(self) -> bool {
        matches!(self, Self::ArchitectureCopilot)
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown tool `{0}` (expected blueprint, audit, architecture or explain)")]
pub struct UnknownTool(pub String);

impl FromStr for Tool {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blueprint" | "gherkin" | "gherkin_gen" => Ok(Self::QualityBlueprint),
            "audit" | "vuln_audit" => Ok(Self::VulnerabilityAudit),
            "architecture" | "arch" | "arch_copilot" => Ok(Self::ArchitectureCopilot),
            "explain" | "code_explainer" => Ok(Self::CodeExplainer),
            other => Err(UnknownTool(other.to_string())),
        }
    }
}

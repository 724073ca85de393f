//! Structured agent outputs
//!
//! Each output type doubles as the JSON schema sent to the LLM (via
//! `schemars`) and the shape its answer is validated and deserialized into.
//! Field names are camelCase on the wire.

use schemars::gen::SchemaSettings;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An output type a prompt agent can ask the LLM for
pub trait AgentSchema:
    DeserializeOwned + JsonSchema + Into<AgentOutput> + Send + Sync + 'static
{
    /// Schema name passed to providers that support named schemas
    const NAME: &'static str;

    /// Root schema with nested types inlined, since providers such as Gemini
    /// reject `$ref`
    fn json_schema() -> Value {
        let schema = SchemaSettings::draft07()
            .with(|settings| settings.inline_subschemas = true)
            .into_generator()
            .into_root_schema_for::<Self>();
        serde_json::to_value(schema).unwrap_or(Value::Null)
    }
}

/// Free-text answer plus a one-line status, used by the engineering agents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskReport {
    /// Detailed response, suggestions, code or analysis
    pub response: String,
    /// Short status, e.g. "Test cases generated" or "Task acknowledged"
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CritiqueReport {
    /// Findings: flaws, gaps, risks and suggested improvements
    pub critique: String,
    /// Short status, e.g. "Review complete - suggestions provided"
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EducationReport {
    /// Suggestions for scaffolding, alignment and skill gaps
    pub suggestions: String,
    /// Short status, e.g. "Enhancements suggested"
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StrategicAdvice {
    /// Breakdown into subtasks, suggested agents and strategic guidance
    pub advice: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReconSummary {
    /// Markdown summary of open ports, services and attack surface
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlagAssessment {
    /// Whether the string looks like a CTF flag
    pub is_valid_flag_format: bool,
    /// Certainty between 0.0 and 1.0
    #[schemars(range(min = 0.0, max = 1.0))]
    pub confidence_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrioritizedVulnerability {
    /// Name or identifier, e.g. a CVE id or short title
    pub vulnerability: String,
    /// Risk from 0.0 (negligible) to 10.0 (critical)
    #[schemars(range(min = 0.0, max = 10.0))]
    pub risk_score: f64,
    /// Why it got this score
    pub explanation: String,
}

/// Vulnerabilities ordered from highest to lowest risk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VulnerabilityPrioritization {
    pub prioritized_vulnerabilities: Vec<PrioritizedVulnerability>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TechniqueRecommendation {
    /// Techniques and tools to try
    pub recommended_techniques: String,
    /// Why these techniques fit, drawing on the logs when given
    pub rationale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneralAnswer {
    pub answer: String,
}

impl AgentSchema for TaskReport {
    const NAME: &'static str = "task_report";
}

impl AgentSchema for CritiqueReport {
    const NAME: &'static str = "critique_report";
}

impl AgentSchema for EducationReport {
    const NAME: &'static str = "education_report";
}

impl AgentSchema for StrategicAdvice {
    const NAME: &'static str = "strategic_advice";
}

impl AgentSchema for ReconSummary {
    const NAME: &'static str = "recon_summary";
}

impl AgentSchema for FlagAssessment {
    const NAME: &'static str = "flag_assessment";
}

impl AgentSchema for VulnerabilityPrioritization {
    const NAME: &'static str = "vulnerability_prioritization";
}

impl AgentSchema for TechniqueRecommendation {
    const NAME: &'static str = "technique_recommendation";
}

impl AgentSchema for GeneralAnswer {
    const NAME: &'static str = "general_answer";
}

/// Any agent's structured result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgentOutput {
    Task(TaskReport),
    Critique(CritiqueReport),
    Education(EducationReport),
    Advice(StrategicAdvice),
    Recon(ReconSummary),
    Flag(FlagAssessment),
    Vulnerabilities(VulnerabilityPrioritization),
    Techniques(TechniqueRecommendation),
    Answer(GeneralAnswer),
}

impl AgentOutput {
    /// One-line status reported by the agent, if its schema has one
    pub fn status(&self) -> Option<&str> {
        match self {
            AgentOutput::Task(report) => Some(&report.status),
            AgentOutput::Critique(report) => Some(&report.status),
            AgentOutput::Education(report) => Some(&report.status),
            _ => None,
        }
    }

    /// Plain-text rendering for the terminal
    pub fn render(&self) -> String {
        match self {
            AgentOutput::Task(TaskReport { response, status }) => {
                format!("Status: {status}\n{response}")
            }
            AgentOutput::Critique(CritiqueReport { critique, status }) => {
                format!("Status: {status}\nCritique:\n{critique}")
            }
            AgentOutput::Education(EducationReport {
                suggestions,
                status,
            }) => format!("Status: {status}\nSuggestions:\n{suggestions}"),
            AgentOutput::Advice(advice) => advice.advice.clone(),
            AgentOutput::Recon(recon) => format!("Reconnaissance Summary\n{}", recon.summary),
            AgentOutput::Flag(flag) => format!(
                "Is Valid Format: {}\nConfidence: {:.0}%",
                if flag.is_valid_flag_format { "Yes" } else { "No" },
                flag.confidence_score * 100.0
            ),
            AgentOutput::Vulnerabilities(report) => {
                let mut out = String::from("Vulnerability Prioritization Report:");
                if report.prioritized_vulnerabilities.is_empty() {
                    out.push_str("\nNo vulnerabilities prioritized or data was insufficient.");
                }
                for item in &report.prioritized_vulnerabilities {
                    out.push_str(&format!(
                        "\n- {} (Score: {:.1}) - {}",
                        item.vulnerability, item.risk_score, item.explanation
                    ));
                }
                out
            }
            AgentOutput::Techniques(TechniqueRecommendation {
                recommended_techniques,
                rationale,
            }) => format!("Techniques:\n{recommended_techniques}\n\nRationale:\n{rationale}"),
            AgentOutput::Answer(answer) => answer.answer.clone(),
        }
    }
}

macro_rules! impl_into_output {
    ($($schema:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$schema> for AgentOutput {
                fn from(value: $schema) -> Self {
                    AgentOutput::$variant(value)
                }
            }
        )*
    };
}

impl_into_output! {
    TaskReport => Task,
    CritiqueReport => Critique,
    EducationReport => Education,
    StrategicAdvice => Advice,
    ReconSummary => Recon,
    FlagAssessment => Flag,
    VulnerabilityPrioritization => Vulnerabilities,
    TechniqueRecommendation => Techniques,
    GeneralAnswer => Answer,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_names_are_camel_case() {
        let flag: FlagAssessment =
            serde_json::from_value(json!({"isValidFlagFormat": true, "confidenceScore": 0.9}))
                .unwrap();
        assert!(flag.is_valid_flag_format);

        let techniques = serde_json::to_value(TechniqueRecommendation {
            recommended_techniques: "sqlmap".to_string(),
            rationale: "classic".to_string(),
        })
        .unwrap();
        assert!(techniques.get("recommendedTechniques").is_some());
    }

    #[test]
    fn test_schema_lists_required_fields() {
        let schema = <TaskReport as AgentSchema>::json_schema();
        let required = schema["required"].as_array().unwrap();
        assert!(required.contains(&json!("response")));
        assert!(required.contains(&json!("status")));
    }

    #[test]
    fn test_flag_schema_bounds_confidence() {
        let schema = <FlagAssessment as AgentSchema>::json_schema();
        let confidence = &schema["properties"]["confidenceScore"];
        assert_eq!(confidence["minimum"], json!(0.0));
        assert_eq!(confidence["maximum"], json!(1.0));
    }

    #[test]
    fn test_status_only_for_status_schemas() {
        let task: AgentOutput = TaskReport {
            response: "r".to_string(),
            status: "Code generated".to_string(),
        }
        .into();
        assert_eq!(task.status(), Some("Code generated"));

        let answer: AgentOutput = GeneralAnswer {
            answer: "42".to_string(),
        }
        .into();
        assert_eq!(answer.status(), None);
    }

    #[test]
    fn test_flag_render() {
        let output: AgentOutput = FlagAssessment {
            is_valid_flag_format: true,
            confidence_score: 0.87,
        }
        .into();
        assert_eq!(output.render(), "Is Valid Format: Yes\nConfidence: 87%");
    }

    #[test]
    fn test_nested_items_are_inlined() {
        let schema = <VulnerabilityPrioritization as AgentSchema>::json_schema();
        assert!(schema.get("definitions").is_none());
        let items = &schema["properties"]["prioritizedVulnerabilities"]["items"];
        assert!(items.get("$ref").is_none());
        assert_eq!(items["properties"]["riskScore"]["maximum"], json!(10.0));
        assert!(items["required"]
            .as_array()
            .unwrap()
            .contains(&json!("explanation")));
    }

    #[test]
    fn test_vulnerability_render() {
        let empty: AgentOutput = VulnerabilityPrioritization {
            prioritized_vulnerabilities: vec![],
        }
        .into();
        assert_eq!(
            empty.render(),
            "Vulnerability Prioritization Report:\nNo vulnerabilities prioritized or data was insufficient."
        );

        let scored: AgentOutput = VulnerabilityPrioritization {
            prioritized_vulnerabilities: vec![PrioritizedVulnerability {
                vulnerability: "CVE-2021-41773".to_string(),
                risk_score: 9.8,
                explanation: "Path traversal in Apache 2.4.49".to_string(),
            }],
        }
        .into();
        assert_eq!(
            scored.render(),
            "Vulnerability Prioritization Report:\n- CVE-2021-41773 (Score: 9.8) - Path traversal in Apache 2.4.49"
        );
    }

    #[test]
    fn test_output_serializes_with_kind_tag() {
        let output: AgentOutput = ReconSummary {
            summary: "22/tcp ssh".to_string(),
        }
        .into();
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["kind"], "recon");
        assert_eq!(value["summary"], "22/tcp ssh");
    }
}

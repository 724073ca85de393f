//! The built-in agent catalog
//!
//! Order here is the order agents are listed in the welcome message and by
//! `agents-hub agents`.

use crate::agents::input::{InputShape, Marker, PromptFields};
use crate::agents::programmer::ProgrammerAgent;
use crate::agents::prompt_agent::PromptAgent;
use crate::agents::prompts;
use crate::agents::schema::{
    CritiqueReport, EducationReport, FlagAssessment, GeneralAnswer, ReconSummary,
    StrategicAdvice, TaskReport, TechniqueRecommendation, VulnerabilityPrioritization,
};
use crate::agents::template::PromptTemplate;
use crate::agents::{AgentDescriptor, AgentHandler, LlmSettings};
use crate::llm::provider::LlmProvider;
use crate::tools::ToolSystem;
use std::sync::Arc;

const CRITIC_MARKERS: &[Marker] = &[Marker::optional("Focus", "reviewFocus")];

const EDUCATION_MARKERS: &[Marker] = &[
    Marker::required("Learning Goal", "learningGoal"),
    Marker::optional("Audience", "targetAudience"),
];

const TASK_ACKNOWLEDGED: &str = "Task acknowledged";

fn field<'a>(fields: &'a PromptFields, name: &str) -> &'a str {
    fields.get(name).map(String::as_str).unwrap_or_default()
}

fn free_text(field: &'static str, label: &'static str) -> InputShape {
    InputShape::Freeform { field, label }
}

/// A free-text agent answering with a [`TaskReport`]
fn task_agent(
    descriptor: AgentDescriptor,
    label: &'static str,
    template: PromptTemplate,
    llm: &Arc<dyn LlmProvider>,
    settings: &LlmSettings,
) -> PromptAgent<TaskReport> {
    PromptAgent::new(
        descriptor,
        free_text("taskDescription", label),
        template,
        llm.clone(),
        settings.clone(),
    )
}

fn acknowledged(response: String, status: &str) -> TaskReport {
    TaskReport {
        response,
        status: status.to_string(),
    }
}

/// Build every built-in agent
pub fn builtin_agents(
    llm: Arc<dyn LlmProvider>,
    settings: LlmSettings,
    tools: Arc<ToolSystem>,
) -> Vec<Arc<dyn AgentHandler>> {
    let director: PromptAgent<StrategicAdvice> = PromptAgent::new(
        AgentDescriptor::new(
            "technicalDirector",
            "Technical Director",
            "@director",
            "Breaks objectives into subtasks and suggests which agents should handle them.",
        )
        .with_hint("<objective or question>"),
        free_text("query", "Objective or question"),
        prompts::DIRECTOR,
        llm.clone(),
        settings.clone(),
    );

    let assistant: PromptAgent<GeneralAnswer> = PromptAgent::new(
        AgentDescriptor::new(
            "generalAssistant",
            "General Assistant",
            "@assistant",
            "Answers general and cybersecurity questions.",
        )
        .with_hint("<question>"),
        free_text("question", "Question"),
        prompts::ASSISTANT,
        llm.clone(),
        settings.clone(),
    );

    let recon: PromptAgent<ReconSummary> = PromptAgent::new(
        AgentDescriptor::new(
            "reconAgent",
            "Recon Agent",
            "@recon",
            "Summarizes Nmap scan results.",
        )
        .with_hint("<Nmap scan output>"),
        free_text("scanResults", "Nmap scan output"),
        prompts::RECON,
        llm.clone(),
        settings.clone(),
    );

    let vuln: PromptAgent<VulnerabilityPrioritization> = PromptAgent::new(
        AgentDescriptor::new(
            "vulnAssessAgent",
            "Vuln Assess Agent",
            "@vuln",
            "Identifies and prioritizes vulnerabilities.",
        )
        .with_hint("<Vulnerability list/data>"),
        free_text("vulnerabilityData", "Vulnerability data"),
        prompts::VULN,
        llm.clone(),
        settings.clone(),
    );

    let flag: PromptAgent<FlagAssessment> = PromptAgent::new(
        AgentDescriptor::new(
            "flagRecAgent",
            "Flag Rec Agent",
            "@flag",
            "Recognizes and validates CTF flags.",
        )
        .with_hint("<Potential flag string>"),
        free_text("potentialFlag", "A potential flag string"),
        prompts::FLAG,
        llm.clone(),
        settings.clone(),
    );

    let learn: PromptAgent<TechniqueRecommendation> = PromptAgent::new(
        AgentDescriptor::new(
            "learningAgent",
            "Learning Agent",
            "@learn",
            "Recommends techniques based on past CTF challenges.",
        )
        .with_hint("<vulnerability_type> [challenge_logs]"),
        InputShape::LeadingToken {
            field: "vulnerabilityType",
            label: "Vulnerability type",
            rest: "challengeLogs",
        },
        prompts::LEARN,
        llm.clone(),
        settings.clone(),
    );

    let programmer = task_agent(
        AgentDescriptor::new(
            "programmerAgent",
            "Programmer Agent",
            "@programmer",
            "Writes, debugs and optimizes code.",
        )
        .with_hint("<programming task>"),
        "Programming task",
        prompts::PROGRAMMER,
        &llm,
        &settings,
    )
    .with_fallback(|fields| {
        acknowledged(
            format!(
                "Received programming task: \"{}\". The AI Programmer is analyzing the request. \
                 Full code generation for very complex tasks may be high-level.",
                field(fields, "taskDescription")
            ),
            TASK_ACKNOWLEDGED,
        )
    });

    let qa = task_agent(
        AgentDescriptor::new(
            "qaEngineerAgent",
            "QA Engineer Agent",
            "@qa",
            "Plans tests, generates test cases and hunts edge cases.",
        )
        .with_hint("<QA task>"),
        "QA task",
        prompts::QA,
        &llm,
        &settings,
    )
    .with_fallback(|fields| {
        acknowledged(
            format!(
                "Received QA task: \"{}\". The AI QA Engineer is processing this. \
                 Full test harness generation is conceptual.",
                field(fields, "taskDescription")
            ),
            TASK_ACKNOWLEDGED,
        )
    });

    let network = task_agent(
        AgentDescriptor::new(
            "networkEngineerAgent",
            "Network Engineer Agent",
            "@network",
            "Designs secure topologies and hardens services.",
        )
        .with_hint("<network task>"),
        "Network task",
        prompts::NETWORK,
        &llm,
        &settings,
    )
    .with_fallback(|fields| {
        acknowledged(
            format!(
                "Received network engineering task: \"{}\". The AI Network Engineer is \
                 analyzing this. Full implementation of hardened services is conceptual.",
                field(fields, "taskDescription")
            ),
            TASK_ACKNOWLEDGED,
        )
    });

    let hardware = task_agent(
        AgentDescriptor::new(
            "hardwareEngineerAgent",
            "Hardware Engineer Agent",
            "@hardware",
            "Discusses FPGA, SDR and low-level systems.",
        )
        .with_hint("<hardware topic>"),
        "Hardware topic",
        prompts::HARDWARE,
        &llm,
        &settings,
    )
    .with_fallback(|fields| {
        acknowledged(
            format!(
                "Received hardware task: \"{}\". The AI Hardware Engineer can discuss \
                 concepts. Actual RTL/driver development is conceptual.",
                field(fields, "taskDescription")
            ),
            "Task acknowledged - conceptual discussion",
        )
    });

    let architect = task_agent(
        AgentDescriptor::new(
            "architectAgent",
            "Architect Agent",
            "@architect",
            "Designs modular architectures and integration strategies.",
        )
        .with_hint("<architecture task>"),
        "Architecture task",
        prompts::ARCHITECT,
        &llm,
        &settings,
    )
    .with_fallback(|fields| {
        acknowledged(
            format!(
                "Received architecture task: \"{}\". The AI Architect is analyzing this.",
                field(fields, "taskDescription")
            ),
            TASK_ACKNOWLEDGED,
        )
    });

    let critic: PromptAgent<CritiqueReport> = PromptAgent::new(
        AgentDescriptor::new(
            "criticAgent",
            "Critic Agent",
            "@critic",
            "Reviews code, designs and outputs for flaws.",
        )
        .with_hint("<item to review> [Focus: <aspect>]"),
        InputShape::Marked {
            field: "itemToReview",
            label: "Item to review",
            markers: CRITIC_MARKERS,
        },
        prompts::CRITIC,
        llm.clone(),
        settings.clone(),
    )
    .with_fallback(|fields| {
        let preview: String = field(fields, "itemToReview").chars().take(50).collect();
        CritiqueReport {
            critique: format!(
                "Received critique task for: \"{preview}...\". The AI Critic is analyzing this."
            ),
            status: TASK_ACKNOWLEDGED.to_string(),
        }
    });

    let gamemaster = task_agent(
        AgentDescriptor::new(
            "gameMasterAgent",
            "Game-master Agent",
            "@gamemaster",
            "Designs CTF challenges, simulations and training exercises.",
        )
        .with_hint("<scenario or challenge request>"),
        "Scenario or challenge request",
        prompts::GAMEMASTER,
        &llm,
        &settings,
    )
    .with_fallback(|fields| {
        acknowledged(
            format!(
                "Received game-master task: \"{}\". The AI Game-master is designing the content.",
                field(fields, "taskDescription")
            ),
            "Task acknowledged - design in progress",
        )
    });

    let education: PromptAgent<EducationReport> = PromptAgent::new(
        AgentDescriptor::new(
            "educationSmeAgent",
            "Education SME Agent",
            "@education",
            "Improves content for learning and instructional design.",
        )
        .with_hint("<content> Learning Goal: <goal> [Audience: <audience>]"),
        InputShape::Marked {
            field: "context",
            label: "Content to enhance",
            markers: EDUCATION_MARKERS,
        },
        prompts::EDUCATION,
        llm.clone(),
        settings.clone(),
    )
    .with_fallback(|fields| EducationReport {
        suggestions: format!(
            "Received education task regarding: \"{}\". The AI Education SME is reviewing \
             the context.",
            field(fields, "learningGoal")
        ),
        status: TASK_ACKNOWLEDGED.to_string(),
    });

    let comms = task_agent(
        AgentDescriptor::new(
            "commsAgent",
            "Comms Agent",
            "@comms",
            "Drafts briefings, status updates and stakeholder messages.",
        )
        .with_hint("<message or briefing request>"),
        "Message or briefing request",
        prompts::COMMS,
        &llm,
        &settings,
    )
    .with_fallback(|fields| {
        acknowledged(
            format!(
                "Received comms task: \"{}\". The AI Comms Agent is drafting the message.",
                field(fields, "taskDescription")
            ),
            TASK_ACKNOWLEDGED,
        )
    });

    let mut agents: Vec<Arc<dyn AgentHandler>> = Vec::with_capacity(15);
    agents.push(Arc::new(director));
    agents.push(Arc::new(assistant));
    agents.push(Arc::new(recon));
    agents.push(Arc::new(vuln));
    agents.push(Arc::new(flag));
    agents.push(Arc::new(learn));
    agents.push(Arc::new(ProgrammerAgent::new(programmer, tools)));
    agents.push(Arc::new(qa));
    agents.push(Arc::new(network));
    agents.push(Arc::new(hardware));
    agents.push(Arc::new(architect));
    agents.push(Arc::new(critic));
    agents.push(Arc::new(gamemaster));
    agents.push(Arc::new(education));
    agents.push(Arc::new(comms));
    agents
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::is_valid_tag;
    use crate::testing::MockLlmProvider;
    use std::collections::HashSet;

    fn catalog() -> Vec<Arc<dyn AgentHandler>> {
        builtin_agents(
            Arc::new(MockLlmProvider::new(vec![])),
            LlmSettings {
                model: "test".to_string(),
                temperature: None,
                max_tokens: None,
            },
            Arc::new(ToolSystem::with_builtins()),
        )
    }

    #[test]
    fn test_catalog_tags() {
        let tags: Vec<String> = catalog()
            .iter()
            .map(|agent| agent.descriptor().tag.clone())
            .collect();
        assert_eq!(
            tags,
            vec![
                "@director",
                "@assistant",
                "@recon",
                "@vuln",
                "@flag",
                "@learn",
                "@programmer",
                "@qa",
                "@network",
                "@hardware",
                "@architect",
                "@critic",
                "@gamemaster",
                "@education",
                "@comms",
            ]
        );
    }

    #[test]
    fn test_catalog_tags_and_ids_are_unique_and_valid() {
        let agents = catalog();
        let tags: HashSet<_> = agents.iter().map(|a| a.descriptor().tag.clone()).collect();
        let ids: HashSet<_> = agents.iter().map(|a| a.descriptor().id.clone()).collect();
        assert_eq!(tags.len(), agents.len());
        assert_eq!(ids.len(), agents.len());
        assert!(agents.iter().all(|a| is_valid_tag(&a.descriptor().tag)));
        assert!(agents.iter().all(|a| a.descriptor().input_hint.is_some()));
    }

    #[test]
    fn test_templates_only_reference_known_fields() {
        let cases: [(PromptTemplate, &[&str]); 15] = [
            (prompts::DIRECTOR, &["query"]),
            (prompts::ASSISTANT, &["question"]),
            (prompts::RECON, &["scanResults"]),
            (prompts::VULN, &["vulnerabilityData"]),
            (prompts::FLAG, &["potentialFlag"]),
            (prompts::LEARN, &["vulnerabilityType", "challengeLogs"]),
            (prompts::PROGRAMMER, &["taskDescription"]),
            (prompts::QA, &["taskDescription"]),
            (prompts::NETWORK, &["taskDescription"]),
            (prompts::HARDWARE, &["taskDescription"]),
            (prompts::ARCHITECT, &["taskDescription"]),
            (prompts::CRITIC, &["itemToReview", "reviewFocus"]),
            (prompts::GAMEMASTER, &["taskDescription"]),
            (prompts::EDUCATION, &["context", "learningGoal", "targetAudience"]),
            (prompts::COMMS, &["taskDescription"]),
        ];

        for (template, expected) in cases {
            let found: Vec<_> = template.placeholders().into_iter().collect();
            let mut expected = expected.to_vec();
            expected.sort_unstable();
            assert_eq!(found, expected);
        }
    }

    #[tokio::test]
    async fn test_every_agent_rejects_blank_task_without_llm_call() {
        let llm = Arc::new(MockLlmProvider::new(vec![]));
        let agents = builtin_agents(
            llm.clone(),
            LlmSettings {
                model: "test".to_string(),
                temperature: None,
                max_tokens: None,
            },
            Arc::new(ToolSystem::with_builtins()),
        );

        for agent in agents {
            let error = agent.invoke("   ").await.unwrap_err();
            let usage = agent.descriptor().usage();
            assert!(
                error.to_string().contains(&usage),
                "{} error lacks usage: {error}",
                agent.descriptor().tag
            );
        }
        assert_eq!(llm.call_count(), 0);
    }
}

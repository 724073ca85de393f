//! Terminal rendering of transcript entries and agent listings

use crate::agents::AgentDescriptor;
use crate::transcript::{ChatMessage, Sender};

pub fn sender_label(sender: &Sender) -> &str {
    match sender {
        Sender::User => "You",
        Sender::Agent { name, .. } => name,
        Sender::System => "System",
    }
}

/// `[HH:MM] Sender: text`, with continuation lines indented
pub fn format_message(message: &ChatMessage) -> String {
    let body = message.content.render();
    let mut lines = body.lines();
    let first = lines.next().unwrap_or_default();

    let mut out = format!(
        "[{}] {}: {}",
        message.timestamp.format("%H:%M"),
        sender_label(&message.sender),
        first
    );
    for line in lines {
        out.push_str("\n    ");
        out.push_str(line);
    }
    out
}

/// One block per agent: tag and description, then the usage hint
pub fn agent_list(agents: &[&AgentDescriptor]) -> String {
    let width = agents.iter().map(|a| a.tag.len()).max().unwrap_or(0);
    agents
        .iter()
        .map(|agent| {
            let mut entry = format!(
                "  {:<width$}  {} ({})",
                agent.tag, agent.description, agent.name
            );
            if agent.input_hint.is_some() {
                entry.push_str(&format!("\n  {:<width$}  Hint: {}", "", agent.usage()));
            }
            entry
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn welcome_text(hub_name: &str, agents: &[&AgentDescriptor]) -> String {
    format!(
        "Welcome to the {hub_name}! Task agents using their @mention tag and providing the \
         required input.\n\nAvailable Agents:\n{}",
        agent_list(agents)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::{MessageContent, Transcript};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_format_multiline_message() {
        let mut transcript = Transcript::new();
        let timestamp = Utc.with_ymd_and_hms(2025, 3, 1, 9, 5, 0).unwrap();
        transcript.append_at(
            Sender::Agent {
                id: "reconAgent".to_string(),
                name: "Recon Agent".to_string(),
            },
            MessageContent::text("line one\nline two"),
            timestamp,
            false,
        );

        assert_eq!(
            format_message(&transcript.messages()[0]),
            "[09:05] Recon Agent: line one\n    line two"
        );
    }

    #[test]
    fn test_agent_list_includes_hints() {
        let recon = AgentDescriptor::new("reconAgent", "Recon Agent", "@recon", "Summarizes scans.")
            .with_hint("<Nmap scan output>");
        let plain = AgentDescriptor::new("x", "X Agent", "@x", "No hint.");

        let listing = agent_list(&[&recon, &plain]);
        assert!(listing.contains("@recon  Summarizes scans. (Recon Agent)"));
        assert!(listing.contains("Hint: @recon <Nmap scan output>"));
        assert_eq!(listing.matches("Hint:").count(), 1);
    }

    #[test]
    fn test_welcome_text() {
        let recon = AgentDescriptor::new("reconAgent", "Recon Agent", "@recon", "Summarizes scans.");
        let welcome = welcome_text("AI Agents Hub", &[&recon]);
        assert!(welcome.starts_with("Welcome to the AI Agents Hub!"));
        assert!(welcome.contains("Available Agents:"));
        assert!(welcome.contains("@recon"));
    }
}

//! Prompt templates for the decision oracle

use crate::artifact::{Role, SwarmAgent, Team, Vacancy};
use crate::core::ids::AgentIdentity;
use crate::deliberation::{DeliberationView, Topic};
use crate::quorum::ranked;

/// Templates for generating prompts at each protocol step
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for deliberation contributions
    pub fn deliberation_system() -> &'static str {
        r#"You are an autonomous agent in a swarm that organizes itself into teams without a leader.
Agents coordinate through shared deliberations: anyone may propose, anyone may vote.
Prefer voting for an existing proposal over adding a near-duplicate.
Proposals must be a single line: a short team name, or a compact JSON object.
Respond with exactly one JSON object and nothing else."#
    }

    /// User prompt for the proposal that seeds a new deliberation
    pub fn seed_prompt(topic: &Topic, me: &AgentIdentity, requirements: &str) -> String {
        format!(
            r#"You are {name} and you are opening a new deliberation: {title}

{request}

Requirements:
{requirements}

No proposals exist yet. Reply with:
{{"action": "propose", "proposal": "<single-line proposal>"}}"#,
            name = me.name,
            title = topic.title(),
            request = topic.request_message(),
            requirements = Self::or_none(requirements),
        )
    }

    /// User prompt for contributing to an existing deliberation
    pub fn contribution_prompt(view: &DeliberationView, me: &AgentIdentity, requirements: &str) -> String {
        let mut prompt = format!(
            r#"You are {name}. Deliberation: {title}

{request}

Requirements:
{requirements}

Current proposals:
"#,
            name = me.name,
            title = view.deliberation.title,
            request = view.deliberation.request_message,
            requirements = Self::or_none(requirements),
        );

        let proposals = ranked(view);
        if proposals.is_empty() {
            prompt.push_str("(none)\n");
        }
        for response in proposals {
            prompt.push_str(&format!(
                "- [{}] {} (by {}, {} votes)\n",
                response.id,
                response.normalized_body(),
                response.responder_name,
                response.vote_count
            ));
        }

        prompt.push_str(
            r#"
Reply with one of:
{"action": "vote", "response_id": "<id from the list>"}
{"action": "propose", "proposal": "<single-line proposal>"}"#,
        );

        prompt
    }

    /// System prompt for placement decisions
    pub fn placement_system() -> &'static str {
        r#"You are an autonomous agent deciding where to work inside a self-organizing swarm.
Pick exactly one action that best matches your skills and the swarm's needs.
Respond with exactly one JSON object and nothing else."#
    }

    /// User prompt for placement decisions
    pub fn placement_prompt(
        me: &AgentIdentity,
        requirements: &str,
        roster: &[SwarmAgent],
        teams: &[Team],
        roles: &[Role],
        vacancies: &[Vacancy],
    ) -> String {
        let mut prompt = format!(
            "You are {} ({}).\n\nRequirements:\n{}\n",
            me.name,
            me.id,
            Self::or_none(requirements)
        );

        prompt.push_str("\nRoster:\n");
        Self::push_list(&mut prompt, roster, |a| {
            let team = a.team_id.as_ref().map(|t| t.as_str()).unwrap_or("-");
            format!("{} ({}) team={}", a.name, a.id, team)
        });

        prompt.push_str("\nTeams:\n");
        Self::push_list(&mut prompt, teams, |t| {
            format!("[{}] {}: {} ({} members)", t.id, t.name, t.description, t.members.len())
        });

        prompt.push_str("\nRoles:\n");
        Self::push_list(&mut prompt, roles, |r| {
            let holder = r.assignee.as_ref().map(|a| a.as_str()).unwrap_or("vacant");
            format!("[{}] {} on team {} ({})", r.id, r.name, r.team_id, holder)
        });

        prompt.push_str("\nVacancies:\n");
        Self::push_list(&mut prompt, vacancies, |v| {
            format!("[{}] {} on team {}", v.id, v.role_name, v.team_id)
        });

        prompt.push_str(
            r#"
Reply with one of:
{"action": "assign_role", "role_id": "<id>"}
{"action": "create_role", "team_id": "<id>", "name": "<role>", "description": "<text>"}
{"action": "apply_vacancy", "vacancy_id": "<id>"}
{"action": "join_team", "team_id": "<id>"}
{"action": "propose_team", "team_name": "<name>"}
{"action": "wait", "reason": "<text>"}"#,
        );

        prompt
    }

    /// Instruction re-sent after a malformed oracle reply
    pub fn retry_prompt(instruction: &str, previous_output: &str, error: &str) -> String {
        format!(
            r#"{instruction}

Your previous reply could not be used.
Previous reply:
{previous_output}

Problem: {error}

Reply again with exactly one valid JSON object."#
        )
    }

    fn or_none(text: &str) -> &str {
        if text.trim().is_empty() { "(none given)" } else { text }
    }

    fn push_list<T>(prompt: &mut String, items: &[T], render: impl Fn(&T) -> String) {
        if items.is_empty() {
            prompt.push_str("(none)\n");
        }
        for item in items {
            prompt.push_str("- ");
            prompt.push_str(&render(item));
            prompt.push('\n');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_prompt_mentions_topic() {
        let me = AgentIdentity::new("a", "Alice");
        let prompt = PromptTemplate::seed_prompt(&Topic::initial_teams("s-1"), &me, "");
        assert!(prompt.contains("[Initial Teams] swarm s-1"));
        assert!(prompt.contains("(none given)"));
        assert!(prompt.contains(r#""action": "propose""#));
    }

    #[test]
    fn test_retry_prompt_threads_error() {
        let prompt = PromptTemplate::retry_prompt("Pick a team", "Backend!", "no JSON object found");
        assert!(prompt.starts_with("Pick a team"));
        assert!(prompt.contains("Backend!"));
        assert!(prompt.contains("no JSON object found"));
    }

    #[test]
    fn test_placement_prompt_lists_empty_sections() {
        let me = AgentIdentity::new("a", "Alice");
        let prompt = PromptTemplate::placement_prompt(&me, "Build a shop", &[], &[], &[], &[]);
        assert_eq!(prompt.matches("(none)").count(), 4);
        assert!(prompt.contains("Build a shop"));
    }
}

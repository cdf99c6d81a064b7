//! Placement decisions: where a single agent puts itself in the swarm.
//!
//! Placement needs no convergence. Each agent decides independently from the
//! current roster, roles and vacancies and performs one action.

use super::Decision;
use crate::core::error::DomainError;
use crate::core::ids::{RoleId, TeamId, VacancyId};

/// A typed placement action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementDecision {
    /// Take an existing role
    AssignRole { role_id: RoleId },
    /// Create a role on a team, then take it
    CreateRole {
        team_id: TeamId,
        name: String,
        description: String,
    },
    /// Apply for an open vacancy
    ApplyVacancy { vacancy_id: VacancyId },
    /// Join an existing team without a specific role
    JoinTeam { team_id: TeamId },
    /// Start (or join) a deliberation about creating a new team
    ProposeTeam { team_name: String },
    /// Do nothing this turn
    Wait { reason: Option<String> },
}

impl PlacementDecision {
    pub fn action_name(&self) -> &'static str {
        match self {
            PlacementDecision::AssignRole { .. } => "assign_role",
            PlacementDecision::CreateRole { .. } => "create_role",
            PlacementDecision::ApplyVacancy { .. } => "apply_vacancy",
            PlacementDecision::JoinTeam { .. } => "join_team",
            PlacementDecision::ProposeTeam { .. } => "propose_team",
            PlacementDecision::Wait { .. } => "wait",
        }
    }
}

fn required<'a>(
    decision: &'a Decision,
    action: &str,
    field: &'static str,
) -> Result<&'a str, DomainError> {
    decision
        .str_field(field)
        .ok_or_else(|| DomainError::MissingField {
            action: action.to_string(),
            field,
        })
}

impl TryFrom<&Decision> for PlacementDecision {
    type Error = DomainError;

    fn try_from(decision: &Decision) -> Result<Self, Self::Error> {
        let action = decision.action().ok_or(DomainError::MissingAction)?;

        let placement = match action.as_str() {
            "assign_role" => PlacementDecision::AssignRole {
                role_id: required(decision, &action, "role_id")?.into(),
            },
            "create_role" => PlacementDecision::CreateRole {
                team_id: required(decision, &action, "team_id")?.into(),
                name: required(decision, &action, "name")?.to_string(),
                description: decision
                    .str_field("description")
                    .unwrap_or_default()
                    .to_string(),
            },
            "apply_vacancy" | "apply" => PlacementDecision::ApplyVacancy {
                vacancy_id: required(decision, &action, "vacancy_id")?.into(),
            },
            "join_team" | "join" => PlacementDecision::JoinTeam {
                team_id: required(decision, &action, "team_id")?.into(),
            },
            "propose_team" | "propose" => {
                let team_name = required(decision, &action, "team_name")?;
                if team_name.contains(['\n', '\r']) {
                    return Err(DomainError::MultiLineBody);
                }
                PlacementDecision::ProposeTeam {
                    team_name: team_name.to_string(),
                }
            }
            "wait" => PlacementDecision::Wait {
                reason: decision.str_field("reason").map(str::to_string),
            },
            _ => return Err(DomainError::UnknownAction(action.clone())),
        };

        Ok(placement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::parse_decision;

    fn convert(json: &str) -> Result<PlacementDecision, DomainError> {
        PlacementDecision::try_from(&parse_decision(json).unwrap())
    }

    #[test]
    fn test_all_actions() {
        assert_eq!(
            convert(r#"{"action": "assign_role", "role_id": "role-1"}"#),
            Ok(PlacementDecision::AssignRole {
                role_id: RoleId::new("role-1")
            })
        );
        assert_eq!(
            convert(r#"{"action": "create_role", "team_id": "t-1", "name": "Reviewer"}"#),
            Ok(PlacementDecision::CreateRole {
                team_id: TeamId::new("t-1"),
                name: "Reviewer".to_string(),
                description: String::new(),
            })
        );
        assert_eq!(
            convert(r#"{"action": "apply", "vacancy_id": "v-3"}"#),
            Ok(PlacementDecision::ApplyVacancy {
                vacancy_id: VacancyId::new("v-3")
            })
        );
        assert_eq!(
            convert(r#"{"action": "join-team", "team_id": "t-2"}"#),
            Ok(PlacementDecision::JoinTeam {
                team_id: TeamId::new("t-2")
            })
        );
        assert_eq!(
            convert(r#"{"action": "propose_team", "team_name": "Platform"}"#),
            Ok(PlacementDecision::ProposeTeam {
                team_name: "Platform".to_string()
            })
        );
        assert_eq!(
            convert(r#"{"action": "wait"}"#),
            Ok(PlacementDecision::Wait { reason: None })
        );
    }

    #[test]
    fn test_missing_arguments() {
        assert_eq!(
            convert(r#"{"action": "assign_role"}"#),
            Err(DomainError::MissingField {
                action: "assign_role".to_string(),
                field: "role_id"
            })
        );
        assert!(matches!(
            convert(r#"{"action": "create_role", "team_id": "t-1"}"#),
            Err(DomainError::MissingField { field: "name", .. })
        ));
        assert_eq!(
            convert(r#"{"action": "retire"}"#),
            Err(DomainError::UnknownAction("retire".to_string()))
        );
    }

    #[test]
    fn test_action_name() {
        let wait = PlacementDecision::Wait { reason: None };
        assert_eq!(wait.action_name(), "wait");
    }
}

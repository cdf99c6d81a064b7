//! Team blueprints: what a surviving proposal body materializes into.
//!
//! A body is either a bare team name (`"Backend"`) or a single-line JSON
//! object describing the team and the roles it should start with:
//!
//! ```json
//! {"name": "Platform", "description": "Shared infra", "roles": ["SRE", {"name": "DBA"}]}
//! ```

use crate::quorum::is_atomic_body;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleBlueprint {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamBlueprint {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub roles: Vec<RoleBlueprint>,
}

impl TeamBlueprint {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            roles: Vec::new(),
        }
    }

    /// Interpret a proposal body. Returns `None` for bodies that name nothing.
    pub fn from_body(body: &str) -> Option<Self> {
        let body = body.trim();
        if body.is_empty() {
            return None;
        }

        if body.starts_with('{')
            && let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(body)
        {
            return Self::from_fields(&fields);
        }

        Some(Self::named(body))
    }

    fn from_fields(fields: &serde_json::Map<String, Value>) -> Option<Self> {
        let name = fields
            .get("name")
            .or_else(|| fields.get("team_name"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|n| is_atomic_body(n))?
            .to_string();

        let description = fields
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .trim()
            .to_string();

        let roles = fields
            .get("roles")
            .and_then(Value::as_array)
            .map(|roles| roles.iter().filter_map(role_from_value).collect())
            .unwrap_or_default();

        Some(Self {
            name,
            description,
            roles,
        })
    }
}

fn role_from_value(value: &Value) -> Option<RoleBlueprint> {
    match value {
        Value::String(name) if is_atomic_body(name) => Some(RoleBlueprint {
            name: name.trim().to_string(),
            description: String::new(),
        }),
        Value::Object(fields) => {
            let name = fields.get("name").and_then(Value::as_str)?.trim();
            if !is_atomic_body(name) {
                return None;
            }
            Some(RoleBlueprint {
                name: name.to_string(),
                description: fields
                    .get("description")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .trim()
                    .to_string(),
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_name() {
        assert_eq!(
            TeamBlueprint::from_body("  Backend "),
            Some(TeamBlueprint::named("Backend"))
        );
        assert_eq!(TeamBlueprint::from_body("   "), None);
    }

    #[test]
    fn test_structured_body() {
        let body = r#"{"name": "Platform", "description": "Shared infra", "roles": ["SRE", {"name": "DBA", "description": "Owns schemas"}, 7, ""]}"#;
        let blueprint = TeamBlueprint::from_body(body).unwrap();
        assert_eq!(blueprint.name, "Platform");
        assert_eq!(blueprint.description, "Shared infra");
        assert_eq!(blueprint.roles.len(), 2);
        assert_eq!(blueprint.roles[1].description, "Owns schemas");
    }

    #[test]
    fn test_structured_body_without_name_is_rejected() {
        assert_eq!(TeamBlueprint::from_body(r#"{"roles": ["SRE"]}"#), None);
    }

    #[test]
    fn test_escaped_line_breaks_never_become_names() {
        // Compact JSON keeps the body on one line but decodes to a multi-line name
        let body = r#"{"name": "Front\nBack", "roles": ["SRE"]}"#;
        assert_eq!(TeamBlueprint::from_body(body), None);

        let body = r#"{"name": "Platform", "roles": ["Dev\nOps", {"name": "On\rCall"}, "SRE"]}"#;
        let blueprint = TeamBlueprint::from_body(body).unwrap();
        assert_eq!(blueprint.roles, vec![RoleBlueprint {
            name: "SRE".to_string(),
            description: String::new(),
        }]);
    }

    #[test]
    fn test_brace_prefixed_non_json_is_a_name() {
        assert_eq!(
            TeamBlueprint::from_body("{Team} Alpha"),
            Some(TeamBlueprint::named("{Team} Alpha"))
        );
    }
}

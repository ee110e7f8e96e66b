use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Creator,
    Manager,
    Editor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Creator => "creator",
            Role::Manager => "manager",
            Role::Editor => "editor",
        }
    }

    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "creator" => Some(Role::Creator),
            "manager" => Some(Role::Manager),
            "editor" => Some(Role::Editor),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub user_id: Uuid,
    pub username: String,
    pub role: Role,
    pub creator_id: Option<Uuid>,
    pub invitation_accepted: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    /// Integrations, files and tests are keyed by the owning creator: the user
    /// itself for creators, the linked creator for managers and editors.
    pub fn creator_scope(&self) -> Uuid {
        match self.role {
            Role::Creator => self.user_id,
            _ => self.creator_id.unwrap_or(self.user_id),
        }
    }

    pub fn has_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parse_roundtrip() {
        for role in [Role::Creator, Role::Manager, Role::Editor] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("admin"), None);
    }

    #[test]
    fn creator_scope_resolution() {
        let creator_id = Uuid::new_v4();
        let creator = User {
            user_id: creator_id,
            username: "alice".to_string(),
            role: Role::Creator,
            creator_id: None,
            invitation_accepted: true,
            created_at: chrono::Utc::now(),
        };
        assert_eq!(creator.creator_scope(), creator_id);

        let editor = User {
            user_id: Uuid::new_v4(),
            username: "bob".to_string(),
            role: Role::Editor,
            creator_id: Some(creator_id),
            invitation_accepted: true,
            created_at: chrono::Utc::now(),
        };
        assert_eq!(editor.creator_scope(), creator_id);
    }
}

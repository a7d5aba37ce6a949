//! Role registry.
//!
//! The `RoleRegistry` is responsible for:
//! - Holding the roles loaded from configuration
//! - Looking roles up by name
//! - Falling back to the built-in advisor when a role is missing

use fx_protocol::agent_models::AgentRole;
use std::collections::HashMap;
use tracing::warn;

/// Name of the role used when none is requested.
pub const DEFAULT_ROLE: &str = "advisor";

const BUILTIN_ADVISOR_PROMPT: &str = "\
Ты консультант по обмену валюты. Тебе передают официальный курс USD/RUB, \
список банков рядом с адресом пользователя и демонстрационные курсы покупки \
и продажи в этих банках.

Правила:
- Опирайся только на переданные данные, ничего не выдумывай.
- Если источник помечен [SOURCE FAILED] или значение равно unknown, прямо \
скажи, каких данных не хватает.
- Сравни курсы банков с официальным курсом и назови лучший вариант для \
покупки и для продажи долларов.
- Напомни, что курсы банков демонстрационные и их нужно уточнить в отделении.

Отвечай по-русски, кратко и по делу.";

/// Registry of all configured roles.
///
/// Lookups never fail: an unknown name resolves to the configured
/// `advisor` role if there is one, and to the built-in advisor otherwise.
pub struct RoleRegistry {
    roles: HashMap<String, AgentRole>,
    builtin: AgentRole,
}

impl RoleRegistry {
    /// Create a registry from roles loaded out of `.fx-advisor/agents/*.md`.
    ///
    /// When two files declare the same name the later one wins.
    pub fn new(roles: Vec<AgentRole>) -> Self {
        let roles = roles
            .into_iter()
            .map(|role| (role.name.clone(), role))
            .collect();

        Self {
            roles,
            builtin: Self::builtin_advisor(),
        }
    }

    /// The role shipped with the binary.
    pub fn builtin_advisor() -> AgentRole {
        AgentRole {
            name: DEFAULT_ROLE.to_string(),
            description: "Recommends where to exchange USD/RUB".to_string(),
            model: String::new(),
            color: "green".to_string(),
            system_prompt: BUILTIN_ADVISOR_PROMPT.to_string(),
        }
    }

    /// Get a role by exact name.
    pub fn get(&self, name: &str) -> Option<&AgentRole> {
        self.roles.get(name)
    }

    /// Resolve `name` (or the default role when `None`) with fallback.
    ///
    /// # Behavior
    ///
    /// 1. The requested role, if configured
    /// 2. The configured `advisor` role
    /// 3. The built-in advisor
    pub fn resolve(&self, name: Option<&str>) -> &AgentRole {
        let requested = name.unwrap_or(DEFAULT_ROLE);
        if let Some(role) = self.roles.get(requested) {
            return role;
        }

        if requested != DEFAULT_ROLE {
            warn!(role = requested, fallback = DEFAULT_ROLE, "role not found, using fallback");
        }

        self.roles.get(DEFAULT_ROLE).unwrap_or(&self.builtin)
    }

    /// List all configured role names, sorted.
    pub fn list_roles(&self) -> Vec<String> {
        let mut names: Vec<String> = self.roles.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a role with the given name is configured.
    pub fn has_role(&self, name: &str) -> bool {
        self.roles.contains_key(name)
    }
}

impl Default for RoleRegistry {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

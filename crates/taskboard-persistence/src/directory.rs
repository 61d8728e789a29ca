use async_trait::async_trait;
use std::collections::HashMap;
use taskboard_core::{BoardConfig, TaskboardResult};
use taskboard_domain::{IdentityProvider, NameResolver, UserId};

/// Fixed user directory: one signed-in user and a table of display names.
///
/// Stands in for the hosted profile service when running locally.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    current_user: Option<UserId>,
    names: HashMap<UserId, String>,
}

impl StaticDirectory {
    pub fn new(current_user: Option<UserId>, names: HashMap<UserId, String>) -> Self {
        Self {
            current_user,
            names,
        }
    }

    pub fn from_config(config: &BoardConfig) -> Self {
        Self::new(config.current_user, config.display_names.clone())
    }

    pub fn with_current_user(mut self, user: Option<UserId>) -> Self {
        if user.is_some() {
            self.current_user = user;
        }
        self
    }

    pub fn with_name(mut self, id: UserId, name: impl Into<String>) -> Self {
        self.names.insert(id, name.into());
        self
    }
}

impl IdentityProvider for StaticDirectory {
    fn current_user(&self) -> Option<UserId> {
        self.current_user
    }
}

#[async_trait]
impl NameResolver for StaticDirectory {
    /// Unknown ids are simply absent from the result.
    async fn resolve_names(&self, ids: &[UserId]) -> TaskboardResult<HashMap<UserId, String>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.names.get(id).map(|name| (*id, name.clone())))
            .collect())
    }
}

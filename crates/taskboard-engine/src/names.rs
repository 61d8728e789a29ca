use std::collections::HashMap;
use std::sync::Arc;
use taskboard_domain::{NameResolver, UserId};

/// Session-wide cache of author display names.
///
/// Each id is looked up at most once per session. Ids the resolver does not
/// know are cached with a truncated-id fallback; a failed lookup caches
/// nothing so the next load can try again.
pub struct NameCache {
    resolver: Arc<dyn NameResolver>,
    names: HashMap<UserId, String>,
    display_id_len: usize,
}

impl NameCache {
    pub fn new(resolver: Arc<dyn NameResolver>, display_id_len: usize) -> Self {
        Self {
            resolver,
            names: HashMap::new(),
            display_id_len,
        }
    }

    pub async fn resolve(&mut self, ids: &[UserId]) {
        let mut missing: Vec<UserId> = ids
            .iter()
            .copied()
            .filter(|id| !self.names.contains_key(id))
            .collect();
        missing.sort();
        missing.dedup();
        if missing.is_empty() {
            return;
        }

        match self.resolver.resolve_names(&missing).await {
            Ok(mut found) => {
                tracing::debug!("Resolved {} of {} author names", found.len(), missing.len());
                for id in missing {
                    let name = found
                        .remove(&id)
                        .filter(|n| !n.trim().is_empty())
                        .unwrap_or_else(|| self.fallback(id));
                    self.names.insert(id, name);
                }
            }
            Err(e) => {
                tracing::warn!("Author name lookup failed: {}", e);
            }
        }
    }

    pub fn display_name(&self, id: UserId) -> String {
        self.names
            .get(&id)
            .cloned()
            .unwrap_or_else(|| self.fallback(id))
    }

    pub fn is_cached(&self, id: UserId) -> bool {
        self.names.contains_key(&id)
    }

    fn fallback(&self, id: UserId) -> String {
        id.to_string().chars().take(self.display_id_len).collect()
    }
}

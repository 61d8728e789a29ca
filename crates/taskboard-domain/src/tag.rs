use std::collections::BTreeSet;
use taskboard_core::config::DEFAULT_TAGS;
use taskboard_core::{BoardConfig, TaskboardError, TaskboardResult};

/// The fixed set of tags a card may carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagVocabulary {
    tags: BTreeSet<String>,
}

impl TagVocabulary {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(|t| normalize(&t.into())).collect(),
        }
    }

    pub fn from_config(config: &BoardConfig) -> Self {
        Self::new(config.effective_tags())
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(&normalize(tag))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    /// Rejects the first tag outside the vocabulary.
    pub fn check(&self, tags: &BTreeSet<String>) -> TaskboardResult<()> {
        match tags.iter().find(|t| !self.contains(t)) {
            Some(unknown) => Err(TaskboardError::validation(
                "tags",
                format!("unknown tag '{unknown}'"),
            )),
            None => Ok(()),
        }
    }
}

impl Default for TagVocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_TAGS.iter().copied())
    }
}

fn normalize(tag: &str) -> String {
    tag.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_vocabulary() {
        let vocab = TagVocabulary::default();
        assert!(vocab.contains("bug"));
        assert!(vocab.contains(" Feature "));
        assert!(!vocab.contains("urgent"));
    }

    #[test]
    fn test_check_reports_unknown_tag() {
        let vocab = TagVocabulary::new(["ops", "infra"]);
        let mut tags = BTreeSet::new();
        tags.insert("ops".to_string());
        assert!(vocab.check(&tags).is_ok());

        tags.insert("marketing".to_string());
        let err = vocab.check(&tags).unwrap_err();
        assert_eq!(err.field(), Some("tags"));
        assert!(err.to_string().contains("marketing"));
    }

    #[test]
    fn test_from_config() {
        let config = BoardConfig {
            tags: Some(vec!["alpha".into()]),
            ..Default::default()
        };
        let vocab = TagVocabulary::from_config(&config);
        assert_eq!(vocab.iter().collect::<Vec<_>>(), vec!["alpha"]);
    }
}

//! Named registry of knowledge sources.
//!
//! A thin lookup table mapping names to [`Knowledge`] implementations,
//! with a convenience for wrapping everything registered into one
//! [`CompositeKnowledge`]. Entries keep registration order — that order
//! is the composite's source order, which decides dedup precedence on
//! merged retrievals.
//!
//! The registry is passed explicitly through whatever orchestration
//! layer owns it; nothing here is process-global.

use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::composite::CompositeKnowledge;
use crate::error::{Error, Result};
use crate::knowledge::Knowledge;

struct Registered {
    name: String,
    description: String,
    source: Arc<dyn Knowledge>,
}

/// Insertion-ordered name → knowledge source map.
#[derive(Default)]
pub struct KnowledgeRegistry {
    entries: RwLock<Vec<Registered>>,
}

impl KnowledgeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `source` under `name`, with a human-readable
    /// description for tool-catalog consumers. Re-registering a name
    /// replaces the source in place, keeping its position.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when `name` is blank.
    pub fn register(
        &self,
        name: &str,
        source: Arc<dyn Knowledge>,
        description: &str,
    ) -> Result<()> {
        if name.trim().is_empty() {
            return Err(Error::InvalidArgument(
                "knowledge source name cannot be empty".into(),
            ));
        }
        let mut entries = self.entries.write().unwrap();
        match entries.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => {
                entry.description = description.to_string();
                entry.source = source;
            }
            None => entries.push(Registered {
                name: name.to_string(),
                description: description.to_string(),
                source,
            }),
        }
        debug!(name, "registered knowledge source");
        Ok(())
    }

    /// Remove and return the source registered under `name`.
    pub fn unregister(&self, name: &str) -> Option<Arc<dyn Knowledge>> {
        let mut entries = self.entries.write().unwrap();
        let position = entries.iter().position(|entry| entry.name == name)?;
        let removed = entries.remove(position);
        debug!(name, "unregistered knowledge source");
        Some(removed.source)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Knowledge>> {
        self.entries
            .read()
            .unwrap()
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| Arc::clone(&entry.source))
    }

    pub fn description(&self, name: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap()
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.description.clone())
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.entries
            .read()
            .unwrap()
            .iter()
            .map(|entry| entry.name.clone())
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries
            .read()
            .unwrap()
            .iter()
            .any(|entry| entry.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().unwrap().clear();
        debug!("cleared all knowledge sources");
    }

    /// Wrap every currently registered source into one composite, in
    /// registration order.
    ///
    /// # Errors
    ///
    /// `InvalidState` when nothing is registered.
    pub fn create_composite(&self) -> Result<CompositeKnowledge> {
        let entries = self.entries.read().unwrap();
        if entries.is_empty() {
            return Err(Error::InvalidState(
                "cannot create a composite with no registered knowledge sources".into(),
            ));
        }
        CompositeKnowledge::new(
            entries
                .iter()
                .map(|entry| Arc::clone(&entry.source))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::knowledge::BatchReport;
    use crate::models::{Document, RetrieveConfig};

    struct NullSource;

    #[async_trait]
    impl Knowledge for NullSource {
        async fn add_documents(&self, _documents: Vec<Document>) -> Result<BatchReport> {
            Ok(BatchReport::default())
        }

        async fn retrieve(
            &self,
            _query: &str,
            _config: &RetrieveConfig,
        ) -> Result<Vec<Document>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_register_lookup_unregister() {
        let registry = KnowledgeRegistry::new();
        registry
            .register("docs", Arc::new(NullSource), "product docs")
            .unwrap();
        assert!(registry.contains("docs"));
        assert_eq!(registry.description("docs").as_deref(), Some("product docs"));
        assert!(registry.get("docs").is_some());
        assert_eq!(registry.len(), 1);

        assert!(registry.unregister("docs").is_some());
        assert!(registry.unregister("docs").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_blank_name_rejected() {
        let registry = KnowledgeRegistry::new();
        assert!(registry.register("", Arc::new(NullSource), "").is_err());
        assert!(registry.register("   ", Arc::new(NullSource), "").is_err());
    }

    #[test]
    fn test_reregister_keeps_position() {
        let registry = KnowledgeRegistry::new();
        registry.register("a", Arc::new(NullSource), "").unwrap();
        registry.register("b", Arc::new(NullSource), "").unwrap();
        registry.register("a", Arc::new(NullSource), "updated").unwrap();
        assert_eq!(registry.names(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(registry.description("a").as_deref(), Some("updated"));
    }

    #[test]
    fn test_create_composite_requires_sources() {
        let registry = KnowledgeRegistry::new();
        let err = registry.create_composite().unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));

        registry.register("a", Arc::new(NullSource), "").unwrap();
        registry.register("b", Arc::new(NullSource), "").unwrap();
        let composite = registry.create_composite().unwrap();
        assert_eq!(composite.len(), 2);
    }

    #[test]
    fn test_clear() {
        let registry = KnowledgeRegistry::new();
        registry.register("a", Arc::new(NullSource), "").unwrap();
        registry.clear();
        assert!(registry.is_empty());
        assert!(!registry.contains("a"));
    }
}

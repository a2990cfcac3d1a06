//! Provider registry
//!
//! Maps provider names to factories building a `DatasourceProvider` from a
//! `ProviderConfig`. Entries keep insertion order; re-registering a name
//! replaces the factory in place.

use crate::config::ProviderConfig;
use crate::provider::{DatasourceProvider, RedHatDockerConfig, RedHatDockerProvider};
use std::fmt;
use std::sync::Arc;

/// Builds one provider instance for a run
pub type ProviderFactory =
    Arc<dyn Fn(ProviderConfig) -> anyhow::Result<Box<dyn DatasourceProvider>> + Send + Sync>;

/// Catalog of batch providers keyed by name
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    entries: Vec<(String, ProviderFactory)>,
}

impl ProviderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every provider shipped with this crate
    pub fn with_builtin_providers() -> anyhow::Result<Self> {
        let mut registry = Self::new();
        registry.register(|config| {
            let provider = RedHatDockerProvider::new(RedHatDockerConfig::new(config))?;
            Ok(Box::new(provider) as Box<dyn DatasourceProvider>)
        })?;
        Ok(registry)
    }

    /// Register a provider factory.
    ///
    /// A throwaway instance built with the default configuration supplies the
    /// name. If that construction fails the error is returned and the
    /// registry is left untouched.
    pub fn register<F>(&mut self, factory: F) -> anyhow::Result<()>
    where
        F: Fn(ProviderConfig) -> anyhow::Result<Box<dyn DatasourceProvider>>
            + Send
            + Sync
            + 'static,
    {
        let name = factory(ProviderConfig::default())?.name().to_string();
        let factory: ProviderFactory = Arc::new(factory);

        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => {
                tracing::debug!(provider = %name, "replacing registered provider");
                entry.1 = factory;
            }
            None => {
                tracing::debug!(provider = %name, "registered provider");
                self.entries.push((name, factory));
            }
        }
        Ok(())
    }

    /// Factory registered under `name`
    pub fn get(&self, name: &str) -> Option<ProviderFactory> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, factory)| Arc::clone(factory))
    }

    /// Registered names in insertion order
    pub fn list_names(&self) -> Vec<String> {
        self.entries.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Snapshot of every entry in insertion order
    pub fn all(&self) -> Vec<(String, ProviderFactory)> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.list_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DatasourceOutput;
    use crate::provider::FetchOptions;
    use async_trait::async_trait;

    struct NamedProvider {
        name: &'static str,
        package: &'static str,
    }

    #[async_trait]
    impl DatasourceProvider for NamedProvider {
        fn name(&self) -> &str {
            self.name
        }

        async fn fetch_outputs(
            &self,
            _options: &FetchOptions,
        ) -> anyhow::Result<Vec<DatasourceOutput>> {
            Ok(vec![DatasourceOutput::new("docker", self.package)])
        }
    }

    fn named(
        name: &'static str,
        package: &'static str,
    ) -> impl Fn(ProviderConfig) -> anyhow::Result<Box<dyn DatasourceProvider>> + Send + Sync
    {
        move |_config| Ok(Box::new(NamedProvider { name, package }) as Box<dyn DatasourceProvider>)
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = ProviderRegistry::new();
        registry.register(named("alpha", "a")).unwrap();

        assert!(registry.get("alpha").is_some());
        assert!(registry.get("missing").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_list_names_keeps_insertion_order() {
        let mut registry = ProviderRegistry::new();
        registry.register(named("zeta", "z")).unwrap();
        registry.register(named("alpha", "a")).unwrap();
        registry.register(named("mid", "m")).unwrap();

        assert_eq!(registry.list_names(), vec!["zeta", "alpha", "mid"]);
    }

    #[tokio::test]
    async fn test_reregister_replaces_in_place() {
        let mut registry = ProviderRegistry::new();
        registry.register(named("alpha", "first")).unwrap();
        registry.register(named("beta", "b")).unwrap();
        registry.register(named("alpha", "second")).unwrap();

        assert_eq!(registry.list_names(), vec!["alpha", "beta"]);

        let factory = registry.get("alpha").unwrap();
        let provider = factory(ProviderConfig::default()).unwrap();
        let outputs = provider.fetch_outputs(&FetchOptions::default()).await.unwrap();
        assert_eq!(outputs[0].package_name, "second");
    }

    #[test]
    fn test_failing_construction_leaves_registry_unchanged() {
        let mut registry = ProviderRegistry::new();
        registry.register(named("alpha", "a")).unwrap();

        let err = registry
            .register(|_config| anyhow::bail!("missing credentials"))
            .unwrap_err();

        assert!(err.to_string().contains("missing credentials"));
        assert_eq!(registry.list_names(), vec!["alpha"]);
    }

    #[test]
    fn test_all_returns_a_copy() {
        let mut registry = ProviderRegistry::new();
        registry.register(named("alpha", "a")).unwrap();

        let mut snapshot = registry.all();
        snapshot.clear();

        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_empty_registry() {
        let registry = ProviderRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.list_names().is_empty());
        assert!(registry.all().is_empty());
    }

    #[test]
    fn test_builtin_providers() {
        let registry = ProviderRegistry::with_builtin_providers().unwrap();
        assert_eq!(registry.list_names(), vec!["redhat-docker"]);
        assert_eq!(
            format!("{:?}", registry),
            "ProviderRegistry { providers: [\"redhat-docker\"] }"
        );
    }
}

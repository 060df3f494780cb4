// SPDX-License-Identifier: MIT OR Apache-2.0

//! Host lifecycle adapter.
//!
//! Infrastructure hosts drive a resource through create, diff and update.
//! [`ResolvedConfigProvider`] maps each step onto a fresh resolution; the host
//! stays responsible for persisting what it returns.

use crate::domain::{ConfigurationResolver, PersistableState, ResolveInputs, Result};

/// Outcome of [`ResolvedConfigProvider::create`].
#[derive(Clone, Debug, PartialEq)]
pub struct CreateResult {
    /// Stable resource id, `{application}-{profile}-{label}`
    pub id: String,
    /// The resolved state to persist
    pub state: PersistableState,
}

/// Input fields that differ between two versions of a resource.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputDiff {
    /// camelCase names of the changed fields
    pub changed_fields: Vec<&'static str>,
}

impl InputDiff {
    /// Whether any field changed.
    pub fn has_changes(&self) -> bool {
        !self.changed_fields.is_empty()
    }

    /// Whether `field` is among the changed ones.
    pub fn changed(&self, field: &str) -> bool {
        self.changed_fields.iter().any(|f| *f == field)
    }
}

/// Create, diff and update on top of a [`ConfigurationResolver`].
///
/// # Examples
///
/// ```rust,no_run
/// use cfgresolve::adapters::ResolvedConfigProvider;
/// use cfgresolve::domain::ResolveInputs;
/// use cfgresolve::service::Resolver;
///
/// # async fn run() -> cfgresolve::domain::Result<()> {
/// let provider = ResolvedConfigProvider::new(Resolver::http()?);
/// let inputs = ResolveInputs::new("http://config:8888", "orders", "prod");
/// let created = provider.create(&inputs).await?;
/// println!("{} has {} properties", created.id, created.state.properties.len());
/// # Ok(())
/// # }
/// ```
pub struct ResolvedConfigProvider<R> {
    resolver: R,
}

impl<R: ConfigurationResolver> ResolvedConfigProvider<R> {
    /// Wraps a resolver.
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    /// The wrapped resolver.
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Resolves the inputs and assigns the resource id.
    pub async fn create(&self, inputs: &ResolveInputs) -> Result<CreateResult> {
        let state = self.resolver.resolve(inputs).await?;
        let id = resource_id(inputs);
        tracing::info!("Created resolved configuration {}", id);
        Ok(CreateResult { id, state })
    }

    /// Compares two input versions field by field.
    pub fn diff(&self, old: &ResolveInputs, new: &ResolveInputs) -> InputDiff {
        diff_inputs(old, new)
    }

    /// Re-resolves with the new inputs.
    ///
    /// The previous state is only used to report how many properties
    /// changed.
    pub async fn update(
        &self,
        id: &str,
        old_state: &PersistableState,
        new_inputs: &ResolveInputs,
    ) -> Result<PersistableState> {
        let state = self.resolver.resolve(new_inputs).await?;
        tracing::info!(
            "Updated resolved configuration {}: {} propert(ies) changed",
            id,
            changed_properties(old_state, &state)
        );
        Ok(state)
    }
}

/// `{application}-{profile}-{label}`, with `default` for a missing label.
pub fn resource_id(inputs: &ResolveInputs) -> String {
    format!(
        "{}-{}-{}",
        inputs.application,
        inputs.profile,
        inputs.effective_label().unwrap_or("default")
    )
}

/// Compares two input versions field by field.
pub fn diff_inputs(old: &ResolveInputs, new: &ResolveInputs) -> InputDiff {
    let mut changed_fields = Vec::new();
    let mut check = |field: &'static str, differs: bool| {
        if differs {
            changed_fields.push(field);
        }
    };
    check("configServerUrl", old.config_server_url != new.config_server_url);
    check("application", old.application != new.application);
    check("profile", old.profile != new.profile);
    check("label", old.effective_label() != new.effective_label());
    check("username", old.username != new.username);
    check("password", old.password != new.password);
    check("timeoutMs", old.effective_timeout_ms() != new.effective_timeout_ms());
    check("propertySources", old.property_sources != new.property_sources);
    check("secretSources", old.secret_sources != new.secret_sources);
    check("autoDetectSecrets", old.auto_detect_secrets != new.auto_detect_secrets);
    check("secretKeyPattern", old.secret_key_pattern != new.secret_key_pattern);
    check("retry", old.retry != new.retry);
    check("secretOverrides", old.secret_overrides != new.secret_overrides);
    InputDiff { changed_fields }
}

fn changed_properties(old: &PersistableState, new: &PersistableState) -> usize {
    let updated = new
        .properties
        .iter()
        .filter(|(key, value)| old.properties.get(*key) != Some(*value))
        .count();
    let removed = old
        .properties
        .keys()
        .filter(|key| !new.properties.contains_key(*key))
        .count();
    updated + removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConfigError, NormalizedValue, RetryPolicy};
    use std::collections::BTreeMap;
    use std::future::Future;

    struct Echo;

    impl ConfigurationResolver for Echo {
        fn resolve(
            &self,
            inputs: &ResolveInputs,
        ) -> impl Future<Output = Result<PersistableState>> + Send {
            let outcome = inputs.validate().map(|_| {
                let mut properties = BTreeMap::new();
                properties.insert(
                    "profile".to_string(),
                    NormalizedValue::from(inputs.profile.as_str()),
                );
                PersistableState {
                    provenance: properties
                        .keys()
                        .map(|k| (k.clone(), vec!["echo".to_string()]))
                        .collect(),
                    properties,
                    sources: Vec::new(),
                    secret_keys: Default::default(),
                    config_server_url: inputs.config_server_url.clone(),
                    application: inputs.application.clone(),
                    profile: inputs.profile.clone(),
                    label: inputs.label.clone(),
                    version: None,
                    state: None,
                    profiles: Vec::new(),
                }
            });
            async move { outcome }
        }
    }

    fn inputs() -> ResolveInputs {
        ResolveInputs::new("http://config", "orders", "prod")
    }

    #[test]
    fn test_resource_id() {
        assert_eq!(resource_id(&inputs()), "orders-prod-default");
        assert_eq!(resource_id(&inputs().with_label("main")), "orders-prod-main");
        assert_eq!(resource_id(&inputs().with_label("")), "orders-prod-default");
    }

    #[test]
    fn test_diff() {
        let provider = ResolvedConfigProvider::new(Echo);
        assert!(!provider.diff(&inputs(), &inputs()).has_changes());
        assert!(!provider
            .diff(&inputs(), &inputs().with_timeout_ms(10_000))
            .has_changes());

        let diff = provider.diff(
            &inputs(),
            &inputs()
                .with_credentials("u", "p")
                .with_retry(RetryPolicy::no_retry()),
        );
        assert_eq!(diff.changed_fields, vec!["username", "password", "retry"]);
        assert!(diff.changed("password"));
    }

    #[tokio::test]
    async fn test_create_and_update() {
        let provider = ResolvedConfigProvider::new(Echo);
        let created = provider.create(&inputs()).await.unwrap();
        assert_eq!(created.id, "orders-prod-default");

        let mut changed = inputs();
        changed.profile = "dev".to_string();
        let updated = provider
            .update(&created.id, &created.state, &changed)
            .await
            .unwrap();
        assert_eq!(updated.property("profile"), Some(&NormalizedValue::from("dev")));
        assert_eq!(changed_properties(&created.state, &updated), 1);
    }

    #[tokio::test]
    async fn test_create_propagates_errors() {
        let provider = ResolvedConfigProvider::new(Echo);
        let error = provider
            .create(&ResolveInputs::new("http://config", "", "prod"))
            .await
            .unwrap_err();
        assert!(matches!(error, ConfigError::ValidationError { .. }));
    }
}

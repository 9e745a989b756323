use std::sync::Arc;

use serde::Serialize;

use crate::evaluation::ResolutionDetails;

/// Descriptive information about a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderMetadata {
    pub name: String,
}

/// The contract a flag provider implements to be used by a [`Client`].
///
/// Every method returns a value: providers resolve failures to `default_value` themselves.
pub trait FeatureProvider {
    fn metadata(&self) -> &ProviderMetadata;

    fn resolve_boolean_evaluation(&self, flag_key: &str, default_value: bool)
        -> ResolutionDetails<bool>;

    fn resolve_string_evaluation(
        &self,
        flag_key: &str,
        default_value: String,
    ) -> ResolutionDetails<String>;

    fn resolve_number_evaluation(&self, flag_key: &str, default_value: f64)
        -> ResolutionDetails<f64>;

    fn resolve_object_evaluation(
        &self,
        flag_key: &str,
        default_value: serde_json::Value,
    ) -> ResolutionDetails<serde_json::Value>;
}

/// Application-facing flag client.
///
/// The client does not own any global state: construct it from an initialized provider and pass it
/// to whatever needs flags.
///
/// # Examples
/// ```
/// # use std::sync::Arc;
/// # use airtable_flags::{AirtableProvider, Client, FlagRecord, MemoryStore};
/// let store = MemoryStore::new().with_page("Flags", vec![FlagRecord::new("banner", true, "hi")]);
/// let mut provider = AirtableProvider::new(store, "Flags");
/// provider.initialize().unwrap();
///
/// let client = Client::new(Arc::new(provider));
/// assert_eq!(client.get_string_value("banner", "hello"), "hi");
/// assert_eq!(client.get_string_value("missing", "hello"), "hello");
/// ```
#[derive(Clone)]
pub struct Client {
    provider: Arc<dyn FeatureProvider + Send + Sync>,
}

impl Client {
    pub fn new(provider: Arc<dyn FeatureProvider + Send + Sync>) -> Self {
        Client { provider }
    }

    pub fn provider_metadata(&self) -> &ProviderMetadata {
        self.provider.metadata()
    }

    pub fn get_boolean_value(&self, flag_key: &str, default_value: bool) -> bool {
        self.get_boolean_details(flag_key, default_value).value
    }

    pub fn get_boolean_details(
        &self,
        flag_key: &str,
        default_value: bool,
    ) -> ResolutionDetails<bool> {
        let details = self
            .provider
            .resolve_boolean_evaluation(flag_key, default_value);
        log_details(flag_key, &details);
        details
    }

    pub fn get_string_value(&self, flag_key: &str, default_value: impl Into<String>) -> String {
        self.get_string_details(flag_key, default_value).value
    }

    pub fn get_string_details(
        &self,
        flag_key: &str,
        default_value: impl Into<String>,
    ) -> ResolutionDetails<String> {
        let details = self
            .provider
            .resolve_string_evaluation(flag_key, default_value.into());
        log_details(flag_key, &details);
        details
    }

    pub fn get_number_value(&self, flag_key: &str, default_value: f64) -> f64 {
        self.get_number_details(flag_key, default_value).value
    }

    pub fn get_number_details(&self, flag_key: &str, default_value: f64) -> ResolutionDetails<f64> {
        let details = self
            .provider
            .resolve_number_evaluation(flag_key, default_value);
        log_details(flag_key, &details);
        details
    }

    pub fn get_object_value(
        &self,
        flag_key: &str,
        default_value: serde_json::Value,
    ) -> serde_json::Value {
        self.get_object_details(flag_key, default_value).value
    }

    pub fn get_object_details(
        &self,
        flag_key: &str,
        default_value: serde_json::Value,
    ) -> ResolutionDetails<serde_json::Value> {
        let details = self
            .provider
            .resolve_object_evaluation(flag_key, default_value);
        log_details(flag_key, &details);
        details
    }
}

fn log_details<T: Serialize + 'static>(flag_key: &str, details: &ResolutionDetails<T>) {
    log::trace!(target: "airtable_flags",
                flag_key,
                details:serde;
                "evaluated a flag");
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::{Client, FeatureProvider, ProviderMetadata};
    use crate::{
        evaluation::{Reason, ResolutionDetails, ResolutionError},
        AirtableProvider, FlagRecord, MemoryStore,
    };

    fn client() -> Client {
        let store = MemoryStore::new()
            .with_page(
                "Flags",
                vec![
                    FlagRecord::new("dark-mode", true, true),
                    FlagRecord::new("banner", true, "Welcome"),
                ],
            )
            .with_page(
                "Flags",
                vec![
                    FlagRecord::new("max-upload-mb", true, 25.0),
                    FlagRecord::new("checkout", true, json!({ "provider": "stripe" })),
                    FlagRecord::new("legacy", false, true),
                ],
            );
        let mut provider = AirtableProvider::new(store, "Flags");
        provider.initialize().unwrap();
        Client::new(Arc::new(provider))
    }

    #[test]
    fn reports_provider_metadata() {
        assert_eq!(client().provider_metadata().name, "Airtable Feature Provider");
    }

    #[test]
    fn returns_provider_values() {
        let client = client();
        assert!(client.get_boolean_value("dark-mode", false));
        assert_eq!(client.get_string_value("banner", "d"), "Welcome");
        assert_eq!(client.get_number_value("max-upload-mb", 10.0), 25.0);
        assert_eq!(
            client.get_object_value("checkout", json!({})),
            json!({ "provider": "stripe" })
        );
    }

    #[test]
    fn details_explain_fallbacks() {
        let client = client();

        let disabled = client.get_boolean_details("legacy", false);
        assert!(!disabled.value);
        assert_eq!(disabled.reason, Reason::Disabled);

        let mismatch = client.get_number_details("banner", 1.0);
        assert_eq!(mismatch.value, 1.0);
        assert_eq!(mismatch.reason, Reason::Error);
        assert!(matches!(
            mismatch.error,
            Some(ResolutionError::TypeMismatch { .. })
        ));
    }

    struct FixedProvider {
        metadata: ProviderMetadata,
    }

    impl FeatureProvider for FixedProvider {
        fn metadata(&self) -> &ProviderMetadata {
            &self.metadata
        }

        fn resolve_boolean_evaluation(&self, _: &str, _: bool) -> ResolutionDetails<bool> {
            ResolutionDetails::matched(true)
        }

        fn resolve_string_evaluation(&self, _: &str, _: String) -> ResolutionDetails<String> {
            ResolutionDetails::matched("fixed".to_owned())
        }

        fn resolve_number_evaluation(&self, _: &str, _: f64) -> ResolutionDetails<f64> {
            ResolutionDetails::matched(42.0)
        }

        fn resolve_object_evaluation(
            &self,
            _: &str,
            default_value: serde_json::Value,
        ) -> ResolutionDetails<serde_json::Value> {
            ResolutionDetails::fallback(default_value, ResolutionError::FlagNotFound)
        }
    }

    #[test]
    fn works_with_any_provider() {
        let client = Client::new(Arc::new(FixedProvider {
            metadata: ProviderMetadata {
                name: "fixed".to_owned(),
            },
        }));

        assert_eq!(client.provider_metadata().name, "fixed");
        assert!(client.get_boolean_value("anything", false));
        assert_eq!(client.get_string_value("anything", "d"), "fixed");
        assert_eq!(client.get_number_value("anything", 0.0), 42.0);
        assert_eq!(client.get_object_value("anything", json!([1])), json!([1]));
    }
}

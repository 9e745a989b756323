use crate::{
    client::{FeatureProvider, ProviderMetadata},
    evaluation::{FlagType, ResolutionDetails, ResolutionError},
    record::FlagValue,
    store::RecordStore,
    Error, FlagRecord, Result,
};

/// Name reported in [`ProviderMetadata`].
pub const PROVIDER_NAME: &str = "Airtable Feature Provider";

/// Feature flag provider that serves flags loaded from a table of a [`RecordStore`].
///
/// The provider starts out empty. [`AirtableProvider::initialize()`] loads every record of the
/// table once; afterwards the flags never change, so any number of readers can resolve flags
/// concurrently through a shared reference.
///
/// Resolution never fails: a missing, disabled or mistyped flag resolves to the default value
/// supplied by the caller and the problem is logged.
///
/// # Examples
/// ```
/// # use airtable_flags::{AirtableProvider, FlagRecord, MemoryStore};
/// let store = MemoryStore::new().with_page("Flags", vec![FlagRecord::new("dark-mode", true, true)]);
/// let mut provider = AirtableProvider::new(store, "Flags");
/// provider.initialize().unwrap();
///
/// assert!(provider.resolve_boolean_evaluation("dark-mode", false).value);
/// ```
pub struct AirtableProvider<S> {
    metadata: ProviderMetadata,
    store: S,
    table: String,
    state: ProviderState,
}

enum ProviderState {
    NotReady,
    Ready(Vec<FlagRecord>),
}

impl<S: RecordStore> AirtableProvider<S> {
    /// Create a provider over `table` of `store`. No records are fetched until
    /// [`AirtableProvider::initialize()`] is called.
    pub fn new(store: S, table: impl Into<String>) -> Self {
        AirtableProvider {
            metadata: ProviderMetadata {
                name: PROVIDER_NAME.to_owned(),
            },
            store,
            table: table.into(),
            state: ProviderState::NotReady,
        }
    }

    pub fn metadata(&self) -> &ProviderMetadata {
        &self.metadata
    }

    /// Returns `true` once flags have been loaded.
    pub fn is_ready(&self) -> bool {
        matches!(self.state, ProviderState::Ready(_))
    }

    /// Load all records of the table.
    ///
    /// Pages are appended in the order the store returns them. If any page fails, records from
    /// earlier pages are discarded and the provider stays empty.
    ///
    /// # Errors
    ///
    /// - The first error reported by the store.
    /// - [`Error::AlreadyInitialized`] if flags have already been loaded. The store is not
    ///   queried again in that case.
    pub fn initialize(&mut self) -> Result<()> {
        if self.is_ready() {
            return Err(Error::AlreadyInitialized);
        }

        let table = self.table.as_str();
        let mut records = Vec::new();
        for page in self.store.pages(table) {
            let page = page.map_err(|err| {
                log::error!(target: "airtable_flags", table, loaded = records.len(); "failed to load flags: {}", err);
                err
            })?;
            log::debug!(target: "airtable_flags", table, count = page.len(); "received page of flag records");
            records.extend(page);
        }

        log::debug!(target: "airtable_flags", table, count = records.len(); "flags loaded");
        self.state = ProviderState::Ready(records);
        Ok(())
    }

    fn records(&self) -> &[FlagRecord] {
        match &self.state {
            ProviderState::Ready(records) => records,
            ProviderState::NotReady => &[],
        }
    }

    /// Find the first record named `flag_key`.
    pub fn query_flag(&self, flag_key: &str) -> Option<&FlagRecord> {
        let record = self.records().iter().find(|record| record.name == flag_key);
        if record.is_none() {
            if self.is_ready() {
                log::warn!(target: "airtable_flags", flag_key; "flag not found");
            } else {
                log::warn!(target: "airtable_flags", flag_key; "querying a flag before flags have been loaded");
            }
        }
        record
    }

    fn resolve<T: serde::Serialize + 'static>(
        &self,
        flag_key: &str,
        default_value: T,
        flag_type: FlagType,
        extract: impl FnOnce(&FlagValue) -> Option<T>,
    ) -> ResolutionDetails<T> {
        let Some(flag) = self.query_flag(flag_key) else {
            return ResolutionDetails::fallback(default_value, ResolutionError::FlagNotFound);
        };

        if !flag.enabled {
            log::warn!(target: "airtable_flags", flag_key; "flag disabled");
            return ResolutionDetails::fallback(default_value, ResolutionError::FlagDisabled);
        }

        match extract(&flag.value) {
            Some(value) => {
                log::trace!(target: "airtable_flags", flag_key, value:serde; "resolved flag");
                ResolutionDetails::matched(value)
            }
            None => {
                log::warn!(target: "airtable_flags", flag_key, expected:display = flag_type; "flag value has unexpected type");
                ResolutionDetails::fallback(
                    default_value,
                    ResolutionError::TypeMismatch {
                        expected: flag_type,
                    },
                )
            }
        }
    }

    /// Resolve a boolean flag. A flag without a value resolves to `false`.
    pub fn resolve_boolean_evaluation(
        &self,
        flag_key: &str,
        default_value: bool,
    ) -> ResolutionDetails<bool> {
        self.resolve(flag_key, default_value, FlagType::Boolean, FlagValue::as_boolean)
    }

    pub fn resolve_string_evaluation(
        &self,
        flag_key: &str,
        default_value: String,
    ) -> ResolutionDetails<String> {
        self.resolve(flag_key, default_value, FlagType::String, |value| {
            value.as_str().map(str::to_owned)
        })
    }

    /// Resolve a number flag. `NaN` is treated as a type mismatch.
    pub fn resolve_number_evaluation(
        &self,
        flag_key: &str,
        default_value: f64,
    ) -> ResolutionDetails<f64> {
        self.resolve(flag_key, default_value, FlagType::Number, FlagValue::as_number)
    }

    /// Resolve an object flag. Any JSON object or array qualifies; `null` does not.
    pub fn resolve_object_evaluation(
        &self,
        flag_key: &str,
        default_value: serde_json::Value,
    ) -> ResolutionDetails<serde_json::Value> {
        self.resolve(flag_key, default_value, FlagType::Object, |value| {
            value.as_structure().cloned()
        })
    }
}

impl<S: RecordStore> FeatureProvider for AirtableProvider<S> {
    fn metadata(&self) -> &ProviderMetadata {
        AirtableProvider::metadata(self)
    }

    fn resolve_boolean_evaluation(
        &self,
        flag_key: &str,
        default_value: bool,
    ) -> ResolutionDetails<bool> {
        AirtableProvider::resolve_boolean_evaluation(self, flag_key, default_value)
    }

    fn resolve_string_evaluation(
        &self,
        flag_key: &str,
        default_value: String,
    ) -> ResolutionDetails<String> {
        AirtableProvider::resolve_string_evaluation(self, flag_key, default_value)
    }

    fn resolve_number_evaluation(
        &self,
        flag_key: &str,
        default_value: f64,
    ) -> ResolutionDetails<f64> {
        AirtableProvider::resolve_number_evaluation(self, flag_key, default_value)
    }

    fn resolve_object_evaluation(
        &self,
        flag_key: &str,
        default_value: serde_json::Value,
    ) -> ResolutionDetails<serde_json::Value> {
        AirtableProvider::resolve_object_evaluation(self, flag_key, default_value)
    }
}

//! A feature flag provider that serves flags defined as rows of an Airtable table.
//!
//! # Overview
//!
//! Each row of the flags table has three columns:
//! - `Name`: the flag key;
//! - `Enabled`: a checkbox gating the flag;
//! - `Value`: the flag payload (boolean, number, text or JSON).
//!
//! An [`AirtableProvider`] loads every row once with [`AirtableProvider::initialize()`] and then
//! resolves typed flag values against that snapshot. A [`Client`] wraps any [`FeatureProvider`]
//! and is the surface the rest of an application uses.
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use airtable_flags::{Client, ProviderConfig};
//! # fn main() -> airtable_flags::Result<()> {
//! let mut provider = ProviderConfig::from_env()?.to_provider()?;
//! provider.initialize()?;
//!
//! let client = Client::new(Arc::new(provider));
//! let dark_mode = client.get_boolean_value("dark-mode", false);
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! Errors are represented by the [`Error`] enum and only occur while configuring the provider or
//! loading flags. Whether to start an application without flags after a failed load is up to the
//! caller.
//!
//! Flag resolution never fails. A missing flag, a disabled flag or a value of the wrong type
//! resolves to the default value passed by the caller; [`ResolutionDetails`] records which case
//! applied.
//!
//! # Logging
//!
//! The package uses the [`log`](https://docs.rs/log/latest/log/) crate for logging
//! messages under the `airtable_flags` target. Consider integrating a `log`-compatible logger
//! implementation for better visibility into flag loading and resolution.

#![warn(rustdoc::missing_crate_level_docs)]

mod airtable;
mod client;
mod config;
mod error;
mod evaluation;
mod provider;
mod record;
pub mod store;

pub use airtable::AirtableStore;
pub use client::{Client, FeatureProvider, ProviderMetadata};
pub use config::ProviderConfig;
pub use error::{Error, Result};
pub use evaluation::{FlagType, Reason, ResolutionDetails, ResolutionError};
pub use provider::{AirtableProvider, PROVIDER_NAME};
pub use record::{FlagRecord, FlagValue};
pub use store::{MemoryStore, RecordStore};

use std::sync::Arc;

use airtable_flags::{Client, ProviderConfig};

pub fn main() {
    env_logger::init();

    let mut provider = ProviderConfig::from_env()
        .and_then(|config| config.to_provider())
        .unwrap();

    // Block until every row of the flags table is loaded.
    if let Err(err) = provider.initialize() {
        eprintln!("failed to load flags: {err}");
        std::process::exit(1);
    }

    let client = Client::new(Arc::new(provider));
    println!("Provider: {}", client.provider_metadata().name);

    let dark_mode = client.get_boolean_value("dark-mode", false);
    println!("dark-mode: {:?}", dark_mode);

    let banner = client.get_string_details("banner-text", "Hello");
    println!("banner-text: {:?} ({:?})", banner.value, banner.reason);
}

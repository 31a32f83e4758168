// Settings are layered: built-in defaults, then an optional config.toml,
// then APP_* environment variables (e.g. APP_CATALOG_SOURCE).

use anyhow::{bail, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::listing::DEFAULT_WHATSAPP_NUMBER;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server_address: String,
    /// URL or file path of the listings JSON.
    pub catalog_source: String,
    /// Directory served under /assets.
    pub static_dir: String,
    /// Destination for the contact links on every card.
    pub whatsapp_number: String,
}

impl Settings {
    pub fn new() -> Result<Self> {
        dotenv::dotenv().ok(); // Load .env file if present

        let builder = Config::builder()
            .set_default("server_address", "127.0.0.1:3000")?
            .set_default("catalog_source", "data/listings.json")?
            .set_default("static_dir", "assets")?
            .set_default("whatsapp_number", DEFAULT_WHATSAPP_NUMBER)?
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("APP"));

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.whatsapp_number.is_empty()
            || !self.whatsapp_number.chars().all(|c| c.is_ascii_digit())
        {
            bail!(
                "whatsapp_number must be digits only (international format without '+'), got '{}'",
                self.whatsapp_number
            );
        }
        if self.catalog_source.trim().is_empty() {
            bail!("catalog_source must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
impl Settings {
    pub fn for_tests() -> Self {
        Settings {
            server_address: "127.0.0.1:0".to_string(),
            catalog_source: "data/listings.json".to_string(),
            static_dir: "assets".to_string(),
            whatsapp_number: DEFAULT_WHATSAPP_NUMBER.to_string(),
        }
    }
}

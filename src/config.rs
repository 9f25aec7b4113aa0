//! TOML configuration for [`FluxBuilderOptions`].
//!
//! ```toml
//! parameterize = ["string", "duration"]   # or "all" / "none"
//! now = "2024-01-01T00:00:00Z"
//! imports = ["strings"]
//! ```

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::error::{FluxError, FluxResult};
use crate::options::{FluxBuilderOptions, FluxPackage, ParameterizedTypes};

/// On-disk shape of the options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionsConfig {
    #[serde(default)]
    pub parameterize: ParameterizedTypes,
    pub now: Option<DateTime<Utc>>,
    #[serde(default)]
    pub imports: Vec<String>,
}

impl OptionsConfig {
    pub fn into_options(self) -> FluxResult<FluxBuilderOptions> {
        let mut options = FluxBuilderOptions::new(self.parameterize);
        if let Some(now) = self.now {
            options.set_now(now)?;
        }
        for path in self.imports {
            let package = FluxPackage::new(path)
                .map_err(|e| FluxError::Config(format!("imports: {}", e)))?;
            options.import_package(package);
        }
        Ok(options)
    }
}

impl FluxBuilderOptions {
    /// Parse options from TOML text.
    pub fn from_toml_str(text: &str) -> FluxResult<Self> {
        let config: OptionsConfig =
            toml::from_str(text).map_err(|e| FluxError::Config(e.to_string()))?;
        config.into_options()
    }

    /// Load options from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> FluxResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading builder options");
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

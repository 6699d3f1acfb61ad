// Copyright 2022 Matthew Ingwersen.
//
// Licensed under the Apache License, Version 2.0 (the "License"); you
// may not use this file except in compliance with the License. You may
// obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or
// implied. See the License for the specific language governing
// permissions and limitations under the License.

//! Implements the configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use log::Level::Debug;
use log::{debug, log_enabled};
use serde::Deserialize;

/// The database file used when neither the command line nor the
/// configuration file names one.
const DEFAULT_DATABASE: &str = "zonemgr.sqlite3";

////////////////////////////////////////////////////////////////////////
// CONFIGURATION LOADING                                              //
////////////////////////////////////////////////////////////////////////

/// Loads the configuration from the file given by `path`.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Config> {
    let dir = match path.as_ref().parent() {
        Some(p) => p,
        None => return Err(anyhow!("the configuration file path has no parent")),
    };
    let raw_config = fs::read(path.as_ref()).context("failed to read the configuration file")?;
    let mut config: Config =
        toml::from_slice(&raw_config).context("failed to parse the configuration file")?;

    // The database path is interpreted relative to the configuration
    // file's directory.
    if let Some(ref mut database) = config.database {
        if database.is_relative() {
            *database = dir.join(&*database);
        }
    }
    Ok(config)
}

/// Combines the configuration file (if any) with the command line,
/// which takes precedence.
pub fn resolve(config: Option<Config>, database: Option<PathBuf>) -> Settings {
    let config = config.unwrap_or_default();
    let settings = Settings {
        database: database
            .or(config.database)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE)),
        role: config.role,
    };
    log_settings_summary(&settings);
    settings
}

/// Summarizes the settings in the log, if the debug log level is
/// enabled.
fn log_settings_summary(settings: &Settings) {
    if log_enabled!(Debug) {
        debug!(
            "Configuration loaded:\n\
             Database:     {}\n\
             Default role: {}",
            settings.database.display(),
            settings.role.as_deref().unwrap_or("none"),
        );
    }
}

////////////////////////////////////////////////////////////////////////
// CONFIGURATION FILE STRUCTURE                                       //
////////////////////////////////////////////////////////////////////////

/// The complete configuration file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub database: Option<PathBuf>,
    pub role: Option<String>,
}

/// The effective settings after combining all sources.
#[derive(Debug)]
pub struct Settings {
    pub database: PathBuf,
    pub role: Option<String>,
}

impl Settings {
    /// Returns the role to act as: the one given on the command line,
    /// or else the configured default.
    pub fn actor(&self, role: Option<String>) -> Result<String> {
        role.or_else(|| self.role.clone()).ok_or_else(|| {
            anyhow!("no role given; pass --role or set 'role' in the configuration file")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_overrides_file() {
        let config: Config =
            toml::from_str("database = \"/var/lib/zonemgr.sqlite3\"\nrole = \"ops\"").unwrap();
        let settings = resolve(Some(config), Some(PathBuf::from("other.sqlite3")));
        assert_eq!(settings.database, PathBuf::from("other.sqlite3"));
        assert_eq!(settings.actor(None).unwrap(), "ops");
        assert_eq!(settings.actor(Some("admin".into())).unwrap(), "admin");
    }

    #[test]
    fn defaults_apply_without_a_file() {
        let settings = resolve(None, None);
        assert_eq!(settings.database, PathBuf::from(DEFAULT_DATABASE));
        assert!(settings.actor(None).is_err());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<Config>("bind = \"[::1]:53\"").is_err());
    }
}

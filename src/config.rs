use crate::cli::{self, CommonArgs};
use crate::teamcity::Auth;
use anyhow::{anyhow, Context, Result};
use log::debug;
use serde::Deserialize;
use std::path::Path;
use url::Url;

pub const DEFAULT_REMOTE: &str = "origin";
pub const DEFAULT_TEAMCITY_URL: &str = "https://build.neohq.net";

/// Optional settings file, only read when passed with `--config`
///
/// ```toml
/// user = "jonas"
/// password = "hunter2"
/// remote = "origin"
/// teamcity = "https://build.neohq.net"
/// personal = false
/// ```
#[derive(Default, Debug, Clone, Deserialize)]
struct FileSettings {
    user: Option<String>,
    password: Option<String>,
    remote: Option<String>,
    teamcity: Option<String>,
    personal: Option<bool>,
}

impl FileSettings {
    fn load(path: &Path) -> Result<Self> {
        debug!("Loading settings from {}", path.display());
        ::config::Config::builder()
            .add_source(::config::File::from(path).format(::config::FileFormat::Toml))
            .build()
            .and_then(|c| c.try_deserialize())
            .with_context(|| format!("Could not load settings from {}", path.display()))
    }
}

/// Options shared by all build types, after defaults and the settings file are applied
#[derive(Debug, Clone)]
pub struct Settings {
    pub credentials: Auth,
    pub remote: String,
    pub teamcity: Url,
    pub personal: bool,
}

impl Settings {
    /// Resolve settings from the command line. Values given on the command line win over the
    /// settings file, which wins over the defaults.
    pub fn resolve(args: &CommonArgs) -> Result<Self> {
        let file = match &args.config {
            Some(path) => FileSettings::load(path)?,
            None => FileSettings::default(),
        };

        let user = args
            .user
            .clone()
            .or(file.user)
            .ok_or_else(|| anyhow!("No TeamCity username given"))?;
        let password = args
            .password
            .clone()
            .or(file.password)
            .ok_or_else(|| anyhow!("No TeamCity password given"))?;
        let teamcity = match (&args.teamcity, file.teamcity) {
            (Some(url), _) => url.clone(),
            (None, Some(url)) => cli::parse_base_url(&url)
                .map_err(|e| anyhow!(e))
                .context("Invalid teamcity setting")?,
            (None, None) => cli::parse_base_url(DEFAULT_TEAMCITY_URL).map_err(|e| anyhow!(e))?,
        };

        Ok(Self {
            credentials: Auth::new(user, password),
            remote: args
                .remote
                .clone()
                .or(file.remote)
                .unwrap_or_else(|| DEFAULT_REMOTE.to_owned()),
            teamcity,
            personal: args.personal_flag().or(file.personal).unwrap_or(false),
        })
    }
}

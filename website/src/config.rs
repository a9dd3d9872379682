use snafu::ensure;
use std::env;
use std::path::PathBuf;

use crate::Result;
use crate::error::ConfigSnafu;
use crate::models::is_local_path;

pub const DEFAULT_AUTH_PATH: &str = "/auth/login";
pub const DEFAULT_REDIRECT: &str = "/dashboard";
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_ASSETS_DIR: &str = "public";

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,

    /// Base URL of the authentication service, without a trailing slash
    pub api_url: String,

    /// Path of the sign-in endpoint, appended to `api_url`
    pub auth_path: String,

    /// Where to go after signing in when no prior destination is known
    pub default_redirect: String,

    pub assets_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub https: bool,
}

impl Config {
    pub fn build() -> Result<Self> {
        // Build the config from ENV vars
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|val| !val.trim().is_empty());

        let port_str = var("PORT").unwrap_or_default();
        let port = port_str.parse::<u16>().unwrap_or(0);

        let https = var("HTTPS").is_some_and(|val| val == "1");

        let api_url = var("API_URL")
            .map(|val| val.trim_end_matches('/').to_string())
            .unwrap_or_default();

        let auth_path = var("AUTH_PATH").unwrap_or_else(|| DEFAULT_AUTH_PATH.to_string());
        let default_redirect =
            var("DEFAULT_REDIRECT").unwrap_or_else(|| DEFAULT_REDIRECT.to_string());
        let address = var("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());
        let assets_dir: PathBuf = var("ASSETS_DIR")
            .unwrap_or_else(|| DEFAULT_ASSETS_DIR.to_string())
            .into();

        // Validate config values
        ensure!(
            port > 0,
            ConfigSnafu {
                msg: "PORT must be a valid port number.".to_string()
            }
        );

        ensure!(
            !api_url.is_empty(),
            ConfigSnafu {
                msg: "API_URL is required.".to_string()
            }
        );

        ensure!(
            api_url.starts_with("http://") || api_url.starts_with("https://"),
            ConfigSnafu {
                msg: "API_URL must be an http or https URL.".to_string()
            }
        );

        ensure!(
            auth_path.starts_with('/'),
            ConfigSnafu {
                msg: "AUTH_PATH must start with a slash.".to_string()
            }
        );

        ensure!(
            is_local_path(&default_redirect),
            ConfigSnafu {
                msg: "DEFAULT_REDIRECT must be a local path.".to_string()
            }
        );

        Ok(Config {
            server: ServerConfig {
                address,
                port,
                https,
            },
            api_url,
            auth_path,
            default_redirect,
            assets_dir,
        })
    }

    pub fn auth_url(&self) -> String {
        format!("{}{}", self.api_url, self.auth_path)
    }
}

//! Spotify credential resolution
//!
//! **Priority:** ENV → TOML. Each value is resolved independently; a value
//! that is empty or whitespace-only counts as absent.

use recordify_common::config::SpotifyConfig;
use tracing::{info, warn};

pub const ACCESS_TOKEN_ENV: &str = "SPOTIFY_ACCESS_TOKEN";
pub const CLIENT_ID_ENV: &str = "SPOTIFY_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "SPOTIFY_CLIENT_SECRET";
pub const REDIRECT_URI_ENV: &str = "SPOTIFY_REDIRECT_URI";

/// Resolved Spotify credentials
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpotifyCredentials {
    /// Bearer token used by the playback client
    pub access_token: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
}

impl SpotifyCredentials {
    /// True if the app registration is configured but no token was supplied
    pub fn needs_authorization(&self) -> bool {
        self.access_token.is_none() && self.client_id.is_some()
    }

    /// Registration values the authorization flow needs that are still unset
    pub fn missing_registration_values(&self) -> Vec<&'static str> {
        [
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("redirect_uri", &self.redirect_uri),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Validate a credential value (non-empty, non-whitespace)
pub fn is_valid_value(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Resolve credentials from the environment, then the `[spotify]` TOML table
pub fn resolve_spotify_credentials(toml: &SpotifyConfig) -> SpotifyCredentials {
    SpotifyCredentials {
        access_token: resolve_value("access_token", ACCESS_TOKEN_ENV, toml.access_token.as_deref()),
        client_id: resolve_value("client_id", CLIENT_ID_ENV, toml.client_id.as_deref()),
        client_secret: resolve_value("client_secret", CLIENT_SECRET_ENV, toml.client_secret.as_deref()),
        redirect_uri: resolve_value("redirect_uri", REDIRECT_URI_ENV, toml.redirect_uri.as_deref()),
    }
}

fn resolve_value(name: &str, env_var: &str, toml_value: Option<&str>) -> Option<String> {
    let env_value = std::env::var(env_var).ok().filter(|v| is_valid_value(v));
    let toml_value = toml_value.filter(|v| is_valid_value(v));

    match (env_value, toml_value) {
        (Some(env_value), Some(_)) => {
            warn!(
                "Spotify {} found in both {} and TOML config. Using environment (highest priority).",
                name, env_var
            );
            Some(env_value)
        }
        (Some(env_value), None) => {
            info!("Spotify {} loaded from environment variable", name);
            Some(env_value)
        }
        (None, Some(toml_value)) => {
            info!("Spotify {} loaded from TOML config", name);
            Some(toml_value.to_string())
        }
        (None, None) => None,
    }
}

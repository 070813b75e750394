// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::EdgeConfigLayer;
use crate::secret::load_secret_env;
use crate::sections::{
	AreaConfigLayer, CipherConfigLayer, LoggingConfigLayer, PermissionFailurePolicy,
};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<EdgeConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<EdgeConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(EdgeConfigLayer::default())
	}
}

/// TOML file configuration source.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/caravel/edge.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<EdgeConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(EdgeConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: EdgeConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: CARAVEL_EDGE_<SECTION>_<FIELD>
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<EdgeConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(EdgeConfigLayer {
			cipher: Some(load_cipher_from_env()?),
			admin: Some(load_area_from_env("CARAVEL_EDGE_ADMIN")?),
			account: Some(load_area_from_env("CARAVEL_EDGE_ACCOUNT")?),
			logging: Some(load_logging_from_env()?),
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_bool(name: &str) -> Option<bool> {
	env_var(name).map(|v| v.eq_ignore_ascii_case("true") || v == "1")
}

fn env_list(name: &str) -> Option<Vec<String>> {
	env_var(name).map(|s| {
		s.split(',')
			.map(|s| s.trim().to_string())
			.filter(|s| !s.is_empty())
			.collect()
	})
}

fn env_policy(name: &str) -> Result<Option<PermissionFailurePolicy>, ConfigError> {
	match env_var(name) {
		Some(v) => match v.to_lowercase().as_str() {
			"permit" => Ok(Some(PermissionFailurePolicy::Permit)),
			"deny" => Ok(Some(PermissionFailurePolicy::Deny)),
			_ => Err(ConfigError::InvalidValue {
				key: name.to_string(),
				message: format!("invalid policy value '{v}', expected 'permit' or 'deny'"),
			}),
		},
		None => Ok(None),
	}
}

fn load_cipher_from_env() -> Result<CipherConfigLayer, ConfigError> {
	Ok(CipherConfigLayer {
		secret: load_secret_env("CARAVEL_EDGE_CALLBACK_SECRET")
			.map_err(|e| ConfigError::Secret(e.to_string()))?,
	})
}

fn load_area_from_env(prefix: &str) -> Result<AreaConfigLayer, ConfigError> {
	Ok(AreaConfigLayer {
		auth_routes: env_list(&format!("{prefix}_AUTH_ROUTES")),
		protected_prefixes: env_list(&format!("{prefix}_PROTECTED_PREFIXES")),
		token_cookie: env_var(&format!("{prefix}_TOKEN_COOKIE")),
		login_path: env_var(&format!("{prefix}_LOGIN_PATH")),
		default_landing: env_var(&format!("{prefix}_DEFAULT_LANDING")),
		access_denied_path: env_var(&format!("{prefix}_ACCESS_DENIED_PATH")),
		enforce_permissions: env_bool(&format!("{prefix}_ENFORCE_PERMISSIONS")),
		permission_failure: env_policy(&format!("{prefix}_PERMISSION_FAILURE"))?,
	})
}

fn load_logging_from_env() -> Result<LoggingConfigLayer, ConfigError> {
	Ok(LoggingConfigLayer {
		level: env_var("CARAVEL_EDGE_LOG_LEVEL"),
	})
}

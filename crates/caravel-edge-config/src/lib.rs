// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Centralized configuration management for the Caravel edge layer.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Built-in route tables for the admin console and the account portal
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`CARAVEL_EDGE_*`)
//!
//! # Usage
//!
//! ```ignore
//! use caravel_edge_config::load_config;
//!
//! let config = load_config()?;
//! println!("Admin login at {}", config.admin.login_path);
//! ```

pub mod error;
pub mod layer;
pub mod secret;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::EdgeConfigLayer;
pub use secret::{load_secret_env, SecretString};
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use caravel_edge_cipher::is_same_origin;
use tracing::{debug, info};

/// Fully resolved edge configuration.
#[derive(Debug, Clone)]
pub struct EdgeConfig {
	pub cipher: CipherConfig,
	pub admin: AreaConfig,
	pub account: AreaConfig,
	pub logging: LoggingConfig,
}

impl EdgeConfig {
	/// The guarded areas in evaluation order.
	pub fn areas(&self) -> [&AreaConfig; 2] {
		[&self.admin, &self.account]
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`CARAVEL_EDGE_*`)
/// 2. Config file (`/etc/caravel/edge.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<EdgeConfig, ConfigError> {
	let mut sources: Vec<Box<dyn ConfigSource>> = vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	];

	sources.sort_by_key(|s| s.precedence());

	let mut merged = EdgeConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Load configuration from environment only (for testing or simple deployments).
pub fn load_config_from_env() -> Result<EdgeConfig, ConfigError> {
	let mut merged = EdgeConfigLayer::default();
	merged.merge(EnvSource.load()?);
	finalize(merged)
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<EdgeConfig, ConfigError> {
	let mut sources: Vec<Box<dyn ConfigSource>> = vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	];

	sources.sort_by_key(|s| s.precedence());

	let mut merged = EdgeConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
fn finalize(layer: EdgeConfigLayer) -> Result<EdgeConfig, ConfigError> {
	let cipher = layer.cipher.unwrap_or_default().finalize()?;
	let admin = layer
		.admin
		.unwrap_or_default()
		.finalize(AreaConfig::admin_defaults());
	let account = layer
		.account
		.unwrap_or_default()
		.finalize(AreaConfig::account_defaults());
	let logging = layer.logging.unwrap_or_default().finalize();

	let config = EdgeConfig {
		cipher,
		admin,
		account,
		logging,
	};

	validate_config(&config)?;

	info!(
		admin_login = %config.admin.login_path,
		admin_enforced = config.admin.enforce_permissions,
		account_login = %config.account.login_path,
		account_enforced = config.account.enforce_permissions,
		log_level = %config.logging.level,
		"Edge configuration loaded"
	);

	Ok(config)
}

/// Validate cross-field configuration rules.
fn validate_config(config: &EdgeConfig) -> Result<(), ConfigError> {
	for area in config.areas() {
		validate_area(area)?;
	}
	Ok(())
}

fn validate_area(area: &AreaConfig) -> Result<(), ConfigError> {
	if area.protected_prefixes.is_empty() {
		return Err(ConfigError::Validation(format!(
			"{} area has no protected prefixes; an area that guards nothing is a configuration error",
			area.name
		)));
	}

	let mut paths: Vec<&str> = Vec::new();
	paths.extend(area.auth_routes.iter().map(String::as_str));
	paths.extend(area.protected_prefixes.iter().map(String::as_str));
	paths.push(&area.login_path);
	paths.push(&area.default_landing);
	if let Some(denied) = &area.access_denied_path {
		paths.push(denied);
	}

	for path in paths {
		if !is_same_origin(path) {
			return Err(ConfigError::Validation(format!(
				"{} area path '{path}' must start with a single '/' and must not embed a scheme",
				area.name
			)));
		}
	}

	if !area.auth_routes.contains(&area.login_path) {
		return Err(ConfigError::Validation(format!(
			"{} area login path '{}' is not listed in its auth routes. The guard would \
			 treat the login page as protected and redirect it to itself.",
			area.name, area.login_path
		)));
	}

	if area.enforce_permissions && area.access_denied_path.is_none() {
		return Err(ConfigError::Validation(format!(
			"{} area enforces permissions but has no access_denied_path to send denials to",
			area.name
		)));
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	fn edge_config() -> EdgeConfig {
		EdgeConfig {
			cipher: CipherConfig {
				key: caravel_edge_cipher::CipherKey::derive("a test secret"),
			},
			admin: AreaConfig::admin_defaults(),
			account: AreaConfig::account_defaults(),
			logging: LoggingConfig::default(),
		}
	}

	#[test]
	fn test_builtin_tables_validate() {
		assert!(validate_config(&edge_config()).is_ok());
	}

	#[test]
	fn test_unrooted_path_fails_validation() {
		let mut config = edge_config();
		config.admin.login_path = "admin/login".to_string();
		let result = validate_config(&config);
		assert!(result.is_err());
		assert!(result.unwrap_err().to_string().contains("single '/'"));
	}

	#[test]
	fn test_schemeful_path_fails_validation() {
		let mut config = edge_config();
		config.account.default_landing = "https://evil.example/account".to_string();
		assert!(validate_config(&config).is_err());
	}

	#[test]
	fn test_login_path_must_be_an_auth_route() {
		let mut config = edge_config();
		config.admin.login_path = "/admin/signin".to_string();
		let result = validate_config(&config);
		assert!(result.is_err());
		assert!(result
			.unwrap_err()
			.to_string()
			.contains("not listed in its auth routes"));
	}

	#[test]
	fn test_enforcing_area_requires_a_denied_page() {
		let mut config = edge_config();
		config.account.enforce_permissions = true;
		let result = validate_config(&config);
		assert!(result.is_err());
		assert!(result
			.unwrap_err()
			.to_string()
			.contains("access_denied_path"));
	}

	#[test]
	fn test_empty_prefixes_fail_validation() {
		let mut config = edge_config();
		config.admin.protected_prefixes.clear();
		assert!(validate_config(&config).is_err());
	}

	#[test]
	fn test_finalize_without_a_secret_fails() {
		let result = finalize(EdgeConfigLayer::default());
		assert!(result.is_err());
		assert!(result
			.unwrap_err()
			.to_string()
			.contains("no callback secret configured"));
	}

	#[test]
	fn test_load_config_with_file_applies_overrides() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(
			file,
			"[cipher]\n\
			 secret = \"file secret\"\n\n\
			 [admin]\n\
			 auth_routes = [\"/admin/signin\", \"/admin/forgot-password\"]\n\
			 login_path = \"/admin/signin\"\n\n\
			 [logging]\n\
			 level = \"debug\"\n"
		)
		.unwrap();

		let config = load_config_with_file(file.path()).unwrap();
		assert_eq!(config.admin.login_path, "/admin/signin");
		assert_eq!(config.admin.default_landing, "/admin/dashboard");
		assert_eq!(config.account.login_path, "/account/login");
		assert_eq!(config.logging.level, "debug");
	}
}

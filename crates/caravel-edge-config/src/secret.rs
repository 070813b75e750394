// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Secret loading from the environment.
//!
//! Supports the `VAR` / `VAR_FILE` convention used by Docker secrets and
//! Kubernetes: when `{var}_FILE` is set the secret is read from that path,
//! otherwise `{var}` itself is used. The raw secret only exists long enough
//! to derive the sealing key and is zeroed when dropped.

use std::fmt;
use std::path::PathBuf;
use std::{env, fs};

use serde::{Deserialize, Deserializer};
use thiserror::Error;
use zeroize::Zeroize;

/// Errors that can occur when loading secrets from environment variables.
#[derive(Debug, Error)]
pub enum SecretEnvError {
	/// Failed to read the secret file.
	#[error("failed to read secret file at {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// The secret file path was empty.
	#[error("secret file path in {var} is empty")]
	EmptyPath { var: String },
}

/// A secret string in transit between the environment and key derivation.
///
/// `Debug` output is redacted and the backing memory is zeroed on drop. The
/// value is only reachable through [`expose`](SecretString::expose).
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecretString {
	inner: String,
}

impl SecretString {
	/// Wrap a raw secret value.
	pub fn new(inner: impl Into<String>) -> Self {
		Self {
			inner: inner.into(),
		}
	}

	/// Explicitly access the secret value.
	pub fn expose(&self) -> &str {
		&self.inner
	}
}

impl fmt::Debug for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("SecretString").field(&"[REDACTED]").finish()
	}
}

impl<'de> Deserialize<'de> for SecretString {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		String::deserialize(deserializer).map(SecretString::new)
	}
}

/// Load a secret from the environment using the `VAR` / `VAR_FILE` convention.
///
/// # Precedence
///
/// 1. If `{var}_FILE` is set, read the secret from that file path
/// 2. Otherwise, if `{var}` is set, use its value directly
/// 3. Otherwise, return `Ok(None)`
///
/// When reading from a file a single trailing newline is stripped; everything
/// else is preserved as-is.
pub fn load_secret_env(var: &str) -> Result<Option<SecretString>, SecretEnvError> {
	let file_var = format!("{var}_FILE");

	if let Ok(path_str) = env::var(&file_var) {
		if path_str.is_empty() {
			return Err(SecretEnvError::EmptyPath { var: file_var });
		}

		let path = PathBuf::from(&path_str);
		let mut content = fs::read_to_string(&path).map_err(|e| SecretEnvError::Io {
			path: path.clone(),
			source: e,
		})?;

		let secret = SecretString::new(content.strip_suffix('\n').unwrap_or(&content));
		content.zeroize();
		return Ok(Some(secret));
	}

	if let Ok(value) = env::var(var) {
		return Ok(Some(SecretString::new(value)));
	}

	Ok(None)
}

// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Callback cipher configuration section.
//!
//! The sealing secret has no built-in default; an edge without a secret
//! cannot mint callback tokens, so finalization fails loudly instead of
//! falling back to a well-known key.

use caravel_edge_cipher::CipherKey;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::secret::SecretString;

/// Cipher configuration (runtime, fully resolved).
///
/// Holds the derived key, not the raw secret; the secret string is dropped
/// and zeroed during finalization.
#[derive(Debug, Clone)]
pub struct CipherConfig {
	pub key: CipherKey,
}

/// Cipher configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CipherConfigLayer {
	#[serde(default)]
	pub secret: Option<SecretString>,
}

impl CipherConfigLayer {
	pub fn merge(&mut self, other: CipherConfigLayer) {
		if other.secret.is_some() {
			self.secret = other.secret;
		}
	}

	pub fn finalize(self) -> Result<CipherConfig, ConfigError> {
		let secret = self.secret.ok_or_else(|| {
			ConfigError::Secret(
				"no callback secret configured: set CARAVEL_EDGE_CALLBACK_SECRET or \
				 CARAVEL_EDGE_CALLBACK_SECRET_FILE, or [cipher] secret in the config file"
					.to_string(),
			)
		})?;

		Ok(CipherConfig {
			key: CipherKey::derive(secret.expose()),
		})
	}
}

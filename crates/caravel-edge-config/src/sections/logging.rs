// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Logging configuration section.

use serde::Deserialize;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Logging configuration (runtime).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
	/// Log level filter (trace, debug, info, warn, error).
	pub level: String,
}

impl Default for LoggingConfig {
	fn default() -> Self {
		Self {
			level: DEFAULT_LOG_LEVEL.to_string(),
		}
	}
}

/// Logging configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfigLayer {
	#[serde(default)]
	pub level: Option<String>,
}

impl LoggingConfigLayer {
	pub fn merge(&mut self, other: LoggingConfigLayer) {
		if other.level.is_some() {
			self.level = other.level;
		}
	}

	pub fn finalize(self) -> LoggingConfig {
		LoggingConfig {
			level: self.level.unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
		}
	}
}

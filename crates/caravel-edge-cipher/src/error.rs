// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for callback-path sealing.
//!
//! These never cross the public API boundary: [`crate::PathCipher`] collapses
//! every failure to `None` and logs the reason instead. They exist so the log
//! line can say what actually went wrong.

use thiserror::Error;

/// Result type alias for cipher operations.
pub type CipherResult<T> = Result<T, CipherError>;

/// Reasons a callback path cannot be sealed or a token cannot be opened.
#[derive(Debug, Error)]
pub enum CipherError {
	// =========================================================================
	// Validation Errors
	// =========================================================================
	#[error("callback path rejected: {0}")]
	UnsafePath(String),

	// =========================================================================
	// Token Errors
	// =========================================================================
	#[error("token percent-decoding failed")]
	TokenPercentDecoding,

	#[error("token base64 decoding failed: {0}")]
	TokenEncoding(#[from] base64::DecodeError),

	#[error("token too short: {0} bytes")]
	TokenTruncated(usize),

	#[error("sealed payload is not valid UTF-8")]
	PayloadEncoding(#[from] std::string::FromUtf8Error),

	// =========================================================================
	// Cryptographic Errors
	// =========================================================================
	#[error("encryption failed: {0}")]
	Encryption(String),

	#[error("decryption failed: {0}")]
	Decryption(String),
}

impl CipherError {
	/// Returns true if this error indicates tampering or garbage input rather
	/// than a local fault.
	pub fn is_rejection(&self) -> bool {
		!matches!(self, CipherError::Encryption(_))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn decryption_failure_is_a_rejection() {
		assert!(CipherError::Decryption("bad tag".into()).is_rejection());
	}

	#[test]
	fn encryption_failure_is_not_a_rejection() {
		assert!(!CipherError::Encryption("cipher fault".into()).is_rejection());
	}
}

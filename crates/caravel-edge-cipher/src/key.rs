// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Key material for callback-path sealing.
//!
//! The shared secret arrives as an operator-supplied string of arbitrary
//! length and is normalized to exactly [`KEY_SIZE`] bytes before use, so the
//! same secret always derives the same AES-256 key on every host.
//!
//! # Security
//!
//! - Key bytes are zeroed on drop
//! - `Debug` output is redacted; the key never reaches logs
//! - Access to the raw bytes is crate-private

use std::fmt;

use zeroize::Zeroize;

/// Size of the sealing key in bytes (256 bits for AES-256).
pub const KEY_SIZE: usize = 32;

/// Filler byte appended to secrets shorter than [`KEY_SIZE`].
const PAD_BYTE: u8 = b'0';

/// The redaction placeholder used in all output.
const REDACTED: &str = "[REDACTED]";

/// A normalized 256-bit sealing key.
///
/// Derived from the operator-supplied secret: secrets longer than
/// [`KEY_SIZE`] bytes are truncated to their first [`KEY_SIZE`] bytes,
/// shorter secrets are right-padded with `b'0'`.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct CipherKey {
	bytes: [u8; KEY_SIZE],
}

impl CipherKey {
	/// Derive a key from an operator-supplied secret string.
	pub fn derive(secret: &str) -> Self {
		let mut bytes = [PAD_BYTE; KEY_SIZE];
		let raw = secret.as_bytes();
		let take = raw.len().min(KEY_SIZE);
		bytes[..take].copy_from_slice(&raw[..take]);
		Self { bytes }
	}

	/// Raw key bytes, for cipher construction only.
	pub(crate) fn expose(&self) -> &[u8; KEY_SIZE] {
		&self.bytes
	}
}

impl fmt::Debug for CipherKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("CipherKey").field(&REDACTED).finish()
	}
}

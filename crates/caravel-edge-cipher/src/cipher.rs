// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Sealing of callback paths into URL-safe tokens.
//!
//! Uses AES-256-GCM. A sealed token is `percent(base64(nonce || ciphertext))`
//! where the ciphertext carries the GCM authentication tag, so any bit flip
//! or truncation fails authentication on open.
//!
//! # Security
//!
//! - Fresh 96-bit random nonce per seal; equal paths produce unequal tokens
//! - Open fails closed: tampering, truncation, or a wrong key all yield `None`
//! - The recovered path is re-validated against the origin rules before it is
//!   handed back, so a forged token cannot name an off-site location
//! - Failures are logged, never surfaced to the caller

use aes_gcm::{
	aead::{Aead, KeyInit, OsRng},
	Aes256Gcm, Key, Nonce,
};
use base64::prelude::*;
use rand::RngCore;
use tracing::debug;

use crate::callback::CallbackPath;
use crate::error::{CipherError, CipherResult};
use crate::key::CipherKey;

/// Size of the AES-GCM nonce in bytes.
pub const NONCE_SIZE: usize = 12;

/// Size of the AES-GCM authentication tag in bytes.
const TAG_SIZE: usize = 16;

/// Generate a random nonce.
///
/// 96-bit random nonces from OsRng. Tokens are minted once per login
/// redirect, far below the volume where random nonce collisions under a
/// single key become a concern.
fn generate_nonce() -> [u8; NONCE_SIZE] {
	let mut nonce = [0u8; NONCE_SIZE];
	OsRng.fill_bytes(&mut nonce);
	nonce
}

/// Seals callback paths into opaque URL-safe tokens and opens them again.
///
/// One instance per guarded area: the cipher carries the area's
/// authentication paths so that a login screen can never become its own
/// callback. All areas share the same key material.
pub struct PathCipher {
	key: CipherKey,
	denied_paths: Vec<String>,
}

impl PathCipher {
	/// Create a cipher for one guarded area.
	///
	/// # Arguments
	///
	/// * `key` - The normalized sealing key shared across areas
	/// * `denied_paths` - The area's authentication paths, refused as callbacks
	pub fn new(key: CipherKey, denied_paths: Vec<String>) -> Self {
		Self { key, denied_paths }
	}

	/// Seal a callback path into a token ready for use as a query value.
	///
	/// # Returns
	///
	/// - `Some(token)` - percent-encoded, safe to splice into a redirect URL
	/// - `None` - the path failed validation or the cipher faulted; the
	///   reason is logged and the caller falls back to a bare login redirect
	pub fn seal(&self, path: &str) -> Option<String> {
		match self.seal_path(path) {
			Ok(token) => Some(token),
			Err(error) => {
				debug!(path = %path, error = %error, "callback path not sealed");
				None
			}
		}
	}

	/// Open a token back into the callback path it was sealed from.
	///
	/// Accepts the token either as it appears in a URL (percent-encoded) or
	/// as already decoded by query-string parsing.
	///
	/// # Returns
	///
	/// - `Some(path)` - authenticated and re-validated, safe to redirect to
	/// - `None` - the token is damaged, forged, sealed under another key, or
	///   names a path that is no longer acceptable
	pub fn open(&self, token: &str) -> Option<String> {
		match self.open_token(token) {
			Ok(path) => Some(path),
			Err(error) => {
				debug!(error = %error, "callback token rejected");
				None
			}
		}
	}

	fn seal_path(&self, path: &str) -> CipherResult<String> {
		let callback = CallbackPath::parse(path, &self.denied_paths)
			.ok_or_else(|| CipherError::UnsafePath(path.to_string()))?;

		let key = Key::<Aes256Gcm>::from_slice(self.key.expose());
		let cipher = Aes256Gcm::new(key);

		let nonce_bytes = generate_nonce();
		let nonce = Nonce::from_slice(&nonce_bytes);

		let ciphertext = cipher
			.encrypt(nonce, callback.as_str().as_bytes())
			.map_err(|e| CipherError::Encryption(format!("callback sealing failed: {e}")))?;

		let mut sealed = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
		sealed.extend_from_slice(&nonce_bytes);
		sealed.extend_from_slice(&ciphertext);

		let token = BASE64_STANDARD.encode(&sealed);
		Ok(urlencoding::encode(&token).into_owned())
	}

	fn open_token(&self, token: &str) -> CipherResult<String> {
		// Decoding a token without percent escapes is the identity, so both
		// raw and still-encoded forms land here.
		let unescaped =
			urlencoding::decode(token).map_err(|_| CipherError::TokenPercentDecoding)?;
		let sealed = BASE64_STANDARD.decode(unescaped.as_bytes())?;

		if sealed.len() < NONCE_SIZE + TAG_SIZE {
			return Err(CipherError::TokenTruncated(sealed.len()));
		}
		let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_SIZE);

		let key = Key::<Aes256Gcm>::from_slice(self.key.expose());
		let cipher = Aes256Gcm::new(key);
		let nonce = Nonce::from_slice(nonce_bytes);

		let plaintext = cipher
			.decrypt(nonce, ciphertext)
			.map_err(|e| CipherError::Decryption(format!("callback opening failed: {e}")))?;

		let path = String::from_utf8(plaintext)?;
		match CallbackPath::parse(&path, &self.denied_paths) {
			Some(callback) => Ok(callback.into_inner()),
			None => Err(CipherError::UnsafePath(path)),
		}
	}
}

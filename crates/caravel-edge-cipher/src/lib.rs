// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Caravel Edge Callback Cipher
//!
//! This crate seals the "where were you headed" path into an opaque token so
//! the login flow can round-trip it through the browser:
//!
//! - **Sealing**: AES-256-GCM with a fresh random nonce per token
//! - **Validation**: callback paths are checked before sealing and again
//!   after opening, closing the open-redirect and login-loop windows
//! - **Key handling**: the operator secret is normalized to 256 bits,
//!   zeroed on drop, and redacted in logs
//!
//! # Security Design
//!
//! - Tokens are authenticated; any tampering or truncation opens to `None`
//! - The public API never returns an error: failures are logged at the edge
//!   and the caller degrades to a redirect without a callback
//! - Two seals of the same path are never byte-equal
//!
//! # Usage
//!
//! ```
//! use caravel_edge_cipher::{CipherKey, PathCipher};
//!
//! let key = CipherKey::derive("operator-supplied-secret");
//! let cipher = PathCipher::new(key, vec!["/admin/login".to_string()]);
//!
//! let token = cipher.seal("/admin/trips?page=2").expect("safe path seals");
//! assert_eq!(cipher.open(&token).as_deref(), Some("/admin/trips?page=2"));
//!
//! // The login screen itself can never become a callback.
//! assert!(cipher.seal("/admin/login").is_none());
//! ```

pub mod callback;
pub mod cipher;
pub mod error;
pub mod key;

pub use callback::{is_same_origin, CallbackPath};
pub use cipher::{PathCipher, NONCE_SIZE};
pub use error::{CipherError, CipherResult};
pub use key::{CipherKey, KEY_SIZE};

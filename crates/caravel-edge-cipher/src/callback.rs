// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Callback path validation.
//!
//! A callback path is the location a visitor is returned to after login. It
//! must stay on our origin, so the same rules apply on both sides of the
//! cipher: before a path is sealed into a token, and again after a token is
//! opened, so a forged token that decrypts cleanly still cannot leave the
//! site.
//!
//! # Security Properties
//!
//! - **Open redirect prevention**: only rooted paths, `//host` and scheme
//!   forms are rejected
//! - **Login loop prevention**: an area's own authentication paths can never
//!   become callbacks

use std::fmt;

/// Check if a path is same-origin (a rooted relative path).
///
/// Prevents open redirect attacks: the path must start with a single "/"
/// (protocol-relative "//host" is not allowed) and must not smuggle a scheme
/// anywhere in the string.
pub fn is_same_origin(path: &str) -> bool {
	path.starts_with('/') && !path.starts_with("//") && !path.contains("://")
}

/// A validated same-origin callback path, with optional query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackPath {
	inner: String,
}

impl CallbackPath {
	/// Validate a raw path against the origin rules and an area's
	/// authentication paths.
	///
	/// The authentication paths are compared against the path component only,
	/// so `/admin/login?x=1` is refused just like `/admin/login`.
	///
	/// # Returns
	///
	/// - `Some(CallbackPath)` if the path is safe to round-trip
	/// - `None` if it is off-origin, empty, or one of `denied_paths`
	pub fn parse(raw: &str, denied_paths: &[String]) -> Option<Self> {
		if !is_same_origin(raw) {
			return None;
		}

		let path_only = match raw.find('?') {
			Some(idx) => &raw[..idx],
			None => raw,
		};
		if denied_paths.iter().any(|denied| denied == path_only) {
			return None;
		}

		Some(Self {
			inner: raw.to_string(),
		})
	}

	/// The validated path as a string slice.
	pub fn as_str(&self) -> &str {
		&self.inner
	}

	/// Consume the wrapper and return the validated path.
	pub fn into_inner(self) -> String {
		self.inner
	}
}

impl fmt::Display for CallbackPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.inner)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn denied() -> Vec<String> {
		vec!["/admin/login".to_string(), "/admin/forgot-password".to_string()]
	}

	mod origin_rules {
		use super::*;

		#[test]
		fn accepts_rooted_paths() {
			assert!(is_same_origin("/"));
			assert!(is_same_origin("/admin/dashboard"));
			assert!(is_same_origin("/trips/123?page=2"));
			assert!(is_same_origin("/path#fragment"));
		}

		#[test]
		fn rejects_absolute_urls() {
			assert!(!is_same_origin("https://evil.com"));
			assert!(!is_same_origin("http://evil.com"));
			assert!(!is_same_origin("//evil.com"));
			assert!(!is_same_origin("//evil.com/admin"));
		}

		#[test]
		fn rejects_embedded_scheme() {
			assert!(!is_same_origin("/redirect?to=https://evil.com"));
		}

		#[test]
		fn rejects_relative_without_slash() {
			assert!(!is_same_origin("dashboard"));
			assert!(!is_same_origin(""));
		}
	}

	mod denied_paths {
		use super::*;

		#[test]
		fn refuses_authentication_paths() {
			assert!(CallbackPath::parse("/admin/login", &denied()).is_none());
			assert!(CallbackPath::parse("/admin/forgot-password", &denied()).is_none());
		}

		#[test]
		fn refuses_authentication_paths_with_query() {
			assert!(CallbackPath::parse("/admin/login?callbackUrl=abc", &denied()).is_none());
		}

		#[test]
		fn accepts_other_paths_in_the_area() {
			let cb = CallbackPath::parse("/admin/trips?page=2", &denied());
			assert_eq!(cb.map(CallbackPath::into_inner).as_deref(), Some("/admin/trips?page=2"));
		}

		#[test]
		fn match_is_exact_not_prefix() {
			assert!(CallbackPath::parse("/admin/login-history", &denied()).is_some());
		}

		#[test]
		fn empty_denied_list_still_enforces_origin() {
			assert!(CallbackPath::parse("//evil.com", &[]).is_none());
			assert!(CallbackPath::parse("/fine", &[]).is_some());
		}
	}
}

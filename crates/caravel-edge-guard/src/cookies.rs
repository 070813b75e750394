// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Cookie header parsing.
//!
//! The guard never validates session tokens itself; it only needs to know
//! whether the area's session cookie is present and to read the permission
//! snapshot cookie. Token values are treated as opaque and are never logged.

use http::header::COOKIE;
use http::HeaderMap;

/// Extract a cookie value from the Cookie header.
///
/// # Arguments
///
/// * `headers` - The HTTP request headers
/// * `name` - The name of the cookie to look for
///
/// # Returns
///
/// The cookie value if found, or `None` if the cookie is not present.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
	headers
		.get(COOKIE)?
		.to_str()
		.ok()?
		.split(';')
		.find_map(|cookie| {
			let cookie = cookie.trim();
			let (cookie_name, value) = cookie.split_once('=')?;

			if cookie_name == name {
				Some(value.to_string())
			} else {
				None
			}
		})
}

/// Whether a cookie with the given name carries a non-empty value.
pub fn has_cookie(headers: &HeaderMap, name: &str) -> bool {
	cookie_value(headers, name).is_some_and(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
	use super::*;
	use http::header::HeaderValue;

	#[test]
	fn extracts_value_from_single_cookie() {
		let mut headers = HeaderMap::new();
		headers.insert(COOKIE, HeaderValue::from_static("caravel_admin_session=abc123"));

		assert_eq!(
			cookie_value(&headers, "caravel_admin_session"),
			Some("abc123".to_string())
		);
	}

	#[test]
	fn extracts_value_from_multiple_cookies() {
		let mut headers = HeaderMap::new();
		headers.insert(
			COOKIE,
			HeaderValue::from_static("other=value; caravel_admin_session=xyz789; another=test"),
		);

		assert_eq!(
			cookie_value(&headers, "caravel_admin_session"),
			Some("xyz789".to_string())
		);
	}

	#[test]
	fn returns_none_when_no_cookie_header() {
		let headers = HeaderMap::new();
		assert_eq!(cookie_value(&headers, "caravel_admin_session"), None);
	}

	#[test]
	fn returns_none_when_cookie_missing() {
		let mut headers = HeaderMap::new();
		headers.insert(COOKIE, HeaderValue::from_static("other=value; another=test"));

		assert_eq!(cookie_value(&headers, "caravel_admin_session"), None);
	}

	#[test]
	fn handles_whitespace_around_cookies() {
		let mut headers = HeaderMap::new();
		headers.insert(
			COOKIE,
			HeaderValue::from_static("  caravel_admin_session=token123  ; other=val  "),
		);

		assert_eq!(
			cookie_value(&headers, "caravel_admin_session"),
			Some("token123".to_string())
		);
	}

	#[test]
	fn has_cookie_rejects_empty_values() {
		let mut headers = HeaderMap::new();
		headers.insert(
			COOKIE,
			HeaderValue::from_static("caravel_admin_session=; other=val"),
		);

		assert!(!has_cookie(&headers, "caravel_admin_session"));
		assert!(has_cookie(&headers, "other"));
	}
}

// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Guarded area configuration section.
//!
//! One section per guarded area of the site. The admin console and the
//! customer account portal run the same guard with different tables; both
//! tables ship as built-in defaults and every field can be overridden from
//! the config file or the environment.

use serde::Deserialize;

/// How a permission-subsystem failure (for example an unreadable snapshot)
/// is resolved for the request that hit it.
///
/// The default is `Permit`: a broken snapshot keeps the admin area usable
/// and the failure is logged instead of locking everyone out. Operators who
/// prefer lockdown set `permission_failure = "deny"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionFailurePolicy {
	#[default]
	Permit,
	Deny,
}

/// Guarded area configuration (runtime, fully resolved).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaConfig {
	/// Short name used in logs and redirect decisions.
	pub name: String,
	/// Paths that belong to the login flow; matched exactly.
	pub auth_routes: Vec<String>,
	/// Prefixes of paths that require a session; matched with starts-with.
	pub protected_prefixes: Vec<String>,
	/// Cookie holding the area's session token.
	pub token_cookie: String,
	/// Where unauthenticated visitors are sent.
	pub login_path: String,
	/// Where authenticated visitors land when no callback is present.
	pub default_landing: String,
	/// Where permission denials are sent; `None` for areas that only check
	/// for a session.
	pub access_denied_path: Option<String>,
	/// Whether routes are checked against the permission index.
	pub enforce_permissions: bool,
	/// How internal permission-check failures are resolved.
	pub permission_failure: PermissionFailurePolicy,
}

impl AreaConfig {
	/// Built-in table for the admin console.
	pub fn admin_defaults() -> Self {
		Self {
			name: "admin".to_string(),
			auth_routes: vec![
				"/admin/login".to_string(),
				"/admin/forgot-password".to_string(),
			],
			protected_prefixes: vec!["/admin".to_string()],
			token_cookie: "caravel_admin_session".to_string(),
			login_path: "/admin/login".to_string(),
			default_landing: "/admin/dashboard".to_string(),
			access_denied_path: Some("/admin/access-denied".to_string()),
			enforce_permissions: true,
			permission_failure: PermissionFailurePolicy::Permit,
		}
	}

	/// Built-in table for the customer account portal.
	pub fn account_defaults() -> Self {
		Self {
			name: "account".to_string(),
			auth_routes: vec![
				"/account/login".to_string(),
				"/account/register".to_string(),
				"/account/forgot-password".to_string(),
			],
			protected_prefixes: vec!["/account".to_string()],
			token_cookie: "caravel_account_session".to_string(),
			login_path: "/account/login".to_string(),
			default_landing: "/account".to_string(),
			access_denied_path: None,
			enforce_permissions: false,
			permission_failure: PermissionFailurePolicy::Permit,
		}
	}

	/// The area's root path: its first protected prefix without a trailing
	/// slash. A callback that merely names the root carries no information
	/// beyond the default landing.
	pub fn root_path(&self) -> &str {
		let prefix = self
			.protected_prefixes
			.first()
			.map(String::as_str)
			.unwrap_or("/");
		match prefix.strip_suffix('/') {
			Some(stripped) if !stripped.is_empty() => stripped,
			_ => prefix,
		}
	}
}

/// Guarded area configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AreaConfigLayer {
	#[serde(default)]
	pub auth_routes: Option<Vec<String>>,
	#[serde(default)]
	pub protected_prefixes: Option<Vec<String>>,
	#[serde(default)]
	pub token_cookie: Option<String>,
	#[serde(default)]
	pub login_path: Option<String>,
	#[serde(default)]
	pub default_landing: Option<String>,
	#[serde(default)]
	pub access_denied_path: Option<String>,
	#[serde(default)]
	pub enforce_permissions: Option<bool>,
	#[serde(default)]
	pub permission_failure: Option<PermissionFailurePolicy>,
}

impl AreaConfigLayer {
	pub fn merge(&mut self, other: AreaConfigLayer) {
		if other.auth_routes.is_some() {
			self.auth_routes = other.auth_routes;
		}
		if other.protected_prefixes.is_some() {
			self.protected_prefixes = other.protected_prefixes;
		}
		if other.token_cookie.is_some() {
			self.token_cookie = other.token_cookie;
		}
		if other.login_path.is_some() {
			self.login_path = other.login_path;
		}
		if other.default_landing.is_some() {
			self.default_landing = other.default_landing;
		}
		if other.access_denied_path.is_some() {
			self.access_denied_path = other.access_denied_path;
		}
		if other.enforce_permissions.is_some() {
			self.enforce_permissions = other.enforce_permissions;
		}
		if other.permission_failure.is_some() {
			self.permission_failure = other.permission_failure;
		}
	}

	/// Resolve against one of the built-in area tables.
	pub fn finalize(self, defaults: AreaConfig) -> AreaConfig {
		AreaConfig {
			name: defaults.name,
			auth_routes: self.auth_routes.unwrap_or(defaults.auth_routes),
			protected_prefixes: self.protected_prefixes.unwrap_or(defaults.protected_prefixes),
			token_cookie: self.token_cookie.unwrap_or(defaults.token_cookie),
			login_path: self.login_path.unwrap_or(defaults.login_path),
			default_landing: self.default_landing.unwrap_or(defaults.default_landing),
			access_denied_path: self.access_denied_path.or(defaults.access_denied_path),
			enforce_permissions: self.enforce_permissions.unwrap_or(defaults.enforce_permissions),
			permission_failure: self.permission_failure.unwrap_or(defaults.permission_failure),
		}
	}
}

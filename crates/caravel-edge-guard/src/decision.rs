// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Route guarding decisions.
//!
//! This module provides:
//! - [`GuardRequest`] - the request facts a decision is based on
//! - [`GuardDecision`] - continue or redirect
//! - [`AreaGuard`] - the decision engine for one guarded area
//! - [`EdgeGuard`] - dispatches requests to the area that owns them
//!
//! # Decision Flow
//!
//! ```text
//! Request → Auth route?  ── yes, with session ──→ Redirect (callback or landing)
//!              │
//!              └─ Protected prefix? ── no session ──→ Redirect (login + sealed callback)
//!                      │
//!                      └─ with session → permission check → Redirect (denied) or Continue
//! ```
//!
//! # Security Properties
//!
//! - Decisions depend only on the request path, query, cookie presence and the
//!   permission snapshot. No session store or database is consulted.
//! - Callback targets are only honored after authenticated decryption; a token
//!   that fails to open falls back to the area's default landing page.
//! - A snapshot that cannot be read is resolved by the area's
//!   [`PermissionFailurePolicy`], never by guessing at its contents.

use caravel_edge_cipher::{CipherKey, PathCipher};
use caravel_edge_config::{AreaConfig, EdgeConfig, PermissionFailurePolicy};
use caravel_edge_permissions::{
	can_access_route, NavNode, PermissionSnapshot, RoutePermissionIndex, SnapshotError,
};
use tracing::{debug, info, instrument, warn};
use url::form_urlencoded;

/// Query parameter carrying the sealed callback token.
pub const CALLBACK_PARAM: &str = "callbackUrl";

/// The facts about a request that a guard decision is based on.
#[derive(Debug, Clone)]
pub struct GuardRequest<'a> {
	/// Request path, percent-decoded by the HTTP layer.
	pub path: &'a str,
	/// Raw query string, without the leading `?`.
	pub query: Option<&'a str>,
	/// Whether the area's session cookie is present and non-empty.
	pub has_token: bool,
	/// Raw value of the permission snapshot cookie, if present.
	pub snapshot: Option<&'a str>,
}

/// The outcome of a guard decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
	/// Let the request through to the application.
	Continue,
	/// Redirect the visitor to the given same-origin path.
	Redirect(String),
}

/// Decision engine for one guarded area.
///
/// Holds the area's route tables, its path cipher and its permission index.
/// All methods are read-only; one `AreaGuard` serves concurrent requests.
pub struct AreaGuard {
	policy: AreaConfig,
	cipher: PathCipher,
	index: RoutePermissionIndex,
	snapshot_cookie: String,
}

impl AreaGuard {
	pub fn new(policy: AreaConfig, key: CipherKey, index: RoutePermissionIndex) -> Self {
		let cipher = PathCipher::new(key, policy.auth_routes.clone());
		let snapshot_cookie = format!("{}_grants", policy.token_cookie);
		Self {
			policy,
			cipher,
			index,
			snapshot_cookie,
		}
	}

	pub fn policy(&self) -> &AreaConfig {
		&self.policy
	}

	pub fn token_cookie(&self) -> &str {
		&self.policy.token_cookie
	}

	pub fn snapshot_cookie(&self) -> &str {
		&self.snapshot_cookie
	}

	/// Whether this area owns the given path.
	pub fn matches(&self, path: &str) -> bool {
		self.is_auth_route(path) || self.is_protected(path)
	}

	/// Decide what to do with a request.
	///
	/// The decision is a pure function of the request facts and the area's
	/// configuration; calling it has no side effects beyond logging.
	#[instrument(
		level = "debug",
		skip(self, request),
		fields(area = %self.policy.name, path = %request.path, has_token = request.has_token)
	)]
	pub fn decide(&self, request: &GuardRequest<'_>) -> GuardDecision {
		let path = request.path;

		// Authenticated visitors have no business on the login flow.
		if self.is_auth_route(path) {
			if !request.has_token {
				return GuardDecision::Continue;
			}
			let target = self
				.resolve_callback(request.query)
				.filter(|target| target.as_str() != self.policy.root_path())
				.unwrap_or_else(|| self.policy.default_landing.clone());
			debug!(target = %target, "redirecting authenticated visitor off the auth flow");
			return GuardDecision::Redirect(target);
		}

		if !self.is_protected(path) {
			return GuardDecision::Continue;
		}

		if !request.has_token {
			let destination = self.login_redirect(path, request.query);
			debug!("redirecting unauthenticated visitor to login");
			return GuardDecision::Redirect(destination);
		}

		if self.policy.enforce_permissions {
			if let Some(denial) = self.permission_denial(path, request.snapshot) {
				return denial;
			}
		}

		// A leftover callback token on an accessible page still gets honored,
		// so a freshly logged-in visitor ends up where they were headed.
		if let Some(target) = self.resolve_callback(request.query) {
			debug!(target = %target, "forwarding visitor to callback target");
			return GuardDecision::Redirect(target);
		}

		GuardDecision::Continue
	}

	fn is_auth_route(&self, path: &str) -> bool {
		self.policy.auth_routes.iter().any(|route| route == path)
	}

	fn is_protected(&self, path: &str) -> bool {
		self.policy
			.protected_prefixes
			.iter()
			.any(|prefix| path.starts_with(prefix.as_str()))
	}

	/// Decrypt the callback token from a query string, if one is present
	/// and opens to a safe same-origin path.
	fn resolve_callback(&self, query: Option<&str>) -> Option<String> {
		let token = callback_param(query?)?;
		self.cipher.open(&token)
	}

	/// Build the login redirect for an unauthenticated request, sealing the
	/// original destination so it survives the login round trip.
	fn login_redirect(&self, path: &str, query: Option<&str>) -> String {
		let callback = match query.and_then(strip_callback_param) {
			Some(rest) => format!("{path}?{rest}"),
			None => path.to_string(),
		};

		match self.cipher.seal(&callback) {
			Some(token) => format!("{}?{CALLBACK_PARAM}={token}", self.policy.login_path),
			None => self.policy.login_path.clone(),
		}
	}

	fn permission_denial(&self, path: &str, snapshot_raw: Option<&str>) -> Option<GuardDecision> {
		let snapshot = match snapshot_raw {
			None => PermissionSnapshot::empty(),
			Some(raw) => match PermissionSnapshot::parse(raw) {
				Ok(snapshot) => snapshot,
				Err(SnapshotError::Empty) => PermissionSnapshot::empty(),
				Err(error) => {
					warn!(
						error = %error,
						policy = ?self.policy.permission_failure,
						"permission snapshot unreadable, applying failure policy"
					);
					return match self.policy.permission_failure {
						PermissionFailurePolicy::Permit => None,
						PermissionFailurePolicy::Deny => self.denied_redirect(path),
					};
				}
			},
		};

		if can_access_route(&snapshot, path, &self.index) {
			None
		} else {
			self.denied_redirect(path)
		}
	}

	fn denied_redirect(&self, path: &str) -> Option<GuardDecision> {
		match &self.policy.access_denied_path {
			Some(denied) => {
				debug!(path = %path, "permission denied for route");
				Some(GuardDecision::Redirect(denied.clone()))
			}
			None => {
				warn!(path = %path, "permission denied but no denial page is configured");
				None
			}
		}
	}
}

/// Dispatches requests to the guarded area that owns them.
pub struct EdgeGuard {
	areas: Vec<AreaGuard>,
}

impl EdgeGuard {
	pub fn new(areas: Vec<AreaGuard>) -> Self {
		Self { areas }
	}

	/// Build the guard for every configured area from resolved configuration
	/// and the navigation tree that defines route permissions.
	pub fn from_config(config: &EdgeConfig, navigation: &[NavNode]) -> Self {
		let areas: Vec<AreaGuard> = config
			.areas()
			.into_iter()
			.map(|policy| {
				AreaGuard::new(
					policy.clone(),
					config.cipher.key.clone(),
					RoutePermissionIndex::build(navigation),
				)
			})
			.collect();

		if let Some(first) = areas.first() {
			info!(
				areas = areas.len(),
				routes = first.index.len(),
				"edge guard initialized"
			);
		}

		Self { areas }
	}

	pub fn areas(&self) -> &[AreaGuard] {
		&self.areas
	}

	/// The first area whose route tables claim the given path.
	pub fn area_for(&self, path: &str) -> Option<&AreaGuard> {
		self.areas.iter().find(|area| area.matches(path))
	}
}

fn callback_param(query: &str) -> Option<String> {
	form_urlencoded::parse(query.as_bytes())
		.find_map(|(name, value)| (name == CALLBACK_PARAM).then(|| value.into_owned()))
}

/// Re-serialize a query string without the callback parameter. Returns `None`
/// when nothing else remains.
fn strip_callback_param(query: &str) -> Option<String> {
	let mut remaining = form_urlencoded::Serializer::new(String::new());
	let mut any = false;
	for (name, value) in form_urlencoded::parse(query.as_bytes()) {
		if name == CALLBACK_PARAM {
			continue;
		}
		remaining.append_pair(&name, &value);
		any = true;
	}
	any.then(|| remaining.finish())
}

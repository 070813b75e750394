// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Permission evaluation.
//!
//! Two entry points, both pure functions:
//!
//! 1. [`has_permission`]: does the snapshot grant an action on a resource
//! 2. [`can_access_route`]: may the visitor open a route, given the index
//!
//! The super-admin flag short-circuits everything, including resources the
//! snapshot has never heard of. Routes absent from the index are open to any
//! authenticated visitor; the index locks routes down, it does not grant.

use tracing::instrument;

use crate::index::RoutePermissionIndex;
use crate::types::PermissionSnapshot;

/// Evaluates whether a snapshot grants an action on a resource.
///
/// # Arguments
///
/// * `snapshot` - The visitor's permission snapshot
/// * `resource` - The resource being accessed
/// * `action` - The action, or `None` when knowing the resource is enough
///
/// # Returns
///
/// `true` if access is granted, `false` otherwise.
///
/// # Tracing
///
/// Instrumented at debug level; the snapshot contents are skipped so grants
/// never land in logs.
#[instrument(level = "debug", skip(snapshot), fields(resource = %resource, action = ?action))]
pub fn has_permission(snapshot: &PermissionSnapshot, resource: &str, action: Option<&str>) -> bool {
	if snapshot.is_super_admin() {
		return true;
	}

	let Some(actions) = snapshot.grants_for(resource) else {
		return false;
	};
	if actions.is_empty() {
		return false;
	}

	match action {
		None => true,
		Some(action) => actions.iter().any(|granted| granted == action),
	}
}

/// Evaluates whether a visitor may open a route.
///
/// Super-admins pass unconditionally. Routes without an index entry are
/// allowed; everything else delegates to [`has_permission`] with the route's
/// requirement.
#[instrument(level = "debug", skip(snapshot, index), fields(route = %route))]
pub fn can_access_route(
	snapshot: &PermissionSnapshot,
	route: &str,
	index: &RoutePermissionIndex,
) -> bool {
	if snapshot.is_super_admin() {
		return true;
	}

	match index.requirement(route) {
		None => true,
		Some(required) => has_permission(snapshot, &required.resource, required.action.as_deref()),
	}
}

// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Type definitions for route permissions.
//!
//! This module defines the data structures the edge shares with the content
//! backend:
//!
//! - [`NavNode`]: one entry of the navigation tree the backend serves
//! - [`RequiredPermission`]: the permission a navigable route demands
//! - [`PermissionSnapshot`]: what the signed-in visitor is allowed to do
//!
//! # Design Principles
//!
//! 1. **Wire-shaped**: these types deserialize the backend's JSON as-is,
//!    `camelCase` field names included
//! 2. **Both snapshot shapes**: the backend serves either one grant object or
//!    an array of single-resource objects; both deserialize into
//!    [`PermissionSnapshot`]
//! 3. **Pure evaluation**: all lookups are side-effect free; the evaluator in
//!    [`crate::engine`] never touches I/O

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{SnapshotError, SnapshotResult};

/// The permission a route requires: a resource name and, optionally, a
/// specific action on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequiredPermission {
	pub resource: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub action: Option<String>,
}

impl RequiredPermission {
	/// Requirement satisfied by knowing the resource at all.
	pub fn new(resource: impl Into<String>) -> Self {
		Self {
			resource: resource.into(),
			action: None,
		}
	}

	/// Requirement on a specific action.
	pub fn with_action(mut self, action: impl Into<String>) -> Self {
		self.action = Some(action.into());
		self
	}
}

/// One entry of the navigation tree.
///
/// A node with children but an empty `path` is a grouping header, not a
/// navigable route; it never lands in the index but its children still do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavNode {
	pub title: String,
	#[serde(default)]
	pub path: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub permission: Option<RequiredPermission>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub children: Vec<NavNode>,
}

impl NavNode {
	/// Creates a navigable node with no permission and no children.
	pub fn new(title: impl Into<String>, path: impl Into<String>) -> Self {
		Self {
			title: title.into(),
			path: path.into(),
			permission: None,
			children: Vec::new(),
		}
	}

	/// Creates a grouping node: a title with children but no path of its own.
	pub fn group(title: impl Into<String>, children: Vec<NavNode>) -> Self {
		Self {
			title: title.into(),
			path: String::new(),
			permission: None,
			children,
		}
	}

	/// Attaches a permission requirement to this node.
	pub fn with_permission(mut self, permission: RequiredPermission) -> Self {
		self.permission = Some(permission);
		self
	}

	/// Attaches children to this node.
	pub fn with_children(mut self, children: Vec<NavNode>) -> Self {
		self.children = children;
		self
	}
}

/// One grant object: resource names mapped to the actions allowed on them,
/// plus the super-admin escape hatch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantSet {
	#[serde(default, rename = "superAdmin")]
	pub super_admin: bool,
	#[serde(flatten)]
	pub grants: HashMap<String, Vec<String>>,
}

impl GrantSet {
	/// A grant set with the super-admin flag raised.
	pub fn super_admin() -> Self {
		Self {
			super_admin: true,
			grants: HashMap::new(),
		}
	}

	/// A grant set for a single resource.
	pub fn resource(resource: impl Into<String>, actions: Vec<String>) -> Self {
		let mut grants = HashMap::new();
		grants.insert(resource.into(), actions);
		Self {
			super_admin: false,
			grants,
		}
	}
}

/// What the signed-in visitor may do, as served by the backend.
///
/// The backend emits either a single grant object or an array of
/// single-resource objects depending on which endpoint produced it. Lookups
/// normalize over both shapes; in the array shape the **first** element
/// carrying a resource wins and later duplicates are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PermissionSnapshot {
	Single(GrantSet),
	Many(Vec<GrantSet>),
}

impl PermissionSnapshot {
	/// A snapshot granting nothing.
	pub fn empty() -> Self {
		PermissionSnapshot::Single(GrantSet::default())
	}

	/// Parse a snapshot from its cookie transport.
	///
	/// The value is tried as raw JSON first, then percent-decoded and tried
	/// again; cookies written by the browser side arrive encoded, values
	/// written server-side do not.
	pub fn parse(raw: &str) -> SnapshotResult<Self> {
		if raw.trim().is_empty() {
			return Err(SnapshotError::Empty);
		}
		match serde_json::from_str(raw) {
			Ok(snapshot) => Ok(snapshot),
			Err(raw_error) => {
				if let Ok(unescaped) = urlencoding::decode(raw) {
					if let Ok(snapshot) = serde_json::from_str(&unescaped) {
						return Ok(snapshot);
					}
				}
				Err(SnapshotError::Malformed(raw_error))
			}
		}
	}

	/// True if the snapshot carries the super-admin flag, in either shape.
	pub fn is_super_admin(&self) -> bool {
		match self {
			PermissionSnapshot::Single(set) => set.super_admin,
			PermissionSnapshot::Many(sets) => sets.iter().any(|set| set.super_admin),
		}
	}

	/// The action list granted for a resource, if the resource is known.
	///
	/// Array shape: first element containing the resource wins.
	pub fn grants_for(&self, resource: &str) -> Option<&[String]> {
		match self {
			PermissionSnapshot::Single(set) => set.grants.get(resource).map(Vec::as_slice),
			PermissionSnapshot::Many(sets) => sets
				.iter()
				.find(|set| set.grants.contains_key(resource))
				.and_then(|set| set.grants.get(resource))
				.map(Vec::as_slice),
		}
	}
}

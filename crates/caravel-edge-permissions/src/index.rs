// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Route permission index.
//!
//! Flattens the navigation tree into a path -> required-permission map so the
//! guard can answer "what does this route demand" with one hash lookup per
//! request. Building is pure and deterministic; the index is built once at
//! startup and shared read-only for the life of the process.

use std::collections::HashMap;

use crate::types::{NavNode, RequiredPermission};

/// Flattened path -> permission map derived from the navigation tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutePermissionIndex {
	routes: HashMap<String, RequiredPermission>,
}

impl RoutePermissionIndex {
	/// Build the index by depth-first traversal, parent before children.
	///
	/// A node contributes an entry only when it has both a non-empty path and
	/// a permission; grouping headers and unrestricted routes are skipped.
	/// Children are visited regardless of whether their parent contributed.
	/// When two nodes name the same path, the later one in traversal order
	/// wins.
	pub fn build(tree: &[NavNode]) -> Self {
		let mut routes = HashMap::new();
		collect(tree, &mut routes);
		Self { routes }
	}

	/// The permission a route requires, if the route is indexed at all.
	pub fn requirement(&self, route: &str) -> Option<&RequiredPermission> {
		self.routes.get(route)
	}

	/// Number of indexed routes.
	pub fn len(&self) -> usize {
		self.routes.len()
	}

	/// True if no route carries a requirement.
	pub fn is_empty(&self) -> bool {
		self.routes.is_empty()
	}
}

fn collect(nodes: &[NavNode], routes: &mut HashMap<String, RequiredPermission>) {
	for node in nodes {
		if !node.path.is_empty() {
			if let Some(permission) = &node.permission {
				routes.insert(node.path.clone(), permission.clone());
			}
		}
		collect(&node.children, routes);
	}
}

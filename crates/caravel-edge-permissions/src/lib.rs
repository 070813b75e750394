// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Caravel Edge Permissions
//!
//! Pure permission evaluation for the edge guard:
//!
//! - **Route index**: the backend's navigation tree flattened into a
//!   path -> required-permission map, built once at startup
//! - **Snapshots**: the visitor's grants in either wire shape (one object or
//!   an array of single-resource objects)
//! - **Evaluation**: side-effect-free allow/deny answers with super-admin
//!   short-circuit and default-allow for unindexed routes
//!
//! No I/O happens in this crate; fetching the tree and the snapshot is the
//! host's concern.

pub mod engine;
pub mod error;
pub mod index;
pub mod types;

pub use engine::{can_access_route, has_permission};
pub use error::{SnapshotError, SnapshotResult};
pub use index::RoutePermissionIndex;
pub use types::{GrantSet, NavNode, PermissionSnapshot, RequiredPermission};

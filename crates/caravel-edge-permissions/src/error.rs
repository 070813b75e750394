// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for permission snapshot handling.

use thiserror::Error;

/// Result type alias for snapshot operations.
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Errors that can occur while reading a permission snapshot off the wire.
///
/// Evaluation itself is infallible; only the transport can fail. How a
/// failure is resolved (permit or deny) is the caller's policy, not decided
/// here.
#[derive(Debug, Error)]
pub enum SnapshotError {
	#[error("snapshot is not valid JSON: {0}")]
	Malformed(#[from] serde_json::Error),

	#[error("snapshot is empty")]
	Empty,
}

// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration layer for merging from multiple sources.

use serde::Deserialize;

use crate::sections::{AreaConfigLayer, CipherConfigLayer, LoggingConfigLayer};

/// Edge configuration layer - all fields are Option for merging.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EdgeConfigLayer {
	#[serde(default)]
	pub cipher: Option<CipherConfigLayer>,
	#[serde(default)]
	pub admin: Option<AreaConfigLayer>,
	#[serde(default)]
	pub account: Option<AreaConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
}

impl EdgeConfigLayer {
	/// Merge another layer into this one. Other layer takes precedence.
	pub fn merge(&mut self, other: EdgeConfigLayer) {
		merge_option(&mut self.cipher, other.cipher, CipherConfigLayer::merge);
		merge_option(&mut self.admin, other.admin, AreaConfigLayer::merge);
		merge_option(&mut self.account, other.account, AreaConfigLayer::merge);
		merge_option(&mut self.logging, other.logging, LoggingConfigLayer::merge);
	}
}

fn merge_option<T, F>(target: &mut Option<T>, source: Option<T>, merge_fn: F)
where
	F: FnOnce(&mut T, T),
{
	match (target.as_mut(), source) {
		(Some(t), Some(s)) => merge_fn(t, s),
		(None, Some(s)) => *target = Some(s),
		_ => {}
	}
}

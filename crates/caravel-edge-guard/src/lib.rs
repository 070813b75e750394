// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Route guarding for the Caravel admin console and account portal.
//!
//! This crate provides:
//! - [`AreaGuard`] - per-area access decisions from route tables, session
//!   cookie presence and the permission snapshot
//! - [`EdgeGuard`] - dispatches each request to the area that owns it
//! - [`guard_layer`] - the Axum middleware adapter
//! - Cookie header parsing helpers
//!
//! # Security
//!
//! The guard trusts the session layer for token issuance and validation; it
//! only reacts to cookie presence. Everything it redirects to is either a
//! configured same-origin path or a callback target recovered from an
//! authenticated token minted by [`caravel_edge_cipher`].
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use axum::middleware::from_fn_with_state;
//! use caravel_edge_config::load_config;
//! use caravel_edge_guard::{guard_layer, EdgeGuard};
//!
//! let config = load_config()?;
//! let guard = Arc::new(EdgeGuard::from_config(&config, &navigation));
//! let app = site_routes().layer(from_fn_with_state(guard, guard_layer));
//! ```

pub mod cookies;
pub mod decision;
pub mod middleware;

pub use cookies::{cookie_value, has_cookie};
pub use decision::{AreaGuard, EdgeGuard, GuardDecision, GuardRequest, CALLBACK_PARAM};
pub use middleware::guard_layer;

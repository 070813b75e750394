// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections for the Caravel edge.

pub mod area;
pub mod cipher;
pub mod logging;

pub use area::{AreaConfig, AreaConfigLayer, PermissionFailurePolicy};
pub use cipher::{CipherConfig, CipherConfigLayer};
pub use logging::{LoggingConfig, LoggingConfigLayer};

// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Interactive drawing tools

pub mod pen;

pub use pen::{PathBuilder, PenState};

// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Edit types for undo records

use serde::{Deserialize, Serialize};

/// Type of edit emitted when authoring ends
///
/// Each finished path produces exactly one edit, so undo removes the
/// whole path in one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditType {
    /// The path was closed onto its first anchor
    PathClosed,

    /// The host finished the path while it was still open
    PathFinished,
}

impl EditType {
    /// Name shown in a history panel
    pub fn label(self) -> &'static str {
        match self {
            EditType::PathClosed => "Close Path",
            EditType::PathFinished => "Draw Path",
        }
    }
}

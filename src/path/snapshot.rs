// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Value snapshots of paths, for undo records.
//!
//! A snapshot holds everything needed to rebuild a path: anchor ids,
//! positions, handles, handle modes and the closed flag. The transient
//! closing affordance is left out.

use super::{AnchorPoint, ControlHandle, HandleMode, Path};
use crate::model::EntityId;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Frozen state of one anchor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorSnapshot {
    pub id: EntityId,
    pub position: Point,
    pub handle_in: ControlHandle,
    pub handle_out: ControlHandle,
    pub mode: HandleMode,
}

/// Frozen state of a whole path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSnapshot {
    pub anchors: Vec<AnchorSnapshot>,
    pub closed: bool,
}

impl PathSnapshot {
    pub fn from_path(path: &Path) -> Self {
        let anchors = path
            .anchors()
            .iter()
            .map(|a| AnchorSnapshot {
                id: a.id(),
                position: a.position(),
                handle_in: a.handle_in(),
                handle_out: a.handle_out(),
                mode: a.mode(),
            })
            .collect();

        Self {
            anchors,
            closed: path.is_closed(),
        }
    }

    /// Rebuild the path; anchor ids are preserved
    pub fn to_path(&self) -> Path {
        let anchors = self
            .anchors
            .iter()
            .enumerate()
            .map(|(i, snap)| {
                let mut anchor = AnchorPoint::with_id(snap.id, snap.position, i == 0);
                anchor.set_mode(snap.mode);
                anchor.set_handles(snap.handle_in, snap.handle_out);
                anchor
            })
            .collect();

        Path::from_parts(anchors, self.closed)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(source: &str) -> serde_json::Result<Self> {
        serde_json::from_str(source)
    }
}

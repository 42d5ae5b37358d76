// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Boundary to the host's undo history.
//!
//! The pen tool does not store or replay history. When a path is done it
//! hands one [`PathEdit`] to an [`EditSink`]; what happens next is up to
//! the host. [`EditLog`] is a plain in-memory sink for hosts that just
//! want the records, and for tests.

use super::edit_types::EditType;
use crate::path::PathSnapshot;
use serde::{Deserialize, Serialize};

/// One completed authoring action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathEdit {
    pub kind: EditType,
    pub snapshot: PathSnapshot,
}

/// Receives completed-path edits
pub trait EditSink {
    /// Called exactly once per finished path
    fn record_path_completed(&mut self, edit: PathEdit);
}

/// An `EditSink` that keeps every edit in order
#[derive(Debug, Clone, Default)]
pub struct EditLog {
    edits: Vec<PathEdit>,
}

impl EditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn edits(&self) -> &[PathEdit] {
        &self.edits
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn last(&self) -> Option<&PathEdit> {
        self.edits.last()
    }
}

impl EditSink for EditLog {
    fn record_path_completed(&mut self, edit: PathEdit) {
        tracing::debug!(
            "[EditLog] recorded '{}' with {} anchors",
            edit.kind.label(),
            edit.snapshot.anchors.len()
        );
        self.edits.push(edit);
    }
}

impl<S: EditSink + ?Sized> EditSink for &mut S {
    fn record_path_completed(&mut self, edit: PathEdit) {
        (**self).record_path_completed(edit);
    }
}

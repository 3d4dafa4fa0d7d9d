// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Bounded linear undo/redo history.
//!
//! The stack always holds at least one entry and the cursor always points at a valid entry.
//! Pushing after an undo discards the redo tail. Once the stack is full the oldest entry is
//! evicted.
//!
//! Undo and redo arm a one-shot replay guard: observers that react to the replayed state by
//! pushing it again are ignored until [`HistoryStack::settle`] is called.

use std::collections::VecDeque;

pub const DEFAULT_CAPACITY: usize = 50;

#[derive(Debug, Clone)]
pub struct HistoryStack<T> {
    entries: VecDeque<T>,
    cursor: usize,
    capacity: usize,
    replaying: bool,
}

impl<T> HistoryStack<T> {
    pub fn new(initial: T) -> Self {
        Self::with_capacity(initial, DEFAULT_CAPACITY)
    }

    /// A capacity of 0 is treated as 1.
    pub fn with_capacity(initial: T, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut entries = VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY));
        entries.push_back(initial);
        Self {
            entries,
            cursor: 0,
            capacity,
            replaying: false,
        }
    }

    /// Records `entry` as the new current state. Returns `false` (and drops `entry`) while a
    /// replay is unsettled.
    pub fn push(&mut self, entry: T) -> bool {
        if self.replaying {
            tracing::trace!("history push ignored during replay");
            return false;
        }

        self.entries.truncate(self.cursor + 1);
        self.entries.push_back(entry);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.cursor = self.entries.len() - 1;
        true
    }

    pub fn undo(&mut self) -> Option<&T> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        self.replaying = true;
        self.entries.get(self.cursor)
    }

    pub fn redo(&mut self) -> Option<&T> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.replaying = true;
        self.entries.get(self.cursor)
    }

    /// Ends a replay started by `undo`/`redo`.
    pub fn settle(&mut self) {
        self.replaying = false;
    }

    pub fn is_replaying(&self) -> bool {
        self.replaying
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn current(&self) -> &T {
        &self.entries[self.cursor]
    }

    /// Drops all entries and starts over from `initial`.
    pub fn reset(&mut self, initial: T) {
        self.entries.clear();
        self.entries.push_back(initial);
        self.cursor = 0;
        self.replaying = false;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

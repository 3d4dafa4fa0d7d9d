// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Trailing-edge debounce for persistence.
//!
//! Every change re-arms the deadline, so a burst of edits produces one save `delay` after the
//! last edit. Time is passed in; the owner decides how to wait for [`Autosave::deadline`].

use std::time::{Duration, Instant};

pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Autosave {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Default for Autosave {
    fn default() -> Self {
        Self::new(DEFAULT_AUTOSAVE_DELAY)
    }
}

impl Autosave {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedules a save `delay` after `now`, replacing any pending deadline.
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// `true` once per armed deadline: disarms when due.
    pub fn take_due(&mut self, now: Instant) -> bool {
        if !self.is_due(now) {
            return false;
        }
        self.deadline = None;
        true
    }
}

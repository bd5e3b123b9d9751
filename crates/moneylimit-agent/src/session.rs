// SPDX-FileCopyrightText: 2026 MoneyLimit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user dialogue state with inactivity expiry.
//!
//! A user is `Idle` unless a multi-step dialogue is in progress. Entries that
//! sit untouched for longer than the TTL read as `Idle` again.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use moneylimit_core::UserId;

/// Where a user is in a multi-step dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueState {
    /// No dialogue in progress.
    Idle,
    /// Waiting for the monthly amount.
    AwaitingAmount,
    /// Amount received; waiting for the horizon in days.
    AwaitingDays { monthly_amount: i64 },
    /// Waiting for the amount just spent.
    AwaitingSpend,
}

impl std::fmt::Display for DialogueState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DialogueState::Idle => write!(f, "idle"),
            DialogueState::AwaitingAmount => write!(f, "awaiting_amount"),
            DialogueState::AwaitingDays { .. } => write!(f, "awaiting_days"),
            DialogueState::AwaitingSpend => write!(f, "awaiting_spend"),
        }
    }
}

struct Entry {
    state: DialogueState,
    touched: Instant,
}

/// In-memory dialogue states keyed by user.
pub struct SessionStore {
    entries: DashMap<UserId, Entry>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Current state for `user_id`. Expired entries are dropped.
    pub fn get(&self, user_id: UserId) -> DialogueState {
        self.get_at(user_id, Instant::now())
    }

    fn get_at(&self, user_id: UserId, now: Instant) -> DialogueState {
        let expired = |entry: &Entry| now.saturating_duration_since(entry.touched) >= self.ttl;
        match self.entries.get(&user_id) {
            None => return DialogueState::Idle,
            Some(entry) if !expired(entry.value()) => return entry.state,
            Some(_) => {}
        }
        self.entries.remove_if(&user_id, |_, entry| expired(entry));
        DialogueState::Idle
    }

    /// Store a state and restart its expiry clock. `Idle` removes the entry.
    pub fn set(&self, user_id: UserId, state: DialogueState) {
        if state == DialogueState::Idle {
            self.entries.remove(&user_id);
            return;
        }
        self.entries.insert(
            user_id,
            Entry {
                state,
                touched: Instant::now(),
            },
        );
    }

    pub fn clear(&self, user_id: UserId) {
        self.entries.remove(&user_id);
    }

    /// Drop every expired entry and return how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    fn purge_expired_at(&self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.touched) < self.ttl);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

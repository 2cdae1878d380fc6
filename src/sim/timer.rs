//! Scheduled lifecycle transitions
//!
//! Every "wait, then change state" step is a queue entry with a token. A
//! transition only runs if its token is still queued, so timers from a
//! superseded round cannot touch the current one.

use serde::{Deserialize, Serialize};

/// Cancellation handle for a scheduled transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerToken(u64);

impl TimerToken {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// What happens when a timer fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerKind {
    /// Speak the current round's letter
    Announce,
    /// Feedback display is over; clear the round
    FeedbackDone,
    /// Settle delay is over; generate the next round
    SettleDone,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduledTimer {
    pub token: TimerToken,
    pub kind: TimerKind,
    /// Engine clock time at which the timer is due
    pub due_ms: f64,
}

/// Engine clock plus pending timers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimerQueue {
    now_ms: f64,
    next_token: u64,
    pending: Vec<ScheduledTimer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn schedule(&mut self, kind: TimerKind, delay_ms: u32) -> TimerToken {
        self.next_token += 1;
        let token = TimerToken(self.next_token);
        self.pending.push(ScheduledTimer {
            token,
            kind,
            due_ms: self.now_ms + f64::from(delay_ms),
        });
        token
    }

    /// Remove a timer; false if it already fired or was cancelled
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.token != token);
        self.pending.len() != before
    }

    /// Remove every timer of `kind`, returning how many were pending
    pub fn cancel_kind(&mut self, kind: TimerKind) -> usize {
        let before = self.pending.len();
        self.pending.retain(|t| t.kind != kind);
        before - self.pending.len()
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, token: TimerToken) -> bool {
        self.pending.iter().any(|t| t.token == token)
    }

    pub fn has_pending(&self, kind: TimerKind) -> bool {
        self.pending.iter().any(|t| t.kind == kind)
    }

    pub fn pending(&self) -> &[ScheduledTimer] {
        &self.pending
    }

    /// Dequeue a specific timer regardless of its due time
    pub fn take(&mut self, token: TimerToken) -> Option<ScheduledTimer> {
        let idx = self.pending.iter().position(|t| t.token == token)?;
        Some(self.pending.remove(idx))
    }

    /// Dequeue the earliest timer due at or before `until`, moving the clock
    /// to its due time. Ties fire in scheduling order.
    pub fn pop_due(&mut self, until_ms: f64) -> Option<ScheduledTimer> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= until_ms)
            .min_by(|(_, a), (_, b)| {
                a.due_ms
                    .partial_cmp(&b.due_ms)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.token.cmp(&b.token))
            })
            .map(|(i, _)| i)?;
        let timer = self.pending.remove(idx);
        self.now_ms = self.now_ms.max(timer.due_ms);
        Some(timer)
    }

    /// Move the clock forward without firing anything
    pub fn set_now(&mut self, now_ms: f64) {
        self.now_ms = self.now_ms.max(now_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_unique() {
        let mut q = TimerQueue::new();
        let a = q.schedule(TimerKind::Announce, 10);
        let b = q.schedule(TimerKind::Announce, 10);
        assert_ne!(a, b);
    }

    #[test]
    fn test_pop_due_in_order() {
        let mut q = TimerQueue::new();
        let late = q.schedule(TimerKind::SettleDone, 300);
        let early = q.schedule(TimerKind::FeedbackDone, 100);

        assert!(q.pop_due(50.0).is_none());
        assert_eq!(q.pop_due(1000.0).map(|t| t.token), Some(early));
        assert_eq!(q.now_ms(), 100.0);
        assert_eq!(q.pop_due(1000.0).map(|t| t.token), Some(late));
        assert!(q.pop_due(1000.0).is_none());
    }

    #[test]
    fn test_ties_fire_in_schedule_order() {
        let mut q = TimerQueue::new();
        let first = q.schedule(TimerKind::Announce, 100);
        let second = q.schedule(TimerKind::FeedbackDone, 100);
        assert_eq!(q.pop_due(100.0).map(|t| t.token), Some(first));
        assert_eq!(q.pop_due(100.0).map(|t| t.token), Some(second));
    }

    #[test]
    fn test_cancel() {
        let mut q = TimerQueue::new();
        let token = q.schedule(TimerKind::Announce, 100);
        assert!(q.cancel(token));
        assert!(!q.cancel(token));
        assert!(!q.is_pending(token));
        assert!(q.pop_due(f64::MAX).is_none());
    }

    #[test]
    fn test_cancel_kind() {
        let mut q = TimerQueue::new();
        q.schedule(TimerKind::Announce, 100);
        q.schedule(TimerKind::Announce, 200);
        q.schedule(TimerKind::SettleDone, 50);
        assert_eq!(q.cancel_kind(TimerKind::Announce), 2);
        assert!(!q.has_pending(TimerKind::Announce));
        assert!(q.has_pending(TimerKind::SettleDone));
    }

    #[test]
    fn test_delay_is_relative_to_clock() {
        let mut q = TimerQueue::new();
        q.set_now(500.0);
        q.schedule(TimerKind::SettleDone, 250);
        assert_eq!(q.pending()[0].due_ms, 750.0);
    }
}

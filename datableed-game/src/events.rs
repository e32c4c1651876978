//! Typed trust notifications and the subscription list that delivers them.
//!
//! Any number of collaborators (trust display, analytics logger, audio
//! selector) subscribe independently; the trust state never needs to know
//! who is listening. Observers only ever see `&TrustEvent`, so they cannot
//! write back into the state that emitted it.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::trust::TrustStatus;

/// Named boundary crossed by a downward score move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdCrossing {
    Warning,
    Critical,
    Failure,
}

impl ThresholdCrossing {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Critical => "critical",
            Self::Failure => "failure",
        }
    }
}

impl fmt::Display for ThresholdCrossing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Notification emitted by [`crate::TrustState`] after a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TrustEvent {
    /// Fired after every mutation, including resets.
    ScoreUpdated { score: i32, status: TrustStatus },
    /// Fired at most once per mutation, before the matching `ScoreUpdated`.
    ThresholdCrossed {
        crossing: ThresholdCrossing,
        score: i32,
    },
}

/// Receiver of trust notifications.
pub trait TrustObserver {
    fn notify(&mut self, event: &TrustEvent);
}

impl<F> TrustObserver for F
where
    F: FnMut(&TrustEvent),
{
    fn notify(&mut self, event: &TrustEvent) {
        self(event);
    }
}

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type ObserverSlot = (SubscriptionId, Box<dyn TrustObserver>);

/// Ordered subscription list. Delivery follows subscription order.
#[derive(Default)]
pub struct Observers {
    slots: SmallVec<[ObserverSlot; 4]>,
    next_id: u64,
}

impl Observers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: impl TrustObserver + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.slots.push((id, Box::new(observer)));
        id
    }

    /// Remove a subscriber. Returns `false` when the id was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.slots.len();
        self.slots.retain(|(slot_id, _)| *slot_id != id);
        self.slots.len() != before
    }

    pub fn emit(&mut self, event: &TrustEvent) {
        for (_, observer) in &mut self.slots {
            observer.notify(event);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("subscribers", &self.slots.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

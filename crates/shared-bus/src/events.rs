//! # Platform Events
//!
//! Defines the invalidation signals that flow through the shared bus. Events
//! carry at most the key of the entity that changed - they are wake-up calls,
//! not deltas. Subscribers that need the new state re-read it.

use serde::{Deserialize, Serialize};
use shared_types::UserId;

/// All events that can be published to the bus.
///
/// One variant per collection whose mutation observers might care about.
/// `None` keys mean "something in this collection changed, re-pull all of it".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlatformEvent {
    /// A user's wallet or profile changed. Published by the ledger engine
    /// after every successful credit or debit.
    UsersChanged { user_id: Option<UserId> },

    /// A deposit request was created or transitioned.
    DepositsChanged { request_id: Option<u64> },

    /// A redemption transaction was created or transitioned.
    RedemptionsChanged { code: Option<String> },

    /// The product catalog changed.
    ProductsChanged,

    /// The drop point roster changed.
    DropPointsChanged,

    /// A leaderboard category override changed. Ranks themselves are derived
    /// and follow `UsersChanged`.
    LeaderboardChanged,
}

impl PlatformEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::UsersChanged { .. } => EventTopic::Users,
            Self::DepositsChanged { .. } => EventTopic::Deposits,
            Self::RedemptionsChanged { .. } => EventTopic::Redemptions,
            Self::ProductsChanged => EventTopic::Products,
            Self::DropPointsChanged => EventTopic::DropPoints,
            Self::LeaderboardChanged => EventTopic::Leaderboard,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    Users,
    Deposits,
    Redemptions,
    Products,
    DropPoints,
    Leaderboard,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self { topics }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &PlatformEvent) -> bool {
        self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic())
    }
}

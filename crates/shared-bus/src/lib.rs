//! # Shared Bus - Change Notifier
//!
//! Fans out "something changed" signals to connected observers after any
//! successful mutation. This is coarse invalidation: an event names the
//! collection (and at most the entity key) that changed, and subscribers are
//! expected to re-pull the data they care about. There is no delivery
//! guarantee, no backpressure onto publishers and no persistence of missed
//! events - a disconnected subscriber simply resynchronizes with a full read
//! when it comes back.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │   Workflow   │                    │  Dashboard   │
//! │              │    publish()       │  connection  │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │ ─────────┘
//!                  │              │  subscribe() → re-pull
//!                  └──────────────┘
//! ```

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{EventFilter, EventTopic, PlatformEvent};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, EventSubscriber, Subscription, SubscriptionError};

/// Maximum events buffered per subscriber before laggards start dropping.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

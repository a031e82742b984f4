//! # jb-leaderboard
//!
//! Pure derivation of ranked standings from the current user set. No rank is
//! ever persisted; the projection is recomputed on every observation. The
//! only persisted leaderboard state is the operator-set category override,
//! which is preserved across recomputation.

use shared_types::{CategoryOverride, LeaderboardEntry, User, UserId};
use std::collections::HashMap;

/// Category thresholds, highest first.
pub const CATEGORY_THRESHOLDS: [(u64, &str); 4] = [
    (500, "Eco Warrior"),
    (200, "Green Champion"),
    (100, "Earth Saver"),
    (50, "Nature Hero"),
];

/// Category below every threshold.
pub const DEFAULT_CATEGORY: &str = "Planet Protector";

/// Default category for a point balance.
#[must_use]
pub fn default_category(points: u64) -> &'static str {
    for (threshold, category) in CATEGORY_THRESHOLDS {
        if points >= threshold {
            return category;
        }
    }
    DEFAULT_CATEGORY
}

/// Project ranked standings from the current user set.
///
/// Descending by balance; ties keep the input order (the sort is stable),
/// so the ranking is fully deterministic for a given snapshot. Explicit
/// category overrides win over the threshold default.
#[must_use]
pub fn project(users: &[User], overrides: &[CategoryOverride]) -> Vec<LeaderboardEntry> {
    let by_user: HashMap<UserId, &str> = overrides
        .iter()
        .map(|o| (o.user_id, o.category.as_str()))
        .collect();

    let mut ranked: Vec<&User> = users.iter().collect();
    ranked.sort_by(|a, b| b.points.cmp(&a.points));

    ranked
        .iter()
        .enumerate()
        .map(|(index, user)| LeaderboardEntry {
            rank: index as u32 + 1,
            user_id: user.id,
            user_name: user.name.clone(),
            monthly_points: user.points,
            category: by_user
                .get(&user.id)
                .map_or_else(|| default_category(user.points).to_string(), |c| (*c).to_string()),
        })
        .collect()
}

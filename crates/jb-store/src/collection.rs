//! Named entity collections the store knows about.

/// Every collection the platform persists, each mapping to one JSON file in
/// the data directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Products,
    DropPoints,
    DepositRequests,
    Transactions,
    Leaderboard,
}

impl Collection {
    /// All collections, in load order.
    pub const ALL: [Collection; 6] = [
        Collection::Users,
        Collection::Products,
        Collection::DropPoints,
        Collection::DepositRequests,
        Collection::Transactions,
        Collection::Leaderboard,
    ];

    /// File name backing this collection.
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Users => "users.json",
            Self::Products => "products.json",
            Self::DropPoints => "drop_points.json",
            Self::DepositRequests => "deposit_requests.json",
            Self::Transactions => "transactions.json",
            Self::Leaderboard => "leaderboard.json",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_name().trim_end_matches(".json"))
    }
}

use chrono::Duration;

/// Limits applied when creating bots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotPolicy {
    /// Maximum number of bots across all users
    pub max_bots: usize,
    /// Maximum number of private bots a single user may own
    pub max_private_bots_per_user: usize,
    /// Points deducted per created bot
    pub creation_cost: u64,
    /// Time between creation and the verification deadline
    pub verification_window: Duration,
}

impl Default for BotPolicy {
    fn default() -> Self {
        Self {
            max_bots: 20,
            max_private_bots_per_user: 5,
            creation_cost: 250,
            verification_window: Duration::hours(24),
        }
    }
}

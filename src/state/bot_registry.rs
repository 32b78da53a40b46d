use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_USER_ID: &str = "guest";

/// Ordered list of all bots, persisted as a JSON array
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BotRegistry {
    bots: Vec<BotRecord>,
}

impl BotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a bot-list document, defaulting fields older documents lack
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        let raw: Vec<StoredBotRecord> = serde_json::from_str(content)?;
        Ok(Self {
            bots: raw.into_iter().map(BotRecord::from).collect(),
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// All bots in creation order
    pub fn all(&self) -> &[BotRecord] {
        &self.bots
    }

    pub fn count(&self) -> usize {
        self.bots.len()
    }

    /// Private bots owned by `user_id`
    pub fn private_count_for(&self, user_id: &str) -> usize {
        self.bots
            .iter()
            .filter(|b| b.is_private && b.user_id == user_id)
            .count()
    }

    #[cfg(test)]
    pub fn find(&self, id: &str) -> Option<&BotRecord> {
        self.bots.iter().find(|b| b.id == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut BotRecord> {
        self.bots.iter_mut().find(|b| b.id == id)
    }

    pub fn push(&mut self, bot: BotRecord) {
        self.bots.push(bot);
    }

    /// Remove the most recently appended bot
    pub fn pop(&mut self) -> Option<BotRecord> {
        self.bots.pop()
    }
}

/// A single tracked bot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotRecord {
    pub id: String,
    pub username: String,
    pub status: BotStatus,
    pub created_at: DateTime<Utc>,

    /// Informational only; nothing in the service enforces it
    pub verification_deadline: DateTime<Utc>,

    pub is_private: bool,
    pub user_id: String,
}

impl BotRecord {
    /// Create a new private bot awaiting verification
    pub fn new(username: String, user_id: String, verification_window: Duration) -> Self {
        let created_at = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            username,
            status: BotStatus::WaitingForVerification,
            created_at,
            verification_deadline: created_at + verification_window,
            is_private: true,
            user_id,
        }
    }

    pub fn is_verified(&self) -> bool {
        self.status == BotStatus::Verified
    }
}

/// Verification status of a bot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BotStatus {
    #[default]
    WaitingForVerification,
    Verified,
}

/// On-disk shape with optional fields filled in on load
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredBotRecord {
    id: String,
    username: String,
    #[serde(default)]
    status: BotStatus,
    created_at: DateTime<Utc>,
    verification_deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    is_private: bool,
    user_id: Option<String>,
}

impl From<StoredBotRecord> for BotRecord {
    fn from(stored: StoredBotRecord) -> Self {
        Self {
            verification_deadline: stored
                .verification_deadline
                .unwrap_or(stored.created_at + Duration::hours(24)),
            user_id: stored
                .user_id
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| DEFAULT_USER_ID.to_string()),
            id: stored.id,
            username: stored.username,
            status: stored.status,
            created_at: stored.created_at,
            is_private: stored.is_private,
        }
    }
}

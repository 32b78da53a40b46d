use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::config::BotPolicy;
use crate::error::{AppError, Result, ValidationError};
use crate::state::{BotRecord, BotStatus, SharedStateStore, StateStore, UserInfo, DEFAULT_USER_ID};

pub const BOT_CREATED_MESSAGE: &str = "Bot created successfully";
pub const BOT_VERIFIED_MESSAGE: &str = "Bot verified successfully";

/// Input for creating a bot
#[derive(Debug, Clone, Default)]
pub struct CreateBotRequest {
    pub username: Option<String>,
    pub is_private: bool,
    pub user_id: Option<String>,
}

/// Outcome of a verify call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    Verified,
    AlreadyVerified,
}

/// Owner of the requested bot: the trimmed `userId`, or the default user
fn resolve_user_id(request: &CreateBotRequest) -> &str {
    request
        .user_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .unwrap_or(DEFAULT_USER_ID)
}

/// Run the creation checks and return the trimmed username and owner.
///
/// Order matters: the first failing rule is reported.
fn validate_create(
    state: &StateStore,
    policy: &BotPolicy,
    request: &CreateBotRequest,
) -> std::result::Result<(String, String), ValidationError> {
    if !request.is_private {
        return Err(ValidationError::PrivateFlagRequired);
    }

    let username = request
        .username
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or(ValidationError::UsernameRequired)?;

    let bot_count = state.bots().count();
    if bot_count >= policy.max_bots {
        return Err(ValidationError::BotLimitReached);
    }

    let user_id = resolve_user_id(request);
    if state.bots().private_count_for(user_id) >= policy.max_private_bots_per_user {
        return Err(ValidationError::PrivateBotLimitReached);
    }

    if state.user_info().points < policy.creation_cost {
        return Err(ValidationError::InsufficientPoints);
    }

    Ok((username.to_string(), user_id.to_string()))
}

/// Validate, charge the user and persist a new bot.
///
/// Either both documents reflect the new bot or the in-memory state is
/// restored to what it was before the call.
pub async fn create_bot(
    state: &mut StateStore,
    policy: &BotPolicy,
    request: CreateBotRequest,
) -> Result<BotRecord> {
    let (username, user_id) = validate_create(state, policy, &request).map_err(|e| {
        warn!(
            "Rejected bot creation for user '{}' ({} bots, {} points): {}",
            resolve_user_id(&request),
            state.bots().count(),
            state.user_info().points,
            e
        );
        e
    })?;

    let previous_points = state.user_info().points;
    state.user_info_mut().points = previous_points - policy.creation_cost;

    if let Err(e) = state.save_user_info().await {
        state.user_info_mut().points = previous_points;
        error!(
            "Failed to save points after deducting {} from {}: {}",
            policy.creation_cost, previous_points, e
        );
        return Err(AppError::persistence("points save failed", e));
    }

    let bot = BotRecord::new(username, user_id, policy.verification_window);
    state.bots_mut().push(bot.clone());

    if let Err(e) = state.save_bots().await {
        state.bots_mut().pop();
        state.user_info_mut().points = previous_points;
        error!(
            "Failed to save bot list with new bot '{}', rolled back to {} bots: {}",
            bot.id,
            state.bots().count(),
            e
        );

        let rollback_error = match state.save_user_info().await {
            Ok(()) => None,
            Err(rollback) => {
                error!(
                    "Failed to restore points to {} on disk after bot save failure: {}",
                    previous_points, rollback
                );
                Some(Box::new(rollback))
            }
        };

        return Err(AppError::Persistence {
            message: "bot save failed".to_string(),
            source: Box::new(e),
            rollback_error,
        });
    }

    info!(
        "Created bot '{}' ({}) for user '{}', {} points left",
        bot.username,
        bot.id,
        bot.user_id,
        state.user_info().points
    );
    Ok(bot)
}

/// Mark a bot as verified and persist the list
pub async fn verify_bot(state: &mut StateStore, id: &str) -> Result<VerifyOutcome> {
    let Some(bot) = state.bots_mut().find_mut(id) else {
        warn!("Verification requested for unknown bot '{}'", id);
        return Err(AppError::NotFound { id: id.to_string() });
    };

    if bot.is_verified() {
        debug!("Bot '{}' is already verified", id);
        return Ok(VerifyOutcome::AlreadyVerified);
    }
    bot.status = BotStatus::Verified;

    if let Err(e) = state.save_bots().await {
        if let Some(bot) = state.bots_mut().find_mut(id) {
            bot.status = BotStatus::WaitingForVerification;
        }
        error!("Failed to save bot list after verifying '{}': {}", id, e);
        return Err(AppError::persistence("bot save failed", e));
    }

    info!("Bot '{}' verified", id);
    Ok(VerifyOutcome::Verified)
}

/// Entry point used by the HTTP layer
pub struct BotManager {
    state: SharedStateStore,
    policy: BotPolicy,
}

impl BotManager {
    pub fn new(state: SharedStateStore, policy: BotPolicy) -> Self {
        Self { state, policy }
    }

    pub async fn get_user_info(&self) -> UserInfo {
        self.state.read().await.user_info().clone()
    }

    pub async fn get_bots(&self) -> Vec<BotRecord> {
        self.state.read().await.bots().all().to_vec()
    }

    /// Holds the write lock for the whole workflow, so creations never interleave
    pub async fn create_bot(&self, request: CreateBotRequest) -> Result<BotRecord> {
        let mut state = self.state.write().await;
        create_bot(&mut state, &self.policy, request).await
    }

    pub async fn verify_bot(&self, id: &str) -> Result<VerifyOutcome> {
        let mut state = self.state.write().await;
        verify_bot(&mut state, id).await
    }
}

/// Shared bot manager type
pub type SharedBotManager = Arc<BotManager>;

pub fn create_shared_bot_manager(state: SharedStateStore, policy: BotPolicy) -> SharedBotManager {
    Arc::new(BotManager::new(state, policy))
}

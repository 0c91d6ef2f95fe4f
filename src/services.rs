//! Interfaces to external collaborators: identity/auth and game statistics.
//!
//! The core only consumes these; implementations live outside this crate.
//! Nothing here performs I/O.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

/// User record as the identity provider returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterData {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Opaque bearer credential plus the authenticated user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub token: String,
    pub user: UserRecord,
}

/// Identity/auth provider contract.
pub trait IdentityProvider {
    fn login(&self, email: &str, password: &str) -> Result<AuthSession, ServiceError>;
    fn register(&self, data: &RegisterData) -> Result<AuthSession, ServiceError>;
    fn logout(&self, token: &str) -> Result<(), ServiceError>;
}

/// Game outcome from the reporting player's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordedOutcome {
    Win,
    Loss,
    Draw,
}

/// One finished game, as the stats recorder accepts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub search_depth: u32,
    pub outcome: RecordedOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub move_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u64>,
}

/// Stats recorder contract: a fire-and-forget write.
pub trait GameReporter {
    fn record_game(&self, record: &GameRecord);
}

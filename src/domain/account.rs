//! Account domain types
//!
//! One account per identity-provider subject. The role is a closed variant;
//! partner accounts own exactly one partner profile record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Account role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    Client,
    Partner,
    Admin,
}

impl AccountRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Partner => "partner",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AccountRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Self::Client),
            "partner" => Ok(Self::Partner),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown account role '{other}'")),
        }
    }
}

/// Account lifecycle. Accounts are never hard-deleted; deactivation leaves a
/// tombstone timestamp on the row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AccountLifecycle {
    Active,
    Deactivated,
}

impl AccountLifecycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Deactivated => "deactivated",
        }
    }
}

/// Account entity (row in the `accounts` table)
#[derive(Debug, Clone, FromRow)]
pub struct AccountRow {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub display_name: Option<String>,
    pub capabilities: sqlx::types::Json<Vec<String>>,
    pub lifecycle: String,
    pub deactivated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AccountRow {
    pub fn role(&self) -> Option<AccountRole> {
        self.role.parse().ok()
    }
}

/// Request DTO for account registration
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterAccountRequest {
    pub role: AccountRole,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Response DTO for an account
#[derive(Debug, Clone, Serialize)]
pub struct AccountResponse {
    pub id: Uuid,
    pub email: String,
    pub role: AccountRole,
    pub display_name: Option<String>,
    pub lifecycle: AccountLifecycle,
    pub created_at: DateTime<Utc>,
}

impl AccountResponse {
    pub fn from_row(row: &AccountRow) -> Option<Self> {
        let role = row.role()?;
        let lifecycle = if row.lifecycle == AccountLifecycle::Deactivated.as_str() {
            AccountLifecycle::Deactivated
        } else {
            AccountLifecycle::Active
        };

        Some(Self {
            id: row.id,
            email: row.email.clone(),
            role,
            display_name: row.display_name.clone(),
            lifecycle,
            created_at: row.created_at,
        })
    }
}

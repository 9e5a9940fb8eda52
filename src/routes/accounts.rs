//! Account registration and lifecycle routes

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

use crate::api::{DataResponse, MessageResponse};
use crate::app::AppState;
use crate::auth::RequireAuth;
use crate::domain::account::{AccountRole, AccountRow, RegisterAccountRequest, AccountResponse};
use crate::domain::partner::PartnerProfile;
use crate::error::ApiError;
use crate::services::partners;

/// POST /accounts/register
///
/// Create the account record for a verified identity. Partner accounts also
/// get their step-1 onboarding profile.
pub async fn register_account(
    State(state): State<Arc<AppState>>,
    auth: RequireAuth,
    Json(input): Json<RegisterAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = auth
        .email
        .clone()
        .ok_or_else(|| ApiError::validation("Token does not carry an email address"))?;

    if !auth.email_verified {
        return Err(ApiError::forbidden("Email address is not verified"));
    }

    let existing: Option<i64> = sqlx::query_scalar("SELECT 1 FROM accounts WHERE id = $1")
        .bind(auth.account_id)
        .fetch_optional(&state.db)
        .await?;

    if existing.is_some() {
        return Err(ApiError::Conflict("Account is already registered".to_string()));
    }

    sqlx::query(
        r#"
        INSERT INTO accounts (id, email, role, display_name)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(auth.account_id)
    .bind(&email)
    .bind(input.role.as_str())
    .bind(&input.display_name)
    .execute(&state.db)
    .await?;

    if input.role == AccountRole::Partner {
        let profile = PartnerProfile::new(auth.account_id);
        partners::create_profile(&state.db, &profile).await?;
    }

    tracing::info!(
        account_id = %auth.account_id,
        role = %input.role,
        "Account registered"
    );

    let row = fetch_account(&state, auth.account_id).await?;
    let response = AccountResponse::from_row(&row)
        .ok_or_else(|| ApiError::internal("Stored account has an unknown role"))?;

    Ok((StatusCode::CREATED, Json(DataResponse::new(response))))
}

/// POST /accounts/deactivate
///
/// Soft-delete the caller's account. Never hard-deletes; the partner profile
/// (if any) gets its tombstone as well.
pub async fn deactivate_account(
    State(state): State<Arc<AppState>>,
    auth: RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let updated = sqlx::query(
        r#"
        UPDATE accounts SET
            lifecycle = 'deactivated',
            deactivated_at = NOW(),
            updated_at = NOW()
        WHERE id = $1 AND lifecycle = 'active'
        "#,
    )
    .bind(auth.account_id)
    .execute(&state.db)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(ApiError::not_found("Account not found or already deactivated"));
    }

    partners::soft_delete_profile(&state.db, auth.account_id).await?;

    tracing::info!(account_id = %auth.account_id, "Account deactivated");

    Ok(Json(MessageResponse::new("Account deactivated")))
}

pub(crate) async fn fetch_account(
    state: &AppState,
    account_id: uuid::Uuid,
) -> Result<AccountRow, ApiError> {
    sqlx::query_as::<_, AccountRow>(
        r#"
        SELECT id, email, role, display_name, capabilities, lifecycle,
               deactivated_at, created_at, updated_at
        FROM accounts
        WHERE id = $1
        "#,
    )
    .bind(account_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| ApiError::not_found("Account not found"))
}

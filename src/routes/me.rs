//! Current-account route

use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::api::DataResponse;
use crate::app::AppState;
use crate::auth::RequireAuth;
use crate::domain::account::{AccountResponse, AccountRole};
use crate::domain::partner::OnboardingSnapshot;
use crate::error::ApiError;
use crate::routes::accounts::fetch_account;
use crate::services::partners;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub account: AccountResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub onboarding: Option<OnboardingSnapshot>,
}

/// GET /me
///
/// Current account, with the onboarding snapshot for partner accounts.
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    auth: RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let row = fetch_account(&state, auth.account_id).await?;
    let account = AccountResponse::from_row(&row)
        .ok_or_else(|| ApiError::internal("Stored account has an unknown role"))?;

    let onboarding = if account.role == AccountRole::Partner {
        partners::load_profile(&state.db, auth.account_id)
            .await?
            .map(|p| p.onboarding_snapshot())
    } else {
        None
    };

    Ok(Json(DataResponse::new(MeResponse { account, onboarding })))
}

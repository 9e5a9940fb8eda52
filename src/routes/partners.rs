//! Partner onboarding routes
//!
//! Every mutation loads the caller's profile aggregate, applies the domain
//! operation (which validates, advances the step, and recomputes status), and
//! writes the aggregate back. A caller with no partner profile gets a 404 up
//! front.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::DataResponse;
use crate::app::AppState;
use crate::auth::RequireAuth;
use crate::domain::onboarding::{NewDocument, NewPortfolioItem, NewService, ServiceUpdate};
use crate::domain::partner::{BasicInfo, OnboardingStatus, PartnerLocation, PartnerProfile};
use crate::error::ApiError;
use crate::services::{notifications, partners};

#[derive(Debug, Deserialize)]
pub struct SpecializationsRequest {
    pub specializations: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct LocationsRequest {
    pub locations: Vec<PartnerLocation>,
}

#[derive(Debug, Deserialize)]
pub struct PortfolioRequest {
    pub items: Vec<NewPortfolioItem>,
}

#[derive(Debug, Deserialize)]
pub struct DocumentsRequest {
    pub documents: Vec<NewDocument>,
}

async fn load_own_profile(state: &AppState, account_id: Uuid) -> Result<PartnerProfile, ApiError> {
    partners::load_profile(&state.db, account_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Partner profile not found"))
}

/// GET /partners/me/onboarding
///
/// Read-only snapshot: {step, progress, status, profile}.
pub async fn get_onboarding_status(
    State(state): State<Arc<AppState>>,
    auth: RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let profile = load_own_profile(&state, auth.account_id).await?;
    Ok(Json(DataResponse::new(profile.onboarding_snapshot())))
}

/// PUT /partners/me/basic-info
pub async fn submit_basic_info(
    State(state): State<Arc<AppState>>,
    auth: RequireAuth,
    Json(input): Json<BasicInfo>,
) -> Result<impl IntoResponse, ApiError> {
    let mut profile = load_own_profile(&state, auth.account_id).await?;
    profile.submit_basic_info(input)?;
    partners::save_profile(&state.db, &profile).await?;

    Ok(Json(DataResponse::new(profile.onboarding_snapshot())))
}

/// PUT /partners/me/specializations
pub async fn submit_specializations(
    State(state): State<Arc<AppState>>,
    auth: RequireAuth,
    Json(input): Json<SpecializationsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut profile = load_own_profile(&state, auth.account_id).await?;
    profile.submit_specializations(input.specializations)?;
    partners::save_profile(&state.db, &profile).await?;

    Ok(Json(DataResponse::new(profile.onboarding_snapshot())))
}

/// POST /partners/me/services
pub async fn add_service(
    State(state): State<Arc<AppState>>,
    auth: RequireAuth,
    Json(input): Json<NewService>,
) -> Result<impl IntoResponse, ApiError> {
    let mut profile = load_own_profile(&state, auth.account_id).await?;
    let service_id = profile.add_service(input)?;
    partners::save_profile(&state.db, &profile).await?;

    Ok(Json(serde_json::json!({
        "id": service_id,
        "progress": profile.onboarding_progress(),
    })))
}

/// PUT /partners/me/services/:service_id
pub async fn update_service(
    State(state): State<Arc<AppState>>,
    Path(service_id): Path<Uuid>,
    auth: RequireAuth,
    Json(input): Json<ServiceUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let mut profile = load_own_profile(&state, auth.account_id).await?;
    profile.update_service(service_id, input)?;
    partners::save_profile(&state.db, &profile).await?;

    Ok(Json(DataResponse::new(profile.onboarding_snapshot())))
}

/// DELETE /partners/me/services/:service_id
pub async fn remove_service(
    State(state): State<Arc<AppState>>,
    Path(service_id): Path<Uuid>,
    auth: RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let mut profile = load_own_profile(&state, auth.account_id).await?;
    profile.remove_service(service_id)?;
    partners::save_profile(&state.db, &profile).await?;

    Ok(Json(DataResponse::new(profile.onboarding_snapshot())))
}

/// PUT /partners/me/locations
pub async fn submit_locations(
    State(state): State<Arc<AppState>>,
    auth: RequireAuth,
    Json(input): Json<LocationsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut profile = load_own_profile(&state, auth.account_id).await?;
    profile.submit_locations(input.locations)?;
    partners::save_profile(&state.db, &profile).await?;

    Ok(Json(DataResponse::new(profile.onboarding_snapshot())))
}

/// POST /partners/me/portfolio
pub async fn add_portfolio_items(
    State(state): State<Arc<AppState>>,
    auth: RequireAuth,
    Json(input): Json<PortfolioRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut profile = load_own_profile(&state, auth.account_id).await?;
    let ids = profile.add_portfolio_items(input.items, Utc::now())?;
    partners::save_profile(&state.db, &profile).await?;

    Ok(Json(serde_json::json!({ "ids": ids })))
}

/// DELETE /partners/me/portfolio/:item_id
pub async fn remove_portfolio_item(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<Uuid>,
    auth: RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let mut profile = load_own_profile(&state, auth.account_id).await?;
    profile.remove_portfolio_item(item_id)?;
    partners::save_profile(&state.db, &profile).await?;

    Ok(Json(DataResponse::new(profile.onboarding_snapshot())))
}

/// POST /partners/me/documents
pub async fn submit_documents(
    State(state): State<Arc<AppState>>,
    auth: RequireAuth,
    Json(input): Json<DocumentsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut profile = load_own_profile(&state, auth.account_id).await?;
    let was_pending = profile.onboarding_status == OnboardingStatus::PendingVerification;
    let ids = profile.submit_documents(input.documents, Utc::now())?;
    partners::save_profile(&state.db, &profile).await?;

    if !was_pending && profile.onboarding_status == OnboardingStatus::PendingVerification {
        notifications::notify_verification_requested(&state.registry, &profile);
    }

    tracing::info!(
        account_id = %auth.account_id,
        count = ids.len(),
        status = %profile.onboarding_status,
        "Documents submitted"
    );

    Ok(Json(serde_json::json!({
        "ids": ids,
        "status": profile.onboarding_status,
    })))
}

/// POST /partners/me/complete
///
/// Explicit completion; requires full progress and submitted documents.
pub async fn complete_onboarding(
    State(state): State<Arc<AppState>>,
    auth: RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let mut profile = load_own_profile(&state, auth.account_id).await?;
    let was_pending = profile.onboarding_status == OnboardingStatus::PendingVerification;
    profile.complete_onboarding()?;
    partners::save_profile(&state.db, &profile).await?;

    if !was_pending && profile.onboarding_status == OnboardingStatus::PendingVerification {
        notifications::notify_verification_requested(&state.registry, &profile);
    }

    tracing::info!(
        account_id = %auth.account_id,
        status = %profile.onboarding_status,
        "Onboarding completed"
    );

    Ok(Json(DataResponse::new(profile.onboarding_snapshot())))
}

//! Admin routes
//!
//! Protected endpoints for the verification review workflow:
//! - pending-verification listing and detail
//! - document approve/reject
//! - partner verify/reject, single and bulk
//! - audit log and dashboard stats
//!
//! All routes require an admin account; review mutations additionally require
//! the `manage_partners` capability.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path, Query, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::{DataResponse, Paginated, PaginationParams};
use crate::app::AppState;
use crate::auth::{RequireAuth, VerifiedIdentity};
use crate::domain::admin::*;
use crate::domain::partner::PartnerProfile;
use crate::domain::review::{BulkItemResult, BulkOutcome, BulkVerificationAction};
use crate::error::{ApiError, ErrorResponse};
use crate::services::partners::{self, PartnerProfileRow};
use crate::services::notifications;

/// Capability required for review mutations
pub const MANAGE_PARTNERS: &str = "manage_partners";

// ============================================================================
// RequireAdmin extractor
// ============================================================================

/// Extractor that requires an admin-role account.
#[derive(Debug, Clone)]
pub struct RequireAdmin {
    pub identity: VerifiedIdentity,
    capabilities: Vec<String>,
}

impl RequireAdmin {
    pub fn admin_id(&self) -> Uuid {
        self.identity.account_id
    }

    /// Check a capability flag on the admin account
    pub fn require_capability(&self, capability: &str) -> Result<(), ApiError> {
        if self.capabilities.iter().any(|c| c == capability) {
            Ok(())
        } else {
            Err(ApiError::forbidden(format!(
                "Missing required capability: {capability}"
            )))
        }
    }
}

#[derive(Debug)]
pub enum AdminAuthError {
    NotAuthenticated,
    NotAdmin,
    DatabaseError,
}

impl IntoResponse for AdminAuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AdminAuthError::NotAuthenticated => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required",
            ),
            AdminAuthError::NotAdmin => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "Admin privileges required",
            ),
            AdminAuthError::DatabaseError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Internal server error",
            ),
        };

        let body = ErrorResponse {
            code: code.to_string(),
            message: message.to_string(),
            request_id: None,
        };

        (status, Json(body)).into_response()
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for RequireAdmin {
    type Rejection = AdminAuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let auth = RequireAuth::from_request_parts(parts, state)
            .await
            .map_err(|_| AdminAuthError::NotAuthenticated)?;

        let row: Option<(String, sqlx::types::Json<Vec<String>>)> = sqlx::query_as(
            "SELECT role, capabilities FROM accounts WHERE id = $1 AND lifecycle = 'active'",
        )
        .bind(auth.account_id)
        .fetch_optional(&state.db)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to load account for admin check");
            AdminAuthError::DatabaseError
        })?;

        match row {
            Some((role, capabilities)) if role == "admin" => Ok(RequireAdmin {
                identity: auth.0,
                capabilities: capabilities.0,
            }),
            _ => {
                tracing::warn!(account_id = %auth.account_id, "Non-admin attempted admin route");
                Err(AdminAuthError::NotAdmin)
            }
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Record an admin action in the audit log
async fn log_admin_action(
    db: &sqlx::PgPool,
    admin_id: Uuid,
    action: AdminAction,
    target_type: AuditTargetType,
    target_id: Option<Uuid>,
    details: serde_json::Value,
) -> Result<(), sqlx::Error> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO admin_audit_log (id, admin_id, action, target_type, target_id, details)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(id)
    .bind(admin_id)
    .bind(action.as_str())
    .bind(target_type.as_str())
    .bind(target_id)
    .bind(&details)
    .execute(db)
    .await?;

    tracing::info!(
        admin_id = %admin_id,
        action = %action,
        target_type = %target_type,
        target_id = ?target_id,
        "Admin action logged"
    );

    Ok(())
}

#[derive(Debug, sqlx::FromRow)]
struct PartnerContactRow {
    email: String,
    display_name: Option<String>,
}

async fn load_partner_contact(
    db: &sqlx::PgPool,
    partner_id: Uuid,
) -> Result<PartnerContactRow, ApiError> {
    sqlx::query_as::<_, PartnerContactRow>(
        "SELECT email, display_name FROM accounts WHERE id = $1 AND role = 'partner'",
    )
    .bind(partner_id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| ApiError::not_found("Partner not found"))
}

async fn load_partner_profile(
    db: &sqlx::PgPool,
    partner_id: Uuid,
) -> Result<PartnerProfile, ApiError> {
    partners::load_profile(db, partner_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Partner profile not found"))
}

fn partner_display_name(profile: &PartnerProfile, contact: &PartnerContactRow) -> String {
    profile
        .basic_info
        .as_ref()
        .map(|b| b.company_name.clone())
        .or_else(|| contact.display_name.clone())
        .unwrap_or_else(|| contact.email.clone())
}

// ============================================================================
// Pending verifications
// ============================================================================

// Pagination fields stay top-level in the admin query structs: flattening a
// numeric struct into an axum Query breaks serde_urlencoded's number parsing.
#[derive(Debug, Deserialize, Default)]
pub struct VerificationListParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl VerificationListParams {
    fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PendingRow {
    #[sqlx(flatten)]
    profile: PartnerProfileRow,
    email: String,
    submitted_at: DateTime<Utc>,
}

/// GET /admin/verifications
///
/// Partners currently awaiting verification.
pub async fn list_pending_verifications(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VerificationListParams>,
    _admin: RequireAdmin,
) -> Result<impl IntoResponse, ApiError> {
    let pagination = query.pagination();

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM partner_profiles
        WHERE onboarding_status = 'pending_verification' AND deleted_at IS NULL
        "#,
    )
    .fetch_one(&state.db)
    .await?;

    let rows = sqlx::query_as::<_, PendingRow>(
        r#"
        SELECT
            p.account_id, p.basic_info, p.specializations, p.onboarding_step,
            p.onboarding_status, p.services, p.locations, p.portfolio, p.documents,
            p.verified_at, p.verified_by, p.rejected_at, p.rejected_by,
            p.rejection_reason, p.review_notes,
            a.email,
            p.updated_at AS submitted_at
        FROM partner_profiles p
        JOIN accounts a ON a.id = p.account_id
        WHERE p.onboarding_status = 'pending_verification' AND p.deleted_at IS NULL
        ORDER BY p.updated_at ASC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(pagination.limit())
    .bind(pagination.offset())
    .fetch_all(&state.db)
    .await?;

    let data: Vec<PendingVerificationSummary> = rows
        .into_iter()
        .map(|row| {
            let email = row.email;
            let submitted_at = row.submitted_at;
            let profile = row.profile.into_profile();
            PendingVerificationSummary {
                partner_id: profile.account_id,
                email,
                company_name: profile.basic_info.as_ref().map(|b| b.company_name.clone()),
                onboarding_step: profile.onboarding_step,
                onboarding_progress: profile.onboarding_progress(),
                document_count: profile.documents.len(),
                pending_document_count: profile
                    .documents
                    .iter()
                    .filter(|d| d.status == crate::domain::partner::DocumentStatus::Pending)
                    .count(),
                submitted_at,
            }
        })
        .collect();

    Ok(Paginated::new(data, &pagination, total as u64))
}

/// GET /admin/verifications/:partner_id
///
/// Full profile for one verification request.
pub async fn get_verification(
    State(state): State<Arc<AppState>>,
    Path(partner_id): Path<Uuid>,
    _admin: RequireAdmin,
) -> Result<impl IntoResponse, ApiError> {
    let contact = load_partner_contact(&state.db, partner_id).await?;
    let profile = load_partner_profile(&state.db, partner_id).await?;

    Ok(Json(serde_json::json!({
        "email": contact.email,
        "display_name": contact.display_name,
        "snapshot": profile.onboarding_snapshot(),
    })))
}

// ============================================================================
// Document review
// ============================================================================

/// POST /admin/partners/:partner_id/documents/:document_id/approve
pub async fn approve_document(
    State(state): State<Arc<AppState>>,
    Path((partner_id, document_id)): Path<(Uuid, Uuid)>,
    admin: RequireAdmin,
    Json(input): Json<ApproveDocumentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    admin.require_capability(MANAGE_PARTNERS)?;

    let mut profile = load_partner_profile(&state.db, partner_id).await?;
    let outcome =
        profile.approve_document(document_id, admin.admin_id(), input.notes.as_deref(), Utc::now())?;
    let document_name = profile
        .documents
        .get(document_id)
        .map(|d| d.name.clone())
        .unwrap_or_default();
    partners::save_profile(&state.db, &profile).await?;

    let _ = log_admin_action(
        &state.db,
        admin.admin_id(),
        AdminAction::ApproveDocument,
        AuditTargetType::Document,
        Some(document_id),
        serde_json::json!({
            "partner_id": partner_id,
            "document_name": document_name,
            "all_documents_approved": outcome.all_documents_approved,
            "notes": input.notes,
        }),
    )
    .await;

    notifications::notify_document_reviewed(
        &state.db,
        &state.registry,
        partner_id,
        &document_name,
        true,
        None,
    )
    .await;

    Ok(Json(DataResponse::new(outcome)))
}

/// POST /admin/partners/:partner_id/documents/:document_id/reject
pub async fn reject_document(
    State(state): State<Arc<AppState>>,
    Path((partner_id, document_id)): Path<(Uuid, Uuid)>,
    admin: RequireAdmin,
    Json(input): Json<RejectDocumentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    admin.require_capability(MANAGE_PARTNERS)?;

    let mut profile = load_partner_profile(&state.db, partner_id).await?;
    let outcome = profile.reject_document(
        document_id,
        admin.admin_id(),
        &input.reason,
        input.notes.as_deref(),
        Utc::now(),
    )?;
    let document_name = profile
        .documents
        .get(document_id)
        .map(|d| d.name.clone())
        .unwrap_or_default();
    partners::save_profile(&state.db, &profile).await?;

    let _ = log_admin_action(
        &state.db,
        admin.admin_id(),
        AdminAction::RejectDocument,
        AuditTargetType::Document,
        Some(document_id),
        serde_json::json!({
            "partner_id": partner_id,
            "document_name": document_name,
            "reason": input.reason,
            "notes": input.notes,
        }),
    )
    .await;

    notifications::notify_document_reviewed(
        &state.db,
        &state.registry,
        partner_id,
        &document_name,
        false,
        Some(&input.reason),
    )
    .await;

    Ok(Json(DataResponse::new(outcome)))
}

// ============================================================================
// Partner verification
// ============================================================================

/// POST /admin/partners/:partner_id/verify
pub async fn verify_partner(
    State(state): State<Arc<AppState>>,
    Path(partner_id): Path<Uuid>,
    admin: RequireAdmin,
    Json(input): Json<VerifyPartnerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    admin.require_capability(MANAGE_PARTNERS)?;

    let contact = load_partner_contact(&state.db, partner_id).await?;
    let mut profile = load_partner_profile(&state.db, partner_id).await?;

    profile.verify_partner(admin.admin_id(), input.notes.as_deref(), Utc::now())?;
    partners::save_profile(&state.db, &profile).await?;

    let _ = log_admin_action(
        &state.db,
        admin.admin_id(),
        AdminAction::VerifyPartner,
        AuditTargetType::Partner,
        Some(partner_id),
        serde_json::json!({ "notes": input.notes }),
    )
    .await;

    let name = partner_display_name(&profile, &contact);
    notifications::notify_partner_verified(
        &state.db,
        &state.registry,
        &state.mailer,
        partner_id,
        Some(&contact.email),
        &name,
    )
    .await;

    Ok(Json(DataResponse::new(profile.onboarding_snapshot())))
}

/// POST /admin/partners/:partner_id/reject
pub async fn reject_partner(
    State(state): State<Arc<AppState>>,
    Path(partner_id): Path<Uuid>,
    admin: RequireAdmin,
    Json(input): Json<RejectPartnerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    admin.require_capability(MANAGE_PARTNERS)?;

    let contact = load_partner_contact(&state.db, partner_id).await?;
    let mut profile = load_partner_profile(&state.db, partner_id).await?;

    profile.reject_partner(
        admin.admin_id(),
        &input.reason,
        input.notes.as_deref(),
        Utc::now(),
    )?;
    partners::save_profile(&state.db, &profile).await?;

    let _ = log_admin_action(
        &state.db,
        admin.admin_id(),
        AdminAction::RejectPartner,
        AuditTargetType::Partner,
        Some(partner_id),
        serde_json::json!({ "reason": input.reason, "notes": input.notes }),
    )
    .await;

    let name = partner_display_name(&profile, &contact);
    notifications::notify_partner_rejected(
        &state.db,
        &state.registry,
        &state.mailer,
        partner_id,
        Some(&contact.email),
        &name,
        &input.reason,
    )
    .await;

    Ok(Json(DataResponse::new(profile.onboarding_snapshot())))
}

// ============================================================================
// Bulk actions
// ============================================================================

/// POST /admin/partners/bulk
///
/// Apply verify/reject to each partner id independently. One partner's
/// ineligibility or error never blocks the others; the response carries a
/// per-id outcome list.
pub async fn bulk_action(
    State(state): State<Arc<AppState>>,
    admin: RequireAdmin,
    Json(input): Json<BulkActionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    admin.require_capability(MANAGE_PARTNERS)?;

    if input.partner_ids.is_empty() {
        return Err(ApiError::validation("No partner ids provided"));
    }
    if input.action == BulkVerificationAction::Reject
        && input.reason.as_deref().map_or(true, |r| r.trim().is_empty())
    {
        return Err(ApiError::validation(
            "Rejection reason is required for bulk reject",
        ));
    }

    let now = Utc::now();
    let mut results = Vec::with_capacity(input.partner_ids.len());

    for partner_id in &input.partner_ids {
        let result = apply_bulk_item(&state, &admin, &input, *partner_id, now).await;
        results.push(result);
    }

    let action = match input.action {
        BulkVerificationAction::Verify => AdminAction::BulkVerifyPartners,
        BulkVerificationAction::Reject => AdminAction::BulkRejectPartners,
    };
    let _ = log_admin_action(
        &state.db,
        admin.admin_id(),
        action,
        AuditTargetType::Partner,
        None,
        serde_json::json!({
            "partner_ids": input.partner_ids,
            "reason": input.reason,
            "results": results
                .iter()
                .map(|r| serde_json::json!({ "partner_id": r.partner_id, "outcome": r.outcome }))
                .collect::<Vec<_>>(),
        }),
    )
    .await;

    Ok(Json(DataResponse::new(BulkActionResponse { results })))
}

async fn apply_bulk_item(
    state: &AppState,
    admin: &RequireAdmin,
    input: &BulkActionRequest,
    partner_id: Uuid,
    now: DateTime<Utc>,
) -> BulkItemResult {
    let contact = match load_partner_contact(&state.db, partner_id).await {
        Ok(contact) => contact,
        Err(ApiError::NotFound(_)) => {
            return BulkItemResult::error(partner_id, "Partner not found")
        }
        Err(e) => return BulkItemResult::error(partner_id, e.to_string()),
    };

    let mut profile = match load_partner_profile(&state.db, partner_id).await {
        Ok(profile) => profile,
        Err(ApiError::NotFound(_)) => {
            return BulkItemResult::error(partner_id, "Partner profile not found")
        }
        Err(e) => return BulkItemResult::error(partner_id, e.to_string()),
    };

    let result = profile.apply_bulk_action(
        input.action,
        admin.admin_id(),
        input.reason.as_deref(),
        input.notes.as_deref(),
        now,
    );

    if !matches!(result.outcome, BulkOutcome::Verified | BulkOutcome::Rejected) {
        return result;
    }

    if let Err(e) = partners::save_profile(&state.db, &profile).await {
        tracing::error!(error = %e, partner_id = %partner_id, "Failed to persist bulk outcome");
        return BulkItemResult::error(partner_id, "Failed to persist status change");
    }

    let name = partner_display_name(&profile, &contact);
    match result.outcome {
        BulkOutcome::Verified => {
            notifications::notify_partner_verified(
                &state.db,
                &state.registry,
                &state.mailer,
                partner_id,
                Some(&contact.email),
                &name,
            )
            .await;
        }
        BulkOutcome::Rejected => {
            notifications::notify_partner_rejected(
                &state.db,
                &state.registry,
                &state.mailer,
                partner_id,
                Some(&contact.email),
                &name,
                input.reason.as_deref().unwrap_or_default(),
            )
            .await;
        }
        _ => {}
    }

    result
}

// ============================================================================
// Dashboard stats
// ============================================================================

/// GET /admin/stats
pub async fn get_admin_stats(
    State(state): State<Arc<AppState>>,
    admin: RequireAdmin,
) -> Result<impl IntoResponse, ApiError> {
    let _ = log_admin_action(
        &state.db,
        admin.admin_id(),
        AdminAction::ViewSensitiveData,
        AuditTargetType::SystemSetting,
        None,
        serde_json::json!({ "viewed": "dashboard_stats" }),
    )
    .await;

    let total_accounts: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
        .fetch_one(&state.db)
        .await
        .unwrap_or(0);

    let client_accounts: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM accounts WHERE role = 'client'")
            .fetch_one(&state.db)
            .await
            .unwrap_or(0);

    let partner_accounts: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM accounts WHERE role = 'partner'")
            .fetch_one(&state.db)
            .await
            .unwrap_or(0);

    let pending_verifications: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM partner_profiles \
         WHERE onboarding_status = 'pending_verification' AND deleted_at IS NULL",
    )
    .fetch_one(&state.db)
    .await
    .unwrap_or(0);

    let verified_partners: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM partner_profiles \
         WHERE onboarding_status = 'verified' AND deleted_at IS NULL",
    )
    .fetch_one(&state.db)
    .await
    .unwrap_or(0);

    let rejected_partners: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM partner_profiles \
         WHERE onboarding_status = 'rejected' AND deleted_at IS NULL",
    )
    .fetch_one(&state.db)
    .await
    .unwrap_or(0);

    let recent_signups_7d: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM accounts WHERE created_at > NOW() - INTERVAL '7 days'",
    )
    .fetch_one(&state.db)
    .await
    .unwrap_or(0);

    let recent_verifications_7d: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM partner_profiles WHERE verified_at > NOW() - INTERVAL '7 days'",
    )
    .fetch_one(&state.db)
    .await
    .unwrap_or(0);

    let stats = AdminDashboardStats {
        total_accounts,
        client_accounts,
        partner_accounts,
        pending_verifications,
        verified_partners,
        rejected_partners,
        recent_signups_7d,
        recent_verifications_7d,
    };

    Ok(Json(DataResponse::new(stats)))
}

// ============================================================================
// Audit log
// ============================================================================

#[derive(Debug, Deserialize, Default)]
pub struct AuditLogQueryParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    #[serde(default)]
    pub admin_id: Option<Uuid>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub target_type: Option<String>,
    #[serde(default)]
    pub target_id: Option<Uuid>,
    #[serde(default)]
    pub from_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub to_date: Option<DateTime<Utc>>,
}

impl AuditLogQueryParams {
    fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AuditLogRow {
    id: Uuid,
    admin_id: Uuid,
    admin_name: Option<String>,
    action: String,
    target_type: String,
    target_id: Option<Uuid>,
    details: serde_json::Value,
    created_at: DateTime<Utc>,
}

/// GET /admin/audit-log
pub async fn list_audit_log(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AuditLogQueryParams>,
    _admin: RequireAdmin,
) -> Result<impl IntoResponse, ApiError> {
    let pagination = query.pagination();

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM admin_audit_log l
        WHERE ($1::uuid IS NULL OR l.admin_id = $1)
        AND ($2::text IS NULL OR l.action = $2)
        AND ($3::text IS NULL OR l.target_type = $3)
        AND ($4::uuid IS NULL OR l.target_id = $4)
        AND ($5::timestamptz IS NULL OR l.created_at >= $5)
        AND ($6::timestamptz IS NULL OR l.created_at <= $6)
        "#,
    )
    .bind(query.admin_id)
    .bind(&query.action)
    .bind(&query.target_type)
    .bind(query.target_id)
    .bind(query.from_date)
    .bind(query.to_date)
    .fetch_one(&state.db)
    .await?;

    let rows = sqlx::query_as::<_, AuditLogRow>(
        r#"
        SELECT
            l.id, l.admin_id, a.display_name AS admin_name,
            l.action, l.target_type, l.target_id, l.details, l.created_at
        FROM admin_audit_log l
        LEFT JOIN accounts a ON a.id = l.admin_id
        WHERE ($1::uuid IS NULL OR l.admin_id = $1)
        AND ($2::text IS NULL OR l.action = $2)
        AND ($3::text IS NULL OR l.target_type = $3)
        AND ($4::uuid IS NULL OR l.target_id = $4)
        AND ($5::timestamptz IS NULL OR l.created_at >= $5)
        AND ($6::timestamptz IS NULL OR l.created_at <= $6)
        ORDER BY l.created_at DESC
        LIMIT $7 OFFSET $8
        "#,
    )
    .bind(query.admin_id)
    .bind(&query.action)
    .bind(&query.target_type)
    .bind(query.target_id)
    .bind(query.from_date)
    .bind(query.to_date)
    .bind(pagination.limit())
    .bind(pagination.offset())
    .fetch_all(&state.db)
    .await?;

    let data: Vec<AdminAuditLogResponse> = rows
        .into_iter()
        .map(|r| AdminAuditLogResponse {
            id: r.id,
            admin_id: r.admin_id,
            admin_name: r.admin_name,
            action: r.action,
            target_type: r.target_type,
            target_id: r.target_id,
            details: r.details,
            created_at: r.created_at,
        })
        .collect();

    Ok(Paginated::new(data, &pagination, total as u64))
}

// ============================================================================
// Admin check (for frontend)
// ============================================================================

/// GET /admin/check
///
/// Returns 200 for admin accounts, 403 otherwise.
pub async fn check_admin(admin: RequireAdmin) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(serde_json::json!({
        "is_admin": true,
        "can_manage_partners": admin.require_capability(MANAGE_PARTNERS).is_ok(),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::Uri;

    #[test]
    fn verification_list_params_parse_from_query_string() {
        let uri: Uri = "/admin/verifications?page=2&per_page=10".parse().unwrap();
        let Query(params) = Query::<VerificationListParams>::try_from_uri(&uri).unwrap();
        let pagination = params.pagination();
        assert_eq!(pagination.page(), 2);
        assert_eq!(pagination.per_page(), 10);
        assert_eq!(pagination.offset(), 10);
    }

    #[test]
    fn audit_log_params_parse_filters_and_pagination() {
        let admin_id = Uuid::new_v4();
        let uri: Uri = format!("/admin/audit-log?page=3&admin_id={admin_id}&action=verify_partner")
            .parse()
            .unwrap();
        let Query(params) = Query::<AuditLogQueryParams>::try_from_uri(&uri).unwrap();
        assert_eq!(params.pagination().page(), 3);
        assert_eq!(params.admin_id, Some(admin_id));
        assert_eq!(params.action.as_deref(), Some("verify_partner"));
        assert!(params.target_id.is_none());
        assert!(params.from_date.is_none());
    }
}

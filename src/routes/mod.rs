pub mod accounts;
pub mod admin;
pub mod health;
pub mod me;
pub mod notifications;
pub mod partners;

use axum::{routing::delete, routing::get, routing::post, routing::put, Router};
use std::sync::Arc;

use crate::app::AppState;

/// Build the API router with all routes
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        // Public routes
        .route("/health", get(health::health_check))
        // Accounts
        .route("/accounts/register", post(accounts::register_account))
        .route("/accounts/deactivate", post(accounts::deactivate_account))
        .route("/me", get(me::get_me))
        // Partner onboarding
        .route(
            "/partners/me/onboarding",
            get(partners::get_onboarding_status),
        )
        .route("/partners/me/basic-info", put(partners::submit_basic_info))
        .route(
            "/partners/me/specializations",
            put(partners::submit_specializations),
        )
        .route("/partners/me/services", post(partners::add_service))
        .route(
            "/partners/me/services/:service_id",
            put(partners::update_service),
        )
        .route(
            "/partners/me/services/:service_id",
            delete(partners::remove_service),
        )
        .route("/partners/me/locations", put(partners::submit_locations))
        .route("/partners/me/portfolio", post(partners::add_portfolio_items))
        .route(
            "/partners/me/portfolio/:item_id",
            delete(partners::remove_portfolio_item),
        )
        .route("/partners/me/documents", post(partners::submit_documents))
        .route("/partners/me/complete", post(partners::complete_onboarding))
        // Notifications
        .route("/notifications", get(notifications::list_notifications))
        .route(
            "/notifications/unread-count",
            get(notifications::unread_count),
        )
        .route("/notifications/read", post(notifications::mark_read))
        // Admin
        .route("/admin/check", get(admin::check_admin))
        .route("/admin/stats", get(admin::get_admin_stats))
        .route(
            "/admin/verifications",
            get(admin::list_pending_verifications),
        )
        .route(
            "/admin/verifications/:partner_id",
            get(admin::get_verification),
        )
        .route(
            "/admin/partners/:partner_id/documents/:document_id/approve",
            post(admin::approve_document),
        )
        .route(
            "/admin/partners/:partner_id/documents/:document_id/reject",
            post(admin::reject_document),
        )
        .route(
            "/admin/partners/:partner_id/verify",
            post(admin::verify_partner),
        )
        .route(
            "/admin/partners/:partner_id/reject",
            post(admin::reject_partner),
        )
        .route("/admin/partners/bulk", post(admin::bulk_action))
        .route("/admin/audit-log", get(admin::list_audit_log))
}

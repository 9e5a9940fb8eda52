//! Admin domain types
//!
//! Types for the admin review panel: document/partner review requests, bulk
//! actions, pending-verification listings, audit logging, and dashboard stats.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::review::{BulkItemResult, BulkVerificationAction};

/// Admin action types for audit logging
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AdminAction {
    ApproveDocument,
    RejectDocument,
    VerifyPartner,
    RejectPartner,
    BulkVerifyPartners,
    BulkRejectPartners,
    ViewSensitiveData,
}

impl AdminAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ApproveDocument => "approve_document",
            Self::RejectDocument => "reject_document",
            Self::VerifyPartner => "verify_partner",
            Self::RejectPartner => "reject_partner",
            Self::BulkVerifyPartners => "bulk_verify_partners",
            Self::BulkRejectPartners => "bulk_reject_partners",
            Self::ViewSensitiveData => "view_sensitive_data",
        }
    }
}

impl std::fmt::Display for AdminAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target types for audit logging
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditTargetType {
    Partner,
    Document,
    SystemSetting,
}

impl AuditTargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Partner => "partner",
            Self::Document => "document",
            Self::SystemSetting => "system_setting",
        }
    }
}

impl std::fmt::Display for AuditTargetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response DTO for audit log entries
#[derive(Debug, Clone, Serialize)]
pub struct AdminAuditLogResponse {
    pub id: Uuid,
    pub admin_id: Uuid,
    pub admin_name: Option<String>,
    pub action: String,
    pub target_type: String,
    pub target_id: Option<Uuid>,
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Pending verification listing entry
#[derive(Debug, Clone, Serialize)]
pub struct PendingVerificationSummary {
    pub partner_id: Uuid,
    pub email: String,
    pub company_name: Option<String>,
    pub onboarding_step: i16,
    pub onboarding_progress: u8,
    pub document_count: usize,
    pub pending_document_count: usize,
    pub submitted_at: DateTime<Utc>,
}

/// Request to approve a document
#[derive(Debug, Clone, Deserialize)]
pub struct ApproveDocumentRequest {
    #[serde(default)]
    pub notes: Option<String>,
}

/// Request to reject a document
#[derive(Debug, Clone, Deserialize)]
pub struct RejectDocumentRequest {
    pub reason: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Request to verify a partner
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyPartnerRequest {
    #[serde(default)]
    pub notes: Option<String>,
}

/// Request to reject a partner
#[derive(Debug, Clone, Deserialize)]
pub struct RejectPartnerRequest {
    pub reason: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Bulk verify/reject request
#[derive(Debug, Clone, Deserialize)]
pub struct BulkActionRequest {
    pub action: BulkVerificationAction,
    pub partner_ids: Vec<Uuid>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Bulk action response: one entry per requested partner id
#[derive(Debug, Clone, Serialize)]
pub struct BulkActionResponse {
    pub results: Vec<BulkItemResult>,
}

/// Admin dashboard stats
#[derive(Debug, Clone, Serialize)]
pub struct AdminDashboardStats {
    pub total_accounts: i64,
    pub client_accounts: i64,
    pub partner_accounts: i64,
    pub pending_verifications: i64,
    pub verified_partners: i64,
    pub rejected_partners: i64,
    pub recent_signups_7d: i64,
    pub recent_verifications_7d: i64,
}

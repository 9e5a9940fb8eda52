//! Verification review workflow
//!
//! Admin-side transitions over a partner profile: per-document approve and
//! reject, partner verify and reject, and the per-item classification used by
//! bulk actions. Document status only moves pending -> approved or
//! pending -> rejected, each stamped once with the reviewer and timestamp.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::onboarding::WorkflowError;
use super::partner::{DocumentStatus, OnboardingStatus, PartnerProfile};

/// Result of a single document review
#[derive(Debug, Clone, Serialize)]
pub struct DocumentReviewOutcome {
    pub document_id: Uuid,
    pub status: DocumentStatus,
    /// Informational signal: whether every document is now approved
    pub all_documents_approved: bool,
}

/// Bulk action selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkVerificationAction {
    Verify,
    Reject,
}

/// Per-item outcome tag for bulk actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkOutcome {
    Verified,
    Rejected,
    Skipped,
    Error,
}

/// Per-item result entry for bulk actions
#[derive(Debug, Clone, Serialize)]
pub struct BulkItemResult {
    pub partner_id: Uuid,
    pub outcome: BulkOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl BulkItemResult {
    pub fn ok(partner_id: Uuid, outcome: BulkOutcome) -> Self {
        Self {
            partner_id,
            outcome,
            reason: None,
        }
    }

    pub fn skipped(partner_id: Uuid, reason: impl Into<String>) -> Self {
        Self {
            partner_id,
            outcome: BulkOutcome::Skipped,
            reason: Some(reason.into()),
        }
    }

    pub fn error(partner_id: Uuid, reason: impl Into<String>) -> Self {
        Self {
            partner_id,
            outcome: BulkOutcome::Error,
            reason: Some(reason.into()),
        }
    }
}

impl PartnerProfile {
    /// Approve a pending document
    pub fn approve_document(
        &mut self,
        document_id: Uuid,
        reviewer: Uuid,
        notes: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<DocumentReviewOutcome, WorkflowError> {
        let doc = self.documents.get_mut(document_id).ok_or(WorkflowError::NotFound {
            entity: "document",
            id: document_id,
        })?;

        if doc.status != DocumentStatus::Pending {
            return Err(WorkflowError::precondition(DocumentStatus::Pending, doc.status));
        }

        doc.status = DocumentStatus::Approved;
        doc.rejection_reason = None;
        doc.reviewed_at = Some(now);
        doc.reviewed_by = Some(reviewer);

        if let Some(notes) = notes {
            self.review_notes = Some(notes.to_string());
        }
        self.recompute_status();

        Ok(DocumentReviewOutcome {
            document_id,
            status: DocumentStatus::Approved,
            all_documents_approved: self.documents.all_approved(),
        })
    }

    /// Reject a pending document; a reason is mandatory
    pub fn reject_document(
        &mut self,
        document_id: Uuid,
        reviewer: Uuid,
        reason: &str,
        notes: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<DocumentReviewOutcome, WorkflowError> {
        if reason.trim().is_empty() {
            return Err(WorkflowError::validation("Rejection reason is required"));
        }

        let doc = self.documents.get_mut(document_id).ok_or(WorkflowError::NotFound {
            entity: "document",
            id: document_id,
        })?;

        if doc.status != DocumentStatus::Pending {
            return Err(WorkflowError::precondition(DocumentStatus::Pending, doc.status));
        }

        doc.status = DocumentStatus::Rejected;
        doc.rejection_reason = Some(reason.to_string());
        doc.reviewed_at = Some(now);
        doc.reviewed_by = Some(reviewer);

        if let Some(notes) = notes {
            self.review_notes = Some(notes.to_string());
        }
        self.recompute_status();

        Ok(DocumentReviewOutcome {
            document_id,
            status: DocumentStatus::Rejected,
            all_documents_approved: false,
        })
    }

    /// Mark the partner verified.
    ///
    /// Requires status `pending_verification` with every document approved.
    pub fn verify_partner(
        &mut self,
        admin_id: Uuid,
        notes: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<(), WorkflowError> {
        if self.onboarding_status != OnboardingStatus::PendingVerification {
            return Err(WorkflowError::precondition(
                OnboardingStatus::PendingVerification,
                self.onboarding_status,
            ));
        }
        if !self.documents_ready_for_verification() {
            return Err(WorkflowError::DocumentsNotApproved);
        }

        self.onboarding_status = OnboardingStatus::Verified;
        self.verified_at = Some(now);
        self.verified_by = Some(admin_id);
        self.rejected_at = None;
        self.rejected_by = None;
        self.rejection_reason = None;
        if let Some(notes) = notes {
            self.review_notes = Some(notes.to_string());
        }
        Ok(())
    }

    /// Mark the partner rejected; a reason is mandatory.
    ///
    /// Requires status `pending_verification`.
    pub fn reject_partner(
        &mut self,
        admin_id: Uuid,
        reason: &str,
        notes: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<(), WorkflowError> {
        if reason.trim().is_empty() {
            return Err(WorkflowError::validation("Rejection reason is required"));
        }
        if self.onboarding_status != OnboardingStatus::PendingVerification {
            return Err(WorkflowError::precondition(
                OnboardingStatus::PendingVerification,
                self.onboarding_status,
            ));
        }

        self.onboarding_status = OnboardingStatus::Rejected;
        self.rejected_at = Some(now);
        self.rejected_by = Some(admin_id);
        self.rejection_reason = Some(reason.to_string());
        if let Some(notes) = notes {
            self.review_notes = Some(notes.to_string());
        }
        Ok(())
    }

    /// Apply a bulk verify/reject to this profile and classify the outcome.
    ///
    /// Ineligibility (wrong status, unapproved documents) becomes `skipped`;
    /// anything else that fails becomes `error`. The caller decides what to
    /// persist based on the outcome.
    pub fn apply_bulk_action(
        &mut self,
        action: BulkVerificationAction,
        admin_id: Uuid,
        reason: Option<&str>,
        notes: Option<&str>,
        now: DateTime<Utc>,
    ) -> BulkItemResult {
        let result = match action {
            BulkVerificationAction::Verify => self
                .verify_partner(admin_id, notes, now)
                .map(|_| BulkOutcome::Verified),
            BulkVerificationAction::Reject => self
                .reject_partner(admin_id, reason.unwrap_or_default(), notes, now)
                .map(|_| BulkOutcome::Rejected),
        };

        match result {
            Ok(outcome) => BulkItemResult::ok(self.account_id, outcome),
            Err(e @ WorkflowError::Precondition { .. })
            | Err(e @ WorkflowError::DocumentsNotApproved) => {
                BulkItemResult::skipped(self.account_id, e.to_string())
            }
            Err(e) => BulkItemResult::error(self.account_id, e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::onboarding::{NewDocument, NewService};
    use super::super::partner::{BasicInfo, PartnerLocation};
    use super::*;
    use rust_decimal_macros::dec;

    fn pending_partner() -> PartnerProfile {
        let mut p = PartnerProfile::new(Uuid::new_v4());
        p.submit_basic_info(BasicInfo {
            company_name: "Cedar Plumbing".into(),
            headline: None,
            bio: None,
            phone: None,
            years_experience: Some(4),
        })
        .unwrap();
        p.submit_specializations(vec!["repiping".into()]).unwrap();
        p.add_service(NewService {
            name: "Drain cleaning".into(),
            base_price: dec!(150),
            price_unit: "visit".into(),
        })
        .unwrap();
        p.submit_locations(vec![PartnerLocation {
            city: "Boise".into(),
            state: "ID".into(),
            coordinates: None,
            served_areas: vec!["Ada County".into()],
        }])
        .unwrap();
        p.submit_documents(
            vec![
                NewDocument {
                    name: "License".into(),
                    file_ref: "docs/license.pdf".into(),
                },
                NewDocument {
                    name: "Insurance".into(),
                    file_ref: "docs/insurance.pdf".into(),
                },
            ],
            Utc::now(),
        )
        .unwrap();
        assert_eq!(p.onboarding_status, OnboardingStatus::PendingVerification);
        p
    }

    fn approve_all(p: &mut PartnerProfile, admin: Uuid) {
        let ids: Vec<Uuid> = p.documents.iter().map(|d| d.id).collect();
        for id in ids {
            p.approve_document(id, admin, None, Utc::now()).unwrap();
        }
    }

    #[test]
    fn approve_document_stamps_reviewer_and_time() {
        let mut p = pending_partner();
        let admin = Uuid::new_v4();
        let doc_id = p.documents.iter().next().unwrap().id;

        let outcome = p.approve_document(doc_id, admin, None, Utc::now()).unwrap();
        assert_eq!(outcome.status, DocumentStatus::Approved);
        assert!(!outcome.all_documents_approved); // second doc still pending

        let doc = p.documents.get(doc_id).unwrap();
        assert_eq!(doc.reviewed_by, Some(admin));
        assert!(doc.reviewed_at.is_some());
    }

    #[test]
    fn approving_reviewed_document_fails_and_leaves_state() {
        let mut p = pending_partner();
        let admin = Uuid::new_v4();
        let doc_id = p.documents.iter().next().unwrap().id;
        p.approve_document(doc_id, admin, None, Utc::now()).unwrap();

        let before = p.clone();
        let err = p
            .approve_document(doc_id, admin, None, Utc::now())
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Precondition { .. }));
        assert_eq!(p, before);
    }

    #[test]
    fn reject_document_requires_reason() {
        let mut p = pending_partner();
        let admin = Uuid::new_v4();
        let doc_id = p.documents.iter().next().unwrap().id;

        let before = p.clone();
        let err = p
            .reject_document(doc_id, admin, "  ", None, Utc::now())
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Validation(_)));
        assert_eq!(p, before);
    }

    #[test]
    fn rejected_document_moves_partner_to_rejected() {
        let mut p = pending_partner();
        let admin = Uuid::new_v4();
        let doc_id = p.documents.iter().next().unwrap().id;

        p.reject_document(doc_id, admin, "Expired license", None, Utc::now())
            .unwrap();
        assert_eq!(p.onboarding_status, OnboardingStatus::Rejected);
        assert!(p.documents.any_rejected());
    }

    #[test]
    fn verify_partner_requires_all_documents_approved() {
        let mut p = pending_partner();
        let admin = Uuid::new_v4();

        let err = p.verify_partner(admin, None, Utc::now()).unwrap_err();
        assert_eq!(err, WorkflowError::DocumentsNotApproved);
        assert_eq!(p.onboarding_status, OnboardingStatus::PendingVerification);
    }

    #[test]
    fn verify_partner_happy_path() {
        let mut p = pending_partner();
        let admin = Uuid::new_v4();
        approve_all(&mut p, admin);

        p.verify_partner(admin, Some("Looks good"), Utc::now())
            .unwrap();
        assert_eq!(p.onboarding_status, OnboardingStatus::Verified);
        assert_eq!(p.verified_by, Some(admin));
        assert!(p.verified_at.is_some());
        assert!(p.documents.all_approved());
    }

    #[test]
    fn verify_partner_wrong_status_fails_and_leaves_state() {
        let mut p = PartnerProfile::new(Uuid::new_v4());
        let admin = Uuid::new_v4();

        let before = p.clone();
        let err = p.verify_partner(admin, None, Utc::now()).unwrap_err();
        assert!(matches!(err, WorkflowError::Precondition { .. }));
        assert_eq!(p, before);
    }

    #[test]
    fn verified_status_survives_recomputation() {
        let mut p = pending_partner();
        let admin = Uuid::new_v4();
        approve_all(&mut p, admin);
        p.verify_partner(admin, None, Utc::now()).unwrap();

        p.recompute_status();
        assert_eq!(p.onboarding_status, OnboardingStatus::Verified);
    }

    #[test]
    fn reject_partner_requires_reason_before_mutation() {
        let mut p = pending_partner();
        let admin = Uuid::new_v4();

        let before = p.clone();
        let err = p.reject_partner(admin, "", None, Utc::now()).unwrap_err();
        assert!(matches!(err, WorkflowError::Validation(_)));
        assert_eq!(p, before);
    }

    #[test]
    fn bulk_outcomes_are_classified_per_item() {
        let admin = Uuid::new_v4();

        // Eligible partner
        let mut a = pending_partner();
        approve_all(&mut a, admin);
        let res_a = a.apply_bulk_action(BulkVerificationAction::Verify, admin, None, None, Utc::now());
        assert_eq!(res_a.outcome, BulkOutcome::Verified);
        assert!(res_a.reason.is_none());

        // Partner with a still-pending document
        let mut b = pending_partner();
        let res_b = b.apply_bulk_action(BulkVerificationAction::Verify, admin, None, None, Utc::now());
        assert_eq!(res_b.outcome, BulkOutcome::Skipped);
        assert_eq!(res_b.reason.as_deref(), Some("documents not approved"));
        assert_eq!(b.onboarding_status, OnboardingStatus::PendingVerification);

        // A's success is unaffected by B's outcome
        assert_eq!(a.onboarding_status, OnboardingStatus::Verified);
    }

    #[test]
    fn bulk_reject_without_reason_is_an_error_outcome() {
        let admin = Uuid::new_v4();
        let mut p = pending_partner();

        let before = p.clone();
        let res = p.apply_bulk_action(BulkVerificationAction::Reject, admin, None, None, Utc::now());
        assert_eq!(res.outcome, BulkOutcome::Error);
        assert_eq!(res.reason.as_deref(), Some("Rejection reason is required"));
        assert_eq!(p, before);
    }

    #[test]
    fn bulk_reject_on_incomplete_partner_is_skipped() {
        let admin = Uuid::new_v4();
        let mut p = PartnerProfile::new(Uuid::new_v4());

        let res = p.apply_bulk_action(
            BulkVerificationAction::Reject,
            admin,
            Some("Missing paperwork"),
            None,
            Utc::now(),
        );
        assert_eq!(res.outcome, BulkOutcome::Skipped);
        assert_eq!(p.onboarding_status, OnboardingStatus::Incomplete);
    }
}

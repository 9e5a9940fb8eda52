//! Onboarding workflow engine
//!
//! Pure state-transition logic over a [`PartnerProfile`] snapshot. Progress is
//! derived from five weighted completeness checks; status is recomputed after
//! every mutation that touches completeness or documents. The onboarding step
//! only ever moves forward, even when a partner revisits an earlier step.
//!
//! Status is never set directly here; only the review workflow
//! (`domain::review`) performs the admin-side transitions.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use super::partner::{
    BasicInfo, OnboardingStatus, PartnerLocation, PartnerProfile, PortfolioItem, ServiceOffering,
    VerificationDocument, LAST_STEP,
};

/// Completeness weights, percent. Sum is 100.
pub const WEIGHT_BASIC_INFO: u8 = 20;
pub const WEIGHT_SPECIALIZATIONS: u8 = 15;
pub const WEIGHT_SERVICES: u8 = 25;
pub const WEIGHT_LOCATIONS: u8 = 20;
pub const WEIGHT_DOCUMENTS: u8 = 20;

/// Errors raised by the onboarding and review workflows
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("{0}")]
    Validation(String),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("expected status '{expected}', found '{actual}'")]
    Precondition { expected: String, actual: String },

    #[error("documents not approved")]
    DocumentsNotApproved,
}

impl WorkflowError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub(crate) fn precondition(
        expected: impl std::fmt::Display,
        actual: impl std::fmt::Display,
    ) -> Self {
        Self::Precondition {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

/// New service payload
#[derive(Debug, Clone, serde::Deserialize)]
pub struct NewService {
    pub name: String,
    pub base_price: Decimal,
    pub price_unit: String,
}

/// Partial service update; absent fields are left unchanged
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ServiceUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub base_price: Option<Decimal>,
    #[serde(default)]
    pub price_unit: Option<String>,
}

/// New portfolio item payload
#[derive(Debug, Clone, serde::Deserialize)]
pub struct NewPortfolioItem {
    pub url: String,
    #[serde(default)]
    pub caption: Option<String>,
}

/// New verification document payload
#[derive(Debug, Clone, serde::Deserialize)]
pub struct NewDocument {
    pub name: String,
    pub file_ref: String,
}

impl PartnerProfile {
    /// Weighted completeness percentage, always in [0, 100]
    pub fn onboarding_progress(&self) -> u8 {
        let mut progress = 0u8;
        if self.basic_info.is_some() {
            progress += WEIGHT_BASIC_INFO;
        }
        if !self.specializations.is_empty() {
            progress += WEIGHT_SPECIALIZATIONS;
        }
        if !self.services.is_empty() {
            progress += WEIGHT_SERVICES;
        }
        if !self.locations.is_empty() {
            progress += WEIGHT_LOCATIONS;
        }
        if !self.documents.is_empty() {
            progress += WEIGHT_DOCUMENTS;
        }
        progress
    }

    /// Recompute `onboarding_status` from progress and document review state.
    ///
    /// `verified` is terminal and never downgraded here. `verified` itself is
    /// only ever set by the review workflow, so recomputation produces one of
    /// `incomplete`, `pending_verification`, or `rejected`.
    pub fn recompute_status(&mut self) {
        if self.onboarding_status == OnboardingStatus::Verified {
            return;
        }

        self.onboarding_status = if self.documents.any_rejected() {
            OnboardingStatus::Rejected
        } else if self.onboarding_progress() == 100 && !self.documents.is_empty() {
            OnboardingStatus::PendingVerification
        } else {
            OnboardingStatus::Incomplete
        };
    }

    /// Step only moves forward, never backward
    fn advance_step(&mut self, next_step: i16) {
        self.onboarding_step = self.onboarding_step.max(next_step.min(LAST_STEP));
    }

    /// Step 1: submit basic profile information. Idempotent on identical
    /// input.
    pub fn submit_basic_info(&mut self, info: BasicInfo) -> Result<(), WorkflowError> {
        if info.company_name.trim().is_empty() {
            return Err(WorkflowError::validation("Company name is required"));
        }
        if let Some(years) = info.years_experience {
            if years < 0 {
                return Err(WorkflowError::validation(
                    "Years of experience cannot be negative",
                ));
            }
        }

        self.basic_info = Some(info);
        self.advance_step(2);
        self.recompute_status();
        Ok(())
    }

    /// Step 2: submit specializations
    pub fn submit_specializations(&mut self, specs: Vec<String>) -> Result<(), WorkflowError> {
        if specs.is_empty() {
            return Err(WorkflowError::validation(
                "At least one specialization is required",
            ));
        }
        if specs.iter().any(|s| s.trim().is_empty()) {
            return Err(WorkflowError::validation(
                "Specialization names cannot be empty",
            ));
        }

        self.specializations = specs;
        self.advance_step(3);
        self.recompute_status();
        Ok(())
    }

    /// Step 3: add a service offering. Returns the new service id.
    pub fn add_service(&mut self, service: NewService) -> Result<Uuid, WorkflowError> {
        validate_service_fields(&service.name, &service.base_price, &service.price_unit)?;

        let id = Uuid::new_v4();
        self.services.push(ServiceOffering {
            id,
            name: service.name,
            base_price: service.base_price,
            price_unit: service.price_unit,
        });
        self.advance_step(4);
        self.recompute_status();
        Ok(id)
    }

    /// Step 3: update an existing service by id
    pub fn update_service(&mut self, id: Uuid, update: ServiceUpdate) -> Result<(), WorkflowError> {
        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(WorkflowError::validation("Service name cannot be empty"));
            }
        }
        if let Some(price) = &update.base_price {
            if price.is_sign_negative() {
                return Err(WorkflowError::validation("Base price cannot be negative"));
            }
        }

        let service = self
            .service_mut(id)
            .ok_or(WorkflowError::NotFound { entity: "service", id })?;

        if let Some(name) = update.name {
            service.name = name;
        }
        if let Some(price) = update.base_price {
            service.base_price = price;
        }
        if let Some(unit) = update.price_unit {
            service.price_unit = unit;
        }
        Ok(())
    }

    /// Step 3: remove a service by id
    pub fn remove_service(&mut self, id: Uuid) -> Result<(), WorkflowError> {
        let before = self.services.len();
        self.services.retain(|s| s.id != id);
        if self.services.len() == before {
            return Err(WorkflowError::NotFound { entity: "service", id });
        }
        self.recompute_status();
        Ok(())
    }

    /// Step 4: replace the location list
    pub fn submit_locations(
        &mut self,
        locations: Vec<PartnerLocation>,
    ) -> Result<(), WorkflowError> {
        if locations.is_empty() {
            return Err(WorkflowError::validation("At least one location is required"));
        }
        for loc in &locations {
            if loc.city.trim().is_empty() || loc.state.trim().is_empty() {
                return Err(WorkflowError::validation("City and state are required"));
            }
            if let Some(coords) = &loc.coordinates {
                if !coords.in_range() {
                    return Err(WorkflowError::validation(format!(
                        "Coordinates ({}, {}) are out of range",
                        coords.lat, coords.lng
                    )));
                }
            }
        }

        self.locations = locations;
        self.advance_step(5);
        self.recompute_status();
        Ok(())
    }

    /// Append portfolio items. Returns the new item ids.
    pub fn add_portfolio_items(
        &mut self,
        items: Vec<NewPortfolioItem>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Uuid>, WorkflowError> {
        if items.is_empty() {
            return Err(WorkflowError::validation("No portfolio items provided"));
        }
        for item in &items {
            url::Url::parse(&item.url).map_err(|_| {
                WorkflowError::validation(format!("Invalid portfolio URL: {}", item.url))
            })?;
        }

        let mut ids = Vec::with_capacity(items.len());
        for item in items {
            let id = Uuid::new_v4();
            self.portfolio.push(PortfolioItem {
                id,
                url: item.url,
                caption: item.caption,
                added_at: now,
            });
            ids.push(id);
        }
        Ok(ids)
    }

    /// Remove a portfolio item by id
    pub fn remove_portfolio_item(&mut self, id: Uuid) -> Result<(), WorkflowError> {
        let before = self.portfolio.len();
        self.portfolio.retain(|p| p.id != id);
        if self.portfolio.len() == before {
            return Err(WorkflowError::NotFound {
                entity: "portfolio item",
                id,
            });
        }
        Ok(())
    }

    /// Step 5: submit verification documents.
    ///
    /// A document with the same name as an existing one replaces it; this is
    /// how a partner resolves a rejected document, which resets it to
    /// `pending` and lets status recomputation lift the rejection.
    pub fn submit_documents(
        &mut self,
        docs: Vec<NewDocument>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Uuid>, WorkflowError> {
        if docs.is_empty() {
            return Err(WorkflowError::validation("No documents provided"));
        }
        for doc in &docs {
            if doc.name.trim().is_empty() {
                return Err(WorkflowError::validation("Document name is required"));
            }
            if doc.file_ref.trim().is_empty() {
                return Err(WorkflowError::validation("Document file reference is required"));
            }
        }

        let mut ids = Vec::with_capacity(docs.len());
        for doc in docs {
            let doc = VerificationDocument::new(doc.name, doc.file_ref, now);
            ids.push(doc.id);
            self.documents.upsert_by_name(doc);
        }
        self.advance_step(LAST_STEP);
        self.recompute_status();
        Ok(ids)
    }

    /// Explicit "complete onboarding" submission
    pub fn complete_onboarding(&mut self) -> Result<(), WorkflowError> {
        let progress = self.onboarding_progress();
        if progress < 100 {
            return Err(WorkflowError::validation(format!(
                "Onboarding is not complete: progress is {progress}%"
            )));
        }
        if self.documents.is_empty() {
            return Err(WorkflowError::validation(
                "At least one verification document is required",
            ));
        }

        self.advance_step(LAST_STEP);
        self.recompute_status();
        Ok(())
    }

    /// Read-only snapshot for the partner-facing status endpoint
    pub fn onboarding_snapshot(&self) -> super::partner::OnboardingSnapshot {
        super::partner::OnboardingSnapshot {
            step: self.onboarding_step,
            progress: self.onboarding_progress(),
            status: self.onboarding_status,
            profile: self.clone(),
        }
    }

    /// True when every document has been reviewed and approved
    pub fn documents_ready_for_verification(&self) -> bool {
        self.documents.all_approved()
            && !self.documents.any_pending()
            && !self.documents.any_rejected()
    }
}

fn validate_service_fields(
    name: &str,
    base_price: &Decimal,
    price_unit: &str,
) -> Result<(), WorkflowError> {
    if name.trim().is_empty() {
        return Err(WorkflowError::validation("Service name is required"));
    }
    if base_price.is_sign_negative() {
        return Err(WorkflowError::validation("Base price cannot be negative"));
    }
    if price_unit.trim().is_empty() {
        return Err(WorkflowError::validation("Price unit is required"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::partner::Coordinates;
    use super::*;
    use rust_decimal_macros::dec;

    fn profile() -> PartnerProfile {
        PartnerProfile::new(Uuid::new_v4())
    }

    fn basic_info() -> BasicInfo {
        BasicInfo {
            company_name: "Harbor Electric".to_string(),
            headline: Some("Licensed electricians".to_string()),
            bio: None,
            phone: Some("555-0100".to_string()),
            years_experience: Some(12),
        }
    }

    fn complete_profile() -> PartnerProfile {
        let mut p = profile();
        p.submit_basic_info(basic_info()).unwrap();
        p.submit_specializations(vec!["wiring".into(), "panels".into()])
            .unwrap();
        p.add_service(NewService {
            name: "Panel upgrade".into(),
            base_price: dec!(1200),
            price_unit: "job".into(),
        })
        .unwrap();
        p.submit_locations(vec![PartnerLocation {
            city: "Portland".into(),
            state: "OR".into(),
            coordinates: Some(Coordinates {
                lat: 45.52,
                lng: -122.68,
            }),
            served_areas: vec!["Multnomah County".into()],
        }])
        .unwrap();
        p.submit_documents(
            vec![NewDocument {
                name: "License".into(),
                file_ref: "docs/license.pdf".into(),
            }],
            Utc::now(),
        )
        .unwrap();
        p
    }

    #[test]
    fn new_profile_starts_at_step_one_incomplete() {
        let p = profile();
        assert_eq!(p.onboarding_step, 1);
        assert_eq!(p.onboarding_status, OnboardingStatus::Incomplete);
        assert_eq!(p.onboarding_progress(), 0);
    }

    #[test]
    fn progress_is_sum_of_weighted_checks() {
        let mut p = profile();
        p.submit_basic_info(basic_info()).unwrap();
        assert_eq!(p.onboarding_progress(), WEIGHT_BASIC_INFO);

        p.submit_specializations(vec!["wiring".into()]).unwrap();
        assert_eq!(
            p.onboarding_progress(),
            WEIGHT_BASIC_INFO + WEIGHT_SPECIALIZATIONS
        );

        let p = complete_profile();
        assert_eq!(p.onboarding_progress(), 100);
    }

    #[test]
    fn progress_stays_within_bounds() {
        let p = complete_profile();
        assert!(p.onboarding_progress() <= 100);
        let q = profile();
        assert_eq!(q.onboarding_progress(), 0);
    }

    #[test]
    fn step_never_moves_backward() {
        let mut p = complete_profile();
        assert_eq!(p.onboarding_step, 5);

        // Revisit step 1
        p.submit_basic_info(basic_info()).unwrap();
        assert_eq!(p.onboarding_step, 5);

        // Revisit step 2
        p.submit_specializations(vec!["wiring".into()]).unwrap();
        assert_eq!(p.onboarding_step, 5);
    }

    #[test]
    fn identical_basic_info_resubmission_is_idempotent() {
        let mut p = profile();
        p.submit_basic_info(basic_info()).unwrap();
        let progress = p.onboarding_progress();
        let snapshot = p.clone();

        p.submit_basic_info(basic_info()).unwrap();
        assert_eq!(p.onboarding_progress(), progress);
        assert_eq!(p, snapshot);
    }

    #[test]
    fn basic_info_requires_company_name() {
        let mut p = profile();
        let err = p
            .submit_basic_info(BasicInfo {
                company_name: "  ".to_string(),
                headline: None,
                bio: None,
                phone: None,
                years_experience: None,
            })
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Validation(_)));
        assert!(p.basic_info.is_none());
    }

    #[test]
    fn service_price_cannot_be_negative() {
        let mut p = profile();
        let err = p
            .add_service(NewService {
                name: "Wiring".into(),
                base_price: dec!(-5),
                price_unit: "hour".into(),
            })
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Validation(_)));
        assert!(p.services.is_empty());
    }

    #[test]
    fn update_unknown_service_is_not_found() {
        let mut p = profile();
        let id = Uuid::new_v4();
        let err = p.update_service(id, ServiceUpdate::default()).unwrap_err();
        assert_eq!(
            err,
            WorkflowError::NotFound {
                entity: "service",
                id
            }
        );
    }

    #[test]
    fn out_of_range_coordinates_rejected() {
        let mut p = profile();
        let err = p
            .submit_locations(vec![PartnerLocation {
                city: "Nowhere".into(),
                state: "XX".into(),
                coordinates: Some(Coordinates {
                    lat: 91.0,
                    lng: 0.0,
                }),
                served_areas: vec![],
            }])
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Validation(_)));
        assert!(p.locations.is_empty());
    }

    #[test]
    fn invalid_portfolio_url_rejected_before_mutation() {
        let mut p = profile();
        let err = p
            .add_portfolio_items(
                vec![
                    NewPortfolioItem {
                        url: "https://example.com/a.jpg".into(),
                        caption: None,
                    },
                    NewPortfolioItem {
                        url: "not a url".into(),
                        caption: None,
                    },
                ],
                Utc::now(),
            )
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Validation(_)));
        assert!(p.portfolio.is_empty());
    }

    #[test]
    fn full_profile_with_pending_documents_goes_pending_verification() {
        let p = complete_profile();
        assert_eq!(p.onboarding_status, OnboardingStatus::PendingVerification);
    }

    #[test]
    fn incomplete_profile_with_documents_stays_incomplete() {
        let mut p = profile();
        p.submit_documents(
            vec![NewDocument {
                name: "License".into(),
                file_ref: "docs/license.pdf".into(),
            }],
            Utc::now(),
        )
        .unwrap();
        assert_eq!(p.onboarding_status, OnboardingStatus::Incomplete);
        assert_eq!(p.onboarding_step, 5);
    }

    #[test]
    fn complete_onboarding_requires_full_progress() {
        let mut p = profile();
        p.submit_basic_info(basic_info()).unwrap();
        let err = p.complete_onboarding().unwrap_err();
        assert!(matches!(err, WorkflowError::Validation(_)));
        assert_eq!(p.onboarding_status, OnboardingStatus::Incomplete);
    }

    #[test]
    fn resubmitting_rejected_document_recovers_pending_verification() {
        let mut p = complete_profile();
        let doc_id = p.documents.iter().next().unwrap().id;
        let admin = Uuid::new_v4();
        p.reject_document(doc_id, admin, "Blurry scan", None, Utc::now())
            .unwrap();
        assert_eq!(p.onboarding_status, OnboardingStatus::Rejected);

        // Same name replaces the rejected document and resets it to pending
        p.submit_documents(
            vec![NewDocument {
                name: "License".into(),
                file_ref: "docs/license-v2.pdf".into(),
            }],
            Utc::now(),
        )
        .unwrap();
        assert_eq!(p.documents.len(), 1);
        assert_eq!(p.onboarding_status, OnboardingStatus::PendingVerification);
    }
}

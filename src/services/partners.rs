//! Partner profile persistence
//!
//! The profile aggregate is stored in one `partner_profiles` row with JSONB
//! sub-collections and is read and written as a whole. Concurrent writers get
//! last-write-wins on the row; transition preconditions are checked in the
//! domain layer against the freshly loaded snapshot.

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::partner::{
    BasicInfo, DocumentSet, OnboardingStatus, PartnerLocation, PartnerProfile, PortfolioItem,
    ServiceOffering,
};

#[derive(Debug, FromRow)]
pub struct PartnerProfileRow {
    pub account_id: Uuid,
    pub basic_info: Option<Json<BasicInfo>>,
    pub specializations: Json<Vec<String>>,
    pub onboarding_step: i16,
    pub onboarding_status: String,
    pub services: Json<Vec<ServiceOffering>>,
    pub locations: Json<Vec<PartnerLocation>>,
    pub portfolio: Json<Vec<PortfolioItem>>,
    pub documents: Json<DocumentSet>,
    pub verified_at: Option<DateTime<Utc>>,
    pub verified_by: Option<Uuid>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub rejected_by: Option<Uuid>,
    pub rejection_reason: Option<String>,
    pub review_notes: Option<String>,
}

impl PartnerProfileRow {
    pub fn into_profile(self) -> PartnerProfile {
        let onboarding_status = self.onboarding_status.parse().unwrap_or_else(|e: String| {
            tracing::warn!(account_id = %self.account_id, error = %e, "Defaulting to incomplete");
            OnboardingStatus::Incomplete
        });

        PartnerProfile {
            account_id: self.account_id,
            basic_info: self.basic_info.map(|j| j.0),
            specializations: self.specializations.0,
            onboarding_step: self.onboarding_step,
            onboarding_status,
            services: self.services.0,
            locations: self.locations.0,
            portfolio: self.portfolio.0,
            documents: self.documents.0,
            verified_at: self.verified_at,
            verified_by: self.verified_by,
            rejected_at: self.rejected_at,
            rejected_by: self.rejected_by,
            rejection_reason: self.rejection_reason,
            review_notes: self.review_notes,
        }
    }
}

const PROFILE_COLUMNS: &str = "account_id, basic_info, specializations, onboarding_step, \
     onboarding_status, services, locations, portfolio, documents, verified_at, verified_by, \
     rejected_at, rejected_by, rejection_reason, review_notes";

/// Load a partner profile aggregate, skipping soft-deleted rows
pub async fn load_profile(
    db: &PgPool,
    account_id: Uuid,
) -> Result<Option<PartnerProfile>, sqlx::Error> {
    let query = format!(
        "SELECT {PROFILE_COLUMNS} FROM partner_profiles WHERE account_id = $1 AND deleted_at IS NULL"
    );

    let row = sqlx::query_as::<_, PartnerProfileRow>(&query)
        .bind(account_id)
        .fetch_optional(db)
        .await?;

    Ok(row.map(PartnerProfileRow::into_profile))
}

/// Create the fresh step-1 profile row at partner registration
pub async fn create_profile(db: &PgPool, profile: &PartnerProfile) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO partner_profiles (
            account_id, basic_info, specializations, onboarding_step, onboarding_status,
            services, locations, portfolio, documents
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(profile.account_id)
    .bind(profile.basic_info.as_ref().map(Json))
    .bind(Json(&profile.specializations))
    .bind(profile.onboarding_step)
    .bind(profile.onboarding_status.as_str())
    .bind(Json(&profile.services))
    .bind(Json(&profile.locations))
    .bind(Json(&profile.portfolio))
    .bind(Json(&profile.documents))
    .execute(db)
    .await?;

    Ok(())
}

/// Write the whole aggregate back (last-write-wins on the row)
pub async fn save_profile(db: &PgPool, profile: &PartnerProfile) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE partner_profiles SET
            basic_info = $2,
            specializations = $3,
            onboarding_step = $4,
            onboarding_status = $5,
            services = $6,
            locations = $7,
            portfolio = $8,
            documents = $9,
            verified_at = $10,
            verified_by = $11,
            rejected_at = $12,
            rejected_by = $13,
            rejection_reason = $14,
            review_notes = $15,
            updated_at = NOW()
        WHERE account_id = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(profile.account_id)
    .bind(profile.basic_info.as_ref().map(Json))
    .bind(Json(&profile.specializations))
    .bind(profile.onboarding_step)
    .bind(profile.onboarding_status.as_str())
    .bind(Json(&profile.services))
    .bind(Json(&profile.locations))
    .bind(Json(&profile.portfolio))
    .bind(Json(&profile.documents))
    .bind(profile.verified_at)
    .bind(profile.verified_by)
    .bind(profile.rejected_at)
    .bind(profile.rejected_by)
    .bind(profile.rejection_reason.as_deref())
    .bind(profile.review_notes.as_deref())
    .execute(db)
    .await?;

    Ok(())
}

/// Soft-delete a partner profile (tombstone timestamp, never hard-deleted)
pub async fn soft_delete_profile(db: &PgPool, account_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE partner_profiles SET deleted_at = NOW(), updated_at = NOW() \
         WHERE account_id = $1 AND deleted_at IS NULL",
    )
    .bind(account_id)
    .execute(db)
    .await?;

    Ok(())
}

//! Partner profile aggregate
//!
//! One profile per partner account, created at registration with step 1 and
//! status `incomplete`. Sub-collections (services, locations, portfolio,
//! documents) are persisted as JSONB columns and read/written as a whole,
//! so the aggregate is the unit of consistency.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// First onboarding step (basic info)
pub const FIRST_STEP: i16 = 1;
/// Last onboarding step (document submission)
pub const LAST_STEP: i16 = 5;

/// Overall verification state of a partner profile
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStatus {
    Incomplete,
    PendingVerification,
    Verified,
    Rejected,
}

impl OnboardingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Incomplete => "incomplete",
            Self::PendingVerification => "pending_verification",
            Self::Verified => "verified",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for OnboardingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OnboardingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "incomplete" => Ok(Self::Incomplete),
            "pending_verification" => Ok(Self::PendingVerification),
            "verified" => Ok(Self::Verified),
            "rejected" => Ok(Self::Rejected),
            other => Err(format!("unknown onboarding status '{other}'")),
        }
    }
}

/// Review state of a single verification document
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Pending,
    Approved,
    Rejected,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Step-1 profile basics
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BasicInfo {
    pub company_name: String,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub years_experience: Option<i32>,
}

/// A service the partner offers through the marketplace
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceOffering {
    pub id: Uuid,
    pub name: String,
    pub base_price: Decimal,
    pub price_unit: String,
}

/// Geographic point, degrees
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

/// A location the partner operates from, with the areas it serves
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PartnerLocation {
    pub city: String,
    pub state: String,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub served_areas: Vec<String>,
}

/// Portfolio media reference
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortfolioItem {
    pub id: Uuid,
    pub url: String,
    #[serde(default)]
    pub caption: Option<String>,
    pub added_at: DateTime<Utc>,
}

/// A document submitted for verification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VerificationDocument {
    pub id: Uuid,
    pub name: String,
    pub file_ref: String,
    pub status: DocumentStatus,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reviewed_by: Option<Uuid>,
    pub submitted_at: DateTime<Utc>,
}

impl VerificationDocument {
    pub fn new(name: String, file_ref: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            file_ref,
            status: DocumentStatus::Pending,
            rejection_reason: None,
            reviewed_at: None,
            reviewed_by: None,
            submitted_at: now,
        }
    }
}

/// Owned document collection addressed by id.
///
/// Submission order is preserved; ids are unique within the set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct DocumentSet(Vec<VerificationDocument>);

impl DocumentSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&VerificationDocument> {
        self.0.iter().find(|d| d.id == id)
    }

    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut VerificationDocument> {
        self.0.iter_mut().find(|d| d.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &VerificationDocument> {
        self.0.iter()
    }

    /// Append a document. If one with the same name already exists it is
    /// replaced (this is how a partner resolves a rejected document).
    pub fn upsert_by_name(&mut self, doc: VerificationDocument) {
        if let Some(existing) = self.0.iter_mut().find(|d| d.name == doc.name) {
            *existing = doc;
        } else {
            self.0.push(doc);
        }
    }

    pub fn all_approved(&self) -> bool {
        !self.0.is_empty() && self.0.iter().all(|d| d.status == DocumentStatus::Approved)
    }

    pub fn any_pending(&self) -> bool {
        self.0.iter().any(|d| d.status == DocumentStatus::Pending)
    }

    pub fn any_rejected(&self) -> bool {
        self.0.iter().any(|d| d.status == DocumentStatus::Rejected)
    }
}

/// Partner profile aggregate root
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PartnerProfile {
    pub account_id: Uuid,
    pub basic_info: Option<BasicInfo>,
    pub specializations: Vec<String>,
    pub onboarding_step: i16,
    pub onboarding_status: OnboardingStatus,
    pub services: Vec<ServiceOffering>,
    pub locations: Vec<PartnerLocation>,
    pub portfolio: Vec<PortfolioItem>,
    pub documents: DocumentSet,
    pub verified_at: Option<DateTime<Utc>>,
    pub verified_by: Option<Uuid>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub rejected_by: Option<Uuid>,
    pub rejection_reason: Option<String>,
    pub review_notes: Option<String>,
}

impl PartnerProfile {
    /// Fresh profile, as created at partner registration
    pub fn new(account_id: Uuid) -> Self {
        Self {
            account_id,
            basic_info: None,
            specializations: Vec::new(),
            onboarding_step: FIRST_STEP,
            onboarding_status: OnboardingStatus::Incomplete,
            services: Vec::new(),
            locations: Vec::new(),
            portfolio: Vec::new(),
            documents: DocumentSet::default(),
            verified_at: None,
            verified_by: None,
            rejected_at: None,
            rejected_by: None,
            rejection_reason: None,
            review_notes: None,
        }
    }

    pub fn service_mut(&mut self, id: Uuid) -> Option<&mut ServiceOffering> {
        self.services.iter_mut().find(|s| s.id == id)
    }
}

/// Read-only onboarding snapshot returned to the partner
#[derive(Debug, Clone, Serialize)]
pub struct OnboardingSnapshot {
    pub step: i16,
    pub progress: u8,
    pub status: OnboardingStatus,
    pub profile: PartnerProfile,
}

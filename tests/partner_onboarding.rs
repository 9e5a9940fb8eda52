use chrono::Utc;
use rust_decimal_macros::dec;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use localpro_backend::domain::onboarding::{NewDocument, NewPortfolioItem, NewService};
use localpro_backend::domain::notification::NotificationType;
use localpro_backend::domain::partner::{
    BasicInfo, Coordinates, DocumentStatus, OnboardingStatus, PartnerLocation, PartnerProfile,
};
use localpro_backend::domain::review::{BulkOutcome, BulkVerificationAction};
use localpro_backend::services::notifications;
use localpro_backend::services::registry::{NotificationRegistry, StatusChangeEvent};

fn basic_info() -> BasicInfo {
    BasicInfo {
        company_name: "Summit Roofing".to_string(),
        headline: Some("Residential and commercial roofing".to_string()),
        bio: Some("Family-run since 2004.".to_string()),
        phone: Some("555-0142".to_string()),
        years_experience: Some(20),
    }
}

fn walk_through_onboarding(profile: &mut PartnerProfile) {
    profile
        .submit_basic_info(basic_info())
        .expect("basic info accepted");
    profile
        .submit_specializations(vec!["shingle".into(), "metal".into()])
        .expect("specializations accepted");
    profile
        .add_service(NewService {
            name: "Roof inspection".into(),
            base_price: dec!(250),
            price_unit: "visit".into(),
        })
        .expect("service accepted");
    profile
        .submit_locations(vec![PartnerLocation {
            city: "Denver".into(),
            state: "CO".into(),
            coordinates: Some(Coordinates {
                lat: 39.74,
                lng: -104.99,
            }),
            served_areas: vec!["Denver County".into(), "Jefferson County".into()],
        }])
        .expect("locations accepted");
    profile
        .submit_documents(
            vec![
                NewDocument {
                    name: "Contractor license".into(),
                    file_ref: "docs/license.pdf".into(),
                },
                NewDocument {
                    name: "Liability insurance".into(),
                    file_ref: "docs/insurance.pdf".into(),
                },
            ],
            Utc::now(),
        )
        .expect("documents accepted");
}

#[test]
fn full_lifecycle_from_registration_to_verified() {
    let mut profile = PartnerProfile::new(Uuid::new_v4());
    assert_eq!(profile.onboarding_step, 1);
    assert_eq!(profile.onboarding_status, OnboardingStatus::Incomplete);

    walk_through_onboarding(&mut profile);

    // Portfolio is optional and does not gate progress
    profile
        .add_portfolio_items(
            vec![NewPortfolioItem {
                url: "https://example.com/jobs/roof-1.jpg".into(),
                caption: Some("Full replacement, 2023".into()),
            }],
            Utc::now(),
        )
        .expect("portfolio accepted");

    let snapshot = profile.onboarding_snapshot();
    assert_eq!(snapshot.step, 5);
    assert_eq!(snapshot.progress, 100);
    assert_eq!(snapshot.status, OnboardingStatus::PendingVerification);

    // Admin reviews each document, then the partner
    let admin = Uuid::new_v4();
    let doc_ids: Vec<Uuid> = profile.documents.iter().map(|d| d.id).collect();
    for (i, doc_id) in doc_ids.iter().enumerate() {
        let outcome = profile
            .approve_document(*doc_id, admin, None, Utc::now())
            .expect("pending document approves");
        assert_eq!(outcome.status, DocumentStatus::Approved);
        assert_eq!(outcome.all_documents_approved, i == doc_ids.len() - 1);
    }

    profile
        .verify_partner(admin, Some("All documents check out"), Utc::now())
        .expect("eligible partner verifies");
    assert_eq!(profile.onboarding_status, OnboardingStatus::Verified);
    assert_eq!(profile.verified_by, Some(admin));

    // Later profile edits never downgrade a verified partner
    profile
        .submit_basic_info(basic_info())
        .expect("verified partner can edit profile");
    assert_eq!(profile.onboarding_status, OnboardingStatus::Verified);
}

#[test]
fn rejection_and_resubmission_round_trip() {
    let mut profile = PartnerProfile::new(Uuid::new_v4());
    walk_through_onboarding(&mut profile);

    let admin = Uuid::new_v4();
    let license_id = profile
        .documents
        .iter()
        .find(|d| d.name == "Contractor license")
        .expect("license document present")
        .id;

    profile
        .reject_document(license_id, admin, "License number unreadable", None, Utc::now())
        .expect("pending document rejects");
    assert_eq!(profile.onboarding_status, OnboardingStatus::Rejected);

    // Resubmitting under the same name replaces the rejected document and
    // puts the partner back in the review queue.
    profile
        .submit_documents(
            vec![NewDocument {
                name: "Contractor license".into(),
                file_ref: "docs/license-rescan.pdf".into(),
            }],
            Utc::now(),
        )
        .expect("replacement document accepted");

    assert_eq!(profile.documents.len(), 2);
    assert_eq!(
        profile.onboarding_status,
        OnboardingStatus::PendingVerification
    );
    let license = profile
        .documents
        .iter()
        .find(|d| d.name == "Contractor license")
        .expect("replacement present");
    assert_eq!(license.status, DocumentStatus::Pending);
    assert!(license.rejection_reason.is_none());
}

#[test]
fn bulk_action_isolates_outcomes_per_partner() {
    let admin = Uuid::new_v4();

    // A: fully reviewed and eligible
    let mut a = PartnerProfile::new(Uuid::new_v4());
    walk_through_onboarding(&mut a);
    let ids: Vec<Uuid> = a.documents.iter().map(|d| d.id).collect();
    for id in ids {
        a.approve_document(id, admin, None, Utc::now())
            .expect("approve");
    }

    // B: still has pending documents
    let mut b = PartnerProfile::new(Uuid::new_v4());
    walk_through_onboarding(&mut b);

    // C: has not finished onboarding
    let mut c = PartnerProfile::new(Uuid::new_v4());

    // D: in the review queue, but the reject carries no reason
    let mut d = PartnerProfile::new(Uuid::new_v4());
    walk_through_onboarding(&mut d);

    let res_a = a.apply_bulk_action(BulkVerificationAction::Verify, admin, None, None, Utc::now());
    let res_b = b.apply_bulk_action(BulkVerificationAction::Verify, admin, None, None, Utc::now());
    let res_c = c.apply_bulk_action(BulkVerificationAction::Verify, admin, None, None, Utc::now());
    let res_d = d.apply_bulk_action(BulkVerificationAction::Reject, admin, None, None, Utc::now());

    assert_eq!(res_a.outcome, BulkOutcome::Verified);
    assert_eq!(res_b.outcome, BulkOutcome::Skipped);
    assert_eq!(res_c.outcome, BulkOutcome::Skipped);
    assert_eq!(res_d.outcome, BulkOutcome::Error);
    assert_eq!(res_d.reason.as_deref(), Some("Rejection reason is required"));

    assert_eq!(a.onboarding_status, OnboardingStatus::Verified);
    assert_eq!(b.onboarding_status, OnboardingStatus::PendingVerification);
    assert_eq!(c.onboarding_status, OnboardingStatus::Incomplete);
    assert_eq!(d.onboarding_status, OnboardingStatus::PendingVerification);
}

#[test]
fn registry_delivers_status_changes_to_interested_listeners_only() {
    let registry = NotificationRegistry::new();
    let partner = Uuid::new_v4();
    let bystander = Uuid::new_v4();

    let partner_hits = Arc::new(AtomicUsize::new(0));
    let bystander_hits = Arc::new(AtomicUsize::new(0));

    {
        let hits = Arc::clone(&partner_hits);
        registry.subscribe(partner, move |event| {
            assert_eq!(event.notification_type, NotificationType::PartnerVerified);
            hits.fetch_add(1, Ordering::SeqCst);
        });
    }
    {
        let hits = Arc::clone(&bystander_hits);
        registry.subscribe(bystander, move |_| {
            hits.fetch_add(1, Ordering::SeqCst);
        });
    }
    // A broken listener must not affect delivery to the others
    registry.subscribe(partner, |_| panic!("listener bug"));

    let event = StatusChangeEvent {
        account_id: partner,
        notification_type: NotificationType::PartnerVerified,
        title: "Your profile has been verified!".to_string(),
        message: None,
        data: serde_json::json!({}),
    };
    registry.notify(partner, &event);

    assert_eq!(partner_hits.load(Ordering::SeqCst), 1);
    assert_eq!(bystander_hits.load(Ordering::SeqCst), 0);
}

#[test]
fn verification_request_broadcast_reaches_all_subscribers() {
    let registry = NotificationRegistry::new();
    let dashboard_a = Uuid::new_v4();
    let dashboard_b = Uuid::new_v4();

    let a_hits = Arc::new(AtomicUsize::new(0));
    let b_hits = Arc::new(AtomicUsize::new(0));

    {
        let hits = Arc::clone(&a_hits);
        registry.subscribe(dashboard_a, move |event| {
            assert_eq!(event.notification_type, NotificationType::System);
            assert!(event.title.contains("Summit Roofing"));
            hits.fetch_add(1, Ordering::SeqCst);
        });
    }
    {
        let hits = Arc::clone(&b_hits);
        registry.subscribe(dashboard_b, move |_| {
            hits.fetch_add(1, Ordering::SeqCst);
        });
    }

    let mut profile = PartnerProfile::new(Uuid::new_v4());
    walk_through_onboarding(&mut profile);
    assert_eq!(
        profile.onboarding_status,
        OnboardingStatus::PendingVerification
    );

    notifications::notify_verification_requested(&registry, &profile);

    assert_eq!(a_hits.load(Ordering::SeqCst), 1);
    assert_eq!(b_hits.load(Ordering::SeqCst), 1);
}

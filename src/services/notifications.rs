//! Notification service
//!
//! Called by route handlers when a status change should reach the partner.
//! Each helper persists an in-app notification row, fans the event out
//! through the in-process registry, and (for partner status changes) kicks
//! off a best-effort email. Failures here are logged, never surfaced to the
//! HTTP caller.

use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::notification::NotificationType;
use crate::domain::partner::PartnerProfile;
use crate::services::mailer::Mailer;
use crate::services::registry::{NotificationRegistry, StatusChangeEvent};

/// Create a notification row for an account
pub async fn create_notification(
    db: &PgPool,
    account_id: Uuid,
    notification_type: NotificationType,
    title: &str,
    message: Option<&str>,
    data: Option<serde_json::Value>,
) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    let data = data.unwrap_or(serde_json::json!({}));

    sqlx::query(
        r#"
        INSERT INTO notifications (id, account_id, type, title, message, data)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(id)
    .bind(account_id)
    .bind(notification_type.as_str())
    .bind(title)
    .bind(message)
    .bind(&data)
    .execute(db)
    .await?;

    tracing::info!(
        account_id = %account_id,
        notification_type = %notification_type,
        notification_id = %id,
        "Notification created"
    );

    Ok(id)
}

/// Persist + dispatch a status-change event for one account
async fn publish(db: &PgPool, registry: &NotificationRegistry, event: StatusChangeEvent) {
    if let Err(e) = create_notification(
        db,
        event.account_id,
        event.notification_type,
        &event.title,
        event.message.as_deref(),
        Some(event.data.clone()),
    )
    .await
    {
        tracing::warn!(error = %e, account_id = %event.account_id, "Failed to persist notification");
    }

    registry.notify(event.account_id, &event);
}

/// Partner verified: in-app notification, registry fan-out, and email
pub async fn notify_partner_verified(
    db: &PgPool,
    registry: &NotificationRegistry,
    mailer: &Mailer,
    account_id: Uuid,
    email: Option<&str>,
    partner_name: &str,
) {
    publish(
        db,
        registry,
        StatusChangeEvent {
            account_id,
            notification_type: NotificationType::PartnerVerified,
            title: "Your profile has been verified!".to_string(),
            message: Some(
                "Congratulations! Your partner profile has been verified. \
                 Clients can now find and book your services."
                    .to_string(),
            ),
            data: serde_json::json!({}),
        },
    )
    .await;

    if let Some(email) = email {
        mailer.send_partner_verified(email.to_string(), partner_name);
    }
}

/// Partner rejected: in-app notification, registry fan-out, and email
pub async fn notify_partner_rejected(
    db: &PgPool,
    registry: &NotificationRegistry,
    mailer: &Mailer,
    account_id: Uuid,
    email: Option<&str>,
    partner_name: &str,
    reason: &str,
) {
    publish(
        db,
        registry,
        StatusChangeEvent {
            account_id,
            notification_type: NotificationType::PartnerRejected,
            title: "Profile verification not approved".to_string(),
            message: Some(format!(
                "Your partner verification was not approved. Reason: {reason}. \
                 Please update your profile and resubmit."
            )),
            data: serde_json::json!({ "reason": reason }),
        },
    )
    .await;

    if let Some(email) = email {
        mailer.send_partner_rejected(email.to_string(), partner_name, reason);
    }
}

/// Document reviewed: in-app notification and registry fan-out, no email
pub async fn notify_document_reviewed(
    db: &PgPool,
    registry: &NotificationRegistry,
    account_id: Uuid,
    document_name: &str,
    approved: bool,
    reason: Option<&str>,
) {
    let (notification_type, title, message) = if approved {
        (
            NotificationType::DocumentApproved,
            format!("Document approved: {document_name}"),
            format!("Your document '{document_name}' has been approved."),
        )
    } else {
        let reason = reason.unwrap_or("not specified");
        (
            NotificationType::DocumentRejected,
            format!("Document rejected: {document_name}"),
            format!(
                "Your document '{document_name}' was rejected. Reason: {reason}. \
                 Please submit a corrected version."
            ),
        )
    };

    publish(
        db,
        registry,
        StatusChangeEvent {
            account_id,
            notification_type,
            title,
            message: Some(message),
            data: serde_json::json!({
                "document_name": document_name,
                "approved": approved,
                "reason": reason,
            }),
        },
    )
    .await;
}

/// Partner entered the review queue: broadcast to every in-process
/// subscriber (admin dashboards listen on the registry). Not persisted;
/// the review queue itself is the durable record.
pub fn notify_verification_requested(registry: &NotificationRegistry, profile: &PartnerProfile) {
    let company = profile
        .basic_info
        .as_ref()
        .map(|b| b.company_name.as_str())
        .unwrap_or("A partner");

    registry.notify_all(&StatusChangeEvent {
        account_id: profile.account_id,
        notification_type: NotificationType::System,
        title: format!("{company} submitted a profile for verification"),
        message: None,
        data: serde_json::json!({ "partner_id": profile.account_id }),
    });
}

/// System notification for one account
pub async fn notify_system(
    db: &PgPool,
    registry: &NotificationRegistry,
    account_id: Uuid,
    title: &str,
    message: &str,
) {
    publish(
        db,
        registry,
        StatusChangeEvent {
            account_id,
            notification_type: NotificationType::System,
            title: title.to_string(),
            message: Some(message.to_string()),
            data: serde_json::json!({}),
        },
    )
    .await;
}

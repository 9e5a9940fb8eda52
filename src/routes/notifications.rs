//! In-app notification routes

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::{DataResponse, Paginated, PaginationParams};
use crate::app::AppState;
use crate::auth::RequireAuth;
use crate::domain::notification::{
    MarkReadRequest, Notification, NotificationResponse, UnreadCountResponse,
};
use crate::error::ApiError;

// Pagination fields stay top-level: flattening a numeric struct into an axum
// Query breaks serde_urlencoded's number parsing.
#[derive(Debug, Deserialize, Default)]
pub struct NotificationQueryParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    #[serde(default)]
    pub unread_only: Option<bool>,
}

impl NotificationQueryParams {
    fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

/// GET /notifications
///
/// List the caller's notifications, newest first.
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NotificationQueryParams>,
    auth: RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let pagination = query.pagination();
    let unread_only = query.unread_only.unwrap_or(false);

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM notifications
        WHERE account_id = $1 AND (NOT $2 OR is_read = false)
        "#,
    )
    .bind(auth.account_id)
    .bind(unread_only)
    .fetch_one(&state.db)
    .await?;

    let rows = sqlx::query_as::<_, Notification>(
        r#"
        SELECT id, account_id, type, title, message, data, is_read, read_at, created_at
        FROM notifications
        WHERE account_id = $1 AND (NOT $2 OR is_read = false)
        ORDER BY created_at DESC
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(auth.account_id)
    .bind(unread_only)
    .bind(pagination.limit())
    .bind(pagination.offset())
    .fetch_all(&state.db)
    .await?;

    let data: Vec<NotificationResponse> = rows.into_iter().map(Into::into).collect();

    Ok(Paginated::new(data, &pagination, total as u64))
}

/// GET /notifications/unread-count
pub async fn unread_count(
    State(state): State<Arc<AppState>>,
    auth: RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM notifications WHERE account_id = $1 AND is_read = false",
    )
    .bind(auth.account_id)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(DataResponse::new(UnreadCountResponse { count })))
}

/// POST /notifications/read
///
/// Mark the given notifications read; without ids, marks all of them.
pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    auth: RequireAuth,
    Json(input): Json<MarkReadRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = match input.notification_ids {
        Some(ids) if !ids.is_empty() => {
            sqlx::query(
                r#"
                UPDATE notifications SET is_read = true, read_at = NOW()
                WHERE account_id = $1 AND id = ANY($2) AND is_read = false
                "#,
            )
            .bind(auth.account_id)
            .bind(&ids)
            .execute(&state.db)
            .await?
        }
        _ => {
            sqlx::query(
                r#"
                UPDATE notifications SET is_read = true, read_at = NOW()
                WHERE account_id = $1 AND is_read = false
                "#,
            )
            .bind(auth.account_id)
            .execute(&state.db)
            .await?
        }
    };

    Ok(Json(serde_json::json!({ "updated": updated.rows_affected() })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::Uri;

    #[test]
    fn query_params_parse_pagination_and_filter() {
        let uri: Uri = "/notifications?page=3&per_page=5&unread_only=true"
            .parse()
            .unwrap();
        let Query(params) = Query::<NotificationQueryParams>::try_from_uri(&uri).unwrap();
        assert_eq!(params.pagination().page(), 3);
        assert_eq!(params.pagination().per_page(), 5);
        assert_eq!(params.unread_only, Some(true));
    }

    #[test]
    fn absent_query_params_fall_back_to_defaults() {
        let uri: Uri = "/notifications".parse().unwrap();
        let Query(params) = Query::<NotificationQueryParams>::try_from_uri(&uri).unwrap();
        let pagination = params.pagination();
        assert_eq!(pagination.page(), 1);
        assert_eq!(pagination.per_page(), 20);
        assert_eq!(params.unread_only, None);
    }
}

use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult, ErrorBody},
    main_lib::AppState,
    models::{Subscription, SubscriptionListResponse, SubscriptionRequest, SummaryResponse},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use subtrack_core::subscriptions::{ListQuery, SummaryQuery, DEFAULT_PAGE, DEFAULT_PAGE_LIMIT};
use utoipa::IntoParams;
use uuid::Uuid;

/// Raw list parameters. Paging values stay text so that garbage falls back to
/// the defaults instead of failing extraction.
#[derive(Deserialize, IntoParams, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// 1-based page number, defaults to 1.
    page: Option<String>,
    /// Page size, defaults to 20.
    limit: Option<String>,
    /// Owner filter, must be a UUID when present.
    user_id: Option<String>,
    service_name: Option<String>,
}

impl ListParams {
    fn into_query(self) -> ApiResult<ListQuery> {
        let user_id = non_empty(self.user_id);
        if let Some(user_id) = &user_id {
            ensure_uuid(user_id)?;
        }
        Ok(ListQuery {
            page: positive_or(self.page.as_deref(), DEFAULT_PAGE),
            limit: positive_or(self.limit.as_deref(), DEFAULT_PAGE_LIMIT),
            user_id,
            service_name: non_empty(self.service_name),
        })
    }
}

#[derive(Deserialize, IntoParams, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct SummaryParams {
    /// `MM-YYYY`, required.
    start_date: Option<String>,
    /// `MM-YYYY`; omit for an open range.
    end_date: Option<String>,
}

fn positive_or(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn ensure_uuid(user_id: &str) -> ApiResult<()> {
    Uuid::parse_str(user_id)
        .map(|_| ())
        .map_err(|_| ApiError::BadRequest(format!("invalid user_id: {}", user_id)))
}

#[utoipa::path(
    post,
    path = "/api/subscriptions",
    request_body = SubscriptionRequest,
    responses(
        (status = 201, body = Subscription),
        (status = 400, body = ErrorBody),
        (status = 500, body = ErrorBody)
    )
)]
pub async fn create_subscription(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SubscriptionRequest>,
) -> ApiResult<(StatusCode, Json<Subscription>)> {
    let created = state
        .subscription_service
        .create_subscription(payload.into())
        .await?;
    tracing::info!(id = %created.id, user_id = %created.user_id, "Subscription created");
    Ok((StatusCode::CREATED, Json(Subscription::from(created))))
}

#[utoipa::path(
    get,
    path = "/api/subscriptions",
    params(ListParams),
    responses(
        (status = 200, body = SubscriptionListResponse),
        (status = 400, body = ErrorBody),
        (status = 404, body = ErrorBody)
    )
)]
pub async fn list_subscriptions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<SubscriptionListResponse>> {
    let page = state
        .subscription_service
        .list_subscriptions(params.into_query()?)?;
    Ok(Json(SubscriptionListResponse::from(page)))
}

#[utoipa::path(
    get,
    path = "/api/subscriptions/{id}",
    params(("id" = String, Path, description = "Subscription id")),
    responses((status = 200, body = Subscription), (status = 404, body = ErrorBody))
)]
pub async fn get_subscription(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Subscription>> {
    let subscription = state.subscription_service.get_subscription(&id)?;
    Ok(Json(Subscription::from(subscription)))
}

#[utoipa::path(
    put,
    path = "/api/subscriptions/{id}",
    params(("id" = String, Path, description = "Subscription id")),
    request_body = SubscriptionRequest,
    responses(
        (status = 200, body = Subscription),
        (status = 400, body = ErrorBody),
        (status = 404, body = ErrorBody)
    )
)]
pub async fn update_subscription(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SubscriptionRequest>,
) -> ApiResult<Json<Subscription>> {
    let updated = state
        .subscription_service
        .update_subscription(payload.into_update(id))
        .await?;
    tracing::info!(id = %updated.id, "Subscription updated");
    Ok(Json(Subscription::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/subscriptions/{id}",
    params(("id" = String, Path, description = "Subscription id")),
    responses((status = 204), (status = 404, body = ErrorBody))
)]
pub async fn delete_subscription(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.subscription_service.delete_subscription(&id).await?;
    tracing::info!(id = %id, "Subscription deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/subscriptions/summary/{user_id}/{service_name}",
    params(
        ("user_id" = String, Path, description = "Owner UUID"),
        ("service_name" = String, Path, description = "Service name"),
        SummaryParams
    ),
    responses((status = 200, body = SummaryResponse), (status = 400, body = ErrorBody))
)]
pub async fn get_summary(
    Path((user_id, service_name)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
    Query(params): Query<SummaryParams>,
) -> ApiResult<Json<SummaryResponse>> {
    ensure_uuid(&user_id)?;
    let start_date = non_empty(params.start_date)
        .ok_or_else(|| ApiError::BadRequest("start_date is required".to_string()))?;

    let summary = state.subscription_service.get_summary(SummaryQuery {
        user_id,
        service_name,
        start_date,
        end_date: non_empty(params.end_date),
    })?;
    Ok(Json(SummaryResponse::from(summary)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/subscriptions",
            get(list_subscriptions).post(create_subscription),
        )
        .route(
            "/api/subscriptions/{id}",
            get(get_subscription)
                .put(update_subscription)
                .delete(delete_subscription),
        )
        .route(
            "/api/subscriptions/summary/{user_id}/{service_name}",
            get(get_summary),
        )
}

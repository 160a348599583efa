use serde::{Deserialize, Serialize};
use subtrack_core::subscriptions as core_subscriptions;
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct Subscription {
    pub id: String,
    pub service_name: String,
    pub price: i32,
    pub user_id: String,
    /// Billing month, `MM-YYYY`.
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl From<core_subscriptions::Subscription> for Subscription {
    fn from(s: core_subscriptions::Subscription) -> Self {
        Self {
            id: s.id,
            service_name: s.service_name,
            price: s.price,
            user_id: s.user_id,
            start_date: s.start_date,
            end_date: s.end_date,
        }
    }
}

/// Body of both create and update requests. On update the id comes from the path.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct SubscriptionRequest {
    pub service_name: String,
    pub price: i32,
    pub user_id: String,
    /// `MM-YYYY` or `YYYY-MM-DD`.
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl From<SubscriptionRequest> for core_subscriptions::NewSubscription {
    fn from(r: SubscriptionRequest) -> Self {
        Self {
            service_name: r.service_name,
            price: r.price,
            user_id: r.user_id,
            start_date: r.start_date,
            end_date: r.end_date,
        }
    }
}

impl SubscriptionRequest {
    pub fn into_update(self, id: String) -> core_subscriptions::SubscriptionUpdate {
        core_subscriptions::SubscriptionUpdate {
            id,
            service_name: self.service_name,
            price: self.price,
            user_id: self.user_id,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct SubscriptionListResponse {
    pub page: i64,
    pub limit: i64,
    pub has_next: bool,
    pub subscriptions: Vec<Subscription>,
}

impl From<core_subscriptions::SubscriptionPage> for SubscriptionListResponse {
    fn from(p: core_subscriptions::SubscriptionPage) -> Self {
        Self {
            page: p.page,
            limit: p.limit,
            has_next: p.has_next,
            subscriptions: p.subscriptions.into_iter().map(Subscription::from).collect(),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct SummaryResponse {
    pub user_id: String,
    pub service_name: String,
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub total_cost: i64,
}

impl From<core_subscriptions::CostSummary> for SummaryResponse {
    fn from(s: core_subscriptions::CostSummary) -> Self {
        Self {
            user_id: s.user_id,
            service_name: s.service_name,
            start_date: s.start_date,
            end_date: s.end_date,
            total_cost: s.total_cost,
        }
    }
}

use async_trait::async_trait;

use super::subscriptions_model::{
    CostSummary, ListQuery, NewSubscription, Subscription, SubscriptionPage, SubscriptionUpdate,
    SummaryQuery,
};
use crate::errors::Result;

/// Trait for subscription persistence.
///
/// Implementations normalize every date through
/// [`billing_month`](super::billing_month) before it reaches storage and
/// render stored dates back to `MM-YYYY` on the way out.
#[async_trait]
pub trait SubscriptionRepositoryTrait: Send + Sync {
    /// Inserts a new row and returns it as persisted, including the assigned id.
    async fn create(&self, new_subscription: NewSubscription) -> Result<Subscription>;

    fn get_by_id(&self, subscription_id: &str) -> Result<Subscription>;

    /// Replaces every column but `id` and returns the row as written.
    /// Fails with `NotFound` when no row has that id.
    async fn update_by_id(&self, update: SubscriptionUpdate) -> Result<Subscription>;

    /// Deletes by id and returns the number of rows removed. Does not report a missing id.
    async fn delete_by_id(&self, subscription_id: &str) -> Result<usize>;

    /// Rows ordered by id. An empty result is reported as `NotFound`.
    fn list(
        &self,
        offset: i64,
        limit: i64,
        user_id: Option<&str>,
        service_name: Option<&str>,
    ) -> Result<Vec<Subscription>>;

    /// Sum of `price` over the matching rows; zero rows sum to 0.
    fn calculate_summary(
        &self,
        user_id: &str,
        service_name: &str,
        start_date: &str,
        end_date: Option<&str>,
    ) -> Result<i64>;
}

/// Trait for subscription service operations
#[async_trait]
pub trait SubscriptionServiceTrait: Send + Sync {
    async fn create_subscription(&self, new_subscription: NewSubscription) -> Result<Subscription>;
    fn get_subscription(&self, subscription_id: &str) -> Result<Subscription>;
    async fn update_subscription(&self, update: SubscriptionUpdate) -> Result<Subscription>;
    async fn delete_subscription(&self, subscription_id: &str) -> Result<()>;
    fn list_subscriptions(&self, query: ListQuery) -> Result<SubscriptionPage>;
    fn get_summary(&self, query: SummaryQuery) -> Result<CostSummary>;
}

use std::sync::Arc;

use super::subscriptions_model::{
    CostSummary, ListQuery, NewSubscription, Subscription, SubscriptionPage, SubscriptionUpdate,
    SummaryQuery,
};
use super::subscriptions_traits::{SubscriptionRepositoryTrait, SubscriptionServiceTrait};
use crate::errors::Result;

/// Orchestrates the subscription repository: validation, existence checks
/// before deletion, and pagination metadata.
pub struct SubscriptionService {
    repository: Arc<dyn SubscriptionRepositoryTrait>,
}

impl SubscriptionService {
    pub fn new(repository: Arc<dyn SubscriptionRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait::async_trait]
impl SubscriptionServiceTrait for SubscriptionService {
    async fn create_subscription(&self, new_subscription: NewSubscription) -> Result<Subscription> {
        new_subscription.validate()?;
        self.repository.create(new_subscription).await
    }

    fn get_subscription(&self, subscription_id: &str) -> Result<Subscription> {
        self.repository.get_by_id(subscription_id)
    }

    /// The repository writes and returns the row in a single statement, so the
    /// result is the state this call produced even if another writer follows.
    async fn update_subscription(&self, update: SubscriptionUpdate) -> Result<Subscription> {
        update.validate()?;
        self.repository.update_by_id(update).await
    }

    /// Looks the row up first so a missing id surfaces as `NotFound`; the
    /// repository's delete does not distinguish that case.
    async fn delete_subscription(&self, subscription_id: &str) -> Result<()> {
        self.repository.get_by_id(subscription_id)?;
        self.repository.delete_by_id(subscription_id).await?;
        Ok(())
    }

    /// Over-fetches one row to learn whether another page exists without a count query.
    fn list_subscriptions(&self, query: ListQuery) -> Result<SubscriptionPage> {
        query.validate()?;
        let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);

        let mut subscriptions = self.repository.list(
            query.offset(),
            query.limit.saturating_add(1),
            query.user_id.as_deref(),
            query.service_name.as_deref(),
        )?;

        let has_next = subscriptions.len() > limit;
        subscriptions.truncate(limit);

        Ok(SubscriptionPage {
            page: query.page,
            limit: query.limit,
            has_next,
            subscriptions,
        })
    }

    fn get_summary(&self, query: SummaryQuery) -> Result<CostSummary> {
        let end_date = query.end_date.filter(|d| !d.is_empty());
        let total_cost = self.repository.calculate_summary(
            &query.user_id,
            &query.service_name,
            &query.start_date,
            end_date.as_deref(),
        )?;

        Ok(CostSummary {
            user_id: query.user_id,
            service_name: query.service_name,
            start_date: query.start_date,
            end_date,
            total_cost,
        })
    }
}

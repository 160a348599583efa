use async_trait::async_trait;
use diesel::dsl::sum;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use subtrack_core::errors::{Error, Result};
use subtrack_core::subscriptions::billing_month::{normalize_field, normalize_required_field};
use subtrack_core::subscriptions::{
    NewSubscription, Subscription, SubscriptionRepositoryTrait, SubscriptionUpdate,
};

use super::model::{NewSubscriptionDB, SubscriptionChangesetDB, SubscriptionDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::subscriptions;

pub struct SubscriptionRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SubscriptionRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        SubscriptionRepository { pool, writer }
    }
}

fn not_found(subscription_id: &str) -> Error {
    Error::NotFound(format!("subscription {} not found", subscription_id))
}

/// Treats an empty end date the same as an absent one.
fn normalize_end_date(end_date: Option<&str>) -> Result<Option<chrono::NaiveDate>> {
    match end_date {
        Some(text) => normalize_field("end_date", text),
        None => Ok(None),
    }
}

#[async_trait]
impl SubscriptionRepositoryTrait for SubscriptionRepository {
    async fn create(&self, new_subscription: NewSubscription) -> Result<Subscription> {
        let start_date = normalize_required_field("start_date", &new_subscription.start_date)?;
        let end_date = normalize_end_date(new_subscription.end_date.as_deref())?;

        let row = NewSubscriptionDB {
            id: Uuid::now_v7().to_string(),
            service_name: new_subscription.service_name,
            price: new_subscription.price,
            user_id: new_subscription.user_id,
            start_date,
            end_date,
        };

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Subscription> {
                let created = diesel::insert_into(subscriptions::table)
                    .values(&row)
                    .returning(SubscriptionDB::as_returning())
                    .get_result(conn)
                    .into_core("create subscription")?;
                Ok(Subscription::from(created))
            })
            .await
    }

    fn get_by_id(&self, subscription_id: &str) -> Result<Subscription> {
        let mut conn = get_connection(&self.pool)?;
        subscriptions::table
            .find(subscription_id)
            .select(SubscriptionDB::as_select())
            .first::<SubscriptionDB>(&mut conn)
            .optional()
            .into_core("get subscription")?
            .map(Subscription::from)
            .ok_or_else(|| not_found(subscription_id))
    }

    async fn update_by_id(&self, update: SubscriptionUpdate) -> Result<Subscription> {
        let start_date = normalize_required_field("start_date", &update.start_date)?;
        let end_date = normalize_end_date(update.end_date.as_deref())?;

        let subscription_id = update.id;
        let changeset = SubscriptionChangesetDB {
            service_name: update.service_name,
            price: update.price,
            user_id: update.user_id,
            start_date,
            end_date,
        };

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Subscription> {
                diesel::update(subscriptions::table.find(&subscription_id))
                    .set(&changeset)
                    .returning(SubscriptionDB::as_returning())
                    .get_result(conn)
                    .optional()
                    .into_core("update subscription")?
                    .map(Subscription::from)
                    .ok_or_else(|| not_found(&subscription_id))
            })
            .await
    }

    async fn delete_by_id(&self, subscription_id: &str) -> Result<usize> {
        let subscription_id = subscription_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(subscriptions::table.find(subscription_id))
                    .execute(conn)
                    .into_core("delete subscription")
            })
            .await
    }

    fn list(
        &self,
        offset: i64,
        limit: i64,
        user_id: Option<&str>,
        service_name: Option<&str>,
    ) -> Result<Vec<Subscription>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = subscriptions::table
            .select(SubscriptionDB::as_select())
            .into_boxed();
        if let Some(user) = user_id.filter(|u| !u.is_empty()) {
            query = query.filter(subscriptions::user_id.eq(user));
        }
        if let Some(name) = service_name.filter(|n| !n.is_empty()) {
            query = query.filter(subscriptions::service_name.eq(name));
        }

        let rows = query
            .order(subscriptions::id.asc())
            .limit(limit)
            .offset(offset)
            .load::<SubscriptionDB>(&mut conn)
            .into_core("list subscriptions")?;

        if rows.is_empty() {
            return Err(Error::NotFound(
                "no subscriptions match the given filters".to_string(),
            ));
        }
        Ok(rows.into_iter().map(Subscription::from).collect())
    }

    /// Sums `price` over rows for the user and service that start on or after
    /// `start_date`. With an `end_date`, rows must end on or before it or be
    /// open-ended; without one, rows must be open-ended or still running at
    /// `start_date`.
    fn calculate_summary(
        &self,
        user_id: &str,
        service_name: &str,
        start_date: &str,
        end_date: Option<&str>,
    ) -> Result<i64> {
        let range_start = normalize_required_field("start_date", start_date)?;
        let range_end = normalize_end_date(end_date)?;

        let mut conn = get_connection(&self.pool)?;

        let mut query = subscriptions::table
            .select(sum(subscriptions::price))
            .filter(subscriptions::user_id.eq(user_id))
            .filter(subscriptions::service_name.eq(service_name))
            .filter(subscriptions::start_date.ge(range_start))
            .into_boxed();

        query = match range_end {
            Some(range_end) => query.filter(
                subscriptions::end_date
                    .le(range_end)
                    .or(subscriptions::end_date.is_null()),
            ),
            None => query.filter(
                subscriptions::end_date
                    .is_null()
                    .or(subscriptions::end_date.ge(range_start)),
            ),
        };

        let total = query
            .get_result::<Option<i64>>(&mut conn)
            .into_core("calculate summary")?;
        Ok(total.unwrap_or(0))
    }
}

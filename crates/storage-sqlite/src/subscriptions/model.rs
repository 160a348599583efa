//! Database models for subscriptions.

use chrono::NaiveDate;
use diesel::prelude::*;

use subtrack_core::subscriptions::billing_month::format_billing_month;
use subtrack_core::subscriptions::Subscription;

/// Database model for subscriptions
#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::subscriptions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SubscriptionDB {
    pub id: String,
    pub service_name: String,
    pub price: i32,
    pub user_id: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

/// Database model for inserting a subscription. Dates are already normalized.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::subscriptions)]
pub struct NewSubscriptionDB {
    pub id: String,
    pub service_name: String,
    pub price: i32,
    pub user_id: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

/// Full-row update. `None` end date clears the column rather than skipping it.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::subscriptions)]
#[diesel(treat_none_as_null = true)]
pub struct SubscriptionChangesetDB {
    pub service_name: String,
    pub price: i32,
    pub user_id: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

// Conversion to domain models
impl From<SubscriptionDB> for Subscription {
    fn from(db: SubscriptionDB) -> Self {
        Self {
            id: db.id,
            service_name: db.service_name,
            price: db.price,
            user_id: db.user_id,
            start_date: format_billing_month(db.start_date),
            end_date: db.end_date.map(format_billing_month),
        }
    }
}

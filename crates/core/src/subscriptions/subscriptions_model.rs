//! Subscription domain models.

use serde::{Deserialize, Serialize};

use super::subscriptions_constants::{DEFAULT_PAGE, DEFAULT_PAGE_LIMIT};
use crate::errors::{Result, ValidationError};

/// Domain model representing a stored subscription.
///
/// Dates are in display form (`MM-YYYY`). An absent `end_date` marks an
/// ongoing subscription.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subscription {
    pub id: String,
    pub service_name: String,
    pub price: i32,
    pub user_id: String,
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// Input model for creating a new subscription
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewSubscription {
    pub service_name: String,
    pub price: i32,
    pub user_id: String,
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl NewSubscription {
    pub fn validate(&self) -> Result<()> {
        validate_fields(&self.service_name, self.price, &self.user_id, &self.start_date)
    }
}

/// Full-row replacement of an existing subscription. Everything but `id` may change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubscriptionUpdate {
    pub id: String,
    pub service_name: String,
    pub price: i32,
    pub user_id: String,
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl SubscriptionUpdate {
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::MissingField("id".to_string()).into());
        }
        validate_fields(&self.service_name, self.price, &self.user_id, &self.start_date)
    }
}

/// Pagination and filter parameters for listing subscriptions.
///
/// `page` is 1-based. Filters are exact matches; `None` means unfiltered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListQuery {
    pub page: i64,
    pub limit: i64,
    pub user_id: Option<String>,
    pub service_name: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_PAGE_LIMIT,
            user_id: None,
            service_name: None,
        }
    }
}

impl ListQuery {
    pub fn validate(&self) -> Result<()> {
        if self.page < 1 {
            return Err(ValidationError::InvalidInput(format!(
                "page must be at least 1, got {}",
                self.page
            ))
            .into());
        }
        if self.limit < 1 {
            return Err(ValidationError::InvalidInput(format!(
                "limit must be at least 1, got {}",
                self.limit
            ))
            .into());
        }
        if self.checked_offset().is_none() {
            return Err(ValidationError::InvalidInput(format!(
                "page {} with limit {} is out of range",
                self.page, self.limit
            ))
            .into());
        }
        Ok(())
    }

    /// Rows to skip. Saturates when `page * limit` does not fit, which
    /// [`validate`](Self::validate) rejects up front.
    pub fn offset(&self) -> i64 {
        self.checked_offset().unwrap_or(i64::MAX)
    }

    fn checked_offset(&self) -> Option<i64> {
        self.page.checked_sub(1)?.checked_mul(self.limit)
    }
}

/// One page of subscriptions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubscriptionPage {
    pub page: i64,
    pub limit: i64,
    pub has_next: bool,
    pub subscriptions: Vec<Subscription>,
}

/// Parameters of a cost summary. Dates are external text (`MM-YYYY`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SummaryQuery {
    pub user_id: String,
    pub service_name: String,
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// Total cost of the subscriptions matched by a [`SummaryQuery`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CostSummary {
    pub user_id: String,
    pub service_name: String,
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub total_cost: i64,
}

fn validate_fields(service_name: &str, price: i32, user_id: &str, start_date: &str) -> Result<()> {
    if service_name.trim().is_empty() {
        return Err(ValidationError::MissingField("service_name".to_string()).into());
    }
    if user_id.trim().is_empty() {
        return Err(ValidationError::MissingField("user_id".to_string()).into());
    }
    if start_date.trim().is_empty() {
        return Err(ValidationError::MissingField("start_date".to_string()).into());
    }
    if price < 0 {
        return Err(
            ValidationError::InvalidInput(format!("price must not be negative, got {price}"))
                .into(),
        );
    }
    Ok(())
}

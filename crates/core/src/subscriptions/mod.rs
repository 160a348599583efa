//! Subscriptions module - domain models, billing-month arithmetic, services, and traits.

pub mod billing_month;
mod subscriptions_constants;
mod subscriptions_model;
mod subscriptions_service;
mod subscriptions_traits;

#[cfg(test)]
mod subscriptions_service_tests;

// Re-export the public interface
pub use subscriptions_constants::*;
pub use subscriptions_model::{
    CostSummary, ListQuery, NewSubscription, Subscription, SubscriptionPage, SubscriptionUpdate,
    SummaryQuery,
};
pub use subscriptions_service::SubscriptionService;
pub use subscriptions_traits::{SubscriptionRepositoryTrait, SubscriptionServiceTrait};

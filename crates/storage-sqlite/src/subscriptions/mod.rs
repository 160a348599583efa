//! SQLite storage implementation for subscriptions.

mod model;
mod repository;

pub use model::{NewSubscriptionDB, SubscriptionChangesetDB, SubscriptionDB};
pub use repository::SubscriptionRepository;

#[cfg(test)]
mod tests {
    use crate::errors::{Error, Result};
    use crate::subscriptions::billing_month::{format_billing_month, normalize_field};
    use crate::subscriptions::{
        ListQuery, NewSubscription, Subscription, SubscriptionRepositoryTrait,
        SubscriptionService, SubscriptionServiceTrait, SubscriptionUpdate, SummaryQuery,
    };
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    type ConcurrentWrite = Box<dyn FnOnce(&mut Vec<Subscription>) + Send>;

    // --- Mock SubscriptionRepository ---
    #[derive(Default)]
    struct MockSubscriptionRepository {
        rows: Mutex<Vec<Subscription>>,
        next_id: AtomicUsize,
        delete_calls: AtomicUsize,
        list_calls: Mutex<Vec<(i64, i64, Option<String>, Option<String>)>>,
        summary_calls: Mutex<Vec<(String, String, String, Option<String>)>>,
        summary_total: i64,
        /// Applied right after an update commits, standing in for another writer.
        after_update: Mutex<Option<ConcurrentWrite>>,
    }

    impl MockSubscriptionRepository {
        fn new() -> Self {
            Self::default()
        }

        fn with_summary_total(total: i64) -> Self {
            Self {
                summary_total: total,
                ..Self::default()
            }
        }

        fn display(field: &'static str, text: &str) -> Result<Option<String>> {
            Ok(normalize_field(field, text)?.map(format_billing_month))
        }
    }

    #[async_trait]
    impl SubscriptionRepositoryTrait for MockSubscriptionRepository {
        async fn create(&self, new_subscription: NewSubscription) -> Result<Subscription> {
            let start_date = Self::display("start_date", &new_subscription.start_date)?
                .unwrap_or_default();
            let end_date = match new_subscription.end_date.as_deref() {
                Some(text) => Self::display("end_date", text)?,
                None => None,
            };
            let id = format!("sub-{:03}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
            let row = Subscription {
                id,
                service_name: new_subscription.service_name,
                price: new_subscription.price,
                user_id: new_subscription.user_id,
                start_date,
                end_date,
            };
            self.rows.lock().unwrap().push(row.clone());
            Ok(row)
        }

        fn get_by_id(&self, subscription_id: &str) -> Result<Subscription> {
            self.rows
                .lock()
                .unwrap()
                .iter()
                .find(|s| s.id == subscription_id)
                .cloned()
                .ok_or_else(|| Error::NotFound(format!("subscription {}", subscription_id)))
        }

        async fn update_by_id(&self, update: SubscriptionUpdate) -> Result<Subscription> {
            let start_date = Self::display("start_date", &update.start_date)?.unwrap_or_default();
            let end_date = match update.end_date.as_deref() {
                Some(text) => Self::display("end_date", text)?,
                None => None,
            };
            let mut rows = self.rows.lock().unwrap();
            let row = rows
                .iter_mut()
                .find(|s| s.id == update.id)
                .ok_or_else(|| Error::NotFound(format!("subscription {}", update.id)))?;
            row.service_name = update.service_name;
            row.price = update.price;
            row.user_id = update.user_id;
            row.start_date = start_date;
            row.end_date = end_date;
            let written = row.clone();

            if let Some(concurrent_write) = self.after_update.lock().unwrap().take() {
                concurrent_write(&mut rows);
            }
            Ok(written)
        }

        async fn delete_by_id(&self, subscription_id: &str) -> Result<usize> {
            self.delete_calls.fetch_add(1, Ordering::SeqCst);
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|s| s.id != subscription_id);
            Ok(before - rows.len())
        }

        fn list(
            &self,
            offset: i64,
            limit: i64,
            user_id: Option<&str>,
            service_name: Option<&str>,
        ) -> Result<Vec<Subscription>> {
            self.list_calls.lock().unwrap().push((
                offset,
                limit,
                user_id.map(str::to_string),
                service_name.map(str::to_string),
            ));
            let mut matching: Vec<Subscription> = self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|s| user_id.map_or(true, |u| s.user_id == u))
                .filter(|s| service_name.map_or(true, |n| s.service_name == n))
                .cloned()
                .collect();
            matching.sort_by(|a, b| a.id.cmp(&b.id));
            let page: Vec<Subscription> = matching
                .into_iter()
                .skip(offset as usize)
                .take(limit as usize)
                .collect();
            if page.is_empty() {
                return Err(Error::NotFound("no subscriptions match the filter".to_string()));
            }
            Ok(page)
        }

        fn calculate_summary(
            &self,
            user_id: &str,
            service_name: &str,
            start_date: &str,
            end_date: Option<&str>,
        ) -> Result<i64> {
            self.summary_calls.lock().unwrap().push((
                user_id.to_string(),
                service_name.to_string(),
                start_date.to_string(),
                end_date.map(str::to_string),
            ));
            Ok(self.summary_total)
        }
    }

    fn new_subscription(user_id: &str, service_name: &str, start_date: &str) -> NewSubscription {
        NewSubscription {
            service_name: service_name.to_string(),
            price: 400,
            user_id: user_id.to_string(),
            start_date: start_date.to_string(),
            end_date: None,
        }
    }

    fn service_with(repo: Arc<MockSubscriptionRepository>) -> SubscriptionService {
        SubscriptionService::new(repo)
    }

    async fn seed(service: &SubscriptionService, user_id: &str, count: usize) {
        for _ in 0..count {
            service
                .create_subscription(new_subscription(user_id, "Yandex Plus", "07-2025"))
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_create_returns_persisted_row() {
        let repo = Arc::new(MockSubscriptionRepository::new());
        let service = service_with(repo.clone());

        let created = service
            .create_subscription(NewSubscription {
                end_date: Some("12-2025".to_string()),
                ..new_subscription("user-1", "Yandex Plus", "07-2025")
            })
            .await
            .unwrap();

        assert!(!created.id.is_empty());
        assert_eq!(created.start_date, "07-2025");
        assert_eq!(created.end_date.as_deref(), Some("12-2025"));
        assert_eq!(service.get_subscription(&created.id).unwrap(), created);
    }

    #[tokio::test]
    async fn test_create_without_end_date_is_open_ended() {
        let service = service_with(Arc::new(MockSubscriptionRepository::new()));
        let created = service
            .create_subscription(NewSubscription {
                end_date: Some(String::new()),
                ..new_subscription("user-1", "Yandex Plus", "07-2025")
            })
            .await
            .unwrap();
        assert_eq!(created.end_date, None);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input_before_storage() {
        let repo = Arc::new(MockSubscriptionRepository::new());
        let service = service_with(repo.clone());

        let err = service
            .create_subscription(NewSubscription {
                price: -5,
                ..new_subscription("user-1", "Yandex Plus", "07-2025")
            })
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
        assert!(repo.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_surfaces_invalid_format_unchanged() {
        let service = service_with(Arc::new(MockSubscriptionRepository::new()));
        let err = service
            .create_subscription(new_subscription("user-1", "Yandex Plus", "13-2025"))
            .await
            .unwrap_err();
        assert!(err.is_invalid_format());
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let service = service_with(Arc::new(MockSubscriptionRepository::new()));
        assert!(service.get_subscription("missing").unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_delete_missing_reports_not_found_without_deleting() {
        let repo = Arc::new(MockSubscriptionRepository::new());
        let service = service_with(repo.clone());

        let err = service.delete_subscription("missing").await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(repo.delete_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_delete_existing_removes_row() {
        let repo = Arc::new(MockSubscriptionRepository::new());
        let service = service_with(repo.clone());
        let created = service
            .create_subscription(new_subscription("user-1", "Yandex Plus", "07-2025"))
            .await
            .unwrap();

        service.delete_subscription(&created.id).await.unwrap();

        assert_eq!(repo.delete_calls.load(Ordering::SeqCst), 1);
        assert!(service.get_subscription(&created.id).unwrap_err().is_not_found());
        // a second delete hits the existence check again
        assert!(service
            .delete_subscription(&created.id)
            .await
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn test_update_returns_written_state() {
        let service = service_with(Arc::new(MockSubscriptionRepository::new()));
        let created = service
            .create_subscription(new_subscription("user-1", "Yandex Plus", "07-2025"))
            .await
            .unwrap();

        let updated = service
            .update_subscription(SubscriptionUpdate {
                id: created.id.clone(),
                service_name: "Yandex Plus Multi".to_string(),
                price: 650,
                user_id: created.user_id.clone(),
                start_date: "08-2025".to_string(),
                end_date: Some("2026-01-15".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.service_name, "Yandex Plus Multi");
        assert_eq!(updated.price, 650);
        assert_eq!(updated.start_date, "08-2025");
        assert_eq!(updated.end_date.as_deref(), Some("01-2026"));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let service = service_with(Arc::new(MockSubscriptionRepository::new()));
        let err = service
            .update_subscription(SubscriptionUpdate {
                id: "missing".to_string(),
                service_name: "Netflix".to_string(),
                price: 1,
                user_id: "user-1".to_string(),
                start_date: "01-2025".to_string(),
                end_date: None,
            })
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_concurrent_write_after_update_is_detectable() {
        let repo = Arc::new(MockSubscriptionRepository::new());
        let service = service_with(repo.clone());
        let created = service
            .create_subscription(new_subscription("user-1", "Yandex Plus", "07-2025"))
            .await
            .unwrap();

        let target = created.id.clone();
        *repo.after_update.lock().unwrap() = Some(Box::new(move |rows: &mut Vec<Subscription>| {
            if let Some(row) = rows.iter_mut().find(|s| s.id == target) {
                row.price = 1;
            }
        }));

        let updated = service
            .update_subscription(SubscriptionUpdate {
                id: created.id.clone(),
                service_name: created.service_name.clone(),
                price: 500,
                user_id: created.user_id.clone(),
                start_date: created.start_date.clone(),
                end_date: None,
            })
            .await
            .unwrap();
        let reread = service.get_subscription(&created.id).unwrap();

        // The update reports what it wrote; the later read exposes the other writer.
        assert_eq!(updated.price, 500);
        assert_eq!(reread.price, 1);
        assert_ne!(updated, reread);
    }

    #[tokio::test]
    async fn test_list_has_next_when_more_rows_than_limit() {
        let repo = Arc::new(MockSubscriptionRepository::new());
        let service = service_with(repo.clone());
        seed(&service, "user-1", 3).await;

        let page = service
            .list_subscriptions(ListQuery {
                page: 1,
                limit: 2,
                user_id: Some("user-1".to_string()),
                service_name: None,
            })
            .unwrap();

        assert_eq!(page.subscriptions.len(), 2);
        assert!(page.has_next);
        assert_eq!(
            repo.list_calls.lock().unwrap()[0],
            (0, 3, Some("user-1".to_string()), None)
        );
    }

    #[tokio::test]
    async fn test_list_without_next_when_rows_equal_limit() {
        let service = service_with(Arc::new(MockSubscriptionRepository::new()));
        seed(&service, "user-1", 2).await;

        let page = service
            .list_subscriptions(ListQuery {
                page: 1,
                limit: 2,
                user_id: Some("user-1".to_string()),
                service_name: None,
            })
            .unwrap();

        assert_eq!(page.subscriptions.len(), 2);
        assert!(!page.has_next);
    }

    #[tokio::test]
    async fn test_list_second_page_uses_offset() {
        let repo = Arc::new(MockSubscriptionRepository::new());
        let service = service_with(repo.clone());
        seed(&service, "user-1", 3).await;

        let page = service
            .list_subscriptions(ListQuery {
                page: 2,
                limit: 2,
                ..ListQuery::default()
            })
            .unwrap();

        assert_eq!(page.page, 2);
        assert_eq!(page.subscriptions.len(), 1);
        assert_eq!(page.subscriptions[0].id, "sub-003");
        assert!(!page.has_next);
        assert_eq!(repo.list_calls.lock().unwrap()[0].0, 2);
    }

    #[tokio::test]
    async fn test_list_with_no_matches_is_not_found() {
        let service = service_with(Arc::new(MockSubscriptionRepository::new()));
        seed(&service, "user-1", 1).await;

        let err = service
            .list_subscriptions(ListQuery {
                user_id: Some("someone-else".to_string()),
                ..ListQuery::default()
            })
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[test]
    fn test_list_rejects_zero_limit_before_storage() {
        let repo = Arc::new(MockSubscriptionRepository::new());
        let service = service_with(repo.clone());
        let err = service
            .list_subscriptions(ListQuery {
                limit: 0,
                ..ListQuery::default()
            })
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(repo.list_calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_summary_echoes_query_and_total() {
        let repo = Arc::new(MockSubscriptionRepository::with_summary_total(2396));
        let service = service_with(repo.clone());

        let summary = service
            .get_summary(SummaryQuery {
                user_id: "user-1".to_string(),
                service_name: "Netflix".to_string(),
                start_date: "01-2024".to_string(),
                end_date: Some("12-2024".to_string()),
            })
            .unwrap();

        assert_eq!(summary.total_cost, 2396);
        assert_eq!(summary.service_name, "Netflix");
        assert_eq!(summary.end_date.as_deref(), Some("12-2024"));
    }

    #[test]
    fn test_summary_treats_empty_end_date_as_open() {
        let repo = Arc::new(MockSubscriptionRepository::new());
        let service = service_with(repo.clone());

        let summary = service
            .get_summary(SummaryQuery {
                user_id: "user-1".to_string(),
                service_name: "Netflix".to_string(),
                start_date: "01-2024".to_string(),
                end_date: Some(String::new()),
            })
            .unwrap();

        assert_eq!(summary.total_cost, 0);
        assert_eq!(summary.end_date, None);
        assert_eq!(repo.summary_calls.lock().unwrap()[0].3, None);
    }
}

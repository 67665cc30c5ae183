//! Pulls fresh lists from the backend into the cache.

use std::cell::RefCell;

use futures_util::join;

use crate::api::{ApiClient, ApiResult, ExpenseFilter, Transport};
use crate::cache::DataCache;
use crate::storage::KeyValueStore;

/// Fetches expenses and categories concurrently and applies both before
/// returning, so aggregation never sees one list without the other.
/// Whatever succeeded is applied even when the other call failed.
pub async fn refresh_all<T: Transport, S: KeyValueStore>(
    api: &ApiClient<T, S>,
    cache: &RefCell<DataCache>,
    filter: &ExpenseFilter,
) -> ApiResult<()> {
    let (expense_ticket, category_ticket) = {
        let mut cache = cache.borrow_mut();
        (cache.begin_fetch(), cache.begin_fetch())
    };

    let (expenses, categories) = join!(api.list_expenses(filter), api.list_categories());

    let mut cache = cache.borrow_mut();
    let mut logged_out = false;
    let mut failure = None;
    match expenses {
        Ok(Some(list)) => {
            cache.apply_expenses(expense_ticket, list);
        }
        Ok(None) => logged_out = true,
        Err(err) => failure = Some(err),
    }
    match categories {
        Ok(Some(list)) => {
            cache.apply_categories(category_ticket, list);
        }
        Ok(None) => logged_out = true,
        Err(err) => failure = failure.or(Some(err)),
    }

    if logged_out {
        cache.clear();
        return Ok(None);
    }
    match failure {
        Some(err) => Err(err),
        None => Ok(Some(())),
    }
}

pub async fn refresh_expenses<T: Transport, S: KeyValueStore>(
    api: &ApiClient<T, S>,
    cache: &RefCell<DataCache>,
    filter: &ExpenseFilter,
) -> ApiResult<()> {
    let ticket = cache.borrow_mut().begin_fetch();
    let Some(expenses) = api.list_expenses(filter).await? else {
        return Ok(None);
    };
    cache.borrow_mut().apply_expenses(ticket, expenses);
    Ok(Some(()))
}

pub async fn refresh_categories<T: Transport, S: KeyValueStore>(
    api: &ApiClient<T, S>,
    cache: &RefCell<DataCache>,
) -> ApiResult<()> {
    let ticket = cache.borrow_mut().begin_fetch();
    let Some(categories) = api.list_categories().await? else {
        return Ok(None);
    };
    cache.borrow_mut().apply_categories(ticket, categories);
    Ok(Some(()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::MockTransport;
    use crate::api::Method;
    use crate::config::AppConfig;
    use crate::error::ApiError;
    use crate::models::{Session, User};
    use crate::session::SessionStore;
    use crate::storage::MemoryStorage;
    use futures::executor::block_on;
    use rust_decimal::Decimal;
    use std::rc::Rc;

    const EXPENSES: &str = r#"[
        {"id":1,"amount":50,"description":"Groceries","date":"2024-03-01","categoryId":1},
        {"id":2,"amount":30,"description":"Dinner","date":"2024-04-01","categoryId":1}
    ]"#;
    const CATEGORIES: &str = r#"[{"id":1,"name":"Food"}]"#;

    fn api(transport: MockTransport) -> ApiClient<MockTransport, MemoryStorage> {
        let session = Rc::new(SessionStore::new(MemoryStorage::default()));
        session.save(Session {
            token: "abc123".to_string(),
            user: User {
                username: "alice".to_string(),
            },
        });
        ApiClient::new(AppConfig::default(), transport, session)
    }

    #[test]
    fn refresh_all_fills_both_collections() {
        let api = api(MockTransport::default()
            .route(Method::Get, "/api/expenses", 200, EXPENSES)
            .route(Method::Get, "/api/category/all", 200, CATEGORIES));
        let cache = RefCell::new(DataCache::default());

        assert_eq!(block_on(refresh_all(&api, &cache, &ExpenseFilter::All)), Ok(Some(())));

        let cache = cache.borrow();
        assert_eq!(cache.expenses().len(), 2);
        assert_eq!(cache.category_name(1), "Food");
        assert_eq!(crate::aggregate::total_spend(&cache), Decimal::from(80));
    }

    #[test]
    fn partial_failure_keeps_the_half_that_worked() {
        let api = api(MockTransport::default()
            .fail(Method::Get, "/api/expenses")
            .route(Method::Get, "/api/category/all", 200, CATEGORIES));
        let cache = RefCell::new(DataCache::default());

        let result = block_on(refresh_all(&api, &cache, &ExpenseFilter::All));

        assert!(matches!(result, Err(ApiError::Network(_))));
        assert_eq!(cache.borrow().categories().len(), 1);
        assert!(cache.borrow().expenses().is_empty());
    }

    #[test]
    fn expired_session_aborts_refresh() {
        let api = api(MockTransport::default()
            .route(Method::Get, "/api/expenses", 401, "")
            .route(Method::Get, "/api/category/all", 200, CATEGORIES));
        let cache = RefCell::new(DataCache::default());

        assert_eq!(block_on(refresh_all(&api, &cache, &ExpenseFilter::All)), Ok(None));
        assert!(!api.session().is_authenticated());
        assert!(cache.borrow().categories().is_empty());
    }

    #[test]
    fn filtered_refresh_hits_the_filter_endpoint() {
        let api = api(MockTransport::default().route(
            Method::Get,
            "/api/expenses/category/1",
            200,
            EXPENSES,
        ));
        let cache = RefCell::new(DataCache::default());

        let result = block_on(refresh_expenses(&api, &cache, &ExpenseFilter::Category(1)));

        assert_eq!(result, Ok(Some(())));
        assert_eq!(cache.borrow().expenses().len(), 2);
    }

    #[test]
    fn category_refresh_replaces_previous_list() {
        let api = api(MockTransport::default().route(
            Method::Get,
            "/api/category/all",
            404,
            "Categories not added yet",
        ));
        let cache = RefCell::new(DataCache::with_data(Vec::new(), vec![crate::models::Category {
            id: 5,
            name: "Old".to_string(),
        }]));

        assert_eq!(block_on(refresh_categories(&api, &cache)), Ok(Some(())));
        assert!(cache.borrow().categories().is_empty());
    }
}

//! HTTP plumbing: the transport seam, the authenticated request wrapper and
//! typed calls for each backend endpoint.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use async_trait::async_trait;
use chrono::NaiveDate;
use gloo_net::http::Request;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::login::extract_token;
use crate::models::{
    Category, CategoryDraft, CategoryUpdate, Credentials, Expense, ExpenseDraft, ExpenseUpdate,
    Registration, Session, User,
};
use crate::session::SessionStore;
use crate::storage::{BrowserStorage, KeyValueStore};

/// `Ok(None)` means the call hit a 401: the session is gone and the caller
/// should stop quietly.
pub type ApiResult<T> = Result<Option<T>, ApiError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

#[cfg(test)]
impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body).map_err(|err| ApiError::Decode(err.to_string()))
    }
}

#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Browser `fetch` through gloo-net.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlooTransport;

#[async_trait(?Send)]
impl Transport for GlooTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut builder = match request.method {
            Method::Get => Request::get(&request.url),
            Method::Post => Request::post(&request.url),
            Method::Put => Request::put(&request.url),
            Method::Delete => Request::delete(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let sent = match request.body {
            Some(body) => builder
                .body(body)
                .map_err(|err| ApiError::Network(err.to_string()))?
                .send()
                .await,
            None => builder.send().await,
        };
        let response = sent.map_err(|err| ApiError::Network(err.to_string()))?;

        // An unreadable body is treated as empty so callers fall back to
        // their generic message.
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Ok(HttpResponse { status, body })
    }
}

/// Which list endpoint to read expenses from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExpenseFilter {
    All,
    Category(i64),
    DateRange { start: NaiveDate, end: NaiveDate },
}

impl ExpenseFilter {
    /// Builds a filter from the raw filter-bar inputs. A complete date range
    /// wins over a category; half a range is ignored.
    pub fn from_inputs(category: &str, date_from: &str, date_to: &str) -> Self {
        let parse = |raw: &str| NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok();
        if let (Some(start), Some(end)) = (parse(date_from), parse(date_to)) {
            return ExpenseFilter::DateRange { start, end };
        }
        match category.trim().parse::<i64>() {
            Ok(id) => ExpenseFilter::Category(id),
            Err(_) => ExpenseFilter::All,
        }
    }

    pub fn path(&self) -> String {
        match self {
            ExpenseFilter::All => "/api/expenses".to_string(),
            ExpenseFilter::Category(id) => format!("/api/expenses/category/{}", id),
            ExpenseFilter::DateRange { start, end } => format!(
                "/api/expenses/date-range?start={}&end={}",
                start.format("%Y-%m-%d"),
                end.format("%Y-%m-%d")
            ),
        }
    }
}

pub struct ApiClient<T: Transport, S: KeyValueStore> {
    config: AppConfig,
    transport: T,
    session: Rc<SessionStore<S>>,
    on_unauthorized: RefCell<Option<Rc<dyn Fn()>>>,
}

pub type BrowserClient = ApiClient<GlooTransport, BrowserStorage>;

impl<T: Transport, S: KeyValueStore> ApiClient<T, S> {
    pub fn new(config: AppConfig, transport: T, session: Rc<SessionStore<S>>) -> Self {
        Self {
            config,
            transport,
            session,
            on_unauthorized: RefCell::new(None),
        }
    }

    pub fn session(&self) -> &SessionStore<S> {
        &self.session
    }

    /// Registers what to do after a 401 has cleared the session.
    pub fn set_unauthorized_hook(&self, hook: impl Fn() + 'static) {
        *self.on_unauthorized.borrow_mut() = Some(Rc::new(hook));
    }

    fn json_headers(&self, authenticated: bool) -> Vec<(String, String)> {
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        if authenticated {
            if let Some(token) = self.session.token() {
                headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
            }
        }
        headers
    }

    /// Sends one request with the bearer token attached. Non-2xx responses
    /// are returned as-is; a 401 logs the user out and yields `None`.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> ApiResult<HttpResponse> {
        log::debug!("{} {}", method, path);
        let request = HttpRequest {
            method,
            url: self.config.url(path),
            headers: self.json_headers(true),
            body,
        };
        let response = self.transport.send(request).await?;

        if response.status == 401 {
            log::warn!("{} {} was rejected with 401, ending session", method, path);
            self.session.clear();
            let hook = self.on_unauthorized.borrow().clone();
            if let Some(hook) = hook {
                hook();
            }
            return Ok(None);
        }
        Ok(Some(response))
    }

    async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
        fallback: &str,
    ) -> ApiResult<HttpResponse> {
        match self.request(method, path, body).await? {
            None => Ok(None),
            Some(response) if response.ok() => Ok(Some(response)),
            Some(response) => Err(ApiError::from_status(
                response.status,
                &response.body,
                fallback,
            )),
        }
    }

    async fn fetch_json<R: DeserializeOwned>(&self, path: &str, fallback: &str) -> ApiResult<R> {
        match self.call(Method::Get, path, None, fallback).await? {
            Some(response) => response.json().map(Some),
            None => Ok(None),
        }
    }

    async fn send_json(
        &self,
        method: Method,
        path: &str,
        payload: &impl Serialize,
        fallback: &str,
    ) -> ApiResult<()> {
        let body =
            serde_json::to_string(payload).map_err(|err| ApiError::Validation(err.to_string()))?;
        Ok(self
            .call(method, path, Some(body), fallback)
            .await?
            .map(|_| ()))
    }

    pub async fn list_expenses(&self, filter: &ExpenseFilter) -> ApiResult<Vec<Expense>> {
        self.fetch_json(&filter.path(), "Error loading expenses")
            .await
    }

    pub async fn create_expense(&self, draft: &ExpenseDraft) -> ApiResult<()> {
        self.send_json(Method::Post, "/api/expenses", draft, "Operation failed")
            .await
    }

    pub async fn update_expense(&self, id: i64, draft: &ExpenseDraft) -> ApiResult<()> {
        let payload = ExpenseUpdate { id, draft };
        self.send_json(
            Method::Put,
            &format!("/api/expenses/{}", id),
            &payload,
            "Operation failed",
        )
        .await
    }

    pub async fn delete_expense(&self, id: i64) -> ApiResult<()> {
        Ok(self
            .call(
                Method::Delete,
                &format!("/api/expenses/{}", id),
                None,
                "Delete failed",
            )
            .await?
            .map(|_| ()))
    }

    /// Server-side sum for one category.
    pub async fn category_total(&self, category_id: i64) -> ApiResult<Decimal> {
        self.fetch_json(
            &format!("/api/expenses/total/category/{}", category_id),
            "Error loading category total",
        )
        .await
    }

    /// The backend answers 404 instead of `[]` when no category exists yet.
    pub async fn list_categories(&self) -> ApiResult<Vec<Category>> {
        let Some(response) = self.request(Method::Get, "/api/category/all", None).await? else {
            return Ok(None);
        };
        match response.status {
            404 => Ok(Some(Vec::new())),
            _ if response.ok() => response.json().map(Some),
            status => Err(ApiError::from_status(
                status,
                &response.body,
                "Error loading categories",
            )),
        }
    }

    pub async fn create_category(&self, draft: &CategoryDraft) -> ApiResult<()> {
        self.send_json(Method::Post, "/api/category/add", draft, "Operation failed")
            .await
    }

    pub async fn update_category(&self, id: i64, draft: &CategoryDraft) -> ApiResult<()> {
        let payload = CategoryUpdate {
            id,
            name: &draft.name,
        };
        self.send_json(
            Method::Put,
            &format!("/api/category/{}", id),
            &payload,
            "Operation failed",
        )
        .await
    }

    pub async fn delete_category(&self, id: i64) -> ApiResult<()> {
        Ok(self
            .call(
                Method::Delete,
                &format!("/api/category/{}", id),
                None,
                "Failed to delete category",
            )
            .await?
            .map(|_| ()))
    }

    /// Logs in and stores the resulting session. A 401 here means bad
    /// credentials, so it bypasses the session-expiry handling in `request`.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, ApiError> {
        let response = self
            .post_anonymous("/api/auth/login", credentials)
            .await?;
        if !response.ok() {
            return Err(ApiError::from_status(
                response.status,
                &response.body,
                "Login failed",
            ));
        }

        let token = extract_token(&response.body)?;
        let session = Session {
            token,
            user: User {
                username: credentials.username.clone(),
            },
        };
        self.session.save(session.clone());
        log::info!("logged in as {}", session.user.username);
        Ok(session)
    }

    pub async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        let response = self
            .post_anonymous("/api/auth/register", registration)
            .await?;
        if response.ok() {
            Ok(())
        } else {
            Err(ApiError::from_status(
                response.status,
                &response.body,
                "Registration failed",
            ))
        }
    }

    pub fn logout(&self) {
        self.session.clear();
        log::info!("logged out");
    }

    async fn post_anonymous(
        &self,
        path: &str,
        payload: &impl Serialize,
    ) -> Result<HttpResponse, ApiError> {
        let body =
            serde_json::to_string(payload).map_err(|err| ApiError::Validation(err.to_string()))?;
        log::debug!("POST {}", path);
        self.transport
            .send(HttpRequest {
                method: Method::Post,
                url: self.config.url(path),
                headers: self.json_headers(false),
                body: Some(body),
            })
            .await
    }
}


#[cfg(test)]
mod tests {
    use super::testing::MockTransport;
    use super::*;
    use crate::models::Role;
    use crate::storage::MemoryStorage;
    use futures::executor::block_on;
    use rstest::rstest;
    use std::cell::Cell;

    fn client(transport: MockTransport) -> ApiClient<MockTransport, MemoryStorage> {
        let session = Rc::new(SessionStore::new(MemoryStorage::default()));
        ApiClient::new(AppConfig::default(), transport, session)
    }

    fn logged_in(transport: MockTransport) -> ApiClient<MockTransport, MemoryStorage> {
        let api = client(transport);
        api.session().save(Session {
            token: "abc123".to_string(),
            user: User {
                username: "alice".to_string(),
            },
        });
        api
    }

    #[test]
    fn attaches_bearer_token_and_json_content_type() {
        let api = logged_in(MockTransport::default().route(Method::Get, "/api/expenses", 200, "[]"));

        let expenses = block_on(api.list_expenses(&ExpenseFilter::All)).unwrap();
        assert_eq!(expenses, Some(Vec::new()));

        let sent = api.transport.requests.borrow();
        assert_eq!(sent[0].header("authorization"), Some("Bearer abc123"));
        assert_eq!(sent[0].header("Content-Type"), Some("application/json"));
    }

    #[test]
    fn no_authorization_header_without_session() {
        let api = client(MockTransport::default().route(Method::Get, "/api/expenses", 200, "[]"));
        block_on(api.list_expenses(&ExpenseFilter::All)).unwrap();
        assert_eq!(api.transport.requests.borrow()[0].header("Authorization"), None);
    }

    #[test]
    fn unauthorized_clears_session_and_fires_hook() {
        let api = logged_in(MockTransport::default().route(Method::Get, "/api/expenses", 401, ""));
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        api.set_unauthorized_hook(move || flag.set(true));

        let result = block_on(api.list_expenses(&ExpenseFilter::All));

        assert_eq!(result, Ok(None));
        assert!(fired.get());
        assert!(!api.session().is_authenticated());
        assert_eq!(api.session().restore(), None);
    }

    #[test]
    fn non_success_surfaces_body_or_fallback() {
        let api = logged_in(
            MockTransport::default()
                .route(Method::Delete, "/api/expenses/3", 404, "Expense not found")
                .route(Method::Delete, "/api/expenses/4", 500, ""),
        );

        let err = block_on(api.delete_expense(3)).unwrap_err();
        assert_eq!(err.user_message(), "Expense not found");

        let err = block_on(api.delete_expense(4)).unwrap_err();
        assert_eq!(err.user_message(), "Delete failed");
        assert!(api.session().is_authenticated());
    }

    #[test]
    fn raw_request_returns_non_success_untouched() {
        let api = logged_in(MockTransport::default().route(Method::Get, "/api/expenses", 500, "boom"));
        let response = block_on(api.request(Method::Get, "/api/expenses", None))
            .unwrap()
            .unwrap();
        assert_eq!(response.status, 500);
        assert_eq!(response.body, "boom");
    }

    #[test]
    fn network_failure_is_reported() {
        let api = logged_in(MockTransport::default().fail(Method::Get, "/api/category/all"));
        let err = block_on(api.list_categories()).unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }

    #[test]
    fn missing_categories_mean_empty_list() {
        let api = logged_in(MockTransport::default().route(
            Method::Get,
            "/api/category/all",
            404,
            "Categories not added yet",
        ));
        assert_eq!(block_on(api.list_categories()), Ok(Some(Vec::new())));
    }

    #[test]
    fn update_category_sends_id_and_name() {
        let api = logged_in(MockTransport::default().route(Method::Put, "/api/category/2", 200, "{}"));
        let draft = CategoryDraft {
            name: "Travel".to_string(),
        };
        assert_eq!(block_on(api.update_category(2, &draft)), Ok(Some(())));

        let sent = api.transport.requests.borrow();
        let body: serde_json::Value =
            serde_json::from_str(sent[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"id": 2, "name": "Travel"}));
    }

    #[test]
    fn category_total_parses_plain_number() {
        let api = logged_in(MockTransport::default().route(
            Method::Get,
            "/api/expenses/total/category/1",
            200,
            "80.50",
        ));
        assert_eq!(
            block_on(api.category_total(1)),
            Ok(Some(Decimal::new(8050, 2)))
        );
    }

    #[test]
    fn login_with_jwt_field_saves_session() {
        let api = client(MockTransport::default().route(
            Method::Post,
            "/api/auth/login",
            200,
            r#"{"jwt":"abc123"}"#,
        ));
        let credentials = Credentials {
            username: "alice".to_string(),
            password: "pw".to_string(),
        };

        let session = block_on(api.login(&credentials)).unwrap();

        assert_eq!(session.token, "abc123");
        assert_eq!(api.session().restore(), Some(session));
    }

    #[test]
    fn login_with_plain_text_token() {
        let api = client(MockTransport::default().route(Method::Post, "/api/auth/login", 200, "abc123"));
        let credentials = Credentials {
            username: "alice".to_string(),
            password: "pw".to_string(),
        };
        assert_eq!(block_on(api.login(&credentials)).unwrap().token, "abc123");
    }

    #[test]
    fn login_rejection_is_an_error_not_a_logout() {
        let api = client(MockTransport::default().route(
            Method::Post,
            "/api/auth/login",
            401,
            "Invalid credentials!",
        ));
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        api.set_unauthorized_hook(move || flag.set(true));

        let credentials = Credentials {
            username: "alice".to_string(),
            password: "wrong".to_string(),
        };
        let err = block_on(api.login(&credentials)).unwrap_err();

        assert_eq!(err.user_message(), "Invalid credentials!");
        assert!(!fired.get());
    }

    #[test]
    fn login_with_unknown_shape_fails() {
        let api = client(MockTransport::default().route(
            Method::Post,
            "/api/auth/login",
            200,
            r#"{"a":"1","b":"2"}"#,
        ));
        let credentials = Credentials {
            username: "alice".to_string(),
            password: "pw".to_string(),
        };
        let err = block_on(api.login(&credentials)).unwrap_err();
        assert_eq!(err.user_message(), "Invalid response format from server");
        assert!(!api.session().is_authenticated());
    }

    #[test]
    fn register_conflict_shows_server_text() {
        let api = client(MockTransport::default().route(
            Method::Post,
            "/api/auth/register",
            409,
            "User already exists!",
        ));
        let registration = Registration {
            username: "alice".to_string(),
            password: "pw".to_string(),
            role: Role::User,
        };
        let err = block_on(api.register(&registration)).unwrap_err();
        assert_eq!(err.user_message(), "User already exists!");
    }

    #[rstest]
    #[case(200)]
    #[case(204)]
    fn delete_category_accepts_empty_success(#[case] status: u16) {
        let api = logged_in(MockTransport::default().route(Method::Delete, "/api/category/2", status, ""));
        assert_eq!(block_on(api.delete_category(2)), Ok(Some(())));
    }

    #[test]
    fn delete_category_failure_without_body_uses_fallback() {
        let api = logged_in(MockTransport::default().route(Method::Delete, "/api/category/2", 500, ""));
        let err = block_on(api.delete_category(2)).unwrap_err();
        assert_eq!(err.user_message(), "Failed to delete category");
    }

    #[rstest]
    #[case(500, "", "Error loading expenses")]
    #[case(400, "Invalid date range", "Invalid date range")]
    #[case(200, "<html>", "Invalid response format from server")]
    fn list_failures_carry_a_displayable_message(
        #[case] status: u16,
        #[case] body: &str,
        #[case] shown: &str,
    ) {
        let api = logged_in(MockTransport::default().route(Method::Get, "/api/expenses", status, body));
        let err = block_on(api.list_expenses(&ExpenseFilter::All)).unwrap_err();
        assert_eq!(err.user_message(), shown);
    }

    #[test]
    fn filter_prefers_complete_date_range() {
        assert_eq!(
            ExpenseFilter::from_inputs("3", "2024-01-01", "2024-01-31").path(),
            "/api/expenses/date-range?start=2024-01-01&end=2024-01-31"
        );
        assert_eq!(
            ExpenseFilter::from_inputs("3", "2024-01-01", "").path(),
            "/api/expenses/category/3"
        );
        assert_eq!(ExpenseFilter::from_inputs("", "", "").path(), "/api/expenses");
    }
}

//! Router-level tests: every request goes through the full middleware stack
//! with an in-memory database behind it.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt; // for oneshot

use finsense_api::{app_router, ApiConfig, AppState};
use finsense_db::{Database, DbConfig};

struct TestApp {
    app: Router,
    state: Arc<AppState>,
}

impl TestApp {
    async fn new() -> Self {
        Self::with_config(ApiConfig::default()).await
    }

    async fn with_config(config: ApiConfig) -> Self {
        let db = Database::new(DbConfig::in_memory())
            .await
            .expect("in-memory database");
        let state = Arc::new(AppState::new(db, config).expect("app state"));
        TestApp {
            app: app_router(state.clone()),
            state,
        }
    }

    fn token(&self, user_id: &str) -> String {
        self.state.jwt.generate_access_token(user_id).unwrap()
    }

    async fn call(
        &self,
        method: Method,
        uri: &str,
        user: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            req = req.header(header::AUTHORIZATION, format!("Bearer {}", self.token(user)));
        }
        let req = match body {
            Some(body) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => req.body(Body::empty()).unwrap(),
        };

        let res = self.app.clone().oneshot(req).await.expect("request failed");
        let status = res.status();
        let bytes = to_bytes(res.into_body(), 1024 * 1024)
            .await
            .expect("body read failed");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()))
        };
        (status, value)
    }
}

const ALICE: &str = "user-alice";
const BOB: &str = "user-bob";

// =============================================================================
// Public routes and auth
// =============================================================================

#[tokio::test]
async fn health_checks_database() {
    let t = TestApp::new().await;
    let (status, body) = t.call(Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("OK".to_string()));
}

#[tokio::test]
async fn categories_are_public() {
    let t = TestApp::new().await;
    let (status, body) = t.call(Method::GET, "/api/categories", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["income"].as_array().unwrap().contains(&json!("Salary")));
    assert!(body["expense"].as_array().unwrap().contains(&json!("Food")));
    assert!(!body["palette"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn api_routes_require_a_valid_token() {
    let t = TestApp::new().await;

    let (status, body) = t.call(Method::GET, "/api/transactions", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let req = Request::builder()
        .uri("/api/summary")
        .header(header::AUTHORIZATION, "Bearer not-a-jwt")
        .body(Body::empty())
        .unwrap();
    let res = t.app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn cors_preflight_allows_any_origin() {
    let t = TestApp::new().await;
    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/coach")
        .header(header::ORIGIN, "https://app.example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization,content-type")
        .body(Body::empty())
        .unwrap();

    let res = t.app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

// =============================================================================
// Transactions
// =============================================================================

fn expense(category: &str, amount: i64, date: &str, description: &str) -> Value {
    json!({
        "type": "expense",
        "amountCents": amount,
        "category": category,
        "description": description,
        "date": date,
    })
}

#[tokio::test]
async fn transaction_crud_and_filters() {
    let t = TestApp::new().await;

    let (status, groceries) = t
        .call(
            Method::POST,
            "/api/transactions",
            Some(ALICE),
            Some(expense("Food", 45_000, "2024-03-10", "Groceries")),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(groceries["type"], "expense");
    assert_eq!(groceries["amountCents"], 45_000);

    let salary = json!({
        "type": "income",
        "amountCents": 5_000_000,
        "category": "Salary",
        "date": "2024-03-01",
    });
    let (status, _) = t
        .call(Method::POST, "/api/transactions", Some(ALICE), Some(salary))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, all) = t.call(Method::GET, "/api/transactions", Some(ALICE), None).await;
    assert_eq!(all.as_array().unwrap().len(), 2);
    // Newest date first
    assert_eq!(all[0]["category"], "Food");

    let (_, expenses) = t
        .call(Method::GET, "/api/transactions?type=expense", Some(ALICE), None)
        .await;
    assert_eq!(expenses.as_array().unwrap().len(), 1);

    let (_, found) = t
        .call(Method::GET, "/api/transactions?q=GROC", Some(ALICE), None)
        .await;
    assert_eq!(found.as_array().unwrap().len(), 1);

    let id = groceries["id"].as_str().unwrap();
    let (status, replaced) = t
        .call(
            Method::PUT,
            &format!("/api/transactions/{id}"),
            Some(ALICE),
            Some(expense("Food", 52_000, "2024-03-10", "Groceries and snacks")),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["amountCents"], 52_000);
    assert_eq!(replaced["id"], groceries["id"]);

    // Another user's row behaves as missing
    let (status, body) = t
        .call(Method::DELETE, &format!("/api/transactions/{id}"), Some(BOB), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, _) = t
        .call(Method::DELETE, &format!("/api/transactions/{id}"), Some(ALICE), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, bob_list) = t.call(Method::GET, "/api/transactions", Some(BOB), None).await;
    assert!(bob_list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn invalid_transaction_is_rejected_before_storage() {
    let t = TestApp::new().await;

    let (status, body) = t
        .call(
            Method::POST,
            "/api/transactions",
            Some(ALICE),
            Some(expense("Food", -100, "2024-03-10", "")),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = t
        .call(
            Method::POST,
            "/api/transactions",
            Some(ALICE),
            Some(expense("  ", 100, "2024-03-10", "")),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, all) = t.call(Method::GET, "/api/transactions", Some(ALICE), None).await;
    assert!(all.as_array().unwrap().is_empty());
}

// =============================================================================
// Budgets
// =============================================================================

#[tokio::test]
async fn duplicate_budget_category_conflicts() {
    let t = TestApp::new().await;
    let budget = json!({ "category": "Food", "limitCents": 30_000 });

    let (status, created) = t
        .call(Method::POST, "/api/budgets", Some(ALICE), Some(budget.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["period"], "monthly");
    assert!(created["color"].as_str().unwrap().starts_with('#'));

    let (status, body) = t
        .call(Method::POST, "/api/budgets", Some(ALICE), Some(budget.clone()))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    // Categories are unique per user only
    let (status, _) = t
        .call(Method::POST, "/api/budgets", Some(BOB), Some(budget))
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn budget_overview_uses_requested_month() {
    let t = TestApp::new().await;

    t.call(
        Method::POST,
        "/api/budgets",
        Some(ALICE),
        Some(json!({ "category": "Food", "limitCents": 30_000 })),
    )
    .await;
    t.call(
        Method::POST,
        "/api/transactions",
        Some(ALICE),
        Some(expense("Food", 45_000, "2024-03-10", "Groceries")),
    )
    .await;

    let (status, march) = t
        .call(Method::GET, "/api/budgets/overview?date=2024-03-15", Some(ALICE), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(march["overBudgetCount"], 1);
    assert_eq!(march["totalSpent"], 45_000);
    assert_eq!(march["statuses"][0]["overBy"], 15_000);
    assert_eq!(march["statuses"][0]["percentUsed"], 100.0);

    let (_, april) = t
        .call(Method::GET, "/api/budgets/overview?date=2024-04-02", Some(ALICE), None)
        .await;
    assert_eq!(april["overBudgetCount"], 0);
    assert_eq!(april["totalSpent"], 0);
}

#[tokio::test]
async fn budget_update_and_delete() {
    let t = TestApp::new().await;
    let (_, created) = t
        .call(
            Method::POST,
            "/api/budgets",
            Some(ALICE),
            Some(json!({ "category": "Bills", "limitCents": 80_000 })),
        )
        .await;
    let id = created["id"].as_str().unwrap();

    let (status, updated) = t
        .call(
            Method::PUT,
            &format!("/api/budgets/{id}"),
            Some(ALICE),
            Some(json!({ "limitCents": 90_000, "period": "weekly" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["limitCents"], 90_000);
    assert_eq!(updated["period"], "weekly");
    assert_eq!(updated["color"], created["color"]);

    let (status, _) = t
        .call(
            Method::PUT,
            &format!("/api/budgets/{id}"),
            Some(ALICE),
            Some(json!({ "limitCents": 0 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = t
        .call(Method::DELETE, &format!("/api/budgets/{id}"), Some(ALICE), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = t
        .call(Method::DELETE, &format!("/api/budgets/{id}"), Some(ALICE), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Goals
// =============================================================================

#[tokio::test]
async fn goal_progress_completes_goal() {
    let t = TestApp::new().await;

    let (status, goal) = t
        .call(
            Method::POST,
            "/api/goals",
            Some(ALICE),
            Some(json!({ "title": "Emergency fund", "targetCents": 100_000 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(goal["status"], "active");
    let id = goal["id"].as_str().unwrap();

    let (status, body) = t
        .call(
            Method::PATCH,
            &format!("/api/goals/{id}/progress"),
            Some(ALICE),
            Some(json!({ "currentCents": -1 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, done) = t
        .call(
            Method::PATCH,
            &format!("/api/goals/{id}/progress"),
            Some(ALICE),
            Some(json!({ "currentCents": 100_000 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["status"], "completed");

    t.call(
        Method::POST,
        "/api/goals",
        Some(ALICE),
        Some(json!({ "title": "New laptop", "targetCents": 80_000, "currentCents": 20_000 })),
    )
    .await;

    let (_, overview) = t.call(Method::GET, "/api/goals/overview", Some(ALICE), None).await;
    assert_eq!(overview["activeCount"], 1);
    assert_eq!(overview["completedCount"], 1);
    assert_eq!(overview["totalTarget"], 80_000);
    assert_eq!(overview["totalSaved"], 20_000);
}

#[tokio::test]
async fn goal_update_and_missing_goal() {
    let t = TestApp::new().await;
    let (_, goal) = t
        .call(
            Method::POST,
            "/api/goals",
            Some(ALICE),
            Some(json!({ "title": "Trip", "targetCents": 50_000 })),
        )
        .await;
    let id = goal["id"].as_str().unwrap();

    let (status, updated) = t
        .call(
            Method::PUT,
            &format!("/api/goals/{id}"),
            Some(ALICE),
            Some(json!({ "title": "Goa trip", "status": "cancelled" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Goa trip");
    assert_eq!(updated["status"], "cancelled");

    let (status, _) = t
        .call(
            Method::PATCH,
            "/api/goals/does-not-exist/progress",
            Some(ALICE),
            Some(json!({ "currentCents": 10 })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = t
        .call(Method::DELETE, &format!("/api/goals/{id}"), Some(ALICE), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

// =============================================================================
// Profile
// =============================================================================

#[tokio::test]
async fn profile_is_created_on_first_read() {
    let t = TestApp::new().await;

    let (status, profile) = t.call(Method::GET, "/api/profile", Some(ALICE), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["currency"], "INR");
    assert_eq!(profile["monthlyIncomeCents"], 0);

    let (status, updated) = t
        .call(
            Method::PUT,
            "/api/profile",
            Some(ALICE),
            Some(json!({ "fullName": "Alice", "monthlyIncomeCents": 6_000_000 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["fullName"], "Alice");
    assert_eq!(updated["monthlyIncomeCents"], 6_000_000);
    assert_eq!(updated["id"], profile["id"]);

    let (status, _) = t
        .call(
            Method::PUT,
            "/api/profile",
            Some(ALICE),
            Some(json!({ "currency": "rupees" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Summary and dashboard
// =============================================================================

#[tokio::test]
async fn empty_user_scores_fifty() {
    let t = TestApp::new().await;

    let (status, summary) = t
        .call(Method::GET, "/api/summary?date=2024-03-15", Some(ALICE), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["healthScore"], 50);
    assert_eq!(summary["totalIncome"], 0);
    assert_eq!(summary["monthlyIncome"], 0);

    // Reading the summary does not create a profile
    assert!(t.state.db.profiles().get(ALICE).await.unwrap().is_none());
}

#[tokio::test]
async fn dashboard_combines_summary_and_charts() {
    let t = TestApp::new().await;

    t.call(
        Method::POST,
        "/api/transactions",
        Some(ALICE),
        Some(json!({
            "type": "income",
            "amountCents": 100_000,
            "category": "Salary",
            "date": "2024-03-14",
        })),
    )
    .await;
    t.call(
        Method::POST,
        "/api/transactions",
        Some(ALICE),
        Some(expense("Food", 20_000, "2024-03-15", "Lunch")),
    )
    .await;
    t.call(
        Method::POST,
        "/api/transactions",
        Some(ALICE),
        Some(expense("Transport", 5_000, "2024-03-15", "Metro")),
    )
    .await;
    // Previous month, outside the summary
    t.call(
        Method::POST,
        "/api/transactions",
        Some(ALICE),
        Some(expense("Shopping", 99_000, "2024-02-28", "Shoes")),
    )
    .await;

    let (status, dash) = t
        .call(Method::GET, "/api/dashboard?date=2024-03-15", Some(ALICE), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    // savings 75% of income caps at +25, no budgets or goals: 50 + 25
    assert_eq!(dash["summary"]["healthScore"], 75);
    assert_eq!(dash["healthLabel"], "good");
    assert_eq!(dash["summary"]["totalExpenses"], 25_000);
    assert_eq!(dash["summary"]["totalSavings"], 75_000);

    let daily = dash["daily"].as_array().unwrap();
    assert_eq!(daily.len(), 7);
    assert_eq!(daily[6]["date"], "2024-03-15");
    assert_eq!(daily[6]["expenses"], 25_000);
    assert_eq!(daily[5]["income"], 100_000);

    let top = dash["topCategories"].as_array().unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0]["category"], "Food");
}

#[tokio::test]
async fn dashboard_at_calendar_start_does_not_fail() {
    let t = TestApp::new().await;

    let (status, dash) = t
        .call(Method::GET, "/api/dashboard?date=-262143-01-02", Some(ALICE), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let daily = dash["daily"].as_array().unwrap();
    assert!(!daily.is_empty() && daily.len() < 7);
    assert_eq!(daily.last().unwrap()["date"], dash["date"]);
}

// =============================================================================
// Chat transcript
// =============================================================================

#[tokio::test]
async fn chat_exchange_round_trip() {
    let t = TestApp::new().await;

    let (status, stored) = t
        .call(
            Method::POST,
            "/api/chat/messages",
            Some(ALICE),
            Some(json!({ "user": "  How do I save?  ", "assistant": "Start small." })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(stored[0]["role"], "user");
    assert_eq!(stored[0]["content"], "How do I save?");
    assert_eq!(stored[1]["role"], "assistant");

    let (status, body) = t
        .call(
            Method::POST,
            "/api/chat/messages",
            Some(ALICE),
            Some(json!({ "user": "   ", "assistant": "ignored" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (_, transcript) = t.call(Method::GET, "/api/chat/messages", Some(ALICE), None).await;
    let transcript = transcript.as_array().unwrap();
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[1]["content"], "Start small.");

    let (_, other) = t.call(Method::GET, "/api/chat/messages", Some(BOB), None).await;
    assert!(other.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn chat_reply_is_stored_verbatim() {
    let t = TestApp::new().await;
    let reply = "\n- Cut dining out\n- Automate savings\n";

    let (status, stored) = t
        .call(
            Method::POST,
            "/api/chat/messages",
            Some(ALICE),
            Some(json!({ "user": "tips?", "assistant": reply })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(stored[1]["content"], reply);

    // A stream that ended without content still completes the exchange
    let (status, stored) = t
        .call(
            Method::POST,
            "/api/chat/messages",
            Some(ALICE),
            Some(json!({ "user": "anything else?", "assistant": "" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(stored[1]["content"], "");

    let (_, transcript) = t.call(Method::GET, "/api/chat/messages", Some(ALICE), None).await;
    let transcript = transcript.as_array().unwrap();
    assert_eq!(transcript.len(), 4);
    assert_eq!(transcript[1]["content"], reply);
    assert_eq!(transcript[3]["content"], "");
}

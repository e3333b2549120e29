use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use gastoweb_api::{create_router, AppState};
use gastoweb_config::Config;
use gastoweb_core::{ExpenseBook, SortKey, UiMode};
use gastoweb_store::MemoryKeyValueStore;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceExt;

async fn app() -> (Router, AppState) {
    let mut config = Config::default();
    config.search.debounce_ms = 20;
    let store = Arc::new(MemoryKeyValueStore::new());
    let book = ExpenseBook::hydrate(store, &config).await;
    let state = AppState { book: Arc::new(RwLock::new(book)), config };
    (create_router(state.clone()), state)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).header("hx-request", "true").body(Body::empty()).unwrap()
}

fn post(uri: &str, form: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("hx-request", "true")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

async fn text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_health() {
    let (router, _) = app().await;
    let response = router.oneshot(get("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(text(response).await, "OK");
}

#[tokio::test]
async fn test_api_expense_not_found() {
    let (router, _) = app().await;
    let response = router.oneshot(get("/api/expenses/99")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = serde_json::from_str(&text(response).await).unwrap();
    assert!(body["error"].as_str().unwrap().contains("99"));
}

#[tokio::test]
async fn test_api_expenses_sorted() {
    let (router, state) = app().await;
    let response = router.oneshot(get("/api/expenses?sort=gasto&dir=asc")).await.unwrap();
    let body: serde_json::Value = serde_json::from_str(&text(response).await).unwrap();

    let ids: Vec<u64> = body["items"].as_array().unwrap().iter().map(|r| r["id"].as_u64().unwrap()).collect();
    assert_eq!(ids, vec![1, 3, 2]);
    assert_eq!(body["total_count"], 3);
    // JSON reads leave the screen query alone
    assert_eq!(state.book.read().await.query().sort_key, SortKey::CreadoEl);
}

#[tokio::test]
async fn test_invalid_draft_is_rejected() {
    let (router, state) = app().await;
    router.clone().oneshot(get("/expenses/form/toggle")).await.unwrap();

    let response = router
        .oneshot(post("/expenses", "medio=Taxi&gasto=0&calificacion=3&tiempoDemora=5"))
        .await
        .unwrap();
    let html = text(response).await;

    assert!(html.contains("El gasto debe ser mayor a 0."));
    let book = state.book.read().await;
    assert_eq!(book.records().len(), 3);
    assert!(book.mode().is_form_open());
}

#[tokio::test]
async fn test_create_expense() {
    let (router, state) = app().await;
    let response = router
        .oneshot(post(
            "/expenses",
            "medio=App+%28Uber%2FCabify%29&anotaciones=Aeropuerto&zona=Norte&tiempoDemora=40&gasto=5200%2C50&calificacion=4",
        ))
        .await
        .unwrap();
    let html = text(response).await;

    assert!(html.contains("<div id='expense-list' hx-swap-oob='true'>"));
    assert!(html.contains("Gasto guardado."));
    assert!(html.contains("$ 5.200,50"));

    let book = state.book.read().await;
    let first = &book.records()[0];
    assert_eq!(first.id, 4);
    assert_eq!(first.zona, "Norte");
    assert_eq!(book.mode(), UiMode::Browsing);
}

#[tokio::test]
async fn test_delete_needs_confirm() {
    let (router, state) = app().await;

    let html = text(router.clone().oneshot(post("/expenses/1/delete", "")).await.unwrap()).await;
    assert!(html.contains("Sí, borrar"));
    assert!(state.book.read().await.record(1).is_some());

    let html = text(router.clone().oneshot(post("/confirm", "")).await.unwrap()).await;
    assert!(html.contains("Registro eliminado."));
    assert!(state.book.read().await.record(1).is_none());
}

#[tokio::test]
async fn test_confirm_without_pending_delete() {
    let (router, state) = app().await;
    let response = router.oneshot(post("/confirm", "")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = text(response).await;
    assert!(!html.contains("Registro eliminado."));
    assert_eq!(state.book.read().await.records().len(), 3);
}

#[tokio::test]
async fn test_cancel_delete() {
    let (router, state) = app().await;
    router.clone().oneshot(post("/expenses/2/delete", "")).await.unwrap();
    router.clone().oneshot(post("/confirm/cancel", "")).await.unwrap();

    let book = state.book.read().await;
    assert!(book.record(2).is_some());
    assert_eq!(book.mode(), UiMode::Browsing);
}

#[tokio::test]
async fn test_delete_unknown_is_404() {
    let (router, _) = app().await;
    let response = router.oneshot(post("/expenses/77/delete", "")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_superseded_by_later_keystroke() {
    let (router, state) = app().await;

    let (first, second) = tokio::join!(
        router.clone().oneshot(get("/expenses/search?q=ta")),
        router.clone().oneshot(get("/expenses/search?q=cordoba")),
    );

    assert_eq!(first.unwrap().status(), StatusCode::NO_CONTENT);
    let html = text(second.unwrap()).await;
    assert!(html.contains("Nueva Córdoba"));
    assert!(!html.contains("Centro"));
    assert_eq!(state.book.read().await.query().text, "cordoba");
}

#[tokio::test]
async fn test_list_page_size_and_nav() {
    let (router, state) = app().await;
    let html = text(router.clone().oneshot(get("/expenses/list?limit=3")).await.unwrap()).await;
    assert!(html.contains("Página 1 de 1"));

    // 7 is not an allowed size
    router.clone().oneshot(get("/expenses/list?limit=7&nav=next")).await.unwrap();
    let book = state.book.read().await;
    assert_eq!(book.query().page_size, 3);
    assert_eq!(book.query().page, 1);
}

#[tokio::test]
async fn test_auth_flow_remembers_email() {
    let (router, _) = app().await;

    let html = text(
        router
            .clone()
            .oneshot(post("/auth", "tab=login&email=ana%40mail.com&password=abc"))
            .await
            .unwrap(),
    )
    .await;
    assert!(html.contains("Sesión iniciada"));
    assert!(html.contains("window.location.href = '/app'"));

    let html = text(router.oneshot(get("/")).await.unwrap()).await;
    assert!(html.contains("value='ana@mail.com'"));
}

#[tokio::test]
async fn test_auth_rejects_email_without_at() {
    let (router, _) = app().await;
    let html = text(router.oneshot(post("/auth", "tab=login&email=ana&password=abc")).await.unwrap()).await;
    assert!(html.contains("Ingresá un email válido."));
    assert!(!html.contains("/app"));
}

#[tokio::test]
async fn test_auth_check_enables_button() {
    let (router, _) = app().await;
    let html = text(router.clone().oneshot(post("/auth/check", "tab=login&email=a&password=ab")).await.unwrap()).await;
    assert!(html.contains("disabled"));
    let html = text(router.oneshot(post("/auth/check", "tab=login&email=a&password=abc")).await.unwrap()).await;
    assert!(!html.contains("disabled"));
}

#[tokio::test]
async fn test_app_page() {
    let (router, _) = app().await;
    let full = Request::builder().uri("/app").body(Body::empty()).unwrap();
    let html = text(router.clone().oneshot(full).await.unwrap()).await;
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("Cerrar sesión"));
    assert!(html.contains("Nuevo gasto"));

    let html = text(router.oneshot(get("/app")).await.unwrap()).await;
    assert!(!html.contains("<!DOCTYPE html>"));
}

#[tokio::test]
async fn test_help_modal() {
    let (router, state) = app().await;
    let html = text(router.clone().oneshot(get("/help")).await.unwrap()).await;
    assert!(html.contains("Entendido"));
    assert_eq!(state.book.read().await.mode(), UiMode::Help);

    router.oneshot(post("/help/close", "")).await.unwrap();
    assert_eq!(state.book.read().await.mode(), UiMode::Browsing);
}

#[tokio::test]
async fn test_toast_dismiss() {
    let (router, _) = app().await;
    router.clone().oneshot(post("/expenses/3/delete", "")).await.unwrap();
    router.clone().oneshot(post("/confirm", "")).await.unwrap();

    let html = text(router.clone().oneshot(get("/toast")).await.unwrap()).await;
    assert!(html.contains("Registro eliminado."));

    let html = text(router.oneshot(post("/toast/dismiss", "")).await.unwrap()).await;
    assert_eq!(html, "<div id='toast-slot'></div>");
}

#[tokio::test]
async fn test_settings_and_summary() {
    let (router, _) = app().await;
    let body: serde_json::Value =
        serde_json::from_str(&text(router.clone().oneshot(get("/api/settings")).await.unwrap()).await).unwrap();
    assert_eq!(body["server"]["port"], 8082);
    assert_eq!(body["search"]["debounce_ms"], 20);

    let body: serde_json::Value =
        serde_json::from_str(&text(router.oneshot(get("/api/summary")).await.unwrap()).await).unwrap();
    assert_eq!(body["total_records"], 3);
}

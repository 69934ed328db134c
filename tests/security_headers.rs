use actix_web::{test, App};
use postplan::routes::config;
use postplan::{AppConfig, AppState, InMemPostStore, SecurityHeaders};
use std::sync::Arc;

fn state() -> actix_web::web::Data<AppState> {
    actix_web::web::Data::new(AppState { repo: Arc::new(InMemPostStore::new()) })
}

#[actix_web::test]
async fn test_security_headers_present() {
    let app = test::init_service(
        App::new()
            .wrap(SecurityHeaders::from_config(&AppConfig::default()))
            .app_data(state())
            .configure(config)
    ).await;
    let req = test::TestRequest::get().uri("/api/v1/platforms").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let headers = resp.headers();
    assert!(headers.get("content-security-policy").is_some());
    assert_eq!(headers.get("referrer-policy").unwrap(), "no-referrer");
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert!(headers.get("strict-transport-security").is_none()); // not enabled
}

#[actix_web::test]
async fn test_hsts_enabled_via_config() {
    let cfg = AppConfig { enable_hsts: true, ..AppConfig::default() };
    let app = test::init_service(
        App::new()
            .wrap(SecurityHeaders::from_config(&cfg))
            .app_data(state())
            .configure(config)
    ).await;
    let req = test::TestRequest::get().uri("/api/v1/platforms").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.headers().get("strict-transport-security").is_some(), "HSTS header missing");
}

#[actix_web::test]
async fn test_error_responses_carry_headers_too() {
    let app = test::init_service(
        App::new()
            .wrap(SecurityHeaders::default().with_hsts(true))
            .app_data(state())
            .configure(config)
    ).await;
    let req = test::TestRequest::get().uri("/api/v1/posts/404").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
    assert_eq!(resp.headers().get("x-frame-options").unwrap(), "DENY");
    assert!(resp.headers().get("strict-transport-security").is_some());
}

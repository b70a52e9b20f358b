//! HTTP API tests driving the router with in-memory stores

mod helpers;

use axum::http::{Method, StatusCode};
use serde_json::json;

use fivemgolf::models::Role;
use helpers::*;

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new().await;
    let (status, body) = ctx.request(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["checks"]["courses_loaded"], 13);
}

#[tokio::test]
async fn test_missing_token_is_localized() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.request(Method::GET, "/api/admin/quotations", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "unauthorized");
    assert_eq!(body["error"]["message"], "로그인이 필요합니다.");

    let (_, body) = ctx.request(Method::GET, "/api/admin/quotations?lang=en", None, None).await;
    assert_eq!(body["error"]["message"], "Please sign in.");

    let (_, body) = ctx
        .send(Method::GET, "/api/admin/quotations", &[("accept-language", "ja-JP,ja;q=0.9")], None, None)
        .await;
    assert_eq!(body["error"]["message"], "ログインしてください。");
}

#[tokio::test]
async fn test_role_permissions() {
    let ctx = TestContext::new().await;
    let (_, course_token) = ctx.seed_user("course@5mgolf.com", Role::CourseAdmin).await;
    let (_, user_token) = ctx.seed_user("member@5mgolf.com", Role::User).await;

    let (status, _) = ctx.request(Method::GET, "/api/admin/quotations", Some(&course_token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = ctx.request(Method::GET, "/api/admin/deposits?lang=en", Some(&course_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["message"], "You do not have permission to do that.");

    let (status, _) = ctx.request(Method::GET, "/api/admin/quotations", Some(&user_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = ctx.request(Method::GET, "/api/admin/quotations", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_flow() {
    let ctx = TestContext::new().await;
    ctx.seed_user("site@5mgolf.com", Role::SiteAdmin).await;

    let (status, body) = ctx
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "Site@5mgolf.com", "password": TEST_PASSWORD})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["role"], "site_admin");

    let token = body["data"]["token"].as_str().unwrap().to_string();
    let (status, _) = ctx.request(Method::GET, "/api/admin/deposits", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "site@5mgolf.com", "password": "wrong-password"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_quotation_lifecycle() {
    let ctx = TestContext::new().await;
    let (_, token) = ctx.seed_user("course@5mgolf.com", Role::CourseAdmin).await;

    let (status, body) = ctx
        .request(Method::POST, "/api/admin/quotations", Some(&token), Some(quotation_body(8)))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "draft");
    assert_eq!(body["data"]["fees"]["golf"], 112_000);
    assert_eq!(body["data"]["fees"]["total"], 122_000);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = ctx
        .request(Method::PUT, &format!("/api/admin/quotations/{}", id), Some(&token), Some(quotation_body(4)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["fees"]["golf_discount"], 0);

    let (status, _) = ctx
        .request(
            Method::PATCH,
            &format!("/api/admin/quotations/{}/status", id),
            Some(&token),
            Some(json!({"status": "completed"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = ctx
        .request(Method::PUT, &format!("/api/admin/quotations/{}", id), Some(&token), Some(quotation_body(2)))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "invalid_state");

    let (status, body) = ctx
        .request(Method::GET, "/api/admin/quotations?status=completed", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = ctx
        .request(Method::DELETE, &format!("/api/admin/quotations/{}", id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = ctx
        .request(Method::GET, &format!("/api/admin/quotations/{}", id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_withdrawals_and_locations() {
    let ctx = TestContext::new().await;
    let (_, token) = ctx.seed_user("site@5mgolf.com", Role::SiteAdmin).await;

    let (status, body) = ctx
        .request(
            Method::POST,
            "/api/admin/withdrawals",
            Some(&token),
            Some(json!({
                "amount": 500_000,
                "requested_on": "2024-10-05",
                "bank_name": "Shinhan",
                "account_holder": "5MGOLF",
                "account_number": "110-222-333333",
                "memo": "Course settlement"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = ctx
        .request(
            Method::PATCH,
            &format!("/api/admin/withdrawals/{}/status", id),
            Some(&token),
            Some(json!({"status": "approved"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "approved");

    let (status, _) = ctx
        .request(
            Method::POST,
            "/api/admin/withdrawals",
            Some(&token),
            Some(json!({
                "amount": 0,
                "requested_on": "2024-10-05",
                "bank_name": "Shinhan",
                "account_holder": "5MGOLF",
                "account_number": "110-222-333333"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    for (name, order) in [("Miyazaki", 2), ("Fukuoka", 1)] {
        let (status, _) = ctx
            .request(
                Method::POST,
                "/api/admin/locations",
                Some(&token),
                Some(json!({"name": name, "country": "JP", "region": "Kyushu", "sort_order": order})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }
    let (_, body) = ctx.request(Method::GET, "/api/admin/locations", Some(&token), None).await;
    assert_eq!(body["data"][0]["name"], "Fukuoka");
    assert_eq!(body["data"][1]["name"], "Miyazaki");
}

#[tokio::test]
async fn test_manual_deposit_and_status() {
    let ctx = TestContext::new().await;
    let (_, token) = ctx.seed_user("site@5mgolf.com", Role::SiteAdmin).await;

    let (status, body) = ctx
        .request(
            Method::POST,
            "/api/admin/deposits",
            Some(&token),
            Some(json!({
                "amount": 250_000,
                "deposited_at": "2024-10-01T10:00:00Z",
                "depositor_name": "Kim Hyunwoo",
                "memo": null
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["source"], "manual");
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = ctx
        .request(
            Method::PATCH,
            &format!("/api/admin/deposits/{}/status", id),
            Some(&token),
            Some(json!({"status": "confirmed"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "confirmed");

    let (_, body) = ctx.request(Method::GET, "/api/admin/deposits?status=pending", Some(&token), None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_user_management() {
    let ctx = TestContext::new().await;
    let (site, site_token) = ctx.seed_user("site@5mgolf.com", Role::SiteAdmin).await;
    let (_, super_token) = ctx.seed_user("owner@5mgolf.com", Role::SuperAdmin).await;

    let (status, body) = ctx
        .request(
            Method::POST,
            "/api/users",
            Some(&site_token),
            Some(json!({
                "email": "partner@5mgolf.com",
                "display_name": "Partner Course",
                "role": "course_admin",
                "course_id": "miyazaki-phoenix"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["data"]["generated_password"].as_str().unwrap().len() >= 8);
    let partner_uid = body["data"]["user"]["uid"].as_str().unwrap().to_string();

    // site admins cannot grant admin roles
    let (status, _) = ctx
        .request(
            Method::POST,
            "/api/users",
            Some(&site_token),
            Some(json!({"email": "admin2@5mgolf.com", "display_name": "Admin", "role": "site_admin"})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = ctx
        .request(
            Method::POST,
            "/api/users",
            Some(&super_token),
            Some(json!({"email": "partner@5mgolf.com", "display_name": "Again", "role": "user"})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = ctx.request(Method::GET, "/api/admin/users?role=course_admin", Some(&site_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = ctx
        .request(
            Method::PATCH,
            &format!("/api/admin/users/{}", partner_uid),
            Some(&site_token),
            Some(json!({"active": false})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["active"], false);

    let (status, _) = ctx
        .request(Method::DELETE, &format!("/api/admin/users/{}", site.uid), Some(&site_token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = ctx
        .request(Method::DELETE, &format!("/api/admin/users/{}", partner_uid), Some(&site_token), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_deactivated_admin_token_is_rejected() {
    let ctx = TestContext::new().await;
    let (site, site_token) = ctx.seed_user("site@5mgolf.com", Role::SiteAdmin).await;
    let (_, super_token) = ctx.seed_user("owner@5mgolf.com", Role::SuperAdmin).await;

    let (status, _) = ctx.request(Method::GET, "/api/admin/deposits", Some(&site_token), None).await;
    assert_eq!(status, StatusCode::OK);

    // demotion applies to the token already in hand
    let (status, _) = ctx
        .request(
            Method::PATCH,
            &format!("/api/admin/users/{}", site.uid),
            Some(&super_token),
            Some(json!({"role": "user"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = ctx.request(Method::GET, "/api/admin/deposits", Some(&site_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = ctx
        .request(
            Method::PATCH,
            &format!("/api/admin/users/{}", site.uid),
            Some(&super_token),
            Some(json!({"active": false})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = ctx.request(Method::GET, "/api/admin/deposits", Some(&site_token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_fee_calculator_endpoint() {
    let ctx = TestContext::new().await;
    let (status, body) = ctx
        .request(
            Method::POST,
            "/api/fees/calculate",
            None,
            Some(json!({"people": 8, "golf_rows": 2, "accommodation_rows": 1, "flight_passengers": [8]})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["golf_undiscounted"], 160_000);
    assert_eq!(body["data"]["golf"], 112_000);
    assert_eq!(body["data"]["flight"], 80_000);
    assert_eq!(body["data"]["total"], 202_000);
}

#[tokio::test]
async fn test_course_catalog() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.request(Method::GET, "/api/courses?page_size=5&page=3", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 13);
    assert_eq!(body["data"]["total_pages"], 3);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 3);

    let (status, body) = ctx.request(Method::GET, "/api/courses/miyazaki-phoenix", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], "miyazaki-phoenix");

    let (status, _) = ctx.request(Method::GET, "/api/courses/unknown-course", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_translation_tables_and_echo() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.request(Method::GET, "/api/i18n/en", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["errors"]["unauthorized"], "Please sign in.");

    let (status, _) = ctx.request(Method::GET, "/api/i18n/fr", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = ctx.request(Method::POST, "/api/test", None, Some(json!({"ping": 1}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["received"]["ping"], 1);
}

#[tokio::test]
async fn test_echo_disabled_by_default() {
    let mut settings = test_settings();
    settings.features.test_endpoint = false;
    let ctx = TestContext::with_settings(settings).await;

    let (status, _) = ctx.request(Method::POST, "/api/test", None, Some(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

//! End-to-end HTTP tests over the full router.
//!
//! The server runs against in-memory infrastructure (see `common`), so
//! every flow here exercises real routing, extraction, validation, session
//! handling, and template rendering without external services.

mod common;

use common::{location, session_cookie_pair, TestServer};

use account_portal::domain::Role;
use reqwest::StatusCode;

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn register_then_login_round_trip() {
    // ---
    let server = TestServer::new().await;

    let resp = server
        .client
        .post(server.url("/register"))
        .form(&[
            ("firstName", "Rosie"),
            ("lastName", "Cotton"),
            ("email", "rosie@example.com"),
            ("username", "rosie"),
            ("password", "gamgee99"),
            ("confirmPassword", "gamgee99"),
            ("agreeTerms", "on"),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&resp),
        "/login?success=Registration+successful%21+Please+log+in+with+your+credentials."
    );
    assert_eq!(server.repo.user_count(), 1);

    // The freshly registered credentials must work immediately.
    let resp = server
        .client
        .post(server.url("/login"))
        .form(&[("username", "rosie"), ("password", "gamgee99")])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/?success=Welcome+back%2C+rosie%21");

    let cookie = session_cookie_pair(&resp).expect("login should set a session cookie");
    assert!(cookie.starts_with("portal_session="));

    // Session cookie carries the authentication; the home page greets them.
    let resp = server
        .client
        .get(server.url("/"))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Rosie Cotton"));
}

#[tokio::test]
async fn registration_rejects_invalid_form_with_all_errors() {
    // ---
    let server = TestServer::new().await;

    // Bad email, short username, weak password, mismatched confirmation,
    // terms unchecked. Every failure should be reported, not only the first.
    let resp = server
        .client
        .post(server.url("/register"))
        .form(&[
            ("firstName", "Rosie"),
            ("lastName", "Cotton"),
            ("email", "not-an-email"),
            ("username", "ro"),
            ("password", "short"),
            ("confirmPassword", "different"),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let loc = location(&resp);
    assert!(loc.starts_with("/register?error="));
    assert!(loc.contains("Please+enter+a+valid+email+address"));
    assert!(loc.contains("Username+must+be+at+least+3+characters+long"));
    assert!(loc.contains("Password+must+be+at+least+8+characters+long"));
    assert!(loc.contains("Passwords+do+not+match"));
    assert!(loc.contains("You+must+agree+to+the+terms+and+conditions"));
    assert_eq!(server.repo.user_count(), 0);
}

#[tokio::test]
async fn registration_rejects_taken_username_and_email() {
    // ---
    let server = TestServer::new().await;
    server
        .repo
        .seed_user("rosie", "gamgee99", "rosie@example.com", Role::User);

    let resp = server
        .client
        .post(server.url("/register"))
        .form(&[
            ("firstName", "Other"),
            ("lastName", "Person"),
            ("email", "rosie@example.com"),
            ("username", "rosie"),
            ("password", "gamgee99"),
            ("confirmPassword", "gamgee99"),
            ("agreeTerms", "on"),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let loc = location(&resp);
    assert!(loc.contains("This+email+address+is+already+registered"));
    assert!(loc.contains("This+username+is+already+taken"));
    assert_eq!(server.repo.user_count(), 1);
}

// ============================================================================
// Login / logout
// ============================================================================

#[tokio::test]
async fn login_failure_is_generic_for_unknown_user_and_wrong_password() {
    // ---
    let server = TestServer::new().await;
    server
        .repo
        .seed_user("rosie", "gamgee99", "rosie@example.com", Role::User);

    let wrong_password = server
        .client
        .post(server.url("/login"))
        .form(&[("username", "rosie"), ("password", "wrong-password")])
        .send()
        .await
        .unwrap();

    let unknown_user = server
        .client
        .post(server.url("/login"))
        .form(&[("username", "nobody"), ("password", "gamgee99")])
        .send()
        .await
        .unwrap();

    // Same redirect either way; the response never says which part failed.
    assert_eq!(wrong_password.status(), StatusCode::SEE_OTHER);
    assert_eq!(unknown_user.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&wrong_password),
        "/login?error=Invalid+username+or+password"
    );
    assert_eq!(location(&wrong_password), location(&unknown_user));
    assert!(session_cookie_pair(&wrong_password).is_none());
    assert!(session_cookie_pair(&unknown_user).is_none());
}

#[tokio::test]
async fn login_form_bounces_authenticated_users_home() {
    // ---
    let server = TestServer::new().await;
    server
        .repo
        .seed_user("rosie", "gamgee99", "rosie@example.com", Role::User);
    let cookie = login(&server, "rosie", "gamgee99").await;

    let resp = server
        .client
        .get(server.url("/login"))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/?info=You+are+already+logged+in");
}

#[tokio::test]
async fn logout_destroys_session_and_clears_cookie() {
    // ---
    let server = TestServer::new().await;
    server
        .repo
        .seed_user("rosie", "gamgee99", "rosie@example.com", Role::User);
    let cookie = login(&server, "rosie", "gamgee99").await;

    let resp = server
        .client
        .get(server.url("/logout"))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login?success=Successfully+logged+out");

    let cleared = resp
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .expect("logout should clear the cookie");
    assert!(cleared.starts_with("portal_session=;"));
    assert!(cleared.contains("Max-Age=0"));

    // The old token is dead server-side even if a client replays it.
    let resp = server
        .client
        .get(server.url("/admin"))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login?error=Authentication+required");
}

// ============================================================================
// Admin gating
// ============================================================================

#[tokio::test]
async fn admin_redirects_anonymous_visitors_to_login() {
    // ---
    let server = TestServer::new().await;

    let resp = server.client.get(server.url("/admin")).send().await.unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login?error=Authentication+required");
}

#[tokio::test]
async fn admin_returns_403_page_for_regular_users() {
    // ---
    let server = TestServer::new().await;
    server
        .repo
        .seed_user("rosie", "gamgee99", "rosie@example.com", Role::User);
    let cookie = login(&server, "rosie", "gamgee99").await;

    let resp = server
        .client
        .get(server.url("/admin"))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body = resp.text().await.unwrap();
    assert!(body.contains("You do not have permission to access this page"));
}

#[tokio::test]
async fn admin_dashboard_renders_for_admins() {
    // ---
    let server = TestServer::new().await;
    server
        .repo
        .seed_user("boss", "admin123", "boss@example.com", Role::Admin);
    let cookie = login(&server, "boss", "admin123").await;

    let resp = server
        .client
        .get(server.url("/admin"))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Admin Dashboard"));
    // The dashboard lists the discovered layouts.
    assert!(body.contains("layouts/homepage.html"));
    assert!(body.contains("layouts/admin.html"));
}

// ============================================================================
// Public pages and diagnostics
// ============================================================================

#[tokio::test]
async fn flash_messages_from_query_params_are_rendered() {
    // ---
    let server = TestServer::new().await;

    let resp = server
        .client
        .get(server.url("/?success=Everything+worked"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Everything worked"));
}

#[tokio::test]
async fn public_pages_render_without_authentication() {
    // ---
    let server = TestServer::new().await;

    for path in ["/", "/about", "/blog", "/login", "/register", "/forgot-password"] {
        let resp = server.client.get(server.url(path)).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "GET {path}");
    }
}

#[tokio::test]
async fn forgot_password_confirms_without_revealing_accounts() {
    // ---
    let server = TestServer::new().await;

    let missing = server
        .client
        .post(server.url("/forgot-password"))
        .form(&[("email", "")])
        .send()
        .await
        .unwrap();
    assert_eq!(
        location(&missing),
        "/forgot-password?error=Please+enter+your+email+address"
    );

    // Registered or not, the confirmation reads the same.
    let unknown = server
        .client
        .post(server.url("/forgot-password"))
        .form(&[("email", "ghost@example.com")])
        .send()
        .await
        .unwrap();
    assert_eq!(
        location(&unknown),
        "/forgot-password?success=Password+reset+instructions+have+been+sent+to+your+email"
    );
}

#[tokio::test]
async fn health_endpoint_reports_status_and_environment() {
    // ---
    let server = TestServer::new().await;

    let resp = server
        .client
        .get(server.url("/api/health"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "OK");
    assert_eq!(body["environment"], "test");
    assert!(body["uptime"].as_f64().unwrap() >= 0.0);
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn layouts_endpoint_lists_discovered_layouts() {
    // ---
    let server = TestServer::new().await;

    let resp = server.client.get(server.url("/layouts")).send().await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["totalLayouts"], 3);

    let names: Vec<&str> = body["layoutNames"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["admin", "blog", "homepage"]);
    assert_eq!(body["availableLayouts"]["homepage"], "layouts/homepage.html");
}

#[tokio::test]
async fn unknown_routes_get_the_rendered_404_page() {
    // ---
    let server = TestServer::new().await;

    let resp = server
        .client
        .get(server.url("/no-such-page"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = resp.text().await.unwrap();
    assert!(body.contains("404 - Page Not Found"));
}

#[tokio::test]
async fn metrics_endpoint_responds() {
    // ---
    let server = TestServer::new().await;

    let resp = server.client.get(server.url("/metrics")).send().await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp.headers().get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("text/plain"));
}

// ============================================================================
// Helpers
// ============================================================================

/// Log in and return the session cookie pair.
async fn login(server: &TestServer, username: &str, password: &str) -> String {
    // ---
    let resp = server
        .client
        .post(server.url("/login"))
        .form(&[("username", username), ("password", password)])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER, "login should succeed");
    session_cookie_pair(&resp).expect("login should set a session cookie")
}

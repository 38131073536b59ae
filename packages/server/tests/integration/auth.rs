use reqwest::Method;
use serde_json::json;

use crate::common::{ADMIN_EMAIL, ADMIN_PASSWORD, TestApp, routes};

mod login {
    use super::*;

    #[tokio::test]
    async fn returns_a_token_and_sets_the_session_cookie() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert!(res.body["token"].is_string());
        assert_eq!(res.body["user"]["email"], ADMIN_EMAIL);
        assert_eq!(res.body["user"]["role"], "admin");
        assert!(res.body["user"].get("password").is_none());
        assert!(res.body["user"]["last_login_at"].is_string());
        assert!(
            res.set_cookies()
                .iter()
                .any(|c| c.starts_with("session=") && c.contains("HttpOnly"))
        );
    }

    #[tokio::test]
    async fn email_is_matched_case_insensitively() {
        let app = TestApp::spawn().await;
        app.login("Admin@Example.com", ADMIN_PASSWORD).await;
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({ "email": ADMIN_EMAIL, "password": "wrong123!@" }),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["status"], "error");
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn malformed_email_is_a_field_error() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({ "email": "not-an-email", "password": "x" }),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(res.body["errors"][0]["field"], "email");
        assert_eq!(res.body["errors"][0]["code"], "validation.email");
    }

    #[tokio::test]
    async fn suspended_accounts_cannot_sign_in() {
        let app = TestApp::spawn().await;
        let (uid, _) = app
            .create_user_with_role("suspended@example.com", "manager")
            .await;
        let admin = app.admin_token().await;

        let res = app
            .post_with_token(
                "/api/v1/users/status",
                &json!({ "uid": uid, "status": "suspended" }),
                &admin,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({ "email": "suspended@example.com", "password": "pass123!@" }),
            )
            .await;
        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }
}

mod me {
    use super::*;

    #[tokio::test]
    async fn reports_no_token() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::ME).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["success"], false);
        assert_eq!(res.body["code"], "NO_TOKEN");
    }

    #[tokio::test]
    async fn reports_an_invalid_token() {
        let app = TestApp::spawn().await;

        let res = app.get_with_token(routes::ME, "not-a-jwt").await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_TOKEN");
    }

    #[tokio::test]
    async fn accepts_the_bearer_token() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app.get_with_token(routes::ME, &token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["success"], true);
        assert_eq!(res.body["code"], "OK");
        assert_eq!(res.body["user"]["email"], ADMIN_EMAIL);
    }

    #[tokio::test]
    async fn accepts_the_session_cookie() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = TestApp::send(
            app.request(Method::GET, routes::ME, None)
                .header("Cookie", format!("session={token}")),
        )
        .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["user"]["email"], ADMIN_EMAIL);
    }

    #[tokio::test]
    async fn reports_a_deleted_account() {
        let app = TestApp::spawn().await;
        let (uid, token) = app
            .create_user_with_role("gone@example.com", "manager")
            .await;
        let admin = app.admin_token().await;

        let res = app
            .delete_with_token(routes::USERS, &json!({ "uid": uid }), &admin)
            .await;
        assert_eq!(res.status, 200, "{}", res.text);

        let res = app.get_with_token(routes::ME, &token).await;
        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "USER_NOT_FOUND");
    }
}

mod permissions {
    use super::*;

    #[tokio::test]
    async fn resources_require_a_token() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::CONFIGS).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn members_cannot_use_the_backoffice() {
        let app = TestApp::spawn().await;
        let (_, token) = app
            .create_user_with_role("member@example.com", "member")
            .await;

        let res = app.get_with_token(routes::CONFIGS, &token).await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn managers_can_edit_but_not_delete() {
        let app = TestApp::spawn().await;
        let (_, token) = app
            .create_user_with_role("manager@example.com", "manager")
            .await;

        let uid = app.create_config(&token, "site.name").await;

        let res = app
            .delete_with_token(routes::CONFIGS, &json!({ "uid": uid }), &token)
            .await;
        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn managers_cannot_promote_themselves() {
        let app = TestApp::spawn().await;
        let (uid, token) = app
            .create_user_with_role("climber@example.com", "manager")
            .await;

        let res = app
            .put_with_token(
                &routes::item(routes::USERS, &uid),
                &json!({ "email": "climber@example.com", "name": "Tester", "role": "admin" }),
                &token,
            )
            .await;
        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");

        // Profile edits without role or status still go through.
        let res = app
            .put_with_token(
                &routes::item(routes::USERS, &uid),
                &json!({ "email": "climber@example.com", "name": "Renamed" }),
                &token,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["data"]["role"], "manager");

        let token = app.login("climber@example.com", "pass123!@").await;
        let config = app.create_config(&token, "site.name").await;
        let res = app
            .delete_with_token(routes::CONFIGS, &json!({ "uid": config }), &token)
            .await;
        assert_eq!(res.status, 403);
    }

    #[tokio::test]
    async fn managers_cannot_set_order_status_on_edit() {
        let app = TestApp::spawn().await;
        let (_, token) = app
            .create_user_with_role("clerk@example.com", "manager")
            .await;
        let order = json!({
            "user_uid": "user-1",
            "item_uid": "item-1",
            "quantity": 1,
            "total_price": 5000,
        });

        let res = app.post_with_token(routes::SHOP_ORDERS, &order, &token).await;
        assert_eq!(res.status, 201, "{}", res.text);
        let uid = res.uid();

        let mut paid = order.clone();
        paid["status"] = json!("paid");
        let res = app
            .put_with_token(&routes::item(routes::SHOP_ORDERS, &uid), &paid, &token)
            .await;
        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");

        let res = app
            .get_with_token(&routes::item(routes::SHOP_ORDERS, &uid), &token)
            .await;
        assert_eq!(res.body["status"], "pending");
    }

    #[tokio::test]
    async fn suspension_takes_effect_on_live_tokens() {
        let app = TestApp::spawn().await;
        let (uid, token) = app
            .create_user_with_role("paused@example.com", "manager")
            .await;
        let admin = app.admin_token().await;

        let res = app
            .post_with_token(
                "/api/v1/users/status",
                &json!({ "uid": uid, "status": "suspended" }),
                &admin,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);

        let res = app.get_with_token(routes::CONFIGS, &token).await;
        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn deleted_accounts_lose_their_tokens() {
        let app = TestApp::spawn().await;
        let (uid, token) = app
            .create_user_with_role("removed@example.com", "manager")
            .await;
        let admin = app.admin_token().await;

        let res = app
            .delete_with_token(routes::USERS, &json!({ "uid": uid }), &admin)
            .await;
        assert_eq!(res.status, 200, "{}", res.text);

        let res = app.get_with_token(routes::CONFIGS, &token).await;
        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }
}

mod logout {
    use super::*;

    #[tokio::test]
    async fn clears_the_session_cookie_with_a_localized_message() {
        let app = TestApp::spawn().await;

        let res = TestApp::send(
            app.request(Method::POST, routes::LOGOUT, None)
                .header("Cookie", "locale=en"),
        )
        .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["status"], "success");
        assert_eq!(res.body["message"], "Signed out.");
        assert!(res.set_cookies().iter().any(|c| c.starts_with("session=")));
    }
}

mod oauth {
    use super::*;

    #[tokio::test]
    async fn redirects_to_the_provider_with_state() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(&routes::oauth("github")).await;

        assert_eq!(res.status, 302);
        let location = res.headers["location"].to_str().unwrap();
        let url = url::Url::parse(location).unwrap();
        assert_eq!(url.host_str(), Some("github.com"));

        let query: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(query["client_id"], "client-123");
        assert_eq!(query["redirect_uri"], "http://localhost:3000/callback");
        assert_eq!(query["response_type"], "code");
        assert_eq!(query["scope"], "read:user");

        let state = &query["state"];
        assert!(!state.is_empty());
        assert!(
            res.set_cookies()
                .iter()
                .any(|c| c.starts_with(&format!("oauth_state={state}")))
        );
    }

    #[tokio::test]
    async fn unknown_provider_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(&routes::oauth("myspace")).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
        assert!(res.body["message"].as_str().unwrap().contains("myspace"));
    }
}

#[tokio::test]
async fn health_reports_the_database() {
    let app = TestApp::spawn().await;

    let res = app.get_without_token(routes::HEALTH).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["status"], "ok");
    assert_eq!(res.body["database"], "ok");
}

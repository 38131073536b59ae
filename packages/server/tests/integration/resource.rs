use reqwest::Method;
use serde_json::json;

use crate::common::{TestApp, routes};

mod crud {
    use super::*;

    #[tokio::test]
    async fn create_then_show_by_uid_and_idx() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_with_token(
                routes::CONFIGS,
                &json!({ "key": "site.title", "value": "Shop", "description": "  " }),
                &token,
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["status"], "success");
        let uid = res.uid();
        let idx = res.body["data"]["idx"].as_i64().unwrap();
        assert!(res.body["data"]["description"].is_null());

        let by_uid = app
            .get_with_token(&routes::item(routes::CONFIGS, &uid), &token)
            .await;
        assert_eq!(by_uid.status, 200);
        assert_eq!(by_uid.body["key"], "site.title");

        let by_idx = app
            .get_with_token(&routes::item(routes::CONFIGS, idx), &token)
            .await;
        assert_eq!(by_idx.status, 200);
        assert_eq!(by_idx.body["uid"], uid.as_str());
    }

    #[tokio::test]
    async fn unknown_row_is_a_localized_not_found() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = TestApp::send(
            app.request(Method::GET, &routes::item(routes::CONFIGS, "nope"), Some(&token))
                .header("Cookie", "locale=en"),
        )
        .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
        assert_eq!(res.body["message"], "Config entry not found: nope");
    }

    #[tokio::test]
    async fn duplicate_unique_value_is_a_conflict() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        app.create_config(&token, "site.title").await;

        let res = app
            .post_with_token(routes::CONFIGS, &json!({ "key": "site.title" }), &token)
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn update_overwrites_editable_columns() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let uid = app.create_config(&token, "site.title").await;

        let res = app
            .put_with_token(
                &routes::item(routes::CONFIGS, &uid),
                &json!({ "key": "site.title", "value": "Renamed", "description": "shown in the header" }),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["data"]["value"], "Renamed");
        assert_eq!(res.body["data"]["description"], "shown in the header");

        let res = app
            .get_with_token(&routes::item(routes::CONFIGS, &uid), &token)
            .await;
        assert_eq!(res.body["value"], "Renamed");
    }

    #[tokio::test]
    async fn update_of_an_unknown_row_is_not_found() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .put_with_token(
                &routes::item(routes::CONFIGS, 9999),
                &json!({ "key": "site.title" }),
                &token,
            )
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod validation {
    use super::*;

    #[tokio::test]
    async fn weak_password_reports_each_rule() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_with_token(
                routes::USERS,
                &json!({ "email": "weak@example.com", "name": "Weak", "password": "abc" }),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        let codes: Vec<&str> = res.body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|e| e["field"] == "password")
            .filter_map(|e| e["code"].as_str())
            .collect();
        assert!(codes.contains(&"validation.password.min"), "{codes:?}");
        assert!(codes.contains(&"validation.password.digit"), "{codes:?}");
        assert!(codes.contains(&"validation.password.special"), "{codes:?}");
    }

    #[tokio::test]
    async fn created_user_never_exposes_the_password() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_with_token(
                routes::USERS,
                &json!({ "email": "New@Example.com", "name": "New", "password": "abcd123!" }),
                &token,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["data"]["email"], "new@example.com");
        assert_eq!(res.body["data"]["role"], "member");
        assert!(res.body["data"].get("password").is_none());
    }

    #[tokio::test]
    async fn malformed_json_is_a_localized_validation_error() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = TestApp::send(
            app.request(Method::POST, routes::CONFIGS, Some(&token))
                .header("Cookie", "locale=en")
                .header("Content-Type", "application/json")
                .body("{ not json"),
        )
        .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert!(
            res.body["message"]
                .as_str()
                .unwrap()
                .starts_with("Could not read the request body")
        );
    }

    #[tokio::test]
    async fn disallowed_characters_are_rejected() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_with_token(routes::CONFIGS, &json!({ "key": "Site Title" }), &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["errors"][0]["field"], "key");
        assert_eq!(res.body["errors"][0]["code"], "validation.chars");
    }
}

mod delete {
    use super::*;

    #[tokio::test]
    async fn requires_a_target() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .delete_with_token(routes::CONFIGS, &json!({}), &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "MISSING_FIELDS");
    }

    #[tokio::test]
    async fn soft_deleted_rows_disappear() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let first = app.create_config(&token, "a.one").await;
        let second = app.create_config(&token, "a.two").await;
        let kept = app.create_config(&token, "a.three").await;

        let res = app
            .delete_with_token(
                routes::CONFIGS,
                &json!({ "uids": [first, second] }),
                &token,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["data"]["affected"], 2);

        let res = app
            .get_with_token(&routes::item(routes::CONFIGS, &first), &token)
            .await;
        assert_eq!(res.status, 404);

        let res = app.get_with_token(routes::CONFIGS, &token).await;
        let items = res.body["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["uid"], kept.as_str());
    }

    #[tokio::test]
    async fn accepts_numeric_ids_as_strings() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        app.create_config(&token, "b.one").await;

        let res = app.get_with_token(routes::CONFIGS, &token).await;
        let idx = res.body["items"][0]["idx"].as_i64().unwrap();

        let res = app
            .delete_with_token(
                routes::CONFIGS,
                &json!({ "ids": [idx.to_string()] }),
                &token,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["data"]["affected"], 1);
    }
}

mod status {
    use super::*;

    async fn create_order(app: &TestApp, token: &str) -> String {
        let res = app
            .post_with_token(
                routes::SHOP_ORDERS,
                &json!({
                    "user_uid": "user-1",
                    "item_uid": "item-1",
                    "quantity": 2,
                    "total_price": 20000,
                }),
                token,
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["data"]["status"], "pending");
        res.uid()
    }

    #[tokio::test]
    async fn moves_orders_to_a_known_status() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let uid = create_order(&app, &token).await;

        let res = app
            .post_with_token(
                routes::SHOP_ORDER_STATUS,
                &json!({ "uid": uid, "status": "paid" }),
                &token,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["data"]["affected"], 1);

        let res = app
            .get_with_token(&routes::item(routes::SHOP_ORDERS, &uid), &token)
            .await;
        assert_eq!(res.body["status"], "paid");
    }

    #[tokio::test]
    async fn edits_that_omit_the_status_keep_it() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let uid = create_order(&app, &token).await;

        let res = app
            .post_with_token(
                routes::SHOP_ORDER_STATUS,
                &json!({ "uid": uid, "status": "paid" }),
                &token,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);

        let res = app
            .put_with_token(
                &routes::item(routes::SHOP_ORDERS, &uid),
                &json!({
                    "user_uid": "user-1",
                    "item_uid": "item-1",
                    "quantity": 2,
                    "total_price": 20000,
                    "memo": "leave at the door",
                }),
                &token,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);

        let res = app
            .get_with_token(&routes::item(routes::SHOP_ORDERS, &uid), &token)
            .await;
        assert_eq!(res.body["status"], "paid");
        assert_eq!(res.body["memo"], "leave at the door");
    }

    #[tokio::test]
    async fn rejects_unknown_status() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let uid = create_order(&app, &token).await;

        let res = app
            .post_with_token(
                routes::SHOP_ORDER_STATUS,
                &json!({ "uid": uid, "status": "lost" }),
                &token,
            )
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn resources_without_statuses_have_no_status_route() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_with_token(
                "/api/v1/configs/status",
                &json!({ "uid": "x", "status": "paid" }),
                &token,
            )
            .await;
        assert_eq!(res.status, 405);
    }
}

mod attachments {
    use super::*;

    #[tokio::test]
    async fn files_are_stored_in_order_and_cleared_by_an_empty_list() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_with_token(
                routes::BLOG_POSTS,
                &json!({
                    "title": "Launch",
                    "content": "We are live.",
                    "tags": "news, launch, news",
                    "files": [
                        { "name": "cover.png", "url": "https://cdn.example.com/cover.png", "size": 1024, "mime": "image/png" },
                        { "name": "manual.pdf", "url": "https://cdn.example.com/manual.pdf" },
                    ],
                }),
                &token,
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);
        let uid = res.uid();
        assert_eq!(res.body["data"]["tags"], json!(["news", "launch"]));

        let res = app
            .get_with_token(&routes::item(routes::BLOG_POSTS, &uid), &token)
            .await;
        let files = res.body["files"].as_array().unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0]["name"], "cover.png");
        assert_eq!(files[0]["size"], 1024);
        assert_eq!(files[1]["name"], "manual.pdf");

        let res = app
            .put_with_token(
                &routes::item(routes::BLOG_POSTS, &uid),
                &json!({ "title": "Launch", "content": "We are live.", "files": [] }),
                &token,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["data"]["files"], json!([]));
    }

    #[tokio::test]
    async fn invalid_file_url_is_reported_by_path() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_with_token(
                routes::BLOG_POSTS,
                &json!({
                    "title": "Launch",
                    "content": "We are live.",
                    "files": [{ "name": "cover.png", "url": "ftp://cdn.example.com/cover.png" }],
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["errors"][0]["field"], "files[0].url");
    }
}

mod search {
    use super::*;

    #[tokio::test]
    async fn matches_search_columns_and_filters() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        app.create_config(&token, "mail.host").await;
        app.create_config(&token, "mail.port").await;
        app.create_config(&token, "site.title").await;

        let res = app
            .get_with_token(&format!("{}?search=mail", routes::CONFIGS), &token)
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["items"].as_array().unwrap().len(), 2);

        for (value, amount) in [("user-a", 100), ("user-b", 50), ("user-a", -30)] {
            let res = app
                .post_with_token(
                    routes::POINTS,
                    &json!({ "user_uid": value, "amount": amount, "reason": "adjustment" }),
                    &token,
                )
                .await;
            assert_eq!(res.status, 201, "{}", res.text);
        }

        let res = app
            .get_with_token(&format!("{}?user_uid=user-a", routes::POINTS), &token)
            .await;
        let items = res.body["items"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|p| p["user_uid"] == "user-a"));
    }

    #[tokio::test]
    async fn wildcards_in_the_term_match_literally() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        app.create_config(&token, "mail_host").await;
        app.create_config(&token, "mailxhost").await;

        let res = app
            .get_with_token(&format!("{}?search=_", routes::CONFIGS), &token)
            .await;
        assert_eq!(res.status, 200);
        let items = res.body["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["key"], "mail_host");

        let res = app
            .get_with_token(&format!("{}?search=%25", routes::CONFIGS), &token)
            .await;
        assert_eq!(res.status, 200);
        assert!(res.body["items"].as_array().unwrap().is_empty());
    }
}

use std::collections::HashSet;

use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn walks_every_row_once_newest_first() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;
    for i in 1..=5 {
        app.create_config(&token, &format!("walk.{i}")).await;
    }

    let mut seen = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0;
    loop {
        let path = match &cursor {
            Some(c) => format!("{}?limit=2&cursor={c}", routes::CONFIGS),
            None => format!("{}?limit=2", routes::CONFIGS),
        };
        let res = app.get_with_token(&path, &token).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["limit"], 2);
        pages += 1;

        for item in res.body["items"].as_array().unwrap() {
            seen.push(item["key"].as_str().unwrap().to_string());
        }

        match res.body.get("next_cursor").and_then(|c| c.as_str()) {
            Some(next) => cursor = Some(next.to_string()),
            None => break,
        }
    }

    assert_eq!(pages, 3);
    assert_eq!(seen, ["walk.5", "walk.4", "walk.3", "walk.2", "walk.1"]);
    let unique: HashSet<_> = seen.iter().collect();
    assert_eq!(unique.len(), seen.len());
}

#[tokio::test]
async fn exact_page_has_no_next_cursor() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;
    app.create_config(&token, "exact.1").await;
    app.create_config(&token, "exact.2").await;

    let res = app
        .get_with_token(&format!("{}?limit=2", routes::CONFIGS), &token)
        .await;

    assert_eq!(res.body["items"].as_array().unwrap().len(), 2);
    assert!(res.body.get("next_cursor").is_none());
}

#[tokio::test]
async fn limit_is_clamped() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let res = app
        .get_with_token(&format!("{}?limit=500", routes::CONFIGS), &token)
        .await;
    assert_eq!(res.body["limit"], 100);

    let res = app
        .get_with_token(&format!("{}?limit=0", routes::CONFIGS), &token)
        .await;
    assert_eq!(res.body["limit"], 1);

    let res = app.get_with_token(routes::CONFIGS, &token).await;
    assert_eq!(res.body["limit"], 20);
}

#[tokio::test]
async fn non_numeric_limit_is_rejected() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let res = app
        .get_with_token(&format!("{}?limit=many", routes::CONFIGS), &token)
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn malformed_cursor_is_rejected() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let res = app
        .get_with_token(&format!("{}?cursor=zz-not-hex", routes::CONFIGS), &token)
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn visible_filter_applies_to_resources_with_a_visibility_flag() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    for (title, visible) in [("Spring", true), ("Summer", false), ("Autumn", true)] {
        let res = app
            .post_with_token(
                routes::BANNERS,
                &json!({
                    "title": title,
                    "image_url": "https://cdn.example.com/banner.png",
                    "position": "main",
                    "is_visible": visible,
                }),
                &token,
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);
    }

    let res = app
        .get_with_token(&format!("{}?visible=false", routes::BANNERS), &token)
        .await;
    let items = res.body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Summer");

    let res = app
        .get_with_token(&format!("{}?visible=1", routes::BANNERS), &token)
        .await;
    assert_eq!(res.body["items"].as_array().unwrap().len(), 2);

    let res = app
        .get_with_token(&format!("{}?visible=maybe", routes::BANNERS), &token)
        .await;
    assert_eq!(res.status, 400);
}

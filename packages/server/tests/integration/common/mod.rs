use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use backoffice_common::{Locale, Translator};
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, RequestBuilder};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::{Value, json};

use backoffice_server::config::{
    AppConfig, AuthConfig, CorsConfig, DatabaseConfig, I18nConfig, OAuthConfig, OAuthProvider,
    ServerConfig,
};
use backoffice_server::state::AppState;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "abc123!@";
pub const JWT_SECRET: &str = "test-secret-for-integration-tests";

pub mod routes {
    pub const LOGIN: &str = "/api/v1/auth/login";
    pub const LOGOUT: &str = "/api/v1/auth/logout";
    pub const ME: &str = "/api/v1/auth/me";
    pub const HEALTH: &str = "/api/v1/health";
    pub const USERS: &str = "/api/v1/users";
    pub const CONFIGS: &str = "/api/v1/configs";
    pub const BANNERS: &str = "/api/v1/banners";
    pub const BLOG_POSTS: &str = "/api/v1/blog/posts";
    pub const SHOP_ORDERS: &str = "/api/v1/shop/orders";
    pub const SHOP_ORDER_STATUS: &str = "/api/v1/shop/orders/status";
    pub const POINTS: &str = "/api/v1/points";

    pub fn item(base: &str, id: impl std::fmt::Display) -> String {
        format!("{base}/{id}")
    }

    pub fn oauth(provider: &str) -> String {
        format!("/api/v1/auth/oauth/{provider}")
    }
}

/// A running test server over a private in-memory SQLite database.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DatabaseConnection,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    pub headers: HeaderMap,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

fn test_config() -> AppConfig {
    let mut providers = HashMap::new();
    providers.insert(
        "github".to_string(),
        OAuthProvider {
            authorize_url: "https://github.com/login/oauth/authorize".to_string(),
            client_id: "client-123".to_string(),
            redirect_uri: "http://localhost:3000/callback".to_string(),
            scope: "read:user".to_string(),
        },
    );

    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors: CorsConfig {
                allow_origins: vec![],
                max_age: 3600,
            },
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            // Every connection to `sqlite::memory:` is its own database.
            max_connections: 1,
            min_connections: 1,
            sqlx_logging: false,
        },
        auth: AuthConfig {
            jwt_secret: JWT_SECRET.to_string(),
            token_ttl_hours: 1,
            cookie_secure: false,
            bootstrap_admin_email: Some(ADMIN_EMAIL.to_string()),
            bootstrap_admin_password: Some(ADMIN_PASSWORD.to_string()),
        },
        i18n: I18nConfig {
            default_locale: Locale::Ko,
        },
        oauth: OAuthConfig { providers },
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        let config = test_config();

        let mut opts = ConnectOptions::new(&config.database.url);
        opts.max_connections(config.database.max_connections)
            .min_connections(config.database.min_connections)
            .sqlx_logging(false);
        let db = Database::connect(opts)
            .await
            .expect("Failed to open in-memory database");

        backoffice_server::database::sync_schema(&db)
            .await
            .expect("Failed to create schema");
        backoffice_server::seed::ensure_indexes(&db)
            .await
            .expect("Failed to create indexes");
        backoffice_server::seed::seed_bootstrap_admin(&db, &config.auth)
            .await
            .expect("Failed to seed bootstrap admin");

        let state = AppState {
            db: db.clone(),
            config,
            translator: Arc::new(Translator::bundled().expect("Failed to load dictionaries")),
        };

        let app = backoffice_server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to build HTTP client");

        Self { addr, client, db }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Request builder with an optional bearer token, for tests that need
    /// extra headers such as cookies.
    pub fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match token {
            Some(token) => builder.header("Authorization", format!("Bearer {token}")),
            None => builder,
        }
    }

    pub async fn send(builder: RequestBuilder) -> TestResponse {
        let res = builder.send().await.expect("Failed to send request");
        TestResponse::from_response(res).await
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> TestResponse {
        Self::send(self.request(Method::GET, path, Some(token))).await
    }

    pub async fn get_without_token(&self, path: &str) -> TestResponse {
        Self::send(self.request(Method::GET, path, None)).await
    }

    pub async fn post_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        Self::send(self.request(Method::POST, path, Some(token)).json(body)).await
    }

    pub async fn post_without_token(&self, path: &str, body: &Value) -> TestResponse {
        Self::send(self.request(Method::POST, path, None).json(body)).await
    }

    pub async fn put_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        Self::send(self.request(Method::PUT, path, Some(token)).json(body)).await
    }

    pub async fn delete_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        Self::send(self.request(Method::DELETE, path, Some(token)).json(body)).await
    }

    /// Log in and return the auth token.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let res = self
            .post_without_token(
                routes::LOGIN,
                &json!({ "email": email, "password": password }),
            )
            .await;
        assert_eq!(res.status, 200, "Login failed: {}", res.text);

        res.body["token"]
            .as_str()
            .expect("Login response should contain a token")
            .to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    /// Create an account with `role` through the API and log in as it.
    /// Returns `(uid, token)`.
    pub async fn create_user_with_role(&self, email: &str, role: &str) -> (String, String) {
        let admin = self.admin_token().await;
        let res = self
            .post_with_token(
                routes::USERS,
                &json!({
                    "email": email,
                    "name": "Tester",
                    "password": "pass123!@",
                    "role": role,
                }),
                &admin,
            )
            .await;
        assert_eq!(res.status, 201, "create user failed: {}", res.text);

        let token = self.login(email, "pass123!@").await;
        (res.uid(), token)
    }

    /// Create a config entry via the API and return its `uid`.
    pub async fn create_config(&self, token: &str, key: &str) -> String {
        let res = self
            .post_with_token(
                routes::CONFIGS,
                &json!({ "key": key, "value": format!("value of {key}") }),
                token,
            )
            .await;
        assert_eq!(res.status, 201, "create_config failed: {}", res.text);
        res.uid()
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let headers = res.headers().clone();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self {
            status,
            headers,
            text,
            body,
        }
    }

    /// `uid` of the row wrapped in a mutation envelope.
    pub fn uid(&self) -> String {
        self.body["data"]["uid"]
            .as_str()
            .expect("response body should contain 'data.uid'")
            .to_string()
    }

    /// Every `Set-Cookie` header value.
    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all("set-cookie")
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect()
    }
}

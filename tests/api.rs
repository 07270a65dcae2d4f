//! End-to-end tests against a real listener.
//!
//! The router is built with the in-memory repositories, served on an
//! ephemeral port, and exercised over HTTP with reqwest.

use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::{json, Value};
use tugas::cli::globals::GlobalArgs;
use tugas::tugas::{
    router,
    store::{ListRepository, MemoryListRepository, MemoryUserRepository, UserRepository},
    token::TokenService,
};

struct TestApp {
    base: String,
    client: reqwest::Client,
}

impl TestApp {
    async fn spawn(allow_anonymous: bool) -> Self {
        let users: Arc<dyn UserRepository> = Arc::new(MemoryUserRepository::default());
        let lists: Arc<dyn ListRepository> = Arc::new(MemoryListRepository::default());
        let tokens = Arc::new(TokenService::new(None));
        let globals = GlobalArgs::new(None, allow_anonymous);

        let app = router(users, lists, tokens, globals);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("local addr");

        tokio::spawn(async move {
            axum::serve(listener, app.into_make_service())
                .await
                .expect("serve");
        });

        Self {
            base: format!("http://{addr}"),
            client: reqwest::Client::new(),
        }
    }

    async fn register(&self, name: &str, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(format!("{}/api/auth/register", self.base))
            .json(&json!({ "name": name, "email": email, "password": password }))
            .send()
            .await
            .expect("register request")
    }

    async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(format!("{}/api/auth/login", self.base))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("login request")
    }

    async fn create_list(&self, token: &str, title: &str) -> reqwest::Response {
        self.client
            .post(format!("{}/api/lists", self.base))
            .bearer_auth(token)
            .json(&json!({ "title": title }))
            .send()
            .await
            .expect("create list request")
    }
}

async fn body(resp: reqwest::Response) -> Value {
    resp.json().await.expect("json body")
}

#[tokio::test]
async fn test_end_to_end_register_create_cross_user_delete() {
    let app = TestApp::spawn(false).await;

    // Register and create a list
    let resp = app.register("A", "a@x.com", "secret1").await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let registered = body(resp).await;
    let token = registered["token"].as_str().expect("token").to_string();
    let user_id = registered["user"]["id"].as_str().expect("id").to_string();

    let resp = app.create_list(&token, "Groceries").await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let list = body(resp).await;
    assert_eq!(list["userId"].as_str(), Some(user_id.as_str()));
    let list_id = list["id"].as_str().expect("list id").to_string();

    // Another user cannot see it: read, update and delete all answer 404
    let resp = app.register("B", "b@x.com", "secret2").await;
    let other_token = body(resp).await["token"]
        .as_str()
        .expect("token")
        .to_string();

    let resp = app
        .client
        .get(format!("{}/api/lists/{list_id}", app.base))
        .bearer_auth(&other_token)
        .send()
        .await
        .expect("cross-user get");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body(resp).await["message"].as_str(), Some("List not found"));

    let resp = app
        .client
        .put(format!("{}/api/lists/{list_id}", app.base))
        .bearer_auth(&other_token)
        .json(&json!({ "title": "hijacked" }))
        .send()
        .await
        .expect("cross-user put");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app
        .client
        .delete(format!("{}/api/lists/{list_id}", app.base))
        .bearer_auth(&other_token)
        .send()
        .await
        .expect("cross-user delete");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // The owner deletes it; the confirmation message names the id
    let resp = app
        .client
        .delete(format!("{}/api/lists/{list_id}", app.base))
        .bearer_auth(&token)
        .send()
        .await
        .expect("owner delete");
    assert_eq!(resp.status(), StatusCode::OK);
    let message = body(resp).await["message"]
        .as_str()
        .expect("message")
        .to_string();
    assert!(message.contains(&list_id));

    // Gone for the owner too
    let resp = app
        .client
        .get(format!("{}/api/lists/{list_id}", app.base))
        .bearer_auth(&token)
        .send()
        .await
        .expect("get after delete");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_register_validation_and_conflict() {
    let app = TestApp::spawn(false).await;

    let resp = app.register("", "a@x.com", "secret1").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = app.register("A", "a@x.com", "short").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = app.register("A", "a@x.com", "secret1").await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    // The returned user never carries the password hash
    let registered = body(resp).await;
    assert!(registered["user"].get("passwordHash").is_none());
    assert!(registered["user"].get("password").is_none());

    let resp = app.register("A again", "a@x.com", "secret1").await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::spawn(false).await;

    app.register("A", "a@x.com", "secret1").await;

    let wrong_password = app.login("a@x.com", "wrong-password").await;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    let wrong_password = body(wrong_password).await;

    let unknown_email = app.login("nobody@x.com", "secret1").await;
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
    let unknown_email = body(unknown_email).await;

    assert_eq!(wrong_password["message"], unknown_email["message"]);
}

#[tokio::test]
async fn test_login_token_grants_access() {
    let app = TestApp::spawn(false).await;

    app.register("A", "a@x.com", "secret1").await;

    let resp = app.login("a@x.com", "secret1").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let token = body(resp).await["token"]
        .as_str()
        .expect("token")
        .to_string();

    let resp = app
        .client
        .get(format!("{}/api/lists", app.base))
        .bearer_auth(&token)
        .send()
        .await
        .expect("get lists");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body(resp).await, json!([]));
}

#[tokio::test]
async fn test_missing_and_invalid_tokens() {
    let app = TestApp::spawn(false).await;

    // No header
    let resp = app
        .client
        .get(format!("{}/api/lists", app.base))
        .send()
        .await
        .expect("no header");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body(resp).await["message"].as_str(), Some("Missing token"));

    // Wrong scheme
    let resp = app
        .client
        .get(format!("{}/api/lists", app.base))
        .header("Authorization", "Basic abc")
        .send()
        .await
        .expect("wrong scheme");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body(resp).await["message"].as_str(), Some("Invalid token"));

    // Garbage token
    let resp = app
        .client
        .get(format!("{}/api/lists", app.base))
        .bearer_auth("not-a-token")
        .send()
        .await
        .expect("garbage token");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body(resp).await["message"].as_str(), Some("Invalid token"));

    // Token signed with a different secret
    let foreign = TokenService::new(Some(&secrecy::SecretString::from(
        "other-secret".to_string(),
    )));
    let forged = foreign
        .issue("user-1", "a@x.com", chrono::Duration::days(1))
        .expect("issue");
    let resp = app
        .client
        .get(format!("{}/api/lists", app.base))
        .bearer_auth(&forged)
        .send()
        .await
        .expect("forged token");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_title_validation_before_lookup() {
    let app = TestApp::spawn(false).await;

    let resp = app.register("A", "a@x.com", "secret1").await;
    let token = body(resp).await["token"]
        .as_str()
        .expect("token")
        .to_string();

    // Missing title is a 400 even though the target does not exist
    let resp = app
        .client
        .put(format!("{}/api/lists/no-such-id", app.base))
        .bearer_auth(&token)
        .json(&json!({ "description": "only" }))
        .send()
        .await
        .expect("put without title");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // With a title, the missing target is a 404
    let resp = app
        .client
        .put(format!("{}/api/lists/no-such-id", app.base))
        .bearer_auth(&token)
        .json(&json!({ "title": "t" }))
        .send()
        .await
        .expect("put unknown id");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_replaces_title_and_description() {
    let app = TestApp::spawn(false).await;

    let resp = app.register("A", "a@x.com", "secret1").await;
    let token = body(resp).await["token"]
        .as_str()
        .expect("token")
        .to_string();

    let resp = app
        .client
        .post(format!("{}/api/lists", app.base))
        .bearer_auth(&token)
        .json(&json!({ "title": "before", "description": "old" }))
        .send()
        .await
        .expect("create");
    let list = body(resp).await;
    let list_id = list["id"].as_str().expect("id").to_string();

    // Full replace: omitting description clears it
    let resp = app
        .client
        .put(format!("{}/api/lists/{list_id}", app.base))
        .bearer_auth(&token)
        .json(&json!({ "title": "after" }))
        .send()
        .await
        .expect("update");
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = body(resp).await;
    assert_eq!(updated["title"].as_str(), Some("after"));
    assert!(updated["description"].is_null());
    assert_eq!(updated["createdAt"], list["createdAt"]);
}

#[tokio::test]
async fn test_lists_are_owner_scoped_in_creation_order() {
    let app = TestApp::spawn(false).await;

    let resp = app.register("A", "a@x.com", "secret1").await;
    let token_a = body(resp).await["token"]
        .as_str()
        .expect("token")
        .to_string();
    let resp = app.register("B", "b@x.com", "secret2").await;
    let token_b = body(resp).await["token"]
        .as_str()
        .expect("token")
        .to_string();

    app.create_list(&token_a, "first").await;
    app.create_list(&token_b, "not mine").await;
    app.create_list(&token_a, "second").await;

    let resp = app
        .client
        .get(format!("{}/api/lists", app.base))
        .bearer_auth(&token_a)
        .send()
        .await
        .expect("get lists");
    let lists = body(resp).await;
    let titles: Vec<&str> = lists
        .as_array()
        .expect("array")
        .iter()
        .map(|l| l["title"].as_str().expect("title"))
        .collect();
    assert_eq!(titles, vec!["first", "second"]);
}

#[tokio::test]
async fn test_debug_user_listing_includes_hash() {
    let app = TestApp::spawn(false).await;

    app.register("A", "a@x.com", "secret1").await;

    let resp = app
        .client
        .get(format!("{}/api/auth/users", app.base))
        .send()
        .await
        .expect("users listing");
    assert_eq!(resp.status(), StatusCode::OK);

    let users = body(resp).await;
    let user = &users.as_array().expect("array")[0];
    assert_eq!(user["email"].as_str(), Some("a@x.com"));
    let hash = user["passwordHash"].as_str().expect("hash");
    // The stored hash is never the plaintext
    assert_ne!(hash, "secret1");
}

#[tokio::test]
async fn test_anonymous_mode_uses_placeholder_identity() {
    let app = TestApp::spawn(true).await;

    let resp = app
        .client
        .post(format!("{}/api/lists", app.base))
        .json(&json!({ "title": "no auth" }))
        .send()
        .await
        .expect("anonymous create");
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(body(resp).await["userId"].as_str(), Some("dummy-user-id"));

    // A present-but-invalid token is still rejected in anonymous mode
    let resp = app
        .client
        .get(format!("{}/api/lists", app.base))
        .bearer_auth("garbage")
        .send()
        .await
        .expect("bad token in anonymous mode");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

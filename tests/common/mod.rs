//! Shared fixtures for the HTTP tests
//!
//! One router is built per test; each simulated user gets its own
//! `TestServer` over a clone of it, so cookie jars stay separate while the
//! store and the session store are shared.

#![allow(dead_code)]

use axum::Router;
use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};
use stockist_hub::config::AdminSeed;
use stockist_hub::prelude::*;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin-pass";
pub const PASSWORD: &str = "secret123";

pub struct Market {
    pub app: Router,
    pub store: InMemoryMarketStore,
    pub events: EventBus,
}

pub async fn market() -> Market {
    let mut config = AppConfig::default_config();
    config.seed.admin = Some(AdminSeed {
        username: ADMIN_USERNAME.to_string(),
        password: ADMIN_PASSWORD.to_string(),
        name: "Administrator".to_string(),
        email: "admin@example.com".to_string(),
        phone: "+251900000000".to_string(),
    });

    let store = InMemoryMarketStore::new();
    let events = EventBus::new(64);
    let app = ServerBuilder::new()
        .with_config(config)
        .with_store(store.clone())
        .with_matcher(RandomQuoteMatcher::seeded(11))
        .with_event_bus(events.clone())
        .build()
        .await
        .unwrap();

    Market { app, store, events }
}

impl Market {
    /// A client with an empty cookie jar
    pub fn anonymous(&self) -> TestServer {
        TestServer::new(self.app.clone())
    }

    /// Register a user and return a logged-in client plus the user JSON
    pub async fn register(
        &self,
        username: &str,
        user_type: &str,
        tin: Option<&str>,
    ) -> (TestServer, Value) {
        let client = self.anonymous();
        let mut body = json!({
            "username": username,
            "password": PASSWORD,
            "email": format!("{}@example.com", username),
            "name": format!("{} owner", username),
            "phone": "+251911000000",
            "businessName": format!("{} PLC", username),
            "userType": user_type,
            "isVatRegistered": true
        });
        if let Some(tin) = tin {
            body["tin"] = json!(tin);
        }

        let response = client.post("/api/register").json(&body).save_cookies().await;
        response.assert_status(StatusCode::CREATED);
        let user = response.json::<Value>();
        (client, user)
    }

    pub async fn admin(&self) -> TestServer {
        let client = self.anonymous();
        client
            .post("/api/login")
            .json(&json!({"username": ADMIN_USERNAME, "password": ADMIN_PASSWORD}))
            .save_cookies()
            .await
            .assert_status_ok();
        client
    }
}

/// Two crates of Heineken (265 each)
pub fn heineken_order() -> Value {
    json!({
        "deliveryAddress": "Bole Road, Addis Ababa",
        "items": [{"beverageId": 1, "quantity": 2}]
    })
}

pub fn id_of(value: &Value) -> i64 {
    value["id"].as_i64().unwrap()
}

#![allow(dead_code)]

use secrecy::SecretString;
use service_core::config::Config as CoreConfig;
use summary_service::config::{GeminiSettings, SummaryConfig};
use summary_service::startup::Application;
use std::time::Duration;
use wiremock::MockServer;

pub const TEST_API_KEY: &str = "test-api-key";
pub const TEST_MODEL: &str = "gemini-2.0-flash";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawn the application with the given Gemini settings on a random port.
    pub async fn spawn(gemini: GeminiSettings) -> Self {
        let config = SummaryConfig {
            common: CoreConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Random port for testing
            },
            gemini,
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            client,
        }
    }

    /// Spawn without a credential: the relay runs disabled.
    pub async fn spawn_without_credential() -> Self {
        Self::spawn(GeminiSettings::default()).await
    }

    /// Spawn against a fake Gemini API served by `server`.
    pub async fn spawn_with_gemini(server: &MockServer) -> Self {
        Self::spawn_with_gemini_timeout(server, Duration::from_secs(5)).await
    }

    /// Like [`TestApp::spawn_with_gemini`], with a custom outbound timeout.
    pub async fn spawn_with_gemini_timeout(server: &MockServer, timeout: Duration) -> Self {
        Self::spawn(GeminiSettings {
            api_key: Some(SecretString::new(TEST_API_KEY.to_string())),
            model: TEST_MODEL.to_string(),
            api_base: server.uri(),
            request_timeout: timeout,
        })
        .await
    }

    pub async fn post_summary(&self, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}/generate_summary", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to send request")
    }
}

pub fn generate_content_path() -> String {
    format!("/models/{}:generateContent", TEST_MODEL)
}

use base_account_service::SERVICE;
use service_core::config::Config;
use service_core::observability::init_metrics;
use service_core::routes::OpsState;
use service_core::startup::Application;

pub struct TestApp {
    pub address: String,
    pub ops_address: String,
    pub ops_state: OpsState,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        init_metrics();

        let config = Config {
            service_name: format!("{}-test", SERVICE.name),
            host: "127.0.0.1".to_string(),
            port: 0,     // Random port
            ops_port: 0, // Random port
            log_level: "error".to_string(),
            otlp_endpoint: None,
        };

        let app = Application::build(config, SERVICE)
            .await
            .expect("Failed to build test application");

        let address = format!("http://127.0.0.1:{}", app.port());
        let ops_address = format!("http://127.0.0.1:{}", app.ops_port());
        let ops_state = app.ops_state();

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the servers to be ready by polling the readiness endpoint
        let client = reqwest::Client::new();
        let ready_url = format!("{}/ready", ops_address);
        for _ in 0..50 {
            if let Ok(response) = client.get(&ready_url).send().await {
                if response.status().is_success() {
                    break;
                }
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            ops_address,
            ops_state,
            client,
        }
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_ops(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.ops_address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }
}

use crate::roast::config::RoastConfig;
use reqwest::{header, Client, StatusCode};
use roast_core::roast::{RoastClient, RoastError, RoastRequest};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};
use url::Url;

#[derive(Clone)]
pub struct RoastHttpClient {
    http: Client,
    endpoint: Url,
}

impl RoastHttpClient {
    pub fn new(cfg: &RoastConfig) -> anyhow::Result<Self> {
        let endpoint = cfg.endpoint()?;
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        let mut builder = Client::builder()
            .default_headers(headers)
            .use_rustls_tls()
            .pool_idle_timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(2);
        if let Some(t) = cfg.timeout {
            builder = builder.timeout(t);
        }
        if let Some(p) = &cfg.proxy {
            builder = builder.proxy(reqwest::Proxy::all(p)?);
        }
        let http = builder.build()?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl RoastClient for RoastHttpClient {
    async fn generate(&self, req: &RoastRequest) -> Result<serde_json::Value, RoastError> {
        info!(target: "providers::roast", "generate url={} input_len={}", self.endpoint, req.content.len());
        let started = Instant::now();
        // `.json` sets Content-Type: application/json
        let resp = self
            .http
            .post(self.endpoint.clone())
            .json(req)
            .send()
            .await
            .map_err(map_reqwest_err)?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.ok();
            error!(target: "providers::roast", "generate non-2xx status={} body={:?}", status, body);
            return Err(map_status_err(status, body));
        }
        let body = resp.text().await.map_err(map_reqwest_err)?;
        debug!(target: "providers::roast", "generate ok bytes={} elapsed_ms={}", body.len(), started.elapsed().as_millis());
        serde_json::from_str(&body).map_err(|e| RoastError::Decode(e.to_string()))
    }
}

fn map_reqwest_err(e: reqwest::Error) -> RoastError {
    if e.is_timeout() {
        RoastError::Timeout(e.to_string())
    } else if e.is_request() || e.is_connect() {
        RoastError::Network(e.to_string())
    } else if e.is_decode() || e.is_body() {
        RoastError::Decode(e.to_string())
    } else {
        RoastError::Other(e.to_string())
    }
}

fn map_status_err(status: StatusCode, body: Option<String>) -> RoastError {
    RoastError::Status {
        status: status.as_u16(),
        body: body.unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode as AxStatus, routing::post, Json, Router};
    use roast_core::submission::{SubmissionController, SubmissionState, ERROR_MARKER};
    use serde_json::{json, Value};

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client_for(base_url: String) -> RoastHttpClient {
        let mut cfg = RoastConfig::default();
        cfg.base_url = base_url;
        RoastHttpClient::new(&cfg).unwrap()
    }

    // Json<Value> only accepts application/json request bodies.
    async fn echo(Json(body): Json<Value>) -> Json<Value> {
        let content = body["content"].as_str().unwrap_or_default().to_string();
        Json(json!({ "roasts": [format!("roasted: {content}")] }))
    }

    #[tokio::test]
    async fn posts_json_content() {
        let base = serve(Router::new().route("/generate-roasts/", post(echo))).await;
        let client = client_for(base);
        let v = client.generate(&RoastRequest::new("hello")).await.unwrap();
        assert_eq!(v, json!({ "roasts": ["roasted: hello"] }));
    }

    #[tokio::test]
    async fn configured_proxy_carries_the_request() {
        // the stub answers on the path of the absolute-form request it is handed
        let proxy = serve(Router::new().route("/generate-roasts/", post(echo))).await;
        let mut cfg = RoastConfig::default();
        cfg.base_url = "http://roast-api.invalid".into();
        cfg.proxy = Some(proxy);
        let client = RoastHttpClient::new(&cfg).unwrap();
        let v = client.generate(&RoastRequest::new("via proxy")).await.unwrap();
        assert_eq!(v, json!({ "roasts": ["roasted: via proxy"] }));
    }

    #[tokio::test]
    async fn server_error_maps_to_status() {
        let app = Router::new().route(
            "/generate-roasts/",
            post(|| async { (AxStatus::SERVICE_UNAVAILABLE, "warming up") }),
        );
        let client = client_for(serve(app).await);
        match client.generate(&RoastRequest::new("hello")).await {
            Err(RoastError::Status { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "warming up");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_body_is_decode_error() {
        let app = Router::new().route("/generate-roasts/", post(|| async { "<html>oops</html>" }));
        let client = client_for(serve(app).await);
        let err = client.generate(&RoastRequest::new("x")).await.unwrap_err();
        assert!(matches!(err, RoastError::Decode(_)), "{err:?}");
    }

    #[tokio::test]
    async fn refused_connection_is_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = client_for(format!("http://{addr}"));
        let err = client.generate(&RoastRequest::new("x")).await.unwrap_err();
        assert!(matches!(err, RoastError::Network(_)), "{err:?}");
    }

    #[tokio::test]
    async fn controller_end_to_end() {
        let app = Router::new().route(
            "/generate-roasts/",
            post(|| async { Json(json!({ "roasts": ["x"] })) }),
        );
        let client = client_for(serve(app).await);
        let mut c = SubmissionController::new();
        c.set_content("hello");
        let n = c.submit(&client).await;
        assert!(!n.is_error());
        assert_eq!(c.state(), SubmissionState::Succeeded);
        assert_eq!(c.response(), Some("{\n  \"roasts\": [\n    \"x\"\n  ]\n}"));
    }

    #[tokio::test]
    async fn controller_failure_end_to_end() {
        let app = Router::new().route(
            "/generate-roasts/",
            post(|| async { AxStatus::INTERNAL_SERVER_ERROR }),
        );
        let client = client_for(serve(app).await);
        let mut c = SubmissionController::new();
        c.set_content("hello");
        let n = c.submit(&client).await;
        assert!(n.is_error());
        assert_eq!(c.state(), SubmissionState::Failed);
        assert_eq!(c.response(), Some(ERROR_MARKER));
    }
}

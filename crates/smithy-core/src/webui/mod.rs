//! Browser UI served by axum on localhost
//!
//! This module is optional and only available when the `webui` feature is enabled.

pub mod handlers;

use crate::config::WebUiConfig;
use crate::templates::Forge;
use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use colored::Colorize;
use std::sync::Arc;
use url::Url;

/// Shared state for the handlers
#[derive(Clone)]
pub struct WebState {
    pub forge: Arc<Forge>,
}

/// Browser UI routes
pub fn router(state: WebState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/options", get(handlers::options))
        .route("/api/validate", post(handlers::validate))
        .route("/api/forge", post(handlers::forge))
        .with_state(state)
}

/// Bind the server and run until the process is stopped
pub async fn serve(forge: Forge, config: &WebUiConfig, open_browser: bool) -> Result<()> {
    if let Some(warning) = forge.formatter().check_version() {
        eprintln!("{}", warning.yellow());
    }

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?;
    let addr = listener.local_addr()?;
    let url = Url::parse(&format!("http://{}/", addr)).context("Invalid server address")?;

    println!(
        "{} {}",
        "sklearn-smithy web UI running at".green().bold(),
        url.as_str().cyan()
    );
    println!("{}", "Press Ctrl+C to stop".dimmed());
    tracing::info!(%addr, "web UI listening");

    if open_browser {
        if let Err(e) = open::that(url.as_str()) {
            tracing::warn!(error = %e, "could not open browser");
        }
    }

    let state = WebState {
        forge: Arc::new(forge),
    };
    axum::serve(listener, router(state))
        .await
        .context("Web UI server failed")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{Formatter, FormatterConfig};
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        let config = FormatterConfig::from_command_line("cat").unwrap();
        router(WebState {
            forge: Arc::new(Forge::new(Formatter::new(config)).unwrap()),
        })
    }

    async fn post_json(path: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    /// Body shaped like the one `static/index.html` sends
    fn page_form(kind: Value) -> Value {
        json!({
            "name": "MightyEstimator",
            "kind": kind,
            "required": "alpha",
            "optional": "mu",
            "tags": "allow_nan",
            "output": null,
            "sample_weight": true,
            "linear": false,
            "predict_proba": true,
            "decision_function": false,
        })
    }

    #[tokio::test]
    async fn test_validate_accepts_page_body_without_kind() {
        let (status, report) = post_json("/api/validate", page_form(Value::Null)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["can_forge"], false);
        assert!(report["errors"]["kind"].is_string());
        assert_eq!(report["flags"]["sample_weight"], true);
        assert_eq!(report["flags"]["predict_proba"], false);
        assert_eq!(report["availability"]["linear"], false);
        assert_eq!(report["output"], "mightyestimator.py");
    }

    #[tokio::test]
    async fn test_forge_accepts_page_body() {
        let (status, body) = post_json("/api/forge", page_form(json!("classifier"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["file_name"], "mightyestimator.py");
        let code = body["code"].as_str().unwrap();
        assert!(code.contains("class MightyEstimator(ClassifierMixin, BaseEstimator)"));
        assert!(code.contains("sample_weight=None"));
        assert!(code.contains("def predict_proba(self, X)"));
    }

    #[tokio::test]
    async fn test_forge_invalid_page_body_is_unprocessable() {
        let mut form = page_form(json!("classifier"));
        form["optional"] = json!("alpha");
        let (status, body) = post_json("/api/forge", form).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["errors"]["optional"].as_str().unwrap().contains("'alpha'"));
    }

    #[tokio::test]
    async fn test_index_and_options_are_served() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app()
            .oneshot(Request::builder().uri("/api/options").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let options: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(options["kinds"].as_array().unwrap().len(), 6);
        assert_eq!(options["tags"].as_array().unwrap().len(), 19);
    }
}

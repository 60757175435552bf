//! HTTP handlers for the browser UI

use crate::error::ForgeError;
use crate::estimator::{EstimatorKind, FlagAvailability, TagName};
use crate::form::{Field, ForgeForm, FormInput, FormReport};
use crate::webui::WebState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// One selectable estimator kind
#[derive(Debug, Serialize)]
pub struct KindOption {
    pub token: &'static str,
    pub label: &'static str,
    /// Offerable flags before `linear` is chosen
    pub availability: FlagAvailability,
}

#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub kinds: Vec<KindOption>,
    pub tags: Vec<&'static str>,
    pub tags_docs_url: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ForgeResponse {
    pub code: String,
    pub file_name: String,
}

/// Errors returned by the API
#[derive(Debug)]
pub enum WebError {
    /// Blocking validation errors per field
    Invalid(BTreeMap<Field, String>),
    Forge(ForgeError),
}

impl From<ForgeError> for WebError {
    fn from(e: ForgeError) -> Self {
        WebError::Forge(e)
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            WebError::Invalid(errors) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "errors": errors }))).into_response()
            }
            WebError::Forge(e) => {
                let status = match e {
                    ForgeError::Parse(_) | ForgeError::Incomplete(_) => {
                        StatusCode::UNPROCESSABLE_ENTITY
                    }
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, Json(json!({ "error": e.to_string() }))).into_response()
            }
        }
    }
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn options() -> Json<OptionsResponse> {
    Json(OptionsResponse {
        kinds: EstimatorKind::ALL
            .iter()
            .map(|kind| KindOption {
                token: kind.token(),
                label: kind.display_name(),
                availability: kind.availability(false),
            })
            .collect(),
        tags: TagName::ALL.iter().map(|tag| tag.as_str()).collect(),
        tags_docs_url: crate::error::TAGS_DOCS_URL,
    })
}

pub async fn validate(Json(input): Json<FormInput>) -> Json<FormReport> {
    let mut form = ForgeForm::from_input(input);
    Json(form.report())
}

pub async fn forge(
    State(state): State<WebState>,
    Json(input): Json<FormInput>,
) -> Result<Json<ForgeResponse>, WebError> {
    let mut form = ForgeForm::from_input(input);

    let report = form.report();
    if !report.can_forge {
        return Err(WebError::Invalid(report.errors));
    }

    let request = form.to_request()?;
    let code = state.forge.forge(&request).await.map_err(|e| {
        tracing::warn!(error = %e, "forging failed");
        e
    })?;

    Ok(Json(ForgeResponse {
        code,
        file_name: request.output().display().to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::EstimatorFlags;
    use crate::runtime::{Formatter, FormatterConfig};
    use crate::templates::Forge;
    use std::sync::Arc;

    fn state(formatter: &str) -> WebState {
        let config = FormatterConfig::from_command_line(formatter).unwrap();
        WebState {
            forge: Arc::new(Forge::new(Formatter::new(config)).unwrap()),
        }
    }

    fn input() -> FormInput {
        FormInput {
            name: "MightyEstimator".to_string(),
            kind: Some(EstimatorKind::Classifier),
            required: "alpha".to_string(),
            optional: "mu".to_string(),
            flags: EstimatorFlags {
                predict_proba: true,
                ..EstimatorFlags::default()
            },
            tags: "allow_nan".to_string(),
            output: None,
        }
    }

    #[tokio::test]
    async fn test_options_lists_vocabulary() {
        let Json(options) = options().await;
        assert_eq!(options.kinds.len(), 6);
        assert_eq!(options.tags.len(), 19);
        let outlier = options.kinds.iter().find(|k| k.token == "outlier").unwrap();
        assert!(outlier.availability.predict_proba);
        assert!(!outlier.availability.linear);
    }

    #[tokio::test]
    async fn test_validate_reports_per_field() {
        let mut bad = input();
        bad.name = "123Invalid".to_string();
        bad.optional = "alpha".to_string();

        let Json(report) = validate(Json(bad)).await;
        assert!(!report.can_forge);
        assert!(report.errors.contains_key(&Field::Name));
        assert!(report.errors[&Field::Optional].contains("'alpha'"));
        assert_eq!(report.output, None);
    }

    #[tokio::test]
    async fn test_validate_derives_output() {
        let Json(report) = validate(Json(input())).await;
        assert!(report.can_forge);
        assert_eq!(
            report.output,
            Some(std::path::PathBuf::from("mightyestimator.py"))
        );
    }

    #[tokio::test]
    async fn test_forge_returns_code() {
        let Json(response) = forge(State(state("cat")), Json(input())).await.unwrap();
        assert_eq!(response.file_name, "mightyestimator.py");
        assert!(response
            .code
            .contains("class MightyEstimator(ClassifierMixin, BaseEstimator)"));
        assert!(response.code.contains("def predict_proba(self, X)"));
    }

    #[tokio::test]
    async fn test_forge_rejects_invalid_form() {
        let mut bad = input();
        bad.kind = None;

        let err = forge(State(state("cat")), Json(bad)).await.unwrap_err();
        assert!(matches!(&err, WebError::Invalid(errors) if errors.contains_key(&Field::Kind)));
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_forge_formatter_failure_is_server_error() {
        let err = forge(State(state("false")), Json(input())).await.unwrap_err();
        assert!(matches!(err, WebError::Forge(ForgeError::Formatter(_))));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

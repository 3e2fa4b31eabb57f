//! HTTP handlers for the form pages and the JSON API

use crate::error::AssessmentError;
use crate::models::inference::InferenceEngine;
use crate::types::domain::{Domain, FieldSpec};
use crate::types::verdict::Assessment;
use crate::web::page::{render_domain_page, render_not_found, PageView, TabState};
use crate::web::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, error};

fn not_found(state: &AppState, slug: &str) -> Response {
    let load_errors = state.engine.registry().load_errors();
    (
        StatusCode::NOT_FOUND,
        Html(render_not_found(slug, &load_errors)),
    )
        .into_response()
}

fn domain_page(
    state: &AppState,
    domain: Domain,
    values: &HashMap<String, String>,
    tab: &TabState,
) -> Response {
    let registry = state.engine.registry();
    let load_errors = registry.load_errors();
    let view = PageView {
        domain,
        values,
        state: tab,
        load_errors: &load_errors,
        available: registry.is_available(domain),
    };
    Html(render_domain_page(&view)).into_response()
}

/// Run an assessment on the blocking pool; ONNX sessions run synchronously.
async fn assess_blocking<F>(
    state: &AppState,
    job: F,
) -> Result<Result<Assessment, AssessmentError>, Response>
where
    F: FnOnce(&InferenceEngine) -> Result<Assessment, AssessmentError> + Send + 'static,
{
    let engine = state.engine.clone();
    tokio::task::spawn_blocking(move || job(&*engine))
        .await
        .map_err(|e| {
            error!(error = %e, "Assessment task failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "assessment task failed").into_response()
        })
}

/// `GET /` - open the first tab
pub async fn index_handler() -> Redirect {
    Redirect::to(&format!("/{}", Domain::ALL[0].slug()))
}

/// `GET /{domain}` - empty form
pub async fn form_handler(State(state): State<Arc<AppState>>, Path(slug): Path<String>) -> Response {
    match slug.parse::<Domain>() {
        Ok(domain) => domain_page(&state, domain, &HashMap::new(), &TabState::Idle),
        Err(_) => not_found(&state, &slug),
    }
}

/// `POST /{domain}` - submit the form and render the outcome inline
pub async fn submit_handler(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Form(values): Form<HashMap<String, String>>,
) -> Response {
    let Ok(domain) = slug.parse::<Domain>() else {
        return not_found(&state, &slug);
    };

    let form = values.clone();
    let outcome = assess_blocking(&state, move |engine| engine.assess_form(domain, &form)).await;
    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(response) => return response,
    };

    domain_page(&state, domain, &values, &TabState::from(outcome))
}

/// Text the parser sees for one submitted JSON value.
///
/// Numbers and strings pass through; anything else keeps its JSON spelling
/// and is rejected by the parser as not numeric.
fn value_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Body of `POST /api/v1/assess/{domain}`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AssessRequest {
    /// Values in the domain's field order
    Positional { values: Vec<Value> },
    /// Values keyed by form key
    Keyed { fields: HashMap<String, Value> },
}

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
    pub domain: Option<Domain>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub problems: Vec<crate::error::InputProblem>,
}

/// Assessment error rendered as an API response
pub struct ApiError(pub AssessmentError);

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0 {
            AssessmentError::InvalidInput { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AssessmentError::ModelUnavailable { .. } | AssessmentError::ModelLoad { .. } => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AssessmentError::ModelContractViolation { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let problems = match &self.0 {
            AssessmentError::InvalidInput { problems, .. } => problems.clone(),
            _ => Vec::new(),
        };
        let body = ErrorBody {
            error: self.0.kind(),
            message: self.0.to_string(),
            domain: Some(self.0.domain()),
            problems,
        };
        (status, Json(body)).into_response()
    }
}

/// `POST /api/v1/assess/{domain}`
pub async fn assess_api_handler(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    request: Result<Json<AssessRequest>, JsonRejection>,
) -> Response {
    let Ok(domain) = slug.parse::<Domain>() else {
        let body = ErrorBody {
            error: "unknown_domain",
            message: format!("unknown assessment domain: {}", slug),
            domain: None,
            problems: Vec::new(),
        };
        return (StatusCode::NOT_FOUND, Json(body)).into_response();
    };

    let request = match request {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return ApiError(state.engine.reject_malformed(domain, rejection.body_text()))
                .into_response()
        }
    };

    let outcome = match request {
        AssessRequest::Positional { values } => {
            let texts: Vec<String> = values.into_iter().map(value_text).collect();
            assess_blocking(&state, move |engine| engine.assess_values(domain, &texts)).await
        }
        AssessRequest::Keyed { fields } => {
            let form: HashMap<String, String> = fields
                .into_iter()
                .map(|(key, value)| (key, value_text(value)))
                .collect();
            assess_blocking(&state, move |engine| engine.assess_form(domain, &form)).await
        }
    };

    match outcome {
        Ok(Ok(assessment)) => Json(assessment).into_response(),
        Ok(Err(e)) => {
            debug!(domain = %domain, error = %e, "API assessment rejected");
            ApiError(e).into_response()
        }
        Err(response) => response,
    }
}

/// Domain catalogue entry
#[derive(Debug, Serialize)]
pub struct DomainInfo {
    pub domain: Domain,
    pub name: &'static str,
    pub title: &'static str,
    pub arity: usize,
    pub available: bool,
    pub fields: &'static [FieldSpec],
}

/// `GET /api/v1/domains`
pub async fn domains_handler(State(state): State<Arc<AppState>>) -> Json<Vec<DomainInfo>> {
    let registry = state.engine.registry();
    let domains = Domain::ALL
        .into_iter()
        .map(|domain| DomainInfo {
            domain,
            name: domain.display_name(),
            title: domain.page_title(),
            arity: domain.arity(),
            available: registry.is_available(domain),
            fields: domain.fields(),
        })
        .collect();
    Json(domains)
}

/// Model status in the health report
#[derive(Debug, Serialize)]
pub struct ModelHealth {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body of `GET /health`
#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub models: BTreeMap<Domain, ModelHealth>,
}

/// `GET /health` - per-domain model availability
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthReport> {
    let registry = state.engine.registry();
    let models: BTreeMap<Domain, ModelHealth> = Domain::ALL
        .into_iter()
        .map(|domain| {
            (
                domain,
                ModelHealth {
                    available: registry.is_available(domain),
                    error: registry.load_error(domain).map(ToString::to_string),
                },
            )
        })
        .collect();

    let status = if models.values().all(|m| m.available) {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthReport { status, models })
}

/// `GET /api/v1/stats`
pub async fn stats_handler(State(state): State<Arc<AppState>>) -> Response {
    Json(state.engine.metrics().snapshot()).into_response()
}

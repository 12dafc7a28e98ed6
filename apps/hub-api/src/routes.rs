use axum::{
	Json, Router,
	extract::{RawQuery, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::get,
};
use serde::Serialize;

use hub_domain::ResponseFormat;
use hub_search::Error;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/api/search/v2", get(search))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn search(
	State(state): State<AppState>,
	RawQuery(raw_query): RawQuery,
) -> Result<Response, ApiError> {
	let raw_query = raw_query.unwrap_or_default();
	let mut sr = state.service.parse_request(&raw_query)?;

	if let Some(echo_type) = echo_param(&raw_query) {
		let echo = state.service.echo(&mut sr, &echo_type)?;

		return Ok(Json(echo).into_response());
	}

	if matches!(sr.response_format, ResponseFormat::Protobuf | ResponseFormat::BulkAction) {
		return Err(json_error(
			StatusCode::BAD_REQUEST,
			"unsupported_format",
			format!("Response format {:?} is not served by this endpoint.", sr.response_format),
		));
	}

	let outcome = state.service.search(sr).await?;

	Ok(Json(outcome).into_response())
}

fn echo_param(raw_query: &str) -> Option<String> {
	url::form_urlencoded::parse(raw_query.as_bytes())
		.find(|(key, value)| key == "echo" && !value.is_empty())
		.map(|(_, value)| value.into_owned())
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}
impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		let message = err.to_string();
		let api_error = match err {
			Error::InvalidRequest { .. } => {
				json_error(StatusCode::BAD_REQUEST, "invalid_request", message)
			},
			Error::Namespace { .. } => {
				json_error(StatusCode::BAD_REQUEST, "namespace_not_found", message)
			},
			Error::Upstream { .. } => json_error(StatusCode::BAD_GATEWAY, "upstream_error", message),
			Error::Encoding { .. } => {
				json_error(StatusCode::INTERNAL_SERVER_ERROR, "encoding_error", message)
			},
			Error::InvalidResponse { .. } => {
				json_error(StatusCode::INTERNAL_SERVER_ERROR, "invalid_response", message)
			},
		};

		let code = api_error.error_code.as_str();

		if api_error.status.is_server_error() {
			tracing::error!(error_code = code, message = %api_error.message, "Search failed.");
		} else {
			tracing::warn!(error_code = code, message = %api_error.message, "Search rejected.");
		}

		api_error
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}

pub fn json_error(status: StatusCode, code: &str, message: impl Into<String>) -> ApiError {
	ApiError::new(status, code, message)
}

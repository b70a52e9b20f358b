//! Request language resolution and error message localization
//!
//! Resolves the request language from `?lang=` and `Accept-Language`, stores
//! it as a request extension, and rewrites error envelopes with the
//! translated generic message.

use axum::extract::{Request, State};
use axum::http::header::ACCEPT_LANGUAGE;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::handlers::response::{ErrorBody, ErrorEnvelope, ErrorInfo};
use crate::state::AppState;

/// Language chosen for the current request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLanguage(pub String);

fn query_language(query: Option<&str>) -> Option<String> {
    query?
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "lang")
        .map(|(_, value)| urlencoding::decode(value).map(|v| v.into_owned()).unwrap_or_default())
}

pub async fn localize(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let query = query_language(request.uri().query());
    let accept = request
        .headers()
        .get(ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let lang = state.i18n.resolve_language(query.as_deref(), accept.as_deref());

    request.extensions_mut().insert(RequestLanguage(lang.clone()));
    let response = next.run(request).await;

    let Some(info) = response.extensions().get::<ErrorInfo>().cloned() else {
        return response;
    };

    let envelope = ErrorEnvelope {
        success: false,
        error: ErrorBody {
            code: info.code,
            message: state.i18n.t(info.message_key, &lang, None),
        },
    };
    let mut localized = (response.status(), Json(envelope)).into_response();
    localized.extensions_mut().insert(info);
    localized
}

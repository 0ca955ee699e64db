// src/middleware/json.rs

use axum::{
    extract::{FromRequest, Request},
    http::header,
    Json,
};
use serde::de::DeserializeOwned;

use crate::{
    common::error::{ApiError, AppError},
    middleware::i18n::Locale,
};

// Igual ao `Json` do axum, mas corpo ausente ou malformado vira 400 no formato `{ "error": ... }`
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let locale = req
            .headers()
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok())
            .map(Locale::from_header)
            .unwrap_or_default();

        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => {
                tracing::debug!("Corpo JSON recusado: {}", rejection.body_text());
                let prefixo = if locale.is_english() {
                    "Invalid request body"
                } else {
                    "Corpo da requisição inválido"
                };
                Err(AppError::InvalidInput(format!("{}: {}", prefixo, rejection.body_text())).to_api_error(&locale))
            }
        }
    }
}

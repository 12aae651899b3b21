//! Calls to the registrar REST API over `gloo_net`.
//!
//! Every helper resolves to `Result<T, ApiFailure>`: a non-2xx response is decoded
//! from the server's `{ error, field }` body, anything else becomes a transport
//! message.

use std::fmt;

use common::requests::ErrorBody;
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use web_sys::FormData;

#[derive(Clone, Debug, PartialEq)]
pub struct ApiFailure {
    pub message: String,
    /// Form key the server blamed, when it named one.
    pub field: Option<String>,
}

impl ApiFailure {
    fn transport(err: impl fmt::Display) -> Self {
        ApiFailure {
            message: err.to_string(),
            field: None,
        }
    }
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

async fn read<T: DeserializeOwned>(response: Response) -> Result<T, ApiFailure> {
    if response.ok() {
        return response.json::<T>().await.map_err(ApiFailure::transport);
    }
    let status = response.status();
    match response.json::<ErrorBody>().await {
        Ok(body) => Err(ApiFailure {
            message: body.error,
            field: body.field,
        }),
        Err(_) => Err(ApiFailure {
            message: format!("Request failed with status {}", status),
            field: None,
        }),
    }
}

pub async fn get_json<T: DeserializeOwned>(url: &str, query: &[(&str, &str)]) -> Result<T, ApiFailure> {
    let response = Request::get(url)
        .query(query.iter().copied())
        .send()
        .await
        .map_err(ApiFailure::transport)?;
    read(response).await
}

pub async fn post_json<B, T>(url: &str, body: &B) -> Result<T, ApiFailure>
where
    B: Serialize,
    T: DeserializeOwned,
{
    let response = Request::post(url)
        .json(body)
        .map_err(ApiFailure::transport)?
        .send()
        .await
        .map_err(ApiFailure::transport)?;
    read(response).await
}

/// Posts a multipart body; the browser sets the boundary header.
pub async fn post_form<T: DeserializeOwned>(url: &str, data: FormData) -> Result<T, ApiFailure> {
    let response = Request::post(url)
        .body(data)
        .map_err(ApiFailure::transport)?
        .send()
        .await
        .map_err(ApiFailure::transport)?;
    read(response).await
}

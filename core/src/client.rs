//! Stateless HTTP request builder and response parser for the customer API.
//!
//! # Design
//! `CustomerClient` holds only a `base_url` and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. Validation runs inside `build_*`, so an invalid payload
//! never becomes a request.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateCustomer, Customer, CustomerKey, CustomerPatch, NewCustomer, UpdateCustomer};
use crate::validation::validate_customer_id;

/// Builds requests for, and parses responses from, the customer endpoints.
#[derive(Debug, Clone)]
pub struct CustomerClient {
    base_url: String,
}

impl CustomerClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_customers(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/customers/", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Fetch one customer by its business `customer_id`.
    pub fn build_get_customer(&self, customer_id: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/customers/{customer_id}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_customer(&self, input: &NewCustomer) -> Result<HttpRequest, ApiError> {
        validate_customer_id(&input.customer_id)?;
        let body = CreateCustomer::from(input);
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}/customers/", self.base_url),
            headers: json_headers(),
            body: Some(to_json(&body)?),
        })
    }

    /// Numeric keys go to `/customers/id/{n}`, everything else to
    /// `/customers/{id}`. `customer_id` is only checked when it will be sent.
    pub fn build_update_customer(
        &self,
        id: &CustomerKey,
        patch: &CustomerPatch,
    ) -> Result<HttpRequest, ApiError> {
        let body = UpdateCustomer::from(patch);
        if let Some(customer_id) = &body.customer_id {
            validate_customer_id(customer_id)?;
        }
        let url = match id {
            CustomerKey::Numeric(n) => format!("{}/customers/id/{n}", self.base_url),
            CustomerKey::Opaque(s) => format!("{}/customers/{s}", self.base_url),
        };
        Ok(HttpRequest {
            method: HttpMethod::Put,
            url,
            headers: json_headers(),
            body: Some(to_json(&body)?),
        })
    }

    pub fn build_delete_customer(&self, id: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            url: format!("{}/customers/{id}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_list_customers(&self, response: HttpResponse) -> Result<Vec<Customer>, ApiError> {
        check_status(&response)?;
        from_json(&response.body)
    }

    pub fn parse_get_customer(&self, response: HttpResponse) -> Result<Customer, ApiError> {
        check_status(&response)?;
        from_json(&response.body)
    }

    pub fn parse_create_customer(&self, response: HttpResponse) -> Result<Customer, ApiError> {
        check_status(&response)?;
        from_json(&response.body)
    }

    pub fn parse_update_customer(&self, response: HttpResponse) -> Result<Customer, ApiError> {
        check_status(&response)?;
        from_json(&response.body)
    }

    /// Any response body is ignored.
    pub fn parse_delete_customer(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }
}

fn json_headers() -> Vec<(String, String)> {
    vec![("content-type".to_string(), "application/json".to_string())]
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::SerializationError(e.to_string()))
}

fn from_json<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-2xx status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

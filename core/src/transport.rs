//! Executes `HttpRequest` values against the network.
//!
//! # Design
//! `Transport` is the only seam that performs I/O. `UreqTransport` is the
//! production implementation; tests substitute a recording mock.
//! `HttpClient` wraps a transport with the configured default headers and
//! an ordered chain of interceptors, so auth or tracing headers can be
//! injected without the service layer knowing about them.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs one HTTP round-trip. Non-2xx statuses are data, not errors;
/// `Err` is reserved for requests that produced no response at all.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by a shared `ureq` agent.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// `timeout` bounds the whole request, connect through body read.
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = request.url.as_str();
        let headers = &request.headers;
        let result = match request.method {
            HttpMethod::Get => with_headers(self.agent.get(url), headers).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(url), headers).call(),
            HttpMethod::Post => {
                let builder = with_headers(self.agent.post(url), headers);
                match &request.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
            HttpMethod::Put => {
                let builder = with_headers(self.agent.put(url), headers);
                match &request.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };
        let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

/// Hook into every request before it is sent and every response before it
/// is parsed. Returning `Err` aborts the call with that error.
pub trait Interceptor: Send + Sync {
    fn on_request(&self, _request: &mut HttpRequest) -> Result<(), ApiError> {
        Ok(())
    }

    fn on_response(&self, _response: &mut HttpResponse) -> Result<(), ApiError> {
        Ok(())
    }
}

/// Sets a fixed header on every request, replacing any existing value.
#[derive(Debug, Clone)]
pub struct HeaderInterceptor {
    name: String,
    value: String,
}

impl HeaderInterceptor {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn bearer(token: &str) -> Self {
        Self::new("authorization", format!("Bearer {token}"))
    }
}

impl Interceptor for HeaderInterceptor {
    fn on_request(&self, request: &mut HttpRequest) -> Result<(), ApiError> {
        request
            .headers
            .retain(|(name, _)| !name.eq_ignore_ascii_case(&self.name));
        request.headers.push((self.name.clone(), self.value.clone()));
        Ok(())
    }
}

/// A transport plus the request-level policy applied around it.
pub struct HttpClient<T> {
    transport: T,
    default_headers: Vec<(String, String)>,
    interceptors: Vec<Box<dyn Interceptor>>,
}

impl<T: Transport> HttpClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            default_headers: Vec::new(),
            interceptors: Vec::new(),
        }
    }

    pub fn from_config(config: &ClientConfig, transport: T) -> Self {
        Self {
            transport,
            default_headers: config.default_headers.clone(),
            interceptors: Vec::new(),
        }
    }

    /// Interceptors run in the order they were added, for requests and
    /// responses alike.
    pub fn with_interceptor(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.interceptors.push(Box::new(interceptor));
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn send(&self, mut request: HttpRequest) -> Result<HttpResponse, ApiError> {
        for (name, value) in &self.default_headers {
            request.set_default_header(name, value);
        }
        for interceptor in &self.interceptors {
            interceptor.on_request(&mut request)?;
        }

        debug!(method = %request.method, url = %request.url, "sending request");
        let mut response = self.transport.execute(&request)?;
        debug!(status = response.status, url = %request.url, "received response");

        for interceptor in &self.interceptors {
            interceptor.on_response(&mut response)?;
        }
        Ok(response)
    }
}

impl HttpClient<UreqTransport> {
    /// Network client honouring the configured timeout and headers.
    pub fn connect(config: &ClientConfig) -> Self {
        Self::from_config(config, UreqTransport::new(config.timeout))
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// Replays queued responses in order and records every request.
    #[derive(Default)]
    pub(crate) struct MockTransport {
        responses: Mutex<VecDeque<Result<HttpResponse, ApiError>>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl MockTransport {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn respond(&self, status: u16, body: &str) -> &Self {
            self.responses.lock().unwrap().push_back(Ok(HttpResponse {
                status,
                headers: Vec::new(),
                body: body.to_string(),
            }));
            self
        }

        pub(crate) fn fail(&self, error: ApiError) -> &Self {
            self.responses.lock().unwrap().push_back(Err(error));
            self
        }

        pub(crate) fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl Transport for MockTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            self.requests.lock().unwrap().push(request.clone());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::Transport("no response queued".to_string())))
        }
    }
}

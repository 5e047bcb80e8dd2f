//! Customer CRUD operations over a configured `HttpClient`.
//!
//! Every operation follows the same policy: build (and validate) the
//! request, send it, parse the response. Any failure is logged where it is
//! detected, together with the server's response body when there is one,
//! and then returned to the caller unchanged. There is no retry.

use tracing::{debug, error, instrument};

use crate::client::CustomerClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::transport::{HttpClient, Interceptor, Transport, UreqTransport};
use crate::types::{Customer, CustomerKey, CustomerPatch, NewCustomer};

pub struct CustomerService<T> {
    client: CustomerClient,
    http: HttpClient<T>,
}

impl CustomerService<UreqTransport> {
    /// Service talking to the network with `config`'s base url, timeout and
    /// default headers. The config is validated first.
    pub fn connect(config: &ClientConfig) -> Result<Self, ApiError> {
        config.validate()?;
        Ok(Self {
            client: CustomerClient::new(&config.base_url),
            http: HttpClient::connect(config),
        })
    }

    /// Reads the config from the environment, including a `.env` file in
    /// the working directory when there is one.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::connect(&ClientConfig::from_dotenv()?)
    }
}

impl<T: Transport> CustomerService<T> {
    pub fn new(config: &ClientConfig, transport: T) -> Self {
        Self {
            client: CustomerClient::new(&config.base_url),
            http: HttpClient::from_config(config, transport),
        }
    }

    pub fn with_interceptor(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.http = self.http.with_interceptor(interceptor);
        self
    }

    pub fn client(&self) -> &CustomerClient {
        &self.client
    }

    pub fn http(&self) -> &HttpClient<T> {
        &self.http
    }

    /// The full collection, in server order.
    #[instrument(skip(self))]
    pub fn list(&self) -> Result<Vec<Customer>, ApiError> {
        let request = self.client.build_list_customers();
        let customers = self
            .http
            .send(request)
            .and_then(|response| self.client.parse_list_customers(response))
            .inspect_err(|e| log_failure("fetching customers", e))?;
        debug!(count = customers.len(), "fetched customers");
        Ok(customers)
    }

    #[instrument(skip(self))]
    pub fn get(&self, customer_id: &str) -> Result<Customer, ApiError> {
        let request = self.client.build_get_customer(customer_id);
        self.http
            .send(request)
            .and_then(|response| self.client.parse_get_customer(response))
            .inspect_err(|e| log_failure("fetching customer", e))
    }

    /// Validates `customer_id` before anything is sent. Unset demand becomes
    /// 1 and unset optional fields are sent as `null`.
    #[instrument(skip(self, customer), fields(customer_id = %customer.customer_id))]
    pub fn create(&self, customer: &NewCustomer) -> Result<Customer, ApiError> {
        let created = self
            .client
            .build_create_customer(customer)
            .inspect(|request| debug!(body = ?request.body, "creating customer"))
            .and_then(|request| self.http.send(request))
            .and_then(|response| self.client.parse_create_customer(response))
            .inspect_err(|e| log_failure("creating customer", e))?;
        debug!(id = ?created.id, "created customer");
        Ok(created)
    }

    /// Sends only the fields of `patch` that carry a value. Numeric ids use
    /// the `/customers/id/{n}` route.
    #[instrument(skip(self, id, patch), fields(id = %id))]
    pub fn update(&self, id: &CustomerKey, patch: &CustomerPatch) -> Result<Customer, ApiError> {
        let updated = self
            .client
            .build_update_customer(id, patch)
            .inspect(|request| debug!(body = ?request.body, "updating customer"))
            .and_then(|request| self.http.send(request))
            .and_then(|response| self.client.parse_update_customer(response))
            .inspect_err(|e| log_failure("updating customer", e))?;
        debug!("updated customer");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub fn delete(&self, id: &str) -> Result<(), ApiError> {
        let request = self.client.build_delete_customer(id);
        self.http
            .send(request)
            .and_then(|response| self.client.parse_delete_customer(response))
            .inspect_err(|e| log_failure("deleting customer", e))
    }
}

fn log_failure(action: &str, err: &ApiError) {
    error!(error = %err, "{action} failed");
    if let Some(body) = err.response_body() {
        error!(body, "error details");
    }
}

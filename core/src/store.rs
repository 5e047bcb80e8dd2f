//! In-memory cache of the customer list, kept in step with the server.
//!
//! # Design
//! `CustomerStore` is constructed explicitly around a `CustomerService`;
//! there is no global instance. Each action calls the service first and only
//! touches local state once the call succeeded, so a failed action leaves
//! the cache exactly as it was and hands the original error back.
//!
//! Records are matched by `id`, or by business `customer_id` when the key is
//! opaque. A target that is not in the cache is a silent no-op, not an
//! error: the server call still happens.

use tracing::debug;

use crate::error::ApiError;
use crate::service::CustomerService;
use crate::transport::Transport;
use crate::types::{Customer, CustomerKey, CustomerPatch, NewCustomer};

pub struct CustomerStore<T> {
    service: CustomerService<T>,
    customers: Vec<Customer>,
    loading: bool,
    current: Option<Customer>,
}

impl<T: Transport> CustomerStore<T> {
    pub fn new(service: CustomerService<T>) -> Self {
        Self {
            service,
            customers: Vec::new(),
            loading: false,
            current: None,
        }
    }

    pub fn service(&self) -> &CustomerService<T> {
        &self.service
    }

    /// Cached records in the order the server last returned them, followed
    /// by any created since.
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn current_customer(&self) -> Option<&Customer> {
        self.current.as_ref()
    }

    pub fn set_customers(&mut self, customers: Vec<Customer>) {
        self.customers = customers;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn select(&mut self, customer: Option<Customer>) {
        self.current = customer;
    }

    /// Replace the cache with the server's list. `loading` is raised for the
    /// duration of the call and always lowered afterwards.
    pub fn fetch(&mut self) -> Result<&[Customer], ApiError> {
        self.loading = true;
        let result = self.service.list();
        self.loading = false;

        self.customers = result?;
        debug!(count = self.customers.len(), "customer cache refreshed");
        Ok(&self.customers)
    }

    /// Appends the server's record to the cache and returns it.
    pub fn create(&mut self, customer: &NewCustomer) -> Result<Customer, ApiError> {
        let created = self.service.create(customer)?;
        self.customers.push(created.clone());
        Ok(created)
    }

    pub fn update(&mut self, id: &CustomerKey, patch: &CustomerPatch) -> Result<Customer, ApiError> {
        let updated = self.service.update(id, patch)?;
        match self.customers.iter_mut().find(|c| c.matches(id)) {
            Some(slot) => *slot = updated.clone(),
            None => debug!(%id, "updated customer is not cached"),
        }
        if self.current.as_ref().is_some_and(|c| c.matches(id)) {
            self.current = Some(updated.clone());
        }
        Ok(updated)
    }

    pub fn delete(&mut self, id: &CustomerKey) -> Result<(), ApiError> {
        self.service.delete(&id.to_string())?;
        match self.customers.iter().position(|c| c.matches(id)) {
            Some(index) => {
                self.customers.remove(index);
            }
            None => debug!(%id, "deleted customer is not cached"),
        }
        if self.current.as_ref().is_some_and(|c| c.matches(id)) {
            self.current = None;
        }
        Ok(())
    }
}

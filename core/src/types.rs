//! Domain DTOs for the customer API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently;
//! integration tests catch any schema drift between the two crates.
//!
//! Input types (`NewCustomer`, `CustomerPatch`) are what callers fill in.
//! Wire types (`CreateCustomer`, `UpdateCustomer`) are what actually gets
//! serialized, after defaults are applied and empty values are dropped.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::enums::{CustomerSource, CustomerStatus, CustomerType, ShopBrand};

/// Demand sent when the caller leaves it unset or zero.
pub const DEFAULT_DEMAND: u32 = 1;

/// Server-assigned identifier.
///
/// The backend exposes two update routes: `/customers/id/{n}` for the
/// numeric database id and `/customers/{id}` for anything else. The variant
/// decides which one is used.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomerKey {
    Numeric(i64),
    Opaque(String),
}

impl CustomerKey {
    /// True when both keys render to the same path segment, so numeric `42`
    /// and opaque `"42"` name the same record.
    pub fn same_record(&self, other: &CustomerKey) -> bool {
        match (self, other) {
            (CustomerKey::Numeric(a), CustomerKey::Numeric(b)) => a == b,
            (CustomerKey::Opaque(a), CustomerKey::Opaque(b)) => a == b,
            _ => self.to_string() == other.to_string(),
        }
    }
}

impl fmt::Display for CustomerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomerKey::Numeric(n) => write!(f, "{n}"),
            CustomerKey::Opaque(s) => f.write_str(s),
        }
    }
}

impl From<i64> for CustomerKey {
    fn from(id: i64) -> Self {
        CustomerKey::Numeric(id)
    }
}

impl From<&str> for CustomerKey {
    fn from(id: &str) -> Self {
        CustomerKey::Opaque(id.to_string())
    }
}

impl From<String> for CustomerKey {
    fn from(id: String) -> Self {
        CustomerKey::Opaque(id)
    }
}

/// A customer record as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CustomerKey>,
    pub shop: ShopBrand,
    pub customer_id: String,
    pub source: CustomerSource,
    pub customer_type: CustomerType,
    #[serde(default = "default_demand")]
    pub demand: u32,
    #[serde(default)]
    pub demand_description: Option<String>,
    pub customer_status: CustomerStatus,
    #[serde(default)]
    pub expected_order_date: Option<String>,
    #[serde(default)]
    pub expected_order_amount: Option<f64>,
    #[serde(default)]
    pub last_modified_date: Option<String>,
    #[serde(default)]
    pub creation_date: Option<String>,
}

fn default_demand() -> u32 {
    DEFAULT_DEMAND
}

/// Display labels of a customer's enum fields. Unregistered keys are shown
/// as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomerLabels<'a> {
    pub shop: &'a str,
    pub source: &'a str,
    pub customer_type: &'a str,
    pub customer_status: &'a str,
}

impl Customer {
    pub fn labels(&self) -> CustomerLabels<'_> {
        CustomerLabels {
            shop: self.shop.label(),
            source: self.source.label(),
            customer_type: self.customer_type.label(),
            customer_status: self.customer_status.label(),
        }
    }

    /// Whether this record is the one `key` refers to. An opaque key also
    /// names the record whose business `customer_id` it equals, since that
    /// is what the `/customers/{id}` routes look up.
    pub fn matches(&self, key: &CustomerKey) -> bool {
        let by_id = self.id.as_ref().is_some_and(|id| id.same_record(key));
        by_id || matches!(key, CustomerKey::Opaque(k) if *k == self.customer_id)
    }
}

/// Caller input for creating a customer. Server-assigned fields are absent
/// by construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCustomer {
    pub shop: ShopBrand,
    pub customer_id: String,
    pub source: CustomerSource,
    pub customer_type: CustomerType,
    #[serde(default)]
    pub demand: Option<u32>,
    #[serde(default)]
    pub demand_description: Option<String>,
    pub customer_status: CustomerStatus,
    #[serde(default)]
    pub expected_order_date: Option<String>,
    #[serde(default)]
    pub expected_order_amount: Option<f64>,
}

/// Caller input for a partial update. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CustomerPatch {
    #[serde(default)]
    pub shop: Option<ShopBrand>,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub source: Option<CustomerSource>,
    #[serde(default)]
    pub customer_type: Option<CustomerType>,
    #[serde(default)]
    pub demand: Option<u32>,
    #[serde(default)]
    pub demand_description: Option<String>,
    #[serde(default)]
    pub customer_status: Option<CustomerStatus>,
    #[serde(default)]
    pub expected_order_date: Option<String>,
    #[serde(default)]
    pub expected_order_amount: Option<f64>,
}

/// Create body as sent on the wire. Optional fields are always present,
/// as `null` when unset.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreateCustomer {
    pub customer_id: String,
    pub shop: ShopBrand,
    pub source: CustomerSource,
    pub customer_type: CustomerType,
    pub customer_status: CustomerStatus,
    pub demand: u32,
    pub demand_description: Option<String>,
    pub expected_order_date: Option<String>,
    pub expected_order_amount: Option<f64>,
}

impl From<&NewCustomer> for CreateCustomer {
    fn from(input: &NewCustomer) -> Self {
        Self {
            customer_id: input.customer_id.clone(),
            shop: input.shop.clone(),
            source: input.source.clone(),
            customer_type: input.customer_type.clone(),
            customer_status: input.customer_status.clone(),
            demand: input.demand.filter(|d| *d != 0).unwrap_or(DEFAULT_DEMAND),
            demand_description: non_empty(&input.demand_description),
            expected_order_date: non_empty(&input.expected_order_date),
            expected_order_amount: non_zero(input.expected_order_amount),
        }
    }
}

/// Sparse update body. Only fields carrying a meaningful value are
/// serialized; an empty string, zero demand or zero amount is dropped the
/// same way an unset field is.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct UpdateCustomer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shop: Option<ShopBrand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<CustomerSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_type: Option<CustomerType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_status: Option<CustomerStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demand: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demand_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_order_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_order_amount: Option<f64>,
}

impl From<&CustomerPatch> for UpdateCustomer {
    fn from(patch: &CustomerPatch) -> Self {
        Self {
            shop: patch.shop.clone(),
            source: patch.source.clone(),
            customer_type: patch.customer_type.clone(),
            customer_status: patch.customer_status.clone(),
            customer_id: non_empty(&patch.customer_id),
            demand: patch.demand.filter(|d| *d != 0),
            demand_description: non_empty(&patch.demand_description),
            expected_order_date: non_empty(&patch.expected_order_date),
            expected_order_amount: non_zero(patch.expected_order_amount),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.is_empty()).cloned()
}

fn non_zero(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && !v.is_nan())
}

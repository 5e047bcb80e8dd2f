//! Client-side data layer for the customer management API.
//!
//! # Overview
//! Layers, leaf first:
//! - `enums`: internal keys and display labels for the four enum families.
//! - `client`: builds `HttpRequest` values and parses `HttpResponse` values
//!   without touching the network.
//! - `transport`: executes requests (`ureq` in production) behind default
//!   headers and an interceptor chain.
//! - `service`: the CRUD contract, with validation in front of the network
//!   and log-then-return error handling.
//! - `store`: an explicitly constructed cache of the customer list that
//!   mutates itself after each successful service call.
//!
//! # Design
//! - The request builder is stateless; it holds only `base_url`.
//! - Enum values travel as internal keys. Labels are for display only and
//!   unknown keys render as themselves.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod enums;
pub mod error;
pub mod http;
pub mod service;
pub mod store;
pub mod transport;
pub mod types;
pub mod validation;

pub use client::CustomerClient;
pub use config::ClientConfig;
pub use enums::{
    convert_to_frontend_enum, CustomerSource, CustomerStatus, CustomerType, EnumFamily, ShopBrand,
};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use service::CustomerService;
pub use store::CustomerStore;
pub use transport::{HeaderInterceptor, HttpClient, Interceptor, Transport, UreqTransport};
pub use types::{Customer, CustomerKey, CustomerPatch, NewCustomer};

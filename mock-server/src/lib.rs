use std::{
    collections::BTreeMap,
    sync::{Arc, LazyLock},
};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

pub const API_PREFIX: &str = "/api/v1";

static CUSTOMER_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]{3,50}$").expect("customer_id pattern compiles"));

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Shop {
    Yi,
    Li,
    Mo,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomerSource {
    NaturalFlow,
    Recommended,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomerType {
    New,
    Old,
    OldChangedId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomerStatus {
    Consulting,
    Sample,
    PreparingOrder,
    Dead,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub shop: Shop,
    pub customer_id: String,
    pub source: CustomerSource,
    pub customer_type: CustomerType,
    pub demand: u32,
    pub demand_description: Option<String>,
    pub customer_status: CustomerStatus,
    pub expected_order_date: Option<String>,
    pub expected_order_amount: Option<f64>,
    pub last_modified_date: DateTime<Utc>,
    pub creation_date: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct CreateCustomer {
    pub shop: Shop,
    pub customer_id: String,
    pub source: CustomerSource,
    pub customer_type: CustomerType,
    pub demand: u32,
    #[serde(default)]
    pub demand_description: Option<String>,
    pub customer_status: CustomerStatus,
    #[serde(default)]
    pub expected_order_date: Option<String>,
    #[serde(default)]
    pub expected_order_amount: Option<f64>,
}

#[derive(Deserialize, Default)]
pub struct UpdateCustomer {
    pub shop: Option<Shop>,
    pub customer_id: Option<String>,
    pub source: Option<CustomerSource>,
    pub customer_type: Option<CustomerType>,
    pub demand: Option<u32>,
    pub demand_description: Option<String>,
    pub customer_status: Option<CustomerStatus>,
    pub expected_order_date: Option<String>,
    pub expected_order_amount: Option<f64>,
}

/// Error body, shaped `{"detail": "..."}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

type ApiResult<T> = Result<T, (StatusCode, Json<ErrorBody>)>;

fn reject(status: StatusCode, detail: impl Into<String>) -> (StatusCode, Json<ErrorBody>) {
    (
        status,
        Json(ErrorBody {
            detail: detail.into(),
        }),
    )
}

fn not_found() -> (StatusCode, Json<ErrorBody>) {
    reject(StatusCode::NOT_FOUND, "customer not found")
}

/// Customers keyed by their auto-incremented id, so iteration order is
/// creation order.
#[derive(Default)]
pub struct Db {
    next_id: i64,
    customers: BTreeMap<i64, Customer>,
}

impl Db {
    fn id_for(&self, customer_id: &str) -> Option<i64> {
        self.customers
            .values()
            .find(|c| c.customer_id == customer_id)
            .map(|c| c.id)
    }

    fn customer_id_taken(&self, customer_id: &str, except: Option<i64>) -> bool {
        self.customers
            .values()
            .any(|c| c.customer_id == customer_id && Some(c.id) != except)
    }
}

pub type SharedDb = Arc<RwLock<Db>>;

pub fn app() -> Router {
    let db: SharedDb = Arc::new(RwLock::new(Db::default()));
    let customers = Router::new()
        .route("/customers/", get(list_customers).post(create_customer))
        .route(
            "/customers/{customer_id}",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
        .route("/customers/id/{id}", put(update_customer_by_id))
        .with_state(db);
    Router::new().nest(API_PREFIX, customers)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn validate_customer_id(customer_id: &str) -> ApiResult<()> {
    if CUSTOMER_ID.is_match(customer_id) {
        Ok(())
    } else {
        Err(reject(
            StatusCode::UNPROCESSABLE_ENTITY,
            "customer_id must be 3-50 letters, digits, underscores or hyphens",
        ))
    }
}

fn validate_demand(demand: u32) -> ApiResult<()> {
    if (1..10_000).contains(&demand) {
        Ok(())
    } else {
        Err(reject(
            StatusCode::UNPROCESSABLE_ENTITY,
            "demand must be between 1 and 9999",
        ))
    }
}

const MAX_DESCRIPTION_CHARS: usize = 500;
const MAX_ORDER_AMOUNT: f64 = 1_000_000.0;

fn validate_description(description: Option<&str>) -> ApiResult<()> {
    match description {
        Some(text) if text.chars().count() > MAX_DESCRIPTION_CHARS => Err(reject(
            StatusCode::UNPROCESSABLE_ENTITY,
            "demand_description must be at most 500 characters",
        )),
        _ => Ok(()),
    }
}

fn validate_amount(amount: Option<f64>) -> ApiResult<()> {
    match amount {
        Some(value) if !(0.0..MAX_ORDER_AMOUNT).contains(&value) => Err(reject(
            StatusCode::UNPROCESSABLE_ENTITY,
            "expected_order_amount must be at least 0 and below 1000000",
        )),
        _ => Ok(()),
    }
}

async fn list_customers(State(db): State<SharedDb>) -> Json<Vec<Customer>> {
    let db = db.read().await;
    Json(db.customers.values().cloned().collect())
}

async fn create_customer(
    State(db): State<SharedDb>,
    Json(input): Json<CreateCustomer>,
) -> ApiResult<(StatusCode, Json<Customer>)> {
    validate_customer_id(&input.customer_id)?;
    validate_demand(input.demand)?;
    validate_description(input.demand_description.as_deref())?;
    validate_amount(input.expected_order_amount)?;

    let mut db = db.write().await;
    if db.customer_id_taken(&input.customer_id, None) {
        return Err(reject(StatusCode::CONFLICT, "customer_id already exists"));
    }
    db.next_id += 1;
    let now = Utc::now();
    let customer = Customer {
        id: db.next_id,
        shop: input.shop,
        customer_id: input.customer_id,
        source: input.source,
        customer_type: input.customer_type,
        demand: input.demand,
        demand_description: input.demand_description,
        customer_status: input.customer_status,
        expected_order_date: input.expected_order_date,
        expected_order_amount: input.expected_order_amount,
        last_modified_date: now,
        creation_date: now,
    };
    db.customers.insert(customer.id, customer.clone());
    info!(id = customer.id, customer_id = %customer.customer_id, "customer created");
    Ok((StatusCode::CREATED, Json(customer)))
}

async fn get_customer(
    State(db): State<SharedDb>,
    Path(customer_id): Path<String>,
) -> ApiResult<Json<Customer>> {
    let db = db.read().await;
    db.id_for(&customer_id)
        .and_then(|id| db.customers.get(&id))
        .map(|c| Json(c.clone()))
        .ok_or_else(not_found)
}

async fn update_customer(
    State(db): State<SharedDb>,
    Path(customer_id): Path<String>,
    Json(input): Json<UpdateCustomer>,
) -> ApiResult<Json<Customer>> {
    let mut db = db.write().await;
    let id = db.id_for(&customer_id).ok_or_else(not_found)?;
    apply_update(&mut db, id, input).map(Json)
}

async fn update_customer_by_id(
    State(db): State<SharedDb>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateCustomer>,
) -> ApiResult<Json<Customer>> {
    let mut db = db.write().await;
    if !db.customers.contains_key(&id) {
        return Err(not_found());
    }
    apply_update(&mut db, id, input).map(Json)
}

/// Validate, then apply only the fields present in `input`.
fn apply_update(db: &mut Db, id: i64, input: UpdateCustomer) -> ApiResult<Customer> {
    if let Some(customer_id) = &input.customer_id {
        validate_customer_id(customer_id)?;
        if db.customer_id_taken(customer_id, Some(id)) {
            return Err(reject(StatusCode::CONFLICT, "customer_id already exists"));
        }
    }
    if let Some(demand) = input.demand {
        validate_demand(demand)?;
    }
    validate_description(input.demand_description.as_deref())?;
    validate_amount(input.expected_order_amount)?;

    let customer = db.customers.get_mut(&id).ok_or_else(not_found)?;
    if let Some(shop) = input.shop {
        customer.shop = shop;
    }
    if let Some(customer_id) = input.customer_id {
        customer.customer_id = customer_id;
    }
    if let Some(source) = input.source {
        customer.source = source;
    }
    if let Some(customer_type) = input.customer_type {
        customer.customer_type = customer_type;
    }
    if let Some(demand) = input.demand {
        customer.demand = demand;
    }
    if let Some(description) = input.demand_description {
        customer.demand_description = Some(description);
    }
    if let Some(status) = input.customer_status {
        customer.customer_status = status;
    }
    if let Some(date) = input.expected_order_date {
        customer.expected_order_date = Some(date);
    }
    if let Some(amount) = input.expected_order_amount {
        customer.expected_order_amount = Some(amount);
    }
    customer.last_modified_date = Utc::now();
    info!(id, "customer updated");
    Ok(customer.clone())
}

async fn delete_customer(
    State(db): State<SharedDb>,
    Path(customer_id): Path<String>,
) -> ApiResult<StatusCode> {
    let mut db = db.write().await;
    let id = db.id_for(&customer_id).ok_or_else(not_found)?;
    db.customers.remove(&id);
    info!(id, %customer_id, "customer deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_serializes_enum_keys() {
        let now = Utc::now();
        let customer = Customer {
            id: 1,
            shop: Shop::Yi,
            customer_id: "CUST001".to_string(),
            source: CustomerSource::NaturalFlow,
            customer_type: CustomerType::OldChangedId,
            demand: 1,
            demand_description: None,
            customer_status: CustomerStatus::PreparingOrder,
            expected_order_date: None,
            expected_order_amount: None,
            last_modified_date: now,
            creation_date: now,
        };
        let json = serde_json::to_value(&customer).unwrap();
        assert_eq!(json["shop"], "YI");
        assert_eq!(json["source"], "NATURAL_FLOW");
        assert_eq!(json["customer_type"], "OLD_CHANGED_ID");
        assert_eq!(json["customer_status"], "PREPARING_ORDER");
        assert!(json["demand_description"].is_null());
    }

    #[test]
    fn create_customer_requires_demand() {
        let result: Result<CreateCustomer, _> = serde_json::from_str(
            r#"{"shop":"YI","customer_id":"abc","source":"RECOMMENDED","customer_type":"NEW","customer_status":"SAMPLE"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn create_customer_rejects_labels() {
        let result: Result<CreateCustomer, _> = serde_json::from_str(
            r#"{"shop":"依","customer_id":"abc","source":"RECOMMENDED","customer_type":"NEW","demand":1,"customer_status":"SAMPLE"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn update_customer_all_fields_optional() {
        let input: UpdateCustomer = serde_json::from_str(r#"{}"#).unwrap();
        assert!(input.shop.is_none());
        assert!(input.demand.is_none());
    }

    #[test]
    fn update_customer_partial_fields() {
        let input: UpdateCustomer =
            serde_json::from_str(r#"{"customer_status":"DEAD","demand":3}"#).unwrap();
        assert_eq!(input.customer_status, Some(CustomerStatus::Dead));
        assert_eq!(input.demand, Some(3));
        assert!(input.customer_id.is_none());
    }

    #[test]
    fn demand_bounds() {
        assert!(validate_demand(1).is_ok());
        assert!(validate_demand(9_999).is_ok());
        assert!(validate_demand(0).is_err());
        assert!(validate_demand(10_000).is_err());
    }

    #[test]
    fn description_length_counts_characters() {
        assert!(validate_description(None).is_ok());
        assert!(validate_description(Some("需".repeat(500).as_str())).is_ok());
        assert!(validate_description(Some("x".repeat(501).as_str())).is_err());
    }

    #[test]
    fn amount_bounds() {
        assert!(validate_amount(None).is_ok());
        assert!(validate_amount(Some(0.0)).is_ok());
        assert!(validate_amount(Some(999_999.99)).is_ok());
        assert!(validate_amount(Some(1_000_000.0)).is_err());
        assert!(validate_amount(Some(-1.0)).is_err());
        assert!(validate_amount(Some(f64::NAN)).is_err());
    }

    #[test]
    fn customer_id_format() {
        assert!(validate_customer_id("CUST-001_a").is_ok());
        assert!(validate_customer_id("ab").is_err());
        assert!(validate_customer_id("with space").is_err());
    }
}

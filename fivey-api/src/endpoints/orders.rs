use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::basket::{BasketPayload, SubtotalLine};
use super::cards::Card;
use super::catalog::Item;
use super::num;
use super::stores::Store;
use crate::error::DecodeError;
use crate::macros::setter;
use crate::request::{EmptyResponse, Method, Request, RequestData};

// Named subtotal line items in the detailed summary block
const SUBTOTAL_ORDER_TOTAL: &str = "Сумма заказа";
const SUBTOTAL_DELIVERY: &str = "Доставка";
const SUBTOTAL_ASSEMBLY: &str = "Сборка заказа";

// Common

/// Server-defined order states behind fixed integer codes. Payment and
/// presentation logic branch on these, so an unrecognized code fails
/// decoding instead of degrading into a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum OrderStatus {
    InCart,
    Confirmed,
    Collecting,
    Packing,
    WaitingForCourier,
    Completed,
    Cancelled,
    Delivering,
    Delivered,
    Paying,
}

impl TryFrom<i64> for OrderStatus {
    type Error = DecodeError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::InCart),
            2 => Ok(Self::Confirmed),
            3 => Ok(Self::Collecting),
            6 => Ok(Self::Packing),
            7 => Ok(Self::WaitingForCourier),
            9 => Ok(Self::Completed),
            10 => Ok(Self::Cancelled),
            12 => Ok(Self::Delivering),
            13 => Ok(Self::Delivered),
            100 => Ok(Self::Paying),
            other => Err(DecodeError::UnknownOrderStatus(other)),
        }
    }
}

impl From<OrderStatus> for i64 {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::InCart => 0,
            OrderStatus::Confirmed => 2,
            OrderStatus::Collecting => 3,
            OrderStatus::Packing => 6,
            OrderStatus::WaitingForCourier => 7,
            OrderStatus::Completed => 9,
            OrderStatus::Cancelled => 10,
            OrderStatus::Delivering => 12,
            OrderStatus::Delivered => 13,
            OrderStatus::Paying => 100,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::InCart => "В корзине",
            Self::Confirmed => "Подтверждён",
            Self::Collecting => "Собирается",
            Self::Packing => "Упаковывается",
            Self::WaitingForCourier => "Ждёт курьера",
            Self::Completed => "Завершён",
            Self::Cancelled => "Отменён",
            Self::Delivering => "Доставляется",
            Self::Delivered => "Доставлен",
            Self::Paying => "Оплачивается",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    pub house: String,
    pub street: String,
    pub city: String,
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}, {}", self.house, self.street, self.city)
    }
}

/// An order as the backend reports it, with the derived totals already
/// resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "OrderPayload")]
pub struct Order {
    pub id: String,
    pub human_id: Option<i64>,
    pub status: OrderStatus,
    pub total_sum: f64,
    /// Cost of the goods alone.
    pub order_sum: f64,
    /// Delivery and assembly on top of the goods.
    pub service_sum: f64,
    pub is_active: bool,
    pub address: Option<Address>,
    pub created: Option<DateTime<Utc>>,
    pub store_code: String,
    pub store_address: String,
    pub basket: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct OrderPayload {
    id: String,
    #[serde(default, deserialize_with = "num::opt_i64_flex")]
    human_id: Option<i64>,
    status: OrderStatus,
    #[serde(deserialize_with = "num::f64_flex")]
    total_sum: f64,
    #[serde(default, deserialize_with = "num::opt_f64_flex")]
    final_sum: Option<f64>,
    #[serde(default)]
    is_active: bool,
    #[serde(default)]
    address: Option<Address>,
    #[serde(default)]
    created: Option<DateTime<Utc>>,
    sap_code: String,
    shop_address: String,
    #[serde(default)]
    basket: Option<BasketPayload>,
}

/// Which of the two response generations the totals come from. Decided by
/// a structural test, each variant with its own derivation rule; there is
/// no fallback chain.
enum SummarySource<'a> {
    Detailed(&'a [SubtotalLine]),
    Simple { total_sum: f64, final_sum: f64 },
    NoBasket,
}

fn summary_source(payload: &OrderPayload) -> SummarySource<'_> {
    match &payload.basket {
        None => SummarySource::NoBasket,
        Some(basket) => match &basket.full_summary {
            Some(summary) => SummarySource::Detailed(&summary.subtotal),
            None => SummarySource::Simple {
                total_sum: payload.total_sum,
                final_sum: payload.final_sum.unwrap_or(payload.total_sum),
            },
        },
    }
}

impl From<OrderPayload> for Order {
    fn from(payload: OrderPayload) -> Self {
        let (order_sum, service_sum) = match summary_source(&payload) {
            SummarySource::Detailed(lines) => {
                let amount =
                    |name: &str| lines.iter().find(|line| line.name == name).map(|l| l.amount);
                let order_sum = amount(SUBTOTAL_ORDER_TOTAL).unwrap_or(payload.total_sum);
                let service_sum = amount(SUBTOTAL_DELIVERY).unwrap_or(0.0)
                    + amount(SUBTOTAL_ASSEMBLY).unwrap_or(0.0);
                (order_sum, service_sum)
            }
            SummarySource::Simple {
                total_sum,
                final_sum,
            } => (total_sum, final_sum - total_sum),
            SummarySource::NoBasket => (0.0, 0.0),
        };

        let basket = payload
            .basket
            .map(|basket| basket.items.into_iter().map(Item::from).collect())
            .unwrap_or_default();

        Self {
            id: payload.id,
            human_id: payload.human_id,
            status: payload.status,
            total_sum: payload.total_sum,
            order_sum,
            service_sum,
            is_active: payload.is_active,
            address: payload.address,
            created: payload.created,
            store_code: payload.sap_code,
            store_address: payload.shop_address,
            basket,
        }
    }
}

// Requests

#[derive(Debug, Clone, Serialize)]
pub struct ListOrders {
    offset: u32,
    limit: u32,
    in_action: bool,
}

impl Default for ListOrders {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 20,
            in_action: false,
        }
    }
}

impl ListOrders {
    pub fn new() -> Self {
        Self::default()
    }

    setter!(offset: u32);
    setter!(limit: u32);

    pub fn active_only(mut self, active: bool) -> Self {
        self.in_action = active;
        self
    }
}

impl Request for ListOrders {
    type Data = Self;
    type Response = OrdersPage;

    fn endpoint(&self) -> Cow<'_, str> {
        "/orders/v3/orders/".into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Query(self)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrdersPage {
    pub items: Vec<Order>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateOrder {
    address: DeliveryPoint,
    is_active: bool,
    sap_code: String,
    shop_address: String,
    #[serde(rename = "type")]
    order_type: &'static str,
}

#[derive(Debug, Clone, Serialize)]
struct DeliveryPoint {
    house: String,
    street: String,
    city: String,
    lat: String,
    lon: String,
}

impl CreateOrder {
    pub fn new(store: &Store, address: &Address, lat: f64, lon: f64) -> Self {
        Self {
            address: DeliveryPoint {
                house: address.house.clone(),
                street: address.street.clone(),
                city: address.city.clone(),
                lat: lat.to_string(),
                lon: lon.to_string(),
            },
            is_active: true,
            sap_code: store.code.clone(),
            shop_address: store.address.clone(),
            order_type: "delivery",
        }
    }
}

impl Request for CreateOrder {
    type Data = Self;
    type Response = Order;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        "/orders/v3/orders/".into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Json(self)
    }
}

#[derive(Debug, Clone)]
pub struct GetOrder {
    id: String,
}

impl GetOrder {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl Request for GetOrder {
    type Data = ();
    type Response = Order;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/orders/v4/orders/{}/", self.id).into()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SetAddressDetails {
    #[serde(skip)]
    order_id: String,
    address: AddressDetails,
    comment: String,
    delivery_type: &'static str,
}

#[derive(Debug, Clone, Default, Serialize)]
struct AddressDetails {
    entrance: String,
    flat: String,
    floor: String,
}

impl SetAddressDetails {
    pub fn new(order_id: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
            address: AddressDetails::default(),
            comment: String::new(),
            delivery_type: "express",
        }
    }

    setter!(address.entrance: String);
    setter!(address.flat: String);
    setter!(address.floor: String);
    setter!(comment: String);
}

impl Request for SetAddressDetails {
    type Data = Self;
    type Response = Order;
    const METHOD: Method = Method::PATCH;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/orders/v5/orders/{}/", self.order_id).into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Json(self)
    }
}

#[derive(Debug, Clone)]
pub struct ReviseOrder {
    order_id: String,
}

impl ReviseOrder {
    pub fn new(order_id: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
        }
    }
}

impl Request for ReviseOrder {
    type Data = ();
    type Response = EmptyResponse;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/orders/v1/orders/{}/revise", self.order_id).into()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PayByLinkedCard {
    #[serde(skip)]
    order_id: String,
    payment_active_id: i64,
}

impl PayByLinkedCard {
    pub fn new(order_id: impl Into<String>, card: &Card) -> Self {
        Self {
            order_id: order_id.into(),
            payment_active_id: card.id,
        }
    }
}

impl Request for PayByLinkedCard {
    type Data = Self;
    type Response = EmptyResponse;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/orders/v1/orders/{}/pay-by-linked-card", self.order_id).into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Json(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base_order(extra: serde_json::Value) -> serde_json::Value {
        let mut order = json!({
            "id": "a1b2",
            "human_id": "512",
            "status": 9,
            "total_sum": "500.00",
            "is_active": false,
            "address": {"house": "43", "street": "Каменноостровский проспект", "city": "Санкт-Петербург"},
            "created": "2024-11-02T18:20:00+03:00",
            "sap_code": "Y232",
            "shop_address": "Санкт-Петербург, Кронверкский пр., 23"
        });
        order
            .as_object_mut()
            .unwrap()
            .extend(extra.as_object().unwrap().clone());
        order
    }

    #[test]
    fn status_code_9_is_completed() {
        assert_eq!(OrderStatus::try_from(9), Ok(OrderStatus::Completed));
        assert_eq!(i64::from(OrderStatus::Completed), 9);
    }

    #[test]
    fn unrecognized_status_code_fails_decoding() {
        assert_eq!(
            OrderStatus::try_from(42),
            Err(DecodeError::UnknownOrderStatus(42))
        );

        let result = serde_json::from_value::<Order>(base_order(json!({"status": 42})));
        assert!(result.is_err());
    }

    #[test]
    fn detailed_summary_reads_the_named_lines() {
        let order: Order = serde_json::from_value(base_order(json!({
            "basket": {
                "items": [],
                "full_summary": {"subtotal": [
                    {"name": "Сумма заказа", "amount": 500},
                    {"name": "Доставка", "amount": "15.00"},
                    {"name": "Сборка заказа", "amount": 5}
                ]}
            }
        })))
        .unwrap();
        assert_eq!(order.order_sum, 500.0);
        assert_eq!(order.service_sum, 20.0);
    }

    #[test]
    fn simple_summary_derives_service_from_final_sum() {
        let order: Order = serde_json::from_value(base_order(json!({
            "final_sum": 520,
            "basket": {"items": []}
        })))
        .unwrap();
        assert_eq!(order.order_sum, 500.0);
        assert_eq!(order.service_sum, 20.0);
    }

    #[test]
    fn missing_basket_zeroes_both_sums() {
        let order: Order = serde_json::from_value(base_order(json!({}))).unwrap();
        assert_eq!(order.order_sum, 0.0);
        assert_eq!(order.service_sum, 0.0);
        assert!(order.basket.is_empty());
    }

    #[test]
    fn order_fields_map_and_coerce() {
        let order: Order = serde_json::from_value(base_order(json!({
            "basket": {"items": [{
                "product_plu": 4099,
                "name": "Салат Цезарь",
                "uom": "шт",
                "step": 1,
                "price_reg": "229.99",
                "price_promo": null,
                "quantity": 1
            }]}
        })))
        .unwrap();

        assert_eq!(order.human_id, Some(512));
        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(order.store_code, "Y232");
        assert_eq!(order.address.as_ref().unwrap().house, "43");
        assert_eq!(order.basket.len(), 1);
        assert!(order.created.is_some());
    }

    #[test]
    fn list_orders_carries_paging_defaults() {
        let list = ListOrders::new().limit(10u32).active_only(true);
        assert_eq!(list.endpoint(), "/orders/v3/orders/");
        let query = serde_json::to_value(&list).unwrap();
        assert_eq!(query["offset"], 0);
        assert_eq!(query["limit"], 10);
        assert_eq!(query["in_action"], true);
    }

    #[test]
    fn address_details_patch_targets_the_v5_order() {
        let patch = SetAddressDetails::new("a1b2")
            .flat("4")
            .comment("Домофон не работает");
        assert_eq!(patch.endpoint(), "/orders/v5/orders/a1b2/");
        let body = serde_json::to_value(&patch).unwrap();
        assert_eq!(body["address"]["flat"], "4");
        assert_eq!(body["delivery_type"], "express");
        assert!(body.get("order_id").is_none());
    }
}

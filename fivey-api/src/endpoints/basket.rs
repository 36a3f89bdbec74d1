use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use super::catalog::Item;
use super::{Plu, num};
use crate::request::{Method, Request, RequestData};

// Raw basket shape inside an order payload. Field names differ from the
// catalog shape ("product_plu"/"price_reg"/"price_promo"), so it maps
// into the same `Item` through its own payload type.

#[derive(Debug, Deserialize)]
pub(crate) struct BasketPayload {
    #[serde(default)]
    pub(crate) items: Vec<BasketItemPayload>,
    #[serde(default)]
    pub(crate) full_summary: Option<FullSummary>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BasketItemPayload {
    product_plu: Plu,
    name: String,
    uom: String,
    #[serde(deserialize_with = "num::f64_flex")]
    step: f64,
    #[serde(deserialize_with = "num::f64_flex")]
    price_reg: f64,
    #[serde(default, deserialize_with = "num::opt_f64_flex")]
    price_promo: Option<f64>,
    #[serde(deserialize_with = "num::f64_flex")]
    quantity: f64,
}

impl From<BasketItemPayload> for Item {
    fn from(payload: BasketItemPayload) -> Self {
        Self {
            plu: payload.product_plu,
            name: payload.name,
            unit_of_measure: payload.uom,
            step: payload.step,
            price_regular: payload.price_reg,
            price_discount: payload.price_promo,
            quantity: payload.quantity,
        }
    }
}

/// Detailed summary block present in newer order payloads; carries named
/// subtotal line items the sum derivation prefers over arithmetic.
#[derive(Debug, Deserialize)]
pub(crate) struct FullSummary {
    #[serde(default)]
    pub(crate) subtotal: Vec<SubtotalLine>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubtotalLine {
    pub(crate) name: String,
    #[serde(deserialize_with = "num::f64_flex")]
    pub(crate) amount: f64,
}

// Requests. Every basket mutation answers with the updated order payload.

#[derive(Debug, Clone, Serialize)]
pub struct ItemMutation {
    plu: Plu,
    qty: f64,
    uom: String,
}

#[derive(Debug, Clone)]
pub struct AddBasketItem {
    order_id: String,
    mutation: ItemMutation,
}

impl AddBasketItem {
    pub fn new(order_id: impl Into<String>, item: &Item) -> Self {
        Self {
            order_id: order_id.into(),
            mutation: ItemMutation {
                plu: item.plu,
                qty: item.quantity,
                uom: item.unit_of_measure.clone(),
            },
        }
    }
}

impl Request for AddBasketItem {
    type Data = ItemMutation;
    type Response = super::orders::Order;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/orders/v3/orders/{}/item/", self.order_id).into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Json(&self.mutation)
    }
}

#[derive(Debug, Clone)]
pub struct SetBasketItemQuantity {
    order_id: String,
    mutation: ItemMutation,
}

impl SetBasketItemQuantity {
    pub fn new(order_id: impl Into<String>, item: &Item, quantity: f64) -> Self {
        Self {
            order_id: order_id.into(),
            mutation: ItemMutation {
                plu: item.plu,
                qty: quantity,
                uom: item.unit_of_measure.clone(),
            },
        }
    }
}

impl Request for SetBasketItemQuantity {
    type Data = ItemMutation;
    type Response = super::orders::Order;
    const METHOD: Method = Method::PUT;

    fn endpoint(&self) -> Cow<'_, str> {
        format!(
            "/orders/v3/orders/{}/item/{}/",
            self.order_id, self.mutation.plu
        )
        .into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Json(&self.mutation)
    }
}

#[derive(Debug, Clone)]
pub struct RemoveBasketItem {
    order_id: String,
    plu: Plu,
}

impl RemoveBasketItem {
    pub fn new(order_id: impl Into<String>, plu: Plu) -> Self {
        Self {
            order_id: order_id.into(),
            plu,
        }
    }
}

impl Request for RemoveBasketItem {
    type Data = ();
    type Response = super::orders::Order;
    const METHOD: Method = Method::DELETE;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/orders/v3/orders/{}/item/{}/", self.order_id, self.plu).into()
    }
}

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use super::{Plu, num};
use crate::request::{Request, RequestData};

// Common

/// A catalog product, also the unit a basket is made of.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub plu: Plu,
    pub name: String,
    pub unit_of_measure: String,
    /// Increment quantum for the quantity.
    pub step: f64,
    pub price_regular: f64,
    pub price_discount: Option<f64>,
    pub quantity: f64,
}

impl Item {
    /// Effective price: the discount when present and nonzero, the
    /// regular price otherwise.
    pub fn price(&self) -> f64 {
        match self.price_discount {
            Some(discount) if discount > 0.0 => discount,
            _ => self.price_regular,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subcategory {
    #[serde(deserialize_with = "num::string_flex")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    #[serde(deserialize_with = "num::string_flex")]
    pub id: String,
    pub name: String,
    #[serde(rename = "categories", default)]
    pub subcategories: Vec<Subcategory>,
}

// Raw catalog shape: prices are nested, quantity is implied by the step

#[derive(Debug, Deserialize)]
pub(crate) struct CatalogProductPayload {
    plu: Plu,
    name: String,
    uom: String,
    #[serde(deserialize_with = "num::f64_flex")]
    step: f64,
    prices: PricesPayload,
}

#[derive(Debug, Deserialize)]
struct PricesPayload {
    #[serde(deserialize_with = "num::f64_flex")]
    regular: f64,
    #[serde(default, deserialize_with = "num::opt_f64_flex")]
    discount: Option<f64>,
}

impl From<CatalogProductPayload> for Item {
    fn from(payload: CatalogProductPayload) -> Self {
        Self {
            plu: payload.plu,
            name: payload.name,
            unit_of_measure: payload.uom,
            step: payload.step,
            price_regular: payload.prices.regular,
            price_discount: payload.prices.discount,
            quantity: payload.step,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(from = "ProductsPagePayload")]
pub struct ProductsPage {
    pub products: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct ProductsPagePayload {
    #[serde(default)]
    products: Vec<CatalogProductPayload>,
}

impl From<ProductsPagePayload> for ProductsPage {
    fn from(payload: ProductsPagePayload) -> Self {
        Self {
            products: payload.products.into_iter().map(Item::from).collect(),
        }
    }
}

// Requests

#[derive(Debug, Clone, Serialize)]
pub struct ModeQuery {
    mode: &'static str,
}

impl Default for ModeQuery {
    fn default() -> Self {
        Self { mode: "delivery" }
    }
}

#[derive(Debug, Clone)]
pub struct ListCategories {
    sap_code: String,
    query: ModeQuery,
}

impl ListCategories {
    pub fn new(sap_code: impl Into<String>) -> Self {
        Self {
            sap_code: sap_code.into(),
            query: ModeQuery::default(),
        }
    }
}

impl Request for ListCategories {
    type Data = ModeQuery;
    type Response = Vec<Category>;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/catalog/v2/stores/{}/categories", self.sap_code).into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Query(&self.query)
    }
}

#[derive(Debug, Clone)]
pub struct ProductsList {
    sap_code: String,
    category_id: String,
    query: ModeQuery,
}

impl ProductsList {
    pub fn new(sap_code: impl Into<String>, category_id: impl Into<String>) -> Self {
        Self {
            sap_code: sap_code.into(),
            category_id: category_id.into(),
            query: ModeQuery::default(),
        }
    }
}

impl Request for ProductsList {
    type Data = ModeQuery;
    type Response = ProductsPage;

    fn endpoint(&self) -> Cow<'_, str> {
        format!(
            "/catalog/v2/stores/{}/categories/{}/products_list",
            self.sap_code, self.category_id
        )
        .into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Query(&self.query)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchQuery {
    q: String,
    mode: &'static str,
    offset: u32,
    include_restrict: bool,
}

#[derive(Debug, Clone)]
pub struct Search {
    sap_code: String,
    query: SearchQuery,
}

impl Search {
    pub fn new(sap_code: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            sap_code: sap_code.into(),
            query: SearchQuery {
                q: query.into(),
                mode: "delivery",
                offset: 0,
                include_restrict: false,
            },
        }
    }
}

impl Request for Search {
    type Data = SearchQuery;
    type Response = ProductsPage;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/catalog/v3/stores/{}/search", self.sap_code).into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Query(&self.query)
    }
}

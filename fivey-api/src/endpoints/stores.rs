use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::request::{Request, RequestData};

/// A physical store able (or not) to deliver from its address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    #[serde(rename = "shop_address")]
    pub address: String,
    #[serde(rename = "store_city", default)]
    pub city: String,
    /// The backend's store/warehouse identifier.
    #[serde(rename = "sap_code")]
    pub code: String,
    #[serde(default)]
    pub has_delivery: bool,
    #[serde(default)]
    pub has_24h_delivery: bool,
}

// Requests

#[derive(Debug, Clone, Serialize)]
pub struct StoreByLocation {
    lat: f64,
    lon: f64,
}

impl StoreByLocation {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl Request for StoreByLocation {
    type Data = Self;
    type Response = Store;

    fn endpoint(&self) -> Cow<'_, str> {
        "/orders/v1/orders/stores/".into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Query(self)
    }
}

const DEFAULT_RADIUS: f64 = 0.025;

#[derive(Debug, Clone, Serialize)]
pub struct NearbyStores {
    top_latitude: f64,
    bottom_latitude: f64,
    left_longitude: f64,
    right_longitude: f64,
}

impl NearbyStores {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self::with_radius(lat, lon, DEFAULT_RADIUS)
    }

    pub fn with_radius(lat: f64, lon: f64, radius: f64) -> Self {
        Self {
            top_latitude: lat + radius,
            bottom_latitude: lat - radius,
            left_longitude: lon - radius,
            right_longitude: lon + radius,
        }
    }
}

impl Request for NearbyStores {
    type Data = Self;
    type Response = StoresPage;

    fn endpoint(&self) -> Cow<'_, str> {
        "/cita/v1/stores/map".into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Query(self)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(from = "StoresPagePayload")]
pub struct StoresPage {
    pub items: Vec<Store>,
}

// The map endpoint serves a reduced shape: address and sap code plus a
// round-the-clock flag; delivery capability is implied by presence.
#[derive(Debug, Deserialize)]
struct StoresPagePayload {
    #[serde(default)]
    items: Vec<MapStorePayload>,
}

#[derive(Debug, Deserialize)]
struct MapStorePayload {
    address: String,
    sap_code: String,
    #[serde(default)]
    is_24h: bool,
}

impl From<StoresPagePayload> for StoresPage {
    fn from(payload: StoresPagePayload) -> Self {
        Self {
            items: payload
                .items
                .into_iter()
                .map(|store| Store {
                    address: store.address,
                    city: String::new(),
                    code: store.sap_code,
                    has_delivery: true,
                    has_24h_delivery: store.is_24h,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_decodes_from_the_lookup_shape() {
        let store: Store = serde_json::from_str(
            r#"{
                "shop_address": "Санкт-Петербург, Кронверкский пр., 23",
                "store_city": "Санкт-Петербург",
                "sap_code": "Y232",
                "has_delivery": true,
                "has_24h_delivery": false
            }"#,
        )
        .unwrap();
        assert_eq!(store.code, "Y232");
        assert_eq!(store.city, "Санкт-Петербург");
        assert!(store.has_delivery);
    }

    #[test]
    fn map_items_fill_in_the_reduced_shape() {
        let page: StoresPage = serde_json::from_str(
            r#"{"items":[{"address":"Невский пр., 1","sap_code":"Y100","is_24h":true}]}"#,
        )
        .unwrap();
        let store = &page.items[0];
        assert_eq!(store.code, "Y100");
        assert!(store.has_delivery);
        assert!(store.has_24h_delivery);
        assert!(store.city.is_empty());
    }

    #[test]
    fn bounding_box_is_centered_on_the_location() {
        let nearby = NearbyStores::with_radius(59.9, 30.3, 0.1);
        let query = serde_json::to_value(&nearby).unwrap();
        assert_eq!(query["top_latitude"], 60.0);
        assert_eq!(query["bottom_latitude"], 59.8);
        assert_eq!(query["left_longitude"], 30.2);
        assert_eq!(query["right_longitude"], 30.4);
    }
}

use crate::endpoints::basket::{AddBasketItem, RemoveBasketItem, SetBasketItemQuantity};
use crate::endpoints::cards::ListCards;
use crate::endpoints::catalog::{Item, ListCategories, ProductsList, Search};
use crate::endpoints::orders::{
    Address, CreateOrder, GetOrder, ListOrders, PayByLinkedCard, ReviseOrder, SetAddressDetails,
};
use crate::endpoints::stores::{NearbyStores, Store, StoreByLocation};
use crate::endpoints::{Plu, cards::Card};

/// Entry point for building typed requests, grouped the way the backend
/// groups its paths.
pub struct Api;

impl Api {
    pub fn orders() -> OrderRepository {
        OrderRepository::new()
    }

    pub fn basket(order_id: impl Into<String>) -> BasketRepository {
        BasketRepository::new(order_id)
    }

    pub fn catalog(sap_code: impl Into<String>) -> CatalogRepository {
        CatalogRepository::new(sap_code)
    }

    pub fn stores() -> StoreRepository {
        StoreRepository::new()
    }

    pub fn cards() -> CardRepository {
        CardRepository::new()
    }
}

#[derive(Default)]
pub struct OrderRepository;

impl OrderRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn list(&self) -> ListOrders {
        ListOrders::new()
    }

    pub fn get(&self, id: impl Into<String>) -> GetOrder {
        GetOrder::new(id)
    }

    pub fn create(&self, store: &Store, address: &Address, lat: f64, lon: f64) -> CreateOrder {
        CreateOrder::new(store, address, lat, lon)
    }

    pub fn address_details(&self, order_id: impl Into<String>) -> SetAddressDetails {
        SetAddressDetails::new(order_id)
    }

    pub fn revise(&self, order_id: impl Into<String>) -> ReviseOrder {
        ReviseOrder::new(order_id)
    }

    pub fn pay(&self, order_id: impl Into<String>, card: &Card) -> PayByLinkedCard {
        PayByLinkedCard::new(order_id, card)
    }
}

pub struct BasketRepository {
    order_id: String,
}

impl BasketRepository {
    pub fn new(order_id: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
        }
    }

    pub fn add(&self, item: &Item) -> AddBasketItem {
        AddBasketItem::new(self.order_id.clone(), item)
    }

    pub fn set_quantity(&self, item: &Item, quantity: f64) -> SetBasketItemQuantity {
        SetBasketItemQuantity::new(self.order_id.clone(), item, quantity)
    }

    pub fn remove(&self, plu: Plu) -> RemoveBasketItem {
        RemoveBasketItem::new(self.order_id.clone(), plu)
    }
}

pub struct CatalogRepository {
    sap_code: String,
}

impl CatalogRepository {
    pub fn new(sap_code: impl Into<String>) -> Self {
        Self {
            sap_code: sap_code.into(),
        }
    }

    pub fn categories(&self) -> ListCategories {
        ListCategories::new(self.sap_code.clone())
    }

    pub fn products(&self, category_id: impl Into<String>) -> ProductsList {
        ProductsList::new(self.sap_code.clone(), category_id)
    }

    pub fn search(&self, query: impl Into<String>) -> Search {
        Search::new(self.sap_code.clone(), query)
    }
}

#[derive(Default)]
pub struct StoreRepository;

impl StoreRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn by_location(&self, lat: f64, lon: f64) -> StoreByLocation {
        StoreByLocation::new(lat, lon)
    }

    pub fn nearby(&self, lat: f64, lon: f64) -> NearbyStores {
        NearbyStores::new(lat, lon)
    }
}

#[derive(Default)]
pub struct CardRepository;

impl CardRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn list(&self) -> ListCards {
        ListCards::new()
    }
}

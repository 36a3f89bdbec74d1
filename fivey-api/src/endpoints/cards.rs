use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use super::num;
use crate::request::Request;

/// A payment card linked to the account; orders are paid against its id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    #[serde(deserialize_with = "num::i64_flex")]
    pub id: i64,
    #[serde(default)]
    pub display_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct ListCards;

impl ListCards {
    pub fn new() -> Self {
        Self
    }
}

impl Request for ListCards {
    type Data = ();
    type Response = CardsPage;

    fn endpoint(&self) -> Cow<'_, str> {
        "/orders/v1/orders/payments/cards/".into()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CardsPage {
    #[serde(default)]
    pub items: Vec<Card>,
}

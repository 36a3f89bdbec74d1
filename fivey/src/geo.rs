//! Yandex geocoder collaborator: one GET translating a free-form address
//! into coordinates plus house/street/city components.

use anyhow::{Context, Result};
use serde_json::Value;

use fivey_api::endpoints::orders::Address;

const GEOCODER_URL: &str = "https://geocode-maps.yandex.ru/1.x/";
const GEOCODER_API_KEY: &str = "ad7c40a7-7096-43c9-b6e2-5e1f6d06b9ec";

#[derive(Debug, Clone)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
    pub address: Address,
}

pub async fn location_by_search(http: &reqwest::Client, query: &str) -> Result<Location> {
    let data: Value = http
        .get(GEOCODER_URL)
        .query(&[
            ("apikey", GEOCODER_API_KEY),
            ("geocode", query),
            ("format", "json"),
        ])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let object = data
        .pointer("/response/GeoObjectCollection/featureMember/0/GeoObject")
        .context("geocoder returned no matches")?;

    let pos = object
        .pointer("/Point/pos")
        .and_then(Value::as_str)
        .context("geocoder match has no position")?;
    let (lon, lat) = parse_pos(pos)?;

    Ok(Location {
        lat,
        lon,
        address: address_from_components(object),
    })
}

// "lon lat" per the geocoder's coordinate order
fn parse_pos(pos: &str) -> Result<(f64, f64)> {
    let mut parts = pos.split_whitespace();
    let lon = parts
        .next()
        .context("empty position")?
        .parse()
        .context("longitude is not a number")?;
    let lat = parts
        .next()
        .context("position has no latitude")?
        .parse()
        .context("latitude is not a number")?;
    Ok((lon, lat))
}

fn address_from_components(object: &Value) -> Address {
    let mut address = Address {
        house: String::new(),
        street: String::new(),
        city: String::new(),
    };

    let Some(components) = object
        .pointer("/metaDataProperty/GeocoderMetaData/Address/Components")
        .and_then(Value::as_array)
    else {
        return address;
    };

    for component in components {
        let kind = component.get("kind").and_then(Value::as_str).unwrap_or("");
        let name = component.get("name").and_then(Value::as_str).unwrap_or("");
        match kind {
            "house" => address.house = name.to_string(),
            "locality" => address.city = name.to_string(),
            // Districts stand in for a city when the match has none
            "area" if address.city.is_empty() => address.city = name.to_string(),
            "street" => address.street = name.to_string(),
            _ => {}
        }
    }
    address
}

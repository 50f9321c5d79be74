use crate::utils::error::{EstateError, Result};
use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::sync::LazyLock;

static NON_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9]").expect("static price pattern"));

/// 解析 `"$4,500,000"` 這類顯示價格：去除所有非數字字元
pub fn parse_price(raw: &str) -> Result<u64> {
    let digits = NON_DIGITS.replace_all(raw, "");
    if digits.is_empty() {
        return Err(EstateError::invalid_input(
            "price",
            format!("'{}' contains no digits", raw),
        ));
    }

    digits
        .parse::<u64>()
        .map_err(|e| EstateError::invalid_input("price", format!("'{}': {}", raw, e)))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PriceRepr {
    Amount(u64),
    Display(String),
}

pub(crate) fn deserialize_price<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match PriceRepr::deserialize(deserializer)? {
        PriceRepr::Amount(amount) => Ok(amount),
        PriceRepr::Display(text) => parse_price(&text).map_err(serde::de::Error::custom),
    }
}

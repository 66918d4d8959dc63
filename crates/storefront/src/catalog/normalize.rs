//! Flattening of category-grouped catalog records.
//!
//! The endpoint is backed by a spreadsheet, so cells arrive loosely typed:
//! ids may be numbers, prices may be strings. Everything is coerced here so
//! the rest of the storefront only sees [`CatalogItem`].

use std::collections::HashSet;
use std::str::FromStr;

use dapur_core::{ItemId, ItemStatus, Price};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Map, Value};

use super::CatalogItem;
use super::filter::ALL_CATEGORIES;

/// Placeholder image for items without a picture, keyed by item id.
#[must_use]
pub fn placeholder_image(id: &ItemId) -> String {
    format!("https://picsum.photos/seed/{}/400/300", urlencoding::encode(id.as_str()))
}

/// Loose truthiness, matching how the endpoint's `status` flag is produced.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Flatten `{ category: [record, ..] }` into items and category tabs.
///
/// Category order follows the response. Records without an id, records that
/// are not objects, and repeated ids are skipped with a warning.
///
/// # Errors
///
/// Returns a description of the problem if a category does not hold an array.
pub fn flatten(data: &Map<String, Value>) -> Result<(Vec<CatalogItem>, Vec<String>), String> {
    let mut items = Vec::new();
    let mut seen = HashSet::new();
    let mut categories = Vec::with_capacity(data.len() + 1);
    categories.push(ALL_CATEGORIES.to_string());

    for (label, records) in data {
        let Value::Array(records) = records else {
            return Err(format!("category {label:?} is not a list of items"));
        };
        categories.push(label.clone());

        for record in records {
            let Some(item) = normalize_record(label, record) else {
                tracing::warn!(category = %label, record = %record, "Skipping unusable catalog record");
                continue;
            };
            if !seen.insert(item.id.clone()) {
                tracing::warn!(id = %item.id, "Skipping duplicate catalog id");
                continue;
            }
            items.push(item);
        }
    }

    Ok((items, categories))
}

/// Normalize one raw record. Returns `None` when it has no usable id.
#[must_use]
pub fn normalize_record(category_label: &str, record: &Value) -> Option<CatalogItem> {
    let fields = record.as_object()?;
    let id = match fields.get("id")? {
        Value::String(s) if !s.is_empty() => ItemId::new(s.as_str()),
        Value::Number(n) => ItemId::new(n.to_string()),
        _ => return None,
    };

    let name = fields
        .get("menu")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let image_url = match fields.get("gambar").and_then(Value::as_str) {
        Some(url) if !url.trim().is_empty() => url.to_string(),
        _ => placeholder_image(&id),
    };
    let status = fields
        .get("status")
        .and_then(Value::as_str)
        .map_or(ItemStatus::Inactive, ItemStatus::from_raw);

    Some(CatalogItem {
        price: Price::myr(decimal_field(fields, "harga", &id)),
        original_price: Price::myr(decimal_field(fields, "harga_asal", &id)),
        stock: decimal_field(fields, "stok", &id).trunc().to_i64().unwrap_or(0),
        id,
        name,
        status,
        image_url,
        category: category_label.to_lowercase(),
        category_label: category_label.to_string(),
    })
}

/// Read a numeric cell, defaulting to zero when absent or unparseable.
fn decimal_field(fields: &Map<String, Value>, key: &str, id: &ItemId) -> Decimal {
    match fields.get(key) {
        None | Some(Value::Null) => Decimal::ZERO,
        Some(value) => coerce_decimal(value).unwrap_or_else(|| {
            tracing::warn!(%id, field = key, value = %value, "Non-numeric catalog cell, using 0");
            Decimal::ZERO
        }),
    }
}

/// Coerce a JSON number or numeric string to a decimal.
#[must_use]
pub fn coerce_decimal(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) if s.trim().is_empty() => return Some(Decimal::ZERO),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

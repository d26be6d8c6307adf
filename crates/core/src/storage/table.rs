//! Column-oriented JSON table codec.
//!
//! Ledger files store records the way a dataframe serializes with
//! `orient="columns"`: an object per column, keyed by stringified row
//! index, as in `{ "PurchasePrice": { "0": 1000.0, "1": 250.5 }, ... }`.
//! Row indices are compared numerically on decode, so `"10"` sorts
//! after `"2"`. Every column must carry the identical index set;
//! anything else is reported as a parse failure and surfaced by the
//! store as a corrupt ledger.

use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::errors::CoreError;
use crate::models::ledger::{PurchaseRecord, RoguePurchaseRecord, DATE_FORMAT};

pub const COL_DATE: &str = "DateofPurchase";
pub const COL_PURCHASE_PRICE: &str = "PurchasePrice";
pub const COL_SHARES: &str = "StocksPurchased";
pub const COL_PRICE_PER_SHARE: &str = "StockPrice";
pub const COL_CURRENCY: &str = "Currency";

/// Column order for the dated purchase table.
pub const PURCHASE_COLUMNS: &[&str] = &[
    COL_DATE,
    COL_PURCHASE_PRICE,
    COL_SHARES,
    COL_PRICE_PER_SHARE,
    COL_CURRENCY,
];

/// Column order for the rogue-holdings table (no date).
pub const ROGUE_COLUMNS: &[&str] = &[
    COL_PURCHASE_PRICE,
    COL_SHARES,
    COL_PRICE_PER_SHARE,
    COL_CURRENCY,
];

// ── Encoding ────────────────────────────────────────────────────────

pub fn encode_purchases(records: &[PurchaseRecord]) -> Value {
    let mut dates = Map::new();
    let mut prices = Map::new();
    let mut shares = Map::new();
    let mut per_share = Map::new();
    let mut currencies = Map::new();

    for (i, record) in records.iter().enumerate() {
        let key = i.to_string();
        dates.insert(
            key.clone(),
            Value::String(record.date.format(DATE_FORMAT).to_string()),
        );
        prices.insert(key.clone(), Value::from(record.purchase_price));
        shares.insert(key.clone(), Value::from(record.shares_purchased));
        per_share.insert(key.clone(), Value::from(record.price_per_share));
        currencies.insert(key, Value::String(record.currency.clone()));
    }

    let mut table = Map::new();
    table.insert(COL_DATE.into(), Value::Object(dates));
    table.insert(COL_PURCHASE_PRICE.into(), Value::Object(prices));
    table.insert(COL_SHARES.into(), Value::Object(shares));
    table.insert(COL_PRICE_PER_SHARE.into(), Value::Object(per_share));
    table.insert(COL_CURRENCY.into(), Value::Object(currencies));
    Value::Object(table)
}

pub fn encode_rogue_holdings(records: &[RoguePurchaseRecord]) -> Value {
    let mut prices = Map::new();
    let mut shares = Map::new();
    let mut per_share = Map::new();
    let mut currencies = Map::new();

    for (i, record) in records.iter().enumerate() {
        let key = i.to_string();
        prices.insert(key.clone(), Value::from(record.purchase_price));
        shares.insert(key.clone(), Value::from(record.shares_purchased));
        per_share.insert(key.clone(), Value::from(record.price_per_share));
        currencies.insert(key, Value::String(record.currency.clone()));
    }

    let mut table = Map::new();
    table.insert(COL_PURCHASE_PRICE.into(), Value::Object(prices));
    table.insert(COL_SHARES.into(), Value::Object(shares));
    table.insert(COL_PRICE_PER_SHARE.into(), Value::Object(per_share));
    table.insert(COL_CURRENCY.into(), Value::Object(currencies));
    Value::Object(table)
}

// ── Decoding ────────────────────────────────────────────────────────

pub fn decode_purchases(value: &Value) -> Result<Vec<PurchaseRecord>, CoreError> {
    let table = as_table(value)?;
    let order = row_order(table, PURCHASE_COLUMNS)?;

    let mut records = Vec::with_capacity(order.len());
    for key in &order {
        let date_str = string_cell(table, COL_DATE, key)?;
        let date = NaiveDate::parse_from_str(&date_str, DATE_FORMAT).map_err(|e| {
            CoreError::Serialization(format!(
                "row {key}: invalid {COL_DATE} value '{date_str}': {e}"
            ))
        })?;
        records.push(PurchaseRecord {
            date,
            purchase_price: number_cell(table, COL_PURCHASE_PRICE, key)?,
            shares_purchased: number_cell(table, COL_SHARES, key)?,
            price_per_share: number_cell(table, COL_PRICE_PER_SHARE, key)?,
            currency: string_cell(table, COL_CURRENCY, key)?,
        });
    }
    Ok(records)
}

pub fn decode_rogue_holdings(value: &Value) -> Result<Vec<RoguePurchaseRecord>, CoreError> {
    let table = as_table(value)?;
    let order = row_order(table, ROGUE_COLUMNS)?;

    let mut records = Vec::with_capacity(order.len());
    for key in &order {
        records.push(RoguePurchaseRecord {
            purchase_price: number_cell(table, COL_PURCHASE_PRICE, key)?,
            shares_purchased: number_cell(table, COL_SHARES, key)?,
            price_per_share: number_cell(table, COL_PRICE_PER_SHARE, key)?,
            currency: string_cell(table, COL_CURRENCY, key)?,
        });
    }
    Ok(records)
}

// ── Internal helpers ────────────────────────────────────────────────

fn as_table(value: &Value) -> Result<&Map<String, Value>, CoreError> {
    value
        .as_object()
        .ok_or_else(|| CoreError::Serialization("top level is not a JSON object".into()))
}

fn column<'a>(
    table: &'a Map<String, Value>,
    name: &str,
) -> Result<&'a Map<String, Value>, CoreError> {
    table
        .get(name)
        .ok_or_else(|| CoreError::Serialization(format!("missing column '{name}'")))?
        .as_object()
        .ok_or_else(|| CoreError::Serialization(format!("column '{name}' is not an object")))
}

/// Determine row order from the first column's indices (sorted
/// numerically) and verify every other column carries the same set.
/// An empty top-level object decodes as an empty table.
fn row_order(table: &Map<String, Value>, columns: &[&str]) -> Result<Vec<String>, CoreError> {
    if table.is_empty() {
        return Ok(Vec::new());
    }

    let first = column(table, columns[0])?;
    let mut indices: Vec<usize> = Vec::with_capacity(first.len());
    for key in first.keys() {
        let idx: usize = key.parse().map_err(|_| {
            CoreError::Serialization(format!("row index '{key}' is not a number"))
        })?;
        indices.push(idx);
    }
    indices.sort_unstable();
    indices.dedup();
    if indices.len() != first.len() {
        return Err(CoreError::Serialization("duplicate row indices".into()));
    }

    let order: Vec<String> = indices.iter().map(usize::to_string).collect();
    for name in &columns[1..] {
        let col = column(table, name)?;
        if col.len() != order.len() || !order.iter().all(|k| col.contains_key(k)) {
            return Err(CoreError::Serialization(format!(
                "column '{name}' does not match the row index set"
            )));
        }
    }
    Ok(order)
}

fn cell<'a>(
    table: &'a Map<String, Value>,
    name: &str,
    key: &str,
) -> Result<&'a Value, CoreError> {
    column(table, name)?
        .get(key)
        .ok_or_else(|| CoreError::Serialization(format!("column '{name}' is missing row {key}")))
}

fn number_cell(table: &Map<String, Value>, name: &str, key: &str) -> Result<f64, CoreError> {
    cell(table, name, key)?.as_f64().ok_or_else(|| {
        CoreError::Serialization(format!("row {key}: column '{name}' is not a number"))
    })
}

fn string_cell(table: &Map<String, Value>, name: &str, key: &str) -> Result<String, CoreError> {
    cell(table, name, key)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| {
            CoreError::Serialization(format!("row {key}: column '{name}' is not a string"))
        })
}

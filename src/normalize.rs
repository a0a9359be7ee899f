use serde_json::Value;

use crate::types::{QuoteRecord, RawRecord};

/// Contract code keys, tried in order
const CONTRACT_KEYS: [&str; 2] = ["symbol", "contractSymbol"];

pub fn normalize(raw: RawRecord) -> QuoteRecord {
    match raw {
        RawRecord::Json(item) => from_json(&item),
        RawRecord::Cells(cells) => from_cells(cells),
    }
}

fn from_json(item: &Value) -> QuoteRecord {
    let field = |key: &str| item.get(key).map(value_text).unwrap_or_default();

    let contract = CONTRACT_KEYS
        .iter()
        .map(|key| field(*key))
        .find(|s| !s.is_empty())
        .unwrap_or_default();

    QuoteRecord {
        contract,
        last: field("lastPrice"),
        change: field("priceChange"),
        open: field("openPrice"),
        high: field("highPrice"),
        low: field("lowPrice"),
        previous: field("previousPrice"),
        volume: field("volume"),
        open_interest: field("openInterest"),
        trade_time: field("tradeTime"),
    }
}

fn from_cells(cells: Vec<String>) -> QuoteRecord {
    let mut cells = cells.into_iter();
    let mut next = || cells.next().unwrap_or_default();

    QuoteRecord {
        contract: next(),
        last: next(),
        change: next(),
        open: next(),
        high: next(),
        low: next(),
        previous: next(),
        volume: next(),
        open_interest: next(),
        trade_time: next(),
    }
}

/// Render a JSON value as ledger text; null becomes empty
fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

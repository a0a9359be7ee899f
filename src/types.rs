//! Quote record types shared by the fetchers, the normalizer and the ledger

use serde_json::Value;

/// One contract's snapshot as it will be written to the ledger.
///
/// Every field stays text so the source's formatting is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteRecord {
    pub contract: String,
    pub last: String,
    pub change: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub previous: String,
    pub volume: String,
    pub open_interest: String,
    pub trade_time: String,
}

impl QuoteRecord {
    /// Fields in ledger column order, date excluded
    pub fn fields(&self) -> [&str; 10] {
        [
            self.contract.as_str(),
            self.last.as_str(),
            self.change.as_str(),
            self.open.as_str(),
            self.high.as_str(),
            self.low.as_str(),
            self.previous.as_str(),
            self.volume.as_str(),
            self.open_interest.as_str(),
            self.trade_time.as_str(),
        ]
    }
}

/// A record as handed back by a fetch strategy, before normalization
#[derive(Debug, Clone, PartialEq)]
pub enum RawRecord {
    /// One entry of the API's `results` array
    Json(Value),
    /// Cell texts of one table row, already in ledger column order
    Cells(Vec<String>),
}

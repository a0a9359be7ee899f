//! Run configuration with the production defaults for the sugar futures ledger

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use chrono_tz::Tz;
use clap::ValueEnum;

pub const QUOTES_PAGE_URL: &str = "https://www.barchart.com/futures/quotes/SB*0/futures-prices";
pub const QUOTES_API_URL: &str = "https://www.barchart.com/proxies/core-api/v1/quotes/get";
pub const DEFAULT_OUTFILE: &str = "sugar-futures.csv";
pub const TOKEN_COOKIE: &str = "XSRF-TOKEN";
pub const CONTRACT_ROOT: &str = "SB";
pub const CONTRACT_LIST: &str = "futures.contractInRoot";
pub const BATCH_SIZE: usize = 6;
pub const TARGET_HOUR: u32 = 10;

/// Fields requested from the quotes API, in ledger column order
pub const API_FIELDS: [&str; 10] = [
    "symbol",
    "lastPrice",
    "priceChange",
    "openPrice",
    "highPrice",
    "lowPrice",
    "previousPrice",
    "volume",
    "openInterest",
    "tradeTime",
];

/// How quotes are retrieved
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// Cookie handshake followed by the internal JSON API
    Api,
    /// Scrape the quotes table out of the page markup
    Html,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Api => f.write_str("api"),
            Strategy::Html => f.write_str("html"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub page_url: String,
    pub api_url: String,
    pub token_cookie: String,
    pub root: String,
    pub list: String,
    pub fields: Vec<String>,
    pub batch_size: usize,
    pub output: PathBuf,
    pub timezone: Tz,
    /// Local hour (0-23) in `timezone` during which a run may write
    pub target_hour: u32,
    pub strategy: Strategy,
    pub api_timeout: Duration,
    pub html_timeout: Duration,
    pub api_user_agent: String,
    pub html_user_agent: String,
    /// Honour HTTP(S)_PROXY from the environment
    pub use_system_proxy: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_url: QUOTES_PAGE_URL.to_string(),
            api_url: QUOTES_API_URL.to_string(),
            token_cookie: TOKEN_COOKIE.to_string(),
            root: CONTRACT_ROOT.to_string(),
            list: CONTRACT_LIST.to_string(),
            fields: API_FIELDS.iter().map(|f| f.to_string()).collect(),
            batch_size: BATCH_SIZE,
            output: PathBuf::from(DEFAULT_OUTFILE),
            timezone: chrono_tz::Europe::Berlin,
            target_hour: TARGET_HOUR,
            strategy: Strategy::Api,
            api_timeout: Duration::from_secs(30),
            html_timeout: Duration::from_secs(60),
            api_user_agent: "Mozilla/5.0".to_string(),
            html_user_agent: "Mozilla/5.0 (compatible; SugarFuturesLedger/0.1)".to_string(),
            use_system_proxy: true,
        }
    }
}

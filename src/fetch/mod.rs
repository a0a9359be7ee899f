//! Quote retrieval strategies.
//!
//! Both strategies hand back raw records for the configured batch, nearest
//! contract first, and leave normalization to the caller.

mod api;
mod html;

pub use api::ApiStrategy;
pub use html::HtmlStrategy;

use std::time::Duration;

use reqwest::blocking::{Client, ClientBuilder};

use crate::config::{Config, Strategy};
use crate::error::JobError;
use crate::types::RawRecord;

pub trait FetchStrategy {
    fn name(&self) -> &'static str;

    /// One attempt, no retries
    fn fetch(&self) -> Result<Vec<RawRecord>, JobError>;
}

pub fn strategy_for(config: &Config) -> Result<Box<dyn FetchStrategy>, JobError> {
    let strategy: Box<dyn FetchStrategy> = match config.strategy {
        Strategy::Api => Box::new(ApiStrategy::new(config)?),
        Strategy::Html => Box::new(HtmlStrategy::new(config)?),
    };
    Ok(strategy)
}

fn client_builder(config: &Config, user_agent: &str, timeout: Duration) -> ClientBuilder {
    let builder = Client::builder().user_agent(user_agent).timeout(timeout);
    if config.use_system_proxy {
        builder
    } else {
        builder.no_proxy()
    }
}

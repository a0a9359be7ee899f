use std::sync::Arc;

use percent_encoding::percent_decode_str;
use reqwest::blocking::Client;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, REFERER};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::{client_builder, FetchStrategy};
use crate::config::Config;
use crate::error::JobError;
use crate::types::RawRecord;

const PAGE_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const LANGUAGE: &str = "en-US,en;q=0.9";

// Quotes API response types
#[derive(Debug, Deserialize)]
struct QuotesResponse {
    #[serde(default)]
    results: Option<Vec<Value>>,
    #[serde(flatten)]
    other: Map<String, Value>,
}

/// Session handshake on the quotes page, then one call to the internal quotes API
pub struct ApiStrategy {
    client: Client,
    jar: Arc<Jar>,
    page_url: String,
    api_url: String,
    token_cookie: String,
    root: String,
    list: String,
    fields: String,
    batch_size: usize,
}

impl ApiStrategy {
    pub fn new(config: &Config) -> Result<Self, JobError> {
        let jar = Arc::new(Jar::default());
        let client = client_builder(config, &config.api_user_agent, config.api_timeout)
            .cookie_provider(Arc::clone(&jar))
            .build()
            .map_err(JobError::network("HTTP client setup"))?;

        Ok(Self {
            client,
            jar,
            page_url: config.page_url.clone(),
            api_url: config.api_url.clone(),
            token_cookie: config.token_cookie.clone(),
            root: config.root.clone(),
            list: config.list.clone(),
            fields: config.fields.join(","),
            batch_size: config.batch_size,
        })
    }

    /// Load the quotes page and pull the anti-forgery token out of the session cookies
    fn session_token(&self) -> Result<String, JobError> {
        let response = self
            .client
            .get(&self.page_url)
            .header(ACCEPT, PAGE_ACCEPT)
            .header(ACCEPT_LANGUAGE, LANGUAGE)
            .send()
            .map_err(JobError::network("quotes page"))?
            .error_for_status()
            .map_err(JobError::network("quotes page"))?;

        let cookies = self.jar.cookies(response.url());
        let raw = cookies
            .as_ref()
            .and_then(|header| header.to_str().ok())
            .and_then(|header| find_cookie(header, &self.token_cookie));

        match raw {
            Some(raw) => Ok(decode_token(raw)),
            None => Err(JobError::Auth {
                cookie: self.token_cookie.clone(),
                url: self.page_url.clone(),
            }),
        }
    }
}

impl FetchStrategy for ApiStrategy {
    fn name(&self) -> &'static str {
        "api"
    }

    fn fetch(&self) -> Result<Vec<RawRecord>, JobError> {
        let token = self.session_token()?;
        log::debug!("got {} token ({} chars)", self.token_cookie, token.len());

        let body = self
            .client
            .get(&self.api_url)
            .query(&[
                ("fields", self.fields.as_str()),
                ("list", self.list.as_str()),
                ("root", self.root.as_str()),
                ("raw", "1"),
            ])
            .header(ACCEPT, "application/json")
            .header(ACCEPT_LANGUAGE, LANGUAGE)
            .header(REFERER, &self.page_url)
            .header("x-xsrf-token", token)
            .send()
            .map_err(JobError::network("quotes API"))?
            .error_for_status()
            .map_err(JobError::network("quotes API"))?
            .text()
            .map_err(JobError::network("quotes API"))?;

        // Decoded by hand so a malformed body is reported as Decode, not Network
        let response: QuotesResponse = serde_json::from_str(&body).map_err(|source| {
            JobError::Decode {
                stage: "quotes API",
                source,
            }
        })?;
        take_results(response, &self.root, self.batch_size)
    }
}

/// Value of cookie `name` from a `Cookie` header, if present and non-empty
fn find_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

/// The token cookie arrives percent-encoded, sometimes twice
fn decode_token(raw: &str) -> String {
    let once = percent_decode_str(raw).decode_utf8_lossy();
    percent_decode_str(&once).decode_utf8_lossy().into_owned()
}

/// First `batch_size` results in the order the API returned them
fn take_results(
    response: QuotesResponse,
    root: &str,
    batch_size: usize,
) -> Result<Vec<RawRecord>, JobError> {
    let results = response.results.unwrap_or_default();
    if results.is_empty() {
        return Err(JobError::EmptyResult {
            keys: response.other.keys().cloned().collect(),
        });
    }
    if results.len() < batch_size {
        return Err(JobError::InsufficientRows {
            root: root.to_string(),
            expected: batch_size,
            found: results.len(),
        });
    }

    Ok(results
        .into_iter()
        .take(batch_size)
        .map(RawRecord::Json)
        .collect())
}

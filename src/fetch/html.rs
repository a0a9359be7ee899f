use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use scraper::{ElementRef, Html, Selector};

use super::{client_builder, FetchStrategy};
use crate::config::Config;
use crate::error::JobError;
use crate::types::RawRecord;

/// Cells kept per row, matching the ledger's non-date columns
const COLUMNS: usize = 10;

/// Header texts that identify the quotes table
const REQUIRED_HEADERS: [&str; 2] = ["Contract", "Latest"];

/// Plain GET of the quotes page, rows read straight out of the rendered table
pub struct HtmlStrategy {
    client: Client,
    page_url: String,
    root: String,
    batch_size: usize,
}

impl HtmlStrategy {
    pub fn new(config: &Config) -> Result<Self, JobError> {
        let client = client_builder(config, &config.html_user_agent, config.html_timeout)
            .build()
            .map_err(JobError::network("HTTP client setup"))?;

        Ok(Self {
            client,
            page_url: config.page_url.clone(),
            root: config.root.clone(),
            batch_size: config.batch_size,
        })
    }
}

impl FetchStrategy for HtmlStrategy {
    fn name(&self) -> &'static str {
        "html"
    }

    fn fetch(&self) -> Result<Vec<RawRecord>, JobError> {
        let body = self
            .client
            .get(&self.page_url)
            .header(ACCEPT, "text/html")
            .send()
            .map_err(JobError::network("quotes page"))?
            .error_for_status()
            .map_err(JobError::network("quotes page"))?
            .text()
            .map_err(JobError::network("quotes page"))?;
        log::debug!("quotes page is {} bytes", body.len());

        let rows = extract_rows(&body, &self.page_url, &self.root, self.batch_size)?;
        Ok(rows.into_iter().map(RawRecord::Cells).collect())
    }
}

fn selector(css: &'static str) -> Result<Selector, JobError> {
    Selector::parse(css).map_err(|e| JobError::Selector {
        css,
        reason: e.to_string(),
    })
}

/// Text of an element with markup stripped and whitespace collapsed
fn cell_text(element: ElementRef) -> String {
    let text: String = element.text().collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Pull the first `wanted` contract rows out of the quotes table.
///
/// The table is the first one whose header cells mention every entry of
/// `REQUIRED_HEADERS`. Rows need at least `COLUMNS` cells (extra ones are
/// dropped) and a first cell that starts with the contract root. Fails if
/// the table is missing or runs out of rows first.
fn extract_rows(
    html: &str,
    url: &str,
    root: &str,
    wanted: usize,
) -> Result<Vec<Vec<String>>, JobError> {
    let table_sel = selector("table")?;
    let header_sel = selector("th")?;
    let row_sel = selector("tbody tr")?;
    let cell_sel = selector("th, td")?;

    let document = Html::parse_document(html);
    let table = document
        .select(&table_sel)
        .find(|table| {
            let headers = table
                .select(&header_sel)
                .map(cell_text)
                .collect::<Vec<_>>()
                .join(" ");
            REQUIRED_HEADERS.iter().all(|h| headers.contains(h))
        })
        .ok_or_else(|| JobError::TableNotFound {
            url: url.to_string(),
        })?;

    let mut rows = Vec::with_capacity(wanted);
    for tr in table.select(&row_sel) {
        if rows.len() == wanted {
            break;
        }
        let mut cells: Vec<String> = tr.select(&cell_sel).map(cell_text).collect();
        if cells.len() < COLUMNS {
            log::debug!("skipping row with {} cells", cells.len());
            continue;
        }
        cells.truncate(COLUMNS);
        if !cells[0].starts_with(root) {
            log::debug!("skipping non-{} row {:?}", root, cells[0]);
            continue;
        }
        rows.push(cells);
    }

    if rows.len() < wanted {
        return Err(JobError::InsufficientRows {
            root: root.to_string(),
            expected: wanted,
            found: rows.len(),
        });
    }
    Ok(rows)
}

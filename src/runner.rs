//! One invocation of the daily job: gate, duplicate check, fetch, append.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::clock::{local_now, should_run};
use crate::config::Config;
use crate::error::JobError;
use crate::fetch::FetchStrategy;
use crate::ledger;
use crate::normalize::normalize;
use crate::types::QuoteRecord;

/// How a run ended when nothing went wrong
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(dead_code)] // Status already printed by `run`; fields are read by tests
pub enum RunOutcome {
    /// Local time was outside the target hour
    OutsideWindow,
    /// The ledger already holds rows for today
    AlreadyRecorded { date: String },
    Appended { date: String, rows: usize },
}

pub fn run(
    config: &Config,
    now: DateTime<Utc>,
    fetcher: &dyn FetchStrategy,
) -> Result<RunOutcome, JobError> {
    let local = local_now(&now, config.timezone);
    println!(
        "{} time: {}",
        config.timezone.name(),
        local.to_rfc3339_opts(SecondsFormat::Secs, false)
    );

    if !should_run(&now, config.timezone, config.target_hour) {
        println!(
            "Not {:02}:xx in {}, exiting without writing.",
            config.target_hour,
            config.timezone.name()
        );
        return Ok(RunOutcome::OutsideWindow);
    }

    let date = local.date_naive().format("%Y-%m-%d").to_string();
    if ledger::has_entry_for_date(&config.output, &date)? {
        println!(
            "{} already has rows for {}, nothing to do.",
            config.output.display(),
            date
        );
        return Ok(RunOutcome::AlreadyRecorded { date });
    }

    log::info!("fetching quotes via {} strategy", fetcher.name());
    let batch: Vec<QuoteRecord> = fetcher.fetch()?.into_iter().map(normalize).collect();
    for record in batch.iter().filter(|r| r.contract.is_empty()) {
        log::warn!("record without contract code: {:?}", record);
    }

    let rows = ledger::append(&config.output, &date, &batch)?;
    println!("Appended {} rows to {}", rows, config.output.display());
    Ok(RunOutcome::Appended { date, rows })
}

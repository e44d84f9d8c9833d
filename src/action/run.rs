use tracing::{error, info};

use crate::action::reporter::Reporter;
use crate::catalog::error::CatalogError;
use crate::catalog::updater::{CatalogUpdater, UpdateOutcome, UpdateRequest};

pub const OUTPUT_UPDATED: &str = "updated";
pub const OUTPUT_VERSION: &str = "version";

/// Execute one request and report the result.
///
/// Returns false when the invocation failed; the failure reason has then
/// already been handed to the reporter.
pub fn run<U, R>(request: &UpdateRequest, updater: &U, reporter: &mut R) -> bool
where
    U: CatalogUpdater + ?Sized,
    R: Reporter + ?Sized,
{
    let result = request.target().and_then(|target| {
        info!("Processing {} in {:?}", target, request.catalog_path());
        updater.update(request)
    });

    match result {
        Ok(outcome) => match report_outcome(reporter, &outcome) {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to report outputs: {}", e);
                false
            }
        },
        Err(e) => {
            report_failure(reporter, &e);
            false
        }
    }
}

fn report_outcome<R: Reporter + ?Sized>(
    reporter: &mut R,
    outcome: &UpdateOutcome,
) -> std::io::Result<()> {
    let updated = if outcome.updated() { "true" } else { "false" };
    reporter.set_output(OUTPUT_UPDATED, updated)?;
    reporter.set_output(OUTPUT_VERSION, outcome.current_version())?;
    reporter.finish()
}

fn report_failure<R: Reporter + ?Sized>(reporter: &mut R, e: &CatalogError) {
    error!(kind = e.kind().as_str(), "{}", e);
    if let Err(io_error) = reporter.set_failed(&e.to_string()).and_then(|_| reporter.finish()) {
        error!("Failed to report failure: {}", io_error);
    }
}

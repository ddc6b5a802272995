//! Sequential link checking with a courtesy delay between probes.
//!
//! One probe per record, outcomes partitioned into working, dead, and
//! skipped. Per-record failures never abort the batch; the delay is a
//! rate-limiting courtesy to third-party servers, not a correctness
//! requirement.

use std::time::Duration;

use tracing::{debug, warn};

use crate::catalog::LinkRecord;
use crate::probe::{Probe, ProbeOutcome};

/// Outcome of checking one record's URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub record: LinkRecord,
    /// Status code when the server answered, `None` otherwise.
    pub status: Option<u16>,
    pub accessible: bool,
    /// Failure label when no useful status was obtained.
    pub error: Option<String>,
}

/// Partitioned results of one checking run.
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    pub working: Vec<ProbeResult>,
    pub dead: Vec<ProbeResult>,
    /// Records with no probe-able URL: neither working nor dead.
    pub skipped: Vec<LinkRecord>,
}

/// Probe every record sequentially, sleeping `delay` between probes.
///
/// The sleeper is injected so tests run without waiting. Skipped
/// records do not consume a delay slot.
pub fn check_all<P, S>(
    records: &[LinkRecord],
    probe: &P,
    delay: Duration,
    mut sleep: S,
) -> CheckReport
where
    P: Probe + ?Sized,
    S: FnMut(Duration),
{
    let mut report = CheckReport::default();
    for record in records {
        let Some(url) = record.website() else {
            warn!(name = %record.name, "no valid website, skipping");
            report.skipped.push(record.clone());
            continue;
        };

        debug!(name = %record.name, url, "probing");
        let result = match probe.probe(url) {
            ProbeOutcome::Status(status) => ProbeResult {
                record: record.clone(),
                status: Some(status),
                accessible: status < 400,
                error: None,
            },
            ProbeOutcome::Failed(error) => ProbeResult {
                record: record.clone(),
                status: None,
                accessible: false,
                error: Some(error.label()),
            },
        };
        if result.accessible {
            report.working.push(result);
        } else {
            report.dead.push(result);
        }

        sleep(delay);
    }
    report
}

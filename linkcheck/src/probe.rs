//! URL reachability probing.
//!
//! The [`Probe`] trait is the seam between classification logic and
//! the network: the checker is written against the trait so its
//! partitioning can be tested with canned outcomes, and [`HttpProbe`]
//! is the production implementation.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;

/// Distinct failure modes, separate from a reachable-but-erroring
/// status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    Timeout,
    ConnectionError,
    Other(String),
}

impl ProbeError {
    /// Human-readable label recorded in the dead-links report.
    pub fn label(&self) -> String {
        match self {
            ProbeError::Timeout => "Timeout".to_string(),
            ProbeError::ConnectionError => "Connection Error".to_string(),
            ProbeError::Other(message) => message.clone(),
        }
    }
}

/// What one probe attempt produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The server answered; classification is by status code.
    Status(u16),
    /// No status was obtained.
    Failed(ProbeError),
}

/// Existence probe for a single URL.
pub trait Probe {
    fn probe(&self, url: &str) -> ProbeOutcome;
}

/// Production probe: HEAD request with a bounded timeout, redirects
/// followed (client default).
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("build http client")?;
        Ok(Self { client })
    }
}

impl Probe for HttpProbe {
    fn probe(&self, url: &str) -> ProbeOutcome {
        match self.client.head(url).send() {
            Ok(response) => ProbeOutcome::Status(response.status().as_u16()),
            Err(err) if err.is_timeout() => ProbeOutcome::Failed(ProbeError::Timeout),
            Err(err) if err.is_connect() => ProbeOutcome::Failed(ProbeError::ConnectionError),
            Err(err) => ProbeOutcome::Failed(ProbeError::Other(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_match_report_vocabulary() {
        assert_eq!(ProbeError::Timeout.label(), "Timeout");
        assert_eq!(ProbeError::ConnectionError.label(), "Connection Error");
        assert_eq!(
            ProbeError::Other("tls handshake".to_string()).label(),
            "tls handshake"
        );
    }
}

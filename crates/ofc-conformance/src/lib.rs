//! Conformance suite for OpenFlow controller drivers
//!
//! Runs the behavioral checks in [`verification::CHECKS`] against any
//! [`OfcDriver`] and collects the outcome of each into a
//! [`ConformanceReport`].
//!
//! # Example
//!
//! ```
//! use ofc_conformance::run_all;
//! use ofc_driver::MemoryDriver;
//!
//! let report = run_all(&MemoryDriver::new());
//! assert!(report.passed());
//! ```

pub mod fixtures;
pub mod verification;

use std::time::Instant;

use ofc_driver::OfcDriver;
use serde::Serialize;
use tracing::{info, instrument, warn};

pub use verification::{Check, CheckResult, ConformanceError, CHECKS};

/// Outcome of one check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    pub name: &'static str,
    pub description: &'static str,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_us: u64,
}

/// Outcome of a full conformance run against one driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConformanceReport {
    pub driver: String,
    pub checks: Vec<CheckOutcome>,
}

impl ConformanceReport {
    /// True when every check passed.
    pub fn passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    /// Checks that failed, in run order.
    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.checks.iter().filter(|c| !c.passed)
    }

    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    pub fn failed_count(&self) -> usize {
        self.checks.len() - self.passed_count()
    }
}

/// Runs a single check and records its outcome.
pub fn run_check(driver: &dyn OfcDriver, check: &Check) -> CheckOutcome {
    let start = Instant::now();
    let result = (check.run)(driver);
    let duration_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);

    match result {
        Ok(()) => {
            info!("PASS {} ({} us)", check.name, duration_us);
            CheckOutcome {
                name: check.name,
                description: check.description,
                passed: true,
                error: None,
                duration_us,
            }
        }
        Err(e) => {
            warn!("FAIL {}: {}", check.name, e);
            CheckOutcome {
                name: check.name,
                description: check.description,
                passed: false,
                error: Some(e.to_string()),
                duration_us,
            }
        }
    }
}

/// Runs every check in [`CHECKS`] against `driver`.
///
/// A failing check does not stop the run.
#[instrument(skip(driver), fields(driver = driver.name()))]
pub fn run_all(driver: &dyn OfcDriver) -> ConformanceReport {
    let checks: Vec<CheckOutcome> = CHECKS.iter().map(|c| run_check(driver, c)).collect();
    let report = ConformanceReport {
        driver: driver.name().to_string(),
        checks,
    };
    info!(
        "Conformance of '{}': {} passed, {} failed",
        report.driver,
        report.passed_count(),
        report.failed_count()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use ofc_driver::MemoryDriver;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_report_counts() {
        let report = ConformanceReport {
            driver: "x".to_string(),
            checks: vec![
                CheckOutcome {
                    name: "a",
                    description: "",
                    passed: true,
                    error: None,
                    duration_us: 1,
                },
                CheckOutcome {
                    name: "b",
                    description: "",
                    passed: false,
                    error: Some("boom".to_string()),
                    duration_us: 2,
                },
            ],
        };
        assert!(!report.passed());
        assert_eq!(report.passed_count(), 1);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.failures().map(|c| c.name).collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn test_run_all_memory_driver() {
        let driver = MemoryDriver::new();
        let report = run_all(&driver);
        assert_eq!(report.driver, "memory");
        assert_eq!(report.checks.len(), CHECKS.len());
        assert!(report.passed(), "{:?}", report.failures().collect::<Vec<_>>());
    }

    #[test]
    fn test_outcome_json_omits_missing_error() {
        let outcome = CheckOutcome {
            name: "a",
            description: "d",
            passed: true,
            error: None,
            duration_us: 7,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "a", "description": "d", "passed": true, "duration_us": 7})
        );
    }
}

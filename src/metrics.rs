//! Assessment counters and latency statistics.

use crate::error::AssessmentError;
use crate::types::domain::Domain;
use crate::types::verdict::Verdict;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::info;

/// Outcome counts for one domain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DomainCounters {
    pub submissions: u64,
    pub high_risk: u64,
    pub low_risk: u64,
    pub invalid_input: u64,
    pub model_unavailable: u64,
    pub contract_violations: u64,
}

/// Metrics collector shared by every request
pub struct AssessmentMetrics {
    /// Total submissions across all domains
    pub submissions: AtomicU64,
    /// Outcome counts by domain
    counters: RwLock<BTreeMap<Domain, DomainCounters>>,
    /// Successful assessment times by domain (in microseconds)
    processing_times: RwLock<BTreeMap<Domain, Vec<u64>>>,
    /// Start time for rate calculation
    start_time: Instant,
}

impl AssessmentMetrics {
    pub fn new() -> Self {
        Self {
            submissions: AtomicU64::new(0),
            counters: RwLock::new(BTreeMap::new()),
            processing_times: RwLock::new(BTreeMap::new()),
            start_time: Instant::now(),
        }
    }

    fn update(&self, domain: Domain, f: impl FnOnce(&mut DomainCounters)) {
        self.submissions.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut counters) = self.counters.write() {
            let entry = counters.entry(domain).or_default();
            entry.submissions += 1;
            f(entry);
        }
    }

    /// Record a successful assessment
    pub fn record_assessment(&self, domain: Domain, processing_time: Duration, verdict: Verdict) {
        self.update(domain, |c| match verdict {
            Verdict::HighRisk => c.high_risk += 1,
            Verdict::LowRisk => c.low_risk += 1,
        });

        if let Ok(mut times) = self.processing_times.write() {
            let domain_times = times.entry(domain).or_default();
            domain_times.push(processing_time.as_micros() as u64);
            // Keep only last 10000 per domain
            if domain_times.len() > 10000 {
                domain_times.drain(0..5000);
            }
        }
    }

    /// Record a rejected submission
    pub fn record_error(&self, error: &AssessmentError) {
        self.update(error.domain(), |c| match error {
            AssessmentError::InvalidInput { .. } => c.invalid_input += 1,
            AssessmentError::ModelUnavailable { .. } | AssessmentError::ModelLoad { .. } => {
                c.model_unavailable += 1
            }
            AssessmentError::ModelContractViolation { .. } => c.contract_violations += 1,
        });
    }

    /// Outcome counts for one domain
    pub fn domain_counters(&self, domain: Domain) -> DomainCounters {
        self.counters
            .read()
            .ok()
            .and_then(|c| c.get(&domain).copied())
            .unwrap_or_default()
    }

    /// Processing time statistics for one domain
    pub fn get_processing_stats(&self, domain: Domain) -> ProcessingStats {
        self.processing_times
            .read()
            .ok()
            .and_then(|times| times.get(&domain).map(|t| ProcessingStats::from_samples(t)))
            .unwrap_or_default()
    }

    /// Submissions per second since startup
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.submissions.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Point-in-time view for the stats endpoint
    pub fn snapshot(&self) -> MetricsSnapshot {
        let domains = Domain::ALL
            .into_iter()
            .map(|domain| {
                (
                    domain,
                    DomainSnapshot {
                        counters: self.domain_counters(domain),
                        processing: self.get_processing_stats(domain),
                    },
                )
            })
            .collect();

        MetricsSnapshot {
            uptime_secs: self.start_time.elapsed().as_secs(),
            submissions: self.submissions.load(Ordering::Relaxed),
            throughput: self.get_throughput(),
            domains,
        }
    }

    /// Print summary statistics
    pub fn print_summary(&self) {
        let snapshot = self.snapshot();

        info!(
            submissions = snapshot.submissions,
            uptime_secs = snapshot.uptime_secs,
            throughput = format!("{:.2} req/s", snapshot.throughput),
            "Assessment metrics summary"
        );

        for (domain, stats) in &snapshot.domains {
            if stats.counters.submissions == 0 {
                continue;
            }
            info!(
                domain = %domain,
                submissions = stats.counters.submissions,
                high_risk = stats.counters.high_risk,
                low_risk = stats.counters.low_risk,
                invalid_input = stats.counters.invalid_input,
                model_unavailable = stats.counters.model_unavailable,
                contract_violations = stats.counters.contract_violations,
                mean_us = stats.processing.mean_us,
                p99_us = stats.processing.p99_us,
                "Domain summary"
            );
        }
    }
}

impl Default for AssessmentMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Processing time statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProcessingStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

impl ProcessingStats {
    fn from_samples(samples: &[u64]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let mut sorted = samples.to_vec();
        sorted.sort_unstable();

        let count = sorted.len();
        let sum: u64 = sorted.iter().sum();
        let percentile = |p: f64| sorted[((count as f64 * p) as usize).min(count - 1)];

        Self {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: percentile(0.50),
            p95_us: percentile(0.95),
            p99_us: percentile(0.99),
            max_us: sorted[count - 1],
        }
    }
}

/// Per-domain section of a [`MetricsSnapshot`]
#[derive(Debug, Clone, Serialize)]
pub struct DomainSnapshot {
    pub counters: DomainCounters,
    pub processing: ProcessingStats,
}

/// Serializable metrics view
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub uptime_secs: u64,
    pub submissions: u64,
    pub throughput: f64,
    pub domains: BTreeMap<Domain, DomainSnapshot>,
}

/// Periodic metrics reporter
pub struct MetricsReporter {
    metrics: Arc<AssessmentMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    pub fn new(metrics: Arc<AssessmentMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs: interval_secs.max(1),
        }
    }

    /// Start the periodic reporting task
    pub async fn start(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
        // First tick completes immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            self.metrics.print_summary();
        }
    }
}

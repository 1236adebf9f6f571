//! The serial allocator.

use chrono::{Local, NaiveDate};
use parking_lot::Mutex;
use std::sync::Arc;

use super::{CertificateNumber, CounterStore, FiscalCounter, FiscalYear, NumberingError};
use crate::metrics;

/// What to do when the counter cannot be persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PersistencePolicy {
    /// Log the failure and still hand out the number.
    #[default]
    BestEffort,
    /// Fail the allocation.
    Strict,
}

/// Issues certificate numbers, one per certificate creation.
///
/// The read-modify-write of the counter runs under a mutex, so two allocations in the
/// same process never see the same counter snapshot. Separate processes sharing one
/// counter file are not coordinated.
pub struct SerialAllocator {
    store: Arc<dyn CounterStore>,
    prefix: String,
    policy: PersistencePolicy,
    // Last counter handed out; used when the store cannot be read.
    last: Mutex<Option<FiscalCounter>>,
}

impl SerialAllocator {
    pub fn new(store: Arc<dyn CounterStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
            policy: PersistencePolicy::default(),
            last: Mutex::new(None),
        }
    }

    pub fn with_policy(mut self, policy: PersistencePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn policy(&self) -> PersistencePolicy {
        self.policy
    }

    /// Allocate the next number for today's fiscal year.
    pub fn allocate(&self) -> Result<CertificateNumber, NumberingError> {
        self.allocate_on(Local::now().date_naive())
    }

    /// Allocate the next number for the fiscal year containing `today`.
    pub fn allocate_on(&self, today: NaiveDate) -> Result<CertificateNumber, NumberingError> {
        let fiscal_year = FiscalYear::for_date(today);
        let label = fiscal_year.label();

        let mut last = self.last.lock();

        // An unreadable counter is never overwritten; it stays on disk for repair.
        let mut readable = true;
        let stored = match self.store.load() {
            Ok(stored) => stored,
            Err(e) => {
                log::error!(
                    "Failed to read certificate counter from {}: {}",
                    self.store.describe(),
                    e
                );
                if self.policy == PersistencePolicy::Strict {
                    return Err(e);
                }
                readable = false;
                last.clone()
            }
        };

        let next = match stored {
            Some(counter) if counter.financial_year == label => {
                FiscalCounter::new(label, counter.counter.saturating_add(1))
            }
            Some(counter) => {
                log::info!(
                    "Fiscal year changed from {} to {}, restarting certificate sequence",
                    counter.financial_year,
                    label
                );
                FiscalCounter::new(label, 1)
            }
            None => {
                log::info!("No certificate counter found, starting fiscal year {}", label);
                FiscalCounter::new(label, 1)
            }
        };

        if !readable {
            metrics::COUNTER_PERSIST_FAILURES.inc();
            log::warn!(
                "Counter at {} left untouched; {} #{} was not persisted",
                self.store.describe(),
                next.financial_year,
                next.counter
            );
        } else if let Err(e) = self.store.save(&next) {
            metrics::COUNTER_PERSIST_FAILURES.inc();
            log::error!(
                "Failed to persist certificate counter to {}: {}",
                self.store.describe(),
                e
            );
            if self.policy == PersistencePolicy::Strict {
                return Err(e);
            }
        }

        let number = CertificateNumber::new(self.prefix.clone(), fiscal_year, next.counter);
        *last = Some(next);
        drop(last);

        metrics::CERTIFICATE_NUMBERS_ISSUED.inc();
        log::info!("Issued certificate number {}", number);
        Ok(number)
    }

    /// The stored counter, without advancing it.
    pub fn current(&self) -> Result<Option<FiscalCounter>, NumberingError> {
        let _guard = self.last.lock();
        self.store.load()
    }
}

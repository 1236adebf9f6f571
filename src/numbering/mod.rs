//! Certificate numbering - fiscal-year scoped serial numbers.
//!
//! This module contains the pieces that issue `RPS/CERT/<YY-YY>/<NNN>` numbers:
//! - `fiscal` - April-March fiscal year labels
//! - `certificate_number` - formatting and parsing of certificate numbers
//! - `persistence` - the counter persistence port and its JSON file implementation
//! - `allocator` - the `SerialAllocator` that ties them together

pub mod allocator;
pub mod certificate_number;
pub mod fiscal;
pub mod persistence;


pub use allocator::{PersistencePolicy, SerialAllocator};
pub use certificate_number::{CertificateNumber, DEFAULT_CERTIFICATE_PREFIX};
pub use fiscal::FiscalYear;
pub use persistence::{CounterStore, FiscalCounter, JsonFileCounterStore, MemoryCounterStore};

use thiserror::Error;

/// Errors raised while issuing or interpreting certificate numbers.
#[derive(Debug, Error)]
pub enum NumberingError {
    #[error("failed to read counter file {path}: {source}")]
    CounterRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write counter file {path}: {source}")]
    CounterWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("counter file {path} is not valid JSON: {source}")]
    CounterDecode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("counter store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("invalid fiscal year label '{0}'")]
    InvalidFiscalYear(String),
    #[error("invalid certificate number '{0}'")]
    InvalidCertificateNumber(String),
}

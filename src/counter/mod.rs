pub mod error;
pub mod manager;
pub mod usage;

pub use error::QuotaError;
pub use manager::QuotaCounter;
pub use usage::{PeriodUsage, RecordedHit};

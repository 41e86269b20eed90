pub mod types;
pub mod sector;
pub mod fundamental;
pub mod security;
pub mod insight;
pub mod price_history;
pub mod indicators;

pub use types::{DomainError, Resolution, Result, Symbol};
pub use sector::MorningstarSector;
pub use fundamental::Fundamental;
pub use security::{Security, SecurityChanges};
pub use insight::{Insight, InsightDirection};
pub use price_history::{Bar, PriceHistory};
pub use indicators::IndicatorsExt;

pub mod client;
pub mod compare;
pub mod error;
pub mod extract;
mod html;
pub mod pair;
pub mod rate_limit;
pub mod runner;
pub mod types;

pub use client::PageClient;
pub use compare::{compare, ComparisonRecord, Field, FieldDiff};
pub use error::ScraperError;
pub use extract::analyze_html;
pub use pair::{PairDiffs, PairResult, SideCounts, DATE_FORMAT};
pub use rate_limit::{FixedDelay, NoDelay, Pacer};
pub use runner::PairRunner;
pub use types::{
    FetchStatus, HeadingCount, HeadingCounts, PageSignals, SeoCounts, SignalRecord,
    HEADING_LEVELS,
};

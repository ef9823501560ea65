pub mod fragment;
pub mod report;
pub mod rewrite;
pub mod unit_processor;

pub use fragment::{Fragment, FragmentKind};
pub use report::{SeparationReport, SeparationSummary, UnitEntry};
pub use rewrite::Rewrite;
pub use unit_processor::{BatchProgress, UnitOutcome, UnitProcessor};

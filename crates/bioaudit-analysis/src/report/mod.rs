//! Report aggregation and rendering.

pub mod aggregator;
pub mod render;
pub mod slot;
pub mod verdict;

pub use aggregator::{aggregate, Report, ReportInputs};
pub use render::render_text;
pub use slot::Slot;
pub use verdict::{DetectorAgreement, Verdict};

//! Orthographic and phonetic similarity between names

pub mod justify;
pub mod metrics;
pub mod phonetic;
pub mod scorer;

pub use justify::{EditJustification, EditJustifier, EditOp};
pub use metrics::{Metric, MetricFamily};
pub use phonetic::{PhoneticCode, PhoneticEncoder};
pub use scorer::{CompositeResult, CompositeScorer, MetricBreakdown, NameProfile, ReducedScore};

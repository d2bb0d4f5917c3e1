pub mod antenna;
pub mod curve;
pub mod error;
pub mod frequency;
pub mod manager;
pub mod query;

pub use antenna::{Antenna, DimensionTable};
pub use curve::{nearest_curve, Sample, ValueCurve};
pub use error::CurveError;
pub use frequency::{BandRange, FreqUnit, Frequency};
pub use manager::AntennaManager;
pub use query::{AntennaQuery, MatchResult, QueryResult};

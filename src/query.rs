use crate::{antenna::Antenna, frequency::BandRange};

/// A multi-band, multi-criterion request. Plain data; unset criteria are
/// simply not gated on. `bands` is expected non-empty — a query with no
/// bands matches nothing.
#[derive(Debug, Clone, Default)]
pub struct AntennaQuery {
    pub bands: Vec<BandRange>,
    /// Required tags, e.g. "circular polarization". Empty = no constraint.
    pub polarization_tags: Vec<String>,
    /// Minimum gain in dBi.
    pub min_gain: Option<f64>,
    /// Desired half-power beamwidth in degrees (matched to 5% relative).
    pub target_half_power_width: Option<f64>,
    /// VSWR cap (gated with 10% tolerance).
    pub max_vswr: Option<f64>,
    /// Minimum cross-polarization isolation in dB.
    pub min_cross_polarization: Option<f64>,
    /// Minimum radiation efficiency in percent.
    pub min_efficiency: Option<f64>,
}

/// Verdict of matching one antenna against a query.
#[derive(Debug, Clone, Copy)]
pub struct MatchResult<'a> {
    pub antenna: &'a Antenna,
    pub is_match: bool,
    /// Cleared when the gain criterion held at band center but failed at a
    /// band edge.
    pub is_margin_match: bool,
    /// Ratio of the antenna's natural center frequency to the first query
    /// band's center; used downstream to rescale physical dimensions. Not
    /// part of the verdict.
    pub scale: f64,
}

impl<'a> MatchResult<'a> {
    pub fn new(antenna: &'a Antenna) -> MatchResult<'a> {
        MatchResult {
            antenna,
            is_match: false,
            is_margin_match: true,
            scale: 0.,
        }
    }
}

/// Ranked outcome of querying a whole collection.
#[derive(Debug, Clone, Default)]
pub struct QueryResult<'a> {
    pub best_match: Option<MatchResult<'a>>,
    pub other_matches: Vec<MatchResult<'a>>,
}

impl<'a> QueryResult<'a> {
    /// Total number of matching antennas.
    pub fn len(&self) -> usize {
        self.best_match.is_some() as usize + self.other_matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.best_match.is_none()
    }
}

use std::fmt::{self, Display};

/// Unit tag for a frequency value as it appears in the antenna data files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreqUnit {
    Hz,
    KHz,
    MHz,
    GHz,
}

impl FreqUnit {
    // Multiplier taking a value in this unit to Hz.
    pub fn scale(self) -> f64 {
        match self {
            FreqUnit::Hz => 1.0,
            FreqUnit::KHz => 1e3,
            FreqUnit::MHz => 1e6,
            FreqUnit::GHz => 1e9,
        }
    }
}

impl Display for FreqUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FreqUnit::Hz => "Hz",
            FreqUnit::KHz => "KHz",
            FreqUnit::MHz => "MHz",
            FreqUnit::GHz => "GHz",
        };
        f.write_str(s)
    }
}

/// A scalar frequency tagged with its unit. Immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frequency {
    value: f64,
    unit: FreqUnit,
}

impl Frequency {
    pub fn new(value: f64, unit: FreqUnit) -> Frequency {
        Frequency { value, unit }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> FreqUnit {
        self.unit
    }

    /// The magnitude in Hz.
    pub fn normalized(&self) -> f64 {
        self.value * self.unit.scale()
    }
}

impl Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

/// A contiguous frequency interval of interest, given by its bounds.
/// Query bands carry an ordinal so a multi-band request keeps its band
/// numbering through to the result display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandRange {
    pub ordinal: u32,
    pub lower: Frequency,
    pub upper: Frequency,
}

impl BandRange {
    pub fn new(ordinal: u32, lower: Frequency, upper: Frequency) -> BandRange {
        BandRange {
            ordinal,
            lower,
            upper,
        }
    }

    /// Band center in Hz.
    pub fn center(&self) -> f64 {
        (self.lower.normalized() + self.upper.normalized()) / 2.
    }

    // Span over center. The same formula is applied to measured curve
    // domains (see ValueCurve::domain_bandwidth) so the bandwidth gate
    // compares like with like.
    pub fn fractional_bandwidth(&self) -> f64 {
        fractional_bandwidth(self.lower.normalized(), self.upper.normalized())
    }
}

/// Fractional bandwidth of the interval [low, high]: span relative to the
/// interval midpoint, 0 when the midpoint is 0. Unitless, so values computed
/// in different units are directly comparable.
pub fn fractional_bandwidth(low: f64, high: f64) -> f64 {
    let center = (low + high) / 2.;
    if center == 0. {
        0.
    } else {
        (high - low) / center
    }
}

use std::sync::OnceLock;

use crate::{
    error::CurveError,
    frequency::{fractional_bandwidth, Frequency},
};

/// One measured point of a characteristic curve: independent variable
/// (angle in degrees or frequency in the curve's tag unit) against value
/// (gain in dBi, VSWR, isolation in dB).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
}

impl Sample {
    pub fn new(x: f64, y: f64) -> Sample {
        Sample { x, y }
    }
}

/// A measured characteristic curve taken at one design frequency.
///
/// Samples are sorted ascending by x and non-empty; both are enforced at
/// construction so lookups never have to cope with malformed data. The
/// derived metrics are memoized per instance since curves are immutable
/// after load.
#[derive(Debug)]
pub struct ValueCurve {
    tag_freq: Frequency,
    samples: Vec<Sample>,
    peak: OnceLock<f64>,
    half_power_width: OnceLock<f64>,
    domain_bandwidth: OnceLock<f64>,
}

impl Clone for ValueCurve {
    fn clone(&self) -> Self {
        // Caches are cheap to refill; a clone starts cold.
        ValueCurve {
            tag_freq: self.tag_freq,
            samples: self.samples.clone(),
            peak: OnceLock::new(),
            half_power_width: OnceLock::new(),
            domain_bandwidth: OnceLock::new(),
        }
    }
}

impl ValueCurve {
    pub fn new(tag_freq: Frequency, samples: Vec<Sample>) -> Result<ValueCurve, CurveError> {
        if samples.is_empty() {
            return Err(CurveError::Empty);
        }
        for (i, pair) in samples.windows(2).enumerate() {
            if pair[1].x < pair[0].x {
                return Err(CurveError::Unsorted(i + 1));
            }
        }
        Ok(ValueCurve {
            tag_freq,
            samples,
            peak: OnceLock::new(),
            half_power_width: OnceLock::new(),
            domain_bandwidth: OnceLock::new(),
        })
    }

    pub fn tag_freq(&self) -> Frequency {
        self.tag_freq
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Nominal frequency of this curve in Hz; the key used to pick which
    /// of an antenna's per-design-frequency curves represents a query band.
    pub fn center_normalized(&self) -> f64 {
        self.tag_freq.normalized()
    }

    /// The sample whose x is closest to `x`; first one wins ties.
    pub fn nearest_sample(&self, x: f64) -> &Sample {
        let mut best = &self.samples[0];
        let mut best_dist = (best.x - x).abs();
        for sample in &self.samples[1..] {
            let dist = (sample.x - x).abs();
            if dist < best_dist {
                best = sample;
                best_dist = dist;
            }
        }
        best
    }

    /// Curve value at x, by nearest sample (no interpolation).
    pub fn value_at(&self, x: f64) -> f64 {
        self.nearest_sample(x).y
    }

    /// Curve value at a base-unit (Hz) frequency. Sample x-coordinates of
    /// frequency curves are stored in the tag's unit, so the target is
    /// brought into that unit before the lookup.
    pub fn value_at_freq(&self, hz: f64) -> f64 {
        self.value_at(hz / self.tag_freq.unit().scale())
    }

    /// Maximum sampled value.
    pub fn peak(&self) -> f64 {
        *self.peak.get_or_init(|| {
            self.samples
                .iter()
                .map(|s| s.y)
                .fold(f64::NEG_INFINITY, f64::max)
        })
    }

    /// Approximate half-power (3 dB) width of an angular curve.
    ///
    /// Ranks samples by closeness of their value to `peak - 3` and takes the
    /// x-distance between the two best-ranked samples (not necessarily
    /// adjacent in x). With fewer than two samples the width is 0. Avoids
    /// interpolation at the cost of sample-grid resolution.
    pub fn half_power_width(&self) -> f64 {
        *self.half_power_width.get_or_init(|| {
            if self.samples.len() < 2 {
                return 0.;
            }
            let target = self.peak() - 3.;
            let mut ranked: Vec<&Sample> = self.samples.iter().collect();
            // Stable sort: ties resolve to the earlier sample.
            ranked.sort_by(|a, b| {
                (a.y - target)
                    .abs()
                    .total_cmp(&(b.y - target).abs())
            });
            (ranked[0].x - ranked[1].x).abs()
        })
    }

    /// Fractional bandwidth of a frequency curve's own sampled domain,
    /// by the same formula as BandRange::fractional_bandwidth.
    pub fn domain_bandwidth(&self) -> f64 {
        *self.domain_bandwidth.get_or_init(|| {
            let xmin = self.samples[0].x;
            let xmax = self.samples[self.samples.len() - 1].x;
            fractional_bandwidth(xmin, xmax)
        })
    }
}

/// The curve whose tagged frequency is closest to `target_hz`; first one
/// wins ties. `None` on an empty list means "characteristic not measured
/// for this antenna" and is never an error.
pub fn nearest_curve(curves: &[ValueCurve], target_hz: f64) -> Option<&ValueCurve> {
    let mut best: Option<(&ValueCurve, f64)> = None;
    for curve in curves {
        let dist = (curve.center_normalized() - target_hz).abs();
        match best {
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => best = Some((curve, dist)),
        }
    }
    best.map(|(curve, _)| curve)
}

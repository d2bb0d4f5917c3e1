use crate::{
    curve::{nearest_curve, ValueCurve},
    frequency::Frequency,
    query::{AntennaQuery, MatchResult},
};

// Gate tolerances: beamwidth matches to 5% relative, the VSWR cap gets 10%
// slack before a candidate is thrown out.
const BEAMWIDTH_REL_TOLERANCE: f64 = 0.05;
const VSWR_TOLERANCE_FACTOR: f64 = 1.1;

/// Physical dimensions measured at one design frequency.
#[derive(Debug, Clone)]
pub struct DimensionTable {
    pub freq: Frequency,
    pub entries: Vec<(String, f64)>,
}

/// One antenna record as handed over by the loader: identification, tags,
/// and the measured characteristic curves per category. Multi-band antennas
/// carry several curves per category, one per design frequency, sorted
/// ascending by tag frequency. Any category may be empty ("not measured").
/// Read-only for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct Antenna {
    pub name: String,
    pub document_ref: Option<String>,
    pub image_ref: Option<String>,
    pub tags: Vec<String>,
    pub gain_vs_angle: Vec<ValueCurve>,
    pub cross_pol_vs_angle: Vec<ValueCurve>,
    pub gain_vs_freq: Vec<ValueCurve>,
    pub vswr_vs_freq: Vec<ValueCurve>,
    pub dimensions: Vec<DimensionTable>,
    /// Radiation efficiency in percent, when the data sheet provides it.
    pub efficiency: Option<f64>,
}

impl Antenna {
    pub fn new(name: impl Into<String>) -> Antenna {
        Antenna {
            name: name.into(),
            ..Antenna::default()
        }
    }

    /// The distinct design frequencies (Hz) this antenna was characterized
    /// at, across the frequency-domain categories.
    pub fn design_frequencies(&self) -> Vec<f64> {
        let mut freqs: Vec<f64> = self
            .gain_vs_freq
            .iter()
            .chain(&self.vswr_vs_freq)
            .map(|c| c.center_normalized())
            .collect();
        freqs.sort_by(f64::total_cmp);
        freqs.dedup();
        freqs
    }

    /// Best gain figure for display: max peak over gain-vs-frequency curves,
    /// falling back to the angular patterns.
    pub fn peak_gain(&self) -> Option<f64> {
        let curves = if self.gain_vs_freq.is_empty() {
            &self.gain_vs_angle
        } else {
            &self.gain_vs_freq
        };
        curves.iter().map(|c| c.peak()).reduce(f64::max)
    }

    /// Dimension table measured nearest to the given frequency. The caller
    /// rescales it by MatchResult::scale when showing a retuned design.
    pub fn dimensions_for(&self, hz: f64) -> Option<&DimensionTable> {
        let mut best: Option<(&DimensionTable, f64)> = None;
        for table in &self.dimensions {
            let dist = (table.freq.normalized() - hz).abs();
            match best {
                Some((_, best_dist)) if dist >= best_dist => {}
                _ => best = Some((table, dist)),
            }
        }
        best.map(|(table, _)| table)
    }

    fn has_tag(&self, wanted: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(wanted))
    }

    /// Match this antenna against a query. Pure and read-only: the verdict
    /// is a deterministic function of `(self, query)`.
    ///
    /// Each band is gated independently; an absent characteristic skips its
    /// gate rather than failing (the loader only includes what was
    /// measured). The gain gate is the one place margins matter: passing at
    /// band center but failing at a band edge clears `is_margin_match` and
    /// rejects.
    pub fn match_query<'a>(&'a self, query: &AntennaQuery) -> MatchResult<'a> {
        let mut result = MatchResult::new(self);

        let Some(first_band) = query.bands.first() else {
            return result;
        };

        // Dimension rescale factor, from whichever frequency-domain curve
        // sits nearest the first band. Carries no weight in the verdict.
        let first_center = first_band.center();
        if first_center != 0. {
            let natural = nearest_curve(&self.vswr_vs_freq, first_center)
                .or_else(|| nearest_curve(&self.gain_vs_freq, first_center));
            if let Some(curve) = natural {
                result.scale = curve.center_normalized() / first_center;
            }
        }

        for band in &query.bands {
            let center = band.center();
            // Each category resolves independently; a multi-band antenna may
            // answer different bands with different design frequencies.
            let vswr_curve = nearest_curve(&self.vswr_vs_freq, center);
            let gain_freq_curve = nearest_curve(&self.gain_vs_freq, center);
            let gain_angle_curve = nearest_curve(&self.gain_vs_angle, center);

            // Bandwidth gate. The VSWR sweep is preferred as the
            // authoritative measurement of usable bandwidth.
            let available = vswr_curve
                .map(|c| c.domain_bandwidth())
                .or_else(|| gain_freq_curve.map(|c| c.domain_bandwidth()));
            if let Some(available) = available {
                if available < band.fractional_bandwidth() {
                    return result;
                }
            }

            // Gain gate: center must hold, and both band edges must hold for
            // a clean (non-margin) pass.
            if let Some(min_gain) = query.min_gain {
                if let Some(curve) = gain_freq_curve {
                    if curve.value_at_freq(center) < min_gain {
                        return result;
                    }
                    let at_lower = curve.value_at_freq(band.lower.normalized());
                    let at_upper = curve.value_at_freq(band.upper.normalized());
                    if at_lower < min_gain || at_upper < min_gain {
                        result.is_margin_match = false;
                        return result;
                    }
                } else if let Some(curve) = gain_angle_curve {
                    if curve.peak() < min_gain {
                        return result;
                    }
                }
            }

            // Beamwidth gate, 5% relative.
            if let (Some(target), Some(curve)) = (query.target_half_power_width, gain_angle_curve)
            {
                if (curve.half_power_width() - target).abs() / target > BEAMWIDTH_REL_TOLERANCE {
                    return result;
                }
            }

            // VSWR gate, 10% slack on the cap.
            if let (Some(max_vswr), Some(curve)) = (query.max_vswr, vswr_curve) {
                if curve.value_at_freq(center) > max_vswr * VSWR_TOLERANCE_FACTOR {
                    return result;
                }
            }

            // Cross-polarization isolation gate.
            if let Some(min_isolation) = query.min_cross_polarization {
                if let Some(curve) = nearest_curve(&self.cross_pol_vs_angle, center) {
                    if curve.peak() < min_isolation {
                        return result;
                    }
                }
            }
        }

        // Collection-wide gates, once all bands pass.
        if !query.polarization_tags.iter().all(|t| self.has_tag(t)) {
            return result;
        }
        if let (Some(min_eff), Some(eff)) = (query.min_efficiency, self.efficiency) {
            if eff < min_eff {
                return result;
            }
        }

        result.is_match = true;
        result
    }
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;

    use crate::{
        curve::{Sample, ValueCurve},
        frequency::{BandRange, FreqUnit, Frequency},
        query::AntennaQuery,
    };

    use super::{Antenna, DimensionTable};

    fn ghz(v: f64) -> Frequency {
        Frequency::new(v, FreqUnit::GHz)
    }

    fn curve(tag: Frequency, pts: &[(f64, f64)]) -> ValueCurve {
        let samples = pts.iter().map(|&(x, y)| Sample::new(x, y)).collect();
        ValueCurve::new(tag, samples).unwrap()
    }

    fn band(lower_ghz: f64, upper_ghz: f64) -> BandRange {
        BandRange::new(1, ghz(lower_ghz), ghz(upper_ghz))
    }

    // Single gain-vs-frequency curve used by several tests:
    // (2.0, 10), (2.4, 12), (2.5, 11) in GHz/dBi.
    fn gain_freq_antenna() -> Antenna {
        let mut a = Antenna::new("horn-s");
        a.gain_vs_freq = vec![curve(ghz(2.25), &[(2.0, 10.), (2.4, 12.), (2.5, 11.)])];
        a
    }

    #[test]
    fn gain_gate_passes_center_and_edges() {
        let a = gain_freq_antenna();
        let query = AntennaQuery {
            bands: vec![band(2.0, 2.5)],
            min_gain: Some(10.),
            ..AntennaQuery::default()
        };
        let result = a.match_query(&query);
        assert!(result.is_match);
        assert!(result.is_margin_match);
    }

    #[test]
    fn gain_gate_rejects_when_demand_exceeds_curve() {
        let a = gain_freq_antenna();
        let query = AntennaQuery {
            bands: vec![band(2.0, 2.5)],
            min_gain: Some(11.5),
            ..AntennaQuery::default()
        };
        let result = a.match_query(&query);
        assert!(!result.is_match);
        // Center held (12 dBi at the 2.4 sample) but the band edges did not.
        assert!(!result.is_margin_match);
    }

    #[test]
    fn gain_gate_falls_back_to_angular_peak() {
        let mut a = Antenna::new("patch");
        a.gain_vs_angle = vec![curve(ghz(2.4), &[(0., 8.), (30., 5.)])];
        let query = AntennaQuery {
            bands: vec![band(2.3, 2.5)],
            min_gain: Some(9.),
            ..AntennaQuery::default()
        };
        assert!(!a.match_query(&query).is_match);

        let query = AntennaQuery {
            min_gain: Some(7.),
            ..query
        };
        assert!(a.match_query(&query).is_match);
    }

    #[test]
    fn bandwidth_gate_rejects_narrow_antenna() {
        let a = gain_freq_antenna();
        // Curve covers 2.0..2.5 GHz; demand 1.0..4.0 GHz.
        let query = AntennaQuery {
            bands: vec![band(1.0, 4.0)],
            ..AntennaQuery::default()
        };
        assert!(!a.match_query(&query).is_match);
    }

    #[test]
    fn bandwidth_gate_skipped_without_frequency_curves() {
        let mut a = Antenna::new("dish");
        a.gain_vs_angle = vec![curve(ghz(2.4), &[(0., 14.), (30., 11.), (60., 8.)])];
        let query = AntennaQuery {
            bands: vec![band(1.0, 4.0)],
            ..AntennaQuery::default()
        };
        assert!(a.match_query(&query).is_match);
    }

    #[test]
    fn beamwidth_gate_five_percent_relative() {
        let mut a = Antenna::new("dish");
        a.gain_vs_angle = vec![curve(ghz(2.4), &[(0., 14.), (30., 11.), (60., 8.)])];
        // half_power_width = 30.
        let query = AntennaQuery {
            bands: vec![band(2.3, 2.5)],
            target_half_power_width: Some(30.),
            ..AntennaQuery::default()
        };
        assert!(a.match_query(&query).is_match);

        let query = AntennaQuery {
            target_half_power_width: Some(40.),
            ..query
        };
        assert!(!a.match_query(&query).is_match);
    }

    #[test]
    fn vswr_gate_allows_ten_percent_overshoot() {
        let mut a = Antenna::new("whip");
        a.vswr_vs_freq = vec![curve(ghz(2.25), &[(2.0, 1.8), (2.25, 1.6), (2.5, 2.1)])];
        let query = AntennaQuery {
            bands: vec![band(2.0, 2.5)],
            max_vswr: Some(1.5),
            ..AntennaQuery::default()
        };
        // 1.6 at center, cap 1.5 * 1.1 = 1.65: inside tolerance.
        assert!(a.match_query(&query).is_match);

        let query = AntennaQuery {
            max_vswr: Some(1.4),
            ..query
        };
        // Cap 1.54 < 1.6: out.
        assert!(!a.match_query(&query).is_match);
    }

    #[test]
    fn cross_polarization_gate_uses_peak_isolation() {
        let mut a = Antenna::new("septum");
        a.cross_pol_vs_angle = vec![curve(ghz(2.4), &[(0., 25.), (30., 18.)])];
        let query = AntennaQuery {
            bands: vec![band(2.3, 2.5)],
            min_cross_polarization: Some(20.),
            ..AntennaQuery::default()
        };
        assert!(a.match_query(&query).is_match);

        let query = AntennaQuery {
            min_cross_polarization: Some(30.),
            ..query
        };
        assert!(!a.match_query(&query).is_match);
    }

    #[test]
    fn polarization_tags_gate_case_insensitive() {
        let mut a = gain_freq_antenna();
        a.tags = vec!["dual band".into()];
        let query = AntennaQuery {
            bands: vec![band(2.0, 2.5)],
            polarization_tags: vec!["circular polarization".into()],
            ..AntennaQuery::default()
        };
        // Everything else passes; the tag requirement alone rejects.
        assert!(!a.match_query(&query).is_match);

        a.tags.push("Circular Polarization".into());
        assert!(a.match_query(&query).is_match);
    }

    #[test]
    fn efficiency_gate_needs_both_sides() {
        let mut a = gain_freq_antenna();
        let query = AntennaQuery {
            bands: vec![band(2.0, 2.5)],
            min_efficiency: Some(80.),
            ..AntennaQuery::default()
        };
        // Antenna efficiency unknown: gate skipped.
        assert!(a.match_query(&query).is_match);

        a.efficiency = Some(72.);
        assert!(!a.match_query(&query).is_match);

        a.efficiency = Some(91.);
        assert!(a.match_query(&query).is_match);
    }

    #[test]
    fn scale_is_curve_center_over_query_center() {
        let mut a = Antenna::new("horn-x");
        a.vswr_vs_freq = vec![curve(ghz(3.0), &[(2.5, 1.5), (3.5, 1.8)])];
        let query = AntennaQuery {
            bands: vec![band(2.0, 2.5)],
            ..AntennaQuery::default()
        };
        let result = a.match_query(&query);
        assert_relative_eq!(result.scale, 3.0e9 / 2.25e9);
    }

    #[test]
    fn scale_falls_back_to_gain_curve_and_defaults_to_zero() {
        let a = gain_freq_antenna();
        let query = AntennaQuery {
            bands: vec![band(2.0, 2.5)],
            ..AntennaQuery::default()
        };
        assert_relative_eq!(a.match_query(&query).scale, 1.0);

        let bare = Antenna::new("bare");
        assert_relative_eq!(bare.match_query(&query).scale, 0.);
    }

    #[test]
    fn empty_band_list_matches_nothing() {
        let a = gain_freq_antenna();
        assert!(!a.match_query(&AntennaQuery::default()).is_match);
    }

    #[test]
    fn match_is_idempotent() {
        let a = gain_freq_antenna();
        let query = AntennaQuery {
            bands: vec![band(2.0, 2.5)],
            min_gain: Some(10.),
            ..AntennaQuery::default()
        };
        let first = a.match_query(&query);
        let second = a.match_query(&query);
        assert_eq!(first.is_match, second.is_match);
        assert_eq!(first.is_margin_match, second.is_margin_match);
        assert_relative_eq!(first.scale, second.scale);
    }

    #[test]
    fn multi_band_resolves_curves_independently() {
        let mut a = Antenna::new("dual");
        a.gain_vs_freq = vec![
            curve(ghz(2.4), &[(2.0, 10.), (2.4, 12.), (2.8, 10.)]),
            curve(ghz(5.8), &[(5.0, 9.), (5.8, 11.), (6.5, 9.)]),
        ];
        let query = AntennaQuery {
            bands: vec![band(2.3, 2.5), BandRange::new(2, ghz(5.7), ghz(5.9))],
            min_gain: Some(8.),
            ..AntennaQuery::default()
        };
        assert!(a.match_query(&query).is_match);

        // The high band fails a stiffer demand even though the low band holds.
        let query = AntennaQuery {
            min_gain: Some(11.5),
            ..query
        };
        assert!(!a.match_query(&query).is_match);
    }

    #[test]
    fn dimensions_for_picks_nearest_design_frequency() {
        let mut a = Antenna::new("yagi");
        a.dimensions = vec![
            DimensionTable {
                freq: ghz(1.0),
                entries: vec![("boom".into(), 0.5)],
            },
            DimensionTable {
                freq: ghz(2.4),
                entries: vec![("boom".into(), 0.2)],
            },
        ];
        let table = a.dimensions_for(2.0e9).unwrap();
        assert_relative_eq!(table.freq.normalized(), 2.4e9);
        assert!(Antenna::new("none").dimensions_for(1e9).is_none());
    }

    #[test]
    fn summaries_over_curve_categories() {
        let mut a = Antenna::new("dual");
        a.gain_vs_freq = vec![curve(ghz(2.4), &[(2.0, 10.), (2.4, 12.)])];
        a.vswr_vs_freq = vec![
            curve(ghz(2.4), &[(2.0, 1.5)]),
            curve(ghz(5.8), &[(5.0, 1.7)]),
        ];
        assert_eq!(a.design_frequencies(), vec![2.4e9, 5.8e9]);
        assert_relative_eq!(a.peak_gain().unwrap(), 12.);
        assert!(Antenna::new("bare").peak_gain().is_none());
    }
}

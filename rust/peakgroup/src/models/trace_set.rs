use std::collections::BTreeMap;

use serde::{
    Deserialize,
    Serialize,
};

use crate::traits::PeakGroupLike;

/// One monitored ion's intensity-over-time series for a candidate peak
/// group, plus the feature-level (integrated) intensity of that ion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub intensities: Vec<f64>,
    pub total_intensity: f64,
}

impl Trace {
    /// The total intensity defaults to the sum of the series.
    pub fn new(intensities: Vec<f64>) -> Self {
        let total_intensity = intensities.iter().sum();
        Self {
            intensities,
            total_intensity,
        }
    }

    pub fn with_total_intensity(mut self, total_intensity: f64) -> Self {
        self.total_intensity = total_intensity;
        self
    }
}

/// A candidate set of co-eluting traces hypothesized to arise from one
/// analyte elution, keyed by native id at the fragment and precursor
/// level. All traces are expected to share one retention-time grid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PeakGroup {
    fragments: BTreeMap<String, Trace>,
    precursors: BTreeMap<String, Trace>,
    retention_time: f64,
}

impl PeakGroup {
    pub fn new(retention_time: f64) -> Self {
        Self {
            retention_time,
            ..Default::default()
        }
    }

    pub fn insert_fragment(&mut self, native_id: impl Into<String>, trace: Trace) {
        self.fragments.insert(native_id.into(), trace);
    }

    pub fn insert_precursor(&mut self, native_id: impl Into<String>, trace: Trace) {
        self.precursors.insert(native_id.into(), trace);
    }

    pub fn num_fragments(&self) -> usize {
        self.fragments.len()
    }

    pub fn num_precursors(&self) -> usize {
        self.precursors.len()
    }
}

impl PeakGroupLike for PeakGroup {
    fn fragment_trace(&self, native_id: &str) -> Option<&[f64]> {
        self.fragments.get(native_id).map(|t| t.intensities.as_slice())
    }

    fn precursor_trace(&self, native_id: &str) -> Option<&[f64]> {
        self.precursors
            .get(native_id)
            .map(|t| t.intensities.as_slice())
    }

    fn fragment_intensity(&self, native_id: &str) -> Option<f64> {
        self.fragments.get(native_id).map(|t| t.total_intensity)
    }

    fn retention_time(&self) -> f64 {
        self.retention_time
    }
}

/// A spectral-library row: the id of a monitored transition and its
/// expected relative intensity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub native_id: String,
    pub library_intensity: f64,
}

impl Transition {
    pub fn new(native_id: impl Into<String>, library_intensity: f64) -> Self {
        Self {
            native_id: native_id.into(),
            library_intensity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_totals() {
        let trace = Trace::new(vec![1.0, 2.0, 3.0]);
        assert_eq!(trace.total_intensity, 6.0);
        let trace = trace.with_total_intensity(42.0);
        assert_eq!(trace.total_intensity, 42.0);
    }

    #[test]
    fn test_peak_group_lookup() {
        let mut group = PeakGroup::new(120.5);
        group.insert_fragment("y4", Trace::new(vec![0.0, 5.0, 0.0]));
        group.insert_precursor("prec", Trace::new(vec![1.0, 2.0, 1.0]));

        assert_eq!(group.fragment_trace("y4"), Some([0.0, 5.0, 0.0].as_ref()));
        assert_eq!(group.fragment_trace("y5"), None);
        assert_eq!(group.precursor_trace("prec"), Some([1.0, 2.0, 1.0].as_ref()));
        assert_eq!(group.fragment_intensity("y4"), Some(5.0));
        assert_eq!(group.retention_time(), 120.5);
        assert_eq!(group.num_fragments(), 1);
        assert_eq!(group.num_precursors(), 1);
    }
}

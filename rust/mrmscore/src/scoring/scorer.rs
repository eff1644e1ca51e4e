use peakgroup::errors::Result;
use peakgroup::{
    Array2D,
    PeakGroupLike,
};
use tracing::debug;

use super::scores::{
    coelution,
    mutual_information,
    shape,
};
use crate::utils::correlation::{
    XCorrArray,
    normalized_cross_correlation,
};
use crate::utils::ranks::{
    compute_ranks,
    ranked_mutual_information,
};

/// Pairwise scoring session for one candidate peak group.
///
/// Each `initialize_*` call builds one matrix over the named traces of
/// the candidate (replacing any previous matrix in that slot) and the
/// matching `calc_*` methods reduce it to scalar or per-trace scores.
/// Matrices are square-with-upper-triangle for traces scored against
/// their own collection (self, contrast, precursor, precursor-combined)
/// and dense rectangular for precursor-vs-fragment scoring.
///
/// A scorer holds no global state of any kind, so independent candidates
/// can be scored concurrently with one scorer per thread.
///
/// # Example
///
/// ```
/// use mrmscore::MrmScorer;
/// use peakgroup::{PeakGroup, Trace};
///
/// let mut group = PeakGroup::new(100.0);
/// group.insert_fragment("y4", Trace::new(vec![0.0, 1.0, 3.0, 22.0, 5.0, 0.0]));
/// group.insert_fragment("y5", Trace::new(vec![0.0, 2.0, 4.0, 20.0, 5.0, 0.0]));
/// let ids = vec!["y4".to_string(), "y5".to_string()];
///
/// let mut scorer = MrmScorer::default();
/// scorer.initialize_xcorr_matrix(&group, &ids).unwrap();
/// // Both traces peak on the same sample, so their best-correlation
/// // lags are all zero and the co-elution penalty vanishes.
/// assert_eq!(scorer.calc_xcorr_coelution_score(), 0.0);
/// assert!(scorer.calc_xcorr_shape_score() > 0.9);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MrmScorer {
    xcorr_matrix: Option<Array2D<XCorrArray>>,
    xcorr_contrast_matrix: Option<Array2D<XCorrArray>>,
    xcorr_precursor_matrix: Option<Array2D<XCorrArray>>,
    xcorr_precursor_contrast_matrix: Option<Array2D<XCorrArray>>,
    xcorr_precursor_combined_matrix: Option<Array2D<XCorrArray>>,
    mi_matrix: Option<Array2D<f64>>,
    mi_contrast_matrix: Option<Array2D<f64>>,
    mi_precursor_matrix: Option<Array2D<f64>>,
    mi_precursor_contrast_matrix: Option<Array2D<f64>>,
    mi_precursor_combined_matrix: Option<Array2D<f64>>,
}

/// Looks up every id, dropping traces the peak group has no data for.
/// An absent or empty trace is a skip, not an error: a nominal
/// transition may simply have no detectable signal.
fn resolve_traces<'a>(
    ids: &[String],
    lookup: impl Fn(&str) -> Option<&'a [f64]>,
) -> Vec<Option<&'a [f64]>> {
    ids.iter()
        .map(|id| match lookup(id) {
            Some(trace) if !trace.is_empty() => Some(trace),
            _ => {
                debug!("no intensity data for trace {id}, its cells stay unpopulated");
                None
            }
        })
        .collect()
}

/// Builds one pairwise score matrix: every (row, col) pair the topology
/// populates and both of whose traces resolved gets `score_cell`, the
/// rest keep `default`.
fn build_pairwise<T: Clone>(
    rows: &[Option<&[f64]>],
    cols: &[Option<&[f64]>],
    upper_triangle_only: bool,
    default: T,
    mut score_cell: impl FnMut(&[f64], &[f64]) -> Result<T>,
) -> Result<Array2D<T>> {
    let mut matrix = Array2D::new_with_default(rows.len(), cols.len(), default);
    for (i, row_trace) in rows.iter().copied().enumerate() {
        let Some(row_trace) = row_trace else { continue };
        for (j, col_trace) in cols.iter().copied().enumerate() {
            if upper_triangle_only && j < i {
                continue;
            }
            let Some(col_trace) = col_trace else { continue };
            matrix.insert(i, j, score_cell(row_trace, col_trace)?);
        }
    }
    Ok(matrix)
}

fn xcorr_cell(data1: &[f64], data2: &[f64]) -> Result<XCorrArray> {
    normalized_cross_correlation(data1, data2, data1.len() - 1, 1)
        .map_err(|e| e.append_to_context(" while building a pairwise score matrix"))
}

fn mi_cell(data1: &[f64], data2: &[f64]) -> Result<f64> {
    let (ranks1, max_rank1) = compute_ranks(data1);
    let (ranks2, max_rank2) = compute_ranks(data2);
    ranked_mutual_information(&ranks1, &ranks2, max_rank1, max_rank2)
        .map_err(|e| e.append_to_context(" while building a pairwise score matrix"))
}

impl MrmScorer {
    /// Drops every matrix, returning the scorer to its freshly
    /// constructed state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    // ---- cross-correlation matrix builders ----

    /// Fragment self matrix: every fragment trace against every other,
    /// upper triangle.
    pub fn initialize_xcorr_matrix(
        &mut self,
        group: &impl PeakGroupLike,
        native_ids: &[String],
    ) -> Result<()> {
        let traces = resolve_traces(native_ids, |id| group.fragment_trace(id));
        self.xcorr_matrix = Some(build_pairwise(
            &traces,
            &traces,
            true,
            XCorrArray::default(),
            xcorr_cell,
        )?);
        Ok(())
    }

    /// Contrast matrix between two fragment trace collections (e.g.
    /// light vs heavy), upper triangle.
    pub fn initialize_xcorr_contrast_matrix(
        &mut self,
        group: &impl PeakGroupLike,
        native_ids_set1: &[String],
        native_ids_set2: &[String],
    ) -> Result<()> {
        let rows = resolve_traces(native_ids_set1, |id| group.fragment_trace(id));
        let cols = resolve_traces(native_ids_set2, |id| group.fragment_trace(id));
        self.xcorr_contrast_matrix = Some(build_pairwise(
            &rows,
            &cols,
            true,
            XCorrArray::default(),
            xcorr_cell,
        )?);
        Ok(())
    }

    /// Precursor self matrix, upper triangle.
    pub fn initialize_xcorr_precursor_matrix(
        &mut self,
        group: &impl PeakGroupLike,
        precursor_ids: &[String],
    ) -> Result<()> {
        let traces = resolve_traces(precursor_ids, |id| group.precursor_trace(id));
        self.xcorr_precursor_matrix = Some(build_pairwise(
            &traces,
            &traces,
            true,
            XCorrArray::default(),
            xcorr_cell,
        )?);
        Ok(())
    }

    /// Every precursor trace against every fragment trace, dense
    /// rectangle.
    pub fn initialize_xcorr_precursor_contrast_matrix(
        &mut self,
        group: &impl PeakGroupLike,
        precursor_ids: &[String],
        native_ids: &[String],
    ) -> Result<()> {
        let rows = resolve_traces(precursor_ids, |id| group.precursor_trace(id));
        let cols = resolve_traces(native_ids, |id| group.fragment_trace(id));
        self.xcorr_precursor_contrast_matrix = Some(build_pairwise(
            &rows,
            &cols,
            false,
            XCorrArray::default(),
            xcorr_cell,
        )?);
        Ok(())
    }

    /// One square matrix over the union of precursor and fragment traces
    /// (precursor block first), upper triangle, so a single score can
    /// span both levels.
    pub fn initialize_xcorr_precursor_combined_matrix(
        &mut self,
        group: &impl PeakGroupLike,
        precursor_ids: &[String],
        native_ids: &[String],
    ) -> Result<()> {
        let mut traces = resolve_traces(precursor_ids, |id| group.precursor_trace(id));
        traces.extend(resolve_traces(native_ids, |id| group.fragment_trace(id)));
        self.xcorr_precursor_combined_matrix = Some(build_pairwise(
            &traces,
            &traces,
            true,
            XCorrArray::default(),
            xcorr_cell,
        )?);
        Ok(())
    }

    // ---- mutual-information matrix builders ----

    pub fn initialize_mi_matrix(
        &mut self,
        group: &impl PeakGroupLike,
        native_ids: &[String],
    ) -> Result<()> {
        let traces = resolve_traces(native_ids, |id| group.fragment_trace(id));
        self.mi_matrix = Some(build_pairwise(&traces, &traces, true, 0.0, mi_cell)?);
        Ok(())
    }

    pub fn initialize_mi_contrast_matrix(
        &mut self,
        group: &impl PeakGroupLike,
        native_ids_set1: &[String],
        native_ids_set2: &[String],
    ) -> Result<()> {
        let rows = resolve_traces(native_ids_set1, |id| group.fragment_trace(id));
        let cols = resolve_traces(native_ids_set2, |id| group.fragment_trace(id));
        self.mi_contrast_matrix = Some(build_pairwise(&rows, &cols, true, 0.0, mi_cell)?);
        Ok(())
    }

    pub fn initialize_mi_precursor_matrix(
        &mut self,
        group: &impl PeakGroupLike,
        precursor_ids: &[String],
    ) -> Result<()> {
        let traces = resolve_traces(precursor_ids, |id| group.precursor_trace(id));
        self.mi_precursor_matrix = Some(build_pairwise(&traces, &traces, true, 0.0, mi_cell)?);
        Ok(())
    }

    pub fn initialize_mi_precursor_contrast_matrix(
        &mut self,
        group: &impl PeakGroupLike,
        precursor_ids: &[String],
        native_ids: &[String],
    ) -> Result<()> {
        let rows = resolve_traces(precursor_ids, |id| group.precursor_trace(id));
        let cols = resolve_traces(native_ids, |id| group.fragment_trace(id));
        self.mi_precursor_contrast_matrix =
            Some(build_pairwise(&rows, &cols, false, 0.0, mi_cell)?);
        Ok(())
    }

    pub fn initialize_mi_precursor_combined_matrix(
        &mut self,
        group: &impl PeakGroupLike,
        precursor_ids: &[String],
        native_ids: &[String],
    ) -> Result<()> {
        let mut traces = resolve_traces(precursor_ids, |id| group.precursor_trace(id));
        traces.extend(resolve_traces(native_ids, |id| group.fragment_trace(id)));
        self.mi_precursor_combined_matrix =
            Some(build_pairwise(&traces, &traces, true, 0.0, mi_cell)?);
        Ok(())
    }

    // ---- matrix accessors ----

    pub fn xcorr_matrix(&self) -> Option<&Array2D<XCorrArray>> {
        self.xcorr_matrix.as_ref()
    }

    pub fn xcorr_contrast_matrix(&self) -> Option<&Array2D<XCorrArray>> {
        self.xcorr_contrast_matrix.as_ref()
    }

    pub fn xcorr_precursor_matrix(&self) -> Option<&Array2D<XCorrArray>> {
        self.xcorr_precursor_matrix.as_ref()
    }

    pub fn xcorr_precursor_contrast_matrix(&self) -> Option<&Array2D<XCorrArray>> {
        self.xcorr_precursor_contrast_matrix.as_ref()
    }

    pub fn xcorr_precursor_combined_matrix(&self) -> Option<&Array2D<XCorrArray>> {
        self.xcorr_precursor_combined_matrix.as_ref()
    }

    pub fn mi_matrix(&self) -> Option<&Array2D<f64>> {
        self.mi_matrix.as_ref()
    }

    pub fn mi_contrast_matrix(&self) -> Option<&Array2D<f64>> {
        self.mi_contrast_matrix.as_ref()
    }

    pub fn mi_precursor_matrix(&self) -> Option<&Array2D<f64>> {
        self.mi_precursor_matrix.as_ref()
    }

    pub fn mi_precursor_contrast_matrix(&self) -> Option<&Array2D<f64>> {
        self.mi_precursor_contrast_matrix.as_ref()
    }

    pub fn mi_precursor_combined_matrix(&self) -> Option<&Array2D<f64>> {
        self.mi_precursor_combined_matrix.as_ref()
    }

    // ---- co-elution scores ----

    /// Mean + sample standard deviation of the absolute best-correlation
    /// lags across the fragment self matrix.
    pub fn calc_xcorr_coelution_score(&self) -> f64 {
        let matrix = self
            .xcorr_matrix
            .as_ref()
            .expect("cross-correlation matrix must be initialized first");
        coelution::lag_spread(matrix.iter_upper_triangle().map(|(_, _, c)| c))
    }

    /// Like [`Self::calc_xcorr_coelution_score`] but each pair's lag is
    /// weighted by the (normalized) library intensities of its two
    /// transitions and the result is the weighted sum, down-weighting
    /// low-confidence transitions.
    pub fn calc_xcorr_coelution_weighted_score(&self, normalized_library_intensity: &[f64]) -> f64 {
        let matrix = self
            .xcorr_matrix
            .as_ref()
            .expect("cross-correlation matrix must be initialized first");
        coelution::weighted_lag_sum(matrix, normalized_library_intensity)
    }

    pub fn calc_xcorr_contrast_coelution_score(&self) -> f64 {
        let matrix = self
            .xcorr_contrast_matrix
            .as_ref()
            .expect("cross-correlation contrast matrix must be initialized first");
        coelution::lag_spread(matrix.iter_upper_triangle().map(|(_, _, c)| c))
    }

    /// One mean absolute lag per row of the contrast matrix, for scoring
    /// the two collections independently.
    pub fn calc_separate_xcorr_contrast_coelution_score(&self) -> Vec<f64> {
        let matrix = self
            .xcorr_contrast_matrix
            .as_ref()
            .expect("cross-correlation contrast matrix must be initialized first");
        coelution::lag_row_means(matrix)
    }

    pub fn calc_xcorr_precursor_coelution_score(&self) -> f64 {
        let matrix = self
            .xcorr_precursor_matrix
            .as_ref()
            .expect("cross-correlation precursor matrix must be initialized first");
        coelution::lag_spread(matrix.iter_upper_triangle().map(|(_, _, c)| c))
    }

    pub fn calc_xcorr_precursor_contrast_coelution_score(&self) -> f64 {
        let matrix = self
            .xcorr_precursor_contrast_matrix
            .as_ref()
            .expect("cross-correlation precursor contrast matrix must be initialized first");
        coelution::lag_spread(matrix.iter_indexed().map(|(_, _, c)| c))
    }

    pub fn calc_xcorr_precursor_combined_coelution_score(&self) -> f64 {
        let matrix = self
            .xcorr_precursor_combined_matrix
            .as_ref()
            .expect("cross-correlation precursor combined matrix must be initialized first");
        coelution::lag_spread(matrix.iter_upper_triangle().map(|(_, _, c)| c))
    }

    // ---- shape scores ----

    /// Mean best-lag correlation value across the fragment self matrix.
    pub fn calc_xcorr_shape_score(&self) -> f64 {
        let matrix = self
            .xcorr_matrix
            .as_ref()
            .expect("cross-correlation matrix must be initialized first");
        shape::peak_value_mean(matrix.iter_upper_triangle().map(|(_, _, c)| c))
    }

    pub fn calc_xcorr_shape_weighted_score(&self, normalized_library_intensity: &[f64]) -> f64 {
        let matrix = self
            .xcorr_matrix
            .as_ref()
            .expect("cross-correlation matrix must be initialized first");
        shape::weighted_peak_value_sum(matrix, normalized_library_intensity)
    }

    pub fn calc_xcorr_contrast_shape_score(&self) -> f64 {
        let matrix = self
            .xcorr_contrast_matrix
            .as_ref()
            .expect("cross-correlation contrast matrix must be initialized first");
        shape::peak_value_mean(matrix.iter_upper_triangle().map(|(_, _, c)| c))
    }

    pub fn calc_separate_xcorr_contrast_shape_score(&self) -> Vec<f64> {
        let matrix = self
            .xcorr_contrast_matrix
            .as_ref()
            .expect("cross-correlation contrast matrix must be initialized first");
        shape::peak_value_row_means(matrix)
    }

    pub fn calc_xcorr_precursor_shape_score(&self) -> f64 {
        let matrix = self
            .xcorr_precursor_matrix
            .as_ref()
            .expect("cross-correlation precursor matrix must be initialized first");
        shape::peak_value_mean(matrix.iter_upper_triangle().map(|(_, _, c)| c))
    }

    pub fn calc_xcorr_precursor_contrast_shape_score(&self) -> f64 {
        let matrix = self
            .xcorr_precursor_contrast_matrix
            .as_ref()
            .expect("cross-correlation precursor contrast matrix must be initialized first");
        shape::peak_value_mean(matrix.iter_indexed().map(|(_, _, c)| c))
    }

    pub fn calc_xcorr_precursor_combined_shape_score(&self) -> f64 {
        let matrix = self
            .xcorr_precursor_combined_matrix
            .as_ref()
            .expect("cross-correlation precursor combined matrix must be initialized first");
        shape::peak_value_mean(matrix.iter_upper_triangle().map(|(_, _, c)| c))
    }

    // ---- mutual-information scores ----

    pub fn calc_mi_score(&self) -> f64 {
        let matrix = self
            .mi_matrix
            .as_ref()
            .expect("mutual-information matrix must be initialized first");
        mutual_information::mi_mean(matrix.iter_upper_triangle().map(|(_, _, v)| v))
    }

    pub fn calc_mi_weighted_score(&self, normalized_library_intensity: &[f64]) -> f64 {
        let matrix = self
            .mi_matrix
            .as_ref()
            .expect("mutual-information matrix must be initialized first");
        mutual_information::weighted_mi_sum(matrix, normalized_library_intensity)
    }

    pub fn calc_mi_contrast_score(&self) -> f64 {
        let matrix = self
            .mi_contrast_matrix
            .as_ref()
            .expect("mutual-information contrast matrix must be initialized first");
        mutual_information::mi_mean(matrix.iter_upper_triangle().map(|(_, _, v)| v))
    }

    pub fn calc_separate_mi_contrast_score(&self) -> Vec<f64> {
        let matrix = self
            .mi_contrast_matrix
            .as_ref()
            .expect("mutual-information contrast matrix must be initialized first");
        mutual_information::mi_row_means(matrix)
    }

    pub fn calc_mi_precursor_score(&self) -> f64 {
        let matrix = self
            .mi_precursor_matrix
            .as_ref()
            .expect("mutual-information precursor matrix must be initialized first");
        mutual_information::mi_mean(matrix.iter_upper_triangle().map(|(_, _, v)| v))
    }

    pub fn calc_mi_precursor_contrast_score(&self) -> f64 {
        let matrix = self
            .mi_precursor_contrast_matrix
            .as_ref()
            .expect("mutual-information precursor contrast matrix must be initialized first");
        mutual_information::mi_mean(matrix.iter_indexed().map(|(_, _, v)| v))
    }

    pub fn calc_mi_precursor_combined_score(&self) -> f64 {
        let matrix = self
            .mi_precursor_combined_matrix
            .as_ref()
            .expect("mutual-information precursor combined matrix must be initialized first");
        mutual_information::mi_mean(matrix.iter_upper_triangle().map(|(_, _, v)| v))
    }
}

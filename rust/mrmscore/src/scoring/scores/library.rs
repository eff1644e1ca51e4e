use peakgroup::errors::{
    DataProcessingError,
    Result,
};
use peakgroup::{
    PeakGroupLike,
    Transition,
};
use serde::Serialize;

use crate::utils::correlation::pearson;
use crate::utils::similarity::{
    self,
    normalize_sum,
    spectral_angle,
};

/// How well the observed per-transition intensity pattern matches the
/// spectral-library pattern, as independent named outputs. Downstream
/// classifiers pick whichever subset they were trained on, so nothing is
/// collapsed into one number here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LibraryScores {
    /// Pearson correlation of the sum-normalized intensity vectors;
    /// -1 when undefined (zero variance).
    pub correlation: f64,
    /// Mean absolute difference of the sum-normalized vectors.
    pub rmsd: f64,
    /// L1 distance of the square-root-transformed, sum-normalized
    /// vectors.
    pub manhattan: f64,
    /// Dot product of the square-root-transformed, L2-normalized
    /// vectors.
    pub dotproduct: f64,
    /// Angle between the raw intensity vectors.
    pub spectral_angle: f64,
    /// Root-mean-square deviation of the sum-normalized vectors.
    pub rmsd2: f64,
}

/// Pairs each transition's feature-level intensity with its library
/// intensity, in transition-list order, and scores the two vectors
/// against each other.
///
/// The pairing is by native id. A transition the feature has no
/// intensity for is a hard error rather than a skip, since dropping one
/// entry would shift every following pair. Negative library intensities
/// clamp to 0.
pub fn calc_library_score(
    feature: &impl PeakGroupLike,
    transitions: &[Transition],
) -> Result<LibraryScores> {
    if transitions.is_empty() {
        return Err(DataProcessingError::ExpectedNonEmptyData {
            context: Some("calc_library_score".to_string()),
        });
    }

    let mut experimental = Vec::with_capacity(transitions.len());
    let mut library = Vec::with_capacity(transitions.len());
    for transition in transitions {
        let intensity = feature
            .fragment_intensity(&transition.native_id)
            .ok_or_else(|| DataProcessingError::KeyNotFound {
                key: transition.native_id.clone(),
                context: "calc_library_score".to_string(),
            })?;
        experimental.push(intensity);
        library.push(transition.library_intensity.max(0.0));
    }

    let manhattan = sqrt_manhattan(&experimental, &library);
    let dotproduct = sqrt_dotprod(&experimental, &library);
    let spectral_angle = spectral_angle(&experimental, &library)?;
    let rmsd = similarity::manhattan_distance(&experimental, &library)?;

    normalize_sum(&mut experimental);
    normalize_sum(&mut library);
    let rmsd2 = similarity::rmsd(&experimental, &library)?;
    let correlation = pearson(&experimental, &library).unwrap_or(-1.0);

    Ok(LibraryScores {
        correlation,
        rmsd,
        manhattan,
        dotproduct,
        spectral_angle,
        rmsd2,
    })
}

/// Dot product of the square-root-transformed, L2-normalized vectors.
fn sqrt_dotprod(data1: &[f64], data2: &[f64]) -> f64 {
    let sqrt1: Vec<f64> = data1.iter().map(|x| x.sqrt()).collect();
    let sqrt2: Vec<f64> = data2.iter().map(|x| x.sqrt()).collect();
    let norm1 = sqrt1.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm2 = sqrt2.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm1 == 0.0 || norm2 == 0.0 {
        return 0.0;
    }
    sqrt1
        .iter()
        .zip(sqrt2.iter())
        .map(|(a, b)| (a / norm1) * (b / norm2))
        .sum()
}

/// L1 distance of the square-root-transformed, sum-normalized vectors.
fn sqrt_manhattan(data1: &[f64], data2: &[f64]) -> f64 {
    let mut sqrt1: Vec<f64> = data1.iter().map(|x| x.sqrt()).collect();
    let mut sqrt2: Vec<f64> = data2.iter().map(|x| x.sqrt()).collect();
    normalize_sum(&mut sqrt1);
    normalize_sum(&mut sqrt2);
    sqrt1
        .iter()
        .zip(sqrt2.iter())
        .map(|(a, b)| (a - b).abs())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use peakgroup::{
        PeakGroup,
        Trace,
    };

    fn fixture() -> (PeakGroup, Vec<Transition>) {
        let mut group = PeakGroup::new(0.0);
        group.insert_fragment(
            "group1",
            Trace::default().with_total_intensity(782.38073),
        );
        group.insert_fragment(
            "group2",
            Trace::default().with_total_intensity(58.384506),
        );
        group.insert_fragment(
            "group3",
            Trace::default().with_total_intensity(58.384506),
        );
        let transitions = vec![
            Transition::new("group1", 1.0),
            Transition::new("group2", 10000.0),
            Transition::new("group3", 2000.0),
        ];
        (group, transitions)
    }

    #[test]
    fn test_library_score_reference_values() {
        let (group, transitions) = fixture();
        let scores = calc_library_score(&group, &transitions).unwrap();
        assert!((scores.correlation - -0.654591316).abs() < 1e-7);
        assert!((scores.rmsd - 0.5800337593).abs() < 1e-7);
        assert!((scores.manhattan - 1.279644714).abs() < 1e-7);
        assert!((scores.dotproduct - 0.34514801).abs() < 1e-7);
        assert!((scores.spectral_angle - 1.483262).abs() < 1e-6);
        assert!((scores.rmsd2 - 0.6727226674).abs() < 1e-7);
    }

    #[test]
    fn test_library_score_missing_transition_is_an_error() {
        let (group, mut transitions) = fixture();
        transitions.push(Transition::new("group4", 500.0));
        assert!(matches!(
            calc_library_score(&group, &transitions),
            Err(DataProcessingError::KeyNotFound { .. })
        ));
    }

    #[test]
    fn test_library_score_negative_library_intensity_clamps() {
        let (group, mut transitions) = fixture();
        transitions[0].library_intensity = -5.0;
        let scores = calc_library_score(&group, &transitions).unwrap();
        assert!(scores.correlation.is_finite());
        assert!(scores.spectral_angle.is_finite());
    }

    #[test]
    fn test_library_score_empty_transitions() {
        let (group, _) = fixture();
        assert!(calc_library_score(&group, &[]).is_err());
    }

    #[test]
    fn test_library_score_constant_pattern_maps_correlation_to_minus_one() {
        let mut group = PeakGroup::new(0.0);
        group.insert_fragment("a", Trace::default().with_total_intensity(10.0));
        group.insert_fragment("b", Trace::default().with_total_intensity(10.0));
        let transitions = vec![Transition::new("a", 5.0), Transition::new("b", 7.0)];
        let scores = calc_library_score(&group, &transitions).unwrap();
        assert_eq!(scores.correlation, -1.0);
    }
}

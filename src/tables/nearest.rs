use crate::error::{TableError, TableResult};

/// Index of the candidate closest to `target`.
///
/// Equidistant candidates resolve to the lowest index, so lookups are
/// deterministic regardless of axis ordering. NaN candidates never match.
pub fn nearest_index(target: f64, candidates: &[f64]) -> TableResult<usize> {
    if candidates.is_empty() {
        return Err(TableError::InvalidArgument(
            "nearest-value lookup over an empty candidate set".into(),
        ));
    }
    if target.is_nan() {
        return Err(TableError::InvalidArgument(
            "nearest-value lookup target is NaN".into(),
        ));
    }

    let mut best: Option<(usize, f64)> = None;
    for (i, &c) in candidates.iter().enumerate() {
        let dist = (c - target).abs();
        if dist.is_nan() {
            continue;
        }
        // strict `<` keeps the first of equal distances
        if best.map_or(true, |(_, best_dist)| dist < best_dist) {
            best = Some((i, dist));
        }
    }
    best.map(|(i, _)| i).ok_or_else(|| {
        TableError::InvalidArgument("nearest-value lookup over NaN candidates only".into())
    })
}

/// The candidate value closest to `target`. See [`nearest_index`].
pub fn nearest_value(target: f64, candidates: &[f64]) -> TableResult<f64> {
    nearest_index(target, candidates).map(|i| candidates[i])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picks_closest() {
        assert_eq!(nearest_value(2.2, &[1.0, 3.0, 5.0]).unwrap(), 3.0);
        assert_eq!(nearest_value(-10.0, &[1.0, 3.0, 5.0]).unwrap(), 1.0);
        assert_eq!(nearest_value(100.0, &[1.0, 3.0, 5.0]).unwrap(), 5.0);
    }

    #[test]
    fn test_tie_goes_to_first_candidate() {
        assert_eq!(nearest_value(4.0, &[3.0, 5.0]).unwrap(), 3.0);
        assert_eq!(nearest_value(4.0, &[5.0, 3.0]).unwrap(), 5.0);
        assert_eq!(nearest_index(2.0, &[1.0, 3.0, 5.0]).unwrap(), 0);
    }

    #[test]
    fn test_exact_match() {
        assert_eq!(nearest_index(90.0, &[0.0, 45.0, 90.0, 135.0]).unwrap(), 2);
    }

    #[test]
    fn test_unsorted_candidates() {
        assert_eq!(nearest_index(7.0, &[10.0, 0.0, 6.5, 8.0]).unwrap(), 2);
    }

    #[test]
    fn test_empty_candidates_rejected() {
        let err = nearest_value(1.0, &[]).unwrap_err();
        assert!(matches!(err, TableError::InvalidArgument(_)));
    }

    #[test]
    fn test_nan_candidates_are_skipped() {
        assert_eq!(nearest_index(0.5, &[f64::NAN, 0.5]).unwrap(), 1);
        assert_eq!(nearest_index(-3.0, &[f64::NAN, 0.5, 1.0]).unwrap(), 1);
        let err = nearest_index(1.0, &[f64::NAN]).unwrap_err();
        assert!(matches!(err, TableError::InvalidArgument(_)));
    }

    #[test]
    fn test_nan_target_rejected() {
        let err = nearest_index(f64::NAN, &[1.0]).unwrap_err();
        assert!(matches!(err, TableError::InvalidArgument(_)));
    }
}

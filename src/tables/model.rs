use serde::Serialize;

use super::nearest::nearest_index;
use crate::error::{TableError, TableResult};

// ---------------------------------------------------------------------------
// RadialDoseCurve – g(r) tabulated at discrete radii
// ---------------------------------------------------------------------------

/// The radial dose function g(r) of a source.
///
/// `radii` and `values` are parallel: `values[i]` is g at `radii[i]`.
/// Order is the order of the source resource; nothing is sorted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadialDoseCurve {
    /// Radial distance axis (cm).
    radii: Vec<f64>,
    /// Dose multiplier at each radius.
    values: Vec<f64>,
}

/// Source row of the first radial dose point (after the header).
const RADIAL_FIRST_ROW: usize = 1;
/// Source row of the first anisotropy grid row (after title and radius axis).
const GRID_FIRST_ROW: usize = 2;

impl RadialDoseCurve {
    /// Errors name the source row of the first unpaired point.
    pub fn new(radii: Vec<f64>, values: Vec<f64>) -> TableResult<Self> {
        if radii.len() != values.len() {
            return Err(TableError::malformed(
                RADIAL_FIRST_ROW + radii.len().min(values.len()),
                format!(
                    "radial dose has {} radii but {} values",
                    radii.len(),
                    values.len()
                ),
            ));
        }
        Ok(Self { radii, values })
    }

    pub fn radii(&self) -> &[f64] {
        &self.radii
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of tabulated points.
    pub fn len(&self) -> usize {
        self.radii.len()
    }

    pub fn is_empty(&self) -> bool {
        self.radii.is_empty()
    }

    /// Tabulated `(radius, g)` pair whose radius is closest to `radius`.
    pub fn nearest(&self, radius: f64) -> TableResult<(f64, f64)> {
        let i = nearest_index(radius, &self.radii)?;
        Ok((self.radii[i], self.values[i]))
    }
}

// ---------------------------------------------------------------------------
// AnisotropyTable – F(r, θ) on an angle × radius grid
// ---------------------------------------------------------------------------

/// The anisotropy function F(r, θ) of a source.
///
/// Rows are indexed by angle, columns by radius. A cell is `None` when the
/// measurement was absent or unreadable in the source resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnisotropyTable {
    /// Column axis (cm).
    radii: Vec<f64>,
    /// Row axis (degrees).
    angles: Vec<f64>,
    /// `angles.len()` rows of `radii.len()` cells.
    values: Vec<Vec<Option<f64>>>,
}

impl AnisotropyTable {
    /// Errors name source rows in the CSV layout: grid row `i` is row `i + 2`.
    pub fn new(
        radii: Vec<f64>,
        angles: Vec<f64>,
        values: Vec<Vec<Option<f64>>>,
    ) -> TableResult<Self> {
        if values.len() != angles.len() {
            return Err(TableError::malformed(
                GRID_FIRST_ROW + values.len().min(angles.len()),
                format!(
                    "anisotropy grid has {} rows but {} angles",
                    values.len(),
                    angles.len()
                ),
            ));
        }
        if let Some((i, row)) = values
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != radii.len())
        {
            return Err(TableError::malformed(
                GRID_FIRST_ROW + i,
                format!(
                    "anisotropy grid row for angle index {i} has {} cells but there are {} radii",
                    row.len(),
                    radii.len()
                ),
            ));
        }
        Ok(Self {
            radii,
            angles,
            values,
        })
    }

    pub fn radii(&self) -> &[f64] {
        &self.radii
    }

    pub fn angles(&self) -> &[f64] {
        &self.angles
    }

    pub fn values(&self) -> &[Vec<Option<f64>>] {
        &self.values
    }

    /// Grid shape as `(angles, radii)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.angles.len(), self.radii.len())
    }

    /// Cell at the given grid position; `None` if missing or out of range.
    pub fn get(&self, angle_idx: usize, radius_idx: usize) -> Option<f64> {
        self.values.get(angle_idx)?.get(radius_idx).copied().flatten()
    }

    /// Cell at the grid point nearest to `(angle, radius)`.
    ///
    /// Errors only when an axis is empty; a missing cell is `Ok(None)`.
    pub fn nearest(&self, angle: f64, radius: f64) -> TableResult<Option<f64>> {
        let a = nearest_index(angle, &self.angles)?;
        let r = nearest_index(radius, &self.radii)?;
        Ok(self.values[a][r])
    }

    /// Grid positions `(angle_idx, radius_idx)` of every missing cell.
    pub fn missing_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.values.iter().enumerate().flat_map(|(a, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, cell)| cell.is_none())
                .map(move |(r, _)| (a, r))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_table() -> AnisotropyTable {
        AnisotropyTable::new(
            vec![0.5, 1.0],
            vec![0.0, 90.0],
            vec![vec![None, Some(0.7)], vec![Some(1.0), Some(1.0)]],
        )
        .unwrap()
    }

    #[test]
    fn test_radial_dose_requires_parallel_sequences() {
        let err = RadialDoseCurve::new(vec![0.5, 1.0], vec![1.0]).unwrap_err();
        assert!(matches!(err, TableError::MalformedInput { .. }));
    }

    #[test]
    fn test_radial_dose_nearest() {
        let curve = RadialDoseCurve::new(vec![0.5, 1.0, 2.0], vec![1.01, 1.0, 0.98]).unwrap();
        assert_eq!(curve.nearest(1.4).unwrap(), (1.0, 1.0));
        assert_eq!(curve.nearest(1.5).unwrap(), (1.0, 1.0));
        assert_eq!(curve.len(), 3);
    }

    #[test]
    fn test_empty_curve_lookup_is_invalid() {
        let curve = RadialDoseCurve::new(vec![], vec![]).unwrap();
        assert!(curve.is_empty());
        assert!(matches!(
            curve.nearest(1.0),
            Err(TableError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_anisotropy_shape_is_checked() {
        let err = AnisotropyTable::new(vec![0.5, 1.0], vec![0.0], vec![vec![Some(1.0)]])
            .unwrap_err();
        assert!(matches!(err, TableError::MalformedInput { .. }));

        let err = AnisotropyTable::new(vec![0.5], vec![0.0, 10.0], vec![vec![Some(1.0)]])
            .unwrap_err();
        assert!(matches!(err, TableError::MalformedInput { .. }));
    }

    #[test]
    fn test_shape_errors_name_source_rows() {
        let err = AnisotropyTable::new(
            vec![0.5],
            vec![0.0, 10.0],
            vec![vec![Some(1.0)], vec![Some(1.0), Some(0.9)]],
        )
        .unwrap_err();
        assert!(matches!(err, TableError::MalformedInput { row: 3, .. }));

        let err = AnisotropyTable::new(vec![0.5], vec![0.0, 10.0], vec![vec![Some(1.0)]])
            .unwrap_err();
        assert!(matches!(err, TableError::MalformedInput { row: 3, .. }));

        let err = RadialDoseCurve::new(vec![0.5, 1.0, 2.0], vec![1.0]).unwrap_err();
        assert!(matches!(err, TableError::MalformedInput { row: 2, .. }));
    }

    #[test]
    fn test_anisotropy_get_and_nearest() {
        let table = small_table();
        assert_eq!(table.shape(), (2, 2));
        assert_eq!(table.get(0, 1), Some(0.7));
        assert_eq!(table.get(0, 0), None);
        assert_eq!(table.get(5, 0), None);
        assert_eq!(table.nearest(80.0, 0.9).unwrap(), Some(1.0));
        assert_eq!(table.nearest(1.0, 0.4).unwrap(), None);
    }

    #[test]
    fn test_missing_cells() {
        let cells: Vec<_> = small_table().missing_cells().collect();
        assert_eq!(cells, vec![(0, 0)]);
    }

    #[test]
    fn test_missing_cells_serialize_as_null() {
        let json = serde_json::to_value(small_table()).unwrap();
        assert!(json["values"][0][0].is_null());
        assert_eq!(json["values"][0][1], 0.7);
    }
}

use std::path::Path;

use serde::Serialize;

use super::loader::{load_anisotropy, load_radial_dose};
use super::model::{AnisotropyTable, RadialDoseCurve};
use crate::config::TablesConfig;
use crate::error::TableResult;

// ---------------------------------------------------------------------------
// Source tables
// ---------------------------------------------------------------------------

/// Both lookup tables of one source, loaded together at start-up and then
/// handed by reference to whatever computes dose.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceTables {
    pub radial_dose: RadialDoseCurve,
    pub anisotropy: AnisotropyTable,
}

/// Result of [`SourceTables::lookup`], with the grid point actually used.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceLookup {
    /// Tabulated radius nearest to the query (radial dose axis).
    pub radius: f64,
    /// g at `radius`.
    pub radial_dose: f64,
    /// Tabulated angle nearest to the query (anisotropy axis).
    pub angle: f64,
    /// Tabulated radius nearest to the query (anisotropy axis).
    pub anisotropy_radius: f64,
    /// F at (`angle`, `anisotropy_radius`), `None` if that cell is missing.
    pub anisotropy: Option<f64>,
}

impl SourceTables {
    /// Load both tables; the first failure aborts.
    pub fn load(radial_dose: &Path, anisotropy: &Path) -> TableResult<Self> {
        Ok(Self {
            radial_dose: load_radial_dose(radial_dose)?,
            anisotropy: load_anisotropy(anisotropy)?,
        })
    }

    pub fn from_config(config: &TablesConfig) -> TableResult<Self> {
        Self::load(&config.radial_dose, &config.anisotropy)
    }

    /// Map an arbitrary `(radius, angle)` onto the nearest tabulated points.
    pub fn lookup(&self, radius: f64, angle: f64) -> TableResult<SourceLookup> {
        let (g_radius, g) = self.radial_dose.nearest(radius)?;

        let a = super::nearest_index(angle, self.anisotropy.angles())?;
        let r = super::nearest_index(radius, self.anisotropy.radii())?;

        Ok(SourceLookup {
            radius: g_radius,
            radial_dose: g,
            angle: self.anisotropy.angles()[a],
            anisotropy_radius: self.anisotropy.radii()[r],
            anisotropy: self.anisotropy.get(a, r),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> SourceTables {
        SourceTables {
            radial_dose: RadialDoseCurve::new(vec![0.5, 1.0, 2.0], vec![0.99, 1.0, 1.01])
                .unwrap(),
            anisotropy: AnisotropyTable::new(
                vec![0.5, 1.0],
                vec![0.0, 45.0, 90.0],
                vec![
                    vec![None, Some(0.66)],
                    vec![Some(0.9), Some(0.92)],
                    vec![Some(1.0), Some(1.0)],
                ],
            )
            .unwrap(),
        }
    }

    #[test]
    fn test_lookup_snaps_to_grid() {
        let hit = tables().lookup(1.1, 50.0).unwrap();
        assert_eq!(hit.radius, 1.0);
        assert_eq!(hit.radial_dose, 1.0);
        assert_eq!(hit.angle, 45.0);
        assert_eq!(hit.anisotropy_radius, 1.0);
        assert_eq!(hit.anisotropy, Some(0.92));
    }

    #[test]
    fn test_lookup_on_missing_cell() {
        let hit = tables().lookup(0.4, 2.0).unwrap();
        assert_eq!(hit.radius, 0.5);
        assert_eq!(hit.anisotropy, None);
    }

    #[test]
    fn test_lookup_nan_is_invalid() {
        assert!(tables().lookup(f64::NAN, 0.0).is_err());
    }
}

use std::path::Path;

use super::model::{AnisotropyTable, RadialDoseCurve};
use super::reader::read_rows;
use crate::error::{TableError, TableResult};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the radial dose function from a CSV resource.
pub fn load_radial_dose(path: &Path) -> TableResult<RadialDoseCurve> {
    let curve = build_radial_dose(&read_rows(path)?)?;
    log::info!(
        "loaded radial dose function ({} points) from {}",
        curve.len(),
        path.display()
    );
    Ok(curve)
}

/// Load the anisotropy function from a CSV resource.
pub fn load_anisotropy(path: &Path) -> TableResult<AnisotropyTable> {
    let table = build_anisotropy(&read_rows(path)?)?;
    let (n_angles, n_radii) = table.shape();
    log::info!(
        "loaded anisotropy function ({n_angles} angles x {n_radii} radii, {} missing) from {}",
        table.missing_cells().count(),
        path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// Radial dose
// ---------------------------------------------------------------------------

/// Layout: one header row, then `<radius_cm>,<g>` per row.
///
/// Rows are kept in input order. Any radius or value that is not a finite
/// number fails the whole load.
pub fn build_radial_dose<S: AsRef<str>>(rows: &[Vec<S>]) -> TableResult<RadialDoseCurve> {
    let body = rows.get(1..).unwrap_or_default();
    let mut radii = Vec::with_capacity(body.len());
    let mut values = Vec::with_capacity(body.len());

    for (offset, row) in body.iter().enumerate() {
        let row_no = offset + 1;
        radii.push(parse_required(row, 0, row_no, "radius")?);
        values.push(parse_required(row, 1, row_no, "dose value")?);
    }

    RadialDoseCurve::new(radii, values)
}

// ---------------------------------------------------------------------------
// Anisotropy
// ---------------------------------------------------------------------------

/// Layout:
/// ```text
///   row 0      title (ignored)
///   row 1      <ignored>, r_1, r_2, ..., r_N
///   row 2..M   θ_i,       F(r_1,θ_i), ..., F(r_N,θ_i)
/// ```
///
/// Axis values must be finite numbers. Grid cells that are empty or
/// unparseable are recorded as missing instead of failing the load; so are
/// trailing cells a short row leaves out. Empty cells past the last radius are
/// ignored.
pub fn build_anisotropy<S: AsRef<str>>(rows: &[Vec<S>]) -> TableResult<AnisotropyTable> {
    let header = rows
        .get(1)
        .ok_or_else(|| TableError::malformed(1, "missing radius header row"))?;

    let radii = header
        .iter()
        .enumerate()
        .skip(1)
        .map(|(col, _)| parse_required(header, col, 1, "radius"))
        .collect::<TableResult<Vec<f64>>>()?;

    let body = &rows[2..];
    let mut angles = Vec::with_capacity(body.len());
    let mut values = Vec::with_capacity(body.len());

    for (offset, row) in body.iter().enumerate() {
        let row_no = offset + 2;
        angles.push(parse_required(row, 0, row_no, "angle")?);

        let cells = row.get(1..).unwrap_or_default();
        let overflow = cells.get(radii.len()..).unwrap_or_default();
        if overflow.iter().any(|c| !AsRef::<str>::as_ref(c).trim().is_empty()) {
            return Err(TableError::malformed(
                row_no,
                format!(
                    "{} grid cells but only {} radii in the header",
                    cells.len(),
                    radii.len()
                ),
            ));
        }

        let grid_row: Vec<Option<f64>> = (0..radii.len())
            .map(|col| {
                let cell: &str = cells.get(col).map(|c| c.as_ref()).unwrap_or("");
                let parsed = parse_cell(cell);
                if parsed.is_none() {
                    log::debug!(
                        "anisotropy row {row_no}, radius column {}: '{cell}' recorded as missing",
                        col + 1
                    );
                }
                parsed
            })
            .collect();
        values.push(grid_row);
    }

    AnisotropyTable::new(radii, angles, values)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_required<S: AsRef<str>>(
    row: &[S],
    col: usize,
    row_no: usize,
    what: &str,
) -> TableResult<f64> {
    let cell: &str = row
        .get(col)
        .ok_or_else(|| TableError::malformed(row_no, format!("missing {what} in column {col}")))?
        .as_ref();
    cell.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            TableError::malformed(row_no, format!("{what} '{cell}' in column {col} is not a number"))
        })
}

/// A grid measurement; `None` when it is not a finite number.
fn parse_cell(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

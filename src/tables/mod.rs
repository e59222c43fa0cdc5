/// Source lookup tables: raw CSV reading, table building, nearest lookup.
///
/// Architecture:
/// ```text
///  radialDose.csv      anisotropyFunction.csv
///        │                     │
///        ▼                     ▼
///   ┌──────────┐
///   │  reader   │  path → rows of raw cells
///   └──────────┘
///        │                     │
///        ▼                     ▼
///   ┌──────────┐
///   │  loader   │  rows → RadialDoseCurve / AnisotropyTable
///   └──────────┘
///        │                     │
///        ▼                     ▼
///   ┌──────────────┐
///   │ SourceTables  │  both tables, queried through `nearest`
///   └──────────────┘
/// ```

pub mod loader;
pub mod model;
pub mod nearest;
pub mod reader;
pub mod source;

pub use loader::{build_anisotropy, build_radial_dose, load_anisotropy, load_radial_dose};
pub use model::{AnisotropyTable, RadialDoseCurve};
pub use nearest::{nearest_index, nearest_value};
pub use reader::{parse_rows, read_rows, Rows};
pub use source::{SourceLookup, SourceTables};

//! HDR brachytherapy source lookup tables and treatment plan retrieval.
//!
//! Two independent parts:
//! * [`tables`] – radial dose g(r) and anisotropy F(r, θ) tables loaded from
//!   CSV, queried by nearest tabulated point.
//! * [`plans`] – cases, plans and plan blobs read from the planning database.

pub mod config;
pub mod error;
pub mod plans;
pub mod tables;

pub use config::Config;
pub use error::{ConfigError, PlanError, TableError};
pub use plans::{PlanQuery, PlanRecord, PlanRepository};
pub use tables::{AnisotropyTable, RadialDoseCurve, SourceTables};

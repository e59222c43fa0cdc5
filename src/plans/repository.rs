use std::path::Path;

use rusqlite::{params, Connection, ToSql};
use serde::Serialize;

use crate::config::DatabaseConfig;
use crate::error::{PlanError, PlanResult};

/// File name conventionally used when a plan blob is written to disk.
pub const DEFAULT_BLOB_FILE: &str = "RTSTRUCT.dcm";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Which plans of a case to fetch.
#[derive(Debug, Clone, Default)]
pub struct PlanQuery {
    pub patient_id: String,
    pub case_label: String,
    /// Exact plan label; `None` (or empty) fetches every plan of the case.
    pub plan_label: Option<String>,
    /// Keep plans whose label mentions "image".
    pub include_images: bool,
    /// Only plans that are published and carry a dose matrix.
    pub published_only: bool,
}

impl PlanQuery {
    pub fn new(patient_id: impl Into<String>, case_label: impl Into<String>) -> Self {
        Self {
            patient_id: patient_id.into(),
            case_label: case_label.into(),
            ..Default::default()
        }
    }
}

/// A plan label with its serialized (DICOM part-10) blob.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanRecord {
    pub label: String,
    #[serde(skip)]
    pub blob: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Repository
// ---------------------------------------------------------------------------

/// Read access to patients, cases and plans in the planning database.
///
/// The connection is closed when the repository is dropped.
pub struct PlanRepository {
    conn: Connection,
}

impl PlanRepository {
    pub fn open(path: &Path) -> PlanResult<Self> {
        log::debug!("opening plan database {}", path.display());
        Ok(Self::from_connection(Connection::open(path)?))
    }

    pub fn from_config(config: &DatabaseConfig) -> PlanResult<Self> {
        Self::open(&config.path)
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Labels of every case belonging to the patient.
    pub fn list_cases(&self, patient_id: &str) -> PlanResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT tc.SLABEL
             FROM PATIENT pt
                 INNER JOIN TCASE tc ON pt.SUID = tc.SPATIENTUID
             WHERE pt.SID = ?1
             ORDER BY tc.SLABEL",
        )?;
        let rows = stmt.query_map(params![patient_id], |row| row.get(0))?;
        let cases = rows.collect::<Result<Vec<String>, _>>()?;
        log::debug!("patient {patient_id}: {} cases", cases.len());
        Ok(cases)
    }

    /// Labels of every plan in one of the patient's cases.
    pub fn list_plans(&self, patient_id: &str, case_label: &str) -> PlanResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT rtplan.SLABEL
             FROM PATIENT pt
                 INNER JOIN TCASE tc ON pt.SUID = tc.SPATIENTUID
                 INNER JOIN RTPLAN rtplan ON rtplan.SCASEUID = tc.SUID
             WHERE pt.SID = ?1 AND tc.SLABEL = ?2
             ORDER BY rtplan.SLABEL",
        )?;
        let rows = stmt.query_map(params![patient_id, case_label], |row| row.get(0))?;
        let plans = rows.collect::<Result<Vec<String>, _>>()?;
        log::debug!(
            "patient {patient_id}, case '{case_label}': {} plans",
            plans.len()
        );
        Ok(plans)
    }

    /// Plan labels and blobs matching `query`.
    pub fn fetch_plans(&self, query: &PlanQuery) -> PlanResult<Vec<PlanRecord>> {
        let mut sql = String::from(
            "SELECT rtplan.SLABEL, rtplan.LBPART10BLOB
             FROM PATIENT pt
                 INNER JOIN TCASE tc ON pt.SUID = tc.SPATIENTUID
                 INNER JOIN RTPLAN rtplan ON rtplan.SCASEUID = tc.SUID
             WHERE pt.SID = ?1 AND tc.SLABEL = ?2",
        );
        let mut args: Vec<&dyn ToSql> = vec![&query.patient_id, &query.case_label];

        if !query.include_images {
            sql.push_str(" AND LOWER(rtplan.SLABEL) NOT LIKE '%image%'");
        }
        if query.published_only {
            sql.push_str(" AND rtplan.BHASDOSEMATRIX = 'T' AND rtplan.BPUBLISHED = 'T'");
        }
        if let Some(label) = query.plan_label.as_ref().filter(|l| !l.is_empty()) {
            sql.push_str(" AND rtplan.SLABEL = ?3");
            args.push(label);
        }
        sql.push_str(" ORDER BY rtplan.SLABEL");

        log::debug!("fetching plans: {sql}");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(args.as_slice(), |row| {
            let blob: Option<Vec<u8>> = row.get(1)?;
            Ok(PlanRecord {
                label: row.get(0)?,
                blob: blob.unwrap_or_default(),
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(PlanError::from)
    }
}

/// Write a plan blob to `path`, replacing any existing file.
pub fn save_blob(data: &[u8], path: &Path) -> PlanResult<()> {
    std::fs::write(path, data).map_err(|source| PlanError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("wrote {} bytes to {}", data.len(), path.display());
    Ok(())
}

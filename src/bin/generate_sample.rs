use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

/// Write synthetic radial dose and anisotropy tables in the source CSV layout.
#[derive(Parser)]
struct Opt {
    /// Output directory
    #[clap(default_value = "source_files")]
    dir: PathBuf,
}

const RADII_CM: [f64; 10] = [0.25, 0.5, 0.75, 1.0, 1.5, 2.0, 3.0, 5.0, 7.5, 10.0];
const ANGLES_DEG: [f64; 12] = [0.0, 1.0, 2.0, 5.0, 10.0, 20.0, 30.0, 45.0, 60.0, 90.0, 150.0, 179.0];

/// Smooth stand-in for an Ir-192 g(r): flat near the source, slow fall-off beyond 5 cm.
fn radial_dose(r: f64) -> f64 {
    0.9943 + 0.0093 * r - 0.0011 * r * r
}

/// Stand-in for F(r, θ): 1 at 90°, dipping towards the source axis, less so further out.
fn anisotropy(r: f64, theta_deg: f64) -> f64 {
    let depth = 0.35 / (1.0 + 0.4 * r);
    let axial = theta_deg.to_radians().cos().abs().powi(4);
    1.0 - depth * axial
}

fn write_radial_dose(path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating radial dose CSV")?;
    writer.write_record(["r (cm)", "g(r)"])?;
    for r in RADII_CM {
        writer.write_record([r.to_string(), format!("{:.4}", radial_dose(r))])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_anisotropy(path: &Path) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("creating anisotropy CSV")?;
    writer.write_record(["F(r,theta)"])?;

    let mut header = vec!["theta (deg) / r (cm)".to_string()];
    header.extend(RADII_CM.iter().map(|r| r.to_string()));
    writer.write_record(&header)?;

    for theta in ANGLES_DEG {
        let mut row = vec![theta.to_string()];
        for r in RADII_CM {
            // on-axis points closest to the source are not measurable
            if theta < 1.5 && r < 0.3 {
                row.push("N/A".to_string());
            } else {
                row.push(format!("{:.3}", anisotropy(r, theta)));
            }
        }
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let opt = Opt::parse();

    std::fs::create_dir_all(&opt.dir)
        .with_context(|| format!("creating {}", opt.dir.display()))?;

    let radial_path = opt.dir.join("v2r_ESTRO_radialDose.csv");
    let anisotropy_path = opt.dir.join("v2r_ESTRO_anisotropyFunction.csv");
    write_radial_dose(&radial_path)?;
    write_anisotropy(&anisotropy_path)?;

    println!(
        "Wrote {} radial dose points to {}",
        RADII_CM.len(),
        radial_path.display()
    );
    println!(
        "Wrote {} x {} anisotropy grid to {}",
        ANGLES_DEG.len(),
        RADII_CM.len(),
        anisotropy_path.display()
    );
    Ok(())
}

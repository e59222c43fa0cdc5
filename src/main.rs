use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use hdr_brachy::config::{Config, TablesConfig};
use hdr_brachy::plans::{save_blob, PlanQuery, PlanRepository};
use hdr_brachy::tables::SourceTables;

#[derive(Parser)]
#[clap(name = "hdr-brachy", about = "HDR source tables and treatment plan retrieval")]
struct Opt {
    /// JSON configuration file
    #[clap(short, long, default_value = "server_config.json")]
    config: PathBuf,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load both source tables and print a summary
    Tables {
        #[clap(flatten)]
        paths: TablePaths,
        /// Dump the tables as JSON instead
        #[clap(long)]
        json: bool,
    },
    /// Look up g(r) and F(r, θ) at the nearest tabulated points
    Lookup {
        #[clap(flatten)]
        paths: TablePaths,
        /// Radial distance (cm)
        #[clap(short, long)]
        radius: f64,
        /// Polar angle (degrees)
        #[clap(short, long)]
        angle: f64,
    },
    /// List a patient's cases
    Cases { patient: String },
    /// List the plans in one of a patient's cases
    Plans { patient: String, case: String },
    /// Fetch plan blobs and write one `<label>.dcm` per plan
    Fetch {
        patient: String,
        case: String,
        /// Only the plan with this exact label
        #[clap(long)]
        plan: Option<String>,
        /// Keep plans whose label mentions "image"
        #[clap(long)]
        images: bool,
        /// Only published plans with a dose matrix
        #[clap(long)]
        published: bool,
        /// Output directory
        #[clap(short, long, default_value = ".")]
        out: PathBuf,
    },
}

#[derive(clap::Args)]
struct TablePaths {
    /// Radial dose CSV (overrides the configuration)
    #[clap(long)]
    radial: Option<PathBuf>,
    /// Anisotropy CSV (overrides the configuration)
    #[clap(long)]
    anisotropy: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let opt = Opt::parse();

    match opt.command {
        Command::Tables { paths, json } => {
            let tables = load_tables(&opt.config, paths)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tables)?);
            } else {
                print_summary(&tables);
            }
        }
        Command::Lookup {
            paths,
            radius,
            angle,
        } => {
            let tables = load_tables(&opt.config, paths)?;
            let hit = tables
                .lookup(radius, angle)
                .with_context(|| format!("looking up r={radius} cm, θ={angle}°"))?;
            println!("g({} cm) = {}", hit.radius, hit.radial_dose);
            match hit.anisotropy {
                Some(f) => println!("F({} cm, {}°) = {f}", hit.anisotropy_radius, hit.angle),
                None => println!("F({} cm, {}°) is missing", hit.anisotropy_radius, hit.angle),
            }
        }
        Command::Cases { patient } => {
            let repo = open_repository(&opt.config)?;
            for case in repo.list_cases(&patient)? {
                println!("{case}");
            }
        }
        Command::Plans { patient, case } => {
            let repo = open_repository(&opt.config)?;
            for plan in repo.list_plans(&patient, &case)? {
                println!("{plan}");
            }
        }
        Command::Fetch {
            patient,
            case,
            plan,
            images,
            published,
            out,
        } => {
            let repo = open_repository(&opt.config)?;
            let query = PlanQuery {
                plan_label: plan,
                include_images: images,
                published_only: published,
                ..PlanQuery::new(patient, case)
            };
            let records = repo.fetch_plans(&query)?;
            if records.is_empty() {
                log::warn!("no plans matched");
            }
            for record in &records {
                let path = out.join(format!("{}.dcm", file_stem(&record.label)));
                save_blob(&record.blob, &path)?;
                println!("{} -> {}", record.label, path.display());
            }
        }
    }

    Ok(())
}

fn load_tables(config_path: &Path, paths: TablePaths) -> Result<SourceTables> {
    let mut tables = if config_path.exists() {
        Config::from_file(config_path)
            .with_context(|| format!("reading {}", config_path.display()))?
            .tables
    } else {
        TablesConfig::default()
    };
    if let Some(radial) = paths.radial {
        tables.radial_dose = radial;
    }
    if let Some(anisotropy) = paths.anisotropy {
        tables.anisotropy = anisotropy;
    }
    SourceTables::from_config(&tables).context("loading source tables")
}

fn open_repository(config_path: &Path) -> Result<PlanRepository> {
    let config = Config::from_file(config_path)
        .with_context(|| format!("reading {}", config_path.display()))?;
    PlanRepository::from_config(&config.database)
        .with_context(|| format!("opening {}", config.database.path.display()))
}

fn print_summary(tables: &SourceTables) {
    let g = &tables.radial_dose;
    println!("radial dose: {} points", g.len());
    if let (Some(first), Some(last)) = (g.radii().first(), g.radii().last()) {
        println!("  r = {first} .. {last} cm");
    }

    let f = &tables.anisotropy;
    let (n_angles, n_radii) = f.shape();
    println!("anisotropy: {n_angles} angles x {n_radii} radii");
    for (a, r) in f.missing_cells() {
        println!(
            "  missing: θ = {}°, r = {} cm",
            f.angles()[a],
            f.radii()[r]
        );
    }
}

/// Plan labels are free text; keep them usable as file names.
fn file_stem(label: &str) -> String {
    label
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}

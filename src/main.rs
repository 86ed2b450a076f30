use anyhow::{bail, Context, Result};
use schoolmap::{
    cli::{Cli, Commands},
    client::AdminClient,
    dataset::{Dataset, District},
    error::IngestError,
    geo::{district_color, match_border, BorderCollection},
    parser::{ingest_file, IngestReport},
    schema::{known_district_by_id, known_districts_by_id},
    server,
    store::{import_workbook, load_current, DataDir},
    ui::{LogUi, UiApp},
};
use std::path::PathBuf;
use std::time::Instant;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse_args();

    match cli.command {
        Commands::Serve(args) => {
            let config = args.into_config(cli.data_dir);
            actix_web::rt::System::new().block_on(server::run(config))?;
        }

        Commands::Import { workbook, tui } => {
            let start = Instant::now();
            let data_dir = DataDir::new(cli.data_dir)?;
            let bytes = std::fs::read(&workbook)
                .with_context(|| format!("Failed to read {:?}", workbook))?;

            let result = if tui {
                let mut ui = UiApp::new()?;
                match import_workbook(&data_dir, &bytes, &mut ui) {
                    Ok(ingested) => {
                        ui.finish(&ingested.report.summary())?;
                        Ok(ingested)
                    }
                    Err(e) => {
                        ui.restore()?;
                        Err(e)
                    }
                }
            } else {
                import_workbook(&data_dir, &bytes, &mut LogUi::new())
            };

            let ingested = result.inspect_err(print_rejection)?;
            print_report(&ingested.report, false);
            println!(
                "\nImported {} schools into {:?} in {:.1}s",
                ingested.report.imported,
                data_dir.database_path(),
                start.elapsed().as_secs_f64()
            );
        }

        Commands::Inspect { workbook, verbose } => {
            let ingested = ingest_file(&workbook)
                .inspect_err(|e| {
                    if let Some(report) = e.report() {
                        print_report(report, true);
                    }
                })
                .with_context(|| format!("Failed to import {:?}", workbook))?;

            print_report(&ingested.report, verbose);
            println!();
            print_districts(&ingested.dataset.districts);
        }

        Commands::Districts => {
            let dataset = require_data(cli.data_dir)?;
            print_districts(&dataset.districts);
        }

        Commands::Schools { id } => {
            let dataset = require_data(cli.data_dir)?;
            let Some(schools) = dataset.schools_in(id) else {
                bail!("Unknown district id {}", id);
            };
            for school in &schools {
                let coords = school
                    .coords
                    .map(|c| format!("{:.4}, {:.4}", c.latitude(), c.longitude()))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:<50} {:>6} {:>6}  {}",
                    school.name,
                    count(school.students),
                    count(school.teachers),
                    coords
                );
            }
            println!("\n{} schools", schools.len());
        }

        Commands::Match { label } => {
            let districts = districts_for_matching(cli.data_dir)?;
            match match_border(&label, &districts) {
                Some(id) => println!(
                    "{} -> {} {} ({})",
                    label,
                    id,
                    known_district_by_id(id).map(|geo| geo.short_name).unwrap_or_default(),
                    district_color(&label)
                ),
                None => println!("{} -> no district", label),
            }
        }

        Commands::Borders { geojson } => {
            let borders = BorderCollection::load(&geojson)?;
            let districts = districts_for_matching(cli.data_dir)?;
            for border in borders.resolve(&districts) {
                let id = border
                    .district_id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!("{:>3}  {:<8} {}", id, border.color, border.label);
            }
            println!("\n{} border features", borders.len());
        }

        Commands::KnownDistricts => {
            for (id, geo) in known_districts_by_id() {
                println!(
                    "{:>3}  {:<8} {:<22} {:<16} {}",
                    id, geo.color, geo.border_keyword, geo.short_name, geo.name
                );
            }
        }

        Commands::Upload { workbook, remote } => {
            let client = AdminClient::new(&remote.url)?;
            client.login(&remote.login, &remote.password)?;
            let response = client.upload(&workbook)?;
            client.logout()?;

            print_report(&response.report, false);
            println!("\nServer status: {}", response.status);
        }

        Commands::Status { remote } => {
            let client = AdminClient::new(&remote.url)?;
            client.login(&remote.login, &remote.password)?;
            let exists = client.data_exists()?;
            client.logout()?;

            if exists {
                println!("{} has uploaded data", remote.url);
            } else {
                println!("{} has no data yet", remote.url);
            }
        }
    }

    Ok(())
}

fn require_data(data_dir: Option<PathBuf>) -> Result<Dataset> {
    let data_dir = DataDir::new(data_dir)?;
    match load_current(&data_dir)? {
        Some(dataset) => Ok(dataset),
        None => bail!("No data imported yet in {:?}", data_dir.root()),
    }
}

/// Imported districts, or the fixed table when nothing is imported
fn districts_for_matching(data_dir: Option<PathBuf>) -> Result<Vec<District>> {
    let data_dir = DataDir::new(data_dir)?;
    Ok(match load_current(&data_dir)? {
        Some(dataset) => dataset.districts,
        None => known_districts_by_id()
            .into_iter()
            .map(|(id, geo)| District::new(Some(id), geo.name))
            .collect(),
    })
}

fn count(value: Option<u64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn print_districts(districts: &[District]) {
    println!(
        "{:>3}  {:<40} {:>8} {:>8} {:>8}",
        "id", "district", "students", "teachers", "workers"
    );
    for d in districts {
        println!(
            "{:>3}  {:<40} {:>8} {:>8} {:>8}",
            d.id.map(|id| id.to_string()).unwrap_or_default(),
            d.name,
            count(d.students),
            count(d.teachers),
            count(d.workers)
        );
    }
}

fn print_report(report: &IngestReport, verbose: bool) {
    println!("{}", report.summary());
    for (reason, n) in &report.skipped {
        println!("  {:>5}  {}", n, reason);
    }
    if verbose {
        for issue in &report.issues {
            match issue.field {
                Some(field) => println!("  row {}: {} ({:?})", issue.row, issue.reason, field),
                None => println!("  row {}: {}", issue.row, issue.reason),
            }
        }
    }
}

fn print_rejection(e: &anyhow::Error) {
    if let Some(report) = e.downcast_ref::<IngestError>().and_then(IngestError::report) {
        print_report(report, true);
    }
}

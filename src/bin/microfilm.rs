//! Binary entry point for the microfilm allocation engine CLI.

use std::process::ExitCode;

use clap::Parser;

use microfilm::cli::Cli;
use microfilm::{allocate, config::Config, detect, export, init, logging, store};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.debug);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "run failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> microfilm::Result<()> {
    let config = Config::load_or_default(cli.config.as_deref())?;

    let mut project = init::initialize(&cli.path)?;
    tracing::info!(archive_id = %project.archive_id, "project initialized");

    let oracle = detect::RandomOracle::default();
    detect::process_documents(&mut project, &oracle)?;
    detect::compute_references(&mut project)?;

    allocate::allocate_film(&mut project)?;

    let db_path = cli.database.clone().unwrap_or_else(|| config.database_path(&project.project_path));
    let mut db = store::Store::open(&db_path)?;
    store::filmnumber::allocate_film_numbers(&mut project, &db)?;
    db.save_project(&project)?;

    let export_dir = export::export_results(&project)?;

    print_summary(cli, &project, &db_path, &export_dir);

    Ok(())
}

fn print_summary(cli: &Cli, project: &microfilm::Project, db_path: &std::path::Path, export_dir: &std::path::Path) {
    let ui = microfilm::cli::ui::Ui::new(cli.plain);

    println!("{}", ui.heading(&project.archive_id));
    println!("{}", ui.field("documents", project.documents.len()));
    println!("{}", ui.field("pages", project.total_pages));
    println!("{}", ui.field("pages with references", project.total_pages_with_refs));
    println!(
        "{}",
        ui.field(
            "16mm rolls",
            project
                .film_allocation
                .as_ref()
                .map(|a| a.rolls_16mm.len())
                .unwrap_or(0)
        )
    );
    println!(
        "{}",
        ui.field(
            "35mm rolls",
            project
                .film_allocation
                .as_ref()
                .map(|a| a.rolls_35mm.len())
                .unwrap_or(0)
        )
    );
    println!("{}", ui.field("database", db_path.display()));
    println!("{}", ui.field("export", export_dir.display()));
}

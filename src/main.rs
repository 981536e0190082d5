use clap::{Parser, Subcommand};
use iban_registry::batch::{check_csv, write_check_csv, CheckReport};
use iban_registry::{country, generator, logging, CountryFormat, Iban, Validation};
use rand::Rng;
use std::fs::create_dir_all;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "iban-registry")]
#[command(about = "IBAN validation and formatting", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    Validate(ValidateArgs),
    Build(BuildArgs),
    Countries(CountriesArgs),
    Generate(GenerateArgs),
    Check(CheckArgs),
}

#[derive(Parser)]
struct ValidateArgs {
    #[arg(required = true)]
    ibans: Vec<String>,
    #[arg(long, default_value_t = false)]
    relaxed: bool,
}

#[derive(Parser)]
struct BuildArgs {
    #[arg(long)]
    country: String,
    #[arg(long)]
    bban: String,
}

#[derive(Parser)]
struct CountriesArgs {
    #[arg(long)]
    country: Option<String>,
}

#[derive(Parser)]
struct GenerateArgs {
    #[arg(long)]
    country: String,
    #[arg(long, default_value_t = 10)]
    count: usize,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Parser)]
struct CheckArgs {
    #[arg(long)]
    input: PathBuf,
    #[arg(long)]
    output: Option<PathBuf>,
    #[arg(long, default_value_t = false)]
    relaxed: bool,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    logging::init_logging("iban-registry")?;
    let cli = Cli::parse();
    match cli.command {
        Command::Validate(args) => run_validate(args),
        Command::Build(args) => run_build(args),
        Command::Countries(args) => run_countries(args),
        Command::Generate(args) => run_generate(args),
        Command::Check(args) => run_check(args),
    }
}

fn validation_mode(relaxed: bool) -> Validation {
    if relaxed {
        Validation::Relaxed
    } else {
        Validation::Strict
    }
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let validation = validation_mode(args.relaxed);
    let mut failures = 0usize;
    for raw in &args.ibans {
        match Iban::parse_with(raw, validation) {
            Ok(iban) => emit_iban_line(&iban),
            Err(err) => {
                failures += 1;
                log::warn!("{:?}: {}", raw, err);
            }
        }
    }

    if failures > 0 {
        return Err(format!(
            "{} of {} IBAN(s) failed validation",
            failures,
            args.ibans.len()
        ));
    }
    Ok(())
}

fn run_build(args: BuildArgs) -> Result<(), String> {
    let iban = Iban::from_country_code(&args.country, &args.bban).map_err(|err| err.to_string())?;
    emit_iban_line(&iban);
    Ok(())
}

fn run_countries(args: CountriesArgs) -> Result<(), String> {
    match args.country {
        Some(code) => {
            let entry = country::lookup(&code).map_err(|err| err.to_string())?;
            emit_country_line(entry);
        }
        None => {
            for entry in country::all() {
                emit_country_line(entry);
            }
            emit_info_line(&format!("{} countries registered", country::all().len()));
        }
    }
    Ok(())
}

fn run_generate(args: GenerateArgs) -> Result<(), String> {
    let entry = country::lookup(&args.country).map_err(|err| err.to_string())?;
    let seed = args.seed.unwrap_or_else(random_seed);

    log::info!(
        "Generating {} IBAN(s) for {} (seed {})",
        args.count,
        entry.code(),
        seed
    );
    let start = Instant::now();
    let ibans = generator::generate(entry, args.count, seed).map_err(|err| err.to_string())?;
    let elapsed = start.elapsed();

    match args.output {
        Some(path) => {
            write_ibans(&path, &ibans)?;
            emit_info_line(&format!(
                "Wrote {} IBAN(s) to {}",
                ibans.len(),
                path.display()
            ));
        }
        None => {
            for iban in &ibans {
                println!("{}", iban);
            }
        }
    }
    emit_info_line(&format!("Generation time: {} ms", elapsed.as_millis()));
    Ok(())
}

fn run_check(args: CheckArgs) -> Result<(), String> {
    let start = Instant::now();
    let report = check_csv(&args.input, validation_mode(args.relaxed))?;
    let elapsed = start.elapsed();

    emit_info_line(&format!(
        "Check: input={} records={} valid={} invalid={} duplicates={}",
        args.input.display(),
        report.total_records,
        report.valid_records,
        report.invalid_count(),
        report.duplicate_ibans
    ));
    emit_issue_summary(&report);

    if let Some(output) = args.output {
        write_check_csv(&output, &report.rows)?;
        emit_info_line(&format!("Check results written to {}", output.display()));
    }
    emit_info_line(&format!("Check time: {} ms", elapsed.as_millis()));

    if report.invalid_count() > 0 {
        return Err(format!(
            "check failed with {} invalid IBAN(s)",
            report.invalid_count()
        ));
    }
    Ok(())
}

fn emit_issue_summary(report: &CheckReport) {
    let counts = report.kind_counts();
    if counts.is_empty() {
        return;
    }
    for (kind, count) in &counts {
        emit_info_line(&format!("Check issues: {} = {}", kind, count));
    }

    let max_items = 5usize;
    for issue in report.issues.iter().take(max_items) {
        emit_info_line(&format!("Row {}: {}", issue.row, issue.message));
    }
    if report.issues.len() > max_items {
        emit_info_line(&format!(
            "{} additional invalid rows not shown",
            report.issues.len() - max_items
        ));
    }
}

fn write_ibans(output: &Path, ibans: &[Iban]) -> Result<(), String> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent).map_err(|err| err.to_string())?;
        }
    }
    let mut writer = csv::Writer::from_path(output).map_err(|err| err.to_string())?;
    writer
        .write_record(["iban", "formatted"])
        .map_err(|err| err.to_string())?;
    for iban in ibans {
        writer
            .write_record([iban.canonical(), iban.formatted().as_str()])
            .map_err(|err| err.to_string())?;
    }
    writer.flush().map_err(|err| err.to_string())
}

fn random_seed() -> u64 {
    let mut rng = rand::rngs::OsRng;
    rng.gen()
}

fn emit_iban_line(iban: &Iban) {
    emit_info_line(&format!(
        "{} | {} | {}",
        iban.canonical(),
        iban.formatted(),
        iban.country().name()
    ));
}

fn emit_country_line(entry: &CountryFormat) {
    emit_info_line(&format!(
        "{} | {:<24} | bban={:>2} iban={:>2} | {} | branch={} prefix={}",
        entry.code(),
        entry.name(),
        entry.bban_length(),
        entry.iban_length(),
        entry.bban_pattern(),
        entry.has_branch_identifier(),
        entry.has_bban_prefix()
    ));
}

fn emit_info_line(message: &str) {
    if log::log_enabled!(log::Level::Info) {
        log::info!("{}", message);
    } else {
        println!("{message}");
    }
}

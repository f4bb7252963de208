//! Student expense estimation CLI
//!
//! Cleans the expense survey, reports its distributions, and estimates
//! a student's monthly expense bracket from their answers.

use clap::{Parser, Subcommand};
use unispend::{Config, Gender, Living, Transport};

#[derive(Parser)]
#[command(name = "unispend")]
#[command(about = "Estimate university students' monthly expense bracket", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a default config and data directory
    Init,
    /// Survey data commands
    Data {
        #[command(subcommand)]
        action: DataCommands,
    },
    /// Aggregated views over the cleaned survey
    Report {
        #[command(subcommand)]
        action: ReportCommands,
    },
    /// Train the bracket classifier and show evaluation metrics
    Train {
        /// Write the feature-importance ranking to a CSV file
        #[arg(long)]
        importance_csv: Option<String>,
    },
    /// Estimate your monthly expense bracket from survey answers
    Estimate {
        #[arg(long, default_value = "Male")]
        gender: Gender,
        /// How old are you?
        #[arg(long, default_value = "20")]
        age: u8,
        /// Year of study (1-4)
        #[arg(long, default_value = "1")]
        study_year: u8,
        /// Where do you live? (Home or Hostel)
        #[arg(long, default_value = "Home")]
        living: Living,
        /// Are you on a scholarship?
        #[arg(long)]
        scholarship: bool,
        /// Do you work part time?
        #[arg(long)]
        part_time_job: bool,
        /// Preferred mode of transport (Car, Motorcycle, or No)
        #[arg(long, default_value = "No")]
        transport: Transport,
        /// Do you smoke often?
        #[arg(long)]
        smoking: bool,
        /// Do you drink often?
        #[arg(long)]
        drinks: bool,
        /// Do you indulge in games and hobbies often?
        #[arg(long)]
        games_hobbies: bool,
        /// Do you buy cosmetics and self-care products?
        #[arg(long)]
        cosmetics: bool,
        /// Do you have monthly subscriptions?
        #[arg(long)]
        subscription: bool,
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
}

#[derive(Subcommand)]
enum DataCommands {
    /// Show per-column missing values and cleaning strategies
    Status,
    /// Impute missing values and write the cleaned export
    Clean,
}

#[derive(Subcommand)]
enum ReportCommands {
    /// Record counts per category value
    Population,
    /// Average monthly expense per group
    Expenses,
}

#[derive(Clone, Debug)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use table, json, or csv.", s)),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load or create config
    let config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    // Run command
    let result = match cli.command {
        Commands::Init => commands::init(&cli.config),
        Commands::Data { action } => match action {
            DataCommands::Status => commands::data_status(&config),
            DataCommands::Clean => commands::data_clean(&config),
        },
        Commands::Report { action } => match action {
            ReportCommands::Population => commands::report_population(&config),
            ReportCommands::Expenses => commands::report_expenses(&config),
        },
        Commands::Train { importance_csv } => commands::train(&config, importance_csv.as_deref()),
        Commands::Estimate {
            gender,
            age,
            study_year,
            living,
            scholarship,
            part_time_job,
            transport,
            smoking,
            drinks,
            games_hobbies,
            cosmetics,
            subscription,
            format,
        } => {
            let profile = unispend::Profile {
                gender,
                age,
                study_year,
                living,
                scholarship,
                part_time_job,
                transport,
                smoking,
                drinks,
                games_hobbies,
                cosmetics,
                subscription,
            };
            commands::estimate(&config, profile, format)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::OutputFormat;
    use unispend::data::cleaning::format_number;
    use unispend::data::{clean, load_clean, load_raw, summarize, write_clean};
    use unispend::predict::{estimate_json, format_estimate, Predictor};
    use unispend::report::{expense_report, population_report};
    use unispend::training::importance::{render_bars, write_csv};
    use unispend::training::Trainer;
    use unispend::{Config, Profile, Record, Result};

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        std::fs::create_dir_all("data")?;
        println!("Created data/ directory");

        println!("\nNext steps:");
        println!("  1. Place the survey export at {}", config.data.raw_path);
        println!("  2. Run 'unispend data clean' to impute missing values");
        println!("  3. Run 'unispend train' to check model quality");
        println!("  4. Run 'unispend estimate --age 21 --smoking ...' for an estimate");

        Ok(())
    }

    pub fn data_status(config: &Config) -> Result<()> {
        let raw = load_raw(&config.data.raw_path)?;
        let summary = summarize(&raw);

        println!("Survey data: {}", config.data.raw_path);
        println!("Total records: {}", summary.total);
        println!();
        for column in &summary.columns {
            println!("{}", column.name);
            println!("  Missing values: {}", column.missing);
            println!("  Unique values:  {}", column.unique.join(" "));
            if let Some(mode) = &column.most_frequent {
                println!("  Most frequent:  {}", mode);
                println!("  Strategy:       replace missing values with '{}'", mode);
            }
            println!();
        }

        let e = &summary.expense;
        println!("Monthly_expenses_$");
        println!("  Missing values: {}", e.missing);
        println!("  Mean:           {}", format_number(e.mean));
        println!("  Median:         {}", format_number(e.median));
        if e.positively_skewed() {
            println!("  Observation:    mean is greater than median, distribution is positively skewed");
        }
        println!("  Strategy:       replace missing values with the median");

        Ok(())
    }

    pub fn data_clean(config: &Config) -> Result<()> {
        let raw = load_raw(&config.data.raw_path)?;
        let records = clean(&raw)?;
        write_clean(&config.data.clean_path, &records)?;
        println!(
            "Cleaned {} records -> {}",
            records.len(),
            config.data.clean_path
        );
        Ok(())
    }

    /// Load the cleaned export, cleaning the raw one on the fly when
    /// it does not exist yet
    fn load_dataset(config: &Config) -> Result<Vec<Record>> {
        if std::path::Path::new(&config.data.clean_path).exists() {
            load_clean(&config.data.clean_path)
        } else {
            log::info!(
                "{} not found, cleaning {} in memory",
                config.data.clean_path,
                config.data.raw_path
            );
            let raw = load_raw(&config.data.raw_path)?;
            clean(&raw)
        }
    }

    pub fn report_population(config: &Config) -> Result<()> {
        let records = load_dataset(config)?;
        println!("Population per category ({} records)\n", records.len());
        for (name, counts) in population_report(&records) {
            println!("{}", name);
            for entry in counts {
                println!("  {:<12} {}", entry.value, entry.count);
            }
            println!();
        }
        Ok(())
    }

    pub fn report_expenses(config: &Config) -> Result<()> {
        let records = load_dataset(config)?;
        println!("Average monthly expense per group\n");
        for (name, averages) in expense_report(&records) {
            println!("{}", name);
            for entry in averages {
                println!(
                    "  {:<12} {:>7.1} $  ({} students)",
                    entry.value, entry.mean_expense, entry.count
                );
            }
            println!();
        }
        Ok(())
    }

    pub fn train(config: &Config, importance_csv: Option<&str>) -> Result<()> {
        let records = load_dataset(config)?;
        let trainer = Trainer::new(config)?;
        let (_tree, report) = trainer.train(&records)?;

        println!("Training complete");
        println!(
            "  Records:  {} train, {} holdout, {} dropped (out-of-range expenses)",
            report.n_train, report.n_holdout, report.n_dropped
        );
        println!("  Metrics:  {}", report.metrics);
        println!("\nRecords per bracket:");
        for (bracket, count) in &report.label_counts {
            println!(
                "  {:>3} - {:<3} $  {}",
                bracket.lower as i64, bracket.upper as i64, count
            );
        }

        println!("\nFeature importance (accuracy drop when shuffled):");
        print!("{}", render_bars(&report.importance));

        if let Some(path) = importance_csv {
            write_csv(path, &report.importance)?;
            println!("\nImportance ranking written to {}", path);
        }

        Ok(())
    }

    pub fn estimate(config: &Config, profile: Profile, format: OutputFormat) -> Result<()> {
        let records = load_dataset(config)?;
        let (predictor, report) = Predictor::from_dataset(&records, config)?;
        let bracket = predictor.predict(&profile)?;

        match format {
            OutputFormat::Table => {
                print!("{}", format_estimate(&profile, &bracket));
                println!("Holdout metrics for this session: {}", report.metrics);
            }
            OutputFormat::Json => {
                println!("{}", estimate_json(&profile, &bracket)?);
            }
            OutputFormat::Csv => {
                println!("bracket_lower,bracket_upper,estimate");
                println!("{},{},{}", bracket.lower, bracket.upper, bracket);
            }
        }

        Ok(())
    }
}

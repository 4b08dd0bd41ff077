//! qail-sql: compile IR to SQL and inspect live databases.
//!
//! # Usage
//!
//! ```bash
//! # Compile a JSON statement for PostgreSQL
//! qail-sql compile query.json --dialect postgres
//!
//! # Read the statement from stdin, print JSON
//! cat query.json | qail-sql compile - --dialect mysql --format json
//!
//! # Introspection
//! qail-sql --database-url sqlite://app.db tables
//! ```

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use tracing_subscriber::EnvFilter;

use qail_sql::config::{Config, DATABASE_URL_ENV};
use qail_sql::engine::Database;
use qail_sql::prelude::*;

#[derive(Parser)]
#[command(name = "qail-sql")]
#[command(version)]
#[command(
    about = "Compile query and schema IR to MySQL, PostgreSQL, SQLite and SQL Server",
    long_about = None
)]
#[command(after_help = "EXAMPLES:
    qail-sql compile select.json --dialect sqlserver
    qail-sql --database-url postgres://localhost/app columns users
    qail-sql dialects")]
struct Cli {
    /// Database connection URL
    #[arg(long, global = true, env = DATABASE_URL_ENV)]
    database_url: Option<String>,

    /// Configuration file (default: ./qail-sql.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a JSON statement to SQL
    Compile {
        /// JSON file, or - for stdin
        input: String,

        /// Target dialect
        #[arg(short, long, default_value = "postgres")]
        dialect: Dialect,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// List tables of the connected database
    Tables,
    /// List columns of a table
    Columns {
        table: String,
    },
    /// Show the connected database name
    Database,
    /// Show supported dialects
    Dialects,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    if cli.database_url.is_some() {
        config.database.url = cli.database_url.clone();
    }
    init_tracing(&config, cli.verbose);

    match &cli.command {
        Commands::Compile {
            input,
            dialect,
            format,
        } => compile(input, *dialect, *format),
        Commands::Dialects => {
            show_dialects();
            Ok(())
        }
        Commands::Tables => {
            let db = connect(&config, cli.verbose).await?;
            let tables = db.schema().tables().await?;
            if tables.is_empty() {
                println!("{}", "(no tables)".dimmed());
            }
            for table in tables {
                println!("{}", table.white());
            }
            Ok(())
        }
        Commands::Columns { table } => {
            let db = connect(&config, cli.verbose).await?;
            let columns = db.schema().columns(table).await?;
            if columns.is_empty() {
                println!("{} {}", "No such table or no columns:".yellow(), table);
                return Ok(());
            }
            let width = columns.iter().map(|c| c.name.len()).max().unwrap_or(0);
            for column in columns {
                println!(
                    "{:width$}  {}",
                    column.name.white().bold(),
                    column.data_type.cyan(),
                    width = width
                );
            }
            Ok(())
        }
        Commands::Database => {
            let db = connect(&config, cli.verbose).await?;
            match db.schema().current_database().await? {
                Some(name) => println!("{}", name.white()),
                None => println!("{}", "(none)".dimmed()),
            }
            Ok(())
        }
    }
}

fn init_tracing(config: &Config, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("qail_sql=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.filter))
    };
    // A second init (tests, embedding) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn connect(config: &Config, verbose: bool) -> Result<Database> {
    if config.database.url.is_none() {
        anyhow::bail!(
            "no database URL; use --database-url, set {} or add [database] url to the config",
            DATABASE_URL_ENV
        );
    }
    if verbose {
        if let Some(url) = &config.database.url {
            println!("{} {}", "Connecting to:".dimmed(), url);
        }
    }
    Ok(Database::from_config(&config.database).await?)
}

fn compile(input: &str, dialect: Dialect, format: OutputFormat) -> Result<()> {
    let text = if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(input).with_context(|| format!("failed to read {}", input))?
    };

    let statement: Statement = serde_json::from_str(&text).context("invalid statement JSON")?;
    let compiled = statement.compile(dialect)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&compiled)?);
        }
        OutputFormat::Text => {
            println!("{} {}", "Dialect:".dimmed(), dialect.to_string().cyan());
            for query in &compiled {
                println!();
                println!("{}", query.sql.white());
                if !query.params.is_empty() {
                    println!("{}", "Bindings:".cyan());
                    for (i, value) in query.params.iter().enumerate() {
                        println!("  {} = {}", i + 1, value.to_string().yellow());
                    }
                }
            }
        }
    }
    Ok(())
}

fn show_dialects() {
    println!(
        "{:12} {:10} {:12} {}",
        "Dialect".white().bold(),
        "Quoting".white().bold(),
        "Placeholder".white().bold(),
        "Execution".white().bold()
    );
    println!("{}", "─".repeat(50).dimmed());

    for dialect in Dialect::ALL {
        let generator = dialect.generator();
        let executes = if dialect == Dialect::SqlServer {
            "compile only".dimmed()
        } else {
            "yes".green()
        };
        println!(
            "{:12} {:10} {:12} {}",
            dialect.to_string().cyan().bold(),
            generator.quote_identifier("select"),
            generator.placeholder(1),
            executes
        );
    }
}


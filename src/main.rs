use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use item_matrix::config::{config_dir, load_config, API_KEY_ENV, CONFIG_TEMPLATE};
use item_matrix::error::{MatrixError, Result};
use item_matrix::{render, Filter, FrappeClient, MatrixBuilder, OutputFormat};

#[derive(Parser)]
#[command(name = "item-matrix")]
#[command(
    version,
    about = "Customer item matrix for uncollected sales invoices",
    long_about = None
)]
struct Cli {
    /// Path to config directory (default: ~/.item-matrix or XDG config)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with a template config.toml
    Init,

    /// Show the configured site and report settings
    Status,

    /// Build the customer x item quantity matrix
    Report {
        /// Sales person assigned to the invoices
        #[arg(short, long)]
        salesperson: Option<String>,

        /// Posting date from, inclusive (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Posting date to, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Output format (table, json, csv)
        #[arg(short, long, default_value = "table")]
        format: String,

        /// Site URL, overriding config.toml
        #[arg(long)]
        site: Option<String>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Status => cmd_status(&cfg_dir),
        Commands::Report {
            salesperson,
            from,
            to,
            format,
            site,
        } => cmd_report(&cfg_dir, salesperson, from, to, &format, site),
    }
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    use std::fs;

    if cfg_dir.exists() {
        return Err(MatrixError::AlreadyInitialized(cfg_dir.to_path_buf()));
    }

    fs::create_dir_all(cfg_dir)?;
    fs::write(cfg_dir.join("config.toml"), CONFIG_TEMPLATE)?;

    println!("Initialized item-matrix config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Point it at your site:  $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!("  2. Export credentials:     {API_KEY_ENV}=... ITEM_MATRIX_API_SECRET=...");
    println!();
    println!("Then run a report:");
    println!("  item-matrix report --salesperson <name> --from <YYYY-MM-DD> --to <YYYY-MM-DD>");

    Ok(())
}

/// Show site and report settings
fn cmd_status(cfg_dir: &Path) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(MatrixError::ConfigNotFound(cfg_dir.to_path_buf()));
    }

    let config = load_config(cfg_dir)?;
    let site = if config.site.url.is_empty() {
        "(not set)"
    } else {
        config.site.url.as_str()
    };
    let credentials = if config.site.auth_token().is_some() {
        "configured"
    } else {
        "none (guest access)"
    };

    println!("Item Matrix Status");
    println!("{}", "-".repeat(50));
    println!("Config directory: {}", cfg_dir.display());
    println!("Site:             {site}");
    println!("Credentials:      {credentials}");
    println!("Invoices:         {}", config.report.invoice_doctype);
    println!("Lines:            {}", config.report.line_doctype);
    println!(
        "Collect status:   {} = {}",
        config.report.collect_status_field, config.report.collect_status
    );
    println!("Page length:      {}", config.report.page_length);

    Ok(())
}

fn parse_date(flag: &str, value: Option<String>) -> Result<Option<NaiveDate>> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(|s| {
            NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|_| MatrixError::InvalidDate {
                flag: flag.to_string(),
                value: s,
            })
        })
        .transpose()
}

/// Fetch and print the matrix
fn cmd_report(
    cfg_dir: &Path,
    salesperson: Option<String>,
    from: Option<String>,
    to: Option<String>,
    format: &str,
    site: Option<String>,
) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(MatrixError::ConfigNotFound(cfg_dir.to_path_buf()));
    }

    let mut config = load_config(cfg_dir)?;
    if let Some(url) = site {
        config.site.url = url;
    }

    let format: OutputFormat = format.parse()?;
    let filter = Filter {
        salesperson,
        from_date: parse_date("from", from)?,
        to_date: parse_date("to", to)?,
    };

    if let (Some(from), Some(to)) = (filter.from_date, filter.to_date) {
        if from > to {
            return Err(MatrixError::InvalidRange { from, to });
        }
    }

    if config.report.require_filters {
        let missing = filter.missing_required();
        if !missing.is_empty() {
            return Err(MatrixError::MissingFilters(missing));
        }
    }

    let client = FrappeClient::new(&config.site)?;
    log::info!("running customer item matrix against {}", client.base_url());

    let rows = MatrixBuilder::new(&client, &config.report).build(&filter);

    if rows.is_empty() && format == OutputFormat::Table {
        println!("No data for the given filters.");
        return Ok(());
    }

    println!("{}", render(&rows, format)?);

    Ok(())
}

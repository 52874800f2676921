// invoice-pdf: Issue, track and print tax invoices with EMI schedules

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use invoice_pdf::config::Config;
use invoice_pdf::layout::format_money;
use invoice_pdf::{
    artifact_name, check_id, display_number, load_logo, AppError, Invoice, InvoiceDraft,
    InvoiceRenderer, InvoiceStore, LogoSource,
};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(author, version, about = "Issue, track and print tax invoices")]
struct Cli {
    /// Invoice store file (overrides INVOICE_STORE)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an invoice from a JSON file
    Create {
        /// Invoice JSON (clientName, accountNumber, items, paidAmount, emiDetails, ...)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// List stored invoices
    List,

    /// Print a stored invoice as JSON
    Show { id: String },

    /// Update a stored invoice with the fields present in a JSON file
    Update {
        id: String,

        #[arg(short, long)]
        input: PathBuf,
    },

    /// Delete a stored invoice
    Delete { id: String },

    /// Render a stored invoice to PDF
    Pdf {
        id: String,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Render an invoice JSON file to PDF without storing it
    Render {
        #[arg(short, long)]
        input: PathBuf,

        /// Identifier the invoice number is derived from
        #[arg(long)]
        id: String,

        #[command(flatten)]
        render: RenderArgs,
    },
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Output filename (defaults to invoice-{id}.pdf)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Date printed on the invoice (YYYY-MM-DD format, defaults to today)
    #[arg(short, long)]
    date: Option<String>,

    /// Logo image (file path or URL) replacing the configured asset
    #[arg(long, conflicts_with = "no_logo")]
    logo: Option<String>,

    /// Always draw the monogram badge
    #[arg(long)]
    no_logo: bool,
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    init_tracing();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = Config::from_env();
    let store = InvoiceStore::open(cli.store.unwrap_or_else(|| config.store_path.clone()));

    match cli.command {
        Command::Create { input } => {
            let invoice = read_draft(&input)?.validate()?;
            let record = store.create(invoice)?;

            println!("✓ Created invoice {}", record.id);
            println!("  Client: {}", record.invoice.client_name);
            println!("  Total: Rs {}", format_money(record.invoice.total_amount));
        }
        Command::List => {
            let records = store.list()?;
            if records.is_empty() {
                println!("No invoices in {}", store.path().display());
            }
            for record in records {
                println!(
                    "{}  {:<30}  total Rs {:>12}  balance Rs {:>12}",
                    record.id,
                    record.invoice.client_name,
                    format_money(record.invoice.total_amount),
                    format_money(record.invoice.remaining_amount),
                );
            }
        }
        Command::Show { id } => {
            let record = store.get(&id)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Command::Update { id, input } => {
            let record = store.update(&id, read_draft(&input)?)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Command::Delete { id } => {
            let removed = store.delete(&id)?;
            println!("✓ Deleted invoice {} ({})", removed.id, removed.invoice.client_name);
        }
        Command::Pdf { id, render } => {
            let record = store.get(&id)?;
            write_pdf(&config, &record.invoice, &record.id, &render)?;
        }
        Command::Render { input, id, render } => {
            check_id(&id)?;
            let invoice = read_draft(&input)?.validate()?;
            write_pdf(&config, &invoice, &id, &render)?;
        }
    }

    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

fn read_draft(path: &Path) -> Result<InvoiceDraft, AppError> {
    let content = fs::read_to_string(path).map_err(|e| {
        AppError::IoError(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })?;
    InvoiceDraft::from_json(&content)
}

fn parse_date(date_str: &Option<String>) -> Result<NaiveDate, AppError> {
    match date_str {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| AppError::DateError(s.clone())),
        None => Ok(Local::now().date_naive()),
    }
}

fn write_pdf(config: &Config, invoice: &Invoice, id: &str, args: &RenderArgs) -> Result<(), AppError> {
    let date = parse_date(&args.date)?;

    let source = match (&args.logo, args.no_logo) {
        (_, true) => LogoSource::None,
        (Some(location), false) => LogoSource::Explicit(location.clone()),
        (None, false) => LogoSource::Default(config.logo_path.clone()),
    };
    let logo = load_logo(&source)?;

    let renderer = InvoiceRenderer::new(config.issuer.clone(), logo);
    let bytes = renderer.render_at(invoice, id, date)?;

    let output_file = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(artifact_name(id)));
    fs::write(&output_file, &bytes)?;

    println!("✓ Generated: {}", output_file.display());
    println!("  Invoice No.: {}", display_number(id));
    println!("  Client: {}", invoice.client_name);
    println!("  Size: {} bytes", bytes.len());

    Ok(())
}

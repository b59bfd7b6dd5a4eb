use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use plan_catalog::{
    logging, AppConfig, ConfiguredFlags, PlanCatalog, PlanCatalogService, RequestContext,
    SqliteTaxRateStore, TaxRateStore, BILLING_PLANS_UPGRADE, BILLING_STARTER_PLAN,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "plan-catalog", version, about = "Operator tools for the plan catalog service")]
struct Cli {
    /// Config file (defaults to $PLAN_CATALOG_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the database path from config
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the tax rate schema
    InitDb,
    /// Import tax rates from a CSV file (id,country,state,postal_code,rate)
    ImportTaxRates { csv: PathBuf },
    /// Mark a tax rate inactive
    ArchiveTaxRate { id: String },
    /// Print active tax rates as JSON
    ListTaxRates,
    /// Print the plans visible under the given flags as JSON
    ListPlans {
        #[arg(long)]
        upgrade: bool,
        #[arg(long)]
        starter: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("Configuration is malformed")?;
    if let Some(db) = cli.db {
        config.database.path = db;
    }
    logging::init(&config.logging);

    match cli.command {
        Command::InitDb => {
            let store = open_store(&config)?;
            let count = store.count().await?;
            println!("✓ Database ready at {} ({} tax rates)", config.database.path.display(), count);
        }

        Command::ImportTaxRates { csv } => {
            println!("📂 Loading {}...", csv.display());
            let rates = plan_catalog::load_csv(&csv)
                .with_context(|| format!("Failed to load {}", csv.display()))?;
            println!("✓ Loaded {} tax rates from CSV", rates.len());

            let store = open_store(&config)?;
            let (inserted, duplicates) = store.import(rates).await?;
            println!("💾 Inserted {} tax rates ({} already present)", inserted, duplicates);
        }

        Command::ArchiveTaxRate { id } => {
            let store = open_store(&config)?;
            store.archive(&id).await?;
            println!("✓ Archived tax rate {}", id);
        }

        Command::ListTaxRates => {
            let service = PlanCatalogService::new(
                PlanCatalog::standard(),
                Arc::new(config.flags.clone()),
                Arc::new(open_store(&config)?),
            );
            let rates = service.list_tax_rates().await?;
            println!("{}", serde_json::to_string_pretty(&rates)?);
        }

        Command::ListPlans { upgrade, starter } => {
            // Flags come from the command line here, not from config
            let flags = ConfiguredFlags::new()
                .with_default(BILLING_PLANS_UPGRADE, upgrade)
                .with_default(BILLING_STARTER_PLAN, starter);
            let service = PlanCatalogService::new(
                PlanCatalog::standard(),
                Arc::new(flags),
                Arc::new(SqliteTaxRateStore::open_in_memory()?),
            );
            let plans = service.list_plans(&RequestContext::anonymous());
            println!("{}", serde_json::to_string_pretty(&plans)?);
        }
    }

    Ok(())
}

fn open_store(config: &AppConfig) -> Result<SqliteTaxRateStore> {
    SqliteTaxRateStore::open(&config.database.path)
        .with_context(|| format!("Failed to open database at {}", config.database.path.display()))
}

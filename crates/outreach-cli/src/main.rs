use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use outreach_core::{
    CrmClient, DetailContent, EditField, EmailApi, EmailView, EngineConfig, EngineRuntime,
    SharedApi,
};

#[derive(Parser)]
#[command(name = "outreach-cli")]
#[command(about = "CLI interface for the outreach email engine")]
struct Cli {
    /// Base URL of the CRM email API
    #[arg(long, default_value = "http://localhost:3001")]
    base_url: String,

    /// Owner id of the mailbox
    #[arg(long)]
    owner: String,

    /// Pretty-print JSON output
    #[arg(long, short)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show per-view badge counts
    Counts,

    /// List emails in a view
    List {
        /// draft | sent | answered | scheduled
        view: EmailView,
    },

    /// Show one email's full content
    Show {
        /// Record id
        id: String,
    },

    /// Update an email's subject through the autosave engine and flush
    EditSubject {
        /// Record id
        id: String,
        /// New subject line
        subject: String,
    },
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{rendered}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    outreach_core::tracing_setup::init_tracing();
    let cli = Cli::parse();

    let api: SharedApi = Arc::new(CrmClient::new(cli.base_url.clone()));
    let config = EngineConfig::new(cli.base_url.clone());

    match cli.command {
        Commands::Counts => {
            let engine = EngineRuntime::new(api, cli.owner, config);
            let counts = engine.refresh_counts().await;
            print_json(&counts, cli.pretty)?;
        }
        Commands::List { view } => {
            let records = api
                .list_emails(view, &cli.owner)
                .await
                .with_context(|| format!("failed to list {view} emails"))?;
            print_json(&records, cli.pretty)?;
        }
        Commands::Show { id } => {
            let record = api
                .fetch_email(&id)
                .await
                .with_context(|| format!("failed to fetch email {id}"))?;
            print_json(&record, cli.pretty)?;
        }
        Commands::EditSubject { id, subject } => {
            let engine = EngineRuntime::new(api, cli.owner, config);
            engine.start().await.context("failed to load draft view")?;
            engine.select_email(&id).await;
            match engine.detail_content() {
                DetailContent::Ready { .. } => {}
                other => return Err(anyhow!("email {id} is not editable: {other:?}")),
            }
            engine.field_changed(EditField::Subject, subject);
            engine.flush().await.context("failed to persist edit")?;
            match engine.detail_content() {
                DetailContent::Ready { record, .. } => print_json(&record, cli.pretty)?,
                other => return Err(anyhow!("unexpected detail state after save: {other:?}")),
            }
        }
    }

    Ok(())
}

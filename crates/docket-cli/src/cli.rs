use crate::exit_codes;
use clap::{Parser, Subcommand};
use docket_core::providers::llm::OpenAiClient;
use docket_core::{
    config, Court, Ledger, LedgerFilter, RawSubmission, TriageConfig, TriageEngine, Urgency,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "docket", about = "Case triage and routing engine", version)]
pub struct Cli {
    /// Path to the ledger database.
    #[arg(long, global = true, default_value = "docket.db")]
    pub db: PathBuf,

    /// Optional YAML config; defaults apply when omitted.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Triage a single case and print the routing decision.
    Submit {
        /// Free-text case narrative; read from stdin when omitted.
        #[arg(long)]
        narrative: Option<String>,
        #[arg(long, default_value = "")]
        subject: String,
        #[arg(long)]
        plaintiff: Option<String>,
        #[arg(long)]
        defendant: Option<String>,
        /// Classification service API key.
        #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
        api_key: String,
    },
    /// Print ledger entries as JSON lines, optionally filtered.
    History {
        #[arg(long)]
        court: Option<String>,
        #[arg(long)]
        urgency: Option<String>,
    },
    /// Print aggregate statistics over the ledger.
    Dashboard,
}

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    let cfg = match &cli.config {
        Some(path) => config::load_config(path),
        None => Ok(TriageConfig::default()),
    };
    let cfg = match cfg {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };

    let ledger = Ledger::open(&cli.db)?;

    match cli.command {
        Commands::Submit {
            narrative,
            subject,
            plaintiff,
            defendant,
            api_key,
        } => {
            let narrative = match narrative {
                Some(n) => n,
                None => {
                    use std::io::Read;
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let client = Arc::new(OpenAiClient::new(cfg.model.clone(), api_key));
            let engine = TriageEngine::new(&cfg, client, ledger);
            let raw = RawSubmission {
                narrative,
                subject,
                plaintiff_name: plaintiff,
                defendant_name: defendant,
            };
            match engine.submit(raw).await {
                Ok(decision) => {
                    println!("{}", serde_json::to_string_pretty(&decision)?);
                    Ok(exit_codes::OK)
                }
                Err(e) => {
                    eprintln!("error: {e}");
                    Ok(exit_codes::for_error(&e))
                }
            }
        }
        Commands::History { court, urgency } => {
            let filter = LedgerFilter {
                court: match court.as_deref() {
                    Some(s) => match Court::parse(s) {
                        Some(c) => Some(c),
                        None => {
                            eprintln!("error: unknown court '{s}'");
                            return Ok(exit_codes::VALIDATION_ERROR);
                        }
                    },
                    None => None,
                },
                urgency: match urgency.as_deref() {
                    Some(s) => match Urgency::parse(s) {
                        Some(u) => Some(u),
                        None => {
                            eprintln!("error: unknown urgency '{s}'");
                            return Ok(exit_codes::VALIDATION_ERROR);
                        }
                    },
                    None => None,
                },
                ..Default::default()
            };
            for entry in ledger.list(&filter)? {
                println!("{}", serde_json::to_string(&entry)?);
            }
            Ok(exit_codes::OK)
        }
        Commands::Dashboard => {
            let snapshot = ledger.list(&LedgerFilter::default())?;
            let report = docket_core::report::summarize(&snapshot);
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(exit_codes::OK)
        }
    }
}

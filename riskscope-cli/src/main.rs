//! riskscope - Financial and Health Risk Assessment CLI
//!
//! Submit questionnaires to the prediction services, derive composite risk
//! scores, fetch AI narratives, and talk to the risk assistant.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use riskscope_core::chat::{build_context, ChatSession, SendOutcome};
use riskscope_core::dashboard;
use riskscope_core::types::{
    AnalysisNarrative, ChatRole, FinanceProfile, HealthProfile, ScoreBundle,
};
use riskscope_core::{Config, Database, ServiceClient};

#[derive(Parser, Debug)]
#[command(name = "riskscope")]
#[command(about = "Financial and health risk assessment dashboard")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit a finance questionnaire (JSON file) for prediction
    SubmitFinance {
        /// Path to the questionnaire JSON
        form: PathBuf,
    },

    /// Submit a health questionnaire (JSON file) for prediction
    SubmitHealth {
        /// Path to the questionnaire JSON
        form: PathBuf,
    },

    /// Derive risk scores from the stored submissions and show the dashboard
    Dashboard {
        /// Export format (md = markdown, json = JSON)
        #[arg(long)]
        export: Option<String>,

        /// Skip fetching AI analysis narratives
        #[arg(long)]
        no_analysis: bool,
    },

    /// Ask the risk assistant a question
    Ask {
        /// The question text
        question: String,
    },

    /// Print the stored conversation log
    History,

    /// Clear stored forms, predictions, and chat history
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration and database
    let config = Config::load().context("failed to load configuration")?;
    let _log_guard = riskscope_core::logging::init(&config.logging).ok();

    let db_path = Config::database_path();
    tracing::info!(path = %db_path.display(), "Opening document store");
    let db = Database::open(&db_path).context("failed to open database")?;
    db.migrate().context("failed to run database migrations")?;

    match args.command {
        Command::SubmitFinance { form } => submit_finance(&db, &config, &form).await,
        Command::SubmitHealth { form } => submit_health(&db, &config, &form).await,
        Command::Dashboard {
            export,
            no_analysis,
        } => show_dashboard(&db, &config, export.as_deref(), no_analysis).await,
        Command::Ask { question } => ask(&db, &config, &question).await,
        Command::History => print_history(&db),
        Command::Reset => {
            db.reset().context("failed to reset stored data")?;
            println!("Stored forms, predictions, and chat history cleared.");
            Ok(())
        }
    }
}

async fn submit_finance(db: &Database, config: &Config, form_path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(form_path)
        .with_context(|| format!("failed to read {}", form_path.display()))?;
    let profile: FinanceProfile =
        serde_json::from_str(&content).context("failed to parse finance questionnaire")?;

    let client = ServiceClient::new(config.services.clone())
        .context("failed to create service client")?;
    let prediction = client
        .predict_finance(&profile)
        .await
        .context("finance prediction failed")?;

    let mut data = db.load_dashboard().context("failed to load dashboard")?;
    data.finance_form = Some(profile.normalized());
    data.finance_result = Some(prediction.clone());
    db.save_dashboard(&data).context("failed to save dashboard")?;

    println!("Finance prediction stored.");
    println!("  FSI: {:.4}", prediction.fsi);
    if let Some(risk) = &prediction.risk {
        println!("  Risk: {risk}");
    }
    Ok(())
}

async fn submit_health(db: &Database, config: &Config, form_path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(form_path)
        .with_context(|| format!("failed to read {}", form_path.display()))?;
    let profile: HealthProfile =
        serde_json::from_str(&content).context("failed to parse health questionnaire")?;

    let client = ServiceClient::new(config.services.clone())
        .context("failed to create service client")?;
    let prediction = client
        .predict_health(&profile)
        .await
        .context("health prediction failed")?;

    let mut data = db.load_dashboard().context("failed to load dashboard")?;
    data.health_form = Some(profile);
    data.health_result = Some(prediction.clone());
    db.save_dashboard(&data).context("failed to save dashboard")?;

    println!("Health prediction stored.");
    if let Some(risk) = &prediction.risk {
        println!("  Risk: {risk}");
    }
    if let Some(score) = prediction.score {
        println!("  Score: {score}");
    }
    Ok(())
}

async fn show_dashboard(
    db: &Database,
    config: &Config,
    export: Option<&str>,
    no_analysis: bool,
) -> Result<()> {
    let data = db.load_dashboard().context("failed to load dashboard")?;

    if data.finance_result.is_none() && data.health_result.is_none() {
        println!("No submissions yet. Run `riskscope submit-finance` or `riskscope submit-health` first.");
    }

    let bundle = dashboard::assemble(&data).context("failed to derive scores")?;

    let narrative = if no_analysis {
        None
    } else {
        let client = ServiceClient::new(config.services.clone())
            .context("failed to create service client")?;
        Some(dashboard::fetch_narratives(&client, &bundle).await)
    };

    match export {
        Some("json") => print_json(&bundle, narrative.as_ref())?,
        Some("md") => print_markdown(&bundle, narrative.as_ref()),
        Some(other) => anyhow::bail!("Unknown export format: {}. Use 'md' or 'json'", other),
        None => print_terminal(&bundle, narrative.as_ref()),
    }

    Ok(())
}

async fn ask(db: &Database, config: &Config, question: &str) -> Result<()> {
    let data = db.load_dashboard().context("failed to load dashboard")?;
    let bundle = dashboard::assemble(&data).context("failed to derive scores")?;
    let context = build_context(&data, &bundle);

    if context.is_none() {
        println!(
            "The assistant needs both assessments. Submit the finance and health \
             questionnaires first."
        );
        return Ok(());
    }

    let history = db.load_chat_history().context("failed to load chat history")?;
    let mut session = ChatSession::restore(history, context, Some(&bundle));

    let client = ServiceClient::new(config.services.clone())
        .context("failed to create service client")?;
    let outcome = session.send(question, &client).await;

    db.save_chat_history(&session.persistable())
        .context("failed to save chat history")?;

    match outcome {
        SendOutcome::Refused => {
            println!("Nothing sent: the question was empty or a request is already pending.");
        }
        SendOutcome::Answered | SendOutcome::Failed => {
            if let Some(last) = session.messages().last() {
                println!("{}", last.content);
                if !last.sources.is_empty() {
                    println!();
                    println!("Sources:");
                    for source in &last.sources {
                        println!("  - {source}");
                    }
                }
            }
        }
    }

    Ok(())
}

fn print_history(db: &Database) -> Result<()> {
    let history = db.load_chat_history().context("failed to load chat history")?;

    if history.is_empty() {
        println!("No conversation yet. Ask something with `riskscope ask`.");
        return Ok(());
    }

    for message in &history {
        let who = match message.role {
            ChatRole::User => "you",
            ChatRole::Assistant => "advisor",
            ChatRole::Loading => continue,
        };
        println!(
            "[{}] {}: {}",
            message.timestamp.format("%Y-%m-%d %H:%M"),
            who,
            message.content
        );
    }
    Ok(())
}

// ============================================
// Rendering
// ============================================

fn print_terminal(bundle: &ScoreBundle, narrative: Option<&AnalysisNarrative>) {
    println!();
    println!("\u{256d}{}\u{256e}", "\u{2500}".repeat(60));
    println!("\u{2502}{:^60}\u{2502}", "RISK DASHBOARD");
    println!("\u{2570}{}\u{256f}", "\u{2500}".repeat(60));

    print_card(
        "Health Risk",
        bundle.health_score,
        bundle.health_classification.as_str(),
        narrative.map(|n| n.health.as_str()),
    );
    print_card(
        "Financial Risk",
        bundle.finance_score,
        bundle.finance_classification.as_str(),
        narrative.map(|n| n.finance.as_str()),
    );
    print_card(
        "Time Horizon",
        bundle.time_horizon_score,
        bundle.time_horizon_interpretation.as_str(),
        narrative.map(|n| n.time_horizon.as_str()),
    );
    print_card(
        "Overall Risk",
        bundle.overall_risk_score,
        bundle.overall_risk_interpretation.as_str(),
        narrative.map(|n| n.overall.as_str()),
    );
    println!();
}

fn print_card(title: &str, score: u8, label: &str, analysis: Option<&str>) {
    println!();
    println!("  {title}: {score}/100  [{label}]");
    println!("  {}", score_bar(score));
    if let Some(text) = analysis {
        println!("  {text}");
    }
}

fn score_bar(score: u8) -> String {
    let filled = usize::from(score) / 5;
    format!(
        "{}{}",
        "\u{2588}".repeat(filled),
        "\u{2591}".repeat(20 - filled)
    )
}

fn print_markdown(bundle: &ScoreBundle, narrative: Option<&AnalysisNarrative>) {
    println!("# Risk Dashboard");
    println!();
    println!("| Score | Value | Interpretation |");
    println!("|-------|-------|----------------|");
    println!(
        "| Health | {} | {} |",
        bundle.health_score,
        bundle.health_classification.as_str()
    );
    println!(
        "| Finance | {} | {} |",
        bundle.finance_score,
        bundle.finance_classification.as_str()
    );
    println!(
        "| Time Horizon | {} | {} |",
        bundle.time_horizon_score,
        bundle.time_horizon_interpretation.as_str()
    );
    println!(
        "| Overall | {} | {} |",
        bundle.overall_risk_score,
        bundle.overall_risk_interpretation.as_str()
    );

    if let Some(narrative) = narrative {
        println!();
        println!("## Analysis");
        println!();
        println!("- **Health**: {}", narrative.health);
        println!("- **Finance**: {}", narrative.finance);
        println!("- **Time Horizon**: {}", narrative.time_horizon);
        println!("- **Overall**: {}", narrative.overall);
    }
}

fn print_json(bundle: &ScoreBundle, narrative: Option<&AnalysisNarrative>) -> Result<()> {
    let value = serde_json::json!({
        "scores": bundle,
        "analysis": narrative,
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

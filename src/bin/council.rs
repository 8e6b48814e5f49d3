//! Council CLI
//!
//! Usage:
//!   council layout --width 390 --height 844 --count 5
//!   council summon --dilemma "..." --count 4 --refine "more context"
//!   council summon --dilemma "..." --debate mirror,shadow --say "What about the kids?"

use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use council::types::{CognitiveStyle, ReflectionFocus};
use council::{compute_layout, CommandRunner, CouncilApp, CouncilConfig, HttpClient};
use council_ui::{AppEvent, Control, TensionKey};

#[derive(Parser)]
#[command(name = "council")]
#[command(about = "Summon a council of advisors and inspect the sphere layout")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the responsive layout and orbit positions for a container
    Layout {
        #[arg(long)]
        width: f64,
        #[arg(long)]
        height: f64,
        /// Number of advisors to place
        #[arg(long, default_value = "5")]
        count: usize,
    },

    /// Summon a council against the collaborator and print the result
    Summon {
        #[arg(short, long)]
        dilemma: String,
        /// Advisor count (clamped to 3..=7)
        #[arg(short, long)]
        count: Option<u8>,
        /// Reflection focus: Decision-Making, Self-Understanding, Relationships
        #[arg(short, long)]
        focus: Option<ReflectionFocus>,
        /// Cognitive style code, e.g. INTJ
        #[arg(short, long)]
        style: Option<CognitiveStyle>,
        /// Refinements applied in order after the summon
        #[arg(short, long)]
        refine: Vec<String>,
        /// Open the debate between two advisors, e.g. mirror,shadow
        #[arg(long, requires = "say")]
        debate: Option<String>,
        /// Message to send into the debate
        #[arg(long, requires = "debate")]
        say: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,council=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    match args.command {
        Command::Layout {
            width,
            height,
            count,
        } => {
            let layout = compute_layout(width, height);
            let output = json!({
                "layout": layout,
                "positions": layout.positions(count),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Summon {
            dilemma,
            count,
            focus,
            style,
            refine,
            debate,
            say,
        } => {
            let config = CouncilConfig::load().context("loading council configuration")?;
            summon(config, dilemma, count, focus, style, refine, debate.zip(say)).await?;
        }
    }
    Ok(())
}

async fn summon(
    config: CouncilConfig,
    dilemma: String,
    count: Option<u8>,
    focus: Option<ReflectionFocus>,
    style: Option<CognitiveStyle>,
    refinements: Vec<String>,
    debate: Option<(String, String)>,
) -> Result<()> {
    let client = HttpClient::new(config.api.base_url.clone(), config.timeout())
        .context("building HTTP client")?;
    let runner = CommandRunner::new(Arc::new(client));

    let started = Instant::now();
    let now = || started.elapsed().as_millis() as u64;

    let mut app = CouncilApp::new(
        config.defaults.clone(),
        config.viewport.width,
        config.viewport.height,
    );

    app.summon(
        &dilemma,
        style.or(config.defaults.cognitive_style.clone()),
        count.unwrap_or(config.defaults.advisor_count),
        focus.unwrap_or(config.defaults.reflection_focus),
        now(),
    );
    runner.settle(&mut app, now).await;
    if let Some(err) = app.feedback().get(Control::Summon) {
        bail!("summon failed: {err}");
    }

    for text in &refinements {
        app.refine(text, now());
        runner.settle(&mut app, now).await;
        if let Some(err) = app.feedback().get(Control::Refine) {
            bail!("refinement '{text}' failed: {err}");
        }
    }

    if let Some((pair, message)) = debate {
        let Some((a, b)) = pair.split_once(',') else {
            bail!("--debate expects two advisor ids separated by a comma");
        };
        app.handle_event(
            AppEvent::SelectTension(TensionKey::new(a.trim(), b.trim())),
            now(),
        );
        if app.debate().is_none() {
            bail!("no tension between '{a}' and '{b}' in this council");
        }
        app.send_message(&message, now());
        runner.settle(&mut app, now).await;
        if let Some(err) = app.feedback().get(Control::DebateSend) {
            bail!("debate message failed: {err}");
        }
    }

    let session = app.session();
    let debate = app.debate().map(|d| {
        json!({
            "advisors": d.advisor_ids(),
            "coreIssue": d.core_issue(),
            "transcript": d.transcript(),
            "matrix": d.matrix(),
            "score": d.weighted_score(),
        })
    });
    let output = json!({
        "dilemma": session.dilemma_text,
        "originalSummary": session.original_summary,
        "contextSummary": session.accumulated_context_summary,
        "refinementHistory": session.refinement_history,
        "summary": session.analysis.as_ref().map(|a| a.summary.clone()),
        "sphere": app.sphere(),
        "debate": debate,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

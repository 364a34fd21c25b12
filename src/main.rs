use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rc_publish::config::{self, Inputs};
use rc_publish::forge::GithubForge;
use rc_publish::notify::SlackWebhook;
use rc_publish::release::ReleaseOrchestrator;
use rc_publish::sequencer;
use rc_publish::staleness::{self, StalenessOutcome};
use rc_publish::ui;

#[derive(clap::Parser)]
#[command(
    name = "rc-publish",
    about = "Cut dated release candidates and nag about stale ones"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, help = "Head commit sha to release (defaults to $GITHUB_SHA)")]
    head: Option<String>,

    #[arg(
        long,
        help = "Check the open RC issue for staleness instead of cutting a release"
    )]
    annoy: bool,

    #[arg(short, long, help = "Enable debug logging")]
    verbose: bool,
}

fn init_logger(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rc_publish=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rc_publish=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .compact(),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.verbose);

    // Configuration and inputs resolve before the first network call
    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    let inputs = match Inputs::from_env(&config) {
        Ok(inputs) => inputs,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let forge = GithubForge::new(
        &config.repository.api_base,
        &inputs.repository.owner,
        &inputs.repository.repo,
        &inputs.github_token,
        inputs.workflow_token.clone(),
    );
    let notifier = SlackWebhook::new(&inputs.slack_webhook_url);

    if args.annoy {
        ui::display_status("Checking the open RC issue for staleness...");
        let outcome = staleness::check_staleness(
            &forge,
            &notifier,
            &config.release.rc_label,
            config.staleness.threshold_days,
            chrono::Utc::now(),
        )
        .await;

        match outcome {
            Ok(StalenessOutcome::NoOpenIssue) => {
                ui::display_success("No open RC issue.");
            }
            Ok(StalenessOutcome::Fresh { issue_url }) => {
                ui::display_success(&format!("RC issue is still fresh: {}", issue_url));
            }
            Ok(StalenessOutcome::ReminderSent { issue_url }) => {
                ui::display_success(&format!("Reminder sent for {}", issue_url));
            }
            Err(e) => {
                ui::display_error(&e.to_string());
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    let head_sha = match args.head.clone().or_else(|| inputs.head_sha.clone()) {
        Some(sha) => sha,
        None => {
            ui::display_error("No head commit given; pass --head or set GITHUB_SHA");
            std::process::exit(1);
        }
    };

    ui::display_status(&format!("Cutting release candidate at {}", head_sha));
    let orchestrator = ReleaseOrchestrator::new(&forge, &notifier, &config.release.rc_label);
    match orchestrator.run(&head_sha, sequencer::release_day_today()).await {
        Ok(candidate) => {
            ui::display_candidate(&candidate);
            Ok(())
        }
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    }
}

use std::env;
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};

use release_pilot::config::{self, Config, GITHUB_TOKEN_ENV, HEROKU_API_KEY_ENV};
use release_pilot::deploy::{DeployPlatform, HerokuClient, PromotionRequest};
use release_pilot::domain::StoryExtractor;
use release_pilot::error::ReleasePilotError;
use release_pilot::hosting::GithubClient;
use release_pilot::outputs;
use release_pilot::poller::{
    poll_until_settled, promotion_is_terminal, release_is_terminal, FixedDelay, PollVerdict,
};
use release_pilot::release::{assemble_release, DiffMode};
use release_pilot::ui;

#[derive(Parser)]
#[command(
    name = "release-pilot",
    about = "Promote builds, watch deployments, and compose release notes from CI"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path", global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose the next release tag, title and changelog body
    Release {
        #[arg(long, value_enum, default_value = "release-diff")]
        mode: Mode,
    },
    /// Promote a build through the deployment pipeline and wait for it to settle
    Promote {
        #[arg(long)]
        pipeline_id: String,

        #[arg(long)]
        source_app_id: String,

        #[arg(long)]
        target_app_id: String,
    },
    /// Poll the application's most recent deployment until it reaches a terminal status
    CheckDeploy {
        #[arg(long)]
        app_id: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Diff story references against the previous release body
    ReleaseDiff,
    /// Walk commits down to the previous release's head commit
    ShaDiff,
}

impl From<Mode> for DiffMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::ReleaseDiff => DiffMode::ReleaseDiff,
            Mode::ShaDiff => DiffMode::ShaDiff,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    let result = match args.command {
        Commands::Release { mode } => run_release(&config, mode.into()).await,
        Commands::Promote {
            pipeline_id,
            source_app_id,
            target_app_id,
        } => {
            run_promote(
                &config,
                PromotionRequest {
                    pipeline_id,
                    source_app_id,
                    target_app_id,
                },
            )
            .await
        }
        Commands::CheckDeploy { app_id } => run_check_deploy(&config, &app_id).await,
    };

    if let Err(e) = result {
        ui::display_error(&e.to_string());
        std::process::exit(1);
    }

    Ok(())
}

async fn run_release(config: &Config, mode: DiffMode) -> release_pilot::Result<()> {
    let (owner, repo) = config.require_repository()?;
    let token = required_env(GITHUB_TOKEN_ENV)?;
    let stories = StoryExtractor::new(config.require_tracker_base_url()?)?;
    let host = GithubClient::new(owner, repo, &token)?;

    ui::display_status("Assembling release notes...");
    let release = assemble_release(&host, &stories, mode, Local::now().date_naive()).await?;
    ui::display_release_summary(&release);

    outputs::set_output("release-tag", &release.tag)?;
    outputs::set_output("release-title", &release.title)?;
    outputs::set_output("release-body", &release.body)?;

    ui::display_success(&format!("Release {} ready", release.tag));
    Ok(())
}

async fn run_promote(config: &Config, request: PromotionRequest) -> release_pilot::Result<()> {
    let api_key = required_env(HEROKU_API_KEY_ENV)?;
    let platform = HerokuClient::new(&api_key)?;

    ui::display_status("Creating pipeline promotion...");
    let promotion_id = platform.create_promotion(&request).await?;
    ui::display_status(&format!("Promotion created: {}", promotion_id));

    let pacer = FixedDelay(Duration::from_millis(config.polling.delay_ms));
    let verdict = poll_until_settled(
        config.polling.max_attempts,
        &pacer,
        promotion_is_terminal,
        || platform.promotion_status(&promotion_id),
    )
    .await;

    outputs::set_output("promote-status", verdict.output_value())?;
    report_verdict("Promotion", &verdict);
    Ok(())
}

async fn run_check_deploy(config: &Config, app_id: &str) -> release_pilot::Result<()> {
    let api_key = required_env(HEROKU_API_KEY_ENV)?;
    let platform = HerokuClient::new(&api_key)?;

    ui::display_status("Checking most recent deployment...");
    let pacer = FixedDelay(Duration::from_millis(config.polling.delay_ms));
    let verdict = poll_until_settled(
        config.polling.max_attempts,
        &pacer,
        release_is_terminal,
        || fetch_release_status(&platform, app_id),
    )
    .await;

    outputs::set_output("deploy-status", verdict.output_value())?;
    report_verdict("Deployment", &verdict);
    Ok(())
}

async fn fetch_release_status(
    platform: &HerokuClient,
    app_id: &str,
) -> release_pilot::Result<String> {
    match platform.latest_release_status(app_id).await? {
        Some(status) => Ok(status),
        None => Err(ReleasePilotError::api(
            "check release status",
            None,
            "application has no releases",
        )),
    }
}

fn report_verdict(subject: &str, verdict: &PollVerdict) {
    match verdict {
        PollVerdict::Settled(status) => {
            ui::display_success(&format!("{} settled: {}", subject, status));
        }
        PollVerdict::RetriesExhausted => {
            ui::display_status(&format!(
                "{} still pending after maximum retries",
                subject
            ));
        }
    }
}

fn required_env(name: &str) -> release_pilot::Result<String> {
    env::var(name).map_err(|_| ReleasePilotError::config(format!("{} must be set", name)))
}

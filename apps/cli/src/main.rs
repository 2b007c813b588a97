//! Diet Architect - terminal front end.

mod tui;

use architect_config_and_utils::{init_logging, Config, Paths};
use architect_core::RootComposer;
use clap::Parser;
use diet_plan_generator::{DietPlanGenerator, GeminiClient};
use identity_client::{RefreshPolicy, SupabaseAuthClient};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Diet Architect - generate Ayurvedic diet plans from the terminal.
#[derive(Parser)]
#[command(name = "diet-architect")]
#[command(about = "Sign in and generate Ayurvedic diet plans")]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error). Overrides the config file.
    #[arg(long)]
    log_level: Option<String>,

    /// Base directory for config.json and logs (default: ~/.diet-architect)
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// Use terminal-adaptive colors instead of the Diet Architect theme
    #[arg(long)]
    terminal_colors: bool,
}

#[tokio::main]
async fn main() {
    // .env is optional.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let paths = match cli.base_dir {
        Some(dir) => Paths::with_base_dir(dir),
        None => Paths::new()?,
    };

    let config = Config::load(&paths)?;
    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    init_logging(level, &paths)?;
    config.validate()?;

    info!(
        supabase_url = %config.supabase_url,
        model = %config.gemini_model,
        base_dir = %paths.base_dir().display(),
        "Starting Diet Architect"
    );

    let auth_client = SupabaseAuthClient::new(
        config.supabase_url.as_str(),
        config.supabase_anon_key.as_str(),
    );
    auth_client.start_auto_refresh(RefreshPolicy::default());

    let gemini = GeminiClient::new(config.gemini_api_key.clone().unwrap_or_default())?;
    let generator = DietPlanGenerator::new(Arc::new(gemini), config.gemini_model.clone());

    let composer = RootComposer::new(
        Arc::new(auth_client.clone()),
        generator,
        config.password_redirect_delay(),
    );

    let theme_mode = if cli.terminal_colors {
        tui::ThemeMode::Terminal
    } else {
        tui::ThemeMode::Architect
    };

    let result = tui::run(composer, theme_mode).await;

    auth_client.stop_auto_refresh();
    info!("Diet Architect exited");

    result
}

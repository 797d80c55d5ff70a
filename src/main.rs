use std::path::PathBuf;

use calcdesk::feedback::{Feedback, TerminalBell};
use calcdesk::{App, Config, repl};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Keyboard-driven calculator with persistent history.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Path to config.toml (defaults to the platform config directory).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Local storage file, overriding the config.
    #[arg(long)]
    storage: Option<PathBuf>,

    /// Keep history local even if a remote store is configured.
    #[arg(long)]
    offline: bool,

    /// Ring the terminal bell as audio feedback.
    #[arg(long)]
    bell: bool,

    /// Log debug output to stderr.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "calcdesk=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(path) = cli.storage {
        config.storage.path = Some(path);
    }

    let feedback = if cli.bell {
        Feedback::new(Box::new(TerminalBell::new(std::io::stderr())), true)
    } else {
        Feedback::silent()
    };

    let mut app = App::from_config(&config, cli.offline, feedback);
    app.load_history().await;

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    repl::run(&mut app, stdin, &mut stdout).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from(["calcdesk", "--bell", "--offline", "--storage", "s.json"])
            .unwrap();
        assert!(cli.bell);
        assert!(cli.offline);
        assert_eq!(cli.storage, Some(PathBuf::from("s.json")));
        assert!(!cli.verbose);

        assert!(!Cli::try_parse_from(["calcdesk"]).unwrap().bell);
    }
}

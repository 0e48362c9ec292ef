use std::net::SocketAddr;
use std::path::PathBuf;

use bankwatch_core::{
    store::DEFAULT_TASKS_PATH, ConfigError, EmptyPolicy, PageMode, UpstreamConfig,
};
use clap::{Parser, ValueEnum};

/// Pagination mode as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PageModeArg {
    /// Follow offsets until every message is collected.
    Exhaustive,
    /// Only read the first non-empty page.
    FirstPage,
}

impl From<PageModeArg> for PageMode {
    fn from(value: PageModeArg) -> Self {
        match value {
            PageModeArg::Exhaustive => PageMode::Exhaustive,
            PageModeArg::FirstPage => PageMode::FirstPage,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "bankwatch-daemon", version, about = "Bankruptcy disclosure watch service")]
pub struct Cli {
    /// Where the HTTP API will listen, e.g. 127.0.0.1:8000
    #[arg(long, env = "BANKWATCH_LISTEN", default_value = "127.0.0.1:8000")]
    pub listen: SocketAddr,

    /// JSON file holding registered tasks.
    #[arg(long, env = "BANKWATCH_TASKS_FILE", default_value = DEFAULT_TASKS_PATH)]
    pub tasks_file: PathBuf,

    /// Upstream login; "demo" selects the demo environment.
    #[arg(long, env = "FEDRESURS_LOGIN")]
    pub login: Option<String>,

    /// Upstream password. Hashed at startup and never logged.
    #[arg(long, env = "FEDRESURS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Override the upstream base URL chosen from the login.
    #[arg(long, env = "BANKWATCH_UPSTREAM_URL")]
    pub upstream_url: Option<String>,

    /// How message listings are paged.
    #[arg(long, value_enum, default_value_t = PageModeArg::Exhaustive)]
    pub page_mode: PageModeArg,

    /// Answer with an empty list instead of "No messages found".
    #[arg(long, default_value_t = false)]
    pub empty_ok: bool,

    /// Log level (env-filter syntax).
    #[arg(long, default_value = "info")]
    pub log: String,
}

impl Cli {
    /// Resolves the upstream configuration once.
    pub fn upstream_config(&self) -> Result<UpstreamConfig, ConfigError> {
        let empty_policy = if self.empty_ok {
            EmptyPolicy::EmptyOk
        } else {
            EmptyPolicy::Error
        };
        Ok(UpstreamConfig::resolve(
            self.login.as_deref(),
            self.password.as_deref(),
            self.upstream_url.as_deref(),
        )?
        .with_page_mode(self.page_mode.into())
        .with_empty_policy(empty_policy))
    }
}

/// Loads `.env` into the process environment.
///
/// A missing file is fine; a present but unreadable or malformed one is
/// returned so the caller can report it once logging is up.
pub fn load_dotenv() -> Option<dotenvy::Error> {
    dotenv_problem(dotenvy::dotenv().map(|_| ()))
}

fn dotenv_problem(result: Result<(), dotenvy::Error>) -> Option<dotenvy::Error> {
    match result {
        Ok(()) => None,
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => Some(e),
    }
}

mod util;

use anyhow::Context;
use argp::FromArgs;
use artifact_fetch_core::{
    Error,
    config::{Config, Inputs},
    pipeline,
};
use artifact_fetch_github::GitHub;
use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::util::escape_command_data;

#[derive(FromArgs, PartialEq, Eq, Debug)]
/// Download and extract GitHub Actions artifacts whose names match a pattern.
///
/// Every option falls back to the matching INPUT_* environment variable.
struct Args {
    #[argp(option)]
    /// token used to authenticate with the GitHub API
    github_token: Option<String>,
    #[argp(option)]
    /// repository in the form owner/name
    repo: Option<String>,
    #[argp(option)]
    /// regular expression matched against artifact names
    regex: Option<String>,
    #[argp(option)]
    /// directory to extract artifacts into, one subdirectory per artifact id
    path: Option<String>,
    #[argp(option)]
    /// write a JSON manifest of the selected artifacts to this file
    metadata: Option<String>,
    #[argp(option)]
    /// GitHub REST API base URL (default: GITHUB_API_URL, else api.github.com)
    api_url: Option<String>,
}

impl From<Args> for Inputs {
    fn from(args: Args) -> Self {
        Self {
            github_token: args.github_token,
            repo: args.repo,
            regex: args.regex,
            path: args.path,
            metadata: args.metadata,
            api_url: args.api_url,
        }
    }
}

#[tokio::main]
async fn main() {
    let env_filter = EnvFilter::builder()
        // Default to info level
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(env_filter))
        .init();

    let args: Args = argp::parse_args_or_exit(argp::DEFAULT);
    if let Err(e) = run(args).await {
        fail(&e);
    }
}

async fn run(args: Args) -> Result<(), Error> {
    let config = Config::resolve(Inputs::from_env().with_overrides(args.into()))?;
    let github = GitHub::new(&config.token, config.api_url.as_deref())
        .context("Failed to set up GitHub client")
        .map_err(|e| Error::configuration(format!("{e:#}")))?;
    let summary = pipeline::run(&github, &config).await?;
    tracing::info!(
        "Extracted {} of {} artifacts into {}",
        summary.extracted.len(),
        summary.listed,
        config.path.display()
    );
    Ok(())
}

/// Report the error to the runner and exit with a failure status.
fn fail(err: &Error) -> ! {
    tracing::error!("{}", err);
    println!("::error::{}", escape_command_data(&err.to_string()));
    std::process::exit(1);
}

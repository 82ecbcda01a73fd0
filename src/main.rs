use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use svelte_check_action::action::SvelteCheck;
use svelte_check_action::config::ActionConfig;
use svelte_check_action::host::{ConsoleHost, GithubActionsHost, Host};
use svelte_check_action::runner::ProcessRunner;

/// Runs svelte-check and reports its findings to GitHub Actions.
///
/// Inputs are read from the `INPUT_*` variables the Actions runner exports.
/// Flags given on the command line take precedence, which is handy when running locally.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory to run svelte-check in.
    #[arg(long)]
    working_directory: Option<PathBuf>,

    /// Fail when svelte-check reports warnings.
    #[arg(long)]
    fail_on_warnings: bool,

    /// Fail when svelte-check reports hints.
    #[arg(long)]
    fail_on_hints: bool,

    /// tsconfig passed to svelte-check.
    #[arg(long)]
    tsconfig: Option<PathBuf>,

    /// Print the final report as JSON after the run.
    #[arg(long)]
    json: bool,
}

impl Cli {
    /// Layers the command-line overrides on top of the action inputs.
    fn into_config(self, mut config: ActionConfig) -> ActionConfig {
        if let Some(dir) = self.working_directory {
            config.working_directory = dir;
        }
        if let Some(tsconfig) = self.tsconfig {
            config.tsconfig = Some(tsconfig);
        }
        config.fail_on_warnings |= self.fail_on_warnings;
        config.fail_on_hints |= self.fail_on_hints;
        config
    }
}

fn main() -> Result<ExitCode> {
    // Logs go to stderr so they never mix with workflow commands on stdout.
    env_logger::init();

    let cli = Cli::parse();
    let json = cli.json;
    let config = cli.into_config(ActionConfig::from_env());
    log::debug!("resolved configuration: {:?}", config);

    let action = SvelteCheck::new(config);
    let runner = ProcessRunner;

    let in_actions = std::env::var("GITHUB_ACTIONS").map_or(false, |v| v == "true");
    let mut host: Box<dyn Host> = if in_actions {
        Box::new(GithubActionsHost::from_env())
    } else {
        Box::new(ConsoleHost::stdout())
    };
    let outcome = action.run(&runner, host.as_mut());

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    }

    // Like the toolkit's setFailed, a failure reported to the host fails the step.
    Ok(if host.failed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

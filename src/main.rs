use agit::audit::AuditLogger;
use agit::cli::Cli;
use agit::config::Config;
use agit::git::GitExecutor;
use agit::llm::{self, Reviewer, Translator};
use agit::ui::{help, Pager, TerminalPrompt};
use agit::{AppResult, Orchestrator};
use clap::{CommandFactory, Parser};
use log::{debug, warn, LevelFilter};
use std::io;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_module("agit", LevelFilter::Debug);
    }
    builder.init();
}

async fn run(cli: Cli) -> AppResult<ExitCode> {
    // Help and usage need no configuration
    if !cli.review && cli.command.is_empty() {
        if cli.explain {
            help::explain(&mut io::stdout())?;
        } else {
            Cli::command().print_help()?;
        }
        return Ok(ExitCode::SUCCESS);
    }

    let config = Config::load()?;
    debug!(
        "Using provider {:?} with model {}",
        config.llm.provider,
        config.llm.model()
    );

    let Some(api_key) = config.api_key() else {
        eprintln!("{}", config.missing_api_key_message());
        return Ok(ExitCode::FAILURE);
    };
    let client = llm::build_client(&config.llm, api_key)?;

    let runner = GitExecutor::current_dir()?;
    let mut orchestrator = Orchestrator::new(
        Box::new(runner),
        Pager::new(config.behavior.pager),
        TerminalPrompt,
    );

    if config.behavior.log_commands {
        match AuditLogger::new() {
            Ok(audit) => orchestrator = orchestrator.with_audit(audit),
            Err(e) => warn!("Command history disabled: {}", e),
        }
    }

    let outcome = if cli.review {
        debug!("Starting review...");
        let reviewer = Reviewer::new(client);
        orchestrator.handle_review(&reviewer, &cli.command).await?
    } else {
        let request = cli.request();
        debug!("Natural language query: {}", request);
        let translator = Translator::new(client);
        orchestrator
            .handle_request(&translator, &request, cli.explain)
            .await?
    };

    if outcome.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

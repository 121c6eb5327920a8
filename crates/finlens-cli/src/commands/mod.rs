mod analyze;
mod export;

use std::sync::Arc;

use finlens_core::{AnalysisRequest, ReqwestHttpClient, Symbol, YahooProvider};

use crate::cli::{AnalyzeArgs, Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<(), CliError> {
    let provider = build_provider(cli);

    match &cli.command {
        Command::Analyze(args) => analyze::run(args, &provider, cli).await,
        Command::Export(args) => export::run(args, &provider, cli).await,
    }
}

fn build_provider(cli: &Cli) -> YahooProvider {
    if cli.mock {
        YahooProvider::default()
    } else {
        YahooProvider::with_http_client(Arc::new(ReqwestHttpClient::new()))
            .with_request_timeout_ms(cli.timeout_ms)
    }
}

fn to_request(args: &AnalyzeArgs) -> Result<AnalysisRequest, CliError> {
    let primary = Symbol::parse(&args.primary)?;
    let comparisons = args
        .compare
        .iter()
        .map(|raw| Symbol::parse(raw))
        .collect::<Result<Vec<_>, _>>()?;
    let benchmark = Symbol::parse(&args.benchmark)?;

    AnalysisRequest::new(primary, comparisons, benchmark).map_err(CliError::from)
}

use finlens_core::{run_analysis, YahooProvider};

use crate::cli::{AnalyzeArgs, Cli};
use crate::error::CliError;
use crate::output;

use super::to_request;

pub async fn run(args: &AnalyzeArgs, provider: &YahooProvider, cli: &Cli) -> Result<(), CliError> {
    let request = to_request(args)?;
    let report = run_analysis(provider, &request).await?;

    output::render_report(&report, cli.format, cli.pretty)
}

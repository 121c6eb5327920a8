use finlens_core::{export_report, run_analysis, YahooProvider};

use crate::cli::{Cli, ExportArgs};
use crate::error::CliError;
use crate::output;

use super::to_request;

pub async fn run(args: &ExportArgs, provider: &YahooProvider, cli: &Cli) -> Result<(), CliError> {
    let request = to_request(&args.analyze)?;
    let report = run_analysis(provider, &request).await?;

    let bytes = export_report(&report)?;
    std::fs::write(&args.output, &bytes)?;

    output::render_export_summary(&report, &args.output, bytes.len(), cli.format, cli.pretty)
}

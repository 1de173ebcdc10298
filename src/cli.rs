use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the spelunker.
///
/// Flags mirror the classic invocation: credentials and deployment routing
/// can be passed directly or picked up from `SUMO_*` environment variables,
/// and the collector creation payload can be replaced or patched from the
/// command line.
#[derive(Parser, Debug)]
#[clap(
    name = "splunk_spelunker",
    about = "Collects and analyzes Splunk diag contents within Sumo Logic"
)]
pub struct Args {
    /// API credential pair (format: <key>:<secret>)
    #[clap(short = 'a', value_name = "secret")]
    pub secret: Option<String>,

    /// Client tag (format: <site>_<orgid>)
    #[clap(short = 'k', value_name = "client")]
    pub client: Option<String>,

    /// API endpoint region (defaults to the client site)
    #[clap(short = 'e', value_name = "endpoint")]
    pub endpoint: Option<String>,

    /// Data source: a Splunk diag archive or an unpacked directory
    #[clap(short = 's', value_name = "datasource")]
    pub datasource: PathBuf,

    /// Increase verbosity (repeat for more detail)
    #[clap(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// JSON file replacing the default collector payload
    #[clap(short = 'j', value_name = "jsonfile")]
    pub jsonfile: Option<PathBuf>,

    /// Collector payload override (format: key=value, repeatable)
    #[clap(short = 'o', value_name = "override")]
    pub overrides: Vec<String>,
}

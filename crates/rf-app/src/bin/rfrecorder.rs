use anyhow::Result;

use rf_app::{cli, recorder};

fn main() -> Result<()> {
    let args = cli::parse_or_usage::<cli::RecorderCli>();
    cli::init_logging(&args.log_level);
    recorder::run(&args)
}

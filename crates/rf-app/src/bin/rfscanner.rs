use anyhow::Result;

use rf_app::{cli, scanner};

fn main() -> Result<()> {
    let args = cli::parse_or_usage::<cli::ScannerCli>();
    cli::init_logging(&args.log_level);
    scanner::run(&args)
}

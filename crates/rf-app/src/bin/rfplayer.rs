use anyhow::Result;

use rf_app::{cli, player};

fn main() -> Result<()> {
    let args = cli::parse_or_usage::<cli::PlayerCli>();
    cli::init_logging(&args.log_level);
    player::run(&args)
}

use anyhow::Context;
use osh::{start_repl, ShellConfig};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off"))
        .format_timestamp(None)
        .init();
    start_repl(ShellConfig::default()).context("osh session failed")?;
    Ok(())
}

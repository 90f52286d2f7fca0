use anyhow::Context;
use clap::Parser;
use compat_score::api::Error;
use compat_score_app::Args;

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    env_logger::init();

    let mut args = Args::parse();
    if args.command.username().is_none() {
        let username = compat_score_app::prompt_username().context("Failed to read username")?;
        args.command.set_username(username);
    }

    let report = compat_score_app::run(args).await?;
    println!("{}", report);

    Ok(())
}

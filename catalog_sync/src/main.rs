use catalog_sync::{
    cli::{handle_command, Arguments},
    config::SyncConfig,
};
use clap::Parser;
use dotenvy::dotenv;
use log::info;

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();
    let args = Arguments::parse();
    let config = SyncConfig::from_env_or_default();

    info!("🚀️ Catalog sync starting");
    match handle_command(args.command, config).await {
        Ok(_) => println!("Bye!"),
        Err(e) => eprintln!("{e}"),
    }
}

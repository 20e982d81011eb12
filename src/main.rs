use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = region_nearby::cli::Cli::parse();
    if let Err(e) = region_nearby::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

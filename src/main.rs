use clap::Parser;
use mapdoc::{cli, logging};

#[tokio::main]
async fn main() {
    let args = cli::Args::parse();

    let _guard = match logging::init(&args.command) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("error: {:#}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = cli::run(args).await {
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}

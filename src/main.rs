use clap::Parser;
use tracing::info;

use shortkey::cli::{Cli, Commands};
use shortkey::config::StaticConfig;
use shortkey::errors::ShortkeyError;
use shortkey::runtime::modes::run_server;
use shortkey::system::logging::init_logging;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Some(Commands::GenerateConfig { output }) = &cli.command {
        generate_config(output.as_deref());
        return;
    }

    let config = match StaticConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };

    // guard 需要存活到服务结束
    let guard = match init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(e) => exit_with(&ShortkeyError::config(format!("{:#}", e))),
    };

    info!("shortkey v{} starting", env!("CARGO_PKG_VERSION"));

    let result = run_server(&config).await;
    if let Err(e) = &result {
        tracing::error!("Server exited with error: {:#}", e);
    }
    // process::exit 不会运行析构，先刷新日志
    drop(guard);

    if let Err(e) = result {
        match e.downcast_ref::<ShortkeyError>() {
            Some(err) => exit_with(err),
            None => exit_with(&ShortkeyError::io(format!("{:#}", e))),
        }
    }
}

fn generate_config(output: Option<&str>) {
    match output {
        Some(path) => {
            if let Err(e) = StaticConfig::default().save_to_file(path) {
                exit_with(&ShortkeyError::io(format!("Failed to write {}: {}", path, e)));
            }
            println!("Sample configuration written to {}", path);
        }
        None => print!("{}", StaticConfig::generate_sample_config()),
    }
}

fn exit_with(err: &ShortkeyError) -> ! {
    eprintln!("{}", err.format_colored());
    std::process::exit(1);
}

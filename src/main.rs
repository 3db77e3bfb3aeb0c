//! tokbar-settings: terminal settings screens for tokbar.

mod app;
mod backend;
mod commands;
mod config;
mod logging;
mod pricing;
mod rightcodes;
mod ui;
mod views;

#[tokio::main]
async fn main() {
    if let Err(e) = app::run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

//! mrecorder: a terminal audio recorder with a recordings manager and player.

mod app;
mod commands;
mod config;
mod library;
mod logging;
mod manager;
mod playback;
mod recording;
mod ui;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    app::run().await
}

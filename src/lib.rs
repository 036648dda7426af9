pub mod api;
pub mod audio;
pub mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod jukebox;
pub mod render;

use api::client::SoundCloudClient;
use audio::player::VirtualPlayerFactory;
use config::AppConfig;
use events::ControlEvent;
use jukebox::Jukebox;
use render::ConsoleRenderer;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedSender;

pub fn run() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("jukebox_lib=info"),
    )
    .init();

    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        let default_config = AppConfig::default();
        // Save defaults so the config file exists for next launch
        if let Err(save_err) = default_config.save() {
            log::error!("Failed to save default config: {}", save_err);
        }
        default_config
    });

    // Everything runs on one thread; remote resolution is the only
    // concurrent work and it yields at await points.
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            log::error!("Failed to start runtime: {}", e);
            return;
        }
    };

    runtime.block_on(async move {
        let client = match SoundCloudClient::new(&config) {
            Ok(client) => Arc::new(client),
            Err(e) => {
                log::error!("Failed to create SoundCloud client: {}", e);
                return;
            }
        };

        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let mut jukebox = Jukebox::new(
            &config,
            client,
            Arc::new(VirtualPlayerFactory),
            Box::new(ConsoleRenderer::stdout(config.render_format)),
            tx.clone(),
        );

        jukebox.start(&config.seed_tracks);
        tokio::spawn(read_commands(tx));
        jukebox.run_loop(rx).await;
    });
}

/// Turn stdin lines into control events. End of input quits.
async fn read_commands(tx: UnboundedSender<ControlEvent>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match line.parse::<ControlEvent>() {
                Ok(event) => {
                    if tx.send(event).is_err() {
                        break;
                    }
                }
                Err(e) => log::warn!("[input] {}", e),
            },
            Ok(None) => {
                let _ = tx.send(ControlEvent::Quit);
                break;
            }
            Err(e) => {
                log::error!("Failed to read input: {}", e);
                let _ = tx.send(ControlEvent::Quit);
                break;
            }
        }
    }
}

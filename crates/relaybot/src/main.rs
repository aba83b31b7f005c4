#[macro_use]
extern crate tracing;

mod config;
mod dispatch;
mod messages;
mod telegram;
mod tools;

use std::sync::Arc;

use relaybot_core::AgentBuilder;
use relaybot_openai_model::{OpenAiConfigBuilder, OpenAiProvider};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::telegram::TelegramClient;
use crate::tools::{CalculateTool, WeatherTool};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };

    let mut model_config = OpenAiConfigBuilder::with_api_key(&config.openai_api_key)
        .with_model(&config.model);
    if let Some(base_url) = &config.openai_base_url {
        model_config = model_config.with_base_url(base_url);
    }
    let provider = OpenAiProvider::new(model_config.build());

    let agent = AgentBuilder::with_model_provider(provider)
        .with_preamble(&config.preamble)
        .with_tool(CalculateTool::new())
        .with_tool(WeatherTool::new(config.openweather_api_key.clone()))
        .build();

    let telegram = Arc::new(TelegramClient::new(config.telegram_bot_token.clone()));
    if let Err(err) = telegram.set_my_commands().await {
        warn!("failed to register bot commands: {err}");
    }

    let mut dispatcher = Dispatcher::new(agent, telegram.clone());
    let (tx, mut rx) = mpsc::unbounded_channel();

    let listener = {
        let telegram = telegram.clone();
        tokio::spawn(async move {
            telegram.listen(tx).await;
        })
    };

    info!(model = %config.model, "bot is running");

    loop {
        tokio::select! {
            event = rx.recv() => {
                let Some(event) = event else {
                    break;
                };
                dispatcher.dispatch(event);
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                break;
            }
        }
    }

    listener.abort();
}

mod announce;
mod commands;
mod constants;
mod dates;
mod handlers;
mod models;
mod schedule;
mod storage;

use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{error, info};

use crate::{
    commands::{birthday, birthdaymessage, checkbirthdays, help, syncbirthdays, testbirthdays},
    constants::{DEFAULT_BIRTHDAYS_FILE, LOG_DIRECTIVE, TURKISH_MONTHS},
    dates::DateMatcher,
    handlers::handle_message,
    models::Data,
    schedule::start_schedule_manager,
    storage::BirthdayStore,
};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    // Initialize logging
    initialize_logging();

    // Load configuration from environment
    let config = match load_configuration() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize bot data
    let data = Data::new(
        BirthdayStore::new(&config.birthdays_file),
        DateMatcher::new(&TURKISH_MONTHS),
        serenity::ChannelId::new(config.birthday_channel_id),
        serenity::ChannelId::new(config.celebration_channel_id),
    );

    // Create and start the bot
    if let Err(e) = start_bot(config, data).await {
        error!("Bot error: {}", e);
        std::process::exit(1);
    }
}

/// Configuration loaded from environment variables
struct Config {
    discord_token: String,
    client_id: u64,
    guild_id: u64,
    birthday_channel_id: u64,
    celebration_channel_id: u64,
    birthdays_file: String,
}

/// Initialize the logging system
fn initialize_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(LOG_DIRECTIVE.parse().expect("valid log directive")),
        )
        .init();
}

/// Load configuration from environment variables
fn load_configuration() -> Result<Config, Box<dyn std::error::Error>> {
    let discord_token = std::env::var("DISCORD_TOKEN").map_err(|_| {
        "DISCORD_TOKEN environment variable not set. Set it with: export DISCORD_TOKEN=your_bot_token"
    })?;

    let client_id = parse_id_var("CLIENT_ID")?;
    let guild_id = parse_id_var("GUILD_ID")?;
    let birthday_channel_id = parse_id_var("BIRTHDAY_CHANNEL_ID")?;
    let celebration_channel_id = parse_id_var("CELEBRATION_CHANNEL_ID")?;

    let birthdays_file =
        std::env::var("BIRTHDAYS_FILE").unwrap_or_else(|_| DEFAULT_BIRTHDAYS_FILE.to_string());

    Ok(Config {
        discord_token,
        client_id,
        guild_id,
        birthday_channel_id,
        celebration_channel_id,
        birthdays_file,
    })
}

/// Read an environment variable holding a Discord snowflake id
fn parse_id_var(name: &str) -> Result<u64, Box<dyn std::error::Error>> {
    let value = std::env::var(name).map_err(|_| {
        format!("{name} environment variable not set. Set it with: export {name}=<discord id>")
    })?;
    value
        .parse::<u64>()
        .map_err(|_| format!("{name} must be a numeric Discord id, got '{value}'").into())
}

/// Create and start the Discord bot
async fn start_bot(
    config: Config,
    data: Data,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Wrap data in Arc for sharing with the schedule manager
    let data_arc = Arc::new(data);
    let data_for_framework = Arc::clone(&data_arc);

    let guild_id = serenity::GuildId::new(config.guild_id);

    // Create framework
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                help(),
                checkbirthdays(),
                testbirthdays(),
                syncbirthdays(),
                birthday(),
                birthdaymessage(),
            ],
            event_handler: |ctx, event, _framework, data| {
                Box::pin(async move {
                    if let poise::serenity_prelude::FullEvent::Message { new_message } = event {
                        handle_message(ctx, new_message, data).await;
                    }
                    Ok(())
                })
            },
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            let http = ctx.http.clone();
            let cache = ctx.cache.clone();
            let data_clone = Arc::clone(&data_for_framework);

            // Start schedule manager
            start_schedule_manager(http, cache, data_clone);
            info!("Schedule manager task started");

            Box::pin(async move {
                info!("Registering commands in guild: {}", guild_id);
                poise::builtins::register_in_guild(ctx, &framework.options().commands, guild_id)
                    .await?;
                info!("Commands registered in guild {} (instant updates)", guild_id);

                info!("Bot is ready!");

                // Return a new clone of the data
                Ok((*data_for_framework).clone())
            })
        })
        .build();

    // Create client with required intents
    let intents =
        serenity::GatewayIntents::non_privileged() | serenity::GatewayIntents::MESSAGE_CONTENT;

    let mut client = serenity::ClientBuilder::new(config.discord_token, intents)
        .framework(framework)
        .await?;

    client
        .http
        .set_application_id(serenity::ApplicationId::new(config.client_id));

    // Start the bot
    info!("Starting bot...");
    client.start().await?;

    Ok(())
}

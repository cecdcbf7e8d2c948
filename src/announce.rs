use std::sync::Arc;

use poise::serenity_prelude::{
    self as serenity, ChannelId, CreateMessage, GuildId, Permissions, UserId,
};
use thiserror::Error;
use tracing::{error, info};

use crate::models::{BirthdayRecord, Data};

/// Why a celebration could not be posted in a guild
#[derive(Debug, Error)]
pub enum AnnounceError {
    #[error("celebration channel not found in guild")]
    ChannelUnavailable,
    #[error("no permission to send messages in the celebration channel")]
    PermissionDenied,
    #[error("failed to deliver message: {0}")]
    Delivery(#[from] serenity::Error),
}

/// All records whose date equals the given key
///
/// Non-exclusive: duplicates match independently, so a user recorded twice
/// is returned twice.
pub fn matching_records<'a>(
    records: &'a [BirthdayRecord],
    date_key: &str,
) -> Vec<&'a BirthdayRecord> {
    records.iter().filter(|r| r.date == date_key).collect()
}

/// Celebration text for the scheduled and manual check paths
pub fn birthday_wish(user_id: &str) -> String {
    format!("<@{user_id}> Doğum günün kutlu olsun! 🎉")
}

/// Celebration text for the direct announcement command
pub fn direct_birthday_wish(user_id: UserId) -> String {
    format!("<@{user_id}> Doğum günün kutlu olsun! 🎉 @everyone")
}

/// Post a celebration in one guild's celebration channel
///
/// Resolves the channel from the cache and checks the bot can send there
/// before posting.
pub async fn send_celebration(
    http: &Arc<serenity::Http>,
    cache: &Arc<serenity::Cache>,
    guild_id: GuildId,
    channel_id: ChannelId,
    content: &str,
) -> Result<(), AnnounceError> {
    // Cache refs must not be held across an await, so the channel is cloned
    // out before any network call.
    let channel = {
        let guild = match guild_id.to_guild_cached(cache) {
            Some(guild) => guild,
            None => return Err(AnnounceError::ChannelUnavailable),
        };
        match guild.channels.get(&channel_id) {
            Some(channel) => channel.clone(),
            None => return Err(AnnounceError::ChannelUnavailable),
        }
    };

    let bot_id = cache.current_user().id;
    let bot_member = guild_id.member(http, bot_id).await?;

    let can_send = {
        let guild = match guild_id.to_guild_cached(cache) {
            Some(guild) => guild,
            None => return Err(AnnounceError::ChannelUnavailable),
        };
        guild
            .user_permissions_in(&channel, &bot_member)
            .contains(Permissions::SEND_MESSAGES)
    };
    if !can_send {
        return Err(AnnounceError::PermissionDenied);
    }

    channel_id
        .send_message(http, CreateMessage::new().content(content))
        .await?;
    Ok(())
}

/// Announce every stored birthday matching the given date key
///
/// Each match is attempted in every guild the bot is in. Per-guild failures
/// are logged and never abort the remaining attempts.
pub async fn check_and_announce(
    http: &Arc<serenity::Http>,
    cache: &Arc<serenity::Cache>,
    data: &Data,
    date_key: &str,
) {
    info!("Checking birthdays for date: {}", date_key);

    let records = data.store.load_all().await;
    let matches = matching_records(&records, date_key);

    if matches.is_empty() {
        info!("No birthday found for date: {}", date_key);
        return;
    }

    info!("Found {} birthday record(s) for {}", matches.len(), date_key);

    for record in matches {
        let wish = birthday_wish(&record.user_id);

        for guild_id in cache.guilds() {
            match send_celebration(http, cache, guild_id, data.celebration_channel, &wish).await {
                Ok(()) => {
                    info!(
                        "Sent birthday message for user {} in guild {}",
                        record.user_id, guild_id
                    );
                }
                Err(AnnounceError::ChannelUnavailable) => {
                    info!("Celebration channel not found in guild {}", guild_id);
                }
                Err(AnnounceError::PermissionDenied) => {
                    info!(
                        "No permission to send messages in channel {} of guild {}",
                        data.celebration_channel, guild_id
                    );
                }
                Err(AnnounceError::Delivery(e)) => {
                    error!(
                        "Failed to send birthday message for user {} in guild {}: {}",
                        record.user_id, guild_id, e
                    );
                }
            }
        }
    }
}

/// Run the birthday check for the current local date
pub async fn check_today(http: &Arc<serenity::Http>, cache: &Arc<serenity::Cache>, data: &Data) {
    let today = data.dates.today();
    check_and_announce(http, cache, data, &today).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, user_id: &str) -> BirthdayRecord {
        BirthdayRecord {
            date: date.to_string(),
            user_id: user_id.to_string(),
        }
    }

    #[test]
    fn test_matching_records_single_match() {
        let records = vec![record("7 haziran", "A")];

        let matches = matching_records(&records, "7 haziran");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].user_id, "A");

        assert!(matching_records(&records, "8 haziran").is_empty());
    }

    #[test]
    fn test_matching_records_shared_date() {
        let records = vec![
            record("1 ocak", "A"),
            record("1 ocak", "B"),
            record("2 ocak", "C"),
        ];

        let matches = matching_records(&records, "1 ocak");
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].user_id, "A");
        assert_eq!(matches[1].user_id, "B");
    }

    #[test]
    fn test_matching_records_duplicate_user_matches_twice() {
        let records = vec![record("7 haziran", "A"), record("7 haziran", "A")];
        assert_eq!(matching_records(&records, "7 haziran").len(), 2);
    }

    #[test]
    fn test_matching_records_empty_store() {
        assert!(matching_records(&[], "7 haziran").is_empty());
    }

    #[test]
    fn test_birthday_wish_mentions_user() {
        assert_eq!(birthday_wish("42"), "<@42> Doğum günün kutlu olsun! 🎉");
    }

    #[test]
    fn test_direct_birthday_wish_pings_everyone() {
        let wish = direct_birthday_wish(UserId::new(42));
        assert_eq!(wish, "<@42> Doğum günün kutlu olsun! 🎉 @everyone");
    }
}

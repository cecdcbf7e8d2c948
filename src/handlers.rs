use std::sync::Arc;

use poise::serenity_prelude::{self as serenity, GetMessages, Message, MessageId, UserId};
use tracing::{debug, error, info};

use crate::{
    constants::HISTORY_PAGE_SIZE,
    dates::DateMatcher,
    models::{BirthdayRecord, Data, Error},
    storage::{BirthdayStore, StoreError},
};

/// Handle an inbound message on the registration channel
///
/// A message that parses as a date records the author's birthday and is
/// acknowledged; anything else gets a format hint. Messages from bots or in
/// any other channel are ignored.
pub async fn handle_message(ctx: &serenity::Context, message: &Message, data: &Data) {
    if message.channel_id != data.birthday_channel || message.author.bot {
        return;
    }

    match data.dates.parse(&message.content) {
        Ok(date) => {
            let record = BirthdayRecord {
                date,
                user_id: message.author.id.to_string(),
            };

            match data.store.append(record.clone()).await {
                Ok(()) => {
                    info!(
                        "Recorded birthday {} for user {}",
                        record.date, record.user_id
                    );
                    if let Err(e) = message.channel_id.say(ctx, "Doğum günün kaydedildi!").await {
                        error!("Failed to acknowledge birthday registration: {}", e);
                    }
                }
                Err(e) => {
                    // The sender gets no reply here; the registration quietly
                    // fails until the operator looks at the log.
                    error!("Failed to save birthday for user {}: {}", record.user_id, e);
                }
            }
        }
        Err(_) => {
            let hint = "Lütfen \"gün ay\" formatında bir tarih girin. Örneğin: \"7 haziran\"";
            if let Err(e) = message.channel_id.say(ctx, hint).await {
                error!("Failed to send format hint: {}", e);
            }
        }
    }
}

/// Fold fetched history entries into the stored record list
///
/// Entries are `(bot author, author id, content)` in fetch order. The stored
/// list is loaded once, every entry from a human author that parses as a
/// date is appended to it, and the merged list is written back in a single
/// save. Nothing deduplicates, so a second pass over the same history
/// re-adds every match. Returns how many records were added.
async fn append_history_records(
    store: &BirthdayStore,
    dates: &DateMatcher,
    entries: impl IntoIterator<Item = (bool, UserId, String)>,
) -> Result<usize, StoreError> {
    let mut records = store.load_all().await;
    let before_count = records.len();

    for (bot, author_id, content) in entries {
        if bot {
            continue;
        }
        if let Ok(date) = dates.parse(&content) {
            debug!("Found historical birthday {} for user {}", date, author_id);
            records.push(BirthdayRecord {
                date,
                user_id: author_id.to_string(),
            });
        }
    }

    store.save_all(&records).await?;
    Ok(records.len() - before_count)
}

/// Walk the registration channel's full history and record every date message
///
/// Pages backwards 100 messages at a time until an empty page comes back,
/// then folds everything into the store with one save. Re-running re-adds
/// every historical match; duplicates are preserved, not cleaned up.
pub async fn sync_birthday_history(http: &Arc<serenity::Http>, data: &Data) -> Result<(), Error> {
    let mut entries = Vec::new();

    let mut last_id: Option<MessageId> = None;
    loop {
        let mut request = GetMessages::new().limit(HISTORY_PAGE_SIZE);
        if let Some(id) = last_id {
            request = request.before(id);
        }

        let messages = data.birthday_channel.messages(http, request).await?;
        if messages.is_empty() {
            break;
        }

        // Pages come back newest first, so the oldest entry is the cursor
        // for the next page.
        last_id = messages.last().map(|m| m.id);
        entries.extend(
            messages
                .into_iter()
                .map(|m| (m.author.bot, m.author.id, m.content)),
        );
    }

    let added = append_history_records(&data.store, &data.dates, entries).await?;
    info!("Loaded {} birthday record(s) from channel history", added);
    Ok(())
}

use poise::serenity_prelude::ChannelId;
use serde::{Deserialize, Serialize};

use crate::dates::DateMatcher;
use crate::storage::BirthdayStore;

/// A single recorded birthday
///
/// `date` is the canonical key, e.g. `"7 haziran"`. The same user or date
/// may appear any number of times; every matching record is announced
/// independently.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthdayRecord {
    pub date: String,
    #[serde(rename = "userId")]
    pub user_id: String,
}

/// Bot state shared across all handlers
#[derive(Clone)]
pub struct Data {
    /// Birthday flat-file store
    pub store: BirthdayStore,
    /// Date grammar and month table
    pub dates: DateMatcher,
    /// Channel where date messages register birthdays
    pub birthday_channel: ChannelId,
    /// Channel where celebrations are posted
    pub celebration_channel: ChannelId,
}

impl Data {
    pub fn new(
        store: BirthdayStore,
        dates: DateMatcher,
        birthday_channel: ChannelId,
        celebration_channel: ChannelId,
    ) -> Self {
        Self {
            store,
            dates,
            birthday_channel,
            celebration_channel,
        }
    }
}

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

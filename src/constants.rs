/// Turkish month names, January through December, lower-case
pub const TURKISH_MONTHS: [&str; 12] = [
    "ocak", "şubat", "mart", "nisan", "mayıs", "haziran", "temmuz", "ağustos", "eylül", "ekim",
    "kasım", "aralık",
];

/// Default path of the birthday storage file
pub const DEFAULT_BIRTHDAYS_FILE: &str = "birthdays.json";

/// Page size when walking the registration channel's history
pub const HISTORY_PAGE_SIZE: u8 = 100;

/// Daily birthday check, 00:00 local time
pub const DAILY_CHECK_CRON: &str = "0 0 0 * * *";

/// Log directive for the application
pub const LOG_DIRECTIVE: &str = "dogumbot=info";

use chrono::{Datelike, NaiveDate, Weekday};

use crate::config::ShopConfig;

/// Parse an HH:MM string into minutes since midnight
pub fn parse_hhmm(raw: &str) -> Option<i64> {
    let (hours, minutes) = raw.split_once(':')?;
    let hours: i64 = hours.parse().ok()?;
    let minutes: i64 = minutes.parse().ok()?;
    if !(0..24).contains(&hours) || !(0..60).contains(&minutes) {
        return None;
    }
    Some(hours * 60 + minutes)
}

/// Format minutes since midnight as HH:MM
pub fn format_hhmm(minutes: i64) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Half-open interval overlap: intervals that merely touch do not overlap
pub fn windows_overlap(a_start: i64, a_end: i64, b_start: i64, b_end: i64) -> bool {
    a_start < b_end && a_end > b_start
}

/// Operating hours for the given weekday, or None when the shop is closed
pub fn hours_for(shop: &ShopConfig, weekday: Weekday) -> Option<(i64, i64)> {
    if weekday == shop.closed_weekday {
        return None;
    }
    if weekday == Weekday::Sat {
        Some((shop.saturday_open_min, shop.saturday_close_min))
    } else {
        Some((shop.weekday_open_min, shop.weekday_close_min))
    }
}

/// Candidate start times for a date, stepped by the shop's slot granularity.
/// The last slot is the one whose start plus one step still fits before
/// closing. Past dates still generate; filtering against the current time is
/// the availability resolver's job.
pub fn slots_for(shop: &ShopConfig, date: NaiveDate) -> Vec<i64> {
    let Some((open_min, close_min)) = hours_for(shop, date.weekday()) else {
        return Vec::new();
    };
    let mut slots = Vec::new();
    let mut slot = open_min;
    while slot + shop.slot_minutes <= close_min {
        slots.push(slot);
        slot += shop.slot_minutes;
    }
    slots
}

pub mod hhmm_serde {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(minutes: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_hhmm(*minutes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_hhmm(&raw).ok_or_else(|| de::Error::custom(format!("invalid HH:MM time: {raw}")))
    }
}

pub mod hhmm_opt_serde {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        minutes: &Option<i64>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match minutes {
            Some(m) => serializer.serialize_some(&super::format_hhmm(*m)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<i64>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            Some(raw) => super::parse_hhmm(&raw)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid HH:MM time: {raw}"))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shop() -> ShopConfig {
        ShopConfig {
            weekday_open_min: 8 * 60,
            weekday_close_min: 19 * 60,
            saturday_open_min: 8 * 60,
            saturday_close_min: 16 * 60,
            closed_weekday: Weekday::Sun,
            slot_minutes: 30,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_and_formats_hhmm() {
        assert_eq!(parse_hhmm("08:00"), Some(480));
        assert_eq!(parse_hhmm("23:59"), Some(1439));
        assert_eq!(parse_hhmm("24:00"), None);
        assert_eq!(parse_hhmm("08:60"), None);
        assert_eq!(parse_hhmm("0800"), None);
        assert_eq!(format_hhmm(570), "09:30");
    }

    #[test]
    fn generates_weekday_slots() {
        // Monday, 08:00-19:00 at 30-minute steps: last slot starts 18:30
        let slots = slots_for(&shop(), date(2025, 6, 2));
        assert_eq!(slots.first(), Some(&480));
        assert_eq!(slots.last(), Some(&(18 * 60 + 30)));
        assert_eq!(slots.len(), 22);
    }

    #[test]
    fn saturday_uses_shorter_hours() {
        let slots = slots_for(&shop(), date(2025, 6, 7));
        assert_eq!(slots.last(), Some(&(15 * 60 + 30)));
    }

    #[test]
    fn closed_day_generates_nothing() {
        assert!(slots_for(&shop(), date(2025, 6, 8)).is_empty());
    }

    #[test]
    fn slot_generation_is_deterministic() {
        let day = date(2025, 6, 2);
        assert_eq!(slots_for(&shop(), day), slots_for(&shop(), day));
    }

    #[test]
    fn touching_windows_do_not_overlap() {
        assert!(!windows_overlap(540, 570, 570, 600));
        assert!(windows_overlap(540, 571, 570, 600));
    }
}

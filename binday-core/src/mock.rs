//! Deterministic stand-in schedule served when the council site cannot be scraped.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::model::{BinColor, CollectionEntry, LookupResponse};

/// Weekday the synthetic general waste collection falls on.
pub const MOCK_COLLECTION_WEEKDAY: Weekday = Weekday::Mon;

/// Days between the general waste collection and the other two bins.
const SECONDARY_OFFSET_DAYS: i64 = 3;

const DISPLAY_FORMAT: &str = "%A, %d %B %Y";

/// Build the synthetic schedule for `postcode` relative to `today`.
///
/// The house number is accepted for symmetry with the live lookup but does not
/// influence the result.
#[must_use]
pub fn mock_schedule(
    postcode: &str,
    _house_number: Option<&str>,
    today: NaiveDate,
) -> LookupResponse {
    let general = next_weekday_after(today, MOCK_COLLECTION_WEEKDAY);
    let secondary = general + Duration::days(SECONDARY_OFFSET_DAYS);

    let collections = vec![
        mock_entry("General Waste (Black Bin)", BinColor::Black, general),
        mock_entry("Recycling (Blue Bin)", BinColor::Blue, secondary),
        mock_entry("Garden Waste (Brown Bin)", BinColor::Brown, secondary),
    ];

    LookupResponse::fallback(format!("Sample Address, {postcode}"), collections)
}

/// Next occurrence of `weekday` strictly after `today`.
#[must_use]
pub fn next_weekday_after(today: NaiveDate, weekday: Weekday) -> NaiveDate {
    let current = i64::from(today.weekday().num_days_from_monday());
    let target = i64::from(weekday.num_days_from_monday());
    let ahead = (target - current).rem_euclid(7);
    let ahead = if ahead == 0 { 7 } else { ahead };
    today + Duration::days(ahead)
}

fn mock_entry(bin_type: &str, color: BinColor, date: NaiveDate) -> CollectionEntry {
    CollectionEntry {
        bin_type: bin_type.to_owned(),
        color,
        next_collection_date: date.format(DISPLAY_FORMAT).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn monday_rolls_over_to_following_week() {
        // 2026-10-19 is a Monday.
        assert_eq!(next_weekday_after(date(2026, 10, 19), Weekday::Mon), date(2026, 10, 26));
    }

    #[test]
    fn next_monday_is_always_strictly_ahead() {
        let start = date(2026, 10, 19);
        for offset in 0..14 {
            let today = start + Duration::days(offset);
            let next = next_weekday_after(today, Weekday::Mon);
            assert_eq!(next.weekday(), Weekday::Mon);
            assert!(next > today, "{next} should be after {today}");
            assert!(next - today <= Duration::days(7));
        }
    }

    #[test]
    fn mock_schedule_has_fixed_bins_in_order() {
        let response = mock_schedule("BT1 1AA", Some("12"), date(2026, 10, 21));

        let kinds: Vec<(&str, BinColor)> = response
            .collections()
            .iter()
            .map(|entry| (entry.bin_type.as_str(), entry.color))
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("General Waste (Black Bin)", BinColor::Black),
                ("Recycling (Blue Bin)", BinColor::Blue),
                ("Garden Waste (Brown Bin)", BinColor::Brown),
            ]
        );
        assert_eq!(response.next_collection_color(), BinColor::Black);
        assert_eq!(response.address(), "Sample Address, BT1 1AA");
        assert!(response.is_fallback());
    }

    #[test]
    fn mock_dates_are_monday_then_thursday() {
        let response = mock_schedule("BT1 1AA", None, date(2026, 10, 21));
        let dates: Vec<&str> = response
            .collections()
            .iter()
            .map(|entry| entry.next_collection_date.as_str())
            .collect();
        assert_eq!(
            dates,
            vec![
                "Monday, 26 October 2026",
                "Thursday, 29 October 2026",
                "Thursday, 29 October 2026",
            ]
        );
    }

    #[test]
    fn house_number_does_not_change_the_schedule() {
        let today = date(2026, 12, 30);
        assert_eq!(
            mock_schedule("BT5 6AB", None, today),
            mock_schedule("BT5 6AB", Some("7"), today)
        );
    }
}

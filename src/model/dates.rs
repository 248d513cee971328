//! Date presentation helpers

use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// English ordinal suffix for a positive number (1st, 2nd, 3rd, 11th, 22nd ...)
pub fn ordinal_suffix(n: u32) -> &'static str {
    if (11..=13).contains(&(n % 100)) {
        return "th";
    }
    match n % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// Long calendar date, e.g. "April 29th, 2024"
pub fn format_long_date(date: NaiveDate) -> String {
    format!(
        "{} {}{}, {}",
        date.format("%B"),
        date.day(),
        ordinal_suffix(date.day()),
        date.year()
    )
}

/// Human distance between `then` and `now` with an "ago"/"in" suffix
pub fn format_relative(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let past = then <= now;
    let seconds = (now - then).num_seconds().unsigned_abs();
    let distance = describe_distance(seconds);
    if past {
        format!("{} ago", distance)
    } else {
        format!("in {}", distance)
    }
}

fn plural(n: u64, unit: &str) -> String {
    if n == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", n, unit)
    }
}

fn describe_distance(seconds: u64) -> String {
    const MINUTES_IN_DAY: u64 = 1440;
    const MINUTES_IN_MONTH: u64 = 43_200;

    let minutes = (seconds as f64 / 60.0).round() as u64;

    if minutes < 1 {
        "less than a minute".to_string()
    } else if minutes < 45 {
        plural(minutes, "minute")
    } else if minutes < 90 {
        "about 1 hour".to_string()
    } else if minutes < MINUTES_IN_DAY {
        let hours = (minutes as f64 / 60.0).round() as u64;
        format!("about {}", plural(hours, "hour"))
    } else if minutes < 2_520 {
        "1 day".to_string()
    } else if minutes < MINUTES_IN_MONTH {
        let days = (minutes as f64 / MINUTES_IN_DAY as f64).round() as u64;
        plural(days, "day")
    } else if minutes < 2 * MINUTES_IN_MONTH {
        let months = (minutes as f64 / MINUTES_IN_MONTH as f64).round() as u64;
        format!("about {}", plural(months, "month"))
    } else {
        let months = minutes / MINUTES_IN_MONTH;
        if months < 12 {
            let nearest = (minutes as f64 / MINUTES_IN_MONTH as f64).round() as u64;
            plural(nearest, "month")
        } else {
            let years = months / 12;
            let remainder = months % 12;
            if remainder < 3 {
                format!("about {}", plural(years, "year"))
            } else if remainder < 9 {
                format!("over {}", plural(years, "year"))
            } else {
                format!("almost {}", plural(years + 1, "year"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_ordinal_suffixes() {
        assert_eq!(ordinal_suffix(1), "st");
        assert_eq!(ordinal_suffix(2), "nd");
        assert_eq!(ordinal_suffix(3), "rd");
        assert_eq!(ordinal_suffix(4), "th");
        assert_eq!(ordinal_suffix(11), "th");
        assert_eq!(ordinal_suffix(12), "th");
        assert_eq!(ordinal_suffix(13), "th");
        assert_eq!(ordinal_suffix(21), "st");
        assert_eq!(ordinal_suffix(111), "th");
    }

    #[test]
    fn test_long_date() {
        let date = NaiveDate::from_ymd_opt(2024, 4, 29).unwrap();
        assert_eq!(format_long_date(date), "April 29th, 2024");
        let date = NaiveDate::from_ymd_opt(2023, 12, 1).unwrap();
        assert_eq!(format_long_date(date), "December 1st, 2023");
    }

    #[test]
    fn test_relative_ranges() {
        let now = Utc::now();
        assert_eq!(format_relative(now - Duration::seconds(10), now), "less than a minute ago");
        assert_eq!(format_relative(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(format_relative(now - Duration::minutes(30), now), "30 minutes ago");
        assert_eq!(format_relative(now - Duration::minutes(60), now), "about 1 hour ago");
        assert_eq!(format_relative(now - Duration::hours(5), now), "about 5 hours ago");
        assert_eq!(format_relative(now - Duration::hours(30), now), "1 day ago");
        assert_eq!(format_relative(now - Duration::days(3), now), "3 days ago");
        assert_eq!(format_relative(now - Duration::days(40), now), "about 1 month ago");
        assert_eq!(format_relative(now - Duration::days(150), now), "5 months ago");
        assert_eq!(format_relative(now - Duration::days(400), now), "about 1 year ago");
        assert_eq!(format_relative(now - Duration::days(365 * 2 + 200), now), "over 2 years ago");
    }

    #[test]
    fn test_future_uses_in_prefix() {
        let now = Utc::now();
        assert_eq!(format_relative(now + Duration::days(2), now), "in 2 days");
    }
}

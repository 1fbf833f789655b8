//! Countdowns to holidays and RuneScape timers

use chrono::{Datelike, NaiveDate, NaiveDateTime, Utc};

use crate::application::services::CommandService;
use crate::domain::entities::{Command, Reply};

const DURATION_UNITS: &[(&str, i64)] = &[
    ("year", 31_536_000),
    ("week", 604_800),
    ("day", 86_400),
    ("hour", 3_600),
    ("minute", 60),
];

/// Periodic timers: name, period in seconds, what resets
const TIMERS: &[(&str, i64, &str)] = &[
    ("reset", 86_400, "reset"),
    ("warbands", 25_200, "Warbands"),
    ("cache", 10_800, "Guthixian Cache"),
];

pub fn register(commands: &mut CommandService) {
    commands.register(
        Command::new("christmas")
            .with_description("Time until Christmas")
            .with_handler(|_| async {
                let secs = until_christmas(Utc::now().naive_utc());
                Ok(Reply::text(format!("{} until Christmas!", secs_to_duration(secs))))
            }),
    );

    commands.register(
        Command::new("easter")
            .with_description("Time until Easter")
            .with_handler(|_| async {
                let secs = until_easter(Utc::now().naive_utc());
                Ok(Reply::text(format!("{} until Easter!", secs_to_duration(secs))))
            }),
    );

    for &(name, period, what) in TIMERS {
        commands.register(
            Command::new(name)
                .with_description(format!("Time until {}", what))
                .with_handler(move |_| async move {
                    let secs = until_next_period(Utc::now().timestamp(), period);
                    Ok(Reply::text(format!("{} until {}.", secs_to_duration(secs), what)))
                }),
        );
    }
}

/// `90061` -> `1 day 1 hour 1 minute 1 second`
pub fn secs_to_duration(secs: i64) -> String {
    let mut parts = Vec::new();
    let mut remaining = secs;

    for &(name, unit) in DURATION_UNITS {
        if remaining >= unit {
            let count = remaining / unit;
            remaining -= count * unit;
            parts.push(format!("{} {}{}", count, name, if count > 1 { "s" } else { "" }));
        }
    }
    if remaining != 0 {
        parts.push(format!("{} second{}", remaining, if remaining != 1 { "s" } else { "" }));
    }

    if parts.is_empty() {
        format!("{} seconds", remaining)
    } else {
        parts.join(" ")
    }
}

/// Seconds left in the current `period`-second window since the epoch
pub fn until_next_period(now_secs: i64, period: i64) -> i64 {
    period - now_secs.rem_euclid(period)
}

pub fn until_christmas(now: NaiveDateTime) -> i64 {
    until_next(now, |year| NaiveDate::from_ymd_opt(year, 12, 25))
}

pub fn until_easter(now: NaiveDateTime) -> i64 {
    until_next(now, easter)
}

/// Seconds from `now` to midnight of this year's date, or next year's if
/// this year's has passed
fn until_next(now: NaiveDateTime, date_in: impl Fn(i32) -> Option<NaiveDate>) -> i64 {
    let midnight = |year| date_in(year).and_then(|d| d.and_hms_opt(0, 0, 0));
    let target = match midnight(now.year()) {
        Some(t) if t >= now => Some(t),
        _ => midnight(now.year() + 1),
    };
    target.map(|t| (t - now).num_seconds()).unwrap_or(0)
}

/// Western Easter Sunday (anonymous Gregorian algorithm)
pub fn easter(year: i32) -> Option<NaiveDate> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}

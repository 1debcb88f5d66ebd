use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::error::{TaskError, TaskResult};

const DISPLAY_DATE_TIME: &str = "%b %d %Y, %-I:%M %p";
const DISPLAY_DATE: &str = "%b %d %Y";
const STORAGE_MINUTES: &str = "%Y-%m-%dT%H:%M";
const STORAGE_SECONDS: &str = "%Y-%m-%dT%H:%M:%S";

pub fn format_date_time(dt: &NaiveDateTime) -> String {
    dt.format(DISPLAY_DATE_TIME).to_string()
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format(DISPLAY_DATE).to_string()
}

/// ISO-8601 local timestamp for the save file. Seconds are only written when
/// they are non-zero.
pub fn to_storage(dt: &NaiveDateTime) -> String {
    if dt.second() == 0 {
        dt.format(STORAGE_MINUTES).to_string()
    } else {
        dt.format(STORAGE_SECONDS).to_string()
    }
}

pub fn from_storage(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    NaiveDateTime::parse_from_str(input, STORAGE_SECONDS)
        .or_else(|_| NaiveDateTime::parse_from_str(input, STORAGE_MINUTES))
        .ok()
}

/// Parses `d/M/yyyy`, `d/M/yyyy HHmm` or `d/M/yyyy HH:mm`.
///
/// Returns the timestamp and whether a clock time was supplied. Date-only
/// input lands on midnight.
pub fn parse_date_time(input: &str) -> TaskResult<(NaiveDateTime, bool)> {
    let mut parts = input.split_whitespace();
    let date_part = parts
        .next()
        .ok_or_else(|| TaskError::validation("date cannot be empty."))?;
    let time_part = parts.next();
    if parts.next().is_some() {
        return Err(TaskError::validation(format!(
            "could not understand '{}'. use d/M/yyyy HHmm (e.g. 22/2/2022 1200)",
            input.trim()
        )));
    }

    let date = parse_full_date(date_part)?;
    match time_part {
        Some(t) => {
            let time = parse_clock(t)?;
            Ok((date.and_time(time), true))
        }
        None => Ok((date.and_time(NaiveTime::default()), false)),
    }
}

fn parse_full_date(input: &str) -> TaskResult<NaiveDate> {
    let fields: Vec<&str> = input.split('/').collect();
    if fields.len() != 3 {
        return Err(invalid_date(input));
    }
    let day = parse_number(fields[0], input)?;
    let month = parse_number(fields[1], input)?;
    let year: i32 = fields[2]
        .parse()
        .ok()
        .filter(|_| fields[2].len() == 4)
        .ok_or_else(|| invalid_date(input))?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| invalid_date(input))
}

fn parse_clock(input: &str) -> TaskResult<NaiveTime> {
    let (hour, minute) = match input.split_once(':') {
        Some((h, m)) => (h, m),
        None if input.len() == 4 && input.is_ascii() => input.split_at(2),
        None => return Err(invalid_time(input)),
    };
    if minute.len() != 2 {
        return Err(invalid_time(input));
    }
    let hour: u32 = hour.parse().map_err(|_| invalid_time(input))?;
    let minute: u32 = minute.parse().map_err(|_| invalid_time(input))?;
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| invalid_time(input))
}

/// Resolves a `schedule` argument against `today`.
///
/// Accepted forms:
/// - `d` / `dd`: day of the current month and year
/// - `d/M` or `ddMM`: day and month of the current year
/// - `d/M/yyyy`: a full date
pub fn resolve_schedule_date(input: &str, today: NaiveDate) -> TaskResult<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return Err(TaskError::validation(
            "schedule needs a date. use schedule d/M/yyyy (e.g. schedule 22/2/2022)",
        ));
    }

    let (day, month, year) = if input.contains('/') {
        let fields: Vec<&str> = input.split('/').collect();
        match fields.as_slice() {
            [d, m] => (parse_number(d, input)?, parse_number(m, input)?, today.year()),
            [_, _, _] => return parse_full_date(input).map_err(|_| invalid_schedule(input)),
            _ => return Err(invalid_schedule(input)),
        }
    } else if input.chars().all(|c| c.is_ascii_digit()) {
        match input.len() {
            1 | 2 => (parse_number(input, input)?, today.month(), today.year()),
            4 => {
                let (d, m) = input.split_at(2);
                (parse_number(d, input)?, parse_number(m, input)?, today.year())
            }
            _ => return Err(invalid_schedule(input)),
        }
    } else {
        return Err(invalid_schedule(input));
    };

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| invalid_schedule(input))
}

fn parse_number(field: &str, whole: &str) -> TaskResult<u32> {
    if field.is_empty() || field.len() > 2 {
        return Err(invalid_date(whole));
    }
    field.parse().map_err(|_| invalid_date(whole))
}

fn invalid_date(input: &str) -> TaskError {
    TaskError::validation(format!(
        "invalid date '{}'. use d/M/yyyy (e.g. 22/2/2022)",
        input
    ))
}

fn invalid_time(input: &str) -> TaskError {
    TaskError::validation(format!(
        "invalid time '{}'. use HHmm or HH:mm (e.g. 1200 or 12:00)",
        input
    ))
}

fn invalid_schedule(input: &str) -> TaskError {
    TaskError::validation(format!(
        "invalid date for schedule: '{}'. use schedule d, d/M or d/M/yyyy (e.g. schedule 22/2/2022)",
        input
    ))
}

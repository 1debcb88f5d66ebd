//! Line codec for the save file.
//!
//! ```text
//! T | 0 | read book
//! D | 1 | submit report | 2022-02-22T12:00 | school
//! E | 0 | meeting | 2022-02-22T12:00 | 2022-02-22T14:00
//! ```
//!
//! The optional last field is the tag. Backslashes and pipes inside free
//! text are escaped as `\\` and `\|` so a description can never shift the
//! field layout.

use chrono::{NaiveDateTime, Timelike};

use crate::model::task::{Task, TaskKind};
use crate::time::{from_storage, to_storage};

pub const FIELD_DELIMITER: &str = " | ";

const DONE_CODE: &str = "1";
const NOT_DONE_CODE: &str = "0";

const TYPE_INDEX: usize = 0;
const STATUS_INDEX: usize = 1;
const DESCRIPTION_INDEX: usize = 2;
const MINIMUM_FIELDS: usize = 3;

/// Result of decoding one non-empty line.
#[derive(Debug, PartialEq)]
pub enum Decoded {
    Task(Task),
    /// Structurally unusable line (too few fields, unknown type code). The
    /// loader skips these with a warning.
    Skipped,
    /// A timestamp field that does not parse. Treated as file corruption.
    BadDate(String),
}

pub fn encode(task: &Task) -> String {
    let status = if task.is_done() { DONE_CODE } else { NOT_DONE_CODE };
    let mut fields = vec![
        task.type_code().to_string(),
        status.to_string(),
        escape(task.description()),
    ];
    match task.kind() {
        TaskKind::Todo => {}
        TaskKind::Deadline { due, .. } => fields.push(to_storage(due)),
        TaskKind::Event { start, end } => {
            fields.push(to_storage(start));
            fields.push(to_storage(end));
        }
    }
    if let Some(tag) = task.tag() {
        fields.push(escape(tag));
    }
    fields.join(FIELD_DELIMITER)
}

pub fn decode(line: &str) -> Decoded {
    let fields = split_fields(line);
    if fields.len() < MINIMUM_FIELDS || fields[DESCRIPTION_INDEX].is_empty() {
        return Decoded::Skipped;
    }
    let description = fields[DESCRIPTION_INDEX].clone();

    let (mut task, tag_index) = match fields[TYPE_INDEX].as_str() {
        "T" => (Task::todo(description), 3),
        "D" => {
            if fields.len() < 4 {
                return Decoded::Skipped;
            }
            let due = match parse_stamp(&fields[3]) {
                Ok(due) => due,
                Err(bad) => return bad,
            };
            // midnight means the deadline was entered without a clock time
            let has_time = due.num_seconds_from_midnight() != 0;
            (Task::deadline(description, due, has_time), 4)
        }
        "E" => {
            if fields.len() < 5 {
                return Decoded::Skipped;
            }
            let start = match parse_stamp(&fields[3]) {
                Ok(start) => start,
                Err(bad) => return bad,
            };
            let end = match parse_stamp(&fields[4]) {
                Ok(end) => end,
                Err(bad) => return bad,
            };
            (Task::event(description, start, end), 5)
        }
        _ => return Decoded::Skipped,
    };

    if fields[STATUS_INDEX] == DONE_CODE {
        task.mark_done();
    }
    task.set_tag(fields.get(tag_index).cloned());
    Decoded::Task(task)
}

fn parse_stamp(field: &str) -> Result<NaiveDateTime, Decoded> {
    from_storage(field).ok_or_else(|| Decoded::BadDate(field.to_string()))
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('|', "\\|")
}

/// Splits on unescaped `|` and trims the padding around each field.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => current.push(chars.next().unwrap_or('\\')),
            '|' => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields.into_iter().map(|f| f.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 2, 22)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_encode_layout() {
        let mut todo = Task::todo("read book");
        todo.mark_done();
        assert_eq!(encode(&todo), "T | 1 | read book");

        let deadline = Task::deadline("submit report", at(12, 0), true);
        assert_eq!(encode(&deadline), "D | 0 | submit report | 2022-02-22T12:00");

        let mut event = Task::event("meeting", at(12, 0), at(14, 0));
        event.set_tag(Some("work".to_string()));
        assert_eq!(
            encode(&event),
            "E | 0 | meeting | 2022-02-22T12:00 | 2022-02-22T14:00 | work"
        );
    }

    #[test]
    fn test_decode_reference_lines() {
        assert_eq!(decode("T | 0 | read book"), Decoded::Task(Task::todo("read book")));

        match decode("D | 1 | submit report | 2022-02-22T12:00") {
            Decoded::Task(t) => {
                assert!(t.is_done());
                assert_eq!(t.kind(), &TaskKind::Deadline { due: at(12, 0), has_time: true });
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_midnight_deadline_is_date_only() {
        match decode("D | 0 | pay rent | 2022-02-22T00:00") {
            Decoded::Task(t) => {
                assert_eq!(t.kind(), &TaskKind::Deadline { due: at(0, 0), has_time: false })
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_pipes_in_description_survive() {
        let mut t = Task::todo(r"a | b \ c");
        t.set_tag(Some("x|y".to_string()));
        let line = encode(&t);
        assert_eq!(decode(&line), Decoded::Task(t));
    }

    #[test]
    fn test_structural_problems_are_skipped() {
        assert_eq!(decode("T | 0"), Decoded::Skipped);
        assert_eq!(decode("X | 0 | mystery"), Decoded::Skipped);
        assert_eq!(decode("D | 0 | no date"), Decoded::Skipped);
        assert_eq!(decode("E | 0 | half event | 2022-02-22T12:00"), Decoded::Skipped);
        assert_eq!(decode("T | 0 | "), Decoded::Skipped);
    }

    #[test]
    fn test_bad_dates_are_reported() {
        assert_eq!(
            decode("D | 0 | submit | not-a-date"),
            Decoded::BadDate("not-a-date".to_string())
        );
        assert_eq!(
            decode("E | 0 | meet | 2022-02-22T12:00 | 2022-13-01T00:00"),
            Decoded::BadDate("2022-13-01T00:00".to_string())
        );
    }
}

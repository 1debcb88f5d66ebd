use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

use crate::time::{format_date, format_date_time};

pub const DONE_GLYPH: &str = "X";
pub const NOT_DONE_GLYPH: &str = " ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskKind {
    Todo,
    Deadline {
        due: NaiveDateTime,
        // false when only a date was given; `due` then sits at midnight
        has_time: bool,
    },
    Event {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

impl TaskKind {
    /// Single-letter discriminator used both on screen and in the save file.
    pub fn code(&self) -> &'static str {
        match self {
            TaskKind::Todo => "T",
            TaskKind::Deadline { .. } => "D",
            TaskKind::Event { .. } => "E",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    description: String,
    done: bool,
    tag: Option<String>,
    kind: TaskKind,
}

impl Task {
    pub fn new(description: impl Into<String>, kind: TaskKind) -> Self {
        Self {
            description: description.into(),
            done: false,
            tag: None,
            kind,
        }
    }

    pub fn todo(description: impl Into<String>) -> Self {
        Self::new(description, TaskKind::Todo)
    }

    pub fn deadline(description: impl Into<String>, due: NaiveDateTime, has_time: bool) -> Self {
        Self::new(description, TaskKind::Deadline { due, has_time })
    }

    pub fn event(description: impl Into<String>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self::new(description, TaskKind::Event { start, end })
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> &TaskKind {
        &self.kind
    }

    pub fn type_code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn status_glyph(&self) -> &'static str {
        if self.done {
            DONE_GLYPH
        } else {
            NOT_DONE_GLYPH
        }
    }

    pub fn mark_done(&mut self) {
        self.done = true;
    }

    pub fn mark_not_done(&mut self) {
        self.done = false;
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Replaces the tag. `None` or a blank string clears it.
    pub fn set_tag(&mut self, tag: Option<String>) {
        self.tag = tag.filter(|t| !t.trim().is_empty());
    }

    /// Instant used for ordering date-bound tasks. Todos have none.
    pub fn relevant_instant(&self) -> Option<NaiveDateTime> {
        match self.kind {
            TaskKind::Todo => None,
            TaskKind::Deadline { due, .. } => Some(due),
            TaskKind::Event { start, .. } => Some(start),
        }
    }

    /// True when the task falls on `date`: a deadline due that day, or an
    /// event whose start..=end date range covers it.
    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        match self.kind {
            TaskKind::Todo => false,
            TaskKind::Deadline { due, .. } => due.date() == date,
            TaskKind::Event { start, end } => start.date() <= date && date <= end.date(),
        }
    }

    /// Duplicate check. Tag and completion state are ignored.
    pub fn same_details_as(&self, other: &Task) -> bool {
        if self.description != other.description {
            return false;
        }
        match (&self.kind, &other.kind) {
            (TaskKind::Todo, TaskKind::Todo) => true,
            (TaskKind::Deadline { due: a, .. }, TaskKind::Deadline { due: b, .. }) => a == b,
            (
                TaskKind::Event { start: s1, end: e1 },
                TaskKind::Event { start: s2, end: e2 },
            ) => s1 == s2 && e1 == e2,
            _ => false,
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}][{}] {}", self.type_code(), self.status_glyph(), self.description)?;
        match &self.kind {
            TaskKind::Todo => {}
            TaskKind::Deadline { due, has_time } => {
                let when = if *has_time {
                    format_date_time(due)
                } else {
                    format_date(&due.date())
                };
                write!(f, " (by: {})", when)?;
            }
            TaskKind::Event { start, end } => {
                write!(
                    f,
                    " (from: {} to: {})",
                    format_date_time(start),
                    format_date_time(end)
                )?;
            }
        }
        if let Some(tag) = &self.tag {
            write!(f, " [{}]", tag)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_todo_rendering() {
        let mut t = Task::todo("read book");
        assert_eq!(t.to_string(), "[T][ ] read book");
        t.mark_done();
        assert_eq!(t.to_string(), "[T][X] read book");
    }

    #[test]
    fn test_deadline_rendering_with_and_without_time() {
        let timed = Task::deadline("submit report", at(2022, 2, 22, 12, 0), true);
        assert_eq!(timed.to_string(), "[D][ ] submit report (by: Feb 22 2022, 12:00 PM)");

        let date_only = Task::deadline("submit report", at(2022, 2, 22, 0, 0), false);
        assert_eq!(date_only.to_string(), "[D][ ] submit report (by: Feb 22 2022)");
    }

    #[test]
    fn test_event_rendering_with_tag() {
        let mut e = Task::event("meeting", at(2022, 2, 22, 12, 0), at(2022, 2, 22, 14, 0));
        e.set_tag(Some("work".to_string()));
        assert_eq!(
            e.to_string(),
            "[E][ ] meeting (from: Feb 22 2022, 12:00 PM to: Feb 22 2022, 2:00 PM) [work]"
        );
    }

    #[test]
    fn test_mark_is_idempotent() {
        let mut t = Task::todo("task");
        t.mark_done();
        t.mark_done();
        assert!(t.is_done());
        t.mark_not_done();
        t.mark_not_done();
        assert!(!t.is_done());
    }

    #[test]
    fn test_blank_tag_clears() {
        let mut t = Task::todo("task");
        t.set_tag(Some("home".to_string()));
        assert_eq!(t.tag(), Some("home"));
        t.set_tag(Some("   ".to_string()));
        assert_eq!(t.tag(), None);
    }

    #[test]
    fn test_same_details_ignores_tag_and_done() {
        let a = Task::todo("read book");
        let mut b = Task::todo("read book");
        b.mark_done();
        b.set_tag(Some("fun".to_string()));
        assert!(a.same_details_as(&b));
        assert!(!a.same_details_as(&Task::todo("write book")));
    }

    #[test]
    fn test_same_details_compares_variant_and_dates() {
        let due = at(2022, 2, 22, 12, 0);
        let d1 = Task::deadline("submit", due, true);
        assert!(d1.same_details_as(&Task::deadline("submit", due, true)));
        assert!(!d1.same_details_as(&Task::deadline("submit", at(2022, 2, 23, 12, 0), true)));
        assert!(!d1.same_details_as(&Task::todo("submit")));

        let e1 = Task::event("meet", at(2022, 2, 22, 12, 0), at(2022, 2, 22, 14, 0));
        assert!(!e1.same_details_as(&Task::event("meet", at(2022, 2, 22, 12, 0), at(2022, 2, 22, 15, 0))));
        assert!(!e1.same_details_as(&Task::event("meet", at(2022, 2, 22, 11, 0), at(2022, 2, 22, 14, 0))));
    }

    #[test]
    fn test_event_occurs_on_inclusive_range() {
        let e = Task::event("trip", at(2022, 2, 20, 9, 0), at(2022, 2, 22, 18, 0));
        assert!(e.occurs_on(NaiveDate::from_ymd_opt(2022, 2, 20).unwrap()));
        assert!(e.occurs_on(NaiveDate::from_ymd_opt(2022, 2, 21).unwrap()));
        assert!(e.occurs_on(NaiveDate::from_ymd_opt(2022, 2, 22).unwrap()));
        assert!(!e.occurs_on(NaiveDate::from_ymd_opt(2022, 2, 23).unwrap()));
        assert!(!Task::todo("x").occurs_on(NaiveDate::from_ymd_opt(2022, 2, 22).unwrap()));
    }
}

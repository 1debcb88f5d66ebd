use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::error::{TaskError, TaskResult};
use crate::time::parse_date_time;

const DEADLINE_FORMAT: &str =
    "deadline <description> /by d/M/yyyy [HHmm] (e.g. deadline submit report /by 22/2/2022 1200)";
const EVENT_FORMAT: &str = "event <description> /from d/M/yyyy HHmm /to d/M/yyyy HHmm \
     (e.g. event meeting /from 22/2/2022 1200 /to 22/2/2022 1400)";

/// How `organise` groups the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    Tag,
    Deadline,
}

/// One fully parsed line. Indices are already 0-based.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Bye,
    List,
    Help,
    Clear,
    Todo {
        description: String,
    },
    Deadline {
        description: String,
        due: NaiveDateTime,
        has_time: bool,
    },
    Event {
        description: String,
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    Mark {
        index: usize,
    },
    Unmark {
        index: usize,
    },
    Delete {
        index: usize,
    },
    Tag {
        index: usize,
        tag: String,
    },
    Untag {
        index: usize,
    },
    Find {
        keyword: Option<String>,
    },
    Schedule {
        date: String,
    },
    Organise(GroupBy),
}

/// Free text split around `/flag` markers.
#[derive(Debug, PartialEq)]
pub struct ParsedInput {
    pub name: String,
    pub metadata: HashMap<String, String>,
}

/// Collapses every run of whitespace into a single space and trims the ends.
pub fn normalize(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Splits `text` into the leading name and the values following each of
/// `flags`. A flag may appear at most once.
pub fn parse_flags(text: &str, flags: &[&str]) -> TaskResult<ParsedInput> {
    let mut name_parts = Vec::new();
    let mut metadata: HashMap<String, Vec<&str>> = HashMap::new();
    let mut current: Option<&str> = None;

    for token in text.split_whitespace() {
        if let Some(flag) = flags.iter().find(|f| f.eq_ignore_ascii_case(token)) {
            if metadata.contains_key(*flag) {
                return Err(TaskError::validation(format!(
                    "only one '{}' is allowed.",
                    flag
                )));
            }
            metadata.insert(flag.to_string(), Vec::new());
            current = Some(*flag);
            continue;
        }
        match current {
            Some(flag) => metadata.entry(flag.to_string()).or_default().push(token),
            None => name_parts.push(token),
        }
    }

    Ok(ParsedInput {
        name: name_parts.join(" "),
        metadata: metadata
            .into_iter()
            .map(|(k, v)| (k, v.join(" ")))
            .collect(),
    })
}

/// Parses one raw line into a [`Command`].
pub fn parse_command(input: &str) -> TaskResult<Command> {
    let line = normalize(input);
    if line.is_empty() {
        return Err(TaskError::EmptyInput);
    }

    let (keyword, rest) = match line.split_once(' ') {
        Some((k, r)) => (k.to_lowercase(), r),
        None => (line.to_lowercase(), ""),
    };

    match keyword.as_str() {
        "bye" => no_args("bye", rest).map(|_| Command::Bye),
        "list" => no_args("list", rest).map(|_| Command::List),
        "help" => no_args("help", rest).map(|_| Command::Help),
        "clear" => no_args("clear", rest).map(|_| Command::Clear),
        "todo" => parse_todo(rest),
        "deadline" => parse_deadline(rest),
        "event" => parse_event(rest),
        "mark" => parse_index("mark", rest).map(|index| Command::Mark { index }),
        "unmark" => parse_index("unmark", rest).map(|index| Command::Unmark { index }),
        "delete" => parse_index("delete", rest).map(|index| Command::Delete { index }),
        "untag" => parse_index("untag", rest).map(|index| Command::Untag { index }),
        "tag" => parse_tag(rest),
        "find" => Ok(Command::Find {
            keyword: (!rest.is_empty()).then(|| rest.to_string()),
        }),
        "schedule" => parse_schedule(rest),
        "organise" | "organize" => parse_organise(rest),
        _ => Err(TaskError::UnknownCommand),
    }
}

fn no_args(keyword: &str, rest: &str) -> TaskResult<()> {
    if rest.is_empty() {
        Ok(())
    } else {
        Err(TaskError::validation(format!(
            "'{}' does not take anything after it.",
            keyword
        )))
    }
}

fn parse_todo(rest: &str) -> TaskResult<Command> {
    if rest.is_empty() {
        return Err(TaskError::validation(
            "description of task cannot be empty. correct format: todo <description> (e.g. todo read book)",
        ));
    }
    Ok(Command::Todo {
        description: rest.to_string(),
    })
}

fn parse_deadline(rest: &str) -> TaskResult<Command> {
    let parsed = parse_flags(rest, &["/by"])?;
    let by = parsed.metadata.get("/by").ok_or_else(|| {
        TaskError::validation(format!("deadline must have '/by'. correct format: {}", DEADLINE_FORMAT))
    })?;
    if parsed.name.is_empty() {
        return Err(TaskError::validation(format!(
            "description of deadline cannot be empty. correct format: {}",
            DEADLINE_FORMAT
        )));
    }
    if by.is_empty() {
        return Err(TaskError::validation(format!(
            "deadline needs a date. correct format: {}",
            DEADLINE_FORMAT
        )));
    }
    let (due, has_time) = parse_date_time(by).map_err(|e| with_format_hint(e, DEADLINE_FORMAT))?;
    Ok(Command::Deadline {
        description: parsed.name,
        due,
        has_time,
    })
}

fn parse_event(rest: &str) -> TaskResult<Command> {
    let parsed = parse_flags(rest, &["/from", "/to"])?;
    let (from, to) = match (parsed.metadata.get("/from"), parsed.metadata.get("/to")) {
        (Some(from), Some(to)) => (from, to),
        _ => {
            return Err(TaskError::validation(format!(
                "event must include '/from' and '/to'. correct format: {}",
                EVENT_FORMAT
            )))
        }
    };
    if parsed.name.is_empty() {
        return Err(TaskError::validation(format!(
            "description of event cannot be empty. correct format: {}",
            EVENT_FORMAT
        )));
    }
    if from.is_empty() || to.is_empty() {
        return Err(TaskError::validation(format!(
            "event needs both /from and /to with dates. correct format: {}",
            EVENT_FORMAT
        )));
    }
    let (start, _) = parse_date_time(from).map_err(|e| with_format_hint(e, EVENT_FORMAT))?;
    let (end, _) = parse_date_time(to).map_err(|e| with_format_hint(e, EVENT_FORMAT))?;
    if start >= end {
        return Err(TaskError::validation(
            "event must end after it starts. check the /from and /to times.",
        ));
    }
    Ok(Command::Event {
        description: parsed.name,
        start,
        end,
    })
}

/// Turns a 1-based task number into a 0-based index. The range check against
/// the actual list happens at execution time.
fn parse_index(keyword: &str, arg: &str) -> TaskResult<usize> {
    let invalid = || {
        TaskError::validation(format!(
            "invalid task number. correct format: {k} <number> (e.g. {k} 1). use 'list' to see task numbers.",
            k = keyword
        ))
    };
    let number: usize = arg.parse().map_err(|_| invalid())?;
    number.checked_sub(1).ok_or_else(invalid)
}

fn parse_tag(rest: &str) -> TaskResult<Command> {
    let (number, tag) = rest.split_once(' ').unwrap_or((rest, ""));
    let index = parse_index("tag", number)?;
    if tag.is_empty() {
        return Err(TaskError::validation(
            "tag cannot be empty. correct format: tag <number> <tag> (e.g. tag 1 school)",
        ));
    }
    Ok(Command::Tag {
        index,
        tag: tag.to_string(),
    })
}

fn parse_schedule(rest: &str) -> TaskResult<Command> {
    if rest.is_empty() {
        return Err(TaskError::validation(
            "schedule needs a date. use schedule d/M/yyyy (e.g. schedule 22/2/2022)",
        ));
    }
    Ok(Command::Schedule {
        date: rest.to_string(),
    })
}

fn parse_organise(rest: &str) -> TaskResult<Command> {
    match rest.to_lowercase().as_str() {
        "tag" => Ok(Command::Organise(GroupBy::Tag)),
        "deadline" => Ok(Command::Organise(GroupBy::Deadline)),
        _ => Err(TaskError::validation(
            "organise by what? use 'organise tag' or 'organise deadline'.",
        )),
    }
}

fn with_format_hint(err: TaskError, format: &str) -> TaskError {
    TaskError::validation(format!("{} correct format: {}", err, format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use chrono::NaiveDate;

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 2, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn kind_of(input: &str) -> ErrorKind {
        parse_command(input).unwrap_err().kind()
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  todo   read \t book  "), "todo read book");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_parse_flags() {
        let parsed = parse_flags("meeting with bob /from 22/2/2022 1200 /to 22/2/2022 1400", &["/from", "/to"]).unwrap();
        assert_eq!(parsed.name, "meeting with bob");
        assert_eq!(parsed.metadata.get("/from"), Some(&"22/2/2022 1200".to_string()));
        assert_eq!(parsed.metadata.get("/to"), Some(&"22/2/2022 1400".to_string()));

        assert!(parse_flags("x /by 1/1/2022 /by 2/1/2022", &["/by"]).is_err());
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        assert_eq!(parse_command("BYE").unwrap(), Command::Bye);
        assert_eq!(parse_command("List").unwrap(), Command::List);
        assert_eq!(
            parse_command("ToDo read   book").unwrap(),
            Command::Todo { description: "read book".to_string() }
        );
    }

    #[test]
    fn test_empty_and_unknown() {
        assert_eq!(kind_of("   "), ErrorKind::EmptyInput);
        assert_eq!(kind_of("invalid"), ErrorKind::UnknownCommand);
        assert_eq!(kind_of("todoread book"), ErrorKind::UnknownCommand);
        assert_eq!(kind_of("list everything"), ErrorKind::Validation);
    }

    #[test]
    fn test_todo_requires_description() {
        assert_eq!(kind_of("todo"), ErrorKind::Validation);
        assert_eq!(kind_of("todo    "), ErrorKind::Validation);
    }

    #[test]
    fn test_deadline_parsing() {
        assert_eq!(
            parse_command("deadline submit /by 22/2/2022 1200").unwrap(),
            Command::Deadline { description: "submit".to_string(), due: at(22, 12), has_time: true }
        );
        assert_eq!(
            parse_command("deadline submit /by 22/2/2022").unwrap(),
            Command::Deadline { description: "submit".to_string(), due: at(22, 0), has_time: false }
        );
        assert_eq!(kind_of("deadline submit"), ErrorKind::Validation);
        assert_eq!(kind_of("deadline submit /by"), ErrorKind::Validation);
        assert_eq!(kind_of("deadline /by 22/2/2022 1200"), ErrorKind::Validation);
        assert_eq!(kind_of("deadline submit /by 32/1/2022 1200"), ErrorKind::Validation);
        assert_eq!(kind_of("deadline submit /by 22/2/2022 1200 /by 23/2/2022 1200"), ErrorKind::Validation);
    }

    #[test]
    fn test_event_parsing() {
        assert_eq!(
            parse_command("event meeting /from 22/2/2022 1200 /to 22/2/2022 1400").unwrap(),
            Command::Event { description: "meeting".to_string(), start: at(22, 12), end: at(22, 14) }
        );
        assert_eq!(kind_of("event meeting /to 22/2/2022 1400"), ErrorKind::Validation);
        assert_eq!(
            kind_of("event meeting /from 22/2/2022 1200 /from 22/2/2022 1300 /to 22/2/2022 1400"),
            ErrorKind::Validation
        );
    }

    #[test]
    fn test_event_must_end_after_start() {
        assert_eq!(kind_of("event x /from 22/2/2022 1400 /to 22/2/2022 1200"), ErrorKind::Validation);
        assert_eq!(kind_of("event x /from 22/2/2022 1400 /to 22/2/2022 1400"), ErrorKind::Validation);
        assert!(parse_command("event x /from 22/2/2022 1400 /to 22/2/2022 1500").is_ok());
    }

    #[test]
    fn test_index_arguments() {
        assert_eq!(parse_command("mark 1").unwrap(), Command::Mark { index: 0 });
        assert_eq!(parse_command("unmark   3").unwrap(), Command::Unmark { index: 2 });
        assert_eq!(parse_command("delete 2").unwrap(), Command::Delete { index: 1 });
        assert_eq!(kind_of("mark"), ErrorKind::Validation);
        assert_eq!(kind_of("mark 0"), ErrorKind::Validation);
        assert_eq!(kind_of("mark abc"), ErrorKind::Validation);
        assert_eq!(kind_of("mark -1"), ErrorKind::Validation);
        assert_eq!(kind_of("delete 1 2"), ErrorKind::Validation);
    }

    #[test]
    fn test_tag_parsing() {
        assert_eq!(
            parse_command("tag 2 very urgent").unwrap(),
            Command::Tag { index: 1, tag: "very urgent".to_string() }
        );
        assert_eq!(kind_of("tag 2"), ErrorKind::Validation);
        assert_eq!(kind_of("tag x fun"), ErrorKind::Validation);
        assert_eq!(parse_command("untag 1").unwrap(), Command::Untag { index: 0 });
    }

    #[test]
    fn test_find_schedule_organise() {
        assert_eq!(parse_command("find").unwrap(), Command::Find { keyword: None });
        assert_eq!(
            parse_command("find  Book").unwrap(),
            Command::Find { keyword: Some("Book".to_string()) }
        );
        assert_eq!(kind_of("schedule"), ErrorKind::Validation);
        assert_eq!(
            parse_command("schedule 22").unwrap(),
            Command::Schedule { date: "22".to_string() }
        );
        assert_eq!(parse_command("organise tag").unwrap(), Command::Organise(GroupBy::Tag));
        assert_eq!(parse_command("organize DEADLINE").unwrap(), Command::Organise(GroupBy::Deadline));
        assert_eq!(kind_of("organise priority"), ErrorKind::Validation);
    }
}

use chrono::Local;
use taskmate_core::greet;

use crate::session::Session;

const PAGE_LINES: u16 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Bot,
}

#[derive(Debug, Clone)]
pub struct Message {
    pub speaker: Speaker,
    pub text: String,
    pub is_error: bool,
    pub sent_at: String,
}

impl Message {
    fn new(speaker: Speaker, text: impl Into<String>, is_error: bool) -> Self {
        Self {
            speaker,
            text: text.into(),
            is_error,
            sent_at: Local::now().format("%H:%M").to_string(),
        }
    }
}

pub struct App {
    pub session: Session,
    pub messages: Vec<Message>,
    pub input: String,
    pub cursor_position: usize,
    /// Rows scrolled up from the newest message. 0 follows the conversation.
    pub scroll: u16,
    /// Set by the renderer once it knows how tall the conversation is.
    pub max_scroll: u16,
    pub should_quit: bool,
}

impl App {
    pub fn new(session: Session) -> App {
        let mut messages = vec![Message::new(Speaker::Bot, greet().join("\n"), false)];
        for notice in session.notices() {
            messages.push(Message::new(Speaker::Bot, notice.clone(), false));
        }
        App {
            session,
            messages,
            input: String::new(),
            cursor_position: 0,
            scroll: 0,
            max_scroll: 0,
            should_quit: false,
        }
    }

    pub fn input_char(&mut self, c: char) {
        let byte_index = self.byte_index(self.cursor_position);
        self.input.insert(byte_index, c);
        self.cursor_position += 1;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let byte_index = self.byte_index(self.cursor_position - 1);
            self.input.remove(byte_index);
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }

    pub fn scroll_up(&mut self, rows: u16) {
        self.scroll = self.scroll.saturating_add(rows).min(self.max_scroll);
    }

    pub fn scroll_down(&mut self, rows: u16) {
        self.scroll = self.scroll.saturating_sub(rows);
    }

    pub fn page_up(&mut self) {
        self.scroll_up(PAGE_LINES);
    }

    pub fn page_down(&mut self) {
        self.scroll_down(PAGE_LINES);
    }

    /// Sends the input line to the interpreter and appends both sides of the
    /// exchange. Blank input still gets a reply, the same as the console.
    pub fn submit_command(&mut self) {
        let input = std::mem::take(&mut self.input);
        self.cursor_position = 0;

        let reply = self.session.respond(&input);
        self.messages.push(Message::new(Speaker::User, input, false));
        self.messages
            .push(Message::new(Speaker::Bot, reply.text, reply.is_error));
        self.scroll = 0;

        if reply.exit {
            self.should_quit = true;
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.input
            .chars()
            .take(char_index)
            .map(|c| c.len_utf8())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn type_line(app: &mut App, line: &str) {
        for c in line.chars() {
            app.input_char(c);
        }
    }

    #[test]
    fn test_starts_with_greeting() {
        let dir = tempdir().unwrap();
        let app = App::new(Session::open(dir.path().join("tasks.txt")));
        assert_eq!(app.messages.len(), 1);
        assert_eq!(app.messages[0].speaker, Speaker::Bot);
        assert!(app.messages[0].text.contains("taskmate"));
    }

    #[test]
    fn test_submit_adds_user_and_bot_messages() {
        let dir = tempdir().unwrap();
        let mut app = App::new(Session::open(dir.path().join("tasks.txt")));

        type_line(&mut app, "todo read book");
        app.submit_command();

        assert!(app.input.is_empty());
        assert_eq!(app.cursor_position, 0);
        let n = app.messages.len();
        assert_eq!(app.messages[n - 2].speaker, Speaker::User);
        assert_eq!(app.messages[n - 2].text, "todo read book");
        assert!(app.messages[n - 1].text.starts_with("got it. task added:"));
        assert!(!app.should_quit);
    }

    #[test]
    fn test_errors_are_flagged_and_bye_quits() {
        let dir = tempdir().unwrap();
        let mut app = App::new(Session::open(dir.path().join("tasks.txt")));

        type_line(&mut app, "mark 9");
        app.submit_command();
        let last = app.messages.last().unwrap();
        assert!(last.is_error);
        assert!(last.text.starts_with("oop. "));

        type_line(&mut app, "bye");
        app.submit_command();
        assert!(app.should_quit);
    }

    #[test]
    fn test_cursor_editing_is_char_aware() {
        let dir = tempdir().unwrap();
        let mut app = App::new(Session::open(dir.path().join("tasks.txt")));

        type_line(&mut app, "tdo");
        app.move_cursor_left();
        app.move_cursor_left();
        app.input_char('o');
        assert_eq!(app.input, "todo");

        app.move_cursor_right();
        app.move_cursor_right();
        app.move_cursor_right();
        app.input_char('é');
        app.delete_char();
        app.delete_char();
        assert_eq!(app.input, "tod");
    }

    #[test]
    fn test_scroll_is_clamped() {
        let dir = tempdir().unwrap();
        let mut app = App::new(Session::open(dir.path().join("tasks.txt")));
        app.max_scroll = 7;
        app.page_up();
        app.page_up();
        assert_eq!(app.scroll, 7);
        app.scroll_down(10);
        assert_eq!(app.scroll, 0);
    }
}

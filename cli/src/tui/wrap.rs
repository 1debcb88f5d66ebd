use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Greedy word wrap measured in terminal columns. Explicit newlines are kept
/// and words wider than `width` are split across lines.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for raw in text.split('\n') {
        let mut current = String::new();
        let mut current_width = 0;
        let mut started = false;

        for word in raw.split(' ') {
            let word_width = word.width();
            let gap = usize::from(started);

            if current_width + gap + word_width <= width {
                if started {
                    current.push(' ');
                }
                current.push_str(word);
                current_width += gap + word_width;
                started = true;
                continue;
            }

            if started {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            started = true;
            if word_width <= width {
                current.push_str(word);
                current_width = word_width;
                continue;
            }

            for c in word.chars() {
                let w = c.width().unwrap_or(0);
                if current_width + w > width && !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push(c);
                current_width += w;
            }
        }
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_untouched() {
        assert_eq!(wrap_text("hello there", 20), vec!["hello there"]);
    }

    #[test]
    fn test_wraps_on_word_boundaries() {
        assert_eq!(
            wrap_text("got it. task added: read book", 12),
            vec!["got it. task", "added: read", "book"]
        );
    }

    #[test]
    fn test_keeps_newlines_and_indent() {
        assert_eq!(
            wrap_text("here is your to-do list!\n1. [T][ ] a", 40),
            vec!["here is your to-do list!", "1. [T][ ] a"]
        );
        assert_eq!(wrap_text("  x", 10), vec!["  x"]);
    }

    #[test]
    fn test_splits_long_words_by_width() {
        assert_eq!(wrap_text("abcdefgh", 3), vec!["abc", "def", "gh"]);
        // double-width characters count as two columns
        assert_eq!(wrap_text("日本語", 4), vec!["日本", "語"]);
    }
}

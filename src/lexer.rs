//! Lexical analysis of a raw input line into shell words.
//!
//! The lexer is a small finite state machine over the characters of the line.
//! It knows about three quoting contexts (none, single, double) and a pending
//! backslash escape. Quote characters are consumed and never appear in the
//! produced words; unbalanced quotes are accepted and the word in progress is
//! closed at the end of input.

/// A single shell word. Quoting has already been removed.
pub type Token = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexingState {
    Unquoted,
    SingleQuote,
    DoubleQuote,
}

struct LexingFSM {
    state: LexingState,
    escaped: bool,
    buffer: String,
    tokens: Vec<Token>,
}

impl LexingFSM {
    fn new() -> Self {
        LexingFSM {
            state: LexingState::Unquoted,
            escaped: false,
            buffer: String::new(),
            tokens: Vec::new(),
        }
    }

    /// Feeds every character of `line` through the machine and returns the words.
    fn make_tokens(mut self, line: &str) -> Vec<Token> {
        for ch in line.chars() {
            if self.escaped {
                self.handle_escaped(ch);
                continue;
            }
            match self.state {
                LexingState::Unquoted => self.handle_unquoted(ch),
                LexingState::SingleQuote => self.handle_single_quote(ch),
                LexingState::DoubleQuote => self.handle_double_quote(ch),
            }
        }

        // A trailing backslash has nothing to escape and is dropped.
        self.finish_word();
        self.tokens
    }

    fn handle_escaped(&mut self, ch: char) {
        match self.state {
            LexingState::Unquoted => self.buffer.push(ch),
            LexingState::SingleQuote => {
                self.buffer.push('\\');
                self.buffer.push(ch);
            }
            LexingState::DoubleQuote => {
                if ch != '"' && ch != '\\' {
                    self.buffer.push('\\');
                }
                self.buffer.push(ch);
            }
        }
        self.escaped = false;
    }

    fn handle_unquoted(&mut self, ch: char) {
        match ch {
            '\\' => self.escaped = true,
            ' ' => self.finish_word(),
            '\'' => self.state = LexingState::SingleQuote,
            '"' => self.state = LexingState::DoubleQuote,
            c => self.buffer.push(c),
        }
    }

    fn handle_single_quote(&mut self, ch: char) {
        match ch {
            // Backslash stays literal but still pairs with the next character,
            // so `\'` does not leave single-quote mode.
            '\\' => self.escaped = true,
            '\'' => self.state = LexingState::Unquoted,
            c => self.buffer.push(c),
        }
    }

    fn handle_double_quote(&mut self, ch: char) {
        match ch {
            '\\' => self.escaped = true,
            '"' => self.state = LexingState::Unquoted,
            c => self.buffer.push(c),
        }
    }

    fn finish_word(&mut self) {
        if !self.buffer.is_empty() {
            self.tokens.push(std::mem::take(&mut self.buffer));
        }
    }
}

/// Splits `line` into shell words honoring quoting and backslash escapes.
///
/// Never fails: unterminated quotes simply extend to the end of the line.
/// Words with empty text (for example a bare `''`) are not emitted.
pub fn tokenize(line: &str) -> Vec<Token> {
    LexingFSM::new().make_tokens(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(line: &str) -> Vec<String> {
        tokenize(line)
    }

    #[test]
    fn test_plain_words_match_whitespace_split() {
        let line = "ls -la /tmp foo=bar";
        let expected: Vec<String> = line.split(' ').map(String::from).collect();
        assert_eq!(words(line), expected);
    }

    #[test]
    fn test_repeated_spaces_are_collapsed() {
        assert_eq!(words("  echo   a  "), vec!["echo", "a"]);
    }

    #[test]
    fn test_single_and_double_quotes() {
        assert_eq!(
            words("echo 'a b' \"c\\\"d\""),
            vec!["echo", "a b", "c\"d"]
        );
    }

    #[test]
    fn test_unquoted_backslash_escapes_space() {
        assert_eq!(words("a\\ b"), vec!["a b"]);
        assert_eq!(words("echo \\'x\\'"), vec!["echo", "'x'"]);
    }

    #[test]
    fn test_backslash_is_literal_inside_single_quotes() {
        assert_eq!(words("echo 'shell\\\\nscript'"), vec!["echo", "shell\\\\nscript"]);
        assert_eq!(words("'a\\'b'"), vec!["a\\'b"]);
    }

    #[test]
    fn test_double_quote_escapes_only_quote_and_backslash() {
        assert_eq!(words("\"a\\\\b\""), vec!["a\\b"]);
        assert_eq!(words("\"a\\nb\""), vec!["a\\nb"]);
        assert_eq!(words("\"a\\$b\""), vec!["a\\$b"]);
    }

    #[test]
    fn test_adjacent_quoted_parts_join_one_word() {
        assert_eq!(words("'hello'\"world\"x"), vec!["helloworldx"]);
        assert_eq!(words("\"it's\" 'say \"hi\"'"), vec!["it's", "say \"hi\""]);
    }

    #[test]
    fn test_empty_quotes_produce_no_word() {
        assert_eq!(words("echo '' \"\""), vec!["echo"]);
    }

    #[test]
    fn test_unterminated_quote_is_accepted() {
        assert_eq!(words("echo 'abc def"), vec!["echo", "abc def"]);
        assert_eq!(words("echo \"x"), vec!["echo", "x"]);
    }

    #[test]
    fn test_trailing_backslash_is_dropped() {
        assert_eq!(words("abc\\"), vec!["abc"]);
    }

    #[test]
    fn test_operators_are_plain_words() {
        assert_eq!(
            words("cat f | wc -l > out"),
            vec!["cat", "f", "|", "wc", "-l", ">", "out"]
        );
    }

    #[test]
    fn test_empty_line() {
        assert!(words("").is_empty());
        assert!(words("   ").is_empty());
    }
}

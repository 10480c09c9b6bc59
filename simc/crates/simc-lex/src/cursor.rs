//! Character cursor for traversing simc source.
//!
//! Adapted from a generic UTF-8 cursor: column tracking is gone (`Span` is
//! a bare line number, never a byte or character column), and two pieces of
//! state the generic cursor had no use for are added because the surface
//! grammar needs them at the character level rather than the token level —
//! a parenthesis-depth counter, which decides whether a `\n` is a real
//! `newline` token or swallowed mid-expression, and a bracket stack, which
//! catches unbalanced `()`/`{}`/`[]` as soon as the mismatch happens rather
//! than only at end of input.

/// A cursor for traversing source code character by character.
pub struct Cursor<'a> {
    source: &'a str,
    position: usize,
    line: u32,
    /// How many unmatched `(` are currently open. `\n` is only emitted as a
    /// `newline` token when this is zero (§4.2).
    paren_depth: u32,
    /// Unmatched openers seen so far, in order, each paired with the line
    /// it opened on so a mismatch can be reported accurately.
    brackets: Vec<(char, u32)>,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
            line: 1,
            paren_depth: 0,
            brackets: Vec::new(),
        }
    }

    /// Returns the current character, or `'\0'` at end of input.
    pub fn current_char(&self) -> char {
        self.char_at(0)
    }

    #[inline]
    pub fn char_at(&self, offset: usize) -> char {
        let pos = self.position + offset;
        if pos >= self.source.len() {
            return '\0';
        }
        let b = self.source.as_bytes()[pos];
        if b < 128 {
            return b as char;
        }
        self.source[pos..].chars().next().unwrap_or('\0')
    }

    #[inline]
    pub fn peek_char(&self, offset: usize) -> char {
        self.char_at(offset)
    }

    #[inline]
    pub fn advance(&mut self) {
        if self.position >= self.source.len() {
            return;
        }
        let b = self.source.as_bytes()[self.position];
        if b < 128 {
            self.position += 1;
            if b == b'\n' {
                self.line += 1;
            }
            return;
        }
        if let Some(c) = self.source[self.position..].chars().next() {
            self.position += c.len_utf8();
            if c == '\n' {
                self.line += 1;
            }
        }
    }

    pub fn advance_n(&mut self, count: usize) {
        for _ in 0..count {
            if self.is_at_end() {
                break;
            }
            self.advance();
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.source.len()
    }

    /// Matches and consumes the expected character if present.
    pub fn match_char(&mut self, expected: char) -> bool {
        if self.current_char() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Skips space and tab characters. Does not skip `\n` — newline
    /// significance is the lexer's call, not the cursor's.
    pub fn skip_inline_whitespace(&mut self) {
        while matches!(self.current_char(), ' ' | '\t' | '\r') {
            self.advance();
        }
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn slice_from(&self, start: usize) -> &'a str {
        &self.source[start..self.position]
    }

    pub fn remaining(&self) -> &'a str {
        &self.source[self.position..]
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn snapshot(&self) -> CursorSnapshot {
        CursorSnapshot {
            position: self.position,
            line: self.line,
        }
    }

    pub fn restore(&mut self, snapshot: CursorSnapshot) {
        self.position = snapshot.position;
        self.line = snapshot.line;
    }

    /// True while scanning is inside a parenthesised expression — the
    /// lexer swallows `\n` instead of emitting `newline` in this state.
    pub fn in_parens(&self) -> bool {
        self.paren_depth > 0
    }

    pub fn enter_paren(&mut self) {
        self.paren_depth += 1;
    }

    /// Leaves a parenthesised expression. No-op (rather than underflow) if
    /// called with no open paren — the caller reports the unbalanced `)`
    /// as a `LexError` using `line()` before ever calling this.
    pub fn exit_paren(&mut self) {
        self.paren_depth = self.paren_depth.saturating_sub(1);
    }

    /// Pushes an opening bracket (`(`, `{`, or `[`) onto the balance stack.
    pub fn push_bracket(&mut self, opener: char) {
        self.brackets.push((opener, self.line));
    }

    /// Pops the innermost open bracket if it matches `closer`. Returns the
    /// line its opener was seen on, or `None` if the stack is empty or the
    /// top doesn't match — both lexical errors for the caller to report.
    pub fn pop_bracket(&mut self, closer: char) -> Option<u32> {
        let expected = match closer {
            ')' => '(',
            '}' => '{',
            ']' => '[',
            _ => return None,
        };
        match self.brackets.last() {
            Some((opener, _)) if *opener == expected => {
                self.brackets.pop().map(|(_, line)| line)
            }
            _ => None,
        }
    }

    /// The still-open brackets at end of input, each with the line it
    /// opened on — empty iff brackets balanced.
    pub fn unclosed_brackets(&self) -> &[(char, u32)] {
        &self.brackets
    }
}

/// A snapshot of cursor state that can be restored later.
#[derive(Clone, Copy, Debug)]
pub struct CursorSnapshot {
    pub position: usize,
    pub line: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_walks_ascii_and_utf8() {
        let mut cursor = Cursor::new("aα");
        assert_eq!(cursor.current_char(), 'a');
        cursor.advance();
        assert_eq!(cursor.current_char(), 'α');
        cursor.advance();
        assert!(cursor.is_at_end());
    }

    #[test]
    fn advance_tracks_line_without_column() {
        let mut cursor = Cursor::new("a\nb\nc");
        assert_eq!(cursor.line(), 1);
        cursor.advance_n(2); // "a\n"
        assert_eq!(cursor.line(), 2);
        cursor.advance_n(2); // "b\n"
        assert_eq!(cursor.line(), 3);
    }

    #[test]
    fn peek_char_does_not_consume() {
        let cursor = Cursor::new("abc");
        assert_eq!(cursor.peek_char(0), 'a');
        assert_eq!(cursor.peek_char(2), 'c');
        assert_eq!(cursor.peek_char(10), '\0');
    }

    #[test]
    fn match_char_consumes_only_on_match() {
        let mut cursor = Cursor::new("==x");
        assert!(cursor.match_char('='));
        assert!(cursor.match_char('='));
        assert!(!cursor.match_char('='));
        assert_eq!(cursor.current_char(), 'x');
    }

    #[test]
    fn snapshot_restore_round_trips() {
        let mut cursor = Cursor::new("abc\ndef");
        cursor.advance_n(5);
        let snap = cursor.snapshot();
        cursor.advance_n(2);
        cursor.restore(snap);
        assert_eq!(cursor.current_char(), 'd');
        assert_eq!(cursor.line(), 2);
    }

    #[test]
    fn paren_depth_gates_in_parens() {
        let mut cursor = Cursor::new("");
        assert!(!cursor.in_parens());
        cursor.enter_paren();
        assert!(cursor.in_parens());
        cursor.enter_paren();
        cursor.exit_paren();
        assert!(cursor.in_parens());
        cursor.exit_paren();
        assert!(!cursor.in_parens());
    }

    #[test]
    fn bracket_stack_matches_openers_to_closers() {
        let mut cursor = Cursor::new("");
        cursor.push_bracket('(');
        cursor.push_bracket('{');
        assert!(cursor.pop_bracket(')').is_none()); // top is '{', not '('
        assert!(cursor.pop_bracket('}').is_some());
        assert!(cursor.pop_bracket(')').is_some());
        assert!(cursor.unclosed_brackets().is_empty());
    }

    #[test]
    fn unclosed_brackets_reports_opener_lines() {
        let mut cursor = Cursor::new("(\n(\n");
        cursor.push_bracket('(');
        cursor.advance();
        cursor.push_bracket('(');
        let unclosed = cursor.unclosed_brackets();
        assert_eq!(unclosed.len(), 2);
        assert_eq!(unclosed[0], ('(', 1));
        assert_eq!(unclosed[1], ('(', 2));
    }
}

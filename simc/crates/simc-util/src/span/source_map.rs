//! Looks up source line text for diagnostic snippets.

use super::Span;

/// One source file's text, split into lines for 1-based lookup.
#[derive(Debug, Clone)]
pub struct SourceFile {
    name: String,
    lines: Vec<String>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, content: &str) -> Self {
        Self {
            name: name.into(),
            lines: content.lines().map(String::from).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Text of a 1-based line number, or `None` if out of range.
    pub fn line(&self, line: u32) -> Option<&str> {
        let idx = line.checked_sub(1)? as usize;
        self.lines.get(idx).map(String::as_str)
    }
}

/// The source files a driver run has loaded, addressable by index so a
/// diagnostic can point into an imported file's line rather than only the
/// entry file's.
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    files: Vec<SourceFile>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self { files: Vec::new() }
    }

    /// Registers a file and returns its index in the map.
    pub fn add_file(&mut self, name: impl Into<String>, content: &str) -> usize {
        self.files.push(SourceFile::new(name, content));
        self.files.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&SourceFile> {
        self.files.get(index)
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Formats `<name>:<line>: <text>` for a diagnostic, falling back to
    /// just the location when the line or file isn't found.
    pub fn format_span(&self, file_index: usize, span: Span) -> String {
        let Some(file) = self.get(file_index) else {
            return "<unknown>".to_string();
        };
        if span.is_dummy() {
            return file.name().to_string();
        }
        match file.line(span.line) {
            Some(text) => format!("{}:{}: {}", file.name(), span.line, text),
            None => format!("{}:{}", file.name(), span.line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_lookup_is_one_based() {
        let file = SourceFile::new("a.simc", "first\nsecond\nthird");
        assert_eq!(file.line(1), Some("first"));
        assert_eq!(file.line(3), Some("third"));
        assert_eq!(file.line(4), None);
        assert_eq!(file.line(0), None);
    }

    #[test]
    fn line_count_matches_input() {
        let file = SourceFile::new("a.simc", "one\ntwo\nthree");
        assert_eq!(file.line_count(), 3);
    }

    #[test]
    fn source_map_formats_span() {
        let mut map = SourceMap::new();
        let idx = map.add_file("a.simc", "x = 1\nprint(x)");
        assert_eq!(map.format_span(idx, Span::new(2)), "a.simc:2: print(x)");
    }

    #[test]
    fn dummy_span_formats_just_the_file_name() {
        let mut map = SourceMap::new();
        let idx = map.add_file("a.simc", "x = 1");
        assert_eq!(map.format_span(idx, Span::DUMMY), "a.simc");
    }

    #[test]
    fn unknown_file_formats_placeholder() {
        let map = SourceMap::new();
        assert_eq!(map.format_span(0, Span::new(1)), "<unknown>");
    }

    #[test]
    fn out_of_range_line_still_names_the_file() {
        let mut map = SourceMap::new();
        let idx = map.add_file("a.simc", "only line");
        assert_eq!(map.format_span(idx, Span::new(99)), "a.simc:99");
    }
}

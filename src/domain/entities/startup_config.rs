//! Startup configuration artifact shared by every action of a session.

/// Ordered, append-only sequence of configuration lines.
///
/// Lines are only ever added at the end; nothing reorders, truncates or
/// deduplicates existing content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartupConfig {
    lines: Vec<String>,
}

impl StartupConfig {
    /// Create an empty startup configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Append lines to the end, returning the number of lines added
    pub fn append<I>(&mut self, lines: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let before = self.lines.len();
        self.lines.extend(lines);
        self.lines.len() - before
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Render the file contents: newline-joined, newline-terminated when non-empty
    pub fn render(&self) -> String {
        if self.lines.is_empty() {
            return String::new();
        }
        let mut rendered = join_lines(&self.lines);
        rendered.push('\n');
        rendered
    }
}

/// Split text on `\n` without any other processing.
///
/// Inverse of [`join_lines`] for lines that contain no newline.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split('\n').map(str::to_string).collect()
}

/// Join lines with `\n`.
pub fn join_lines(lines: &[String]) -> String {
    lines.join("\n")
}

/// Turn resolved template text into the lines an action contributes.
///
/// Each line is trimmed. A single trailing newline does not produce an empty
/// last line and empty text contributes nothing.
pub fn config_lines(text: &str) -> Vec<String> {
    let body = text.strip_suffix('\n').unwrap_or(text);
    if body.is_empty() {
        return Vec::new();
    }
    split_lines(body)
        .into_iter()
        .map(|line| line.trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn owned(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_append_preserves_order() {
        let mut config = StartupConfig::new();
        assert!(config.is_empty());

        assert_eq!(config.append(owned(&["L1"])), 1);
        assert_eq!(config.append(owned(&["L2", "L3"])), 2);
        assert_eq!(config.append(Vec::new()), 0);

        assert_eq!(config.lines(), owned(&["L1", "L2", "L3"]).as_slice());
    }

    #[test]
    fn test_append_never_deduplicates() {
        let mut config = StartupConfig::new();
        config.append(owned(&["!", "end"]));
        config.append(owned(&["!", "end"]));
        assert_eq!(config.len(), 4);
    }

    #[test]
    fn test_render() {
        let mut config = StartupConfig::new();
        assert_eq!(config.render(), "");

        config.append(owned(&["hostname leaf1", "ip routing"]));
        assert_eq!(config.render(), "hostname leaf1\nip routing\n");
    }

    #[test]
    fn test_split_join_roundtrip() {
        let samples = [
            owned(&["a"]),
            owned(&["a", "b", "c"]),
            owned(&["", "x", ""]),
            owned(&["  padded  ", "\ttab"]),
        ];
        for lines in samples {
            assert_eq!(split_lines(&join_lines(&lines)), lines);
        }
    }

    #[test]
    fn test_config_lines_trims_each_line() {
        let text = "first $a\n second  \n\tthird\t";
        assert_eq!(config_lines(text), owned(&["first $a", "second", "third"]));
    }

    #[test]
    fn test_config_lines_trailing_newline() {
        assert_eq!(config_lines("a\nb\n"), owned(&["a", "b"]));
        assert_eq!(config_lines("a\r\nb\r\n"), owned(&["a", "b"]));
        assert_eq!(config_lines("a\n\nb"), owned(&["a", "", "b"]));
    }

    #[test]
    fn test_config_lines_empty_text() {
        assert!(config_lines("").is_empty());
        assert!(config_lines("\n").is_empty());
    }
}

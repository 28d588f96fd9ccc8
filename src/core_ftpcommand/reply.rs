use std::fmt;

/// A control-channel response.
///
/// Single-line replies render as `<code> <text>\r\n`. Multi-line replies render
/// the first line as `<code>-<text>`, the inner lines verbatim and the last line
/// as `<code> <text>`, each terminated by CRLF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    code: u16,
    lines: Vec<String>,
}

impl Reply {
    pub fn new(code: u16, text: impl Into<String>) -> Self {
        Self {
            code,
            lines: vec![text.into()],
        }
    }

    pub fn multiline(code: u16, lines: Vec<String>) -> Self {
        debug_assert!(!lines.is_empty());
        Self { code, lines }
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    /// Text of the last line, without code or terminator.
    pub fn text(&self) -> &str {
        self.lines.last().map(String::as_str).unwrap_or_default()
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last = self.lines.len().saturating_sub(1);
        for (i, line) in self.lines.iter().enumerate() {
            if i == last {
                write!(f, "{} {}\r\n", self.code, line)?;
            } else if i == 0 {
                write!(f, "{}-{}\r\n", self.code, line)?;
            } else {
                write!(f, "{}\r\n", line)?;
            }
        }
        Ok(())
    }
}

/// Style flags accumulated while scanning a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StyleState {
    pub bold: bool,
    pub italic: bool,
    pub large: bool,
}

impl StyleState {
    pub const PLAIN: Self = Self {
        bold: false,
        italic: false,
        large: false,
    };

    pub const fn new(bold: bool, italic: bool, large: bool) -> Self {
        Self {
            bold,
            italic,
            large,
        }
    }

    /// Resolves the font variant for this state. `large` wins over every other flag.
    pub const fn variant(&self) -> VariantKind {
        if self.large {
            VariantKind::Large
        } else if self.bold && self.italic {
            VariantKind::BoldItalic
        } else if self.bold {
            VariantKind::Bold
        } else if self.italic {
            VariantKind::Italic
        } else {
            VariantKind::Normal
        }
    }

    pub fn toggle(&mut self, marker: Marker) {
        match marker {
            Marker::Bold => self.bold = !self.bold,
            Marker::Italic => self.italic = !self.italic,
            Marker::Large => self.large = !self.large,
        }
    }
}

/// One of the five precomputed font variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantKind {
    Normal,
    Bold,
    Italic,
    BoldItalic,
    Large,
}

/// Inline style marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// `**`
    Bold,
    /// `*`
    Italic,
    /// `##`
    Large,
}

impl Marker {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Marker::Bold => "**",
            Marker::Italic => "*",
            Marker::Large => "##",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Text(&'a str),
    Marker(Marker),
}

/// Single-pass tokenizer for the inline markup dialect.
///
/// Markers are ASCII, so scanning bytes never splits a multi-byte character and
/// every text token is a valid sub-slice of the input.
#[derive(Debug, Clone)]
pub struct MarkupScanner<'a> {
    line: &'a str,
    pos: usize,
}

impl<'a> MarkupScanner<'a> {
    pub fn new(line: &'a str) -> Self {
        Self { line, pos: 0 }
    }

    fn marker_at(&self, idx: usize) -> Option<Marker> {
        let bytes = self.line.as_bytes();
        let current = bytes[idx];
        let next = bytes.get(idx + 1).copied();
        // The preceding byte is read from the raw line, even when it belonged to a marker.
        let prev = idx.checked_sub(1).map(|p| bytes[p]);

        match current {
            b'*' if next == Some(b'*') => Some(Marker::Bold),
            b'*' if prev != Some(b'*') && next != Some(b'*') => Some(Marker::Italic),
            b'#' if next == Some(b'#') => Some(Marker::Large),
            _ => None,
        }
    }
}

impl<'a> Iterator for MarkupScanner<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let len = self.line.len();
        if self.pos >= len {
            return None;
        }

        if let Some(marker) = self.marker_at(self.pos) {
            self.pos += marker.as_str().len();
            return Some(Token::Marker(marker));
        }

        let start = self.pos;
        let mut end = start + 1;
        while end < len && self.marker_at(end).is_none() {
            end += 1;
        }
        self.pos = end;
        Some(Token::Text(&self.line[start..end]))
    }
}

/// A maximal span of text sharing one style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSegment<'a> {
    pub text: &'a str,
    pub style: StyleState,
}

/// Run segmentation of a single line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineRuns<'a> {
    pub runs: Vec<RunSegment<'a>>,
    pub final_style: StyleState,
    pub large_seen: bool,
}

/// Splits `line` into the runs a render pass would draw, without touching a surface.
pub fn split_runs(line: &str) -> LineRuns<'_> {
    let mut output = LineRuns::default();
    let mut style = StyleState::PLAIN;

    for token in MarkupScanner::new(line) {
        match token {
            Token::Text(text) => output.runs.push(RunSegment { text, style }),
            Token::Marker(marker) => {
                style.toggle(marker);
                if style.large {
                    output.large_seen = true;
                }
            }
        }
    }

    output.final_style = style;
    output
}

/// Returns the literal text of `line` with every marker removed.
pub fn strip_markup(line: &str) -> String {
    MarkupScanner::new(line)
        .filter_map(|token| match token {
            Token::Text(text) => Some(text),
            Token::Marker(_) => None,
        })
        .collect()
}

use crate::markup::{MarkupScanner, StyleState, Token};
use crate::surface::{enlarged_height, FontVariants, Surface};

/// Outcome of rendering one markup line.
/// 單行標記文字繪製後的結果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineLayoutResult {
    /// Vertical space the line occupies, enlarged once if the large style was used.
    pub consumed_height: i32,
    /// Total horizontal advance of all drawn runs.
    pub advance: i32,
    pub runs: usize,
}

/// Draws one line of inline markup on `surface` starting at `(x, y)`.
/// 在 `surface` 上自 `(x, y)` 起繪製一行含行內標記的文字。
///
/// Pending text is flushed in the pre-toggle style before each marker is applied,
/// so run boundaries always coincide with markers. Runs abut exactly: each starts
/// where the previous one's measured width ended.
pub fn render_line<S>(
    surface: &mut S,
    line: &str,
    x: i32,
    y: i32,
    fonts: &FontVariants<S::Font>,
    line_height: i32,
) -> LineLayoutResult
where
    S: Surface,
{
    let mut cursor = RunCursor {
        surface,
        fonts,
        x,
        y,
        runs: 0,
    };
    let mut style = StyleState::PLAIN;
    let mut pending: Option<&str> = None;
    let mut large_seen = false;

    for token in MarkupScanner::new(line) {
        match token {
            Token::Text(text) => pending = Some(text),
            Token::Marker(marker) => {
                if let Some(text) = pending.take() {
                    cursor.flush(text, style);
                }
                style.toggle(marker);
                large_seen |= style.large;
            }
        }
    }
    if let Some(text) = pending.take() {
        cursor.flush(text, style);
    }

    let consumed_height = if large_seen {
        enlarged_height(line_height)
    } else {
        line_height
    };

    LineLayoutResult {
        consumed_height,
        advance: cursor.x - x,
        runs: cursor.runs,
    }
}

struct RunCursor<'a, S: Surface> {
    surface: &'a mut S,
    fonts: &'a FontVariants<S::Font>,
    x: i32,
    y: i32,
    runs: usize,
}

impl<S: Surface> RunCursor<'_, S> {
    fn flush(&mut self, text: &str, style: StyleState) {
        if text.is_empty() {
            return;
        }
        self.surface.select_font(self.fonts.resolve(style));
        let width = self.surface.measure_text(text);
        self.surface.draw_text(self.x, self.y, text);
        self.x += width;
        self.runs += 1;
    }
}

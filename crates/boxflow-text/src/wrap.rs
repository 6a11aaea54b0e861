#![forbid(unsafe_code)]

//! Cell-width text wrapping.
//!
//! Lines never split a grapheme cluster, widths are counted in terminal
//! cells (CJK characters are two cells wide), and explicit newlines always
//! start a new line.
//!
//! # Example
//! ```
//! use boxflow_text::wrap::{WrapMode, wrap_lines};
//!
//! let lines = wrap_lines("Hello world foo bar", Some(10), WrapMode::Word);
//! assert_eq!(lines, vec!["Hello", "world foo", "bar"]);
//!
//! let lines = wrap_lines("Supercalifragilistic", Some(10), WrapMode::WordChar);
//! assert_eq!(lines, vec!["Supercalif", "ragilistic"]);
//! ```

use smallvec::SmallVec;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// How a paragraph is broken when it is wider than the limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WrapMode {
    /// Only explicit newlines break lines.
    None,
    /// Break between words; a word wider than the limit gets its own line.
    Word,
    /// Break between grapheme clusters.
    Char,
    /// Break between words, splitting words that cannot fit on any line.
    #[default]
    WordChar,
}

/// Wrap `text` to at most `width` cells per line.
///
/// `None` means unlimited: each paragraph becomes one line. A limit of zero
/// is treated as one cell. Trailing whitespace is trimmed from every line,
/// and whitespace at a wrap point is dropped rather than starting a line of
/// its own. The result always has at least one line.
#[must_use]
pub fn wrap_lines(text: &str, width: Option<usize>, mode: WrapMode) -> Vec<String> {
    let mut lines = Vec::new();
    for_each_line(text, width, mode, &mut |line| lines.push(line.to_string()));
    lines
}

/// Cell widths of the lines [`wrap_lines`] would produce, without
/// allocating the lines themselves.
#[must_use]
pub fn line_widths(text: &str, width: Option<usize>, mode: WrapMode) -> SmallVec<[usize; 8]> {
    let mut widths = SmallVec::new();
    for_each_line(text, width, mode, &mut |line| widths.push(line.width()));
    widths
}

/// Display width of `text` in cells.
#[inline]
#[must_use]
pub fn display_width(text: &str) -> usize {
    text.width()
}

fn for_each_line(text: &str, width: Option<usize>, mode: WrapMode, emit: &mut dyn FnMut(&str)) {
    let width = width.map(|w| w.max(1));
    for paragraph in text.split('\n') {
        let paragraph = paragraph.strip_suffix('\r').unwrap_or(paragraph);
        match (width, mode) {
            (None, _) | (_, WrapMode::None) => emit(paragraph.trim_end()),
            (Some(width), WrapMode::Char) => wrap_graphemes(paragraph, width, emit),
            (Some(width), WrapMode::Word) => wrap_words(paragraph, width, false, emit),
            (Some(width), WrapMode::WordChar) => wrap_words(paragraph, width, true, emit),
        }
    }
}

/// The line being filled.
#[derive(Default)]
struct Line {
    text: String,
    width: usize,
    /// At least one line of the paragraph went out.
    emitted: bool,
    /// A break happened; whitespace before the next word is dropped.
    broken: bool,
}

impl Line {
    fn push(&mut self, piece: &str, width: usize) {
        self.text.push_str(piece);
        self.width += width;
    }

    fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn is_blank(&self) -> bool {
        is_blank(&self.text)
    }

    fn fits(&self, width: usize, limit: usize) -> bool {
        self.width + width <= limit
    }

    fn clear(&mut self) {
        self.text.clear();
        self.width = 0;
    }

    fn flush(&mut self, emit: &mut dyn FnMut(&str)) {
        emit(self.text.trim_end());
        self.clear();
        self.emitted = true;
        self.broken = true;
    }

    /// End the line at a wrap point. A line holding only whitespace is
    /// discarded instead of becoming an empty line.
    fn wrap(&mut self, emit: &mut dyn FnMut(&str)) {
        if self.is_blank() {
            self.clear();
            self.broken = true;
        } else {
            self.flush(emit);
        }
    }

    /// Emit what is left. An empty paragraph still yields one empty line.
    fn finish(&mut self, emit: &mut dyn FnMut(&str)) {
        if !self.is_blank() || !self.emitted {
            self.flush(emit);
        }
    }

    fn skips(&self, blank: bool) -> bool {
        blank && self.broken && self.is_empty()
    }
}

fn wrap_graphemes(paragraph: &str, limit: usize, emit: &mut dyn FnMut(&str)) {
    let mut line = Line::default();
    for grapheme in paragraph.graphemes(true) {
        let width = grapheme.width();
        let blank = is_blank(grapheme);
        if line.skips(blank) {
            continue;
        }
        if !line.fits(width, limit) {
            if blank {
                line.wrap(emit);
                continue;
            }
            if !line.is_empty() {
                line.wrap(emit);
            }
        }
        line.push(grapheme, width);
    }
    line.finish(emit);
}

fn wrap_words(paragraph: &str, limit: usize, split_long: bool, emit: &mut dyn FnMut(&str)) {
    let mut line = Line::default();
    for word in split_words(paragraph) {
        let width = word.width();
        let blank = is_blank(word);
        if line.skips(blank) {
            continue;
        }
        if line.fits(width, limit) {
            line.push(word, width);
            continue;
        }
        // Whitespace at a break is dropped.
        line.wrap(emit);
        if blank {
            continue;
        }
        if width <= limit {
            line.push(word, width);
        } else if split_long {
            for grapheme in word.graphemes(true) {
                let width = grapheme.width();
                if !line.fits(width, limit) && !line.is_empty() {
                    line.flush(emit);
                }
                line.push(grapheme, width);
            }
        } else {
            line.push(word, width);
            line.flush(emit);
        }
    }
    line.finish(emit);
}

/// Alternating runs of whitespace and non-whitespace graphemes.
fn split_words(text: &str) -> SmallVec<[&str; 16]> {
    let mut words = SmallVec::new();
    let mut start = 0;
    let mut in_blank = None;
    for (offset, grapheme) in text.grapheme_indices(true) {
        let blank = is_blank(grapheme);
        if in_blank.is_some_and(|previous| previous != blank) {
            words.push(&text[start..offset]);
            start = offset;
        }
        in_blank = Some(blank);
    }
    if start < text.len() {
        words.push(&text[start..]);
    }
    words
}

fn is_blank(text: &str) -> bool {
    text.chars().all(char::is_whitespace)
}

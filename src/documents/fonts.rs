//! Base-14 Helvetica fonts and their advance widths.
//!
//! Only the standard PDF fonts are used, so nothing is embedded. Widths are the
//! AFM advance widths (1/1000 em) for the printable ASCII range; anything else is
//! measured as an average glyph.

/// Fonts available to layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Font {
    Regular,
    Bold,
    Italic,
}

impl Font {
    pub const ALL: [Font; 3] = [Font::Regular, Font::Bold, Font::Italic];

    /// Resource name used in page content streams.
    pub fn resource_name(&self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
            Font::Italic => "F3",
        }
    }

    /// PostScript name of the base-14 font.
    pub fn base_font(&self) -> &'static str {
        match self {
            Font::Regular => "Helvetica",
            Font::Bold => "Helvetica-Bold",
            Font::Italic => "Helvetica-Oblique",
        }
    }

    fn widths(&self) -> &'static [u16; 95] {
        match self {
            // Oblique shares the upright metrics.
            Font::Regular | Font::Italic => &HELVETICA_WIDTHS,
            Font::Bold => &HELVETICA_BOLD_WIDTHS,
        }
    }

    fn char_width(&self, ch: char) -> u16 {
        let code = ch as u32;
        if (32..127).contains(&code) {
            self.widths()[(code - 32) as usize]
        } else {
            FALLBACK_WIDTH
        }
    }

    /// Width of `text` in points at `size`.
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        let units: u32 = text.chars().map(|ch| self.char_width(ch) as u32).sum();
        units as f32 * size / 1000.0
    }
}

const FALLBACK_WIDTH: u16 = 556;

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Characters WinAnsi places in 0x80..=0x9F, indexed by `byte - 0x80`.
/// `None` marks the five unassigned slots.
const WIN_ANSI_HIGH: [Option<char>; 32] = [
    Some('\u{20ac}'), None, Some('\u{201a}'), Some('\u{0192}'),
    Some('\u{201e}'), Some('\u{2026}'), Some('\u{2020}'), Some('\u{2021}'),
    Some('\u{02c6}'), Some('\u{2030}'), Some('\u{0160}'), Some('\u{2039}'),
    Some('\u{0152}'), None, Some('\u{017d}'), None,
    None, Some('\u{2018}'), Some('\u{2019}'), Some('\u{201c}'),
    Some('\u{201d}'), Some('\u{2022}'), Some('\u{2013}'), Some('\u{2014}'),
    Some('\u{02dc}'), Some('\u{2122}'), Some('\u{0161}'), Some('\u{203a}'),
    Some('\u{0153}'), None, Some('\u{017e}'), Some('\u{0178}'),
];

fn win_ansi_byte(ch: char) -> Option<u8> {
    match ch as u32 {
        c if c < 0x20 || c == 0x7f => Some(b' '),
        c if c < 0x80 || (0xa0..=0xff).contains(&c) => Some(c as u8),
        _ => WIN_ANSI_HIGH
            .iter()
            .position(|&mapped| mapped == Some(ch))
            .map(|index| 0x80 + index as u8),
    }
}

/// Encode text for a WinAnsi-encoded base-14 font.
///
/// Latin-1 letters keep their code point; curly quotes and dashes map into the
/// 0x80..=0x9F block. Anything else, C1 controls included, becomes `?`. Other control
/// characters (including newlines) become spaces.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(|ch| win_ansi_byte(ch).unwrap_or(b'?')).collect()
}

/// Greedy word wrap so that no line is wider than `max_width`.
///
/// A single word wider than the line is kept whole on its own line.
pub fn wrap_text(text: &str, font: Font, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if font.text_width(&candidate, size) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_width_uses_afm_metrics() {
        // "A" is 667 units in Helvetica, 722 in Helvetica-Bold.
        assert!((Font::Regular.text_width("A", 10.0) - 6.67).abs() < 1e-4);
        assert!((Font::Bold.text_width("A", 10.0) - 7.22).abs() < 1e-4);
        assert_eq!(Font::Regular.text_width("", 12.0), 0.0);
    }

    #[test]
    fn test_encode_win_ansi_replaces_unsupported_characters() {
        assert_eq!(encode_win_ansi("Caf\u{e9}"), vec![b'C', b'a', b'f', 0xe9]);
        assert_eq!(encode_win_ansi("\u{20b9}5"), b"?5".to_vec());
        assert_eq!(encode_win_ansi("a\nb"), b"a b".to_vec());
    }

    #[test]
    fn test_encode_win_ansi_maps_typographic_punctuation() {
        assert_eq!(encode_win_ansi("O\u{2019}Brien"), b"O\x92Brien".to_vec());
        assert_eq!(encode_win_ansi("5\u{2013}10"), b"5\x9610".to_vec());
        assert_eq!(encode_win_ansi("\u{20ac}9"), b"\x809".to_vec());
        assert_eq!(encode_win_ansi("\u{2022} \u{201c}ok\u{201d}"), b"\x95 \x93ok\x94".to_vec());
        assert_eq!(encode_win_ansi("\u{0085}\u{0092}"), b"??".to_vec());
    }

    #[test]
    fn test_wrap_text_respects_width() {
        let text = "We hereby certify that the instrument has been calibrated";
        let lines = wrap_text(text, Font::Regular, 10.0, 120.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(Font::Regular.text_width(line, 10.0) <= 120.0 || !line.contains(' '));
        }
        assert_eq!(lines.join(" "), text);
    }
}

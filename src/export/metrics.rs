//! Font metrics for the two base-14 fonts used in reports
//!
//! Widths come from the Adobe Helvetica and Helvetica-Bold AFM files and are
//! expressed in 1/1000 of the font size. Both fonts use WinAnsiEncoding, so
//! the tables cover printable ASCII plus the upper half of that encoding.
//! Characters outside it are written as `?` by [`escape_pdf_string`] and
//! measured the same way, so measured and drawn text always agree.

/// Points per millimetre
pub const PT_PER_MM: f64 = 72.0 / 25.4;

/// Fonts registered in every generated document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Helvetica,
    HelveticaBold,
}

impl Font {
    /// Resource name used in content streams
    pub fn resource_name(&self) -> &'static str {
        match self {
            Font::Helvetica => "F1",
            Font::HelveticaBold => "F2",
        }
    }

    /// PostScript base font name
    pub fn base_font(&self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
        }
    }

    fn widths(&self) -> &'static [u16; 224] {
        match self {
            Font::Helvetica => &HELVETICA_WIDTHS,
            Font::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
        }
    }

    /// Advance width of a single character in glyph units
    pub fn glyph_width(&self, c: char) -> u16 {
        let code = match win_ansi(c) {
            Some(code) => code,
            None => b'?',
        };
        self.widths()[(code - 32) as usize]
    }

    /// Rendered width of `text` at `size_pt`, in millimetres
    pub fn text_width_mm(&self, text: &str, size_pt: f64) -> f64 {
        let units: u32 = text.chars().map(|c| self.glyph_width(c) as u32).sum();
        units as f64 / 1000.0 * size_pt / PT_PER_MM
    }
}

/// WinAnsi code for a character, or `None` if it will be replaced by `?` on
/// output
fn win_ansi(c: char) -> Option<u8> {
    let code = match c {
        ' '..='~' | '\u{a0}'..='\u{ff}' => c as u8,
        '\t' => b' ',
        '\u{20ac}' => 0x80,
        '\u{201a}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201e}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02c6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8a,
        '\u{2039}' => 0x8b,
        '\u{0152}' => 0x8c,
        '\u{017d}' => 0x8e,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201c}' => 0x93,
        '\u{201d}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{02dc}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9a,
        '\u{203a}' => 0x9b,
        '\u{0153}' => 0x9c,
        '\u{017e}' => 0x9e,
        '\u{0178}' => 0x9f,
        _ => return None,
    };
    Some(code)
}

// 32 (space) ..= 255 (ydieresis). Codes with no WinAnsi glyph are 0 and are
// never produced by `win_ansi`.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 224] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, 0,
    556, 0, 222, 556, 333, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0,
    0, 222, 222, 333, 333, 350, 556, 1000, 333, 1000, 500, 333, 944, 0, 500, 667,
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 224] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, 0,
    556, 0, 278, 556, 500, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0,
    0, 278, 278, 500, 500, 350, 556, 1000, 333, 1000, 556, 333, 944, 0, 500, 667,
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278,
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
];

/// Escape special characters for PDF literal strings.
///
/// Text is written in WinAnsi: bytes above 0x7f become octal escapes and
/// characters with no WinAnsi code become `?`.
pub fn escape_pdf_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '(' => result.push_str("\\("),
            ')' => result.push_str("\\)"),
            '\n' | '\r' => result.push(' '),
            _ => match win_ansi(c) {
                Some(code) if code >= 0x80 => result.push_str(&format!("\\{:03o}", code)),
                Some(code) => result.push(code as char),
                None => result.push('?'),
            },
        }
    }
    result
}

/// Word-wrap `text` so that no line is wider than `max_width_mm` when set in
/// `font` at `size_pt`.
///
/// Words wider than a full line are broken at character boundaries. Embedded
/// newlines force a break. Always returns at least one line.
pub fn wrap_text(text: &str, font: Font, size_pt: f64, max_width_mm: f64) -> Vec<String> {
    let space = font.text_width_mm(" ", size_pt);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_width = 0.0;

        for word in paragraph.split_whitespace() {
            let word_width = font.text_width_mm(word, size_pt);

            if !current.is_empty() && current_width + space + word_width <= max_width_mm {
                current.push(' ');
                current.push_str(word);
                current_width += space + word_width;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0.0;
            }

            if word_width <= max_width_mm {
                current.push_str(word);
                current_width = word_width;
            } else {
                // Hard-break an over-long token (URLs, IDs)
                for c in word.chars() {
                    let w = font.text_width_mm(c.encode_utf8(&mut [0; 4]), size_pt);
                    if !current.is_empty() && current_width + w > max_width_mm {
                        lines.push(std::mem::take(&mut current));
                        current_width = 0.0;
                    }
                    current.push(c);
                    current_width += w;
                }
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_widths() {
        assert_eq!(Font::Helvetica.glyph_width(' '), 278);
        assert_eq!(Font::Helvetica.glyph_width('W'), 944);
        assert_eq!(Font::Helvetica.glyph_width('i'), 222);
        assert_eq!(Font::HelveticaBold.glyph_width('i'), 278);
        assert_eq!(Font::HelveticaBold.glyph_width('@'), 975);
        assert_eq!(Font::Helvetica.glyph_width('é'), 556);
        assert_eq!(Font::Helvetica.glyph_width('Ü'), 722);
        assert_eq!(Font::HelveticaBold.glyph_width('ñ'), 611);
        assert_eq!(Font::HelveticaBold.glyph_width('€'), 556);
        assert_eq!(Font::Helvetica.glyph_width('\u{2014}'), 1000);
        // Unmapped characters measure like the '?' they are written as
        assert_eq!(
            Font::Helvetica.glyph_width('中'),
            Font::Helvetica.glyph_width('?')
        );
    }

    #[test]
    fn test_text_width_mm() {
        // 1000 units at 10pt is 10pt wide
        let w = Font::Helvetica.text_width_mm("mmm", 10.0);
        let expected = 3.0 * 833.0 / 1000.0 * 10.0 / PT_PER_MM;
        assert!((w - expected).abs() < 1e-9);
        assert!(
            Font::HelveticaBold.text_width_mm("Name: ", 10.0)
                > Font::Helvetica.text_width_mm("Name: ", 10.0)
        );
    }

    #[test]
    fn test_wrap_is_glyph_aware() {
        let narrow = "il ".repeat(40);
        let wide = "MW ".repeat(40);
        let narrow_lines = wrap_text(&narrow, Font::Helvetica, 10.0, 60.0);
        let wide_lines = wrap_text(&wide, Font::Helvetica, 10.0, 60.0);
        assert!(narrow_lines.len() < wide_lines.len());
        assert!(narrow_lines[0].len() > wide_lines[0].len());

        for line in narrow_lines.iter().chain(wide_lines.iter()) {
            assert!(Font::Helvetica.text_width_mm(line, 10.0) <= 60.0);
        }
    }

    #[test]
    fn test_wrap_short_text_single_line() {
        let lines = wrap_text("Short", Font::Helvetica, 10.0, 100.0);
        assert_eq!(lines, vec!["Short".to_string()]);

        let lines = wrap_text("", Font::Helvetica, 10.0, 100.0);
        assert_eq!(lines, vec![String::new()]);
    }

    #[test]
    fn test_wrap_breaks_long_tokens() {
        let token = "x".repeat(200);
        let lines = wrap_text(&token, Font::Helvetica, 10.0, 40.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), token);
        for line in &lines {
            assert!(Font::Helvetica.text_width_mm(line, 10.0) <= 40.0);
        }
    }

    #[test]
    fn test_wrap_honours_newlines() {
        let lines = wrap_text("House 12\nMG Road", Font::Helvetica, 10.0, 150.0);
        assert_eq!(lines, vec!["House 12".to_string(), "MG Road".to_string()]);
    }

    #[test]
    fn test_escape_pdf_string() {
        assert_eq!(escape_pdf_string("Hello"), "Hello");
        assert_eq!(escape_pdf_string("(test)"), "\\(test\\)");
        assert_eq!(escape_pdf_string("back\\slash"), "back\\\\slash");
        assert_eq!(escape_pdf_string("Zoë"), "Zo\\353");
        assert_eq!(escape_pdf_string("José Müller"), "Jos\\351 M\\374ller");
        assert_eq!(escape_pdf_string("€ 500"), "\\200 500");
        assert_eq!(escape_pdf_string("O\u{2019}Brien"), "O\\222Brien");
        assert_eq!(escape_pdf_string("李 Wei"), "? Wei");
    }
}

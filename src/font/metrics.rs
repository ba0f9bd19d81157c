//! Glyph widths for the standard PDF fonts, from the Adobe AFM files.
//!
//! Widths are in 1/1000 em. Only the printable ASCII range is tabulated;
//! the handful of WinAnsi punctuation glyphs résumés actually use (dashes,
//! bullets, curly quotes) are listed separately and everything else gets the
//! font's average width.

use super::StandardFont;

/// Helvetica, U+0020..=U+007E.
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold, U+0020..=U+007E.
#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Width table plus fallbacks for one standard font.
pub struct StandardFontMetrics {
    ascii: Option<&'static [u16; 95]>,
    /// Used for every glyph when `ascii` is `None` (monospaced fonts).
    fixed: u16,
    pub ascent: i16,
    pub descent: i16,
}

impl StandardFontMetrics {
    fn width_units(&self, ch: char) -> u16 {
        let Some(table) = self.ascii else {
            return self.fixed;
        };
        let cp = ch as u32;
        if (0x20..=0x7E).contains(&cp) {
            return table[(cp - 0x20) as usize];
        }
        match ch {
            '\u{00A0}' => table[0],
            '\u{2013}' => 556,
            '\u{2014}' | '\u{2026}' | '\u{2030}' => 1000,
            '\u{2022}' => 350,
            '\u{00B7}' => 278,
            '\u{2018}' | '\u{2019}' | '\u{201A}' => 222,
            '\u{201C}' | '\u{201D}' | '\u{201E}' => 333,
            '\u{00A9}' | '\u{00AE}' => 737,
            '\u{20AC}' => 556,
            // Accented Latin letters: same advance as the base letter, close
            // enough for line breaking.
            c if c.is_alphabetic() && cp < 0x0180 => {
                if c.is_uppercase() {
                    table[(b'A' - 0x20) as usize]
                } else {
                    table[(b'a' - 0x20) as usize]
                }
            }
            _ => 556,
        }
    }

    /// Advance width of a character in points.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        self.width_units(ch) as f64 / 1000.0 * font_size
    }

    pub fn measure_string(&self, text: &str, font_size: f64) -> f64 {
        text.chars().map(|ch| self.char_width(ch, font_size)).sum()
    }
}

impl StandardFont {
    /// AFM metrics for this font. Times has no table of its own and borrows
    /// Helvetica's widths, which overestimate slightly and so never overflow.
    pub fn metrics(&self) -> StandardFontMetrics {
        match self {
            Self::Helvetica | Self::HelveticaOblique => StandardFontMetrics {
                ascii: Some(&HELVETICA),
                fixed: 556,
                ascent: 718,
                descent: -207,
            },
            Self::HelveticaBold | Self::HelveticaBoldOblique => StandardFontMetrics {
                ascii: Some(&HELVETICA_BOLD),
                fixed: 556,
                ascent: 718,
                descent: -207,
            },
            Self::TimesRoman | Self::TimesItalic => StandardFontMetrics {
                ascii: Some(&HELVETICA),
                fixed: 556,
                ascent: 683,
                descent: -217,
            },
            Self::TimesBold | Self::TimesBoldItalic => StandardFontMetrics {
                ascii: Some(&HELVETICA_BOLD),
                fixed: 556,
                ascent: 683,
                descent: -217,
            },
            Self::Courier
            | Self::CourierBold
            | Self::CourierOblique
            | Self::CourierBoldOblique => StandardFontMetrics {
                ascii: None,
                fixed: 600,
                ascent: 629,
                descent: -157,
            },
        }
    }
}

//! # BiDi Text Support
//!
//! Right-to-left handling for Arabic, Hebrew and friends. The document
//! direction comes from the UI language (or an explicit flag); individual
//! lines are converted from logical to visual order with the UAX#9
//! implementation in `unicode-bidi` before they reach the canvas, because
//! PDF text operators always advance left to right.
//!
//! Glyphs are not shaped: Arabic letters are drawn in their isolated forms.

use std::borrow::Cow;

use unicode_bidi::{BidiInfo, Level};
use unicode_script::{Script, UnicodeScript};

use crate::style::Direction;

/// Primary language subtags written right to left.
const RTL_LANGS: [&str; 10] = ["ar", "he", "fa", "ur", "ps", "yi", "dv", "ckb", "sd", "ug"];

/// Whether a BCP 47 language tag names a right-to-left language.
pub fn is_rtl_lang(lang: &str) -> bool {
    let primary = lang
        .trim()
        .split(['-', '_'])
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();
    RTL_LANGS.contains(&primary.as_str())
}

/// Document direction: the explicit flag wins, otherwise the language decides.
pub fn direction_for(lang: &str, rtl_flag: bool) -> Direction {
    if rtl_flag || is_rtl_lang(lang) {
        Direction::Rtl
    } else {
        Direction::Ltr
    }
}

fn is_rtl_script(ch: char) -> bool {
    matches!(
        ch.script(),
        Script::Arabic | Script::Hebrew | Script::Syriac | Script::Thaana | Script::Nko
    )
}

/// Whether the text contains characters from a right-to-left script and so
/// needs a font that covers one.
pub fn needs_rtl_font(text: &str) -> bool {
    text.chars().any(is_rtl_script)
}

/// Reorder one line of text from logical to visual order.
///
/// Pure left-to-right text in a left-to-right document comes back borrowed.
pub fn visual_order(text: &str, direction: Direction) -> Cow<'_, str> {
    if text.is_empty() || (!direction.is_rtl() && !needs_rtl_font(text)) {
        return Cow::Borrowed(text);
    }

    let level = if direction.is_rtl() {
        Level::rtl()
    } else {
        Level::ltr()
    };
    let info = BidiInfo::new(text, Some(level));
    let mut out = String::with_capacity(text.len());
    for para in &info.paragraphs {
        out.push_str(&info.reorder_line(para, para.range.clone()));
    }
    Cow::Owned(out)
}

//! # Text Layout
//!
//! Greedy line breaking over UAX#14 break opportunities, with real font
//! metrics from the [`FontContext`]. Words wider than the whole line are
//! hyphenated at syllable boundaries when the language is supported, and
//! split at the last character that fits otherwise.

pub mod bidi;

use crate::font::FontContext;
use unicode_linebreak::{linebreaks, BreakOpportunity};

/// Font selection for one run of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub family: String,
    pub weight: u32,
    pub italic: bool,
    pub size: f64,
}

impl TextStyle {
    pub fn regular(family: &str, size: f64) -> Self {
        Self {
            family: family.to_string(),
            weight: 400,
            italic: false,
            size,
        }
    }

    pub fn bold(family: &str, size: f64) -> Self {
        Self {
            weight: 700,
            ..Self::regular(family, size)
        }
    }
}

/// A line of text after line-breaking.
#[derive(Debug, Clone, PartialEq)]
pub struct BrokenLine {
    /// Line text with trailing whitespace removed.
    pub text: String,
    /// Width of `text` in points.
    pub width: f64,
}

/// Compute UAX#14 break opportunities indexed by char position.
///
/// Entry `i` is the opportunity to break *before* `char[i]`. Index 0 is
/// always `None`.
fn compute_break_opportunities(text: &str) -> Vec<Option<BreakOpportunity>> {
    let char_count = text.chars().count();
    let mut result = vec![None; char_count];

    let mut byte_to_char = vec![0usize; text.len() + 1];
    for (char_idx, (byte_idx, _)) in text.char_indices().enumerate() {
        byte_to_char[byte_idx] = char_idx;
    }
    byte_to_char[text.len()] = char_count;

    for (byte_offset, opp) in linebreaks(text) {
        let char_idx = byte_to_char[byte_offset];
        if char_idx < char_count {
            result[char_idx] = Some(opp);
        }
    }

    result
}

/// Map a BCP 47 language tag to a `hypher::Lang`. `None` disables
/// hyphenation (unsupported language, or a right-to-left script).
fn resolve_hypher_lang(lang: Option<&str>) -> Option<hypher::Lang> {
    let tag = match lang {
        Some(t) => t,
        None => return Some(hypher::Lang::English),
    };
    let primary = tag.split(['-', '_']).next().unwrap_or(tag).to_lowercase();
    match primary.as_str() {
        "af" => Some(hypher::Lang::Afrikaans),
        "bg" => Some(hypher::Lang::Bulgarian),
        "ca" => Some(hypher::Lang::Catalan),
        "cs" => Some(hypher::Lang::Czech),
        "da" => Some(hypher::Lang::Danish),
        "de" => Some(hypher::Lang::German),
        "el" => Some(hypher::Lang::Greek),
        "en" => Some(hypher::Lang::English),
        "es" => Some(hypher::Lang::Spanish),
        "et" => Some(hypher::Lang::Estonian),
        "fi" => Some(hypher::Lang::Finnish),
        "fr" => Some(hypher::Lang::French),
        "hr" => Some(hypher::Lang::Croatian),
        "hu" => Some(hypher::Lang::Hungarian),
        "it" => Some(hypher::Lang::Italian),
        "lt" => Some(hypher::Lang::Lithuanian),
        "nb" | "nn" | "no" => Some(hypher::Lang::Norwegian),
        "nl" => Some(hypher::Lang::Dutch),
        "pl" => Some(hypher::Lang::Polish),
        "pt" => Some(hypher::Lang::Portuguese),
        "ru" => Some(hypher::Lang::Russian),
        "sk" => Some(hypher::Lang::Slovak),
        "sl" => Some(hypher::Lang::Slovenian),
        "sr" => Some(hypher::Lang::Serbian),
        "sv" => Some(hypher::Lang::Swedish),
        "tr" => Some(hypher::Lang::Turkish),
        "uk" => Some(hypher::Lang::Ukrainian),
        _ => None,
    }
}

fn is_newline(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

#[derive(Default)]
pub struct TextLayout;

impl TextLayout {
    pub fn new() -> Self {
        Self
    }

    /// Break `text` into lines no wider than `max_width`.
    ///
    /// Explicit newlines always break. Empty input gives no lines.
    pub fn break_into_lines(
        &self,
        fonts: &FontContext,
        text: &str,
        max_width: f64,
        style: &TextStyle,
        lang: Option<&str>,
    ) -> Vec<BrokenLine> {
        if text.is_empty() {
            return Vec::new();
        }

        let chars: Vec<char> = text.chars().collect();
        let widths: Vec<f64> = chars
            .iter()
            .map(|&ch| {
                if is_newline(ch) {
                    0.0
                } else {
                    fonts.char_width(ch, &style.family, style.weight, style.italic, style.size)
                }
            })
            .collect();
        let hyphen_width = fonts.char_width('-', &style.family, style.weight, style.italic, style.size);
        let break_opps = compute_break_opportunities(text);

        let mut lines = Vec::new();
        let mut line_start = 0;
        let mut line_width = 0.0;
        let mut last_break_point: Option<usize> = None;

        for (i, &ch) in chars.iter().enumerate() {
            if i > 0 {
                match break_opps[i] {
                    Some(BreakOpportunity::Mandatory) => {
                        let end = if is_newline(chars[i - 1]) { i - 1 } else { i };
                        lines.push(make_line(&chars[line_start..end], &widths[line_start..end]));
                        line_start = i;
                        line_width = 0.0;
                        last_break_point = None;
                    }
                    Some(BreakOpportunity::Allowed) => last_break_point = Some(i - 1),
                    None => {}
                }
            }

            if is_newline(ch) {
                continue;
            }

            let char_width = widths[i];
            if line_width + char_width > max_width && line_start < i {
                if let Some(bp) = last_break_point.filter(|&bp| bp >= line_start) {
                    lines.push(make_line(&chars[line_start..=bp], &widths[line_start..=bp]));
                    line_start = bp + 1;
                    line_width = widths[line_start..=i].iter().sum();
                    last_break_point = None;
                    continue;
                }

                if let Some((line, new_start)) =
                    self.try_hyphenate_word(&chars, &widths, line_start, i, max_width, hyphen_width, lang)
                {
                    lines.push(line);
                    line_start = new_start;
                    line_width = widths[line_start..=i].iter().sum();
                    last_break_point = None;
                    continue;
                }

                // No break point: split the word here.
                lines.push(make_line(&chars[line_start..i], &widths[line_start..i]));
                line_start = i;
                line_width = char_width;
                last_break_point = None;
                continue;
            }

            line_width += char_width;
        }

        if line_start < chars.len() {
            lines.push(make_line(&chars[line_start..], &widths[line_start..]));
        }

        lines
    }

    /// Hyphenate the word that overflows at `overflow_at`, breaking after
    /// the rightmost syllable that still fits together with a hyphen.
    #[allow(clippy::too_many_arguments)]
    fn try_hyphenate_word(
        &self,
        chars: &[char],
        widths: &[f64],
        line_start: usize,
        overflow_at: usize,
        max_width: f64,
        hyphen_width: f64,
        lang: Option<&str>,
    ) -> Option<(BrokenLine, usize)> {
        let mut word_start = overflow_at;
        while word_start > line_start && !chars[word_start - 1].is_whitespace() {
            word_start -= 1;
        }
        if overflow_at <= word_start {
            return None;
        }

        let hypher_lang = resolve_hypher_lang(lang)?;
        let word: String = chars[word_start..overflow_at].iter().collect();
        let syllables: Vec<&str> = hypher::hyphenate(&word, hypher_lang).collect();
        if syllables.len() < 2 {
            return None;
        }

        let prefix_width: f64 = widths[line_start..word_start].iter().sum();
        let mut best_break = None;
        let mut offset = word_start;
        for syllable in &syllables[..syllables.len() - 1] {
            offset += syllable.chars().count();
            let part_width: f64 = widths[word_start..offset].iter().sum();
            if prefix_width + part_width + hyphen_width <= max_width {
                best_break = Some(offset);
            }
        }
        let break_at = best_break?;

        let mut line_chars = chars[line_start..break_at].to_vec();
        let mut line_widths = widths[line_start..break_at].to_vec();
        line_chars.push('-');
        line_widths.push(hyphen_width);
        Some((make_line(&line_chars, &line_widths), break_at))
    }
}

/// Build a line, dropping trailing whitespace from both text and width.
fn make_line(chars: &[char], widths: &[f64]) -> BrokenLine {
    let mut end = chars.len();
    while end > 0 && chars[end - 1].is_whitespace() {
        end -= 1;
    }
    BrokenLine {
        text: chars[..end].iter().collect(),
        width: widths[..end].iter().sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style() -> TextStyle {
        TextStyle::regular("Helvetica", 10.0)
    }

    #[test]
    fn single_line_fits() {
        let fonts = FontContext::new();
        let lines = TextLayout::new().break_into_lines(&fonts, "Hello world", 500.0, &style(), None);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Hello world");
        let expected = fonts.measure_string("Hello world", "Helvetica", 400, false, 10.0);
        assert!((lines[0].width - expected).abs() < 1e-9);
    }

    #[test]
    fn breaks_at_spaces() {
        let fonts = FontContext::new();
        let lines = TextLayout::new().break_into_lines(&fonts, "alpha beta gamma delta", 60.0, &style(), None);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.width <= 60.0, "{:?}", line);
            assert!(!line.text.ends_with(' '));
        }
        let joined: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(joined.join(" "), "alpha beta gamma delta");
    }

    #[test]
    fn explicit_newlines_break() {
        let fonts = FontContext::new();
        let lines = TextLayout::new().break_into_lines(&fonts, "one\ntwo\n\nthree", 500.0, &style(), None);
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two", "", "three"]);
    }

    #[test]
    fn empty_text_has_no_lines() {
        let fonts = FontContext::new();
        assert!(TextLayout::new().break_into_lines(&fonts, "", 100.0, &style(), None).is_empty());
    }

    #[test]
    fn long_word_is_hyphenated() {
        let fonts = FontContext::new();
        let lines = TextLayout::new().break_into_lines(
            &fonts,
            "internationalization",
            50.0,
            &style(),
            Some("en"),
        );
        assert!(lines.len() > 1);
        assert!(lines[0].text.ends_with('-'));
        assert!(lines.iter().all(|l| l.width <= 50.0 + 1e-9));
    }

    #[test]
    fn unsupported_language_forces_split() {
        let fonts = FontContext::new();
        let lines = TextLayout::new().break_into_lines(&fonts, "abcdefghijklmnop", 30.0, &style(), Some("ar"));
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| !l.text.ends_with('-')));
        let joined: String = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(joined, "abcdefghijklmnop");
    }

    #[test]
    fn hypher_lang_mapping() {
        assert!(resolve_hypher_lang(Some("en-US")).is_some());
        assert!(resolve_hypher_lang(Some("de_DE")).is_some());
        assert!(resolve_hypher_lang(Some("ar")).is_none());
        assert!(resolve_hypher_lang(None).is_some());
    }
}

//! A flat list literal as typed into a text box: JSON (`["a", "b"]`) or
//! Python-style (`['a', "b", 3, None, True]`).

use std::iter::Peekable;
use std::str::Chars;

use serde_json::Value;

/// Parse a flat list literal into the text of its truthy elements.
///
/// Falsy elements (empty strings, zero, `False`/`false`, `None`/`null`) are
/// dropped. Returns `None` when the input is not a flat list literal.
pub fn parse_list_literal(src: &str) -> Option<Vec<String>> {
    if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(src) {
        return items.iter().map(json_item).collect::<Option<Vec<_>>>().map(truthy);
    }
    let mut parser = Parser {
        chars: src.trim().chars().peekable(),
    };
    let items = parser.list()?;
    Some(truthy(items))
}

/// A scalar element: `Some(None)` for falsy values.
type Item = Option<String>;

fn truthy(items: Vec<Item>) -> Vec<String> {
    items.into_iter().flatten().collect()
}

fn json_item(value: &Value) -> Option<Item> {
    Some(match value {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some("True".to_string()),
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => return None,
    })
}

struct Parser<'a> {
    chars: Peekable<Chars<'a>>,
}

impl Parser<'_> {
    fn list(&mut self) -> Option<Vec<Item>> {
        self.expect('[')?;
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.eat(']') {
                break;
            }
            items.push(self.item()?);
            self.skip_ws();
            if self.eat(',') {
                continue;
            }
            self.expect(']')?;
            break;
        }
        self.skip_ws();
        // Trailing garbage after the closing bracket.
        if self.chars.next().is_some() {
            return None;
        }
        Some(items)
    }

    fn item(&mut self) -> Option<Item> {
        match *self.chars.peek()? {
            q @ ('\'' | '"') => {
                self.chars.next();
                let s = self.string(q)?;
                Some((!s.is_empty()).then_some(s))
            }
            c if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => self.number(),
            c if c.is_ascii_alphabetic() => match self.word().as_str() {
                "True" => Some(Some("True".to_string())),
                "False" | "None" => Some(None),
                _ => None,
            },
            _ => None,
        }
    }

    fn string(&mut self, quote: char) -> Option<String> {
        let mut out = String::new();
        loop {
            match self.chars.next()? {
                c if c == quote => return Some(out),
                '\\' => match self.chars.next()? {
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    other => out.push(other),
                },
                c => out.push(c),
            }
        }
    }

    fn number(&mut self) -> Option<Item> {
        let mut text = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E' | '_') {
                text.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        let cleaned = text.replace('_', "");
        let value: f64 = cleaned.parse().ok()?;
        Some((value != 0.0).then(|| cleaned.trim_start_matches('+').to_string()))
    }

    fn word(&mut self) -> String {
        let mut word = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                word.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        word
    }

    fn skip_ws(&mut self) {
        while self.chars.peek().is_some_and(|c| c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn eat(&mut self, c: char) -> bool {
        if self.chars.peek() == Some(&c) {
            self.chars.next();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> Option<()> {
        self.skip_ws();
        self.eat(c).then_some(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Option<Vec<String>> {
        parse_list_literal(s)
    }

    #[test]
    fn python_quotes() {
        assert_eq!(parse("['a', \"b\"]"), Some(vec!["a".into(), "b".into()]));
        assert_eq!(parse(r"['it\'s']"), Some(vec!["it's".into()]));
    }

    #[test]
    fn falsy_elements_dropped() {
        assert_eq!(
            parse("['a', '', None, False, 0, True, 2]"),
            Some(vec!["a".into(), "True".into(), "2".into()])
        );
        assert_eq!(parse("[]"), Some(vec![]));
    }

    #[test]
    fn trailing_comma_allowed() {
        assert_eq!(parse("['a',]"), Some(vec!["a".into()]));
    }

    #[test]
    fn rejects_non_literals() {
        assert_eq!(parse("[unterminated"), None);
        assert_eq!(parse("['open]"), None);
        assert_eq!(parse("[a, b]"), None);
        assert_eq!(parse("[['nested']]"), None);
        assert_eq!(parse("['a'] extra"), None);
    }

    #[test]
    fn json_arrays() {
        assert_eq!(parse(r#"["x", null, "y"]"#), Some(vec!["x".into(), "y".into()]));
    }
}

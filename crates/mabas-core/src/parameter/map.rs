//! Ordered parameter map and its text format.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Syntax error in a parameter file, with the 1-based line it occurred on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterParseError {
    #[error("line {line}: expected `(` to open an entry")]
    MissingOpen { line: usize },
    #[error("line {line}: entry is not closed with `)`")]
    Unclosed { line: usize },
    #[error("line {line}: unterminated string")]
    UnterminatedString { line: usize },
    #[error("line {line}: entry has no parameter name")]
    MissingKey { line: usize },
    #[error("line {line}: parameter name `{key}` must not be quoted")]
    QuotedKey { line: usize, key: String },
    #[error("line {line}: unexpected text after entry: `{text}`")]
    TrailingText { line: usize, text: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Bare(String),
    Quoted(String),
}

impl Token {
    fn into_string(self) -> String {
        match self {
            Token::Bare(s) | Token::Quoted(s) => s,
        }
    }
}

/// Ordered `key -> values` mapping in elastix's parameter-file format.
///
/// Keys keep their first-seen position. A key that appears twice in a file
/// takes the values of its last occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterMap {
    entries: Vec<(String, Vec<String>)>,
}

impl ParameterMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the text of a parameter file.
    ///
    /// Each non-blank line is either a `//` comment or one entry
    /// `(Key value value ...)`, optionally followed by a comment. Values are
    /// bare tokens or double-quoted strings; quotes are not kept.
    pub fn parse(text: &str) -> Result<Self, ParameterParseError> {
        let mut map = Self::new();
        for (i, raw) in text.lines().enumerate() {
            let line = i + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with("//") {
                continue;
            }
            let (key, values) = parse_entry(trimmed, line)?;
            map.insert(key, values);
        }
        Ok(map)
    }

    /// Render in elastix's format, one entry per line.
    ///
    /// Numeric values are written bare, everything else quoted.
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for (key, values) in &self.entries {
            text.push('(');
            text.push_str(key);
            for value in values {
                text.push(' ');
                if is_numeric(value) {
                    text.push_str(value);
                } else {
                    text.push('"');
                    text.push_str(value);
                    text.push('"');
                }
            }
            text.push_str(")\n");
        }
        text
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    /// First value of `key`.
    pub fn get_first(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.first()).map(String::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy with `key` set to `values`, replacing in place or appending.
    pub fn with<K, I, V>(mut self, key: K, values: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.insert(key.into(), values.into_iter().map(Into::into).collect());
        self
    }

    pub(crate) fn insert(&mut self, key: String, values: Vec<String>) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = values,
            None => self.entries.push((key, values)),
        }
    }
}

impl FromStr for ParameterMap {
    type Err = ParameterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ParameterMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<String>)> for ParameterMap {
    fn from_iter<T: IntoIterator<Item = (K, Vec<String>)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (key, values) in iter {
            map.insert(key.into(), values);
        }
        map
    }
}

fn is_numeric(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    value.parse::<f64>().is_ok() && !lower.contains("nan") && !lower.contains("inf")
}

fn parse_entry(trimmed: &str, line: usize) -> Result<(String, Vec<String>), ParameterParseError> {
    let body = trimmed
        .strip_prefix('(')
        .ok_or(ParameterParseError::MissingOpen { line })?;

    let mut tokens = Vec::new();
    let mut chars = body.char_indices().peekable();
    let mut rest = None;

    while let Some((pos, c)) = chars.next() {
        match c {
            ')' => {
                rest = Some(&body[pos + 1..]);
                break;
            }
            '"' => {
                let mut value = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    if c == '"' {
                        closed = true;
                        break;
                    }
                    value.push(c);
                }
                if !closed {
                    return Err(ParameterParseError::UnterminatedString { line });
                }
                tokens.push(Token::Quoted(value));
            }
            c if c.is_whitespace() => {}
            _ => {
                let mut value = String::from(c);
                while let Some(&(_, next)) = chars.peek() {
                    if next.is_whitespace() || next == ')' || next == '"' {
                        break;
                    }
                    value.push(next);
                    chars.next();
                }
                tokens.push(Token::Bare(value));
            }
        }
    }

    let rest = rest.ok_or(ParameterParseError::Unclosed { line })?.trim();
    if !rest.is_empty() && !rest.starts_with("//") {
        return Err(ParameterParseError::TrailingText {
            line,
            text: rest.to_string(),
        });
    }

    let mut tokens = tokens.into_iter();
    let key = match tokens.next() {
        Some(Token::Bare(key)) => key,
        Some(Token::Quoted(key)) => return Err(ParameterParseError::QuotedKey { line, key }),
        None => return Err(ParameterParseError::MissingKey { line }),
    };
    Ok((key, tokens.map(Token::into_string).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RIGID: &str = r#"// Rigid registration
(FixedInternalImagePixelType "float")
(Transform "EulerTransform")
(NumberOfResolutions 4)
(ImagePyramidSchedule 8 8 4  4 4 2  2 2 1  1 1 1)   // per level
(MaximumNumberOfIterations 250)

(DefaultPixelValue -1024)
(ResultImageFormat "nii.gz")
"#;

    #[test]
    fn test_parse_keeps_order_and_values() {
        let map = ParameterMap::parse(RIGID).unwrap();
        let keys: Vec<_> = map.keys().collect();
        assert_eq!(
            keys,
            vec![
                "FixedInternalImagePixelType",
                "Transform",
                "NumberOfResolutions",
                "ImagePyramidSchedule",
                "MaximumNumberOfIterations",
                "DefaultPixelValue",
                "ResultImageFormat",
            ]
        );
        assert_eq!(map.get_first("Transform"), Some("EulerTransform"));
        assert_eq!(map.get("ImagePyramidSchedule").unwrap().len(), 12);
        assert_eq!(map.get_first("DefaultPixelValue"), Some("-1024"));
    }

    #[test]
    fn test_to_text_quotes_only_strings() {
        let map = ParameterMap::parse(RIGID).unwrap();
        let text = map.to_text();
        assert!(text.contains("(Transform \"EulerTransform\")\n"));
        assert!(text.contains("(NumberOfResolutions 4)\n"));
        assert!(text.contains("(DefaultPixelValue -1024)\n"));
        assert_eq!(ParameterMap::parse(&text).unwrap(), map);
    }

    #[test]
    fn test_quoted_values_keep_spaces_and_slashes() {
        let map = ParameterMap::parse(r#"(InitialTransformParametersFileName "C://data/my run/tp.txt")"#).unwrap();
        assert_eq!(
            map.get_first("InitialTransformParametersFileName"),
            Some("C://data/my run/tp.txt")
        );
    }

    #[test]
    fn test_duplicate_key_last_wins_at_first_position() {
        let map = ParameterMap::parse("(A 1)\n(B 2)\n(A 3 4)\n").unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(map.get("A").unwrap(), &["3".to_string(), "4".to_string()]);
    }

    #[test]
    fn test_errors_carry_line_numbers() {
        assert_eq!(
            ParameterMap::parse("(A 1)\nB 2)").unwrap_err(),
            ParameterParseError::MissingOpen { line: 2 }
        );
        assert_eq!(
            ParameterMap::parse("\n\n(A 1").unwrap_err(),
            ParameterParseError::Unclosed { line: 3 }
        );
        assert_eq!(
            ParameterMap::parse("(A \"oops)").unwrap_err(),
            ParameterParseError::UnterminatedString { line: 1 }
        );
        assert_eq!(ParameterMap::parse("( )").unwrap_err(), ParameterParseError::MissingKey { line: 1 });
        assert!(matches!(
            ParameterMap::parse("(A 1) extra").unwrap_err(),
            ParameterParseError::TrailingText { line: 1, .. }
        ));
        assert!(matches!(
            ParameterMap::parse("(\"A\" 1)").unwrap_err(),
            ParameterParseError::QuotedKey { line: 1, .. }
        ));
    }

    #[test]
    fn test_with_replaces_or_appends() {
        let map = ParameterMap::new().with("A", ["1"]).with("B", ["x", "y"]).with("A", ["2"]);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get_first("A"), Some("2"));
        assert_eq!(map.to_text(), "(A 2)\n(B \"x\" \"y\")\n");
    }
}

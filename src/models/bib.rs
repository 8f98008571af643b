//! BibTeX entries and personal names

use serde::Serialize;
use std::collections::HashMap;

/// One `@type{key, ...}` entry
#[derive(Debug, Clone, Default, Serialize)]
pub struct BibEntry {
    pub key: String,
    /// Lower-cased entry type (`inproceedings`, `article`, ...)
    pub entry_type: String,
    /// Lower-cased field name to value, macros expanded, braces kept
    pub fields: HashMap<String, String>,
    pub authors: Vec<BibName>,
}

impl BibEntry {
    /// Field value or `""`
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn present(&self, name: &str) -> bool {
        !self.field(name).is_empty()
    }
}

/// A name split the way BibTeX does: `First von Last, Jr`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BibName {
    pub given: Vec<String>,
    pub von: Vec<String>,
    pub last: Vec<String>,
    pub jr: Vec<String>,
}

impl BibName {
    /// Parses one name in any of the three BibTeX layouts
    pub fn parse(name: &str) -> Self {
        let parts = split_top_level(name, |c| c == ',');
        let parts: Vec<Vec<String>> = parts.iter().map(|part| words(part)).collect();

        match parts.len() {
            0 => Self::default(),
            1 => Self::from_first_von_last(&parts[0]),
            2 => {
                let (von, last) = split_von_last(&parts[0]);
                Self {
                    given: parts[1].clone(),
                    von,
                    last,
                    jr: Vec::new(),
                }
            }
            _ => {
                let (von, last) = split_von_last(&parts[0]);
                Self {
                    given: parts[2..].concat(),
                    von,
                    last,
                    jr: parts[1].clone(),
                }
            }
        }
    }

    fn from_first_von_last(tokens: &[String]) -> Self {
        let Some((final_token, rest)) = tokens.split_last() else {
            return Self::default();
        };
        let von_start = rest.iter().position(|t| is_lowercase_word(t));
        match von_start {
            None => Self {
                given: rest.to_vec(),
                von: Vec::new(),
                last: vec![final_token.clone()],
                jr: Vec::new(),
            },
            Some(start) => {
                // the von part runs to the last lower-case word before the final token
                let end = rest
                    .iter()
                    .rposition(|t| is_lowercase_word(t))
                    .map(|idx| idx + 1)
                    .unwrap_or(start);
                let mut last = rest[end..].to_vec();
                last.push(final_token.clone());
                Self {
                    given: rest[..start].to_vec(),
                    von: rest[start..end].to_vec(),
                    last,
                    jr: Vec::new(),
                }
            }
        }
    }

    /// First given name
    pub fn first(&self) -> &str {
        self.given.first().map(String::as_str).unwrap_or("")
    }

    /// Remaining given names
    pub fn middle(&self) -> String {
        self.given.iter().skip(1).cloned().collect::<Vec<_>>().join(" ")
    }

    /// All given names
    pub fn given_names(&self) -> String {
        self.given.join(" ")
    }

    /// von part plus last name, e.g. `van Beethoven`
    pub fn surname(&self) -> String {
        self.von
            .iter()
            .chain(self.last.iter())
            .cloned()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Splits an author field on top-level `and`
pub fn split_names(field: &str) -> Vec<BibName> {
    let mut names = Vec::new();
    let mut current: Vec<String> = Vec::new();
    for word in words(field) {
        if word.eq_ignore_ascii_case("and") {
            if !current.is_empty() {
                names.push(BibName::parse(&current.join(" ")));
                current.clear();
            }
        } else {
            current.push(word);
        }
    }
    if !current.is_empty() {
        names.push(BibName::parse(&current.join(" ")));
    }
    names
}

/// Whitespace separated words, ignoring whitespace inside braces
fn words(text: &str) -> Vec<String> {
    split_top_level(text, char::is_whitespace)
        .into_iter()
        .filter(|w| !w.is_empty())
        .collect()
}

fn split_top_level(text: &str, is_sep: impl Fn(char) -> bool) -> Vec<String> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for c in text.chars() {
        match c {
            '{' => {
                depth += 1;
                current.push(c);
            }
            '}' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            c if depth == 0 && is_sep(c) => {
                out.push(current.trim().to_string());
                current.clear();
            }
            c => current.push(c),
        }
    }
    out.push(current.trim().to_string());
    if out.len() == 1 && out[0].is_empty() {
        out.clear();
    }
    out
}

/// `von Last` part: leading lower-case words are von, the final word is always last
fn split_von_last(tokens: &[String]) -> (Vec<String>, Vec<String>) {
    if tokens.len() <= 1 {
        return (Vec::new(), tokens.to_vec());
    }
    let head = &tokens[..tokens.len() - 1];
    let end = head
        .iter()
        .rposition(|t| is_lowercase_word(t))
        .map(|idx| idx + 1)
        .unwrap_or(0);
    (tokens[..end].to_vec(), tokens[end..].to_vec())
}

/// Case of the first letter at brace depth 0; `{\'e}` style specials count by their letter
fn is_lowercase_word(word: &str) -> bool {
    let mut chars = word.chars().peekable();
    let mut depth = 0usize;
    while let Some(c) = chars.next() {
        match c {
            '{' => {
                if depth == 0 && chars.peek() == Some(&'\\') {
                    // special character: skip the control word, then use the letter it applies to
                    chars.next();
                    while chars.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
                        chars.next();
                    }
                    for c in chars.by_ref() {
                        if c.is_alphabetic() {
                            return c.is_lowercase();
                        }
                        if c == '}' {
                            break;
                        }
                    }
                    return false;
                }
                depth += 1;
            }
            '}' => depth = depth.saturating_sub(1),
            c if depth == 0 && c.is_alphabetic() => return c.is_lowercase(),
            _ => {}
        }
    }
    false
}

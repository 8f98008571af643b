use crate::error::{CvError, Result};
use crate::models::bib::{split_names, BibEntry};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;

const MONTH_MACROS: [(&str, &str); 12] = [
    ("jan", "January"),
    ("feb", "February"),
    ("mar", "March"),
    ("apr", "April"),
    ("may", "May"),
    ("jun", "June"),
    ("jul", "July"),
    ("aug", "August"),
    ("sep", "September"),
    ("oct", "October"),
    ("nov", "November"),
    ("dec", "December"),
];

/// Loads every entry of a BibTeX file, in file order
pub async fn load_bib(path: &Path) -> Result<Vec<BibEntry>> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| CvError::io(path, e))?;
    parse_bibtex(&content, path)
}

/// Parses BibTeX text; `path` is only used in error messages
pub fn parse_bibtex(content: &str, path: &Path) -> Result<Vec<BibEntry>> {
    BibParser::new(content, path).parse()
}

struct BibParser {
    chars: Vec<char>,
    pos: usize,
    path: PathBuf,
    macros: HashMap<String, String>,
}

impl BibParser {
    fn new(content: &str, path: &Path) -> Self {
        let macros = MONTH_MACROS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            chars: content.chars().collect(),
            pos: 0,
            path: path.to_path_buf(),
            macros,
        }
    }

    fn parse(mut self) -> Result<Vec<BibEntry>> {
        let mut entries = Vec::new();
        // text outside entries is a comment
        while let Some(at) = self.chars[self.pos..].iter().position(|&c| c == '@') {
            self.pos += at + 1;
            self.skip_ws();
            let entry_type = self.identifier().to_lowercase();
            if entry_type.is_empty() {
                return Err(self.error("expected entry type after '@'"));
            }
            self.skip_ws();
            let close = match self.next_char() {
                Some('{') => '}',
                Some('(') => ')',
                _ => return Err(self.error(format!("expected '{{' after @{}", entry_type))),
            };
            match entry_type.as_str() {
                "comment" | "preamble" => self.skip_group(close)?,
                "string" => self.parse_string_macro(close)?,
                _ => entries.push(self.parse_entry(entry_type, close)?),
            }
        }
        Ok(entries)
    }

    fn parse_string_macro(&mut self, close: char) -> Result<()> {
        self.skip_ws();
        let name = self.identifier().to_lowercase();
        self.skip_ws();
        self.expect('=')?;
        let value = self.value()?;
        self.skip_ws();
        self.expect(close)?;
        self.macros.insert(name, value);
        Ok(())
    }

    fn parse_entry(&mut self, entry_type: String, close: char) -> Result<BibEntry> {
        self.skip_ws();
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c != ',' && c != close && !c.is_whitespace())
        {
            self.pos += 1;
        }
        let key: String = self.chars[start..self.pos].iter().collect();
        let mut entry = BibEntry {
            key,
            entry_type,
            ..Default::default()
        };

        loop {
            self.skip_ws();
            match self.next_char() {
                Some(',') => {}
                Some(c) if c == close => break,
                Some(c) => return Err(self.error(format!("unexpected '{}' in entry {}", c, entry.key))),
                None => return Err(self.error(format!("unterminated entry {}", entry.key))),
            }
            self.skip_ws();
            // trailing comma before the closing delimiter
            if self.peek() == Some(close) {
                self.pos += 1;
                break;
            }
            let name = self.identifier().to_lowercase();
            if name.is_empty() {
                return Err(self.error(format!("expected field name in entry {}", entry.key)));
            }
            self.skip_ws();
            self.expect('=')?;
            let value = self.value()?;
            entry.fields.insert(name, value);
        }

        entry.authors = split_names(entry.field("author"));
        Ok(entry)
    }

    /// `part # part # ...` with whitespace collapsed
    fn value(&mut self) -> Result<String> {
        let mut out = String::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some('{') => {
                    self.pos += 1;
                    out.push_str(&self.braced()?);
                }
                Some('"') => {
                    self.pos += 1;
                    out.push_str(&self.quoted()?);
                }
                Some(c) if c.is_ascii_digit() => {
                    while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                        out.push(self.chars[self.pos]);
                        self.pos += 1;
                    }
                }
                Some(_) => {
                    let name = self.identifier().to_lowercase();
                    if name.is_empty() {
                        return Err(self.error("expected a field value"));
                    }
                    match self.macros.get(&name) {
                        Some(expansion) => out.push_str(expansion),
                        None => return Err(self.error(format!("undefined macro '{}'", name))),
                    }
                }
                None => return Err(self.error("unexpected end of file in field value")),
            }
            self.skip_ws();
            if self.peek() == Some('#') {
                self.pos += 1;
            } else {
                break;
            }
        }
        Ok(out.split_whitespace().collect::<Vec<_>>().join(" "))
    }

    /// Body of a `{...}` group; the opening brace is already consumed
    fn braced(&mut self) -> Result<String> {
        let start = self.pos;
        let mut depth = 0usize;
        while let Some(c) = self.next_char() {
            match c {
                '{' => depth += 1,
                '}' if depth == 0 => {
                    return Ok(self.chars[start..self.pos - 1].iter().collect());
                }
                '}' => depth -= 1,
                _ => {}
            }
        }
        Err(self.error("unbalanced braces"))
    }

    fn quoted(&mut self) -> Result<String> {
        let start = self.pos;
        let mut depth = 0usize;
        while let Some(c) = self.next_char() {
            match c {
                '{' => depth += 1,
                '}' => depth = depth.saturating_sub(1),
                '"' if depth == 0 => {
                    return Ok(self.chars[start..self.pos - 1].iter().collect());
                }
                _ => {}
            }
        }
        Err(self.error("unterminated quoted value"))
    }

    fn skip_group(&mut self, close: char) -> Result<()> {
        let mut depth = 0usize;
        while let Some(c) = self.next_char() {
            match c {
                '{' | '(' if c != close => depth += 1,
                c if c == close && depth == 0 => return Ok(()),
                '}' | ')' => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
        Err(self.error("unbalanced group"))
    }

    fn identifier(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(|c| {
            c.is_alphanumeric() || matches!(c, '_' | '-' | ':' | '.' | '+' | '/' | '\'')
        }) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        match self.next_char() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(self.error(format!("expected '{}', found '{}'", expected, c))),
            None => Err(self.error(format!("expected '{}', found end of file", expected))),
        }
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> CvError {
        let upto = self.pos.min(self.chars.len());
        let line = self.chars[..upto].iter().filter(|&&c| c == '\n').count() + 1;
        CvError::Bib {
            path: self.path.clone(),
            line,
            message: message.into(),
        }
    }
}

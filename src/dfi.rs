//! Reader for the DFI metadata file written alongside the particle data.
//!
//! The file uses the hierarchical TextParser layout: nested `Label { ... }`
//! blocks holding `key = value` assignments. Every assignment is flattened
//! to an absolute path such as `/Header/BaseFileName`. Labels are case
//! insensitive, and labels ending in `[@]` are numbered in order of
//! appearance (`Slice[0]`, `Slice[1]`, ...).

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

pub const BASE_FILENAME_KEY: &str = "/Header/BaseFileName";


/// Key/value lookup over a metadata file.
pub trait MetadataSource {
    fn lookup(&self, key: &str) -> Result<String>;
}

/// returns the prefix shared by every region data file
pub fn base_filename(source: &dyn MetadataSource) -> Result<String> {
    source.lookup(BASE_FILENAME_KEY)
}

impl MetadataSource for HashMap<String, String> {
    fn lookup(&self, key: &str) -> Result<String> {
        self.get(key).cloned().ok_or_else(|| Error::MetadataLookup {
            key: key.to_string(),
        })
    }
}

#[derive(Debug, Default)]
pub struct DfiFile {
    // keys are stored lower case
    values: BTreeMap<String, String>,
}

impl MetadataSource for DfiFile {
    fn lookup(&self, key: &str) -> Result<String> {
        self.values
            .get(&key.to_ascii_lowercase())
            .cloned()
            .ok_or_else(|| Error::MetadataLookup {
                key: key.to_string(),
            })
    }
}

impl DfiFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::DfiNotFound {
                path: path.to_owned(),
            });
        }
        let text = std::fs::read_to_string(path)?;
        let dfi = Self::parse(&text)?;
        debug!(path = %path.display(), n_values = dfi.values.len(), "read dfi file");
        Ok(dfi)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let tokens = tokenize(text)?;
        let mut values = BTreeMap::new();
        // open labels, outermost first
        let mut stack: Vec<String> = vec![];
        // next index for `[@]` labels, keyed by full label path
        let mut counters: HashMap<String, usize> = HashMap::new();

        let mut iter = tokens.into_iter();
        while let Some((line, token)) = iter.next() {
            match token {
                Token::RBrace => {
                    if stack.pop().is_none() {
                        return Err(syntax(line, "unmatched '}'"));
                    }
                }
                Token::Word(name) => match iter.next() {
                    Some((_, Token::LBrace)) => {
                        let label = match name.strip_suffix("[@]") {
                            Some(stem) => {
                                let path = join_path(&stack, stem);
                                let n = counters.entry(path).or_insert(0);
                                let label = format!("{stem}[{n}]");
                                *n += 1;
                                label
                            }
                            None => name.clone(),
                        };
                        stack.push(label);
                    }
                    Some((_, Token::Equals)) => {
                        let value = match iter.next() {
                            Some((_, Token::Word(v))) | Some((_, Token::Quoted(v))) => v,
                            Some((_, Token::Vector(v))) => v,
                            _ => return Err(syntax(line, &format!("missing value for {name}"))),
                        };
                        values.insert(join_path(&stack, &name).to_ascii_lowercase(), value);
                    }
                    _ => return Err(syntax(line, &format!("expected '{{' or '=' after {name}"))),
                },
                other => return Err(syntax(line, &format!("unexpected {other:?}"))),
            }
        }

        if let Some(open) = stack.last() {
            return Err(syntax(text.lines().count(), &format!("unclosed block {open}")));
        }

        Ok(Self { values })
    }
}

fn join_path(stack: &[String], name: &str) -> String {
    let mut path = String::new();
    for label in stack {
        path.push('/');
        path.push_str(label);
    }
    path.push('/');
    path.push_str(name);
    path
}

fn syntax(line: usize, message: &str) -> Error {
    Error::DfiSyntax {
        line,
        message: message.to_string(),
    }
}

#[derive(Debug, PartialEq)]
enum Token {
    LBrace,
    RBrace,
    Equals,
    Word(String),
    Quoted(String),
    /// parenthesised list, kept as written
    Vector(String),
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '{' | '}' | '=' | '(' | ')' | '"')
}

fn tokenize(text: &str) -> Result<Vec<(usize, Token)>> {
    let mut tokens = vec![];
    let mut line = 1;
    let mut chars = text.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            '\n' => {
                line += 1;
                chars.next();
            }
            c if c.is_whitespace() => {
                chars.next();
            }
            '#' => skip_line(&mut chars),
            '/' if text_starts_comment(&chars) => skip_line(&mut chars),
            '{' => {
                chars.next();
                tokens.push((line, Token::LBrace));
            }
            '}' => {
                chars.next();
                tokens.push((line, Token::RBrace));
            }
            '=' => {
                chars.next();
                tokens.push((line, Token::Equals));
            }
            '"' => {
                chars.next();
                let start = line;
                let mut s = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some(c) => {
                            if c == '\n' {
                                line += 1;
                            }
                            s.push(c);
                        }
                        None => return Err(syntax(start, "unterminated string")),
                    }
                }
                tokens.push((start, Token::Quoted(s)));
            }
            '(' => {
                let start = line;
                let mut s = String::new();
                loop {
                    match chars.next() {
                        Some(')') => {
                            s.push(')');
                            break;
                        }
                        Some(c) => {
                            if c == '\n' {
                                line += 1;
                            }
                            s.push(c);
                        }
                        None => return Err(syntax(start, "unterminated vector")),
                    }
                }
                tokens.push((start, Token::Vector(s)));
            }
            ')' => return Err(syntax(line, "unmatched ')'")),
            _ => {
                let mut s = String::new();
                while let Some(&c) = chars.peek() {
                    if is_delimiter(c) {
                        break;
                    }
                    s.push(c);
                    chars.next();
                }
                tokens.push((line, Token::Word(s)));
            }
        }
    }
    Ok(tokens)
}

fn text_starts_comment(chars: &std::iter::Peekable<std::str::Chars>) -> bool {
    let mut ahead = chars.clone();
    ahead.next() == Some('/') && ahead.next() == Some('/')
}

fn skip_line(chars: &mut std::iter::Peekable<std::str::Chars>) {
    while let Some(&c) = chars.peek() {
        if c == '\n' {
            break;
        }
        chars.next();
    }
}

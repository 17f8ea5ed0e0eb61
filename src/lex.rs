// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Translating a character stream to a token stream. Atoms are
//! turned into (detached) leaf frames right away; the only tokens
//! that denote nesting are `Token::Open`, `Token::Close` and
//! `Token::Quote`. See [read](../read/index.html) if interested in
//! frame trees rather than tokens.

use crate::chars::{CharResult, DecodeError};
use crate::frame::Frame;
use crate::kind::Kind;
use crate::number::{parse_float, parse_integer};
use crate::pos::Pos;
use crate::settings::Settings;
use kstring::KString;
use thiserror::Error;
use genawaiter::rc::Gen;
use std::fmt::Write;

#[derive(Error, Debug)]
pub enum LexError {
    #[error("{0} after")]
    Decode(DecodeError),
    #[error("no token matches {0:?}")]
    Unmatched(String),
}

#[derive(Error, Debug)]
#[error("{err} {pos}")]
pub struct LexErrorWithPos {
    pub err: LexError,
    pub pos: Pos
}

impl LexError {
    fn at(self, p: Pos) -> LexErrorWithPos {
        LexErrorWithPos {
            err: self,
            pos: p
        }
    }
}

#[derive(Debug)]
pub enum Token {
    Open,
    Close,
    /// Carries the `op` frame holding the quote character
    Quote(Frame),
    Leaf(Frame),
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
           -> Result<(), std::fmt::Error> {
        match self {
            Token::Open => f.write_char('('),
            Token::Close => f.write_char(')'),
            Token::Quote(op) => f.write_fmt(format_args!("{}", op.value())),
            Token::Leaf(frame) => f.write_fmt(format_args!("{}", frame)),
        }
    }
}

#[derive(Debug)]
pub struct TokenWithPos(pub Token, pub Pos);


fn is_whitespace_char(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

fn is_word_char(c: char, settings: &Settings) -> bool {
    !is_whitespace_char(c) && c != ';' && c != '(' && c != ')' && c != settings.quote
}

fn count_while(s: &str, pred: impl Fn(u8) -> bool) -> usize {
    s.bytes().take_while(|b| pred(*b)).count()
}

fn sign_len(s: &str) -> usize {
    match s.as_bytes().first() {
        Some(b'+' | b'-') => 1,
        _ => 0,
    }
}

// [+-]?[0-9]+, returns the length
fn match_signed_digits(s: &str) -> Option<usize> {
    let i = sign_len(s);
    match count_while(&s[i..], |b| b.is_ascii_digit()) {
        0 => None,
        n => Some(i + n)
    }
}

// [+-]?[0-9]+[eE][+-]?[0-9]+
fn match_exponent(s: &str) -> Option<usize> {
    let i = match_signed_digits(s)?;
    match s.as_bytes().get(i) {
        Some(b'e' | b'E') => Some(i + 1 + match_signed_digits(&s[i + 1..])?),
        _ => None
    }
}

// [+-]?[0-9]+\.[0-9]*
fn match_decimal(s: &str) -> Option<usize> {
    let i = match_signed_digits(s)?;
    if s.as_bytes().get(i) == Some(&b'.') {
        Some(i + 1 + count_while(&s[i + 1..], |b| b.is_ascii_digit()))
    } else {
        None
    }
}

fn match_prefixed(s: &str, prefix: &str, digit: fn(u8) -> bool) -> Option<usize> {
    let rest = s.strip_prefix(prefix)?;
    match count_while(rest, digit) {
        0 => None,
        n => Some(prefix.len() + n)
    }
}

// 0x[0-9a-fA-F]+
fn match_hex(s: &str) -> Option<usize> {
    match_prefixed(s, "0x", |b| b.is_ascii_hexdigit())
}

// 0b[01]+
fn match_bin(s: &str) -> Option<usize> {
    match_prefixed(s, "0b", |b| b == b'0' || b == b'1')
}

fn match_symbol(s: &str) -> Option<usize> {
    if s.is_empty() { None } else { Some(s.len()) }
}

fn build_number(s: &str) -> Option<Frame> {
    Some(Frame::new(Kind::Number, parse_float(s)?))
}

fn build_hex(s: &str) -> Option<Frame> {
    Some(Frame::new(Kind::Hex, parse_integer(&s[2..], 16)?))
}

fn build_bin(s: &str) -> Option<Frame> {
    Some(Frame::new(Kind::Bin, parse_integer(&s[2..], 2)?))
}

fn build_integer(s: &str) -> Option<Frame> {
    Some(Frame::new(Kind::Integer, parse_integer(s, 10)?))
}

fn build_symbol(s: &str) -> Option<Frame> {
    Some(Frame::new(Kind::Symbol, KString::from_ref(s)))
}

struct Rule {
    /// Length in bytes of the matching prefix, if any
    matches: fn(&str) -> Option<usize>,
    build: fn(&str) -> Option<Frame>,
}

// First match wins. The order matters: "1e3" must not be read as an
// integer, "0x1f" not as the integer 0, and the symbol rule takes
// anything.
const RULES: &[Rule] = &[
    Rule { matches: match_exponent, build: build_number },
    Rule { matches: match_decimal, build: build_number },
    Rule { matches: match_hex, build: build_hex },
    Rule { matches: match_bin, build: build_bin },
    Rule { matches: match_signed_digits, build: build_integer },
    Rule { matches: match_symbol, build: build_symbol },
];

/// Classify the start of `word` (which must consist of word
/// characters only). Returns the leaf and the length of the text it
/// was built from.
pub fn classify(word: &str) -> Option<(Frame, usize)> {
    RULES.iter().find_map(|rule| {
        let len = (rule.matches)(word)?;
        Some(((rule.build)(&word[..len])?, len))
    })
}

/// Split a word into leaf tokens, starting at `pos`.
fn split_word(word: &str, pos: Pos)
              -> impl Iterator<Item = Result<TokenWithPos, LexErrorWithPos>> + '_ {
    let mut rest = word;
    let mut pos = pos;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None
        }
        Some(match classify(rest) {
            Some((frame, len)) => {
                let t = TokenWithPos(Token::Leaf(frame), pos);
                pos = pos.right(rest[..len].chars().count());
                rest = &rest[len..];
                Ok(t)
            }
            None => {
                let e = LexError::Unmatched(rest.to_string()).at(pos);
                rest = "";
                Err(e)
            }
        })
    })
}

/// Lazily turn characters into tokens. Whitespace and comments are
/// dropped. Stops after the first error.
pub fn lex<'s>(
    cs: impl Iterator<Item = CharResult> + 's,
    settings: &'s Settings,
)
    -> impl Iterator<Item = Result<TokenWithPos, LexErrorWithPos>> + 's
{
    Gen::new(|co| async move {
        let mut cs = cs;
        let mut word = String::new();
        let mut maybe_next_c_pos = None;
        let mut lastpos = Pos::START;
        loop {
            let (c, pos) =
                if let Some(cp) = maybe_next_c_pos.take() {
                    cp
                } else {
                    match cs.next() {
                        None => return,
                        Some(Err(e)) => {
                            co.yield_(Err(LexError::Decode(e).at(lastpos))).await;
                            return;
                        }
                        Some(Ok(cp)) => cp
                    }
                };
            lastpos = pos;

            if c == '(' {
                co.yield_(Ok(TokenWithPos(Token::Open, pos))).await;
            } else if c == ')' {
                co.yield_(Ok(TokenWithPos(Token::Close, pos))).await;
            } else if c == settings.quote {
                let op = Frame::new(Kind::Op, String::from(c));
                co.yield_(Ok(TokenWithPos(Token::Quote(op), pos))).await;
            } else if is_whitespace_char(c) {
            } else if c == ';' {
                // line comments, up to and including the newline
                loop {
                    match cs.next() {
                        None => return,
                        Some(Err(e)) => {
                            co.yield_(Err(LexError::Decode(e).at(lastpos))).await;
                            return;
                        }
                        Some(Ok((c, pos))) => {
                            lastpos = pos;
                            if c == '\n' {
                                break
                            }
                        }
                    }
                }
            } else {
                // Numbers, symbols
                word.clear();
                word.push(c);
                let mut at_eof = false;
                loop {
                    match cs.next() {
                        None => {
                            at_eof = true;
                            break
                        }
                        Some(Err(e)) => {
                            co.yield_(Err(LexError::Decode(e).at(lastpos))).await;
                            return;
                        }
                        Some(Ok((c, p))) => {
                            if is_word_char(c, settings) {
                                word.push(c);
                                lastpos = p;
                            } else {
                                maybe_next_c_pos = Some((c, p));
                                break
                            }
                        }
                    }
                }
                for r in split_word(&word, pos) {
                    let failed = r.is_err();
                    co.yield_(r).await;
                    if failed {
                        return;
                    }
                }
                if at_eof {
                    // avoid calling next() again!
                    return
                }
            }
        }
    }).into_iter()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chars::str_chars;
    use crate::settings::DEFAULT_SETTINGS;
    use crate::value::Value;

    fn tokens(s: &str) -> Vec<TokenWithPos> {
        lex(str_chars(s), &DEFAULT_SETTINGS)
            .collect::<Result<Vec<_>, _>>()
            .expect("lexes")
    }

    fn leaf_strings(s: &str) -> Vec<String> {
        tokens(s).into_iter().map(|t| t.0.to_string()).collect()
    }

    fn leaf(s: &str) -> Frame {
        let (frame, len) = classify(s).expect("some rule matches");
        assert_eq!(len, s.len(), "whole of {:?} matched", s);
        frame
    }

    #[test]
    fn leaves() {
        let f = leaf("42");
        assert_eq!(f.kind(), &Kind::Integer);
        assert_eq!(f.value(), &Value::from(42));
        let f = leaf("-7");
        assert_eq!(f.value(), &Value::from(-7));
        let f = leaf("0x1A");
        assert_eq!(f.kind(), &Kind::Hex);
        assert_eq!(f.value(), &Value::from(26));
        assert_eq!(f.formatted_value(), "0x1a");
        let f = leaf("0b101");
        assert_eq!(f.kind(), &Kind::Bin);
        assert_eq!(f.value(), &Value::from(5));
        assert_eq!(f.formatted_value(), "0b101");
        let f = leaf("3.14");
        assert_eq!(f.kind(), &Kind::Number);
        assert_eq!(f.value(), &Value::from(3.14));
        let f = leaf("1e3");
        assert_eq!(f.kind(), &Kind::Number);
        assert_eq!(f.value().as_f64(), Some(1000.0));
        let f = leaf("abc-def");
        assert_eq!(f.kind(), &Kind::Symbol);
        assert_eq!(f.value(), &Value::from("abc-def"));
        assert_eq!(leaf("5.").value(), &Value::from(5.0));
        assert_eq!(leaf("-").kind(), &Kind::Symbol);
        assert_eq!(leaf("+").kind(), &Kind::Symbol);
    }

    #[test]
    fn prefixes_split_words() {
        assert_eq!(leaf_strings("1abc"), vec!["<integer:1>", "<symbol:abc>"]);
        assert_eq!(leaf_strings("1e3x"), vec!["<number:1000.0>", "<symbol:x>"]);
        assert_eq!(leaf_strings("0x"), vec!["<integer:0>", "<symbol:x>"]);
        assert_eq!(leaf_strings("0b2"), vec!["<integer:0>", "<symbol:b2>"]);
        assert_eq!(leaf_strings("3.14.5"), vec!["<number:3.14>", "<symbol:.5>"]);
    }

    #[test]
    fn structure_and_positions() {
        let ts = tokens("(a `b)\n ; comment (\n 0x1f;c\n");
        let shown: Vec<String> = ts.iter()
            .map(|TokenWithPos(t, p)| format!("{}{}", t, p))
            .collect();
        assert_eq!(shown, vec!["(@1.0", "<symbol:a>@1.1", "`@1.3",
                               "<symbol:b>@1.4", ")@1.5", "<hex:0x1f>@3.1"]);
        assert!(matches!(&ts[2].0, Token::Quote(op) if op.kind() == &Kind::Op));
    }

    #[test]
    fn comments() {
        assert_eq!(leaf_strings("1 ; comment\n2"), vec!["<integer:1>", "<integer:2>"]);
        assert_eq!(leaf_strings("1 ; no newline at the end"), vec!["<integer:1>"]);
        assert_eq!(leaf_strings("abc;def"), vec!["<symbol:abc>"]);
        assert!(tokens("  \t\r\n ;;\n").is_empty());
    }

    #[test]
    fn word_positions_advance_in_chars() {
        let ts = tokens("λ1x");
        assert_eq!(ts.len(), 1);
        let ts = tokens("12λ");
        assert_eq!(ts[1].1, Pos { line: 0, col: 2 });
    }

    #[test]
    fn other_quote_char() {
        let settings = Settings { quote: '\'', ..DEFAULT_SETTINGS };
        let shown: Vec<String> = lex(str_chars("'x`"), &settings)
            .map(|r| r.expect("lexes").0.to_string())
            .collect();
        assert_eq!(shown, vec!["'", "<symbol:x`>"]);
    }

    #[test]
    fn decode_errors() {
        let bytes: &[u8] = b"ab \xff";
        let rs: Vec<_> = lex(crate::chars::buffered_chars(bytes), &DEFAULT_SETTINGS)
            .collect();
        assert_eq!(rs.len(), 2);
        assert!(matches!(&rs[1], Err(LexErrorWithPos { err: LexError::Decode(_), .. })));
    }
}

//! Date helper functions

use chrono::{DateTime, Datelike, TimeZone};

/// A Moment.js token's chrono rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Chrono(&'static str),
    /// Day of month with an English suffix, `1st`
    Ordinal,
}

/// Supported Moment.js tokens
const TOKENS: &[(&str, Token)] = &[
    ("YYYY", Token::Chrono("%Y")),
    ("YY", Token::Chrono("%y")),
    ("MMMM", Token::Chrono("%B")),
    ("MMM", Token::Chrono("%b")),
    ("MM", Token::Chrono("%m")),
    ("M", Token::Chrono("%-m")),
    ("DDDD", Token::Chrono("%j")),
    ("DD", Token::Chrono("%d")),
    ("Do", Token::Ordinal),
    ("D", Token::Chrono("%-d")),
    ("dddd", Token::Chrono("%A")),
    ("ddd", Token::Chrono("%a")),
    ("HH", Token::Chrono("%H")),
    ("H", Token::Chrono("%-H")),
    ("hh", Token::Chrono("%I")),
    ("h", Token::Chrono("%-I")),
    ("mm", Token::Chrono("%M")),
    ("ss", Token::Chrono("%S")),
    ("SSS", Token::Chrono("%3f")),
    ("A", Token::Chrono("%p")),
    ("ZZ", Token::Chrono("%z")),
    ("Z", Token::Chrono("%:z")),
];

#[derive(Debug, PartialEq, Eq)]
enum Piece<'a> {
    Literal(&'a str),
    Token(Token),
}

/// Format a date using a Moment.js-style format string.
///
/// Supports `YYYY YY MMMM MMM MM M DDDD DD Do D dddd ddd HH H hh h mm ss SSS
/// A ZZ Z`. Text inside `[brackets]` is copied verbatim, and anything else
/// that is not a token passes through unchanged.
///
/// # Examples
/// ```ignore
/// format_date(&date, "MMMM DD, YYYY") // -> "March 01, 2021"
/// format_date(&date, "[Posted on] Do MMM") // -> "Posted on 1st Mar"
/// ```
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>, format: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let mut out = String::new();
    for piece in tokenize(format) {
        match piece {
            Piece::Literal(text) => out.push_str(text),
            Piece::Token(Token::Chrono(spec)) => out.push_str(&date.format(spec).to_string()),
            Piece::Token(Token::Ordinal) => {
                let day = date.day();
                out.push_str(&format!("{}{}", day, ordinal_suffix(day)));
            }
        }
    }
    out
}

/// Format a date for a `<time datetime>` attribute
pub fn date_xml<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

/// Split a Moment.js format into tokens and literal text, longest token first
fn tokenize(format: &str) -> Vec<Piece<'_>> {
    let mut pieces = Vec::new();
    let mut rest = format;

    while let Some(c) = rest.chars().next() {
        if c == '[' {
            if let Some(end) = rest.find(']') {
                pieces.push(Piece::Literal(&rest[1..end]));
                rest = &rest[end + 1..];
                continue;
            }
        }

        let matched = TOKENS
            .iter()
            .filter(|(name, _)| rest.starts_with(name))
            .max_by_key(|(name, _)| name.len());
        if let Some((name, token)) = matched {
            pieces.push(Piece::Token(*token));
            rest = &rest[name.len()..];
            continue;
        }

        let len = c.len_utf8();
        pieces.push(Piece::Literal(&rest[..len]));
        rest = &rest[len..];
    }

    pieces
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

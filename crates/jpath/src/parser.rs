//! A `nom`-based parser for dotted/bracket dataset paths.
use super::ast::{Path, PathSegment};
use crate::error::JPathError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, u64 as nom_u64},
    combinator::{map, recognize},
    multi::many0,
    sequence::{delimited, pair, preceded},
};

// --- Main Public Parser ---

pub fn parse_path(input: &str) -> Result<Path, JPathError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(JPathError::Empty);
    }
    match full_path(input) {
        Ok(("", path)) => Ok(path),
        Ok((rem, _)) => Err(JPathError::PathParse(
            input.to_string(),
            format!("Parser did not consume all input. Remainder: '{}'", rem),
        )),
        Err(e) => Err(JPathError::PathParse(input.to_string(), e.to_string())),
    }
}

// --- Combinators ---

fn is_key_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

/// A leading key must start with a letter or underscore so that `{0}` or
/// `{-}` in running text is never mistaken for a field reference.
fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((take_while1(|c: char| c.is_alphabetic()), tag("_"))),
        take_while(is_key_char),
    ))
    .parse(input)
}

fn key_segment(input: &str) -> IResult<&str, PathSegment> {
    map(preceded(char('.'), take_while1(is_key_char)), |s: &str| {
        PathSegment::Key(s.to_string())
    })
    .parse(input)
}

fn index_segment(input: &str) -> IResult<&str, PathSegment> {
    map(delimited(char('['), nom_u64, char(']')), |i| {
        PathSegment::Index(usize::try_from(i).unwrap_or(usize::MAX))
    })
    .parse(input)
}

fn path_segment(input: &str) -> IResult<&str, PathSegment> {
    alt((key_segment, index_segment)).parse(input)
}

fn full_path(input: &str) -> IResult<&str, Path> {
    map(
        pair(identifier, many0(path_segment)),
        |(start, mut rest)| {
            let mut segments = vec![PathSegment::Key(start.to_string())];
            segments.append(&mut rest);
            Path { segments }
        },
    )
    .parse(input)
}

//! Stylesheet loader: recovers icon-name to code-point associations from an
//! icon-font CSS file using the `cssparser` tokenizer.
//!
//! Only one rule shape defines an icon: a single class selector immediately
//! followed by a `:before` (or `::before`) pseudo element, optionally with a
//! trailing comma. Every other rule is consumed and ignored.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use cssparser::{Delimiter, ParseError as CssParseError, Parser, ParserInput, Token};

use crate::error::{IconError, Result};

/// Ordered icon-name to glyph map. Names are unique and iteration is
/// lexicographic ascending. Built once per run, immutable afterwards.
#[derive(Debug, Default, Clone)]
pub struct IconCatalog {
    icons: BTreeMap<String, char>,
}

impl IconCatalog {
    pub fn get(&self, name: &str) -> Option<char> {
        self.icons.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.icons.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

/// Parses the stylesheet at `path` and returns the catalog together with the
/// common name prefix found in the file (empty when no rule qualifies).
///
/// Unless `keep_prefix` is set, the prefix is stripped from every name
/// before insertion.
pub fn load(path: &Path, keep_prefix: bool) -> Result<(IconCatalog, String)> {
    let css = fs::read_to_string(path)?;
    load_str(&css, keep_prefix)
}

pub fn load_str(css: &str, keep_prefix: bool) -> Result<(IconCatalog, String)> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);

    // Icons in stylesheet order; later rules overwrite earlier ones once the
    // names land in the map.
    let mut raw: Vec<(String, char)> = Vec::new();
    let mut prefix: Option<String> = None;

    loop {
        parser.skip_whitespace();
        if parser.is_exhausted() {
            break;
        }

        // The rule prelude runs up to the declaration block. Statement
        // at-rules like @import end at a semicolon instead.
        let class = parser
            .parse_until_before(Delimiter::CurlyBracketBlock | Delimiter::Semicolon, |p| {
                icon_class(p)
            })
            .map_err(|e: CssParseError<'_, ()>| {
                IconError::Parse(format!("bad rule prelude: {e:?}"))
            })?;

        match parser.next() {
            Ok(Token::Semicolon) => continue,
            Ok(Token::CurlyBracketBlock) => {
                let is_icon = class.is_some();
                let value = parser
                    .parse_nested_block(|block| {
                        if is_icon {
                            content_value(block)
                        } else {
                            consume_block(block)
                        }
                    })
                    .map_err(|e: CssParseError<'_, ()>| {
                        IconError::Parse(format!("bad declaration block: {e:?}"))
                    })?;

                if let Some(name) = class {
                    prefix = Some(match prefix {
                        Some(p) => common_prefix(&p, &name),
                        None => name.clone(),
                    });
                    if let Some(value) = value {
                        raw.push((name, decode_content(&value)?));
                    }
                }
            }
            _ => return Err(IconError::Parse("expected '{' after selector".into())),
        }
    }

    let prefix = prefix.unwrap_or_default();

    let mut icons = BTreeMap::new();
    for (name, glyph) in raw {
        let key = if !keep_prefix && !prefix.is_empty() {
            name[prefix.len()..].to_string()
        } else {
            name
        };
        icons.insert(key, glyph);
    }

    Ok((IconCatalog { icons }, prefix))
}

/// Checks whether the rule prelude is exactly `.name:before` (one or two
/// colons, optional trailing comma) and returns the class name if so.
fn icon_class<'i>(
    parser: &mut Parser<'i, '_>,
) -> std::result::Result<Option<String>, CssParseError<'i, ()>> {
    parser.skip_whitespace();

    match parser.next() {
        Ok(Token::Delim('.')) => {}
        _ => return Ok(None),
    }
    let name = match parser.expect_ident() {
        Ok(ident) => ident.to_string(),
        Err(_) => return Ok(None),
    };
    if parser.expect_colon().is_err() {
        return Ok(None);
    }
    let _ = parser.try_parse(|p| p.expect_colon());
    match parser.expect_ident() {
        Ok(ident) if ident.as_ref() == "before" => {}
        _ => return Ok(None),
    }

    match parser.next() {
        Err(_) => Ok(Some(name)),
        Ok(Token::Comma) => match parser.next() {
            Err(_) => Ok(Some(name)),
            Ok(_) => Ok(None),
        },
        Ok(_) => Ok(None),
    }
}

/// Scans a declaration block for the `content` property and returns its raw
/// string value (surrounding quotes already stripped by the tokenizer).
fn content_value<'i>(
    parser: &mut Parser<'i, '_>,
) -> std::result::Result<Option<String>, CssParseError<'i, ()>> {
    let mut value = None;

    loop {
        parser.skip_whitespace();
        if parser.is_exhausted() {
            break;
        }

        let property = match parser.expect_ident() {
            Ok(name) => name.to_string(),
            Err(_) => {
                skip_declaration(parser);
                continue;
            }
        };
        if parser.expect_colon().is_err() {
            skip_declaration(parser);
            continue;
        }

        if property == "content" {
            parser.skip_whitespace();
            match parser.next() {
                Ok(Token::QuotedString(s)) | Ok(Token::Ident(s)) => {
                    value = Some(s.to_string());
                }
                _ => {}
            }
        }
        skip_declaration(parser);
    }

    Ok(value)
}

fn consume_block<'i>(
    parser: &mut Parser<'i, '_>,
) -> std::result::Result<Option<String>, CssParseError<'i, ()>> {
    while parser.next().is_ok() {}
    Ok(None)
}

fn skip_declaration<'i>(parser: &mut Parser<'i, '_>) {
    let _: std::result::Result<(), CssParseError<'i, ()>> =
        parser.parse_until_after(Delimiter::Semicolon, |p| {
            while p.next().is_ok() {}
            Ok(())
        });
}

/// Turns a `content` value into the glyph it names.
///
/// The tokenizer decodes CSS escapes, so `"\f015"` arrives here as the
/// single char U+F015 and is used directly. Any longer value is handled the
/// way the legacy converter did: drop the first character and read the rest
/// as a hex code point.
fn decode_content(value: &str) -> Result<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(glyph), None) => Ok(glyph),
        (Some(_), Some(_)) => {
            let hex: String = value.chars().skip(1).collect();
            u32::from_str_radix(&hex, 16)
                .ok()
                .and_then(char::from_u32)
                .ok_or_else(|| IconError::Value(value.to_string()))
        }
        _ => Err(IconError::Value(value.to_string())),
    }
}

fn common_prefix(a: &str, b: &str) -> String {
    a.chars()
        .zip(b.chars())
        .take_while(|(x, y)| x == y)
        .map(|(x, _)| x)
        .collect()
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Server-side expression evaluator
//!
//! Implements the slice of the expression language the builders
//! produce: `attribute_exists`, `attribute_not_exists`, `=` and `and`
//! in conditions; `SET` (with `if_not_exists` and `+`/`-` arithmetic),
//! `ADD` and `DELETE` clauses in updates. Every read inside an update
//! sees the item as it was before the update started.

use std::collections::BTreeSet;
use std::iter::Peekable;
use std::str::Chars;
use tally_core::{AttrValue, Item, Values};
use thiserror::Error;

/// Errors from parsing or evaluating an expression
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("unexpected token: {0}")]
    Unexpected(String),
    #[error("unknown placeholder: {0}")]
    UnknownPlaceholder(String),
    #[error("attribute not found: {0}")]
    MissingAttribute(String),
    #[error("{0} is not a number")]
    NotANumber(String),
    #[error("{0} is not a string set")]
    NotASet(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Placeholder(String),
    LParen,
    RParen,
    Comma,
    Eq,
    Plus,
    Minus,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Self::Ident(s) | Self::Placeholder(s) => s.clone(),
            Self::LParen => "(".to_string(),
            Self::RParen => ")".to_string(),
            Self::Comma => ",".to_string(),
            Self::Eq => "=".to_string(),
            Self::Plus => "+".to_string(),
            Self::Minus => "-".to_string(),
        }
    }
}

fn take_ident(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut name = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_alphanumeric() || c == '_' {
            name.push(c);
            chars.next();
        } else {
            break;
        }
    }
    name
}

fn tokenize(input: &str) -> Result<Vec<Token>, EvalError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            '=' => {
                chars.next();
                tokens.push(Token::Eq);
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            ':' => {
                chars.next();
                let name = take_ident(&mut chars);
                if name.is_empty() {
                    return Err(EvalError::Unexpected(":".to_string()));
                }
                tokens.push(Token::Placeholder(format!(":{}", name)));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                tokens.push(Token::Ident(take_ident(&mut chars)));
            }
            other => return Err(EvalError::Unexpected(other.to_string())),
        }
    }

    Ok(tokens)
}

struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Result<&'a Token, EvalError> {
        let token = self.tokens.get(self.pos).ok_or(EvalError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(token)
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: Token) -> Result<(), EvalError> {
        let found = self.next()?;
        if *found == token {
            Ok(())
        } else {
            Err(EvalError::Unexpected(found.describe()))
        }
    }

    fn ident(&mut self) -> Result<&'a str, EvalError> {
        match self.next()? {
            Token::Ident(name) => Ok(name),
            other => Err(EvalError::Unexpected(other.describe())),
        }
    }

    fn placeholder(&mut self) -> Result<&'a str, EvalError> {
        match self.next()? {
            Token::Placeholder(name) => Ok(name),
            other => Err(EvalError::Unexpected(other.describe())),
        }
    }

    fn eat_ident(&mut self, name: &str) -> bool {
        match self.peek() {
            Some(Token::Ident(found)) if found == name => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }
}

fn resolve<'a>(values: &'a Values, placeholder: &str) -> Result<&'a AttrValue, EvalError> {
    values
        .get(placeholder)
        .ok_or_else(|| EvalError::UnknownPlaceholder(placeholder.to_string()))
}

/// Evaluate a condition expression against an item
///
/// An absent item fails every existence check and comparison, so a
/// guard like `attribute_exists(objectUUID) and ...` is false for a
/// record that does not exist.
pub fn eval_condition(
    expr: &str,
    item: Option<&Item>,
    values: &Values,
) -> Result<bool, EvalError> {
    let tokens = tokenize(expr)?;
    let mut cursor = Cursor::new(&tokens);

    let mut result = condition_term(&mut cursor, item, values)?;
    while cursor.eat_ident("and") {
        // no short circuit: the whole expression must parse
        let rhs = condition_term(&mut cursor, item, values)?;
        result = result && rhs;
    }

    match cursor.peek() {
        None => Ok(result),
        Some(extra) => Err(EvalError::Unexpected(extra.describe())),
    }
}

fn condition_term(
    cursor: &mut Cursor<'_>,
    item: Option<&Item>,
    values: &Values,
) -> Result<bool, EvalError> {
    let name = cursor.ident()?;
    match name {
        "attribute_exists" => {
            let attr = parenthesized_attr(cursor)?;
            Ok(item.is_some_and(|i| i.contains_key(attr)))
        }
        "attribute_not_exists" => {
            let attr = parenthesized_attr(cursor)?;
            Ok(!item.is_some_and(|i| i.contains_key(attr)))
        }
        attr => {
            cursor.expect(Token::Eq)?;
            let placeholder = cursor.placeholder()?;
            let expected = resolve(values, placeholder)?;
            Ok(item.and_then(|i| i.get(attr)) == Some(expected))
        }
    }
}

fn parenthesized_attr<'a>(cursor: &mut Cursor<'a>) -> Result<&'a str, EvalError> {
    cursor.expect(Token::LParen)?;
    let attr = cursor.ident()?;
    cursor.expect(Token::RParen)?;
    Ok(attr)
}

/// Apply an update expression to an item in place
///
/// Clauses (`SET`, `ADD`, `DELETE`) may be chained in one expression.
/// All reads resolve against the item's state before the update.
pub fn apply_update(expr: &str, item: &mut Item, values: &Values) -> Result<(), EvalError> {
    let tokens = tokenize(expr)?;
    let mut cursor = Cursor::new(&tokens);
    let original = item.clone();

    while !cursor.at_end() {
        let keyword = cursor.ident()?;
        match keyword {
            "SET" => apply_set(&mut cursor, item, &original, values)?,
            "ADD" => apply_add(&mut cursor, item, &original, values)?,
            "DELETE" => apply_delete(&mut cursor, item, &original, values)?,
            other => return Err(EvalError::Unexpected(other.to_string())),
        }
    }

    Ok(())
}

fn apply_set(
    cursor: &mut Cursor<'_>,
    item: &mut Item,
    original: &Item,
    values: &Values,
) -> Result<(), EvalError> {
    loop {
        let attr = cursor.ident()?.to_string();
        cursor.expect(Token::Eq)?;
        let value = value_expr(cursor, original, values, &attr)?;
        item.insert(attr, value);
        if !cursor.eat(&Token::Comma) {
            break;
        }
    }
    Ok(())
}

/// `operand (('+' | '-') operand)?` over numeric attribute values
fn value_expr(
    cursor: &mut Cursor<'_>,
    original: &Item,
    values: &Values,
    attr: &str,
) -> Result<AttrValue, EvalError> {
    let lhs = operand(cursor, original, values)?;

    let subtract = if cursor.eat(&Token::Plus) {
        false
    } else if cursor.eat(&Token::Minus) {
        true
    } else {
        return Ok(lhs);
    };

    let left = lhs
        .as_n()
        .ok_or_else(|| EvalError::NotANumber(attr.to_string()))?;
    let right = operand(cursor, original, values)?
        .as_n()
        .ok_or_else(|| EvalError::NotANumber(attr.to_string()))?;

    Ok(AttrValue::n(if subtract { left - right } else { left + right }))
}

fn operand(
    cursor: &mut Cursor<'_>,
    original: &Item,
    values: &Values,
) -> Result<AttrValue, EvalError> {
    match cursor.next()? {
        Token::Placeholder(placeholder) => Ok(resolve(values, placeholder)?.clone()),
        Token::Ident(name) if name == "if_not_exists" => {
            cursor.expect(Token::LParen)?;
            let attr = cursor.ident()?;
            cursor.expect(Token::Comma)?;
            let placeholder = cursor.placeholder()?;
            let fallback = resolve(values, placeholder)?.clone();
            cursor.expect(Token::RParen)?;
            Ok(original.get(attr).cloned().unwrap_or(fallback))
        }
        Token::Ident(name) => original
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::MissingAttribute(name.clone())),
        other => Err(EvalError::Unexpected(other.describe())),
    }
}

fn set_operands<'a>(
    cursor: &mut Cursor<'a>,
    values: &'a Values,
) -> Result<(&'a str, &'a BTreeSet<String>), EvalError> {
    let attr = cursor.ident()?;
    let placeholder = cursor.placeholder()?;
    let set = resolve(values, placeholder)?
        .as_ss()
        .ok_or_else(|| EvalError::NotASet(placeholder.to_string()))?;
    Ok((attr, set))
}

fn apply_add<'a>(
    cursor: &mut Cursor<'a>,
    item: &mut Item,
    original: &Item,
    values: &'a Values,
) -> Result<(), EvalError> {
    let (attr, addend) = set_operands(cursor, values)?;
    let mut set = match original.get(attr) {
        Some(value) => value
            .as_ss()
            .ok_or_else(|| EvalError::NotASet(attr.to_string()))?
            .clone(),
        None => BTreeSet::new(),
    };
    set.extend(addend.iter().cloned());
    item.insert(attr.to_string(), AttrValue::Ss(set));
    Ok(())
}

fn apply_delete<'a>(
    cursor: &mut Cursor<'a>,
    item: &mut Item,
    original: &Item,
    values: &'a Values,
) -> Result<(), EvalError> {
    let (attr, removal) = set_operands(cursor, values)?;
    let Some(existing) = original.get(attr) else {
        return Ok(());
    };
    let mut set = existing
        .as_ss()
        .ok_or_else(|| EvalError::NotASet(attr.to_string()))?
        .clone();
    for element in removal {
        set.remove(element);
    }
    // an emptied set attribute is removed, never stored empty
    if set.is_empty() {
        item.remove(attr);
    } else {
        item.insert(attr.to_string(), AttrValue::Ss(set));
    }
    Ok(())
}

#[cfg(test)]
#[path = "eval_tests.rs"]
mod tests;

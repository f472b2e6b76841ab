//! Query parser and tokenizer.
//!
//! Grammar, lowest to highest precedence:
//!
//! ```text
//! or_expr   := and_expr ("or" and_expr)*
//! and_expr  := not_expr (["and"] not_expr)*
//! not_expr  := ("-" | "not")* primary
//! primary   := "(" or_expr [")"] | word | phrase | field:value
//! ```
//!
//! The parser never rejects irregular input except the bare `*` query:
//! unmatched parentheses, dangling operators and empty groups are dropped.

use crate::error::{Result, SearchError};
use crate::types::RelatedField;

use super::expression::{query_expression_has_terms, QueryExpression};
use super::wildcard::WildcardPattern;

// ---------------------------------------------------------------------------
// Token types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryToken {
    kind: QueryTokenKind,
    position: usize,
}

impl QueryToken {
    pub fn kind(&self) -> &QueryTokenKind {
        &self.kind
    }

    /// Byte offset of the token in the raw query.
    pub fn position(&self) -> usize {
        self.position
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryTokenKind {
    Word(String),
    Phrase(String),
    Field {
        field: RelatedField,
        value: String,
        quoted: bool,
    },
    LParen,
    RParen,
    And,
    Or,
    Not,
}

// ---------------------------------------------------------------------------
// Query parser
// ---------------------------------------------------------------------------

pub struct QueryParser {
    tokens: Vec<QueryToken>,
    index: usize,
}

impl QueryParser {
    /// Parses a raw query into an expression tree.
    ///
    /// Blank input yields an empty `And`. Fails only when the query is
    /// exactly `*`.
    pub fn parse(input: &str) -> Result<QueryExpression> {
        if is_wildcard_all(input) {
            return Err(SearchError::MalformedQuery(
                "the wildcard-all query `*` is not supported".to_string(),
            ));
        }
        Ok(Self::parse_lenient(input))
    }

    /// Parses without rejecting the bare `*`, which then matches every
    /// record like any other all-star word.
    pub(crate) fn parse_lenient(input: &str) -> QueryExpression {
        let tokens = tokenize_query_input(input);
        if tokens.is_empty() {
            return QueryExpression::And(Vec::new());
        }

        let mut parser = Self { tokens, index: 0 };
        match parser.parse_or_expression(0) {
            Some(expression) if query_expression_has_terms(&expression) => expression,
            _ => QueryExpression::And(Vec::new()),
        }
    }

    fn parse_or_expression(&mut self, depth: usize) -> Option<QueryExpression> {
        let mut parts = Vec::new();
        parts.extend(self.parse_and_expression(depth));

        while self.consume(&QueryTokenKind::Or) {
            parts.extend(self.parse_and_expression(depth));
        }

        match parts.len() {
            0 => None,
            1 => parts.pop(),
            _ => Some(QueryExpression::Or(parts)),
        }
    }

    fn parse_and_expression(&mut self, depth: usize) -> Option<QueryExpression> {
        let mut parts = Vec::new();

        while let Some(token) = self.peek() {
            let closes_group = depth > 0 && token.kind == QueryTokenKind::RParen;
            if closes_group || token.kind == QueryTokenKind::Or {
                break;
            }
            // Explicit `and` is redundant; an unmatched `)` outside any group is ignored.
            if matches!(token.kind, QueryTokenKind::And | QueryTokenKind::RParen) {
                self.index += 1;
                continue;
            }
            parts.extend(self.parse_not_expression(depth));
        }

        match parts.len() {
            0 => None,
            1 => parts.pop(),
            _ => Some(QueryExpression::And(parts)),
        }
    }

    fn parse_not_expression(&mut self, depth: usize) -> Option<QueryExpression> {
        let mut negate = false;
        while self.consume(&QueryTokenKind::Not) {
            negate = !negate;
        }

        // A negation with nothing to negate is dropped.
        let expression = self.parse_primary_expression(depth)?;
        if negate {
            Some(QueryExpression::negate(expression))
        } else {
            Some(expression)
        }
    }

    fn parse_primary_expression(&mut self, depth: usize) -> Option<QueryExpression> {
        if self.consume(&QueryTokenKind::LParen) {
            let inner = self.parse_or_expression(depth + 1);
            // A missing `)` lets the group run to the end of input.
            self.consume(&QueryTokenKind::RParen);
            return inner.map(QueryExpression::group);
        }

        let token = self.peek()?;
        let expression = match &token.kind {
            QueryTokenKind::Word(raw) => QueryExpression::text(WildcardPattern::parse(raw)),
            QueryTokenKind::Phrase(phrase) => {
                QueryExpression::text(WildcardPattern::literal(phrase))
            }
            QueryTokenKind::Field {
                field,
                value,
                quoted,
            } => {
                let pattern = if *quoted {
                    WildcardPattern::literal(value)
                } else {
                    WildcardPattern::parse(value)
                };
                QueryExpression::field(*field, pattern)
            }
            QueryTokenKind::LParen
            | QueryTokenKind::RParen
            | QueryTokenKind::And
            | QueryTokenKind::Or
            | QueryTokenKind::Not => return None,
        };
        self.index += 1;
        Some(expression)
    }

    fn consume(&mut self, expected: &QueryTokenKind) -> bool {
        matches!(self.peek(), Some(token) if &token.kind == expected) && {
            self.index += 1;
            true
        }
    }

    fn peek(&self) -> Option<&QueryToken> {
        self.tokens.get(self.index)
    }
}

/// Whether the query is the unsupported wildcard-all `*`.
pub fn is_wildcard_all(input: &str) -> bool {
    input.trim() == "*"
}

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

/// Splits a raw query into tokens. Never fails.
pub fn tokenize_query_input(input: &str) -> Vec<QueryToken> {
    let mut tokens = Vec::new();
    let mut cursor = 0usize;

    while let Some(ch) = input[cursor..].chars().next() {
        if ch.is_whitespace() {
            cursor += ch.len_utf8();
            continue;
        }

        let position = cursor;
        match ch {
            '(' => {
                tokens.push(QueryToken {
                    kind: QueryTokenKind::LParen,
                    position,
                });
                cursor += 1;
            }
            ')' => {
                tokens.push(QueryToken {
                    kind: QueryTokenKind::RParen,
                    position,
                });
                cursor += 1;
            }
            '"' => {
                let (phrase, next_cursor) = consume_quoted_phrase(input, cursor);
                if !phrase.is_empty() {
                    tokens.push(QueryToken {
                        kind: QueryTokenKind::Phrase(phrase),
                        position,
                    });
                }
                cursor = next_cursor;
            }
            '-' if starts_operand(&input[cursor + 1..]) => {
                tokens.push(QueryToken {
                    kind: QueryTokenKind::Not,
                    position,
                });
                cursor += 1;
            }
            _ => {
                // Text glued to a `-` is always a term, never a keyword.
                let follows_dash = matches!(
                    tokens.last(),
                    Some(QueryToken { kind: QueryTokenKind::Not, position: dash })
                        if dash + 1 == cursor && input[*dash..].starts_with('-')
                );
                let (kind, next_cursor) = consume_word(input, cursor, !follows_dash);
                if let Some(kind) = kind {
                    tokens.push(QueryToken { kind, position });
                }
                cursor = next_cursor;
            }
        }
    }

    tokens
}

/// A `-` negates only when something other than whitespace or `)` follows it.
fn starts_operand(rest: &str) -> bool {
    rest.chars()
        .next()
        .is_some_and(|next| !next.is_whitespace() && next != ')')
}

fn consume_word(input: &str, start: usize, keywords: bool) -> (Option<QueryTokenKind>, usize) {
    let mut end = start;

    while let Some(next) = input[end..].chars().next() {
        if next.is_whitespace() || matches!(next, '(' | ')') {
            break;
        }
        if next == ':' && input[end + 1..].starts_with('"') {
            let qualifier = &input[start..end];
            let (value, next_cursor) = consume_quoted_phrase(input, end + 1);
            let kind = match RelatedField::from_qualifier(qualifier) {
                Some(field) => (!value.is_empty()).then_some(QueryTokenKind::Field {
                    field,
                    value,
                    quoted: true,
                }),
                // Unknown qualifiers keep the whole quoted span as one literal.
                None => Some(QueryTokenKind::Phrase(format!("{qualifier}:{value}"))),
            };
            return (kind, next_cursor);
        }
        end += next.len_utf8();
    }

    let raw = &input[start..end];
    let kind = if !keywords {
        parse_field_word(raw).unwrap_or_else(|| QueryTokenKind::Word(raw.to_string()))
    } else if raw.eq_ignore_ascii_case("and") {
        QueryTokenKind::And
    } else if raw.eq_ignore_ascii_case("or") {
        QueryTokenKind::Or
    } else if raw.eq_ignore_ascii_case("not") {
        QueryTokenKind::Not
    } else if let Some(field_token) = parse_field_word(raw) {
        field_token
    } else {
        QueryTokenKind::Word(raw.to_string())
    };

    (Some(kind), end)
}

/// Recognises `field:value` for known qualifiers. Unknown qualifiers and
/// empty values stay plain words.
fn parse_field_word(raw: &str) -> Option<QueryTokenKind> {
    let (name, value) = raw.split_once(':')?;
    let field = RelatedField::from_qualifier(name)?;
    if value.is_empty() {
        return None;
    }
    Some(QueryTokenKind::Field {
        field,
        value: value.to_string(),
        quoted: false,
    })
}

/// Reads a `"`-delimited phrase starting at `start`.
///
/// The phrase closes on the next `"`; backslashes are ordinary text. An
/// unterminated phrase runs to the end of input.
fn consume_quoted_phrase(input: &str, start: usize) -> (String, usize) {
    let body_start = start + 1;
    match input[body_start..].find('"') {
        Some(offset) => {
            let body_end = body_start + offset;
            (input[body_start..body_end].to_string(), body_end + 1)
        }
        None => (input[body_start..].to_string(), input.len()),
    }
}

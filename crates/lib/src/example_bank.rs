//! # Example Bank
//!
//! The ordered few-shot demonstrations included in every prompt.

use crate::{catalog::SchemaCatalog, errors::CatalogError};
use regex::Regex;
use serde::Deserialize;
use lazy_static::lazy_static;

lazy_static! {
    /// One lexical unit of a SQL statement. Whitespace and comments are
    /// captured as `skip`; string literals as `literal` so their contents
    /// are never read as keywords.
    static ref SQL_TOKEN: Regex = Regex::new(
        r#"(?s)(?P<skip>\s+|--[^\n]*|/\*.*?\*/)|(?P<literal>'(?:[^'\\]|\\.|'')*'|"(?:[^"\\]|\\.|"")*")|`(?P<quoted>[^`]*)`|(?P<word>[A-Za-z0-9_$]+)|(?P<punct>[().,])|."#
    )
    .expect("sql token pattern is valid");
}

/// Words that start the next clause, so they can never be a table alias.
const CLAUSE_KEYWORDS: &[&str] = &[
    "AS", "CROSS", "EXCEPT", "FOR", "FROM", "FULL", "GROUP", "HAVING", "INNER", "INTERSECT",
    "INTO", "JOIN", "LEFT", "LIMIT", "LOCK", "NATURAL", "ON", "ORDER", "OUTER", "RIGHT",
    "SELECT", "STRAIGHT_JOIN", "UNION", "USING", "WHERE", "WINDOW",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Word(&'a str),
    Quoted(&'a str),
    Open,
    Close,
    Comma,
    Dot,
    Other,
}

impl<'a> Token<'a> {
    fn ident(self) -> Option<&'a str> {
        match self {
            Token::Word(name) | Token::Quoted(name) => Some(name),
            _ => None,
        }
    }

    fn is_keyword(self, keyword: &str) -> bool {
        matches!(self, Token::Word(word) if word.eq_ignore_ascii_case(keyword))
    }

    fn starts_query(self) -> bool {
        self.is_keyword("SELECT") || self.is_keyword("WITH")
    }

    fn is_alias(self) -> bool {
        match self {
            Token::Quoted(_) => true,
            Token::Word(word) => !CLAUSE_KEYWORDS
                .iter()
                .any(|keyword| word.eq_ignore_ascii_case(keyword)),
            _ => false,
        }
    }
}

fn tokenize(sql: &str) -> Vec<Token<'_>> {
    SQL_TOKEN
        .captures_iter(sql)
        .filter_map(|caps| {
            if caps.name("skip").is_some() {
                None
            } else if let Some(word) = caps.name("word") {
                Some(Token::Word(word.as_str()))
            } else if let Some(quoted) = caps.name("quoted") {
                Some(Token::Quoted(quoted.as_str()))
            } else if let Some(punct) = caps.name("punct") {
                Some(match punct.as_str() {
                    "(" => Token::Open,
                    ")" => Token::Close,
                    "," => Token::Comma,
                    _ => Token::Dot,
                })
            } else {
                Some(Token::Other)
            }
        })
        .collect()
}

/// The identifier in front of `tokens[end]`, skipping one parenthesized
/// column list (`name (a, b) AS (...)`).
fn name_before<'a>(tokens: &[Token<'a>], end: usize) -> Option<&'a str> {
    let mut index = end.checked_sub(1)?;
    if tokens[index] == Token::Close {
        let mut depth = 0usize;
        loop {
            match tokens[index] {
                Token::Close => depth += 1,
                Token::Open => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
            index = index.checked_sub(1)?;
        }
        index = index.checked_sub(1)?;
    }
    tokens[index].ident()
}

/// Names declared by `WITH name AS (SELECT ...)`.
fn cte_names<'a>(tokens: &[Token<'a>]) -> Vec<&'a str> {
    (0..tokens.len())
        .filter(|&index| {
            tokens[index].is_keyword("AS")
                && tokens.get(index + 1) == Some(&Token::Open)
                && tokens.get(index + 2).is_some_and(|t| t.starts_query())
        })
        .filter_map(|index| name_before(tokens, index))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Nothing,
    Table,
    AfterTable,
    Alias,
    AfterAlias,
}

/// A parenthesized region. Only query scopes (the statement itself and
/// subqueries) have table clauses; `EXTRACT(YEAR FROM ...)` does not.
struct Scope {
    is_query: bool,
    expect: Expect,
}

/// A single (question, SQL) demonstration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Example {
    pub question: String,
    pub sql: String,
}

impl Example {
    pub fn new(question: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            sql: sql.into(),
        }
    }
}

/// Returns the tables a statement reads from, in order of appearance and
/// without duplicates.
///
/// Covers `FROM`/`JOIN` targets, comma-separated table lists, derived tables
/// and subqueries. Qualified names (`db.table`) yield the table part. Names
/// declared by a `WITH` clause are not tables and are left out.
pub fn referenced_tables(sql: &str) -> Vec<String> {
    let tokens = tokenize(sql);
    let ctes = cte_names(&tokens);
    let mut tables: Vec<String> = Vec::new();
    let mut scopes = vec![Scope {
        is_query: true,
        expect: Expect::Nothing,
    }];

    let mut index = 0;
    while index < tokens.len() {
        let token = tokens[index];
        index += 1;

        if token == Token::Open {
            if let Some(parent) = scopes.last_mut() {
                parent.expect = if parent.expect == Expect::Table {
                    Expect::AfterTable
                } else {
                    Expect::Nothing
                };
            }
            scopes.push(Scope {
                is_query: tokens.get(index).is_some_and(|t| t.starts_query()),
                expect: Expect::Nothing,
            });
            continue;
        }
        if token == Token::Close {
            if scopes.len() > 1 {
                scopes.pop();
            }
            continue;
        }

        let Some(scope) = scopes.last_mut() else {
            break;
        };
        if !scope.is_query {
            continue;
        }

        match scope.expect {
            Expect::Table => {
                scope.expect = Expect::Nothing;
                if let Some(mut name) = token.ident() {
                    while tokens.get(index) == Some(&Token::Dot) {
                        let Some(part) = tokens.get(index + 1).and_then(|t| t.ident()) else {
                            break;
                        };
                        name = part;
                        index += 2;
                    }
                    let is_cte = ctes.iter().any(|cte| cte.eq_ignore_ascii_case(name));
                    if !is_cte && !tables.iter().any(|t| t.eq_ignore_ascii_case(name)) {
                        tables.push(name.to_string());
                    }
                    scope.expect = Expect::AfterTable;
                }
                continue;
            }
            Expect::AfterTable => {
                if token.is_keyword("AS") {
                    scope.expect = Expect::Alias;
                    continue;
                }
                if token == Token::Comma {
                    scope.expect = Expect::Table;
                    continue;
                }
                if token.is_alias() {
                    scope.expect = Expect::AfterAlias;
                    continue;
                }
                scope.expect = Expect::Nothing;
            }
            Expect::Alias => {
                scope.expect = Expect::AfterAlias;
                continue;
            }
            Expect::AfterAlias => {
                if token == Token::Comma {
                    scope.expect = Expect::Table;
                    continue;
                }
                scope.expect = Expect::Nothing;
            }
            Expect::Nothing => {}
        }

        if token.is_keyword("FROM") || token.is_keyword("JOIN") || token.is_keyword("STRAIGHT_JOIN")
        {
            scope.expect = Expect::Table;
        }
    }
    tables
}

/// An ordered, immutable list of examples.
#[derive(Debug, Clone, Default)]
pub struct ExampleBank {
    examples: Vec<Example>,
}

impl ExampleBank {
    pub fn new(examples: Vec<Example>) -> Result<Self, CatalogError> {
        for (index, example) in examples.iter().enumerate() {
            let context = format!("Example #{}", index + 1);
            if example.question.trim().is_empty() {
                return Err(CatalogError::MissingField {
                    context,
                    field: "question",
                });
            }
            if example.sql.trim().is_empty() {
                return Err(CatalogError::MissingField {
                    context,
                    field: "sql",
                });
            }
        }
        Ok(Self { examples })
    }

    /// All examples, in the order they appear in the prompt.
    pub fn all(&self) -> &[Example] {
        &self.examples
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Checks that every table an example queries is described in `catalog`.
    ///
    /// Example numbers in the error are 1-based.
    pub fn validate_against(&self, catalog: &SchemaCatalog) -> Result<(), CatalogError> {
        for (index, example) in self.examples.iter().enumerate() {
            if let Some(table) = referenced_tables(&example.sql)
                .into_iter()
                .find(|table| !catalog.contains(table))
            {
                return Err(CatalogError::UnknownTable {
                    example: index + 1,
                    table,
                });
            }
        }
        Ok(())
    }
}

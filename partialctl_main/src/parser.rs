// PartialCTL: Checking CTL Properties on Partially Explored State Spaces
// Copyright (C) 2021  Tibor Schneider
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! Parser for the formula file
//!
//! Every non-empty line, which does not start with `#`, has the form `name: formula`. The grammar
//! of the formula is (from the weakest to the strongest binding):
//!
//! ```text
//! iff     := implies [ "<->" iff ]
//! implies := or [ "->" implies ]
//! or      := and { "||" and }
//! and     := unary { "&&" unary }
//! unary   := "!" unary | ("EX" | "AX" | "EG" | "AG" | "EF" | "AF") unary
//!          | ("E" | "A") "[" iff "U" iff "]" | "(" iff ")"
//!          | "true" | "false" | ident | "\"" string "\""
//! ```

use partialctl::Formula;
use thiserror::Error;

/// Error while parsing the formula file. Lines and columns start at 1.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The line is not of the form `name: formula`
    #[error("line {line}: expected `name: formula`")]
    MissingName {
        /// line number
        line: usize,
    },
    /// A character that is not part of any token
    #[error("line {line}, column {column}: unexpected character `{c}`")]
    InvalidCharacter {
        /// line number
        line: usize,
        /// column of the character
        column: usize,
        /// the character
        c: char,
    },
    /// A string literal which is not closed
    #[error("line {line}, column {column}: unterminated string")]
    UnterminatedString {
        /// line number
        line: usize,
        /// column of the opening quote
        column: usize,
    },
    /// A token at a position where it is not allowed
    #[error("line {line}, column {column}: unexpected `{token}`, expected {expected}")]
    UnexpectedToken {
        /// line number
        line: usize,
        /// column of the token
        column: usize,
        /// the token
        token: String,
        /// description of what was expected instead
        expected: &'static str,
    },
    /// The formula ended too early
    #[error("line {line}: unexpected end of the formula, expected {expected}")]
    UnexpectedEnd {
        /// line number
        line: usize,
        /// description of what was expected
        expected: &'static str,
    },
}

const KEYWORDS: [&str; 9] = ["true", "false", "EX", "AX", "EG", "AG", "EF", "AF", "U"];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Quoted(String),
    Not,
    And,
    Or,
    Implies,
    Iff,
    LParen,
    RParen,
    LBracket,
    RBracket,
}

impl Token {
    fn text(&self) -> String {
        match self {
            Token::Ident(s) => s.clone(),
            Token::Quoted(s) => format!("\"{}\"", s),
            Token::Not => "!".to_string(),
            Token::And => "&&".to_string(),
            Token::Or => "||".to_string(),
            Token::Implies => "->".to_string(),
            Token::Iff => "<->".to_string(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
            Token::LBracket => "[".to_string(),
            Token::RBracket => "]".to_string(),
        }
    }
}

/// Parse the content of a formula file, returning the named formulas in the order of the file.
pub fn parse_formula_file(src: &str) -> Result<Vec<(String, Formula)>, ParseError> {
    let mut formulas = Vec::new();
    for (i, raw) in src.lines().enumerate() {
        let line = i + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let sep = raw.find(':').ok_or(ParseError::MissingName { line })?;
        let name = raw[..sep].trim();
        if name.is_empty() {
            return Err(ParseError::MissingName { line });
        }
        let offset = raw[..=sep].chars().count();
        let formula = parse_formula_at(&raw[sep + 1..], line, offset)?;
        formulas.push((name.to_string(), formula));
    }
    Ok(formulas)
}

fn parse_formula_at(src: &str, line: usize, offset: usize) -> Result<Formula, ParseError> {
    let tokens = tokenize(src, line, offset)?;
    let mut parser = Parser { tokens, pos: 0, line };
    let formula = parser.iff()?;
    match parser.next() {
        None => Ok(formula),
        Some((column, token)) => Err(ParseError::UnexpectedToken {
            line,
            column,
            token: token.text(),
            expected: "end of the formula",
        }),
    }
}

fn tokenize(src: &str, line: usize, offset: usize) -> Result<Vec<(usize, Token)>, ParseError> {
    let chars: Vec<char> = src.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let column = offset + i + 1;
        let rest = &chars[i..];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let (token, len) = if rest.starts_with(&['<', '-', '>']) {
            (Token::Iff, 3)
        } else if rest.starts_with(&['-', '>']) {
            (Token::Implies, 2)
        } else if rest.starts_with(&['&', '&']) {
            (Token::And, 2)
        } else if rest.starts_with(&['|', '|']) {
            (Token::Or, 2)
        } else if c == '!' {
            (Token::Not, 1)
        } else if c == '(' {
            (Token::LParen, 1)
        } else if c == ')' {
            (Token::RParen, 1)
        } else if c == '[' {
            (Token::LBracket, 1)
        } else if c == ']' {
            (Token::RBracket, 1)
        } else if c == '"' {
            let len = rest[1..]
                .iter()
                .position(|x| *x == '"')
                .ok_or(ParseError::UnterminatedString { line, column })?;
            (Token::Quoted(rest[1..=len].iter().collect()), len + 2)
        } else if c.is_alphabetic() || c == '_' {
            let len = rest
                .iter()
                .position(|x| !(x.is_alphanumeric() || *x == '_' || *x == '.'))
                .unwrap_or_else(|| rest.len());
            (Token::Ident(rest[..len].iter().collect()), len)
        } else {
            return Err(ParseError::InvalidCharacter { line, column, c });
        };

        tokens.push((column, token));
        i += len;
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    line: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    fn peek_second(&self) -> Option<&Token> {
        self.tokens.get(self.pos + 1).map(|(_, t)| t)
    }

    fn next(&mut self) -> Option<(usize, Token)> {
        let t = self.tokens.get(self.pos).cloned();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: Token, expected: &'static str) -> Result<(), ParseError> {
        match self.next() {
            Some((_, t)) if t == token => Ok(()),
            Some((column, t)) => Err(ParseError::UnexpectedToken {
                line: self.line,
                column,
                token: t.text(),
                expected,
            }),
            None => Err(ParseError::UnexpectedEnd { line: self.line, expected }),
        }
    }

    fn iff(&mut self) -> Result<Formula, ParseError> {
        let lhs = self.implies()?;
        if self.eat(&Token::Iff) {
            Ok(Formula::iff(lhs, self.iff()?))
        } else {
            Ok(lhs)
        }
    }

    fn implies(&mut self) -> Result<Formula, ParseError> {
        let lhs = self.or()?;
        if self.eat(&Token::Implies) {
            Ok(Formula::implies(lhs, self.implies()?))
        } else {
            Ok(lhs)
        }
    }

    fn or(&mut self) -> Result<Formula, ParseError> {
        let mut lhs = self.and()?;
        while self.eat(&Token::Or) {
            lhs = Formula::or(lhs, self.and()?);
        }
        Ok(lhs)
    }

    fn and(&mut self) -> Result<Formula, ParseError> {
        let mut lhs = self.unary()?;
        while self.eat(&Token::And) {
            lhs = Formula::and(lhs, self.unary()?);
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Formula, ParseError> {
        const EXPECTED: &str = "a formula";

        let quantified = matches!(self.peek(), Some(Token::Ident(q)) if q == "E" || q == "A")
            && self.peek_second() == Some(&Token::LBracket);
        if quantified {
            return self.until();
        }

        let (column, token) = match self.next() {
            Some(t) => t,
            None => return Err(ParseError::UnexpectedEnd { line: self.line, expected: EXPECTED }),
        };

        match token {
            Token::Not => Ok(Formula::not(self.unary()?)),
            Token::LParen => {
                let f = self.iff()?;
                self.expect(Token::RParen, "`)`")?;
                Ok(f)
            }
            Token::Quoted(name) => Ok(Formula::atomic(name)),
            Token::Ident(name) => match name.as_str() {
                "true" => Ok(Formula::True),
                "false" => Ok(Formula::False),
                "EX" => Ok(Formula::exists_next(self.unary()?)),
                "AX" => Ok(Formula::for_all_next(self.unary()?)),
                "EG" => Ok(Formula::exists_always(self.unary()?)),
                "AG" => Ok(Formula::for_all_always(self.unary()?)),
                "EF" => Ok(Formula::exists_eventually(self.unary()?)),
                "AF" => Ok(Formula::for_all_eventually(self.unary()?)),
                kw if KEYWORDS.contains(&kw) => Err(ParseError::UnexpectedToken {
                    line: self.line,
                    column,
                    token: kw.to_string(),
                    expected: EXPECTED,
                }),
                other => Ok(Formula::atomic(other)),
            },
            t => Err(ParseError::UnexpectedToken {
                line: self.line,
                column,
                token: t.text(),
                expected: EXPECTED,
            }),
        }
    }

    /// `E[a U b]` or `A[a U b]`, where the quantifier is the next token.
    fn until(&mut self) -> Result<Formula, ParseError> {
        let exists = self.next().map_or(false, |(_, t)| t == Token::Ident("E".to_string()));
        self.expect(Token::LBracket, "`[`")?;
        let a = self.iff()?;
        self.expect(Token::Ident("U".to_string()), "`U`")?;
        let b = self.iff()?;
        self.expect(Token::RBracket, "`]`")?;
        if exists {
            Ok(Formula::exists_until(a, b))
        } else {
            Ok(Formula::for_all_until(a, b))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse_formula(src: &str) -> Result<Formula, ParseError> {
        parse_formula_at(src, 1, 0)
    }

    fn p() -> Formula {
        Formula::atomic("p")
    }

    fn q() -> Formula {
        Formula::atomic("q")
    }

    #[test]
    fn atoms() {
        assert_eq!(parse_formula("true"), Ok(Formula::True));
        assert_eq!(parse_formula(" false "), Ok(Formula::False));
        assert_eq!(parse_formula("p"), Ok(p()));
        assert_eq!(parse_formula("x.is_ready_2"), Ok(Formula::atomic("x.is_ready_2")));
        assert_eq!(parse_formula("\"lock held\""), Ok(Formula::atomic("lock held")));
    }

    #[test]
    fn precedence() {
        assert_eq!(parse_formula("!p && q"), Ok(!p() & q()));
        assert_eq!(parse_formula("p || q && p"), Ok(p() | (q() & p())));
        assert_eq!(parse_formula("p && q || p"), Ok((p() & q()) | p()));
        assert_eq!(
            parse_formula("p -> q -> p"),
            Ok(Formula::implies(p(), Formula::implies(q(), p())))
        );
        assert_eq!(
            parse_formula("p || q <-> q"),
            Ok(Formula::iff(p() | q(), q()))
        );
        assert_eq!(parse_formula("EX p && q"), Ok(Formula::exists_next(p()) & q()));
        assert_eq!(parse_formula("EX (p && q)"), Ok(Formula::exists_next(p() & q())));
    }

    #[test]
    fn temporal() {
        assert_eq!(parse_formula("AG EF p"), Ok(Formula::for_all_always(Formula::exists_eventually(p()))));
        assert_eq!(parse_formula("AX !q"), Ok(Formula::for_all_next(!q())));
        assert_eq!(parse_formula("EG AF q"), Ok(Formula::exists_always(Formula::for_all_eventually(q()))));
        assert_eq!(parse_formula("E[p U q]"), Ok(Formula::exists_until(p(), q())));
        assert_eq!(
            parse_formula("A[p || q U EX q]"),
            Ok(Formula::for_all_until(p() | q(), Formula::exists_next(q())))
        );
        // `E` and `A` are only quantifiers in front of a bracket
        assert_eq!(parse_formula("E && A"), Ok(Formula::atomic("E") & Formula::atomic("A")));
    }

    #[test]
    fn reparse_display() {
        let formulas = vec![
            Formula::for_all_always(Formula::implies(p(), Formula::for_all_eventually(q()))),
            Formula::iff(!Formula::exists_next(p()), Formula::exists_until(Formula::True, q())),
            Formula::for_all_until(p() & !q(), Formula::False | Formula::exists_always(q())),
            !(!p()),
        ];
        for f in formulas {
            assert_eq!(parse_formula(&f.to_string()), Ok(f));
        }
    }

    #[test]
    fn errors() {
        assert_eq!(
            parse_formula("p &&"),
            Err(ParseError::UnexpectedEnd { line: 1, expected: "a formula" })
        );
        assert_eq!(
            parse_formula("(p"),
            Err(ParseError::UnexpectedEnd { line: 1, expected: "`)`" })
        );
        assert_eq!(
            parse_formula("p q"),
            Err(ParseError::UnexpectedToken {
                line: 1,
                column: 3,
                token: "q".to_string(),
                expected: "end of the formula"
            })
        );
        assert_eq!(
            parse_formula("p & q"),
            Err(ParseError::InvalidCharacter { line: 1, column: 3, c: '&' })
        );
        assert_eq!(
            parse_formula("E[p q]"),
            Err(ParseError::UnexpectedToken {
                line: 1,
                column: 5,
                token: "q".to_string(),
                expected: "`U`"
            })
        );
        assert_eq!(
            parse_formula("EX U"),
            Err(ParseError::UnexpectedToken {
                line: 1,
                column: 4,
                token: "U".to_string(),
                expected: "a formula"
            })
        );
        assert_eq!(
            parse_formula("\"open"),
            Err(ParseError::UnterminatedString { line: 1, column: 1 })
        );
    }

    #[test]
    fn file() {
        let src = "# safety\nsafe: AG !error\n\n  live : AG (request -> AF granted)\n";
        let formulas = parse_formula_file(src).unwrap();
        assert_eq!(formulas.len(), 2);
        assert_eq!(formulas[0], ("safe".to_string(), Formula::for_all_always(!Formula::atomic("error"))));
        assert_eq!(formulas[1].0, "live");
        assert_eq!(formulas[1].1.to_string(), "AG (request -> AF granted)");
    }

    #[test]
    fn file_errors() {
        assert_eq!(
            parse_formula_file("a: p\nno separator\n"),
            Err(ParseError::MissingName { line: 2 })
        );
        assert_eq!(parse_formula_file(": p"), Err(ParseError::MissingName { line: 1 }));
        // columns are counted from the start of the line
        assert_eq!(
            parse_formula_file("a: p\nbb: p $ q"),
            Err(ParseError::InvalidCharacter { line: 2, column: 7, c: '$' })
        );
    }
}

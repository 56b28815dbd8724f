// SPDX-License-Identifier: Apache-2.0

//! Constant-expression evaluation for port ranges and parameter overrides.

use std::collections::HashMap;

use crate::util::clog2;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Token {
    Num(i64),
    Ident(String),
    Op(&'static str),
    LParen,
    RParen,
}

const OPERATORS: [&str; 10] = ["<<<", ">>>", "<<", ">>", "**", "+", "-", "*", "/", "%"];

/// Evaluates `expr`, resolving identifiers through `env`. Returns `None` if
/// the expression uses an unknown identifier, an unsupported construct, or
/// overflows.
pub(crate) fn evaluate(expr: &str, env: &HashMap<String, i64>) -> Option<i64> {
    let tokens = tokenize(expr)?;
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        env,
    };
    let value = parser.shift()?;
    (parser.pos == tokens.len()).then_some(value)
}

fn tokenize(expr: &str) -> Option<Vec<Token>> {
    let chars: Vec<char> = expr.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    'outer: while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
        } else if c.is_ascii_digit() || c == '\'' {
            let start = i;
            while i < chars.len()
                && (chars[i].is_ascii_alphanumeric() || chars[i] == '_' || chars[i] == '\'')
            {
                i += 1;
            }
            let text: String = chars[start..i].iter().collect();
            tokens.push(Token::Num(parse_number(&text)?));
        } else if c.is_ascii_alphabetic() || c == '_' || c == '$' {
            let start = i;
            while i < chars.len()
                && (chars[i].is_ascii_alphanumeric() || chars[i] == '_' || chars[i] == '$')
            {
                i += 1;
            }
            tokens.push(Token::Ident(chars[start..i].iter().collect()));
        } else if c == '(' {
            tokens.push(Token::LParen);
            i += 1;
        } else if c == ')' {
            tokens.push(Token::RParen);
            i += 1;
        } else {
            for op in OPERATORS {
                let len = op.len();
                if i + len <= chars.len() && chars[i..i + len].iter().copied().eq(op.chars()) {
                    // Arithmetic shifts behave like logical ones on the
                    // non-negative values that appear in ranges.
                    let op = match op {
                        "<<<" => "<<",
                        ">>>" => ">>",
                        other => other,
                    };
                    tokens.push(Token::Op(op));
                    i += len;
                    continue 'outer;
                }
            }
            return None;
        }
    }
    Some(tokens)
}

/// Parses a Verilog integer literal: `42`, `1_000`, `8'hff`, `'b1010`,
/// `4'sd3`.
fn parse_number(text: &str) -> Option<i64> {
    match text.split_once('\'') {
        None => text.replace('_', "").parse().ok(),
        Some((_size, rest)) => {
            let rest = rest.trim_start_matches(['s', 'S']);
            let mut chars = rest.chars();
            let radix = match chars.next()?.to_ascii_lowercase() {
                'b' => 2,
                'o' => 8,
                'd' => 10,
                'h' => 16,
                _ => return None,
            };
            let digits: String = chars.filter(|c| *c != '_').collect();
            i64::from_str_radix(&digits, radix).ok()
        }
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    env: &'a HashMap<String, i64>,
}

impl Parser<'_> {
    fn peek_op(&self) -> Option<&'static str> {
        match self.tokens.get(self.pos) {
            Some(Token::Op(op)) => Some(op),
            _ => None,
        }
    }

    fn expect(&mut self, token: &Token) -> Option<()> {
        if self.tokens.get(self.pos) == Some(token) {
            self.pos += 1;
            Some(())
        } else {
            None
        }
    }

    fn shift(&mut self) -> Option<i64> {
        let mut lhs = self.additive()?;
        while let Some(op @ ("<<" | ">>")) = self.peek_op() {
            self.pos += 1;
            let rhs = u32::try_from(self.additive()?).ok()?;
            lhs = match op {
                "<<" => lhs.checked_shl(rhs)?,
                _ => lhs.checked_shr(rhs)?,
            };
        }
        Some(lhs)
    }

    fn additive(&mut self) -> Option<i64> {
        let mut lhs = self.term()?;
        while let Some(op @ ("+" | "-")) = self.peek_op() {
            self.pos += 1;
            let rhs = self.term()?;
            lhs = match op {
                "+" => lhs.checked_add(rhs)?,
                _ => lhs.checked_sub(rhs)?,
            };
        }
        Some(lhs)
    }

    fn term(&mut self) -> Option<i64> {
        let mut lhs = self.power()?;
        while let Some(op @ ("*" | "/" | "%")) = self.peek_op() {
            self.pos += 1;
            let rhs = self.power()?;
            lhs = match op {
                "*" => lhs.checked_mul(rhs)?,
                "/" => lhs.checked_div(rhs)?,
                _ => lhs.checked_rem(rhs)?,
            };
        }
        Some(lhs)
    }

    fn power(&mut self) -> Option<i64> {
        let base = self.unary()?;
        if self.peek_op() == Some("**") {
            self.pos += 1;
            let exp = u32::try_from(self.power()?).ok()?;
            return base.checked_pow(exp);
        }
        Some(base)
    }

    fn unary(&mut self) -> Option<i64> {
        match self.peek_op() {
            Some("-") => {
                self.pos += 1;
                self.unary()?.checked_neg()
            }
            Some("+") => {
                self.pos += 1;
                self.unary()
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Option<i64> {
        let token = self.tokens.get(self.pos)?.clone();
        self.pos += 1;
        match token {
            Token::Num(n) => Some(n),
            Token::LParen => {
                let value = self.shift()?;
                self.expect(&Token::RParen)?;
                Some(value)
            }
            Token::Ident(name) if name == "$clog2" => {
                self.expect(&Token::LParen)?;
                let arg = self.shift()?;
                self.expect(&Token::RParen)?;
                Some(clog2(u64::try_from(arg).unwrap_or(0)).into())
            }
            Token::Ident(name) => self.env.get(&name).copied(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn env() -> HashMap<String, i64> {
        HashMap::from([("W".to_string(), 32), ("DEPTH".to_string(), 1024)])
    }

    #[rstest]
    #[case("W-1", Some(31))]
    #[case("(W/8)-1", Some(3))]
    #[case("W*2+W%5", Some(66))]
    #[case("1<<4", Some(16))]
    #[case("DEPTH>>2", Some(256))]
    #[case("$clog2(DEPTH)-1", Some(9))]
    #[case("2**3-1", Some(7))]
    #[case("-W+33", Some(1))]
    #[case("8'hff", Some(255))]
    #[case("'b1_0", Some(2))]
    #[case("4'sd7", Some(7))]
    #[case("UNKNOWN-1", None)]
    #[case("W/0", None)]
    #[case("(W-1", None)]
    #[case("W ? 1 : 0", None)]
    fn evaluates(#[case] expr: &str, #[case] expected: Option<i64>) {
        assert_eq!(evaluate(expr, &env()), expected);
    }
}

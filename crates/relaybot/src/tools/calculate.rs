use std::fmt::{self, Display};
use std::future::ready;

use relaybot_core::tool::{Tool, ToolResult};
use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize, JsonSchema)]
pub struct CalculateToolParameters {
    #[schemars(description = "The mathematical expression to evaluate.")]
    expression: String,
}

/// A tool for evaluating arithmetic expressions.
///
/// Expressions go through a small tokenizer and recursive-descent
/// evaluator restricted to numeric operators, so no code is ever
/// executed on the tool's behalf. Evaluation failures are part of the
/// tool's output: the model gets a readable message and decides how to
/// go on.
pub struct CalculateTool {
    parameter_schema: Value,
}

impl CalculateTool {
    /// Creates a new calculate tool.
    #[inline]
    pub fn new() -> Self {
        CalculateTool {
            parameter_schema: schema_for!(CalculateToolParameters).to_value(),
        }
    }
}

impl Default for CalculateTool {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for CalculateTool {
    type Input = CalculateToolParameters;

    fn name(&self) -> &str {
        "calculate"
    }

    fn description(&self) -> &str {
        r#"
Perform a mathematical calculation.
Supports +, -, *, / and % with parentheses and decimal numbers."#
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    fn execute(
        &self,
        input: CalculateToolParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        let text = match evaluate(&input.expression) {
            Ok(value) => format_value(value),
            Err(err) => format!("Error calculating: {err}"),
        };
        ready(Ok(text))
    }
}

/// Evaluates an expression down to a single number.
fn evaluate(expression: &str) -> Result<f64, EvalError> {
    let tokens = tokenize(expression)?;
    let mut parser = Parser { tokens, pos: 0 };
    let value = parser.expr()?;
    if parser.pos != parser.tokens.len() {
        return Err(EvalError::TrailingInput);
    }
    Ok(value)
}

/// Formats a result the way a person would write it: integral values
/// without a fractional part, everything else as a plain decimal.
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    LParen,
    RParen,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum EvalError {
    InvalidCharacter(char),
    MalformedNumber(String),
    UnexpectedEnd,
    UnexpectedToken,
    TrailingInput,
    DivisionByZero,
}

impl Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::InvalidCharacter(c) => {
                write!(f, "invalid character `{c}`")
            }
            EvalError::MalformedNumber(text) => {
                write!(f, "malformed number `{text}`")
            }
            EvalError::UnexpectedEnd => {
                write!(f, "unexpected end of expression")
            }
            EvalError::UnexpectedToken => write!(f, "unexpected token"),
            EvalError::TrailingInput => {
                write!(f, "unexpected input after expression")
            }
            EvalError::DivisionByZero => write!(f, "division by zero"),
        }
    }
}

fn tokenize(expression: &str) -> Result<Vec<Token>, EvalError> {
    let mut tokens = Vec::new();
    let mut chars = expression.char_indices().peekable();
    while let Some(&(start, c)) = chars.peek() {
        match c {
            ' ' | '\t' | '\n' | '\r' => {
                chars.next();
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '*' => {
                chars.next();
                tokens.push(Token::Star);
            }
            '/' => {
                chars.next();
                tokens.push(Token::Slash);
            }
            '%' => {
                chars.next();
                tokens.push(Token::Percent);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '0'..='9' | '.' => {
                let mut end = start;
                while let Some(&(idx, c)) = chars.peek() {
                    if !c.is_ascii_digit() && c != '.' {
                        break;
                    }
                    end = idx + c.len_utf8();
                    chars.next();
                }
                let text = &expression[start..end];
                let value = text.parse().map_err(|_| {
                    EvalError::MalformedNumber(text.to_owned())
                })?;
                tokens.push(Token::Number(value));
            }
            other => return Err(EvalError::InvalidCharacter(other)),
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Result<Token, EvalError> {
        let token = self.peek().ok_or(EvalError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(token)
    }

    /// expr := term (("+" | "-") term)*
    fn expr(&mut self) -> Result<f64, EvalError> {
        let mut value = self.term()?;
        while let Some(op) = self.peek() {
            match op {
                Token::Plus => {
                    self.pos += 1;
                    value += self.term()?;
                }
                Token::Minus => {
                    self.pos += 1;
                    value -= self.term()?;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    /// term := unary (("*" | "/" | "%") unary)*
    fn term(&mut self) -> Result<f64, EvalError> {
        let mut value = self.unary()?;
        while let Some(op) = self.peek() {
            match op {
                Token::Star => {
                    self.pos += 1;
                    value *= self.unary()?;
                }
                Token::Slash => {
                    self.pos += 1;
                    let divisor = self.unary()?;
                    if divisor == 0.0 {
                        return Err(EvalError::DivisionByZero);
                    }
                    value /= divisor;
                }
                Token::Percent => {
                    self.pos += 1;
                    let divisor = self.unary()?;
                    if divisor == 0.0 {
                        return Err(EvalError::DivisionByZero);
                    }
                    value %= divisor;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    /// unary := "-" unary | primary
    fn unary(&mut self) -> Result<f64, EvalError> {
        if self.peek() == Some(Token::Minus) {
            self.pos += 1;
            return Ok(-self.unary()?);
        }
        self.primary()
    }

    /// primary := number | "(" expr ")"
    fn primary(&mut self) -> Result<f64, EvalError> {
        match self.next()? {
            Token::Number(value) => Ok(value),
            Token::LParen => {
                let value = self.expr()?;
                if self.next()? != Token::RParen {
                    return Err(EvalError::UnexpectedToken);
                }
                Ok(value)
            }
            _ => Err(EvalError::UnexpectedToken),
        }
    }
}

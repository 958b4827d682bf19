//! Arithmetic calculator tool.
//!
//! A restricted recursive-descent evaluator: numeric literals, the four
//! basic operators, unary minus, and parentheses. Nothing else is
//! accepted, so model-supplied input can never execute arbitrary code.

use async_trait::async_trait;

use crate::error::ToolError;

use super::Tool;

/// Evaluate simple arithmetic expressions.
pub struct Calculator;

#[async_trait]
impl Tool for Calculator {
    fn name(&self) -> &str {
        "calculator"
    }

    fn description(&self) -> &str {
        "Evaluate an arithmetic expression. Input must be a plain expression \
         using numbers, + - * /, and parentheses, e.g. '17 + 25'. Use this \
         for any numeric calculation; do not compute numbers yourself."
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolError> {
        let value = evaluate(input)?;
        Ok(format!("{}", value))
    }
}

/// Evaluate `input` as an arithmetic expression.
pub fn evaluate(input: &str) -> Result<f64, ToolError> {
    let mut parser = Parser::new(input);
    let value = parser.expression()?;
    parser.skip_whitespace();
    if let Some(c) = parser.peek() {
        return Err(ToolError::ExpressionParse(format!(
            "unexpected character '{}' at position {}",
            c, parser.pos
        )));
    }
    Ok(value)
}

struct Parser<'a> {
    chars: Vec<char>,
    pos: usize,
    input: &'a str,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            input,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    // expression := term (('+' | '-') term)*
    fn expression(&mut self) -> Result<f64, ToolError> {
        let mut value = self.term()?;
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('+') => {
                    self.bump();
                    value += self.term()?;
                }
                Some('-') => {
                    self.bump();
                    value -= self.term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    // term := factor (('*' | '/') factor)*
    fn term(&mut self) -> Result<f64, ToolError> {
        let mut value = self.factor()?;
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('*') => {
                    self.bump();
                    value *= self.factor()?;
                }
                Some('/') => {
                    self.bump();
                    let divisor = self.factor()?;
                    if divisor == 0.0 {
                        return Err(ToolError::Arithmetic("division by zero".to_string()));
                    }
                    value /= divisor;
                }
                _ => return Ok(value),
            }
        }
    }

    // factor := '-' factor | '(' expression ')' | number
    fn factor(&mut self) -> Result<f64, ToolError> {
        self.skip_whitespace();
        match self.peek() {
            Some('-') => {
                self.bump();
                Ok(-self.factor()?)
            }
            Some('(') => {
                self.bump();
                let value = self.expression()?;
                self.skip_whitespace();
                if self.bump() != Some(')') {
                    return Err(ToolError::ExpressionParse(
                        "missing closing parenthesis".to_string(),
                    ));
                }
                Ok(value)
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.number(),
            Some(c) => Err(ToolError::ExpressionParse(format!(
                "unexpected character '{}' in '{}'",
                c,
                self.input.trim()
            ))),
            None => Err(ToolError::ExpressionParse(
                "unexpected end of expression".to_string(),
            )),
        }
    }

    fn number(&mut self) -> Result<f64, ToolError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '.') {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        text.parse()
            .map_err(|_| ToolError::ExpressionParse(format!("invalid number '{}'", text)))
    }
}

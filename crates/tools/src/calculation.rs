//! Calculation tool: finds an arithmetic expression in the query and
//! evaluates it.
//!
//! Supports `+ - * / % ^`, parentheses, unary minus and decimals.
//! `^` is right-associative and binds tighter than unary minus
//! (`-2^2 = -4`).

use async_trait::async_trait;
use chorus_core::classification::ToolName;
use chorus_core::error::ToolError;
use chorus_core::tool::{Tool, ToolOutput};
use regex_lite::Regex;
use std::iter::Peekable;
use std::str::Chars;
use tracing::debug;

pub struct CalculationTool;

#[async_trait]
impl Tool for CalculationTool {
    fn name(&self) -> &str {
        ToolName::Calculation.as_str()
    }

    fn description(&self) -> &str {
        "Evaluate the arithmetic expression contained in the query."
    }

    async fn invoke(&self, parameters: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let expression = match parameters["expression"].as_str() {
            Some(expr) => expr.to_string(),
            None => {
                let query = parameters["query"].as_str().ok_or_else(|| {
                    ToolError::InvalidArguments("Missing 'query' or 'expression' argument".into())
                })?;
                extract_expression(query).ok_or_else(|| {
                    ToolError::InvalidArguments("No arithmetic expression found in query".into())
                })?
            }
        };

        let value = evaluate(&expression).map_err(|reason| ToolError::ExecutionFailed {
            tool_name: self.name().to_string(),
            reason,
        })?;

        debug!(expression = %expression, value, "Expression evaluated");
        Ok(ToolOutput {
            summary: format!("{expression} = {}", format_number(value)),
            data: serde_json::json!({ "expression": expression, "result": value }),
        })
    }
}

/// Runs of digits, operators, parentheses and spaces.
const EXPRESSION_PATTERN: &str = r"[\d.(][\d.\s+\-*/%^()]*";

/// The longest run in `text` that contains an operator and evaluates.
pub fn extract_expression(text: &str) -> Option<String> {
    let pattern = Regex::new(EXPRESSION_PATTERN).ok()?;
    let mut candidates: Vec<&str> = pattern
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .filter(|s| s.chars().any(|c| "+-*/%^".contains(c)))
        .collect();
    candidates.sort_by_key(|s| std::cmp::Reverse(s.len()));
    candidates
        .into_iter()
        .find(|s| evaluate(s).is_ok())
        .map(str::to_string)
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

// ── Evaluator ────────────────────────────────────────────────────────────

/// Deepest nesting of parentheses, unary minus and exponents accepted.
const MAX_DEPTH: usize = 64;

/// Evaluate an arithmetic expression.
pub fn evaluate(expr: &str) -> Result<f64, String> {
    let mut parser = Parser {
        chars: expr.chars().peekable(),
        depth: 0,
    };
    let value = parser.expr()?;
    parser.skip_ws();
    match parser.chars.peek() {
        None => Ok(value),
        Some(c) => Err(format!("Unexpected character: '{c}'")),
    }
}

struct Parser<'a> {
    chars: Peekable<Chars<'a>>,
    depth: usize,
}

impl Parser<'_> {
    fn skip_ws(&mut self) {
        while self.chars.next_if(|c| c.is_whitespace()).is_some() {}
    }

    fn eat(&mut self, op: char) -> bool {
        self.skip_ws();
        self.chars.next_if_eq(&op).is_some()
    }

    // expr = term (('+' | '-') term)*
    fn expr(&mut self) -> Result<f64, String> {
        let mut acc = self.term()?;
        loop {
            if self.eat('+') {
                acc += self.term()?;
            } else if self.eat('-') {
                acc -= self.term()?;
            } else {
                return Ok(acc);
            }
        }
    }

    // term = unary (('*' | '/' | '%') unary)*
    fn term(&mut self) -> Result<f64, String> {
        let mut acc = self.unary()?;
        loop {
            if self.eat('*') {
                acc *= self.unary()?;
            } else if self.eat('/') {
                let rhs = self.unary()?;
                if rhs == 0.0 {
                    return Err("Division by zero".into());
                }
                acc /= rhs;
            } else if self.eat('%') {
                let rhs = self.unary()?;
                if rhs == 0.0 {
                    return Err("Modulo by zero".into());
                }
                acc %= rhs;
            } else {
                return Ok(acc);
            }
        }
    }

    // unary = '-' unary | power
    //
    // Every recursive path ('(', '-', '^') passes through here.
    fn unary(&mut self) -> Result<f64, String> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err("Expression nested too deeply".into());
        }
        let value = if self.eat('-') {
            self.unary().map(|v| -v)
        } else {
            self.power()
        };
        self.depth -= 1;
        value
    }

    // power = primary ('^' unary)?
    fn power(&mut self) -> Result<f64, String> {
        let base = self.primary()?;
        if self.eat('^') {
            let exponent = self.unary()?;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    // primary = NUMBER | '(' expr ')'
    fn primary(&mut self) -> Result<f64, String> {
        if self.eat('(') {
            let value = self.expr()?;
            if !self.eat(')') {
                return Err("Expected closing parenthesis".into());
            }
            return Ok(value);
        }

        self.skip_ws();
        let mut literal = String::new();
        while let Some(c) = self.chars.next_if(|c| c.is_ascii_digit() || *c == '.') {
            literal.push(c);
        }
        if literal.is_empty() {
            return match self.chars.peek() {
                Some(c) => Err(format!("Unexpected character: '{c}'")),
                None => Err("Unexpected end of expression".into()),
            };
        }
        literal
            .parse()
            .map_err(|_| format!("Invalid number: {literal}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_and_parentheses() {
        assert_eq!(evaluate("2 + 3 * 4").unwrap(), 14.0);
        assert_eq!(evaluate("(2 + 3) * 4").unwrap(), 20.0);
        assert_eq!(evaluate("((1 + 2) * (3 + 4))").unwrap(), 21.0);
    }

    #[test]
    fn power_and_modulo() {
        assert_eq!(evaluate("2 ^ 3 ^ 2").unwrap(), 512.0);
        assert_eq!(evaluate("-2^2").unwrap(), -4.0);
        assert_eq!(evaluate("17 % 5").unwrap(), 2.0);
    }

    #[test]
    fn errors() {
        assert!(evaluate("1 / 0").is_err());
        assert!(evaluate("5 % 0").is_err());
        assert!(evaluate("(1 + 2").is_err());
        assert!(evaluate("1 +").is_err());
        assert!(evaluate("1..2 + 1").is_err());
        assert!(evaluate("2 x 3").is_err());
    }

    #[test]
    fn deep_nesting_is_rejected() {
        let parens = format!("{}1+1{}", "(".repeat(3000), ")".repeat(3000));
        assert_eq!(evaluate(&parens).unwrap_err(), "Expression nested too deeply");

        let minuses = format!("1 - {}1", "-".repeat(3000));
        assert_eq!(evaluate(&minuses).unwrap_err(), "Expression nested too deeply");

        let towers = format!("2{}", "^1".repeat(3000));
        assert_eq!(evaluate(&towers).unwrap_err(), "Expression nested too deeply");

        let shallow = format!("{}1+1{}", "(".repeat(40), ")".repeat(40));
        assert_eq!(evaluate(&shallow).unwrap(), 2.0);
    }

    #[test]
    fn extracts_expression_from_prose() {
        assert_eq!(
            extract_expression("What is 12 * (3 + 4)?").as_deref(),
            Some("12 * (3 + 4)")
        );
        assert_eq!(extract_expression("Calculate 2.5 / 5 please").as_deref(), Some("2.5 / 5"));
        assert!(extract_expression("no numbers here").is_none());
        assert!(extract_expression("the year 2024").is_none());
    }

    #[tokio::test]
    async fn invoke_with_query() {
        let out = CalculationTool
            .invoke(serde_json::json!({"query": "calculate 15 * 4 + 2"}))
            .await
            .unwrap();
        assert_eq!(out.summary, "15 * 4 + 2 = 62");
        assert_eq!(out.data["result"], 62.0);
    }

    #[tokio::test]
    async fn invoke_with_explicit_expression() {
        let out = CalculationTool
            .invoke(serde_json::json!({"expression": "10 / 4"}))
            .await
            .unwrap();
        assert_eq!(out.summary, "10 / 4 = 2.5");
    }

    #[tokio::test]
    async fn invoke_without_expression_fails() {
        let err = CalculationTool
            .invoke(serde_json::json!({"query": "what is love"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));

        let err = CalculationTool
            .invoke(serde_json::json!({"expression": "1 / 0"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::ExecutionFailed { .. }));
    }

    #[tokio::test]
    async fn invoke_with_deeply_nested_query_fails_cleanly() {
        let query = format!("calculate {}1+1{}", "(".repeat(3000), ")".repeat(3000));
        let err = CalculationTool
            .invoke(serde_json::json!({ "query": query }))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}

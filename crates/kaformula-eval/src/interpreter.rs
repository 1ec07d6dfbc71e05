//! Single-pass recursive-descent evaluator.
//!
//! The grammar is interpreted directly while lexing; there is no syntax
//! tree. Function arguments are kept as raw text and each one is evaluated
//! by a fresh `Parser` only when the dispatched function asks for it.

use std::f64::consts::PI;

use kaformula_common::{
    FormulaError, Tolerance, bool_to_float, date_to_serial, datetime_to_serial,
};
use kaformula_parse::{Lexer, ParamList, Token, normalize_formula, split_parameters};

use crate::builtins::{self, math};
use crate::clock::ClockProvider;
use crate::config::EngineConfig;
use crate::traits::FormulaHost;

/// Everything one top-level evaluation needs, borrowed from the engine.
pub(crate) struct Evaluator<'a> {
    host: &'a dyn FormulaHost,
    config: &'a EngineConfig,
    clock: &'a dyn ClockProvider,
    tolerance: Tolerance,
}

impl<'a> Evaluator<'a> {
    pub fn new(host: &'a dyn FormulaHost, config: &'a EngineConfig, clock: &'a dyn ClockProvider) -> Self {
        Self {
            host,
            config,
            clock,
            tolerance: config.tolerance(),
        }
    }

    pub fn host(&self) -> &'a dyn FormulaHost {
        self.host
    }

    pub fn config(&self) -> &'a EngineConfig {
        self.config
    }

    pub fn clock(&self) -> &'a dyn ClockProvider {
        self.clock
    }

    pub fn tolerance(&self) -> &Tolerance {
        &self.tolerance
    }

    pub fn eval_numeric(&self, formula: &str) -> Result<f64, FormulaError> {
        let text = normalize_formula(Some(formula));
        Parser::new(self, &text).run_numeric()
    }

    pub fn eval_text(&self, formula: &str) -> Result<String, FormulaError> {
        let text = normalize_formula(Some(formula));
        Parser::new(self, &text).run_text()
    }

    /// Numeric value of argument `i`; arity has been checked by the caller.
    pub fn num(&self, params: &[String], i: usize) -> Result<f64, FormulaError> {
        self.eval_numeric(&params[i])
    }

    /// Text value of argument `i`; arity has been checked by the caller.
    pub fn text(&self, params: &[String], i: usize) -> Result<String, FormulaError> {
        self.eval_text(&params[i])
    }

    /// Bare identifier in a numeric expression.
    fn resolve_value(&self, name: &str) -> Result<f64, FormulaError> {
        match name.to_ascii_lowercase().as_str() {
            "_now_" => Ok(datetime_to_serial(&self.clock.now())),
            "_today_" => Ok(date_to_serial(&self.clock.today())),
            "true" => Ok(1.0),
            "false" => Ok(0.0),
            "pi" => Ok(PI),
            _ => {
                #[cfg(feature = "tracing")]
                tracing::trace!(name, "host value lookup");
                self.host
                    .value(name)
                    .ok_or_else(|| FormulaError::function(name).with_message("unknown identifier"))
            }
        }
    }

    /// Bare identifier in a string expression.
    fn resolve_text_value(&self, name: &str) -> Result<String, FormulaError> {
        #[cfg(feature = "tracing")]
        tracing::trace!(name, "host text lookup");
        self.host
            .text_value(name)
            .ok_or_else(|| FormulaError::function(name).with_message("unknown identifier"))
    }

    fn host_numeric(&self, name: &str, params: &ParamList) -> Result<f64, FormulaError> {
        #[cfg(feature = "tracing")]
        tracing::trace!(name, params = params.len(), "host numeric function");
        self.host
            .call_numeric(name, params)
            .ok_or_else(|| FormulaError::function(name).with_message("function not handled"))
    }

    fn host_text(&self, name: &str, params: &ParamList) -> Result<String, FormulaError> {
        #[cfg(feature = "tracing")]
        tracing::trace!(name, params = params.len(), "host string function");
        self.host
            .call_text(name, params)
            .ok_or_else(|| FormulaError::function(name).with_message("function not handled"))
    }
}

/// Lexer plus one token of lookahead over a single formula text.
struct Parser<'e, 'a> {
    ev: &'e Evaluator<'a>,
    lexer: Lexer,
    tok: Token,
}

impl<'e, 'a> Parser<'e, 'a> {
    fn new(ev: &'e Evaluator<'a>, text: &str) -> Self {
        Self {
            ev,
            lexer: Lexer::new(text),
            tok: Token::Eof,
        }
    }

    fn advance(&mut self) -> Result<(), FormulaError> {
        self.tok = self.lexer.next_token()?;
        Ok(())
    }

    fn unexpected(&self) -> FormulaError {
        let what = if self.tok.is_operator() { "operator " } else { "" };
        FormulaError::syntax(self.lexer.token_start())
            .with_message(format!("unexpected {what}{}", self.tok))
    }

    fn expect_rparen(&mut self) -> Result<(), FormulaError> {
        if self.tok != Token::RParen {
            return Err(self.unexpected());
        }
        self.advance()
    }

    /// Argument list of the call whose name was just consumed; leaves the
    /// token after the closing `)` current.
    fn call_params(&mut self, name: &str) -> Result<ParamList, FormulaError> {
        split_parameters(self.lexer.cursor_mut(), name)
    }

    /* ===== numeric grammar ===== */

    fn run_numeric(mut self) -> Result<f64, FormulaError> {
        self.advance()?;
        let mut value = self.level6()?;
        while self.tok == Token::Semicolon {
            self.advance()?;
            value = self.level6()?;
        }
        if self.tok != Token::Eof {
            return Err(self.unexpected());
        }
        Ok(value)
    }

    /// `|` `^` `&` on truncated integers.
    fn level6(&mut self) -> Result<f64, FormulaError> {
        let mut lhs = self.level5()?;
        loop {
            let op = self.tok.clone();
            if !matches!(op, Token::Or | Token::Xor | Token::And) {
                return Ok(lhs);
            }
            self.advance()?;
            let rhs = self.level5()?;
            let (a, b) = (lhs.trunc() as i64, rhs.trunc() as i64);
            lhs = match op {
                Token::Or => a | b,
                Token::Xor => a ^ b,
                _ => a & b,
            } as f64;
        }
    }

    /// Relational operators, tolerance-aware.
    fn level5(&mut self) -> Result<f64, FormulaError> {
        let mut lhs = self.level4()?;
        loop {
            let op = self.tok.clone();
            if !matches!(
                op,
                Token::Lt | Token::Le | Token::Eq | Token::Ne | Token::Ge | Token::Gt
            ) {
                return Ok(lhs);
            }
            self.advance()?;
            let rhs = self.level4()?;
            let t = self.ev.tolerance();
            lhs = bool_to_float(match op {
                Token::Lt => t.less(lhs, rhs),
                Token::Le => t.less_or_equal(lhs, rhs),
                Token::Eq => t.equal(lhs, rhs),
                Token::Ne => !t.equal(lhs, rhs),
                Token::Ge => t.greater_or_equal(lhs, rhs),
                _ => t.greater(lhs, rhs),
            });
        }
    }

    fn level4(&mut self) -> Result<f64, FormulaError> {
        let mut lhs = self.level3()?;
        loop {
            let op = self.tok.clone();
            if !matches!(op, Token::Add | Token::Sub) {
                return Ok(lhs);
            }
            self.advance()?;
            let rhs = self.level3()?;
            lhs = if op == Token::Add { lhs + rhs } else { lhs - rhs };
        }
    }

    fn level3(&mut self) -> Result<f64, FormulaError> {
        let mut lhs = self.level2()?;
        loop {
            let op = self.tok.clone();
            if !matches!(op, Token::Mul | Token::Div | Token::Mod | Token::Per) {
                return Ok(lhs);
            }
            self.advance()?;
            let rhs = self.level2()?;
            lhs = match op {
                Token::Mul => lhs * rhs,
                Token::Div => lhs / rhs,
                // Division by zero yields NaN, like 0/0.
                Token::Mod => (lhs.trunc() as i64)
                    .checked_rem(rhs.trunc() as i64)
                    .map_or(f64::NAN, |r| r as f64),
                _ => lhs * rhs / 100.0,
            };
        }
    }

    /// Prefix `!` `~` `+` `-`, innermost first.
    fn level2(&mut self) -> Result<f64, FormulaError> {
        let op = self.tok.clone();
        if !matches!(op, Token::Not | Token::Inv | Token::Add | Token::Sub) {
            return self.level1();
        }
        self.advance()?;
        let v = self.level2()?;
        Ok(match op {
            Token::Not => bool_to_float(v.trunc() == 0.0),
            Token::Inv => !(v.trunc() as i64) as f64,
            Token::Add => v,
            _ => -v,
        })
    }

    /// `**`, one term on each side, grouping to the left.
    fn level1(&mut self) -> Result<f64, FormulaError> {
        let mut base = self.term()?;
        while self.tok == Token::Pow {
            self.advance()?;
            let exp = self.term()?;
            base = base.powf(exp);
        }
        Ok(base)
    }

    fn term(&mut self) -> Result<f64, FormulaError> {
        match self.tok.clone() {
            Token::Number(n) => {
                self.advance()?;
                Ok(n.as_f64())
            }
            Token::LParen => {
                self.advance()?;
                let v = self.level6()?;
                self.expect_rparen()?;
                Ok(v)
            }
            Token::Ident(name) => {
                self.advance()?;
                if self.tok == Token::LParen {
                    self.numeric_call(&name)
                } else {
                    self.ev.resolve_value(&name)
                }
            }
            _ => Err(self.unexpected()),
        }
    }

    /// `name(` has been consumed.
    fn numeric_call(&mut self, name: &str) -> Result<f64, FormulaError> {
        let lower = name.to_ascii_lowercase();

        if builtins::is_special(&lower) {
            let params = self.call_params(name)?;
            let v = builtins::call_numeric(self.ev, name, &lower, &params)?;
            self.advance()?;
            return Ok(v);
        }

        if let Some(apply) = math::internal_function(&lower) {
            self.advance()?;
            let v = self.level6()?;
            if self.tok != Token::RParen {
                return Err(FormulaError::function(name)
                    .at(self.lexer.token_start())
                    .with_message(format!("expected ')', found {}", self.tok)));
            }
            self.advance()?;
            return Ok(apply(v));
        }

        let params = self.call_params(name)?;
        let v = self.ev.host_numeric(name, &params)?;
        self.advance()?;
        Ok(v)
    }

    /* ===== string grammar ===== */

    fn run_text(mut self) -> Result<String, FormulaError> {
        self.advance()?;
        let mut value = self.str_level1()?;
        while self.tok == Token::Semicolon {
            self.advance()?;
            value = self.str_level1()?;
        }
        if self.tok != Token::Eof {
            return Err(self.unexpected());
        }
        Ok(value)
    }

    /// `+`-chained concatenation.
    fn str_level1(&mut self) -> Result<String, FormulaError> {
        let mut acc = self.str_level2()?;
        while self.tok == Token::Add {
            self.advance()?;
            acc.push_str(&self.str_level2()?);
        }
        Ok(acc)
    }

    fn str_level2(&mut self) -> Result<String, FormulaError> {
        match self.tok.clone() {
            Token::Str(s) => {
                self.advance()?;
                Ok(s)
            }
            Token::LParen => {
                self.advance()?;
                let v = self.str_level1()?;
                self.expect_rparen()?;
                Ok(v)
            }
            Token::Ident(name) => {
                self.advance()?;
                if self.tok == Token::LParen {
                    self.text_call(&name)
                } else {
                    self.ev.resolve_text_value(&name)
                }
            }
            _ => Err(self.unexpected()),
        }
    }

    /// `name(` has been consumed.
    fn text_call(&mut self, name: &str) -> Result<String, FormulaError> {
        let lower = name.to_ascii_lowercase();
        let params = self.call_params(name)?;

        let v = if builtins::is_special(&lower) {
            builtins::call_text(self.ev, name, &lower, &params)?
        } else if params.len() == 1 {
            // The lone argument is evaluated even when the host takes the call.
            let arg = self.ev.text(&params, 0)?;
            match builtins::text::trim_function(&lower) {
                Some(trim) => trim(&arg).to_string(),
                None => self.ev.host_text(name, &params)?,
            }
        } else {
            self.ev.host_text(name, &params)?
        };

        self.advance()?;
        Ok(v)
    }
}

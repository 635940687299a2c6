//! Recursive-descent parser: tokens → [`Ast`] (spec §4.2, §4.7).
//!
//! Single-token lookahead with a one-token pushback, exactly like the
//! teacher's `scan`/`unscan` pair. The top-level loop dispatches on each
//! keyword to a sub-parser kept in its own file, one per DBC record kind —
//! following the teacher's `dbc/src/dbc/parse/*.rs` layout.

mod ba;
mod ba_def;
mod ba_def_def;
mod bo;
mod bo_tx_bu;
mod bs;
mod bu;
mod cm;
mod ev;
mod ev_data;
mod ns;
mod sg_mul_val;
mod sgtype;
mod sig_group;
mod sig_valtype;
mod val;
mod val_table;
mod version;

use crate::ast::Ast;
use crate::error::Error;
use crate::lexer::{Lexer, Position, Token, TokenKind};

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    pushback: Option<Token>,
}

type PResult<T> = Result<T, Error>;

fn err(pos: Position, msg: impl Into<String>) -> Error {
    Error::ParseError { line: pos.line, col: pos.col, msg: msg.into() }
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Parser { lexer: Lexer::new(input), pushback: None }
    }

    /// Read the next non-space token.
    fn scan(&mut self) -> PResult<Token> {
        if let Some(t) = self.pushback.take() {
            return Ok(t);
        }
        loop {
            let t = self.lexer.next_token()?;
            if t.kind != TokenKind::Space {
                return Ok(t);
            }
        }
    }

    /// Push a single token back onto the stream.
    fn unscan(&mut self, t: Token) {
        self.pushback = Some(t);
    }

    fn expect_syntax(&mut self, lexeme: &str) -> PResult<Token> {
        let t = self.scan()?;
        if t.kind == TokenKind::Syntax && t.text == lexeme {
            Ok(t)
        } else {
            Err(err(t.pos, format!("expected '{}', found '{}'", lexeme, t.text)))
        }
    }

    fn expect_keyword(&mut self, kw: &str) -> PResult<Token> {
        let t = self.scan()?;
        if t.is_keyword(kw) {
            Ok(t)
        } else {
            Err(err(t.pos, format!("expected keyword '{}', found '{}'", kw, t.text)))
        }
    }

    fn expect_identifier(&mut self) -> PResult<Token> {
        let t = self.scan()?;
        if t.kind == TokenKind::Identifier || t.kind == TokenKind::Keyword {
            Ok(t)
        } else {
            Err(err(t.pos, format!("expected identifier, found '{}'", t.text)))
        }
    }

    fn expect_string(&mut self) -> PResult<String> {
        let t = self.scan()?;
        if t.kind != TokenKind::String {
            return Err(err(t.pos, format!("expected string, found '{}'", t.text)));
        }
        let inner = &t.text[1..t.text.len() - 1];
        Ok(inner.to_string())
    }

    fn expect_number(&mut self) -> PResult<i64> {
        let t = self.scan()?;
        if t.kind != TokenKind::Number {
            return Err(err(t.pos, format!("expected number, found '{}'", t.text)));
        }
        t.text
            .parse::<i64>()
            .map_err(|e| err(t.pos, format!("invalid integer '{}': {}", t.text, e)))
    }

    fn expect_u32(&mut self) -> PResult<u32> {
        let n = self.expect_number()?;
        u32::try_from(n).map_err(|_| {
            err(Position { line: 0, col: 0 }, format!("number {} out of u32 range", n))
        })
    }

    fn expect_float(&mut self) -> PResult<f64> {
        let t = self.scan()?;
        if t.kind != TokenKind::Number {
            return Err(err(t.pos, format!("expected number, found '{}'", t.text)));
        }
        t.text
            .parse::<f64>()
            .map_err(|e| err(t.pos, format!("invalid float '{}': {}", t.text, e)))
    }

    fn expect_hex(&mut self) -> PResult<i64> {
        let t = self.scan()?;
        if t.kind != TokenKind::HexNumber {
            return Err(err(t.pos, format!("expected hex number, found '{}'", t.text)));
        }
        let digits = &t.text[2..];
        i64::from_str_radix(digits, 16)
            .map_err(|e| err(t.pos, format!("invalid hex '{}': {}", t.text, e)))
    }

    fn expect_number_range(&mut self) -> PResult<(u32, u32)> {
        let t = self.scan()?;
        if t.kind != TokenKind::NumberRange {
            return Err(err(t.pos, format!("expected range, found '{}'", t.text)));
        }
        let (a, b) = t
            .text
            .split_once('-')
            .ok_or_else(|| err(t.pos, "malformed number range"))?;
        let a: u32 = a.parse().map_err(|_| err(t.pos, "malformed range start"))?;
        let b: u32 = b.parse().map_err(|_| err(t.pos, "malformed range end"))?;
        Ok((a, b))
    }

    /// A `BA_DEF_DEF_`/`BA_` literal: string, number, or hex — captured as
    /// raw text. Typed interpretation happens during lowering, once the
    /// attribute definition (which may appear later in the file) is known
    /// (spec §4.2 "two-phase attribute typing").
    fn expect_literal(&mut self) -> PResult<String> {
        let t = self.scan()?;
        match t.kind {
            TokenKind::String => Ok(t.text[1..t.text.len() - 1].to_string()),
            TokenKind::Number | TokenKind::HexNumber => Ok(t.text),
            TokenKind::Identifier => Ok(t.text),
            _ => Err(err(t.pos, format!("expected literal, found '{}'", t.text))),
        }
    }

    /// Discard tokens up to and including the next top-level `;`, for
    /// records whose full payload isn't modeled (spec §6.1's `EV_` /
    /// `ENVVAR_DATA_` / `SGTYPE_` legacy keywords).
    fn skip_to_semicolon(&mut self) -> PResult<()> {
        loop {
            let t = self.scan()?;
            match t.kind {
                TokenKind::Syntax if t.text == ";" => return Ok(()),
                TokenKind::Eof => return Err(err(t.pos, "unexpected end of input, expected ';'")),
                _ => continue,
            }
        }
    }

    /// Parse a comma-separated list of quoted strings.
    fn parse_string_list(&mut self) -> PResult<Vec<String>> {
        let mut out = vec![self.expect_string()?];
        loop {
            let t = self.scan()?;
            if t.kind == TokenKind::Syntax && t.text == "," {
                out.push(self.expect_string()?);
            } else {
                self.unscan(t);
                break;
            }
        }
        Ok(out)
    }

    pub fn parse(mut self) -> PResult<Ast> {
        let mut ast = Ast::default();
        let mut seen_version = false;
        let mut seen_new_symbols = false;
        let mut seen_bit_timing = false;
        let mut seen_nodes = false;

        loop {
            let t = self.scan()?;
            match t.kind {
                TokenKind::Eof => break,
                TokenKind::Keyword => match t.text.as_str() {
                    "VERSION" => {
                        if seen_version {
                            return Err(err(t.pos, "duplicate VERSION record"));
                        }
                        seen_version = true;
                        ast.version = Some(version::parse(&mut self)?);
                    }
                    "NS_" => {
                        if seen_new_symbols {
                            return Err(err(t.pos, "duplicate NS_ record"));
                        }
                        seen_new_symbols = true;
                        ast.new_symbols = ns::parse(&mut self)?;
                    }
                    "BS_" => {
                        if seen_bit_timing {
                            return Err(err(t.pos, "duplicate BS_ record"));
                        }
                        seen_bit_timing = true;
                        ast.bit_timing = bs::parse(&mut self)?;
                    }
                    "BU_" => {
                        if seen_nodes {
                            return Err(err(t.pos, "duplicate BU_ record"));
                        }
                        seen_nodes = true;
                        ast.nodes = bu::parse(&mut self)?;
                    }
                    "VAL_TABLE_" => ast.value_tables.push(val_table::parse(&mut self)?),
                    "BO_" => ast.messages.push(bo::parse(&mut self)?),
                    "BO_TX_BU_" => ast.message_transmitters.push(bo_tx_bu::parse(&mut self)?),
                    "EV_" => ast.env_vars.push(ev::parse(&mut self)?),
                    "ENVVAR_DATA_" => ast.env_var_data.push(ev_data::parse(&mut self)?),
                    "SGTYPE_" => ast.signal_types.push(sgtype::parse(&mut self)?),
                    "CM_" => ast.comments.push(cm::parse(&mut self)?),
                    "BA_DEF_" => ast.attribute_defs.push(ba_def::parse(&mut self)?),
                    "BA_DEF_DEF_" => ast.attribute_defaults.push(ba_def_def::parse(&mut self)?),
                    "BA_" => ast.attribute_values.push(ba::parse(&mut self)?),
                    "VAL_" => ast.value_encodings.push(val::parse(&mut self)?),
                    "SIG_GROUP_" => ast.signal_groups.push(sig_group::parse(&mut self)?),
                    "SIG_VALTYPE_" => ast.signal_ext_value_types.push(sig_valtype::parse(&mut self)?),
                    "SG_MUL_VAL_" => ast.extended_muxes.push(sg_mul_val::parse(&mut self)?),
                    other => {
                        return Err(err(t.pos, format!("unexpected top-level keyword '{}'", other)));
                    }
                },
                _ => {
                    return Err(err(t.pos, format!("unexpected top-level token '{}'", t.text)));
                }
            }
        }

        Ok(ast)
    }
}

pub fn parse(input: &str) -> PResult<Ast> {
    Parser::new(input).parse()
}

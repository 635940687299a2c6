//! `BA_DEF_ [kind_kw] STR type_kw type_body ";"` — attribute definition.

use crate::ast::{AttributeDef, AttributeKind, AttributeTypeDef};
use crate::lexer::TokenKind;

use super::{err, PResult, Parser};

pub fn parse(p: &mut Parser) -> PResult<AttributeDef> {
    let kind = parse_kind(p)?;
    let name = p.expect_string()?;
    let ty = parse_type(p)?;
    p.expect_syntax(";")?;
    Ok(AttributeDef { kind, name, ty })
}

fn parse_kind(p: &mut Parser) -> PResult<AttributeKind> {
    let t = p.scan()?;
    if t.is_keyword("BU_") {
        Ok(AttributeKind::Node)
    } else if t.is_keyword("BO_") {
        Ok(AttributeKind::Message)
    } else if t.is_keyword("SG_") {
        Ok(AttributeKind::Signal)
    } else if t.is_keyword("EV_") {
        Ok(AttributeKind::EnvVar)
    } else {
        p.unscan(t);
        Ok(AttributeKind::General)
    }
}

fn parse_type(p: &mut Parser) -> PResult<AttributeTypeDef> {
    let t = p.scan()?;
    if !t.is_keyword("INT") && !t.is_keyword("HEX") && !t.is_keyword("FLOAT")
        && !t.is_keyword("STRING") && !t.is_keyword("ENUM")
    {
        return Err(err(t.pos, format!("expected attribute type keyword, found '{}'", t.text)));
    }
    match t.text.as_str() {
        "INT" => {
            let from = p.expect_number()?;
            let to = p.expect_number()?;
            Ok(AttributeTypeDef::Int { from, to })
        }
        "HEX" => {
            let from = p.expect_hex()?;
            let to = p.expect_hex()?;
            Ok(AttributeTypeDef::Hex { from, to })
        }
        "FLOAT" => {
            let from = p.expect_float()?;
            let to = p.expect_float()?;
            Ok(AttributeTypeDef::Float { from, to })
        }
        "STRING" => Ok(AttributeTypeDef::String),
        "ENUM" => {
            let mut labels = vec![p.expect_string()?];
            loop {
                let t = p.scan()?;
                if t.kind == TokenKind::Syntax && t.text == "," {
                    labels.push(p.expect_string()?);
                } else {
                    p.unscan(t);
                    break;
                }
            }
            Ok(AttributeTypeDef::Enum(labels))
        }
        other => Err(err(t.pos, format!("unknown attribute type '{}'", other))),
    }
}

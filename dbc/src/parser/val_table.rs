//! `VAL_TABLE_ ID (N STR)* ";"`

use crate::ast::ValueTable;
use crate::lexer::TokenKind;

use super::{PResult, Parser};

pub fn parse(p: &mut Parser) -> PResult<ValueTable> {
    let name = p.expect_identifier()?.text;
    let mut entries = vec![];
    loop {
        let t = p.scan()?;
        if t.kind == TokenKind::Syntax && t.text == ";" {
            break;
        }
        if t.kind != TokenKind::Number {
            return Err(super::err(t.pos, format!("expected number or ';', found '{}'", t.text)));
        }
        let code: i64 = t.text.parse().map_err(|_| super::err(t.pos, "invalid value code"))?;
        let label = p.expect_string()?;
        entries.push((code, label));
    }
    Ok(ValueTable { name, entries })
}

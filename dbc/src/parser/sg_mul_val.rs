//! `SG_MUL_VAL_ N ID ID range ("," range)* ";"` — extended multiplexing.

use crate::ast::ExtendedMux;
use crate::lexer::TokenKind;

use super::{PResult, Parser};

pub fn parse(p: &mut Parser) -> PResult<ExtendedMux> {
    let message_id = p.expect_u32()?;
    let multiplexed = p.expect_identifier()?.text;
    let multiplexor = p.expect_identifier()?.text;

    let mut ranges = vec![p.expect_number_range()?];
    loop {
        let t = p.scan()?;
        if t.kind == TokenKind::Syntax && t.text == "," {
            ranges.push(p.expect_number_range()?);
        } else {
            p.unscan(t);
            break;
        }
    }
    p.expect_syntax(";")?;

    Ok(ExtendedMux { message_id, multiplexed, multiplexor, ranges })
}

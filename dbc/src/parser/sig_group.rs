//! `SIG_GROUP_ N ID N ":" ID* ";"` — signal group.

use crate::ast::SignalGroup;
use crate::lexer::TokenKind;

use super::{PResult, Parser};

pub fn parse(p: &mut Parser) -> PResult<SignalGroup> {
    let message_id = p.expect_u32()?;
    let name = p.expect_identifier()?.text;
    let repetitions = p.expect_u32()?;
    p.expect_syntax(":")?;

    let mut signals = vec![];
    loop {
        let t = p.scan()?;
        if t.kind == TokenKind::Identifier {
            signals.push(t.text);
        } else {
            p.unscan(t);
            break;
        }
    }
    p.expect_syntax(";")?;

    Ok(SignalGroup { message_id, name, repetitions, signals })
}

//! `BO_TX_BU_ N ":" ID ("," ID)* ";"` — additional message transmitters.

use crate::ast::MessageTransmitters;
use crate::lexer::TokenKind;

use super::{err, PResult, Parser};

pub fn parse(p: &mut Parser) -> PResult<MessageTransmitters> {
    let message_id = p.expect_u32()?;
    p.expect_syntax(":")?;

    let mut transmitters = vec![p.expect_identifier()?.text];
    loop {
        let t = p.scan()?;
        if t.kind == TokenKind::Syntax && t.text == "," {
            transmitters.push(p.expect_identifier()?.text);
        } else if t.kind == TokenKind::Syntax && t.text == ";" {
            break;
        } else {
            return Err(err(t.pos, format!("expected ',' or ';', found '{}'", t.text)));
        }
    }

    Ok(MessageTransmitters { message_id, transmitters })
}

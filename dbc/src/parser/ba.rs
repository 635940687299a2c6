//! `BA_ STR [kind_body] literal ";"` — attribute value assignment.

use crate::ast::{AttributeHost, AttributeValue};

use super::{PResult, Parser};

pub fn parse(p: &mut Parser) -> PResult<AttributeValue> {
    let name = p.expect_string()?;
    let host = parse_host(p)?;
    let raw_value = p.expect_literal()?;
    p.expect_syntax(";")?;
    Ok(AttributeValue { name, host, raw_value })
}

fn parse_host(p: &mut Parser) -> PResult<AttributeHost> {
    let t = p.scan()?;
    if t.is_keyword("BU_") {
        let node = p.expect_identifier()?.text;
        Ok(AttributeHost::Node(node))
    } else if t.is_keyword("BO_") {
        let message_id = p.expect_u32()?;
        Ok(AttributeHost::Message(message_id))
    } else if t.is_keyword("SG_") {
        let message_id = p.expect_u32()?;
        let signal = p.expect_identifier()?.text;
        Ok(AttributeHost::Signal { message_id, signal })
    } else if t.is_keyword("EV_") {
        let name = p.expect_identifier()?.text;
        Ok(AttributeHost::EnvVar(name))
    } else {
        p.unscan(t);
        Ok(AttributeHost::Network)
    }
}

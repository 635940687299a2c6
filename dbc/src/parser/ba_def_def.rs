//! `BA_DEF_DEF_ STR literal ";"` — attribute default value.

use crate::ast::AttributeDefault;

use super::{PResult, Parser};

pub fn parse(p: &mut Parser) -> PResult<AttributeDefault> {
    let name = p.expect_string()?;
    let raw_value = p.expect_literal()?;
    p.expect_syntax(";")?;
    Ok(AttributeDefault { name, raw_value })
}

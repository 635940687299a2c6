//! `EV_ ID ... ";"` — environment variable declaration. Only the name is
//! modeled (spec §6.2's JSON schema has no env-var projection); the rest
//! of the legacy payload (type, min, max, unit, initial, id, access type,
//! access node list) is accepted and discarded.

use crate::ast::EnvVar;

use super::{PResult, Parser};

pub fn parse(p: &mut Parser) -> PResult<EnvVar> {
    let name = p.expect_identifier()?.text;
    p.skip_to_semicolon()?;
    Ok(EnvVar { name })
}

//! `ENVVAR_DATA_ ID ... ";"` — environment variable data size declaration.
//! Only the name is modeled; see [`super::ev`].

use crate::ast::EnvVarData;

use super::{PResult, Parser};

pub fn parse(p: &mut Parser) -> PResult<EnvVarData> {
    let name = p.expect_identifier()?.text;
    p.skip_to_semicolon()?;
    Ok(EnvVarData { name })
}

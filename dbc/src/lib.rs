//! `dbc-rs` — parse, edit, and emit CAN network description files.
//!
//! The crate reads and writes two surfaces over the same in-memory
//! [`Network`] model: the line-oriented DBC text format used by automotive
//! tooling, and a JSON projection of the same entities. The hard part
//! lives in three stages — [`lexer`]/[`parser`] (bytes to [`ast::Ast`]),
//! [`lowering`] (AST to [`Network`], resolving every cross-reference the
//! parser left as a bare name), and [`raising`]/[`emit`] (the inverse, back
//! to bit-exact text).
//!
//! ```
//! let dbc = r#"VERSION "1.0"
//!
//! NS_ :
//!
//! BS_ :
//!
//! BU_ : A B
//!
//! BO_ 100 M1: 8 A
//!  SG_ S1 : 0|8@1+ (1,0) [0|255] "u" B
//! "#;
//! let net = dbc_rs::parse_dbc(dbc).unwrap();
//! assert_eq!(net.version, "1.0");
//! assert_eq!(net.message(100).unwrap().name, "M1");
//! ```

pub mod ast;
pub mod error;
mod json;
mod lexer;
mod lowering;
mod model;
mod parser;
mod raising;
mod emit;
mod validate;

pub use error::{Error, Result, Warning};
pub use model::{
    AttributeDef, AttributeKind, AttributeType, AttributeValue, Attributes, Endianness, Host,
    Message, MuxRole, Network, Node, Signal, Signedness, ValueTable,
};

/// The crate's own version, exposed the way the teacher exposes
/// `dbc_rs::VERSION` to its CLI's `version` command.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Bytes + format tag in, a fully lowered [`Network`] out (spec §1's
/// "Input source" collaborator contract, §2's `Lexer -> Parser -> Lowering`
/// pipeline).
pub fn parse_dbc(input: &str) -> Result<Network> {
    let ast = parser::parse(input)?;
    lowering::lower(ast)
}

/// The inverse of [`parse_dbc`]: model to AST to bit-exact DBC text (spec
/// §4.5, §2's `Model -> Raising -> Emitter` pipeline).
pub fn emit_dbc(net: &Network) -> String {
    let ast = raising::raise(net);
    emit::emit(&ast)
}

/// Parse the JSON projection (spec §4.6, §6.2) into a [`Network`]. Returns
/// any non-fatal diagnostics (unresolved `enum_ref`, unknown `send_type`)
/// alongside the model, per spec §7's side-channel warning contract.
pub fn from_json(input: &str) -> Result<(Network, Vec<Warning>)> {
    json::from_json(input)
}

/// Project a [`Network`] to the JSON schema (spec §4.6, §6.2).
pub fn to_json(net: &Network) -> Result<String> {
    json::to_json(net)
}

/// Check every invariant spec §3/§4.3/§8 name against an already-built
/// model. Idempotent and safe to call on a model built by either
/// [`parse_dbc`] or [`from_json`] (spec §7: "Validation ... is idempotent
/// and repeatable").
pub fn validate(net: &Network) -> Result<()> {
    validate::validate(net)
}

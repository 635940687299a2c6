//! Passive record types: one variant per DBC section (spec §2 row 2, §6.1).
//!
//! The AST carries no semantics beyond "what the grammar accepted" — cross
//! references (attribute name → definition, comment → entity, mux parent →
//! child) are resolved later, during lowering (spec §4.4 / design note
//! "keep the parser free of the model").

#[derive(Debug, Clone, Default)]
pub struct Ast {
    pub version: Option<String>,
    pub new_symbols: Vec<String>,
    pub bit_timing: Option<BitTiming>,
    pub nodes: Vec<String>,
    pub value_tables: Vec<ValueTable>,
    pub messages: Vec<Message>,
    pub message_transmitters: Vec<MessageTransmitters>,
    pub env_vars: Vec<EnvVar>,
    pub env_var_data: Vec<EnvVarData>,
    pub signal_types: Vec<SignalType>,
    pub comments: Vec<Comment>,
    pub attribute_defs: Vec<AttributeDef>,
    pub attribute_defaults: Vec<AttributeDefault>,
    pub attribute_values: Vec<AttributeValue>,
    pub value_encodings: Vec<ValueEncoding>,
    pub signal_groups: Vec<SignalGroup>,
    pub signal_ext_value_types: Vec<SignalExtValueType>,
    pub extended_muxes: Vec<ExtendedMux>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BitTiming {
    pub baudrate: u32,
    pub btr1: u32,
    pub btr2: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueTable {
    pub name: String,
    pub entries: Vec<(i64, String)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: u32,
    pub name: String,
    pub length: u32,
    pub transmitter: String,
    pub signals: Vec<Signal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MuxToken {
    None,
    Switch,
    Value(u32),
    SwitchedValue(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub name: String,
    pub mux: MuxToken,
    pub start_bit: u32,
    pub size: u32,
    pub big_endian: bool,
    pub unsigned: bool,
    pub factor: f64,
    pub offset: f64,
    pub min: f64,
    pub max: f64,
    pub unit: String,
    pub receivers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessageTransmitters {
    pub message_id: u32,
    pub transmitters: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnvVar {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnvVarData {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalType {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Comment {
    Network(String),
    Node { node: String, text: String },
    Message { message_id: u32, text: String },
    Signal { message_id: u32, signal: String, text: String },
    EnvVar { name: String, text: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    General,
    Node,
    Message,
    Signal,
    /// `EV_`-kind attribute definitions are accepted syntactically but have
    /// no model counterpart (env vars aren't modeled) and are dropped
    /// during lowering, the same way `VAL_` env-var encodings are.
    EnvVar,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeTypeDef {
    Int { from: i64, to: i64 },
    Hex { from: i64, to: i64 },
    Float { from: f64, to: f64 },
    String,
    Enum(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDef {
    pub kind: AttributeKind,
    pub name: String,
    pub ty: AttributeTypeDef,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDefault {
    pub name: String,
    /// The raw literal, typed during lowering once the definition (which
    /// may appear later in the file) is known (spec §4.2 "two-phase
    /// attribute typing").
    pub raw_value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeHost {
    Network,
    Node(String),
    Message(u32),
    Signal { message_id: u32, signal: String },
    /// See [`AttributeKind::EnvVar`]: accepted, dropped during lowering.
    EnvVar(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttributeValue {
    pub name: String,
    pub host: AttributeHost,
    pub raw_value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValueEncoding {
    Signal { message_id: u32, signal: String, entries: Vec<(i64, String)> },
    EnvVar { name: String, entries: Vec<(i64, String)> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalGroup {
    pub message_id: u32,
    pub name: String,
    pub repetitions: u32,
    pub signals: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalExtValueType {
    pub message_id: u32,
    pub signal: String,
    pub value_type: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtendedMux {
    pub message_id: u32,
    pub multiplexed: String,
    pub multiplexor: String,
    pub ranges: Vec<(u32, u32)>,
}

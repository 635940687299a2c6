//! JSON projection of the network model (spec §4.6, §6.2). Mirrors the
//! model rather than the DBC wire format: maps keyed by name instead of
//! the DBC's positional records, and a handful of "sugar" fields
//! (`period_ms`, `send_type`, `enum_ref`) that fold into and out of the
//! generic attribute map at the boundary.
//!
//! Grounded on the original Go reader/writer's `CanModel`/`Message`/
//! `Signal` JSON shapes (`original_source/pkg/can_model.go`,
//! `message.go`, `signal.go`) and its well-known attribute names
//! (`original_source/pkg/sym/attributes.go`), adapted to this crate's
//! flat (non-recursive) signal list and typed `AttributeValue`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Warning};
use crate::lowering::parse_hex_literal;
use crate::model::{
    AttributeDef, AttributeKind, AttributeType, AttributeValue, Endianness, Host, Message,
    MuxRole, Network, Node, Signal, Signedness, ValueTable,
};
use crate::raising::GEN_MSG_CYCLE_TIME;

/// Well-known attribute names the `send_type` sugar fields fold into
/// (spec §4.6).
const GEN_MSG_SEND_TYPE: &str = "GenMsgSendType";
const GEN_SIG_SEND_TYPE: &str = "GenSigSendType";

/// Closed sets used to seed a definition when the JSON input doesn't
/// declare one, and as the fallback clamp target for an unrecognized
/// `send_type` string (spec §4.6).
const MSG_SEND_TYPES: &[&str] = &["NoMsgSendType", "Cyclic", "IfActive", "CyclicIfActive", "NotUsed"];
const SIG_SEND_TYPES: &[&str] = &[
    "NoSigSendType",
    "Cyclic",
    "OnWrite",
    "OnWriteWithRepetition",
    "OnChange",
    "OnChangeWithRepetition",
    "IfActive",
    "IfActiveWithRepetition",
    "NotUsed",
];

/// True for the three well-known names the sugar fields fold into
/// (`period_ms`/`send_type`). Their definitions are never emitted into
/// `*_attributes` — they're implied by the sugar fields themselves, the
/// same way their values never appear in a host's `attributes` map.
fn is_sugar_attribute_name(name: &str) -> bool {
    matches!(name, GEN_MSG_CYCLE_TIME | GEN_MSG_SEND_TYPE | GEN_SIG_SEND_TYPE)
}

#[derive(Debug, Serialize, Deserialize)]
struct NetworkJson {
    version: String,
    #[serde(default)]
    baudrate: u32,
    #[serde(default)]
    nodes: BTreeMap<String, NodeJson>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    general_attributes: BTreeMap<String, AttributeDefJson>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    node_attributes: BTreeMap<String, AttributeDefJson>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    message_attributes: BTreeMap<String, AttributeDefJson>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    signal_attributes: BTreeMap<String, AttributeDefJson>,
    #[serde(default)]
    messages: BTreeMap<String, MessageJson>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    signal_enums: BTreeMap<String, BTreeMap<String, i64>>,
    /// Network-level (`general`) attribute assignments. Not named in the
    /// spec's abridged schema — the abridged schema gives defs a home but
    /// never says where a network's own assigned values live. Added for
    /// symmetry with `Node`/`Message`/`Signal`'s `attributes?` field; see
    /// `DESIGN.md`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    attributes: BTreeMap<String, Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct NodeJson {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    description: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    attributes: BTreeMap<String, Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct MessageJson {
    id: u32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    period_ms: Option<u32>,
    /// Accepted as an input synonym for `period_ms` (both fold into
    /// `GenMsgCycleTime`); never produced on output, since `period_ms`
    /// alone already carries the value (spec §8 S4 only checks
    /// `period_ms`). See `DESIGN.md`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cycle_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    send_type: Option<String>,
    length: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sender: Option<String>,
    #[serde(default)]
    signals: BTreeMap<String, SignalJson>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    attributes: BTreeMap<String, Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SignalJson {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    send_type: Option<String>,
    /// This signal's own selector set if it is multiplexed (role
    /// `Multiplexed`/`Both`): a single value for simple mux, several for
    /// extended mux.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mux_switch: Option<Vec<u32>>,
    start_bit: u32,
    size: u32,
    endianness: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    signed: Option<bool>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    unit: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    receivers: Vec<String>,
    scale: f64,
    offset: f64,
    min: f64,
    max: f64,
    #[serde(default, rename = "enum", skip_serializing_if = "BTreeMap::is_empty")]
    enum_values: BTreeMap<String, i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    enum_ref: Option<String>,
    /// Names of the signals this one multiplexes, if it is a multiplexor
    /// (role `Multiplexor`/`Both`). Unlike the original source's
    /// recursively nested `MuxGroup`, children stay in the message's flat
    /// `signals` map; this just names them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mux_group: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    attributes: BTreeMap<String, Value>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum AttributeDefJson {
    Int { from: i64, to: i64, default: i64 },
    Hex { from: i64, to: i64, default: i64 },
    Float { from: f64, to: f64, default: f64 },
    String { default: String },
    Enum { labels: Vec<String>, default: String },
}

pub fn to_json(net: &Network) -> crate::Result<String> {
    let nj = network_to_json(net);
    Ok(serde_json::to_string_pretty(&nj)?)
}

pub fn from_json(input: &str) -> crate::Result<(Network, Vec<Warning>)> {
    let nj: NetworkJson = serde_json::from_str(input)?;
    let mut net = Network::new();
    let mut warnings = vec![];

    net.version = nj.version;
    net.baudrate = nj.baudrate;

    for (name, def) in &nj.general_attributes {
        net.add_attribute_definition(def_from_json(AttributeKind::General, name, def)?)?;
    }
    for (name, def) in &nj.node_attributes {
        net.add_attribute_definition(def_from_json(AttributeKind::Node, name, def)?)?;
    }
    for (name, def) in &nj.message_attributes {
        net.add_attribute_definition(def_from_json(AttributeKind::Message, name, def)?)?;
    }
    for (name, def) in &nj.signal_attributes {
        net.add_attribute_definition(def_from_json(AttributeKind::Signal, name, def)?)?;
    }
    ensure_sugar_defs(&mut net)?;

    for (name, table) in &nj.signal_enums {
        net.value_tables.push(ValueTable {
            name: name.clone(),
            entries: table.iter().map(|(label, code)| (*code, label.clone())).collect(),
        });
    }

    for (name, node) in &nj.nodes {
        net.add_node(name.clone())?;
        net.node_mut(name).expect("just inserted").description = node.description.clone();
    }
    for (name, node) in &nj.nodes {
        assign_json_attrs(&mut net, Host::Node(name.clone()), &node.attributes)?;
    }

    for (name, msg_json) in &nj.messages {
        let sender = msg_json.sender.clone().unwrap_or_else(|| crate::lexer::NO_NODE.to_string());
        let mut msg = Message::new(msg_json.id, name.clone(), msg_json.length, sender);
        msg.description = msg_json.description.clone();
        for (sig_name, sig_json) in &msg_json.signals {
            let sig = signal_from_json(&net, sig_name, sig_json, &mut warnings)?;
            msg.add_signal(sig)?;
        }
        net.add_message(msg)?;
    }

    for (_, msg_json) in &nj.messages {
        wire_mux_groups(&mut net, msg_json)?;

        let mut attrs = msg_json.attributes.clone();
        if let Some(p) = msg_json.period_ms.or(msg_json.cycle_time) {
            attrs.insert(GEN_MSG_CYCLE_TIME.to_string(), Value::from(p));
        }
        if let Some(st) = &msg_json.send_type {
            let label = resolve_enum_label(&net, GEN_MSG_SEND_TYPE, st, &mut warnings)?;
            attrs.insert(GEN_MSG_SEND_TYPE.to_string(), Value::String(label));
        }
        assign_json_attrs(&mut net, Host::Message(msg_json.id), &attrs)?;

        for (sig_name, sig_json) in &msg_json.signals {
            let mut sattrs = sig_json.attributes.clone();
            if let Some(st) = &sig_json.send_type {
                let label = resolve_enum_label(&net, GEN_SIG_SEND_TYPE, st, &mut warnings)?;
                sattrs.insert(GEN_SIG_SEND_TYPE.to_string(), Value::String(label));
            }
            assign_json_attrs(
                &mut net,
                Host::Signal { message_id: msg_json.id, signal: sig_name.clone() },
                &sattrs,
            )?;
        }
    }

    for msg in net.messages.values_mut() {
        let multiplexors = msg.signals.iter().filter(|s| s.role.is_multiplexor()).count();
        msg.extended_mux = multiplexors > 1;
    }

    for (name, val) in &nj.attributes {
        let def = net.attribute_def(name).ok_or_else(|| Error::UnknownReference {
            what: "attribute definition",
            name: name.clone(),
            context: "network attribute assignment".to_string(),
        })?;
        let value = attribute_value_from_json(def, val)?;
        net.assign_attribute(Host::Network, name, value)?;
    }

    Ok((net, warnings))
}

fn network_to_json(net: &Network) -> NetworkJson {
    let mut general_attributes = BTreeMap::new();
    let mut node_attributes = BTreeMap::new();
    let mut message_attributes = BTreeMap::new();
    let mut signal_attributes = BTreeMap::new();
    for def in &net.attribute_defs {
        if is_sugar_attribute_name(&def.name) {
            continue;
        }
        let target = match def.kind {
            AttributeKind::General => &mut general_attributes,
            AttributeKind::Node => &mut node_attributes,
            AttributeKind::Message => &mut message_attributes,
            AttributeKind::Signal => &mut signal_attributes,
        };
        target.insert(def.name.clone(), def_to_json(def));
    }

    NetworkJson {
        version: net.version.clone(),
        baudrate: net.baudrate,
        nodes: net.nodes.iter().map(|n| (n.name.clone(), node_to_json(net, n))).collect(),
        general_attributes,
        node_attributes,
        message_attributes,
        signal_attributes,
        messages: net.messages.values().map(|m| (m.name.clone(), message_to_json(net, m))).collect(),
        signal_enums: net
            .value_tables
            .iter()
            .map(|vt| (vt.name.clone(), vt.entries.iter().map(|(code, label)| (label.clone(), *code)).collect()))
            .collect(),
        attributes: attrs_to_json_map(net, &net.attributes),
    }
}

fn node_to_json(net: &Network, node: &Node) -> NodeJson {
    NodeJson { description: node.description.clone(), attributes: attrs_to_json_map(net, &node.attributes) }
}

fn message_to_json(net: &Network, msg: &Message) -> MessageJson {
    let mut attrs = msg.attributes.clone();
    let period_ms = match attrs.take(GEN_MSG_CYCLE_TIME) {
        Some(AttributeValue::Int(v)) => Some(v.max(0) as u32),
        _ => None,
    };
    let send_type = match attrs.take(GEN_MSG_SEND_TYPE) {
        Some(AttributeValue::Enum(idx)) => enum_label(net, GEN_MSG_SEND_TYPE, idx),
        _ => None,
    };

    MessageJson {
        id: msg.id,
        description: msg.description.clone(),
        period_ms,
        cycle_time: None,
        send_type,
        length: msg.length,
        sender: if msg.transmitter == crate::lexer::NO_NODE { None } else { Some(msg.transmitter.clone()) },
        signals: msg.signals.iter().map(|s| (s.name.clone(), signal_to_json(net, s))).collect(),
        attributes: attrs_to_json_map(net, &attrs),
    }
}

fn signal_to_json(net: &Network, sig: &Signal) -> SignalJson {
    let mut attrs = sig.attributes.clone();
    let send_type = match attrs.take(GEN_SIG_SEND_TYPE) {
        Some(AttributeValue::Enum(idx)) => enum_label(net, GEN_SIG_SEND_TYPE, idx),
        _ => None,
    };

    let mux_switch = sig.role.indexes().map(|set| set.iter().copied().collect());
    let mux_group =
        if sig.mux_children.is_empty() { None } else { Some(sig.mux_children.iter().map(|(n, _)| n.clone()).collect()) };

    let (enum_values, enum_ref) = signal_enum_fields(net, sig);

    SignalJson {
        description: sig.description.clone(),
        send_type,
        mux_switch,
        start_bit: sig.start_bit,
        size: sig.size,
        endianness: match sig.endianness {
            Endianness::Little => "little".to_string(),
            Endianness::Big => "big".to_string(),
        },
        signed: Some(sig.signedness == Signedness::Signed),
        unit: sig.unit.clone(),
        receivers: sig.receivers.clone(),
        scale: sig.factor,
        offset: sig.offset,
        min: sig.min,
        max: sig.max,
        enum_values,
        enum_ref,
        mux_group,
        attributes: attrs_to_json_map(net, &attrs),
    }
}

/// A signal's own enum wins an `enum_ref` to a global value table when its
/// entries exactly match one; otherwise it's written inline.
fn signal_enum_fields(net: &Network, sig: &Signal) -> (BTreeMap<String, i64>, Option<String>) {
    if sig.enum_values.is_empty() {
        return (BTreeMap::new(), None);
    }
    for vt in &net.value_tables {
        if vt.entries.len() == sig.enum_values.len() && vt.entries.iter().all(|e| sig.enum_values.contains(e)) {
            return (BTreeMap::new(), Some(vt.name.clone()));
        }
    }
    (sig.enum_values.iter().map(|(code, label)| (label.clone(), *code)).collect(), None)
}

fn signal_from_json(
    net: &Network,
    name: &str,
    sj: &SignalJson,
    warnings: &mut Vec<Warning>,
) -> crate::Result<Signal> {
    let mut sig = Signal::new(name.to_string());
    sig.description = sj.description.clone();
    sig.start_bit = sj.start_bit;
    sig.size = sj.size;
    sig.endianness = if sj.endianness == "big" { Endianness::Big } else { Endianness::Little };
    sig.signedness = if sj.signed.unwrap_or(false) { Signedness::Signed } else { Signedness::Unsigned };
    sig.factor = sj.scale;
    sig.offset = sj.offset;
    sig.min = sj.min;
    sig.max = sj.max;
    sig.unit = sj.unit.clone();
    sig.receivers = sj.receivers.clone();

    sig.role = match (&sj.mux_switch, &sj.mux_group) {
        (None, None) => MuxRole::Plain,
        (Some(idx), None) => MuxRole::Multiplexed { indexes: idx.iter().copied().collect() },
        (None, Some(_)) => MuxRole::Multiplexor,
        (Some(idx), Some(_)) => MuxRole::Both { indexes: idx.iter().copied().collect() },
    };

    if let Some(table_name) = &sj.enum_ref {
        match net.value_tables.iter().find(|vt| &vt.name == table_name) {
            Some(vt) => {
                for (code, label) in &vt.entries {
                    sig.add_value_enum(*code, label.clone())?;
                }
            }
            None => warnings.push(Warning(format!(
                "signal '{}' references undefined global enum '{}'",
                name, table_name
            ))),
        }
    } else {
        for (label, code) in &sj.enum_values {
            sig.add_value_enum(*code, label.clone())?;
        }
    }

    Ok(sig)
}

/// Attaches each multiplexor's `mux_group` children using the indexes
/// already resolved onto those children by [`signal_from_json`] (the
/// inverse of `raising`'s `collapse_ranges`, since the JSON wire format
/// stores a child's full selector set directly rather than as ranges).
fn wire_mux_groups(net: &mut Network, msg_json: &MessageJson) -> crate::Result<()> {
    for (sig_name, sig_json) in &msg_json.signals {
        let Some(children) = &sig_json.mux_group else { continue };
        let msg = net.message_mut(msg_json.id).expect("message just inserted");

        let mut resolved = Vec::with_capacity(children.len());
        for child in children {
            let indexes = msg.signal(child).and_then(|s| s.role.indexes().cloned()).ok_or_else(|| {
                Error::TypeMismatch {
                    attribute: child.clone(),
                    expected: "multiplexed signal (mux_switch set)",
                    found: "plain signal",
                }
            })?;
            resolved.push((child.clone(), indexes));
        }

        let parent = msg.signal_mut(sig_name).expect("signal just inserted");
        for (child, indexes) in resolved {
            parent.add_mux_child(child, indexes)?;
        }
    }
    Ok(())
}

fn assign_json_attrs(net: &mut Network, host: Host, attrs: &BTreeMap<String, Value>) -> crate::Result<()> {
    for (name, raw) in attrs {
        let def = net
            .attribute_def(name)
            .ok_or_else(|| Error::UnknownReference {
                what: "attribute definition",
                name: name.clone(),
                context: "JSON attribute assignment".to_string(),
            })?
            .clone();
        let value = attribute_value_from_json(&def, raw)?;
        net.assign_attribute(host.clone(), name, value)?;
    }
    Ok(())
}

fn ensure_sugar_defs(net: &mut Network) -> crate::Result<()> {
    if net.attribute_def(GEN_MSG_CYCLE_TIME).is_none() {
        net.add_attribute_definition(AttributeDef {
            kind: AttributeKind::Message,
            name: GEN_MSG_CYCLE_TIME.to_string(),
            ty: AttributeType::Int { from: 0, to: 65535 },
            default: AttributeValue::Int(0),
        })?;
    }
    if net.attribute_def(GEN_MSG_SEND_TYPE).is_none() {
        net.add_attribute_definition(AttributeDef {
            kind: AttributeKind::Message,
            name: GEN_MSG_SEND_TYPE.to_string(),
            ty: AttributeType::Enum(MSG_SEND_TYPES.iter().map(|s| s.to_string()).collect()),
            default: AttributeValue::Enum(0),
        })?;
    }
    if net.attribute_def(GEN_SIG_SEND_TYPE).is_none() {
        net.add_attribute_definition(AttributeDef {
            kind: AttributeKind::Signal,
            name: GEN_SIG_SEND_TYPE.to_string(),
            ty: AttributeType::Enum(SIG_SEND_TYPES.iter().map(|s| s.to_string()).collect()),
            default: AttributeValue::Enum(0),
        })?;
    }
    Ok(())
}

/// Matches `label` against `attr_name`'s own definition (which may carry
/// custom labels from a DBC-sourced file, not just the canonical closed
/// set); an unrecognized label is clamped to the definition's first label
/// with a warning (spec §4.6).
fn resolve_enum_label(
    net: &Network,
    attr_name: &str,
    label: &str,
    warnings: &mut Vec<Warning>,
) -> crate::Result<String> {
    let def = net.attribute_def(attr_name).expect("ensure_sugar_defs ran first");
    let AttributeType::Enum(labels) = &def.ty else {
        return Err(Error::TypeMismatch { attribute: attr_name.to_string(), expected: "enum", found: def.ty.type_name() });
    };
    if labels.iter().any(|l| l == label) {
        Ok(label.to_string())
    } else {
        warnings.push(Warning(format!("unknown send_type '{}' for '{}', replaced with '{}'", label, attr_name, labels[0])));
        Ok(labels[0].clone())
    }
}

fn enum_label(net: &Network, attr_name: &str, idx: u32) -> Option<String> {
    net.attribute_def(attr_name).and_then(|d| match &d.ty {
        AttributeType::Enum(labels) => labels.get(idx as usize).cloned(),
        _ => None,
    })
}

fn attrs_to_json_map(net: &Network, attrs: &crate::model::Attributes) -> BTreeMap<String, Value> {
    attrs
        .iter()
        .map(|(name, value)| {
            let json_value = match net.attribute_def(name) {
                Some(def) => attribute_value_to_json(def, value),
                None => attribute_value_to_json_plain(value),
            };
            (name.clone(), json_value)
        })
        .collect()
}

fn attribute_value_to_json(def: &AttributeDef, value: &AttributeValue) -> Value {
    match value {
        AttributeValue::Int(v) => Value::from(*v),
        AttributeValue::Hex(v) => Value::String(format!("0x{:x}", v)),
        AttributeValue::Float(v) => serde_json::Number::from_f64(*v).map(Value::Number).unwrap_or(Value::Null),
        AttributeValue::String(s) => Value::String(s.clone()),
        AttributeValue::Enum(idx) => match &def.ty {
            AttributeType::Enum(labels) => Value::String(labels.get(*idx as usize).cloned().unwrap_or_default()),
            _ => Value::from(*idx),
        },
    }
}

fn attribute_value_to_json_plain(value: &AttributeValue) -> Value {
    match value {
        AttributeValue::Int(v) | AttributeValue::Hex(v) => Value::from(*v),
        AttributeValue::Float(v) => serde_json::Number::from_f64(*v).map(Value::Number).unwrap_or(Value::Null),
        AttributeValue::String(s) => Value::String(s.clone()),
        AttributeValue::Enum(idx) => Value::from(*idx),
    }
}

fn attribute_value_from_json(def: &AttributeDef, v: &Value) -> crate::Result<AttributeValue> {
    let bad = || Error::TypeMismatch { attribute: def.name.clone(), expected: def.ty.type_name(), found: json_kind(v) };
    match &def.ty {
        AttributeType::Int { .. } => v.as_i64().map(AttributeValue::Int).ok_or_else(bad),
        AttributeType::Hex { .. } => match v {
            Value::String(s) => parse_hex_literal(s).map(AttributeValue::Hex).ok_or_else(bad),
            Value::Number(_) => v.as_i64().map(AttributeValue::Hex).ok_or_else(bad),
            _ => Err(bad()),
        },
        AttributeType::Float { .. } => v.as_f64().map(AttributeValue::Float).ok_or_else(bad),
        AttributeType::String => v.as_str().map(|s| AttributeValue::String(s.to_string())).ok_or_else(bad),
        AttributeType::Enum(labels) => match v {
            Value::String(s) => labels.iter().position(|l| l == s).map(|i| AttributeValue::Enum(i as u32)).ok_or_else(bad),
            Value::Number(_) => v.as_u64().map(|i| AttributeValue::Enum(i as u32)).ok_or_else(bad),
            _ => Err(bad()),
        },
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn def_from_json(kind: AttributeKind, name: &str, j: &AttributeDefJson) -> crate::Result<AttributeDef> {
    let (ty, default) = match j {
        AttributeDefJson::Int { from, to, default } => (AttributeType::Int { from: *from, to: *to }, AttributeValue::Int(*default)),
        AttributeDefJson::Hex { from, to, default } => (AttributeType::Hex { from: *from, to: *to }, AttributeValue::Hex(*default)),
        AttributeDefJson::Float { from, to, default } => {
            (AttributeType::Float { from: *from, to: *to }, AttributeValue::Float(*default))
        }
        AttributeDefJson::String { default } => (AttributeType::String, AttributeValue::String(default.clone())),
        AttributeDefJson::Enum { labels, default } => {
            let idx = labels.iter().position(|l| l == default).ok_or_else(|| Error::UnknownReference {
                what: "enum label",
                name: default.clone(),
                context: format!("attribute definition '{}' default", name),
            })?;
            (AttributeType::Enum(labels.clone()), AttributeValue::Enum(idx as u32))
        }
    };
    crate::model::validate_bounds(name, &ty, &default)?;
    Ok(AttributeDef { kind, name: name.to_string(), ty, default })
}

fn def_to_json(def: &AttributeDef) -> AttributeDefJson {
    match (&def.ty, &def.default) {
        (AttributeType::Int { from, to }, AttributeValue::Int(d)) => AttributeDefJson::Int { from: *from, to: *to, default: *d },
        (AttributeType::Hex { from, to }, AttributeValue::Hex(d)) => AttributeDefJson::Hex { from: *from, to: *to, default: *d },
        (AttributeType::Float { from, to }, AttributeValue::Float(d)) => {
            AttributeDefJson::Float { from: *from, to: *to, default: *d }
        }
        (AttributeType::String, AttributeValue::String(d)) => AttributeDefJson::String { default: d.clone() },
        (AttributeType::Enum(labels), AttributeValue::Enum(idx)) => {
            AttributeDefJson::Enum { labels: labels.clone(), default: labels.get(*idx as usize).cloned().unwrap_or_default() }
        }
        _ => unreachable!("AttributeDef::ty and ::default always agree on variant"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_ms_round_trips_through_sugar() {
        let dbc = "VERSION \"1.0\"\n\nNS_ :\n\nBS_ :\n\nBU_ : A\n\nBO_ 100 M1: 8 A\n SG_ S1 : 0|8@1+ (1,0) [0|255] \"u\" Vector__XXX\n\nBA_DEF_ BO_ \"GenMsgCycleTime\" INT 0 65535;\nBA_DEF_DEF_ \"GenMsgCycleTime\" 100;\nBA_ \"GenMsgCycleTime\" BO_ 100 250;\n";
        let net = crate::parse_dbc(dbc).unwrap();
        let json = to_json(&net).unwrap();
        assert!(json.contains("\"period_ms\": 250"));
        assert!(!json.contains("cycle_time"));

        let (net2, warnings) = from_json(&json).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(net2.message(100).unwrap().attributes.get(GEN_MSG_CYCLE_TIME), Some(&AttributeValue::Int(250)));
    }

    #[test]
    fn cycle_time_is_accepted_as_period_alias() {
        let json = r#"{
            "version": "1.0",
            "baudrate": 0,
            "nodes": {"A": {}},
            "messages": {
                "M1": {
                    "id": 100,
                    "length": 8,
                    "sender": "A",
                    "cycle_time": 50,
                    "signals": {
                        "S1": {"start_bit": 0, "size": 8, "endianness": "little", "scale": 1.0, "offset": 0.0, "min": 0.0, "max": 255.0}
                    }
                }
            }
        }"#;
        let (net, _) = from_json(json).unwrap();
        assert_eq!(net.message(100).unwrap().attributes.get(GEN_MSG_CYCLE_TIME), Some(&AttributeValue::Int(50)));
    }

    #[test]
    fn unknown_send_type_is_clamped_with_warning() {
        let json = r#"{
            "version": "1.0",
            "baudrate": 0,
            "nodes": {"A": {}},
            "messages": {
                "M1": {
                    "id": 100,
                    "length": 8,
                    "sender": "A",
                    "send_type": "Bogus",
                    "signals": {
                        "S1": {"start_bit": 0, "size": 8, "endianness": "little", "scale": 1.0, "offset": 0.0, "min": 0.0, "max": 255.0}
                    }
                }
            }
        }"#;
        let (net, warnings) = from_json(json).unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(net.message(100).unwrap().attributes.get(GEN_MSG_SEND_TYPE), Some(&AttributeValue::Enum(0)));
    }

    #[test]
    fn enum_ref_resolves_against_global_table() {
        let json = r#"{
            "version": "1.0",
            "baudrate": 0,
            "nodes": {"A": {}},
            "signal_enums": {"Gear": {"Park": 0, "Drive": 1}},
            "messages": {
                "M1": {
                    "id": 100,
                    "length": 8,
                    "sender": "A",
                    "signals": {
                        "S1": {"start_bit": 0, "size": 8, "endianness": "little", "scale": 1.0, "offset": 0.0, "min": 0.0, "max": 255.0, "enum_ref": "Gear"}
                    }
                }
            }
        }"#;
        let (net, warnings) = from_json(json).unwrap();
        assert!(warnings.is_empty());
        let sig = net.message(100).unwrap().signal("S1").unwrap();
        assert_eq!(sig.enum_values.len(), 2);
    }

    #[test]
    fn extended_mux_group_round_trips() {
        let (net, _) = from_json(
            r#"{
            "version": "1.0",
            "baudrate": 0,
            "nodes": {"A": {}},
            "messages": {
                "M1": {
                    "id": 100,
                    "length": 8,
                    "sender": "A",
                    "signals": {
                        "Service": {"start_bit": 0, "size": 8, "endianness": "little", "scale": 1.0, "offset": 0.0, "min": 0.0, "max": 255.0, "mux_group": ["Speed"]},
                        "Speed": {"start_bit": 8, "size": 8, "endianness": "little", "scale": 1.0, "offset": 0.0, "min": 0.0, "max": 255.0, "mux_switch": [1]}
                    }
                }
            }
        }"#,
        )
        .unwrap();
        let msg = net.message(100).unwrap();
        assert!(!msg.extended_mux);
        let svc = msg.signal("Service").unwrap();
        assert_eq!(svc.mux_children.len(), 1);
        assert_eq!(svc.mux_children[0].0, "Speed");

        let json = to_json(&net).unwrap();
        let (net2, _) = from_json(&json).unwrap();
        assert_eq!(net2.message(100).unwrap().signal("Service").unwrap().mux_children, svc.mux_children);
    }
}

//! Model → AST raising (spec §4.5). The inverse of lowering: rebuilds an
//! AST in the fixed canonical section order the emitter requires, so that
//! `emit_dbc(raise(model))` is deterministic regardless of the order the
//! model was populated in.

use std::collections::BTreeSet;

use crate::ast::{self, Ast};
use crate::model::{AttributeDef, AttributeKind, AttributeType, AttributeValue, Host, MuxRole, Network};

/// A fixed whitelist of extension keywords, the same block every
/// Vector-tooling DBC writer emits regardless of file content (spec §4.5:
/// "a constant whitelist of known extension keywords").
const NEW_SYMBOLS: &[&str] = &[
    "NS_DESC_",
    "CM_",
    "BA_DEF_",
    "BA_",
    "VAL_",
    "CAT_DEF_",
    "CAT_",
    "FILTER",
    "BA_DEF_DEF_",
    "EV_DATA_",
    "ENVVAR_DATA_",
    "SGTYPE_",
    "SGTYPE_VAL_",
    "BA_DEF_SGTYPE_",
    "BA_SGTYPE_",
    "SIG_TYPE_REF_",
    "VAL_TABLE_",
    "SIG_GROUP_",
    "SIG_VALTYPE_",
    "SIGTYPE_VALTYPE_",
    "BO_TX_BU_",
    "BA_DEF_REL_",
    "BA_REL_",
    "BA_DEF_DEF_REL_",
    "BU_SG_REL_",
    "BU_EV_REL_",
    "BU_BO_REL_",
    "SG_MUL_VAL_",
];

/// The attribute name under which a message's period is stored (spec §4.4
/// step 7, §4.6). Exposed so `json.rs` can fold/extract the same name
/// without duplicating the literal.
pub(crate) const GEN_MSG_CYCLE_TIME: &str = "GenMsgCycleTime";

pub fn raise(net: &Network) -> Ast {
    let mut ast = Ast::default();

    ast.version = Some(net.version.clone());
    ast.new_symbols = NEW_SYMBOLS.iter().map(|s| s.to_string()).collect();
    ast.bit_timing = if net.baudrate != 0 {
        Some(ast::BitTiming { baudrate: net.baudrate, btr1: 0, btr2: 0 })
    } else {
        None
    };
    ast.nodes = net.nodes.iter().map(|n| n.name.clone()).collect();

    ast.value_tables =
        net.value_tables.iter().map(|vt| ast::ValueTable { name: vt.name.clone(), entries: vt.entries.clone() }).collect();

    for msg in net.messages.values() {
        ast.messages.push(raise_message(msg));
    }

    raise_comments(net, &mut ast);
    raise_attributes(net, &mut ast);

    for msg in net.messages.values() {
        for sig in &msg.signals {
            if !sig.enum_values.is_empty() {
                ast.value_encodings.push(ast::ValueEncoding::Signal {
                    message_id: msg.id,
                    signal: sig.name.clone(),
                    entries: sig.enum_values.clone(),
                });
            }
        }
    }

    for msg in net.messages.values() {
        if !msg.extended_mux {
            continue;
        }
        for mux_sig in msg.signals.iter().filter(|s| s.role.is_multiplexor()) {
            for (child, indexes) in &mux_sig.mux_children {
                ast.extended_muxes.push(ast::ExtendedMux {
                    message_id: msg.id,
                    multiplexed: child.clone(),
                    multiplexor: mux_sig.name.clone(),
                    ranges: collapse_ranges(indexes),
                });
            }
        }
    }

    ast
}

fn raise_message(msg: &crate::model::Message) -> ast::Message {
    ast::Message {
        id: msg.id,
        name: msg.name.clone(),
        length: msg.length,
        transmitter: msg.transmitter.clone(),
        signals: msg.signals.iter().map(raise_signal).collect(),
    }
}

fn raise_signal(sig: &crate::model::Signal) -> ast::Signal {
    let mux = match &sig.role {
        MuxRole::Plain => ast::MuxToken::None,
        MuxRole::Multiplexor => ast::MuxToken::Switch,
        MuxRole::Multiplexed { indexes } => {
            ast::MuxToken::Value(*indexes.iter().next().unwrap_or(&0))
        }
        MuxRole::Both { indexes } => {
            ast::MuxToken::SwitchedValue(*indexes.iter().next().unwrap_or(&0))
        }
    };

    ast::Signal {
        name: sig.name.clone(),
        mux,
        start_bit: sig.start_bit,
        size: sig.size,
        big_endian: sig.endianness == crate::model::Endianness::Big,
        unsigned: sig.signedness == crate::model::Signedness::Unsigned,
        factor: sig.factor,
        offset: sig.offset,
        min: sig.min,
        max: sig.max,
        unit: sig.unit.clone(),
        receivers: if sig.receivers.is_empty() {
            vec![crate::lexer::NO_NODE.to_string()]
        } else {
            sig.receivers.clone()
        },
    }
}

fn raise_comments(net: &Network, ast: &mut Ast) {
    if !net.description.is_empty() {
        ast.comments.push(ast::Comment::Network(net.description.clone()));
    }
    for node in &net.nodes {
        if !node.description.is_empty() {
            ast.comments.push(ast::Comment::Node { node: node.name.clone(), text: node.description.clone() });
        }
    }
    for msg in net.messages.values() {
        if !msg.description.is_empty() {
            ast.comments.push(ast::Comment::Message { message_id: msg.id, text: msg.description.clone() });
        }
    }
    for msg in net.messages.values() {
        for sig in &msg.signals {
            if !sig.description.is_empty() {
                ast.comments.push(ast::Comment::Signal {
                    message_id: msg.id,
                    signal: sig.name.clone(),
                    text: sig.description.clone(),
                });
            }
        }
    }
}

fn raise_attributes(net: &Network, ast: &mut Ast) {
    let mut defs = net.attribute_defs.clone();
    if !defs.iter().any(|d| d.name == GEN_MSG_CYCLE_TIME) {
        defs.push(AttributeDef {
            kind: AttributeKind::Message,
            name: GEN_MSG_CYCLE_TIME.to_string(),
            ty: AttributeType::Int { from: 0, to: 65535 },
            default: AttributeValue::Int(0),
        });
    }

    for def in &defs {
        ast.attribute_defs.push(ast::AttributeDef {
            kind: raise_attribute_kind(def.kind),
            name: def.name.clone(),
            ty: raise_attribute_type(&def.ty),
        });
        ast.attribute_defaults.push(ast::AttributeDefault {
            name: def.name.clone(),
            raw_value: default_literal(def, &def.default),
        });
    }

    raise_attribute_values(Host::Network, &net.attributes, &defs, ast);
    for node in &net.nodes {
        raise_attribute_values(Host::Node(node.name.clone()), &node.attributes, &defs, ast);
    }
    for msg in net.messages.values() {
        raise_attribute_values(Host::Message(msg.id), &msg.attributes, &defs, ast);
        for sig in &msg.signals {
            raise_attribute_values(
                Host::Signal { message_id: msg.id, signal: sig.name.clone() },
                &sig.attributes,
                &defs,
                ast,
            );
        }
    }
}

fn raise_attribute_values(
    host: Host,
    attrs: &crate::model::Attributes,
    defs: &[AttributeDef],
    ast: &mut Ast,
) {
    for (name, value) in attrs.iter() {
        let Some(def) = defs.iter().find(|d| &d.name == name) else { continue };
        let ast_host = match &host {
            Host::Network => ast::AttributeHost::Network,
            Host::Node(n) => ast::AttributeHost::Node(n.clone()),
            Host::Message(id) => ast::AttributeHost::Message(*id),
            Host::Signal { message_id, signal } => {
                ast::AttributeHost::Signal { message_id: *message_id, signal: signal.clone() }
            }
        };
        ast.attribute_values.push(ast::AttributeValue {
            name: name.clone(),
            host: ast_host,
            raw_value: value_literal(def, value),
        });
    }
}

fn raise_attribute_kind(kind: AttributeKind) -> ast::AttributeKind {
    match kind {
        AttributeKind::General => ast::AttributeKind::General,
        AttributeKind::Node => ast::AttributeKind::Node,
        AttributeKind::Message => ast::AttributeKind::Message,
        AttributeKind::Signal => ast::AttributeKind::Signal,
    }
}

fn raise_attribute_type(ty: &AttributeType) -> ast::AttributeTypeDef {
    match ty {
        AttributeType::Int { from, to } => ast::AttributeTypeDef::Int { from: *from, to: *to },
        AttributeType::Hex { from, to } => ast::AttributeTypeDef::Hex { from: *from, to: *to },
        AttributeType::Float { from, to } => ast::AttributeTypeDef::Float { from: *from, to: *to },
        AttributeType::String => ast::AttributeTypeDef::String,
        AttributeType::Enum(labels) => ast::AttributeTypeDef::Enum(labels.clone()),
    }
}

/// Defaults spell an enum as its label; values spell it as an index (spec
/// §4.4 step 8).
fn default_literal(def: &AttributeDef, value: &AttributeValue) -> String {
    match (&def.ty, value) {
        (AttributeType::Enum(labels), AttributeValue::Enum(idx)) => {
            labels.get(*idx as usize).cloned().unwrap_or_default()
        }
        _ => value_literal(def, value),
    }
}

fn value_literal(_def: &AttributeDef, value: &AttributeValue) -> String {
    match value {
        AttributeValue::Int(v) => v.to_string(),
        AttributeValue::Hex(v) => format_hex(*v),
        AttributeValue::Float(v) => crate::emit::format_float(*v),
        AttributeValue::String(s) => s.clone(),
        AttributeValue::Enum(idx) => idx.to_string(),
    }
}

/// `0x` prefix, lower-case digits (spec §4.5 "Numeric formatting").
fn format_hex(v: i64) -> String {
    format!("0x{:x}", v)
}

/// Collapse a selector set back into the `from-to` ranges the wire format
/// wants (the inverse of lowering's range expansion).
fn collapse_ranges(indexes: &BTreeSet<u32>) -> Vec<(u32, u32)> {
    let mut ranges = vec![];
    let mut iter = indexes.iter().copied();
    let Some(mut start) = iter.next() else { return ranges };
    let mut end = start;
    for v in iter {
        if v == end + 1 {
            end = v;
        } else {
            ranges.push((start, end));
            start = v;
            end = v;
        }
    }
    ranges.push((start, end));
    ranges
}

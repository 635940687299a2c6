//! AST → DBC text serialization (spec §4.6, §6.1). Mirrors the teacher's
//! `to_dbc_string` style: build into a pre-sized `String` with `push_str`,
//! one function per record kind, in the fixed section order `raising`
//! produces.

use std::fmt::Write;

use crate::ast::{self, Ast};
use crate::lexer::NO_NODE;

pub fn emit(ast: &Ast) -> String {
    let signal_count: usize = ast.messages.iter().map(|m| m.signals.len()).sum();
    let mut out = String::with_capacity(256 + ast.messages.len() * 64 + signal_count * 96);

    if let Some(version) = &ast.version {
        writeln!(out, "VERSION \"{}\"", version).unwrap();
    } else {
        out.push_str("VERSION \"\"\n");
    }
    out.push('\n');

    out.push_str("NS_ :\n");
    for sym in &ast.new_symbols {
        writeln!(out, "    {}", sym).unwrap();
    }
    out.push('\n');

    if let Some(bt) = &ast.bit_timing {
        writeln!(out, "BS_: {}:{},{}", bt.baudrate, bt.btr1, bt.btr2).unwrap();
    } else {
        out.push_str("BS_:\n");
    }
    out.push('\n');

    out.push_str("BU_:");
    for node in &ast.nodes {
        out.push(' ');
        out.push_str(node);
    }
    out.push('\n');

    for vt in &ast.value_tables {
        emit_value_table(&mut out, vt);
    }

    for msg in &ast.messages {
        out.push('\n');
        emit_message(&mut out, msg);
    }

    for tx in &ast.message_transmitters {
        emit_message_transmitters(&mut out, tx);
    }

    if !ast.comments.is_empty() {
        out.push('\n');
    }
    for c in &ast.comments {
        emit_comment(&mut out, c);
    }

    if !ast.attribute_defs.is_empty() {
        out.push('\n');
    }
    for def in &ast.attribute_defs {
        emit_attribute_def(&mut out, def);
    }

    for default in &ast.attribute_defaults {
        writeln!(out, "BA_DEF_DEF_ \"{}\" {};", default.name, default.raw_value).unwrap();
    }

    if !ast.attribute_values.is_empty() {
        out.push('\n');
    }
    for av in &ast.attribute_values {
        emit_attribute_value(&mut out, av);
    }

    if !ast.value_encodings.is_empty() {
        out.push('\n');
    }
    for ve in &ast.value_encodings {
        emit_value_encoding(&mut out, ve);
    }

    if !ast.extended_muxes.is_empty() {
        out.push('\n');
    }
    for em in &ast.extended_muxes {
        emit_extended_mux(&mut out, em);
    }

    out
}

fn emit_value_table(out: &mut String, vt: &ast::ValueTable) {
    write!(out, "VAL_TABLE_ {}", vt.name).unwrap();
    for (code, label) in &vt.entries {
        write!(out, " {} \"{}\"", code, label).unwrap();
    }
    out.push_str(" ;\n");
}

fn emit_message(out: &mut String, msg: &ast::Message) {
    writeln!(out, "BO_ {} {} : {} {}", msg.id, msg.name, msg.length, msg.transmitter).unwrap();
    for sig in &msg.signals {
        emit_signal(out, sig);
    }
}

fn emit_signal(out: &mut String, sig: &ast::Signal) {
    out.push_str(" SG_ ");
    out.push_str(&sig.name);
    match sig.mux {
        ast::MuxToken::None => {}
        ast::MuxToken::Switch => out.push_str(" M"),
        ast::MuxToken::Value(n) => write!(out, " m{}", n).unwrap(),
        ast::MuxToken::SwitchedValue(n) => write!(out, " m{}M", n).unwrap(),
    }
    out.push_str(" : ");
    write!(out, "{}|{}@{}", sig.start_bit, sig.size, if sig.big_endian { 0 } else { 1 }).unwrap();
    out.push(if sig.unsigned { '+' } else { '-' });
    write!(out, " ({},{})", format_float(sig.factor), format_float(sig.offset)).unwrap();
    write!(out, " [{}|{}]", format_float(sig.min), format_float(sig.max)).unwrap();
    write!(out, " \"{}\"", sig.unit).unwrap();

    out.push(' ');
    if sig.receivers.is_empty() {
        out.push_str(NO_NODE);
    } else {
        for (i, r) in sig.receivers.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(r);
        }
    }
    out.push('\n');
}

fn emit_message_transmitters(out: &mut String, tx: &ast::MessageTransmitters) {
    write!(out, "BO_TX_BU_ {} :", tx.message_id).unwrap();
    for (i, t) in tx.transmitters.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push(' ');
        out.push_str(t);
    }
    out.push_str(";\n");
}

fn emit_comment(out: &mut String, c: &ast::Comment) {
    match c {
        ast::Comment::Network(text) => writeln!(out, "CM_ \"{}\";", text).unwrap(),
        ast::Comment::Node { node, text } => {
            writeln!(out, "CM_ BU_ {} \"{}\";", node, text).unwrap()
        }
        ast::Comment::Message { message_id, text } => {
            writeln!(out, "CM_ BO_ {} \"{}\";", message_id, text).unwrap()
        }
        ast::Comment::Signal { message_id, signal, text } => {
            writeln!(out, "CM_ SG_ {} {} \"{}\";", message_id, signal, text).unwrap()
        }
        ast::Comment::EnvVar { name, text } => {
            writeln!(out, "CM_ EV_ {} \"{}\";", name, text).unwrap()
        }
    }
}

fn emit_attribute_def(out: &mut String, def: &ast::AttributeDef) {
    out.push_str("BA_DEF_ ");
    match def.kind {
        ast::AttributeKind::General => {}
        ast::AttributeKind::Node => out.push_str("BU_ "),
        ast::AttributeKind::Message => out.push_str("BO_ "),
        ast::AttributeKind::Signal => out.push_str("SG_ "),
        ast::AttributeKind::EnvVar => out.push_str("EV_ "),
    }
    write!(out, "\"{}\" ", def.name).unwrap();
    match &def.ty {
        ast::AttributeTypeDef::Int { from, to } => write!(out, "INT {} {}", from, to).unwrap(),
        ast::AttributeTypeDef::Hex { from, to } => {
            write!(out, "HEX 0x{:x} 0x{:x}", from, to).unwrap()
        }
        ast::AttributeTypeDef::Float { from, to } => {
            write!(out, "FLOAT {} {}", format_float(*from), format_float(*to)).unwrap()
        }
        ast::AttributeTypeDef::String => out.push_str("STRING"),
        ast::AttributeTypeDef::Enum(labels) => {
            out.push_str("ENUM ");
            for (i, l) in labels.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write!(out, "\"{}\"", l).unwrap();
            }
        }
    }
    out.push_str(";\n");
}

fn emit_attribute_value(out: &mut String, av: &ast::AttributeValue) {
    write!(out, "BA_ \"{}\"", av.name).unwrap();
    match &av.host {
        ast::AttributeHost::Network => {}
        ast::AttributeHost::Node(n) => write!(out, " BU_ {}", n).unwrap(),
        ast::AttributeHost::Message(id) => write!(out, " BO_ {}", id).unwrap(),
        ast::AttributeHost::Signal { message_id, signal } => {
            write!(out, " SG_ {} {}", message_id, signal).unwrap()
        }
        ast::AttributeHost::EnvVar(n) => write!(out, " EV_ {}", n).unwrap(),
    }
    writeln!(out, " {};", av.raw_value).unwrap();
}

fn emit_value_encoding(out: &mut String, ve: &ast::ValueEncoding) {
    match ve {
        ast::ValueEncoding::Signal { message_id, signal, entries } => {
            write!(out, "VAL_ {} {}", message_id, signal).unwrap();
            for (code, label) in entries {
                write!(out, " {} \"{}\"", code, label).unwrap();
            }
            out.push_str(" ;\n");
        }
        ast::ValueEncoding::EnvVar { name, entries } => {
            write!(out, "VAL_ {}", name).unwrap();
            for (code, label) in entries {
                write!(out, " {} \"{}\"", code, label).unwrap();
            }
            out.push_str(" ;\n");
        }
    }
}

fn emit_extended_mux(out: &mut String, em: &ast::ExtendedMux) {
    write!(out, "SG_MUL_VAL_ {} {} {}", em.message_id, em.multiplexed, em.multiplexor).unwrap();
    for (i, (from, to)) in em.ranges.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write!(out, " {}-{}", from, to).unwrap();
    }
    out.push_str(";\n");
}

/// Rust's `Display` for `f64` already produces the shortest round-tripping
/// decimal (the same guarantee the teacher leans on via bare `write!`), so
/// this only exists to give the emitter and `raising` a single named entry
/// point instead of scattering `{}` formatting.
pub fn format_float(v: f64) -> String {
    format!("{}", v)
}

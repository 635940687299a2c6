//! Property-based tests covering the round-trip and bit-occupancy
//! invariants spec §8 holds the whole pipeline to.

use dbc_rs::parse_dbc;
use proptest::prelude::*;

/// Generates a valid DBC document: one or more nodes, zero to eight
/// messages each with zero to six non-overlapping plain signals.
fn gen_dbc_string() -> impl Strategy<Value = String> {
    let node_strategy = "[A-Z][a-zA-Z0-9_]{0,15}";
    let message_id_strategy = 1u32..=0x7FFu32;
    let message_name_strategy = "[A-Z][a-zA-Z0-9_]{0,15}";
    let length_strategy = 1u32..=8u32;
    let signal_name_strategy = "[A-Z][a-zA-Z0-9_]{0,15}";
    let signal_len_strategy = 1u32..=16u32;

    (
        prop::collection::vec(node_strategy, 1..=4),
        prop::collection::vec(
            (
                message_id_strategy,
                message_name_strategy,
                length_strategy,
                prop::collection::vec((signal_name_strategy, signal_len_strategy), 0..=6),
            ),
            0..=8,
        ),
    )
        .prop_map(|(nodes, messages)| {
            let mut dbc = String::from("VERSION \"1.0\"\n\nNS_ :\n\nBS_ :\n\nBU_ :");
            for n in &nodes {
                dbc.push(' ');
                dbc.push_str(n);
            }
            dbc.push('\n');

            let mut seen_ids = std::collections::HashSet::new();
            let mut seen_names = std::collections::HashSet::new();
            let sender = nodes[0].clone();

            for (id, name, length, signals) in messages {
                if !seen_ids.insert(id) || !seen_names.insert(name.clone()) {
                    continue;
                }
                dbc.push_str(&format!("\nBO_ {} {}: {} {}\n", id, name, length, sender));

                let max_bits = length * 8;
                let mut current_bit = 0u32;
                let mut seen_sig_names = std::collections::HashSet::new();
                for (sig_name, sig_len) in signals {
                    if !seen_sig_names.insert(sig_name.clone()) {
                        continue;
                    }
                    if current_bit + sig_len <= max_bits {
                        dbc.push_str(&format!(
                            " SG_ {} : {}|{}@1+ (1,0) [0|255] \"\" Vector__XXX\n",
                            sig_name, current_bit, sig_len
                        ));
                        current_bit += sig_len;
                    }
                }
            }

            dbc
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn parse_never_panics_on_well_formed_input(dbc_str in gen_dbc_string()) {
        let _ = parse_dbc(&dbc_str);
    }

    #[test]
    fn dbc_round_trip_preserves_message_and_signal_counts(dbc_str in gen_dbc_string()) {
        if let Ok(net) = parse_dbc(&dbc_str) {
            let emitted = dbc_rs::emit_dbc(&net);
            let net2 = parse_dbc(&emitted).expect("emitted DBC text must re-parse");
            prop_assert_eq!(net.messages.len(), net2.messages.len());
            for (id, msg) in &net.messages {
                let msg2 = net2.message(*id).expect("message id survives round-trip");
                prop_assert_eq!(msg.signals.len(), msg2.signals.len());
            }
        }
    }

    #[test]
    fn json_round_trip_preserves_message_and_signal_counts(dbc_str in gen_dbc_string()) {
        if let Ok(net) = parse_dbc(&dbc_str) {
            let json = dbc_rs::to_json(&net).expect("a validly lowered network always projects to JSON");
            let (net2, _warnings) = dbc_rs::from_json(&json).expect("our own JSON output must parse back");
            prop_assert_eq!(net.messages.len(), net2.messages.len());
            for (id, msg) in &net.messages {
                let name_match = net2.messages.values().any(|m| m.name == msg.name);
                prop_assert!(name_match);
            }
        }
    }

    #[test]
    fn signal_boundaries_never_exceed_message_length(
        start_bit in 0u32..=128u32,
        length in 1u32..=32u32,
        dlc in 1u32..=8u32,
    ) {
        let max_bits = dlc * 8;
        let fits = start_bit + length <= max_bits;

        let dbc_str = format!(
            "VERSION \"1.0\"\n\nNS_ :\n\nBS_ :\n\nBU_ : A\n\nBO_ 256 M: {} A\n SG_ S : {}|{}@1+ (1,0) [0|255] \"\" Vector__XXX\n",
            dlc, start_bit, length
        );

        match parse_dbc(&dbc_str) {
            Ok(_) => prop_assert!(fits, "parser accepted a signal that overruns its message"),
            Err(_) => prop_assert!(!fits, "parser rejected a signal that fits"),
        }
    }
}

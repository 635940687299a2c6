//! Black-box integration tests exercising the six end-to-end scenarios
//! spec §8 seeds the test suite with, through the crate's public API only.

use dbc_rs::{AttributeValue, Error, MuxRole};

#[test]
fn s1_minimal_dbc() {
    let dbc = "VERSION \"1.0\"\n\nNS_ :\n\nBS_ :\n\nBU_ : A B\n\nBO_ 100 M1: 8 A\n SG_ S1 : 0|8@1+ (1,0) [0|255] \"u\" B\n";
    let net = dbc_rs::parse_dbc(dbc).unwrap();

    assert_eq!(net.version, "1.0");
    assert_eq!(net.baudrate, 0);
    assert!(net.node("A").is_some());
    assert!(net.node("B").is_some());

    let msg = net.message(100).unwrap();
    assert_eq!(msg.name, "M1");
    assert_eq!(msg.length, 8);
    assert_eq!(msg.transmitter, "A");

    let sig = msg.signal("S1").unwrap();
    assert_eq!(sig.start_bit, 0);
    assert_eq!(sig.size, 8);
    assert_eq!(sig.receivers, vec!["B".to_string()]);
    assert!(matches!(sig.role, MuxRole::Plain));

    dbc_rs::validate(&net).unwrap();
}

#[test]
fn s2_simple_multiplex() {
    let dbc = "VERSION \"1.0\"\n\nNS_ :\n\nBS_ :\n\nBU_ : A\n\nBO_ 200 M2: 8 A\n SG_ Sel M : 0|2@1+ (1,0) [0|3] \"\" Vector__XXX\n SG_ A0 m0 : 2|8@1+ (1,0) [0|255] \"\" Vector__XXX\n SG_ A1 m1 : 2|8@1+ (1,0) [0|255] \"\" Vector__XXX\n";
    let net = dbc_rs::parse_dbc(dbc).unwrap();

    let msg = net.message(200).unwrap();
    assert!(!msg.extended_mux);
    let sel = msg.signal("Sel").unwrap();
    assert!(sel.role.is_multiplexor());
    assert_eq!(sel.mux_children.len(), 2);
    let a0 = msg.signal("A0").unwrap();
    assert_eq!(a0.role, MuxRole::Multiplexed { indexes: [0].into_iter().collect() });
    let a1 = msg.signal("A1").unwrap();
    assert_eq!(a1.role, MuxRole::Multiplexed { indexes: [1].into_iter().collect() });

    let roundtrip = dbc_rs::parse_dbc(&dbc_rs::emit_dbc(&net)).unwrap();
    assert_eq!(roundtrip, net);
}

#[test]
fn s3_extended_mux() {
    let dbc = "VERSION \"1.0\"\n\nNS_ :\n\nBS_ :\n\nBU_ : A\n\nBO_ 300 M3: 8 A\n SG_ Service M : 0|8@1+ (1,0) [0|255] \"\" Vector__XXX\n SG_ ExtendedMuxSignalName m1M : 8|8@1+ (1,0) [0|255] \"\" Vector__XXX\n SG_ MultiplexedSignalName m2 : 8|8@1+ (1,0) [0|255] \"\" Vector__XXX\n SG_ VehicleSpeed m13 : 16|8@1+ (1,0) [0|255] \"\" Vector__XXX\n SG_ ThrottlePosition m17 : 16|8@1+ (1,0) [0|255] \"\" Vector__XXX\n\nSG_MUL_VAL_ 300 ExtendedMuxSignalName Service 1-1;\nSG_MUL_VAL_ 300 MultiplexedSignalName Service 2-2;\nSG_MUL_VAL_ 300 VehicleSpeed ExtendedMuxSignalName 13-13;\nSG_MUL_VAL_ 300 ThrottlePosition ExtendedMuxSignalName 17-17;\n";
    let net = dbc_rs::parse_dbc(dbc).unwrap();

    let msg = net.message(300).unwrap();
    assert!(msg.extended_mux);

    let service = msg.signal("Service").unwrap();
    let mut children: Vec<_> = service.mux_children.iter().map(|(n, _)| n.clone()).collect();
    children.sort();
    assert_eq!(children, vec!["ExtendedMuxSignalName".to_string(), "MultiplexedSignalName".to_string()]);

    let ext = msg.signal("ExtendedMuxSignalName").unwrap();
    let mut ext_children: Vec<_> = ext.mux_children.iter().map(|(n, _)| n.clone()).collect();
    ext_children.sort();
    assert_eq!(ext_children, vec!["ThrottlePosition".to_string(), "VehicleSpeed".to_string()]);

    let emitted = dbc_rs::emit_dbc(&net);
    assert_eq!(emitted.matches("SG_MUL_VAL_").count(), 4);
}

#[test]
fn s4_attribute_reunion_before_definition() {
    let dbc = concat!(
        "VERSION \"1.0\"\n\nNS_ :\n\nBS_ :\n\nBU_ : A\n\n",
        "BO_ 100 M1: 8 A\n SG_ S1 : 0|8@1+ (1,0) [0|255] \"\" Vector__XXX\n\n",
        "BA_ \"GenMsgCycleTime\" BO_ 100 250;\n",
        "BA_DEF_ BO_ \"GenMsgCycleTime\" INT 0 65535;\n",
        "BA_DEF_DEF_ \"GenMsgCycleTime\" 100;\n",
    );
    let net = dbc_rs::parse_dbc(dbc).unwrap();
    let msg = net.message(100).unwrap();
    assert_eq!(msg.attributes.get("GenMsgCycleTime"), Some(&AttributeValue::Int(250)));

    let json = dbc_rs::to_json(&net).unwrap();
    assert!(json.contains("\"period_ms\": 250"));
    assert!(!json.contains("\"GenMsgCycleTime\""));
}

#[test]
fn s5_enum_round_trip() {
    let dbc = "VERSION \"1.0\"\n\nNS_ :\n\nBS_ :\n\nBU_ : A\n\nBO_ 100 M1: 8 A\n SG_ S1 : 0|8@1+ (1,0) [0|255] \"\" Vector__XXX\n\nVAL_ 100 S1 0 \"Off\" 1 \"Idle\" 2 \"Running\" ;\n";
    let net = dbc_rs::parse_dbc(dbc).unwrap();
    let sig = net.message(100).unwrap().signal("S1").unwrap();
    assert_eq!(sig.enum_values, vec![(0, "Off".to_string()), (1, "Idle".to_string()), (2, "Running".to_string())]);

    let json = dbc_rs::to_json(&net).unwrap();
    assert!(json.contains("\"Off\": 0"));
    assert!(json.contains("\"Idle\": 1"));
    assert!(json.contains("\"Running\": 2"));

    let (net2, warnings) = dbc_rs::from_json(&json).unwrap();
    assert!(warnings.is_empty());
    assert_eq!(net2.message(100).unwrap().signal("S1").unwrap().enum_values.len(), 3);
}

#[test]
fn s6_bit_overlap_rejected() {
    let dbc = "VERSION \"1.0\"\n\nNS_ :\n\nBS_ :\n\nBU_ : A\n\nBO_ 100 M1: 8 A\n SG_ S1 : 0|8@1+ (1,0) [0|255] \"\" Vector__XXX\n SG_ S2 : 4|8@1+ (1,0) [0|255] \"\" Vector__XXX\n";
    let err = dbc_rs::parse_dbc(dbc).unwrap_err();
    match err {
        Error::BitOverlap { first, second, .. } => {
            assert_eq!(first, "S1");
            assert_eq!(second, "S2");
        }
        other => panic!("expected BitOverlap, got {:?}", other),
    }
}

#[test]
fn dbc_round_trip_is_byte_stable_after_two_passes() {
    let dbc = "VERSION \"1.0\"\n\nNS_ :\n\nBS_ :\n\nBU_ : A B\n\nBO_ 100 M1: 8 A\n SG_ S1 : 0|8@1+ (1,0) [0|255] \"u\" B\n";
    let net = dbc_rs::parse_dbc(dbc).unwrap();
    let once = dbc_rs::emit_dbc(&net);
    let net2 = dbc_rs::parse_dbc(&once).unwrap();
    let twice = dbc_rs::emit_dbc(&net2);
    assert_eq!(once, twice);
}

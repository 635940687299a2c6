use criterion::{criterion_group, criterion_main, Criterion};
use dbc_rs::{emit_dbc, parse_dbc};
use std::hint::black_box;

fn bench_parse_small(c: &mut Criterion) {
    let small_dbc = "VERSION \"1.0\"\n\nNS_ :\n\nBS_ :\n\nBU_ : ECM\n\nBO_ 256 Engine: 8 ECM\n SG_ RPM : 0|16@1+ (0.25,0) [0|8000] \"rpm\" Vector__XXX\n SG_ Temp : 16|8@1+ (1,-40) [-40|215] \"C\" Vector__XXX\n";

    c.bench_function("parse_small", |b| b.iter(|| parse_dbc(black_box(small_dbc))));
}

fn bench_parse_medium(c: &mut Criterion) {
    let mut medium_dbc = String::from("VERSION \"1.0\"\n\nNS_ :\n\nBS_ :\n\nBU_ : ECM TCM BCM\n");

    for i in 0..50 {
        medium_dbc.push_str(&format!("\nBO_ {} Message{}: 8 ECM\n", 256 + i, i));
        for j in 0..4 {
            medium_dbc.push_str(&format!(
                " SG_ Signal{} : {}|8@1+ (1,0) [0|255] \"\" Vector__XXX\n",
                j,
                j * 8
            ));
        }
    }

    c.bench_function("parse_medium", |b| b.iter(|| parse_dbc(black_box(&medium_dbc))));
}

fn bench_parse_large(c: &mut Criterion) {
    let mut large_dbc =
        String::from("VERSION \"1.0\"\n\nNS_ :\n\nBS_ :\n\nBU_ : ECM TCM BCM GATEWAY SENSOR ACTUATOR\n");

    for i in 0..200 {
        large_dbc.push_str(&format!("\nBO_ {} Message{}: 8 ECM\n", 256 + i, i));
        for j in 0..8 {
            large_dbc.push_str(&format!(
                " SG_ Signal{} : {}|8@1+ (1,0) [0|255] \"\" Vector__XXX\n",
                j,
                j * 8
            ));
        }
    }

    c.bench_function("parse_large", |b| b.iter(|| parse_dbc(black_box(&large_dbc))));
}

fn bench_emit_dbc(c: &mut Criterion) {
    let dbc_content = "VERSION \"1.0\"\n\nNS_ :\n\nBS_ :\n\nBU_ : ECM TCM\n\nBO_ 256 Engine: 8 ECM\n SG_ RPM : 0|16@1+ (0.25,0) [0|8000] \"rpm\" TCM\n SG_ Temp : 16|8@1+ (1,-40) [-40|215] \"C\" TCM\n\nBO_ 512 Brake: 4 TCM\n SG_ Pressure : 0|16@1+ (0.1,0) [0|1000] \"bar\" ECM\n";

    let net = parse_dbc(dbc_content).unwrap();

    c.bench_function("emit_dbc", |b| b.iter(|| emit_dbc(black_box(&net))));
}

fn bench_to_json(c: &mut Criterion) {
    let dbc_content = "VERSION \"1.0\"\n\nNS_ :\n\nBS_ :\n\nBU_ : ECM TCM\n\nBO_ 256 Engine: 8 ECM\n SG_ RPM : 0|16@1+ (0.25,0) [0|8000] \"rpm\" TCM\n SG_ Temp : 16|8@1+ (1,-40) [-40|215] \"C\" TCM\n\nBO_ 512 Brake: 4 TCM\n SG_ Pressure : 0|16@1+ (0.1,0) [0|1000] \"bar\" ECM\n";

    let net = parse_dbc(dbc_content).unwrap();

    c.bench_function("to_json", |b| b.iter(|| dbc_rs::to_json(black_box(&net))));
}

criterion_group!(
    benches,
    bench_parse_small,
    bench_parse_medium,
    bench_parse_large,
    bench_emit_dbc,
    bench_to_json
);
criterion_main!(benches);

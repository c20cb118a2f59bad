//! # Ledger-Lens Pipeline Benchmarks
//!
//! | Path | Operation |
//! |------|-----------|
//! | shared-types | Optional-value decoding over every wire shape |
//! | ll-01 | Task projection from a raw object |
//! | ll-03 | Envelope open, tagged and legacy |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::json;
use shared_crypto::{encrypt_with_nonce, Nonce};
use shared_types::{decode_optional_string, LedgerConfig, RawObject, RawValue};
use ll_01_registry_resolver::project_task;
use ll_03_content_pipeline::{content_key, open_content, seal_content, KeyMaterial};

fn bench_decoder(c: &mut Criterion) {
    let mut group = c.benchmark_group("shared-types-decoder");
    let shapes = [
        ("null", RawValue::from(json!(null))),
        ("plain", RawValue::from(json!("0xabc"))),
        ("list", RawValue::from(json!(["0xabc"]))),
        ("vec", RawValue::from(json!({"vec": ["0xabc"]}))),
        ("fields_some", RawValue::from(json!({"fields": {"some": "0xabc"}}))),
        (
            "fields_some_bytes",
            RawValue::from(json!({"fields": {"some": {"fields": {"bytes": "0xabc"}}}})),
        ),
        ("unrecognised", RawValue::from(json!({"kind": "other"}))),
    ];
    for (name, value) in &shapes {
        group.bench_with_input(BenchmarkId::new("decode_optional_string", name), value, |b, v| {
            b.iter(|| black_box(decode_optional_string(v)))
        });
    }
    group.finish();
}

fn bench_task_projection(c: &mut Criterion) {
    let settings = LedgerConfig::default().resolver;
    let object = RawObject::move_object(
        "0xT1",
        "0xpkg::task_manage::Task",
        json!({
            "title": "Ship report",
            "creator": "0xC",
            "status": 2,
            "created_at": "1700000000000",
            "due_date": {"vec": ["1700600000000"]},
            "assignee": {"fields": {"some": "0xA"}},
            "roles": {"fields": {"id": {"id": "0xroles"}}}
        }),
    );
    c.bench_function("ll-01-project_task", |b| {
        b.iter(|| black_box(project_task(&object, &settings)))
    });
}

fn bench_open_content(c: &mut Criterion) {
    let mut group = c.benchmark_group("ll-03-open_content");
    let key = content_key("ledger-lens/content-key/v1", &KeyMaterial::new("0xT1", "0xC"));

    for size in [1_024usize, 64 * 1_024, 1_024 * 1_024] {
        let plaintext = vec![0x5Au8; size];
        let tagged = seal_content(&plaintext, &key).expect("seal");
        let nonce = Nonce::generate();
        let mut legacy = nonce.as_bytes().to_vec();
        legacy.extend(encrypt_with_nonce(&key, &nonce, &plaintext).expect("encrypt"));

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("tagged", size), &tagged, |b, blob| {
            b.iter(|| black_box(open_content(blob, &key)))
        });
        group.bench_with_input(BenchmarkId::new("legacy", size), &legacy, |b, blob| {
            b.iter(|| black_box(open_content(blob, &key)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_decoder, bench_task_projection, bench_open_content);
criterion_main!(benches);

//! Conversion pipeline benchmarks.
//!
//! Measures decoding, converting and re-encoding legacy `topics` documents
//! with a growing number of topics.
//!
//! Run with: cargo bench -p asyncapi-converter --bench conversion

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use asyncapi_converter::{Converter, OutputFormat};

/// Generate an AsyncAPI 1.2.0 YAML document with N parameterized topics.
fn generate_document(topic_count: usize) -> String {
    let mut yaml = String::from(
        r#"asyncapi: "1.2.0"
info:
  title: Benchmark API
  version: "1.0.0"
baseTopic: bench.events
servers:
  - url: broker.example.com
    scheme: mqtt
    schemeVersion: "3.1.1"
security:
  - apiKey: []
topics:
"#,
    );

    for i in 0..topic_count {
        yaml.push_str(&format!(
            r#"  resource{i}.{{resourceId}}.updated:
    parameters:
      - schema:
          type: string
    publish:
      protocolInfo:
        mqtt:
          qos: 1
      payload:
        type: object
        properties:
          id:
            type: string
"#,
            i = i,
        ));
    }

    yaml
}

fn bench_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("conversion");
    let converter = Converter::default();

    for count in [1, 10, 100] {
        let document = generate_document(count);
        for (label, format) in [("json", OutputFormat::Json), ("yaml", OutputFormat::Yaml)] {
            group.bench_with_input(
                BenchmarkId::new(label, count),
                &document,
                |b, document| {
                    b.iter(|| {
                        converter
                            .convert(black_box(document.as_bytes()), format)
                            .expect("benchmark document converts")
                    })
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_conversion);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use qrand_entropy::batch::RemotePacketBatch;
use qrand_entropy::PacketShape;

fn packet_body(shape: PacketShape) -> Vec<u8> {
    let item = "a5".repeat(shape.size);
    let data: Vec<String> = vec![item; shape.length];
    format!(
        r#"{{"type":"string","length":{},"size":{},"data":{:?},"success":true}}"#,
        shape.length, shape.size, data
    )
    .into_bytes()
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("packet-decode");

    for shape in [PacketShape::new(10, 2), PacketShape::new(1024, 16)] {
        let body = packet_body(shape);

        group.bench_function(format!("parse-{}x{}", shape.length, shape.size), |b| {
            b.iter(|| RemotePacketBatch::parse(black_box(&body)).unwrap())
        });

        let batch = RemotePacketBatch::parse(&body).unwrap();
        group.bench_function(format!("hex-{}x{}", shape.length, shape.size), |b| {
            b.iter(|| batch.decode(black_box(&shape)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_decode);
criterion_main!(benches);

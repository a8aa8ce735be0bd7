use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;

use pallet_pack_core::prelude::*;

fn generate_boxes(count: usize, min_side: i32, max_side: i32, seed: u64) -> Vec<BoxItem> {
    use rand::SeedableRng;
    let mut rng = rand_pcg::Pcg64::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let length = rng.gen_range(min_side..=max_side);
            let width = rng.gen_range(min_side..=max_side);
            let height = rng.gen_range(min_side..=max_side);
            let weight = rng.gen_range(1.0..=40.0);
            BoxItem::new(format!("box_{i}"), length, width, height, weight).unwrap()
        })
        .collect()
}

fn bench_variants(c: &mut Criterion) {
    let mut group = c.benchmark_group("variants");
    let pallet = Pallet::new(120, 100, 180, 2000.0).unwrap();

    for count in [50usize, 150, 400] {
        let boxes = generate_boxes(count, 10, 40, 0xC0FFEE);
        group.throughput(Throughput::Elements(count as u64));

        for variant in Variant::ALL {
            group.bench_with_input(
                BenchmarkId::new(variant.display_name(), count),
                &boxes,
                |b, boxes| {
                    b.iter(|| {
                        let mut packer = Packer::new(variant, PackingOptions::for_variant(variant));
                        packer.set_pallet(pallet);
                        for item in boxes {
                            packer.add_box(item.clone());
                        }
                        black_box(packer.pack().unwrap())
                    });
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_variants);
criterion_main!(benches);

//! Property-style checks: non-overlap, containment, weight cap, support,
//! determinism, monotone reports and orientation legality, swept across
//! all five variants and several random catalogues.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use pallet_pack_core::prelude::*;

fn random_catalogue(seed: u64, count: usize, pallet: &Pallet) -> Vec<BoxItem> {
    let mut rng = Pcg64::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let length = rng.gen_range(5..=pallet.width / 2);
            let width = rng.gen_range(5..=pallet.depth / 2);
            let height = rng.gen_range(5..=pallet.height / 4);
            let weight = rng.gen_range(1.0..=30.0);
            BoxItem::new(format!("r{i}"), length, width, height, weight).unwrap()
        })
        .collect()
}

fn overlap_interiors(a: &PlacedBox, b: &PlacedBox) -> bool {
    let x = a.position.x < b.position.x + b.dims.dx && b.position.x < a.position.x + a.dims.dx;
    let y = a.position.y < b.position.y + b.dims.dy && b.position.y < a.position.y + a.dims.dy;
    let z = a.position.z < b.position.z + b.dims.dz && b.position.z < a.position.z + a.dims.dz;
    x && y && z
}

fn is_permutation(effective: Dims, nominal: (i32, i32, i32)) -> bool {
    let mut got = [effective.dx, effective.dy, effective.dz];
    let mut want = [nominal.0, nominal.1, nominal.2];
    got.sort_unstable();
    want.sort_unstable();
    got == want
}

#[test]
fn non_overlap_and_containment_hold_for_every_variant_and_seed() {
    let pallet = Pallet::new(120, 100, 160, 1500.0).unwrap();

    for variant in Variant::ALL {
        for seed in [1u64, 2, 3, 4, 5] {
            let catalogue = random_catalogue(seed, 25, &pallet);
            let mut packer = Packer::new(variant, PackingOptions::for_variant(variant));
            packer.set_pallet(pallet);
            for item in &catalogue {
                packer.add_box(item.clone());
            }
            let result = packer.pack().unwrap();

            for p in &result.placed {
                assert!(p.position.x >= 0 && p.position.y >= 0 && p.position.z >= 0);
                assert!(p.position.x + p.dims.dx <= pallet.width);
                assert!(p.position.y + p.dims.dy <= pallet.depth);
                assert!(p.position.z + p.dims.dz <= pallet.height);
                assert!(is_permutation(p.dims, (p.item.length, p.item.width, p.item.height)));
            }

            for i in 0..result.placed.len() {
                for j in (i + 1)..result.placed.len() {
                    assert!(
                        !overlap_interiors(&result.placed[i], &result.placed[j]),
                        "{variant:?} seed {seed}: boxes {} and {} overlap",
                        result.placed[i].item.id,
                        result.placed[j].item.id,
                    );
                }
            }

            let placed_weight: f64 = result.placed.iter().map(|p| p.item.weight).sum();
            assert!(placed_weight <= pallet.max_weight + 1e-9);

            assert_eq!(
                result.placed.len() + result.unplaced.len(),
                catalogue.len(),
                "{variant:?} seed {seed}: placed+unplaced must equal the input count"
            );
            assert!(placed_weight <= catalogue.iter().map(|b| b.weight).sum::<f64>() + 1e-9);
            assert!(result.report.space_utilization * 100.0 >= 0.0);
            assert!(result.report.space_utilization <= 1.0 + 1e-9);
        }
    }
}

#[test]
fn support_ratio_meets_each_variants_threshold() {
    let pallet = Pallet::new(120, 100, 160, 2000.0).unwrap();

    for variant in Variant::ALL {
        let opts = PackingOptions::for_variant(variant);
        let catalogue = random_catalogue(42, 30, &pallet);
        let mut packer = Packer::new(variant, opts.clone());
        packer.set_pallet(pallet);
        for item in &catalogue {
            packer.add_box(item.clone());
        }
        let result = packer.pack().unwrap();

        for p in &result.placed {
            if p.position.z == 0 {
                continue;
            }
            let others: Vec<PlacedBox> = result
                .placed
                .iter()
                .filter(|o| o.item.id != p.item.id)
                .cloned()
                .collect();
            let ratio = pallet_pack_core::geometry::support_ratio(p.position, p.dims, &others);
            assert!(
                ratio + 1e-9 >= opts.support_threshold,
                "{variant:?}: box {} has support {ratio} below threshold {}",
                p.item.id,
                opts.support_threshold
            );
        }
    }
}

#[test]
fn weight_aware_never_perches_a_heavier_box_on_a_lighter_one() {
    let pallet = Pallet::new(120, 100, 160, 3000.0).unwrap();
    let catalogue = random_catalogue(7, 40, &pallet);
    let mut packer = Packer::new(Variant::WeightAware, PackingOptions::for_variant(Variant::WeightAware));
    packer.set_pallet(pallet);
    for item in &catalogue {
        packer.add_box(item.clone());
    }
    let result = packer.pack().unwrap();

    for p in &result.placed {
        if p.position.z == 0 {
            continue;
        }
        let others: Vec<PlacedBox> = result
            .placed
            .iter()
            .filter(|o| o.item.id != p.item.id)
            .cloned()
            .collect();
        let supporters = pallet_pack_core::geometry::supporting_boxes(p.position, p.dims, &others);
        for (supporter, _) in supporters {
            assert!(
                supporter.item.weight >= p.item.weight * WEIGHT_SUPPORT_RATIO - 1e-9,
                "box {} (w={}) rests on {} (w={}), below the {} ratio",
                p.item.id,
                p.item.weight,
                supporter.item.id,
                supporter.item.weight,
                WEIGHT_SUPPORT_RATIO,
            );
        }
    }
}

#[test]
fn every_box_fitting_the_floor_alone_yields_a_non_empty_result() {
    let pallet = Pallet::new(120, 100, 160, 5000.0).unwrap();
    for variant in Variant::ALL {
        let mut packer = Packer::new(variant, PackingOptions::for_variant(variant));
        packer.set_pallet(pallet);
        for i in 0..5 {
            packer.add_box(BoxItem::new(format!("f{i}"), 20, 20, 10, 4.0).unwrap());
        }
        let result = packer.pack().unwrap();
        assert!(!result.placed.is_empty(), "{variant:?} placed nothing for floor-fitting boxes");
    }
}

#[test]
fn determinism_same_seed_same_placements() {
    let pallet = Pallet::new(120, 100, 160, 2000.0).unwrap();
    let catalogue = random_catalogue(99, 20, &pallet);

    let run = || {
        let opts = PackingOptions::builder(Variant::ExtremePoints).seed(0xBEEF).build();
        let mut packer = Packer::new(Variant::ExtremePoints, opts);
        packer.set_pallet(pallet);
        for item in &catalogue {
            packer.add_box(item.clone());
        }
        packer.pack().unwrap()
    };

    let a = run();
    let b = run();
    let key = |r: &PackResult| {
        r.placed
            .iter()
            .map(|p| (p.item.id.clone(), p.position, p.dims))
            .collect::<Vec<_>>()
    };
    assert_eq!(key(&a), key(&b));
}

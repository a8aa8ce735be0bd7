//! End-to-end packing scenarios on a 120x80x160 pallet with a 1000 kg cap.

use pallet_pack_core::prelude::*;

fn pallet() -> Pallet {
    Pallet::new(120, 80, 160, 1000.0).unwrap()
}

#[test]
fn s1_single_small_box() {
    let mut packer = Packer::new(Variant::WeightAware, PackingOptions::for_variant(Variant::WeightAware));
    packer.set_pallet(pallet());
    packer.add_box(BoxItem::new("B", 20, 15, 10, 2.0).unwrap());
    let result = packer.pack().unwrap();

    assert_eq!(result.placed.len(), 1);
    assert!(result.unplaced.is_empty());
    assert_eq!(result.placed[0].position, Position::new(0, 0, 0));
    assert_eq!(result.placed[0].dims, Dims::new(20, 15, 10));
    assert!(result.report.volume_utilization > 0.0);
}

#[test]
fn s2_oversize_box() {
    let mut packer = Packer::new(Variant::WeightAware, PackingOptions::for_variant(Variant::WeightAware));
    packer.set_pallet(pallet());
    packer.add_box(BoxItem::new("too-big", 130, 90, 170, 50.0).unwrap());
    let result = packer.pack().unwrap();

    assert!(result.placed.is_empty());
    assert_eq!(result.unplaced.len(), 1);
    assert_eq!(result.unplaced[0].reason, RejectionReason::NoValidOrientation);
}

#[test]
fn s3_two_equal_cubes_never_overlap() {
    let mut packer = Packer::new(Variant::Laff, PackingOptions::for_variant(Variant::Laff));
    packer.set_pallet(pallet());
    packer.add_box(BoxItem::new("c1", 30, 30, 30, 10.0).unwrap());
    packer.add_box(BoxItem::new("c2", 30, 30, 30, 10.0).unwrap());
    let result = packer.pack().unwrap();

    assert_eq!(result.placed.len(), 2);
    let a = &result.placed[0];
    let b = &result.placed[1];
    let x_disjoint = a.position.x + a.dims.dx <= b.position.x || b.position.x + b.dims.dx <= a.position.x;
    let y_disjoint = a.position.y + a.dims.dy <= b.position.y || b.position.y + b.dims.dy <= a.position.y;
    let z_disjoint = a.position.z + a.dims.dz <= b.position.z || b.position.z + b.dims.dz <= a.position.z;
    assert!(x_disjoint || y_disjoint || z_disjoint);
}

#[test]
fn s4_heavy_then_light_weight_aware_never_perches_heavy_on_light() {
    let mut packer = Packer::new(Variant::WeightAware, PackingOptions::for_variant(Variant::WeightAware));
    packer.set_pallet(pallet());
    packer.add_box(BoxItem::new("heavy", 30, 30, 30, 50.0).unwrap());
    packer.add_box(BoxItem::new("light", 30, 30, 30, 5.0).unwrap());
    let result = packer.pack().unwrap();

    assert_eq!(result.placed.len(), 2);
    let heavy = result.placed.iter().find(|p| p.item.id.0 == "heavy").unwrap();
    let light = result.placed.iter().find(|p| p.item.id.0 == "light").unwrap();

    let light_rests_on_heavy = light.position.z == heavy.position.z + heavy.dims.dz
        && light.position.x < heavy.position.x + heavy.dims.dx
        && heavy.position.x < light.position.x + light.dims.dx
        && light.position.y < heavy.position.y + heavy.dims.dy
        && heavy.position.y < light.position.y + light.dims.dy;
    assert!(!light_rests_on_heavy, "weight-aware must not perch the light box on the heavy one");
}

#[test]
fn s5_laff_tiles_floor_then_starts_a_new_layer_at_height() {
    let mut packer = Packer::new(Variant::Laff, PackingOptions::for_variant(Variant::Laff));
    packer.set_pallet(pallet());
    for i in 0..6 {
        packer.add_box(BoxItem::new(format!("b{i}"), 40, 30, 20, 5.0).unwrap());
    }
    let result = packer.pack().unwrap();

    assert_eq!(result.placed.len(), 6);
    let floor_count = result.placed.iter().filter(|p| p.position.z == 0).count();
    assert!(floor_count >= 4, "the floor level should hold the 40x30 tiling before stacking");

    let upper = result.placed.iter().find(|p| p.position.z > 0);
    if let Some(upper) = upper {
        assert_eq!(upper.position.z, 20);
    }
}

#[test]
fn s6_capacity_limited_weight_cap_holds() {
    let mut packer = Packer::new(Variant::WeightAware, PackingOptions::for_variant(Variant::WeightAware));
    packer.set_pallet(pallet());
    for i in 0..20 {
        packer.add_box(BoxItem::new(format!("b{i}"), 20, 20, 20, 60.0).unwrap());
    }
    let result = packer.pack().unwrap();

    let placed_weight: f64 = result.placed.iter().map(|p| p.item.weight).sum();
    assert!(placed_weight <= 1000.0);
    assert!(result.unplaced.len() >= 4);
}

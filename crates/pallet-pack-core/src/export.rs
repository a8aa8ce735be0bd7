//! Converts a [`crate::packer::PackResult`] into the result shape an
//! HTTP front end would serve (`summary`, `packed_items`,
//! `unpacked_items`). REST endpoints and CSV/workbook file export are out
//! of scope; this module only produces the JSON value the CLI prints.

use serde_json::{json, Value};

use crate::packer::PackResult;

/// Builds `{ summary, packed_items, unpacked_items }`.
pub fn to_result_json(result: &PackResult) -> Value {
    let total_items = result.placed.len() + result.unplaced.len();
    let total_weight: f64 = result
        .placed
        .iter()
        .map(|p| p.item.weight)
        .chain(result.unplaced.iter().map(|u| u.item.weight))
        .sum();
    let packed_weight: f64 = result.placed.iter().map(|p| p.item.weight).sum();

    let packed_items: Vec<Value> = result
        .placed
        .iter()
        .map(|p| {
            json!({
                "name": p.item.id.0,
                "position": { "x": p.position.x, "y": p.position.y, "z": p.position.z },
                "dimensions": { "width": p.dims.dx, "height": p.dims.dy, "depth": p.dims.dz },
                "weight": p.item.weight,
            })
        })
        .collect();

    let unpacked_items: Vec<Value> = result
        .unplaced
        .iter()
        .map(|u| {
            json!({
                "name": u.item.id.0,
                "dimensions": {
                    "width": u.item.length,
                    "height": u.item.width,
                    "depth": u.item.height,
                },
                "weight": u.item.weight,
                "reason": u.reason.to_string(),
                "note": u.note,
            })
        })
        .collect();

    json!({
        "summary": {
            "total_items": total_items,
            "packed_items": result.placed.len(),
            "unpacked_items": result.unplaced.len(),
            "space_utilization": result.report.space_utilization * 100.0,
            "calculation_time": result.calculation_time,
            "total_weight": total_weight,
            "packed_weight": packed_weight,
        },
        "packed_items": packed_items,
        "unpacked_items": unpacked_items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PackingOptions, Variant};
    use crate::model::{BoxItem, Pallet};
    use crate::packer::Packer;

    #[test]
    fn result_json_matches_spec_shape() {
        let mut packer = Packer::new(Variant::WeightAware, PackingOptions::for_variant(Variant::WeightAware));
        packer.set_pallet(Pallet::new(120, 80, 160, 1000.0).unwrap());
        packer.add_box(BoxItem::new("B", 20, 15, 10, 2.0).unwrap());
        let result = packer.pack().unwrap();

        let value = to_result_json(&result);
        assert_eq!(value["summary"]["total_items"], 1);
        assert_eq!(value["summary"]["packed_items"], 1);
        assert_eq!(value["packed_items"][0]["name"], "B");
        assert_eq!(value["packed_items"][0]["position"]["x"], 0);
    }
}

//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use pricesim_core::dataset::ProductRecord;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

pub const CATEGORIES: [&str; 3] = ["Hair Care", "Oral Care", "Soap"];

/// Noiseless linear demand, built in integer arithmetic so the targets are
/// exact:
///   units = 10000 - 20·price + 300·loyalty + 10·share - 50·elasticity
///           + 200·[Oral Care] - 100·[Soap]
pub fn synthetic_records(n: usize, seed: u64) -> Vec<ProductRecord> {
    let mut rng = Pcg64Mcg::seed_from_u64(seed);
    (0..n)
        .map(|i| {
            let price: i64 = rng.gen_range(20..=400);
            let loyalty_tenths: i64 = rng.gen_range(0..=10);
            let share: i64 = rng.gen_range(1..=40);
            let elasticity_tenths: i64 = rng.gen_range(1..=30);
            let cat = CATEGORIES[i % CATEGORIES.len()];
            let cat_effect = match cat {
                "Oral Care" => 200,
                "Soap" => -100,
                _ => 0,
            };
            let units = 10_000 - 20 * price + 30 * loyalty_tenths + 10 * share
                + 5 * elasticity_tenths
                + cat_effect;

            ProductRecord {
                name: format!("Product {i}"),
                category: cat.to_string(),
                base_price: price as f64,
                base_units_sold: units as u64,
                elasticity: -(elasticity_tenths as f64) / 10.0,
                brand_loyalty: loyalty_tenths as f64 / 10.0,
                market_share_pct: share as f64,
            }
        })
        .collect()
}

/// The worked-example product: base 100, 1000 units, loyalty 0.8,
/// elasticity -1.2, 20% share.
pub fn reference_product() -> ProductRecord {
    ProductRecord {
        name: "Reference Shampoo".into(),
        category: "Hair Care".into(),
        base_price: 100.0,
        base_units_sold: 1000,
        elasticity: -1.2,
        brand_loyalty: 0.8,
        market_share_pct: 20.0,
    }
}

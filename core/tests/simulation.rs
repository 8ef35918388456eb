//! Simulation orchestrator and context tests.

use pricesim_core::{
    config::SimConfig,
    dataset::ProductRecord,
    error::SimError,
    features::encode,
    report,
    simulation::{simulate, to_unit_count, SimContext},
};

mod common;

use common::{reference_product, synthetic_records};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn make_context() -> SimContext {
    let mut records = synthetic_records(90, 2024);
    records.push(reference_product());
    SimContext::build(records, SimConfig::default_test()).unwrap()
}

fn approx(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// Price 150 on the reference product: churn 29.33, share 14.13.
#[test]
fn reference_product_at_150() {
    let ctx = make_context();
    let r = ctx.simulate_by_name("Reference Shampoo", 150.0).unwrap();

    assert!(approx(r.competitor_price, 90.0, 1e-9));
    assert!(approx(r.churn_rate, 29.3333, 1e-3), "churn={}", r.churn_rate);
    assert!(approx(r.new_market_share_pct, 14.1333, 1e-3), "share={}", r.new_market_share_pct);
    assert!(approx(r.market_share_delta, r.new_market_share_pct - 20.0, 1e-12));
    assert_eq!(r.original_revenue, 100_000.0);
    assert_eq!(r.new_revenue, 150.0 * r.predicted_units as f64);
}

/// Price 50 is under the competitor: no churn, share unchanged.
#[test]
fn reference_product_at_50_keeps_share() {
    let ctx = make_context();
    let r = ctx.simulate_by_name("Reference Shampoo", 50.0).unwrap();

    assert_eq!(r.churn_rate, 0.0);
    assert_eq!(r.new_market_share_pct, 20.0);
    assert_eq!(r.market_share_delta, 0.0);
}

/// At the base price revenue only moves by the model's unit error.
#[test]
fn unchanged_price_revenue_tracks_unit_error() {
    let ctx = make_context();
    for product in ctx.products() {
        let r = ctx.simulate(product, product.base_price).unwrap();
        let expected = (r.predicted_units as f64 - product.base_units_sold as f64) * product.base_price;
        assert!(
            approx(r.revenue_change, expected, 1e-6 * product.base_revenue().max(1.0)),
            "{}: revenue_change={} expected={expected}",
            product.name, r.revenue_change
        );
        assert_eq!(r.units_delta, r.predicted_units as i64 - product.base_units_sold as i64);
    }
}

/// Churn only vanishes at the synthetic competitor price.
#[test]
fn pricing_at_competitor_price_has_zero_share_delta() {
    let ctx = make_context();
    let product = ctx.find_product("Reference Shampoo").unwrap();
    let r = ctx.simulate(product, product.base_price * 0.9).unwrap();

    assert_eq!(r.churn_rate, 0.0);
    assert_eq!(r.market_share_delta, 0.0);
}

#[test]
fn predicted_units_match_floored_model_output() {
    let ctx = make_context();
    let product = ctx.find_product("Product 0").unwrap().clone();

    for price in [20.0, 75.5, 150.0, 320.0, 400.0] {
        let fv = encode(&product, price, ctx.vocabulary()).unwrap();
        let raw = ctx.model().predict(&fv).unwrap();
        let r = ctx.simulate(&product, price).unwrap();
        assert_eq!(r.predicted_units, raw.floor().max(0.0) as u64, "price {price}");
    }
}

#[test]
fn negative_model_output_clamps_to_zero_units() {
    let ctx = make_context();
    let product = ctx.find_product("Product 1").unwrap();

    // Far outside the training range the linear model goes negative.
    let r = ctx.simulate(product, 5_000.0).unwrap();
    assert_eq!(r.predicted_units, 0);
    assert_eq!(r.new_revenue, 0.0);
    assert!(approx(r.revenue_pct_change, -100.0, 1e-9));
}

#[test]
fn unit_count_conversion() {
    assert_eq!(to_unit_count(12.99).unwrap(), 12);
    assert_eq!(to_unit_count(-3.5).unwrap(), 0);
    assert_eq!(to_unit_count(0.0).unwrap(), 0);
    assert!(matches!(
        to_unit_count(f64::NAN),
        Err(SimError::NonFinitePrediction { .. })
    ));
}

#[test]
fn churn_never_decreases_as_price_rises() {
    let ctx = make_context();
    let product = ctx.find_product("Reference Shampoo").unwrap();

    let mut prev = -1.0;
    for step in 0..=600 {
        let price = product.base_price + step as f64 * 0.5;
        let r = ctx.simulate(product, price).unwrap();
        assert!(r.churn_rate >= prev, "churn fell at price {price}");
        assert!(
            (0.0..=product.market_share_pct).contains(&r.new_market_share_pct),
            "share {} out of bounds at price {price}",
            r.new_market_share_pct
        );
        prev = r.churn_rate;
    }
}

#[test]
fn zero_original_revenue_surfaces_as_non_finite_pct() {
    let mut records = synthetic_records(40, 5);
    let mut dormant = reference_product();
    dormant.name = "Dormant".into();
    dormant.base_units_sold = 0;
    records.push(dormant);
    let ctx = SimContext::build(records, SimConfig::default_test()).unwrap();

    let r = ctx.simulate_by_name("Dormant", 100.0).unwrap();
    assert_eq!(r.original_revenue, 0.0);
    assert!(!r.revenue_pct_change.is_finite(), "got {}", r.revenue_pct_change);
}

#[test]
fn zero_base_price_is_an_error() {
    let ctx = make_context();
    let mut free = reference_product();
    free.base_price = 0.0;

    let err = ctx.simulate(&free, 50.0).unwrap_err();
    assert!(matches!(err, SimError::DivisionByZero { .. }), "got {err}");
}

#[test]
fn unknown_category_propagates() {
    let ctx = make_context();
    let mut stranger = reference_product();
    stranger.category = "Detergent".into();

    let err = simulate(&stranger, 100.0, ctx.model(), ctx.vocabulary(), ctx.config()).unwrap_err();
    assert!(matches!(err, SimError::UnknownCategory { .. }), "got {err}");
}

#[test]
fn unknown_product_name_is_not_found() {
    let ctx = make_context();
    assert!(matches!(
        ctx.simulate_by_name("Surf Excel", 100.0),
        Err(SimError::ProductNotFound { .. })
    ));
}

#[test]
fn simulation_does_not_mutate_context() {
    let ctx = make_context();
    let before: Vec<ProductRecord> = ctx.products().to_vec();
    let weights = ctx.model().weights().to_vec();

    for price in [20.0, 100.0, 400.0] {
        ctx.simulate_by_name("Reference Shampoo", price).unwrap();
    }

    assert_eq!(ctx.products(), before.as_slice());
    assert_eq!(ctx.model().weights(), weights.as_slice());
}

#[test]
fn repeated_simulations_are_identical() {
    let ctx = make_context();
    let a = ctx.simulate_by_name("Reference Shampoo", 137.5).unwrap();
    let b = ctx.simulate_by_name("Reference Shampoo", 137.5).unwrap();
    assert_eq!(a, b);
}

#[test]
fn context_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SimContext>();
}

// ── Report ───────────────────────────────────────────────────────────────────

#[test]
fn report_charts_derive_from_result() {
    let ctx = make_context();
    let r = ctx.simulate_by_name("Reference Shampoo", 150.0).unwrap();
    let rpt = report::build(r.clone(), &ctx.config().report);

    let rev: Vec<f64> = rpt.revenue_chart.points.iter().map(|p| p.value).collect();
    assert_eq!(rev, vec![r.original_revenue, r.new_revenue]);

    let share = &rpt.market_share_chart.points;
    assert_eq!(share[0].label, "HUL");
    assert_eq!(share[0].value, r.new_market_share_pct);
    assert!(approx(share[0].value + share[1].value, 100.0, 1e-9));

    assert_eq!(rpt.kpis.len(), 4);
    assert_eq!(rpt.kpis[2].value, format!("{:.2}%", r.churn_rate));

    let text = report::render_text(&rpt);
    assert!(text.contains("Churn Rate"));
    assert!(text.contains("REVENUE COMPARISON"));
}

#[test]
fn report_serializes_to_json() {
    let ctx = make_context();
    let r = ctx.simulate_by_name("Reference Shampoo", 120.0).unwrap();
    let rpt = report::build(r, &ctx.config().report);

    let json = serde_json::to_value(&rpt).unwrap();
    assert_eq!(json["result"]["product_name"], "Reference Shampoo");
    assert!(json["result"]["churn_rate"].as_f64().unwrap() > 0.0);
}

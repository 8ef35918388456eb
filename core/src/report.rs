//! Report building — KPI tiles and chart datasets derived from a
//! `SimulationResult`. Rendering to text lives here too so the runner
//! stays plumbing.

use crate::{
    config::ReportConfig,
    dataset::ProductRecord,
    simulation::SimulationResult,
};
use serde::Serialize;
use std::fmt::Write as _;

const BAR_WIDTH: usize = 40;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpi {
    pub label: String,
    pub value: String,
    pub delta: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub title:  String,
    pub points: Vec<ChartPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub result:             SimulationResult,
    pub kpis:               Vec<Kpi>,
    pub revenue_chart:      Chart,
    pub market_share_chart: Chart,
}

/// Original vs simulated revenue bars.
pub fn revenue_comparison(result: &SimulationResult) -> Chart {
    Chart {
        title: "Revenue Comparison".into(),
        points: vec![
            ChartPoint { label: "Original".into(),  value: result.original_revenue },
            ChartPoint { label: "Simulated".into(), value: result.new_revenue },
        ],
    }
}

/// Our post-churn share against everyone else.
pub fn market_share_split(result: &SimulationResult, config: &ReportConfig) -> Chart {
    Chart {
        title: "Updated Market Share".into(),
        points: vec![
            ChartPoint {
                label: config.company_label.clone(),
                value: result.new_market_share_pct,
            },
            ChartPoint {
                label: config.competitor_label.clone(),
                value: 100.0 - result.new_market_share_pct,
            },
        ],
    }
}

pub fn kpis(result: &SimulationResult, config: &ReportConfig) -> Vec<Kpi> {
    let cur = &config.currency_symbol;
    vec![
        Kpi {
            label: "Units Sold".into(),
            value: group_thousands(result.predicted_units as i64),
            delta: Some(group_thousands(result.units_delta)),
        },
        Kpi {
            label: "Revenue".into(),
            value: format!("{cur}{}", format_money(result.new_revenue)),
            delta: Some(format!("{:.2}%", result.revenue_pct_change)),
        },
        Kpi {
            label: "Churn Rate".into(),
            value: format!("{:.2}%", result.churn_rate),
            delta: None,
        },
        Kpi {
            label: "Market Share".into(),
            value: format!("{:.2}%", result.new_market_share_pct),
            delta: Some(format!("{:.2}%", result.market_share_delta)),
        },
    ]
}

pub fn build(result: SimulationResult, config: &ReportConfig) -> SimulationReport {
    SimulationReport {
        kpis: kpis(&result, config),
        revenue_chart: revenue_comparison(&result),
        market_share_chart: market_share_split(&result, config),
        result,
    }
}

/// Base-info block shown before a simulation.
pub fn render_product(product: &ProductRecord, config: &ReportConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Product:         {}", product.name);
    let _ = writeln!(out, "Category:        {}", product.category);
    let _ = writeln!(out, "Base Price:      {}{}", config.currency_symbol, product.base_price);
    let _ = writeln!(out, "Base Units Sold: {}", product.base_units_sold);
    let _ = writeln!(out, "Elasticity:      {}", product.elasticity);
    let _ = writeln!(out, "Brand Loyalty:   {}", product.brand_loyalty);
    let _ = writeln!(out, "Market Share:    {}%", product.market_share_pct);
    out
}

pub fn render_text(report: &SimulationReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== SIMULATION RESULTS ===");
    for kpi in &report.kpis {
        match &kpi.delta {
            Some(delta) => {
                let _ = writeln!(out, "  {:<14} {:>18}  ({delta})", kpi.label, kpi.value);
            }
            None => {
                let _ = writeln!(out, "  {:<14} {:>18}", kpi.label, kpi.value);
            }
        }
    }
    for chart in [&report.revenue_chart, &report.market_share_chart] {
        let _ = writeln!(out);
        out.push_str(&render_chart(chart));
    }
    out
}

/// Horizontal bars scaled to the largest point.
pub fn render_chart(chart: &Chart) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {} ===", chart.title.to_uppercase());

    let max = chart
        .points
        .iter()
        .map(|p| p.value)
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    let label_width = chart.points.iter().map(|p| p.label.len()).max().unwrap_or(0);
    let bar_width = BAR_WIDTH;

    for p in &chart.points {
        let len = if max > 0.0 && p.value.is_finite() {
            ((p.value.max(0.0) / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let _ = writeln!(
            out,
            "  {:<label_width$} | {:<bar_width$} {}",
            p.label,
            "#".repeat(len),
            format_money(p.value),
        );
    }
    out
}

/// `1234567` → `"1,234,567"`.
pub fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if n < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Two decimals with grouped thousands; non-finite values print as-is.
pub fn format_money(v: f64) -> String {
    if !v.is_finite() {
        return v.to_string();
    }
    let cents = (v.abs() * 100.0).round() as i64;
    let sign = if v < 0.0 && cents != 0 { "-" } else { "" };
    format!("{sign}{}.{:02}", group_thousands(cents / 100), cents % 100)
}

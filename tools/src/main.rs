//! price-sim: headless what-if pricing runner.
//!
//! Usage:
//!   price-sim --data products.csv --list
//!   price-sim --data products.csv --product "Dove Soap" --price 150 [--json]
//!   price-sim --data products.csv --ipc-mode
//!   (any of the above accept --config sim_config.json)

use anyhow::{Context, Result};
use pricesim_core::{
    config::SimConfig,
    report,
    simulation::SimContext,
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    ListProducts,
    Product {
        name: String,
    },
    Simulate {
        product: String,
        price: f64,
    },
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let data = arg_value(&args, "--data").unwrap_or("./fmcg_predictive_model_dataset.csv");
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let list = args.iter().any(|a| a == "--list");
    let json = args.iter().any(|a| a == "--json");

    let config = match arg_value(&args, "--config") {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };

    let ctx = SimContext::load(data, config)
        .with_context(|| format!("building simulation context from {data}"))?;

    if ipc_mode {
        return run_ipc_loop(&ctx);
    }

    if list {
        for name in ctx.product_names() {
            println!("{name}");
        }
        return Ok(());
    }

    let name = match arg_value(&args, "--product") {
        Some(n) => n,
        None => anyhow::bail!("--product <name> is required (use --list to see products)"),
    };
    let product = ctx.find_product(name)?;

    let price = match arg_value(&args, "--price") {
        Some(raw) => raw
            .parse::<f64>()
            .with_context(|| format!("--price '{raw}' is not a number"))?,
        None => (product.base_price * 100.0).round() / 100.0,
    };
    let range = &ctx.config().price_range;
    let price = range.snap(range.validate(price)?);

    let result = ctx.simulate(product, price)?;
    let rpt = report::build(result, &ctx.config().report);

    if json {
        println!("{}", serde_json::to_string_pretty(&rpt)?);
    } else {
        println!("{}", report::render_product(product, &ctx.config().report));
        println!("New Price:       {}{price:.2}", ctx.config().report.currency_symbol);
        println!();
        print!("{}", report::render_text(&rpt));
    }

    Ok(())
}

fn run_ipc_loop(ctx: &SimContext) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::ListProducts => {
                let names = ctx.product_names();
                writeln!(stdout, "{}", serde_json::json!({ "products": names }))?;
            }
            IpcCommand::Product { name } => match ctx.find_product(&name) {
                Ok(product) => writeln!(stdout, "{}", serde_json::to_string(product)?)?,
                Err(e) => write_error(&mut stdout, &e.to_string())?,
            },
            IpcCommand::Simulate { product, price } => {
                let range = &ctx.config().price_range;
                let outcome = range
                    .validate(price)
                    .and_then(|p| ctx.simulate_by_name(&product, range.snap(p)));
                match outcome {
                    Ok(result) => {
                        let rpt = report::build(result, &ctx.config().report);
                        writeln!(stdout, "{}", serde_json::to_string(&rpt)?)?;
                    }
                    Err(e) => {
                        log::warn!("ipc: simulate '{product}' @ {price} failed: {e}");
                        write_error(&mut stdout, &e.to_string())?;
                    }
                }
            }
        }
        stdout.flush()?;
    }
    Ok(())
}

fn write_error(out: &mut impl Write, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(out, "{}", err_json)?;
    out.flush()?;
    Ok(())
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

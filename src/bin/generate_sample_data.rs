//! Generate a synthetic rental-delay table with the same columns as the
//! production export, for local runs and demos.

use clap::Parser;
use delay_analysis::loader::write_csv;
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "generate_sample_data")]
struct Args {
    /// Number of rentals to generate
    #[arg(short, long, default_value_t = 2_000)]
    rows: usize,

    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    #[arg(short, long, default_value = "data/get_around_delay_analysis.csv")]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut rng = StdRng::seed_from_u64(args.seed);

    let mut rental_ids = Vec::with_capacity(args.rows);
    let mut car_ids = Vec::with_capacity(args.rows);
    let mut states = Vec::with_capacity(args.rows);
    let mut checkin_types = Vec::with_capacity(args.rows);
    let mut delays: Vec<Option<i64>> = Vec::with_capacity(args.rows);
    let mut gaps: Vec<Option<i64>> = Vec::with_capacity(args.rows);

    for i in 0..args.rows {
        rental_ids.push(500_000 + i as i64);
        car_ids.push(rng.gen_range(100_000..100_500i64));

        let checkin = if rng.gen_bool(0.2) { "connect" } else { "mobile" };
        let state = if rng.gen_bool(0.15) { "canceled" } else { "ended" };
        checkin_types.push(checkin);
        states.push(state);

        // Ended rentals usually carry a delay; some exports leave it blank
        let delay = if state == "ended" && rng.gen_bool(0.9) {
            let minutes = match rng.gen_range(0..10) {
                0..=3 => rng.gen_range(-300..=0),
                4..=6 => rng.gen_range(1..=60),
                7..=8 => rng.gen_range(61..=600),
                _ => rng.gen_range(601..=3000),
            };
            Some(minutes)
        } else {
            None
        };
        delays.push(delay);

        // Gaps come in 30 minute steps up to 12 hours
        let gap = if rng.gen_bool(0.1) {
            Some(30 * rng.gen_range(0..=24i64))
        } else {
            None
        };
        gaps.push(gap);
    }

    let mut df = df! [
        "rental_id" => rental_ids,
        "car_id" => car_ids,
        "checkin_type" => checkin_types,
        "state" => states,
        "delay_at_checkout_in_minutes" => delays,
        "time_delta_with_previous_rental_in_minutes" => gaps
    ]?;

    write_csv(&mut df, &args.out)?;
    println!("Created {} with {} rentals", args.out.display(), df.height());
    Ok(())
}

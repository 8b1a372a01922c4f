mod options;

use anyhow::Error as AnyErr;
use clap::Parser;
use lfmf::{GroundType, Level, Params};
use options::Cli;
use rayon::prelude::*;

// Field strength curves at 1 MHz, like the P.368 figures.
// ```
// cargo run --release --example curves -- --frequency=1 --range=1,10000,161
// ```
fn main() -> Result<(), AnyErr> {
    env_logger::init();
    let Cli {
        frequency,
        tx_height,
        rx_height,
        tx_power,
        refractivity,
        pol,
        output,
        range,
    } = Cli::parse();

    let distances_km = range.distances_km();
    let t0 = std::time::Instant::now();

    let curves = GroundType::ALL
        .par_iter()
        .map(|&ground| {
            let params = Params::builder()
                .tx_height(tx_height)
                .rx_height(rx_height)
                .freq(frequency)
                .tx_power(tx_power)
                .refractivity(refractivity)
                .distances(distances_km.as_slice())
                .ground_type(ground)
                .pol(pol.into())
                .build()?;
            lfmf::compute(&params, output.into())
        })
        .collect::<Result<Vec<Vec<Level>>, _>>()?;

    eprintln!("lfmf runtime: {:?}", t0.elapsed());
    eprintln!("d_test:       {} km", lfmf::transition_distance_km(frequency));

    print!("distance_km");
    for ground in GroundType::ALL {
        print!(",{ground:?}");
    }
    println!();
    for (i, distance_km) in distances_km.iter().enumerate() {
        print!("{distance_km}");
        for curve in &curves {
            print!(",{:.3}", curve[i].value_db);
        }
        println!();
    }

    for (ground, curve) in GroundType::ALL.iter().zip(&curves) {
        for level in curve.iter().filter(|level| !level.warnings.is_empty()) {
            eprintln!("{ground:?} @ {} km: {}", level.distance_km, level.warnings);
        }
    }

    Ok(())
}

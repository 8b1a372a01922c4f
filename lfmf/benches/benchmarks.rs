use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use lfmf::{GroundType, Params, Polarization};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

fn params(f_mhz: f64, distances_km: Vec<f64>) -> Params {
    Params::builder()
        .tx_height(15.0)
        .rx_height(3.0)
        .freq(f_mhz)
        .distances(distances_km)
        .ground_type(GroundType::MediumDryGround)
        .pol(Polarization::Vertical)
        .build()
        .unwrap()
}

fn ground_wave(c: &mut Criterion) {
    let mut group = c.benchmark_group("Ground Wave");

    for (name, distance_km) in [("flat earth", 10.0), ("residue series", 1000.0)] {
        group.bench_with_input(
            BenchmarkId::new(name, distance_km),
            &params(0.3, vec![distance_km]),
            |b, p| b.iter(|| lfmf::predict(p).unwrap()),
        );
    }

    let sweep: Vec<f64> = (0..=160).map(|i| 10f64.powf(f64::from(i) / 40.0)).collect();
    group.bench_with_input("sweep", &params(1.0, sweep), |b, p| {
        b.iter(|| lfmf::predict(p).unwrap())
    });
}

criterion_group!(benches, ground_wave);
criterion_main!(benches);

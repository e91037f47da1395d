// ─────────────────────────────────────────────────────────────────────
// SCPN BBN Core — Nucleosynthesis Benchmarks
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use bbn_core::driver::NucleosynthesisSolver;
use bbn_core::expansion::ExpansionModel;
use bbn_nuclear::species::Species;
use bbn_types::config::BbnConfig;
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn bench_expansion(c: &mut Criterion) {
    let model = ExpansionModel::new(&BbnConfig::default()).expect("default config is valid");
    c.bench_function("expansion_100_to_0.01", |b| {
        b.iter(|| {
            let traj = model.expansion(100.0, 0.01).expect("expansion should succeed");
            black_box(traj.time[traj.len() - 1]);
        })
    });
}

fn bench_network(c: &mut Criterion) {
    let mut group = c.benchmark_group("bbn");
    group.sample_size(10);

    group.bench_function("solver_setup", |b| {
        b.iter(|| {
            let solver = NucleosynthesisSolver::new(BbnConfig::default()).expect("setup");
            black_box(solver.history().range());
        })
    });

    let solver = NucleosynthesisSolver::new(BbnConfig::default()).expect("setup");
    group.bench_function("run_eta_5e-10", |b| {
        b.iter(|| {
            let run = solver
                .run(black_box(5e-10), &[Species::Helium4])
                .expect("run should succeed");
            black_box(run.final_mass_fraction(Species::Helium4));
        })
    });

    group.finish();
}

criterion_group!(benches, bench_expansion, bench_network);
criterion_main!(benches);

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use varspace_choice::{ChoiceRequest, SearchSpaceUpdates};
use varspace_core::DatasetProperties;
use varspace_scaling::{scaler_registry, ScalerChoice};
use varspace_space::OverrideRecord;

fn bench_compose(c: &mut Criterion) {
    let registry = Arc::new(scaler_registry().expect("builtin scalers"));
    let props = DatasetProperties::tabular(["n0", "n1", "n2"], ["c0"]);
    let request = ChoiceRequest::default();

    c.bench_function("compose_builtin_scalers", |b| {
        let mut choice = ScalerChoice::new(Arc::clone(&registry));
        b.iter(|| {
            let space = choice
                .search_space(black_box(&props), &request)
                .expect("compose");
            black_box(space);
        });
    });

    let updates = SearchSpaceUpdates::new()
        .with("RobustScaler.q_min", OverrideRecord::new([0.05, 0.2], 0.1))
        .expect("override")
        .with(
            "",
            OverrideRecord::new(["RobustScaler", "StandardScaler", "NoScaler"], "RobustScaler"),
        )
        .expect("override");
    c.bench_function("compose_with_overrides_and_sample", |b| {
        let mut choice = ScalerChoice::new(Arc::clone(&registry)).with_updates(updates.clone());
        b.iter(|| {
            let space = choice.search_space(&props, &request).expect("compose");
            black_box(space.sample_configurations(16, 4242));
        });
    });
}

criterion_group!(benches, bench_compose);
criterion_main!(benches);

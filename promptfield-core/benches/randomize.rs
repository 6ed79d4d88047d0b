use criterion::{criterion_group, criterion_main, Criterion};
use promptfield_core::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn fresh_bank(rng: &mut StdRng) -> PromptBank {
    let slots = (0..BANK_SIZE).map(|i| SlotTemplate::new(format!("slot {i}"), "#808080"));
    PromptBank::from_slots(slots, Activation::Fixed(&[0, 5, 9]), rng)
}

fn bench_randomize(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let mut bank = fresh_bank(&mut rng);

    c.bench_function("coherent_mix", |b| {
        b.iter(|| coherent_mix(&mut bank, &mut rng));
    });

    c.bench_function("apply_archetype/full-bloom", |b| {
        let a = find_archetype("full-bloom").unwrap();
        b.iter(|| apply_archetype(&mut bank, a, &mut rng));
    });
}

criterion_group!(benches, bench_randomize);
criterion_main!(benches);

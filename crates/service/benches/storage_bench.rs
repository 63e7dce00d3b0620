use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use models::InsertWastePickup;
use service::storage::MemStorage;
use service::WastePickupService;

fn pickup(i: usize) -> InsertWastePickup {
    InsertWastePickup {
        full_name: format!("Resident {i}"),
        location: "Nairobi".into(),
        waste_type: "Organic".into(),
        preferred_date: None,
    }
}

fn bench_mem_storage(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let svc = WastePickupService::new(Arc::new(MemStorage::new()));

    // pre-populate so listing sorts a realistic backlog
    for i in 0..1_000 {
        rt.block_on(svc.create(pickup(i))).unwrap();
    }

    c.bench_function("mem_create_waste_pickup", |b| {
        let mut i = 0usize;
        b.iter(|| {
            i += 1;
            rt.block_on(svc.create(pickup(i))).unwrap();
        });
    });

    let listing = WastePickupService::new(Arc::new(MemStorage::new()));
    for i in 0..1_000 {
        rt.block_on(listing.create(pickup(i))).unwrap();
    }
    c.bench_function("mem_list_1000_newest_first", |b| {
        b.iter(|| rt.block_on(listing.list()).unwrap());
    });
}

criterion_group!(benches, bench_mem_storage);
criterion_main!(benches);

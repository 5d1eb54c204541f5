//! Resolution hot path: cached versus store-only per-client lookups.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

use caas::adapters::cache::{MokaEntryCache, NoopEntryCache};
use caas::adapters::sqlite::{create_test_store, SqliteStore};
use caas::domain::models::{
    ClientDraft, ClientTypeDraft, ConfigAssignment, ConfigDraft, ProvisioningConfig,
};
use caas::domain::ports::EntryCache;
use caas::services::CaasServices;

const CLIENTS: usize = 20;
const KEYS: usize = 25;

/// A store with `CLIENTS` clients, each assigned all `KEYS` configs, every
/// other one overridden.
async fn seeded_services(cache: Arc<dyn EntryCache>) -> CaasServices<SqliteStore> {
    let store = Arc::new(create_test_store().await.unwrap());
    let services = CaasServices::new(store, cache, &ProvisioningConfig::default());
    let coordinator = &services.coordinator;

    coordinator.add_client_type(ClientTypeDraft::new("Register")).await.unwrap();

    let mut configs = Vec::with_capacity(KEYS);
    for k in 0..KEYS {
        configs.push(
            coordinator
                .add_config(ConfigDraft::new(format!("key-{k}"), format!("value-{k}")))
                .await
                .unwrap(),
        );
    }

    for c in 0..CLIENTS {
        let client = coordinator
            .add_client(ClientDraft::new(format!("pos-{c}"), "Register"))
            .await
            .unwrap();
        let assignments = configs
            .iter()
            .enumerate()
            .map(|(k, config)| ConfigAssignment {
                config_id: config.config_id,
                value: (k % 2 == 0).then(|| format!("override-{c}-{k}")),
            })
            .collect();
        coordinator
            .manage_associations_for_client(client.client_id, assignments)
            .await
            .unwrap();
    }

    services
}

async fn resolve_sweep(services: &CaasServices<SqliteStore>) -> usize {
    let mut found = 0;
    for c in 0..CLIENTS {
        let identifier = format!("pos-{c}");
        for k in 0..KEYS {
            let key = format!("key-{k}");
            if services
                .resolver
                .resolve_config_value(&identifier, "Register", &key)
                .await
                .unwrap()
                .is_some()
            {
                found += 1;
            }
        }
    }
    found
}

fn bench_resolve_config_value(c: &mut Criterion) {
    let runtime = Runtime::new().unwrap();

    let backends: Vec<(&str, Arc<dyn EntryCache>)> = vec![
        (
            "moka",
            Arc::new(MokaEntryCache::new(Duration::from_secs(600), 10_000)) as Arc<dyn EntryCache>,
        ),
        ("store_only", Arc::new(NoopEntryCache) as Arc<dyn EntryCache>),
    ];

    let mut group = c.benchmark_group("resolve_config_value");
    group.throughput(Throughput::Elements((CLIENTS * KEYS) as u64));

    for (name, cache) in backends {
        let services = runtime.block_on(seeded_services(cache));
        // Warm the cache so the moka run measures hits.
        runtime.block_on(resolve_sweep(&services));

        group.bench_with_input(BenchmarkId::from_parameter(name), &services, |b, services| {
            b.to_async(&runtime).iter(|| async { black_box(resolve_sweep(services).await) });
        });
    }

    group.finish();
}

fn bench_resolve_all_for_client(c: &mut Criterion) {
    let runtime = Runtime::new().unwrap();
    let services = runtime.block_on(seeded_services(Arc::new(MokaEntryCache::new(
        Duration::from_secs(600),
        10_000,
    ))));

    c.bench_function("resolve_all_for_client", |b| {
        b.to_async(&runtime).iter(|| async {
            black_box(
                services
                    .resolver
                    .resolve_all_for_client("pos-0", "Register")
                    .await
                    .unwrap(),
            )
        });
    });
}

criterion_group!(benches, bench_resolve_config_value, bench_resolve_all_for_client);
criterion_main!(benches);

use criterion::{criterion_group, criterion_main, Criterion};
use http::Method;
use std::hint::black_box;
use svcrouter::config::{parse_route_config, ConfigFormat};
use svcrouter::{Dispatcher, RouteRequest};

fn example_config() -> &'static str {
    r#"
aliases:
  zoo: animal-house
  feed:
    0: inventory
    method: doFeed
  staff:
    target: keeper
    methods:
      roster: doListShifts
routes:
  - pattern: '^/habitat/(\w+)/section/(\d+)$'
    target: habitat
    method: doSection
  - pattern: '^/(\d{4})/(\d{2})/(\d{2})$'
    target: calendar
    method: doDay
handlers:
  - name: AnimalHouseService
    methods:
      - name: doMain
      - name: doShow
        params: [{ name: id }, { name: view, default: summary }]
  - name: InventoryService
    methods:
      - name: doFeed
        params: [{ name: warehouse }, { name: item }, { name: qty, default: 1 }]
  - name: KeeperService
    methods:
      - name: doListShifts
        params: [{ name: week, default: current }]
  - name: HabitatService
    methods:
      - name: doSection
        params: [{ name: habitat }, { name: section }]
  - name: CalendarService
    methods:
      - name: doDay
        params: [{ name: year }, { name: month }, { name: day }]
  - name: VisitorCenterService
    protocol: rest
    methods:
      - name: get
        params: [{ name: id }]
      - name: post
"#
}

fn dispatcher() -> Dispatcher {
    let config = parse_route_config(example_config(), ConfigFormat::Yaml)
        .expect("failed to parse route config");
    Dispatcher::from_config(config).expect("failed to build dispatcher")
}

fn bench_resolve_throughput(c: &mut Criterion) {
    let dispatcher = dispatcher();
    let requests = [
        RouteRequest::get("/"),
        RouteRequest::get("/zoo/show/123"),
        RouteRequest::get("/feed/north/hay/20"),
        RouteRequest::get("/staff/roster"),
        RouteRequest::get("/habitat/savanna/section/5"),
        RouteRequest::get("/2024/05/17"),
        RouteRequest::new(Method::GET, "/visitor-center/9"),
        RouteRequest::new(Method::POST, "/visitor-center"),
        RouteRequest::get("/animal-house/show/7"),
    ];

    c.bench_function("resolve", |b| {
        b.iter(|| {
            for request in &requests {
                let target = dispatcher.resolve(request);
                black_box(&target);
            }
        })
    });
}

fn bench_resolve_miss(c: &mut Criterion) {
    let dispatcher = dispatcher();
    let requests = [
        RouteRequest::get("/nowhere/at/all"),
        RouteRequest::get("/zoo/no-such-method"),
        RouteRequest::new(Method::DELETE, "/visitor-center/1"),
    ];

    c.bench_function("resolve_miss", |b| {
        b.iter(|| {
            for request in &requests {
                let target = dispatcher.resolve(request);
                black_box(&target);
            }
        })
    });
}

fn bench_dispatch(c: &mut Criterion) {
    let dispatcher = dispatcher();
    let request = RouteRequest::get("/feed/north/hay");
    c.bench_function("dispatch", |b| {
        b.iter(|| black_box(dispatcher.dispatch(black_box(&request))))
    });
}

criterion_group!(
    benches,
    bench_resolve_throughput,
    bench_resolve_miss,
    bench_dispatch
);
criterion_main!(benches);

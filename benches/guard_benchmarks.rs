use criterion::{criterion_group, criterion_main, Criterion};
use fleetdesk::auth::{Role, Session, User};
use fleetdesk::routes::{decide, navigate, Route};
use std::hint::black_box;

fn bench_decide(c: &mut Criterion) {
    let driver = Session::authenticated(User::new("Ravi", Role::Driver));

    c.bench_function("guard_decide_render", |b| {
        b.iter(|| decide(black_box(&driver), black_box(Some(&[Role::Driver][..]))))
    });

    c.bench_function("guard_decide_wrong_role", |b| {
        b.iter(|| decide(black_box(&driver), black_box(Some(&[Role::Admin][..]))))
    });
}

fn bench_navigate(c: &mut Criterion) {
    let admin = Session::authenticated(User::new("Asha", Role::Admin));
    let paths: Vec<&str> = Route::all().iter().map(|r| r.path()).collect();

    c.bench_function("guard_navigate_all_routes", |b| {
        b.iter(|| {
            for path in &paths {
                black_box(navigate(&admin, path));
            }
        })
    });

    c.bench_function("guard_navigate_unknown", |b| {
        b.iter(|| navigate(&admin, black_box("/driver/unknown/")))
    });
}

fn bench_route_parse(c: &mut Criterion) {
    c.bench_function("route_parse", |b| {
        b.iter(|| Route::parse(black_box("/driver/complaints/")))
    });
}

criterion_group!(benches, bench_decide, bench_navigate, bench_route_parse);
criterion_main!(benches);

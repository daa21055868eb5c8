use balanced_trees::arena::{NodeArena, NodeId};
use criterion::{criterion_group, criterion_main, Criterion};

const CHUNK_SIZE: usize = 1024;
const NUM_OF_ALLOCATIONS: usize = 100;

struct Link {
    next: Option<NodeId>,
}

fn bench_arena_alloc(c: &mut Criterion) {
    c.bench_function("bench arena alloc", |b| {
        b.iter(|| {
            let mut arena = NodeArena::new(CHUNK_SIZE);
            let mut curr = arena.alloc(Link { next: None });
            for _ in 0..NUM_OF_ALLOCATIONS {
                curr = arena.alloc(Link { next: Some(curr) });
            }
            arena
        })
    });
}

fn bench_arena_recycle(c: &mut Criterion) {
    c.bench_function("bench arena recycle", |b| {
        b.iter(|| {
            let mut arena = NodeArena::new(CHUNK_SIZE);
            let mut curr = arena.alloc(Link { next: None });
            for _ in 0..NUM_OF_ALLOCATIONS {
                let next = arena.alloc(Link { next: Some(curr) });
                arena.release(next);
                curr = arena.alloc(Link { next: Some(curr) });
            }
            arena
        })
    });
}

fn bench_box(c: &mut Criterion) {
    c.bench_function("bench box", |b| {
        b.iter(|| {
            let mut curr = Box::new(BoxLink { next: None });
            for _ in 0..NUM_OF_ALLOCATIONS {
                curr = Box::new(BoxLink { next: Some(curr) });
            }
            curr
        })
    });
}

struct BoxLink {
    next: Option<Box<BoxLink>>,
}

criterion_group!(benches, bench_arena_alloc, bench_arena_recycle, bench_box);
criterion_main!(benches);

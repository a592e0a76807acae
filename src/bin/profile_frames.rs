//! Profiling tool comparing frame generation strategies

use std::time::{Duration, Instant};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use volatile_map::cache::ChunkCache;
use volatile_map::frame::Frame;
use volatile_map::viewport::{Direction, Viewport, DEFAULT_VIEW_HEIGHT, DEFAULT_VIEW_WIDTH};

const FRAMES: usize = 200;

fn main() {
    let seed = 1337u64;
    let world_seed = 0u64;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    println!("=== Frame Profiling ===");
    println!(
        "Window: {}x{}, {} frames per strategy",
        DEFAULT_VIEW_WIDTH, DEFAULT_VIEW_HEIGHT, FRAMES
    );
    println!();

    // Random jumps around the world
    let jumps: Vec<Viewport> = (0..FRAMES)
        .map(|_| Viewport::new(rng.gen(), rng.gen(), DEFAULT_VIEW_WIDTH, DEFAULT_VIEW_HEIGHT))
        .collect();

    // A walk, which is where the cache pays off
    let mut walk = Vec::with_capacity(FRAMES);
    let mut view = Viewport::new(rng.gen_range(0..1_000_000), rng.gen_range(0..1_000_000), DEFAULT_VIEW_WIDTH, DEFAULT_VIEW_HEIGHT);
    for _ in 0..FRAMES {
        let dir = Direction::all()[rng.gen_range(0..8)];
        view.step(dir);
        walk.push(view);
    }

    for (name, views) in [("Random jumps", &jumps), ("Walk", &walk)] {
        println!("{}:", name);

        let start = Instant::now();
        for v in views.iter() {
            Frame::generate(*v, world_seed);
        }
        let sequential = start.elapsed();

        let start = Instant::now();
        for v in views.iter() {
            Frame::generate_par(*v, world_seed);
        }
        let parallel = start.elapsed();

        let mut cache = ChunkCache::new(world_seed);
        let start = Instant::now();
        for v in views.iter() {
            Frame::from_cache(*v, &mut cache);
        }
        let cached = start.elapsed();
        let stats = cache.stats();

        println!("  Sequential: {:>10?} ({:?}/frame)", sequential, per_frame(sequential));
        println!("  Parallel:   {:>10?} ({:?}/frame)", parallel, per_frame(parallel));
        println!("  Cached:     {:>10?} ({:?}/frame)", cached, per_frame(cached));
        println!(
            "  Cache: {} hits, {} misses ({:.1}% hit rate)",
            stats.hits,
            stats.misses,
            100.0 * stats.hit_rate()
        );
        println!();
    }
}

fn per_frame(total: Duration) -> Duration {
    total / FRAMES as u32
}

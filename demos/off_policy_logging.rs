//! Off-policy logging end to end.
//!
//! Log decisions from an exploring softmax policy, then use the recorded propensities
//! to estimate, offline, how well two *other* policies would have done (inverse
//! propensity scoring). The estimates land near the true values without ever
//! deploying those policies.
//!
//! Run with:
//!   RUST_LOG=explore=debug cargo run --example off_policy_logging

use explore::{Dispatcher, MemoryRecorder, Prg, Softmax, StringRecorder, TauFirst};
use rand::Rng;
use tracing_subscriber::{fmt, EnvFilter};

const ARTICLES: u32 = 4;

/// True click-through rate of `article` for a user segment.
fn ctr(segment: u32, article: u32) -> f64 {
    match (segment % 2, article) {
        (0, 1) => 0.30,
        (0, _) => 0.05,
        (_, 3) => 0.25,
        _ => 0.10,
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "explore=info".into());
    fmt().with_env_filter(filter).init();

    // -----------------------------------------------------------------
    // 1. Log with an exploring policy.
    // -----------------------------------------------------------------
    let scorer = |segment: &u32| -> Vec<f32> {
        // A mediocre production model: likes article 2 for everyone.
        let mut s = vec![0.0f32; ARTICLES as usize];
        s[1] = 1.0;
        s[(*segment % 2) as usize * 2] += 0.5;
        s
    };
    let logging_policy = Softmax::new(scorer, 1.5, ARTICLES).unwrap();
    let dispatcher = Dispatcher::new("news-demo", MemoryRecorder::<u32, u32>::new());

    // Simulated user feedback; Prg implements `rand::RngCore`.
    let mut world = Prg::new(7);
    let mut rewards = Vec::new();
    for i in 0..20_000u32 {
        let segment = i % 5;
        let key = format!("impression-{i}");
        let article = dispatcher
            .choose_action(&key, &segment, &logging_policy)
            .unwrap();
        let clicked = world.random_bool(ctr(segment, article));
        rewards.push(if clicked { 1.0 } else { 0.0 });
    }
    let log = dispatcher.recorder().drain();
    println!("logged {} impressions", log.len());

    // -----------------------------------------------------------------
    // 2. Evaluate candidate policies offline.
    // -----------------------------------------------------------------
    let candidates: [(&str, fn(u32) -> u32); 2] = [
        ("always-article-1", |_| 1),
        ("segment-aware", |seg| if seg % 2 == 0 { 1 } else { 3 }),
    ];
    for (name, target) in candidates {
        let ips: f64 = log
            .iter()
            .zip(&rewards)
            .filter(|(it, _)| target(it.context) == it.action)
            .map(|(it, r)| r / f64::from(it.probability))
            .sum::<f64>()
            / log.len() as f64;
        let truth: f64 = log
            .iter()
            .map(|it| ctr(it.context, target(it.context)))
            .sum::<f64>()
            / log.len() as f64;
        println!("{name:>18}: IPS estimate {ips:.3}  (true {truth:.3})");
    }

    // -----------------------------------------------------------------
    // 3. A bounded exploration phase, logged as text.
    // -----------------------------------------------------------------
    let warmup = TauFirst::new(|_: &String| 2u32, 3, ARTICLES).unwrap();
    let text = Dispatcher::new("news-demo", StringRecorder::new());
    for i in 0..6 {
        let ctx = format!("user={i}");
        text.choose_action(&format!("warmup-{i}"), &ctx, &warmup).unwrap();
    }
    print!("{}", text.recorder().contents());
}

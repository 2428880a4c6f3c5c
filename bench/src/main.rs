use std::time::Instant;

use clap::{Parser, ValueEnum};
use serde::Serialize;
use social_graph_core::{bfs, degree_centrality, top_k, SocialGraph};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Run every generator (default)
    All,
    /// Preferential attachment: a few users collect most followers
    Scalefree,
    /// Watts-Strogatz ring lattice + rewired shortcuts
    Smallworld,
    /// Erdos-Renyi uniform random follows
    Random,
    /// A handful of hubs followed by everyone, hubs follow nobody
    Celebrity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

/// Synthetic social graph benchmarks for centrality, top-k and BFS.
#[derive(Debug, Parser)]
#[command(name = "social-graph-bench", version)]
struct Args {
    #[arg(value_enum, default_value = "all", env = "SOCIAL_BENCH_MODE")]
    mode: Mode,

    /// Number of users per generated graph
    #[arg(
        default_value_t = 100_000,
        env = "SOCIAL_BENCH_USERS",
        value_parser = clap::value_parser!(u64).range(2..=MAX_USERS)
    )]
    users: u64,

    /// How many top influencers to report
    #[arg(short = 'k', long, default_value_t = 10, env = "SOCIAL_BENCH_TOP_K")]
    top_k: usize,

    /// BFS start user
    #[arg(long, default_value = "u0", env = "SOCIAL_BENCH_START")]
    start: String,

    /// Base seed; each generator offsets it
    #[arg(long, default_value_t = 42, env = "SOCIAL_BENCH_SEED")]
    seed: u64,

    #[arg(long, value_enum, default_value = "text", env = "SOCIAL_BENCH_LOG_FORMAT")]
    log_format: LogFormat,

    /// Print the report as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct Report {
    generator: &'static str,
    users: usize,
    connections: usize,
    build_ms: f64,
    centrality_ms: f64,
    top_k_ms: f64,
    top: Vec<(String, usize)>,
    bfs_start: String,
    bfs_reachable: usize,
    bfs_ms: f64,
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

type Generator = fn(u64, u64) -> SocialGraph;

/// Upper bound on `users`; keeps capacity math and id ranges in bounds.
const MAX_USERS: u64 = 50_000_000;

fn generators(mode: Mode) -> Vec<(&'static str, Generator)> {
    match mode {
        Mode::Scalefree => vec![("Scale-free (preferential attachment)", gen_scale_free)],
        Mode::Smallworld => vec![("Small-world (Watts-Strogatz)", gen_small_world)],
        Mode::Random => vec![("Erdos-Renyi random", gen_random)],
        Mode::Celebrity => vec![("Celebrity hubs", gen_celebrity)],
        Mode::All => vec![
            ("Scale-free (preferential attachment)", gen_scale_free as Generator),
            ("Small-world (Watts-Strogatz)", gen_small_world),
            ("Erdos-Renyi random", gen_random),
            ("Celebrity hubs", gen_celebrity),
        ],
    }
}

/// Per-generator seed. Wraps so any `--seed` is valid.
fn generator_seed(base: u64, offset: usize) -> u64 {
    base.wrapping_add(offset as u64)
}

fn main() {
    let args = Args::parse();
    init_tracing(args.log_format);

    let generators = generators(args.mode);

    info!(users = args.users, top_k = args.top_k, "social-graph-bench starting");

    let mut reports = Vec::with_capacity(generators.len());
    for (offset, (name, generator)) in generators.into_iter().enumerate() {
        let report = run_benchmark(name, generator, &args, generator_seed(args.seed, offset));
        if !args.json {
            print_report(&report, args.top_k);
        }
        reports.push(report);
    }

    if args.json {
        match serde_json::to_string_pretty(&reports) {
            Ok(json) => println!("{}", json),
            Err(e) => warn!(error = %e, "failed to serialize report"),
        }
    }
}

fn run_benchmark(
    name: &'static str,
    generator: Generator,
    args: &Args,
    seed: u64,
) -> Report {
    info!(generator = name, "generating graph");

    let t = Instant::now();
    let graph = generator(args.users.clamp(2, MAX_USERS), seed);
    let build_ms = ms(t);

    let t = Instant::now();
    let centrality = degree_centrality(&graph);
    let centrality_ms = ms(t);

    let t = Instant::now();
    let top = top_k(&centrality, args.top_k);
    let top_k_ms = ms(t);

    let t = Instant::now();
    let bfs_reachable = bfs(&graph, &args.start).map_or(0, |r| r.len());
    let bfs_ms = ms(t);

    Report {
        generator: name,
        users: graph.user_count(),
        connections: graph.connection_count(),
        build_ms,
        centrality_ms,
        top_k_ms,
        top,
        bfs_start: args.start.clone(),
        bfs_reachable,
        bfs_ms,
    }
}

fn ms(t: Instant) -> f64 {
    t.elapsed().as_secs_f64() * 1000.0
}

fn print_report(report: &Report, k: usize) {
    println!("--- {} ---", report.generator);
    println!(
        "Generated in {:.1}ms: {} users, {} connections",
        report.build_ms, report.users, report.connections
    );
    println!("Degree centrality: {:.1}ms", report.centrality_ms);
    println!();
    println!("Top {} influencers ({:.2}ms):", k, report.top_k_ms);
    println!("{:>6} {:>12} {:>10}", "rank", "user", "degree");
    println!("{:->6} {:->12} {:->10}", "", "", "");
    for (rank, (user, degree)) in report.top.iter().enumerate() {
        println!("{:>6} {:>12} {:>10}", rank + 1, user, degree);
    }
    println!();
    println!(
        "Reachable from {}: {} users in {:.1}ms",
        report.bfs_start, report.bfs_reachable, report.bfs_ms
    );
    println!();
}

// ---------------------------------------------------------------------------
// Generators: all O(users + connections), single-threaded, deterministic
// ---------------------------------------------------------------------------

/// Simple LCG for deterministic, fast pseudo-random numbers.
struct FastRng(u64);

impl FastRng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next(&mut self, max: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 33) % max
    }
    fn next_f64(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
}

const CITIES: [&str; 5] = ["Lisbon", "Osaka", "Lagos", "Quito", "Tallinn"];

fn user(i: u64) -> String {
    format!("u{}", i)
}

/// Add `user_count` users named `u0..`, each with a small profile.
fn seed_users(user_count: u64, rng: &mut FastRng) -> SocialGraph {
    let mut graph = SocialGraph::with_capacity(user_count as usize);
    for i in 0..user_count {
        let id = user(i);
        graph.add_user(id.as_str());
        let city = CITIES[rng.next(CITIES.len() as u64) as usize];
        if let Err(e) = graph.merge_profile(&id, [("city", city)]) {
            warn!(error = %e, "profile seed failed");
        }
    }
    graph
}

fn connect(graph: &mut SocialGraph, from: u64, to: u64) {
    if let Err(e) = graph.add_connection(&user(from), &user(to)) {
        warn!(error = %e, "generator produced an invalid connection");
    }
}

/// Scale-free via edge-list sampling (O(edges), not O(n²)).
///
/// Each new user follows users picked from the endpoint list, so users
/// with many connections are more likely to be followed again.
fn gen_scale_free(user_count: u64, seed: u64) -> SocialGraph {
    let follows_per_user = 10u64;
    let mut rng = FastRng::new(seed);
    let mut graph = seed_users(user_count, &mut rng);

    let mut endpoints: Vec<u64> = Vec::with_capacity(user_count.saturating_mul(follows_per_user * 2) as usize);

    let clique = 5u64.min(user_count);
    for i in 0..clique {
        for j in 0..clique {
            if i != j {
                connect(&mut graph, i, j);
                endpoints.push(i);
                endpoints.push(j);
            }
        }
    }

    for new_user in clique..user_count {
        for _ in 0..follows_per_user.min(new_user) {
            let target = endpoints[rng.next(endpoints.len() as u64) as usize];
            if target != new_user {
                connect(&mut graph, new_user, target);
                endpoints.push(new_user);
                endpoints.push(target);
            }
        }
    }

    graph
}

/// Small-world (Watts-Strogatz): ring lattice + random rewiring.
fn gen_small_world(user_count: u64, seed: u64) -> SocialGraph {
    let k = 5u64.min(user_count - 1);
    let p = 0.05f64;
    let mut rng = FastRng::new(seed);
    let mut graph = seed_users(user_count, &mut rng);

    for i in 0..user_count {
        for j in 1..=k {
            let neighbor = (i + j) % user_count;
            let target = if rng.next_f64() < p {
                rng.next(user_count)
            } else {
                neighbor
            };
            connect(&mut graph, i, if target == i { neighbor } else { target });
        }
    }

    graph
}

/// Erdos-Renyi: ~10 uniformly random follows per user.
fn gen_random(user_count: u64, seed: u64) -> SocialGraph {
    let mut rng = FastRng::new(seed);
    let mut graph = seed_users(user_count, &mut rng);

    for _ in 0..user_count.saturating_mul(10) {
        let from = rng.next(user_count);
        let to = rng.next(user_count);
        if from != to {
            connect(&mut graph, from, to);
        }
    }

    graph
}

/// Celebrity: the first few users are hubs. Every other user follows one
/// or two hubs and occasionally a random peer. Hubs follow nobody, so
/// centrality ranks the fans and BFS from a hub reaches only itself.
fn gen_celebrity(user_count: u64, seed: u64) -> SocialGraph {
    let hubs = 10u64.min(user_count);
    let mut rng = FastRng::new(seed);
    let mut graph = seed_users(user_count, &mut rng);

    for fan in hubs..user_count {
        connect(&mut graph, fan, rng.next(hubs));
        if rng.next(2) == 0 {
            connect(&mut graph, fan, rng.next(hubs));
        }
        if rng.next(10) == 0 {
            let peer = hubs + rng.next(user_count - hubs);
            if peer != fan {
                connect(&mut graph, fan, peer);
            }
        }
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generators_are_deterministic() {
        for generator in [gen_scale_free, gen_small_world, gen_random, gen_celebrity] {
            let a = generator(200, 7);
            let b = generator(200, 7);
            assert_eq!(a.user_count(), 200);
            assert_eq!(a.to_string(), b.to_string());
        }
    }

    #[test]
    fn test_celebrity_hubs_are_sinks() {
        let g = gen_celebrity(100, 1);
        for hub in 0..10 {
            assert_eq!(g.out_degree(&user(hub)), 0);
        }
        assert_eq!(bfs(&g, "u0").unwrap().len(), 1);
    }

    #[test]
    fn test_every_user_has_a_city() {
        let g = gen_random(50, 3);
        assert!(g.users().all(|u| g.get_profile(u).is_some_and(|p| p.contains_key("city"))));
    }

    #[test]
    fn test_max_seed_runs_every_generator() {
        let args = Args::parse_from([
            "social-graph-bench",
            "all",
            "20",
            "--seed",
            "18446744073709551615",
        ]);
        assert_eq!(args.seed, u64::MAX);

        let reports: Vec<Report> = generators(args.mode)
            .into_iter()
            .enumerate()
            .map(|(offset, (name, generator))| {
                run_benchmark(name, generator, &args, generator_seed(args.seed, offset))
            })
            .collect();

        assert_eq!(reports.len(), 4);
        assert!(reports.iter().all(|r| r.users == 20));
        assert_eq!(generator_seed(u64::MAX, 1), 0);
    }

    #[test]
    fn test_users_out_of_range_is_rejected() {
        let huge = u64::MAX.to_string();
        let result = Args::try_parse_from(["social-graph-bench", "random", huge.as_str()]);
        assert!(result.is_err());
        assert!(Args::try_parse_from(["social-graph-bench", "random", "1"]).is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from(["social-graph-bench", "celebrity", "500", "-k", "3", "--json"]);
        assert_eq!(args.mode, Mode::Celebrity);
        assert_eq!(args.users, 500);
        assert_eq!(args.top_k, 3);
        assert!(args.json);
        assert_eq!(args.start, "u0");
    }
}

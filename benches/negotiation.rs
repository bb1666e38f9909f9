//! Capability negotiation benchmark suite.
//!
//! Benchmarks New Session processing at different `firstMatch` sizes:
//! - Candidate counts: 1, 8, 64
//! - Plain and proxy-heavy candidates
//!
//! Run with: cargo bench --bench negotiation
//! Results saved to: target/criterion/

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use firefox_capabilities::{HostInfo, Negotiator, process_capabilities};
use serde_json::{Value, json};

// ============================================================================
// Benchmark Parameters
// ============================================================================

const CANDIDATE_COUNTS: &[usize] = &[1, 8, 64];

// ============================================================================
// Payloads
// ============================================================================

fn host() -> HostInfo {
    HostInfo::new("Firefox", "128.0").with_os("Linux", "6.1")
}

fn plain_params(candidates: usize) -> Value {
    let first_match: Vec<Value> = (0..candidates)
        .map(|i| {
            json!({
                "browserName": "firefox",
                "pageLoadStrategy": if i % 2 == 0 { "eager" } else { "normal" },
                "vendor:index": i,
            })
        })
        .collect();

    json!({ "capabilities": {
        "alwaysMatch": { "acceptInsecureCerts": true, "timeouts": { "implicit": 250 } },
        "firstMatch": first_match,
    }})
}

fn proxy_params(candidates: usize) -> Value {
    let first_match: Vec<Value> = (0..candidates)
        .map(|i| {
            json!({
                "proxy": {
                    "proxyType": "manual",
                    "httpProxy": format!("proxy{i}.example:3128"),
                    "sslProxy": format!("[2001:db8::{i:x}]:443"),
                    "socksProxy": "socks.example:1080",
                    "socksVersion": 5,
                    "noProxy": ["localhost", "[::1]"],
                },
            })
        })
        .collect();

    json!({ "capabilities": { "firstMatch": first_match } })
}

// ============================================================================
// Benchmark: Process Capabilities
// ============================================================================

fn bench_process(c: &mut Criterion) {
    let host = host();
    let mut group = c.benchmark_group("process_capabilities");

    for &count in CANDIDATE_COUNTS {
        let plain = plain_params(count);
        group.bench_with_input(BenchmarkId::new("plain", count), &plain, |b, params| {
            b.iter(|| process_capabilities(black_box(params), &host));
        });

        let proxy = proxy_params(count);
        group.bench_with_input(BenchmarkId::new("proxy", count), &proxy, |b, params| {
            b.iter(|| process_capabilities(black_box(params), &host));
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Session Capabilities
// ============================================================================

fn bench_new_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("new_session_capabilities");

    for bidi in [false, true] {
        let Ok(negotiator) = Negotiator::builder().host(host()).bidi(bidi).build() else {
            return;
        };
        let params = plain_params(1);
        let label = if bidi { "bidi" } else { "classic" };

        group.bench_with_input(BenchmarkId::new(label, 1), &params, |b, params| {
            b.iter(|| negotiator.new_session_capabilities(black_box(params)));
        });
    }

    group.finish();
}

// ============================================================================
// Criterion Setup
// ============================================================================

criterion_group!(benches, bench_process, bench_new_session);
criterion_main!(benches);

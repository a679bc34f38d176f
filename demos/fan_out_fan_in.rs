use fanout_stream::{distribute, map_worker, source_stream, CancellationToken};
use std::time::{Duration, Instant};

/// Deliberately slow recursive Fibonacci, to give the workers real CPU work
fn slow_fibonacci(n: u64) -> u64 {
    if n <= 1 {
        return n;
    }
    slow_fibonacci(n - 1) + slow_fibonacci(n - 2)
}

struct Fib {
    n: u64,
    result: u64,
}

#[tokio::main]
async fn main() {
    println!("🚀 Fan-out / fan-in example");
    println!("===========================");

    // Every stage stops once the 2 second deadline elapses
    let token = CancellationToken::with_timeout(Duration::from_secs(2));
    let _guard = token.clone().drop_guard();

    let input = source_stream(token.clone(), vec![40u64, 41, 42, 43, 44]);
    let started = Instant::now();

    let worker = map_worker(|n: u64| Fib {
        n,
        result: slow_fibonacci(n),
    });

    let output = match distribute(token.clone(), input, worker, 2) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("❌ {}", e);
            return;
        }
    };

    let mut received = 0;
    while let Some(fib) = output.recv().await {
        println!("   {{n:{} result:{}}}", fib.n, fib.result);
        received += 1;
    }

    println!("\n   ⏱️  Elapsed: {:?}", started.elapsed());
    println!(
        "   📊 Received {} of 5 results (deadline hit: {})",
        received,
        token.is_cancelled()
    );
}

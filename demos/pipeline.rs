use fanout_stream::pipe::{delay, filter, for_each, map, pipeline};
use fanout_stream::{source_stream, CancellationToken};
use std::time::Duration;

fn is_odd(n: &i64) -> bool {
    n % 2 == 1
}

#[tokio::main]
async fn main() {
    println!("1️⃣ Pipeline without a deadline");
    let token = CancellationToken::new();
    let piped = pipeline(
        token.clone(),
        source_stream(token.clone(), vec![1i64, 2, 3, 4, 5]),
        vec![filter(is_odd), map(|n: i64| n * 3), map(|n: i64| n + 1)],
    );
    for_each(&token, piped, |v| println!("   {}", v)).await;
    // Output: 4, 10, 16

    println!("\n2️⃣ Delayed pipeline with a 200ms deadline");
    let token = CancellationToken::with_timeout(Duration::from_millis(200));
    let piped = pipeline(
        token.clone(),
        source_stream(token.clone(), vec![1i64, 2, 3, 4, 5]),
        vec![
            delay(Duration::from_millis(50)),
            filter(is_odd),
            map(|n: i64| n * 3),
            map(|n: i64| n + 1),
        ],
    );
    let seen = for_each(&token, piped, |v| println!("   {}", v)).await;
    println!("   {} values before the deadline", seen);
}

use fanout_stream::generator::fibonacci;
use fanout_stream::{CancellationToken, StreamConfig};
use std::time::Duration;

#[tokio::main]
async fn main() {
    println!("1️⃣ Fibonacci stream with explicit cancel");
    let token = CancellationToken::new();
    let stream = fibonacci(token.clone(), &StreamConfig::default());
    for i in 0..10 {
        if i == 5 {
            token.cancel();
        }
        match stream.recv_or_cancel(&token).await {
            Some(v) => println!("   fib({}) = {}", i, v),
            None => {
                println!("   stream closed");
                break;
            }
        }
    }

    println!("\n2️⃣ Fibonacci stream with a timeout");
    let token = CancellationToken::with_timeout(Duration::from_micros(100));
    let stream = fibonacci(token.clone(), &StreamConfig::default());
    let mut i = 0;
    while let Some(v) = stream.recv_or_cancel(&token).await {
        println!("   fib({}) = {}", i, v);
        i += 1;
    }
    println!("   stream closed after {} values", i);

    println!("\n3️⃣ Buffered Fibonacci stream with explicit cancel");
    let token = CancellationToken::new();
    let stream = fibonacci(token.clone(), &StreamConfig::new().buffer_size(5));
    for i in 0..20 {
        if i == 10 {
            token.cancel();
        }
        // Values already buffered are still delivered after cancellation
        match stream.recv().await {
            Some(v) => println!("   fib({}) = {}", i, v),
            None => {
                println!("   stream closed");
                break;
            }
        }
    }
}

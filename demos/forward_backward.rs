use std::time::Instant;

use cascade_net::{CascadeBuilder, CascadeNetwork, Normalization};

fn parse_u64(args: &[String], key: &str, default: u64) -> u64 {
    let mut i = 0;
    while i + 1 < args.len() {
        if args[i] == key {
            return args[i + 1]
                .parse::<u64>()
                .unwrap_or_else(|_| panic!("failed to parse {key} as u64"));
        }
        i += 1;
    }
    default
}

fn main() -> cascade_net::Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let seed = parse_u64(&args, "--seed", 0);
    let iters = parse_u64(&args, "--iters", 100_000);

    let net: CascadeNetwork<2, 1, 3, 5> = CascadeBuilder::new()
        .normalization(Normalization::Stable)
        .build_with_seed(seed)?;
    let mut buf = net.scratch();

    println!("weights: {net}");

    buf.load_input(&[0.5, -0.5])?;
    net.forward(&mut buf);
    println!("after forward: {buf}");

    net.normalize_outputs(&mut buf);
    println!("normalized outputs: {:?}", buf.output());

    let error = net.backward(&mut buf, &[1.0, 0.0, 0.5]);
    println!("after backward: {buf}");
    println!("total absolute error: {error}");

    let start = Instant::now();
    let mut checksum = 0.0_f32;
    for _ in 0..iters {
        buf.reset();
        buf.load_input(&[0.5, -0.5])?;
        checksum += net.forward(&mut buf)[0];
    }
    let elapsed_s = start.elapsed().as_secs_f64();
    std::hint::black_box(checksum);
    println!(
        "cascade forward iters={iters} elapsed_s={elapsed_s:.6} iters_per_s={:.2}",
        iters as f64 / elapsed_s
    );

    Ok(())
}

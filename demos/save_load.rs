#[cfg(not(feature = "serde"))]
fn main() {
    println!("enable the `serde` feature: cargo run --example save_load --features serde");
}

#[cfg(feature = "serde")]
fn main() -> cascade_net::Result<()> {
    use cascade_net::{CascadeConfig, CascadeNetwork};

    env_logger::init();

    type Net = CascadeNetwork<4, 1, 2, 10>;

    let net = Net::new_with_seed(0);

    let json_path = "target/tmp_cascade.json";
    let bin_path = "target/tmp_cascade.bin";
    net.save_json(json_path)?;
    net.save_bincode(bin_path)?;

    let from_json = Net::load_json(CascadeConfig::default(), json_path)?;
    let from_bin = Net::load_bincode(CascadeConfig::default(), bin_path)?;
    assert_eq!(from_json.weights(), net.weights());
    assert_eq!(from_bin.weights(), net.weights());

    println!(
        "saved and loaded {} weights: {json_path}, {bin_path}",
        net.weights().len()
    );
    Ok(())
}

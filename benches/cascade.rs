use criterion::{Criterion, black_box, criterion_group, criterion_main};

use cascade_net::CascadeNetwork;

type Net = CascadeNetwork<64, 1, 8, 128>;

fn cascade_forward_bench(c: &mut Criterion) {
    let net = Net::new_with_seed(0);
    let mut buf = net.scratch();
    buf.load_input(&[0.1_f32; 64]).unwrap();

    c.bench_function("cascade_forward_64_1_8_128", |b| {
        b.iter(|| {
            let out = net.forward(black_box(&mut buf));
            black_box(out[0]);
        })
    });
}

fn cascade_backward_bench(c: &mut Criterion) {
    let net = Net::new_with_seed(0);
    let mut buf = net.scratch();
    let desired = [0.0_f32; 8];
    buf.load_input(&[0.1_f32; 64]).unwrap();

    c.bench_function("cascade_forward_backward_64_1_8_128", |b| {
        b.iter(|| {
            net.forward(&mut buf);
            net.normalize_outputs(&mut buf);
            let error = net.backward(&mut buf, black_box(&desired));
            black_box(error);
        })
    });
}

criterion_group!(benches, cascade_forward_bench, cascade_backward_bench);
criterion_main!(benches);

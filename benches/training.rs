use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ckd_predict::inference::{predict, ModelChoice, PipelineSnapshot};
use ckd_predict::training::TrainEngine;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

const HEADER: &str = "id,age,bp,sg,al,su,rbc,pc,pcc,ba,bgr,bu,sc,sod,pot,hemo,pcv,wc,rc,htn,dm,cad,appet,pe,ane,classification";

fn create_ckd_csv(n_rows: usize) -> String {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let mut out = String::from(HEADER);
    out.push('\n');

    for i in 0..n_rows {
        let ckd = rng.gen_bool(0.6);
        let yes_no = |rng: &mut ChaCha8Rng, p: f64| if rng.gen_bool(p) { "yes" } else { "no" };
        let fields: Vec<String> = vec![
            i.to_string(),
            rng.gen_range(20..80).to_string(),
            [60, 70, 80, 90][rng.gen_range(0..4)].to_string(),
            if ckd { "1.010" } else { "1.020" }.to_string(),
            if ckd { rng.gen_range(1..5) } else { 0 }.to_string(),
            rng.gen_range(0..3).to_string(),
            if i % 10 == 4 { String::new() } else { "normal".to_string() },
            if ckd && rng.gen_bool(0.5) { "abnormal" } else { "normal" }.to_string(),
            "notpresent".to_string(),
            "notpresent".to_string(),
            format!("{:.0}", if ckd { rng.gen_range(120.0..300.0) } else { rng.gen_range(70.0..140.0) }),
            format!("{:.0}", if ckd { rng.gen_range(40.0..150.0) } else { rng.gen_range(15.0..45.0) }),
            format!("{:.1}", if ckd { rng.gen_range(1.8..7.0) } else { rng.gen_range(0.5..1.2) }),
            format!("{:.0}", rng.gen_range(130.0..150.0)),
            format!("{:.1}", rng.gen_range(3.5..5.5)),
            format!("{:.1}", if ckd { rng.gen_range(7.0..12.5) } else { rng.gen_range(13.0..17.5) }),
            if i % 7 == 3 { "?".to_string() } else { rng.gen_range(20..54).to_string() },
            rng.gen_range(5000..11000).to_string(),
            format!("{:.1}", rng.gen_range(2.5..6.2)),
            yes_no(&mut rng, if ckd { 0.6 } else { 0.05 }).to_string(),
            yes_no(&mut rng, if ckd { 0.5 } else { 0.05 }).to_string(),
            yes_no(&mut rng, 0.1).to_string(),
            if ckd && rng.gen_bool(0.3) { "poor" } else { "good" }.to_string(),
            yes_no(&mut rng, if ckd { 0.3 } else { 0.0 }).to_string(),
            yes_no(&mut rng, if ckd { 0.2 } else { 0.0 }).to_string(),
            if ckd { "ckd" } else { "notckd" }.to_string(),
        ];
        out.push_str(&fields.join(","));
        out.push('\n');
    }

    out
}

fn bench_fit_csv(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit_csv");
    group.sample_size(10);

    for n_rows in [400, 2000].iter() {
        let csv = create_ckd_csv(*n_rows);
        let engine = TrainEngine::default();

        group.bench_with_input(BenchmarkId::from_parameter(n_rows), &csv, |b, csv| {
            b.iter(|| engine.fit_csv(black_box(csv.as_bytes())).unwrap())
        });
    }

    group.finish();
}

fn bench_predict(c: &mut Criterion) {
    let csv = create_ckd_csv(400);
    let trained = TrainEngine::default().fit_csv(csv.as_bytes()).unwrap();
    let snapshot = PipelineSnapshot::new(trained);
    let features = vec![0.5; 10];

    let mut group = c.benchmark_group("predict");
    for choice in [ModelChoice::RandomForest, ModelChoice::XGBoost] {
        group.bench_function(choice.as_str(), |b| {
            b.iter(|| predict(&snapshot, black_box(&features), choice, false).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fit_csv, bench_predict);
criterion_main!(benches);

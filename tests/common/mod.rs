//! Shared fixtures: a synthetic CKD table in the public dataset's layout

#![allow(dead_code)]

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Header of the public dataset, id first
pub const HEADER: [&str; 26] = [
    "id", "age", "bp", "sg", "al", "su", "rbc", "pc", "pcc", "ba", "bgr", "bu", "sc", "sod", "pot",
    "hemo", "pcv", "wc", "rc", "htn", "dm", "cad", "appet", "pe", "ane", "classification",
];

#[derive(Debug, Clone)]
pub struct CsvOptions {
    pub n_rows: usize,
    pub seed: u64,
    /// Emit the leading `id` column
    pub with_id: bool,
    /// Put `?`, `\t?` and blanks into pcv/wc/rc
    pub dirty_numeric: bool,
    /// Write some labels as `ckd\t`
    pub dirty_labels: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            n_rows: 200,
            seed: 7,
            with_id: true,
            dirty_numeric: true,
            dirty_labels: true,
        }
    }
}

fn pick<'a>(rng: &mut ChaCha8Rng, p_first: f64, first: &'a str, second: &'a str) -> &'a str {
    if rng.gen_bool(p_first) {
        first
    } else {
        second
    }
}

/// Generate a CKD-like CSV; roughly 60% of rows are `ckd`
pub fn ckd_csv(opts: &CsvOptions) -> String {
    let mut rng = ChaCha8Rng::seed_from_u64(opts.seed);
    let header: Vec<&str> = if opts.with_id { HEADER.to_vec() } else { HEADER[1..].to_vec() };
    let mut out = header.join(",");
    out.push('\n');

    for i in 0..opts.n_rows {
        let ckd = rng.gen_bool(0.6);
        let mut row: Vec<String> = Vec::with_capacity(26);
        if opts.with_id {
            row.push(i.to_string());
        }

        row.push(format!("{}", rng.gen_range(20..80)));
        row.push(format!("{}", [60, 70, 80, 90, 100][rng.gen_range(0..5)]));
        row.push(if ckd {
            pick(&mut rng, 0.7, "1.010", "1.015").to_string()
        } else {
            pick(&mut rng, 0.5, "1.020", "1.025").to_string()
        });
        row.push(format!("{}", if ckd { rng.gen_range(1..5) } else { 0 }));
        row.push(format!("{}", rng.gen_range(0..3)));
        // rbc is sometimes missing, as in the public file
        row.push(if i % 10 == 4 { String::new() } else { pick(&mut rng, 0.8, "normal", "abnormal").to_string() });
        row.push(if ckd { pick(&mut rng, 0.5, "abnormal", "normal") } else { "normal" }.to_string());
        row.push(pick(&mut rng, 0.1, "present", "notpresent").to_string());
        row.push(pick(&mut rng, 0.05, "present", "notpresent").to_string());
        row.push(format!("{:.0}", if ckd { rng.gen_range(120.0..300.0) } else { rng.gen_range(70.0..140.0) }));
        row.push(format!("{:.0}", if ckd { rng.gen_range(40.0..150.0) } else { rng.gen_range(15.0..45.0) }));
        row.push(format!("{:.1}", if ckd { rng.gen_range(1.8..7.0) } else { rng.gen_range(0.5..1.2) }));
        row.push(format!("{:.0}", rng.gen_range(130.0..150.0)));
        row.push(format!("{:.1}", rng.gen_range(3.5..5.5)));
        row.push(format!("{:.1}", if ckd { rng.gen_range(7.0..12.5) } else { rng.gen_range(13.0..17.5) }));

        let pcv = format!("{}", if ckd { rng.gen_range(20..38) } else { rng.gen_range(40..54) });
        let wc = format!("{}", rng.gen_range(5000..11000));
        let rc = format!("{:.1}", if ckd { rng.gen_range(2.5..4.5) } else { rng.gen_range(4.5..6.2) });
        if opts.dirty_numeric {
            row.push(if i % 7 == 3 { "?".to_string() } else { pcv });
            row.push(if i % 11 == 5 { String::new() } else { wc });
            row.push(if i % 9 == 2 { "\t?".to_string() } else { rc });
        } else {
            row.extend([pcv, wc, rc]);
        }

        row.push(if ckd { pick(&mut rng, 0.6, "yes", "no") } else { "no" }.to_string());
        row.push(if ckd { pick(&mut rng, 0.5, "yes", "no") } else { "no" }.to_string());
        row.push(pick(&mut rng, 0.1, "yes", "no").to_string());
        row.push(if ckd { pick(&mut rng, 0.7, "good", "poor") } else { "good" }.to_string());
        row.push(if ckd { pick(&mut rng, 0.3, "yes", "no") } else { "no" }.to_string());
        row.push(if ckd { pick(&mut rng, 0.2, "yes", "no") } else { "no" }.to_string());

        let label = match (ckd, opts.dirty_labels && i % 13 == 6) {
            (true, true) => "ckd\t",
            (true, false) => "ckd",
            (false, _) => "notckd",
        };
        row.push(label.to_string());

        // quote fields containing tabs so the reader keeps them verbatim
        let line: Vec<String> = row
            .into_iter()
            .map(|v| if v.contains('\t') { format!("\"{}\"", v) } else { v })
            .collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }

    out
}

pub const BOUNDARY: &str = "ckd-test-boundary";

/// Wrap bytes as a multipart body with one file field
pub fn multipart_body(field: &str, content: &str) -> Vec<u8> {
    format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"{f}\"; filename=\"kidney_disease.csv\"\r\nContent-Type: text/csv\r\n\r\n{c}\r\n--{b}--\r\n",
        b = BOUNDARY,
        f = field,
        c = content
    )
    .into_bytes()
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}

//! Writes a demo classifier artifact plus sample uploads next to the binary's
//! working directory: `generate_iris.json`, `sample_iris.csv`,
//! `sample_iris.json` and `sample_iris.parquet`.

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde_json::json;

const FEATURES: [&str; 4] = ["SepalLengthCm", "SepalWidthCm", "PetalLengthCm", "PetalWidthCm"];

/// (species, per-feature mean, per-feature std-dev) from the Iris dataset.
const CLASSES: [(&str, [f64; 4], [f64; 4]); 3] = [
    ("Iris-setosa", [5.006, 3.428, 1.462, 0.246], [0.352, 0.379, 0.174, 0.105]),
    ("Iris-versicolor", [5.936, 2.770, 4.260, 1.326], [0.516, 0.314, 0.470, 0.198]),
    ("Iris-virginica", [6.588, 2.974, 5.552, 2.026], [0.636, 0.322, 0.552, 0.275]),
];

const ROWS_PER_CLASS: usize = 10;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

struct SampleRow {
    id: i64,
    values: [f64; 4],
    species: &'static str,
}

fn generate_rows(rng: &mut SimpleRng) -> Vec<SampleRow> {
    let mut rows = Vec::with_capacity(CLASSES.len() * ROWS_PER_CLASS);
    for _ in 0..ROWS_PER_CLASS {
        for (species, mean, std_dev) in &CLASSES {
            let mut values = [0.0; 4];
            for (j, v) in values.iter_mut().enumerate() {
                // One decimal, like the published measurements.
                let sample = rng.gauss(mean[j], std_dev[j]).max(0.1);
                *v = (sample * 10.0).round() / 10.0;
            }
            rows.push(SampleRow {
                id: (rows.len() + 1) as i64,
                values,
                species: *species,
            });
        }
    }
    rows
}

fn write_model(path: &str) -> Result<()> {
    let artifact = json!({
        "kind": "nearest_centroid",
        "classes": [0, 1, 2],
        "feature_names": FEATURES,
        "centroids": CLASSES.iter().map(|(_, mean, _)| mean.to_vec()).collect::<Vec<_>>(),
    });
    let text = serde_json::to_string_pretty(&artifact)?;
    std::fs::write(path, text).with_context(|| format!("writing {path}"))?;
    Ok(())
}

fn write_csv(path: &str, rows: &[SampleRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record(
        std::iter::once("Id")
            .chain(FEATURES)
            .chain(std::iter::once("Species")),
    )?;
    for row in rows {
        let mut record = vec![row.id.to_string()];
        record.extend(row.values.iter().map(|v| format!("{v:.1}")));
        record.push(row.species.to_string());
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_json(path: &str, rows: &[SampleRow]) -> Result<()> {
    let records: Vec<serde_json::Value> = rows
        .iter()
        .map(|row| {
            let mut obj = serde_json::Map::new();
            obj.insert("Id".into(), json!(row.id));
            for (name, v) in FEATURES.iter().zip(row.values) {
                obj.insert((*name).into(), json!(v));
            }
            serde_json::Value::Object(obj)
        })
        .collect();
    let text = serde_json::to_string_pretty(&records)?;
    std::fs::write(path, text).with_context(|| format!("writing {path}"))?;
    Ok(())
}

fn write_parquet(path: &str, rows: &[SampleRow]) -> Result<()> {
    let mut fields = vec![Field::new("Id", DataType::Int64, false)];
    fields.extend(FEATURES.iter().map(|name| Field::new(*name, DataType::Float64, false)));
    fields.push(Field::new("Species", DataType::Utf8, false));
    let schema = Arc::new(Schema::new(fields));

    let mut columns: Vec<arrow::array::ArrayRef> =
        vec![Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.id)))];
    for j in 0..FEATURES.len() {
        columns.push(Arc::new(Float64Array::from_iter_values(
            rows.iter().map(|r| r.values[j]),
        )));
    }
    columns.push(Arc::new(StringArray::from_iter_values(
        rows.iter().map(|r| r.species),
    )));

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng);

    write_model("generate_iris.json")?;
    write_csv("sample_iris.csv", &rows)?;
    write_json("sample_iris.json", &rows)?;
    write_parquet("sample_iris.parquet", &rows)?;

    println!(
        "Wrote generate_iris.json and {} sample rows to sample_iris.{{csv,json,parquet}}",
        rows.len()
    );
    Ok(())
}

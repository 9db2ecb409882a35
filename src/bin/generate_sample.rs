use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Days, NaiveDate};
use parquet::arrow::ArrowWriter;

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

    /// Pick from `(item, weight)` pairs.
    fn weighted<'a>(&mut self, choices: &[(&'a str, f64)]) -> &'a str {
        let total: f64 = choices.iter().map(|(_, w)| w).sum();
        let mut roll = self.next_f64() * total;
        for &(item, weight) in choices {
            if roll < weight {
                return item;
            }
            roll -= weight;
        }
        choices[choices.len() - 1].0
    }
}

struct Row {
    id: i64,
    department: &'static str,
    country: &'static str,
    gender: &'static str,
    time_type: &'static str,
    hire_date: String,
    salary: f64,
}

const EMPLOYEES: i64 = 1500;

// (department, mean salary)
const DEPARTMENTS: [(&str, f64); 5] = [
    ("Engineering", 95_000.0),
    ("Sales", 62_000.0),
    ("Marketing", 58_000.0),
    ("Finance", 72_000.0),
    ("Human Resources", 54_000.0),
];

fn generate(rng: &mut SimpleRng, first_hire: NaiveDate) -> Vec<Row> {
    let countries = [
        ("United States", 0.40),
        ("United Kingdom", 0.20),
        ("Germany", 0.15),
        ("India", 0.15),
        ("Brazil", 0.10),
    ];
    let genders = [("Female", 0.48), ("Male", 0.48), ("Non-binary", 0.04)];
    // A few rows outside the two KPI buckets on purpose.
    let time_types = [("Full time", 0.80), ("Part time", 0.17), ("Contractor", 0.03)];
    let department_weights: Vec<(&str, f64)> =
        DEPARTMENTS.iter().map(|&(d, _)| (d, 1.0)).collect();

    let span_days = 14 * 365;

    (0..EMPLOYEES)
        .map(|i| {
            let department = rng.weighted(&department_weights);
            let mean = DEPARTMENTS
                .iter()
                .find(|(d, _)| *d == department)
                .map(|(_, m)| *m)
                .unwrap_or(60_000.0);
            // Skew toward recent years.
            let offset = (rng.next_f64().sqrt() * span_days as f64) as u64;
            let hired = first_hire + Days::new(offset);
            Row {
                id: 10_000 + i,
                department,
                country: rng.weighted(&countries),
                gender: rng.weighted(&genders),
                time_type: rng.weighted(&time_types),
                hire_date: hired.format("%d/%m/%Y").to_string(),
                salary: rng.gauss(mean, mean * 0.15).max(20_000.0).round(),
            }
        })
        .collect()
}

fn write_csv(path: &Path, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer.write_record([
        "EmployeeID",
        "Department",
        "Country",
        "Gender",
        "Time Type",
        "Hire Date",
        "Salary",
    ])?;
    for r in rows {
        writer.write_record([
            r.id.to_string().as_str(),
            r.department,
            r.country,
            r.gender,
            r.time_type,
            r.hire_date.as_str(),
            r.salary.to_string().as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[Row]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("EmployeeID", DataType::Int64, false),
        Field::new("Department", DataType::Utf8, false),
        Field::new("Country", DataType::Utf8, false),
        Field::new("Gender", DataType::Utf8, false),
        Field::new("Time Type", DataType::Utf8, false),
        Field::new("Hire Date", DataType::Utf8, false),
        Field::new("Salary", DataType::Float64, false),
    ]));

    let text = |f: fn(&Row) -> &str| StringArray::from(rows.iter().map(f).collect::<Vec<_>>());
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(rows.iter().map(|r| r.id).collect::<Vec<_>>())),
            Arc::new(text(|r| r.department)),
            Arc::new(text(|r| r.country)),
            Arc::new(text(|r| r.gender)),
            Arc::new(text(|r| r.time_type)),
            Arc::new(text(|r| r.hire_date.as_str())),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.salary).collect::<Vec<_>>(),
            )),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let out_dir = PathBuf::from(std::env::args().nth(1).unwrap_or_else(|| "data".into()));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let first_hire = NaiveDate::from_ymd_opt(2010, 1, 1).context("invalid first hire date")?;
    let rows = generate(&mut rng, first_hire);

    let csv_path = out_dir.join("hr_data.csv");
    let parquet_path = out_dir.join("hr_data.parquet");
    write_csv(&csv_path, &rows)?;
    write_parquet(&parquet_path, &rows)?;

    println!(
        "Wrote {} employees to {} and {}",
        rows.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}

use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Date32Type, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::error::DataLoadError;
use super::model::{
    EmployeeId, EmployeeRecord, EmployeeTable, TimeType, COL_COUNTRY, COL_DEPARTMENT,
    COL_EMPLOYEE_ID, COL_GENDER, COL_HIRE_DATE, COL_SALARY, COL_TIME_TYPE, REQUIRED_COLUMNS,
};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an employee table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the required column names
/// * `.json`    – `[{ "EmployeeID": 1, "Department": "...", ... }, ...]`
/// * `.parquet` – one column per required name
pub fn load(path: &Path) -> Result<EmployeeTable, DataLoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv_reader(open(path)?),
        "json" => {
            let text = std::fs::read_to_string(path).map_err(|source| DataLoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            load_json_str(&text)
        }
        "parquet" | "pq" => load_parquet(open(path)?),
        other => Err(DataLoadError::UnsupportedFormat(other.to_string())),
    }?;

    log::info!(
        "Loaded {} employees from {} ({} departments, {} countries)",
        table.len(),
        path.display(),
        table.departments.len(),
        table.countries.len()
    );
    Ok(table)
}

fn open(path: &Path) -> Result<std::fs::File, DataLoadError> {
    std::fs::File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Format-independent row validation
// ---------------------------------------------------------------------------

/// One row with every cell already rendered as text.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "EmployeeID")]
    employee_id: String,
    #[serde(rename = "Department")]
    department: String,
    #[serde(rename = "Country")]
    country: String,
    #[serde(rename = "Gender")]
    gender: String,
    #[serde(rename = "Time Type")]
    time_type: String,
    #[serde(rename = "Hire Date")]
    hire_date: String,
    #[serde(rename = "Salary")]
    salary: String,
}

impl RawRow {
    /// `row` is 1-based and excludes the header.
    fn into_record(self, row: usize) -> Result<EmployeeRecord, DataLoadError> {
        let employee_id = required(self.employee_id, row, COL_EMPLOYEE_ID)?;
        let department = required(self.department, row, COL_DEPARTMENT)?;
        let country = required(self.country, row, COL_COUNTRY)?;
        let salary_text = required(self.salary, row, COL_SALARY)?;

        // `f64::from_str` also takes "NaN" and "inf".
        let salary = salary_text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|s| s.is_finite())
            .ok_or_else(|| DataLoadError::InvalidValue {
                row,
                column: COL_SALARY,
                value: salary_text.clone(),
            })?;

        Ok(EmployeeRecord {
            employee_id: EmployeeId::parse(employee_id.trim()),
            department,
            country,
            gender: self.gender,
            time_type: TimeType::from_label(&self.time_type),
            hire_date: self.hire_date,
            salary,
        })
    }
}

fn required(value: String, row: usize, column: &'static str) -> Result<String, DataLoadError> {
    if value.trim().is_empty() {
        Err(DataLoadError::MissingValue { row, column })
    } else {
        Ok(value)
    }
}

fn check_columns<'a>(present: impl IntoIterator<Item = &'a str>) -> Result<(), DataLoadError> {
    let present: BTreeSet<&str> = present.into_iter().collect();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !present.contains(*c))
        .map(|c| c.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(DataLoadError::MissingColumns(missing))
    }
}

fn collect_rows(rows: Vec<RawRow>) -> Result<EmployeeTable, DataLoadError> {
    let records = rows
        .into_iter()
        .enumerate()
        .map(|(i, raw)| raw.into_record(i + 1))
        .collect::<Result<Vec<_>, _>>()?;
    EmployeeTable::from_records(records)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Parse CSV from any reader. Headers and fields are trimmed; columns
/// beyond the required ones are ignored.
pub fn load_csv_reader<R: Read>(reader: R) -> Result<EmployeeTable, DataLoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    check_columns(csv_reader.headers()?.iter())?;

    let rows = csv_reader
        .deserialize::<RawRow>()
        .collect::<Result<Vec<_>, _>>()?;
    collect_rows(rows)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "EmployeeID": 1, "Department": "Eng", "Country": "US", "Gender": "F",
///     "Time Type": "Full time", "Hire Date": "01/03/2019", "Salary": 90000 },
///   ...
/// ]
/// ```
///
/// A column counts as present if any record carries the key; a record
/// missing the key (or holding `null`) has an empty cell there.
pub fn load_json_str(text: &str) -> Result<EmployeeTable, DataLoadError> {
    let root: JsonValue = serde_json::from_str(text)?;
    let records = root
        .as_array()
        .ok_or_else(|| DataLoadError::JsonShape("expected top-level JSON array".into()))?;

    let mut objects = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| DataLoadError::JsonShape(format!("row {} is not an object", i + 1)))?;
        objects.push(obj);
    }

    check_columns(objects.iter().flat_map(|o| o.keys().map(String::as_str)))?;

    let rows = objects
        .into_iter()
        .map(|obj| {
            let cell = |key: &str| obj.get(key).map(json_to_text).unwrap_or_default();
            RawRow {
                employee_id: cell(COL_EMPLOYEE_ID),
                department: cell(COL_DEPARTMENT),
                country: cell(COL_COUNTRY),
                gender: cell(COL_GENDER),
                time_type: cell(COL_TIME_TYPE),
                hire_date: cell(COL_HIRE_DATE),
                salary: cell(COL_SALARY),
            }
        })
        .collect();
    collect_rows(rows)
}

fn json_to_text(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.trim().to_string(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per required name.
///
/// Text, integer and float columns are accepted for every field; a
/// `Date32` hire-date column is rendered back to `DD/MM/YYYY`.
pub fn load_parquet(file: std::fs::File) -> Result<EmployeeTable, DataLoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = builder.schema().clone();
    check_columns(schema.fields().iter().map(|f| f.name().as_str()))?;

    let reader = builder.build()?;
    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;
        let column = |name: &str| -> Result<Arc<dyn Array>, DataLoadError> {
            let idx = batch.schema().index_of(name)?;
            Ok(batch.column(idx).clone())
        };

        let ids = column(COL_EMPLOYEE_ID)?;
        let departments = column(COL_DEPARTMENT)?;
        let countries = column(COL_COUNTRY)?;
        let genders = column(COL_GENDER)?;
        let time_types = column(COL_TIME_TYPE)?;
        let hire_dates = column(COL_HIRE_DATE)?;
        let salaries = column(COL_SALARY)?;

        for row in 0..batch.num_rows() {
            rows.push(RawRow {
                employee_id: cell_text(&ids, COL_EMPLOYEE_ID, row)?,
                department: cell_text(&departments, COL_DEPARTMENT, row)?,
                country: cell_text(&countries, COL_COUNTRY, row)?,
                gender: cell_text(&genders, COL_GENDER, row)?,
                time_type: cell_text(&time_types, COL_TIME_TYPE, row)?,
                hire_date: cell_text(&hire_dates, COL_HIRE_DATE, row)?,
                salary: cell_text(&salaries, COL_SALARY, row)?,
            });
        }
    }

    collect_rows(rows)
}

// -- Arrow helpers --

/// Render a single cell as text. Nulls become the empty string.
fn cell_text(col: &Arc<dyn Array>, name: &str, row: usize) -> Result<String, DataLoadError> {
    if col.is_null(row) {
        return Ok(String::new());
    }
    let text = match col.data_type() {
        DataType::Utf8 => col.as_string::<i32>().value(row).trim().to_string(),
        DataType::LargeUtf8 => col.as_string::<i64>().value(row).trim().to_string(),
        DataType::Int32 => col.as_primitive::<Int32Type>().value(row).to_string(),
        DataType::Int64 => col.as_primitive::<Int64Type>().value(row).to_string(),
        DataType::Float32 => col.as_primitive::<Float32Type>().value(row).to_string(),
        DataType::Float64 => col.as_primitive::<Float64Type>().value(row).to_string(),
        DataType::Date32 => col
            .as_primitive::<Date32Type>()
            .value_as_date(row)
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_default(),
        other => {
            return Err(DataLoadError::UnsupportedColumnType {
                column: name.to_string(),
                data_type: format!("{other:?}"),
            })
        }
    };
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "EmployeeID,Department,Country,Gender,Time Type,Hire Date,Salary\n";

    fn csv(body: &str) -> Result<EmployeeTable, DataLoadError> {
        load_csv_reader(format!("{HEADER}{body}").as_bytes())
    }

    #[test]
    fn csv_rows_become_records() {
        let table = csv("1,Eng,US,F,Full time,01/03/2019,90000\nE-2,Sales,UK,M,Part time,15/06/2019,40000.5\n")
            .unwrap();
        assert_eq!(table.len(), 2);
        let first = &table.records[0];
        assert_eq!(first.employee_id, EmployeeId::Integer(1));
        assert_eq!(first.time_type, TimeType::FullTime);
        assert_eq!(first.hire_date, "01/03/2019");
        assert_eq!(first.salary, 90000.0);
        assert_eq!(table.records[1].employee_id, EmployeeId::Text("E-2".into()));
        assert_eq!(table.records[1].salary, 40000.5);
    }

    #[test]
    fn header_only_csv_is_an_empty_table() {
        let table = csv("").unwrap();
        assert!(table.is_empty());
        assert!(table.departments.is_empty());
    }

    #[test]
    fn csv_ignores_extra_columns_and_trims() {
        let text = "Name, EmployeeID ,Department,Country,Gender,Time Type,Hire Date,Salary\n\
                    Ann, 9 , Eng ,US,F,Full time,01/01/2020, 10 \n";
        let table = load_csv_reader(text.as_bytes()).unwrap();
        assert_eq!(table.records[0].employee_id, EmployeeId::Integer(9));
        assert_eq!(table.records[0].department, "Eng");
        assert_eq!(table.records[0].salary, 10.0);
    }

    #[test]
    fn csv_reports_every_missing_column() {
        let err = load_csv_reader("EmployeeID,Department,Gender,Salary\n1,Eng,F,1\n".as_bytes())
            .unwrap_err();
        match err {
            DataLoadError::MissingColumns(cols) => {
                assert_eq!(cols, ["Country", "Time Type", "Hire Date"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_country_is_rejected_with_row_number() {
        let err = csv("1,Eng,US,F,Full time,01/01/2020,1\n2,Eng,,F,Full time,01/01/2020,1\n")
            .unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::MissingValue { row: 2, column: "Country" }
        ));
    }

    #[test]
    fn non_numeric_salary_is_rejected() {
        let err = csv("1,Eng,US,F,Full time,01/01/2020,lots\n").unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::InvalidValue { row: 1, column: "Salary", .. }
        ));
    }

    #[test]
    fn non_finite_salary_is_rejected() {
        for value in ["inf", "NaN", "-infinity"] {
            let body = format!(
                "1,Eng,US,F,Full time,01/01/2020,5\n2,Eng,US,F,Full time,01/01/2020,{value}\n"
            );
            match csv(&body) {
                Err(DataLoadError::InvalidValue {
                    row: 2,
                    column: "Salary",
                    value: v,
                }) => assert_eq!(v, value),
                other => panic!("expected invalid salary for {value}, got {other:?}"),
            }
        }
    }

    #[test]
    fn json_cells_are_trimmed_like_csv() {
        let text = r#"[
            {"EmployeeID": " 4 ", "Department": "Eng ", "Country": " US", "Gender": "F",
             "Time Type": " Full time", "Hire Date": " 01/03/2019 ", "Salary": " 10 "}
        ]"#;
        let from_json = load_json_str(text).unwrap();
        let from_csv = csv("4,Eng ,  US,F, Full time, 01/03/2019 , 10 \n").unwrap();
        assert_eq!(from_json.records, from_csv.records);

        let record = &from_json.records[0];
        assert_eq!(record.employee_id, EmployeeId::Integer(4));
        assert_eq!(record.department, "Eng");
        assert_eq!(record.time_type, TimeType::FullTime);
        assert_eq!(record.hire_date, "01/03/2019");
        assert_eq!(from_json.departments, ["Eng"]);
    }

    #[test]
    fn json_records_accept_numbers_and_strings() {
        let text = r#"[
            {"EmployeeID": 1, "Department": "Eng", "Country": "US", "Gender": "F",
             "Time Type": "Full time", "Hire Date": "01/03/2019", "Salary": 90000},
            {"EmployeeID": "x7", "Department": "HR", "Country": "UK", "Gender": null,
             "Time Type": "Contract", "Hire Date": "02/03/2019", "Salary": "512.5"}
        ]"#;
        let table = load_json_str(text).unwrap();
        assert_eq!(table.records[0].employee_id, EmployeeId::Integer(1));
        assert_eq!(table.records[0].salary, 90000.0);
        assert_eq!(table.records[1].gender, "");
        assert_eq!(table.records[1].time_type, TimeType::Other("Contract".into()));
        assert_eq!(table.records[1].salary, 512.5);
    }

    #[test]
    fn json_must_be_an_array_of_objects() {
        assert!(matches!(
            load_json_str(r#"{"EmployeeID": 1}"#),
            Err(DataLoadError::JsonShape(_))
        ));
        assert!(matches!(
            load_json_str("[1, 2]"),
            Err(DataLoadError::JsonShape(_))
        ));
        assert!(matches!(
            load_json_str("[]"),
            Err(DataLoadError::MissingColumns(_))
        ));
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let err = load(Path::new("employees.xlsx")).unwrap_err();
        assert!(matches!(err, DataLoadError::UnsupportedFormat(ref e) if e == "xlsx"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::Io { .. }));
    }
}

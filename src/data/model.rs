use std::collections::{BTreeSet, HashSet};
use std::fmt;

use super::error::DataLoadError;

// ---------------------------------------------------------------------------
// Column names of the source table
// ---------------------------------------------------------------------------

pub const COL_EMPLOYEE_ID: &str = "EmployeeID";
pub const COL_DEPARTMENT: &str = "Department";
pub const COL_COUNTRY: &str = "Country";
pub const COL_GENDER: &str = "Gender";
pub const COL_TIME_TYPE: &str = "Time Type";
pub const COL_HIRE_DATE: &str = "Hire Date";
pub const COL_SALARY: &str = "Salary";

/// Every column a source must provide, in canonical order.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    COL_EMPLOYEE_ID,
    COL_DEPARTMENT,
    COL_COUNTRY,
    COL_GENDER,
    COL_TIME_TYPE,
    COL_HIRE_DATE,
    COL_SALARY,
];

// ---------------------------------------------------------------------------
// EmployeeId – integer when the source allows it, text otherwise
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EmployeeId {
    Integer(i64),
    Text(String),
}

impl EmployeeId {
    /// Interpret a raw cell: integers stay integers, anything else is text.
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<i64>() {
            Ok(i) => EmployeeId::Integer(i),
            Err(_) => EmployeeId::Text(raw.to_string()),
        }
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmployeeId::Integer(i) => write!(f, "{i}"),
            EmployeeId::Text(s) => write!(f, "{s}"),
        }
    }
}

// ---------------------------------------------------------------------------
// TimeType – only the exact labels "Full time" / "Part time" are recognised
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TimeType {
    FullTime,
    PartTime,
    /// Any other label, kept verbatim. Counts toward totals only.
    Other(String),
}

impl TimeType {
    pub const FULL_TIME: &'static str = "Full time";
    pub const PART_TIME: &'static str = "Part time";

    /// Case- and whitespace-sensitive: "full time" is `Other`.
    pub fn from_label(label: &str) -> Self {
        match label {
            Self::FULL_TIME => TimeType::FullTime,
            Self::PART_TIME => TimeType::PartTime,
            other => TimeType::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            TimeType::FullTime => Self::FULL_TIME,
            TimeType::PartTime => Self::PART_TIME,
            TimeType::Other(s) => s,
        }
    }
}

impl fmt::Display for TimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// CategoryColumn – the categorical columns distributions can group by
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryColumn {
    Gender,
    Country,
    Department,
}

impl CategoryColumn {
    pub fn column_name(self) -> &'static str {
        match self {
            CategoryColumn::Gender => COL_GENDER,
            CategoryColumn::Country => COL_COUNTRY,
            CategoryColumn::Department => COL_DEPARTMENT,
        }
    }
}

// ---------------------------------------------------------------------------
// EmployeeRecord – one row of the source table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeRecord {
    pub employee_id: EmployeeId,
    pub department: String,
    pub country: String,
    pub gender: String,
    pub time_type: TimeType,
    /// Raw text as found in the source; parsed day-first on demand.
    pub hire_date: String,
    pub salary: f64,
}

impl EmployeeRecord {
    /// Value of a categorical column for this row.
    pub fn category(&self, column: CategoryColumn) -> &str {
        match column {
            CategoryColumn::Gender => &self.gender,
            CategoryColumn::Country => &self.country,
            CategoryColumn::Department => &self.department,
        }
    }
}

// ---------------------------------------------------------------------------
// EmployeeTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The immutable loaded table with pre-computed filter options.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeTable {
    /// All rows, in source order.
    pub records: Vec<EmployeeRecord>,
    /// Distinct departments by first appearance.
    pub departments: Vec<String>,
    /// Distinct countries by first appearance.
    pub countries: Vec<String>,
}

impl EmployeeTable {
    /// Build the table, enforcing `EmployeeID` uniqueness.
    pub fn from_records(records: Vec<EmployeeRecord>) -> Result<Self, DataLoadError> {
        let mut seen_ids = HashSet::with_capacity(records.len());
        for rec in &records {
            if !seen_ids.insert(&rec.employee_id) {
                return Err(DataLoadError::DuplicateEmployeeId(rec.employee_id.clone()));
            }
        }

        let departments = distinct_in_order(records.iter().map(|r| r.department.as_str()));
        let countries = distinct_in_order(records.iter().map(|r| r.country.as_str()));

        Ok(EmployeeTable {
            records,
            departments,
            countries,
        })
    }

    /// Number of employees.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn distinct_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, dept: &str, country: &str) -> EmployeeRecord {
        EmployeeRecord {
            employee_id: EmployeeId::Integer(id),
            department: dept.to_string(),
            country: country.to_string(),
            gender: "F".to_string(),
            time_type: TimeType::FullTime,
            hire_date: "01/01/2020".to_string(),
            salary: 1.0,
        }
    }

    #[test]
    fn employee_id_prefers_integers() {
        assert_eq!(EmployeeId::parse("42"), EmployeeId::Integer(42));
        assert_eq!(EmployeeId::parse("E-42"), EmployeeId::Text("E-42".into()));
    }

    #[test]
    fn time_type_labels_are_exact() {
        assert_eq!(TimeType::from_label("Full time"), TimeType::FullTime);
        assert_eq!(TimeType::from_label("Part time"), TimeType::PartTime);
        assert_eq!(
            TimeType::from_label("full time"),
            TimeType::Other("full time".into())
        );
        assert_eq!(TimeType::from_label("Contract").label(), "Contract");
    }

    #[test]
    fn table_keeps_first_seen_order_of_filter_options() {
        let table = EmployeeTable::from_records(vec![
            record(1, "Sales", "UK"),
            record(2, "Eng", "US"),
            record(3, "Sales", "DE"),
            record(4, "HR", "UK"),
        ])
        .unwrap();
        assert_eq!(table.departments, ["Sales", "Eng", "HR"]);
        assert_eq!(table.countries, ["UK", "US", "DE"]);
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = EmployeeTable::from_records(vec![record(7, "Eng", "US"), record(7, "HR", "UK")])
            .unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::DuplicateEmployeeId(EmployeeId::Integer(7))
        ));
    }
}

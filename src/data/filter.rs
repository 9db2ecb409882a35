use std::collections::BTreeSet;

use super::model::{EmployeeRecord, EmployeeTable};

// ---------------------------------------------------------------------------
// Filter selection: which departments / countries are included
// ---------------------------------------------------------------------------

/// The user-chosen subset of departments and countries.
///
/// An empty set selects nothing; it never means "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FilterSelection {
    pub departments: BTreeSet<String>,
    pub countries: BTreeSet<String>,
}

impl FilterSelection {
    /// Everything selected, the default shown on startup.
    pub fn all(table: &EmployeeTable) -> Self {
        FilterSelection {
            departments: table.departments.iter().cloned().collect(),
            countries: table.countries.iter().cloned().collect(),
        }
    }

    /// The selection to show after `previous` is replaced by `next`.
    /// Choices made on values that survive are kept, values that vanished
    /// are dropped and values new to `next` start selected.
    pub fn carried_over(&self, previous: &EmployeeTable, next: &EmployeeTable) -> Self {
        FilterSelection {
            departments: carry(&self.departments, &previous.departments, &next.departments),
            countries: carry(&self.countries, &previous.countries, &next.countries),
        }
    }

    pub fn includes_department(&self, record: &EmployeeRecord) -> bool {
        self.departments.contains(&record.department)
    }

    pub fn includes_country(&self, record: &EmployeeRecord) -> bool {
        self.countries.contains(&record.country)
    }
}

fn carry(selected: &BTreeSet<String>, previous: &[String], next: &[String]) -> BTreeSet<String> {
    next.iter()
        .filter(|v| selected.contains(*v) || !previous.contains(*v))
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Filtered views
// ---------------------------------------------------------------------------

/// The three row subsets the dashboard draws from. Each keeps source order.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredViews<'a> {
    /// Department and country both selected.
    pub by_both: Vec<&'a EmployeeRecord>,
    /// Country selected, any department.
    pub by_country_only: Vec<&'a EmployeeRecord>,
    /// Department selected, any country.
    pub by_department_only: Vec<&'a EmployeeRecord>,
}

/// Split `table` into the three filtered views in a single pass.
pub fn filter<'a>(table: &'a EmployeeTable, selection: &FilterSelection) -> FilteredViews<'a> {
    let mut views = FilteredViews {
        by_both: Vec::new(),
        by_country_only: Vec::new(),
        by_department_only: Vec::new(),
    };

    for record in &table.records {
        let dept_ok = selection.includes_department(record);
        let country_ok = selection.includes_country(record);
        if dept_ok && country_ok {
            views.by_both.push(record);
        }
        if country_ok {
            views.by_country_only.push(record);
        }
        if dept_ok {
            views.by_department_only.push(record);
        }
    }

    views
}

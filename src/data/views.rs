use super::aggregate::{
    cumulative_hires_by_year, distribution, kpi_counts, ranked_distribution, salary_distribution,
    CategoryCount, DatePolicy, KpiCounts, SalaryPoint, YearTotal,
};
use super::error::DateParseError;
use super::filter::{filter, FilterSelection};
use super::model::{CategoryColumn, EmployeeTable};

// ---------------------------------------------------------------------------
// DerivedViews – everything the dashboard draws for one selection
// ---------------------------------------------------------------------------

/// Owned output of one pipeline pass. Holds no borrows of the table.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedViews {
    /// Over rows matching both filters.
    pub kpis: KpiCounts,
    /// Gender share over rows matching both filters.
    pub gender: Vec<CategoryCount>,
    /// Employees per country, department filter only, ascending by count.
    pub country: Vec<CategoryCount>,
    /// Department share, country filter only.
    pub department: Vec<CategoryCount>,
    /// Running hires per year over rows matching both filters.
    pub cumulative_hires: Vec<YearTotal>,
    /// Salaries paired with department, country filter only.
    pub salaries: Vec<SalaryPoint>,

    pub rows_by_both: usize,
    pub rows_by_country_only: usize,
    pub rows_by_department_only: usize,
}

impl DerivedViews {
    /// Run the whole pipeline for one selection.
    pub fn compute(
        table: &EmployeeTable,
        selection: &FilterSelection,
        policy: DatePolicy,
    ) -> Result<Self, DateParseError> {
        let views = filter(table, selection);
        let both = || views.by_both.iter().copied();
        let by_country = || views.by_country_only.iter().copied();
        let by_department = || views.by_department_only.iter().copied();

        let derived = DerivedViews {
            kpis: kpi_counts(both()),
            gender: distribution(both(), CategoryColumn::Gender),
            country: ranked_distribution(by_department(), CategoryColumn::Country),
            department: distribution(by_country(), CategoryColumn::Department),
            cumulative_hires: cumulative_hires_by_year(both(), policy)?,
            salaries: salary_distribution(by_country()),
            rows_by_both: views.by_both.len(),
            rows_by_country_only: views.by_country_only.len(),
            rows_by_department_only: views.by_department_only.len(),
        };

        log::debug!(
            "Recomputed views: {} / {} / {} rows (both / country / department)",
            derived.rows_by_both,
            derived.rows_by_country_only,
            derived.rows_by_department_only
        );
        Ok(derived)
    }
}

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use super::error::DateParseError;
use super::model::{CategoryColumn, EmployeeRecord, TimeType};

// ---------------------------------------------------------------------------
// KPI counts
// ---------------------------------------------------------------------------

/// Headline numbers. Rows whose time type is neither "Full time" nor
/// "Part time" count toward `total` only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KpiCounts {
    pub total: usize,
    pub full_time: usize,
    pub part_time: usize,
}

pub fn kpi_counts<'a, I>(rows: I) -> KpiCounts
where
    I: IntoIterator<Item = &'a EmployeeRecord>,
{
    rows.into_iter().fold(KpiCounts::default(), |mut acc, r| {
        acc.total += 1;
        match r.time_type {
            TimeType::FullTime => acc.full_time += 1,
            TimeType::PartTime => acc.part_time += 1,
            TimeType::Other(_) => {}
        }
        acc
    })
}

// ---------------------------------------------------------------------------
// Categorical distributions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Row count per distinct value of `column`, by first appearance.
pub fn distribution<'a, I>(rows: I, column: CategoryColumn) -> Vec<CategoryCount>
where
    I: IntoIterator<Item = &'a EmployeeRecord>,
{
    let mut slots: HashMap<&'a str, usize> = HashMap::new();
    let mut counts: Vec<CategoryCount> = Vec::new();

    for r in rows {
        let value = r.category(column);
        let slot = *slots.entry(value).or_insert_with(|| {
            counts.push(CategoryCount {
                category: value.to_string(),
                count: 0,
            });
            counts.len() - 1
        });
        counts[slot].count += 1;
    }

    counts
}

/// Like [`distribution`], sorted ascending by count. Ties keep first-seen order.
pub fn ranked_distribution<'a, I>(rows: I, column: CategoryColumn) -> Vec<CategoryCount>
where
    I: IntoIterator<Item = &'a EmployeeRecord>,
{
    let mut counts = distribution(rows, column);
    counts.sort_by_key(|c| c.count);
    counts
}

// ---------------------------------------------------------------------------
// Hire dates
// ---------------------------------------------------------------------------

/// How unparseable hire dates are treated by the year series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum DatePolicy {
    /// The first bad date fails the whole series.
    #[default]
    Strict,
    /// Bad dates are left out of the series and logged.
    Lenient,
}

const DAY_FIRST_DATES: [&str; 3] = ["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];
const TIME_SUFFIXES: [&str; 2] = [" %H:%M:%S", " %H:%M"];

/// Parse a hire date, day first. ISO `YYYY-MM-DD` is also accepted
/// since it cannot be read the other way round.
///
/// The year must have four digits: `%Y` alone would read `01/03/19` as
/// the year 19.
pub fn parse_hire_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    for date_fmt in DAY_FIRST_DATES.iter().chain(["%Y-%m-%d"].iter()) {
        if let Ok(date) = NaiveDate::parse_from_str(text, date_fmt) {
            return four_digit_year(date);
        }
        for time_fmt in TIME_SUFFIXES {
            let fmt = format!("{date_fmt}{time_fmt}");
            if let Ok(dt) = NaiveDateTime::parse_from_str(text, &fmt) {
                return four_digit_year(dt.date());
            }
        }
    }

    None
}

fn four_digit_year(date: NaiveDate) -> Option<NaiveDate> {
    (1000..=9999).contains(&date.year()).then_some(date)
}

pub fn hire_year(record: &EmployeeRecord) -> Result<i32, DateParseError> {
    parse_hire_date(&record.hire_date)
        .map(|d| d.year())
        .ok_or_else(|| DateParseError {
            employee_id: record.employee_id.clone(),
            value: record.hire_date.clone(),
        })
}

// ---------------------------------------------------------------------------
// Cumulative hiring series
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearTotal {
    pub year: i32,
    /// Hires within this calendar year.
    pub hires: usize,
    /// Hires in this and every earlier year of the series.
    pub cumulative_total: usize,
}

/// Hires bucketed by calendar year, ascending, with a running total.
pub fn cumulative_hires_by_year<'a, I>(
    rows: I,
    policy: DatePolicy,
) -> Result<Vec<YearTotal>, DateParseError>
where
    I: IntoIterator<Item = &'a EmployeeRecord>,
{
    let mut per_year: BTreeMap<i32, usize> = BTreeMap::new();
    let mut skipped = 0usize;

    for r in rows {
        match (hire_year(r), policy) {
            (Ok(year), _) => *per_year.entry(year).or_insert(0) += 1,
            (Err(e), DatePolicy::Strict) => return Err(e),
            (Err(e), DatePolicy::Lenient) => {
                log::warn!("Excluded from hiring series: {e}");
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        log::warn!("{skipped} row(s) left out of the hiring series");
    }

    Ok(per_year
        .into_iter()
        .scan(0usize, |running, (year, hires)| {
            *running += hires;
            Some(YearTotal {
                year,
                hires,
                cumulative_total: *running,
            })
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Salary distribution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SalaryPoint {
    pub department: String,
    pub salary: f64,
}

/// Every row as a `(department, salary)` pair, in row order.
pub fn salary_distribution<'a, I>(rows: I) -> Vec<SalaryPoint>
where
    I: IntoIterator<Item = &'a EmployeeRecord>,
{
    rows.into_iter()
        .map(|r| SalaryPoint {
            department: r.department.clone(),
            salary: r.salary,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::EmployeeId;

    fn rec(id: i64, dept: &str, gender: &str, time: &str, hired: &str) -> EmployeeRecord {
        EmployeeRecord {
            employee_id: EmployeeId::Integer(id),
            department: dept.into(),
            country: "US".into(),
            gender: gender.into(),
            time_type: TimeType::from_label(time),
            hire_date: hired.into(),
            salary: 1000.0 * id as f64,
        }
    }

    fn counts(pairs: &[(&str, usize)]) -> Vec<CategoryCount> {
        pairs
            .iter()
            .map(|&(c, n)| CategoryCount {
                category: c.into(),
                count: n,
            })
            .collect()
    }

    #[test]
    fn kpis_leave_other_time_types_out_of_buckets() {
        let rows = vec![
            rec(1, "Eng", "F", "Full time", "01/01/2020"),
            rec(2, "Eng", "M", "Part time", "01/01/2020"),
            rec(3, "Eng", "M", "Contract", "01/01/2020"),
            rec(4, "Eng", "F", "full time", "01/01/2020"),
        ];
        let kpis = kpi_counts(&rows);
        assert_eq!(
            kpis,
            KpiCounts {
                total: 4,
                full_time: 1,
                part_time: 1
            }
        );
        assert!(kpis.full_time + kpis.part_time <= kpis.total);
    }

    #[test]
    fn kpis_of_nothing_are_zero() {
        let rows: Vec<EmployeeRecord> = Vec::new();
        assert_eq!(kpi_counts(&rows), KpiCounts::default());
    }

    #[test]
    fn distribution_keeps_first_appearance_order() {
        let rows = vec![
            rec(1, "Sales", "M", "Full time", "01/01/2020"),
            rec(2, "Eng", "F", "Full time", "01/01/2020"),
            rec(3, "Eng", "F", "Full time", "01/01/2020"),
            rec(4, "HR", "M", "Full time", "01/01/2020"),
            rec(5, "Eng", "X", "Full time", "01/01/2020"),
        ];
        assert_eq!(
            distribution(&rows, CategoryColumn::Department),
            counts(&[("Sales", 1), ("Eng", 3), ("HR", 1)])
        );
        let genders = distribution(&rows, CategoryColumn::Gender);
        assert_eq!(genders, counts(&[("M", 2), ("F", 2), ("X", 1)]));
        assert_eq!(genders.iter().map(|c| c.count).sum::<usize>(), rows.len());
    }

    #[test]
    fn ranked_distribution_is_stable_ascending() {
        let rows = vec![
            rec(1, "Eng", "F", "Full time", "01/01/2020"),
            rec(2, "Eng", "F", "Full time", "01/01/2020"),
            rec(3, "Sales", "F", "Full time", "01/01/2020"),
            rec(4, "HR", "F", "Full time", "01/01/2020"),
        ];
        assert_eq!(
            ranked_distribution(&rows, CategoryColumn::Department),
            counts(&[("Sales", 1), ("HR", 1), ("Eng", 2)])
        );
    }

    #[test]
    fn hire_dates_are_day_first() {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day);
        assert_eq!(parse_hire_date("01/03/2019"), d(2019, 3, 1));
        assert_eq!(parse_hire_date("1/3/2019"), d(2019, 3, 1));
        assert_eq!(parse_hire_date("15-06-2019"), d(2019, 6, 15));
        assert_eq!(parse_hire_date("15.06.2019"), d(2019, 6, 15));
        assert_eq!(parse_hire_date("15/06/2019 08:30"), d(2019, 6, 15));
        assert_eq!(parse_hire_date(" 15/06/2019 08:30:05 "), d(2019, 6, 15));
        assert_eq!(parse_hire_date("2019-06-15"), d(2019, 6, 15));
    }

    #[test]
    fn month_first_and_garbage_dates_are_rejected() {
        assert_eq!(parse_hire_date("06/15/2019"), None);
        assert_eq!(parse_hire_date("31/02/2019"), None);
        assert_eq!(parse_hire_date("yesterday"), None);
        assert_eq!(parse_hire_date(""), None);
    }

    #[test]
    fn short_years_are_rejected() {
        assert_eq!(parse_hire_date("01/03/19"), None);
        assert_eq!(parse_hire_date("01-03-019"), None);
        assert_eq!(parse_hire_date("01.03.19 09:30"), None);
        assert_eq!(parse_hire_date("19-03-01"), None);
    }

    #[test]
    fn strict_policy_fails_on_short_year_instead_of_bucketing_it() {
        let rows = vec![
            rec(1, "Eng", "F", "Full time", "15/06/2019"),
            rec(2, "Eng", "F", "Full time", "01/03/19"),
        ];
        let err = cumulative_hires_by_year(&rows, DatePolicy::Strict).unwrap_err();
        assert_eq!(err.employee_id, EmployeeId::Integer(2));
        assert_eq!(err.value, "01/03/19");

        let series = cumulative_hires_by_year(&rows, DatePolicy::Lenient).unwrap();
        assert_eq!(
            series,
            [YearTotal {
                year: 2019,
                hires: 1,
                cumulative_total: 1
            }]
        );
    }

    #[test]
    fn cumulative_series_is_a_prefix_sum_over_years() {
        let rows = vec![
            rec(1, "Eng", "F", "Full time", "31/12/2020"),
            rec(2, "Eng", "F", "Full time", "01/03/2018"),
            rec(3, "Eng", "F", "Full time", "01/01/2020"),
            rec(4, "Eng", "F", "Full time", "15/07/2021"),
            rec(5, "Eng", "F", "Full time", "02/03/2018"),
        ];
        let series = cumulative_hires_by_year(&rows, DatePolicy::Strict).unwrap();
        assert_eq!(
            series,
            [
                YearTotal { year: 2018, hires: 2, cumulative_total: 2 },
                YearTotal { year: 2020, hires: 2, cumulative_total: 4 },
                YearTotal { year: 2021, hires: 1, cumulative_total: 5 },
            ]
        );
        assert!(series.windows(2).all(|w| w[1].cumulative_total >= w[0].cumulative_total));
        assert_eq!(series.last().map(|y| y.cumulative_total), Some(rows.len()));
    }

    #[test]
    fn strict_policy_fails_on_bad_date() {
        let rows = vec![
            rec(1, "Eng", "F", "Full time", "01/01/2020"),
            rec(2, "Eng", "F", "Full time", "2020/13/45"),
        ];
        let err = cumulative_hires_by_year(&rows, DatePolicy::Strict).unwrap_err();
        assert_eq!(err.employee_id, EmployeeId::Integer(2));
        assert_eq!(err.value, "2020/13/45");
    }

    #[test]
    fn lenient_policy_skips_bad_dates() {
        let rows = vec![
            rec(1, "Eng", "F", "Full time", "01/01/2020"),
            rec(2, "Eng", "F", "Full time", "not a date"),
            rec(3, "Eng", "F", "Full time", "05/05/2020"),
        ];
        let series = cumulative_hires_by_year(&rows, DatePolicy::Lenient).unwrap();
        assert_eq!(
            series,
            [YearTotal { year: 2020, hires: 2, cumulative_total: 2 }]
        );
        assert_eq!(kpi_counts(&rows).total, 3);
    }

    #[test]
    fn empty_rows_give_empty_series() {
        let rows: Vec<EmployeeRecord> = Vec::new();
        assert!(cumulative_hires_by_year(&rows, DatePolicy::Strict)
            .unwrap()
            .is_empty());
        assert!(distribution(&rows, CategoryColumn::Country).is_empty());
        assert!(salary_distribution(&rows).is_empty());
    }

    #[test]
    fn salary_pairs_keep_every_row() {
        let rows = vec![
            rec(2, "Eng", "F", "Full time", "01/01/2020"),
            rec(1, "Sales", "F", "Full time", "01/01/2020"),
            rec(3, "Eng", "F", "Full time", "01/01/2020"),
        ];
        let pairs = salary_distribution(&rows);
        let flat: Vec<(&str, f64)> = pairs
            .iter()
            .map(|p| (p.department.as_str(), p.salary))
            .collect();
        assert_eq!(flat, [("Eng", 2000.0), ("Sales", 1000.0), ("Eng", 3000.0)]);
    }
}

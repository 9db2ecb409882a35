use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::color::ColorMap;
use crate::data::aggregate::{CategoryCount, KpiCounts, SalaryPoint, YearTotal};
use crate::state::AppState;

const CHART_HEIGHT: f32 = 260.0;
const SALARY_BINS: usize = 20;

// ---------------------------------------------------------------------------
// Dashboard (central panel)
// ---------------------------------------------------------------------------

/// Render the KPI row and every chart from the current derived views.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let Some(views) = &state.views else {
        ui.centered_and_justified(|ui: &mut Ui| {
            let msg = if state.table.is_some() {
                "No data for the current selection"
            } else {
                "No data loaded  (check the path and press Reload)"
            };
            ui.heading(msg);
        });
        return;
    };

    kpi_row(ui, &views.kpis);
    ui.separator();

    ui.columns(3, |cols: &mut [Ui]| {
        share_chart(&mut cols[0], "gender", "Gender distribution", &views.gender, None);
        country_chart(&mut cols[1], &views.country, &state.country_colors);
        share_chart(
            &mut cols[2],
            "department",
            "Employees by department",
            &views.department,
            Some(&state.department_colors),
        );
    });

    ui.columns(2, |cols: &mut [Ui]| {
        hires_chart(&mut cols[0], &views.cumulative_hires);
        salary_chart(&mut cols[1], &views.salaries, &state.department_colors);
    });
}

fn kpi_row(ui: &mut Ui, kpis: &KpiCounts) {
    let tiles = [
        ("Total employees", kpis.total),
        ("Full-time", kpis.full_time),
        ("Part-time", kpis.part_time),
    ];
    ui.columns(tiles.len(), |cols: &mut [Ui]| {
        for (col, (label, value)) in cols.iter_mut().zip(tiles) {
            col.vertical_centered(|ui: &mut Ui| {
                ui.label(RichText::new(label).strong());
                ui.heading(value.to_string());
            });
        }
    });
}

fn chart_title(ui: &mut Ui, title: &str) {
    ui.label(RichText::new(title).strong());
}

// ---------------------------------------------------------------------------
// Individual charts
// ---------------------------------------------------------------------------

/// Category shares as percentage bars, in the order given.
fn share_chart(
    ui: &mut Ui,
    id: &str,
    title: &str,
    counts: &[CategoryCount],
    colors: Option<&ColorMap>,
) {
    chart_title(ui, title);
    let total: usize = counts.iter().map(|c| c.count).sum();
    let fallback = ColorMap::new(&counts.iter().map(|c| c.category.clone()).collect::<Vec<_>>());
    let colors = colors.unwrap_or(&fallback);

    let bars: Vec<Bar> = counts
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let pct = percent(c.count, total);
            Bar::new(i as f64, pct)
                .name(format!("{} ({pct:.1}%)", c.category))
                .fill(colors.color_for(&c.category))
        })
        .collect();

    let labels = category_labels(counts);
    Plot::new(id)
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .y_axis_label("%")
        .x_axis_formatter(move |mark, _range| label_at(&labels, mark.value))
        .show(ui, |plot_ui| plot_ui.bar_chart(BarChart::new(bars)));
}

/// Horizontal bars, one per country, ascending by headcount.
fn country_chart(ui: &mut Ui, counts: &[CategoryCount], colors: &ColorMap) {
    chart_title(ui, "Employees by country");
    let bars: Vec<Bar> = counts
        .iter()
        .enumerate()
        .map(|(i, c)| {
            Bar::new(i as f64, c.count as f64)
                .name(&c.category)
                .fill(colors.color_for(&c.category))
        })
        .collect();

    let labels = category_labels(counts);
    Plot::new("country")
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .x_axis_label("Employees")
        .y_axis_formatter(move |mark, _range| label_at(&labels, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal())
        });
}

/// Running headcount per hire year.
fn hires_chart(ui: &mut Ui, series: &[YearTotal]) {
    chart_title(ui, "Total employees per year");
    let bars: Vec<Bar> = series
        .iter()
        .map(|y| {
            Bar::new(y.year as f64, y.cumulative_total as f64)
                .name(format!("{} (+{})", y.year, y.hires))
                .width(0.8)
        })
        .collect();

    Plot::new("hires")
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .x_axis_label("Hire year")
        .y_axis_label("Employees")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(Color32::LIGHT_BLUE))
        });
}

/// Salary histogram, one stacked series per department.
fn salary_chart(ui: &mut Ui, salaries: &[SalaryPoint], colors: &ColorMap) {
    chart_title(ui, "Compensation distribution by department");
    let histogram = salary_histogram(salaries, SALARY_BINS);
    let width = histogram.bin_width();

    let mut charts: Vec<BarChart> = Vec::new();
    for (department, counts) in &histogram.per_department {
        let bars: Vec<Bar> = counts
            .iter()
            .enumerate()
            .filter(|&(_, &n)| n > 0)
            .map(|(bin, &n)| {
                Bar::new(histogram.bin_center(bin), n as f64)
                    .width(width * 0.95)
                    .name(department)
            })
            .collect();
        let chart = BarChart::new(bars)
            .name(department)
            .color(colors.color_for(department));
        let chart = {
            let below: Vec<&BarChart> = charts.iter().collect();
            chart.stack_on(&below)
        };
        charts.push(chart);
    }

    Plot::new("salary")
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .legend(Legend::default())
        .x_axis_label("Salary")
        .y_axis_label("Employees")
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 * 100.0 / total as f64
    }
}

fn category_labels(counts: &[CategoryCount]) -> Vec<String> {
    counts.iter().map(|c| c.category.clone()).collect()
}

/// Axis label for an integer grid position; blank between categories.
fn label_at(labels: &[String], value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Salary bucketing
// ---------------------------------------------------------------------------

/// Equal-width salary bins shared by every department.
#[derive(Debug, Clone, PartialEq)]
pub struct SalaryHistogram {
    /// `bins + 1` ascending edges.
    pub edges: Vec<f64>,
    /// Count per bin for each department, by first appearance.
    pub per_department: Vec<(String, Vec<usize>)>,
}

impl SalaryHistogram {
    pub fn bin_width(&self) -> f64 {
        match self.edges.as_slice() {
            [first, second, ..] => second - first,
            _ => 1.0,
        }
    }

    pub fn bin_center(&self, bin: usize) -> f64 {
        self.edges[bin] + self.bin_width() / 2.0
    }
}

/// Bucket salaries into `bins` equal-width bins spanning min..=max.
/// The maximum lands in the last bin.
pub fn salary_histogram(points: &[SalaryPoint], bins: usize) -> SalaryHistogram {
    let bins = bins.max(1);
    let min = points.iter().map(|p| p.salary).fold(f64::INFINITY, f64::min);
    let max = points.iter().map(|p| p.salary).fold(f64::NEG_INFINITY, f64::max);
    if points.is_empty() {
        return SalaryHistogram {
            edges: Vec::new(),
            per_department: Vec::new(),
        };
    }

    let span = if max > min { max - min } else { 1.0 };
    let width = span / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|i| min + i as f64 * width).collect();

    let mut per_department: Vec<(String, Vec<usize>)> = Vec::new();
    for p in points {
        let bin = (((p.salary - min) / width) as usize).min(bins - 1);
        let slot = match per_department.iter().position(|(d, _)| *d == p.department) {
            Some(i) => i,
            None => {
                per_department.push((p.department.clone(), vec![0; bins]));
                per_department.len() - 1
            }
        };
        per_department[slot].1[bin] += 1;
    }

    SalaryHistogram {
        edges,
        per_department,
    }
}

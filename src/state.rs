use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use crate::color::ColorMap;
use crate::data::cache::TableCache;
use crate::data::model::CategoryColumn;
use crate::data::{DatePolicy, DerivedViews, EmployeeTable, FilterSelection};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Where the table comes from.
    pub source: PathBuf,

    pub date_policy: DatePolicy,

    cache: TableCache,

    /// Loaded table (None only if every load so far failed).
    pub table: Option<Arc<EmployeeTable>>,

    /// Currently selected departments / countries.
    pub selection: FilterSelection,

    /// Views for `views_for`, recomputed only when the selection changes.
    pub views: Option<DerivedViews>,
    views_for: Option<FilterSelection>,

    /// Department colours, shared by every chart.
    pub department_colors: ColorMap,

    /// Country colours.
    pub country_colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(source: PathBuf, date_policy: DatePolicy) -> Self {
        Self {
            source,
            date_policy,
            cache: TableCache::new(),
            table: None,
            selection: FilterSelection::default(),
            views: None,
            views_for: None,
            department_colors: ColorMap::default(),
            country_colors: ColorMap::default(),
            status_message: None,
        }
    }

    /// Load (or fetch from cache) the configured source.
    pub fn load(&mut self) -> anyhow::Result<()> {
        let table = self.cache.get_or_load(&self.source)?;
        self.set_table(table);
        Ok(())
    }

    /// Drop the cached table and read the source again. On failure the
    /// previous table stays in place.
    pub fn reload(&mut self) {
        self.cache.invalidate(&self.source);
        if let Err(e) = self.load() {
            log::error!("Failed to reload {}: {e:#}", self.source.display());
            self.status_message = Some(format!("Error: {e:#}"));
        }
    }

    /// Ingest a newly loaded table and rebuild colours. The first table
    /// starts fully selected; later ones inherit the current choices.
    pub fn set_table(&mut self, table: Arc<EmployeeTable>) {
        self.selection = match &self.table {
            Some(previous) => self.selection.carried_over(previous, &table),
            None => FilterSelection::all(&table),
        };
        self.department_colors = ColorMap::new(&table.departments);
        self.country_colors = ColorMap::new(&table.countries);
        self.table = Some(table);
        self.views_for = None;
        self.status_message = None;
        self.refresh();
    }

    /// Recompute the derived views if the selection moved since last time.
    pub fn refresh(&mut self) {
        let Some(table) = &self.table else {
            return;
        };
        if self.views_for.as_ref() == Some(&self.selection) {
            return;
        }

        match DerivedViews::compute(table, &self.selection, self.date_policy) {
            Ok(views) => {
                self.views = Some(views);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Cannot build hiring series: {e}");
                self.views = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
        self.views_for = Some(self.selection.clone());
    }

    fn selected_mut(&mut self, column: CategoryColumn) -> Option<&mut BTreeSet<String>> {
        match column {
            CategoryColumn::Department => Some(&mut self.selection.departments),
            CategoryColumn::Country => Some(&mut self.selection.countries),
            CategoryColumn::Gender => None,
        }
    }

    /// Toggle a single value in a column's filter.
    pub fn toggle_filter_value(&mut self, column: CategoryColumn, value: &str) {
        if let Some(selected) = self.selected_mut(column) {
            if !selected.remove(value) {
                selected.insert(value.to_string());
            }
        }
        self.refresh();
    }

    /// Select all values in a column.
    pub fn select_all(&mut self, column: CategoryColumn) {
        let Some(table) = self.table.clone() else {
            return;
        };
        let all = match column {
            CategoryColumn::Department => &table.departments,
            CategoryColumn::Country => &table.countries,
            CategoryColumn::Gender => return,
        };
        if let Some(selected) = self.selected_mut(column) {
            *selected = all.iter().cloned().collect();
        }
        self.refresh();
    }

    /// Deselect all values in a column.
    pub fn select_none(&mut self, column: CategoryColumn) {
        if let Some(selected) = self.selected_mut(column) {
            selected.clear();
        }
        self.refresh();
    }
}

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::CategoryColumn;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(table) = state.table.clone() else {
        ui.label("No data loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            filter_group(ui, state, CategoryColumn::Department, &table.departments);
            ui.separator();
            filter_group(ui, state, CategoryColumn::Country, &table.countries);
        });
}

/// One collapsible checklist with All / None buttons.
fn filter_group(ui: &mut Ui, state: &mut AppState, column: CategoryColumn, all_values: &[String]) {
    let selected = match column {
        CategoryColumn::Department => &state.selection.departments,
        _ => &state.selection.countries,
    };
    let header_text = format!(
        "{}  ({}/{})",
        column.column_name(),
        selected.len(),
        all_values.len()
    );

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(column.column_name())
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all(column);
                }
                if ui.small_button("None").clicked() {
                    state.select_none(column);
                }
            });

            let colors = match column {
                CategoryColumn::Department => &state.department_colors,
                _ => &state.country_colors,
            };
            let selected = match column {
                CategoryColumn::Department => &state.selection.departments,
                _ => &state.selection.countries,
            };

            let mut toggled = None;
            for value in all_values {
                let mut checked = selected.contains(value);
                let text = RichText::new(value).color(colors.color_for(value));
                if ui.checkbox(&mut checked, text).changed() {
                    toggled = Some(value.clone());
                }
            }
            if let Some(value) = toggled {
                state.toggle_filter_value(column, &value);
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        if ui.button("⟳ Reload").clicked() {
            state.reload();
        }

        ui.separator();
        ui.label(state.source.display().to_string());

        if let (Some(table), Some(views)) = (&state.table, &state.views) {
            ui.separator();
            ui.label(format!(
                "{} employees loaded, {} selected",
                table.len(),
                views.rows_by_both
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

use anyhow::{Context, Result};
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::charts::{ChartSet, ChartTab};
use crate::data::filter::Selection;
use crate::data::loader::{Upload, ACCEPTED_EXTENSIONS};
use crate::state::{AppState, Event, Phase};

// ---------------------------------------------------------------------------
// Left side panel – upload and state selection
// ---------------------------------------------------------------------------

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("1) Upload Dataset");
    ui.separator();

    if ui
        .button("Upload spreadsheet…")
        .on_hover_text(
            "File must include: State, Number in Poverty, Number of Millionaires, State Population",
        )
        .clicked()
    {
        open_file_dialog(state);
    }

    if let Some(ds) = state.phase().dataset() {
        if ds.is_empty() {
            ui.colored_label(Color32::YELLOW, format!("{}: no complete rows", ds.source));
        } else {
            ui.label(format!("{} ({} states)", ds.source, ds.len()));
        }
        if ds.dropped_rows > 0 {
            ui.label(
                RichText::new(format!("{} incomplete row(s) skipped", ds.dropped_rows))
                    .small()
                    .weak(),
            );
        }
    }

    ui.add_space(8.0);
    ui.heading("2) State Selection");
    ui.separator();

    let (Some(dataset), Some(selection)) = (
        state.phase().dataset().cloned(),
        state.phase().selection().cloned(),
    ) else {
        ui.label("No dataset loaded.");
        return;
    };

    let min = state.config.min_selection;
    ui.label(format!(
        "Choose at least {min} states  ({}/{})",
        selection.len(),
        dataset.state_names().len()
    ));

    let mut next: Option<Selection> = None;

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            next = Some(Selection::new(dataset.state_names()));
        }
        if ui.small_button("Default").clicked() {
            next = Some(Selection::default_for(&dataset, state.config.default_selection));
        }
        if ui
            .add_enabled(!selection.is_empty(), egui::Button::new("None").small())
            .clicked()
        {
            next = Some(Selection::default());
        }
    });

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for name in dataset.state_names() {
                let mut checked = selection.contains(name);
                if ui.checkbox(&mut checked, name).changed() {
                    next = Some(selection.toggled(name));
                }
            }
        });

    if let Some(selection) = next {
        state.handle(Event::SelectionChanged(selection.states().to_vec()));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu, view tabs and status line.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let charts = state.phase().charts().cloned();
            if ui
                .add_enabled(charts.is_some(), egui::Button::new("Export charts…"))
                .clicked()
            {
                if let Some(charts) = charts {
                    export_dialog(state, &charts);
                }
                ui.close_menu();
            }
            if ui.button("Close dataset").clicked() {
                state.handle(Event::Reset);
                ui.close_menu();
            }
        });

        ui.separator();

        for tab in ChartTab::ALL {
            if ui
                .selectable_label(state.active_tab == tab, tab.title())
                .clicked()
            {
                state.active_tab = tab;
            }
        }

        ui.separator();

        match state.phase() {
            Phase::Failed { message } => {
                ui.label(RichText::new(message).color(Color32::RED));
            }
            Phase::AwaitingSelection { .. } => {
                ui.label(RichText::new(state.selection_prompt()).color(Color32::YELLOW));
            }
            _ => {}
        }

        if let Some(msg) = &state.status_message {
            ui.label(msg);
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Upload povertymillionaires.xlsx")
        .add_filter("Spreadsheets", ACCEPTED_EXTENSIONS)
        .add_filter("Excel", &["xlsx", "xlsm", "xlsb", "xls"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        let event = match Upload::from_path(&path) {
            Ok(upload) => Event::FileUploaded(upload),
            Err(e) => Event::UploadFailed(format!("{e:#}")),
        };
        state.handle(event);
    }
}

fn export_dialog(state: &mut AppState, charts: &ChartSet) {
    let file = rfd::FileDialog::new()
        .set_title("Export charts")
        .add_filter("JSON", &["json"])
        .set_file_name("charts.json")
        .save_file();

    if let Some(path) = file {
        state.status_message = Some(match write_charts(&path, charts) {
            Ok(()) => {
                log::info!("Exported charts to {}", path.display());
                format!("Exported charts to {}", path.display())
            }
            Err(e) => {
                log::error!("Failed to export charts: {e:#}");
                format!("Export failed: {e:#}")
            }
        });
    }
}

fn write_charts(path: &std::path::Path, charts: &ChartSet) -> Result<()> {
    let json = serde_json::to_string_pretty(charts).context("serializing charts")?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}

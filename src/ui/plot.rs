use eframe::egui::{pos2, vec2, Align2, Color32, FontId, Rect, RichText, Sense, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::charts::{ChartTab, ChoroplethMap, GroupedBarChart, HorizontalBarChart};
use crate::color::{hex_color, viridis, ColorScale};
use crate::data::states::{GRID_COLS, GRID_ROWS, US_STATES};
use crate::state::{AppState, Phase};

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the active view, or the reason nothing can be drawn yet.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    let charts = match state.phase() {
        Phase::AwaitingFile => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Upload povertymillionaires.xlsx to begin  (File → Open…)");
            });
            return;
        }
        Phase::Failed { message } => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading(RichText::new(message).color(Color32::RED));
            });
            return;
        }
        Phase::AwaitingSelection { .. } => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading(RichText::new(state.selection_prompt()).color(Color32::YELLOW));
            });
            return;
        }
        Phase::Rendered { charts, .. } => charts,
    };

    match state.active_tab {
        ChartTab::PovertyVsMillionaires => {
            ui.heading("Q1: Compare Poverty vs Millionaires by State");
            grouped_bar_plot(ui, &charts.comparison);
        }
        ChartTab::DensityMap => {
            ui.heading("Q2: Millionaire Density Across U.S. States");
            density_map(ui, &charts.density_map);
        }
        ChartTab::PovertyRate => {
            ui.heading("Q3: Poverty Rate Across Selected States");
            poverty_rate_plot(ui, &charts.poverty_rate);
        }
    }
}

/// Tick label for an integer position on a categorical axis.
fn category_label(categories: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    categories.get(idx as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Grouped bars
// ---------------------------------------------------------------------------

fn grouped_bar_plot(ui: &mut Ui, chart: &GroupedBarChart) {
    ui.label(chart.title);

    let categories = chart.categories.clone();
    let n_series = chart.series.len() as f64;

    Plot::new("poverty_vs_millionaires")
        .legend(Legend::default())
        .y_axis_label(chart.y_label)
        .x_axis_formatter(move |mark, _range| category_label(&categories, mark.value))
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (i, series) in chart.series.iter().enumerate() {
                // Centre the group of bars on the category position.
                let offset = (i as f64 - (n_series - 1.0) / 2.0) * chart.bar_width;
                let bars: Vec<Bar> = series
                    .values
                    .iter()
                    .enumerate()
                    .filter(|(_, v)| v.is_finite())
                    .map(|(x, &v)| {
                        Bar::new(x as f64 + offset, v)
                            .width(chart.bar_width)
                            .name(&chart.categories[x])
                    })
                    .collect();

                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .name(series.name)
                        .color(hex_color(series.color)),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Horizontal bars
// ---------------------------------------------------------------------------

fn poverty_rate_plot(ui: &mut Ui, chart: &HorizontalBarChart) {
    ui.label(chart.title);

    let labels: Vec<String> = chart.bars.iter().map(|b| b.label.clone()).collect();
    let bars: Vec<Bar> = chart
        .bars
        .iter()
        .enumerate()
        .filter(|(_, b)| b.value.is_finite())
        .map(|(y, b)| Bar::new(y as f64, b.value).width(0.6).name(&b.label))
        .collect();

    Plot::new("poverty_rate")
        .x_axis_label(chart.x_label)
        .y_axis_label(chart.y_label)
        .y_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .allow_drag(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .horizontal()
                    .name(chart.x_label)
                    .color(hex_color(chart.color)),
            );
        });
}

// ---------------------------------------------------------------------------
// Choropleth (tile grid)
// ---------------------------------------------------------------------------

fn density_map(ui: &mut Ui, map: &ChoroplethMap) {
    ui.label(map.title);

    let scale = map.domain.map(|[lo, hi]| ColorScale::new(lo, hi));
    let tile = (ui.available_width() / GRID_COLS as f32).clamp(24.0, 64.0);
    let (area, _) = ui.allocate_exact_size(
        vec2(tile * GRID_COLS as f32, tile * GRID_ROWS as f32),
        Sense::hover(),
    );

    for us in &US_STATES {
        let rect = Rect::from_min_size(
            pos2(
                area.min.x + us.col as f32 * tile,
                area.min.y + us.row as f32 * tile,
            ),
            vec2(tile, tile),
        )
        .shrink(2.0);

        let region = map.region_at(us.code);
        let shade = match (region, scale) {
            (Some(r), Some(scale)) if r.value.is_finite() => Some(scale.normalize(r.value)),
            _ => None,
        };
        let fill = shade.map(viridis).unwrap_or(Color32::from_gray(60));
        let text_color = match shade {
            Some(t) if t > 0.6 => Color32::BLACK,
            _ => Color32::WHITE,
        };

        let painter = ui.painter();
        painter.rect_filled(rect, 3.0, fill);
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            us.code,
            FontId::proportional(tile * 0.28),
            text_color,
        );

        ui.interact(rect, ui.id().with(us.code), Sense::hover())
            .on_hover_ui(|ui: &mut Ui| match region {
                Some(r) => {
                    ui.strong(&r.state);
                    ui.label(format!("Number of Millionaires: {:.0}", r.hover.millionaires));
                    ui.label(format!("State Population: {:.0}", r.hover.population));
                    ui.label(format!("{}: {:.5}", map.color_field, r.hover.density));
                }
                None => {
                    ui.strong(us.name);
                    ui.label("No data");
                }
            });
    }

    ui.add_space(8.0);
    if let Some(scale) = scale {
        color_bar(ui, map.color_field, scale);
    }

    let unmatched = map.unmatched();
    if !unmatched.is_empty() {
        ui.label(
            RichText::new(format!(
                "Not shown on map (unrecognized state): {}",
                unmatched.join(", ")
            ))
            .weak(),
        );
    }
}

fn color_bar(ui: &mut Ui, label: &str, scale: ColorScale) {
    const STEPS: usize = 64;
    ui.horizontal(|ui: &mut Ui| {
        ui.label(format!("{:.5}", scale.min));
        let (rect, _) = ui.allocate_exact_size(vec2(240.0, 14.0), Sense::hover());
        let step = rect.width() / STEPS as f32;
        for i in 0..STEPS {
            let segment = Rect::from_min_size(
                pos2(rect.min.x + i as f32 * step, rect.min.y),
                vec2(step + 0.5, rect.height()),
            );
            ui.painter()
                .rect_filled(segment, 0.0, viridis(i as f64 / (STEPS - 1) as f64));
        }
        ui.label(format!("{:.5}", scale.max));
        ui.label(RichText::new(label).weak());
    });
}

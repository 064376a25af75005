use std::cmp::Ordering;

use serde::Serialize;

use crate::color::{MILLIONAIRES_COLOR, POVERTY_COLOR, POVERTY_RATE_COLOR};
use crate::data::filter::{filtered_records, Selection};
use crate::data::model::{Dataset, Record};
use crate::data::states;

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// The three named views, one chart each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartTab {
    #[default]
    PovertyVsMillionaires,
    DensityMap,
    PovertyRate,
}

impl ChartTab {
    pub const ALL: [ChartTab; 3] = [
        ChartTab::PovertyVsMillionaires,
        ChartTab::DensityMap,
        ChartTab::PovertyRate,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ChartTab::PovertyVsMillionaires => "Poverty vs Millionaires",
            ChartTab::DensityMap => "Millionaire Density Map",
            ChartTab::PovertyRate => "Poverty Rate",
        }
    }
}

// ---------------------------------------------------------------------------
// Chart specifications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub name: &'static str,
    pub color: &'static str,
    /// One value per category.
    pub values: Vec<f64>,
}

/// Side-by-side bars per state, one bar per series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedBarChart {
    pub title: &'static str,
    pub y_label: &'static str,
    pub bar_width: f64,
    pub categories: Vec<String>,
    pub series: Vec<BarSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionHover {
    pub millionaires: f64,
    pub population: f64,
    pub density: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapRegion {
    pub state: String,
    /// USPS code, `None` when the name is not a recognized state.
    pub location: Option<&'static str>,
    pub value: f64,
    pub hover: RegionHover,
}

/// One region per dataset row, coloured by millionaire density.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethMap {
    pub title: &'static str,
    pub color_field: &'static str,
    pub color_scale: &'static str,
    /// Finite min/max of the coloured values; `None` when nothing is finite.
    pub domain: Option<[f64; 2]>,
    pub regions: Vec<MapRegion>,
}

impl ChoroplethMap {
    /// States kept in the chart that cannot be placed on the map.
    pub fn unmatched(&self) -> Vec<&str> {
        self.regions
            .iter()
            .filter(|r| r.location.is_none())
            .map(|r| r.state.as_str())
            .collect()
    }

    pub fn region_at(&self, code: &str) -> Option<&MapRegion> {
        self.regions.iter().find(|r| r.location == Some(code))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HorizontalBar {
    pub label: String,
    pub value: f64,
}

/// One horizontal bar per state, bottom to top in `bars` order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HorizontalBarChart {
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub color: &'static str,
    pub bars: Vec<HorizontalBar>,
}

/// Everything the dashboard draws for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSet {
    pub comparison: GroupedBarChart,
    pub density_map: ChoroplethMap,
    pub poverty_rate: HorizontalBarChart,
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Build all three charts. The map always covers the whole dataset; the two
/// bar charts only the selected states.
pub fn build_charts(dataset: &Dataset, selection: &Selection) -> ChartSet {
    let view = filtered_records(dataset, selection);
    ChartSet {
        comparison: grouped_bar_chart(&view),
        density_map: choropleth_map(dataset),
        poverty_rate: poverty_rate_chart(&view),
    }
}

pub fn grouped_bar_chart(view: &[&Record]) -> GroupedBarChart {
    GroupedBarChart {
        title: "Poverty vs Millionaire Population by State",
        y_label: "Population Count",
        bar_width: 0.35,
        categories: view.iter().map(|r| r.state.clone()).collect(),
        series: vec![
            BarSeries {
                name: "Number in Poverty",
                color: POVERTY_COLOR,
                values: view.iter().map(|r| r.number_in_poverty).collect(),
            },
            BarSeries {
                name: "Number of Millionaires",
                color: MILLIONAIRES_COLOR,
                values: view.iter().map(|r| r.number_of_millionaires).collect(),
            },
        ],
    }
}

pub fn choropleth_map(dataset: &Dataset) -> ChoroplethMap {
    let regions: Vec<MapRegion> = dataset
        .records
        .iter()
        .map(|r| MapRegion {
            state: r.state.clone(),
            location: states::lookup(&r.state).map(|s| s.code),
            value: r.millionaire_density,
            hover: RegionHover {
                millionaires: r.number_of_millionaires,
                population: r.state_population,
                density: r.millionaire_density,
            },
        })
        .collect();

    let domain = regions
        .iter()
        .map(|r| r.value)
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<[f64; 2]>, v| match acc {
            None => Some([v, v]),
            Some([lo, hi]) => Some([lo.min(v), hi.max(v)]),
        });

    ChoroplethMap {
        title: "Millionaire Density (Millionaires / State Population)",
        color_field: "Millionaire Density",
        color_scale: "Viridis",
        domain,
        regions,
    }
}

pub fn poverty_rate_chart(view: &[&Record]) -> HorizontalBarChart {
    let mut sorted: Vec<&Record> = view.to_vec();
    sorted.sort_by(|a, b| by_rate_undefined_last(a.poverty_rate, b.poverty_rate));

    HorizontalBarChart {
        title: "Poverty Rate Across Selected States",
        x_label: "Poverty Rate",
        y_label: "State",
        color: POVERTY_RATE_COLOR,
        bars: sorted
            .into_iter()
            .map(|r| HorizontalBar {
                label: r.state.clone(),
                value: r.poverty_rate,
            })
            .collect(),
    }
}

/// Ascending, with undefined ratios (`0 / 0`) after every number.
fn by_rate_undefined_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (nan_a, nan_b) => nan_a.cmp(&nan_b),
    }
}

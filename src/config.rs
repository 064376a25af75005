/// Dashboard defaults. There is no config file or environment lookup; the
/// values live here and in `main`'s window options.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Fewest distinct states that unlock the charts.
    pub min_selection: usize,
    /// How many leading states are pre-selected after an upload.
    pub default_selection: usize,
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            min_selection: 5,
            default_selection: 5,
            window_size: [1280.0, 820.0],
            min_window_size: [720.0, 480.0],
        }
    }
}

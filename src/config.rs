//! Configuration and constants for the dashboard.

/// Default input files, resolved relative to the working directory.
pub const DEFAULT_ADVERTISERS_PATH: &str = "advertisers.csv";
pub const DEFAULT_RESULTS_PATH: &str = "merged_data.csv";
pub const DEFAULT_EXPORT_PATH: &str = "dashboard.json";

pub const DASHBOARD_TITLE: &str = "General Election 2024 Dashboard";

/// Selection value meaning "no drill-down".
pub const ALL_LABEL: &str = "All";

/// Number of advertisers shown on the ad-spend chart.
pub const TOP_ADVERTISERS: usize = 10;

/// Rows shown per chart in console previews.
pub const DEFAULT_PREVIEW_ROWS: usize = 10;

// Column headers of `advertisers.csv`
pub const AD_COLUMNS: &[&str] = &["Page name", "Amount spent (INR)", "Number of ads in Library"];

// Column headers of `merged_data.csv`
pub const RESULT_COLUMNS: &[&str] = &[
    "State",
    "PC_Name",
    "Total Electors",
    "Polled (%)",
    "Total Votes",
    "Phase",
    "Amount spent (INR)",
];

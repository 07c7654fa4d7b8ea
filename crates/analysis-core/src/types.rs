use serde::{Deserialize, Serialize};

/// Annual financial history for one company, oldest year first.
///
/// All series run parallel to `periods`. The store hands this to the
/// analysis engine; only the trailing ten entries of each series are
/// consumed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialHistory {
    pub symbol: String,
    /// Fiscal years, chronological
    pub periods: Vec<i32>,
    pub revenue: Vec<f64>,
    pub eps_diluted: Vec<f64>,
    pub total_equity: Vec<f64>,
    /// Cash flow from operations
    pub cf_cfo: Vec<f64>,
    /// PP&E purchases (negative outflows); added to CFO to get free cash flow
    pub cfi_ppe_purchases: Vec<f64>,
}

/// External reference backing an analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    pub display_name: String,
    pub url: String,
}

/// Scores for the three growth-rate windows, in units of 10 percentage
/// points. Immutable once built by `score_cagr`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CagrScore {
    /// The three windowed growth rates the scores were derived from
    pub basis: Vec<i32>,
    pub weight_adjustment: f64,
    pub ten_year_score: i32,
    pub five_year_score: i32,
    pub one_year_score: i32,
    pub total_score: i32,
}

/// Full evaluation of one financial metric. Every intermediate value is
/// retained so a persisted report can be audited without re-running it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricAnalysis {
    pub description: String,
    #[serde(rename = "reference")]
    pub references: Vec<Reference>,
    pub red_flags: Vec<String>,
    pub green_flags: Vec<String>,
    /// Fiscal years covered by `values`
    pub periods: Vec<i32>,
    pub values: Vec<f64>,
    /// `values` with zero entries dropped; zeros are data defects, not data
    pub usable_values: Vec<f64>,
    pub usable_values_notes: String,
    pub weight_adjustment: f64,
    pub weight_adjustment_notes: String,
    pub first_value: f64,
    pub mid_value: f64,
    pub second_last_value: f64,
    pub last_value: f64,
    #[serde(rename = "CAGR10Years")]
    pub cagr_10_years: i32,
    #[serde(rename = "CAGR5Years")]
    pub cagr_5_years: i32,
    #[serde(rename = "CAGRLastYear")]
    pub cagr_last_year: i32,
    pub values_increasing_score: i32,
    pub values_increasing_score_notes: String,
    #[serde(rename = "CAGRScore")]
    pub cagr_score: CagrScore,
    /// floor((total_score + values_increasing_score) * weight_adjustment)
    pub score: i32,
}

/// The persisted moat report: four metric analyses and their combined
/// score, one file per symbol per calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoatReport {
    #[serde(rename = "type")]
    pub kind: String,
    pub symbol: String,
    pub description: String,
    pub references: Vec<Reference>,
    /// Generation date, formatted YYYY.MM.DD
    pub date: String,
    pub revenue_analysis: MetricAnalysis,
    #[serde(rename = "dilutedEPSAnalysis")]
    pub diluted_eps_analysis: MetricAnalysis,
    pub equity_analysis: MetricAnalysis,
    pub fcf_analysis: MetricAnalysis,
    /// Sum of the four metric scores
    pub score: i32,
}

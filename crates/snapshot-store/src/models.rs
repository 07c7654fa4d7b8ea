use serde::Deserialize;

/// On-disk snapshot document. The provider wraps the figures in two
/// `data` envelopes; we only model the path down to the annual series.
#[derive(Debug, Clone, Deserialize)]
pub struct Snapshot {
    pub data: SnapshotData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotData {
    pub data: SnapshotBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotBody {
    pub financials: FinancialStatements,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FinancialStatements {
    pub annual: AnnualFigures,
}

/// Annual report series, chronological, all arrays parallel.
#[derive(Debug, Clone, Deserialize)]
pub struct AnnualFigures {
    /// ISO-ish period end dates, e.g. "2024-12-31"
    pub period_end_date: Vec<String>,
    pub revenue: Vec<f64>,
    pub eps_diluted: Vec<f64>,
    pub total_equity: Vec<f64>,
    pub cf_cfo: Vec<f64>,
    #[serde(default)]
    pub cfi_ppe_purchases: Option<Vec<f64>>,
    /// Older snapshots carry net PP&E instead of purchases
    #[serde(default)]
    pub ppe_net: Option<Vec<f64>>,
}

impl AnnualFigures {
    /// The PP&E series used for the free-cash-flow adjustment, preferring
    /// purchases over the older net-PP&E spelling.
    pub fn ppe_adjustment(&self) -> Option<&[f64]> {
        self.cfi_ppe_purchases
            .as_deref()
            .or(self.ppe_net.as_deref())
    }
}

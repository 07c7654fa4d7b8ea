pub mod models;

pub use models::*;

use analysis_core::{AnalysisError, FinancialHistory, MoatReport};
use std::fs;
use std::io;
use std::path::PathBuf;

/// Subdirectory holding downloaded snapshot files for a symbol
pub const DATA_DIR: &str = "01-data";
/// Subdirectory the moat reports are written into
pub const MOAT_DIR: &str = "04-moat";

/// Filesystem store for financial snapshots and moat reports.
///
/// Layout under the data root, one directory per symbol:
///   `<root>/<SYMBOL>/01-data/<date>.json`  (input snapshots)
///   `<root>/<SYMBOL>/04-moat/<date>.json`  (output reports)
#[derive(Debug)]
pub struct SnapshotStore {
    root: PathBuf,
}

impl SnapshotStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn symbol_dir(&self, symbol: &str) -> PathBuf {
        self.root.join(symbol)
    }

    /// Path of the most recent snapshot for a symbol: the
    /// lexicographically-last `.json` filename, which sorts as a date.
    pub fn latest_snapshot_path(&self, symbol: &str) -> Result<PathBuf, AnalysisError> {
        let data_dir = self.symbol_dir(symbol).join(DATA_DIR);

        let entries = fs::read_dir(&data_dir).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                AnalysisError::SnapshotNotFound(format!(
                    "no data directory at {}",
                    data_dir.display()
                ))
            } else {
                AnalysisError::Io(e)
            }
        })?;

        let mut names: Vec<String> = Vec::new();
        for entry in entries {
            let name = entry?.file_name().to_string_lossy().into_owned();
            if name.ends_with(".json") {
                names.push(name);
            }
        }
        names.sort();

        names.pop().map(|name| data_dir.join(name)).ok_or_else(|| {
            AnalysisError::SnapshotNotFound(format!(
                "no snapshot files under {}",
                data_dir.display()
            ))
        })
    }

    /// Load and parse the most recent snapshot for a symbol.
    pub fn latest_snapshot(&self, symbol: &str) -> Result<Snapshot, AnalysisError> {
        let path = self.latest_snapshot_path(symbol)?;
        let raw = fs::read_to_string(&path)?;
        serde_json::from_str(&raw)
            .map_err(|e| AnalysisError::MalformedSnapshot(format!("{}: {}", path.display(), e)))
    }

    /// Most recent snapshot, converted to the engine's domain shape.
    pub fn history(&self, symbol: &str) -> Result<FinancialHistory, AnalysisError> {
        let snapshot = self.latest_snapshot(symbol)?;
        let annual = snapshot.data.data.financials.annual;

        let periods = annual
            .period_end_date
            .iter()
            .map(|date| fiscal_year(date))
            .collect::<Result<Vec<i32>, _>>()?;

        let cfi_ppe_purchases = annual
            .ppe_adjustment()
            .ok_or_else(|| {
                AnalysisError::MalformedSnapshot(
                    "snapshot has neither cfi_ppe_purchases nor ppe_net".to_string(),
                )
            })?
            .to_vec();

        Ok(FinancialHistory {
            symbol: symbol.to_string(),
            periods,
            revenue: annual.revenue,
            eps_diluted: annual.eps_diluted,
            total_equity: annual.total_equity,
            cf_cfo: annual.cf_cfo,
            cfi_ppe_purchases,
        })
    }

    /// Write a report to `<root>/<SYMBOL>/04-moat/<date>.json`, creating
    /// the directories as needed. Same-day reruns overwrite; write
    /// failures are fatal.
    pub fn persist_report(&self, report: &MoatReport) -> Result<PathBuf, AnalysisError> {
        let moat_dir = self.symbol_dir(&report.symbol).join(MOAT_DIR);
        fs::create_dir_all(&moat_dir)?;

        let path = moat_dir.join(format!("{}.json", report.date));
        let body = serde_json::to_vec_pretty(report)
            .map_err(|e| AnalysisError::InvalidData(format!("report serialization failed: {e}")))?;

        tracing::info!("Writing {}", path.display());
        fs::write(&path, body)?;
        Ok(path)
    }
}

/// Fiscal year of a period end date: the text before the first dash.
fn fiscal_year(raw: &str) -> Result<i32, AnalysisError> {
    let year = raw.split('-').next().unwrap_or(raw);
    year.parse::<i32>().map_err(|_| {
        AnalysisError::MalformedSnapshot(format!("unparseable period_end_date {raw:?}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use moat_analysis::MoatAnalysisEngine;
    use serde_json::json;
    use std::path::Path;
    use tempfile::TempDir;

    fn snapshot_json(revenue: &[f64], ppe_key: &str) -> String {
        let years: Vec<String> = (0..revenue.len())
            .map(|i| format!("{}-12-31", 2016 + i as i32))
            .collect();
        let eps: Vec<f64> = revenue.iter().map(|v| v * 0.1).collect();
        let equity: Vec<f64> = revenue.iter().map(|v| v * 1000.0).collect();
        let cfo: Vec<f64> = revenue.iter().map(|v| v * 0.3).collect();
        let ppe: Vec<f64> = revenue.iter().map(|v| v * -0.1).collect();

        let mut annual = json!({
            "period_end_date": years,
            "revenue": revenue,
            "eps_diluted": eps,
            "total_equity": equity,
            "cf_cfo": cfo,
        });
        annual[ppe_key] = json!(ppe);

        json!({ "data": { "data": { "financials": { "annual": annual } } } }).to_string()
    }

    fn steady_revenue() -> Vec<f64> {
        vec![
            100.0, 110.0, 121.0, 133.0, 146.0, 161.0, 177.0, 195.0, 214.0, 236.0,
        ]
    }

    fn write_snapshot(root: &Path, symbol: &str, name: &str, body: &str) {
        let data_dir = root.join(symbol).join(DATA_DIR);
        fs::create_dir_all(&data_dir).unwrap();
        fs::write(data_dir.join(name), body).unwrap();
    }

    #[test]
    fn test_latest_snapshot_picks_lexicographically_last_file() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path());

        write_snapshot(
            tmp.path(),
            "AAPL",
            "2019.01.01.json",
            &snapshot_json(&[1.0; 10], "cfi_ppe_purchases"),
        );
        write_snapshot(
            tmp.path(),
            "AAPL",
            "2020.06.01.json",
            &snapshot_json(&steady_revenue(), "cfi_ppe_purchases"),
        );
        write_snapshot(tmp.path(), "AAPL", "notes.txt", "not a snapshot");

        let path = store.latest_snapshot_path("AAPL").unwrap();
        assert!(path.ends_with("2020.06.01.json"));

        let history = store.history("AAPL").unwrap();
        assert_eq!(history.revenue, steady_revenue());
        assert_eq!(history.periods.first(), Some(&2016));
        assert_eq!(history.periods.last(), Some(&2025));
    }

    #[test]
    fn test_history_accepts_older_ppe_net_spelling() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path());

        write_snapshot(
            tmp.path(),
            "MSFT",
            "2020.01.01.json",
            &snapshot_json(&steady_revenue(), "ppe_net"),
        );

        let history = store.history("MSFT").unwrap();
        assert_eq!(history.cfi_ppe_purchases.len(), 10);
        assert_eq!(history.cfi_ppe_purchases[0], -10.0);
    }

    #[test]
    fn test_missing_symbol_directory_is_snapshot_not_found() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path());

        assert!(matches!(
            store.latest_snapshot("NOPE"),
            Err(AnalysisError::SnapshotNotFound(_))
        ));
    }

    #[test]
    fn test_malformed_snapshot_is_a_structured_error() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path());

        write_snapshot(tmp.path(), "BAD", "2020.01.01.json", "{ \"data\": 42 }");

        assert!(matches!(
            store.latest_snapshot("BAD"),
            Err(AnalysisError::MalformedSnapshot(_))
        ));
    }

    #[test]
    fn test_same_day_rerun_overwrites_report() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path());
        let engine = MoatAnalysisEngine::new();
        let date = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();

        write_snapshot(
            tmp.path(),
            "AAPL",
            "2026.01.01.json",
            &snapshot_json(&steady_revenue(), "cfi_ppe_purchases"),
        );
        let first = engine
            .analyze_as_of("AAPL", &store.history("AAPL").unwrap(), date)
            .unwrap();
        store.persist_report(&first).unwrap();

        // Fresher snapshot lands, same-day rerun
        let mut declining = steady_revenue();
        declining.reverse();
        write_snapshot(
            tmp.path(),
            "AAPL",
            "2026.07.01.json",
            &snapshot_json(&declining, "cfi_ppe_purchases"),
        );
        let second = engine
            .analyze_as_of("AAPL", &store.history("AAPL").unwrap(), date)
            .unwrap();
        let path = store.persist_report(&second).unwrap();

        let moat_dir = tmp.path().join("AAPL").join(MOAT_DIR);
        let files: Vec<_> = fs::read_dir(&moat_dir).unwrap().collect();
        assert_eq!(files.len(), 1);

        let written: MoatReport =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.score, second.score);
        assert_ne!(written.score, first.score);
    }

    #[test]
    fn test_short_history_fails_before_any_report_is_written() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path());
        let engine = MoatAnalysisEngine::new();

        write_snapshot(
            tmp.path(),
            "IPO",
            "2026.01.01.json",
            &snapshot_json(&[100.0; 6], "cfi_ppe_purchases"),
        );

        let history = store.history("IPO").unwrap();
        assert!(engine.analyze("IPO", &history).is_err());
        assert!(!tmp.path().join("IPO").join(MOAT_DIR).exists());
    }

    #[test]
    fn test_report_artifact_keeps_expected_key_spelling() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path());
        let engine = MoatAnalysisEngine::new();
        let date = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();

        write_snapshot(
            tmp.path(),
            "AAPL",
            "2026.01.01.json",
            &snapshot_json(&steady_revenue(), "cfi_ppe_purchases"),
        );
        let report = engine
            .analyze_as_of("AAPL", &store.history("AAPL").unwrap(), date)
            .unwrap();
        let path = store.persist_report(&report).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["type"], "04-moat");
        assert_eq!(raw["date"], "2026.08.05");
        assert!(raw["revenueAnalysis"]["CAGR10Years"].is_i64());
        assert!(raw["dilutedEPSAnalysis"]["CAGRScore"]["totalScore"].is_i64());
        assert!(raw["equityAnalysis"]["usableValues"].is_array());
        assert!(raw["fcfAnalysis"]["valuesIncreasingScore"].is_i64());
    }
}

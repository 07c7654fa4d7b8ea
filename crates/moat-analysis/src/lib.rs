use analysis_core::{
    AnalysisError, FinancialHistory, MetricAnalysis, MoatReport, Reference,
};
use chrono::{Local, NaiveDate};
use growth_analysis::{add_values, cagr, last_n, score_cagr, score_increasing};

/// How many trailing fiscal years an evaluation consumes.
const HISTORY_YEARS: usize = 10;

pub struct MoatAnalysisEngine;

impl MoatAnalysisEngine {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate one metric's ten-year series: growth rates over the long,
    /// mid and most-recent windows, trend score, and the weighted total.
    ///
    /// Zero entries are dropped before the reference points are picked, so
    /// the windows are relative to the filtered series, not to calendar
    /// years. A report built from filtered values carries a red flag.
    pub fn analyse_metric(
        &self,
        description: &str,
        periods: &[i32],
        values: &[f64],
        weight_adjustment: f64,
    ) -> Result<MetricAnalysis, AnalysisError> {
        let usable_values: Vec<f64> = values.iter().copied().filter(|v| *v != 0.0).collect();
        if usable_values.len() < 2 {
            return Err(AnalysisError::InsufficientData(format!(
                "only {} non-zero data points, need at least 2",
                usable_values.len()
            )));
        }

        let len = usable_values.len();
        let first_value = usable_values[0];
        let last_value = usable_values[len - 1];
        let second_last_value = usable_values[len - 2];
        let mid_index = (len as f64 / 2.0 - 1.0).round() as usize;
        let mid_value = usable_values[mid_index];

        let cagr_10_years = cagr(first_value, last_value, len as f64)?;
        let cagr_5_years = cagr(mid_value, last_value, len as f64 / 2.0)?;
        let cagr_last_year = cagr(second_last_value, last_value, 2.0)?;

        let mut red_flags = Vec::new();
        if len != HISTORY_YEARS {
            red_flags.push(
                "Zero values were filtered out. This is a less accurate result.".to_string(),
            );
        }

        let cagr_score = score_cagr(
            [cagr_10_years, cagr_5_years, cagr_last_year],
            weight_adjustment,
        );

        // Trend is judged on the raw series: a zero year still breaks a streak
        let values_increasing_score = if score_increasing(values) > 6 { 1 } else { 0 };
        let score = ((cagr_score.total_score + values_increasing_score) as f64
            * weight_adjustment)
            .floor() as i32;

        Ok(MetricAnalysis {
            description: format!(
                "{description} Scoring up and down in 10% intervals. We want at least 10%."
            ),
            references: Vec::new(),
            red_flags,
            green_flags: Vec::new(),
            periods: periods.to_vec(),
            values: values.to_vec(),
            usable_values,
            usable_values_notes:
                "Zero values are treated as missing data and filtered out into usableValues."
                    .to_string(),
            weight_adjustment,
            weight_adjustment_notes:
                "A weight adjustment raises the score of the more important figures.".to_string(),
            first_value,
            mid_value,
            second_last_value,
            last_value,
            cagr_10_years,
            cagr_5_years,
            cagr_last_year,
            values_increasing_score,
            values_increasing_score_notes:
                "If more than 6 of the year-over-year changes are increases, a point is awarded."
                    .to_string(),
            cagr_score,
            score,
        })
    }

    /// Evaluate a company's moat from its annual history, dated today.
    pub fn analyze(
        &self,
        symbol: &str,
        history: &FinancialHistory,
    ) -> Result<MoatReport, AnalysisError> {
        self.analyze_as_of(symbol, history, Local::now().date_naive())
    }

    /// Evaluate a company's moat as of an explicit report date.
    ///
    /// Requires ten years of reported revenue; trailing ten entries of each
    /// series are used. Free cash flow is CFO plus the (negative) PP&E
    /// purchase adjustment. Equity carries the highest weight, then FCF.
    pub fn analyze_as_of(
        &self,
        symbol: &str,
        history: &FinancialHistory,
        date: NaiveDate,
    ) -> Result<MoatReport, AnalysisError> {
        if history.revenue.len() < HISTORY_YEARS {
            return Err(AnalysisError::InsufficientData(format!(
                "{} has {} years of reported revenue, need {}",
                symbol,
                history.revenue.len(),
                HISTORY_YEARS
            )));
        }

        let periods = last_n(HISTORY_YEARS, &history.periods);
        let revenue = last_n(HISTORY_YEARS, &history.revenue);
        let diluted_eps = last_n(HISTORY_YEARS, &history.eps_diluted);
        let equity = last_n(HISTORY_YEARS, &history.total_equity);
        let fcf = add_values(
            last_n(HISTORY_YEARS, &history.cf_cfo),
            last_n(HISTORY_YEARS, &history.cfi_ppe_purchases),
        )?;

        let revenue_analysis = self.analyse_metric(
            "Revenue Compound Annual Growth Rate (CAGR).",
            periods,
            revenue,
            1.0,
        )?;
        let diluted_eps_analysis = self.analyse_metric(
            "Diluted EPS Compound Annual Growth Rate (CAGR).",
            periods,
            diluted_eps,
            1.0,
        )?;
        let equity_analysis = self.analyse_metric(
            "Equity Compound Annual Growth Rate (CAGR). Found on the balance sheet. \
             This is considered the most important indicator of a moat.",
            periods,
            equity,
            2.0,
        )?;
        let fcf_analysis = self.analyse_metric(
            "Free Cash Flow (FCF) Compound Annual Growth Rate (CAGR). \
             This is considered the second most important indicator of a moat.",
            periods,
            &fcf,
            1.5,
        )?;

        let score = revenue_analysis.score
            + diluted_eps_analysis.score
            + equity_analysis.score
            + fcf_analysis.score;

        Ok(MoatReport {
            kind: "04-moat".to_string(),
            symbol: symbol.to_string(),
            description: "Establishes whether a company has a moat by looking backwards at key \
                          figures to see if the company has been running well, uninterrupted by \
                          competitors."
                .to_string(),
            references: vec![Reference {
                display_name: "Section 3 - Competitive advantage; Step 2: Do the numbers \
                               agree?: 02:46"
                    .to_string(),
                url: "https://profitful.online/courses/introduction-to-stock-analysis"
                    .to_string(),
            }],
            date: date.format("%Y.%m.%d").to_string(),
            revenue_analysis,
            diluted_eps_analysis,
            equity_analysis,
            fcf_analysis,
            score,
        })
    }
}

impl Default for MoatAnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}

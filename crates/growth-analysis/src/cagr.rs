use analysis_core::{AnalysisError, CagrScore};

/// Compound Annual Growth Rate between two values, as a rounded integer
/// percentage.
///
/// Uses the shifted-ratio form `(end - start + |start|) / |start|` so the
/// rate stays defined for negative starting values, where the ordinary
/// `(end/start)^(1/n) - 1` breaks down. A zero starting value has no
/// meaningful growth rate and is rejected.
pub fn cagr(start: f64, end: f64, periods: f64) -> Result<i32, AnalysisError> {
    if start == 0.0 {
        return Err(AnalysisError::CalculationError(
            "CAGR is undefined for a zero starting value".to_string(),
        ));
    }

    let delta = end - start + start.abs();
    let ratio = delta / start.abs();
    let growth_factor = ratio.powf(1.0 / periods);
    let percent = (growth_factor - 1.0) * 100.0;

    if !percent.is_finite() {
        return Err(AnalysisError::CalculationError(format!(
            "CAGR not representable for start={start}, end={end}, periods={periods}"
        )));
    }

    Ok(percent.round() as i32)
}

/// Score three windowed growth rates in multiples of 10%.
///
/// Floor division keeps negative rates strict: -5% scores -1, not 0. We
/// want every window at or above 10%.
pub fn score_cagr(values: [i32; 3], weight_adjustment: f64) -> CagrScore {
    let [val10, val05, val01] = values;

    let ten_year_score = val10.div_euclid(10);
    let five_year_score = val05.div_euclid(10);
    let one_year_score = val01.div_euclid(10);

    CagrScore {
        basis: values.to_vec(),
        weight_adjustment,
        ten_year_score,
        five_year_score,
        one_year_score,
        total_score: ten_year_score + five_year_score + one_year_score,
    }
}

/// Count adjacent pairs where the later value is strictly greater.
///
/// A 10-element series yields a count in 0..=9.
pub fn score_increasing(values: &[f64]) -> u32 {
    values.windows(2).filter(|pair| pair[1] > pair[0]).count() as u32
}

/// Trailing `n` elements in original order, or all of them when the slice
/// is shorter. Callers needing exactly `n` must check the length first.
pub fn last_n<T>(n: usize, values: &[T]) -> &[T] {
    &values[values.len().saturating_sub(n)..]
}

/// Elementwise sum of two equal-length series.
pub fn add_values(a: &[f64], b: &[f64]) -> Result<Vec<f64>, AnalysisError> {
    if a.len() != b.len() {
        return Err(AnalysisError::InvalidData(format!(
            "cannot add series of different lengths ({} vs {})",
            a.len(),
            b.len()
        )));
    }

    Ok(a.iter().zip(b).map(|(x, y)| x + y).collect())
}

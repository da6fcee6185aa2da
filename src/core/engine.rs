use super::types::{RateBasis, SeriesPoint, SimulationConfig, Summary, TermBasis};

/// Whole months covered by the configured term, never negative.
pub fn resolved_months(config: &SimulationConfig) -> u32 {
    let multiplier = match config.term_basis {
        TermBasis::Months => 1.0,
        TermBasis::Years => 12.0,
    };
    let months = (config.term_value * multiplier).floor();
    if months.is_finite() && months > 0.0 {
        months as u32
    } else {
        0
    }
}

/// Per-month growth rate; an annual rate converts by twelfth-root
/// equivalence under monthly compounding.
pub fn monthly_periodic_rate(config: &SimulationConfig) -> f64 {
    let rate = config.rate_percent / 100.0;
    match config.rate_basis {
        RateBasis::Monthly => rate,
        RateBasis::Annual => (1.0 + rate).powf(1.0 / 12.0) - 1.0,
    }
}

pub fn project(config: &SimulationConfig) -> Vec<SeriesPoint> {
    let months = resolved_months(config);
    let rate = config.rate_percent / 100.0;
    if months == 0 || rate < 0.0 {
        return Vec::new();
    }

    let periodic = monthly_periodic_rate(config);
    let mut balance = config.initial_contribution;
    let mut invested = config.initial_contribution;

    let mut series = Vec::with_capacity(months as usize + 1);
    series.push(point(0, invested, balance));

    for month in 1..=months {
        // Growth applies before the month's contribution lands, so a
        // contribution never earns its own month's return.
        balance *= 1.0 + periodic;
        balance += config.monthly_contribution;
        invested += config.monthly_contribution;
        series.push(point(month, invested, balance));
    }

    series
}

fn point(month: u32, invested: f64, balance: f64) -> SeriesPoint {
    SeriesPoint {
        month,
        invested,
        balance,
        interest: (balance - invested).max(0.0),
    }
}

pub fn summarize(series: &[SeriesPoint]) -> Summary {
    let Some(last) = series.last() else {
        return Summary::default();
    };

    let profitability_percent = if last.invested > 0.0 {
        last.interest / last.invested * 100.0
    } else {
        0.0
    };

    Summary {
        invested: last.invested,
        interest: last.interest,
        balance: last.balance,
        profitability_percent,
    }
}

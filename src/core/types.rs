use serde::Serialize;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RateBasis {
    Monthly,
    Annual,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TermBasis {
    Months,
    Years,
}

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub initial_contribution: f64,
    pub monthly_contribution: f64,
    pub rate_percent: f64,
    pub rate_basis: RateBasis,
    pub term_value: f64,
    pub term_basis: TermBasis,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    pub month: u32,
    pub invested: f64,
    pub balance: f64,
    pub interest: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub invested: f64,
    pub interest: f64,
    pub balance: f64,
    pub profitability_percent: f64,
}

use serde::Serialize;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Strategy {
    EmiAndInvest,
    DebtFirst,
}

/// Simulation inputs with rates held as decimal fractions (8.5% -> 0.085).
/// Percent-to-decimal conversion happens at the CLI/API boundary.
#[derive(Debug, Clone)]
pub struct Inputs {
    pub loan_amount: f64,
    pub annual_interest_rate: f64,
    pub minimum_emi: f64,
    pub monthly_savings: f64,
    pub investment_return_rate: f64,
    pub savings_growth_rate: f64,
    pub horizon_years: u32,
}

impl Inputs {
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("loan_amount", self.loan_amount),
            ("annual_interest_rate", self.annual_interest_rate),
            ("minimum_emi", self.minimum_emi),
            ("monthly_savings", self.monthly_savings),
            ("investment_return_rate", self.investment_return_rate),
            ("savings_growth_rate", self.savings_growth_rate),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{name} must be a finite number >= 0"));
            }
        }
        if self.horizon_years == 0 {
            return Err("horizon_years must be >= 1".to_string());
        }
        Ok(())
    }

    pub fn total_months(&self) -> u32 {
        self.horizon_years * 12
    }
}

/// First month in which the loan balance reaches zero, if it does so
/// within the simulated horizon.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Payoff {
    Month(u32),
    NotWithinHorizon,
}

impl Payoff {
    pub fn month(self) -> Option<u32> {
        match self {
            Payoff::Month(m) => Some(m),
            Payoff::NotWithinHorizon => None,
        }
    }
}

/// Snapshot of one simulated month. Appended once per month, never mutated.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthRecord {
    pub month: u32,
    pub loan_outstanding: f64,
    pub interest_paid: f64,
    pub principal_paid: f64,
    pub amount_invested: f64,
    pub investment_value: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyResult {
    pub total_interest_paid: f64,
    pub final_investment_value: f64,
    pub payoff: Payoff,
    pub months: Vec<MonthRecord>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub emi_invest: StrategyResult,
    pub debt_first: StrategyResult,
}

use super::types::{Comparison, Inputs, MonthRecord, Payoff, Strategy, StrategyResult};

#[derive(Debug, Clone, Copy)]
struct Plan {
    monthly_interest: f64,
    monthly_growth: f64,
    annual_savings_growth: f64,
    minimum_emi: f64,
    total_months: u32,
    initial_disposable: f64,
}

impl Plan {
    fn from_inputs(inputs: &Inputs) -> Self {
        Self {
            monthly_interest: inputs.annual_interest_rate / 12.0,
            monthly_growth: inputs.investment_return_rate / 12.0,
            annual_savings_growth: inputs.savings_growth_rate,
            minimum_emi: inputs.minimum_emi,
            total_months: inputs.total_months(),
            // The savings input is cash left over after paying the EMI, so
            // the full monthly budget pools both.
            initial_disposable: inputs.monthly_savings + inputs.minimum_emi,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct MonthState {
    loan_outstanding: f64,
    investment_value: f64,
    disposable: f64,
    payoff_month: Option<u32>,
}

impl MonthState {
    fn opening(inputs: &Inputs, plan: &Plan) -> Self {
        Self {
            loan_outstanding: inputs.loan_amount,
            investment_value: 0.0,
            disposable: plan.initial_disposable,
            payoff_month: None,
        }
    }
}

/// One month of the simulation as a pure transition: consumes the prior
/// state, returns the next state and the finalized record for `month`.
fn step(state: MonthState, month: u32, strategy: Strategy, plan: &Plan) -> (MonthState, MonthRecord) {
    let mut next = state;
    let interest;
    let principal;
    let invested;

    if state.loan_outstanding > 0.0 {
        interest = state.loan_outstanding * plan.monthly_interest;
        let payment = match strategy {
            Strategy::EmiAndInvest => plan.minimum_emi,
            Strategy::DebtFirst => state.disposable,
        };
        let unclamped_principal = payment - interest;

        if unclamped_principal > state.loan_outstanding {
            principal = state.loan_outstanding;
            invested = state.disposable - interest - principal;
            next.loan_outstanding = 0.0;
        } else {
            principal = unclamped_principal;
            invested = match strategy {
                Strategy::EmiAndInvest => state.disposable - plan.minimum_emi,
                Strategy::DebtFirst => 0.0,
            };
            next.loan_outstanding = state.loan_outstanding - principal;
        }

        if next.loan_outstanding <= 0.0 && next.payoff_month.is_none() {
            next.loan_outstanding = 0.0;
            next.payoff_month = Some(month);
        }
    } else {
        interest = 0.0;
        principal = 0.0;
        invested = state.disposable;
    }

    next.investment_value = state.investment_value * (1.0 + plan.monthly_growth) + invested;

    // Savings capacity grows at the close of every 12th month, affecting
    // later months only.
    if month % 12 == 0 {
        next.disposable = state.disposable * (1.0 + plan.annual_savings_growth);
    }

    let record = MonthRecord {
        month,
        loan_outstanding: next.loan_outstanding.max(0.0),
        interest_paid: interest,
        principal_paid: principal,
        amount_invested: invested,
        investment_value: next.investment_value,
    };

    (next, record)
}

pub fn run_strategy(inputs: &Inputs, strategy: Strategy) -> StrategyResult {
    let plan = Plan::from_inputs(inputs);
    let mut state = MonthState::opening(inputs, &plan);
    let mut months = Vec::with_capacity(plan.total_months as usize);
    let mut total_interest = 0.0;

    for month in 1..=plan.total_months {
        let (next, record) = step(state, month, strategy, &plan);
        total_interest += record.interest_paid;
        months.push(record);
        state = next;
    }

    StrategyResult {
        total_interest_paid: total_interest,
        final_investment_value: state.investment_value,
        payoff: state
            .payoff_month
            .map(Payoff::Month)
            .unwrap_or(Payoff::NotWithinHorizon),
        months,
    }
}

pub fn run_comparison(inputs: &Inputs) -> Result<Comparison, String> {
    inputs.validate()?;
    Ok(Comparison {
        emi_invest: run_strategy(inputs, Strategy::EmiAndInvest),
        debt_first: run_strategy(inputs, Strategy::DebtFirst),
    })
}

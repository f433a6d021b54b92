//! Loan EMI Calculator
//!
//! `EMI = P·r·(1+r)^n / ((1+r)^n − 1)` with `r` the monthly rate and `n`
//! the term in months. A zero rate degenerates to `P / n`.

use serde::{Deserialize, Serialize};

use crate::models::errors::{AppError, AppResult};

/// Longest accepted term (100 years)
pub const MAX_TERM_MONTHS: u32 = 1200;

/// Headline figures of a loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanSummary {
    pub emi: f64,
    pub months: u32,
    pub total_payment: f64,
    pub total_interest: f64,
}

/// One row of the amortization table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub month: u32,
    pub emi: f64,
    pub principal: f64,
    pub interest: f64,
    pub balance: f64,
}

/// Monthly instalment for `principal` at `annual_rate_pct` over `months`
pub fn emi(principal: f64, annual_rate_pct: f64, months: u32) -> AppResult<f64> {
    validate(principal, annual_rate_pct, months)?;

    let r = monthly_rate(annual_rate_pct);
    if r == 0.0 {
        return Ok(principal / months as f64);
    }

    // months <= MAX_TERM_MONTHS, so the exponent fits in i32
    let growth = (1.0 + r).powi(months as i32);
    let emi = principal * r * growth / (growth - 1.0);
    if !emi.is_finite() {
        return Err(AppError::invalid_input("Loan terms are out of range"));
    }
    Ok(emi)
}

/// EMI plus totals; tenure given in years
pub fn summarize(principal: f64, annual_rate_pct: f64, tenure_years: u32) -> AppResult<LoanSummary> {
    let months = tenure_years
        .checked_mul(12)
        .ok_or_else(|| AppError::invalid_input("Tenure is too long"))?;
    summarize_months(principal, annual_rate_pct, months)
}

pub fn summarize_months(principal: f64, annual_rate_pct: f64, months: u32) -> AppResult<LoanSummary> {
    let emi = emi(principal, annual_rate_pct, months)?;

    // Zero-rate loans repay exactly the principal
    let (total_payment, total_interest) = if monthly_rate(annual_rate_pct) == 0.0 {
        (principal, 0.0)
    } else {
        let total = emi * months as f64;
        (total, total - principal)
    };
    if !total_payment.is_finite() {
        return Err(AppError::invalid_input("Loan terms are out of range"));
    }

    Ok(LoanSummary {
        emi,
        months,
        total_payment,
        total_interest,
    })
}

/// Month-by-month split of each instalment into principal and interest
pub fn amortization_schedule(
    principal: f64,
    annual_rate_pct: f64,
    months: u32,
) -> AppResult<Vec<AmortizationRow>> {
    let emi = emi(principal, annual_rate_pct, months)?;
    let r = monthly_rate(annual_rate_pct);

    let mut balance = principal;
    let mut rows = Vec::with_capacity(months as usize);

    for month in 1..=months {
        let interest = balance * r;
        let mut principal_part = emi - interest;
        // Absorb float drift so the last row closes at zero
        if month == months {
            principal_part = balance;
        }
        balance = (balance - principal_part).max(0.0);

        rows.push(AmortizationRow {
            month,
            emi,
            principal: principal_part,
            interest,
            balance,
        });
    }

    Ok(rows)
}

fn monthly_rate(annual_rate_pct: f64) -> f64 {
    annual_rate_pct / 12.0 / 100.0
}

fn validate(principal: f64, annual_rate_pct: f64, months: u32) -> AppResult<()> {
    if !principal.is_finite() || principal <= 0.0 {
        return Err(AppError::invalid_input("Principal must be a positive amount"));
    }
    if !annual_rate_pct.is_finite() || annual_rate_pct < 0.0 {
        return Err(AppError::invalid_input("Interest rate cannot be negative"));
    }
    if months == 0 {
        return Err(AppError::invalid_input("Tenure must be at least one month"));
    }
    if months > MAX_TERM_MONTHS {
        return Err(AppError::invalid_input(format!(
            "Tenure cannot exceed {} months",
            MAX_TERM_MONTHS
        )));
    }
    Ok(())
}

use crate::core::{LoanInput, MonthlyPaymentResult};
use crate::utils::error::{EstateError, Result};
use crate::utils::validation::{validate_amount, validate_positive_number};

/// 固定利率、本息平均攤還的每月付款。
///
/// 回傳完整精度的結果；四捨五入留給顯示層 (`utils::format`)。
/// 利率為 0 時直接以本金除以期數，避免公式出現 0/0。
/// 一般情況用 `ln_1p` / `exp_m1` 計算 `1 - (1+r)^-n`，極小或極大的利率都不會溢位。
pub fn compute_monthly_payment(input: &LoanInput) -> Result<MonthlyPaymentResult> {
    validate_amount("home_price", input.home_price)?;
    validate_amount("down_payment", input.down_payment)?;
    validate_amount(
        "annual_interest_rate_percent",
        input.annual_interest_rate_percent,
    )?;
    validate_positive_number("term_years", input.term_years, 1)?;

    if input.down_payment > input.home_price {
        return Err(EstateError::invalid_input(
            "down_payment",
            format!(
                "down payment {} exceeds home price {}",
                input.down_payment, input.home_price
            ),
        ));
    }

    let principal = input.home_price - input.down_payment;
    let monthly_rate = input.annual_interest_rate_percent / 100.0 / 12.0;
    let number_of_payments = input.term_years.checked_mul(12).ok_or_else(|| {
        EstateError::invalid_input("term_years", format!("{} years is too long", input.term_years))
    })?;
    let n = f64::from(number_of_payments);

    let monthly_payment = if monthly_rate == 0.0 {
        principal / n
    } else {
        let discount = -(-n * monthly_rate.ln_1p()).exp_m1();
        principal * monthly_rate / discount
    };

    if !monthly_payment.is_finite() {
        return Err(EstateError::invalid_input(
            "annual_interest_rate_percent",
            format!(
                "payment is not representable for rate {}% on {}",
                input.annual_interest_rate_percent, principal
            ),
        ));
    }

    tracing::debug!(
        principal,
        monthly_rate,
        number_of_payments,
        monthly_payment,
        "Computed monthly payment"
    );

    Ok(MonthlyPaymentResult {
        monthly_payment,
        principal,
        down_payment: input.down_payment,
        monthly_rate,
        number_of_payments,
    })
}

use rust_decimal::Decimal;

/// Value of `amount` units at `price` per unit.
///
/// Returns `None` if the product overflows.
pub fn calculate_value(amount: Decimal, price: Decimal) -> Option<Decimal> {
    amount.checked_mul(price)
}

/// Units of the destination asset obtained per unit of the source asset.
/// rate = to_price / from_price
///
/// Returns `None` when the source is zero-priced, since no finite rate exists.
pub fn exchange_rate(from_price: Decimal, to_price: Decimal) -> Option<Decimal> {
    if from_price.is_zero() {
        return None;
    }
    to_price.checked_div(from_price)
}

/// Units of the destination asset worth the same as `amount` source units.
/// output = amount * from_price / to_price
///
/// Returns `None` when the destination is zero-priced or the result overflows.
pub fn convert(amount: Decimal, from_price: Decimal, to_price: Decimal) -> Option<Decimal> {
    if to_price.is_zero() {
        return None;
    }
    calculate_value(amount, from_price)?.checked_div(to_price)
}

/// Sums `values`, or `None` on overflow.
pub fn checked_sum<I>(values: I) -> Option<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, value| acc.checked_add(value))
}

/// Sums `amount * price` over a set of holdings, or `None` on overflow.
pub fn total_value<I>(holdings: I) -> Option<Decimal>
where
    I: IntoIterator<Item = (Decimal, Decimal)>,
{
    holdings
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, (amount, price)| {
            acc.checked_add(calculate_value(amount, price)?)
        })
}

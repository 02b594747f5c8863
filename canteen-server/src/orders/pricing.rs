//! Item validation, price freezing and payment arithmetic
//!
//! All monetary values are `rust_decimal::Decimal`. Prices are frozen onto
//! order lines at creation time; later catalog price changes never touch
//! existing orders.

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};

/// Catalog data an order line is validated and priced against
#[derive(Debug, Clone)]
pub struct MealSnapshot {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub is_available: bool,
    pub max_per_person: i32,
    /// None = unlimited
    pub units_available: Option<i32>,
}

/// One requested order line
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ItemRequest {
    pub meal_id: i64,
    pub quantity: i32,
}

/// A validated line with frozen pricing
#[derive(Debug, Clone)]
pub struct PricedLine {
    pub meal_id: i64,
    pub quantity: i32,
    pub price_per_item: Decimal,
    pub subtotal: Decimal,
}

/// A fully priced order
#[derive(Debug, Clone)]
pub struct PricedOrder {
    pub total: Decimal,
    pub lines: Vec<PricedLine>,
}

/// Validate every requested line against the catalog snapshots.
///
/// The whole request is rejected on the first violation; nothing is persisted
/// by callers until the entire list passes.
pub fn validate_items(meals: &[MealSnapshot], items: &[ItemRequest]) -> Result<(), AppError> {
    if items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }

    let mut seen = std::collections::HashSet::new();
    for item in items {
        if !seen.insert(item.meal_id) {
            return Err(AppError::validation(format!(
                "Meal {} appears more than once in the order",
                item.meal_id
            )));
        }

        if item.quantity < 1 {
            return Err(AppError::validation("Quantity must be at least 1"));
        }

        let meal = meals
            .iter()
            .find(|m| m.id == item.meal_id)
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::MealNotFound,
                    format!("Meal {} not found", item.meal_id),
                )
            })?;

        if !meal.is_available {
            return Err(AppError::with_message(
                ErrorCode::MealUnavailable,
                format!("{} is not available.", meal.name),
            ));
        }

        if item.quantity > meal.max_per_person {
            return Err(AppError::with_message(
                ErrorCode::MealQuantityExceedsLimit,
                format!(
                    "Maximum {} {} allowed per person.",
                    meal.max_per_person, meal.name
                ),
            ));
        }

        if let Some(units) = meal.units_available
            && item.quantity > units
        {
            return Err(AppError::with_message(
                ErrorCode::MealInsufficientUnits,
                format!("Only {} units of {} available.", units, meal.name),
            ));
        }
    }

    Ok(())
}

/// Validate and price an order in one pass.
///
/// On a free-meal day the total and every frozen line price are zero; the
/// catalog price is ignored entirely.
pub fn price_items(
    meals: &[MealSnapshot],
    items: &[ItemRequest],
    is_free_meal: bool,
) -> Result<PricedOrder, AppError> {
    validate_items(meals, items)?;

    let mut total = Decimal::ZERO;
    let mut lines = Vec::with_capacity(items.len());

    for item in items {
        // validate_items guarantees the meal exists
        let meal = meals.iter().find(|m| m.id == item.meal_id).expect("validated");

        let price_per_item = if is_free_meal { Decimal::ZERO } else { meal.price };
        let subtotal = price_per_item * Decimal::from(item.quantity);
        total += subtotal;

        lines.push(PricedLine {
            meal_id: item.meal_id,
            quantity: item.quantity,
            price_per_item,
            subtotal,
        });
    }

    Ok(PricedOrder { total, lines })
}

/// Amount still owed: `max(total - paid, 0)` — never negative.
pub fn amount_remaining(total: Decimal, paid: Decimal) -> Decimal {
    (total - paid).max(Decimal::ZERO)
}

/// Fully paid once the cumulative amount meets or exceeds the frozen total.
/// Overpayment is tolerated, not flagged.
pub fn is_fully_paid(total: Decimal, paid: Decimal) -> bool {
    paid >= total
}

/// Whether a payment update promotes the order to `confirmed`
pub fn confirms_order(is_verified: bool, total: Decimal, paid: Decimal) -> bool {
    is_verified && is_fully_paid(total, paid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::from(n)
    }

    fn meal(id: i64, price: i64, max_per_person: i32, units: Option<i32>) -> MealSnapshot {
        MealSnapshot {
            id,
            name: format!("Meal {id}"),
            price: dec(price),
            is_available: true,
            max_per_person,
            units_available: units,
        }
    }

    fn item(meal_id: i64, quantity: i32) -> ItemRequest {
        ItemRequest { meal_id, quantity }
    }

    #[test]
    fn test_empty_order_rejected() {
        let err = validate_items(&[meal(1, 500, 2, None)], &[]).unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderEmpty);
    }

    #[test]
    fn test_unknown_meal_rejected() {
        let err = validate_items(&[meal(1, 500, 2, None)], &[item(99, 1)]).unwrap_err();
        assert_eq!(err.code, ErrorCode::MealNotFound);
    }

    #[test]
    fn test_unavailable_meal_rejected() {
        let mut m = meal(1, 500, 2, None);
        m.is_available = false;
        let err = validate_items(&[m], &[item(1, 1)]).unwrap_err();
        assert_eq!(err.code, ErrorCode::MealUnavailable);
        assert!(err.message.contains("not available"));
    }

    #[test]
    fn test_cap_exceeded_rejected() {
        let err = validate_items(&[meal(1, 500, 2, None)], &[item(1, 3)]).unwrap_err();
        assert_eq!(err.code, ErrorCode::MealQuantityExceedsLimit);
        assert!(err.message.contains("Maximum 2"));
    }

    #[test]
    fn test_insufficient_units_rejected() {
        let err = validate_items(&[meal(1, 500, 5, Some(3))], &[item(1, 4)]).unwrap_err();
        assert_eq!(err.code, ErrorCode::MealInsufficientUnits);
        assert!(err.message.contains("Only 3 units"));
    }

    #[test]
    fn test_unlimited_units_never_rejected_for_stock() {
        assert!(validate_items(&[meal(1, 500, 100, None)], &[item(1, 50)]).is_ok());
    }

    #[test]
    fn test_duplicate_meal_rejected() {
        // Two lines of the same meal would bypass the per-person cap
        let err =
            validate_items(&[meal(1, 500, 2, None)], &[item(1, 2), item(1, 2)]).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let err = validate_items(&[meal(1, 500, 2, None)], &[item(1, 0)]).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_pricing_sums_lines() {
        // Spec scenario: price 500, quantity 2 -> total 1000
        let meals = [meal(1, 500, 2, Some(3)), meal(2, 250, 5, None)];
        let priced = price_items(&meals, &[item(1, 2), item(2, 1)], false).unwrap();

        assert_eq!(priced.total, dec(1250));
        assert_eq!(priced.lines.len(), 2);
        assert_eq!(priced.lines[0].price_per_item, dec(500));
        assert_eq!(priced.lines[0].subtotal, dec(1000));
        assert_eq!(priced.lines[1].subtotal, dec(250));

        // sum(line.subtotal) == total
        let sum: Decimal = priced.lines.iter().map(|l| l.subtotal).sum();
        assert_eq!(sum, priced.total);
    }

    #[test]
    fn test_free_meal_day_zeroes_everything() {
        let meals = [meal(1, 500, 2, None)];
        let priced = price_items(&meals, &[item(1, 2)], true).unwrap();

        assert_eq!(priced.total, Decimal::ZERO);
        for line in &priced.lines {
            assert_eq!(line.price_per_item, Decimal::ZERO);
            assert_eq!(line.subtotal, Decimal::ZERO);
        }
    }

    #[test]
    fn test_free_meal_day_still_validates() {
        // Validation applies even when the sponsor pays
        let mut m = meal(1, 500, 2, None);
        m.is_available = false;
        let err = price_items(&[m], &[item(1, 1)], true).unwrap_err();
        assert_eq!(err.code, ErrorCode::MealUnavailable);
    }

    #[test]
    fn test_amount_remaining_clamps_to_zero() {
        assert_eq!(amount_remaining(dec(1000), dec(400)), dec(600));
        assert_eq!(amount_remaining(dec(1000), dec(1000)), Decimal::ZERO);
        // Overpayment clamps, never negative
        assert_eq!(amount_remaining(dec(1000), dec(1500)), Decimal::ZERO);
        assert_eq!(amount_remaining(Decimal::ZERO, Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_is_fully_paid() {
        assert!(!is_fully_paid(dec(1000), dec(400)));
        assert!(is_fully_paid(dec(1000), dec(1000)));
        assert!(is_fully_paid(dec(1000), dec(1500)));
    }

    #[test]
    fn test_confirms_order_requires_both() {
        // Spec scenario: amount 400 -> partial, not confirmed
        assert!(!confirms_order(true, dec(1000), dec(400)));
        // Unverified full payment is not confirmed
        assert!(!confirms_order(false, dec(1000), dec(1000)));
        // Verified + full -> confirmed
        assert!(confirms_order(true, dec(1000), dec(1000)));
        assert!(confirms_order(true, dec(1000), dec(1200)));
    }
}

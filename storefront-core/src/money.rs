//! Money calculation utilities using rust_decimal for precision
//!
//! Every surface that shows "what does this line cost" (cart drawer,
//! checkout summary, bill) goes through [`PricedLine::line_total`]:
//!
//! `(unit_price + sum(selected option prices)) * quantity`
//!
//! Sums are accumulated as `Decimal` without intermediate rounding; values
//! are rounded to 2 decimal places only when converted for display.

use rust_decimal::prelude::*;
use shared::cart::CartLineItem;
use shared::order::{Order, OrderItem, OrderedItem};

/// Rounding for displayed monetary values (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Round for display
#[inline]
pub fn round_for_display(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert Decimal back to f64 for display, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round_for_display(value).to_f64().unwrap_or_default()
}

/// Format an amount with exactly two decimals (e.g. "40.50")
pub fn format_amount(value: Decimal) -> String {
    format!("{:.2}", round_for_display(value))
}

/// A priced line: anything with a unit price, option surcharges and a quantity
pub trait PricedLine {
    fn unit_price(&self) -> Decimal;

    /// Sum of the selected option prices for one unit
    fn options_total(&self) -> Decimal;

    fn quantity(&self) -> i32;

    /// `(unit_price + options_total) * quantity`, unrounded
    fn line_total(&self) -> Decimal {
        (self.unit_price() + self.options_total()) * Decimal::from(self.quantity())
    }
}

impl PricedLine for CartLineItem {
    fn unit_price(&self) -> Decimal {
        to_decimal(CartLineItem::unit_price(self))
    }

    fn options_total(&self) -> Decimal {
        self.option_prices().map(to_decimal).sum()
    }

    fn quantity(&self) -> i32 {
        self.quantity
    }
}

impl PricedLine for OrderedItem {
    fn unit_price(&self) -> Decimal {
        to_decimal(self.unit_price)
    }

    /// The spice level is carried separately and is never priced
    fn options_total(&self) -> Decimal {
        self.modifiers.iter().map(|m| to_decimal(m.modifier_price)).sum()
    }

    fn quantity(&self) -> i32 {
        self.quantity
    }
}

impl PricedLine for OrderItem {
    fn unit_price(&self) -> Decimal {
        to_decimal(self.price)
    }

    fn options_total(&self) -> Decimal {
        self.modifiers.iter().map(|m| to_decimal(m.modifier_price)).sum()
    }

    fn quantity(&self) -> i32 {
        self.quantity
    }
}

/// Sum of line totals
pub fn lines_total<'a, L>(lines: impl IntoIterator<Item = &'a L>) -> Decimal
where
    L: PricedLine + 'a,
{
    lines.into_iter().map(PricedLine::line_total).sum()
}

/// Amount still owed across a table's orders
///
/// Void and cancelled orders stay in the history but are not owed.
pub fn active_total(orders: &[Order]) -> Decimal {
    orders
        .iter()
        .filter(|o| o.counts_toward_total())
        .map(|o| to_decimal(o.total_amount))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::cart::{CartItemInput, ModifierOption};
    use shared::order::{OrderModifier, OrderStatus};

    fn line(input: CartItemInput) -> CartLineItem {
        CartLineItem::from_input(input, "k".to_string())
    }

    #[test]
    fn test_line_total_formula() {
        let item = line(
            CartItemInput::new(1, "Pizza", 10.0)
                .with_quantity(3)
                .with_modifier("Size", [ModifierOption::new("Large", 2.5)])
                .with_modifier("Extra", [ModifierOption::new("Olives", 1.0)]),
        );

        // (10 + 2.5 + 1) * 3
        assert_eq!(item.line_total(), Decimal::new(4050, 2));
        assert_eq!(to_f64(item.line_total()), 40.5);
        assert_eq!(format_amount(item.line_total()), "40.50");
    }

    #[test]
    fn test_line_total_uses_indining_price() {
        let item = line(CartItemInput::new(1, "Soup", 8.0).with_indining_price(6.5).with_quantity(2));
        assert_eq!(to_f64(item.line_total()), 13.0);
    }

    #[test]
    fn test_no_rounding_during_accumulation() {
        let items: Vec<CartLineItem> = (0..3)
            .map(|i| line(CartItemInput::new(i as i64, "Mint", 0.005)))
            .collect();

        // Rounding each line first would give 0.01 * 3
        let rounded_early: Decimal = items.iter().map(|i| round_for_display(i.line_total())).sum();
        assert_eq!(format_amount(rounded_early), "0.03");
        assert_eq!(format_amount(lines_total(&items)), "0.02");
    }

    #[test]
    fn test_display_rounding_half_away_from_zero() {
        assert_eq!(format_amount(Decimal::new(1005, 3)), "1.01");
        assert_eq!(format_amount(Decimal::new(-1005, 3)), "-1.01");
        assert_eq!(format_amount(Decimal::from(7)), "7.00");
    }

    #[test]
    fn test_same_formula_for_submitted_and_historical_items() {
        let ordered = OrderedItem {
            name: "Curry".to_string(),
            quantity: 3,
            unit_price: 10.0,
            image: String::new(),
            modifiers: vec![OrderModifier::new("Rice", 2.5), OrderModifier::new("Egg", 1.0)],
            spice_level: "Hot".to_string(),
        };
        let historical = OrderItem {
            name: "Curry".to_string(),
            quantity: 3,
            price: 10.0,
            modifiers: vec![OrderModifier::new("Rice", 2.5), OrderModifier::new("Egg", 1.0)],
            ..Default::default()
        };
        assert_eq!(ordered.line_total(), Decimal::new(4050, 2));
        assert_eq!(historical.line_total(), ordered.line_total());
    }

    #[test]
    fn test_active_total_excludes_void() {
        let orders = vec![
            Order {
                id: "1".to_string(),
                status: OrderStatus::Delivered,
                total_amount: 20.0,
                ..Default::default()
            },
            Order {
                id: "2".to_string(),
                status: OrderStatus::Void,
                total_amount: 15.0,
                ..Default::default()
            },
        ];
        assert_eq!(active_total(&orders), Decimal::from(20));
        assert_eq!(orders.len(), 2);
    }

    #[test]
    fn test_active_total_excludes_cancelled_and_void_reason() {
        let orders = vec![
            Order {
                id: "1".to_string(),
                status: OrderStatus::Cancelled,
                total_amount: 9.0,
                ..Default::default()
            },
            Order {
                id: "2".to_string(),
                status: OrderStatus::Ready,
                total_amount: 11.0,
                void_reason: Some("Kitchen error".to_string()),
                ..Default::default()
            },
            Order {
                id: "3".to_string(),
                status: OrderStatus::Pending,
                total_amount: 4.25,
                ..Default::default()
            },
        ];
        assert_eq!(format_amount(active_total(&orders)), "4.25");
    }
}

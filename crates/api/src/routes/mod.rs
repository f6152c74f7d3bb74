//! API route definitions.

use axum::Router;
use rust_decimal::Decimal;

use crate::AppState;

pub mod agreements;
pub mod cases;
pub mod health;
pub mod reports;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(cases::routes())
        .merge(agreements::routes())
        .merge(reports::routes())
}

/// Formats a money amount as a fixed two-decimal string.
pub(crate) fn format_money(amount: Decimal) -> String {
    format!("{:.2}", concilia_shared::types::money::round_centavos(amount))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::format_money;

    #[test]
    fn test_format_money_pads_and_rounds() {
        assert_eq!(format_money(dec!(8000)), "8000.00");
        assert_eq!(format_money(dec!(2666.666)), "2666.67");
    }
}

// ============================================================================
// Money Module
// Currencies and monetary amounts with a net + taxes breakdown
// ============================================================================

mod amount;
mod currency;

pub use amount::{Components, MonetaryAmount};
pub use currency::{Currency, CurrencyDataProvider, Iso4217, MAX_CURRENCY_DECIMALS};

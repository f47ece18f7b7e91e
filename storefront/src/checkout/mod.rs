// storefront/src/checkout/mod.rs

//! Order verification, line-item resolution and order totals for the checkout
//! success page.

pub mod line_items;
pub mod page_state;
pub mod query;
pub mod summary;
pub mod verification;

pub use line_items::LineItemResolver;
pub use page_state::CheckoutSuccessState;
pub use query::SuccessPageQuery;
pub use summary::{CurrencyFormat, OrderSummary};
pub use verification::{OrderVerificationGate, PostalCodeMatching, VerificationPolicy, VerificationRequest};

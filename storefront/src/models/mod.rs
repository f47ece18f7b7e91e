// storefront/src/models/mod.rs

//! Data structures for catalog rows, payment intents and order line items.

pub mod line_item;
pub mod payment;
pub mod product;
pub mod store;

pub use line_item::OrderLineItem;
pub use payment::{CheckoutItem, PaymentIntent, PaymentIntentStatus, PaymentVerification};
pub use product::Product;
pub use store::Store;

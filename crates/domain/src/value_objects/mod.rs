pub mod quote;

pub use quote::QuoteResult;

//! SQL output layer.
//!
//! - [`quote`] - identifier and literal quoting
//! - [`token`] - token types and the stream generated statements
//!   serialize through

pub mod quote;
pub mod token;

pub use quote::{quote_ident, quote_literal};
pub use token::{Token, TokenStream};

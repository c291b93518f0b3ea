pub mod brackets;
pub mod income;

pub use brackets::{compute_tax, TaxBracket, TaxBracketTable};

pub mod price_change;
pub mod pricing;
pub mod risk;

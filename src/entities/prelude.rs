pub use super::candles::Entity as Candles;
pub use super::trades::Entity as Trades;

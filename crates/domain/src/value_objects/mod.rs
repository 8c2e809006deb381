pub mod asset_pair;
pub mod trade_preview;
pub mod transaction_filter;

pub use asset_pair::AssetPair;
pub use trade_preview::TradePreview;
pub use transaction_filter::TransactionFilter;

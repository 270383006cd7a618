/// CSV export of the level breakdown, monthly series and zone balances.
pub mod export;

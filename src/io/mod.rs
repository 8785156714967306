/// CSV export of per-tick simulation history.
pub mod export;

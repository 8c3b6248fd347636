//! Settlement engine — refund decisions applied to the wallet ledger.

pub mod ledger;
pub mod settlement;

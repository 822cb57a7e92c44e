pub mod commands;
pub mod fee;
pub mod hash;
pub mod public_key;
pub mod transaction;
pub mod utxo_pool;
pub mod validation;

pub use self::{
    fee::*, hash::*, public_key::*, transaction::*, utxo_pool::*, validation::*,
};

use crate::{Transaction, TransactionValidator, UtxoPool};

/// A batch handler that attempts the proposed transactions in ascending fee
/// order before delegating to [`TransactionValidator::handle_transactions`].
///
/// Fees are computed against the pool state from before the epoch starts, so
/// every transaction in the batch is ranked against the same snapshot. The sort
/// is stable: transactions with equal fees keep their proposed relative order.
///
/// Note that ascending order means that when two transactions conflict over a
/// utxo, the one with the lower fee is attempted first and wins.
pub struct FeePriorityValidator {
    validator: TransactionValidator,
}

impl FeePriorityValidator {
    pub fn new(utxo_pool: &UtxoPool) -> Self {
        Self {
            validator: TransactionValidator::new(utxo_pool),
        }
    }

    pub fn utxo_pool(&self) -> &UtxoPool {
        self.validator.utxo_pool()
    }

    pub fn is_valid(&self, transaction: &Transaction) -> bool {
        self.validator.is_valid(transaction)
    }

    /// Handles one epoch the same way the wrapped validator does, except that
    /// the proposed transactions are first sorted by ascending fee.
    pub fn handle_transactions(&mut self, proposed_transactions: &[Transaction]) -> Vec<Transaction> {
        let mut ordered_transactions = proposed_transactions.to_vec();
        let pre_epoch_pool = self.validator.utxo_pool();
        ordered_transactions.sort_by_key(|transaction| transaction.fee(pre_epoch_pool));
        self.validator.handle_transactions(&ordered_transactions)
    }
}

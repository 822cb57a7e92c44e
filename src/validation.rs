use crate::{OutputIndex, Transaction, Utxo, UtxoPool};
use std::collections::HashSet;

/// Validates proposed transactions against the current utxo pool and applies
/// the accepted ones to it.
///
/// The validator owns its pool: the constructor copies the supplied pool, so the
/// caller's instance is never mutated by later epochs. The pool then persists
/// across `handle_transactions` calls, representing the ledger state evolving
/// from epoch to epoch.
pub struct TransactionValidator {
    utxo_pool: UtxoPool,
}

impl TransactionValidator {
    pub fn new(utxo_pool: &UtxoPool) -> Self {
        Self {
            utxo_pool: utxo_pool.clone(),
        }
    }

    pub fn utxo_pool(&self) -> &UtxoPool {
        &self.utxo_pool
    }

    /// Returns whether the transaction is valid against the current pool state:
    ///   (1) every claimed utxo exists in the pool,
    ///   (2) every input's signature verifies against the claimed output's
    ///       recipient, over the signable digest for that input's position,
    ///   (3) no utxo is claimed more than once within the transaction,
    ///   (4) every output amount is non-negative,
    ///   (5) the claimed input total covers the declared output total.
    /// The checks run in that order and stop at the first failure. Invalidity is
    /// reported only through the return value.
    pub fn is_valid(&self, transaction: &Transaction) -> bool {
        let mut claimed_utxos = HashSet::new();
        let mut input_total: i64 = 0;
        for (index, input) in transaction.inputs().iter().enumerate() {
            // The existence check must come first: the remaining rules look up
            // the claimed output's value and recipient.
            let claimed_output = match self.utxo_pool.output(input.utxo()) {
                Some(output) => output,
                None => return false,
            };

            let digest = match transaction.signable_digest(index) {
                Ok(digest) => digest,
                Err(_) => return false,
            };
            if !claimed_output
                .recipient()
                .verify(digest.as_slice(), input.signature())
            {
                return false;
            }

            if !claimed_utxos.insert(*input.utxo()) {
                return false;
            }

            input_total += claimed_output.amount();
        }

        let mut output_total: i64 = 0;
        for output in transaction.outputs() {
            if output.amount() < 0 {
                return false;
            }
            output_total += output.amount();
        }

        // The difference is the transaction's fee, which may be zero but never
        // negative.
        input_total >= output_total
    }

    /// Handles one epoch: receives the proposed transactions, validates each one
    /// against the pool state at that point in the iteration, applies the valid
    /// ones to the pool and skips the rest.
    ///
    /// Returns the accepted transactions in acceptance order, which is the
    /// proposed order minus the skipped ones. Processing in the given order
    /// against the running pool state is a greedy heuristic: it guarantees that
    /// the accepted set is mutually consistent, not that it is the largest or
    /// the most profitable one.
    pub fn handle_transactions(&mut self, proposed_transactions: &[Transaction]) -> Vec<Transaction> {
        let mut accepted_transactions = Vec::new();
        for transaction in proposed_transactions {
            if self.is_valid(transaction) {
                self.apply(transaction);
                accepted_transactions.push(transaction.clone());
            }
        }
        accepted_transactions
    }

    // Spends the transaction's inputs and records its outputs as new utxos.
    // The caller has already validated the transaction.
    fn apply(&mut self, transaction: &Transaction) {
        for input in transaction.inputs() {
            self.utxo_pool.remove(input.utxo());
        }
        for (index, output) in transaction.outputs().iter().enumerate() {
            let utxo = Utxo::new(*transaction.id(), OutputIndex::new(index as u32));
            self.utxo_pool.insert(utxo, output.clone());
        }
    }
}

use crate::{PublicKey, Sha256, Signature, UtxoPool};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A double SHA-256 hash of the transaction data, excluding input signatures.
/// Signatures are excluded so that a transaction keeps the same identifier before
/// and after its inputs are signed.
#[derive(Debug, Hash, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub struct TransactionId(Sha256);

impl TransactionId {
    pub fn new(data: Sha256) -> Self {
        Self(data)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0.as_slice()
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The index of the transaction output, the first one is 0.
#[derive(Debug, Hash, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub struct OutputIndex(u32);

impl OutputIndex {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl Display for OutputIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies a single unspent transaction output: the transaction that produced
/// the output and the position of the output within it.
/// Equality and hashing cover both fields, which makes it usable as a pool key.
#[derive(Debug, Hash, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub struct Utxo {
    transaction_id: TransactionId,
    output_index: OutputIndex,
}

impl Utxo {
    pub fn new(transaction_id: TransactionId, output_index: OutputIndex) -> Self {
        Self {
            transaction_id,
            output_index,
        }
    }

    pub fn transaction_id(&self) -> &TransactionId {
        &self.transaction_id
    }

    pub fn output_index(&self) -> &OutputIndex {
        &self.output_index
    }
}

impl Display for Utxo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.transaction_id, self.output_index)
    }
}

/// A claim against an existing unspent output, authorized by the owner's signature
/// over the signable digest for this input's position.
#[derive(Debug, Clone)]
pub struct TransactionInput {
    utxo: Utxo,
    signature: Signature,
}

impl TransactionInput {
    pub fn new(utxo: Utxo, signature: Signature) -> Self {
        Self { utxo, signature }
    }

    pub fn utxo(&self) -> &Utxo {
        &self.utxo
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }
}

impl Display for TransactionInput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.utxo)
    }
}

/// A new output created by a transaction, spendable by the recipient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionOutput {
    // The amount is signed so that a proposed output with a negative amount can be
    // represented and rejected by validation, rather than being unrepresentable.
    amount: i64,
    recipient: PublicKey,
}

impl TransactionOutput {
    pub fn new(amount: i64, recipient: PublicKey) -> Self {
        Self { amount, recipient }
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn recipient(&self) -> &PublicKey {
        &self.recipient
    }
}

impl Display for TransactionOutput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.amount, self.recipient)
    }
}

// The canonical byte encoding that an input's signature must cover: the claimed
// utxo and all declared outputs. No signature bytes appear in it.
#[derive(Serialize)]
struct SignableData<'a> {
    utxo: &'a Utxo,
    outputs: &'a [TransactionOutput],
}

// The canonical byte encoding the transaction identifier is derived from.
#[derive(Serialize)]
struct IdentifierData<'a> {
    utxos: &'a [&'a Utxo],
    outputs: &'a [TransactionOutput],
}

/// An ordered list of inputs and an ordered list of outputs, identified by a
/// content-derived hash. Immutable once constructed; the identifier becomes the
/// producing-transaction reference for the outputs' utxos.
#[derive(Debug, Clone)]
pub struct Transaction {
    id: TransactionId,
    inputs: Vec<TransactionInput>,
    outputs: Vec<TransactionOutput>,
}

impl Transaction {
    pub fn new(
        inputs: Vec<TransactionInput>,
        outputs: Vec<TransactionOutput>,
    ) -> Result<Self, String> {
        if inputs.is_empty() {
            return Err("Transaction must have at least one input.".to_string());
        }
        let id = Self::hash_transaction_data(&inputs, &outputs)?;
        Ok(Self {
            id,
            inputs,
            outputs,
        })
    }

    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    pub fn inputs(&self) -> &Vec<TransactionInput> {
        &self.inputs
    }

    pub fn outputs(&self) -> &Vec<TransactionOutput> {
        &self.outputs
    }

    /// The digest that the input at the given position must be signed over.
    /// It covers the input's claimed utxo and all of the transaction's outputs,
    /// and none of the signatures.
    pub fn signable_digest(&self, input_index: usize) -> Result<Sha256, String> {
        match self.inputs.get(input_index) {
            Some(input) => Self::signable_digest_for(input.utxo(), &self.outputs),
            None => Err(format!(
                "Input index: {} is out of range for transaction: {} with {} inputs.",
                input_index,
                self.id,
                self.inputs.len()
            )),
        }
    }

    /// Computes the signable digest before the transaction exists, which is how
    /// the spender signs: assemble the outputs, sign the digest for each claimed
    /// utxo, then construct the transaction from the signed inputs.
    pub fn signable_digest_for(
        utxo: &Utxo,
        outputs: &[TransactionOutput],
    ) -> Result<Sha256, String> {
        let data = SignableData { utxo, outputs };
        let encoded = bincode::serialize(&data).map_err(|e| e.to_string())?;
        Ok(Sha256::double_digest(&encoded))
    }

    /// The transaction's fee: the sum of the claimed input values looked up from
    /// the pool, minus the sum of the declared output values.
    /// Claimed utxos absent from the pool contribute nothing to the input sum.
    pub fn fee(&self, utxo_pool: &UtxoPool) -> i64 {
        let input_total: i64 = self
            .inputs
            .iter()
            .filter_map(|input| utxo_pool.output(input.utxo()))
            .map(TransactionOutput::amount)
            .sum();
        let output_total: i64 = self.outputs.iter().map(TransactionOutput::amount).sum();
        input_total - output_total
    }

    fn hash_transaction_data(
        inputs: &[TransactionInput],
        outputs: &[TransactionOutput],
    ) -> Result<TransactionId, String> {
        let utxos = inputs
            .iter()
            .map(TransactionInput::utxo)
            .collect::<Vec<&Utxo>>();
        let data = IdentifierData {
            utxos: &utxos,
            outputs,
        };
        let encoded = bincode::serialize(&data).map_err(|e| e.to_string())?;
        Ok(TransactionId::new(Sha256::double_digest(&encoded)))
    }
}

impl Display for Transaction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KeyPair;

    fn output(amount: i64, seed: u8) -> TransactionOutput {
        TransactionOutput::new(amount, KeyPair::from_seed([seed; 32]).public_key())
    }

    fn utxo(id_byte: u8, index: u32) -> Utxo {
        Utxo::new(
            TransactionId::new(Sha256::from_raw([id_byte; 32])),
            OutputIndex::new(index),
        )
    }

    fn signed_input(key_pair: &KeyPair, utxo: Utxo, outputs: &[TransactionOutput]) -> TransactionInput {
        let digest = Transaction::signable_digest_for(&utxo, outputs).unwrap();
        TransactionInput::new(utxo, key_pair.sign(digest.as_slice()))
    }

    #[test]
    fn identifier_is_deterministic() {
        let key_pair = KeyPair::from_seed([1; 32]);
        let outputs = vec![output(5, 2)];
        let first = Transaction::new(
            vec![signed_input(&key_pair, utxo(9, 0), &outputs)],
            outputs.clone(),
        )
        .unwrap();
        let second = Transaction::new(
            vec![signed_input(&key_pair, utxo(9, 0), &outputs)],
            outputs,
        )
        .unwrap();
        assert_eq!(first.id(), second.id());
    }

    #[test]
    fn identifier_excludes_signatures() {
        // The same content signed by two different keys must produce the same
        // identifier, since signatures are not part of the hashed data.
        let outputs = vec![output(5, 2)];
        let signed_by_owner = Transaction::new(
            vec![signed_input(&KeyPair::from_seed([1; 32]), utxo(9, 0), &outputs)],
            outputs.clone(),
        )
        .unwrap();
        let signed_by_thief = Transaction::new(
            vec![signed_input(&KeyPair::from_seed([3; 32]), utxo(9, 0), &outputs)],
            outputs,
        )
        .unwrap();
        assert_eq!(signed_by_owner.id(), signed_by_thief.id());
    }

    #[test]
    fn identifier_depends_on_outputs() {
        let key_pair = KeyPair::from_seed([1; 32]);
        let outputs_a = vec![output(5, 2)];
        let outputs_b = vec![output(6, 2)];
        let a = Transaction::new(
            vec![signed_input(&key_pair, utxo(9, 0), &outputs_a)],
            outputs_a,
        )
        .unwrap();
        let b = Transaction::new(
            vec![signed_input(&key_pair, utxo(9, 0), &outputs_b)],
            outputs_b,
        )
        .unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn signable_digest_differs_per_input_position() {
        let key_pair = KeyPair::from_seed([1; 32]);
        let outputs = vec![output(5, 2)];
        let transaction = Transaction::new(
            vec![
                signed_input(&key_pair, utxo(9, 0), &outputs),
                signed_input(&key_pair, utxo(9, 1), &outputs),
            ],
            outputs,
        )
        .unwrap();
        assert_ne!(
            transaction.signable_digest(0).unwrap(),
            transaction.signable_digest(1).unwrap()
        );
    }

    #[test]
    fn signable_digest_rejects_out_of_range_index() {
        let key_pair = KeyPair::from_seed([1; 32]);
        let outputs = vec![output(5, 2)];
        let transaction = Transaction::new(
            vec![signed_input(&key_pair, utxo(9, 0), &outputs)],
            outputs,
        )
        .unwrap();
        assert!(transaction.signable_digest(1).is_err());
    }

    #[test]
    fn transaction_without_inputs_is_rejected() {
        assert!(Transaction::new(vec![], vec![output(5, 2)]).is_err());
    }

    #[test]
    fn fee_is_input_total_minus_output_total() {
        let key_pair = KeyPair::from_seed([1; 32]);
        let claimed = utxo(9, 0);
        let mut utxo_pool = UtxoPool::new();
        utxo_pool.insert(claimed, output(10, 1));

        let outputs = vec![output(7, 2)];
        let transaction = Transaction::new(
            vec![signed_input(&key_pair, claimed, &outputs)],
            outputs,
        )
        .unwrap();
        assert_eq!(transaction.fee(&utxo_pool), 3);
    }

    #[test]
    fn fee_ignores_missing_utxos() {
        let key_pair = KeyPair::from_seed([1; 32]);
        let utxo_pool = UtxoPool::new();
        let outputs = vec![output(7, 2)];
        let transaction = Transaction::new(
            vec![signed_input(&key_pair, utxo(9, 0), &outputs)],
            outputs,
        )
        .unwrap();
        assert_eq!(transaction.fee(&utxo_pool), -7);
    }
}

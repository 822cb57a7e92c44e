use clearcoin_lib::{
    KeyPair, OutputIndex, Sha256, Transaction, TransactionId, TransactionInput,
    TransactionOutput, TransactionValidator, Utxo, UtxoPool,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

const TRANSACTION_COUNT: usize = 1000;

fn create_ledger() -> (UtxoPool, Vec<Transaction>) {
    let mut utxo_pool = UtxoPool::new();
    let mut proposed_transactions = Vec::with_capacity(TRANSACTION_COUNT);
    for index in 0..TRANSACTION_COUNT {
        let owner = KeyPair::from_seed(seed(index));
        let claimed = Utxo::new(
            TransactionId::new(Sha256::from_raw(seed(index))),
            OutputIndex::new(0),
        );
        utxo_pool.insert(claimed, TransactionOutput::new(10, owner.public_key()));

        let outputs = vec![TransactionOutput::new(9, owner.public_key())];
        let digest = Transaction::signable_digest_for(&claimed, &outputs).unwrap();
        let input = TransactionInput::new(claimed, owner.sign(digest.as_slice()));
        proposed_transactions.push(Transaction::new(vec![input], outputs).unwrap());
    }
    (utxo_pool, proposed_transactions)
}

fn seed(index: usize) -> [u8; 32] {
    let mut seed = [0; 32];
    seed[..8].copy_from_slice(&(index as u64).to_le_bytes());
    seed
}

fn handle_transactions_benchmark(c: &mut Criterion) {
    let (utxo_pool, proposed_transactions) = create_ledger();

    let mut group = c.benchmark_group("Batch acceptance");
    group.throughput(Throughput::Elements(TRANSACTION_COUNT as u64));

    // Each iteration starts from a fresh copy of the pool, so every transaction
    // is validated and applied, signature checks included.
    group.bench_function("handle_transactions for 1000 independent spends", |b| {
        b.iter(|| {
            let mut validator = TransactionValidator::new(&utxo_pool);
            let accepted = validator.handle_transactions(black_box(&proposed_transactions));
            black_box(accepted);
        })
    });
    group.finish();
}

criterion_group!(benches, handle_transactions_benchmark);

criterion_main!(benches);

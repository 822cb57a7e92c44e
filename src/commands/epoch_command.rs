use crate::{
    FeePriorityValidator, KeyPair, OutputIndex, Sha256, Transaction, TransactionId,
    TransactionInput, TransactionOutput, TransactionValidator, Utxo, UtxoPool,
};
use clap::{App, Arg, ArgMatches};
use std::error::Error;

struct EpochCliOptions {
    spenders: usize,
    fee_ordered: bool,
}

impl EpochCliOptions {
    pub fn parse(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        let spenders = matches.value_of("spenders").unwrap().parse::<usize>()?;
        if spenders < 2 {
            return Err("The demo ledger needs at least 2 spenders.".into());
        }
        Ok(Self {
            spenders,
            fee_ordered: matches.is_present("fee-ordered"),
        })
    }
}

pub fn epoch_command() -> App<'static> {
    App::new("epoch")
        .version("0.1")
        .about("Runs one batch-acceptance epoch over a deterministic demo ledger.")
        .arg(
            Arg::new("spenders")
                .long("spenders")
                .value_name("COUNT")
                .about("Number of accounts that propose transactions.")
                .takes_value(true)
                .default_value("8")
                .required(false),
        )
        .arg(
            Arg::new("fee-ordered")
                .long("fee-ordered")
                .about("Attempt the proposed transactions in ascending fee order.")
                .takes_value(false)
                .required(false),
        )
}

pub fn run_epoch_command(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let options = EpochCliOptions::parse(matches)?;

    let key_pairs = (0..options.spenders)
        .map(|seed| KeyPair::from_seed([seed as u8; 32]))
        .collect::<Vec<KeyPair>>();
    let utxo_pool = genesis_pool(&key_pairs);
    let proposed_transactions = propose_transactions(&key_pairs, &utxo_pool)?;

    println!("Genesis pool holds {} utxos.", utxo_pool.len());
    println!("Proposed {} transactions:", proposed_transactions.len());
    for transaction in &proposed_transactions {
        println!(
            "  {} fee: {}",
            transaction.id(),
            transaction.fee(&utxo_pool)
        );
    }

    let (accepted_transactions, pool_after) = if options.fee_ordered {
        let mut validator = FeePriorityValidator::new(&utxo_pool);
        let accepted = validator.handle_transactions(&proposed_transactions);
        (accepted, validator.utxo_pool().len())
    } else {
        let mut validator = TransactionValidator::new(&utxo_pool);
        let accepted = validator.handle_transactions(&proposed_transactions);
        (accepted, validator.utxo_pool().len())
    };

    println!("Accepted {} transactions:", accepted_transactions.len());
    for transaction in &accepted_transactions {
        println!("  {}", transaction.id());
    }
    println!("Pool holds {} utxos after the epoch.", pool_after);
    Ok(())
}

// Gives every account one spendable output worth 10 plus its index, recorded
// under a synthetic producing-transaction identifier.
fn genesis_pool(key_pairs: &[KeyPair]) -> UtxoPool {
    let mut utxo_pool = UtxoPool::new();
    for (index, key_pair) in key_pairs.iter().enumerate() {
        let utxo = Utxo::new(
            TransactionId::new(Sha256::from_raw([index as u8; 32])),
            OutputIndex::new(0),
        );
        let amount = 10 + index as i64;
        utxo_pool.insert(utxo, TransactionOutput::new(amount, key_pair.public_key()));
    }
    utxo_pool
}

// Every account pays its neighbour, leaving a small fee. The batch also carries
// a conflicting second spend of account 0's output and one overspend, so both
// handlers have something to skip.
fn propose_transactions(
    key_pairs: &[KeyPair],
    utxo_pool: &UtxoPool,
) -> Result<Vec<Transaction>, String> {
    let mut proposed_transactions = Vec::new();
    for (index, key_pair) in key_pairs.iter().enumerate() {
        let claimed = Utxo::new(
            TransactionId::new(Sha256::from_raw([index as u8; 32])),
            OutputIndex::new(0),
        );
        let amount = utxo_pool
            .output(&claimed)
            .ok_or_else(|| format!("No genesis output for account: {}", index))?
            .amount();

        let recipient = &key_pairs[(index + 1) % key_pairs.len()];
        let fee = (index % 4) as i64;
        proposed_transactions.push(spend(
            key_pair,
            claimed,
            amount - fee,
            recipient,
        )?);

        if index == 0 {
            // A conflicting claim over the same output, at a different fee.
            proposed_transactions.push(spend(key_pair, claimed, amount - 5, recipient)?);
        }
        if index == 1 {
            // An overspend that no handler accepts.
            proposed_transactions.push(spend(key_pair, claimed, amount + 10, recipient)?);
        }
    }
    Ok(proposed_transactions)
}

fn spend(
    key_pair: &KeyPair,
    claimed: Utxo,
    amount: i64,
    recipient: &KeyPair,
) -> Result<Transaction, String> {
    let outputs = vec![TransactionOutput::new(amount, recipient.public_key())];
    let digest = Transaction::signable_digest_for(&claimed, &outputs)?;
    let input = TransactionInput::new(claimed, key_pair.sign(digest.as_slice()));
    Transaction::new(vec![input], outputs)
}

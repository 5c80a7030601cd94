//! Push a fixture's transactions through a coordinator.

use std::sync::Arc;

use keyroute_dispatch::{Assignment, Coordinator, Error};
use tokio::task::JoinSet;
use tracing::debug;

use crate::error::Result;
use crate::fixture::TransactionSpec;

/// What happened to one transaction.
#[derive(Debug)]
pub struct Outcome {
    pub transaction: TransactionSpec,
    pub result: std::result::Result<Assignment, Error>,
}

impl Outcome {
    /// One-line human summary.
    pub fn summary(&self) -> String {
        let tx = &self.transaction;
        match &self.result {
            Ok(a) => format!(
                "[TX {}] Assigned key {} from server {} (cost {}, usages={}/{})",
                tx.id, a.key_id, a.server_id, a.distance, a.usages, a.max_usages
            ),
            Err(e) => format!("[TX {}] Denied from {}: {}", tx.id, tx.origin, e),
        }
    }
}

/// Dispatch `transactions`, returning outcomes in input order.
///
/// With one worker the transactions run strictly in sequence. With more,
/// they are dealt round-robin to blocking tasks that race for keys.
pub async fn run(
    coordinator: Arc<Coordinator>,
    transactions: Vec<TransactionSpec>,
    workers: usize,
) -> Result<Vec<Outcome>> {
    if workers <= 1 || transactions.len() <= 1 {
        return Ok(transactions
            .into_iter()
            .map(|tx| dispatch(&coordinator, tx))
            .collect());
    }

    let total = transactions.len();
    let lane_count = workers.min(total);
    let mut lanes: Vec<Vec<(usize, TransactionSpec)>> = vec![Vec::new(); lane_count];
    for (i, tx) in transactions.into_iter().enumerate() {
        lanes[i % lane_count].push((i, tx));
    }

    let mut set = JoinSet::new();
    for (worker, lane) in lanes.into_iter().enumerate() {
        let coordinator = Arc::clone(&coordinator);
        debug!(worker, transactions = lane.len(), "Starting dispatch worker");
        set.spawn_blocking(move || {
            lane.into_iter()
                .map(|(i, tx)| (i, dispatch(&coordinator, tx)))
                .collect::<Vec<_>>()
        });
    }

    let mut indexed = Vec::with_capacity(total);
    while let Some(joined) = set.join_next().await {
        indexed.extend(joined?);
    }
    indexed.sort_by_key(|(i, _)| *i);

    Ok(indexed.into_iter().map(|(_, outcome)| outcome).collect())
}

fn dispatch(coordinator: &Coordinator, transaction: TransactionSpec) -> Outcome {
    let result = coordinator.assign_key(&transaction.id, &transaction.origin);
    Outcome {
        transaction,
        result,
    }
}

//! Transaction generation and the end-of-run safety audit.

use std::collections::{HashMap, HashSet};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use snowdag_consensus::{Network, Result, TxId};

use crate::config::SimConfig;

/// Outcome of one simulation run.
pub struct SimOutcome {
    /// The network in its final state, for inspection or DOT dumps.
    pub network: Network,
    /// Summary statistics and the safety audit.
    pub report: SimReport,
}

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimReport {
    /// Transactions generated, double-spends included.
    pub generated: usize,
    /// Distinct `data` values that were spent more than once.
    pub double_spend_data: Vec<i64>,
    /// Rounds executed, including the quiescence tail.
    pub rounds: u64,
    /// Accepted transaction count per node.
    pub accepted_per_node: Vec<usize>,
    /// Contested `data` values with more than one accepted member
    /// anywhere in the network, with the offending ids.
    pub violations: Vec<(i64, Vec<TxId>)>,
}

impl SimReport {
    /// True if the single-acceptance safety property held.
    pub fn is_safe(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Runs a full simulation from `config`: generation with double-spend
/// injection, rounds to quiescence, then the safety audit.
pub fn run_simulation(config: &SimConfig) -> Result<SimOutcome> {
    let mut network = Network::new(config.nodes, config.parameters(), config.seed)?;
    // The driver's own deterministic stream. Author picks and
    // double-spend decisions must not perturb the network's RNG
    // consumption, or replaying a seed under a tweaked driver would
    // change the consensus run itself.
    let mut rng = StdRng::seed_from_u64(config.seed);

    // data value -> author of the first spend
    let mut spends: Vec<(i64, usize)> = Vec::new();
    let mut double_spend_data: Vec<i64> = Vec::new();
    let mut next_data: i64 = 0;

    for _ in 0..config.transactions {
        let double = config.nodes > 1
            && !spends.is_empty()
            && rng.gen::<f64>() < config.double_spend_ratio;
        let respend = if double {
            spends.choose(&mut rng).copied()
        } else {
            None
        };
        let (author, data) = match respend {
            Some((data, first_author)) => {
                // A genuine double-spend: the same data value, authored
                // by a node other than the original spender.
                let offset = rng.gen_range(0..config.nodes - 1);
                let author = (first_author + 1 + offset) % config.nodes;
                double_spend_data.push(data);
                (author, data)
            }
            None => {
                let author = rng.gen_range(0..config.nodes);
                let data = next_data;
                next_data += 1;
                spends.push((data, author));
                (author, data)
            }
        };
        network.generate(author, data)?;
        network.run()?;
    }

    // Let gossip-via-voting finish propagating before the audit.
    let rounds = network.run_to_quiescence()?;

    let report = audit(&network, config, rounds, double_spend_data);
    info!(
        generated = report.generated,
        double_spends = report.double_spend_data.len(),
        rounds = report.rounds,
        violations = report.violations.len(),
        "simulation finished"
    );
    Ok(SimOutcome { network, report })
}

/// Checks the single-acceptance safety property: for every `data`
/// value with more than one transaction anywhere in the network, at
/// most one of them may be accepted by any node.
fn audit(
    network: &Network,
    config: &SimConfig,
    rounds: u64,
    mut double_spend_data: Vec<i64>,
) -> SimReport {
    let mut members: HashMap<i64, HashSet<TxId>> = HashMap::new();
    for handle in network.nodes() {
        let node = handle.read();
        for tx in node.transactions() {
            members.entry(tx.data).or_default().insert(tx.id);
        }
    }

    let mut accepted_per_node = Vec::with_capacity(network.len());
    let mut accepted_by_data: HashMap<i64, HashSet<TxId>> = HashMap::new();
    for handle in network.nodes() {
        let mut node = handle.write();
        let mut count = 0usize;
        // Arrival order decides parents before their children, so one
        // pass reaches the acceptance fixpoint.
        for id in node.known_ids() {
            if node.is_accepted(id) {
                count += 1;
                if let Some(tx) = node.transaction(id) {
                    accepted_by_data.entry(tx.data).or_default().insert(id);
                }
            }
        }
        accepted_per_node.push(count);
    }

    let mut violations: Vec<(i64, Vec<TxId>)> = Vec::new();
    for (data, member_ids) in &members {
        if member_ids.len() < 2 {
            continue;
        }
        if let Some(accepted) = accepted_by_data.get(data) {
            if accepted.len() > 1 {
                let mut ids: Vec<TxId> = accepted.iter().copied().collect();
                ids.sort();
                warn!(data, accepted = ids.len(), "safety violation");
                violations.push((*data, ids));
            }
        }
    }
    violations.sort_by_key(|(data, _)| *data);

    double_spend_data.sort_unstable();
    double_spend_data.dedup();

    SimReport {
        generated: config.transactions,
        double_spend_data,
        rounds,
        accepted_per_node,
        violations,
    }
}

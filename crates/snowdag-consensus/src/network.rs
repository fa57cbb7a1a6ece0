//! Synchronous round-based network of nodes.

use std::sync::Arc;

use parking_lot::RwLock;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use snowdag_ids::TxId;

use crate::{ConsensusError, Node, Parameters, Result, Transaction};

/// A collection of nodes sharing one seeded RNG, executed in
/// synchronous global rounds.
///
/// The RNG is consumed strictly sequentially: node order within a
/// round, arrival order within a node, sample order within a query.
/// Runs with equal configuration therefore reproduce bit for bit.
/// Each node's mutable state is owned exclusively behind its own lock;
/// nodes interact only by exchanging transaction copies and votes.
#[derive(Debug)]
pub struct Network {
    nodes: Vec<Arc<RwLock<Node>>>,
    rng: StdRng,
    genesis_id: TxId,
    round: u64,
}

impl Network {
    /// Creates `n` nodes, each seeded with its own copy of a shared
    /// genesis vertex.
    ///
    /// # Errors
    ///
    /// `InvalidParameters` if `params` fails validation.
    pub fn new(n: usize, params: Parameters, seed: u64) -> Result<Self> {
        params
            .validate()
            .map_err(ConsensusError::InvalidParameters)?;
        let mut rng = StdRng::seed_from_u64(seed);
        let genesis = Transaction::genesis(TxId::random(&mut rng));
        let nodes = (0..n)
            .map(|i| Arc::new(RwLock::new(Node::new(i, params, genesis.clone()))))
            .collect();
        info!(nodes = n, genesis = %genesis.id, seed, "network initialized");
        Ok(Self {
            nodes,
            rng,
            genesis_id: genesis.id,
            round: 0,
        })
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the network has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Id of the shared genesis vertex.
    pub fn genesis_id(&self) -> TxId {
        self.genesis_id
    }

    /// Rounds executed so far.
    pub fn rounds(&self) -> u64 {
        self.round
    }

    /// Handle to a node, if the index is in range.
    pub fn node(&self, index: usize) -> Option<Arc<RwLock<Node>>> {
        self.nodes.get(index).cloned()
    }

    /// All node handles, in index order.
    pub fn nodes(&self) -> &[Arc<RwLock<Node>>] {
        &self.nodes
    }

    /// Generates a transaction spending `data` at node `author`.
    pub fn generate(&mut self, author: usize, data: i64) -> Result<Transaction> {
        let node = self
            .nodes
            .get(author)
            .cloned()
            .ok_or(ConsensusError::UnknownNode(author))?;
        let tx = node.write().on_generate_tx(data, &mut self.rng)?;
        Ok(tx)
    }

    /// Runs one synchronous round: every node's voting loop, in node
    /// order. Returns the number of query rounds issued across the
    /// network; zero means nothing was left to vote on.
    pub fn run(&mut self) -> Result<usize> {
        self.round += 1;
        let mut issued = 0;
        for i in 0..self.nodes.len() {
            let node = self.nodes[i].clone();
            let mut guard = node.write();
            issued += guard.avalanche_loop(&self.nodes, i, &mut self.rng)?;
        }
        debug!(round = self.round, issued, "round complete");
        Ok(issued)
    }

    /// Runs rounds until a full round issues no queries.
    ///
    /// Terminates because each node votes on each transaction at most
    /// once and the transaction population is finite. Returns the
    /// total round count.
    pub fn run_to_quiescence(&mut self) -> Result<u64> {
        while self.run()? > 0 {}
        Ok(self.round)
    }
}

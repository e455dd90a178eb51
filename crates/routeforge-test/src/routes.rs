//! Random path topologies and routes.
//!
//! Node layout: `0..P` are path starts, `P..2P` path ends, and every node
//! from `2P` on is a customer.
//!
//! # Example
//!
//! ```
//! use routeforge_test::{seeded_rng, RandomRoutes};
//!
//! let mut rng = seeded_rng(7);
//! let routes = RandomRoutes::generate(&mut rng, 3, 20);
//! assert_eq!(routes.topology.num_nodes(), 26);
//! assert_eq!(routes.routes.len(), 3);
//! assert_eq!(routes.routes[1][0], 1);
//! assert_eq!(*routes.routes[1].last().unwrap(), 4);
//! ```

use rand::seq::SliceRandom;
use rand::Rng;
use routeforge_core::{Assignment, Delta, PathTopology};

/// Probability that a generated customer is put on a route.
const PERFORM_PROBABILITY: f64 = 0.75;

/// A topology together with one complete route per path.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomRoutes {
    pub topology: PathTopology,
    pub routes: Vec<Vec<usize>>,
}

impl RandomRoutes {
    /// Builds the empty solution: every route is `start -> end`.
    pub fn empty(num_paths: usize, num_customers: usize) -> Self {
        let topology = Self::topology(num_paths, num_customers);
        let routes = (0..num_paths)
            .map(|path| vec![topology.start(path), topology.end(path)])
            .collect();
        Self { topology, routes }
    }

    /// Spreads a random subset of customers over the paths in random order.
    pub fn generate<R: Rng>(rng: &mut R, num_paths: usize, num_customers: usize) -> Self {
        let mut solution = Self::empty(num_paths, num_customers);
        let mut customers: Vec<usize> = (2 * num_paths..2 * num_paths + num_customers).collect();
        customers.shuffle(rng);
        for customer in customers {
            if num_paths == 0 || !rng.random_bool(PERFORM_PROBABILITY) {
                continue;
            }
            let route = &mut solution.routes[rng.random_range(0..num_paths)];
            let position = route.len() - 1;
            route.insert(position, customer);
        }
        solution
    }

    /// Wraps explicit routes. Routes must start and end at the path nodes.
    pub fn from_routes(num_paths: usize, num_customers: usize, routes: Vec<Vec<usize>>) -> Self {
        let topology = Self::topology(num_paths, num_customers);
        debug_assert!(routes
            .iter()
            .enumerate()
            .all(|(p, r)| r.first() == Some(&topology.start(p)) && r.last() == Some(&topology.end(p))));
        Self { topology, routes }
    }

    fn topology(num_paths: usize, num_customers: usize) -> PathTopology {
        PathTopology::new(
            2 * num_paths + num_customers,
            (0..num_paths).collect(),
            (num_paths..2 * num_paths).collect(),
        )
        .expect("generated topology is valid")
    }

    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.topology.num_nodes()
    }

    #[inline]
    pub fn num_paths(&self) -> usize {
        self.topology.num_paths()
    }

    /// Customers on no route.
    pub fn loops(&self) -> Vec<usize> {
        loops_of(&self.topology, &self.routes)
    }

    pub fn assignment(&self) -> Assignment {
        Assignment::from_routes(&self.topology, &self.routes)
    }

    /// The routes as a delta from the all-loops solution.
    pub fn delta(&self) -> Delta {
        self.assignment().to_delta()
    }
}

/// Nodes appearing on none of `routes`.
pub(crate) fn loops_of(topology: &PathTopology, routes: &[Vec<usize>]) -> Vec<usize> {
    let mut on_route = vec![false; topology.num_nodes()];
    for &node in routes.iter().flatten() {
        on_route[node] = true;
    }
    (0..topology.num_nodes()).filter(|&n| !on_route[n]).collect()
}

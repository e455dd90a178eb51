//! Random valid moves.
//!
//! A move rewrites the routes; its delta is the set of nodes whose next
//! differs between the old and new routes (customers leaving every route
//! get themselves as next). Delta elements are shuffled so consumers never
//! depend on element order.
//!
//! # Example
//!
//! ```
//! use routeforge_test::{seeded_rng, MoveGenerator, MoveKind, RandomRoutes};
//!
//! let mut rng = seeded_rng(3);
//! let routes = RandomRoutes::generate(&mut rng, 2, 10);
//! let generator = MoveGenerator::new(&routes.topology);
//! let mv = generator.generate(&mut rng, &routes.routes, MoveKind::Relocate);
//! if let Some(mv) = mv {
//!     assert!(!mv.delta.has_unbound());
//! }
//! ```

use rand::seq::SliceRandom;
use rand::Rng;
use routeforge_core::{Delta, PathTopology};

use crate::routes::loops_of;

/// Kinds of generated moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// Moves one customer to another position, possibly on another path.
    Relocate,
    /// Exchanges two performed customers.
    Swap,
    /// Reverses a segment of one route.
    TwoOpt,
    /// Removes one customer from its route.
    Unperform,
    /// Inserts an unperformed customer.
    Insert,
    /// Exchanges the tails of two routes.
    CrossExchange,
    /// A delta carrying an unbound element; routes are unchanged.
    Lns,
}

impl MoveKind {
    /// Every kind that produces a fully bound delta.
    pub const BOUND: [MoveKind; 6] = [
        MoveKind::Relocate,
        MoveKind::Swap,
        MoveKind::TwoOpt,
        MoveKind::Unperform,
        MoveKind::Insert,
        MoveKind::CrossExchange,
    ];
}

/// A move: its delta and the routes it leads to.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteMove {
    pub kind: MoveKind,
    pub delta: Delta,
    pub routes: Vec<Vec<usize>>,
}

/// Generates random moves over a fixed topology.
#[derive(Clone, Debug)]
pub struct MoveGenerator {
    topology: PathTopology,
}

impl MoveGenerator {
    pub fn new(topology: &PathTopology) -> Self {
        Self {
            topology: topology.clone(),
        }
    }

    /// Generates a move of `kind`, or `None` when the routes allow none or
    /// the drawn move changes nothing.
    pub fn generate<R: Rng>(&self, rng: &mut R, routes: &[Vec<usize>], kind: MoveKind) -> Option<RouteMove> {
        let mut new_routes = routes.to_vec();
        let applied = match kind {
            MoveKind::Lns => return Some(self.lns(rng, routes)),
            MoveKind::Relocate => relocate(rng, &mut new_routes),
            MoveKind::Swap => swap(rng, &mut new_routes),
            MoveKind::TwoOpt => two_opt(rng, &mut new_routes),
            MoveKind::Unperform => unperform(rng, &mut new_routes).is_some(),
            MoveKind::Insert => insert(rng, &mut new_routes, &loops_of(&self.topology, routes)),
            MoveKind::CrossExchange => cross_exchange(rng, &mut new_routes),
        };
        if !applied {
            return None;
        }
        let delta = self.diff(rng, routes, &new_routes);
        if delta.is_empty() {
            return None;
        }
        Some(RouteMove {
            kind,
            delta,
            routes: new_routes,
        })
    }

    /// Generates a move of a random bound kind; retries until one applies.
    pub fn random_move<R: Rng>(&self, rng: &mut R, routes: &[Vec<usize>]) -> Option<RouteMove> {
        let mut kinds = MoveKind::BOUND;
        kinds.shuffle(rng);
        kinds
            .into_iter()
            .find_map(|kind| self.generate(rng, routes, kind))
    }

    /// Chains up to `max_steps` random bound moves into one compound move.
    pub fn compound_move<R: Rng>(&self, rng: &mut R, routes: &[Vec<usize>], max_steps: usize) -> Option<RouteMove> {
        let steps = rng.random_range(1..=max_steps.max(1));
        let mut current = routes.to_vec();
        let mut kind = None;
        for _ in 0..steps {
            let Some(step) = self.random_move(rng, &current) else {
                break;
            };
            kind.get_or_insert(step.kind);
            current = step.routes;
        }
        let kind = kind?;
        let delta = self.diff(rng, routes, &current);
        if delta.is_empty() {
            return None;
        }
        Some(RouteMove {
            kind,
            delta,
            routes: current,
        })
    }

    fn lns<R: Rng>(&self, rng: &mut R, routes: &[Vec<usize>]) -> RouteMove {
        let num_nodes = self.topology.num_nodes();
        let mut delta = Delta::new();
        let node = loop {
            let node = rng.random_range(0..num_nodes);
            if !self.topology.is_end(node) {
                break node;
            }
        };
        delta.set_unbound(node);
        RouteMove {
            kind: MoveKind::Lns,
            delta,
            routes: routes.to_vec(),
        }
    }

    /// Delta turning `old` into `new`, in random element order.
    pub fn diff<R: Rng>(&self, rng: &mut R, old: &[Vec<usize>], new: &[Vec<usize>]) -> Delta {
        let old_nexts = nexts(&self.topology, old);
        let new_nexts = nexts(&self.topology, new);
        let mut changed: Vec<(usize, usize)> = old_nexts
            .iter()
            .zip(&new_nexts)
            .enumerate()
            .filter(|(_, (o, n))| o != n)
            .filter_map(|(node, (_, n))| n.map(|next| (node, next)))
            .collect();
        changed.shuffle(rng);
        changed.into_iter().collect()
    }
}

fn nexts(topology: &PathTopology, routes: &[Vec<usize>]) -> Vec<Option<usize>> {
    let mut nexts: Vec<Option<usize>> = (0..topology.num_nodes()).map(Some).collect();
    for &end in topology.ends() {
        nexts[end] = None;
    }
    for route in routes {
        for pair in route.windows(2) {
            nexts[pair[0]] = Some(pair[1]);
        }
    }
    nexts
}

/// Positions of customers: `(route, index)` pairs.
fn customer_positions(routes: &[Vec<usize>]) -> Vec<(usize, usize)> {
    routes
        .iter()
        .enumerate()
        .flat_map(|(r, route)| (1..route.len() - 1).map(move |i| (r, i)))
        .collect()
}

fn unperform<R: Rng>(rng: &mut R, routes: &mut [Vec<usize>]) -> Option<usize> {
    let positions = customer_positions(routes);
    if positions.is_empty() {
        return None;
    }
    let (r, i) = positions[rng.random_range(0..positions.len())];
    Some(routes[r].remove(i))
}

fn insert_at_random<R: Rng>(rng: &mut R, routes: &mut [Vec<usize>], node: usize) {
    let r = rng.random_range(0..routes.len());
    let i = rng.random_range(1..routes[r].len());
    routes[r].insert(i, node);
}

fn relocate<R: Rng>(rng: &mut R, routes: &mut [Vec<usize>]) -> bool {
    match unperform(rng, routes) {
        Some(node) => {
            insert_at_random(rng, routes, node);
            true
        }
        None => false,
    }
}

fn insert<R: Rng>(rng: &mut R, routes: &mut [Vec<usize>], loops: &[usize]) -> bool {
    if loops.is_empty() || routes.is_empty() {
        return false;
    }
    let node = loops[rng.random_range(0..loops.len())];
    insert_at_random(rng, routes, node);
    true
}

fn swap<R: Rng>(rng: &mut R, routes: &mut [Vec<usize>]) -> bool {
    let positions = customer_positions(routes);
    if positions.len() < 2 {
        return false;
    }
    let a = rng.random_range(0..positions.len());
    let mut b = rng.random_range(0..positions.len() - 1);
    if b >= a {
        b += 1;
    }
    let (ra, ia) = positions[a];
    let (rb, ib) = positions[b];
    let node_a = routes[ra][ia];
    routes[ra][ia] = routes[rb][ib];
    routes[rb][ib] = node_a;
    true
}

fn two_opt<R: Rng>(rng: &mut R, routes: &mut [Vec<usize>]) -> bool {
    let candidates: Vec<usize> = (0..routes.len()).filter(|&r| routes[r].len() >= 4).collect();
    if candidates.is_empty() {
        return false;
    }
    let route = &mut routes[candidates[rng.random_range(0..candidates.len())]];
    let last = route.len() - 2;
    let i = rng.random_range(1..last);
    let j = rng.random_range(i + 1..=last);
    route[i..=j].reverse();
    true
}

fn cross_exchange<R: Rng>(rng: &mut R, routes: &mut [Vec<usize>]) -> bool {
    if routes.len() < 2 {
        return false;
    }
    let a = rng.random_range(0..routes.len());
    let mut b = rng.random_range(0..routes.len() - 1);
    if b >= a {
        b += 1;
    }
    let i = rng.random_range(1..routes[a].len());
    let j = rng.random_range(1..routes[b].len());
    let end_a = routes[a].pop();
    let end_b = routes[b].pop();
    let tail_a = routes[a].split_off(i.min(routes[a].len()));
    let tail_b = routes[b].split_off(j.min(routes[b].len()));
    if tail_a.is_empty() && tail_b.is_empty() {
        routes[a].extend(end_a);
        routes[b].extend(end_b);
        return false;
    }
    routes[a].extend(tail_b);
    routes[a].extend(end_a);
    routes[b].extend(tail_a);
    routes[b].extend(end_b);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{seeded_rng, RandomRoutes};

    fn is_partition(routes: &RandomRoutes, new_routes: &[Vec<usize>]) -> bool {
        let mut seen = vec![0usize; routes.num_nodes()];
        for &node in new_routes.iter().flatten() {
            seen[node] += 1;
        }
        seen.iter().all(|&count| count <= 1)
            && new_routes.iter().enumerate().all(|(p, r)| {
                r.first() == Some(&routes.topology.start(p)) && r.last() == Some(&routes.topology.end(p))
            })
    }

    #[test]
    fn test_bound_moves_keep_routes_well_formed() {
        let mut rng = seeded_rng(11);
        let routes = RandomRoutes::generate(&mut rng, 3, 15);
        let generator = MoveGenerator::new(&routes.topology);
        for kind in MoveKind::BOUND {
            for _ in 0..50 {
                if let Some(mv) = generator.generate(&mut rng, &routes.routes, kind) {
                    assert!(is_partition(&routes, &mv.routes), "{kind:?} broke routes");
                    assert!(!mv.delta.has_unbound());
                }
            }
        }
    }

    #[test]
    fn test_delta_applied_to_assignment_gives_new_routes() {
        let mut rng = seeded_rng(12);
        let routes = RandomRoutes::generate(&mut rng, 4, 30);
        let generator = MoveGenerator::new(&routes.topology);
        for _ in 0..100 {
            let Some(mv) = generator.compound_move(&mut rng, &routes.routes, 4) else {
                continue;
            };
            let mut assignment = routes.assignment();
            assignment.apply(&mv.delta);
            for path in 0..routes.num_paths() {
                assert_eq!(assignment.route(&routes.topology, path), mv.routes[path]);
            }
        }
    }

    #[test]
    fn test_lns_move_is_unbound() {
        let mut rng = seeded_rng(13);
        let routes = RandomRoutes::generate(&mut rng, 2, 5);
        let generator = MoveGenerator::new(&routes.topology);
        let mv = generator.generate(&mut rng, &routes.routes, MoveKind::Lns).unwrap();
        assert!(mv.delta.has_unbound());
        assert_eq!(mv.routes, routes.routes);
    }

    #[test]
    fn test_empty_routes_allow_only_insert() {
        let mut rng = seeded_rng(14);
        let routes = RandomRoutes::empty(2, 3);
        let generator = MoveGenerator::new(&routes.topology);
        assert!(generator.generate(&mut rng, &routes.routes, MoveKind::Relocate).is_none());
        assert!(generator.generate(&mut rng, &routes.routes, MoveKind::Swap).is_none());
        let mv = generator.generate(&mut rng, &routes.routes, MoveKind::Insert).unwrap();
        assert_eq!(mv.delta.len(), 2);
    }
}

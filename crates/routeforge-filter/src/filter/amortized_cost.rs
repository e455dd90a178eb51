//! Amortized vehicle cost.
//!
//! A used vehicle (one whose route has at least one customer) costs
//! `linear - quadratic * length²`, where `length` is the number of
//! customers on its route. The quadratic part rewards long routes, so
//! minimizing the total favors fewer, fuller vehicles.

use routeforge_core::arithmetic::{cap_add, cap_prod, cap_sub};
use routeforge_core::error::check_len;
use routeforge_core::{Assignment, CommittableArray, CommittableValue, Delta, PathTopology, Result};

use super::{BasePathFilter, LocalSearchFilter, PathFilterHooks, PathFilterState};

/// Hooks computing the amortized cost of every vehicle.
#[derive(Debug, Clone)]
pub struct AmortizedCost {
    linear_cost_factor_of_vehicle: Vec<i64>,
    quadratic_cost_factor_of_vehicle: Vec<i64>,
    // Committed: synchronized. Candidate: last accepted.
    route_lengths: CommittableArray<i64>,
    vehicle_cost: CommittableValue<i64>,
}

impl AmortizedCost {
    fn new(linear_cost_factor_of_vehicle: Vec<i64>, quadratic_cost_factor_of_vehicle: Vec<i64>) -> Self {
        let num_vehicles = linear_cost_factor_of_vehicle.len();
        Self {
            linear_cost_factor_of_vehicle,
            quadratic_cost_factor_of_vehicle,
            route_lengths: CommittableArray::new(num_vehicles, 0),
            vehicle_cost: CommittableValue::new(0),
        }
    }

    /// Cost of one vehicle with `route_length` customers.
    pub fn vehicle_cost(&self, vehicle: usize, route_length: i64) -> i64 {
        if route_length == 0 {
            return 0;
        }
        cap_sub(
            self.linear_cost_factor_of_vehicle[vehicle],
            cap_prod(
                self.quadratic_cost_factor_of_vehicle[vehicle],
                cap_prod(route_length, route_length),
            ),
        )
    }
}

impl PathFilterHooks for AmortizedCost {
    fn name(&self) -> &str {
        "VehicleAmortizedCostFilter"
    }

    fn on_before_synchronize_paths(&mut self, _state: &PathFilterState) {
        self.route_lengths.revert();
    }

    fn on_synchronize_path_from_start(&mut self, state: &PathFilterState, start: usize) {
        let Some(vehicle) = state.topology().path_of_start(start) else {
            return;
        };
        // Customers sit strictly between start (rank 0) and end.
        let route_length = state
            .rank(state.end(vehicle))
            .map_or(0, |rank| rank as i64 - 1);
        self.route_lengths.set(vehicle, route_length);
    }

    fn on_after_synchronize_paths(&mut self, _state: &PathFilterState) {
        self.route_lengths.commit();
        let cost = (0..self.route_lengths.len())
            .map(|vehicle| self.vehicle_cost(vehicle, self.route_lengths.get_committed(vehicle)))
            .fold(0, cap_add);
        self.vehicle_cost.set_and_commit(cost);
    }

    fn initialize_accept_path(&mut self, _state: &PathFilterState) -> bool {
        self.route_lengths.revert();
        self.vehicle_cost.revert();
        true
    }

    fn accept_path(&mut self, state: &PathFilterState, path_start: usize, chain_start: usize, chain_end: usize) -> bool {
        let Some(vehicle) = state.topology().path_of_start(path_start) else {
            return true;
        };
        // The candidate rejoins the synchronized path right after chain_end.
        let (Some(exit), Some(start_rank)) = (state.value(chain_end), state.rank(chain_start)) else {
            return true;
        };
        let Some(exit_rank) = state.rank(exit) else {
            return true;
        };
        let previous_chain_nodes = exit_rank as i64 - 1 - start_rank as i64;

        let mut new_chain_nodes = 0;
        let mut node = chain_start;
        for _ in 0..state.num_nodes() {
            match state.get_next(node) {
                Some(next) if next != exit => {
                    new_chain_nodes += 1;
                    node = next;
                }
                _ => break,
            }
        }

        let previous_route_length = self.route_lengths.get_committed(vehicle);
        let new_route_length = previous_route_length - previous_chain_nodes + new_chain_nodes;
        let delta_cost = cap_sub(
            self.vehicle_cost(vehicle, new_route_length),
            self.vehicle_cost(vehicle, previous_route_length),
        );
        self.route_lengths.set(vehicle, new_route_length);
        self.vehicle_cost.set(cap_add(self.vehicle_cost.get(), delta_cost));
        true
    }

    fn finalize_accept_path(&mut self, _state: &PathFilterState, _objective_min: i64, objective_max: i64) -> bool {
        self.vehicle_cost.get() <= objective_max
    }

    fn accepted_objective_value(&self, state: &PathFilterState) -> i64 {
        if state.lns_detected() {
            0
        } else {
            self.vehicle_cost.get()
        }
    }

    fn synchronized_objective_value(&self) -> i64 {
        self.vehicle_cost.get_committed()
    }
}

/// Filter adding the amortized cost of used vehicles to the objective.
///
/// # Example
///
/// ```
/// use routeforge_core::{Assignment, Delta, PathTopology};
/// use routeforge_filter::{LocalSearchFilter, VehicleAmortizedCostFilter};
///
/// // Two vehicles: 0 -> 2 and 1 -> 3; customers 4 and 5.
/// let topology = PathTopology::new(6, vec![0, 1], vec![2, 3]).unwrap();
/// let mut filter = VehicleAmortizedCostFilter::new(topology.clone(), vec![100, 100], vec![1, 1]).unwrap();
/// let routes = [vec![0, 4, 2], vec![1, 5, 3]];
/// filter.synchronize(&Assignment::from_routes(&topology, &routes), None);
/// assert_eq!(filter.synchronized_objective_value(), 2 * (100 - 1));
///
/// // Moving customer 5 onto vehicle 0 frees vehicle 1.
/// let merge: Delta = [(4, 5), (5, 2), (1, 3)].into_iter().collect();
/// assert!(filter.accept(&merge, None, i64::MIN, i64::MAX));
/// assert_eq!(filter.accepted_objective_value(), 100 - 4);
/// ```
#[derive(Debug, Clone)]
pub struct VehicleAmortizedCostFilter {
    inner: BasePathFilter<AmortizedCost>,
}

impl VehicleAmortizedCostFilter {
    /// Creates the filter with one linear and one quadratic factor per
    /// vehicle (path).
    pub fn new(
        topology: PathTopology,
        linear_cost_factor_of_vehicle: Vec<i64>,
        quadratic_cost_factor_of_vehicle: Vec<i64>,
    ) -> Result<Self> {
        let num_paths = topology.num_paths();
        check_len("linear cost factors", num_paths, linear_cost_factor_of_vehicle.len())?;
        check_len("quadratic cost factors", num_paths, quadratic_cost_factor_of_vehicle.len())?;
        let hooks = AmortizedCost::new(linear_cost_factor_of_vehicle, quadratic_cost_factor_of_vehicle);
        Ok(Self {
            inner: BasePathFilter::new(topology, hooks),
        })
    }

    /// Synchronized number of customers of `vehicle`.
    pub fn route_length(&self, vehicle: usize) -> i64 {
        self.inner.hooks().route_lengths.get_committed(vehicle)
    }

    /// Shared path filter state.
    pub fn state(&self) -> &PathFilterState {
        self.inner.state()
    }
}

impl LocalSearchFilter for VehicleAmortizedCostFilter {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn accept(&mut self, delta: &Delta, deltadelta: Option<&Delta>, objective_min: i64, objective_max: i64) -> bool {
        self.inner.accept(delta, deltadelta, objective_min, objective_max)
    }

    fn synchronize(&mut self, assignment: &Assignment, delta: Option<&Delta>) {
        self.inner.synchronize(assignment, delta);
    }

    fn revert(&mut self) {
        self.inner.revert();
    }

    fn reset(&mut self) {
        self.inner.reset();
    }

    fn accepted_objective_value(&self) -> i64 {
        self.inner.accepted_objective_value()
    }

    fn synchronized_objective_value(&self) -> i64 {
        self.inner.synchronized_objective_value()
    }
}

#[cfg(test)]
#[path = "amortized_cost_tests.rs"]
mod tests;

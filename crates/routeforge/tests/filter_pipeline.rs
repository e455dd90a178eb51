//! Integration tests driving filters configured from TOML.

use std::cell::RefCell;
use std::rc::Rc;

use rand::Rng;
use routeforge::prelude::*;
use routeforge::{console, ChainAlgorithm, ConfigError, EnvironmentMode};
use routeforge_test::{route_is_feasible, seeded_rng, MoveGenerator, RandomRoutes};

const CONFIG: &str = r#"
environment_mode = "full_assert"

[path_state]
chain_algorithm = "sorting"
commit_growth_factor = 2

[dimension]
min_range_size_for_riq = 1
"#;

/// Demand of travelling to `to` for vehicles of `class`: class 1 carries
/// twice the load.
fn demand(load: &[i64], class: usize, to: usize) -> Interval {
    Interval::point(load[to] * (class as i64 + 1))
}

struct Pipeline {
    solution: RandomRoutes,
    load: Vec<i64>,
    path_class: Vec<usize>,
    path_capacity: Vec<Interval>,
    node_capacity: Vec<Interval>,
    path_state: Rc<RefCell<PathState>>,
    filters: Vec<Box<dyn LocalSearchFilter>>,
}

impl Pipeline {
    fn new<R: Rng>(rng: &mut R, config: &FilterConfig) -> Self {
        let num_paths = 4;
        let solution = RandomRoutes::empty(num_paths, 16);
        let num_nodes = solution.num_nodes();
        let load: Vec<i64> = (0..num_nodes)
            .map(|node| if node < 2 * num_paths { 0 } else { rng.random_range(1..=4) })
            .collect();
        let path_class = vec![0, 1, 0, 1];
        let path_capacity = vec![Interval::new(0, 12), Interval::new(0, 20), Interval::new(0, 20), Interval::new(0, 12)];
        let node_capacity: Vec<Interval> = (0..num_nodes)
            .map(|node| if node < num_paths { Interval::point(0) } else { Interval::new(0, 18) })
            .collect();

        let path_state = Rc::new(RefCell::new(PathState::with_config(solution.topology.clone(), config)));
        let evaluators: Vec<DemandEvaluator> = (0..2)
            .map(|class| {
                let load = load.clone();
                Box::new(move |_from: usize, to: usize| demand(&load, class, to)) as DemandEvaluator
            })
            .collect();
        let checker = DimensionChecker::new(
            &path_state.borrow(),
            path_capacity.clone(),
            path_class.clone(),
            evaluators,
            node_capacity.clone(),
            config,
        )
        .unwrap();
        let filters: Vec<Box<dyn LocalSearchFilter>> = vec![
            Box::new(PathStateFilter::new(Rc::clone(&path_state))),
            Box::new(DimensionFilter::new("Load", Rc::clone(&path_state), checker)),
            Box::new(VehicleAmortizedCostFilter::new(solution.topology.clone(), vec![300; num_paths], vec![1; num_paths]).unwrap()),
        ];
        let mut pipeline = Self {
            solution,
            load,
            path_class,
            path_capacity,
            node_capacity,
            path_state,
            filters,
        };
        let assignment = pipeline.solution.assignment();
        for filter in &mut pipeline.filters {
            filter.synchronize(&assignment, None);
        }
        pipeline
    }

    fn feasible(&self, routes: &[Vec<usize>]) -> bool {
        routes.iter().enumerate().all(|(path, route)| {
            let class = self.path_class[path];
            route_is_feasible(route, self.path_capacity[path], &self.node_capacity, |_, to| {
                demand(&self.load, class, to)
            })
        })
    }
}

#[test]
fn test_config_parses() {
    let config = FilterConfig::from_toml_str(CONFIG).unwrap();
    assert_eq!(config.environment_mode, EnvironmentMode::FullAssert);
    assert_eq!(config.path_state.chain_algorithm, ChainAlgorithm::Sorting);
    assert_eq!(config.path_state.commit_growth_factor, 2);
    assert_eq!(config.dimension.min_range_size_for_riq, 1);
}

#[test]
fn test_invalid_config_is_rejected() {
    let err = FilterConfig::from_toml_str("[path_state]\nmax_arcs_for_selection = 0\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_pipeline_agrees_with_reference() {
    console::init();
    assert_eq!(console::init(), console::init());

    let config = FilterConfig::from_toml_str(CONFIG).unwrap();
    let mut rng = seeded_rng(77);
    let mut pipeline = Pipeline::new(&mut rng, &config);
    let generator = MoveGenerator::new(&pipeline.solution.topology);

    let mut accepted = 0;
    for round in 0..400 {
        let step = if round % 3 == 0 {
            generator.compound_move(&mut rng, &pipeline.solution.routes, 4)
        } else {
            generator.random_move(&mut rng, &pipeline.solution.routes)
        };
        let Some(step) = step else {
            continue;
        };
        let expected = pipeline.feasible(&step.routes);
        for filter in &mut pipeline.filters {
            filter.relax(&step.delta, None);
        }
        let result = pipeline
            .filters
            .iter_mut()
            .all(|filter| filter.accept(&step.delta, None, i64::MIN, i64::MAX));
        assert_eq!(result, expected, "round {round}: {:?}", step.kind);

        if result {
            accepted += 1;
            pipeline.solution.routes = step.routes;
            let assignment = pipeline.solution.assignment();
            for filter in &mut pipeline.filters {
                filter.synchronize(&assignment, Some(&step.delta));
            }
        } else {
            for filter in &mut pipeline.filters {
                filter.revert();
            }
        }
        let state = pipeline.path_state.borrow();
        for (path, route) in pipeline.solution.routes.iter().enumerate() {
            assert_eq!(&state.nodes(path).collect::<Vec<_>>(), route);
        }
    }
    assert!(accepted > 0);
}

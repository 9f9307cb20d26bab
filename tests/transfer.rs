use std::collections::BTreeMap;

use proptest::prelude::*;
use trustflow::{
    expand, find_transitive_transfer, EdmondsKarp, FlowNode, MaxFlow, TransferStep, TrustEdge,
    TrustGraph,
};

struct Scenario {
    name: &'static str,
    nodes: &'static [&'static str],
    edges: &'static [(&'static str, &'static str, &'static str, u64)],
    from: &'static str,
    to: &'static str,
    value: u64,
    max_flow: u64,
    transfer_value: u64,
    step_count: usize,
}

const SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "linear chain",
        nodes: &["a", "b", "c", "t"],
        edges: &[("a", "b", "t", 10), ("b", "c", "t", 5)],
        from: "a",
        to: "c",
        value: 5,
        max_flow: 5,
        transfer_value: 5,
        step_count: 2,
    },
    Scenario {
        name: "request above the maximum flow",
        nodes: &["a", "b", "c", "t"],
        edges: &[("a", "b", "t", 10), ("b", "c", "t", 5)],
        from: "a",
        to: "c",
        value: 100,
        max_flow: 5,
        transfer_value: 0,
        step_count: 0,
    },
    Scenario {
        name: "diamond gated by the forwarding account",
        nodes: &["a", "b", "c", "d", "t"],
        edges: &[
            ("a", "b", "t", 10),
            ("b", "c", "t", 5),
            ("b", "d", "t", 7),
            ("c", "d", "t", 5),
        ],
        from: "a",
        to: "d",
        value: 5,
        max_flow: 5,
        transfer_value: 5,
        step_count: 2,
    },
    Scenario {
        name: "disjoint routes with different tokens",
        nodes: &["a", "b", "c", "d", "t1", "t2"],
        edges: &[
            ("a", "b", "t1", 4),
            ("b", "c", "t1", 4),
            ("a", "d", "t2", 6),
            ("d", "c", "t2", 6),
        ],
        from: "a",
        to: "c",
        value: 10,
        max_flow: 10,
        transfer_value: 10,
        step_count: 4,
    },
    Scenario {
        name: "partial request over disjoint routes",
        nodes: &["a", "b", "c", "d", "t1", "t2"],
        edges: &[
            ("a", "b", "t1", 4),
            ("b", "c", "t1", 4),
            ("a", "d", "t2", 6),
            ("d", "c", "t2", 6),
        ],
        from: "a",
        to: "c",
        value: 7,
        max_flow: 10,
        transfer_value: 7,
        step_count: 4,
    },
    Scenario {
        name: "same-token fan-out shares one gate",
        nodes: &["s", "m1", "m2", "r", "t"],
        edges: &[
            ("s", "m1", "t", 5),
            ("s", "m2", "t", 5),
            ("m1", "r", "t", 5),
            ("m2", "r", "t", 5),
        ],
        from: "s",
        to: "r",
        value: 5,
        max_flow: 5,
        transfer_value: 5,
        step_count: 2,
    },
    Scenario {
        name: "zero-edge graph",
        nodes: &["a", "b"],
        edges: &[],
        from: "a",
        to: "b",
        value: 1,
        max_flow: 0,
        transfer_value: 0,
        step_count: 0,
    },
];

fn build_graph(scenario: &Scenario) -> TrustGraph<&'static str, u64> {
    let edges = scenario
        .edges
        .iter()
        .map(|(from, to, token, capacity)| TrustEdge::new(*from, *to, *token, *capacity).unwrap())
        .collect();
    TrustGraph::new(scenario.nodes.to_vec(), edges).unwrap()
}

/// Replays the plan against account balances: the sender starts with the
/// transfer value, every step moves its value, and at the end the sender is
/// drained, the receiver holds the full amount and nobody is negative.
fn assert_successful_transfer(scenario: &Scenario, steps: &[TransferStep<&str, u64>]) {
    let mut balances: BTreeMap<&str, i128> = BTreeMap::new();
    *balances.entry(scenario.from).or_default() += i128::from(scenario.transfer_value);

    for (index, step) in steps.iter().enumerate() {
        assert_eq!(step.step, index + 1, "{}: steps are renumbered 1..N", scenario.name);
        assert!(step.value > 0, "{}: empty step", scenario.name);

        *balances.entry(step.from).or_default() -= i128::from(step.value);
        *balances.entry(step.to).or_default() += i128::from(step.value);

        let capacity = scenario
            .edges
            .iter()
            .find(|(from, to, token, _)| {
                *from == step.from && *to == step.to && *token == step.token
            })
            .map(|(_, _, _, capacity)| *capacity)
            .expect("step without a matching trust relation");
        assert!(
            step.value <= capacity,
            "{}: step value exceeds the declared trust capacity",
            scenario.name
        );
    }

    if !steps.is_empty() {
        assert_eq!(balances[scenario.from], 0, "{}: sender not drained", scenario.name);
        assert_eq!(
            balances[scenario.to],
            i128::from(scenario.transfer_value),
            "{}: receiver balance wrong",
            scenario.name
        );
    }
    for (account, balance) in &balances {
        assert!(*balance >= 0, "{}: negative balance on {account}", scenario.name);
    }
}

#[test]
fn runs_the_scenario_table() {
    for scenario in SCENARIOS {
        let graph = build_graph(scenario);
        let result =
            find_transitive_transfer(&graph, &scenario.from, &scenario.to, scenario.value)
                .unwrap();

        assert_eq!(result.from, scenario.from);
        assert_eq!(result.to, scenario.to);
        assert_eq!(result.max_flow_value, scenario.max_flow, "{}", scenario.name);
        assert_eq!(
            result.transfer_value, scenario.transfer_value,
            "{}",
            scenario.name
        );
        assert_eq!(
            result.transfer_steps.len(),
            scenario.step_count,
            "{}",
            scenario.name
        );

        assert_successful_transfer(scenario, &result.transfer_steps);
    }
}

#[test]
fn repeated_runs_return_identical_plans() {
    for scenario in SCENARIOS {
        let first = find_transitive_transfer(
            &build_graph(scenario),
            &scenario.from,
            &scenario.to,
            scenario.value,
        )
        .unwrap();
        let second = find_transitive_transfer(
            &build_graph(scenario),
            &scenario.from,
            &scenario.to,
            scenario.value,
        )
        .unwrap();
        assert_eq!(first, second, "{}", scenario.name);
    }
}

// Property tests over small random networks: accounts 0..4 trade the tokens
// issued by accounts 4 and 5.

fn arb_edges() -> impl Strategy<Value = Vec<(u64, u64, u64, u64)>> {
    proptest::collection::vec((0u64..4, 0u64..4, 4u64..6, 1u64..50), 0..10).prop_map(|edges| {
        edges
            .into_iter()
            .filter(|(from, to, _, _)| from != to)
            .collect()
    })
}

fn random_graph(edges: &[(u64, u64, u64, u64)]) -> TrustGraph<u64, u64> {
    let edges = edges
        .iter()
        .map(|(from, to, token, capacity)| TrustEdge::new(*from, *to, *token, *capacity).unwrap())
        .collect();
    TrustGraph::new((0..6).collect(), edges).unwrap()
}

proptest! {
    #[test]
    fn max_flow_is_monotone_in_trust_capacity(
        edges in arb_edges(),
        index in any::<prop::sample::Index>(),
        bump in 1u64..50,
    ) {
        prop_assume!(!edges.is_empty());

        let base = find_transitive_transfer(&random_graph(&edges), &0, &3, 1)
            .unwrap()
            .max_flow_value;

        let mut bumped = edges.clone();
        bumped[index.index(edges.len())].3 += bump;
        let raised = find_transitive_transfer(&random_graph(&bumped), &0, &3, 1)
            .unwrap()
            .max_flow_value;

        prop_assert!(raised >= base);
    }

    #[test]
    fn solved_edges_respect_capacity_bounds(edges in arb_edges()) {
        let graph = random_graph(&edges);
        let mut network = expand(&graph).unwrap();
        let source = network.node_index(&FlowNode::Account(0)).unwrap();
        let sink = network.node_index(&FlowNode::Account(3)).unwrap();

        EdmondsKarp::default().max_flow(&mut network, source, sink).unwrap();

        for edge in network.edges() {
            prop_assert!(edge.flow() <= edge.capacity());
        }
    }
}

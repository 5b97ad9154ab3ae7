use modorder::core::graph::{Entity, EntityGraph, GraphBuilder};
use modorder::core::naming::FileKind;
use modorder::core::order::wave_sort;
use modorder::Error;
use std::collections::HashMap;
use std::path::PathBuf;

fn graph(nodes: &[&str], deps: &[(&str, &str)]) -> EntityGraph {
    let mut gb = GraphBuilder::new();
    for name in nodes {
        gb.add_entity(Entity::new(
            name.to_string(),
            PathBuf::from(format!("modular_{name}.py")),
            FileKind::Modular,
        ))
        .unwrap();
    }
    for (dependent, dependency) in deps {
        gb.add_dependency(dependent, dependency, dependency).unwrap();
    }
    gb.build()
}

fn waves(graph: &EntityGraph) -> Vec<Vec<String>> {
    wave_sort(graph)
        .unwrap()
        .waves
        .iter()
        .map(|wave| {
            wave.iter()
                .map(|&idx| graph.graph()[idx].name.clone())
                .collect()
        })
        .collect()
}

#[test]
fn chain_has_a_single_valid_order() {
    let g = graph(&["C", "B", "A"], &[("B", "A"), ("C", "A"), ("C", "B")]);
    assert_eq!(waves(&g), vec![vec!["A"], vec!["B"], vec!["C"]]);
}

#[test]
fn independent_entities_share_a_wave_in_name_order() {
    let g = graph(&["Z", "Y", "X"], &[("Z", "X"), ("Z", "Y")]);
    assert_eq!(waves(&g), vec![vec!["X", "Y"], vec!["Z"]]);

    let sorted = wave_sort(&g).unwrap();
    assert_eq!(sorted.len(), 3);
    let order: Vec<&str> = sorted.order().map(|idx| g.graph()[idx].name.as_str()).collect();
    assert_eq!(order, vec!["X", "Y", "Z"]);
}

#[test]
fn empty_graph_sorts_to_nothing() {
    let g = graph(&[], &[]);
    let sorted = wave_sort(&g).unwrap();
    assert!(sorted.is_empty());
    assert_eq!(sorted.len(), 0);
}

#[test]
fn two_node_cycle_is_an_error() {
    let g = graph(&["P", "Q"], &[("P", "Q"), ("Q", "P")]);
    match wave_sort(&g) {
        Err(Error::CyclicDependency { unresolved, cycles }) => {
            assert_eq!(unresolved, vec!["P", "Q"]);
            assert_eq!(cycles, vec![vec!["P", "Q"]]);
        }
        other => panic!("expected CyclicDependency, got {other:?}"),
    }
}

#[test]
fn cycle_error_lists_blocked_dependents_separately_from_the_cycle() {
    let g = graph(
        &["P", "Q", "R", "S"],
        &[("P", "Q"), ("Q", "P"), ("R", "P"), ("R", "S")],
    );
    match wave_sort(&g) {
        Err(Error::CyclicDependency { unresolved, cycles }) => {
            assert_eq!(unresolved, vec!["P", "Q", "R"]);
            assert_eq!(cycles, vec![vec!["P", "Q"]]);
        }
        other => panic!("expected CyclicDependency, got {other:?}"),
    }
}

#[test]
fn every_edge_points_backwards_in_the_order() {
    let names: Vec<String> = (0..40).map(|i| format!("m{i:02}")).collect();
    let mut deps = Vec::new();
    for i in 0..names.len() {
        for j in 0..i {
            if (i * 7 + j * 3) % 5 == 0 {
                deps.push((names[i].as_str(), names[j].as_str()));
            }
        }
    }
    let node_refs: Vec<&str> = names.iter().rev().map(String::as_str).collect();
    let g = graph(&node_refs, &deps);

    let sorted = wave_sort(&g).unwrap();
    let position: HashMap<&str, usize> = sorted
        .order()
        .enumerate()
        .map(|(pos, idx)| (g.graph()[idx].name.as_str(), pos))
        .collect();

    assert_eq!(position.len(), names.len());
    for (dependent, dependency) in g.edges() {
        assert!(
            position[dependency] < position[dependent],
            "{dependency} must precede {dependent}"
        );
    }
}

//! Project-local module graph and cycle detection

use crate::scan::ModuleId;
use crate::source::{Reference, ReferenceKind};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Directed module graph keyed by module display name
#[derive(Debug, Clone, Default)]
pub struct ModuleGraph {
    /// `use` edges; the only edges considered for cycles
    pub uses: BTreeMap<String, BTreeSet<String>>,
    /// Parent to child `mod` declarations
    pub declarations: BTreeMap<String, BTreeSet<String>>,
}

impl ModuleGraph {
    /// Build the graph from each module's references
    pub fn build<'a, I>(modules: I) -> Self
    where
        I: IntoIterator<Item = (&'a ModuleId, &'a [Reference])>,
    {
        let modules: Vec<_> = modules.into_iter().collect();
        let known: HashSet<&ModuleId> = modules.iter().map(|(id, _)| *id).collect();
        let mut graph = ModuleGraph::default();

        for (importer, references) in &modules {
            let from = importer.to_string();
            graph.uses.entry(from.clone()).or_default();

            for reference in references.iter() {
                let Some(target) = resolve(importer, &reference.path, &known) else {
                    continue;
                };
                if &target == *importer {
                    continue;
                }
                let edges = match reference.kind {
                    ReferenceKind::Use => &mut graph.uses,
                    ReferenceKind::Mod => &mut graph.declarations,
                };
                edges.entry(from.clone()).or_default().insert(target.to_string());
            }
        }

        graph
    }

    pub fn edge_count(&self) -> usize {
        self.uses.values().map(BTreeSet::len).sum()
    }

    /// Cycles among `use` edges
    pub fn cycles(&self) -> Vec<Vec<String>> {
        detect_cycles(&self.uses)
    }
}

/// Resolve a `crate::`/`super::`/`self::` path to the longest matching known
/// module of the importer's target.
pub fn resolve(
    importer: &ModuleId,
    path: &[String],
    known: &HashSet<&ModuleId>,
) -> Option<ModuleId> {
    let (first, rest) = path.split_first()?;
    let mut base = match first.as_str() {
        "crate" => ModuleId::root(importer.target.clone()),
        "self" => importer.clone(),
        "super" => importer.parent()?,
        _ => return None,
    };

    let mut rest = rest;
    if first == "super" {
        while let Some((segment, tail)) = rest.split_first() {
            if segment != "super" {
                break;
            }
            base = base.parent()?;
            rest = tail;
        }
    }

    let mut best = known.contains(&base).then(|| base.clone());
    let mut current = base;
    for segment in rest {
        current = current.child(segment);
        if known.contains(&current) {
            best = Some(current.clone());
        }
    }
    best
}

/// Cycles closed by back edges of a single depth-first pass, each written as
/// `[a, b, a]`.
///
/// Nodes are visited once, so a cycle sharing nodes with one already walked
/// may go unreported; every cyclic component yields at least one cycle.
/// Rotations of the same cycle are reported once.
pub fn detect_cycles(graph: &BTreeMap<String, BTreeSet<String>>) -> Vec<Vec<String>> {
    let empty = BTreeSet::new();
    let mut visited: HashSet<&String> = HashSet::new();
    let mut seen: HashSet<Vec<String>> = HashSet::new();
    let mut cycles = Vec::new();

    for start in graph.keys() {
        if visited.contains(start) {
            continue;
        }

        let mut path: Vec<&String> = vec![start];
        let mut frames = vec![graph.get(start).unwrap_or(&empty).iter()];
        visited.insert(start);

        loop {
            let next = match frames.last_mut() {
                Some(neighbors) => neighbors.next(),
                None => break,
            };

            match next {
                Some(node) if !visited.contains(node) => {
                    visited.insert(node);
                    path.push(node);
                    frames.push(graph.get(node).unwrap_or(&empty).iter());
                }
                Some(node) => {
                    if let Some(index) = path.iter().position(|n| *n == node) {
                        let core: Vec<String> = path[index..].iter().map(|n| n.to_string()).collect();
                        if seen.insert(minimal_rotation(&core)) {
                            let mut cycle = core;
                            cycle.push(node.clone());
                            cycles.push(cycle);
                        }
                    }
                }
                None => {
                    frames.pop();
                    path.pop();
                }
            }
        }
    }

    cycles
}

fn minimal_rotation(core: &[String]) -> Vec<String> {
    (0..core.len())
        .map(|i| {
            let mut rotated = core[i..].to_vec();
            rotated.extend_from_slice(&core[..i]);
            rotated
        })
        .min()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(&str, &str)]) -> BTreeMap<String, BTreeSet<String>> {
        let mut graph: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (from, to) in edges {
            graph.entry(from.to_string()).or_default().insert(to.to_string());
            graph.entry(to.to_string()).or_default();
        }
        graph
    }

    fn use_ref(path: &str) -> Reference {
        Reference {
            kind: ReferenceKind::Use,
            path: path.split("::").map(str::to_string).collect(),
            line: 1,
        }
    }

    #[test]
    fn test_two_module_cycle_reported_once() {
        let cycles = detect_cycles(&graph(&[("svc::a", "svc::b"), ("svc::b", "svc::a")]));
        assert_eq!(cycles, vec![vec!["svc::a", "svc::b", "svc::a"]]);
    }

    #[test]
    fn test_minimal_rotation() {
        let core: Vec<String> = ["c", "a", "b"].iter().map(|s| s.to_string()).collect();
        assert_eq!(minimal_rotation(&core), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_three_node_ring() {
        let cycles = detect_cycles(&graph(&[
            ("c", "a"),
            ("a", "b"),
            ("b", "c"),
            ("d", "b"),
        ]));
        assert_eq!(cycles, vec![vec!["a", "b", "c", "a"]]);
    }

    #[test]
    fn test_one_pass_reports_back_edge_cycles_only() {
        // a -> c -> a is closed through a node already finished
        let cycles = detect_cycles(&graph(&[
            ("a", "b"),
            ("a", "c"),
            ("b", "c"),
            ("c", "a"),
        ]));
        assert_eq!(cycles, vec![vec!["a", "b", "c", "a"]]);
    }

    #[test]
    fn test_acyclic_graph() {
        let cycles = detect_cycles(&graph(&[("a", "b"), ("b", "c"), ("a", "c")]));
        assert!(cycles.is_empty());
    }

    #[test]
    fn test_self_loop() {
        let cycles = detect_cycles(&graph(&[("a", "a")]));
        assert_eq!(cycles, vec![vec!["a", "a"]]);
    }

    #[test]
    fn test_resolve() {
        let root = ModuleId::root("svc");
        let api = root.child("api");
        let handler = api.child("handler");
        let errors = root.child("errors");
        let known: HashSet<&ModuleId> = [&root, &api, &handler, &errors].into_iter().collect();

        let path = |p: &str| use_ref(p).path;
        assert_eq!(
            resolve(&handler, &path("crate::errors::ServiceError"), &known),
            Some(errors.clone())
        );
        assert_eq!(resolve(&handler, &path("super::Thing"), &known), Some(api.clone()));
        assert_eq!(
            resolve(&handler, &path("super::super::errors"), &known),
            Some(errors.clone())
        );
        assert_eq!(resolve(&api, &path("self::handler::run"), &known), Some(handler.clone()));
        assert_eq!(resolve(&api, &path("crate::VERSION"), &known), Some(root.clone()));
        assert_eq!(resolve(&root, &path("super::x"), &known), None);
    }

    #[test]
    fn test_build_excludes_declarations_from_cycles() {
        let root = ModuleId::root("svc");
        let a = root.child("a");
        let b = root.child("b");

        let root_refs = vec![
            Reference {
                kind: ReferenceKind::Mod,
                path: vec!["self".into(), "a".into()],
                line: 1,
            },
            Reference {
                kind: ReferenceKind::Mod,
                path: vec!["self".into(), "b".into()],
                line: 2,
            },
        ];
        let a_refs = vec![use_ref("crate::b::Thing"), use_ref("crate::VERSION")];
        let b_refs = vec![use_ref("super::a::Other")];

        let graph = ModuleGraph::build([
            (&root, root_refs.as_slice()),
            (&a, a_refs.as_slice()),
            (&b, b_refs.as_slice()),
        ]);

        assert_eq!(graph.declarations["svc"].len(), 2);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(
            graph.cycles(),
            vec![vec!["svc::a", "svc::b", "svc::a"]]
        );
    }
}

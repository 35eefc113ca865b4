// tests/integration_pipeline.rs
//! End-to-end behaviour of aggregation through encoding.

use comention_core::aggregate::{aggregate, aggregate_par};
use comention_core::config::Config;
use comention_core::encode::{sankey, SankeyLink};
use comention_core::graph;
use comention_core::merge::{merge_range, PeriodRange};
use comention_core::pipeline::{run_detailed, run_query, Query};
use comention_core::select::top_k;
use comention_core::{Observation, PairKey, PeriodCountTable};

fn obs(doc: &str, period: i32, entity: &str) -> Observation {
    Observation::new(doc, period, entity)
}

fn pair(a: &str, b: &str) -> PairKey {
    PairKey::new(a, b).unwrap()
}

fn worked_example() -> Vec<Observation> {
    vec![
        obs("d1", 2010, "A"),
        obs("d1", 2010, "B"),
        obs("d1", 2010, "C"),
        obs("d2", 2010, "A"),
        obs("d2", 2010, "B"),
        obs("d3", 2011, "B"),
        obs("d3", 2011, "C"),
    ]
}

/// Deterministic pseudo-corpus: 300 documents over 12 periods, 1-8 mentions each.
fn corpus() -> Vec<Observation> {
    let names = ["numpy", "scipy", "R", "SPSS", "Excel", "ImageJ", "MATLAB", "Stata", "pandas", "ggplot2"];
    let mut state: u64 = 0x1234_5678;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };
    let mut out = Vec::new();
    for d in 0..300u64 {
        let period = 2000 + (next() % 12) as i32;
        let mentions = 1 + next() % 8;
        for _ in 0..mentions {
            let name = names[(next() % names.len() as u64) as usize];
            out.push(obs(&format!("doc{d}"), period, name));
        }
    }
    out
}

#[test]
fn test_worked_example_table() {
    let (table, stats) = aggregate(&worked_example());
    assert_eq!(table.count(2010, &pair("A", "B")), 2);
    assert_eq!(table.count(2010, &pair("A", "C")), 1);
    assert_eq!(table.count(2010, &pair("B", "C")), 1);
    assert_eq!(table.count(2011, &pair("B", "C")), 1);
    assert_eq!(table.entry_count(), 4);
    assert_eq!(stats.documents, 3);
    assert_eq!(stats.pair_increments, 5);
}

#[test]
fn test_worked_example_merge_select_build() {
    let (table, _) = aggregate(&worked_example());
    let merged = merge_range(&table, PeriodRange::new(2010, 2011).unwrap());
    assert_eq!(merged.get(&pair("A", "B")), 2);
    assert_eq!(merged.get(&pair("A", "C")), 1);
    assert_eq!(merged.get(&pair("B", "C")), 2);

    let top = top_k(&merged, 2);
    assert_eq!(top.len(), 2);
    assert_eq!((top[0].pair.clone(), top[0].count), (pair("A", "B"), 2));
    assert_eq!((top[1].pair.clone(), top[1].count), (pair("B", "C"), 2));

    let g = graph::build(&top);
    assert_eq!(g.node_count(), 3);
    assert_eq!(g.node("A").unwrap().total_weight, 2);
    assert_eq!(g.node("B").unwrap().total_weight, 4);
    assert_eq!(g.node("C").unwrap().total_weight, 2);
}

#[test]
fn test_each_document_contributes_k_choose_two() {
    let input = corpus();
    let (groups, _) = comention_core::aggregate::group_documents(&input);
    let expected: u64 = groups.iter().map(|g| g.pair_count()).sum();
    let (table, stats) = aggregate(&input);
    assert_eq!(stats.pair_increments, expected);

    let total: u64 = table
        .periods()
        .filter_map(|p| table.period(p))
        .flat_map(|m| m.values())
        .sum();
    assert_eq!(total, expected);
}

#[test]
fn test_parallel_matches_serial() {
    let input = corpus();
    let (serial, s_stats) = aggregate(&input);
    let (parallel, p_stats) = aggregate_par(&input);
    assert_eq!(serial, parallel);
    assert_eq!(s_stats, p_stats);
}

#[test]
fn test_merge_splits_are_additive() {
    let (table, _) = aggregate(&corpus());
    let whole = merge_range(&table, PeriodRange::new(1999, 2012).unwrap());
    for mid in 1999..2012 {
        let mut left = merge_range(&table, PeriodRange::new(1999, mid).unwrap());
        left.absorb(&merge_range(&table, PeriodRange::new(mid + 1, 2012).unwrap()));
        assert_eq!(left, whole, "split at {mid}");
    }
}

#[test]
fn test_top_k_is_sorted_subset() {
    let (table, _) = aggregate(&corpus());
    let merged = merge_range(&table, PeriodRange::new(2000, 2011).unwrap());
    for k in [0, 1, 5, 20, 1000] {
        let top = top_k(&merged, k);
        assert_eq!(top.len(), k.min(merged.len()));
        for w in &top {
            assert_eq!(merged.get(&w.pair), w.count);
        }
        for pair in top.windows(2) {
            assert!(
                pair[0].count > pair[1].count
                    || (pair[0].count == pair[1].count && pair[0].pair < pair[1].pair)
            );
        }
    }
}

#[test]
fn test_handshake_on_built_graph() {
    let (table, _) = aggregate(&corpus());
    let merged = merge_range(&table, PeriodRange::new(2000, 2011).unwrap());
    let g = graph::build(&top_k(&merged, 25));
    let node_sum: u64 = g.nodes().iter().map(|n| n.total_weight).sum();
    assert_eq!(node_sum, 2 * g.total_edge_weight());
    let degree_sum: usize = g.nodes().iter().map(|n| n.degree).sum();
    assert_eq!(degree_sum, 2 * g.edge_count());
}

#[test]
fn test_query_is_reproducible() {
    let (table, _) = aggregate(&corpus());
    let q = Query::new(2002, 2009, 30).unwrap();
    let config = Config::default();
    assert_eq!(run_query(&table, &q, &config), run_query(&table, &q, &config));
}

#[test]
fn test_concurrent_queries_share_table() {
    let (table, _) = aggregate(&corpus());
    let config = Config::default();
    let queries: Vec<Query> = (0..4)
        .map(|i| Query::new(2000 + i, 2008 + i, 10 + i64::from(i)).unwrap())
        .collect();

    let (table, config) = (&table, &config);
    let sequential: Vec<_> = queries.iter().map(|q| run_query(table, q, config)).collect();
    let concurrent: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = queries
            .iter()
            .map(|q| s.spawn(move || run_query(table, q, config)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(sequential, concurrent);
}

#[test]
fn test_empty_inputs_do_not_crash() {
    let (table, stats) = aggregate(&[]);
    assert!(table.is_empty());
    assert_eq!(stats.documents, 0);

    let q = Query::new(2000, 2000, 10).unwrap();
    let out = run_detailed(&table, &q, &Config::default());
    assert!(out.selected.is_empty());
    assert!(out.graph.is_empty());
    assert!(out.encoded.is_empty());
    assert_eq!(out.encoded.color_domain.min_degree, 0);
}

#[test]
fn test_range_outside_data_is_empty_not_error() {
    let (table, _) = aggregate(&worked_example());
    let q = Query::new(1950, 1960, 10).unwrap();
    assert!(run_query(&table, &q, &Config::default()).is_empty());
}

#[test]
fn test_encoded_nodes_match_layout() {
    let (table, _) = aggregate(&corpus());
    let q = Query::new(2000, 2011, 15).unwrap();
    let out = run_detailed(&table, &q, &Config::default());
    assert_eq!(out.encoded.nodes.len(), out.graph.node_count());
    for (i, node) in out.encoded.nodes.iter().enumerate() {
        let p = out.layout.get(i).unwrap();
        assert_eq!((node.x, node.y), (p.x, p.y));
        assert_eq!(node.color_value, out.graph.nodes()[i].degree);
    }
    let dom = out.encoded.color_domain;
    assert!(out
        .encoded
        .nodes
        .iter()
        .all(|n| (dom.min_degree..=dom.max_degree).contains(&n.degree)));
}

#[test]
fn test_table_is_untouched_by_queries() {
    let (table, _) = aggregate(&worked_example());
    let snapshot: PeriodCountTable = table.clone();
    let _ = run_query(&table, &Query::new(2010, 2011, 1).unwrap(), &Config::default());
    assert_eq!(table, snapshot);
}

#[test]
fn test_worked_example_sankey() {
    let (table, _) = aggregate(&worked_example());
    let out = run_detailed(&table, &Query::new(2010, 2011, 2).unwrap(), &Config::default());
    let payload = sankey(&out.graph);
    let names: Vec<&str> = payload.nodes.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "C"]);
    assert_eq!(
        payload.links,
        vec![
            SankeyLink { source: 0, target: 1, value: 2 },
            SankeyLink { source: 1, target: 2, value: 2 },
        ]
    );
}

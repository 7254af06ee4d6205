//! End-to-end tests over the library API: parse, edit, serialize.

use agp_curator::{parse_agp, run_script, write_agp_string, Direction};

const SAMPLE: &str = "\
chr1\t1\t100\t1\tW\tseq1\t1\t100\t+
chr1\t101\t200\t2\tN\t100\tscaffold\tyes\tna
chr1\t201\t250\t3\tW\tseq2\t1\t50\t-
chr1\t251\t350\t4\tN\t100\tscaffold\tyes\tna
chr1\t351\t430\t5\tW\tseq3\t1\t80\t+
chr2\t1\t60\t1\tW\tseq4\t1\t60\t+
";

#[test]
fn round_trip_without_edits() {
    let mut graph = parse_agp(SAMPLE.as_bytes()).unwrap();
    assert_eq!(write_agp_string(&mut graph), SAMPLE);
    graph.check_invariants().unwrap();
}

#[test]
fn isolate_then_reinsert_is_identity() {
    let mut graph = parse_agp(SAMPLE.as_bytes()).unwrap();

    let seq2 = graph.lookup("seq2:1-50").unwrap();
    let seq1 = graph.lookup("seq1:1-100").unwrap();
    let segment = graph.isolate(seq2, seq2).unwrap();
    graph.insert(segment, seq1, Direction::After).unwrap();

    assert_eq!(write_agp_string(&mut graph), SAMPLE);
    graph.check_invariants().unwrap();
}

#[test]
fn isolate_then_reinsert_before_is_identity() {
    let mut graph = parse_agp(SAMPLE.as_bytes()).unwrap();

    let seq2 = graph.lookup("seq2:1-50").unwrap();
    let seq3 = graph.lookup("seq3:1-80").unwrap();
    let segment = graph.isolate(seq2, seq2).unwrap();
    graph.insert(segment, seq3, Direction::Before).unwrap();

    assert_eq!(write_agp_string(&mut graph), SAMPLE);
    graph.check_invariants().unwrap();
}

#[test]
fn move_across_objects_renumbers_coordinates() {
    let mut graph = parse_agp(SAMPLE.as_bytes()).unwrap();
    run_script(&mut graph, "MOVE seq4:1-60 AFTER seq3:1-80").unwrap();

    let expected = "\
chr1\t1\t100\t1\tW\tseq1\t1\t100\t+
chr1\t101\t200\t2\tN\t100\tscaffold\tyes\tna
chr1\t201\t250\t3\tW\tseq2\t1\t50\t-
chr1\t251\t350\t4\tN\t100\tscaffold\tyes\tna
chr1\t351\t430\t5\tW\tseq3\t1\t80\t+
chr1\t431\t530\t6\tU\t100\tscaffold\tyes\tna
chr1\t531\t590\t7\tW\tseq4\t1\t60\t+
";
    assert_eq!(write_agp_string(&mut graph), expected);
    graph.check_invariants().unwrap();
}

#[test]
fn split_scenario() {
    let input = "\
chr1\t1\t100\t1\tW\tseq1\t1\t100\t+
chr1\t101\t200\t2\tN\t100\tscaffold\tyes\tna
chr1\t201\t250\t3\tW\tseq2\t1\t50\t-
";
    let mut graph = parse_agp(input.as_bytes()).unwrap();
    run_script(&mut graph, "SPLIT seq1:1-100 AT 50").unwrap();

    let expected = "\
chr1\t1\t50\t1\tW\tseq1\t1\t50\t+
chr1\t51\t150\t2\tU\t100\tscaffold\tyes\tna
chr1\t151\t200\t3\tW\tseq1\t51\t100\t+
chr1\t201\t300\t4\tN\t100\tscaffold\tyes\tna
chr1\t301\t350\t5\tW\tseq2\t1\t50\t-
";
    assert_eq!(write_agp_string(&mut graph), expected);
    graph.check_invariants().unwrap();
}

#[test]
fn create_scenario() {
    let input = "\
chr1\t1\t100\t1\tW\tseq1\t1\t100\t+
chr1\t101\t200\t2\tN\t100\tscaffold\tyes\tna
chr1\t201\t250\t3\tW\tseq2\t1\t50\t-
";
    let mut graph = parse_agp(input.as_bytes()).unwrap();
    run_script(&mut graph, "CREATE scaffold2 FROM seq2:1-50").unwrap();

    let expected = "\
chr1\t1\t100\t1\tW\tseq1\t1\t100\t+
scaffold2\t1\t50\t1\tW\tseq2\t1\t50\t-
";
    assert_eq!(write_agp_string(&mut graph), expected);
    graph.check_invariants().unwrap();
}

#[test]
fn revcomp_keeps_source_range() {
    let mut graph = parse_agp(SAMPLE.as_bytes()).unwrap();
    run_script(&mut graph, "REVCOMP seq2:1-50").unwrap();

    let out = write_agp_string(&mut graph);
    assert!(out.contains("W\tseq2\t1\t50\t+"));
    graph.check_invariants().unwrap();
}

#[test]
fn simplify_preserves_placement_span() {
    let input = "\
chr1\t1\t100\t1\tW\tseq1\t1\t100\t+
chr1\t101\t200\t2\tN\t100\tscaffold\tyes\tna
chr1\t201\t300\t3\tW\tseq1\t101\t200\t+
chr1\t301\t400\t4\tN\t100\tscaffold\tyes\tna
chr1\t401\t450\t5\tW\tseq2\t1\t50\t-
";
    let mut graph = parse_agp(input.as_bytes()).unwrap();

    let span_before = placement_span(&graph);
    assert_eq!(graph.simplify().unwrap(), 1);
    assert_eq!(placement_span(&graph), span_before);
    assert_eq!(graph.simplify().unwrap(), 0);

    let out = write_agp_string(&mut graph);
    assert!(out.contains("W\tseq1\t1\t200\t+"));
    graph.check_invariants().unwrap();
}

#[test]
fn long_mixed_script_keeps_indices_consistent() {
    let mut graph = parse_agp(SAMPLE.as_bytes()).unwrap();
    run_script(
        &mut graph,
        "SPLIT seq1:1-100 AT 40
         REV seq2:1-50 THRU seq3:1-80
         MOVE seq1:1-40 AFTER seq4:1-60
         CREATE scaffold9 FROM seq3:1-80
         REVCOMP seq1:41-100 THRU END",
    )
    .unwrap();

    graph.check_invariants().unwrap();
    assert_eq!(graph.object_count(), 3);
    // Every placement is still addressable under its exact key.
    for key in ["seq1:1-40", "seq1:41-100", "seq2:1-50", "seq3:1-80", "seq4:1-60"] {
        assert!(graph.lookup(key).is_some(), "missing {key}");
    }
}

#[test]
fn inverted_source_range_is_a_parse_error() {
    // An inverted range would give placement widths no meaning, so it
    // must die at parse time rather than reach the serializer.
    let text = "chr1\t1\t10\t1\tW\tseq1\t10\t5\t+\n";
    let err = parse_agp(text.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("line 1"));
    assert!(err.to_string().contains("inverted"));
}

fn placement_span(graph: &agp_curator::AgpGraph) -> u64 {
    graph
        .object_names_sorted()
        .iter()
        .filter_map(|name| graph.head(name))
        .flat_map(|head| graph.walk(head))
        .filter(|&id| graph[id].is_placement())
        .map(|id| graph[id].payload.width())
        .sum()
}

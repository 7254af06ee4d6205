//! Directive dispatch: resolves component keys against the graph and runs
//! the segment operations in script order.

use strsim::jaro_winkler;

use crate::graph::{AgpGraph, Direction, RecordId, Segment};
use crate::script::errors::ScriptError;
use crate::script::lexer::Tokens;

/// Suggestions below this similarity are noise, not typo corrections.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Run a whole edit script against the graph, applying directives strictly
/// in order. The first failure aborts; the caller must treat the graph as
/// unusable afterwards and write no output.
pub fn run_script(graph: &mut AgpGraph, text: &str) -> Result<(), ScriptError> {
    let mut tokens = Tokens::lex(text);

    while !tokens.is_empty() {
        let directive = tokens.next_tok()?;
        match directive.as_str() {
            "MOVE" => run_move(&mut tokens, graph)?,
            "REV" => run_reverse(&mut tokens, graph, false)?,
            "REVCOMP" => run_reverse(&mut tokens, graph, true)?,
            "CREATE" => run_create(&mut tokens, graph)?,
            "SPLIT" => run_split(&mut tokens, graph)?,
            _ => return Err(ScriptError::UnknownDirective { name: directive }),
        }
    }

    Ok(())
}

/// Resolve a component key, attaching a closest-match hint when it is
/// absent from the index.
fn resolve_component(graph: &AgpGraph, key: &str) -> Result<RecordId, ScriptError> {
    graph.lookup(key).ok_or_else(|| ScriptError::UnknownComponent {
        key: key.to_string(),
        suggestion: closest_key(graph, key),
    })
}

fn closest_key(graph: &AgpGraph, key: &str) -> Option<String> {
    graph
        .component_keys()
        .map(|candidate| (jaro_winkler(key, candidate), candidate))
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|(a, _), (b, _)| a.total_cmp(b))
        .map(|(_, candidate)| candidate.to_string())
}

/// `<component>`, `<component> THRU <component>`, or `<component> THRU END`.
fn parse_segment(tokens: &mut Tokens, graph: &AgpGraph) -> Result<Segment, ScriptError> {
    let left = resolve_component(graph, &tokens.next_tok()?)?;
    let mut right = left;

    if tokens.peek() == Some("THRU") {
        tokens.next_tok()?;
        let tok = tokens.next_tok()?;
        right = if tok == "END" {
            graph.tail_from(left)
        } else {
            resolve_component(graph, &tok)?
        };
    }

    Ok(Segment { left, right })
}

fn run_move(tokens: &mut Tokens, graph: &mut AgpGraph) -> Result<(), ScriptError> {
    let segment = parse_segment(tokens, graph)?;

    let direction = match tokens.next_tok()?.as_str() {
        "AFTER" => Direction::After,
        "BEFORE" => Direction::Before,
        found => {
            return Err(ScriptError::UnexpectedToken {
                expected: "AFTER or BEFORE",
                found: found.to_string(),
            })
        }
    };

    let target_key = tokens.next_tok()?;
    let target = resolve_component(graph, &target_key)?;

    // Moving a segment relative to one of its own records would detach
    // the target along with the segment; refuse before cutting.
    let mut cur = Some(segment.left);
    while let Some(id) = cur {
        if id == target {
            return Err(ScriptError::TargetInsideSegment { key: target_key });
        }
        if id == segment.right {
            break;
        }
        cur = graph[id].next();
    }

    let segment = graph.isolate(segment.left, segment.right)?;
    graph.insert(segment, target, direction)?;
    Ok(())
}

fn run_reverse(
    tokens: &mut Tokens,
    graph: &mut AgpGraph,
    complement: bool,
) -> Result<(), ScriptError> {
    let segment = parse_segment(tokens, graph)?;
    graph.reverse(segment.left, segment.right, complement)?;
    Ok(())
}

fn run_create(tokens: &mut Tokens, graph: &mut AgpGraph) -> Result<(), ScriptError> {
    let object = tokens.next_tok()?;
    tokens.expect("FROM")?;
    let segment = parse_segment(tokens, graph)?;

    // Check the name before cutting, so a bad CREATE leaves the source
    // object untouched in the report even though the run aborts anyway.
    if graph.head(&object).is_some() {
        return Err(crate::graph::GraphError::ObjectExists { object }.into());
    }

    let segment = graph.isolate(segment.left, segment.right)?;
    graph.create(&object, segment)?;
    Ok(())
}

fn run_split(tokens: &mut Tokens, graph: &mut AgpGraph) -> Result<(), ScriptError> {
    let target = resolve_component(graph, &tokens.next_tok()?)?;
    tokens.expect("AT")?;

    let tok = tokens.next_tok()?;
    let position: u64 = match tok.parse() {
        Ok(p) if p > 0 => p,
        _ => return Err(ScriptError::InvalidPosition { token: tok }),
    };

    graph.split(target, position)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agp::parse_agp;

    const SAMPLE: &str = "\
chr1\t1\t100\t1\tW\tseq1\t1\t100\t+
chr1\t101\t200\t2\tN\t100\tscaffold\tyes\tna
chr1\t201\t250\t3\tW\tseq2\t1\t50\t-
chr1\t251\t350\t4\tN\t100\tscaffold\tyes\tna
chr1\t351\t430\t5\tW\tseq3\t1\t80\t+
";

    fn sample() -> AgpGraph {
        parse_agp(SAMPLE.as_bytes()).unwrap()
    }

    fn object_keys(graph: &AgpGraph, object: &str) -> Vec<String> {
        graph
            .walk(graph.head(object).unwrap())
            .into_iter()
            .map(|id| graph[id].display_key())
            .collect()
    }

    #[test]
    fn move_thru_segment_after_target() {
        let mut graph = sample();
        run_script(&mut graph, "MOVE seq1:1-100 AFTER seq3:1-80").unwrap();
        assert_eq!(object_keys(&graph, "chr1"), vec![
            "seq2:1-50", "chr1", "seq3:1-80", "chr1", "seq1:1-100",
        ]);
        graph.check_invariants().unwrap();
    }

    #[test]
    fn move_adjacent_is_not_an_error() {
        let mut graph = sample();
        run_script(&mut graph, "MOVE seq2:1-50 AFTER seq1:1-100").unwrap();
        assert_eq!(object_keys(&graph, "chr1"), vec![
            "seq1:1-100", "chr1", "seq2:1-50", "chr1", "seq3:1-80",
        ]);
        graph.check_invariants().unwrap();
    }

    #[test]
    fn thru_end_reaches_object_tail() {
        let mut graph = sample();
        run_script(
            &mut graph,
            "CREATE scaffold2 FROM seq2:1-50 THRU END",
        )
        .unwrap();
        assert_eq!(object_keys(&graph, "chr1"), vec!["seq1:1-100"]);
        assert_eq!(object_keys(&graph, "scaffold2"), vec![
            "seq2:1-50", "scaffold2", "seq3:1-80",
        ]);
        graph.check_invariants().unwrap();
    }

    #[test]
    fn statements_split_by_semicolons_and_comments() {
        let mut graph = sample();
        run_script(
            &mut graph,
            "# flip then split\nREVCOMP seq2:1-50; SPLIT seq1:1-100 AT 50",
        )
        .unwrap();
        assert!(graph.lookup("seq1:1-50").is_some());
        assert!(graph.lookup("seq1:51-100").is_some());
        graph.check_invariants().unwrap();
    }

    #[test]
    fn unknown_component_suggests_closest_key() {
        let mut graph = sample();
        let err = run_script(&mut graph, "REV seq2:1-51").unwrap_err();
        match err {
            ScriptError::UnknownComponent { key, suggestion } => {
                assert_eq!(key, "seq2:1-51");
                assert_eq!(suggestion.as_deref(), Some("seq2:1-50"));
            }
            other => panic!("expected UnknownComponent, got {other}"),
        }
    }

    #[test]
    fn unknown_directive_is_fatal() {
        let mut graph = sample();
        let err = run_script(&mut graph, "SHUFFLE seq1:1-100").unwrap_err();
        assert!(matches!(err, ScriptError::UnknownDirective { .. }));
    }

    #[test]
    fn truncated_statement_is_fatal() {
        let mut graph = sample();
        let err = run_script(&mut graph, "MOVE seq1:1-100 AFTER").unwrap_err();
        assert!(matches!(err, ScriptError::UnexpectedEnd));
    }

    #[test]
    fn move_into_own_segment_is_refused() {
        let mut graph = sample();
        let err = run_script(
            &mut graph,
            "MOVE seq1:1-100 THRU seq3:1-80 AFTER seq2:1-50",
        )
        .unwrap_err();
        assert!(matches!(err, ScriptError::TargetInsideSegment { .. }));
    }

    #[test]
    fn split_rejects_non_numeric_position() {
        let mut graph = sample();
        for script in ["SPLIT seq1:1-100 AT zero", "SPLIT seq1:1-100 AT 0"] {
            let err = run_script(&mut graph, script).unwrap_err();
            assert!(matches!(err, ScriptError::InvalidPosition { .. }));
        }
    }

    #[test]
    fn create_rejects_existing_object_name() {
        let mut graph = sample();
        let err = run_script(&mut graph, "CREATE chr1 FROM seq2:1-50").unwrap_err();
        assert!(matches!(
            err,
            ScriptError::Graph(crate::graph::GraphError::ObjectExists { .. })
        ));
        // Refused before the cut: the source object is still intact.
        assert_eq!(object_keys(&graph, "chr1").len(), 5);
        graph.check_invariants().unwrap();
    }
}

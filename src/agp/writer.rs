//! AGP emitter: canonicalize coordinates, then print objects in
//! lexicographic name order.

use std::io::{self, Write};

use crate::graph::{AgpGraph, Payload, Record};

/// Serialize the graph as AGP text.
///
/// Runs [`AgpGraph::renumber`] first, so part numbers and object
/// coordinates reflect the edited layout rather than whatever the input
/// carried; the recomputed values are written back into the store before
/// emitting. Output mirrors the parser's column layout exactly.
pub fn write_agp<W: Write>(graph: &mut AgpGraph, out: &mut W) -> io::Result<()> {
    graph.renumber();

    for name in graph.object_names_sorted() {
        let Some(head) = graph.head(&name) else { continue };
        for id in graph.walk(head) {
            write_record(&graph[id], out)?;
        }
    }

    Ok(())
}

/// Convenience for tests and in-memory pipelines.
pub fn write_agp_string(graph: &mut AgpGraph) -> String {
    let mut buf = Vec::new();
    write_agp(graph, &mut buf).expect("writing to a Vec cannot fail");
    String::from_utf8(buf).expect("AGP output is always UTF-8")
}

fn write_record<W: Write>(record: &Record, out: &mut W) -> io::Result<()> {
    write!(
        out,
        "{}\t{}\t{}\t{}\t",
        record.object, record.object_start, record.object_end, record.part_number
    )?;

    match &record.payload {
        Payload::Placement {
            name,
            start,
            end,
            orientation,
        } => writeln!(out, "W\t{name}\t{start}\t{end}\t{orientation}"),
        Payload::Gap {
            kind,
            length,
            gap_type,
            linkage,
            evidence,
        } => writeln!(
            out,
            "{}\t{length}\t{gap_type}\t{linkage}\t{evidence}",
            kind.as_char()
        ),
    }
}

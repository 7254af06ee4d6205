//! AGP reader: one record per line, nine tab-separated columns.

use std::io::BufRead;

use crate::agp::errors::FormatError;
use crate::graph::{AgpGraph, GapKind, Orientation, Payload, Record};

/// Parse AGP text into a graph, appending each record to the tail of its
/// named object and registering placements in the component index.
///
/// Accepts exactly the two component families this tool curates: `W`
/// (placed sequence) and `N`/`U` (gap). Blank lines are skipped; anything
/// else malformed is fatal, including a source range placed twice or an
/// inverted source range (`start > end`; later width arithmetic relies on
/// ordered ranges). Object coordinates are read as-is and not
/// cross-validated; they are recomputed at output time anyway.
pub fn parse_agp<R: BufRead>(reader: R) -> Result<AgpGraph, FormatError> {
    let mut graph = AgpGraph::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let number = idx + 1;
        if line.trim().is_empty() {
            continue;
        }

        let record = parse_line(&line, number)?;
        graph
            .append(record)
            .map_err(|source| FormatError::Graph { line: number, source })?;
    }

    Ok(graph)
}

fn parse_line(line: &str, number: usize) -> Result<Record, FormatError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 9 {
        return Err(FormatError::Malformed {
            line: number,
            message: format!("expected 9 columns, found {}", fields.len()),
        });
    }

    let object = fields[0];
    let object_start = parse_u64(fields[1], "object start", number)?;
    let object_end = parse_u64(fields[2], "object end", number)?;
    let part_number = parse_u64(fields[3], "part number", number)? as u32;

    let payload = match fields[4] {
        "W" => {
            let start = parse_u64(fields[6], "component start", number)?;
            let end = parse_u64(fields[7], "component end", number)?;
            if start > end {
                return Err(FormatError::Malformed {
                    line: number,
                    message: format!("component range is inverted: {start}-{end}"),
                });
            }
            Payload::Placement {
                name: fields[5].to_string(),
                start,
                end,
                orientation: parse_orientation(fields[8], number)?,
            }
        }
        "N" | "U" => Payload::Gap {
            kind: if fields[4] == "N" {
                GapKind::Sized
            } else {
                GapKind::Unknown
            },
            length: parse_u64(fields[5], "gap length", number)?,
            gap_type: fields[6].to_string(),
            linkage: fields[7].to_string(),
            evidence: fields[8].to_string(),
        },
        other => {
            return Err(FormatError::UnsupportedType {
                line: number,
                found: other.to_string(),
            })
        }
    };

    let mut record = Record::new(object, payload);
    record.object_start = object_start;
    record.object_end = object_end;
    record.part_number = part_number;
    Ok(record)
}

fn parse_u64(field: &str, what: &str, number: usize) -> Result<u64, FormatError> {
    field.parse().map_err(|_| FormatError::Malformed {
        line: number,
        message: format!("{what} is not a number: '{field}'"),
    })
}

fn parse_orientation(field: &str, number: usize) -> Result<Orientation, FormatError> {
    match field {
        "+" => Ok(Orientation::Forward),
        "-" => Ok(Orientation::Reverse),
        other => Err(FormatError::Malformed {
            line: number,
            message: format!("orientation must be + or -: '{other}'"),
        }),
    }
}

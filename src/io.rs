//! Readers that turn on-disk graph descriptions into a [`Graph`].
//!
//! Three formats are understood:
//! - `.csrrg`: five `;`-separated text lines (max vertices per row, column indices, row
//!   pointers, group list, group pointers). Every group connects its first vertex to the rest.
//! - `.bin`: the same layout as little-endian `u32` words, possibly holding several graphs
//!   that are merged into one.
//! - METIS adjacency text with 1-based neighbour lists.

use crate::Graph;
use anyhow::{bail, ensure, Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum GraphFormat {
    Csrrg,
    Binary,
    Metis,
}

impl GraphFormat {
    /// Guesses the format from a file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        match path.as_ref().extension()?.to_str()? {
            "csrrg" => Some(Self::Csrrg),
            "bin" => Some(Self::Binary),
            "graph" | "metis" => Some(Self::Metis),
            _ => None,
        }
    }
}

/// Opens `path` and reads it in the given format.
pub fn load<P: AsRef<Path>>(path: P, format: GraphFormat) -> Result<Graph> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("could not open {}", path.display()))?;
    let reader = BufReader::new(file);
    let graph = match format {
        GraphFormat::Csrrg => read_csrrg(reader),
        GraphFormat::Binary => read_binary(reader),
        GraphFormat::Metis => read_metis(reader),
    }
    .with_context(|| format!("could not read graph from {}", path.display()))?;

    log::debug!(
        "loaded {} vertices and {} edges from {}",
        graph.vertex_count(),
        graph.edge_count(),
        path.display()
    );
    Ok(graph)
}

fn parse_list(line: &str) -> Result<Vec<i64>> {
    line.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<i64>().with_context(|| format!("invalid integer {s:?}")))
        .collect()
}

fn index(raw: i64, len: usize, what: &str) -> Result<usize> {
    ensure!(
        raw >= 0 && raw as u64 <= len as u64,
        "{what} {raw} is outside 0..={len}"
    );
    Ok(raw as usize)
}

pub fn read_csrrg<R: BufRead>(reader: R) -> Result<Graph> {
    let mut lines = reader.lines();
    let mut section = |name: &str| -> Result<Vec<i64>> {
        let line = lines
            .next()
            .with_context(|| format!("missing {name} line"))?
            .with_context(|| format!("could not read {name} line"))?;
        parse_list(&line).with_context(|| format!("could not parse {name} line"))
    };

    let _max_vertices = section("max vertices")?;
    let col_index = section("column index")?;
    let _row_ptr = section("row pointer")?;
    let group_list = section("group list")?;
    let group_ptr = section("group pointer")?;

    let mut graph = Graph::new(col_index.len());

    // Pointers after the first that drop back to zero are padding.
    let groups = group_ptr
        .iter()
        .enumerate()
        .take_while(|&(i, &ptr)| i == 0 || ptr != 0)
        .count();

    for g in 0..groups {
        let start = index(group_ptr[g], group_list.len(), "group pointer")?;
        let end = match group_ptr.get(g + 1).filter(|_| g + 1 < groups) {
            Some(&next) => index(next, group_list.len(), "group pointer")?,
            None => group_list.len(),
        };
        if end <= start {
            continue;
        }

        let leader = graph.vertex_id(group_list[start])?;
        for &member in group_list[start + 1..end].iter() {
            let member = graph.vertex_id(member)?;
            graph
                .add_edge(leader, member)
                .with_context(|| format!("invalid edge in group {g}"))?;
        }
    }
    graph.label_components();
    Ok(graph)
}

fn read_u32<R: Read>(reader: &mut R) -> Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_u32_list<R: Read>(reader: &mut R, what: &str) -> Result<Vec<u32>> {
    let len = read_u32(reader).with_context(|| format!("missing {what} length"))?;
    (0..len)
        .map(|_| read_u32(reader).with_context(|| format!("truncated {what}")))
        .collect()
}

fn skip_u32_list<R: Read>(reader: &mut R, what: &str) -> Result<()> {
    let len = read_u32(reader).with_context(|| format!("missing {what} length"))? as u64;
    let skipped = io::copy(&mut reader.by_ref().take(len * 4), &mut io::sink())?;
    ensure!(skipped == len * 4, "truncated {what}");
    Ok(())
}

pub fn read_binary<R: Read>(mut reader: R) -> Result<Graph> {
    let _max_vertices = read_u32(&mut reader).context("missing max vertices")?;
    skip_u32_list(&mut reader, "row vertex list")?;
    skip_u32_list(&mut reader, "row index list")?;
    let graph_count = read_u32(&mut reader).context("missing graph count")?;

    struct Part {
        offset: u64,
        adjacency: Vec<u32>,
        adjacency_index: Vec<u32>,
    }

    let mut parts = Vec::new();
    let mut total = 0u64;
    for g in 0..graph_count {
        let vertex_count = read_u32(&mut reader)
            .with_context(|| format!("graph {g}: missing vertex count"))?;
        let _edge_count = read_u32(&mut reader)
            .with_context(|| format!("graph {g}: missing edge count"))?;
        let adjacency =
            read_u32_list(&mut reader, "adjacency").with_context(|| format!("graph {g}"))?;
        let adjacency_index = read_u32_list(&mut reader, "adjacency index")
            .with_context(|| format!("graph {g}"))?;
        if adjacency_index.len() as u64 != vertex_count as u64 + 1 {
            bail!(
                "graph {g}: adjacency index has {} entries for {vertex_count} vertices",
                adjacency_index.len()
            );
        }

        parts.push(Part {
            offset: total,
            adjacency,
            adjacency_index,
        });
        total += vertex_count as u64;
    }

    let total = usize::try_from(total).context("vertex count does not fit in memory")?;
    let mut graph = Graph::new(total);
    for (g, part) in parts.iter().enumerate() {
        for (local, range) in part.adjacency_index.windows(2).enumerate() {
            let (start, end) = (range[0] as usize, range[1] as usize);
            ensure!(
                start <= end && end <= part.adjacency.len(),
                "graph {g}: vertex {local} has invalid adjacency range {start}..{end}"
            );
            let src = graph.vertex_id((part.offset + local as u64) as i64)?;
            for &dst in part.adjacency[start..end].iter() {
                let dst = graph.vertex_id((part.offset + dst as u64) as i64)?;
                graph
                    .add_edge(src, dst)
                    .with_context(|| format!("graph {g}: invalid edge"))?;
            }
        }
    }
    graph.label_components();
    Ok(graph)
}

pub fn read_metis<R: BufRead>(reader: R) -> Result<Graph> {
    let mut lines = reader
        .lines()
        .filter(|l| !matches!(l, Ok(l) if l.starts_with('%') || l.starts_with('#')));

    // Parse the header line
    let header = lines.next().context("could not get header line")??;
    let vertex_count = header
        .split_ascii_whitespace()
        .next()
        .context("empty header line")?
        .parse::<usize>()
        .context("could not parse vertex count")?;

    let mut graph = Graph::new(vertex_count);

    // Parse the edges
    for (src, line) in lines.enumerate() {
        let line = line?;
        if src >= vertex_count && line.trim().is_empty() {
            continue;
        }
        ensure!(src < vertex_count, "more adjacency lines than the {vertex_count} vertices");
        for dst in line.split_ascii_whitespace() {
            let dst = dst
                .parse::<i64>()
                .with_context(|| format!("could not parse neighbour {dst:?} of vertex {}", src + 1))?;
            let dst = graph.vertex_id(dst - 1)?;
            graph.add_edge(src as u32, dst)?;
        }
    }
    graph.label_components();
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GraphStructureError;

    fn words(values: &[u32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn reads_csrrg_groups() {
        let text = "4\n0;1;2;3;0\n0;2;5\n0;1;2;2;3;4\n0;3;0\n";
        let graph = read_csrrg(text.as_bytes()).unwrap();

        assert_eq!(graph.vertex_count(), 5);
        assert_eq!(
            graph.adjacency(),
            vec![vec![1, 2], vec![0], vec![0, 3, 4], vec![2], vec![2]]
        );
    }

    #[test]
    fn csrrg_rejects_out_of_range_member() {
        let text = "2\n0;1\n0;2\n0;5\n0\n";
        let err = read_csrrg(text.as_bytes()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<GraphStructureError>(),
            Some(&GraphStructureError::VertexOutOfRange { id: 5, vertex_count: 2 })
        );
    }

    #[test]
    fn csrrg_rejects_negative_vertex() {
        let text = "2\n0;1\n0;2\n0;-1\n0\n";
        let err = read_csrrg(text.as_bytes()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<GraphStructureError>(),
            Some(&GraphStructureError::NegativeVertex { id: -1 })
        );
    }

    #[test]
    fn csrrg_requires_all_sections() {
        assert!(read_csrrg("3\n0;1;2\n".as_bytes()).is_err());
    }

    #[test]
    fn reads_and_merges_binary_graphs() {
        let mut bytes = words(&[3]);
        bytes.extend(words(&[2, 7, 7]));
        bytes.extend(words(&[1, 9]));
        bytes.extend(words(&[2]));
        // Path 0 - 1 - 2.
        bytes.extend(words(&[3, 2, 4, 1, 0, 2, 1, 4, 0, 1, 3, 4]));
        // Single edge, shifted to 3 - 4.
        bytes.extend(words(&[2, 1, 2, 1, 0, 3, 0, 1, 2]));

        let graph = read_binary(bytes.as_slice()).unwrap();
        assert_eq!(graph.vertex_count(), 5);
        assert_eq!(
            graph.adjacency(),
            vec![vec![1], vec![0, 2], vec![1], vec![4], vec![3]]
        );
    }

    #[test]
    fn binary_rejects_truncated_input() {
        let mut bytes = words(&[3, 0, 0, 1, 2, 1, 2]);
        bytes.extend(words(&[1]));
        assert!(read_binary(bytes.as_slice()).is_err());
    }

    #[test]
    fn binary_graph_count_is_not_trusted() {
        let bytes = words(&[1, 0, 0, u32::MAX]);
        let err = read_binary(bytes.as_slice()).unwrap_err();
        assert!(format!("{err:#}").contains("graph 0: missing vertex count"));
    }

    #[test]
    fn metis_allows_trailing_blank_lines() {
        let text = "3 2\n2\n1 3\n2\n\n  \n";
        let graph = read_metis(text.as_bytes()).unwrap();
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.component_count(), 1);
        assert!(read_metis("2 1\n2\n1\n3\n".as_bytes()).is_err());
    }

    #[test]
    fn reads_metis_adjacency() {
        let text = "% triangle plus a tail\n4 4\n2 3\n1 3\n1 2 4\n3\n";
        let graph = read_metis(text.as_bytes()).unwrap();
        assert_eq!(graph.edge_count(), 4);
        assert!(graph.has_edge(2, 3));
        assert!(graph.validate().is_ok());
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(GraphFormat::from_path("g.csrrg"), Some(GraphFormat::Csrrg));
        assert_eq!(GraphFormat::from_path("dir/g.bin"), Some(GraphFormat::Binary));
        assert_eq!(GraphFormat::from_path("4elt.graph"), Some(GraphFormat::Metis));
        assert_eq!(GraphFormat::from_path("g.txt"), None);
    }
}

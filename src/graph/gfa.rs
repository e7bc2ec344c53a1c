//! The `Gfa` container: normalizes parsed records into graph entities and
//! derives the dovetail attributes of every edge as it is stored.

use std::collections::{BTreeMap, HashMap};
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::edge::{Edge, InvalidEdgeError};
use crate::core::node::{InvalidNodeError, Node};
use crate::core::subgraph::{InvalidSubgraphError, Subgraph};
use crate::core::types::{Orientation, SegmentEnd};
use crate::graph::dovetail::Dovetails;
use crate::graph::store::{EdgeData, GraphStore, MultiGraph};
use crate::parsing::field::OptField;
use crate::parsing::record::{ParseError, Record, RecordKind};
use crate::parsing::validator::Position;
use crate::parsing::{parse_line, Line};
use crate::utils::validation::{check_record_limit, is_gzipped, MAX_RECORDS};

#[derive(Error, Debug)]
pub enum GraphError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Node(#[from] InvalidNodeError),

    #[error(transparent)]
    Edge(#[from] InvalidEdgeError),

    #[error(transparent)]
    Subgraph(#[from] InvalidSubgraphError),

    #[error("Segment '{0}' is defined more than once")]
    DuplicateNode(String),

    #[error("line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: Box<GraphError>,
    },
}

/// Settings for loading a GFA document
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Fail on the first bad line instead of skipping it
    pub strict: bool,
    /// Maximum number of records accepted
    pub max_records: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            strict: true,
            max_records: MAX_RECORDS,
        }
    }
}

impl LoadOptions {
    /// Skip and log bad lines rather than failing the load
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            strict: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Cap on the number of records accepted before the load fails
    #[must_use]
    pub fn with_max_records(mut self, max_records: usize) -> Self {
        self.max_records = max_records;
        self
    }
}

/// An assembled GFA graph: header fields, the node/edge multigraph and the
/// subgraphs defined by paths and groups
#[derive(Debug, Clone, Default)]
pub struct Gfa {
    header: BTreeMap<String, OptField>,
    graph: MultiGraph,
    subgraphs: Vec<(String, Subgraph)>,
    subgraph_index: HashMap<String, usize>,
    next_virtual_subgraph: usize,
    skipped_lines: usize,
}

impl Gfa {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a graph from GFA text.
    ///
    /// # Errors
    ///
    /// In strict mode, returns `GraphError::Line` for the first line that
    /// fails to parse or normalize. Returns `ParseError::TooManyRecords` if
    /// the record limit is exceeded.
    pub fn from_text(text: &str, options: &LoadOptions) -> Result<Self, GraphError> {
        Self::from_reader(text.as_bytes(), options)
    }

    /// Load a graph from any buffered reader.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Io` if reading fails. A line that is not valid
    /// UTF-8 is treated like any other bad line; otherwise as [`Gfa::from_text`].
    pub fn from_reader<R: BufRead>(
        mut reader: R,
        options: &LoadOptions,
    ) -> Result<Self, GraphError> {
        let mut gfa = Self::new();
        let mut records = 0usize;
        let mut line_num = 0usize;
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).map_err(ParseError::from)? == 0 {
                break;
            }
            line_num += 1;

            let line = std::str::from_utf8(&buf)
                .map(|line| line.trim_end_matches(['\n', '\r']))
                .map_err(ParseError::InvalidUtf8);
            if let Ok(text) = &line {
                if text.trim().is_empty() || text.starts_with('#') {
                    continue;
                }
            }

            if let Some(message) = check_record_limit(records, options.max_records) {
                warn!(line = line_num, "{message}");
                return Err(ParseError::TooManyRecords(options.max_records).into());
            }

            match line.map_err(GraphError::from).and_then(|text| gfa.add_line(text)) {
                Ok(()) => records += 1,
                Err(e) if options.strict => {
                    return Err(GraphError::Line {
                        line: line_num,
                        source: Box::new(e),
                    });
                }
                Err(e) => {
                    warn!(line = line_num, error = %e, "Skipping invalid line");
                    gfa.skipped_lines += 1;
                }
            }
        }

        debug!(
            records,
            nodes = gfa.graph.node_count(),
            edges = gfa.graph.edge_count(),
            subgraphs = gfa.subgraphs.len(),
            skipped = gfa.skipped_lines,
            "Loaded GFA"
        );
        Ok(gfa)
    }

    /// Load a graph from a file; `.gz` / `.bgz` files are decompressed.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Io` if the file cannot be opened or read,
    /// otherwise as [`Gfa::from_text`].
    pub fn from_path(path: &Path, options: &LoadOptions) -> Result<Self, GraphError> {
        let file = std::fs::File::open(path).map_err(ParseError::from)?;
        if is_gzipped(path) {
            Self::from_reader(BufReader::new(GzDecoder::new(file)), options)
        } else {
            Self::from_reader(BufReader::new(file), options)
        }
    }

    /// Parse one line and add what it describes.
    ///
    /// # Errors
    ///
    /// Returns the parse or normalization error of the line.
    pub fn add_line(&mut self, line: &str) -> Result<(), GraphError> {
        match parse_line(line)? {
            Line::Header(fields) => {
                for (tag, field) in fields {
                    if self.header.insert(tag.clone(), field).is_some() {
                        debug!(tag = %tag, "Header tag redefined");
                    }
                }
                Ok(())
            }
            Line::Record(record) => self.add_record(&record),
            Line::Comment => Ok(()),
        }
    }

    /// Normalize a record into its entity and store it.
    ///
    /// # Errors
    ///
    /// Returns the normalizer's error, `GraphError::DuplicateNode` for a
    /// redefined segment, or `InvalidSubgraphError` for a reused subgraph id.
    pub fn add_record(&mut self, record: &Record) -> Result<(), GraphError> {
        match record.kind {
            RecordKind::SegmentV1 | RecordKind::SegmentV2 => {
                self.add_node(Node::from_record(record)?)?;
            }
            RecordKind::Link
            | RecordKind::Containment
            | RecordKind::Fragment
            | RecordKind::Edge
            | RecordKind::Gap => {
                let edge = Edge::from_record(record)?;
                let data = match dovetail_ends(record.kind, &edge) {
                    Some((from_end, to_end)) => EdgeData::dovetail(edge, from_end, to_end),
                    None => EdgeData::plain(edge),
                };
                self.add_edge(data);
            }
            RecordKind::Path | RecordKind::OGroup | RecordKind::UGroup => {
                self.add_subgraph(Subgraph::from_record(record)?)?;
            }
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `GraphError::DuplicateNode` if a segment with the same id was
    /// already added.
    pub fn add_node(&mut self, node: Node) -> Result<(), GraphError> {
        self.graph
            .add_node(node)
            .map_err(|node| GraphError::DuplicateNode(node.id))
    }

    /// Store an edge with precomputed attributes and return its key
    pub fn add_edge(&mut self, data: EdgeData) -> String {
        self.graph.add_edge(data)
    }

    /// Store a subgraph and return its key: the subgraph id, or a
    /// `virtual_<n>` key when the id is `*`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSubgraphError` if the id is already taken.
    pub fn add_subgraph(&mut self, subgraph: Subgraph) -> Result<String, GraphError> {
        let key = if subgraph.id == "*" {
            self.virtual_subgraph_key()
        } else if self.subgraph_index.contains_key(&subgraph.id) {
            return Err(InvalidSubgraphError(format!(
                "subgraph '{}' is defined more than once",
                subgraph.id
            ))
            .into());
        } else {
            subgraph.id.clone()
        };

        self.subgraph_index.insert(key.clone(), self.subgraphs.len());
        self.subgraphs.push((key.clone(), subgraph));
        Ok(key)
    }

    fn virtual_subgraph_key(&mut self) -> String {
        loop {
            let key = format!("virtual_{}", self.next_virtual_subgraph);
            self.next_virtual_subgraph += 1;
            if !self.subgraph_index.contains_key(&key) {
                return key;
            }
        }
    }

    #[must_use]
    pub fn header(&self) -> &BTreeMap<String, OptField> {
        &self.header
    }

    #[must_use]
    pub fn graph(&self) -> &MultiGraph {
        &self.graph
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.graph.node(id)
    }

    #[must_use]
    pub fn edge(&self, key: &str) -> Option<&EdgeData> {
        self.graph.edge(key)
    }

    #[must_use]
    pub fn subgraph(&self, key: &str) -> Option<&Subgraph> {
        self.subgraph_index
            .get(key)
            .map(|&i| &self.subgraphs[i].1)
    }

    /// Subgraphs with their keys, in input order
    pub fn subgraphs(&self) -> impl Iterator<Item = (&str, &Subgraph)> + '_ {
        self.subgraphs.iter().map(|(key, s)| (key.as_str(), s))
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    #[must_use]
    pub fn dovetail_count(&self) -> usize {
        self.graph.edges().filter(|e| e.data.is_dovetail).count()
    }

    #[must_use]
    pub fn subgraph_count(&self) -> usize {
        self.subgraphs.len()
    }

    /// Lines skipped by a lenient load
    #[must_use]
    pub fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }

    /// Dovetail queries over this graph
    #[must_use]
    pub fn dovetails(&self) -> Dovetails<'_, MultiGraph> {
        Dovetails::new(&self.graph)
    }
}

/// Segment ends joined by an edge built from a record of `kind`, or `None`
/// when the edge is not a dovetail overlap.
///
/// A link always joins the end its orientation leaves from to the end it
/// enters: a forward from-segment is left at `R`, a forward to-segment is
/// entered at `L`, and reverse orientations swap the ends. An `E` line is
/// a dovetail when each aligned range reaches exactly one end of its
/// segment: `L` when it begins at 0, `R` when its end carries `$`.
#[must_use]
pub fn dovetail_ends(kind: RecordKind, edge: &Edge) -> Option<(SegmentEnd, SegmentEnd)> {
    match kind {
        RecordKind::Link => {
            let from_end = match edge.from_orientation? {
                Orientation::Forward => SegmentEnd::Right,
                Orientation::Reverse => SegmentEnd::Left,
            };
            let to_end = match edge.to_orientation? {
                Orientation::Forward => SegmentEnd::Left,
                Orientation::Reverse => SegmentEnd::Right,
            };
            Some((from_end, to_end))
        }
        RecordKind::Edge => {
            let from_end = touched_end(edge.from_positions?)?;
            let to_end = touched_end(edge.to_positions?)?;
            Some((from_end, to_end))
        }
        RecordKind::Containment
        | RecordKind::Fragment
        | RecordKind::Gap
        | RecordKind::SegmentV1
        | RecordKind::SegmentV2
        | RecordKind::Path
        | RecordKind::OGroup
        | RecordKind::UGroup => None,
    }
}

fn touched_end((begin, end): (Position, Position)) -> Option<SegmentEnd> {
    match (begin.value == 0, end.is_end) {
        (true, false) => Some(SegmentEnd::Left),
        (false, true) => Some(SegmentEnd::Right),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::validator::Value;

    const EXAMPLE: &str = "H\tVN:Z:1.0
S\t1\tACGTACGT
S\t2\tTTGA\tRC:i:4
S\t3\t*
# links
L\t1\t+\t2\t+\t4M
L\t2\t-\t3\t+\t2M
C\t1\t+\t3\t-\t2\t*
P\tp1\t1+,2+\t4M
";

    #[test]
    fn test_from_text() {
        let gfa = Gfa::from_text(EXAMPLE, &LoadOptions::default()).unwrap();

        assert_eq!(gfa.header()["VN"].value, Value::Text("1.0".to_string()));
        assert_eq!(gfa.node_count(), 3);
        assert_eq!(gfa.edge_count(), 3);
        assert_eq!(gfa.dovetail_count(), 2);
        assert_eq!(gfa.subgraph_count(), 1);
        assert_eq!(gfa.node("2").unwrap().opt_fields["RC"].value, Value::Int(4));
        assert_eq!(gfa.subgraph("p1").unwrap().elements.len(), 2);
    }

    #[test]
    fn test_link_segment_ends() {
        let gfa = Gfa::from_text(EXAMPLE, &LoadOptions::default()).unwrap();

        let first = gfa.edge("virtual_0").unwrap();
        assert!(first.is_dovetail);
        assert_eq!(first.from_segment_end, Some(SegmentEnd::Right));
        assert_eq!(first.to_segment_end, Some(SegmentEnd::Left));

        let second = gfa.edge("virtual_1").unwrap();
        assert_eq!(second.from_segment_end, Some(SegmentEnd::Left));
        assert_eq!(second.to_segment_end, Some(SegmentEnd::Left));

        let containment = gfa.edge("virtual_2").unwrap();
        assert!(!containment.is_dovetail);
        assert_eq!(containment.from_segment_end, None);
    }

    #[test]
    fn test_edge_line_segment_ends() {
        let text = "S\ta\t100\t*
S\tb\t80\t*
E\te1\ta+\tb+\t90\t100$\t0\t10\t10M
E\te2\ta+\tb+\t0\t100$\t0\t10\t10M
E\te3\ta-\tb+\t0\t10\t0\t10\t10M
E\te4\ta+\tb-\t20\t30\t40\t50\t10M
";
        let gfa = Gfa::from_text(text, &LoadOptions::default()).unwrap();

        let dovetail = gfa.edge("e1").unwrap();
        assert!(dovetail.is_dovetail);
        assert_eq!(dovetail.from_segment_end, Some(SegmentEnd::Right));
        assert_eq!(dovetail.to_segment_end, Some(SegmentEnd::Left));

        // whole of `a` aligned: containment
        assert!(!gfa.edge("e2").unwrap().is_dovetail);

        let left_left = gfa.edge("e3").unwrap();
        assert_eq!(left_left.from_segment_end, Some(SegmentEnd::Left));
        assert_eq!(left_left.to_segment_end, Some(SegmentEnd::Left));

        // internal on both segments
        assert!(!gfa.edge("e4").unwrap().is_dovetail);
    }

    #[test]
    fn test_gap_and_fragment_are_not_dovetails() {
        let text = "S\ta\t100\t*
G\tg1\ta+\tb-\t1000\t*
F\ta\tread1+\t0\t10\t0\t10\t10M
";
        let gfa = Gfa::from_text(text, &LoadOptions::default()).unwrap();
        assert_eq!(gfa.edge_count(), 2);
        assert_eq!(gfa.dovetail_count(), 0);
        assert_eq!(gfa.edge("g1").unwrap().edge.distance, Some(1000));
    }

    #[test]
    fn test_strict_load_reports_line() {
        let text = "S\t1\tACGT\nL\t1\t?\t2\t+\t4M\n";
        let err = Gfa::from_text(text, &LoadOptions::default()).unwrap_err();
        match err {
            GraphError::Line { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_lenient_load_skips_bad_lines() {
        let text = "S\t1\tACGT\nX\tunknown\nL\t1\t?\t2\t+\t4M\nS\t2\tAC\n";
        let gfa = Gfa::from_text(text, &LoadOptions::lenient()).unwrap();
        assert_eq!(gfa.node_count(), 2);
        assert_eq!(gfa.skipped_lines(), 2);
    }

    #[test]
    fn test_duplicate_segment() {
        let text = "S\t1\tACGT\nS\t1\tAC\n";
        let err = Gfa::from_text(text, &LoadOptions::default()).unwrap_err();
        assert!(err.to_string().contains("defined more than once"));
    }

    #[test]
    fn test_subgraph_keys() {
        let text = "U\t*\ta b\nU\t*\tc\nO\to1\ta+ b-\n";
        let gfa = Gfa::from_text(text, &LoadOptions::default()).unwrap();
        let keys: Vec<&str> = gfa.subgraphs().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["virtual_0", "virtual_1", "o1"]);

        let dup = "O\to1\ta+\nO\to1\tb+\n";
        assert!(Gfa::from_text(dup, &LoadOptions::default()).is_err());
    }

    #[test]
    fn test_record_limit() {
        let options = LoadOptions::default().with_max_records(2);
        let text = "S\t1\tA\nS\t2\tC\nS\t3\tG\n";
        let err = Gfa::from_text(text, &options).unwrap_err();
        assert!(matches!(err, GraphError::Parse(ParseError::TooManyRecords(2))));
    }

    #[test]
    fn test_load_options_setters() {
        let options = LoadOptions::default()
            .with_strict(false)
            .with_max_records(5);
        assert!(!options.strict);
        assert_eq!(options.max_records, 5);
        assert!(LoadOptions::lenient().with_strict(true).strict);
    }

    #[test]
    fn test_undefined_endpoint_becomes_node_slot() {
        let gfa = Gfa::from_text("L\tx\t+\ty\t-\t*\n", &LoadOptions::default()).unwrap();
        assert_eq!(gfa.node_count(), 2);
        assert!(gfa.node("x").is_none());
        assert!(gfa.graph().contains_node("x"));
    }
}

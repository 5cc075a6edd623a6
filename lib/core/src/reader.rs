// Drivers that fold parse events into subgraphs
use crate::event::ParseEvent;
use crate::parser::Parser;
use crate::subgraph::Subgraph;
use crate::Result;
use std::io::Read;
use tracing::debug;

/// Event sink accumulating the subgraph currently being parsed
#[derive(Debug, Default)]
pub struct SubgraphBuilder {
    current: Subgraph,
}

impl SubgraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event. A boundary seals the current subgraph and returns it.
    pub fn handle(&mut self, event: ParseEvent) -> Option<Subgraph> {
        match event {
            ParseEvent::Node(node) => {
                self.current.merge_node(node);
            }
            ParseEvent::Relationship(rel) => {
                self.current.add_relationship(rel);
            }
            ParseEvent::Hook { node, label, key } => {
                self.current.set_hook(node, label, key);
            }
            ParseEvent::Comment(text) => self.current.add_comment(text),
            ParseEvent::Boundary => return Some(std::mem::take(&mut self.current)),
        }
        None
    }

    pub fn current(&self) -> &Subgraph {
        &self.current
    }

    /// Seal whatever has been accumulated since the last boundary
    pub fn finish(self) -> Subgraph {
        self.current
    }
}

/// Parse a whole document into its subgraphs.
///
/// A document with `N` boundary markers yields `N + 1` subgraphs, some of
/// which may be empty. On a syntax error nothing is returned, including
/// subgraphs that were complete before the failing element.
pub fn parse_document(source: &str) -> Result<Vec<Subgraph>> {
    let mut builder = SubgraphBuilder::new();
    let mut subgraphs = Vec::new();
    for event in Parser::new(source) {
        if let Some(sealed) = builder.handle(event?) {
            subgraphs.push(sealed);
        }
    }
    subgraphs.push(builder.finish());
    debug!(subgraphs = subgraphs.len(), "Parsed document");
    Ok(subgraphs)
}

/// Read a UTF-8 document fully, then parse it
pub fn read_document<R: Read>(mut reader: R) -> Result<Vec<Subgraph>> {
    let mut source = String::new();
    reader.read_to_string(&mut source)?;
    parse_document(&source)
}

/// Streaming reader yielding one subgraph per boundary-delimited section
pub struct SubgraphReader<'a> {
    parser: Parser<'a>,
    more: bool,
    sealed: usize,
}

impl<'a> SubgraphReader<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            parser: Parser::new(source),
            more: true,
            sealed: 0,
        }
    }

    /// Whether another subgraph can be read
    pub fn has_more(&self) -> bool {
        self.more
    }

    /// Scan up to the next boundary or end of input.
    ///
    /// Returns `Ok(None)` once the document is exhausted. After an error
    /// the reader is exhausted as well.
    pub fn read_subgraph(&mut self) -> Result<Option<Subgraph>> {
        if !self.more {
            return Ok(None);
        }
        let mut builder = SubgraphBuilder::new();
        for event in self.parser.by_ref() {
            let event = match event {
                Ok(event) => event,
                Err(e) => {
                    self.more = false;
                    return Err(e);
                }
            };
            if let Some(sealed) = builder.handle(event) {
                self.sealed += 1;
                debug!(index = self.sealed - 1, order = sealed.order(), size = sealed.size(), "Sealed subgraph");
                return Ok(Some(sealed));
            }
        }
        self.more = false;
        self.sealed += 1;
        Ok(Some(builder.finish()))
    }
}

impl Iterator for SubgraphReader<'_> {
    type Item = Result<Subgraph>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_subgraph().transpose()
    }
}

//! Geoff grammar
//!
//! [`Parser`] is a pull parser: each call to `next` scans forward until it
//! has recognized one element and yields the [`ParseEvent`]s for it. Each
//! element commits on its lead character and any mismatch after that is a
//! syntax error. Once an error has been yielded the parser is exhausted.
//!
//! ```text
//! element := node_or_chain | hook | comment | boundary
//! node    := '(' name? (':' label)* ('{' properties '}')? ')'
//! chain   := node (arrow box arrow node)* ('{' properties '}')?
//! hook    := ':' label ':' (key ':')? '=>' node
//! comment := '/*' .*? '*/'
//! boundary:= '~~~~' '~'*
//! ```

use crate::event::ParseEvent;
use crate::node::{Node, PropertyMap};
use crate::relationship::RelationshipSpec;
use crate::scanner::{is_name_char, Scanner};
use crate::{Error, Result};
use std::collections::{BTreeSet, VecDeque};
use std::iter::FusedIterator;

const MIN_BOUNDARY_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arrow {
    Incoming,
    Outgoing,
    Undirected,
}

pub struct Parser<'a> {
    scanner: Scanner<'a>,
    pending: VecDeque<ParseEvent>,
    failed: bool,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            scanner: Scanner::new(source),
            pending: VecDeque::new(),
            failed: false,
        }
    }

    /// Byte offset of the next unscanned character
    pub fn position(&self) -> usize {
        self.scanner.position()
    }

    fn parse_element(&mut self) -> Result<()> {
        match self.scanner.peek() {
            Some('(') => self.parse_statement(),
            Some(':') => self.parse_hook(),
            Some('/') => self.parse_comment(),
            Some('~') => self.parse_boundary(),
            Some(ch) => Err(self.scanner.error(format!("unexpected character '{}'", ch))),
            None => Ok(()),
        }
    }

    // A node, optionally followed by a relationship chain and a property
    // map that applies to everything the statement produced.
    fn parse_statement(&mut self) -> Result<()> {
        let mut node = self.parse_node()?;
        let mut relationships = Vec::new();

        loop {
            self.scanner.skip_whitespace();
            if !matches!(self.scanner.peek(), Some('<' | '-')) {
                break;
            }
            let arrow_at = self.scanner.position();
            let left = self.parse_left_arrow()?;
            self.scanner.skip_whitespace();
            let (rel_type, properties) = self.parse_relationship_box()?;
            self.scanner.skip_whitespace();
            let right = self.parse_right_arrow()?;
            self.scanner.skip_whitespace();
            let other = self.parse_node()?;

            if left == Arrow::Undirected && right == Arrow::Undirected {
                return Err(Error::syntax("no relationship direction specified", arrow_at));
            }
            if left == Arrow::Incoming {
                relationships.push(RelationshipSpec::new(
                    other.clone(),
                    rel_type.clone(),
                    properties.clone(),
                    node.clone(),
                ));
            }
            if right == Arrow::Outgoing {
                relationships.push(RelationshipSpec::new(
                    node.clone(),
                    rel_type,
                    properties,
                    other.clone(),
                ));
            }
            node = other;
        }

        self.scanner.skip_whitespace();
        let properties = if self.scanner.peek() == Some('{') {
            Some(self.parse_property_map()?)
        } else {
            None
        };

        if relationships.is_empty() {
            node.merge_properties(properties);
            self.pending.push_back(ParseEvent::Node(node));
        } else {
            for mut rel in relationships {
                rel.merge_properties(properties.clone());
                self.pending.push_back(ParseEvent::Relationship(rel));
            }
        }
        Ok(())
    }

    fn parse_left_arrow(&mut self) -> Result<Arrow> {
        if self.scanner.eat_str("<-") {
            Ok(Arrow::Incoming)
        } else if self.scanner.eat('-') {
            Ok(Arrow::Undirected)
        } else {
            Err(self.scanner.unexpected("'<-' or '-'"))
        }
    }

    fn parse_right_arrow(&mut self) -> Result<Arrow> {
        if self.scanner.eat_str("->") {
            Ok(Arrow::Outgoing)
        } else if self.scanner.eat('-') {
            Ok(Arrow::Undirected)
        } else {
            Err(self.scanner.unexpected("'->' or '-'"))
        }
    }

    fn parse_node(&mut self) -> Result<Node> {
        self.scanner.expect('(')?;
        self.scanner.skip_whitespace();
        let name = match self.scanner.peek() {
            Some(')' | ':' | '{') => None,
            _ => Some(self.parse_name()?),
        };
        self.scanner.skip_whitespace();
        let labels = if self.scanner.peek() == Some(':') {
            Some(self.parse_labels()?)
        } else {
            None
        };
        let properties = if self.scanner.peek() == Some('{') {
            Some(self.parse_property_map()?)
        } else {
            None
        };
        self.scanner.skip_whitespace();
        self.scanner.expect(')')?;
        Ok(Node::new(name, labels, properties))
    }

    fn parse_labels(&mut self) -> Result<BTreeSet<String>> {
        let mut labels = BTreeSet::new();
        while self.scanner.eat(':') {
            self.scanner.skip_whitespace();
            labels.insert(self.parse_name()?);
            self.scanner.skip_whitespace();
        }
        Ok(labels)
    }

    // Bare identifier or JSON string
    fn parse_name(&mut self) -> Result<String> {
        if self.scanner.peek() == Some('"') {
            return self.scanner.parse_string();
        }
        let name = self.scanner.scan_while(is_name_char);
        if name.is_empty() {
            return Err(self.scanner.unexpected("a name"));
        }
        Ok(name.to_string())
    }

    // '[' (name ':')? type ('{' properties '}')? ']'; the name is discarded
    fn parse_relationship_box(&mut self) -> Result<(String, Option<PropertyMap>)> {
        self.scanner.expect('[')?;
        self.scanner.skip_whitespace();
        if self.scanner.peek() != Some(':') {
            self.parse_name()?;
            self.scanner.skip_whitespace();
        }
        self.scanner.expect(':')?;
        self.scanner.skip_whitespace();
        let type_at = self.scanner.position();
        let rel_type = self.parse_name()?;
        if rel_type.is_empty() {
            return Err(Error::syntax("relationship type must not be empty", type_at));
        }
        self.scanner.skip_whitespace();
        let properties = if self.scanner.peek() == Some('{') {
            let properties = self.parse_property_map()?;
            self.scanner.skip_whitespace();
            Some(properties)
        } else {
            None
        };
        self.scanner.expect(']')?;
        Ok((rel_type, properties))
    }

    fn parse_property_map(&mut self) -> Result<PropertyMap> {
        let mut properties = PropertyMap::new();
        self.scanner.expect('{')?;
        self.scanner.skip_whitespace();
        if self.scanner.eat('}') {
            return Ok(properties);
        }
        loop {
            let key = self.parse_name()?;
            self.scanner.skip_whitespace();
            self.scanner.expect(':')?;
            self.scanner.skip_whitespace();
            let value = self.scanner.parse_value()?;
            properties.insert(key, value);
            self.scanner.skip_whitespace();
            if self.scanner.eat(',') {
                self.scanner.skip_whitespace();
                continue;
            }
            self.scanner.expect('}')?;
            return Ok(properties);
        }
    }

    fn parse_hook(&mut self) -> Result<()> {
        self.scanner.expect(':')?;
        self.scanner.skip_whitespace();
        let label = self.parse_name()?;
        self.scanner.skip_whitespace();
        self.scanner.expect(':')?;
        self.scanner.skip_whitespace();
        let key = if self.scanner.starts_with("=>") {
            None
        } else {
            let key = self.parse_name()?;
            self.scanner.skip_whitespace();
            self.scanner.expect(':')?;
            self.scanner.skip_whitespace();
            Some(key)
        };
        self.scanner.expect_str("=>")?;
        self.scanner.skip_whitespace();
        let node = self.parse_node()?;
        self.pending.push_back(ParseEvent::Hook { node, label, key });
        Ok(())
    }

    fn parse_comment(&mut self) -> Result<()> {
        self.scanner.expect_str("/*")?;
        let (text, _terminated) = self.scanner.scan_until("*/");
        self.pending
            .push_back(ParseEvent::Comment(text.trim().to_string()));
        Ok(())
    }

    fn parse_boundary(&mut self) -> Result<()> {
        let start = self.scanner.position();
        let run = self.scanner.scan_while(|c| c == '~');
        if run.len() < MIN_BOUNDARY_LEN {
            return Err(Error::syntax(
                format!(
                    "boundary needs at least {} '~', found {}",
                    MIN_BOUNDARY_LEN,
                    run.len()
                ),
                start,
            ));
        }
        self.pending.push_back(ParseEvent::Boundary);
        Ok(())
    }
}

impl Iterator for Parser<'_> {
    type Item = Result<ParseEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(Ok(event));
            }
            if self.failed {
                return None;
            }
            self.scanner.skip_whitespace();
            if self.scanner.is_eof() {
                return None;
            }
            if let Err(e) = self.parse_element() {
                self.failed = true;
                self.pending.clear();
                return Some(Err(e));
            }
        }
    }
}

impl FusedIterator for Parser<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Array, Value};

    fn events(text: &str) -> Vec<ParseEvent> {
        Parser::new(text).collect::<Result<Vec<_>>>().unwrap()
    }

    fn parse_error(text: &str) -> Error {
        Parser::new(text)
            .find_map(|event| event.err())
            .expect("expected a syntax error")
    }

    fn single_node(text: &str) -> Node {
        match events(text).as_slice() {
            [ParseEvent::Node(node)] => node.clone(),
            other => panic!("expected one node event, got {:?}", other),
        }
    }

    fn relationships(text: &str) -> Vec<(String, String, String)> {
        events(text)
            .into_iter()
            .map(|event| match event {
                ParseEvent::Relationship(rel) => (
                    rel.start.name().to_string(),
                    rel.rel_type,
                    rel.end.name().to_string(),
                ),
                other => panic!("expected relationship event, got {:?}", other),
            })
            .collect()
    }

    fn triple(start: &str, rel_type: &str, end: &str) -> (String, String, String) {
        (start.to_string(), rel_type.to_string(), end.to_string())
    }

    #[test]
    fn test_empty_document() {
        assert!(events("").is_empty());
        assert!(events("  \n\t ").is_empty());
    }

    #[test]
    fn test_named_node() {
        let node = single_node("(alice)");
        assert_eq!(node.name(), "alice");
        assert!(node.is_named());
        assert!(node.labels().is_none());
        assert!(node.properties().is_none());
    }

    #[test]
    fn test_empty_node_is_anonymous() {
        let node = single_node("()");
        assert!(!node.is_named());
        assert!(node.labels().is_none());
        assert!(node.properties().is_none());
    }

    #[test]
    fn test_node_forms() {
        let node = single_node(r#"(:Foo:Bar {"foo":"bar","baz":"qux"})"#);
        assert!(!node.is_named());
        assert_eq!(node.labels().unwrap().len(), 2);
        assert_eq!(node.properties().unwrap().len(), 2);

        let node = single_node(r#"({"foo":"bar"})"#);
        assert!(node.labels().is_none());
        assert_eq!(node.property("foo"), Some(&Value::from("bar")));

        let node = single_node(r#"(i:Foo:Bar {"foo":"bar","baz":"qux"})"#);
        assert_eq!(node.name(), "i");
        assert!(node.has_label("Foo") && node.has_label("Bar"));

        let node = single_node(r#"( "a b" : Person { name : "Alice", tags: ["x"] } )"#);
        assert_eq!(node.name(), "a b");
        assert!(node.has_label("Person"));
        assert_eq!(
            node.property("tags"),
            Some(&Value::Array(Array::String(vec!["x".to_string()])))
        );
    }

    #[test]
    fn test_unicode_names() {
        let node = single_node("(zoë:Ärzte)");
        assert_eq!(node.name(), "zoë");
        assert!(node.has_label("Ärzte"));
    }

    #[test]
    fn test_outgoing_relationship() {
        assert_eq!(
            relationships("(alice)-[:KNOWS]->(bob)"),
            vec![triple("alice", "KNOWS", "bob")]
        );
    }

    #[test]
    fn test_bidirectional_relationship() {
        assert_eq!(
            relationships("(alice)<-[:KNOWS]->(bob)"),
            vec![triple("bob", "KNOWS", "alice"), triple("alice", "KNOWS", "bob")]
        );
    }

    #[test]
    fn test_path() {
        assert_eq!(
            relationships("(alice)<-[:LOVES]-(bob)-[:HATES]->(carol)"),
            vec![triple("bob", "LOVES", "alice"), triple("bob", "HATES", "carol")]
        );
    }

    #[test]
    fn test_arrows_with_whitespace() {
        assert_eq!(
            relationships("(a) -[ :X ]-> (b)"),
            vec![triple("a", "X", "b")]
        );
    }

    #[test]
    fn test_relationship_name_is_discarded() {
        let events = events(r#"(a)-[r:KNOWS {"since":1999}]->(b)"#);
        match events.as_slice() {
            [ParseEvent::Relationship(rel)] => {
                assert_eq!(rel.rel_type, "KNOWS");
                assert_eq!(
                    rel.properties.as_ref().unwrap().get("since"),
                    Some(&Value::Integer(1999))
                );
            }
            other => panic!("unexpected events {:?}", other),
        }
    }

    #[test]
    fn test_trailing_properties_apply_to_every_relationship() {
        for event in events(r#"(a)<-[:X {"w":1}]->(b) {"w":2, "tag":"t"}"#) {
            match event {
                ParseEvent::Relationship(rel) => {
                    let properties = rel.properties.unwrap();
                    assert_eq!(properties.get("w"), Some(&Value::Integer(2)));
                    assert_eq!(properties.get("tag"), Some(&Value::from("t")));
                }
                other => panic!("unexpected event {:?}", other),
            }
        }
    }

    #[test]
    fn test_trailing_properties_apply_to_lone_node() {
        let node = single_node(r#"(a {"x":1}) {"y":2}"#);
        assert_eq!(node.property("x"), Some(&Value::Integer(1)));
        assert_eq!(node.property("y"), Some(&Value::Integer(2)));
    }

    #[test]
    fn test_anonymous_middle_node_is_shared() {
        let events = events("(a)-[:X]->()-[:Y]->(c)");
        let (first, second) = match events.as_slice() {
            [ParseEvent::Relationship(x), ParseEvent::Relationship(y)] => (x, y),
            other => panic!("unexpected events {:?}", other),
        };
        assert_eq!(first.end.name(), second.start.name());
        assert!(!first.end.is_named());
    }

    #[test]
    fn test_hook_with_key() {
        match events(r#":Person:email:=>(alice {"email":"a@example.com"})"#).as_slice() {
            [ParseEvent::Hook { node, label, key }] => {
                assert_eq!(node.name(), "alice");
                assert_eq!(label, "Person");
                assert_eq!(key.as_deref(), Some("email"));
            }
            other => panic!("unexpected events {:?}", other),
        }
    }

    #[test]
    fn test_hook_without_key() {
        match events(":Person:=>(alice)").as_slice() {
            [ParseEvent::Hook { label, key, .. }] => {
                assert_eq!(label, "Person");
                assert_eq!(*key, None);
            }
            other => panic!("unexpected events {:?}", other),
        }
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            events("/*  hello world  */ (a)"),
            vec![
                ParseEvent::Comment("hello world".to_string()),
                ParseEvent::Node(Node::named("a")),
            ]
        );
    }

    #[test]
    fn test_unterminated_comment_consumes_rest() {
        assert_eq!(
            events("/* no closing (a)"),
            vec![ParseEvent::Comment("no closing (a)".to_string())]
        );
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(
            events("(a) ~~~~ (b) ~~~~~~~~ (c)")
                .iter()
                .filter(|e| **e == ParseEvent::Boundary)
                .count(),
            2
        );
    }

    #[test]
    fn test_short_boundary_is_an_error() {
        let err = parse_error("(a) ~~~ (b)");
        assert_eq!(err.position(), Some(4));
    }

    #[test]
    fn test_unexpected_lead_character() {
        let err = parse_error("-0123456789");
        assert_eq!(err.position(), Some(0));
        assert!(err.to_string().contains("unexpected character '-'"));
    }

    #[test]
    fn test_no_direction() {
        let err = parse_error("(a)-[:X]-(b)");
        assert!(err.to_string().contains("no relationship direction specified"));
        assert_eq!(err.position(), Some(3));
    }

    #[test]
    fn test_backwards_arrows_are_rejected() {
        assert!(parse_error("(a)->[:X]-(b)").is_syntax());
        assert!(parse_error("(a)-[:X]<-(b)").is_syntax());
    }

    #[test]
    fn test_malformed_elements() {
        assert!(parse_error("(a").is_syntax());
        assert!(parse_error("(a)-[KNOWS]->(b)").is_syntax());
        assert!(parse_error(r#"(a)-[:""]->(b)"#).is_syntax());
        assert!(parse_error(r#"(a {"x":})"#).is_syntax());
        assert!(parse_error(r#"(a {"x":"unterminated})"#).is_syntax());
        assert!(parse_error(":Person(a)").is_syntax());
        assert!(parse_error("/ (a)").is_syntax());
    }

    #[test]
    fn test_parser_is_fused_after_error() {
        let mut parser = Parser::new("(a) ! (b)");
        assert!(matches!(parser.next(), Some(Ok(ParseEvent::Node(_)))));
        assert!(matches!(parser.next(), Some(Err(_))));
        assert!(parser.next().is_none());
        assert!(parser.next().is_none());
    }

    #[test]
    fn test_no_events_from_failed_statement() {
        let items: Vec<_> = Parser::new("(a)<-[:X]->(b) {\"x\":").collect();
        assert_eq!(items.len(), 1);
        assert!(items[0].is_err());
    }
}

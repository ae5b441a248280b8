//! Markup fragments
//!
//! Parses the HTML produced by templates into a node list and materializes
//! it as a document fragment. The grammar is the forgiving subset templates
//! emit: elements with quoted, unquoted or bare attributes, void and
//! self-closing tags, text with entity references, and comments (dropped).

use html_escape::decode_html_entities;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_until, take_while, take_while1},
    character::complete::{char, multispace0, multispace1},
    combinator::{all_consuming, cut, map, opt},
    error::{context, VerboseError, VerboseErrorKind},
    multi::many0,
    sequence::{delimited, preceded, tuple},
    Finish, IResult,
};
use morph_core::NodeId;
use tracing::debug;

use crate::document::Document;
use crate::error::{DomError, Result};

type ParseResult<'a, O> = IResult<&'a str, O, VerboseError<&'a str>>;

/// Elements that never have children or a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// A parsed markup node
#[derive(Clone, Debug, PartialEq)]
pub enum MarkupNode {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
        children: Vec<MarkupNode>,
    },
    Text(String),
}

/// Parse a markup string into top-level nodes
pub fn parse(markup: &str) -> Result<Vec<MarkupNode>> {
    all_consuming(nodes)(markup)
        .finish()
        .map(|(_, nodes)| nodes)
        .map_err(|err| {
            let error = markup_error(markup, &err);
            debug!("markup parse failed: {}", error);
            error
        })
}

/// Parse `markup` and build a detached fragment holding the result
pub fn parse_fragment(doc: &mut Document, markup: &str) -> Result<NodeId> {
    let parsed = parse(markup)?;
    let fragment = doc.create_fragment();
    for node in &parsed {
        build(doc, fragment, node)?;
    }
    Ok(fragment)
}

fn build(doc: &mut Document, parent: NodeId, node: &MarkupNode) -> Result<()> {
    match node {
        MarkupNode::Text(text) => {
            let id = doc.create_text(text);
            doc.append_child(parent, id)
        }
        MarkupNode::Element {
            tag,
            attributes,
            children,
        } => {
            let id = doc.create_element(tag);
            for (name, value) in attributes {
                doc.set_attribute(id, name, value)?;
            }
            doc.append_child(parent, id)?;
            for child in children {
                build(doc, id, child)?;
            }
            Ok(())
        }
    }
}

fn markup_error(original: &str, err: &VerboseError<&str>) -> DomError {
    let (fragment, message) = match err.errors.first() {
        Some((frag, kind)) => {
            let message = err
                .errors
                .iter()
                .find_map(|(_, kind)| match kind {
                    VerboseErrorKind::Context(ctx) => Some(ctx.to_string()),
                    _ => None,
                })
                .unwrap_or_else(|| format!("{:?}", kind));
            (*frag, message)
        }
        None => (original, "invalid markup".to_string()),
    };
    let offset = original.len().saturating_sub(fragment.len());
    let consumed = &original[..offset];
    let line = consumed.matches('\n').count() + 1;
    let column = consumed
        .rfind('\n')
        .map_or(consumed.chars().count(), |nl| consumed[nl + 1..].chars().count())
        + 1;
    DomError::Markup {
        line,
        column,
        message,
    }
}

fn nodes(input: &str) -> ParseResult<Vec<MarkupNode>> {
    map(many0(node), |nodes| nodes.into_iter().flatten().collect())(input)
}

fn node(input: &str) -> ParseResult<Option<MarkupNode>> {
    alt((
        map(comment, |_| None),
        map(element, Some),
        map(text, Some),
    ))(input)
}

fn comment(input: &str) -> ParseResult<&str> {
    delimited(tag("<!--"), take_until("-->"), tag("-->"))(input)
}

fn text(input: &str) -> ParseResult<MarkupNode> {
    map(take_while1(|c| c != '<'), |raw: &str| {
        MarkupNode::Text(decode_html_entities(raw).into_owned())
    })(input)
}

fn tag_name(input: &str) -> ParseResult<&str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '-')(input)
}

fn attribute_name(input: &str) -> ParseResult<&str> {
    take_while1(|c: char| c.is_alphanumeric() || matches!(c, '-' | '_' | ':' | '.' | '@'))(input)
}

fn attribute_value(input: &str) -> ParseResult<&str> {
    alt((
        delimited(char('"'), take_while(|c| c != '"'), char('"')),
        delimited(char('\''), take_while(|c| c != '\''), char('\'')),
        take_while1(|c: char| !c.is_whitespace() && !matches!(c, '"' | '\'' | '<' | '>' | '=' | '`')),
    ))(input)
}

fn attribute(input: &str) -> ParseResult<(String, String)> {
    map(
        tuple((
            attribute_name,
            opt(preceded(
                tuple((multispace0, char('='), multispace0)),
                context("attribute value", cut(attribute_value)),
            )),
        )),
        |(name, value)| {
            (
                name.to_ascii_lowercase(),
                value
                    .map(|v| decode_html_entities(v).into_owned())
                    .unwrap_or_default(),
            )
        },
    )(input)
}

fn element(input: &str) -> ParseResult<MarkupNode> {
    let (input, name) = preceded(char('<'), tag_name)(input)?;
    let (input, attributes) = many0(preceded(multispace1, attribute))(input)?;
    let (input, _) = multispace0(input)?;
    let tag_lower = name.to_ascii_lowercase();

    if let Ok((input, _)) = tag::<_, _, VerboseError<&str>>("/>")(input) {
        return Ok((input, leaf(tag_lower, attributes)));
    }
    let (input, _) = context("tag end", cut(char('>')))(input)?;
    if VOID_ELEMENTS.contains(&tag_lower.as_str()) {
        return Ok((input, leaf(tag_lower, attributes)));
    }

    let (input, children) = nodes(input)?;
    let (rest, closing) = context(
        "closing tag",
        cut(delimited(
            tag("</"),
            tag_name,
            preceded(multispace0, char('>')),
        )),
    )(input)?;
    if !closing.eq_ignore_ascii_case(name) {
        return Err(nom::Err::Failure(VerboseError {
            errors: vec![(input, VerboseErrorKind::Context("mismatched closing tag"))],
        }));
    }

    Ok((
        rest,
        MarkupNode::Element {
            tag: tag_lower,
            attributes,
            children,
        },
    ))
}

fn leaf(tag: String, attributes: Vec<(String, String)>) -> MarkupNode {
    MarkupNode::Element {
        tag,
        attributes,
        children: Vec::new(),
    }
}

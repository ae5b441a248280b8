//! Element selectors
//!
//! Supports the subset needed by the controllers: comma-separated lists of
//! compound selectors built from a tag name (or `*`), `.class`, `[attr]`
//! and `[attr=value]` parts. Combinators are not supported.

use std::str::FromStr;

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, multispace0},
    combinator::{all_consuming, map, opt},
    multi::{many0, separated_list1},
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};
use smallvec::SmallVec;

use crate::document::Element;
use crate::error::{DomError, Result};

/// `[name]` or `[name=value]`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttrMatch {
    pub name: String,
    pub value: Option<String>,
}

/// A selector without combinators, e.g. `span.transform-helper[data-x]`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Compound {
    pub tag: Option<String>,
    pub classes: SmallVec<[String; 2]>,
    pub attrs: SmallVec<[AttrMatch; 2]>,
}

impl Compound {
    pub fn matches(&self, element: &Element) -> bool {
        if let Some(tag) = &self.tag {
            if !tag.eq_ignore_ascii_case(element.tag()) {
                return false;
            }
        }
        self.classes.iter().all(|class| element.has_class(class))
            && self.attrs.iter().all(|attr| match element.attribute(&attr.name) {
                None => false,
                Some(actual) => attr.value.as_deref().map_or(true, |v| v == actual),
            })
    }
}

/// A parsed selector list
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    source: String,
    alternatives: SmallVec<[Compound; 1]>,
}

impl Selector {
    pub fn parse(source: &str) -> Result<Self> {
        match selector_list(source.trim()) {
            Ok((_, alternatives)) => Ok(Self {
                source: source.trim().to_string(),
                alternatives: alternatives.into_iter().collect(),
            }),
            Err(err) => Err(DomError::Selector {
                selector: source.to_string(),
                message: err.to_string(),
            }),
        }
    }

    /// `[name]`
    pub fn attribute(name: &str) -> Self {
        Self {
            source: format!("[{}]", name),
            alternatives: smallvec::smallvec![Compound {
                attrs: smallvec::smallvec![AttrMatch {
                    name: name.to_string(),
                    value: None,
                }],
                ..Default::default()
            }],
        }
    }

    pub fn matches(&self, element: &Element) -> bool {
        self.alternatives.iter().any(|c| c.matches(element))
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn alternatives(&self) -> &[Compound] {
        &self.alternatives
    }
}

impl FromStr for Selector {
    type Err = DomError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

enum Part {
    Class(String),
    Attr(AttrMatch),
}

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '-' || c == '_')(input)
}

fn quoted(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('"'), take_while(|c| c != '"'), char('"')),
        delimited(char('\''), take_while(|c| c != '\''), char('\'')),
    ))(input)
}

fn attr_match(input: &str) -> IResult<&str, AttrMatch> {
    map(
        delimited(
            char('['),
            tuple((
                delimited(multispace0, identifier, multispace0),
                opt(preceded(
                    pair(char('='), multispace0),
                    alt((quoted, identifier)),
                )),
                multispace0,
            )),
            char(']'),
        ),
        |(name, value, _)| AttrMatch {
            name: name.to_string(),
            value: value.map(str::to_string),
        },
    )(input)
}

fn compound(input: &str) -> IResult<&str, Compound> {
    let (rest, (tag_name, parts)) = pair(
        opt(alt((identifier, tag("*")))),
        many0(alt((
            map(preceded(char('.'), identifier), |c: &str| {
                Part::Class(c.to_string())
            }),
            map(attr_match, Part::Attr),
        ))),
    )(input)?;

    if tag_name.is_none() && parts.is_empty() {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Verify,
        )));
    }

    let mut compound = Compound {
        tag: tag_name.filter(|t| *t != "*").map(str::to_string),
        ..Default::default()
    };
    for part in parts {
        match part {
            Part::Class(class) => compound.classes.push(class),
            Part::Attr(attr) => compound.attrs.push(attr),
        }
    }
    Ok((rest, compound))
}

fn selector_list(input: &str) -> IResult<&str, Vec<Compound>> {
    all_consuming(separated_list1(
        delimited(multispace0, char(','), multispace0),
        compound,
    ))(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    #[test]
    fn test_parse_attribute_selector() {
        let selector = Selector::parse("[data-transform-helper-name]").unwrap();
        assert_eq!(
            selector.alternatives()[0].attrs[0],
            AttrMatch {
                name: "data-transform-helper-name".to_string(),
                value: None,
            }
        );
        assert_eq!(selector, Selector::attribute("data-transform-helper-name"));
    }

    #[test]
    fn test_parse_compound_list() {
        let selector = Selector::parse("span.a.b[data-x='1'], .transform-helper").unwrap();
        let alts = selector.alternatives();
        assert_eq!(alts.len(), 2);
        assert_eq!(alts[0].tag.as_deref(), Some("span"));
        assert_eq!(alts[0].classes.as_slice(), &["a".to_string(), "b".to_string()]);
        assert_eq!(alts[0].attrs[0].value.as_deref(), Some("1"));
        assert_eq!(alts[1].classes.as_slice(), &["transform-helper".to_string()]);
    }

    #[test]
    fn test_reject_malformed() {
        assert!(Selector::parse("").is_err());
        assert!(Selector::parse("div > span").is_err());
        assert!(Selector::parse("[unclosed").is_err());
    }

    #[test]
    fn test_matches_element() {
        let mut doc = Document::new();
        let node = doc.create_element("div");
        doc.set_attribute(node, "data-transform-target-name", "gallery")
            .unwrap();
        doc.add_class(node, "card").unwrap();
        let element = doc.element(node).unwrap();

        assert!(Selector::parse("div.card").unwrap().matches(element));
        assert!(Selector::parse("[data-transform-target-name=gallery]")
            .unwrap()
            .matches(element));
        assert!(!Selector::parse("[data-transform-target-name=other]")
            .unwrap()
            .matches(element));
        assert!(Selector::parse("*").unwrap().matches(element));
        assert!(!Selector::parse("span, .missing").unwrap().matches(element));
    }
}

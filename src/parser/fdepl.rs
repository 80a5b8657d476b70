//! Recursive-descent reader for deployment (`.fdepl`) documents.
//!
//! Property assignments carry no meaning for validation and are skipped;
//! only the element structure and the names it refers to are kept.

use std::path::Path;

use super::cursor::{Cursor, PResult};
use super::error::ParseError;
use super::fidl::parse_import;
use super::keywords::FDEPL_ELEMENT_KEYWORDS;
use super::lexer::{TokenKind, tokenize};
use crate::base::LineIndex;
use crate::syntax::{
    DeployedElement, DeployedKind, DeploymentDefinition, DeploymentDocument,
    DeploymentTargetKind, ElementId, Reference,
};

/// Parse a `.fdepl` source into a [`DeploymentDocument`] keyed by `path`.
pub fn parse_fdepl(source: &str, path: &Path) -> Result<DeploymentDocument, ParseError> {
    let lines = LineIndex::new(source);
    let tokens = tokenize(source, &lines)?;
    let mut cursor = Cursor::new(tokens, &lines, source);
    let mut document = DeploymentDocument {
        path: path.to_path_buf(),
        ..DeploymentDocument::default()
    };
    parse_document(&mut cursor, &mut document)?;
    Ok(document)
}

fn parse_document(p: &mut Cursor<'_>, doc: &mut DeploymentDocument) -> PResult<()> {
    // Deployment files may or may not declare a package.
    if p.eat_keyword("package") {
        p.qualified_name()?;
    }

    while p.at_keyword("import") {
        doc.imports.push(parse_import(p)?);
    }

    while !p.at_eof() {
        if p.at_keyword("define") {
            if let Some(definition) = parse_definition(p)? {
                doc.definitions.push(definition);
            }
        } else if p.eat_keyword("specification") {
            p.qualified_name()?;
            skip_until_block(p)?;
        } else {
            return Err(p.error("expected 'define' or 'specification'"));
        }
    }
    Ok(())
}

/// `define Spec for interface a.b.Name { ... }`
///
/// Definitions for targets other than interfaces and type collections
/// (providers, instances) are consumed and dropped.
fn parse_definition(p: &mut Cursor<'_>) -> PResult<Option<DeploymentDefinition>> {
    let start = p.offset();
    p.expect_keyword("define")?;
    let (specification, _) = p.qualified_name()?;
    p.expect_keyword("for")?;

    let target_kind = if p.eat_keyword("interface") {
        DeploymentTargetKind::Interface
    } else if p.eat_keyword("typeCollection") {
        DeploymentTargetKind::TypeCollection
    } else {
        skip_until_block(p)?;
        return Ok(None);
    };

    let (target, range) = p.qualified_name()?;
    let target = Reference::new(target, p.span(range));
    let elements = parse_element_body(p, ElementContext::Container)?;

    Ok(Some(DeploymentDefinition {
        id: ElementId::new(),
        specification,
        target_kind,
        target,
        elements,
        span: p.span_from(start),
    }))
}

/// What nested names mean inside the block being read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ElementContext {
    /// Body of a `define`: keyword-introduced element blocks.
    Container,
    /// Body of a method: `in { }` / `out { }` argument groups.
    Method,
    /// Body of a broadcast: `out { }` only.
    Broadcast,
    /// Body of a struct or union: bare field names.
    Fields,
    /// Body of an enumeration: bare enumerator names.
    Enumerators,
    /// Body with properties only (attributes, arguments, aliases).
    Leaf,
    /// Argument group of the given direction.
    Arguments(DeployedKind),
}

fn parse_element_body(
    p: &mut Cursor<'_>,
    context: ElementContext,
) -> PResult<Vec<DeployedElement>> {
    p.expect(TokenKind::LBrace)?;
    let mut children = Vec::new();

    while !p.eat(TokenKind::RBrace) {
        if p.at_eof() {
            return Err(p.error("unterminated block, expected '}'"));
        }

        if p.at(TokenKind::Ident) && p.nth_kind(1) == Some(TokenKind::Eq) {
            skip_property(p)?;
            continue;
        }

        match context {
            ElementContext::Container => children.push(parse_keyword_element(p)?),
            ElementContext::Method if p.at_keyword("in") => {
                p.bump();
                let group = ElementContext::Arguments(DeployedKind::InArgument);
                children.extend(parse_element_body(p, group)?);
            }
            ElementContext::Method | ElementContext::Broadcast if p.at_keyword("out") => {
                p.bump();
                let group = ElementContext::Arguments(DeployedKind::OutArgument);
                children.extend(parse_element_body(p, group)?);
            }
            ElementContext::Fields => children.push(parse_named_element(p, DeployedKind::Field)?),
            ElementContext::Enumerators => {
                children.push(parse_named_element(p, DeployedKind::Enumerator)?)
            }
            ElementContext::Arguments(kind) => children.push(parse_named_element(p, kind)?),
            ElementContext::Method | ElementContext::Broadcast | ElementContext::Leaf => {
                return Err(p.error("expected a property assignment"));
            }
        }
    }
    Ok(children)
}

/// `method m { ... }`, `struct s { ... }`, ...
fn parse_keyword_element(p: &mut Cursor<'_>) -> PResult<DeployedElement> {
    let start = p.offset();
    let keyword = match p.current() {
        Some(token) if token.kind == TokenKind::Ident => token.text,
        _ => return Err(p.error("expected a deployment element")),
    };
    if !FDEPL_ELEMENT_KEYWORDS.contains(&keyword) {
        return Err(p.error("expected a deployment element"));
    }
    let (kind, context) = match keyword {
        "method" => (DeployedKind::Method, ElementContext::Method),
        "attribute" => (DeployedKind::Attribute, ElementContext::Leaf),
        "broadcast" => (DeployedKind::Broadcast, ElementContext::Broadcast),
        "struct" => (DeployedKind::Struct, ElementContext::Fields),
        "union" => (DeployedKind::Union, ElementContext::Fields),
        "enumeration" => (DeployedKind::Enumeration, ElementContext::Enumerators),
        "array" => (DeployedKind::Array, ElementContext::Leaf),
        "typedef" => (DeployedKind::Typedef, ElementContext::Leaf),
        _ => (DeployedKind::Map, ElementContext::Leaf),
    };
    p.bump();

    let (name, range) = p.qualified_name()?;
    let target = Reference::new(name, p.span(range));
    let children = if p.at(TokenKind::LBrace) {
        parse_element_body(p, context)?
    } else {
        Vec::new()
    };

    Ok(DeployedElement {
        id: ElementId::new(),
        kind,
        target,
        children,
        span: p.span_from(start),
    })
}

/// A bare name with an optional property block: fields, enumerators, arguments.
fn parse_named_element(p: &mut Cursor<'_>, kind: DeployedKind) -> PResult<DeployedElement> {
    let start = p.offset();
    let (name, range) = p.ident()?;
    let target = Reference::new(name, p.span(range));
    if p.at(TokenKind::LBrace) {
        parse_element_body(p, ElementContext::Leaf)?;
    }
    Ok(DeployedElement {
        id: ElementId::new(),
        kind,
        target,
        children: Vec::new(),
        span: p.span_from(start),
    })
}

/// `Name = value` where value is a literal, a (qualified) name, or `{ ... }`.
fn skip_property(p: &mut Cursor<'_>) -> PResult<()> {
    p.ident()?;
    p.expect(TokenKind::Eq)?;
    if p.at(TokenKind::LBrace) {
        return p.skip_block();
    }
    p.eat(TokenKind::Minus);
    match p.nth_kind(0) {
        Some(TokenKind::Ident) => {
            p.qualified_name()?;
        }
        Some(TokenKind::Number) => {
            p.bump();
            // Fractional part.
            if p.at(TokenKind::Dot) && p.nth_kind(1) == Some(TokenKind::Number) {
                p.bump();
                p.bump();
            }
        }
        Some(TokenKind::String) => {
            p.bump();
        }
        _ => return Err(p.error("expected a property value")),
    }
    Ok(())
}

fn skip_until_block(p: &mut Cursor<'_>) -> PResult<()> {
    while !p.at(TokenKind::LBrace) {
        if p.bump().is_none() {
            return Err(p.error("expected '{'"));
        }
    }
    p.skip_block()
}

//! Recursive-descent reader for interface-description (`.fidl`) documents.

use std::path::Path;

use smol_str::SmolStr;

use super::cursor::{Cursor, PResult};
use super::error::ParseError;
use super::keywords::{ATTRIBUTE_FLAGS, BROADCAST_FLAGS, METHOD_FLAGS};
use super::lexer::{TokenKind, tokenize};
use crate::base::LineIndex;
use crate::syntax::{
    Argument, ArrayType, Attribute, Broadcast, Document, ElementId, EnumerationType, Enumerator,
    Import, Interface, LiteralValue, MapType, Method, Primitive, Reference, StructType,
    TypeCollection, TypeDecl, TypeRef, TypeRefKind, TypedElement, TypedefType, Version,
};

/// Parse a `.fidl` source into a [`Document`] keyed by `path`.
pub fn parse_fidl(source: &str, path: &Path) -> Result<Document, ParseError> {
    let lines = LineIndex::new(source);
    let tokens = tokenize(source, &lines)?;
    let mut cursor = Cursor::new(tokens, &lines, source);
    let mut document = Document {
        path: path.to_path_buf(),
        ..Document::default()
    };
    parse_document(&mut cursor, &mut document)?;
    Ok(document)
}

fn parse_document(p: &mut Cursor<'_>, doc: &mut Document) -> PResult<()> {
    p.expect_keyword("package")?;
    doc.package = p.qualified_name()?.0;

    while p.at_keyword("import") {
        doc.imports.push(parse_import(p)?);
    }

    while !p.at_eof() {
        if p.at_keyword("typeCollection") {
            doc.type_collections.push(parse_type_collection(p)?);
        } else if p.at_keyword("interface") {
            doc.interfaces.push(parse_interface(p)?);
        } else {
            return Err(p.error("expected 'typeCollection' or 'interface'"));
        }
    }
    Ok(())
}

/// `import ns.* from "uri"` or `import model "uri"`
pub(crate) fn parse_import(p: &mut Cursor<'_>) -> PResult<Import> {
    let start = p.offset();
    p.expect_keyword("import")?;

    let namespace = if p.eat_keyword("model") || p.at(TokenKind::String) {
        None
    } else {
        let (mut namespace, _) = p.qualified_name()?;
        if p.at(TokenKind::Dot) && p.nth_kind(1) == Some(TokenKind::Star) {
            p.bump();
            p.bump();
            namespace = SmolStr::new(format!("{namespace}.*"));
        }
        p.expect_keyword("from")?;
        Some(namespace)
    };

    let (uri, _) = p.string_literal()?;
    Ok(Import {
        id: ElementId::new(),
        uri,
        namespace,
        span: p.span_from(start),
    })
}

fn parse_type_collection(p: &mut Cursor<'_>) -> PResult<TypeCollection> {
    let start = p.offset();
    p.expect_keyword("typeCollection")?;
    let (name, _) = p.ident()?;
    p.expect(TokenKind::LBrace)?;

    let mut version = None;
    let mut types = Vec::new();
    while !p.eat(TokenKind::RBrace) {
        if p.at_keyword("version") {
            version = Some(parse_version(p)?);
        } else if let Some(decl) = parse_type_decl(p)? {
            types.push(decl);
        } else {
            return Err(p.error("expected a type declaration"));
        }
    }

    Ok(TypeCollection {
        id: ElementId::new(),
        name,
        version,
        types,
        span: p.span_from(start),
    })
}

fn parse_interface(p: &mut Cursor<'_>) -> PResult<Interface> {
    let start = p.offset();
    p.expect_keyword("interface")?;
    let (name, _) = p.ident()?;

    let base = if p.eat_keyword("extends") {
        let (base, range) = p.qualified_name()?;
        Some(Reference::new(base, p.span(range)))
    } else {
        None
    };

    let mut manages = Vec::new();
    if p.eat_keyword("manages") {
        loop {
            let (managed, range) = p.qualified_name()?;
            manages.push(Reference::new(managed, p.span(range)));
            if !p.eat(TokenKind::Comma) {
                break;
            }
        }
    }

    p.expect(TokenKind::LBrace)?;
    let mut iface = Interface {
        id: ElementId::new(),
        name,
        version: None,
        base,
        manages,
        attributes: Vec::new(),
        methods: Vec::new(),
        broadcasts: Vec::new(),
        types: Vec::new(),
        span: Default::default(),
    };

    while !p.eat(TokenKind::RBrace) {
        if p.at_keyword("version") {
            iface.version = Some(parse_version(p)?);
        } else if p.at_keyword("attribute") {
            iface.attributes.push(parse_attribute(p)?);
        } else if p.at_keyword("method") {
            iface.methods.push(parse_method(p)?);
        } else if p.at_keyword("broadcast") {
            iface.broadcasts.push(parse_broadcast(p)?);
        } else if p.eat_keyword("contract") {
            p.skip_block()?;
        } else if let Some(decl) = parse_type_decl(p)? {
            iface.types.push(decl);
        } else {
            return Err(p.error("expected an interface member"));
        }
    }

    iface.span = p.span_from(start);
    Ok(iface)
}

/// `version { major 1 minor 0 }`
fn parse_version(p: &mut Cursor<'_>) -> PResult<Version> {
    p.expect_keyword("version")?;
    p.expect(TokenKind::LBrace)?;
    p.expect_keyword("major")?;
    let major = parse_u32(p)?;
    p.expect_keyword("minor")?;
    let minor = parse_u32(p)?;
    p.expect(TokenKind::RBrace)?;
    Ok(Version { major, minor })
}

fn parse_u32(p: &mut Cursor<'_>) -> PResult<u32> {
    let token = p.expect(TokenKind::Number)?;
    token
        .text
        .parse()
        .map_err(|_| p.error(format!("'{}' is not a valid version number", token.text)))
}

fn parse_attribute(p: &mut Cursor<'_>) -> PResult<Attribute> {
    let start = p.offset();
    p.expect_keyword("attribute")?;
    let ty = parse_type_ref(p)?;
    let (name, _) = p.ident()?;

    let mut readonly = false;
    while let Some(flag) = ATTRIBUTE_FLAGS.iter().find(|flag| p.at_keyword(flag)) {
        readonly |= *flag == "readonly";
        p.bump();
    }

    Ok(Attribute {
        id: ElementId::new(),
        name,
        ty,
        readonly,
        span: p.span_from(start),
    })
}

fn parse_method(p: &mut Cursor<'_>) -> PResult<Method> {
    let start = p.offset();
    p.expect_keyword("method")?;
    let (name, _) = p.ident()?;

    let mut fire_and_forget = false;
    while let Some(flag) = METHOD_FLAGS.iter().find(|flag| p.at_keyword(flag)) {
        fire_and_forget |= *flag == "fireAndForget";
        p.bump();
    }

    let mut in_args = Vec::new();
    let mut out_args = Vec::new();
    if p.eat(TokenKind::LBrace) {
        while !p.eat(TokenKind::RBrace) {
            if p.eat_keyword("in") {
                in_args = parse_arguments(p)?;
            } else if p.eat_keyword("out") {
                out_args = parse_arguments(p)?;
            } else if p.eat_keyword("error") {
                parse_error_clause(p)?;
            } else {
                return Err(p.error("expected 'in', 'out' or 'error'"));
            }
        }
    }

    Ok(Method {
        id: ElementId::new(),
        name,
        in_args,
        out_args,
        fire_and_forget,
        span: p.span_from(start),
    })
}

/// `error Enum`, `error { A B }` or `error extends Enum { ... }`
fn parse_error_clause(p: &mut Cursor<'_>) -> PResult<()> {
    if p.eat_keyword("extends") {
        p.qualified_name()?;
    }
    if p.at(TokenKind::LBrace) {
        p.skip_block()
    } else {
        p.qualified_name().map(|_| ())
    }
}

fn parse_broadcast(p: &mut Cursor<'_>) -> PResult<Broadcast> {
    let start = p.offset();
    p.expect_keyword("broadcast")?;
    let (name, _) = p.ident()?;

    let mut selective = false;
    while let Some(flag) = BROADCAST_FLAGS.iter().find(|flag| p.at_keyword(flag)) {
        selective |= *flag == "selective";
        p.bump();
    }

    let mut out_args = Vec::new();
    if p.eat(TokenKind::LBrace) {
        while !p.eat(TokenKind::RBrace) {
            p.expect_keyword("out")?;
            out_args = parse_arguments(p)?;
        }
    }

    Ok(Broadcast {
        id: ElementId::new(),
        name,
        out_args,
        selective,
        span: p.span_from(start),
    })
}

/// `{ Type name ... }`
fn parse_arguments(p: &mut Cursor<'_>) -> PResult<Vec<Argument>> {
    p.expect(TokenKind::LBrace)?;
    let mut args = Vec::new();
    while !p.eat(TokenKind::RBrace) {
        args.push(parse_typed_element(p)?);
    }
    Ok(args)
}

fn parse_typed_element(p: &mut Cursor<'_>) -> PResult<TypedElement> {
    let start = p.offset();
    let ty = parse_type_ref(p)?;
    let (name, _) = p.ident()?;
    Ok(TypedElement {
        id: ElementId::new(),
        name,
        ty,
        span: p.span_from(start),
    })
}

fn parse_type_ref(p: &mut Cursor<'_>) -> PResult<TypeRef> {
    let start = p.offset();
    let (name, _) = p.qualified_name()?;
    let kind = match Primitive::from_name(&name) {
        Some(primitive) => TypeRefKind::Predefined(primitive),
        None => TypeRefKind::Derived(name),
    };
    let implicit_array = if p.at(TokenKind::LBracket) && p.nth_kind(1) == Some(TokenKind::RBracket)
    {
        p.bump();
        p.bump();
        true
    } else {
        false
    };
    Ok(TypeRef {
        kind,
        implicit_array,
        span: p.span_from(start),
    })
}

/// Returns `None` when the cursor is not at a type declaration keyword.
fn parse_type_decl(p: &mut Cursor<'_>) -> PResult<Option<TypeDecl>> {
    p.eat_keyword("public");
    let decl = if p.at_keyword("struct") {
        TypeDecl::Struct(parse_struct(p, "struct")?)
    } else if p.at_keyword("union") {
        TypeDecl::Union(parse_struct(p, "union")?)
    } else if p.at_keyword("enumeration") {
        TypeDecl::Enumeration(parse_enumeration(p)?)
    } else if p.at_keyword("typedef") {
        TypeDecl::Typedef(parse_typedef(p)?)
    } else if p.at_keyword("array") {
        TypeDecl::Array(parse_array(p)?)
    } else if p.at_keyword("map") {
        TypeDecl::Map(parse_map(p)?)
    } else {
        return Ok(None);
    };
    Ok(Some(decl))
}

fn parse_struct(p: &mut Cursor<'_>, keyword: &str) -> PResult<StructType> {
    let start = p.offset();
    p.expect_keyword(keyword)?;
    let (name, _) = p.ident()?;
    let base = if p.eat_keyword("extends") {
        let (base, range) = p.qualified_name()?;
        Some(Reference::new(base, p.span(range)))
    } else {
        None
    };
    p.eat_keyword("polymorphic");

    p.expect(TokenKind::LBrace)?;
    let mut fields = Vec::new();
    while !p.eat(TokenKind::RBrace) {
        fields.push(parse_typed_element(p)?);
    }

    Ok(StructType {
        id: ElementId::new(),
        name,
        base,
        fields,
        span: p.span_from(start),
    })
}

fn parse_enumeration(p: &mut Cursor<'_>) -> PResult<EnumerationType> {
    let start = p.offset();
    p.expect_keyword("enumeration")?;
    let (name, _) = p.ident()?;
    let base = if p.eat_keyword("extends") {
        let (base, range) = p.qualified_name()?;
        Some(Reference::new(base, p.span(range)))
    } else {
        None
    };

    p.expect(TokenKind::LBrace)?;
    let mut enumerators = Vec::new();
    while !p.eat(TokenKind::RBrace) {
        let item_start = p.offset();
        let (item, _) = p.ident()?;
        let value = if p.eat(TokenKind::Eq) {
            Some(parse_literal(p)?)
        } else {
            None
        };
        enumerators.push(Enumerator {
            id: ElementId::new(),
            name: item,
            value,
            span: p.span_from(item_start),
        });
        p.eat(TokenKind::Comma);
    }

    Ok(EnumerationType {
        id: ElementId::new(),
        name,
        base,
        enumerators,
        span: p.span_from(start),
    })
}

/// Enumerator value kept verbatim: number, identifier or string contents.
fn parse_literal(p: &mut Cursor<'_>) -> PResult<LiteralValue> {
    let start = p.offset();
    let text = if p.at(TokenKind::String) {
        p.string_literal()?.0
    } else if p.eat(TokenKind::Minus) {
        format!("-{}", p.expect(TokenKind::Number)?.text)
    } else if p.at(TokenKind::Number) || p.at(TokenKind::Ident) {
        p.bump().map(|t| t.text.to_string()).unwrap_or_default()
    } else {
        return Err(p.error("expected an enumerator value"));
    };
    Ok(LiteralValue {
        text,
        span: p.span_from(start),
    })
}

fn parse_typedef(p: &mut Cursor<'_>) -> PResult<TypedefType> {
    let start = p.offset();
    p.expect_keyword("typedef")?;
    let (name, _) = p.ident()?;
    p.expect_keyword("is")?;
    let actual = parse_type_ref(p)?;
    Ok(TypedefType {
        id: ElementId::new(),
        name,
        actual,
        span: p.span_from(start),
    })
}

fn parse_array(p: &mut Cursor<'_>) -> PResult<ArrayType> {
    let start = p.offset();
    p.expect_keyword("array")?;
    let (name, _) = p.ident()?;
    p.expect_keyword("of")?;
    let element = parse_type_ref(p)?;
    Ok(ArrayType {
        id: ElementId::new(),
        name,
        element,
        span: p.span_from(start),
    })
}

/// `map Name { Key to Value }`
fn parse_map(p: &mut Cursor<'_>) -> PResult<MapType> {
    let start = p.offset();
    p.expect_keyword("map")?;
    let (name, _) = p.ident()?;
    p.expect(TokenKind::LBrace)?;
    let key = parse_type_ref(p)?;
    p.expect_keyword("to")?;
    let value = parse_type_ref(p)?;
    p.expect(TokenKind::RBrace)?;
    Ok(MapType {
        id: ElementId::new(),
        name,
        key,
        value,
        span: p.span_from(start),
    })
}

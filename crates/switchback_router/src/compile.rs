//! Descriptor compilation.
//!
//! Turns a [`CommandSpec`]'s descriptors and parameter list into the
//! segment sequences the tree is built from:
//!
//! ```text
//! descriptor "chunk preload <?>"    params [int min:0, bool]
//!              │       │     │                  │        │
//!              ▼       ▼     ▼                  │        │
//!          Literal Literal Typed(int min:0) ◄───┘        │
//!                                Typed(bool) ◄───────────┘  (implicit, appended)
//! ```
//!
//! Each placeholder binds the next unclaimed parameter. Parameters left over
//! after the last placeholder are appended to the path in order.

use switchback_foundation::{Error, ErrorContext, Result};
use switchback_parser::{ParameterType, ParserRegistry};

use crate::config::RouterConfig;
use crate::node::caseless_eq;
use crate::spec::{CommandSpec, ParamSpec};

/// A typed slot of a compiled path.
#[derive(Clone, Debug)]
pub struct TypedSegment {
    /// The parameter type.
    pub ty: ParameterType,
    /// Filter expression, if any.
    pub filter: Option<String>,
    /// Whether the slot consumes every remaining token.
    pub greedy: bool,
    /// Completions contributed by this registration.
    pub suggestions: Vec<String>,
}

impl TypedSegment {
    /// Returns true if two slots would occupy the same tree node.
    ///
    /// Same type, same greediness, and filters that are both absent or
    /// equal ignoring case.
    #[must_use]
    pub fn same_slot(&self, ty: &ParameterType, filter: Option<&str>, greedy: bool) -> bool {
        self.ty == *ty
            && self.greedy == greedy
            && match (self.filter.as_deref(), filter) {
                (None, None) => true,
                (Some(a), Some(b)) => caseless_eq(a, b),
                _ => false,
            }
    }
}

/// One element of a compiled path.
#[derive(Clone, Debug)]
pub enum PathSegment {
    /// A word that must appear, compared ignoring case.
    Literal(String),
    /// A typed parameter slot.
    Typed(TypedSegment),
}

impl PathSegment {
    /// Renders the segment as it appears in usage lines.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Literal(word) => word.clone(),
            Self::Typed(slot) => render_slot(&slot.ty, slot.greedy),
        }
    }
}

/// Renders a typed slot as `<Display>` or `<Display...>`.
#[must_use]
pub fn render_slot(ty: &ParameterType, greedy: bool) -> String {
    if greedy {
        format!("<{}...>", ty.display_name())
    } else {
        format!("<{}>", ty.display_name())
    }
}

/// A descriptor after compilation.
#[derive(Clone, Debug)]
pub struct CompiledPath {
    /// The descriptor as written.
    pub descriptor: String,
    /// Segments, command word first.
    pub segments: Vec<PathSegment>,
}

impl CompiledPath {
    /// The command word.
    #[must_use]
    pub fn label(&self) -> &str {
        match self.segments.first() {
            Some(PathSegment::Literal(word)) => word,
            _ => "",
        }
    }

    /// Renders the whole path, e.g. `chunk preload <Whole #>`.
    #[must_use]
    pub fn render(&self) -> String {
        self.segments.iter().map(PathSegment::render).collect::<Vec<_>>().join(" ")
    }
}

/// A command spec after compilation.
#[derive(Clone, Debug)]
pub struct CompiledCommand {
    /// Resolved parameters, in declared order.
    pub params: Vec<TypedSegment>,
    /// One compiled path per descriptor.
    pub paths: Vec<CompiledPath>,
}

/// Resolves and validates a parameter list.
///
/// # Errors
///
/// Fails if a type is not registered, a filter is malformed, or a greedy
/// parameter is not last.
pub fn compile_params(params: &[ParamSpec], registry: &ParserRegistry) -> Result<Vec<TypedSegment>> {
    let last = params.len().saturating_sub(1);
    params
        .iter()
        .enumerate()
        .map(|(index, param)| {
            let ty = registry
                .lookup(&param.type_name)
                .ok_or_else(|| Error::unknown_parameter_type(&param.type_name))?;
            if let Some(filter) = &param.filter {
                ty.parser().validate_filter(filter)?;
            }
            if param.greedy && index != last {
                return Err(Error::invalid_descriptor(
                    param.type_name.clone(),
                    format!("greedy parameter {index} is not the last parameter"),
                ));
            }
            Ok(TypedSegment {
                ty,
                filter: param.filter.clone(),
                greedy: param.greedy,
                suggestions: param.suggestions.clone(),
            })
        })
        .collect()
}

/// Compiles one descriptor against resolved parameters.
///
/// # Errors
///
/// Fails if the descriptor is blank, starts with a placeholder, has more
/// placeholders than parameters, or places a literal after a greedy slot.
pub fn compile_descriptor(descriptor: &str, params: &[TypedSegment], placeholder: &str) -> Result<Vec<PathSegment>> {
    let words: Vec<&str> = descriptor.split_whitespace().collect();
    match words.first() {
        None => return Err(Error::invalid_descriptor(descriptor, "descriptor is empty")),
        Some(first) if *first == placeholder => {
            return Err(Error::invalid_descriptor(
                descriptor,
                "the first word must be a literal command word",
            ));
        }
        Some(_) => {}
    }

    let placeholders = words.iter().filter(|w| **w == placeholder).count();
    if placeholders > params.len() {
        return Err(Error::arity_mismatch(placeholders, params.len()));
    }

    let mut remaining = params.iter();
    let mut segments: Vec<PathSegment> = Vec::with_capacity(words.len() + params.len() - placeholders);
    for word in words {
        if word == placeholder {
            if let Some(slot) = remaining.next() {
                segments.push(PathSegment::Typed(slot.clone()));
            }
        } else {
            segments.push(PathSegment::Literal(word.to_string()));
        }
    }
    segments.extend(remaining.cloned().map(PathSegment::Typed));

    let greedy_at = segments
        .iter()
        .position(|s| matches!(s, PathSegment::Typed(slot) if slot.greedy));
    if greedy_at.is_some_and(|at| at + 1 != segments.len()) {
        return Err(Error::invalid_descriptor(descriptor, "a greedy parameter must end the path"));
    }
    Ok(segments)
}

/// Compiles every descriptor of a spec.
///
/// # Errors
///
/// Fails on the first invalid descriptor or parameter; the error carries
/// the handler name and descriptor as context.
pub fn compile_spec(spec: &CommandSpec, registry: &ParserRegistry, config: &RouterConfig) -> Result<CompiledCommand> {
    let context = || ErrorContext::new().with_source(spec.name.clone());

    if spec.paths.is_empty() {
        return Err(Error::invalid_descriptor("", "a command needs at least one path").with_context(context()));
    }
    let params = compile_params(&spec.params, registry)
        .map_err(|err| err.with_context(context().with_frame("resolving parameters")))?;

    let mut compiled: Vec<CompiledPath> = Vec::with_capacity(spec.paths.len());
    for descriptor in &spec.paths {
        let segments = compile_descriptor(descriptor, &params, &config.placeholder)
            .map_err(|err| err.with_context(context().with_descriptor(descriptor.clone())))?;
        let path = CompiledPath {
            descriptor: descriptor.clone(),
            segments,
        };
        if compiled.iter().any(|other| same_path(other, &path)) {
            return Err(
                Error::invalid_descriptor(descriptor.clone(), "duplicates another path of the same command")
                    .with_context(context()),
            );
        }
        compiled.push(path);
    }
    Ok(CompiledCommand {
        params,
        paths: compiled,
    })
}

fn same_path(a: &CompiledPath, b: &CompiledPath) -> bool {
    a.segments.len() == b.segments.len()
        && a.segments.iter().zip(&b.segments).all(|pair| match pair {
            (PathSegment::Literal(x), PathSegment::Literal(y)) => caseless_eq(x, y),
            (PathSegment::Typed(x), PathSegment::Typed(y)) => x.same_slot(&y.ty, y.filter.as_deref(), y.greedy),
            _ => false,
        })
}

/// Shader source loading and interface scanning
///
/// Sources are read from disk and scanned for their top-level `in`, `out` and
/// `uniform` declarations so a draw loop can check that a program exposes the
/// bindings it is about to upload. Nothing here compiles GLSL.
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use nom::{
    branch::alt,
    bytes::complete::{tag, take_until, take_while, take_while1},
    character::complete::{anychar, char, digit1, multispace0, multispace1, not_line_ending},
    combinator::{cut, map_res, opt, recognize, value, verify},
    multi::{many0, separated_list1},
    sequence::{delimited, pair, preceded, terminated},
    IResult,
};

/// Attribute locations bound by name before linking
pub const ATTRIBUTE_BINDINGS: &[(&str, u32)] = &[("position", 0), ("normal", 1)];

/// Fragment outputs bound by name before linking
pub const OUTPUT_BINDINGS: &[(&str, u32)] = &[("fragment", 0)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Vertex,
    Fragment,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Vertex => f.write_str("vertex"),
            Stage::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("can't read shader source {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{stage} shader, line {line}: {message}")]
    Parse {
        stage: Stage,
        line: usize,
        message: String,
    },

    #[error("{stage} shader does not declare `{name}`")]
    MissingBinding { stage: Stage, name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    In,
    Out,
    Uniform,
}

/// One top-level interface variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub storage: Storage,
    pub ty: String,
    pub name: String,
    /// Explicit `layout(location = N)`, if any
    pub location: Option<u32>,
    pub array_len: Option<u32>,
}

/// An attribute or output with its resolved location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: String,
    pub ty: String,
    /// `None` leaves the location to the linker
    pub location: Option<u32>,
}

/// Everything the draw loop can bind on a program
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramInterface {
    pub attributes: Vec<Binding>,
    pub uniforms: Vec<Declaration>,
    pub outputs: Vec<Binding>,
}

impl ProgramInterface {
    pub fn attribute(&self, name: &str) -> Option<&Binding> {
        self.attributes.iter().find(|b| b.name == name)
    }

    pub fn uniform(&self, name: &str) -> Option<&Declaration> {
        self.uniforms.iter().find(|d| d.name == name)
    }

    /// Names from `expected` that the program does not declare as uniforms
    pub fn missing_uniforms<'a>(&self, expected: &[&'a str]) -> Vec<&'a str> {
        expected
            .iter()
            .copied()
            .filter(|name| self.uniform(name).is_none())
            .collect()
    }
}

/// Vertex and fragment sources of one program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramSource {
    pub vertex: String,
    pub fragment: String,
}

impl ProgramSource {
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }

    /// Read both stages; fails on the first file that can't be read
    pub fn load(vert: impl AsRef<Path>, frag: impl AsRef<Path>) -> Result<Self, ShaderError> {
        let vertex = read_source(vert)?;
        let fragment = read_source(frag)?;
        Ok(Self { vertex, fragment })
    }

    /// Scan both stages and resolve attribute and output locations
    pub fn interface(&self) -> Result<ProgramInterface, ShaderError> {
        let vertex = scan_interface(Stage::Vertex, &self.vertex)?;
        let fragment = scan_interface(Stage::Fragment, &self.fragment)?;

        let mut interface = ProgramInterface::default();

        for decl in &vertex {
            if decl.storage == Storage::In {
                interface.attributes.push(resolve(decl, ATTRIBUTE_BINDINGS));
            }
        }
        for decl in &fragment {
            if decl.storage == Storage::Out {
                interface.outputs.push(resolve(decl, OUTPUT_BINDINGS));
            }
        }
        for decl in vertex.iter().chain(fragment.iter()) {
            if decl.storage == Storage::Uniform && interface.uniform(&decl.name).is_none() {
                interface.uniforms.push(decl.clone());
            }
        }

        require(&interface.attributes, Stage::Vertex, ATTRIBUTE_BINDINGS[0].0)?;
        require(&interface.outputs, Stage::Fragment, OUTPUT_BINDINGS[0].0)?;

        Ok(interface)
    }
}

fn resolve(decl: &Declaration, table: &[(&str, u32)]) -> Binding {
    let location = decl.location.or_else(|| {
        table
            .iter()
            .find(|(name, _)| *name == decl.name)
            .map(|(_, location)| *location)
    });
    Binding {
        name: decl.name.clone(),
        ty: decl.ty.clone(),
        location,
    }
}

fn require(bindings: &[Binding], stage: Stage, name: &str) -> Result<(), ShaderError> {
    if bindings.iter().any(|b| b.name == name) {
        Ok(())
    } else {
        Err(ShaderError::MissingBinding {
            stage,
            name: name.to_string(),
        })
    }
}

/// Read a shader source file
pub fn read_source(path: impl AsRef<Path>) -> Result<String, ShaderError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| ShaderError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("read {} bytes from {}", source.len(), path.display());
    Ok(source)
}

/// Collect the top-level `in`/`out`/`uniform` declarations of a source.
///
/// Comments, preprocessor lines and any other statement are skipped.
/// Interface blocks are not reported.
pub fn scan_interface(stage: Stage, src: &str) -> Result<Vec<Declaration>, ShaderError> {
    match many0(token)(src) {
        Ok((_, tokens)) => Ok(tokens.into_iter().flatten().collect()),
        // only an unterminated block comment is fatal
        Err(nom::Err::Failure(e)) => Err(parse_error(stage, src, e.input, "unterminated block comment")),
        Err(nom::Err::Error(e)) => Err(parse_error(
            stage,
            src,
            e.input,
            &format!("unexpected input ({:?})", e.code),
        )),
        Err(nom::Err::Incomplete(_)) => Err(parse_error(stage, src, "", "unexpected end of source")),
    }
}

fn parse_error(stage: Stage, src: &str, rest: &str, message: &str) -> ShaderError {
    let offset = src.len() - rest.len();
    ShaderError::Parse {
        stage,
        line: src[..offset].matches('\n').count() + 1,
        message: message.to_string(),
    }
}

fn token(input: &str) -> IResult<&str, Vec<Declaration>> {
    alt((
        value(Vec::new(), multispace1),
        value(Vec::new(), line_comment),
        value(Vec::new(), block_comment),
        value(Vec::new(), preprocessor),
        declaration,
        value(Vec::new(), identifier),
        value(Vec::new(), anychar),
    ))(input)
}

fn line_comment(input: &str) -> IResult<&str, &str> {
    preceded(tag("//"), not_line_ending)(input)
}

fn block_comment(input: &str) -> IResult<&str, &str> {
    preceded(tag("/*"), cut(terminated(take_until("*/"), tag("*/"))))(input)
}

fn preprocessor(input: &str) -> IResult<&str, &str> {
    preceded(char('#'), not_line_ending)(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
    ))(input)
}

fn keyword<'a>(words: &'static [&'static str]) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    verify(identifier, move |s: &str| words.iter().any(|w| *w == s))
}

fn storage(input: &str) -> IResult<&str, Storage> {
    alt((
        value(Storage::In, verify(identifier, |s: &str| s == "in")),
        value(Storage::Out, verify(identifier, |s: &str| s == "out")),
        value(Storage::Uniform, verify(identifier, |s: &str| s == "uniform")),
    ))(input)
}

/// `layout(...)`, yielding the `location` qualifier if present
fn layout(input: &str) -> IResult<&str, Option<u32>> {
    let (input, _) = terminated(tag("layout"), multispace0)(input)?;
    let (input, qualifiers) = delimited(char('('), take_until(")"), char(')'))(input)?;
    let location = qualifiers.split(',').find_map(|q| {
        let (key, val) = q.split_once('=')?;
        if key.trim() == "location" {
            val.trim().parse().ok()
        } else {
            None
        }
    });
    Ok((input, location))
}

fn array_len(input: &str) -> IResult<&str, u32> {
    delimited(
        preceded(multispace0, char('[')),
        preceded(multispace0, map_res(digit1, |s: &str| s.parse::<u32>())),
        preceded(multispace0, char(']')),
    )(input)
}

/// One declaration statement; `uniform mat4 a, b[2];` yields one entry per name
fn declaration(input: &str) -> IResult<&str, Vec<Declaration>> {
    let (input, location) = opt(terminated(layout, multispace0))(input)?;
    let (input, _) = opt(terminated(
        keyword(&["flat", "smooth", "noperspective"]),
        multispace1,
    ))(input)?;
    let (input, storage) = terminated(storage, multispace1)(input)?;
    let (input, _) = opt(terminated(
        keyword(&["lowp", "mediump", "highp"]),
        multispace1,
    ))(input)?;
    let (input, ty) = terminated(identifier, multispace1)(input)?;
    let (input, names) = separated_list1(
        delimited(multispace0, char(','), multispace0),
        pair(identifier, opt(array_len)),
    )(input)?;
    let (input, _) = preceded(multispace0, char(';'))(input)?;

    let location = location.flatten();
    let decls = names
        .into_iter()
        .enumerate()
        .map(|(i, (name, array_len))| Declaration {
            storage,
            ty: ty.to_string(),
            name: name.to_string(),
            // an explicit location applies to the first name only
            location: if i == 0 { location } else { None },
            array_len,
        })
        .collect();
    Ok((input, decls))
}

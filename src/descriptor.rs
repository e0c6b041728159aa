//! Module descriptor types and parsing.
//!
//! A module describes itself through a JSON document: its identity
//! (`group:id@version`), the environment it runs in, human readable metadata,
//! and a map of dependencies on other modules. Parsing yields typed
//! [`DescriptorError`]s instead of failing halfway through, so that callers can
//! keep going with the rest of their descriptors.
//!
//! ```
//! use mod_link::ModuleDescriptor ;
//!
//! let descriptor = ModuleDescriptor::from_json( r#"{
//! 	"id": "tweaks",
//! 	"group": "net.example",
//! 	"version": "1.2.0",
//! 	"authors": [ "Jane Doe <jane@example.com>" ],
//! 	"dependencies": { "core": { "version": [ ">=1.0.0", "<2.0.0" ] }}
//! }"# ).unwrap();
//!
//! assert_eq!( descriptor.id(), "tweaks" );
//! assert_eq!( descriptor.authors()[ 0 ].email(), "jane@example.com" );
//! assert!( descriptor.dependencies()[ "core" ].is_required() );
//! ```

use std::collections::BTreeMap ;
use semver::Version ;
use serde::Deserialize ;
use serde_json::Value ;
use thiserror::Error ;

use crate::Side ;
use crate::version::VersionRangeError ;

mod dependency ;
mod person ;
mod load_descriptors ;

pub use dependency::Dependency ;
pub use person::Person ;
pub use load_descriptors::{ load_descriptors, LoadDescriptorError, DESCRIPTOR_ENTRY };



/// Language adapter used when a descriptor does not name one.
pub const DEFAULT_LANGUAGE_ADAPTER: &str = "mod_link::language::NativeAdapter" ;

/// Errors produced while turning a document into a [`ModuleDescriptor`].
#[derive( Error, Debug )]
pub enum DescriptorError {
    /// The document is not valid JSON or a field has the wrong JSON type.
    #[error( "Malformed descriptor: {0}" )]
    Syntax( #[from] serde_json::Error ),
    /// `id` or `group` is absent, empty or not a string, or `version` is absent or empty.
    #[error( "Malformed descriptor: missing required field '{0}'" )]
    MissingField( &'static str ),
    /// The module version is not a string holding a semantic version.
    #[error( "Malformed descriptor '{module}': invalid version '{version}': {reason}" )]
    InvalidVersion { module: String, version: String, reason: String },
    /// A dependency entry declares no version constraint.
    #[error( "Malformed descriptor '{module}': dependency '{dependency}' is missing a version" )]
    MissingDependencyVersion { module: String, dependency: String },
    /// A dependency entry holds a value of the wrong shape.
    #[error( "Malformed descriptor '{module}': dependency '{dependency}' expected {field} to be {expected}" )]
    InvalidDependencyField { module: String, dependency: String, field: &'static str, expected: &'static str },
    /// A dependency range expression could not be parsed.
    #[error( "Malformed descriptor '{module}': dependency '{dependency}': {source}" )]
    InvalidVersionRange { module: String, dependency: String, source: VersionRangeError },
}

/// Project links of a module. Every link defaults to an empty string.
#[derive( Debug, Clone, Default, PartialEq, Eq, Deserialize )]
#[serde( default )]
pub struct Links {
    homepage: String,
    issues: String,
    sources: String,
}

impl Links {
    #[inline] pub fn homepage( &self ) -> &str { &self.homepage }
    #[inline] pub fn issues( &self ) -> &str { &self.issues }
    #[inline] pub fn sources( &self ) -> &str { &self.sources }
}

/// The parsed, immutable description of one module.
#[derive( Debug, Clone )]
pub struct ModuleDescriptor {
    /// Unique within one resolution run
    id: String,
    group: String,
    version: Version,
    /// Entry point class, empty when the module has none
    mod_class: String,
    language_adapter: String,
    side: Side,
    lazily_loaded: bool,
    title: String,
    description: String,
    license: String,
    links: Links,
    authors: Vec<Person>,
    contributors: Vec<Person>,
    dependencies: BTreeMap<String, Dependency>,
}

#[derive( Deserialize )]
#[serde( rename_all = "camelCase" )]
struct RawDescriptor {
    id: Option<Value>,
    group: Option<Value>,
    version: Option<Value>,
    #[serde( default )] mod_class: Option<String>,
    #[serde( default )] language_adapter: Option<String>,
    #[serde( default )] side: Side,
    #[serde( default )] lazily_loaded: bool,
    #[serde( default )] title: Option<String>,
    #[serde( default )] description: Option<String>,
    #[serde( default )] license: Option<String>,
    #[serde( default )] links: Option<Links>,
    #[serde( default )] authors: Vec<Person>,
    #[serde( default )] contributors: Vec<Person>,
    #[serde( default )] dependencies: BTreeMap<String, Value>,
}

impl ModuleDescriptor {

    /// Parses a single descriptor object.
    ///
    /// # Errors
    /// See [`DescriptorError`].
    pub fn from_json( text: &str ) -> Result<Self, DescriptorError> {
        Self::from_value( serde_json::from_str( text )? )
    }

    /// Parses a descriptor from an already decoded JSON value.
    ///
    /// # Errors
    /// See [`DescriptorError`].
    pub fn from_value( value: Value ) -> Result<Self, DescriptorError> {

        let raw: RawDescriptor = serde_json::from_value( value )?;

        let id = required_field( raw.id, "id" )?;
        let group = required_field( raw.group, "group" )?;
        let version_text = match raw.version {
            Some( value @ ( Value::Bool( _ ) | Value::Number( _ ) | Value::Array( _ ) | Value::Object( _ ))) => {
                return Err( DescriptorError::InvalidVersion { module: id, version: value.to_string(), reason: "expected a string".to_string() })
            },
            version => required_field( version, "version" )?,
        };
        let version = Version::parse( version_text.trim() ).map_err(| err | DescriptorError::InvalidVersion {
            module: id.clone(),
            version: version_text.clone(),
            reason: err.to_string(),
        })?;

        let dependencies = raw.dependencies.into_iter()
            .map(|( dependency_id, value )| Dependency::from_value( &id, &dependency_id, value )
                .map(| dependency | ( dependency_id, dependency )))
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        Ok( Self {
            id,
            group,
            version,
            mod_class: raw.mod_class.unwrap_or_default(),
            language_adapter: raw.language_adapter.unwrap_or_else(|| DEFAULT_LANGUAGE_ADAPTER.to_string() ),
            side: raw.side,
            lazily_loaded: raw.lazily_loaded,
            title: raw.title.unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
            license: raw.license.unwrap_or_default(),
            links: raw.links.unwrap_or_default(),
            authors: raw.authors,
            contributors: raw.contributors,
            dependencies,
        })

    }

    /// Parses a document holding either one descriptor object or an array of them.
    ///
    /// Each element is parsed on its own so a malformed entry does not hide the
    /// valid ones. A document that is not JSON at all yields a single error.
    pub fn parse_document( text: &str ) -> Vec<Result<Self, DescriptorError>> {
        match serde_json::from_str::<Value>( text ) {
            Ok( Value::Array( values )) => values.into_iter().map( Self::from_value ).collect(),
            Ok( value ) => vec![ Self::from_value( value ) ],
            Err( err ) => vec![ Err( err.into() ) ],
        }
    }

    #[inline] pub fn id( &self ) -> &str { &self.id }
    #[inline] pub fn group( &self ) -> &str { &self.group }
    #[inline] pub fn version( &self ) -> &Version { &self.version }

    /// Entry point class name; empty when the module declares none.
    #[inline] pub fn mod_class( &self ) -> &str { &self.mod_class }

    /// Identifier of the language adapter that instantiates the entry point.
    #[inline] pub fn language_adapter( &self ) -> &str { &self.language_adapter }

    /// The environment this module is valid for.
    #[inline] pub fn side( &self ) -> Side { self.side }
    #[inline] pub fn is_lazily_loaded( &self ) -> bool { self.lazily_loaded }
    #[inline] pub fn title( &self ) -> &str { &self.title }
    #[inline] pub fn description( &self ) -> &str { &self.description }
    #[inline] pub fn license( &self ) -> &str { &self.license }
    #[inline] pub fn links( &self ) -> &Links { &self.links }
    #[inline] pub fn authors( &self ) -> &[Person] { &self.authors }
    #[inline] pub fn contributors( &self ) -> &[Person] { &self.contributors }

    /// Declared dependencies keyed by module id.
    #[inline] pub fn dependencies( &self ) -> &BTreeMap<String, Dependency> { &self.dependencies }

}

impl std::fmt::Display for ModuleDescriptor {
    fn fmt( &self, f: &mut std::fmt::Formatter ) -> std::fmt::Result {
        write!( f, "{}:{}@{}", self.group, self.id, self.version )
    }
}

fn required_field( value: Option<Value>, field: &'static str ) -> Result<String, DescriptorError> {
    match value {
        Some( Value::String( value )) if !value.trim().is_empty() => Ok( value ),
        _ => Err( DescriptorError::MissingField( field )),
    }
}

//! Explicit run configuration.
//!
//! A [`Config`] is built once by the entry point (from defaults, an optional TOML
//! file and command line flags) and handed by reference to the resolver and the
//! archive pipeline. Nothing in the crate reads configuration from global state.

use std::path::{ Path, PathBuf };
use serde::Deserialize ;
use thiserror::Error ;

use crate::Side ;
use crate::stripper::MarkerPredicate ;



/// Namespace of the bookkeeping annotations that transformers inject.
pub const DEFAULT_MARKER_PREFIX: &str = "Lorg/spongepowered/asm/mixin/transformer/meta" ;

/// What the archive pipeline does with a transformed class it cannot parse.
#[derive( Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize )]
#[serde( rename_all = "kebab-case" )]
pub enum MalformedClassPolicy {
    /// Fail the whole run.
    #[default] Abort,
    /// Write the entry's original bytes, log a warning and carry on.
    PassThrough,
}

#[derive( Error, Debug )]
pub enum ConfigError {
    #[error( "Failed to read config '{}': {1}", .0.display() )]
    Io( PathBuf, std::io::Error ),
    #[error( "Invalid config: {0}" )]
    Toml( #[from] toml::de::Error ),
}

/// Settings shared by dependency resolution and archive processing.
#[derive( Debug, Clone, PartialEq, Eq, Deserialize )]
#[serde( default, rename_all = "kebab-case", deny_unknown_fields )]
pub struct Config {
    /// The active runtime environment.
    pub side: Side,
    /// Annotation descriptor prefix removed from transformed classes.
    pub marker_prefix: String,
    pub malformed_class_policy: MalformedClassPolicy,
    /// Mapping file handed to the tool; carried for transformers, never applied here.
    pub mappings: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            side: Side::Universal,
            marker_prefix: DEFAULT_MARKER_PREFIX.to_string(),
            malformed_class_policy: MalformedClassPolicy::Abort,
            mappings: None,
        }
    }
}

impl Config {

    /// Parses a TOML document; absent keys keep their defaults.
    ///
    /// ```
    /// use mod_link::{ Config, Side, MalformedClassPolicy };
    ///
    /// let config = Config::from_toml_str( r#"
    ///     side = "server"
    ///     malformed-class-policy = "pass-through"
    /// "# ).unwrap();
    /// assert_eq!( config.side, Side::Server );
    /// assert_eq!( config.malformed_class_policy, MalformedClassPolicy::PassThrough );
    /// assert_eq!( config.marker_prefix, mod_link::config::DEFAULT_MARKER_PREFIX );
    /// ```
    ///
    /// # Errors
    /// Returns [`ConfigError::Toml`] for invalid TOML or unknown keys.
    pub fn from_toml_str( text: &str ) -> Result<Self, ConfigError> {
        Ok( toml::from_str( text )? )
    }

    /// Reads and parses a TOML config file.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn from_file( path: &Path ) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string( path ).map_err(| err | ConfigError::Io( path.to_path_buf(), err ))?;
        Self::from_toml_str( &text )
    }

    /// Predicate matching the configured marker annotations.
    pub fn marker_predicate( &self ) -> MarkerPredicate {
        MarkerPredicate::prefix( self.marker_prefix.clone() )
    }

}

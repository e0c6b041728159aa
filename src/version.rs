//! Semantic version range matching.
//!
//! Dependencies declare one or more range expressions; all of them must accept a
//! candidate's version. Expressions use standard semver comparator syntax
//! (`>=1.2.0`, `<2`, `^1.4`, `~0.3.1`, `=1.0.0`, `1.*`, `>=1, <2`). Build metadata
//! never takes part in a comparison.

use semver::{ Version, VersionReq };
use thiserror::Error ;



/// A range expression that could not be parsed.
#[derive( Error, Debug, Clone, PartialEq, Eq )]
#[error( "Invalid version range '{expression}': {reason}" )]
pub struct VersionRangeError {
    /// The expression as written in the descriptor.
    pub expression: String,
    /// Parser diagnostic.
    pub reason: String,
}

/// A parsed range expression that still remembers how it was written.
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct VersionMatcher {
    expression: String,
    requirement: VersionReq,
}

impl VersionMatcher {

    /// Parses a range expression.
    ///
    /// # Errors
    /// Returns [`VersionRangeError`] if `expression` is not valid comparator syntax.
    pub fn parse( expression: impl Into<String> ) -> Result<Self, VersionRangeError> {
        let expression = expression.into();
        match VersionReq::parse( expression.trim() ) {
            Ok( requirement ) => Ok( Self { expression, requirement }),
            Err( err ) => Err( VersionRangeError { expression, reason: err.to_string() }),
        }
    }

    /// Whether `version` lies inside this range.
    pub fn matches( &self, version: &Version ) -> bool {
        if version.build.is_empty() { return self.requirement.matches( version ) }
        let mut stripped = version.clone();
        stripped.build = semver::BuildMetadata::EMPTY ;
        self.requirement.matches( &stripped )
    }

    /// The expression as originally written.
    #[inline] pub fn expression( &self ) -> &str { &self.expression }

}

impl std::fmt::Display for VersionMatcher {
    fn fmt( &self, f: &mut std::fmt::Formatter ) -> std::fmt::Result {
        f.write_str( &self.expression )
    }
}

/// Checks a single version against a single range expression.
///
/// ```
/// use mod_link::version::satisfies ;
/// use semver::Version ;
///
/// let version = Version::parse( "1.4.2+build.7" ).unwrap();
/// assert!( satisfies( &version, ">=1.0.0" ).unwrap() );
/// assert!( !satisfies( &version, "^2" ).unwrap() );
/// assert!( satisfies( &version, ">>1" ).is_err() );
/// ```
///
/// # Errors
/// Returns [`VersionRangeError`] for a malformed expression; it is never treated as satisfied.
pub fn satisfies( version: &Version, expression: &str ) -> Result<bool, VersionRangeError> {
    VersionMatcher::parse( expression ).map(| matcher | matcher.matches( version ))
}

use serde_json::Value ;

use crate::Side ;
use crate::version::VersionMatcher ;
use super::{ DescriptorError, ModuleDescriptor };



/// A declared dependency on another module.
///
/// All version matchers must accept a candidate for it to satisfy the dependency.
/// Optional dependencies never block resolution; they only order modules when
/// both ends are present.
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct Dependency {
    version_matchers: Vec<VersionMatcher>,
    required: bool,
    side: Side,
}

impl Dependency {

    pub fn new( version_matchers: impl IntoIterator<Item = VersionMatcher>, required: bool, side: Side ) -> Self {
        Self { version_matchers: version_matchers.into_iter().collect(), required, side }
    }

    #[inline] pub fn version_matchers( &self ) -> &[VersionMatcher] { &self.version_matchers }
    #[inline] pub fn is_required( &self ) -> bool { self.required }

    /// The environment in which this edge is considered at all.
    #[inline] pub fn side( &self ) -> Side { self.side }

    /// Whether `candidate` fulfils this dependency.
    pub fn satisfied_by( &self, candidate: &ModuleDescriptor ) -> bool {
        !self.required || self.version_matchers.iter().all(| matcher | matcher.matches( candidate.version() ))
    }

    /// The range expressions as they were written.
    pub fn expressions( &self ) -> Vec<String> {
        self.version_matchers.iter().map(| matcher | matcher.expression().to_string() ).collect()
    }

    /// Interprets one value of a descriptor's `dependencies` object.
    ///
    /// The full form is `{ "version": <range or [ranges]>, "required": bool, "side": side }`;
    /// a bare range string or array is accepted as a required, universal dependency.
    pub(super) fn from_value( module: &str, dependency: &str, value: Value ) -> Result<Self, DescriptorError> {

        let invalid = | field: &'static str, expected: &'static str | DescriptorError::InvalidDependencyField {
            module: module.to_string(),
            dependency: dependency.to_string(),
            field,
            expected,
        };

        let ( version, required, side ) = match value {
            Value::Object( mut object ) => {
                let required = match object.remove( "required" ) {
                    None | Some( Value::Null ) => true,
                    Some( Value::Bool( required )) => required,
                    Some( _ ) => return Err( invalid( "required", "a boolean" )),
                };
                let side = match object.remove( "side" ) {
                    None | Some( Value::Null ) => Side::default(),
                    Some( side ) => serde_json::from_value( side )
                        .map_err(| _ | invalid( "side", "one of \"client\", \"server\" or \"universal\"" ))?,
                };
                let version = match object.remove( "version" ) {
                    None | Some( Value::Null ) => return Err( DescriptorError::MissingDependencyVersion {
                        module: module.to_string(),
                        dependency: dependency.to_string(),
                    }),
                    Some( version ) => version,
                };
                ( version, required, side )
            },
            version @ ( Value::String( _ ) | Value::Array( _ )) => ( version, true, Side::default() ),
            _ => return Err( invalid( "the dependency", "an object, a string or an array" )),
        };

        let expressions = match version {
            Value::String( expression ) => vec![ expression ],
            Value::Array( values ) => values.into_iter()
                .map(| value | match value {
                    Value::String( expression ) => Ok( expression ),
                    _ => Err( invalid( "version", "a string or an array of strings" )),
                })
                .collect::<Result<Vec<_>, _>>()?,
            _ => return Err( invalid( "version", "a string or an array of strings" )),
        };

        let version_matchers = expressions.into_iter()
            .map(| expression | VersionMatcher::parse( expression ).map_err(| source | DescriptorError::InvalidVersionRange {
                module: module.to_string(),
                dependency: dependency.to_string(),
                source,
            }))
            .collect::<Result<Vec<_>, _>>()?;

        Ok( Self { version_matchers, required, side })

    }

}

//! Dependency resolution.
//!
//! Given every module that is meant to load together, [`resolve`] decides
//! whether the set is consistent and, if it is, in which order the modules have
//! to be loaded. Resolution never stops at the first problem: every duplicate id,
//! missing or unsatisfied dependency is reported in one pass so that all of them
//! can be fixed before the next run.
//!
//! ```
//! use mod_link::{ resolve, Config, ModuleDescriptor, ResolveError };
//!
//! let a = ModuleDescriptor::from_json( r#"{ "id": "a", "group": "g", "version": "1.0.0",
//! 	"dependencies": { "b": { "version": ">=2.0.0", "required": true }}}"# ).unwrap();
//! let b = ModuleDescriptor::from_json( r#"{ "id": "b", "group": "g", "version": "1.5.0" }"# ).unwrap();
//!
//! let errors = resolve([ a, b ], &Config::default() ).unwrap_err().into_iter().collect::<Vec<_>>();
//! assert_eq!( errors, vec![ ResolveError::UnsatisfiedDependency {
//! 	module: "a".to_string(),
//! 	dependency: "b".to_string(),
//! 	required: vec![ ">=2.0.0".to_string() ],
//! 	found: semver::Version::new( 1, 5, 0 ),
//! }]);
//! ```

use std::collections::BTreeMap ;
use nonempty_collections::NEVec ;
use pipe_trait::Pipe ;
use semver::Version ;
use thiserror::Error ;

use crate::{ Config, ModuleDescriptor, Side };

mod dependency_graph ;

use dependency_graph::DependencyGraph ;



/// A reason why a set of modules cannot be loaded together.
#[derive( Error, Debug, Clone, PartialEq, Eq )]
pub enum ResolveError {

    /// More than one descriptor claims the same id.
    #[error( "Duplicate module '{id}' provided {occurrences} times" )]
    DuplicateModule { id: String, occurrences: usize },

    /// A required dependency is not present at all.
    #[error( "Module '{module}' requires '{dependency}', which is missing" )]
    MissingDependency { module: String, dependency: String },

    /// A required dependency is present with a version outside the declared ranges.
    #[error( "Module '{module}' requires '{dependency}' matching [{}], found {found}", .required.join( ", " ))]
    UnsatisfiedDependency { module: String, dependency: String, required: Vec<String>, found: Version },

    /// A required dependency is present but restricted to a side that is not active.
    #[error( "Module '{module}' requires '{dependency}', which is {side}-only and cannot load on {environment}" )]
    SideMismatch { module: String, dependency: String, side: Side, environment: Side },

    /// Required dependencies form a cycle. Module ids are sorted.
    #[error( "Cyclic dependency between modules: {}", .modules.join( ", " ))]
    CyclicDependency { modules: Vec<String> },

}

/// A consistent set of modules in load order.
#[derive( Debug, Clone )]
pub struct Resolution {
    /// Dependencies always precede their dependents.
    pub load_order: Vec<ModuleDescriptor>,
    /// Modules skipped because their side does not apply to the active environment.
    pub excluded: Vec<ModuleDescriptor>,
}

impl Resolution {
    /// Ids of [`Self::load_order`], in order.
    pub fn ids( &self ) -> Vec<&str> {
        self.load_order.iter().map( ModuleDescriptor::id ).collect()
    }
}

/// Resolves `descriptors` for the environment in `config`.
///
/// The load order is deterministic: modules without an ordering constraint
/// between them load by ascending id, regardless of input order.
///
/// # Errors
/// Returns every [`ResolveError`] found. Cycles are only looked for once the
/// set is otherwise consistent.
pub fn resolve(
    descriptors: impl IntoIterator<Item = ModuleDescriptor>,
    config: &Config,
) -> Result<Resolution, NEVec<ResolveError>> {

    let environment = config.side ;
    let ( modules, duplicate_errors ) = index_modules( descriptors );

    let ( loadable, excluded ) = modules.into_iter()
        .partition::<BTreeMap<_, _>, _>(|( _, module )| module.side().applies_to( environment ));
    excluded.values().for_each(| module | tracing::debug!( "Skipping {} ({}-only) on {}", module, module.side(), environment ));

    let dependency_errors = loadable.values()
        .flat_map(| module | check_dependencies( module, &loadable, &excluded, environment ));

    if let Some( errors ) = duplicate_errors.into_iter().chain( dependency_errors ).collect::<Vec<_>>().pipe( NEVec::try_from_vec ) {
        return Err( errors );
    }

    let order = DependencyGraph::new( &loadable, environment ).load_order()?
        .into_iter()
        .map( str::to_string )
        .collect::<Vec<_>>();

    let mut loadable = loadable ;
    let load_order = order.iter()
        .filter_map(| id | loadable.remove( id ))
        .collect::<Vec<_>>();

    tracing::info!( "Resolved {} module(s), {} excluded on {}", load_order.len(), excluded.len(), environment );
    Ok( Resolution { load_order, excluded: excluded.into_values().collect() })

}

/// Indexes by id, last one wins. Every colliding id is reported once.
fn index_modules(
    descriptors: impl IntoIterator<Item = ModuleDescriptor>,
) -> ( BTreeMap<String, ModuleDescriptor>, Vec<ResolveError> ) {

    let mut occurrences = BTreeMap::<String, usize>::new();
    let modules = descriptors.into_iter()
        .inspect(| module | *occurrences.entry( module.id().to_string() ).or_default() += 1 )
        .map(| module | ( module.id().to_string(), module ))
        .collect::<BTreeMap<_, _>>();

    let errors = occurrences.into_iter()
        .filter(|( _, count )| *count > 1 )
        .map(|( id, occurrences )| ResolveError::DuplicateModule { id, occurrences })
        .collect();

    ( modules, errors )

}

fn check_dependencies(
    module: &ModuleDescriptor,
    loadable: &BTreeMap<String, ModuleDescriptor>,
    excluded: &BTreeMap<String, ModuleDescriptor>,
    environment: Side,
) -> Vec<ResolveError> {
    module.dependencies().iter()
        .filter(|( _, dependency )| dependency.is_required() && dependency.side().applies_to( environment ))
        .filter_map(|( dependency_id, dependency )| match ( loadable.get( dependency_id ), excluded.get( dependency_id )) {
            ( Some( target ), _ ) if dependency.satisfied_by( target ) => None,
            ( Some( target ), _ ) => Some( ResolveError::UnsatisfiedDependency {
                module: module.id().to_string(),
                dependency: dependency_id.clone(),
                required: dependency.expressions(),
                found: target.version().clone(),
            }),
            ( None, Some( target )) => Some( ResolveError::SideMismatch {
                module: module.id().to_string(),
                dependency: dependency_id.clone(),
                side: target.side(),
                environment,
            }),
            ( None, None ) => Some( ResolveError::MissingDependency {
                module: module.id().to_string(),
                dependency: dependency_id.clone(),
            }),
        })
        .collect()
}

//! Removal of bookkeeping annotations from transformed classes.
//!
//! Transformers tag the members they inject with marker annotations from a
//! reserved namespace. Those markers are internal to the transformation and
//! must not survive into the written archive, so every class a transformer
//! changed goes through [`strip`] before it is serialized.
//!
//! Stripping only ever removes: retained annotations, fields, methods and
//! attributes keep their order and bytes. Annotation attributes left empty
//! are dropped, and constants that only the removed annotations used are
//! popped off the end of the constant pool. Entries in the middle of the
//! pool are left alone so that no index held by code or an opaque attribute
//! ever moves.

use std::collections::BTreeSet ;
use tracing::debug ;

use crate::class_file::{ Annotation, ClassUnit, Scope, RUNTIME_VISIBLE_ANNOTATIONS, RUNTIME_INVISIBLE_ANNOTATIONS };



/// Matches annotation type descriptors by namespace prefix.
///
/// ```
/// use mod_link::stripper::MarkerPredicate ;
///
/// let predicate = MarkerPredicate::prefix( "Lcom/example/meta" );
/// assert!( predicate.matches( "Lcom/example/meta/Injected;" ));
/// assert!( !predicate.matches( "Ljava/lang/Deprecated;" ));
/// ```
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct MarkerPredicate {
    prefix: String,
}

impl MarkerPredicate {

    pub fn prefix( prefix: impl Into<String> ) -> Self { Self { prefix: prefix.into() }}

    #[inline] pub fn namespace( &self ) -> &str { &self.prefix }

    #[inline] pub fn matches( &self, descriptor: &str ) -> bool { descriptor.starts_with( &self.prefix ) }

}

/// Removes every marker annotation from the class and from each of its fields
/// and methods.
pub fn strip( unit: ClassUnit, predicate: &MarkerPredicate ) -> ClassUnit {
    strip_matching( unit, | descriptor | predicate.matches( descriptor ))
}

/// [`strip`] with an arbitrary predicate over annotation type descriptors.
pub fn strip_matching<P>( mut unit: ClassUnit, predicate: P ) -> ClassUnit
where
    P: Fn( &str ) -> bool,
{

    let scopes = std::iter::once( Scope::Class )
        .chain(( 0..unit.fields().len() ).map( Scope::Field ))
        .chain(( 0..unit.methods().len() ).map( Scope::Method ))
        .collect::<Vec<_>>();

    let removed = scopes.into_iter()
        .flat_map(| scope | unit.remove_annotations_matching( scope, &predicate ))
        .collect::<Vec<_>>();

    if removed.is_empty() { return unit }

    let candidates = removed.iter()
        .flat_map( Annotation::constant_references )
        .chain([ RUNTIME_VISIBLE_ANNOTATIONS, RUNTIME_INVISIBLE_ANNOTATIONS ].into_iter()
            .filter_map(| name | unit.constant_pool().find_utf8( name )))
        .collect::<BTreeSet<_>>();
    let popped = unit.pop_unused_constants( &candidates );

    debug!(
        class = unit.class_name().as_deref().unwrap_or( "<unnamed>" ),
        annotations = removed.len(),
        constants = popped,
        "Stripped marker annotations",
    );
    unit

}

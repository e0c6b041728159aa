use std::collections::{ BTreeMap, BTreeSet };
use nonempty_collections::NEVec ;

use crate::{ ModuleDescriptor, Side };
use super::ResolveError ;



/// Dependency edges between the loadable modules of one resolution run.
///
/// Hard edges come from required dependencies and must be honoured. Soft edges
/// come from optional dependencies whose target is present; they order modules
/// when possible and are dropped when they would close a cycle.
pub(super) struct DependencyGraph<'a> {
    /// module -> modules it needs loaded first
    hard: BTreeMap<&'a str, BTreeSet<&'a str>>,
    soft: BTreeMap<&'a str, BTreeSet<&'a str>>,
}

impl<'a> DependencyGraph<'a> {

    pub(super) fn new( modules: &'a BTreeMap<String, ModuleDescriptor>, environment: Side ) -> Self {

        let mut hard = BTreeMap::<&str, BTreeSet<&str>>::new();
        let mut soft = BTreeMap::<&str, BTreeSet<&str>>::new();

        for ( id, module ) in modules {
            let hard_edges = hard.entry( id.as_str() ).or_default();
            let soft_edges = soft.entry( id.as_str() ).or_default();
            module.dependencies().iter()
                .filter(|( _, dependency )| dependency.side().applies_to( environment ))
                .filter_map(|( dependency_id, dependency )| modules.get_key_value( dependency_id )
                    .map(|( target, _ )| ( target.as_str(), dependency.is_required() )))
                .for_each(|( target, required )| match required {
                    true => { hard_edges.insert( target ); },
                    // Optional self references carry no ordering information.
                    false if target != id.as_str() => { soft_edges.insert( target ); },
                    false => {},
                });
        }

        Self { hard, soft }

    }

    /// Every strongly connected set of modules tied together by hard edges,
    /// including modules that require themselves.
    pub(super) fn cycles( &self ) -> Vec<Vec<&'a str>> {
        let mut tarjan = Tarjan::new( &self.hard );
        self.hard.keys().for_each(| node | if !tarjan.indices.contains_key( node ) { tarjan.connect( *node ) });
        let mut cycles = tarjan.components.into_iter()
            .filter(| component | component.len() > 1 || self.hard[ component[ 0 ]].contains( component[ 0 ]))
            .map(| mut component | { component.sort_unstable(); component })
            .collect::<Vec<_>>();
        cycles.sort();
        cycles
    }

    /// Topological order, dependencies first, ties broken by ascending id.
    pub(super) fn load_order( &self ) -> Result<Vec<&'a str>, NEVec<ResolveError>> {

        let cycles = self.cycles().into_iter()
            .map(| modules | ResolveError::CyclicDependency { modules: modules.into_iter().map( str::to_string ).collect() })
            .collect::<Vec<_>>();
        if let Some( errors ) = NEVec::try_from_vec( cycles ) { return Err( errors ) }

        let mut hard_pending = self.hard.iter().map(|( id, edges )| ( *id, edges.len() )).collect::<BTreeMap<_, _>>();
        let mut soft_pending = self.soft.iter().map(|( id, edges )| ( *id, edges.len() )).collect::<BTreeMap<_, _>>();
        let hard_dependents = reverse( &self.hard );
        let soft_dependents = reverse( &self.soft );

        let mut remaining = self.hard.keys().copied().collect::<BTreeSet<_>>();
        let mut ready = remaining.iter()
            .copied()
            .filter(| id | hard_pending[ id ] == 0 && soft_pending[ id ] == 0 )
            .collect::<BTreeSet<_>>();
        let mut order = Vec::with_capacity( remaining.len() );

        while !remaining.is_empty() {

            let next = match ready.pop_first() {
                Some( next ) => next,
                // Only soft edges hold the rest back.
                None => match self.relaxation_candidate( &remaining, &hard_pending ) {
                    Some( next ) => {
                        tracing::debug!( "Ignoring optional ordering constraints of '{}' to break a cycle", next );
                        next
                    },
                    None => break,
                },
            };

            remaining.remove( next );
            order.push( next );

            for dependent in hard_dependents.get( next ).into_iter().flatten() {
                if let Some( count ) = hard_pending.get_mut( dependent ) { *count = count.saturating_sub( 1 ) }
            }
            for dependent in soft_dependents.get( next ).into_iter().flatten() {
                if let Some( count ) = soft_pending.get_mut( dependent ) { *count = count.saturating_sub( 1 ) }
            }
            hard_dependents.get( next ).into_iter().flatten()
                .chain( soft_dependents.get( next ).into_iter().flatten() )
                .filter(| dependent | remaining.contains( *dependent ))
                .filter(| dependent | hard_pending[ *dependent ] == 0 && soft_pending[ *dependent ] == 0 )
                .for_each(| dependent | { ready.insert( *dependent ); });

        }

        match NEVec::try_from_vec( remaining.into_iter().collect::<Vec<_>>() ) {
            None => Ok( order ),
            Some( stuck ) => Err( NEVec::new( ResolveError::CyclicDependency {
                modules: stuck.into_iter().map( str::to_string ).collect(),
            })),
        }

    }

    /// The lowest id without pending hard edges in a strongly connected set of
    /// the remaining modules that nothing outside the set holds back.
    fn relaxation_candidate( &self, remaining: &BTreeSet<&'a str>, hard_pending: &BTreeMap<&'a str, usize> ) -> Option<&'a str> {

        let pending = remaining.iter()
            .map(| id | ( *id, self.hard[ id ].iter().chain( &self.soft[ id ])
                .copied()
                .filter(| dependency | remaining.contains( dependency ))
                .collect::<BTreeSet<_>>() ))
            .collect::<BTreeMap<_, _>>();

        let mut tarjan = Tarjan::new( &pending );
        let start = *remaining.first()?;
        tarjan.connect( start );
        tarjan.components.into_iter().next()?
            .into_iter()
            .filter(| id | hard_pending[ id ] == 0 )
            .min()

    }

}

fn reverse<'a>( edges: &BTreeMap<&'a str, BTreeSet<&'a str>> ) -> BTreeMap<&'a str, Vec<&'a str>> {
    let mut reversed = BTreeMap::<&str, Vec<&str>>::new();
    for ( dependent, dependencies ) in edges {
        for dependency in dependencies {
            reversed.entry( *dependency ).or_default().push( *dependent );
        }
    }
    reversed
}

/// Tarjan's strongly connected components over the hard edges.
struct Tarjan<'g, 'a> {
    graph: &'g BTreeMap<&'a str, BTreeSet<&'a str>>,
    index: usize,
    indices: BTreeMap<&'a str, usize>,
    low_links: BTreeMap<&'a str, usize>,
    stack: Vec<&'a str>,
    on_stack: BTreeSet<&'a str>,
    components: Vec<Vec<&'a str>>,
}

impl<'g, 'a> Tarjan<'g, 'a> {

    fn new( graph: &'g BTreeMap<&'a str, BTreeSet<&'a str>> ) -> Self {
        Self {
            graph,
            index: 0,
            indices: BTreeMap::new(),
            low_links: BTreeMap::new(),
            stack: Vec::new(),
            on_stack: BTreeSet::new(),
            components: Vec::new(),
        }
    }

    /// Visits every node reachable from `root`. The walk keeps its own stack
    /// of frames, so arbitrarily long dependency chains are fine.
    fn connect( &mut self, root: &'a str ) {

        let graph = self.graph ;
        let successors = | node: &'a str | graph.get( node ).map( BTreeSet::iter ).into_iter().flatten().copied();

        self.enter( root );
        let mut frames = vec![( root, successors( root ))];

        while let Some(( node, pending )) = frames.last_mut() {
            let node = *node ;
            match pending.next() {
                Some( successor ) if !self.indices.contains_key( successor ) => {
                    self.enter( successor );
                    frames.push(( successor, successors( successor )));
                },
                Some( successor ) => if self.on_stack.contains( successor ) {
                    self.lower( node, self.indices[ successor ]);
                },
                None => {
                    frames.pop();
                    self.close( node );
                    if let Some(( parent, _ )) = frames.last() {
                        self.lower( *parent, self.low_links[ node ]);
                    }
                },
            }
        }

    }

    fn enter( &mut self, node: &'a str ) {
        self.indices.insert( node, self.index );
        self.low_links.insert( node, self.index );
        self.index += 1 ;
        self.stack.push( node );
        self.on_stack.insert( node );
    }

    fn lower( &mut self, node: &'a str, low: usize ) {
        if let Some( current ) = self.low_links.get_mut( node ) { *current = ( *current ).min( low ) }
    }

    /// Emits the component rooted at `node` once all of its successors are done.
    fn close( &mut self, node: &'a str ) {
        if self.low_links[ node ] != self.indices[ node ] { return }
        let mut component = Vec::new();
        while let Some( member ) = self.stack.pop() {
            self.on_stack.remove( member );
            component.push( member );
            if member == node { break }
        }
        self.components.push( component );
    }

}

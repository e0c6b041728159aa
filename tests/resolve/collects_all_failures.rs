use mod_link::{ resolve, Config, ResolveError };

fixtures! {
    modules = [ "app", "core", "render", "render-fork" ];
}

#[test]
fn resolve_collects_all_failures() {

    let errors = match resolve( fixtures::modules(), &Config::default() ) {
        Err( errors ) => errors.into_iter().collect::<Vec<_>>(),
        Ok( resolution ) => panic!( "Expected failure, resolved {:?}", resolution.ids() ),
    };

    assert_eq!( errors.len(), 3, "{:?}", errors );
    assert!( errors.contains( &ResolveError::DuplicateModule { id: "render".to_string(), occurrences: 2 }));
    assert!( errors.contains( &ResolveError::MissingDependency { module: "app".to_string(), dependency: "gone".to_string() }));
    assert!( errors.iter().any(| err | matches!( err,
        ResolveError::UnsatisfiedDependency { module, dependency, required, .. }
            if module == "app" && dependency == "core" && required == &[ ">=2.0.0", "<3.0.0" ]
    )));

}

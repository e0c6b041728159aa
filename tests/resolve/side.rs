use mod_link::{ resolve, Config, ResolveError, Side };

fixtures! {
    modules = [ "shaders", "minimap", "hud", "chunkgen" ];
}

fn config( side: Side ) -> Config {
    Config { side, ..Config::default() }
}

#[test]
fn resolve_side_excludes_other_environment() {

    let modules = fixtures::modules().into_iter().filter(| module | module.id() != "hud" );
    let resolution = match resolve( modules, &config( Side::Server )) {
        Ok( resolution ) => resolution,
        Err( errors ) => panic!( "Unexpected errors: {:?}", errors ),
    };

    assert_eq!( resolution.ids(), vec![ "chunkgen", "minimap" ]);
    assert_eq!( resolution.excluded.iter().map(| module | module.id() ).collect::<Vec<_>>(), vec![ "shaders" ]);

}

#[test]
fn resolve_side_mismatch_on_required_edge() {
    match resolve( fixtures::modules(), &config( Side::Server )) {
        Err( errors ) => assert_eq!( errors.into_iter().collect::<Vec<_>>(), vec![ ResolveError::SideMismatch {
            module: "hud".to_string(),
            dependency: "shaders".to_string(),
            side: Side::Client,
            environment: Side::Server,
        }]),
        Ok( resolution ) => panic!( "Expected failure, resolved {:?}", resolution.ids() ),
    }
}

#[test]
fn resolve_side_universal_loads_everything() {
    let resolution = resolve( fixtures::modules(), &config( Side::Universal )).unwrap();
    assert_eq!( resolution.ids(), vec![ "chunkgen", "shaders", "hud", "minimap" ]);
    assert!( resolution.excluded.is_empty() );
}

#[test]
fn resolve_side_client_orders_client_edges() {
    let resolution = resolve( fixtures::modules(), &config( Side::Client )).unwrap();
    assert_eq!( resolution.ids(), vec![ "shaders", "hud", "minimap" ]);
}

use mod_link::{ DescriptorError, ModuleDescriptor, Side, Version };

fn parse_dependency( dependency: &str ) -> Result<ModuleDescriptor, DescriptorError> {
    ModuleDescriptor::from_json( &format!(
        r#"{{ "id": "a", "group": "g", "version": "1.0.0", "dependencies": {{ "b": {} }}}}"#,
        dependency,
    ))
}

#[test]
fn dependency_version_string_or_list() {

    let single = parse_dependency( r#"{ "version": ">=1.2.0" }"# ).unwrap();
    let list = parse_dependency( r#"{ "version": [ ">=1.2.0", "<2.0.0" ] }"# ).unwrap();
    let bare = parse_dependency( r#"[ ">=1.2.0", "<2.0.0" ]"# ).unwrap();

    assert_eq!( single.dependencies()[ "b" ].expressions(), vec![ ">=1.2.0" ]);
    assert_eq!( list.dependencies()[ "b" ].expressions(), vec![ ">=1.2.0", "<2.0.0" ]);
    assert_eq!( bare.dependencies()[ "b" ].expressions(), list.dependencies()[ "b" ].expressions() );
    assert!( list.dependencies()[ "b" ].is_required() );
    assert_eq!( list.dependencies()[ "b" ].side(), Side::Universal );

}

#[test]
fn dependency_all_matchers_must_hold() {

    let dependent = parse_dependency( r#"{ "version": [ ">=1.2.0", "<2.0.0" ] }"# ).unwrap();
    let dependency = &dependent.dependencies()[ "b" ];
    let candidate = | version: &str | ModuleDescriptor::from_json( &format!(
        r#"{{ "id": "b", "group": "g", "version": "{}" }}"#, version,
    )).unwrap();

    assert!( dependency.satisfied_by( &candidate( "1.5.0" )));
    assert!( dependency.satisfied_by( &candidate( "1.2.0+build.9" )));
    assert!( !dependency.satisfied_by( &candidate( "2.0.0" )));
    assert!( !dependency.satisfied_by( &candidate( "1.1.9" )));

}

#[test]
fn dependency_optional_always_satisfied() {
    let dependent = parse_dependency( r#"{ "version": ">=9.0.0", "required": false, "side": "server" }"# ).unwrap();
    let dependency = &dependent.dependencies()[ "b" ];
    let candidate = ModuleDescriptor::from_json( r#"{ "id": "b", "group": "g", "version": "0.0.1" }"# ).unwrap();
    assert!( !dependency.is_required() );
    assert_eq!( dependency.side(), Side::Server );
    assert!( dependency.satisfied_by( &candidate ));
    assert_eq!( candidate.version(), &Version::new( 0, 0, 1 ));
}

#[test]
fn dependency_invalid_forms() {

    match parse_dependency( r#"{ "required": true }"# ) {
        Err( DescriptorError::MissingDependencyVersion { module, dependency }) => assert_eq!(( module.as_str(), dependency.as_str() ), ( "a", "b" )),
        other => panic!( "Expected a missing version, got {:?}", other ),
    }

    match parse_dependency( r#"{ "version": "*", "required": "yes" }"# ) {
        Err( DescriptorError::InvalidDependencyField { field: "required", .. }) => {},
        other => panic!( "Expected an invalid 'required', got {:?}", other ),
    }

    match parse_dependency( r#"{ "version": "*", "side": "both" }"# ) {
        Err( DescriptorError::InvalidDependencyField { field: "side", .. }) => {},
        other => panic!( "Expected an invalid 'side', got {:?}", other ),
    }

    match parse_dependency( r#"{ "version": [ ">=1.0.0", 2 ] }"# ) {
        Err( DescriptorError::InvalidDependencyField { field: "version", .. }) => {},
        other => panic!( "Expected an invalid 'version', got {:?}", other ),
    }

}

#[test]
fn dependency_malformed_range_is_never_satisfied() {
    match parse_dependency( r#"{ "version": ">=banana" }"# ) {
        Err( DescriptorError::InvalidVersionRange { source, .. }) => assert_eq!( source.expression, ">=banana" ),
        other => panic!( "Expected an invalid range, got {:?}", other ),
    }
}

use mod_link::{ DescriptorError, ModuleDescriptor, Side };
use mod_link::descriptor::DEFAULT_LANGUAGE_ADAPTER ;

#[test]
fn descriptor_missing_required_fields() {
    for ( document, field ) in [
        ( r#"{ "group": "g", "version": "1.0.0" }"#, "id" ),
        ( r#"{ "id": "a", "version": "1.0.0" }"#, "group" ),
        ( r#"{ "id": "a", "group": "g" }"#, "version" ),
        ( r#"{ "id": "", "group": "g", "version": "1.0.0" }"#, "id" ),
    ] {
        match ModuleDescriptor::from_json( document ) {
            Err( DescriptorError::MissingField( missing )) => assert_eq!( missing, field ),
            Err( err ) => panic!( "Unexpected error for {}: {}", document, err ),
            Ok( descriptor ) => panic!( "Expected failure, parsed {}", descriptor ),
        }
    }
}

#[test]
fn descriptor_required_fields_of_wrong_type() {
    for ( document, field ) in [
        ( r#"{ "id": 7, "group": "g", "version": "1.0.0" }"#, "id" ),
        ( r#"{ "id": "a", "group": [ "g" ], "version": "1.0.0" }"#, "group" ),
        ( r#"{ "id": "a", "group": "g", "version": null }"#, "version" ),
    ] {
        match ModuleDescriptor::from_json( document ) {
            Err( DescriptorError::MissingField( missing )) => assert_eq!( missing, field ),
            Err( err ) => panic!( "Unexpected error for {}: {}", document, err ),
            Ok( descriptor ) => panic!( "Expected failure, parsed {}", descriptor ),
        }
    }
}

#[test]
fn descriptor_numeric_version() {
    match ModuleDescriptor::from_json( r#"{ "id": "a", "group": "g", "version": 1 }"# ) {
        Err( DescriptorError::InvalidVersion { module, version, reason }) => {
            assert_eq!( module, "a" );
            assert_eq!( version, "1" );
            assert_eq!( reason, "expected a string" );
        },
        Err( err ) => panic!( "Unexpected error: {}", err ),
        Ok( descriptor ) => panic!( "Expected failure, parsed {}", descriptor ),
    }
}

#[test]
fn descriptor_invalid_version() {
    match ModuleDescriptor::from_json( r#"{ "id": "a", "group": "g", "version": "one point oh" }"# ) {
        Err( DescriptorError::InvalidVersion { module, version, .. }) => {
            assert_eq!( module, "a" );
            assert_eq!( version, "one point oh" );
        },
        Err( err ) => panic!( "Unexpected error: {}", err ),
        Ok( descriptor ) => panic!( "Expected failure, parsed {}", descriptor ),
    }
}

#[test]
fn descriptor_not_json() {
    match ModuleDescriptor::from_json( "{ id: a" ) {
        Err( DescriptorError::Syntax( _ )) => {},
        Err( err ) => panic!( "Unexpected error: {}", err ),
        Ok( descriptor ) => panic!( "Expected failure, parsed {}", descriptor ),
    }
}

#[test]
fn descriptor_defaults() {

    let descriptor = ModuleDescriptor::from_json( r#"{ "id": "a", "group": "g", "version": "1.0.0" }"# ).unwrap();

    assert_eq!( descriptor.side(), Side::Universal );
    assert!( !descriptor.is_lazily_loaded() );
    assert_eq!( descriptor.language_adapter(), DEFAULT_LANGUAGE_ADAPTER );
    assert_eq!( descriptor.mod_class(), "" );
    assert_eq!( descriptor.title(), "" );
    assert_eq!( descriptor.links().homepage(), "" );
    assert!( descriptor.authors().is_empty() );
    assert!( descriptor.contributors().is_empty() );
    assert!( descriptor.dependencies().is_empty() );
    assert_eq!( descriptor.to_string(), "g:a@1.0.0" );

}

#[test]
fn descriptor_full() {

    let descriptor = ModuleDescriptor::from_json( r#"{
        "id": "tweaks",
        "group": "net.example",
        "version": "2.3.1-beta.2+build.7",
        "side": "client",
        "lazilyLoaded": true,
        "modClass": "net.example.tweaks.Tweaks",
        "languageAdapter": "net.example.KotlinAdapter",
        "title": "Tweaks",
        "description": "Small tweaks",
        "license": "MIT",
        "links": { "homepage": "https://example.net", "issues": "https://example.net/issues" },
        "authors": [ { "name": "Jane Doe", "website": "https://jane.example" } ],
        "contributors": [ "Sam <sam@example.net>" ]
    }"# ).unwrap();

    assert_eq!( descriptor.version().to_string(), "2.3.1-beta.2+build.7" );
    assert_eq!( descriptor.side(), Side::Client );
    assert!( descriptor.is_lazily_loaded() );
    assert_eq!( descriptor.mod_class(), "net.example.tweaks.Tweaks" );
    assert_eq!( descriptor.language_adapter(), "net.example.KotlinAdapter" );
    assert_eq!( descriptor.links().issues(), "https://example.net/issues" );
    assert_eq!( descriptor.links().sources(), "" );
    assert_eq!( descriptor.authors()[ 0 ].website(), "https://jane.example" );
    assert_eq!( descriptor.authors()[ 0 ].email(), "" );
    assert_eq!( descriptor.contributors()[ 0 ].name(), "Sam" );
    assert_eq!( descriptor.contributors()[ 0 ].email(), "sam@example.net" );

}

#[test]
fn descriptor_document_keeps_valid_entries() {
    let results = ModuleDescriptor::parse_document( r#"[
        { "id": "a", "group": "g", "version": "1.0.0" },
        { "id": "b", "group": "g" },
        { "id": "c", "group": "g", "version": "0.1.0" }
    ]"# );
    assert_eq!( results.len(), 3 );
    assert!( matches!( results[ 1 ], Err( DescriptorError::MissingField( "version" ))));
    assert_eq!( results.iter().flatten().map( ModuleDescriptor::id ).collect::<Vec<_>>(), vec![ "a", "c" ]);
}

use mod_link::Person ;

#[test]
fn person_shorthand_full() {
    assert_eq!(
        Person::parse_shorthand( "Jane Doe <jane@example.com> (https://example.com)" ),
        Person::new( "Jane Doe", "jane@example.com", "https://example.com" ),
    );
}

#[test]
fn person_shorthand_partial() {
    for ( text, expected ) in [
        ( "Jane Doe", Person::new( "Jane Doe", "", "" )),
        ( "Jane Doe <jane@example.com>", Person::new( "Jane Doe", "jane@example.com", "" )),
        ( "Jane   Doe   (https://example.com)", Person::new( "Jane Doe", "", "https://example.com" )),
        ( "<jane@example.com>", Person::new( "", "jane@example.com", "" )),
        ( "", Person::new( "", "", "" )),
    ] {
        assert_eq!( Person::parse_shorthand( text ), expected, "parsing {:?}", text );
    }
}

#[test]
fn person_shorthand_in_descriptor() {
    let descriptor = mod_link::ModuleDescriptor::from_json( r#"{
        "id": "a", "group": "g", "version": "1.0.0",
        "authors": [ "Jane Doe <jane@example.com> (https://example.com)", { "name": "Sam" } ]
    }"# ).unwrap();
    assert_eq!( descriptor.authors(), &[
        Person::new( "Jane Doe", "jane@example.com", "https://example.com" ),
        Person::new( "Sam", "", "" ),
    ]);
}

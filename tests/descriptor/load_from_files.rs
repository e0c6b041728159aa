use std::io::Write ;
use mod_link::{ load_descriptors, resolve, Config };
use mod_link::descriptor::{ LoadDescriptorError, DESCRIPTOR_ENTRY };

fixtures! {
    modules = [ "core" ];
}

fn write_jar( path: &std::path::Path, entries: &[( &str, &str )] ) {
    let mut writer = zip::ZipWriter::new( std::fs::File::create( path ).unwrap() );
    for ( name, text ) in entries {
        writer.start_file( *name, zip::write::SimpleFileOptions::default() ).unwrap();
        writer.write_all( text.as_bytes() ).unwrap();
    }
    writer.finish().unwrap();
}

#[test]
fn load_descriptors_from_json_and_jars() {

    let dir = tempfile::tempdir().unwrap();
    let jar = dir.path().join( "audio.jar" );
    write_jar( &jar, &[
        ( "net/example/audio/Audio.class", "not really a class" ),
        ( DESCRIPTOR_ENTRY, r#"{ "id": "audio", "group": "net.example", "version": "3.0.0" }"# ),
    ]);

    let ( descriptors, errors ) = load_descriptors([ fixtures::path( "core" ), fixtures::path( "bundle" ), jar ]);

    assert_eq!( descriptors.iter().map(| module | module.id() ).collect::<Vec<_>>(), vec![ "core", "render", "audio" ]);
    match errors.as_slice() {
        [ LoadDescriptorError::Malformed( path, _ )] => assert!( path.ends_with( "bundle.json" )),
        other => panic!( "Unexpected errors: {:?}", other ),
    }

    let resolution = resolve( descriptors, &Config::default() ).unwrap();
    assert_eq!( resolution.ids(), vec![ "audio", "core", "render" ]);

}

#[test]
fn load_descriptors_reports_unreadable_files() {

    let dir = tempfile::tempdir().unwrap();
    let empty_jar = dir.path().join( "empty.jar" );
    write_jar( &empty_jar, &[( "readme.txt", "nothing here" )]);
    let not_a_jar = dir.path().join( "plain.jar" );
    std::fs::write( &not_a_jar, b"PK but not quite" ).unwrap();
    let missing = dir.path().join( "missing.json" );

    let ( descriptors, errors ) = load_descriptors([ fixtures::path( "garbage" ), empty_jar, not_a_jar, missing ]);

    assert!( descriptors.is_empty() );
    assert!( matches!( errors.as_slice(), [
        LoadDescriptorError::Malformed( _, mod_link::DescriptorError::Syntax( _ )),
        LoadDescriptorError::MissingDescriptor( _ ),
        LoadDescriptorError::Archive( _, _ ),
        LoadDescriptorError::Io( _, _ ),
    ]), "{:?}", errors );

}

#[test]
fn load_descriptors_fixture_matches_loader() {
    let ( loaded, errors ) = load_descriptors([ fixtures::path( "core" )]);
    assert_no_failures!( errors );
    assert_eq!( loaded[ 0 ].to_string(), fixtures::modules()[ 0 ].to_string() );
}

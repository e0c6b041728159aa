use mod_link::class_file::{ ClassUnit, Constant, Visibility };
use mod_link::stripper::{ self, MarkerPredicate };
use mod_link::config::DEFAULT_MARKER_PREFIX ;
use crate::bake::{ self, MARKER };
use crate::class_builder::{ self, ClassBuilder, ACC_PUBLIC };

fn strip_markers( bytes: &[u8] ) -> Vec<u8> {
    let unit = ClassUnit::parse( bytes ).unwrap();
    stripper::strip( unit, &MarkerPredicate::prefix( DEFAULT_MARKER_PREFIX )).to_bytes()
}

fn plain() -> Vec<u8> {
    let mut builder = ClassBuilder::new( "com/example/Plain" );
    let code = builder.code( &[ 0xB1 ]);
    builder.method( ACC_PUBLIC, "run", "()V", vec![ code ]);
    builder.build()
}

#[test]
fn marker_injection_strips_to_unmarked_bytes() {
    for base in [ class_builder::widget(), plain() ] {
        for visibility in [ Visibility::Visible, Visibility::Invisible ] {

            let tagged = bake::inject_method( base.clone(), Some( visibility ));
            let untagged = bake::inject_method( base.clone(), None );
            assert_ne!( tagged, untagged );

            assert_eq!( strip_markers( &tagged ), untagged, "{:?}", visibility );

        }
    }
}

#[test]
fn marker_injection_with_numeric_elements() {
    for base in [ class_builder::widget(), plain() ] {
        for visibility in [ Visibility::Visible, Visibility::Invisible ] {

            let elements = vec![
                ( "priority", Constant::Integer( 1000 )),
                ( "stamp", Constant::Long( 7 )),
                ( "weight", Constant::Float( 0x3F80_0000 )),
            ];
            let tagged = bake::inject_method_with( base.clone(), visibility, elements );
            let untagged = bake::inject_method( base.clone(), None );

            assert_eq!( strip_markers( &tagged ), untagged, "{:?}", visibility );

        }
    }
}

#[test]
fn marker_injection_ending_in_wide_constant() {
    let tagged = bake::inject_method_with( plain(), Visibility::Visible, vec![( "stamp", Constant::Double( 0x4000_0000_0000_0000 ))]);
    assert_eq!( strip_markers( &tagged ), bake::inject_method( plain(), None ));
}

#[test]
fn marker_injection_leaves_untagged_class_alone() {
    let untagged = bake::inject_method( class_builder::widget(), None );
    assert_eq!( strip_markers( &untagged ), untagged );
}

#[test]
fn marker_injection_on_class_scope() {
    let tagged = bake::tag_class( plain() );
    assert!( ClassUnit::parse( &tagged ).unwrap().constant_pool().find_utf8( MARKER ).is_some() );

    let stripped = strip_markers( &tagged );
    assert_eq!( stripped, plain() );
    assert!( ClassUnit::parse( &stripped ).unwrap().constant_pool().find_utf8( MARKER ).is_none() );
}

#[test]
fn marker_injection_keeps_constants_still_in_use() {

    // The marker descriptor is also used by a field, so it must stay in the pool.
    let mut builder = ClassBuilder::new( "com/example/Shared" );
    builder.field( ACC_PUBLIC, "tag", MARKER, Vec::new() );
    let base = builder.build();

    let tagged = bake::inject_method( base.clone(), Some( Visibility::Visible ));
    let stripped = ClassUnit::parse( &strip_markers( &tagged )).unwrap();

    assert!( stripped.constant_pool().find_utf8( MARKER ).is_some() );
    assert_eq!( stripped.fields()[ 0 ].descriptor( stripped.constant_pool() ).as_deref(), Some( MARKER ));
    assert!( stripped.methods().iter().all(| method | method.annotations().next().is_none() ));

}

use mod_link::class_file::{ ClassUnit, Visibility };
use mod_link::stripper::{ self, MarkerPredicate };
use crate::bake ;
use crate::class_builder ;

#[test]
fn idempotence_for_any_predicate() {

    let samples = [
        class_builder::widget(),
        bake::inject_method( class_builder::widget(), Some( Visibility::Visible )),
        bake::inject_method( class_builder::widget(), Some( Visibility::Invisible )),
        bake::tag_class( class_builder::widget() ),
    ];
    let predicates: [ &dyn Fn( &str ) -> bool ; 5 ] = [
        &| _ | true,
        &| _ | false,
        &| descriptor | descriptor.starts_with( "Lcom/example/" ),
        &| descriptor | descriptor == "Lcom/example/Rich;",
        &| descriptor | MarkerPredicate::prefix( "Lorg/spongepowered/" ).matches( descriptor ),
    ];

    for bytes in &samples {
        for predicate in &predicates {
            let once = stripper::strip_matching( ClassUnit::parse( bytes ).unwrap(), predicate );
            let twice = stripper::strip_matching( once.clone(), predicate );
            assert_eq!( twice, once );
            assert_eq!( twice.to_bytes(), once.to_bytes() );
        }
    }

}

#[test]
fn idempotence_strip_everything_leaves_valid_class() {
    let stripped = stripper::strip_matching( ClassUnit::parse( &class_builder::widget() ).unwrap(), | _ | true );
    assert_eq!( stripped.annotations().count(), 0 );
    assert!( stripped.fields().iter().chain( stripped.methods() ).all(| member | member.annotations().count() == 0 ));
    assert_eq!( ClassUnit::parse( &stripped.to_bytes() ).unwrap(), stripped );
}

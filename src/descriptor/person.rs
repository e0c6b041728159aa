use serde::Deserialize ;



/// An author or contributor of a module.
///
/// Descriptors may spell a person out as an object or as a shorthand string
/// `Name <email> (website)` where both trailing parts are optional.
#[derive( Debug, Clone, Default, PartialEq, Eq, Deserialize )]
#[serde( from = "RawPerson" )]
pub struct Person {
    name: String,
    email: String,
    website: String,
}

#[derive( Deserialize )]
#[serde( untagged )]
enum RawPerson {
    Shorthand( String ),
    Full {
        #[serde( default )] name: String,
        #[serde( default )] email: String,
        #[serde( default )] website: String,
    },
}

impl From<RawPerson> for Person {
    fn from( raw: RawPerson ) -> Self {
        match raw {
            RawPerson::Shorthand( text ) => Person::parse_shorthand( &text ),
            RawPerson::Full { name, email, website } => Person { name, email, website },
        }
    }
}

impl Person {

    pub fn new( name: impl Into<String>, email: impl Into<String>, website: impl Into<String> ) -> Self {
        Self { name: name.into(), email: email.into(), website: website.into() }
    }

    /// Parses `Name <email> (website)`. Never fails; absent parts are empty.
    ///
    /// ```
    /// use mod_link::descriptor::Person ;
    ///
    /// let person = Person::parse_shorthand( "Jane Doe <jane@example.com> (https://example.com)" );
    /// assert_eq!( person, Person::new( "Jane Doe", "jane@example.com", "https://example.com" ));
    ///
    /// let person = Person::parse_shorthand( "Someone (https://someone.dev)" );
    /// assert_eq!( person.name(), "Someone" );
    /// assert_eq!( person.email(), "" );
    /// ```
    pub fn parse_shorthand( text: &str ) -> Self {

        let mut parts = text.split_whitespace().collect::<Vec<_>>();

        let website = take_enclosed( &mut parts, '(', ')' ).unwrap_or_default();
        let email = take_enclosed( &mut parts, '<', '>' ).unwrap_or_default();

        Self { name: parts.join( " " ), email, website }

    }

    #[inline] pub fn name( &self ) -> &str { &self.name }
    #[inline] pub fn email( &self ) -> &str { &self.email }
    #[inline] pub fn website( &self ) -> &str { &self.website }

}

/// Pops the last token if it is `open`..`close` around a non-empty body.
fn take_enclosed( parts: &mut Vec<&str>, open: char, close: char ) -> Option<String> {
    let inner = parts.last()?
        .strip_prefix( open )?
        .strip_suffix( close )
        .filter(| inner | !inner.is_empty() )?
        .to_string();
    parts.pop();
    Some( inner )
}

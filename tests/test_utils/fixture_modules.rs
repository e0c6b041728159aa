#[macro_export]
macro_rules! fixtures {

    {
        modules = [];
    } => ( mod fixtures {
        pub fn modules() -> Vec<mod_link::ModuleDescriptor> { Vec::with_capacity( 0 ) }
    });

    {
        modules = [ $($module:literal),* $(,)? ];
    } => ( mod fixtures {

        /// Descriptors in the listed order.
        pub fn modules() -> Vec<mod_link::ModuleDescriptor> { vec![ $(
            $crate::fixture_modules::parse_module( $crate::fixture_modules::strip_rs( file!() ), $module )
                .expect( format!( "Module {} failed to parse", $module ).as_str())
        ),* ]}

        /// Path of a fixture file, for tests that go through the loader.
        #[allow( dead_code )]
        pub fn path( module: &str ) -> std::path::PathBuf {
            $crate::fixture_modules::module_path( $crate::fixture_modules::strip_rs( file!() ), module )
        }

    });

}

#[allow( dead_code )]
mod fixture_modules {

    pub const fn strip_rs( path: &'static str ) -> &'static str {
        match path.as_bytes() {
            [rest @ .., b'.', b'r', b's'] => {
                // SAFETY: we just checked that the last three bytes are ".rs",
                // so the split is at a UTF-8 boundary.
                unsafe { core::str::from_utf8_unchecked( rest ) }
            }
            _ => unreachable!(),
        }
    }

    #[derive( Debug, thiserror::Error )]
    pub enum FixtureError {
        #[error( "IO error: {0}" )] Io( #[from] std::io::Error ),
        #[error( "Descriptor error: {0}" )] Descriptor( #[from] mod_link::DescriptorError ),
    }

    pub fn module_path( fixtures_dir: &'static str, id: &str ) -> std::path::PathBuf {
        std::path::PathBuf::from( fixtures_dir ).join( format!( "{}.json", id ))
    }

    pub fn parse_module( fixtures_dir: &'static str, id: &str ) -> Result<mod_link::ModuleDescriptor, FixtureError> {
        let text = std::fs::read_to_string( module_path( fixtures_dir, id ))?;
        Ok( mod_link::ModuleDescriptor::from_json( &text )? )
    }

}

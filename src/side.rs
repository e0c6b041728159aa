//! Runtime environment restrictions.
//!
//! Both modules and individual dependency edges carry a [`Side`]. The active
//! environment is itself expressed as a [`Side`], where [`Side::Universal`]
//! means "every side at once" (e.g. when baking a jar ahead of time).

use serde::{ Deserialize, Serialize };



/// The runtime environment a module or a dependency edge applies to.
#[derive( Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Ord, PartialOrd, Deserialize, Serialize )]
#[serde( rename_all = "lowercase" )]
pub enum Side {
    /// Only valid on the client.
    Client,
    /// Only valid on a dedicated server.
    Server,
    /// Valid everywhere.
    #[default] Universal,
}

impl Side {

    /// Whether something restricted to `self` is active in `environment`.
    ///
    /// ```
    /// use mod_link::Side ;
    ///
    /// assert!( Side::Universal.applies_to( Side::Server ));
    /// assert!( Side::Client.applies_to( Side::Universal ));
    /// assert!( !Side::Client.applies_to( Side::Server ));
    /// ```
    #[inline]
    pub fn applies_to( self, environment: Side ) -> bool {
        matches!(( self, environment ), ( Side::Universal, _ ) | ( _, Side::Universal ))
            || self == environment
    }

}

impl std::fmt::Display for Side {
    fn fmt( &self, f: &mut std::fmt::Formatter ) -> std::fmt::Result {
        match self {
            Self::Client => write!( f, "client" ),
            Self::Server => write!( f, "server" ),
            Self::Universal => write!( f, "universal" ),
        }
    }
}

impl std::str::FromStr for Side {
    type Err = String ;
    fn from_str( s: &str ) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "client" => Ok( Self::Client ),
            "server" => Ok( Self::Server ),
            "universal" => Ok( Self::Universal ),
            other => Err( format!( "unknown side '{}', expected client, server or universal", other )),
        }
    }
}

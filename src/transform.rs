//! Ordered application of class transformers.
//!
//! The chain does not know what a transformer does; it only threads the bytes
//! of one class through every registered transformer in registration order.
//!
//! ```
//! use mod_link::TransformChain ;
//!
//! let chain = TransformChain::new()
//!     .with(| _: &str, mut bytes: Vec<u8> | { bytes.push( 1 ); bytes })
//!     .with(| _: &str, mut bytes: Vec<u8> | { bytes.push( 2 ); bytes });
//!
//! assert_eq!( chain.len(), 2 );
//! assert_eq!( chain.apply( "com.example.Widget", vec![ 0 ]), vec![ 0, 1, 2 ]);
//! ```

use std::fmt::{ Debug, Formatter };



/// A function from the bytes of a class to its rewritten bytes.
///
/// `class_name` is the dotted binary name (`com.example.Widget`). Returning the
/// input unchanged means the transformer does not apply to that class.
pub trait Transformer {
    fn transform( &self, class_name: &str, bytes: Vec<u8> ) -> Vec<u8> ;
}

impl<F> Transformer for F
where
    F: Fn( &str, Vec<u8> ) -> Vec<u8>,
{
    #[inline] fn transform( &self, class_name: &str, bytes: Vec<u8> ) -> Vec<u8> { self( class_name, bytes ) }
}

#[derive( Default )]
pub struct TransformChain {
    transformers: Vec<Box<dyn Transformer>>,
}

impl Debug for TransformChain {
    fn fmt( &self, f: &mut Formatter<'_> ) -> std::fmt::Result {
        f.debug_struct( "TransformChain" )
            .field( "transformers", &self.transformers.len() )
            .finish()
    }
}

impl TransformChain {

    pub fn new() -> Self { Self::default() }

    /// Appends a transformer to the end of the chain.
    pub fn register( &mut self, transformer: impl Transformer + 'static ) -> &mut Self {
        self.transformers.push( Box::new( transformer ));
        self
    }

    /// Builder form of [`TransformChain::register`].
    pub fn with( mut self, transformer: impl Transformer + 'static ) -> Self {
        self.register( transformer );
        self
    }

    #[inline] pub fn len( &self ) -> usize { self.transformers.len() }
    #[inline] pub fn is_empty( &self ) -> bool { self.transformers.is_empty() }

    /// Runs every transformer in registration order, feeding each one the
    /// output of the previous one.
    pub fn apply( &self, class_name: &str, bytes: Vec<u8> ) -> Vec<u8> {
        self.transformers.iter().fold( bytes, | bytes, transformer | transformer.transform( class_name, bytes ))
    }

}

//! Structural model of compiled JVM class files.
//!
//! A [`ClassUnit`] is parsed from the raw bytes of a `.class` file and can be
//! written back with [`ClassUnit::to_bytes`]. Only what rewriting needs is
//! modelled in detail: the constant pool, fields, methods and the
//! `RuntimeVisibleAnnotations` / `RuntimeInvisibleAnnotations` attributes. Every
//! other attribute (code, stack maps, signatures, ...) is carried as opaque
//! bytes, so a unit that is parsed and written without changes reproduces its
//! input byte for byte.

use thiserror::Error ;

mod reader ;
mod writer ;
mod constant_pool ;
mod annotation ;
mod attribute ;
mod class_unit ;

pub use constant_pool::{ Constant, ConstantPool };
pub use annotation::{ Annotation, ElementValue };
pub use attribute::{ Attribute, Visibility, RUNTIME_VISIBLE_ANNOTATIONS, RUNTIME_INVISIBLE_ANNOTATIONS };
pub use class_unit::{ ClassUnit, Member, Scope };



/// `0xCAFEBABE`, the first four bytes of every class file.
pub const MAGIC: u32 = 0xCAFE_BABE ;

/// Oldest class file major version (JDK 1.0.2).
pub const MIN_MAJOR_VERSION: u16 = 45 ;

/// Violation of the class file format found while parsing or extending a unit.
#[derive( Error, Debug, Clone, PartialEq, Eq )]
pub enum ClassFormatError {
    #[error( "Bad magic number 0x{0:08X}" )]
    BadMagic( u32 ),
    #[error( "Unsupported class file version {major}.{minor}" )]
    UnsupportedVersion { major: u16, minor: u16 },
    #[error( "Truncated class file: needed {needed} byte(s) at offset {offset}" )]
    Truncated { offset: usize, needed: usize },
    #[error( "Unknown constant pool tag {tag} at index {index}" )]
    UnknownConstantTag { index: u16, tag: u8 },
    #[error( "Invalid constant pool index {index} ({context})" )]
    InvalidConstantIndex { index: u16, context: &'static str },
    #[error( "Constant pool index {index} is not a {expected} constant" )]
    UnexpectedConstant { index: u16, expected: &'static str },
    #[error( "Invalid method handle kind {0}" )]
    InvalidReferenceKind( u8 ),
    #[error( "Attribute '{name}' declares {declared} byte(s) but holds {actual}" )]
    AttributeLengthMismatch { name: String, declared: u32, actual: usize },
    #[error( "Unknown annotation element tag '{}'", char::from( *.0 ))]
    UnknownElementTag( u8 ),
    #[error( "{0} unexpected byte(s) after the end of the class" )]
    TrailingBytes( usize ),
    #[error( "Constant pool is full" )]
    PoolOverflow,
    #[error( "Too many {0} for a class file" )]
    TooMany( &'static str ),
    #[error( "No {0} at position {1}" )]
    NoSuchMember( &'static str, usize ),
}

use std::borrow::Cow ;

use super::ClassFormatError ;
use super::reader::ByteReader ;
use super::writer::{ WriteBytes, count_u16 };



/// One constant pool entry.
///
/// `Utf8` keeps the raw modified UTF-8 bytes so that writing an entry back never
/// re-encodes it.
#[derive( Debug, Clone, PartialEq, Eq )]
pub enum Constant {
    Utf8( Vec<u8> ),
    Integer( u32 ),
    Float( u32 ),
    Long( u64 ),
    Double( u64 ),
    Class { name_index: u16 },
    String { string_index: u16 },
    FieldRef { class_index: u16, name_and_type_index: u16 },
    MethodRef { class_index: u16, name_and_type_index: u16 },
    InterfaceMethodRef { class_index: u16, name_and_type_index: u16 },
    NameAndType { name_index: u16, descriptor_index: u16 },
    MethodHandle { reference_kind: u8, reference_index: u16 },
    MethodType { descriptor_index: u16 },
    Dynamic { bootstrap_method_attr_index: u16, name_and_type_index: u16 },
    InvokeDynamic { bootstrap_method_attr_index: u16, name_and_type_index: u16 },
    Module { name_index: u16 },
    Package { name_index: u16 },
}

impl Constant {

    pub fn tag( &self ) -> u8 {
        match self {
            Self::Utf8( _ ) => 1,
            Self::Integer( _ ) => 3,
            Self::Float( _ ) => 4,
            Self::Long( _ ) => 5,
            Self::Double( _ ) => 6,
            Self::Class { .. } => 7,
            Self::String { .. } => 8,
            Self::FieldRef { .. } => 9,
            Self::MethodRef { .. } => 10,
            Self::InterfaceMethodRef { .. } => 11,
            Self::NameAndType { .. } => 12,
            Self::MethodHandle { .. } => 15,
            Self::MethodType { .. } => 16,
            Self::Dynamic { .. } => 17,
            Self::InvokeDynamic { .. } => 18,
            Self::Module { .. } => 19,
            Self::Package { .. } => 20,
        }
    }

    /// `Long` and `Double` take up two pool slots.
    #[inline] pub fn is_wide( &self ) -> bool { matches!( self, Self::Long( _ ) | Self::Double( _ )) }

    /// Other pool entries this constant points at.
    pub fn references( &self ) -> Vec<u16> {
        match *self {
            Self::Utf8( _ ) | Self::Integer( _ ) | Self::Float( _ ) | Self::Long( _ ) | Self::Double( _ ) => Vec::with_capacity( 0 ),
            Self::Class { name_index: index }
            | Self::String { string_index: index }
            | Self::MethodType { descriptor_index: index }
            | Self::Module { name_index: index }
            | Self::Package { name_index: index }
            | Self::MethodHandle { reference_index: index, .. }
            | Self::Dynamic { name_and_type_index: index, .. }
            | Self::InvokeDynamic { name_and_type_index: index, .. } => vec![ index ],
            Self::FieldRef { class_index, name_and_type_index }
            | Self::MethodRef { class_index, name_and_type_index }
            | Self::InterfaceMethodRef { class_index, name_and_type_index } => vec![ class_index, name_and_type_index ],
            Self::NameAndType { name_index, descriptor_index } => vec![ name_index, descriptor_index ],
        }
    }

    fn read( reader: &mut ByteReader<'_>, index: u16 ) -> Result<Self, ClassFormatError> {
        Ok( match reader.u8()? {
            1 => {
                let length = reader.u16()?;
                Self::Utf8( reader.take( usize::from( length ))?.to_vec() )
            },
            3 => Self::Integer( reader.u32()? ),
            4 => Self::Float( reader.u32()? ),
            5 => Self::Long( reader.u64()? ),
            6 => Self::Double( reader.u64()? ),
            7 => Self::Class { name_index: reader.u16()? },
            8 => Self::String { string_index: reader.u16()? },
            9 => Self::FieldRef { class_index: reader.u16()?, name_and_type_index: reader.u16()? },
            10 => Self::MethodRef { class_index: reader.u16()?, name_and_type_index: reader.u16()? },
            11 => Self::InterfaceMethodRef { class_index: reader.u16()?, name_and_type_index: reader.u16()? },
            12 => Self::NameAndType { name_index: reader.u16()?, descriptor_index: reader.u16()? },
            15 => Self::MethodHandle { reference_kind: reader.u8()?, reference_index: reader.u16()? },
            16 => Self::MethodType { descriptor_index: reader.u16()? },
            17 => Self::Dynamic { bootstrap_method_attr_index: reader.u16()?, name_and_type_index: reader.u16()? },
            18 => Self::InvokeDynamic { bootstrap_method_attr_index: reader.u16()?, name_and_type_index: reader.u16()? },
            19 => Self::Module { name_index: reader.u16()? },
            20 => Self::Package { name_index: reader.u16()? },
            tag => return Err( ClassFormatError::UnknownConstantTag { index, tag }),
        })
    }

    fn write( &self, out: &mut Vec<u8> ) {
        out.put_u8( self.tag() );
        match self {
            Self::Utf8( bytes ) => {
                out.put_u16( count_u16( bytes.len() ));
                out.extend_from_slice( bytes );
            },
            Self::Integer( value ) | Self::Float( value ) => out.put_u32( *value ),
            Self::Long( value ) | Self::Double( value ) => out.put_u64( *value ),
            Self::MethodHandle { reference_kind, reference_index } => {
                out.put_u8( *reference_kind );
                out.put_u16( *reference_index );
            },
            Self::Dynamic { bootstrap_method_attr_index, name_and_type_index }
            | Self::InvokeDynamic { bootstrap_method_attr_index, name_and_type_index } => {
                out.put_u16( *bootstrap_method_attr_index );
                out.put_u16( *name_and_type_index );
            },
            other => other.references().into_iter().for_each(| index | out.put_u16( index )),
        }
    }

}

/// The constant pool of a class, indexed from 1 as in the class file.
///
/// Slot 0 and the slot following each `Long` / `Double` are unusable and hold `None`.
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct ConstantPool {
    entries: Vec<Option<Constant>>,
}

impl Default for ConstantPool {
    fn default() -> Self { Self { entries: vec![ None ] }}
}

impl ConstantPool {

    pub fn new() -> Self { Self::default() }

    /// The `constant_pool_count` as written in the class file (one more than the last index).
    #[inline] pub fn count( &self ) -> u16 { count_u16( self.entries.len() ) }

    /// The entry at `index`, if that slot is usable.
    pub fn get( &self, index: u16 ) -> Option<&Constant> {
        self.entries.get( usize::from( index ))?.as_ref()
    }

    /// The text of the `Utf8` entry at `index`. Invalid sequences are replaced.
    pub fn utf8( &self, index: u16 ) -> Option<Cow<'_, str>> {
        match self.get( index )? {
            Constant::Utf8( bytes ) => Some( String::from_utf8_lossy( bytes )),
            _ => None,
        }
    }

    /// Index of the first `Utf8` entry spelling `text`.
    pub fn find_utf8( &self, text: &str ) -> Option<u16> {
        self.entries.iter()
            .position(| entry | matches!( entry, Some( Constant::Utf8( bytes )) if bytes == text.as_bytes() ))
            .map( count_u16 )
    }

    /// Appends `constant` and returns its index.
    ///
    /// # Errors
    /// Returns [`ClassFormatError::PoolOverflow`] when the pool has no room left.
    pub fn push( &mut self, constant: Constant ) -> Result<u16, ClassFormatError> {
        let slots = if constant.is_wide() { 2 } else { 1 };
        if self.entries.len() + slots > usize::from( u16::MAX ) { return Err( ClassFormatError::PoolOverflow ) }
        let index = count_u16( self.entries.len() );
        let wide = constant.is_wide();
        self.entries.push( Some( constant ));
        if wide { self.entries.push( None ) }
        Ok( index )
    }

    /// Appends a `Utf8` entry for `text` and returns its index.
    ///
    /// # Errors
    /// Returns [`ClassFormatError::PoolOverflow`] when the pool has no room left.
    pub fn push_utf8( &mut self, text: &str ) -> Result<u16, ClassFormatError> {
        self.push( Constant::Utf8( text.as_bytes().to_vec() ))
    }

    /// Index of a `Utf8` entry spelling `text`, appending one if there is none.
    ///
    /// # Errors
    /// Returns [`ClassFormatError::PoolOverflow`] when the pool has no room left.
    pub fn intern_utf8( &mut self, text: &str ) -> Result<u16, ClassFormatError> {
        match self.find_utf8( text ) {
            Some( index ) => Ok( index ),
            None => self.push_utf8( text ),
        }
    }

    /// Index of the last usable entry, if the pool is not empty.
    pub fn last_index( &self ) -> Option<u16> {
        self.entries.iter().rposition( Option::is_some ).map( count_u16 )
    }

    /// Removes the last usable entry, both slots of a `Long` or `Double`
    /// included. Indices of all other entries stay valid.
    pub(super) fn pop_last( &mut self ) -> Option<Constant> {
        let index = usize::from( self.last_index()? );
        let constant = self.entries.get_mut( index )?.take();
        self.entries.truncate( index );
        constant
    }

    pub(super) fn iter( &self ) -> impl Iterator<Item = ( u16, &Constant )> {
        self.entries.iter().enumerate()
            .filter_map(|( index, entry )| entry.as_ref().map(| constant | ( count_u16( index ), constant )))
    }

    pub(super) fn read( reader: &mut ByteReader<'_> ) -> Result<Self, ClassFormatError> {

        let count = reader.u16()?;
        if count == 0 { return Err( ClassFormatError::InvalidConstantIndex { index: 0, context: "constant_pool_count" }) }

        let mut pool = Self { entries: Vec::with_capacity( usize::from( count )) };
        pool.entries.push( None );
        while pool.entries.len() < usize::from( count ) {
            let index = count_u16( pool.entries.len() );
            let constant = Constant::read( reader, index )?;
            if constant.is_wide() && usize::from( index ) + 1 >= usize::from( count ) {
                return Err( ClassFormatError::InvalidConstantIndex { index, context: "wide constant at the end of the pool" });
            }
            let wide = constant.is_wide();
            pool.entries.push( Some( constant ));
            if wide { pool.entries.push( None ) }
        }

        pool.validate()?;
        Ok( pool )

    }

    pub(super) fn write( &self, out: &mut Vec<u8> ) {
        out.put_u16( self.count() );
        self.entries.iter().flatten().for_each(| constant | constant.write( out ));
    }

    /// Checks that `index` refers to a `Utf8` entry.
    pub(super) fn expect_utf8( &self, index: u16, context: &'static str ) -> Result<(), ClassFormatError> {
        match self.get( index ) {
            Some( Constant::Utf8( _ )) => Ok(()),
            Some( _ ) => Err( ClassFormatError::UnexpectedConstant { index, expected: "Utf8" }),
            None => Err( ClassFormatError::InvalidConstantIndex { index, context }),
        }
    }

    /// Checks that `index` refers to a `Class` entry.
    pub(super) fn expect_class( &self, index: u16, context: &'static str ) -> Result<(), ClassFormatError> {
        match self.get( index ) {
            Some( Constant::Class { .. } ) => Ok(()),
            Some( _ ) => Err( ClassFormatError::UnexpectedConstant { index, expected: "Class" }),
            None => Err( ClassFormatError::InvalidConstantIndex { index, context }),
        }
    }

    /// Checks that `index` refers to any usable entry.
    pub(super) fn expect_any( &self, index: u16, context: &'static str ) -> Result<(), ClassFormatError> {
        self.get( index ).map(| _ | ()).ok_or( ClassFormatError::InvalidConstantIndex { index, context })
    }

    fn expect_name_and_type( &self, index: u16 ) -> Result<(), ClassFormatError> {
        match self.get( index ) {
            Some( Constant::NameAndType { .. } ) => Ok(()),
            Some( _ ) => Err( ClassFormatError::UnexpectedConstant { index, expected: "NameAndType" }),
            None => Err( ClassFormatError::InvalidConstantIndex { index, context: "name and type" }),
        }
    }

    fn validate( &self ) -> Result<(), ClassFormatError> {
        self.iter().try_for_each(|( _, constant )| match *constant {
            Constant::Utf8( _ ) | Constant::Integer( _ ) | Constant::Float( _ ) | Constant::Long( _ ) | Constant::Double( _ ) => Ok(()),
            Constant::Class { name_index: index }
            | Constant::String { string_index: index }
            | Constant::MethodType { descriptor_index: index }
            | Constant::Module { name_index: index }
            | Constant::Package { name_index: index } => self.expect_utf8( index, "constant name" ),
            Constant::NameAndType { name_index, descriptor_index } => {
                self.expect_utf8( name_index, "member name" )?;
                self.expect_utf8( descriptor_index, "member descriptor" )
            },
            Constant::FieldRef { class_index, name_and_type_index }
            | Constant::MethodRef { class_index, name_and_type_index }
            | Constant::InterfaceMethodRef { class_index, name_and_type_index } => {
                self.expect_class( class_index, "member owner" )?;
                self.expect_name_and_type( name_and_type_index )
            },
            Constant::MethodHandle { reference_kind, reference_index } => {
                if !( 1..=9 ).contains( &reference_kind ) { return Err( ClassFormatError::InvalidReferenceKind( reference_kind )) }
                self.expect_any( reference_index, "method handle reference" )
            },
            Constant::Dynamic { name_and_type_index, .. }
            | Constant::InvokeDynamic { name_and_type_index, .. } => self.expect_name_and_type( name_and_type_index ),
        })
    }

}

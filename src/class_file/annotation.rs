use super::ClassFormatError ;
use super::constant_pool::ConstantPool ;
use super::reader::ByteReader ;
use super::writer::{ WriteBytes, count_u16 };



/// A single annotation as stored in a class file.
///
/// `type_index` points at the `Utf8` field descriptor of the annotation type
/// (`Lcom/example/Marker;`); each element pairs the index of its name with its value.
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct Annotation {
    type_index: u16,
    elements: Vec<( u16, ElementValue )>,
}

/// The value of one annotation element.
#[derive( Debug, Clone, PartialEq, Eq )]
pub enum ElementValue {
    /// A primitive or string constant; `tag` is one of `BCDFIJSZs`.
    Const { tag: u8, const_value_index: u16 },
    Enum { type_name_index: u16, const_name_index: u16 },
    Class { class_info_index: u16 },
    Annotation( Annotation ),
    Array( Vec<ElementValue> ),
}

impl Annotation {

    pub fn new( type_index: u16, elements: Vec<( u16, ElementValue )> ) -> Self {
        Self { type_index, elements }
    }

    #[inline] pub fn type_index( &self ) -> u16 { self.type_index }
    #[inline] pub fn elements( &self ) -> &[( u16, ElementValue )] { &self.elements }

    /// The type descriptor of this annotation, resolved against `pool`.
    pub fn type_descriptor( &self, pool: &ConstantPool ) -> Option<String> {
        pool.utf8( self.type_index ).map( Into::into )
    }

    /// Every constant pool index this annotation points at, nested values included.
    pub fn constant_references( &self ) -> Vec<u16> {
        let mut references = Vec::new();
        self.collect_references( &mut references );
        references
    }

    fn collect_references( &self, references: &mut Vec<u16> ) {
        references.push( self.type_index );
        self.elements.iter().for_each(|( name_index, value )| {
            references.push( *name_index );
            value.collect_references( references );
        });
    }

    pub(super) fn read( reader: &mut ByteReader<'_>, pool: &ConstantPool ) -> Result<Self, ClassFormatError> {
        let type_index = reader.u16()?;
        pool.expect_utf8( type_index, "annotation type" )?;
        let count = reader.u16()?;
        let elements = ( 0..count )
            .map(| _ | {
                let name_index = reader.u16()?;
                pool.expect_utf8( name_index, "annotation element name" )?;
                Ok(( name_index, ElementValue::read( reader, pool )? ))
            })
            .collect::<Result<Vec<_>, ClassFormatError>>()?;
        Ok( Self { type_index, elements })
    }

    pub(super) fn write( &self, out: &mut Vec<u8> ) {
        out.put_u16( self.type_index );
        out.put_u16( count_u16( self.elements.len() ));
        self.elements.iter().for_each(|( name_index, value )| {
            out.put_u16( *name_index );
            value.write( out );
        });
    }

}

impl ElementValue {

    fn collect_references( &self, references: &mut Vec<u16> ) {
        match self {
            Self::Const { const_value_index, .. } => references.push( *const_value_index ),
            Self::Enum { type_name_index, const_name_index } => references.extend([ *type_name_index, *const_name_index ]),
            Self::Class { class_info_index } => references.push( *class_info_index ),
            Self::Annotation( annotation ) => annotation.collect_references( references ),
            Self::Array( values ) => values.iter().for_each(| value | value.collect_references( references )),
        }
    }

    fn read( reader: &mut ByteReader<'_>, pool: &ConstantPool ) -> Result<Self, ClassFormatError> {
        Ok( match reader.u8()? {
            tag @ ( b'B' | b'C' | b'D' | b'F' | b'I' | b'J' | b'S' | b'Z' | b's' ) => {
                let const_value_index = reader.u16()?;
                pool.expect_any( const_value_index, "annotation constant" )?;
                Self::Const { tag, const_value_index }
            },
            b'e' => {
                let type_name_index = reader.u16()?;
                let const_name_index = reader.u16()?;
                pool.expect_utf8( type_name_index, "enum type" )?;
                pool.expect_utf8( const_name_index, "enum constant" )?;
                Self::Enum { type_name_index, const_name_index }
            },
            b'c' => {
                let class_info_index = reader.u16()?;
                pool.expect_utf8( class_info_index, "class literal" )?;
                Self::Class { class_info_index }
            },
            b'@' => Self::Annotation( Annotation::read( reader, pool )? ),
            b'[' => {
                let count = reader.u16()?;
                Self::Array(( 0..count )
                    .map(| _ | Self::read( reader, pool ))
                    .collect::<Result<_, _>>()? )
            },
            tag => return Err( ClassFormatError::UnknownElementTag( tag )),
        })
    }

    fn write( &self, out: &mut Vec<u8> ) {
        match self {
            Self::Const { tag, const_value_index } => {
                out.put_u8( *tag );
                out.put_u16( *const_value_index );
            },
            Self::Enum { type_name_index, const_name_index } => {
                out.put_u8( b'e' );
                out.put_u16( *type_name_index );
                out.put_u16( *const_name_index );
            },
            Self::Class { class_info_index } => {
                out.put_u8( b'c' );
                out.put_u16( *class_info_index );
            },
            Self::Annotation( annotation ) => {
                out.put_u8( b'@' );
                annotation.write( out );
            },
            Self::Array( values ) => {
                out.put_u8( b'[' );
                out.put_u16( count_u16( values.len() ));
                values.iter().for_each(| value | value.write( out ));
            },
        }
    }

}

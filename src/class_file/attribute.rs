use std::fmt::{ Display, Formatter };

use super::ClassFormatError ;
use super::annotation::Annotation ;
use super::constant_pool::{ Constant, ConstantPool };
use super::reader::ByteReader ;
use super::writer::{ WriteBytes, count_u16, length_u32 };



pub const RUNTIME_VISIBLE_ANNOTATIONS: &str = "RuntimeVisibleAnnotations" ;
pub const RUNTIME_INVISIBLE_ANNOTATIONS: &str = "RuntimeInvisibleAnnotations" ;

/// Which of the two annotation attributes an annotation lives in.
#[derive( Debug, Clone, Copy, PartialEq, Eq, Hash )]
pub enum Visibility {
    /// `RuntimeVisibleAnnotations`
    Visible,
    /// `RuntimeInvisibleAnnotations`
    Invisible,
}

impl Visibility {
    #[inline] pub fn attribute_name( self ) -> &'static str {
        match self {
            Self::Visible => RUNTIME_VISIBLE_ANNOTATIONS,
            Self::Invisible => RUNTIME_INVISIBLE_ANNOTATIONS,
        }
    }

    fn from_attribute_name( name: &[u8] ) -> Option<Self> {
        if name == RUNTIME_VISIBLE_ANNOTATIONS.as_bytes() { Some( Self::Visible ) }
        else if name == RUNTIME_INVISIBLE_ANNOTATIONS.as_bytes() { Some( Self::Invisible ) }
        else { None }
    }
}

impl Display for Visibility {
    fn fmt( &self, f: &mut Formatter<'_> ) -> std::fmt::Result {
        write!( f, "{}", self.attribute_name() )
    }
}

/// An attribute of a class, field or method.
///
/// Annotation attributes are decoded; everything else keeps its body verbatim.
#[derive( Debug, Clone, PartialEq, Eq )]
pub enum Attribute {
    Annotations { name_index: u16, visibility: Visibility, annotations: Vec<Annotation> },
    Opaque { name_index: u16, info: Vec<u8> },
}

impl Attribute {

    #[inline] pub fn name_index( &self ) -> u16 {
        match self {
            Self::Annotations { name_index, .. } | Self::Opaque { name_index, .. } => *name_index,
        }
    }

    pub(super) fn read( reader: &mut ByteReader<'_>, pool: &ConstantPool ) -> Result<Self, ClassFormatError> {

        let name_index = reader.u16()?;
        pool.expect_utf8( name_index, "attribute name" )?;
        let declared = reader.u32()?;
        let body = usize::try_from( declared )
            .map_err(| _ | ClassFormatError::Truncated { offset: reader.position(), needed: usize::MAX })
            .and_then(| length | reader.take( length ))?;

        let visibility = match pool.get( name_index ) {
            Some( Constant::Utf8( name )) => Visibility::from_attribute_name( name ),
            _ => None,
        };
        let Some( visibility ) = visibility else {
            return Ok( Self::Opaque { name_index, info: body.to_vec() });
        };

        let mut inner = ByteReader::new( body );
        let count = inner.u16().map_err(| _ | length_mismatch( visibility, declared, body.len() ))?;
        let annotations = ( 0..count )
            .map(| _ | Annotation::read( &mut inner, pool ))
            .collect::<Result<Vec<_>, _>>()
            .map_err(| err | match err {
                ClassFormatError::Truncated { offset, .. } => length_mismatch( visibility, declared, offset ),
                other => other,
            })?;
        if inner.remaining() != 0 { return Err( length_mismatch( visibility, declared, inner.position() )) }

        Ok( Self::Annotations { name_index, visibility, annotations })

    }

    pub(super) fn write( &self, out: &mut Vec<u8> ) {
        out.put_u16( self.name_index() );
        match self {
            Self::Opaque { info, .. } => {
                out.put_u32( length_u32( info.len() ));
                out.extend_from_slice( info );
            },
            Self::Annotations { annotations, .. } => {
                let mut body = Vec::new();
                body.put_u16( count_u16( annotations.len() ));
                annotations.iter().for_each(| annotation | annotation.write( &mut body ));
                out.put_u32( length_u32( body.len() ));
                out.extend_from_slice( &body );
            },
        }
    }

}

fn length_mismatch( visibility: Visibility, declared: u32, actual: usize ) -> ClassFormatError {
    ClassFormatError::AttributeLengthMismatch { name: visibility.attribute_name().to_string(), declared, actual }
}

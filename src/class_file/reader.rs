use super::ClassFormatError ;



/// Big-endian cursor over a class file.
pub(super) struct ByteReader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> ByteReader<'a> {

    pub(super) fn new( bytes: &'a [u8] ) -> Self { Self { bytes, position: 0 }}

    #[inline] pub(super) fn position( &self ) -> usize { self.position }
    #[inline] pub(super) fn remaining( &self ) -> usize { self.bytes.len() - self.position }

    pub(super) fn take( &mut self, count: usize ) -> Result<&'a [u8], ClassFormatError> {
        let end = self.position.checked_add( count )
            .filter(| end | *end <= self.bytes.len() )
            .ok_or( ClassFormatError::Truncated { offset: self.position, needed: count })?;
        let slice = &self.bytes[ self.position..end ];
        self.position = end ;
        Ok( slice )
    }

    pub(super) fn u8( &mut self ) -> Result<u8, ClassFormatError> {
        Ok( self.take( 1 )?[ 0 ])
    }

    pub(super) fn u16( &mut self ) -> Result<u16, ClassFormatError> {
        let bytes = self.take( 2 )?;
        Ok( u16::from_be_bytes([ bytes[ 0 ], bytes[ 1 ]]))
    }

    pub(super) fn u32( &mut self ) -> Result<u32, ClassFormatError> {
        let bytes = self.take( 4 )?;
        Ok( u32::from_be_bytes([ bytes[ 0 ], bytes[ 1 ], bytes[ 2 ], bytes[ 3 ]]))
    }

    pub(super) fn u64( &mut self ) -> Result<u64, ClassFormatError> {
        Ok(( u64::from( self.u32()? ) << 32 ) | u64::from( self.u32()? ))
    }

}

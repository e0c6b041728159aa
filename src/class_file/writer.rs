/// Big-endian append helpers for class file serialization.
pub(super) trait WriteBytes {
    fn put_u8( &mut self, value: u8 );
    fn put_u16( &mut self, value: u16 );
    fn put_u32( &mut self, value: u32 );
    fn put_u64( &mut self, value: u64 );
}

impl WriteBytes for Vec<u8> {
    #[inline] fn put_u8( &mut self, value: u8 ) { self.push( value ) }
    #[inline] fn put_u16( &mut self, value: u16 ) { self.extend_from_slice( &value.to_be_bytes() ) }
    #[inline] fn put_u32( &mut self, value: u32 ) { self.extend_from_slice( &value.to_be_bytes() ) }
    #[inline] fn put_u64( &mut self, value: u64 ) { self.extend_from_slice( &value.to_be_bytes() ) }
}

/// Converts a collection length to a class file `u16` count.
///
/// Every collection written here was either read from a `u16` count or grown
/// through an API that checks the bound, so the conversion cannot fail.
#[allow( clippy::cast_possible_truncation )]
#[inline] pub(super) fn count_u16( len: usize ) -> u16 {
    debug_assert!( len <= usize::from( u16::MAX ));
    len as u16
}

/// Converts a serialized body length to a class file `u32` length.
#[allow( clippy::cast_possible_truncation )]
#[inline] pub(super) fn length_u32( len: usize ) -> u32 {
    debug_assert!( u32::try_from( len ).is_ok() );
    len as u32
}

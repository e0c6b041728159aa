//! Entry comments of the output archive.
//!
//! The archive writer has no way to give an entry a comment, so the finished
//! archive gets its central directory rebuilt with the comments of the input
//! entries. Local headers and entry data are never touched; only the central
//! directory grows, and the size and offset fields after it follow.

const CENTRAL_HEADER: u32 = 0x0201_4b50 ;
const END_OF_CENTRAL_DIRECTORY: u32 = 0x0605_4b50 ;
const ZIP64_END_OF_CENTRAL_DIRECTORY: u32 = 0x0606_4b50 ;
const ZIP64_LOCATOR: u32 = 0x0706_4b50 ;

const CENTRAL_HEADER_LENGTH: usize = 46 ;
const END_OF_CENTRAL_DIRECTORY_LENGTH: usize = 22 ;
const ZIP64_LOCATOR_LENGTH: usize = 20 ;

/// General purpose flag: names and comments are UTF-8.
const UTF8_FLAG: u16 = 1 << 11 ;



/// Gives the `n`th central directory entry of `archive` the comment
/// `comments[n]`. `archive` comes back as is when every comment is empty.
///
/// # Errors
/// Fails with a short reason when the central directory cannot be walked or
/// does not hold exactly one entry per comment.
pub(super) fn restore( archive: Vec<u8>, comments: &[Vec<u8>] ) -> Result<Vec<u8>, &'static str> {

    if comments.iter().all( Vec::is_empty ) { return Ok( archive ) }

    let end = find_end( &archive ).ok_or( "end of central directory not found" )?;
    let zip64 = match end.checked_sub( ZIP64_LOCATOR_LENGTH ) {
        Some( locator ) if u32_at( &archive, locator ) == Some( ZIP64_LOCATOR ) => {
            let record = u64_at( &archive, locator + 8 )
                .and_then(| offset | usize::try_from( offset ).ok() )
                .filter(| &record | u32_at( &archive, record ) == Some( ZIP64_END_OF_CENTRAL_DIRECTORY ))
                .ok_or( "zip64 end of central directory not found" )?;
            Some(( locator, record ))
        },
        _ => None,
    };

    let ( start, size ) = match zip64 {
        Some(( _, record )) => ( u64_at( &archive, record + 48 ), u64_at( &archive, record + 40 )),
        None => ( u32_at( &archive, end + 16 ).map( u64::from ), u32_at( &archive, end + 12 ).map( u64::from )),
    };
    let start = start.and_then(| start | usize::try_from( start ).ok() ).ok_or( "central directory offset out of range" )?;
    let size = size.and_then(| size | usize::try_from( size ).ok() ).ok_or( "central directory size out of range" )?;
    let directory_end = start.checked_add( size ).filter(| &directory_end | directory_end <= end ).ok_or( "central directory overlaps its end record" )?;

    let mut directory = Vec::with_capacity( size + comments.iter().map( Vec::len ).sum::<usize>() );
    let mut at = start ;
    for comment in comments {
        if at >= directory_end || u32_at( &archive, at ) != Some( CENTRAL_HEADER ) {
            return Err( "fewer central directory entries than written entries" )
        }
        let length = | offset | u16_at( &archive, at + offset ).map( usize::from ).ok_or( "truncated central directory entry" );
        let kept = CENTRAL_HEADER_LENGTH + length( 28 )? + length( 30 )?;
        let old_comment = length( 32 )?;

        let mut header = archive.get( at..at + kept ).ok_or( "truncated central directory entry" )?.to_vec();
        let comment_length = u16::try_from( comment.len() ).map_err(| _ | "entry comment too long" )?;
        put( &mut header, 32, &comment_length.to_le_bytes() );
        if !comment.is_ascii() {
            let flags = u16_at( &header, 8 ).unwrap_or_default() | UTF8_FLAG ;
            put( &mut header, 8, &flags.to_le_bytes() );
        }
        directory.extend( header );
        directory.extend_from_slice( comment );
        at += kept + old_comment ;
    }
    if at != directory_end { return Err( "more central directory entries than written entries" ) }

    let new_size = directory.len();
    let moved = | position: usize | position - directory_end + start + new_size ;
    let mut rewritten = Vec::with_capacity( archive.len() - size + new_size );
    rewritten.extend_from_slice( &archive[ ..start ]);
    rewritten.extend( directory );
    rewritten.extend_from_slice( &archive[ directory_end.. ]);

    let end = moved( end );
    if u32_at( &rewritten, end + 12 ) != Some( u32::MAX ) {
        let size = u32::try_from( new_size ).map_err(| _ | "central directory too large" )?;
        put( &mut rewritten, end + 12, &size.to_le_bytes() );
    }
    if let Some(( locator, record )) = zip64 {
        put( &mut rewritten, moved( record ) + 40, &( new_size as u64 ).to_le_bytes() );
        put( &mut rewritten, moved( locator ) + 8, &( moved( record ) as u64 ).to_le_bytes() );
    }
    Ok( rewritten )

}

/// Position of the end of central directory record, which is followed by
/// exactly its own comment.
fn find_end( archive: &[u8] ) -> Option<usize> {
    let last = archive.len().checked_sub( END_OF_CENTRAL_DIRECTORY_LENGTH )?;
    let first = last.saturating_sub( usize::from( u16::MAX ));
    ( first..=last ).rev().find(| &at | {
        u32_at( archive, at ) == Some( END_OF_CENTRAL_DIRECTORY )
            && u16_at( archive, at + 20 ).map( usize::from ) == Some( archive.len() - at - END_OF_CENTRAL_DIRECTORY_LENGTH )
    })
}

fn field<const N: usize>( bytes: &[u8], at: usize ) -> Option<[u8; N]> {
    bytes.get( at..at.checked_add( N )? )?.try_into().ok()
}

fn u16_at( bytes: &[u8], at: usize ) -> Option<u16> { field( bytes, at ).map( u16::from_le_bytes ) }
fn u32_at( bytes: &[u8], at: usize ) -> Option<u32> { field( bytes, at ).map( u32::from_le_bytes ) }
fn u64_at( bytes: &[u8], at: usize ) -> Option<u64> { field( bytes, at ).map( u64::from_le_bytes ) }

fn put( bytes: &mut [u8], at: usize, value: &[u8] ) {
    if let Some( target ) = bytes.get_mut( at..at + value.len() ) { target.copy_from_slice( value ) }
}

#[cfg( test )]
mod tests {

    use std::io::{ Cursor, Write };
    use zip::{ ZipArchive, ZipWriter };
    use zip::write::SimpleFileOptions ;

    use super::restore ;

    fn archive( names: &[&str], comment: &str ) -> Vec<u8> {
        let mut writer = ZipWriter::new( Cursor::new( Vec::new() ));
        for name in names {
            writer.start_file( *name, SimpleFileOptions::default() ).unwrap();
            writer.write_all( name.as_bytes() ).unwrap();
        }
        writer.set_comment( comment );
        writer.finish().unwrap().into_inner()
    }

    fn comments_of( bytes: &[u8] ) -> Vec<String> {
        let mut archive = ZipArchive::new( Cursor::new( bytes )).unwrap();
        ( 0..archive.len() ).map(| index | archive.by_index( index ).unwrap().comment().to_string() ).collect()
    }

    #[test]
    fn writes_comments_into_central_directory() {
        let bytes = restore( archive( &[ "a.txt", "b.txt", "c.txt" ], "archive" ), &[
            b"first".to_vec(),
            Vec::new(),
            "drei \u{00fc}ber".as_bytes().to_vec(),
        ]).unwrap();
        assert_eq!( comments_of( &bytes ), [ "first", "", "drei \u{00fc}ber" ]);
        assert_eq!( ZipArchive::new( Cursor::new( &bytes )).unwrap().comment(), b"archive" );
    }

    #[test]
    fn leaves_archive_without_comments_alone() {
        let original = archive( &[ "a.txt" ], "" );
        assert_eq!( restore( original.clone(), &[ Vec::new() ]).unwrap(), original );
    }

    #[test]
    fn rejects_entry_count_mismatch() {
        let original = archive( &[ "a.txt", "b.txt" ], "" );
        assert!( restore( original.clone(), &[ b"one".to_vec() ]).is_err() );
        assert!( restore( original, &[ b"one".to_vec(), Vec::new(), Vec::new() ]).is_err() );
    }

}

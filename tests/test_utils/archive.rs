#[allow( dead_code )]
mod archive {

    use std::io::{ Cursor, Read, Write };
    use zip::{ CompressionMethod, DateTime, ZipArchive, ZipWriter };
    use zip::write::SimpleFileOptions ;

    /// Modification time of every entry written by [`build`].
    pub fn stamp() -> DateTime {
        DateTime::from_date_and_time( 1990, 1, 1, 0, 0, 0 ).unwrap()
    }

    /// One archive entry as seen by the tests. Names ending in `/` are directories.
    #[derive( Debug, Clone, PartialEq, Eq )]
    pub struct Entry {
        pub name: String,
        pub bytes: Vec<u8>,
    }

    impl Entry {
        pub fn new( name: &str, bytes: impl Into<Vec<u8>> ) -> Self {
            Self { name: name.to_string(), bytes: bytes.into() }
        }
        pub fn directory( name: &str ) -> Self {
            Self { name: name.to_string(), bytes: Vec::new() }
        }
    }

    pub fn build( entries: &[Entry], comment: Option<&str> ) -> Vec<u8> {
        let mut writer = ZipWriter::new( Cursor::new( Vec::new() ));
        let options = SimpleFileOptions::default()
            .compression_method( CompressionMethod::Deflated )
            .last_modified_time( stamp() );
        for entry in entries {
            if entry.name.ends_with( '/' ) {
                writer.add_directory( entry.name.as_str(), options ).unwrap();
            } else {
                writer.start_file( entry.name.as_str(), options ).unwrap();
                writer.write_all( &entry.bytes ).unwrap();
            }
        }
        if let Some( comment ) = comment { writer.set_comment( comment ) }
        writer.finish().unwrap().into_inner()
    }

    pub fn read( bytes: &[u8] ) -> Vec<Entry> {
        let mut archive = ZipArchive::new( Cursor::new( bytes )).unwrap();
        ( 0..archive.len() ).map(| index | {
            let mut file = archive.by_index( index ).unwrap();
            let mut bytes = Vec::new();
            file.read_to_end( &mut bytes ).unwrap();
            Entry { name: file.name().to_string(), bytes }
        }).collect()
    }

    pub fn comment( bytes: &[u8] ) -> Vec<u8> {
        ZipArchive::new( Cursor::new( bytes )).unwrap().comment().to_vec()
    }

    /// Name, comment and modification time of every entry.
    pub fn metadata( bytes: &[u8] ) -> Vec<( String, String, Option<DateTime> )> {
        let mut archive = ZipArchive::new( Cursor::new( bytes )).unwrap();
        ( 0..archive.len() ).map(| index | {
            let file = archive.by_index_raw( index ).unwrap();
            ( file.name().to_string(), file.comment().to_string(), file.last_modified() )
        }).collect()
    }

    /// `bytes` with entry `n` commented `comments[n]`.
    pub fn with_entry_comments( bytes: &[u8], comments: &[&str] ) -> Vec<u8> {
        rebuild_central_directory( bytes, | index, _, comment | *comment = comments[ index ].as_bytes().to_vec() )
    }

    /// `bytes` with entry `index` claiming `size` uncompressed bytes in the central directory.
    pub fn with_declared_size( bytes: &[u8], index: usize, size: u32 ) -> Vec<u8> {
        rebuild_central_directory( bytes, | position, header, _ | if position == index {
            header[ 24..28 ].copy_from_slice( &size.to_le_bytes() );
        })
    }

    fn u16_at( bytes: &[u8], at: usize ) -> usize { usize::from( u16::from_le_bytes([ bytes[ at ], bytes[ at + 1 ]])) }

    fn u32_at( bytes: &[u8], at: usize ) -> usize {
        u32::from_le_bytes( bytes[ at..at + 4 ].try_into().unwrap() ) as usize
    }

    /// Rebuilds the central directory of an archive without zip64 records,
    /// handing each entry's fixed header, name and extra field to `edit`
    /// together with its comment.
    fn rebuild_central_directory( bytes: &[u8], mut edit: impl FnMut( usize, &mut Vec<u8>, &mut Vec<u8> )) -> Vec<u8> {
        let end = ( 0..=bytes.len() - 22 ).rev().find(| &at | bytes[ at..at + 4 ] == [ 0x50, 0x4b, 0x05, 0x06 ]).unwrap();
        let start = u32_at( bytes, end + 16 );
        let mut directory = Vec::new();
        let mut at = start ;
        for index in 0..u16_at( bytes, end + 10 ) {
            let kept = 46 + u16_at( bytes, at + 28 ) + u16_at( bytes, at + 30 );
            let comment_length = u16_at( bytes, at + 32 );
            let mut header = bytes[ at..at + kept ].to_vec();
            let mut comment = bytes[ at + kept..at + kept + comment_length ].to_vec();
            edit( index, &mut header, &mut comment );
            header[ 32..34 ].copy_from_slice( &u16::try_from( comment.len() ).unwrap().to_le_bytes() );
            directory.extend( header );
            directory.extend( comment );
            at += kept + comment_length ;
        }
        let mut tail = bytes[ end.. ].to_vec();
        tail[ 12..16 ].copy_from_slice( &u32::try_from( directory.len() ).unwrap().to_le_bytes() );
        let mut rebuilt = bytes[ ..start ].to_vec();
        rebuilt.extend( directory );
        rebuilt.extend( tail );
        rebuilt
    }

}

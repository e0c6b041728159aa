//! Jar to jar processing.
//!
//! Entries are processed one at a time, in archive order, and written to the
//! output in that same order:
//!
//! * directories and non-class entries are copied raw, headers included;
//! * class entries are run through the [`TransformChain`]; when the chain
//!   changed the bytes the class is parsed, stripped of marker annotations and
//!   re-serialized. Every class entry is written as a fresh entry stamped with
//!   the processing time.
//!
//! The output is assembled in memory. Entry comments are put back once the
//! archive is complete, as the archive writer cannot store them itself.

use std::fs::File ;
use std::io::{ BufReader, BufWriter, Cursor, Read, Seek, Write };
use std::path::{ Path, PathBuf };
use thiserror::Error ;
use tracing::{ debug, info, warn };
use zip::{ CompressionMethod, ZipArchive, ZipWriter };
use zip::result::{ DateTimeRangeError, ZipError };
use zip::write::SimpleFileOptions ;

use crate::{ Config, MalformedClassPolicy };
use crate::class_file::{ ClassFormatError, ClassUnit };
use crate::stripper::{ self, MarkerPredicate };
use crate::transform::TransformChain ;

mod entry_comments ;



const CLASS_SUFFIX: &str = ".class" ;

#[derive( Error, Debug )]
pub enum PipelineError {
    #[error( "Failed to open '{}': {1}", .0.display() )]
    File( PathBuf, std::io::Error ),
    #[error( "I/O error: {0}" )]
    Io( #[from] std::io::Error ),
    #[error( "Archive error: {0}" )]
    Archive( #[from] ZipError ),
    #[error( "Transformed class '{entry}' is malformed: {source}" )]
    MalformedClass { entry: String, source: ClassFormatError },
    #[error( "Processing time cannot be stored in an archive: {0}" )]
    Timestamp( #[from] DateTimeRangeError ),
    #[error( "Failed to write entry comments: {0}" )]
    EntryComments( &'static str ),
}

/// Outcome of one pipeline run.
#[derive( Debug, Clone, Default, PartialEq, Eq )]
pub struct ProcessingReport {
    entries: usize,
    transformed: Vec<String>,
    malformed: Vec<String>,
}

impl ProcessingReport {
    /// Number of entries written to the output archive.
    #[inline] pub fn entries( &self ) -> usize { self.entries }
    /// Dotted names of the classes the chain changed, in archive order.
    #[inline] pub fn transformed( &self ) -> &[String] { &self.transformed }
    /// Dotted names of changed classes that failed to parse and were written unmodified.
    #[inline] pub fn malformed( &self ) -> &[String] { &self.malformed }
}

/// Runs a [`TransformChain`] over every class of an archive.
#[derive( Debug )]
pub struct ArchivePipeline<'a> {
    chain: &'a TransformChain,
    predicate: MarkerPredicate,
    policy: MalformedClassPolicy,
}

impl<'a> ArchivePipeline<'a> {

    pub fn new( config: &Config, chain: &'a TransformChain ) -> Self {
        Self {
            chain,
            predicate: config.marker_predicate(),
            policy: config.malformed_class_policy,
        }
    }

    /// Processes the archive in `reader` and writes the result to `writer`.
    ///
    /// # Errors
    /// Any read or write failure is fatal. Nothing reaches `writer` until the
    /// whole archive has been assembled. A changed class that fails to parse
    /// is fatal under [`MalformedClassPolicy::Abort`].
    pub fn process<R, W>( &self, reader: R, mut writer: W ) -> Result<ProcessingReport, PipelineError>
    where
        R: Read + Seek,
        W: Write,
    {

        let mut archive = ZipArchive::new( reader )?;
        let mut output = ZipWriter::new( Cursor::new( Vec::new() ));
        let mut comments = Vec::with_capacity( archive.len() );
        let timestamp = zip::DateTime::try_from( chrono::Local::now().naive_local() )?;
        let mut report = ProcessingReport::default();

        for index in 0..archive.len() {

            let entry = archive.by_index_raw( index )?;
            comments.push( entry.comment().as_bytes().to_vec() );
            if entry.is_dir() || !entry.name().ends_with( CLASS_SUFFIX ) {
                debug!( entry = entry.name(), "Copying entry" );
                output.raw_copy_file( entry )?;
                report.entries += 1 ;
                continue ;
            }
            drop( entry );

            let mut entry = archive.by_index( index )?;
            let entry_name = entry.name().to_string();
            let mut original = Vec::new();
            entry.read_to_end( &mut original )?;

            let mut options = SimpleFileOptions::default()
                .compression_method( match entry.compression() {
                    CompressionMethod::Stored => CompressionMethod::Stored,
                    _ => CompressionMethod::Deflated,
                })
                .last_modified_time( timestamp );
            if let Some( mode ) = entry.unix_mode() { options = options.unix_permissions( mode ) }
            drop( entry );

            let bytes = self.process_class( &entry_name, original, &mut report )?;
            output.start_file( entry_name.as_str(), options )?;
            output.write_all( &bytes )?;
            report.entries += 1 ;

        }

        if !archive.comment().is_empty() {
            output.set_comment( String::from_utf8_lossy( archive.comment() ).into_owned() );
        }
        let bytes = entry_comments::restore( output.finish()?.into_inner(), &comments )
            .map_err( PipelineError::EntryComments )?;
        writer.write_all( &bytes )?;
        writer.flush()?;

        info!(
            entries = report.entries,
            transformed = report.transformed.len(),
            malformed = report.malformed.len(),
            "Processed archive",
        );
        Ok( report )

    }

    /// [`ArchivePipeline::process`] between two files; `output` is created or truncated.
    ///
    /// # Errors
    /// As [`ArchivePipeline::process`], plus [`PipelineError::File`] when either
    /// file cannot be opened.
    pub fn process_files( &self, input: &Path, output: &Path ) -> Result<ProcessingReport, PipelineError> {
        let reader = File::open( input ).map_err(| err | PipelineError::File( input.to_path_buf(), err ))?;
        let writer = File::create( output ).map_err(| err | PipelineError::File( output.to_path_buf(), err ))?;
        self.process( BufReader::new( reader ), BufWriter::new( writer ))
    }

    fn process_class( &self, entry_name: &str, original: Vec<u8>, report: &mut ProcessingReport ) -> Result<Vec<u8>, PipelineError> {

        let class_name = class_name_of( entry_name );
        let transformed = self.chain.apply( &class_name, original.clone() );
        if transformed == original { return Ok( original ) }

        match ClassUnit::parse( &transformed ) {
            Ok( unit ) => {
                info!( "Transformed {class_name}" );
                report.transformed.push( class_name );
                Ok( stripper::strip( unit, &self.predicate ).to_bytes() )
            },
            Err( err ) => match self.policy {
                MalformedClassPolicy::Abort => Err( PipelineError::MalformedClass { entry: entry_name.to_string(), source: err }),
                MalformedClassPolicy::PassThrough => {
                    warn!( entry = entry_name, error = %err, "Transformed class is malformed, keeping the original bytes" );
                    report.malformed.push( class_name );
                    Ok( original )
                },
            },
        }

    }

}

/// `com/example/Widget.class` -> `com.example.Widget`
fn class_name_of( entry_name: &str ) -> String {
    entry_name.strip_suffix( CLASS_SUFFIX ).unwrap_or( entry_name ).replace( '/', "." )
}

#[cfg( test )]
mod tests {
    use super::class_name_of ;

    #[test]
    fn derives_dotted_class_names() {
        assert_eq!( class_name_of( "com/example/Widget.class" ), "com.example.Widget" );
        assert_eq!( class_name_of( "Root.class" ), "Root" );
        assert_eq!( class_name_of( "com/example/Outer$Inner.class" ), "com.example.Outer$Inner" );
    }
}

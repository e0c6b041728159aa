use std::fs::File ;
use std::io::Read ;
use std::path::{ Path, PathBuf };
use itertools::Itertools ;
use thiserror::Error ;

use crate::utils::PartialSuccess ;
use super::{ DescriptorError, ModuleDescriptor };



/// Name of the descriptor entry inside a module archive.
pub const DESCRIPTOR_ENTRY: &str = "mod.json" ;

/// Failure to obtain descriptors from one module file.
#[derive( Error, Debug )]
pub enum LoadDescriptorError {
    #[error( "Failed to read '{}': {1}", .0.display() )]
    Io( PathBuf, std::io::Error ),
    #[error( "Failed to open module archive '{}': {1}", .0.display() )]
    Archive( PathBuf, zip::result::ZipError ),
    #[error( "Module archive '{}' contains no {}", .0.display(), DESCRIPTOR_ENTRY )]
    MissingDescriptor( PathBuf ),
    #[error( "In '{}': {1}", .0.display() )]
    Malformed( PathBuf, DescriptorError ),
}

/// Loads every descriptor found in `paths`.
///
/// A path ending in `.json` is read as a descriptor document; any other path is
/// opened as a module archive and its [`DESCRIPTOR_ENTRY`] is read. A document
/// may hold a single descriptor or an array of them.
///
/// # Partial Success
/// Failures are collected per file (or per array element) and returned next to
/// the descriptors that did load; one bad module never hides the others.
pub fn load_descriptors<P: AsRef<Path>>(
    paths: impl IntoIterator<Item = P>,
) -> PartialSuccess<Vec<ModuleDescriptor>, LoadDescriptorError> {
    paths.into_iter()
        .flat_map(| path | load_file( path.as_ref() ))
        .partition_result()
}

fn load_file( path: &Path ) -> Vec<Result<ModuleDescriptor, LoadDescriptorError>> {

    let text = match read_descriptor_text( path ) {
        Ok( text ) => text,
        Err( err ) => return vec![ Err( err ) ],
    };

    let descriptors = ModuleDescriptor::parse_document( &text ).into_iter()
        .map(| result | result.map_err(| err | LoadDescriptorError::Malformed( path.to_path_buf(), err )))
        .collect::<Vec<_>>();
    tracing::debug!( "Read {} descriptor(s) from {}", descriptors.len(), path.display() );
    descriptors

}

fn read_descriptor_text( path: &Path ) -> Result<String, LoadDescriptorError> {

    let is_json = path.extension().is_some_and(| extension | extension.eq_ignore_ascii_case( "json" ));
    if is_json {
        return std::fs::read_to_string( path ).map_err(| err | LoadDescriptorError::Io( path.to_path_buf(), err ));
    }

    let file = File::open( path ).map_err(| err | LoadDescriptorError::Io( path.to_path_buf(), err ))?;
    let mut archive = zip::ZipArchive::new( file )
        .map_err(| err | LoadDescriptorError::Archive( path.to_path_buf(), err ))?;
    let mut entry = match archive.by_name( DESCRIPTOR_ENTRY ) {
        Ok( entry ) => entry,
        Err( zip::result::ZipError::FileNotFound ) => return Err( LoadDescriptorError::MissingDescriptor( path.to_path_buf() )),
        Err( err ) => return Err( LoadDescriptorError::Archive( path.to_path_buf(), err )),
    };

    let mut text = String::new();
    entry.read_to_string( &mut text ).map_err(| err | LoadDescriptorError::Io( path.to_path_buf(), err ))?;
    Ok( text )

}

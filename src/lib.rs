//! Dependency resolution and class baking for modular JVM plugin ecosystems.
//!
//! `mod_link` covers the two offline steps of preparing a set of mods for a game
//! or application:
//!
//! - **Resolution**: every mod ships a JSON [`ModuleDescriptor`] declaring its id,
//! 	version and dependencies with semver ranges. [`resolve`] validates the whole
//! 	set against the active [`Side`] and produces a deterministic load order, or
//! 	every problem it found at once.
//!
//! - **Baking**: an [`ArchivePipeline`] runs a [`TransformChain`] over every class
//! 	of a jar. Classes the chain changed are parsed into a
//! 	[`class_file::ClassUnit`], stripped of the bookkeeping annotations the
//! 	transformers injected (see [`stripper`]) and written back, everything else
//! 	is copied through untouched.
//!
//! # Example
//!
//! ```
//! use mod_link::{ Config, ModuleDescriptor, resolve };
//!
//! let descriptors = ModuleDescriptor::parse_document( r#"[
//! 	{ "id": "core", "group": "net.example", "version": "2.1.0" },
//! 	{ "id": "addon", "group": "net.example", "version": "1.0.0", "dependencies": {
//! 		"core": { "version": [ ">=2.0.0" ] }
//! 	}}
//! ]"# ).into_iter().collect::<Result<Vec<_>, _>>().unwrap();
//!
//! let resolution = resolve( descriptors, &Config::default() ).unwrap();
//! assert_eq!( resolution.ids(), vec![ "core", "addon" ]);
//! ```
//!
//! # Configuration
//!
//! All behaviour that is not fixed by the formats themselves lives in one
//! [`Config`] value passed by reference to [`resolve`] and [`ArchivePipeline::new`].

mod side ;
mod utils ;
pub mod version ;
pub mod descriptor ;
pub mod resolver ;
pub mod class_file ;
pub mod transform ;
pub mod stripper ;
pub mod pipeline ;
pub mod config ;

#[doc( no_inline )]
pub use nonempty_collections::NEVec ;
#[doc( no_inline )]
pub use semver::Version ;

pub use side::Side ;
pub use utils::PartialSuccess ;
pub use config::{ Config, MalformedClassPolicy };
pub use descriptor::{ ModuleDescriptor, Dependency, Person, DescriptorError, load_descriptors };
pub use resolver::{ resolve, Resolution, ResolveError };
pub use transform::{ Transformer, TransformChain };
pub use pipeline::{ ArchivePipeline, ProcessingReport, PipelineError };

use std::path::PathBuf ;
use std::process::ExitCode ;
use anyhow::{ Context, Result, bail };
use clap::{ CommandFactory, Parser };
use tracing::{ info, warn };
use tracing_subscriber::{ EnvFilter, layer::SubscriberExt, util::SubscriberInitExt };

use mod_link::{ ArchivePipeline, Config, MalformedClassPolicy, Side, TransformChain, load_descriptors, resolve };



/// Resolve a set of mods and bake a jar through the registered class transformers.
#[derive( Parser, Debug )]
#[command( name = "mod-link", version )]
struct Cli {

    /// Mapping file made available to transformers
    #[arg( short = 'm', long = "mappings", value_name = "MAPPING_FILE" )]
    mappings: Option<PathBuf>,

    /// Environment to resolve for (client, server or universal)
    #[arg( long )]
    side: Option<Side>,

    /// TOML configuration file; flags override its values
    #[arg( long, value_name = "FILE" )]
    config: Option<PathBuf>,

    /// Keep the original bytes of transformed classes that fail to parse
    #[arg( long )]
    tolerant: bool,

    /// Log at debug level
    #[arg( short, long )]
    verbose: bool,

    /// <input-jar> <output-jar> <module-files...>
    #[arg( value_name = "PATHS" )]
    paths: Vec<PathBuf>,

}

fn main() -> Result<ExitCode> {

    let cli = Cli::parse();
    let [ input, output, modules @ .. ] = cli.paths.as_slice() else { return usage() };
    if modules.is_empty() { return usage() }

    init_logging( cli.verbose );
    let config = build_config( &cli )?;

    let ( descriptors, load_errors ) = load_descriptors( modules );
    load_errors.iter().for_each(| err | warn!( "{}", err ));

    let resolution = match resolve( descriptors, &config ) {
        Ok( resolution ) => resolution,
        Err( errors ) => {
            errors.into_iter().for_each(| err | eprintln!( "{}", err ));
            return Ok( ExitCode::FAILURE );
        },
    };
    info!( "Load order: {}", resolution.ids().join( ", " ));

    let chain = TransformChain::new();
    let report = ArchivePipeline::new( &config, &chain )
        .process_files( input, output )
        .with_context(|| format!( "Failed to process '{}'", input.display() ))?;
    info!( "Wrote {} entries to '{}' ({} transformed)", report.entries(), output.display(), report.transformed().len() );

    Ok( ExitCode::SUCCESS )

}

fn usage() -> Result<ExitCode> {
    println!( "{}", Cli::command().render_usage() );
    Ok( ExitCode::SUCCESS )
}

fn init_logging( verbose: bool ) {
    let filter = match verbose {
        true => EnvFilter::new( "debug" ),
        false => EnvFilter::try_from_default_env().unwrap_or_else(| _ | EnvFilter::new( "info" )),
    };
    tracing_subscriber::registry()
        .with( filter )
        .with( tracing_subscriber::fmt::layer().with_writer( std::io::stderr ))
        .init();
}

fn build_config( cli: &Cli ) -> Result<Config> {

    let mut config = match &cli.config {
        Some( path ) => Config::from_file( path )?,
        None => Config::default(),
    };

    if let Some( side ) = cli.side { config.side = side }
    if cli.tolerant { config.malformed_class_policy = MalformedClassPolicy::PassThrough }
    if let Some( mappings ) = &cli.mappings { config.mappings = Some( mappings.clone() ) }

    if let Some( mappings ) = &config.mappings {
        if !mappings.is_file() { bail!( "Mapping file '{}' does not exist", mappings.display() ) }
    }

    Ok( config )

}

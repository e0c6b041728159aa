use std::borrow::Cow ;
use std::collections::BTreeSet ;

use super::{ ClassFormatError, MAGIC, MIN_MAJOR_VERSION };
use super::annotation::Annotation ;
use super::attribute::{ Attribute, Visibility };
use super::constant_pool::{ Constant, ConstantPool };
use super::reader::ByteReader ;
use super::writer::{ WriteBytes, count_u16 };



/// A parsed class file.
///
/// ```
/// # use mod_link::class_file::{ ClassUnit, ClassFormatError };
/// let err = ClassUnit::parse( &[ 0xDE, 0xAD, 0xBE, 0xEF ]).unwrap_err();
/// assert_eq!( err, ClassFormatError::BadMagic( 0xDEAD_BEEF ));
/// ```
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct ClassUnit {
    minor_version: u16,
    major_version: u16,
    constant_pool: ConstantPool,
    access_flags: u16,
    this_class: u16,
    super_class: u16,
    interfaces: Vec<u16>,
    fields: Vec<Member>,
    methods: Vec<Member>,
    attributes: Vec<Attribute>,
}

/// A field or a method.
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct Member {
    access_flags: u16,
    name_index: u16,
    descriptor_index: u16,
    attributes: Vec<Attribute>,
}

/// The part of a class an annotation mutation applies to.
#[derive( Debug, Clone, Copy, PartialEq, Eq )]
pub enum Scope {
    Class,
    Field( usize ),
    Method( usize ),
}

impl ClassUnit {

    /// Parses a complete class file.
    ///
    /// # Errors
    /// Fails on a bad header, a truncated table, an index pointing at the wrong
    /// kind of constant, an annotation attribute whose declared length disagrees
    /// with its contents, or bytes left over after the last attribute.
    pub fn parse( bytes: &[u8] ) -> Result<Self, ClassFormatError> {

        let mut reader = ByteReader::new( bytes );

        let magic = reader.u32()?;
        if magic != MAGIC { return Err( ClassFormatError::BadMagic( magic )) }
        let minor_version = reader.u16()?;
        let major_version = reader.u16()?;
        if major_version < MIN_MAJOR_VERSION {
            return Err( ClassFormatError::UnsupportedVersion { major: major_version, minor: minor_version });
        }

        let constant_pool = ConstantPool::read( &mut reader )?;
        let access_flags = reader.u16()?;
        let this_class = reader.u16()?;
        constant_pool.expect_class( this_class, "this_class" )?;
        let super_class = reader.u16()?;
        if super_class != 0 { constant_pool.expect_class( super_class, "super_class" )?; }

        let interface_count = reader.u16()?;
        let interfaces = ( 0..interface_count )
            .map(| _ | {
                let index = reader.u16()?;
                constant_pool.expect_class( index, "interface" )?;
                Ok( index )
            })
            .collect::<Result<Vec<_>, ClassFormatError>>()?;

        let fields = read_members( &mut reader, &constant_pool )?;
        let methods = read_members( &mut reader, &constant_pool )?;
        let attributes = read_attributes( &mut reader, &constant_pool )?;

        if reader.remaining() != 0 { return Err( ClassFormatError::TrailingBytes( reader.remaining() )) }

        Ok( Self {
            minor_version,
            major_version,
            constant_pool,
            access_flags,
            this_class,
            super_class,
            interfaces,
            fields,
            methods,
            attributes,
        })

    }

    /// Serializes the unit back to class file bytes.
    pub fn to_bytes( &self ) -> Vec<u8> {
        let mut out = Vec::new();
        out.put_u32( MAGIC );
        out.put_u16( self.minor_version );
        out.put_u16( self.major_version );
        self.constant_pool.write( &mut out );
        out.put_u16( self.access_flags );
        out.put_u16( self.this_class );
        out.put_u16( self.super_class );
        out.put_u16( count_u16( self.interfaces.len() ));
        self.interfaces.iter().for_each(| index | out.put_u16( *index ));
        write_members( &self.fields, &mut out );
        write_members( &self.methods, &mut out );
        write_attributes( &self.attributes, &mut out );
        out
    }

    #[inline] pub fn minor_version( &self ) -> u16 { self.minor_version }
    #[inline] pub fn major_version( &self ) -> u16 { self.major_version }
    #[inline] pub fn access_flags( &self ) -> u16 { self.access_flags }
    #[inline] pub fn constant_pool( &self ) -> &ConstantPool { &self.constant_pool }
    #[inline] pub fn constant_pool_mut( &mut self ) -> &mut ConstantPool { &mut self.constant_pool }
    #[inline] pub fn interfaces( &self ) -> &[u16] { &self.interfaces }
    #[inline] pub fn fields( &self ) -> &[Member] { &self.fields }
    #[inline] pub fn methods( &self ) -> &[Member] { &self.methods }
    #[inline] pub fn fields_mut( &mut self ) -> &mut [Member] { &mut self.fields }
    #[inline] pub fn methods_mut( &mut self ) -> &mut [Member] { &mut self.methods }
    #[inline] pub fn attributes( &self ) -> &[Attribute] { &self.attributes }

    /// Internal name of this class, such as `com/example/Widget`.
    pub fn class_name( &self ) -> Option<Cow<'_, str>> {
        match self.constant_pool.get( self.this_class )? {
            Constant::Class { name_index } => self.constant_pool.utf8( *name_index ),
            _ => None,
        }
    }

    /// Annotations declared on the class itself.
    pub fn annotations( &self ) -> impl Iterator<Item = ( Visibility, &Annotation )> {
        annotations_of( &self.attributes )
    }

    /// Removes every annotation in `scope` whose type descriptor satisfies
    /// `predicate` and returns the removed annotations in their original order.
    /// Annotation attributes left empty are dropped. A scope index out of range
    /// removes nothing.
    pub fn remove_annotations_matching<P>( &mut self, scope: Scope, predicate: P ) -> Vec<Annotation>
    where
        P: Fn( &str ) -> bool,
    {
        let pool = &self.constant_pool ;
        match scope {
            Scope::Class => remove_matching( &mut self.attributes, pool, &predicate ),
            Scope::Field( index ) => self.fields.get_mut( index )
                .map(| field | field.remove_annotations_matching( pool, &predicate ))
                .unwrap_or_default(),
            Scope::Method( index ) => self.methods.get_mut( index )
                .map(| method | method.remove_annotations_matching( pool, &predicate ))
                .unwrap_or_default(),
        }
    }

    /// Adds `annotation` to the annotation attribute of the given visibility in
    /// `scope`, creating the attribute (and its name constant) when missing.
    ///
    /// # Errors
    /// Fails when the annotation points at constants this unit does not have,
    /// when `scope` is out of range, or when a table would overflow.
    pub fn add_annotation( &mut self, scope: Scope, visibility: Visibility, annotation: Annotation ) -> Result<(), ClassFormatError> {

        annotation.constant_references().into_iter()
            .try_for_each(| index | self.constant_pool.expect_any( index, "annotation" ))?;

        let has_attribute = self.attributes_in( scope )?.iter()
            .any(| attribute | matches!( attribute, Attribute::Annotations { visibility: v, .. } if *v == visibility ));
        let name_index = match has_attribute {
            true => 0,
            false => self.constant_pool.intern_utf8( visibility.attribute_name() )?,
        };

        let attributes = self.attributes_in_mut( scope )?;
        let existing = attributes.iter_mut().find_map(| attribute | match attribute {
            Attribute::Annotations { visibility: v, annotations, .. } if *v == visibility => Some( annotations ),
            _ => None,
        });
        match existing {
            Some( annotations ) => { push_bounded( annotations, annotation, "annotations" )?; },
            None => { push_bounded( attributes, Attribute::Annotations { name_index, visibility, annotations: vec![ annotation ] }, "attributes" )?; },
        }
        Ok(())

    }

    /// Appends a field and returns its position.
    ///
    /// # Errors
    /// Fails when the field's name or descriptor is not a `Utf8` constant of
    /// this unit, or when the class already holds the maximum number of fields.
    pub fn push_field( &mut self, field: Member ) -> Result<usize, ClassFormatError> {
        field.validate( &self.constant_pool )?;
        push_bounded( &mut self.fields, field, "fields" )
    }

    /// Appends a method and returns its position.
    ///
    /// # Errors
    /// Same conditions as [`ClassUnit::push_field`].
    pub fn push_method( &mut self, method: Member ) -> Result<usize, ClassFormatError> {
        method.validate( &self.constant_pool )?;
        push_bounded( &mut self.methods, method, "methods" )
    }

    pub fn remove_field( &mut self, index: usize ) -> Option<Member> {
        ( index < self.fields.len() ).then(|| self.fields.remove( index ))
    }

    pub fn remove_method( &mut self, index: usize ) -> Option<Member> {
        ( index < self.methods.len() ).then(|| self.methods.remove( index ))
    }

    /// Pops entries off the end of the constant pool for as long as the last
    /// one is listed in `candidates` and nothing in the unit may still refer to
    /// it. Returns the number of entries removed.
    ///
    /// Opaque attribute bodies are not decoded: any occurrence of the index as
    /// a big-endian `u16` inside one counts as a reference.
    pub fn pop_unused_constants( &mut self, candidates: &BTreeSet<u16> ) -> usize {
        let referenced = self.structural_references();
        let mentioned = self.opaque_mentions();
        let mut popped = 0 ;
        while let Some( index ) = self.constant_pool.last_index() {
            let unused = candidates.contains( &index )
                && !referenced.contains( &index )
                && !mentioned.contains( &index );
            if !unused || self.constant_pool.pop_last().is_none() { break }
            popped += 1 ;
        }
        popped
    }

    fn attributes_in( &self, scope: Scope ) -> Result<&Vec<Attribute>, ClassFormatError> {
        let attributes = match scope {
            Scope::Class => Some( &self.attributes ),
            Scope::Field( index ) => self.fields.get( index ).map(| member | &member.attributes ),
            Scope::Method( index ) => self.methods.get( index ).map(| member | &member.attributes ),
        };
        attributes.ok_or_else(|| scope_error( scope ))
    }

    fn attributes_in_mut( &mut self, scope: Scope ) -> Result<&mut Vec<Attribute>, ClassFormatError> {
        let attributes = match scope {
            Scope::Class => Some( &mut self.attributes ),
            Scope::Field( index ) => self.fields.get_mut( index ).map(| member | &mut member.attributes ),
            Scope::Method( index ) => self.methods.get_mut( index ).map(| member | &mut member.attributes ),
        };
        attributes.ok_or_else(|| scope_error( scope ))
    }

    /// Every constant index reached through decoded structure.
    fn structural_references( &self ) -> BTreeSet<u16> {
        let mut references = BTreeSet::from([ self.this_class, self.super_class ]);
        references.extend( &self.interfaces );
        references.extend( self.constant_pool.iter().flat_map(|( _, constant )| constant.references() ));
        self.fields.iter().chain( &self.methods ).for_each(| member | {
            references.extend([ member.name_index, member.descriptor_index ]);
            attribute_references( &member.attributes, &mut references );
        });
        attribute_references( &self.attributes, &mut references );
        references
    }

    /// Every big-endian `u16` found at any offset of an opaque attribute body.
    fn opaque_mentions( &self ) -> BTreeSet<u16> {
        self.attributes.iter()
            .chain( self.fields.iter().chain( &self.methods ).flat_map(| member | &member.attributes ))
            .filter_map(| attribute | match attribute {
                Attribute::Opaque { info, .. } => Some( info.as_slice() ),
                Attribute::Annotations { .. } => None,
            })
            .flat_map(| body | body.windows( 2 ).map(| window | u16::from_be_bytes([ window[ 0 ], window[ 1 ]])))
            .collect()
    }

}

impl Member {

    pub fn new( access_flags: u16, name_index: u16, descriptor_index: u16, attributes: Vec<Attribute> ) -> Self {
        Self { access_flags, name_index, descriptor_index, attributes }
    }

    #[inline] pub fn access_flags( &self ) -> u16 { self.access_flags }
    #[inline] pub fn name_index( &self ) -> u16 { self.name_index }
    #[inline] pub fn descriptor_index( &self ) -> u16 { self.descriptor_index }
    #[inline] pub fn attributes( &self ) -> &[Attribute] { &self.attributes }

    #[inline] pub fn name<'p>( &self, pool: &'p ConstantPool ) -> Option<Cow<'p, str>> { pool.utf8( self.name_index ) }
    #[inline] pub fn descriptor<'p>( &self, pool: &'p ConstantPool ) -> Option<Cow<'p, str>> { pool.utf8( self.descriptor_index ) }

    pub fn annotations( &self ) -> impl Iterator<Item = ( Visibility, &Annotation )> {
        annotations_of( &self.attributes )
    }

    /// Member-level counterpart of [`ClassUnit::remove_annotations_matching`];
    /// `pool` must be the constant pool of the owning class.
    pub fn remove_annotations_matching<P>( &mut self, pool: &ConstantPool, predicate: P ) -> Vec<Annotation>
    where
        P: Fn( &str ) -> bool,
    {
        remove_matching( &mut self.attributes, pool, &predicate )
    }

    fn validate( &self, pool: &ConstantPool ) -> Result<(), ClassFormatError> {
        pool.expect_utf8( self.name_index, "member name" )?;
        pool.expect_utf8( self.descriptor_index, "member descriptor" )?;
        self.attributes.iter().try_for_each(| attribute | pool.expect_utf8( attribute.name_index(), "attribute name" ))
    }

    fn read( reader: &mut ByteReader<'_>, pool: &ConstantPool ) -> Result<Self, ClassFormatError> {
        let access_flags = reader.u16()?;
        let name_index = reader.u16()?;
        pool.expect_utf8( name_index, "member name" )?;
        let descriptor_index = reader.u16()?;
        pool.expect_utf8( descriptor_index, "member descriptor" )?;
        let attributes = read_attributes( reader, pool )?;
        Ok( Self { access_flags, name_index, descriptor_index, attributes })
    }

    fn write( &self, out: &mut Vec<u8> ) {
        out.put_u16( self.access_flags );
        out.put_u16( self.name_index );
        out.put_u16( self.descriptor_index );
        write_attributes( &self.attributes, out );
    }

}

fn read_members( reader: &mut ByteReader<'_>, pool: &ConstantPool ) -> Result<Vec<Member>, ClassFormatError> {
    let count = reader.u16()?;
    ( 0..count ).map(| _ | Member::read( reader, pool )).collect()
}

fn write_members( members: &[Member], out: &mut Vec<u8> ) {
    out.put_u16( count_u16( members.len() ));
    members.iter().for_each(| member | member.write( out ));
}

fn read_attributes( reader: &mut ByteReader<'_>, pool: &ConstantPool ) -> Result<Vec<Attribute>, ClassFormatError> {
    let count = reader.u16()?;
    ( 0..count ).map(| _ | Attribute::read( reader, pool )).collect()
}

fn write_attributes( attributes: &[Attribute], out: &mut Vec<u8> ) {
    out.put_u16( count_u16( attributes.len() ));
    attributes.iter().for_each(| attribute | attribute.write( out ));
}

fn scope_error( scope: Scope ) -> ClassFormatError {
    match scope {
        Scope::Class => ClassFormatError::NoSuchMember( "class", 0 ),
        Scope::Field( index ) => ClassFormatError::NoSuchMember( "field", index ),
        Scope::Method( index ) => ClassFormatError::NoSuchMember( "method", index ),
    }
}

fn push_bounded<T>( items: &mut Vec<T>, item: T, what: &'static str ) -> Result<usize, ClassFormatError> {
    if items.len() >= usize::from( u16::MAX ) { return Err( ClassFormatError::TooMany( what )) }
    items.push( item );
    Ok( items.len() - 1 )
}

fn annotations_of( attributes: &[Attribute] ) -> impl Iterator<Item = ( Visibility, &Annotation )> {
    attributes.iter().flat_map(| attribute | match attribute {
        Attribute::Annotations { visibility, annotations, .. } => annotations.iter().map(| annotation | ( *visibility, annotation )).collect(),
        Attribute::Opaque { .. } => Vec::with_capacity( 0 ),
    })
}

fn remove_matching( attributes: &mut Vec<Attribute>, pool: &ConstantPool, predicate: &dyn Fn( &str ) -> bool ) -> Vec<Annotation> {

    let matches = | annotation: &Annotation | annotation.type_descriptor( pool )
        .is_some_and(| descriptor | predicate( &descriptor ));

    let mut removed = Vec::new();
    attributes.retain_mut(| attribute | match attribute {
        Attribute::Annotations { annotations, .. } if !annotations.is_empty() => {
            let ( dropped, kept ) = std::mem::take( annotations ).into_iter().partition::<Vec<_>, _>( &matches );
            *annotations = kept ;
            removed.extend( dropped );
            !annotations.is_empty()
        },
        _ => true,
    });
    removed

}

fn attribute_references( attributes: &[Attribute], references: &mut BTreeSet<u16> ) {
    attributes.iter().for_each(| attribute | {
        references.insert( attribute.name_index() );
        if let Attribute::Annotations { annotations, .. } = attribute {
            references.extend( annotations.iter().flat_map( Annotation::constant_references ));
        }
    });
}

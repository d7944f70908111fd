//! Font construction
//!
//! Parsing walks the table directory, builds a view per table, parses the
//! required tables into their typed forms and runs the cross-table
//! consistency pass ('loca' entry width and count, 'hmtx' record count).
//! A font missing any required table is rejected; a font missing GSUB,
//! GPOS or GDEF is rejected as not advanced OpenType. Partially
//! constructed fonts are never exposed.

use log::warn;

use crate::error::Error;
use crate::layout::base::Base;
use crate::layout::gdef::Gdef;
use crate::layout::{LayoutKind, LayoutTable};
use crate::otff::{self, FontType, TableRecord};
use crate::table::Table;
use crate::tables::cmap::Cmap;
use crate::tables::glyf::Glyf;
use crate::tables::head::Head;
use crate::tables::hhea::Hhea;
use crate::tables::hmtx::Hmtx;
use crate::tables::kern::Kern;
use crate::tables::loca::Loca;
use crate::tables::maxp::Maxp;
use crate::tables::name::Name;
use crate::tables::os2::Os2;
use crate::tables::post::Post;
use crate::types::Tag;
use crate::view::View;

#[derive(Debug)]
pub struct Font<'otf> {
    buf: &'otf [u8],
    font_type: FontType,
    directory: Vec<TableRecord>,
    tables: Vec<(Tag, Table<'otf>)>,
    head: Head,
    hhea: Hhea,
    maxp: Maxp,
    os2: Os2,
    post: Post,
    name: Name<'otf>,
    cmap: Cmap<'otf>,
    hmtx: Hmtx<'otf>,
    loca: Option<Loca<'otf>>,
    glyf: Option<Glyf<'otf>>,
    kern: Option<Kern<'otf>>,
    gsub: LayoutTable<'otf>,
    gpos: LayoutTable<'otf>,
    gdef: Gdef<'otf>,
    base: Option<Base<'otf>>,
}

fn lookup<'otf>(tables: &[(Tag, Table<'otf>)], tag: Tag) -> Option<View<'otf>> {
    tables
        .iter()
        .find(|(table_tag, _)| *table_tag == tag)
        .map(|(_, table)| table.view())
}

impl<'otf> Font<'otf> {
    /// Parses a single SFNT font from `buf`.
    pub fn parse(buf: &'otf [u8]) -> Result<Font<'otf>, Error> {
        let (offset_table, directory) = otff::parse_directory(buf)?;
        let file = View::new(buf);

        let mut tables = Vec::with_capacity(directory.len());
        for record in &directory {
            let data = file.view(record.offset() as usize, record.length() as usize)?;
            tables.push((
                record.table_tag(),
                Table::new(
                    record.table_tag(),
                    record.checksum(),
                    record.offset() as usize,
                    record.length() as usize,
                    data,
                ),
            ));
        }

        let required = |tag: &[u8; 4]| -> Result<View<'otf>, Error> {
            lookup(&tables, Tag::new(tag)).ok_or_else(|| {
                Error::font_format(format!("required table '{}' missing", Tag::new(tag)))
            })
        };
        let layout = |tag: &[u8; 4]| -> Result<View<'otf>, Error> {
            lookup(&tables, Tag::new(tag)).ok_or_else(|| {
                Error::font_format(format!(
                    "'{}' missing: not an advanced OpenType font",
                    Tag::new(tag)
                ))
            })
        };

        let head = Head::parse(required(b"head")?.bytes())?;
        let hhea = Hhea::parse(required(b"hhea")?.bytes())?;
        let maxp = Maxp::parse(required(b"maxp")?.bytes())?;
        let os2 = Os2::parse(required(b"OS/2")?)?;
        let post = Post::parse(required(b"post")?)?;
        let name = Name::parse(required(b"name")?)?;
        let cmap = Cmap::parse(required(b"cmap")?)?;
        let hmtx = Hmtx::parse(
            required(b"hmtx")?,
            hhea.number_of_h_metrics(),
            maxp.num_glyphs(),
        )?;

        let gsub = LayoutTable::parse(LayoutKind::Gsub, layout(b"GSUB")?)?;
        let gpos = LayoutTable::parse(LayoutKind::Gpos, layout(b"GPOS")?)?;
        let gdef = Gdef::parse(layout(b"GDEF")?)?;

        // loca inherits its entry width from 'head' and its count from
        // 'maxp'; both tables are required for TrueType outlines.
        let loca = match lookup(&tables, Tag::new(b"loca")) {
            Some(data) => Some(Loca::parse(
                data,
                head.index_to_loc_format(),
                maxp.num_glyphs(),
            )?),
            None => None,
        };
        let glyf = lookup(&tables, Tag::new(b"glyf")).map(Glyf::new);

        let kern = match lookup(&tables, Tag::new(b"kern")) {
            Some(data) => match Kern::parse(data) {
                Ok(kern) => Some(kern),
                Err(err) => {
                    warn!("ignoring 'kern' table: {}", err);
                    None
                }
            },
            None => None,
        };
        let base = match lookup(&tables, Tag::new(b"BASE")) {
            Some(data) => match Base::parse(data) {
                Ok(base) => Some(base),
                Err(err) => {
                    warn!("ignoring 'BASE' table: {}", err);
                    None
                }
            },
            None => None,
        };

        Ok(Font {
            buf,
            font_type: offset_table.font_type(),
            directory,
            tables,
            head,
            hhea,
            maxp,
            os2,
            post,
            name,
            cmap,
            hmtx,
            loca,
            glyf,
            kern,
            gsub,
            gpos,
            gdef,
            base,
        })
    }

    pub fn font_type(&self) -> FontType {
        self.font_type
    }

    pub fn bytes(&self) -> &'otf [u8] {
        self.buf
    }

    pub fn directory(&self) -> &[TableRecord] {
        &self.directory
    }

    /// The table carrying `tag`, interpreted or not.
    pub fn table(&self, tag: Tag) -> Option<&Table<'otf>> {
        self.tables
            .iter()
            .find(|(table_tag, _)| *table_tag == tag)
            .map(|(_, table)| table)
    }

    /// All table tags, in directory (ascending) order.
    pub fn table_tags(&self) -> Vec<Tag> {
        self.tables.iter().map(|(tag, _)| *tag).collect()
    }

    pub fn glyph_count(&self) -> u16 {
        self.maxp.num_glyphs()
    }

    pub fn units_per_em(&self) -> u16 {
        self.head.units_per_em()
    }

    pub fn head(&self) -> &Head {
        &self.head
    }

    pub fn hhea(&self) -> &Hhea {
        &self.hhea
    }

    pub fn maxp(&self) -> &Maxp {
        &self.maxp
    }

    pub fn os2(&self) -> &Os2 {
        &self.os2
    }

    pub fn post(&self) -> &Post {
        &self.post
    }

    pub fn name(&self) -> &Name<'otf> {
        &self.name
    }

    pub fn cmap(&self) -> &Cmap<'otf> {
        &self.cmap
    }

    pub fn hmtx(&self) -> &Hmtx<'otf> {
        &self.hmtx
    }

    pub fn loca(&self) -> Option<&Loca<'otf>> {
        self.loca.as_ref()
    }

    pub fn glyf(&self) -> Option<&Glyf<'otf>> {
        self.glyf.as_ref()
    }

    pub fn kern(&self) -> Option<&Kern<'otf>> {
        self.kern.as_ref()
    }

    pub fn gsub(&self) -> &LayoutTable<'otf> {
        &self.gsub
    }

    pub fn gpos(&self) -> &LayoutTable<'otf> {
        &self.gpos
    }

    pub fn gdef(&self) -> &Gdef<'otf> {
        &self.gdef
    }

    pub fn base(&self) -> Option<&Base<'otf>> {
        self.base.as_ref()
    }
}

//! OpenType layout tables (GSUB, GPOS, GDEF, BASE)
//!
//! GSUB and GPOS share a common skeleton: a versioned header pointing at a
//! script list, a feature list and a lookup list, all three navigated
//! through the tag-record and offset primitives in [`crate::nav`]. Versions
//! 1.0 and 1.1 are accepted; 1.1 adds a feature-variations offset that is
//! recorded but not interpreted.
//!
//! Lookups are parsed on first access and cached; each cache slot is
//! populated at most once, the first writer wins.

pub mod base;
pub mod classdef;
pub mod coverage;
pub mod gdef;
pub mod gpos;
pub mod gsub;

use std::fmt;
use std::sync::OnceLock;

use crate::error::Error;
use crate::nav::{Link, Navigator, TagRecordMap};
use crate::types::Tag;
use crate::view::View;

/// Feature index value marking "no mandatory feature" in a LangSys.
pub const NO_REQUIRED_FEATURE: u16 = 0xFFFF;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LayoutKind {
    Gsub,
    Gpos,
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LayoutKind::Gsub => write!(f, "GSUB"),
            LayoutKind::Gpos => write!(f, "GPOS"),
        }
    }
}

#[derive(Debug)]
pub struct LayoutTable<'otf> {
    kind: LayoutKind,
    data: View<'otf>,
    major: u16,
    minor: u16,
    script_list: TagRecordMap<'otf>,
    feature_list: TagRecordMap<'otf>,
    lookup_list: LookupList<'otf>,
    feature_variations: Option<u32>,
}

impl<'otf> LayoutTable<'otf> {
    pub fn parse(kind: LayoutKind, data: View<'otf>) -> Result<LayoutTable<'otf>, Error> {
        let major = data.u16(0)?;
        let minor = data.u16(2)?;
        if major != 1 || minor > 1 {
            return Err(Error::unsupported(format!(
                "{} version {}.{}",
                kind, major, minor
            )));
        }

        let script_list_offset = usize::from(data.u16(4)?);
        let feature_list_offset = usize::from(data.u16(6)?);
        let lookup_list_offset = usize::from(data.u16(8)?);
        let feature_variations = if minor >= 1 {
            Some(data.u32(10)?)
        } else {
            None
        };

        Ok(LayoutTable {
            kind,
            data,
            major,
            minor,
            script_list: TagRecordMap::new(data.tail(script_list_offset)?),
            feature_list: TagRecordMap::new(data.tail(feature_list_offset)?),
            lookup_list: LookupList::parse(data.tail(lookup_list_offset)?)?,
            feature_variations,
        })
    }

    pub fn kind(&self) -> LayoutKind {
        self.kind
    }

    pub fn version(&self) -> (u16, u16) {
        (self.major, self.minor)
    }

    pub fn feature_variations_offset(&self) -> Option<u32> {
        self.feature_variations
    }

    pub fn script_list(&self) -> &TagRecordMap<'otf> {
        &self.script_list
    }

    pub fn feature_list(&self) -> &TagRecordMap<'otf> {
        &self.feature_list
    }

    pub fn lookup_list(&self) -> &LookupList<'otf> {
        &self.lookup_list
    }

    /// The script list as a navigator map.
    pub fn scripts(&self) -> Navigator<'otf> {
        Navigator::Map(self.script_list)
    }

    pub fn script(&self, tag: Tag) -> Option<Script<'otf>> {
        let link = self.script_list.lookup_tag(tag);
        if link.is_null() {
            return None;
        }
        Some(Script::new(link.jump()))
    }

    /// Feature by its position in the feature list. Indexed access is
    /// authoritative when the list carries duplicate tags.
    pub fn feature_by_index(&self, index: u16) -> Option<Feature<'otf>> {
        let (tag, link) = self.feature_list.get(usize::from(index))?;
        if link.is_null() {
            return None;
        }
        Some(Feature {
            kind: self.kind,
            tag,
            index,
            data: link.jump(),
        })
    }

    /// First feature carrying `tag`.
    pub fn feature_by_tag(&self, tag: Tag) -> Option<Feature<'otf>> {
        (0..self.feature_list.len() as u16)
            .filter_map(|i| self.feature_by_index(i))
            .find(|feature| feature.tag() == tag)
    }

    pub fn lookup(&self, index: u16) -> Option<&Lookup<'otf>> {
        self.lookup_list.lookup(index)
    }
}

/// A script record: a link to the default language system plus a tag map of
/// the non-default ones.
#[derive(Debug, Copy, Clone)]
pub struct Script<'otf> {
    data: View<'otf>,
}

impl<'otf> Script<'otf> {
    pub fn new(data: View<'otf>) -> Script<'otf> {
        Script { data }
    }

    pub fn default_lang_sys(&self) -> Link<'otf> {
        let offset = self.data.u16(0).map(usize::from).unwrap_or(0);
        Link::named(self.data, offset, "LangSys")
    }

    pub fn lang_sys_map(&self) -> TagRecordMap<'otf> {
        TagRecordMap::with_offset(self.data, 2)
    }

    /// The default language system as a navigator link; void when the
    /// script only defines tagged language systems.
    pub fn navigator(&self) -> Navigator<'otf> {
        Navigator::Link(self.default_lang_sys())
    }

    /// Language system for `tag`, falling back to the default one.
    pub fn lang_sys(&self, tag: Tag) -> Option<LangSys<'otf>> {
        let link = self.lang_sys_map().lookup_tag(tag);
        let link = if link.is_null() {
            self.default_lang_sys()
        } else {
            link
        };
        if link.is_null() {
            return None;
        }
        Some(LangSys::new(link.jump()))
    }
}

/// A language system selects the features active for a (script, language)
/// pair. Exposed as a sequence whose element 0 is the mandatory feature
/// index (0xFFFF when there is none).
#[derive(Debug, Copy, Clone)]
pub struct LangSys<'otf> {
    data: View<'otf>,
}

impl<'otf> LangSys<'otf> {
    pub fn new(data: View<'otf>) -> LangSys<'otf> {
        LangSys { data }
    }

    pub fn required_feature_index(&self) -> u16 {
        self.data.u16(2).unwrap_or(NO_REQUIRED_FEATURE)
    }

    pub fn feature_index_count(&self) -> u16 {
        self.data.u16(4).unwrap_or(0)
    }

    pub fn feature_index(&self, i: u16) -> Option<u16> {
        if i >= self.feature_index_count() {
            return None;
        }
        self.data.u16(6 + usize::from(i) * 2).ok()
    }

    /// Element 0 is the mandatory feature index, the rest the LangSys
    /// feature indices in declared order.
    pub fn list(&self) -> Vec<u16> {
        let mut list = Vec::with_capacity(usize::from(self.feature_index_count()) + 1);
        list.push(self.required_feature_index());
        for i in 0..self.feature_index_count() {
            if let Some(index) = self.feature_index(i) {
                list.push(index);
            }
        }
        list
    }
}

/// A feature: an optional parameters link plus the lookup indices it
/// triggers, in declared order.
#[derive(Debug, Copy, Clone)]
pub struct Feature<'otf> {
    kind: LayoutKind,
    tag: Tag,
    index: u16,
    data: View<'otf>,
}

impl<'otf> Feature<'otf> {
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// The layout table this feature came from; GSUB features substitute,
    /// GPOS features position.
    pub fn kind(&self) -> LayoutKind {
        self.kind
    }

    /// Position in the feature list.
    pub fn index(&self) -> u16 {
        self.index
    }

    pub fn params_link(&self) -> Link<'otf> {
        let offset = self.data.u16(0).map(usize::from).unwrap_or(0);
        Link::named(self.data, offset, "FeatureParams")
    }

    pub fn lookup_index_count(&self) -> u16 {
        self.data.u16(2).unwrap_or(0)
    }

    pub fn lookup_index(&self, i: u16) -> Option<u16> {
        if i >= self.lookup_index_count() {
            return None;
        }
        self.data.u16(4 + usize::from(i) * 2).ok()
    }

    pub fn lookup_indices(&self) -> Vec<u16> {
        (0..self.lookup_index_count())
            .filter_map(|i| self.lookup_index(i))
            .collect()
    }
}

bitflags! {
    /// Lookup qualifiers shared by GSUB and GPOS.
    pub struct LookupFlag: u16 {
        const RIGHT_TO_LEFT = 0x0001;
        const IGNORE_BASE_GLYPHS = 0x0002;
        const IGNORE_LIGATURES = 0x0004;
        const IGNORE_MARKS = 0x0008;
        const USE_MARK_FILTERING_SET = 0x0010;
        const MARK_ATTACHMENT_TYPE_MASK = 0xFF00;
    }
}

/// A typed group of subtables implementing one feature-effect kind.
#[derive(Debug, Clone)]
pub struct Lookup<'otf> {
    lookup_type: u16,
    flag: LookupFlag,
    subtables: Vec<View<'otf>>,
    mark_filtering_set: Option<u16>,
}

impl<'otf> Lookup<'otf> {
    pub fn parse(data: View<'otf>) -> Result<Lookup<'otf>, Error> {
        let lookup_type = data.u16(0)?;
        let flag = LookupFlag::from_bits_truncate(data.u16(2)?);
        let count = usize::from(data.u16(4)?);

        let mut subtables = Vec::with_capacity(count);
        for i in 0..count {
            let offset = usize::from(data.u16(6 + i * 2)?);
            if offset == 0 {
                continue;
            }
            subtables.push(data.tail(offset)?);
        }

        let mark_filtering_set = if flag.contains(LookupFlag::USE_MARK_FILTERING_SET) {
            Some(data.u16(6 + count * 2)?)
        } else {
            None
        };

        Ok(Lookup {
            lookup_type,
            flag,
            subtables,
            mark_filtering_set,
        })
    }

    pub fn lookup_type(&self) -> u16 {
        self.lookup_type
    }

    pub fn flag(&self) -> LookupFlag {
        self.flag
    }

    /// Subtables in declared order; the first one that applies wins.
    pub fn subtables(&self) -> &[View<'otf>] {
        &self.subtables
    }

    pub fn mark_filtering_set(&self) -> Option<u16> {
        self.mark_filtering_set
    }
}

/// Array of offsets to lookups, parsed lazily and cached per slot.
#[derive(Debug)]
pub struct LookupList<'otf> {
    data: View<'otf>,
    count: usize,
    cache: Vec<OnceLock<Option<Lookup<'otf>>>>,
}

impl<'otf> LookupList<'otf> {
    pub fn parse(data: View<'otf>) -> Result<LookupList<'otf>, Error> {
        let count = usize::from(data.u16(0)?);
        data.view(2, count * 2)?;
        let cache = (0..count).map(|_| OnceLock::new()).collect();
        Ok(LookupList { data, count, cache })
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn lookup(&self, index: u16) -> Option<&Lookup<'otf>> {
        let slot = self.cache.get(usize::from(index))?;
        slot.get_or_init(|| {
            let offset = self.data.u16(2 + usize::from(index) * 2).ok()?;
            if offset == 0 {
                return None;
            }
            let data = self.data.tail(usize::from(offset)).ok()?;
            Lookup::parse(data).ok()
        })
        .as_ref()
    }
}

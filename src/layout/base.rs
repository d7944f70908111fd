//! Baseline Table
//!
//! BASE records baseline data per script along two axes. Either axis may be
//! absent. Each axis carries a list of baseline tags and a tag map of
//! per-script baseline records; the per-script records themselves are left
//! to baseline-aware clients.
//!
//! More information on ['BASE'](https://docs.microsoft.com/en-gb/typography/opentype/spec/base)

use crate::error::Error;
use crate::nav::TagRecordMap;
use crate::types::Tag;
use crate::view::View;

#[derive(Debug, Copy, Clone)]
pub struct BaseAxis<'otf> {
    data: View<'otf>,
}

impl<'otf> BaseAxis<'otf> {
    fn new(data: View<'otf>) -> BaseAxis<'otf> {
        BaseAxis { data }
    }

    /// Baseline tags in the axis order, e.g. `romn`, `hang`, `ideo`.
    pub fn base_tag_list(&self) -> Vec<Tag> {
        let offset = self.data.u16(0).map(usize::from).unwrap_or(0);
        if offset == 0 {
            return Vec::new();
        }
        let list = match self.data.tail(offset) {
            Ok(list) => list,
            Err(_) => return Vec::new(),
        };
        let count = list.u16(0).map(usize::from).unwrap_or(0);
        (0..count).filter_map(|i| list.tag(2 + i * 4).ok()).collect()
    }

    /// Per-script baseline records keyed by script tag.
    pub fn base_script_records(&self) -> TagRecordMap<'otf> {
        let offset = self.data.u16(2).map(usize::from).unwrap_or(0);
        if offset == 0 {
            return TagRecordMap::empty();
        }
        match self.data.tail(offset) {
            Ok(list) => TagRecordMap::new(list),
            Err(_) => TagRecordMap::empty(),
        }
    }
}

#[derive(Debug)]
pub struct Base<'otf> {
    horizontal: Option<BaseAxis<'otf>>,
    vertical: Option<BaseAxis<'otf>>,
}

impl<'otf> Base<'otf> {
    pub fn parse(data: View<'otf>) -> Result<Base<'otf>, Error> {
        let major = data.u16(0)?;
        let minor = data.u16(2)?;
        if major != 1 || minor > 1 {
            return Err(Error::unsupported(format!(
                "BASE version {}.{}",
                major, minor
            )));
        }

        let axis_at = |offset: usize| -> Option<BaseAxis<'otf>> {
            let offset = data.u16(offset).map(usize::from).unwrap_or(0);
            if offset == 0 {
                return None;
            }
            data.tail(offset).ok().map(BaseAxis::new)
        };

        Ok(Base {
            horizontal: axis_at(4),
            vertical: axis_at(6),
        })
    }

    pub fn horizontal(&self) -> Option<&BaseAxis<'otf>> {
        self.horizontal.as_ref()
    }

    pub fn vertical(&self) -> Option<&BaseAxis<'otf>> {
        self.vertical.as_ref()
    }
}

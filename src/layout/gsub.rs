//! Glyph substitution lookups
//!
//! Dispatch and application of the GSUB lookup subtable types: single (1),
//! multiple (2), alternate (3), ligature (4), sequence context (5), chained
//! sequence context (6) and extension (7). Application rewrites the caller's
//! glyph buffer in place; a subtable that does not match, or whose data is
//! malformed, reports `applied = false` and leaves the buffer untouched.
//!
//! Subtables within a lookup are tried in declared order and the first
//! successful one is the only one applied.

use log::warn;

use crate::layout::classdef::ClassDef;
use crate::layout::coverage::Coverage;
use crate::layout::LayoutTable;
use crate::nav::VarArray;
use crate::shape::GlyphBuffer;
use crate::tables::hmtx::Hmtx;
use crate::types::GlyphId;
use crate::view::View;

/// Nested context lookups deeper than this are dropped; real fonts stay
/// well below it and malformed ones must not recurse unbounded.
const MAX_NESTING: usize = 8;

/// Outcome of one subtable or lookup application.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Applied {
    pub applied: bool,
    /// Positions consumed at `pos` when applied.
    pub advance: usize,
}

impl Applied {
    pub fn none() -> Applied {
        Applied {
            applied: false,
            advance: 0,
        }
    }

    fn at(advance: usize) -> Applied {
        Applied {
            applied: true,
            advance,
        }
    }
}

pub(crate) struct ApplyContext<'a, 'otf> {
    pub layout: &'a LayoutTable<'otf>,
    pub hmtx: &'a Hmtx<'otf>,
}

/// Applies lookup `index` at `pos`: the first subtable that matches wins.
pub(crate) fn apply_lookup(
    ctx: &ApplyContext,
    index: u16,
    buffer: &mut GlyphBuffer,
    pos: usize,
    alt: i32,
    depth: usize,
) -> Applied {
    if depth > MAX_NESTING {
        warn!("contextual lookups nested deeper than {}, dropping", MAX_NESTING);
        return Applied::none();
    }
    let lookup = match ctx.layout.lookup(index) {
        Some(lookup) => lookup,
        None => return Applied::none(),
    };

    for subtable in lookup.subtables() {
        let result = apply_subtable(ctx, lookup.lookup_type(), *subtable, buffer, pos, alt, depth);
        if result.applied {
            return result;
        }
    }
    Applied::none()
}

/// Dispatches one subtable by lookup type.
pub(crate) fn apply_subtable(
    ctx: &ApplyContext,
    lookup_type: u16,
    subtable: View,
    buffer: &mut GlyphBuffer,
    pos: usize,
    alt: i32,
    depth: usize,
) -> Applied {
    let result = match lookup_type {
        1 => apply_single(ctx, subtable, buffer, pos),
        2 => apply_multiple(ctx, subtable, buffer, pos),
        3 => apply_alternate(ctx, subtable, buffer, pos, alt),
        4 => apply_ligature(ctx, subtable, buffer, pos),
        5 => apply_context(ctx, subtable, buffer, pos, depth),
        6 => apply_chained_context(ctx, subtable, buffer, pos, depth),
        7 => apply_extension(ctx, subtable, buffer, pos, alt, depth),
        _ => None,
    };
    result.unwrap_or_else(Applied::none)
}

fn coverage_at(subtable: View, offset_at: usize) -> Option<Coverage> {
    let offset = usize::from(subtable.u16(offset_at).ok()?);
    Coverage::parse(subtable.tail(offset).ok()?).ok()
}

/// Type 1: single substitution. Format 1 adds a delta to the covered glyph,
/// format 2 replaces it through a parallel substitute array.
fn apply_single(
    ctx: &ApplyContext,
    subtable: View,
    buffer: &mut GlyphBuffer,
    pos: usize,
) -> Option<Applied> {
    let glyph = buffer.glyph(pos)?;
    let format = subtable.u16(0).ok()?;
    let coverage = coverage_at(subtable, 2)?;
    let index = coverage.lookup(glyph)?;

    let substitute = match format {
        1 => {
            let delta = subtable.i16(4).ok()?;
            glyph.wrapping_add(delta as u16)
        }
        2 => {
            let count = subtable.u16(4).ok()?;
            if index >= count {
                return None;
            }
            subtable.u16(6 + usize::from(index) * 2).ok()?
        }
        _ => return None,
    };

    buffer.set_glyph(pos, substitute, ctx.hmtx);
    Some(Applied::at(1))
}

/// Type 2: one glyph replaced by a sequence (1:N).
fn apply_multiple(
    ctx: &ApplyContext,
    subtable: View,
    buffer: &mut GlyphBuffer,
    pos: usize,
) -> Option<Applied> {
    let glyph = buffer.glyph(pos)?;
    if subtable.u16(0).ok()? != 1 {
        return None;
    }
    let coverage = coverage_at(subtable, 2)?;
    let index = coverage.lookup(glyph)?;

    let sequence_count = usize::from(subtable.u16(4).ok()?);
    let sequences = VarArray::new(subtable, 6, sequence_count, 1);
    let sequence = sequences.get(usize::from(index), false);
    if sequence.is_empty() {
        return None;
    }

    let glyph_count = usize::from(sequence.u16(0).ok()?);
    if glyph_count == 0 {
        // a sequence may not be empty; leaving the buffer unchanged
        warn!("empty sequence in multiple substitution");
        return None;
    }
    let replacement: Vec<GlyphId> = (0..glyph_count)
        .map(|i| sequence.u16(2 + i * 2))
        .collect::<Result<_, _>>()
        .ok()?;

    buffer.splice(pos, pos + 1, &replacement, ctx.hmtx);
    Some(Applied::at(glyph_count))
}

/// Type 3: alternate substitution. `alt` selects from the alternate set,
/// clamped to its length; any negative value selects the last alternate.
fn apply_alternate(
    ctx: &ApplyContext,
    subtable: View,
    buffer: &mut GlyphBuffer,
    pos: usize,
    alt: i32,
) -> Option<Applied> {
    let glyph = buffer.glyph(pos)?;
    if subtable.u16(0).ok()? != 1 {
        return None;
    }
    let coverage = coverage_at(subtable, 2)?;
    let index = coverage.lookup(glyph)?;

    let set_count = usize::from(subtable.u16(4).ok()?);
    let sets = VarArray::new(subtable, 6, set_count, 1);
    let set = sets.get(usize::from(index), false);
    if set.is_empty() {
        return None;
    }

    let count = usize::from(set.u16(0).ok()?);
    if count == 0 {
        return None;
    }
    let choice = if alt < 0 {
        count - 1
    } else {
        (alt as usize).min(count - 1)
    };
    let substitute = set.u16(2 + choice * 2).ok()?;

    buffer.set_glyph(pos, substitute, ctx.hmtx);
    Some(Applied::at(1))
}

/// Type 4: ligature substitution (N:1). Ligatures of the covered first
/// glyph are tried in declared order; the first whose remaining components
/// match the following buffer glyphs replaces the whole run.
fn apply_ligature(
    ctx: &ApplyContext,
    subtable: View,
    buffer: &mut GlyphBuffer,
    pos: usize,
) -> Option<Applied> {
    let glyph = buffer.glyph(pos)?;
    if subtable.u16(0).ok()? != 1 {
        return None;
    }
    let coverage = coverage_at(subtable, 2)?;
    let index = coverage.lookup(glyph)?;

    let set_count = usize::from(subtable.u16(4).ok()?);
    let sets = VarArray::new(subtable, 6, set_count, 2);
    let ligatures = sets.nested(usize::from(index))?;

    'ligatures: for l in 0..ligatures.len() {
        let ligature = ligatures.get(l, false);
        let ligature_glyph = match ligature.u16(0) {
            Ok(ligature_glyph) => ligature_glyph,
            Err(_) => continue,
        };
        let component_count = match ligature.u16(2) {
            Ok(component_count) => usize::from(component_count),
            Err(_) => continue,
        };
        if component_count == 0 {
            continue;
        }

        for c in 1..component_count {
            let component = match ligature.u16(4 + (c - 1) * 2) {
                Ok(component) => component,
                Err(_) => continue 'ligatures,
            };
            if buffer.glyph(pos + c) != Some(component) {
                continue 'ligatures;
            }
        }

        buffer.splice(pos, pos + component_count, &[ligature_glyph], ctx.hmtx);
        return Some(Applied::at(1));
    }
    None
}

/// The coverage bundle of a format-3 (chained) sequence context.
#[derive(Debug)]
struct SequenceContext<'otf> {
    backtrack: Vec<Coverage<'otf>>,
    input: Vec<Coverage<'otf>>,
    lookahead: Vec<Coverage<'otf>>,
    /// Position of the sequence-lookup records within the subtable.
    records_at: usize,
    record_count: usize,
}

impl<'otf> SequenceContext<'otf> {
    fn coverages(
        subtable: View<'otf>,
        at: &mut usize,
        count: usize,
    ) -> Option<Vec<Coverage<'otf>>> {
        let mut list = Vec::with_capacity(count);
        for _ in 0..count {
            let offset = usize::from(subtable.u16(*at).ok()?);
            *at += 2;
            list.push(Coverage::parse(subtable.tail(offset).ok()?).ok()?);
        }
        Some(list)
    }

    /// Format 3 sequence context: input coverages only.
    fn parse_context(subtable: View<'otf>) -> Option<SequenceContext<'otf>> {
        let input_count = usize::from(subtable.u16(2).ok()?);
        let record_count = usize::from(subtable.u16(4).ok()?);
        let mut at = 6;
        let input = Self::coverages(subtable, &mut at, input_count)?;
        Some(SequenceContext {
            backtrack: Vec::new(),
            input,
            lookahead: Vec::new(),
            records_at: at,
            record_count,
        })
    }

    /// Format 3 chained sequence context: backtrack, input and lookahead.
    fn parse_chained(subtable: View<'otf>) -> Option<SequenceContext<'otf>> {
        let mut at = 2;
        let backtrack_count = usize::from(subtable.u16(at).ok()?);
        at += 2;
        let backtrack = Self::coverages(subtable, &mut at, backtrack_count)?;
        let input_count = usize::from(subtable.u16(at).ok()?);
        at += 2;
        let input = Self::coverages(subtable, &mut at, input_count)?;
        let lookahead_count = usize::from(subtable.u16(at).ok()?);
        at += 2;
        let lookahead = Self::coverages(subtable, &mut at, lookahead_count)?;
        let record_count = usize::from(subtable.u16(at).ok()?);
        at += 2;
        Some(SequenceContext {
            backtrack,
            input,
            lookahead,
            records_at: at,
            record_count,
        })
    }

    /// Whether the buffer around `pos` satisfies all three sequences.
    fn matches(&self, buffer: &GlyphBuffer, pos: usize) -> bool {
        for (i, coverage) in self.input.iter().enumerate() {
            match buffer.glyph(pos + i) {
                Some(glyph) if coverage.contains(glyph) => {}
                _ => return false,
            }
        }
        for (i, coverage) in self.backtrack.iter().enumerate() {
            let back = match pos.checked_sub(i + 1) {
                Some(back) => back,
                None => return false,
            };
            match buffer.glyph(back) {
                Some(glyph) if coverage.contains(glyph) => {}
                _ => return false,
            }
        }
        for (i, coverage) in self.lookahead.iter().enumerate() {
            match buffer.glyph(pos + self.input.len() + i) {
                Some(glyph) if coverage.contains(glyph) => {}
                _ => return false,
            }
        }
        true
    }
}

/// Applies the (sequenceIndex, lookupListIndex) records of a matched rule.
fn apply_sequence_records(
    ctx: &ApplyContext,
    rule: View,
    records_at: usize,
    record_count: usize,
    buffer: &mut GlyphBuffer,
    pos: usize,
    depth: usize,
) {
    for k in 0..record_count {
        let sequence_index = rule.u16(records_at + k * 4).map(usize::from).unwrap_or(0);
        let lookup_index = match rule.u16(records_at + k * 4 + 2) {
            Ok(lookup_index) => lookup_index,
            Err(_) => return,
        };
        apply_lookup(ctx, lookup_index, buffer, pos + sequence_index, 0, depth + 1);
    }
}

/// Glyphs of a rule's input sequence matched by identity, or classes matched
/// through a class definition.
fn rule_sequence_matches(
    rule: View,
    at: usize,
    count: usize,
    buffer: &GlyphBuffer,
    start: usize,
    class_def: Option<&ClassDef>,
) -> bool {
    for j in 0..count {
        let expected = match rule.u16(at + j * 2) {
            Ok(expected) => expected,
            Err(_) => return false,
        };
        let glyph = match buffer.glyph(start + j) {
            Some(glyph) => glyph,
            None => return false,
        };
        let actual = match class_def {
            Some(class_def) => class_def.class(glyph),
            None => glyph,
        };
        if actual != expected {
            return false;
        }
    }
    true
}

/// Type 5: sequence context, formats 1 (by glyph), 2 (by class) and
/// 3 (by coverage).
fn apply_context(
    ctx: &ApplyContext,
    subtable: View,
    buffer: &mut GlyphBuffer,
    pos: usize,
    depth: usize,
) -> Option<Applied> {
    let glyph = buffer.glyph(pos)?;
    let format = subtable.u16(0).ok()?;
    match format {
        1 | 2 => {
            let coverage = coverage_at(subtable, 2)?;
            coverage.lookup(glyph)?;

            let (class_def, set_index, sets_at) = if format == 2 {
                let class_def_offset = usize::from(subtable.u16(4).ok()?);
                let class_def = ClassDef::parse(subtable.tail(class_def_offset).ok()?).ok()?;
                let class = class_def.class(glyph);
                (Some(class_def), usize::from(class), 8)
            } else {
                (None, usize::from(coverage.lookup(glyph)?), 6)
            };

            let set_count = usize::from(subtable.u16(sets_at - 2).ok()?);
            let rule_sets = VarArray::new(subtable, sets_at, set_count, 2);
            let rules = rule_sets.nested(set_index)?;

            for r in 0..rules.len() {
                let rule = rules.get(r, false);
                let glyph_count = match rule.u16(0) {
                    Ok(glyph_count) => usize::from(glyph_count),
                    Err(_) => continue,
                };
                let record_count = match rule.u16(2) {
                    Ok(record_count) => usize::from(record_count),
                    Err(_) => continue,
                };
                if glyph_count == 0 {
                    continue;
                }
                if !rule_sequence_matches(
                    rule,
                    4,
                    glyph_count - 1,
                    buffer,
                    pos + 1,
                    class_def.as_ref(),
                ) {
                    continue;
                }

                let records_at = 4 + (glyph_count - 1) * 2;
                apply_sequence_records(ctx, rule, records_at, record_count, buffer, pos, depth);
                return Some(Applied::at(glyph_count));
            }
            None
        }
        3 => {
            let context = SequenceContext::parse_context(subtable)?;
            if context.input.is_empty() || !context.matches(buffer, pos) {
                return None;
            }
            let input_len = context.input.len();
            apply_sequence_records(
                ctx,
                subtable,
                context.records_at,
                context.record_count,
                buffer,
                pos,
                depth,
            );
            Some(Applied::at(input_len))
        }
        _ => None,
    }
}

/// Type 6: chained sequence context; the input match additionally requires
/// backtrack and lookahead sequences around it.
fn apply_chained_context(
    ctx: &ApplyContext,
    subtable: View,
    buffer: &mut GlyphBuffer,
    pos: usize,
    depth: usize,
) -> Option<Applied> {
    let glyph = buffer.glyph(pos)?;
    let format = subtable.u16(0).ok()?;
    match format {
        1 | 2 => {
            let coverage = coverage_at(subtable, 2)?;
            coverage.lookup(glyph)?;

            let (class_defs, set_index, sets_at) = if format == 2 {
                let backtrack_def =
                    ClassDef::parse(subtable.tail(usize::from(subtable.u16(4).ok()?)).ok()?).ok()?;
                let input_def =
                    ClassDef::parse(subtable.tail(usize::from(subtable.u16(6).ok()?)).ok()?).ok()?;
                let lookahead_def =
                    ClassDef::parse(subtable.tail(usize::from(subtable.u16(8).ok()?)).ok()?).ok()?;
                let class = input_def.class(glyph);
                (
                    Some((backtrack_def, input_def, lookahead_def)),
                    usize::from(class),
                    12,
                )
            } else {
                (None, usize::from(coverage.lookup(glyph)?), 6)
            };

            let set_count = usize::from(subtable.u16(sets_at - 2).ok()?);
            let rule_sets = VarArray::new(subtable, sets_at, set_count, 2);
            let rules = rule_sets.nested(set_index)?;

            for r in 0..rules.len() {
                let rule = rules.get(r, false);
                if let Some(applied) =
                    try_chained_rule(ctx, rule, class_defs.as_ref(), buffer, pos, depth)
                {
                    return Some(applied);
                }
            }
            None
        }
        3 => {
            let context = SequenceContext::parse_chained(subtable)?;
            if context.input.is_empty() || !context.matches(buffer, pos) {
                return None;
            }
            let input_len = context.input.len();
            apply_sequence_records(
                ctx,
                subtable,
                context.records_at,
                context.record_count,
                buffer,
                pos,
                depth,
            );
            Some(Applied::at(input_len))
        }
        _ => None,
    }
}

/// One chained rule: backtrack (reversed), input tail and lookahead, then
/// the nested records.
fn try_chained_rule(
    ctx: &ApplyContext,
    rule: View,
    class_defs: Option<&(ClassDef, ClassDef, ClassDef)>,
    buffer: &mut GlyphBuffer,
    pos: usize,
    depth: usize,
) -> Option<Applied> {
    let mut at = 0usize;
    let backtrack_count = usize::from(rule.u16(at).ok()?);
    at += 2;
    for j in 0..backtrack_count {
        let expected = rule.u16(at + j * 2).ok()?;
        let back = pos.checked_sub(j + 1)?;
        let glyph = buffer.glyph(back)?;
        let actual = match class_defs {
            Some((backtrack_def, _, _)) => backtrack_def.class(glyph),
            None => glyph,
        };
        if actual != expected {
            return None;
        }
    }
    at += backtrack_count * 2;

    let input_count = usize::from(rule.u16(at).ok()?);
    if input_count == 0 {
        return None;
    }
    at += 2;
    for j in 0..input_count - 1 {
        let expected = rule.u16(at + j * 2).ok()?;
        let glyph = buffer.glyph(pos + 1 + j)?;
        let actual = match class_defs {
            Some((_, input_def, _)) => input_def.class(glyph),
            None => glyph,
        };
        if actual != expected {
            return None;
        }
    }
    at += (input_count - 1) * 2;

    let lookahead_count = usize::from(rule.u16(at).ok()?);
    at += 2;
    for j in 0..lookahead_count {
        let expected = rule.u16(at + j * 2).ok()?;
        let glyph = buffer.glyph(pos + input_count + j)?;
        let actual = match class_defs {
            Some((_, _, lookahead_def)) => lookahead_def.class(glyph),
            None => glyph,
        };
        if actual != expected {
            return None;
        }
    }
    at += lookahead_count * 2;

    let record_count = usize::from(rule.u16(at).ok()?);
    at += 2;
    apply_sequence_records(ctx, rule, at, record_count, buffer, pos, depth);
    Some(Applied::at(input_count))
}

/// Type 7: extension. The 32-bit offset reaches subtables beyond 16-bit
/// range; the embedded type replaces the lookup type. Reentrant extensions
/// are rejected.
fn apply_extension(
    ctx: &ApplyContext,
    subtable: View,
    buffer: &mut GlyphBuffer,
    pos: usize,
    alt: i32,
    depth: usize,
) -> Option<Applied> {
    if subtable.u16(0).ok()? != 1 {
        return None;
    }
    let embedded_type = subtable.u16(2).ok()?;
    if embedded_type == 7 {
        warn!("reentrant extension subtable rejected");
        return None;
    }
    let offset = subtable.u32(4).ok()? as usize;
    let target = subtable.tail(offset).ok()?;
    Some(apply_subtable(
        ctx,
        embedded_type,
        target,
        buffer,
        pos,
        alt,
        depth,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutKind;
    use crate::testutil;
    use crate::font::Font;

    fn with_font(test: impl FnOnce(&Font, &ApplyContext)) {
        let bytes = testutil::minimal_font();
        let font = Font::parse(&bytes).unwrap();
        let ctx = ApplyContext {
            layout: font.gsub(),
            hmtx: font.hmtx(),
        };
        test(&font, &ctx);
    }

    #[test]
    fn case_single_substitution_delta() {
        with_font(|font, ctx| {
            // lookup 0: coverage [2], delta +1
            let mut buffer = GlyphBuffer::from_glyphs(&[2], font.hmtx());
            let result = apply_lookup(ctx, 0, &mut buffer, 0, 0, 0);

            assert_eq!(result, Applied { applied: true, advance: 1 });
            assert_eq!(buffer.glyph_ids(), vec![3]);
            // the advance of the new glyph is refreshed
            assert_eq!(buffer.get(0).unwrap().advance, 400);
        });
    }

    #[test]
    fn case_single_substitution_not_covered() {
        with_font(|font, ctx| {
            let mut buffer = GlyphBuffer::from_glyphs(&[1], font.hmtx());
            let result = apply_lookup(ctx, 0, &mut buffer, 0, 0, 0);

            assert_eq!(result, Applied::none());
            assert_eq!(buffer.glyph_ids(), vec![1]);
        });
    }

    #[test]
    fn case_ligature_substitution() {
        with_font(|font, ctx| {
            // lookup 1: ligature e + U+0301 mark -> glyph 8
            let mut buffer = GlyphBuffer::from_glyphs(&[5, 7, 1], font.hmtx());
            let result = apply_lookup(ctx, 1, &mut buffer, 0, 0, 0);

            assert_eq!(result, Applied { applied: true, advance: 1 });
            assert_eq!(buffer.glyph_ids(), vec![8, 1]);
        });
    }

    #[test]
    fn case_ligature_component_mismatch() {
        with_font(|font, ctx| {
            let mut buffer = GlyphBuffer::from_glyphs(&[5, 1], font.hmtx());
            let result = apply_lookup(ctx, 1, &mut buffer, 0, 0, 0);

            assert_eq!(result, Applied::none());
            assert_eq!(buffer.glyph_ids(), vec![5, 1]);
        });
    }

    #[test]
    fn case_ligature_truncated_buffer() {
        with_font(|font, ctx| {
            // first glyph covered but no second glyph to match
            let mut buffer = GlyphBuffer::from_glyphs(&[5], font.hmtx());
            let result = apply_lookup(ctx, 1, &mut buffer, 0, 0, 0);

            assert_eq!(result, Applied::none());
        });
    }

    #[test]
    fn case_position_past_buffer() {
        with_font(|font, ctx| {
            let mut buffer = GlyphBuffer::from_glyphs(&[2], font.hmtx());
            let result = apply_lookup(ctx, 0, &mut buffer, 5, 0, 0);

            assert_eq!(result, Applied::none());
        });
    }

    #[test]
    fn case_multiple_substitution() {
        // A standalone multiple-substitution subtable: glyph 9 -> [1, 2]
        let mut subtable = Vec::new();
        subtable.extend_from_slice(&1u16.to_be_bytes()); // format
        subtable.extend_from_slice(&8u16.to_be_bytes()); // coverage offset
        subtable.extend_from_slice(&1u16.to_be_bytes()); // sequenceCount
        subtable.extend_from_slice(&14u16.to_be_bytes()); // sequence offset
        for v in [1u16, 1, 9] {
            subtable.extend_from_slice(&v.to_be_bytes()); // coverage fmt 1
        }
        for v in [2u16, 1, 2] {
            subtable.extend_from_slice(&v.to_be_bytes()); // sequence
        }

        with_font(|font, ctx| {
            let mut buffer = GlyphBuffer::from_glyphs(&[9, 4], font.hmtx());
            let result =
                apply_subtable(ctx, 2, View::new(&subtable), &mut buffer, 0, 0, 0);

            assert_eq!(result, Applied { applied: true, advance: 2 });
            assert_eq!(buffer.glyph_ids(), vec![1, 2, 4]);
        });
    }

    #[test]
    fn case_alternate_substitution_clamps() {
        // alternates of glyph 1: [2, 3]
        let mut subtable = Vec::new();
        subtable.extend_from_slice(&1u16.to_be_bytes());
        subtable.extend_from_slice(&8u16.to_be_bytes());
        subtable.extend_from_slice(&1u16.to_be_bytes());
        subtable.extend_from_slice(&14u16.to_be_bytes());
        for v in [1u16, 1, 1] {
            subtable.extend_from_slice(&v.to_be_bytes());
        }
        for v in [2u16, 2, 3] {
            subtable.extend_from_slice(&v.to_be_bytes());
        }

        with_font(|font, ctx| {
            let mut buffer = GlyphBuffer::from_glyphs(&[1], font.hmtx());
            let result = apply_subtable(ctx, 3, View::new(&subtable), &mut buffer, 0, 1, 0);
            assert!(result.applied);
            assert_eq!(buffer.glyph_ids(), vec![3]);

            // out of range clamps to the last alternate
            let mut buffer = GlyphBuffer::from_glyphs(&[1], font.hmtx());
            apply_subtable(ctx, 3, View::new(&subtable), &mut buffer, 0, 99, 0);
            assert_eq!(buffer.glyph_ids(), vec![3]);

            // -1 selects the last alternate
            let mut buffer = GlyphBuffer::from_glyphs(&[1], font.hmtx());
            apply_subtable(ctx, 3, View::new(&subtable), &mut buffer, 0, -1, 0);
            assert_eq!(buffer.glyph_ids(), vec![3]);

            let mut buffer = GlyphBuffer::from_glyphs(&[1], font.hmtx());
            apply_subtable(ctx, 3, View::new(&subtable), &mut buffer, 0, 0, 0);
            assert_eq!(buffer.glyph_ids(), vec![2]);
        });
    }

    #[test]
    fn case_context_format3() {
        // input [glyph 1][glyph 2], nested record applies lookup 0 at
        // sequence index 1 (the single substitution 2 -> 3).
        let mut subtable = Vec::new();
        subtable.extend_from_slice(&3u16.to_be_bytes()); // format
        subtable.extend_from_slice(&2u16.to_be_bytes()); // glyphCount
        subtable.extend_from_slice(&1u16.to_be_bytes()); // seqLookupCount
        subtable.extend_from_slice(&14u16.to_be_bytes()); // coverage[0]
        subtable.extend_from_slice(&20u16.to_be_bytes()); // coverage[1]
        subtable.extend_from_slice(&1u16.to_be_bytes()); // record: seqIndex 1
        subtable.extend_from_slice(&0u16.to_be_bytes()); // record: lookup 0
        for v in [1u16, 1, 1] {
            subtable.extend_from_slice(&v.to_be_bytes());
        }
        for v in [1u16, 1, 2] {
            subtable.extend_from_slice(&v.to_be_bytes());
        }

        with_font(|font, ctx| {
            let mut buffer = GlyphBuffer::from_glyphs(&[1, 2], font.hmtx());
            let result = apply_subtable(ctx, 5, View::new(&subtable), &mut buffer, 0, 0, 0);

            assert_eq!(result, Applied { applied: true, advance: 2 });
            assert_eq!(buffer.glyph_ids(), vec![1, 3]);

            // an input mismatch leaves the buffer alone
            let mut buffer = GlyphBuffer::from_glyphs(&[1, 4], font.hmtx());
            let result = apply_subtable(ctx, 5, View::new(&subtable), &mut buffer, 0, 0, 0);
            assert_eq!(result, Applied::none());
            assert_eq!(buffer.glyph_ids(), vec![1, 4]);
        });
    }

    #[test]
    fn case_context_format1() {
        // glyph 1 followed by glyph 2; nested record runs lookup 0 at
        // sequence index 1.
        let mut subtable = Vec::new();
        subtable.extend_from_slice(&1u16.to_be_bytes()); // format
        subtable.extend_from_slice(&8u16.to_be_bytes()); // coverage offset
        subtable.extend_from_slice(&1u16.to_be_bytes()); // seqRuleSetCount
        subtable.extend_from_slice(&14u16.to_be_bytes()); // rule set offset
        for v in [1u16, 1, 1] {
            subtable.extend_from_slice(&v.to_be_bytes()); // coverage [1]
        }
        for v in [1u16, 4] {
            subtable.extend_from_slice(&v.to_be_bytes()); // rule set
        }
        for v in [2u16, 1, 2, 1, 0] {
            subtable.extend_from_slice(&v.to_be_bytes()); // rule
        }

        with_font(|font, ctx| {
            let mut buffer = GlyphBuffer::from_glyphs(&[1, 2], font.hmtx());
            let result = apply_subtable(ctx, 5, View::new(&subtable), &mut buffer, 0, 0, 0);

            assert_eq!(result, Applied { applied: true, advance: 2 });
            assert_eq!(buffer.glyph_ids(), vec![1, 3]);

            let mut buffer = GlyphBuffer::from_glyphs(&[1, 4], font.hmtx());
            let result = apply_subtable(ctx, 5, View::new(&subtable), &mut buffer, 0, 0, 0);
            assert_eq!(result, Applied::none());
        });
    }

    #[test]
    fn case_context_format2_classes() {
        // class 1 (glyph 1) followed by class 2 (glyphs 2, 3); the rule set
        // for class 0 is a null offset.
        let mut subtable = Vec::new();
        subtable.extend_from_slice(&2u16.to_be_bytes()); // format
        subtable.extend_from_slice(&12u16.to_be_bytes()); // coverage offset
        subtable.extend_from_slice(&18u16.to_be_bytes()); // class def offset
        subtable.extend_from_slice(&2u16.to_be_bytes()); // classSeqRuleSetCount
        subtable.extend_from_slice(&0u16.to_be_bytes()); // rule set for class 0
        subtable.extend_from_slice(&32u16.to_be_bytes()); // rule set for class 1
        for v in [1u16, 1, 1] {
            subtable.extend_from_slice(&v.to_be_bytes()); // coverage [1]
        }
        for v in [1u16, 1, 4, 1, 2, 2, 0] {
            subtable.extend_from_slice(&v.to_be_bytes()); // classes of glyphs 1..4
        }
        for v in [1u16, 4] {
            subtable.extend_from_slice(&v.to_be_bytes()); // rule set
        }
        for v in [2u16, 1, 2, 1, 0] {
            subtable.extend_from_slice(&v.to_be_bytes()); // rule: classes [_, 2]
        }

        with_font(|font, ctx| {
            // glyph 3 is also class 2, so the same rule matches it
            let mut buffer = GlyphBuffer::from_glyphs(&[1, 3], font.hmtx());
            let result = apply_subtable(ctx, 5, View::new(&subtable), &mut buffer, 0, 0, 0);

            assert_eq!(result, Applied { applied: true, advance: 2 });

            // glyph 4 is class 0: the rule does not match
            let mut buffer = GlyphBuffer::from_glyphs(&[1, 4], font.hmtx());
            let result = apply_subtable(ctx, 5, View::new(&subtable), &mut buffer, 0, 0, 0);
            assert_eq!(result, Applied::none());
        });
    }

    #[test]
    fn case_chained_context_format1() {
        // backtrack glyph 1, input glyph 2, lookahead glyph 4; record runs
        // lookup 0 at the input position.
        let mut subtable = Vec::new();
        subtable.extend_from_slice(&1u16.to_be_bytes()); // format
        subtable.extend_from_slice(&8u16.to_be_bytes()); // coverage offset
        subtable.extend_from_slice(&1u16.to_be_bytes()); // chainedSeqRuleSetCount
        subtable.extend_from_slice(&14u16.to_be_bytes()); // rule set offset
        for v in [1u16, 1, 2] {
            subtable.extend_from_slice(&v.to_be_bytes()); // coverage [2]
        }
        for v in [1u16, 4] {
            subtable.extend_from_slice(&v.to_be_bytes()); // rule set
        }
        for v in [1u16, 1, 1, 1, 4, 1, 0, 0] {
            subtable.extend_from_slice(&v.to_be_bytes()); // chained rule
        }

        with_font(|font, ctx| {
            let mut buffer = GlyphBuffer::from_glyphs(&[1, 2, 4], font.hmtx());
            let result = apply_subtable(ctx, 6, View::new(&subtable), &mut buffer, 1, 0, 0);

            assert_eq!(result, Applied { applied: true, advance: 1 });
            assert_eq!(buffer.glyph_ids(), vec![1, 3, 4]);

            // wrong lookahead leaves the buffer alone
            let mut buffer = GlyphBuffer::from_glyphs(&[1, 2, 2], font.hmtx());
            let result = apply_subtable(ctx, 6, View::new(&subtable), &mut buffer, 1, 0, 0);
            assert_eq!(result, Applied::none());
        });
    }

    #[test]
    fn case_chained_context_format3() {
        // backtrack [glyph 1], input [glyph 2], lookahead [glyph 4];
        // nested record applies lookup 0 at index 0 (2 -> 3).
        let mut subtable = Vec::new();
        subtable.extend_from_slice(&3u16.to_be_bytes()); // format
        subtable.extend_from_slice(&1u16.to_be_bytes()); // backtrackGlyphCount
        subtable.extend_from_slice(&20u16.to_be_bytes()); // backtrack coverage
        subtable.extend_from_slice(&1u16.to_be_bytes()); // inputGlyphCount
        subtable.extend_from_slice(&26u16.to_be_bytes()); // input coverage
        subtable.extend_from_slice(&1u16.to_be_bytes()); // lookaheadGlyphCount
        subtable.extend_from_slice(&32u16.to_be_bytes()); // lookahead coverage
        subtable.extend_from_slice(&1u16.to_be_bytes()); // seqLookupCount
        subtable.extend_from_slice(&0u16.to_be_bytes()); // record: seqIndex 0
        subtable.extend_from_slice(&0u16.to_be_bytes()); // record: lookup 0
        for v in [1u16, 1, 1] {
            subtable.extend_from_slice(&v.to_be_bytes());
        }
        for v in [1u16, 1, 2] {
            subtable.extend_from_slice(&v.to_be_bytes());
        }
        for v in [1u16, 1, 4] {
            subtable.extend_from_slice(&v.to_be_bytes());
        }

        with_font(|font, ctx| {
            let mut buffer = GlyphBuffer::from_glyphs(&[1, 2, 4], font.hmtx());
            let result = apply_subtable(ctx, 6, View::new(&subtable), &mut buffer, 1, 0, 0);

            assert_eq!(result, Applied { applied: true, advance: 1 });
            assert_eq!(buffer.glyph_ids(), vec![1, 3, 4]);

            // missing backtrack glyph: no match at position 0
            let mut buffer = GlyphBuffer::from_glyphs(&[2, 4], font.hmtx());
            let result = apply_subtable(ctx, 6, View::new(&subtable), &mut buffer, 0, 0, 0);
            assert_eq!(result, Applied::none());
        });
    }

    #[test]
    fn case_extension_unwraps() {
        // extension wrapping the single substitution coverage [2], delta +1
        let mut subtable = Vec::new();
        subtable.extend_from_slice(&1u16.to_be_bytes()); // format
        subtable.extend_from_slice(&1u16.to_be_bytes()); // embedded type: single
        subtable.extend_from_slice(&8u32.to_be_bytes()); // 32-bit offset
        subtable.extend_from_slice(&1u16.to_be_bytes()); // single: format 1
        subtable.extend_from_slice(&6u16.to_be_bytes()); // coverage offset
        subtable.extend_from_slice(&1u16.to_be_bytes()); // delta +1
        for v in [1u16, 1, 2] {
            subtable.extend_from_slice(&v.to_be_bytes());
        }

        with_font(|font, ctx| {
            let mut buffer = GlyphBuffer::from_glyphs(&[2], font.hmtx());
            let result = apply_subtable(ctx, 7, View::new(&subtable), &mut buffer, 0, 0, 0);

            assert!(result.applied);
            assert_eq!(buffer.glyph_ids(), vec![3]);
        });
    }

    #[test]
    fn case_reentrant_extension_rejected() {
        let mut subtable = Vec::new();
        subtable.extend_from_slice(&1u16.to_be_bytes());
        subtable.extend_from_slice(&7u16.to_be_bytes()); // embedded type 7
        subtable.extend_from_slice(&8u32.to_be_bytes());

        with_font(|font, ctx| {
            let mut buffer = GlyphBuffer::from_glyphs(&[2], font.hmtx());
            let result = apply_subtable(ctx, 7, View::new(&subtable), &mut buffer, 0, 0, 0);

            assert_eq!(result, Applied::none());
            assert_eq!(buffer.glyph_ids(), vec![2]);
        });
    }

    #[test]
    fn case_layout_kind_recorded() {
        with_font(|font, _ctx| {
            assert_eq!(font.gsub().kind(), LayoutKind::Gsub);
        });
    }
}

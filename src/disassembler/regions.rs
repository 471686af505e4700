//! Exception-region reconstruction.
//!
//! The metadata side hands us a flat clause table; the listing needs nested
//! `.try` / `catch` / `filter` / `finally` blocks. Each clause contributes
//! begin/end markers keyed by byte offset, and the method emitter flushes a
//! offset's markers, in clause order, right before the instruction at that
//! offset.

use rustc_hash::FxHashMap;

use crate::metadata::{
    method::{ExceptionHandler, ExceptionHandlerFlags},
    typesystem::CilTypeRc,
};

/// What a marker opens or closes.
pub(crate) enum RegionKind {
    /// A protected block (`.try`)
    Try,
    /// A typed handler (`catch <type>`)
    Catch(Option<CilTypeRc>),
    /// The handler block following a filter; opens with a bare brace
    FilterCatch,
    /// A filter expression block (`filter`)
    Filter,
    /// A finally handler (`finally`)
    Finally,
    /// A fault handler (`fault`); shaped like finally but only runs on
    /// exceptional exit
    Fault,
}

/// One begin or end of a region at some byte offset.
pub(crate) struct RegionMarker {
    pub kind: RegionKind,
    /// True opens the block, false closes it
    pub begin: bool,
    /// The `[begin, end)` byte span of the whole region, used to recognize
    /// duplicate try blocks emitted by back-to-back filter clauses
    pub span: (u32, u32),
}

/// Byte offset to markers, in clause input order per offset.
pub(crate) type RegionMap = FxHashMap<u32, Vec<RegionMarker>>;

fn push(map: &mut RegionMap, offset: u32, kind: RegionKind, begin: bool, span: (u32, u32)) {
    map.entry(offset)
        .or_default()
        .push(RegionMarker { kind, begin, span });
}

fn has_try_begin(map: &RegionMap, span: (u32, u32)) -> bool {
    map.get(&span.0).is_some_and(|markers| {
        markers
            .iter()
            .any(|marker| matches!(marker.kind, RegionKind::Try) && marker.begin && marker.span == span)
    })
}

/// Turn the flat clause table into the per-offset marker map.
pub(crate) fn build_regions(handlers: &[ExceptionHandler]) -> RegionMap {
    let mut map = RegionMap::default();

    for handler in handlers {
        let try_span = (handler.try_offset, handler.try_offset + handler.try_length);
        let handler_span = (
            handler.handler_offset,
            handler.handler_offset + handler.handler_length,
        );

        if handler.flags.contains(ExceptionHandlerFlags::FILTER) {
            // Back-to-back filters over one try block share a single
            // `.try { }` pair
            if !has_try_begin(&map, try_span) {
                push(&mut map, try_span.0, RegionKind::Try, true, try_span);
                push(&mut map, try_span.1, RegionKind::Try, false, try_span);
            }

            let filter_span = (handler.filter_offset, handler.handler_offset);
            push(&mut map, filter_span.0, RegionKind::Filter, true, filter_span);
            push(&mut map, filter_span.1, RegionKind::Filter, false, filter_span);
            push(
                &mut map,
                handler_span.0,
                RegionKind::FilterCatch,
                true,
                handler_span,
            );
            push(
                &mut map,
                handler_span.1,
                RegionKind::FilterCatch,
                false,
                handler_span,
            );
            continue;
        }

        push(&mut map, try_span.0, RegionKind::Try, true, try_span);
        push(&mut map, try_span.1, RegionKind::Try, false, try_span);

        if handler.flags.contains(ExceptionHandlerFlags::FINALLY) {
            push(&mut map, handler_span.0, RegionKind::Finally, true, handler_span);
            push(&mut map, handler_span.1, RegionKind::Finally, false, handler_span);
        } else if handler.flags.contains(ExceptionHandlerFlags::FAULT) {
            push(&mut map, handler_span.0, RegionKind::Fault, true, handler_span);
            push(&mut map, handler_span.1, RegionKind::Fault, false, handler_span);
        } else {
            push(
                &mut map,
                handler_span.0,
                RegionKind::Catch(handler.handler.clone()),
                true,
                handler_span,
            );
            push(
                &mut map,
                handler_span.1,
                RegionKind::Catch(handler.handler.clone()),
                false,
                handler_span,
            );
        }
    }

    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clause(flags: ExceptionHandlerFlags, try_span: (u32, u32), handler_span: (u32, u32)) -> ExceptionHandler {
        ExceptionHandler {
            flags,
            try_offset: try_span.0,
            try_length: try_span.1 - try_span.0,
            handler_offset: handler_span.0,
            handler_length: handler_span.1 - handler_span.0,
            handler: None,
            filter_offset: 0,
        }
    }

    #[test]
    fn catch_clause_markers() {
        let handlers = [clause(ExceptionHandlerFlags::EXCEPTION, (0, 4), (4, 8))];
        let map = build_regions(&handlers);

        let begin_try = &map[&0];
        assert_eq!(begin_try.len(), 1);
        assert!(matches!(begin_try[0].kind, RegionKind::Try));
        assert!(begin_try[0].begin);

        // try end and catch begin share offset 4, try end first
        let at_four = &map[&4];
        assert_eq!(at_four.len(), 2);
        assert!(matches!(at_four[0].kind, RegionKind::Try));
        assert!(!at_four[0].begin);
        assert!(matches!(at_four[1].kind, RegionKind::Catch(_)));
        assert!(at_four[1].begin);

        let end_catch = &map[&8];
        assert!(matches!(end_catch[0].kind, RegionKind::Catch(_)));
        assert!(!end_catch[0].begin);
    }

    #[test]
    fn finally_clause_markers() {
        let handlers = [clause(ExceptionHandlerFlags::FINALLY, (0, 4), (4, 6))];
        let map = build_regions(&handlers);

        assert!(matches!(map[&4][1].kind, RegionKind::Finally));
        assert!(matches!(map[&6][0].kind, RegionKind::Finally));
    }

    #[test]
    fn fault_clause_markers() {
        let handlers = [clause(ExceptionHandlerFlags::FAULT, (0, 4), (4, 6))];
        let map = build_regions(&handlers);

        assert!(matches!(map[&4][1].kind, RegionKind::Fault));
    }

    #[test]
    fn filter_clause_markers() {
        let mut handler = clause(ExceptionHandlerFlags::FILTER, (0, 4), (8, 12));
        handler.filter_offset = 4;
        let map = build_regions(&[handler]);

        // filter begins at the filter expression
        assert!(matches!(map[&4][1].kind, RegionKind::Filter));
        assert!(map[&4][1].begin);
        // filter ends and the handler block opens at the handler offset
        let at_eight = &map[&8];
        assert!(matches!(at_eight[0].kind, RegionKind::Filter));
        assert!(!at_eight[0].begin);
        assert!(matches!(at_eight[1].kind, RegionKind::FilterCatch));
        assert!(at_eight[1].begin);
        assert!(matches!(map[&12][0].kind, RegionKind::FilterCatch));
    }

    #[test]
    fn back_to_back_filters_share_one_try() {
        let mut first = clause(ExceptionHandlerFlags::FILTER, (0, 4), (8, 12));
        first.filter_offset = 4;
        let mut second = clause(ExceptionHandlerFlags::FILTER, (0, 4), (16, 20));
        second.filter_offset = 12;

        let map = build_regions(&[first, second]);

        let try_begins = map[&0]
            .iter()
            .filter(|m| matches!(m.kind, RegionKind::Try) && m.begin)
            .count();
        assert_eq!(try_begins, 1);
    }

    #[test]
    fn distinct_filter_trys_are_kept() {
        let mut first = clause(ExceptionHandlerFlags::FILTER, (0, 4), (8, 12));
        first.filter_offset = 4;
        let mut second = clause(ExceptionHandlerFlags::FILTER, (0, 6), (16, 20));
        second.filter_offset = 12;

        let map = build_regions(&[first, second]);

        let try_begins = map[&0]
            .iter()
            .filter(|m| matches!(m.kind, RegionKind::Try) && m.begin)
            .count();
        assert_eq!(try_begins, 2);
    }

    #[test]
    fn clause_order_is_preserved_per_offset() {
        // Two catch clauses over the same try: markers stack in input order
        let handlers = [
            clause(ExceptionHandlerFlags::EXCEPTION, (0, 4), (4, 8)),
            clause(ExceptionHandlerFlags::EXCEPTION, (0, 4), (8, 12)),
        ];
        let map = build_regions(&handlers);

        let at_zero = &map[&0];
        assert_eq!(at_zero.len(), 2);
        assert!(at_zero.iter().all(|m| matches!(m.kind, RegionKind::Try) && m.begin));

        let at_eight = &map[&8];
        // first catch closes before the second opens
        assert!(matches!(at_eight[0].kind, RegionKind::Catch(_)));
        assert!(!at_eight[0].begin);
        assert!(matches!(at_eight[1].kind, RegionKind::Catch(_)));
        assert!(at_eight[1].begin);
    }
}

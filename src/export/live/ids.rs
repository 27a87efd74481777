use std::collections::HashMap;

use super::document::{Element, VALUE_ATTR};
use crate::export::ExportError;

/// Seed used when a template declares no `NextPointeeId`.
pub const FALLBACK_NEXT_ID: u64 = 30_000;

pub const ID_ATTR: &str = "Id";
/// Element whose `Value` points at another element's `Id`.
pub const POINTEE_REF: &str = "PointeeId";

/// Hands out object identifiers for a session document, one writer at a
/// time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }

    /// Start above both the declared next id and every id already in use.
    pub fn seeded(declared: Option<u64>, highest_in_use: Option<u64>) -> Self {
        let declared = declared.unwrap_or(FALLBACK_NEXT_ID);
        let above_used = highest_in_use.map_or(0, |h| h.saturating_add(1));
        Self::starting_at(declared.max(above_used))
    }

    /// Seed from a whole document: its `NextPointeeId` and its largest `Id`.
    pub fn for_document(root: &Element) -> Self {
        let declared = root
            .search("NextPointeeId")
            .and_then(|e| e.attr(VALUE_ATTR))
            .and_then(|v| v.parse().ok());
        Self::seeded(declared, highest_id(root))
    }

    /// Hand out the next id. Fails once the one after it could no longer be
    /// declared as the document's next free id.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<u64, ExportError> {
        let id = self.next;
        self.next = id.checked_add(1).ok_or(ExportError::IdsExhausted(id))?;
        Ok(id)
    }

    /// The value a document should declare as its next free id.
    pub fn current(&self) -> u64 {
        self.next
    }
}

/// Largest numeric `Id` attribute in the subtree.
pub fn highest_id(root: &Element) -> Option<u64> {
    root.iter()
        .filter_map(|e| e.attr(ID_ATTR)?.parse::<u64>().ok())
        .max()
}

/// Give every `Id` in the subtree a fresh identifier and repoint
/// `PointeeId` references that targeted ids inside the subtree. References
/// to ids outside it are left alone.
pub fn reassign_ids(
    subtree: &mut Element,
    ids: &mut IdAllocator,
) -> Result<HashMap<String, String>, ExportError> {
    let count = subtree.iter().filter(|e| e.attr(ID_ATTR).is_some()).count();
    let fresh_ids = (0..count)
        .map(|_| ids.next())
        .collect::<Result<Vec<u64>, _>>()?;
    let mut fresh_ids = fresh_ids.into_iter();

    let mut remap: HashMap<String, String> = HashMap::new();
    subtree.walk_mut(&mut |el| {
        let Some((_, value)) = el.attributes.iter_mut().find(|(k, _)| k == ID_ATTR) else {
            return;
        };
        if let Some(fresh) = fresh_ids.next() {
            let fresh = fresh.to_string();
            remap
                .entry(std::mem::replace(value, fresh.clone()))
                .or_insert(fresh);
        }
    });
    subtree.walk_mut(&mut |el| {
        if el.name != POINTEE_REF {
            return;
        }
        let target = el.attr(VALUE_ATTR).and_then(|old| remap.get(old)).cloned();
        if let Some(new) = target {
            el.set_attr(VALUE_ATTR, new);
        }
    });
    Ok(remap)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn track() -> Element {
        Element::new("AudioTrack")
            .attr_builder(ID_ATTR, 8)
            .child_builder(Element::with_value("LomId", 0))
            .child_builder(
                Element::new("AutomationTarget")
                    .attr_builder(ID_ATTR, 21)
                    .child_builder(Element::with_value("LockEnvelope", 0)),
            )
            .child_builder(
                Element::new("AutomationEnvelope")
                    .attr_builder(ID_ATTR, 0)
                    .child_builder(Element::with_value(POINTEE_REF, 21)),
            )
            .child_builder(Element::with_value(POINTEE_REF, 99))
    }

    #[test]
    fn next_counts_up() {
        let mut ids = IdAllocator::starting_at(5);
        assert_eq!(ids.next().unwrap(), 5);
        assert_eq!(ids.next().unwrap(), 6);
        assert_eq!(ids.current(), 7);
    }

    #[test]
    fn seed_takes_the_larger_bound() {
        assert_eq!(IdAllocator::seeded(None, None).current(), FALLBACK_NEXT_ID);
        assert_eq!(IdAllocator::seeded(Some(100), Some(40)).current(), 100);
        assert_eq!(IdAllocator::seeded(Some(10), Some(40)).current(), 41);
        assert_eq!(IdAllocator::seeded(None, Some(40_000)).current(), 40_001);
    }

    #[test]
    fn document_seed_reads_next_pointee_id() {
        let root = Element::new("Ableton").child_builder(
            Element::new("LiveSet")
                .child_builder(Element::with_value("NextPointeeId", 500))
                .child_builder(track()),
        );
        assert_eq!(IdAllocator::for_document(&root).current(), 500);
        assert_eq!(highest_id(&root), Some(21));
    }

    #[test]
    fn every_id_is_replaced_with_a_distinct_value() {
        let mut el = track();
        let mut ids = IdAllocator::starting_at(1000);
        reassign_ids(&mut el, &mut ids).unwrap();
        let seen: Vec<u64> = el
            .iter()
            .filter_map(|e| e.attr(ID_ATTR))
            .map(|v| v.parse().unwrap())
            .collect();
        assert_eq!(seen, vec![1000, 1001, 1002]);
        assert_eq!(seen.iter().collect::<HashSet<_>>().len(), seen.len());
        assert_eq!(ids.current(), 1003);
    }

    #[test]
    fn internal_references_follow_their_targets() {
        let mut el = track();
        let mut ids = IdAllocator::starting_at(1000);
        let remap = reassign_ids(&mut el, &mut ids).unwrap();
        assert_eq!(remap.get("21").map(String::as_str), Some("1001"));
        let inner = el.find("AutomationEnvelope/PointeeId").unwrap();
        assert_eq!(inner.attr(VALUE_ATTR), Some("1001"));
        // Points outside the clone.
        assert_eq!(el.value_of("PointeeId"), Some("99"));
    }

    #[test]
    fn clones_never_share_ids() {
        let mut ids = IdAllocator::starting_at(1);
        let mut a = track();
        let mut b = track();
        reassign_ids(&mut a, &mut ids).unwrap();
        reassign_ids(&mut b, &mut ids).unwrap();
        let all: Vec<&str> = a
            .iter()
            .chain(b.iter())
            .filter_map(|e| e.attr(ID_ATTR))
            .collect();
        assert_eq!(all.iter().collect::<HashSet<_>>().len(), 6);
    }

    #[test]
    fn exhausted_seed_is_an_error_not_a_wrap() {
        let root = Element::new("Ableton").child_builder(
            Element::new("LiveSet").child_builder(Element::with_value("NextPointeeId", u64::MAX)),
        );
        let mut ids = IdAllocator::for_document(&root);
        assert!(matches!(ids.next(), Err(ExportError::IdsExhausted(u64::MAX))));
        assert_eq!(ids.current(), u64::MAX);

        let mut near = IdAllocator::starting_at(u64::MAX - 1);
        assert_eq!(near.next().unwrap(), u64::MAX - 1);
        assert!(near.next().is_err());
    }

    #[test]
    fn reassign_fails_cleanly_when_ids_run_out() {
        let mut el = track();
        let mut ids = IdAllocator::starting_at(u64::MAX - 1);
        assert!(reassign_ids(&mut el, &mut ids).is_err());
        assert_eq!(el.attr(ID_ATTR), Some("8"));
    }
}

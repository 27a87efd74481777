//! Collapse overlapping recordings of one track into a single clip per
//! time region.

use crate::model::AudioFileRecord;

/// Group clips whose time ranges intersect.
///
/// Clips are stably sorted by start; a clip joins the running group when it
/// starts strictly before the group's furthest end, otherwise it opens a new
/// group. Ranges that merely touch do not overlap.
pub fn group_overlaps<'a>(clips: &[&'a AudioFileRecord]) -> Vec<Vec<&'a AudioFileRecord>> {
    let mut sorted = clips.to_vec();
    sorted.sort_by_key(|c| c.start_position_samples);

    let mut groups: Vec<Vec<&AudioFileRecord>> = Vec::new();
    let mut group_end = 0u64;

    for clip in sorted {
        match groups.last_mut() {
            Some(group) if clip.start_position_samples < group_end => {
                group.push(clip);
                group_end = group_end.max(clip.end_position_samples());
            }
            _ => {
                group_end = clip.end_position_samples();
                groups.push(vec![clip]);
            }
        }
    }
    groups
}

/// Choose the clip that represents an overlapping group.
///
/// Priority: the first comp, then the first bounce-in-place file, then the
/// highest take number (earliest in group order on ties).
pub fn pick_winner<'a>(group: &[&'a AudioFileRecord]) -> Option<&'a AudioFileRecord> {
    if let [only] = group {
        return Some(*only);
    }
    if let Some(comp) = group.iter().find(|c| c.is_comp) {
        return Some(*comp);
    }
    if let Some(bip) = group.iter().find(|c| c.is_bounce_in_place()) {
        return Some(*bip);
    }

    let mut best: Option<&AudioFileRecord> = None;
    for clip in group {
        let better = match best {
            None => true,
            Some(b) => clip.take_number > b.take_number,
        };
        if better {
            best = Some(*clip);
        }
    }
    best
}

/// Reduce a track's clips to one winner per overlapping group, in timeline
/// order. Non-overlapping clips all survive.
pub fn resolve_overlaps<'a>(clips: &[&'a AudioFileRecord]) -> Vec<&'a AudioFileRecord> {
    group_overlaps(clips)
        .iter()
        .filter_map(|group| pick_winner(group))
        .collect()
}

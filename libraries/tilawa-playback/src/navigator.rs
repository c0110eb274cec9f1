//! Grouped navigation over the physical queue
//!
//! A *group* is a maximal run of consecutive entries sharing one
//! `verse_key`. Next/previous always land on the first entry of a different
//! group, so repeated copies of a verse are skipped as one unit. Navigation is
//! a scan over positions that already exist; nothing is re-resolved or
//! rebuilt.

use tilawa_core::LogicalTrack;

/// First physical position of the group containing `index`
///
/// Returns `index` unchanged when it is out of bounds.
pub fn group_start(queue: &[LogicalTrack], index: usize) -> usize {
    let Some(current) = queue.get(index) else {
        return index;
    };

    let mut start = index;
    while start > 0 && queue[start - 1].same_verse(current) {
        start -= 1;
    }
    start
}

/// Start of the next group after the one containing `index`
///
/// Returns `None` when `index` is already in the last group (or out of
/// bounds); the caller must not advance.
pub fn next_group(queue: &[LogicalTrack], index: usize) -> Option<usize> {
    let current = queue.get(index)?;
    queue
        .iter()
        .enumerate()
        .skip(index + 1)
        .find(|(_, track)| !track.same_verse(current))
        .map(|(position, _)| position)
}

/// Start of the group before the one containing `index`
///
/// Returns `None` when the current group is the first in the queue (or
/// `index` is out of bounds). Callers then restart the current group from
/// [`group_start`] instead of doing nothing.
pub fn previous_group(queue: &[LogicalTrack], index: usize) -> Option<usize> {
    queue.get(index)?;

    let current_start = group_start(queue, index);
    if current_start == 0 {
        return None;
    }
    Some(group_start(queue, current_start - 1))
}

/// Start positions of every group, in queue order
pub fn group_starts(queue: &[LogicalTrack]) -> Vec<usize> {
    (0..queue.len())
        .filter(|&i| i == 0 || !queue[i].same_verse(&queue[i - 1]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilawa_core::VerseRef;

    fn queue(keys: &[&str]) -> Vec<LogicalTrack> {
        keys.iter()
            .map(|key| {
                let verse: VerseRef = key.parse().unwrap();
                LogicalTrack::new(verse, "url", *key, "Reciter")
            })
            .collect()
    }

    #[test]
    fn next_skips_repeated_copies() {
        let q = queue(&["1:1", "1:1", "1:2", "1:2", "1:3", "1:3"]);
        assert_eq!(next_group(&q, 0), Some(2));
        assert_eq!(next_group(&q, 1), Some(2));
        assert_eq!(next_group(&q, 2), Some(4));
        assert_eq!(next_group(&q, 4), None);
        assert_eq!(next_group(&q, 5), None);
    }

    #[test]
    fn previous_lands_on_group_start() {
        let q = queue(&["1:1", "1:1", "1:2", "1:2", "1:3", "1:3"]);
        assert_eq!(previous_group(&q, 4), Some(2));
        assert_eq!(previous_group(&q, 5), Some(2));
        assert_eq!(previous_group(&q, 3), Some(0));
        assert_eq!(previous_group(&q, 1), None);
        assert_eq!(previous_group(&q, 0), None);
    }

    #[test]
    fn repeat_all_layout_has_one_entry_groups() {
        let q = queue(&["1:1", "1:2", "1:1", "1:2"]);
        assert_eq!(next_group(&q, 1), Some(2));
        assert_eq!(previous_group(&q, 2), Some(1));
        assert_eq!(group_starts(&q), vec![0, 1, 2, 3]);
    }

    #[test]
    fn out_of_bounds_and_empty() {
        let empty: Vec<LogicalTrack> = Vec::new();
        assert_eq!(next_group(&empty, 0), None);
        assert_eq!(previous_group(&empty, 0), None);
        assert_eq!(group_start(&empty, 0), 0);
        assert!(group_starts(&empty).is_empty());

        let q = queue(&["1:1"]);
        assert_eq!(next_group(&q, 7), None);
        assert_eq!(previous_group(&q, 7), None);
    }

    #[test]
    fn group_start_walks_back_over_copies() {
        let q = queue(&["1:1", "1:2", "1:2", "1:2", "1:3"]);
        assert_eq!(group_start(&q, 3), 1);
        assert_eq!(group_start(&q, 1), 1);
        assert_eq!(group_start(&q, 4), 4);
        assert_eq!(group_starts(&q), vec![0, 1, 4]);
    }
}

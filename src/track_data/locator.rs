// Pure sector and corner-label lookups over a segment source

use itertools::Itertools;

use super::{SegmentRange, SegmentSource};

/// Result of a sector lookup. `number` is 1-based; 0 means the sample
/// could not be mapped (unknown track, out-of-range position, or an
/// unusable table). `count` is 0 whenever `number` is 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SectorLookup {
    pub number: usize,
    pub count: usize,
}

const UNMAPPED: SectorLookup = SectorLookup {
    number: 0,
    count: 0,
};

/// Label of the first range containing `pos`, or `None` for a blank or
/// unknown track id, a position outside [0, 1], or no matching range.
pub fn turn_label(
    source: &dyn SegmentSource,
    track_id: &str,
    pos: f64,
) -> Option<&'static str> {
    if track_id.trim().is_empty() || !(0.0..=1.0).contains(&pos) {
        return None;
    }

    source
        .segments(track_id)?
        .iter()
        .find(|range| range.contains(pos))
        .map(|range| range.label)
}

/// Sector number derivation from cumulative corner boundaries:
/// - Sector 1 is [0.0, end of range 1]
/// - Sector k is (end of range k-1, end of range k]
/// - positions past the last boundary belong to the final sector
///
/// Any table with a decreasing `end` is unusable for the whole track and
/// yields an unmapped result, as do blank/unknown track ids and
/// positions outside [0, 1].
pub fn sector_of(source: &dyn SegmentSource, track_id: &str, pos: f64) -> SectorLookup {
    if track_id.trim().is_empty() || !(0.0..=1.0).contains(&pos) {
        return UNMAPPED;
    }

    let Some(ranges) = source.segments(track_id) else {
        return UNMAPPED;
    };
    if ranges.is_empty() || !has_monotonic_boundaries(ranges) {
        return UNMAPPED;
    }

    let count = ranges.len();
    let mut prev_end = 0.0;
    for (i, range) in ranges.iter().enumerate() {
        let in_sector = if i == 0 {
            pos <= range.end
        } else {
            pos > prev_end && pos <= range.end
        };
        if in_sector {
            return SectorLookup {
                number: i + 1,
                count,
            };
        }
        prev_end = range.end;
    }

    SectorLookup {
        number: count,
        count,
    }
}

fn has_monotonic_boundaries(ranges: &[SegmentRange]) -> bool {
    ranges.iter().tuple_windows().all(|(a, b)| b.end >= a.end)
}

use std::cmp::Ordering;

use crate::{geometry::Viewport, types::ResolutionRequest};

/// Greedy shelf packing.
///
/// Requests are visited tallest first (then widest first) and placed left to
/// right along shelves, starting a new shelf whenever the current one runs out
/// of width. Returns `None` if the shelves run past the bottom of the atlas.
///
/// The returned viewports are in the same order as `requests`.
pub(crate) fn shelf_pack(
    requests: &[ResolutionRequest],
    atlas_size: (f32, f32),
) -> Option<Vec<Viewport>> {
    // Only the order is sorted; `requests` stays in reservation order. The
    // sort must be stable: punctual lights with the same resolution are
    // rendered in the order they were reserved.
    let mut order: Vec<usize> = (0..requests.len()).collect();
    order.sort_by(|&a, &b| descending_by_size(&requests[a], &requests[b]));

    let mut viewports = vec![Viewport::default(); requests.len()];

    let mut cur_x = 0.0f32;
    let mut cur_y = 0.0f32;
    let mut cur_h = 0.0f32;

    for index in order {
        let (width, height) = requests[index].size;

        if cur_x + width > atlas_size.0 {
            cur_x = 0.0;
            cur_y += cur_h;
            cur_h = height;
        }

        cur_h = cur_h.max(height);

        // A request wider than the atlas would land out of bounds even on a
        // fresh shelf.
        if cur_y + cur_h > atlas_size.1 || width > atlas_size.0 {
            log::trace!(
                "Request {} ({}x{}) overflowed the atlas at shelf y = {}",
                index,
                width,
                height,
                cur_y
            );

            return None;
        }

        viewports[index] = Viewport::new(cur_x, cur_y, width, height);
        cur_x += width;
    }

    Some(viewports)
}

/// Packs requests into a roughly square region of unbounded size.
///
/// Requests are taken in reservation order. Packing alternates between a
/// column placed to the right of everything so far, filled top to bottom until
/// it reaches the current bottom edge, and a row placed below everything so
/// far, filled left to right until it reaches the current right edge. Both
/// strips hold at least one request.
///
/// Returns the viewports in request order along with the size of the region
/// they cover.
pub(crate) fn square_pack(requests: &[ResolutionRequest]) -> (Vec<Viewport>, (f32, f32)) {
    let count = requests.len();
    let mut viewports = Vec::with_capacity(count);

    let mut index = 0;

    // Right and bottom edges of the packed region.
    let mut max_x = 0.0f32;
    let mut max_y = 0.0f32;

    // Furthest extents reached by any row or column so far.
    let mut reached_x = 0.0f32;
    let mut reached_y = 0.0f32;

    while index < count {
        let mut y = 0.0f32;
        let mut column_max_x = max_x;

        loop {
            let (width, height) = requests[index].size;
            viewports.push(Viewport::new(max_x, y, width, height));

            y += height;
            reached_y = reached_y.max(y);
            column_max_x = column_max_x.max(max_x + width);
            index += 1;

            if y >= max_y || index >= count {
                break;
            }
        }

        max_y = max_y.max(reached_y);
        max_x = column_max_x;

        if index >= count {
            break;
        }

        let mut x = 0.0f32;
        let mut row_max_y = max_y;

        loop {
            let (width, height) = requests[index].size;
            viewports.push(Viewport::new(x, max_y, width, height));

            x += width;
            reached_x = reached_x.max(x);
            row_max_y = row_max_y.max(max_y + height);
            index += 1;

            if x >= max_x || index >= count {
                break;
            }
        }

        max_x = max_x.max(reached_x);
        max_y = row_max_y;
    }

    (viewports, (max_x, max_y))
}

/// Orders larger requests first: by height, then by width.
fn descending_by_size(a: &ResolutionRequest, b: &ResolutionRequest) -> Ordering {
    b.height()
        .total_cmp(&a.height())
        .then_with(|| b.width().total_cmp(&a.width()))
}

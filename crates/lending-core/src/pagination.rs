use serde::Serialize;

use crate::{LendingError, LendingResult};

/// One page of an ordered result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageWindow<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub total_pages: u32,
}

/// Slice `items` into the 1-indexed `page` of `page_size` rows.
///
/// Pages past the end yield an empty window rather than an error; callers
/// disable "next" navigation once `page == total_pages`.
pub fn paginate<T: Clone>(items: &[T], page: u32, page_size: u32) -> LendingResult<PageWindow<T>> {
    if page == 0 {
        return Err(LendingError::InvalidInput {
            field: "page".into(),
            reason: "Pages are numbered from 1.".into(),
        });
    }
    if page_size == 0 {
        return Err(LendingError::InvalidInput {
            field: "page_size".into(),
            reason: "Page size must be positive.".into(),
        });
    }

    let len = items.len();
    let size = page_size as usize;
    let total_pages = len.div_ceil(size) as u32;

    let start = (page as usize - 1).saturating_mul(size);
    let items = if start >= len {
        Vec::new()
    } else {
        items[start..(start + size).min(len)].to_vec()
    };

    Ok(PageWindow {
        items,
        page,
        total_pages,
    })
}

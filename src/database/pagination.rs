use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

impl Pagination {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit: limit.max(1),
            offset: offset.max(0),
        }
    }

    /// `page` is 1-based. `None` when the page lies beyond any addressable
    /// offset.
    pub fn from_page(page: i64, limit: i64) -> Option<Self> {
        let limit = limit.max(1);
        let offset = (page.max(1) - 1).checked_mul(limit)?;
        Some(Self::new(limit, offset))
    }

    pub fn apply<T: Clone>(&self, rows: &[T]) -> Vec<T> {
        rows.iter()
            .skip(self.offset as usize)
            .take(self.limit as usize)
            .cloned()
            .collect()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PageContext<T> {
    pub rows: Vec<T>,
    pub total_rows: i64,
    pub next_offset: Option<i64>,
    pub prev_offset: Option<i64>,
}

impl<T> PageContext<T> {
    pub fn from_rows(rows: Vec<T>, total_rows: i64, pagination: Pagination) -> Self {
        let Pagination { limit, offset } = pagination;

        let end = offset.saturating_add(limit);
        let next_offset = (end < total_rows).then_some(end);
        let prev_offset = (offset > 0).then(|| offset.saturating_sub(limit).max(0));

        Self {
            rows,
            total_rows,
            next_offset,
            prev_offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_are_one_based() {
        assert_eq!(Pagination::from_page(1, 6), Some(Pagination::new(6, 0)));
        assert_eq!(Pagination::from_page(3, 6), Some(Pagination::new(6, 12)));
        assert_eq!(Pagination::from_page(0, 6), Some(Pagination::new(6, 0)));
    }

    #[test]
    fn huge_pages_do_not_overflow() {
        assert_eq!(Pagination::from_page(i64::MAX, 6), None);
        assert_eq!(Pagination::from_page(2, i64::MAX), Some(Pagination::new(i64::MAX, i64::MAX)));

        let page: PageContext<i32> =
            PageContext::from_rows(vec![], 3, Pagination::new(i64::MAX, i64::MAX));
        assert_eq!(page.next_offset, None);
        assert_eq!(page.prev_offset, Some(0));
    }

    #[test]
    fn offsets_stop_at_the_edges() {
        let page = PageContext::from_rows(vec![1, 2], 8, Pagination::new(6, 6));
        assert_eq!(page.next_offset, None);
        assert_eq!(page.prev_offset, Some(0));

        let page = PageContext::from_rows(vec![1; 6], 8, Pagination::new(6, 0));
        assert_eq!(page.next_offset, Some(6));
        assert_eq!(page.prev_offset, None);
    }

    #[test]
    fn total_survives_an_empty_slice() {
        let page: PageContext<i32> = PageContext::from_rows(vec![], 3, Pagination::new(6, 12));
        assert_eq!(page.total_rows, 3);
        assert!(page.rows.is_empty());
    }
}

//! Pager controls for admin list views

use std::fmt;

/// Page buttons shown before collapsing to `…` and the last page
const VISIBLE_PAGES: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageButton {
    Prev { enabled: bool },
    Page { number: u64, active: bool },
    Ellipsis,
    Next { enabled: bool },
}

impl fmt::Display for PageButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageButton::Prev { .. } => write!(f, "Prev"),
            PageButton::Page { number, active: true } => write!(f, "[{}]", number),
            PageButton::Page { number, .. } => write!(f, "{}", number),
            PageButton::Ellipsis => write!(f, "…"),
            PageButton::Next { .. } => write!(f, "Next"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
}

impl Pagination {
    pub fn new(total: u64, page: u64, page_size: u64) -> Self {
        Self {
            total,
            page,
            page_size,
        }
    }

    /// `ceil(total / page_size)`, or 0 when `page_size` is 0
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(self.page_size)
    }

    pub fn has_controls(&self) -> bool {
        self.total_pages() > 1
    }

    pub fn prev_enabled(&self) -> bool {
        self.page != 1
    }

    pub fn next_enabled(&self) -> bool {
        self.page != self.total_pages()
    }

    /// Page to load for a button, if pressing it does anything
    pub fn target(&self, button: PageButton) -> Option<u64> {
        match button {
            PageButton::Prev { enabled: true } if self.page > 1 => Some(self.page - 1),
            PageButton::Next { enabled: true } if self.page < self.total_pages() => {
                Some(self.page + 1)
            }
            PageButton::Page { number, .. } => Some(number),
            _ => None,
        }
    }

    /// Buttons in display order; empty when there is a single page
    pub fn buttons(&self) -> Vec<PageButton> {
        let total_pages = self.total_pages();
        if total_pages <= 1 {
            return Vec::new();
        }

        let mut buttons = vec![PageButton::Prev {
            enabled: self.prev_enabled(),
        }];
        buttons.extend((1..=total_pages.min(VISIBLE_PAGES)).map(|number| PageButton::Page {
            number,
            active: number == self.page,
        }));
        if total_pages > VISIBLE_PAGES {
            buttons.push(PageButton::Ellipsis);
            buttons.push(PageButton::Page {
                number: total_pages,
                active: total_pages == self.page,
            });
        }
        buttons.push(PageButton::Next {
            enabled: self.next_enabled(),
        });
        buttons
    }
}

impl fmt::Display for Pagination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let buttons: Vec<String> = self.buttons().iter().map(ToString::to_string).collect();
        write!(f, "{}", buttons.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(Pagination::new(0, 1, 20).total_pages(), 0);
        assert_eq!(Pagination::new(20, 1, 20).total_pages(), 1);
        assert_eq!(Pagination::new(21, 1, 20).total_pages(), 2);
        assert_eq!(Pagination::new(21, 1, 0).total_pages(), 0);
    }

    #[test]
    fn test_single_page_has_no_controls() {
        let pager = Pagination::new(15, 1, 20);
        assert!(!pager.has_controls());
        assert!(pager.buttons().is_empty());
        assert_eq!(pager.to_string(), "");
    }

    #[test]
    fn test_three_pages() {
        let pager = Pagination::new(41, 2, 20);
        assert_eq!(
            pager.buttons(),
            vec![
                PageButton::Prev { enabled: true },
                PageButton::Page { number: 1, active: false },
                PageButton::Page { number: 2, active: true },
                PageButton::Page { number: 3, active: false },
                PageButton::Next { enabled: true },
            ]
        );
        assert_eq!(pager.to_string(), "Prev 1 [2] 3 Next");
    }

    #[test]
    fn test_many_pages_collapse() {
        let pager = Pagination::new(200, 1, 20);
        assert_eq!(pager.to_string(), "Prev [1] 2 3 4 5 … 10 Next");
        assert!(!pager.prev_enabled());

        let last = Pagination::new(200, 10, 20);
        assert_eq!(last.to_string(), "Prev 1 2 3 4 5 … [10] Next");
        assert!(!last.next_enabled());
    }

    #[test]
    fn test_targets() {
        let pager = Pagination::new(200, 1, 20);
        assert_eq!(pager.target(PageButton::Prev { enabled: false }), None);
        assert_eq!(pager.target(PageButton::Next { enabled: true }), Some(2));
        assert_eq!(pager.target(PageButton::Ellipsis), None);
        assert_eq!(pager.target(PageButton::Page { number: 10, active: false }), Some(10));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(200))]

            #[test]
            fn controls_follow_page_count(total in 0u64..5_000, page_size in 1u64..100, page_seed in 0u64..1_000) {
                let total_pages = total.div_ceil(page_size);
                let page = if total_pages == 0 { 1 } else { page_seed % total_pages + 1 };
                let pager = Pagination::new(total, page, page_size);
                let buttons = pager.buttons();

                prop_assert_eq!(pager.total_pages(), total_pages);
                if total_pages <= 1 {
                    prop_assert!(buttons.is_empty());
                } else {
                    prop_assert_eq!(buttons.first(), Some(&PageButton::Prev { enabled: page != 1 }));
                    prop_assert_eq!(buttons.last(), Some(&PageButton::Next { enabled: page != total_pages }));

                    let numbers: Vec<u64> = buttons.iter().filter_map(|b| match b {
                        PageButton::Page { number, .. } => Some(*number),
                        _ => None,
                    }).collect();
                    let mut expected: Vec<u64> = (1..=total_pages.min(5)).collect();
                    if total_pages > 5 {
                        expected.push(total_pages);
                    }
                    prop_assert_eq!(numbers, expected);

                    let ellipses = buttons.iter().filter(|b| **b == PageButton::Ellipsis).count();
                    prop_assert_eq!(ellipses, usize::from(total_pages > 5));

                    let active = buttons.iter().filter(|b| matches!(b, PageButton::Page { active: true, .. })).count();
                    prop_assert!(active <= 1);
                }
            }
        }
    }
}

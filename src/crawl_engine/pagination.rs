//! Pagination enumeration
//!
//! Produces the `(offset, variant)` sequence the frontier collector visits:
//! offsets ascend by the page size up to an inclusive ceiling, and every
//! variant is tried at each offset in order. The ceiling bounds traversal of
//! a surface whose pagination may never run dry; it does not guarantee the
//! surface has been exhausted.

use super::crawl_types::PageDescriptor;

/// Iterator over page descriptors.
///
/// The collector calls [`PageEnumerator::skip_rest_of_offset`] once an offset
/// has produced something new, so the remaining variants of that offset are
/// not requested.
#[derive(Debug, Clone)]
pub struct PageEnumerator {
    page_size: u32,
    max_offset: u32,
    variants: Vec<u32>,
    offset: Option<u32>,
    variant_idx: usize,
    last_yielded: Option<u32>,
}

impl PageEnumerator {
    #[must_use]
    pub fn new(page_size: u32, max_offset: u32, variants: Vec<u32>) -> Self {
        let offset = if variants.is_empty() { None } else { Some(0) };
        Self {
            page_size,
            max_offset,
            variants,
            offset,
            variant_idx: 0,
            last_yielded: None,
        }
    }

    /// Offset the next descriptor will carry, `None` once exhausted
    #[must_use]
    pub fn current_offset(&self) -> Option<u32> {
        self.offset
    }

    /// Abandon the offset of the last yielded descriptor.
    ///
    /// No-op if that offset's variants are already used up.
    pub fn skip_rest_of_offset(&mut self) {
        if self.last_yielded.is_some() && self.offset == self.last_yielded {
            self.advance_offset();
        }
    }

    fn advance_offset(&mut self) {
        self.variant_idx = 0;
        self.offset = match self.offset {
            // A zero step would revisit offset 0 forever
            Some(_) if self.page_size == 0 => None,
            Some(current) => current
                .checked_add(self.page_size)
                .filter(|next| *next <= self.max_offset),
            None => None,
        };
    }
}

impl Iterator for PageEnumerator {
    type Item = PageDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        let offset = self.offset?;
        let variant = *self.variants.get(self.variant_idx)?;

        self.last_yielded = Some(offset);
        self.variant_idx += 1;
        if self.variant_idx >= self.variants.len() {
            self.advance_offset();
        }

        Some(PageDescriptor { offset, variant })
    }
}

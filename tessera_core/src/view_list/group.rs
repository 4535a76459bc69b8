// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lists built from other lists: groups and sections.

use alloc::rc::Rc;
use alloc::vec::Vec;

use super::{
    ApplyBody, Edit, ExplicitId, IteratorStyle, JoinedViews, Node, SublistTransform,
    TransactionId, ViewIds, ViewList, ViewListId,
};

/// Lists concatenated in order.
#[derive(Clone, Debug, Default)]
pub struct Group {
    lists: Vec<Rc<dyn ViewList>>,
}

impl Group {
    /// Concatenates `lists`.
    #[must_use]
    pub fn new(lists: Vec<Rc<dyn ViewList>>) -> Self {
        Self { lists }
    }

    /// Returns the member lists.
    #[must_use]
    pub fn lists(&self) -> &[Rc<dyn ViewList>] {
        &self.lists
    }

    /// Walks each member list in turn, stopping when one is stopped.
    pub fn apply_children(
        &self,
        start: &mut usize,
        style: IteratorStyle,
        transform: &mut SublistTransform,
        body: &mut ApplyBody<'_>,
    ) -> bool {
        self.lists
            .iter()
            .all(|list| list.apply_nodes(start, style, transform, body))
    }
}

impl ViewList for Group {
    fn count(&self, style: IteratorStyle) -> usize {
        self.lists.iter().map(|l| l.count(style)).sum()
    }

    fn estimated_count(&self, style: IteratorStyle) -> usize {
        self.lists.iter().map(|l| l.estimated_count(style)).sum()
    }

    fn view_ids(&self) -> Option<ViewIds> {
        let views = self
            .lists
            .iter()
            .map(|l| l.view_ids())
            .collect::<Option<Vec<_>>>()?;
        Some(ViewIds::Joined(JoinedViews::new(views)))
    }

    fn apply_nodes(
        &self,
        start: &mut usize,
        style: IteratorStyle,
        transform: &mut SublistTransform,
        body: &mut ApplyBody<'_>,
    ) -> bool {
        body(start, style, Node::Group(self), transform)
    }

    fn edit(&self, id: &ViewListId, since: TransactionId) -> Option<Edit> {
        self.lists.iter().find_map(|l| l.edit(id, since))
    }

    fn first_offset(&self, id: &ExplicitId, style: IteratorStyle) -> Option<usize> {
        let mut previous = 0;
        for list in &self.lists {
            if let Some(offset) = list.first_offset(id, style) {
                return Some(previous + offset);
            }
            previous += list.count(style);
        }
        None
    }
}

/// Where a node visited inside a [`Section`] came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SectionInfo {
    /// The section's ID.
    pub id: u32,
    /// Whether the node belongs to the header.
    pub is_header: bool,
    /// Whether the node belongs to the footer.
    pub is_footer: bool,
}

/// The body of a section traversal, which also receives [`SectionInfo`].
pub type SectionBody<'b> = dyn for<'n> FnMut(
        &mut usize,
        IteratorStyle,
        Node<'n>,
        SectionInfo,
        &mut SublistTransform,
    ) -> bool
    + 'b;

/// A header, content, and footer.
///
/// A hierarchical section only exposes its header; the content and footer
/// are implied children of it. Otherwise all three parts are walked in
/// order, each padded to the next granularity multiple, with the header and
/// footer always counted by granularity when it is not one.
#[derive(Clone, Debug)]
pub struct Section {
    id: u32,
    base: Group,
    is_hierarchical: bool,
}

impl Section {
    /// Creates a section.
    #[must_use]
    pub fn new(
        id: u32,
        header: Rc<dyn ViewList>,
        content: Rc<dyn ViewList>,
        footer: Rc<dyn ViewList>,
        is_hierarchical: bool,
    ) -> Self {
        Self {
            id,
            base: Group::new(alloc::vec![header, content, footer]),
            is_hierarchical,
        }
    }

    /// Returns the section ID.
    #[must_use]
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// Returns whether only the header is exposed.
    #[must_use]
    pub const fn is_hierarchical(&self) -> bool {
        self.is_hierarchical
    }

    /// Returns the three parts as a group.
    #[must_use]
    pub fn group(&self) -> &Group {
        &self.base
    }

    /// Returns the header list.
    #[must_use]
    pub fn header(&self) -> &dyn ViewList {
        &*self.base.lists[0]
    }

    /// Returns the content list.
    #[must_use]
    pub fn content(&self) -> &dyn ViewList {
        &*self.base.lists[1]
    }

    /// Returns the footer list.
    #[must_use]
    pub fn footer(&self) -> &dyn ViewList {
        &*self.base.lists[2]
    }

    fn part_count(&self) -> usize {
        if self.is_hierarchical { 1 } else { 3 }
    }

    fn counted(
        &self,
        style: IteratorStyle,
        f: impl Fn(&dyn ViewList, IteratorStyle) -> usize,
    ) -> usize {
        let header_footer = style.header_footer();
        if self.is_hierarchical {
            return f(self.header(), header_footer);
        }
        let mut content = f(self.content(), style);
        style.align_to_next_granularity_multiple(&mut content);
        content + f(self.header(), header_footer) + f(self.footer(), header_footer)
    }

    /// Walks the parts in order, tagging each node with its origin.
    pub fn apply_parts(
        &self,
        start: &mut usize,
        style: IteratorStyle,
        transform: &mut SublistTransform,
        body: &mut SectionBody<'_>,
    ) -> bool {
        style.align_to_previous_granularity_multiple(start);
        let header_footer = style.header_footer();
        for index in 0..self.part_count() {
            let info = SectionInfo {
                id: self.id,
                is_header: index == 0,
                is_footer: index == 2,
            };
            let part_style = if index == 1 { style } else { header_footer };
            let list = &self.base.lists[index];
            let finished = list.apply_nodes(start, part_style, transform, &mut |s, st, n, t| {
                body(s, st, n, info, t)
            });
            if !finished {
                return false;
            }
            style.align_to_next_granularity_multiple(start);
        }
        true
    }
}

impl ViewList for Section {
    fn count(&self, style: IteratorStyle) -> usize {
        self.counted(style, |list, style| list.count(style))
    }

    fn estimated_count(&self, style: IteratorStyle) -> usize {
        self.counted(style, |list, style| list.estimated_count(style))
    }

    fn view_ids(&self) -> Option<ViewIds> {
        if self.is_hierarchical {
            self.header().view_ids()
        } else {
            self.base.view_ids()
        }
    }

    fn apply_nodes(
        &self,
        start: &mut usize,
        style: IteratorStyle,
        transform: &mut SublistTransform,
        body: &mut ApplyBody<'_>,
    ) -> bool {
        body(start, style, Node::Section(self), transform)
    }

    fn edit(&self, id: &ViewListId, since: TransactionId) -> Option<Edit> {
        self.base.edit(id, since)
    }

    fn first_offset(&self, id: &ExplicitId, style: IteratorStyle) -> Option<usize> {
        let header_footer = style.header_footer();
        let mut previous = 0;
        for (index, list) in self.base.lists.iter().take(self.part_count()).enumerate() {
            let part_style = if index == 1 { style } else { header_footer };
            if let Some(offset) = list.first_offset(id, part_style) {
                return Some(previous + offset);
            }
            let mut count = list.count(part_style);
            style.align_to_next_granularity_multiple(&mut count);
            previous += count;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ViewNode;
    use crate::view_list::{
        BaseInputs, BaseViewList, BindIdList, Elements, MergedElements, UnaryElements, ViewTraits,
        sublists,
    };
    use alloc::vec;

    fn leaf(count: usize, implicit_id: i32) -> Rc<dyn ViewList> {
        let parts = (0..count)
            .map(|_| {
                Rc::new(UnaryElements::new(ViewNode::Empty, BaseInputs::default()))
                    as Rc<dyn Elements>
            })
            .collect();
        Rc::new(BaseViewList::new(
            Rc::new(MergedElements::new(parts)),
            implicit_id,
            ViewTraits::default(),
        ))
    }

    #[test]
    fn group_counts_and_joins_ids() {
        let group = Group::new(vec![leaf(2, 0), leaf(3, 1)]);
        assert_eq!(group.count(IteratorStyle::PLAIN), 5);
        let ids = group.view_ids().unwrap();
        assert_eq!(ids.len(), 5);
        assert_eq!(ids.get(3).unwrap().implicit_id(), 1);
    }

    #[test]
    fn group_first_offset_accumulates() {
        let tagged: Rc<dyn ViewList> =
            Rc::new(BindIdList::new(leaf(1, 2), ExplicitId::Int(9), None, 0));
        let group = Group::new(vec![leaf(2, 0), leaf(3, 1), tagged]);
        assert_eq!(group.first_offset(&ExplicitId::Int(9), IteratorStyle::PLAIN), Some(5));
        assert_eq!(group.first_offset(&ExplicitId::Int(1), IteratorStyle::PLAIN), None);
    }

    #[test]
    fn flat_section_pads_content_to_granularity() {
        let section = Section::new(4, leaf(1, 0), leaf(3, 1), leaf(1, 2), false);
        assert_eq!(section.count(IteratorStyle::PLAIN), 5);

        // Content 3 rounds to 4 rows of 2; header and footer count 2 each.
        let grid = IteratorStyle::with_granularity(2).applying_granularity(false);
        assert_eq!(section.count(grid), 4 + 2 + 2);
    }

    #[test]
    fn hierarchical_section_exposes_header_only() {
        let section = Section::new(1, leaf(2, 0), leaf(3, 1), leaf(1, 2), true);
        assert_eq!(section.count(IteratorStyle::PLAIN), 2);
        assert_eq!(sublists(&section, IteratorStyle::PLAIN).len(), 1);
    }

    #[test]
    fn section_parts_are_tagged() {
        let section = Section::new(7, leaf(1, 0), leaf(2, 1), leaf(1, 2), false);
        let mut infos = vec![];
        section.apply_parts(
            &mut 0,
            IteratorStyle::PLAIN,
            &mut SublistTransform::default(),
            &mut |_, _, _, info, _| {
                infos.push((info.is_header, info.is_footer));
                true
            },
        );
        assert_eq!(infos, vec![(true, false), (false, false), (false, true)]);
    }
}

use alloc::vec;
use alloc::vec::Vec;

use crate::Heading;

/// One node of the reconstructed document outline.
///
/// Children are strictly deeper than their parent. The outline is recomputed
/// wholesale on every invalidation and never mutated in place.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutlineNode<H> {
    pub headline: H,
    pub level: u8,
    pub children: Vec<OutlineNode<H>>,
}

/// A section still open during construction. The synthetic level-0 root has
/// no headline and is never closed.
struct Open<H> {
    headline: Option<H>,
    level: u8,
    children: Vec<OutlineNode<H>>,
}

fn close_top<H>(stack: &mut Vec<Open<H>>) {
    let Some(closed) = stack.pop() else { return };
    let Some(headline) = closed.headline else {
        return;
    };
    let node = OutlineNode {
        headline,
        level: closed.level,
        children: closed.children,
    };
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    }
}

/// Rebuilds the nested outline from a flat, document-ordered heading sequence.
///
/// Stack algorithm over open sections: a strictly deeper heading nests under
/// the currently open one; otherwise every open section at the same or a
/// deeper level is closed first and the heading becomes a sibling under
/// whatever remains open. Irregular sequences stay well-formed (a level-4
/// heading with no open level-2/3 ancestor nests under the nearest open
/// ancestor). O(n), deterministic, idempotent.
pub fn build_outline<H: Clone>(headings: &[Heading<H>]) -> Vec<OutlineNode<H>> {
    let mut stack: Vec<Open<H>> = vec![Open {
        headline: None,
        level: 0,
        children: Vec::new(),
    }];

    for heading in headings {
        while stack
            .last()
            .is_some_and(|open| open.headline.is_some() && open.level >= heading.level)
        {
            close_top(&mut stack);
        }
        stack.push(Open {
            headline: Some(heading.handle.clone()),
            level: heading.level,
            children: Vec::new(),
        });
    }

    while stack.last().is_some_and(|open| open.headline.is_some()) {
        close_top(&mut stack);
    }

    stack.pop().map(|root| root.children).unwrap_or_default()
}

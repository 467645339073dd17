//! Circular dependency detection for formula cells.
//!
//! When a formula is entered, we must verify it doesn't create a cycle
//! (e.g., A1 references B1, B1 references C1, C1 references A1).
//! The search is an iterative depth-first walk over forward references with
//! three-state marking: a node reached again while still on the active path
//! closes a cycle; a node already finished is known to be acyclic and is
//! skipped, so shared upstream cells (diamonds) are not misreported.

use std::collections::HashMap;

use sheetcalc_engine::engine::Position;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mark {
    OnPath,
    Done,
}

struct Frame {
    pos: Position,
    refs: Vec<Position>,
    next: usize,
}

/// Search for a cycle reachable from `start`.
///
/// `references` returns the forward references of a position.
/// Returns the cycle as a path that starts and ends at the same position.
pub(crate) fn find_cycle<F>(start: Position, mut references: F) -> Option<Vec<Position>>
where
    F: FnMut(Position) -> Vec<Position>,
{
    let mut marks = HashMap::from([(start, Mark::OnPath)]);
    let mut path = vec![Frame {
        pos: start,
        refs: references(start),
        next: 0,
    }];

    while let Some(frame) = path.last_mut() {
        let Some(&child) = frame.refs.get(frame.next) else {
            marks.insert(frame.pos, Mark::Done);
            path.pop();
            continue;
        };
        frame.next += 1;

        match marks.get(&child) {
            Some(Mark::OnPath) => {
                let from = path.iter().position(|f| f.pos == child).unwrap_or(0);
                let mut cycle: Vec<Position> = path[from..].iter().map(|f| f.pos).collect();
                cycle.push(child);
                return Some(cycle);
            }
            Some(Mark::Done) => {}
            None => {
                marks.insert(child, Mark::OnPath);
                path.push(Frame {
                    pos: child,
                    refs: references(child),
                    next: 0,
                });
            }
        }
    }

    None
}

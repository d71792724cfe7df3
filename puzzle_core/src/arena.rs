//! Arena-backed state storage.
//!
//! States form a tree rooted at the start board via `parent` edges that are
//! read-only back-references, never freed mid-search. Representing them in a
//! contiguous arena and referring to them by index removes the cyclic
//! ownership a naive `Rc`/raw-pointer `parent` link would otherwise need.

use crate::board::Board;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn new(index: usize) -> NodeId {
        NodeId(u32::try_from(index).expect("search space exceeds u32::MAX nodes"))
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
pub struct StateNode {
    pub board: Board,
    /// `g`: moves from the start board to this one.
    pub g: u32,
    /// `h`: admissible lower bound on remaining moves.
    pub h: u32,
    /// `f = g + h`, the A* priority key.
    pub f: u32,
    pub parent: Option<NodeId>,
}

/// Owns every state admitted to the search for the lifetime of the run.
#[derive(Debug, Default)]
pub struct Arena {
    nodes: Vec<StateNode>,
}

impl Arena {
    pub fn new() -> Arena {
        Arena::default()
    }

    pub fn push(&mut self, node: StateNode) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn get(&self, id: NodeId) -> &StateNode {
        &self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Walks `parent` links from `id` back to the root, returning boards in
    /// start-to-goal order.
    pub fn reconstruct_path(&self, id: NodeId) -> Vec<Board> {
        let mut boards = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.get(node_id);
            boards.push(node.board.clone());
            current = node.parent;
        }
        boards.reverse();
        boards
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_like_push_sets_g_and_parent() {
        let mut arena = Arena::new();
        let root = arena.push(StateNode {
            board: Board::goal(3),
            g: 0,
            h: 0,
            f: 0,
            parent: None,
        });
        let child_board = Board::goal(3).apply(crate::board::Direction::Up).unwrap();
        let child = arena.push(StateNode {
            board: child_board,
            g: arena.get(root).g + 1,
            h: 0,
            f: 0,
            parent: Some(root),
        });
        assert_eq!(arena.get(child).g, 1);
        assert_eq!(arena.get(child).parent, Some(root));
    }

    #[test]
    fn reconstruct_path_is_start_to_goal_order() {
        let mut arena = Arena::new();
        let root = arena.push(StateNode {
            board: Board::goal(3),
            g: 0,
            h: 0,
            f: 0,
            parent: None,
        });
        let path = arena.reconstruct_path(root);
        assert_eq!(path.len(), 1);
    }
}

use std::{mem, sync::Arc};

use crate::{
    confined::{Confined, WeakConfined},
    error::Result,
    geom::{Point, Rect, Size},
    input::InputTarget,
    ui::UiHandle,
};

/// A shared reference to a node in the scene graph.
pub type NodeRef = Arc<dyn SceneNode>;

/// Per-node scene state. Positions are relative to the parent's origin, with
/// positive Y running up.
pub struct NodeState {
    /// Diagnostic name.
    pub name: String,
    /// Offset from the parent's origin.
    pub position: Point,
    /// Extent of the node.
    pub size: Size,
    /// Stacking index among siblings. Higher indices draw and hit first.
    pub z: i64,
    /// Hidden nodes and their children take no input.
    pub visible: bool,
    /// Does this node accept pointer input?
    pub interactive: bool,
    /// Parent link. Never keeps the parent alive.
    parent: Option<WeakConfined<NodeState>>,
    /// Children in attach order.
    children: Vec<NodeRef>,
}

impl NodeState {
    /// Fresh, visible, non-interactive state.
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            position: Point::zero(),
            size: Size::default(),
            z: 0,
            visible: true,
            interactive: false,
            parent: None,
            children: vec![],
        }
    }

    /// Number of attached children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Is this node attached to a parent?
    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }
}

/// The scene-graph half of every node: geometry, stacking, visibility and the
/// parent/child links. All of it lives on the UI thread.
pub struct NodeCore {
    /// Node state.
    state: Confined<NodeState>,
}

impl NodeCore {
    /// A detached node.
    pub fn new(ui: UiHandle, name: &str) -> Self {
        Self {
            state: Confined::new(ui, NodeState::new(name)),
        }
    }

    /// A detached node whose initial state is adjusted by `f` before it is
    /// shared. Runs on any thread.
    pub fn build(ui: UiHandle, name: &str, f: impl FnOnce(&mut NodeState)) -> Self {
        let mut state = NodeState::new(name);
        f(&mut state);
        Self {
            state: Confined::new(ui, state),
        }
    }

    /// The loop that owns this node.
    pub fn ui(&self) -> &UiHandle {
        self.state.ui()
    }

    /// Access node state on the UI thread.
    #[track_caller]
    pub fn with<R>(&self, f: impl FnOnce(&mut NodeState) -> R) -> R {
        self.state.with(f)
    }

    /// Access node state from any thread.
    pub fn sync<R, F>(&self, f: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce(&mut NodeState) -> R + Send + 'static,
    {
        self.state.sync(f)
    }

    /// Queue an update to node state.
    pub fn post<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut NodeState) + Send + 'static,
    {
        self.state.post(f)
    }

    /// Are these the same node?
    pub fn same(&self, other: &Self) -> bool {
        self.state.ptr_eq(&other.state)
    }

    /// Attach `child` as the last child of this node, from any thread.
    pub fn add_child(&self, child: NodeRef) -> Result<()> {
        let parent = self.state.clone();
        self.ui().run_sync(move || attach(&parent, child))
    }

    /// Attach `child` as the last child of this node, on the UI thread.
    #[track_caller]
    pub fn add_child_here(&self, child: NodeRef) {
        attach(&self.state, child)
    }

    /// Detach every child, on the UI thread. Returns the detached children.
    #[track_caller]
    pub fn remove_all_children_here(&self) -> Vec<NodeRef> {
        let children = self.with(|s| mem::take(&mut s.children));
        for c in &children {
            c.core().with(|s| s.parent = None);
        }
        children
    }

    /// Current children, on the UI thread.
    #[track_caller]
    pub fn children_here(&self) -> Vec<NodeRef> {
        self.with(|s| s.children.clone())
    }

    /// Position of this node's origin in scene coordinates, found by walking
    /// the parent chain.
    #[track_caller]
    pub fn scene_origin_here(&self) -> Point {
        let (mut origin, mut parent) = self.with(|s| (s.position, s.parent.clone()));
        while let Some(p) = parent.as_ref().and_then(WeakConfined::upgrade) {
            let (pos, next) = p.with(|s| (s.position, s.parent.clone()));
            origin = origin + pos;
            parent = next;
        }
        origin
    }
}

/// Link `child` under `parent`.
fn attach(parent: &Confined<NodeState>, child: NodeRef) {
    let link = parent.downgrade();
    child.core().with(|s| s.parent = Some(link));
    parent.with(|s| s.children.push(child));
}

/// Anything that lives in the scene graph.
pub trait SceneNode: Send + Sync + 'static {
    /// The node's scene state.
    fn core(&self) -> &NodeCore;

    /// The area that accepts pointer input, relative to the node's origin.
    /// Defaults to the node's extent hanging below and to the right of its
    /// origin.
    fn hit_area(&self) -> Rect {
        let size = self.core().with(|s| s.size);
        Rect::new(Point::zero(), size)
    }

    /// Where pointer input for this node goes. Interactive nodes without a
    /// target swallow input.
    fn input_target(&self) -> Option<&dyn InputTarget> {
        None
    }
}

/// Find the topmost interactive node under `p`, searching `nodes` and their
/// descendants. `origin` is the scene origin of the nodes' parent. Children
/// take precedence over their parent, higher stacking indices over lower, and
/// later siblings over earlier ones.
pub fn hit_test_here(nodes: &[NodeRef], origin: Point, p: Point) -> Option<NodeRef> {
    let mut order: Vec<(i64, usize)> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.core().with(|s| s.z), i))
        .collect();
    order.sort_unstable_by(|a, b| b.cmp(a));
    for (_, i) in order {
        let node = &nodes[i];
        let (visible, interactive, position, children) = node
            .core()
            .with(|s| (s.visible, s.interactive, s.position, s.children.clone()));
        if !visible {
            continue;
        }
        let here = origin + position;
        if let Some(hit) = hit_test_here(&children, here, p) {
            return Some(hit);
        }
        if interactive && node.hit_area().shift(here).contains(p) {
            return Some(node.clone());
        }
    }
    None
}

//! Navigation history of visited directories

use crate::entry::DirectoryNode;
use crate::error::TocError;
use crate::path::DirPath;

/// Ordered stack of visited paths, most recent last
///
/// Never empty: the root sits at index 0. Each path is the previous one plus exactly
/// one segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationStack {
    frames: Vec<DirPath>,
}

impl NavigationStack {
    /// Stack holding only `root`
    #[inline]
    #[must_use]
    pub fn new(root: DirPath) -> Self {
        Self { frames: vec![root] }
    }

    /// Bottom of the stack
    #[inline]
    #[must_use]
    pub fn root(&self) -> &DirPath {
        &self.frames[0]
    }

    /// Directory being viewed
    #[inline]
    #[must_use]
    pub fn current(&self) -> &DirPath {
        &self.frames[self.frames.len() - 1]
    }

    /// Number of frames, 1 at root
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// All frames from root to current
    #[inline]
    #[must_use]
    pub fn frames(&self) -> &[DirPath] {
        &self.frames
    }

    /// Push `child` of the current directory
    ///
    /// `listing` must be the loaded listing of the current directory.
    ///
    /// # Errors
    /// Returns [`TocError::InvalidDescent`] if the listing is missing, belongs to another
    /// path, or has no subdirectory named `child`. The stack is unchanged on error.
    pub fn descend(
        &mut self,
        child: &str,
        listing: Option<&DirectoryNode>,
    ) -> Result<&DirPath, TocError> {
        let current = self.current();
        let next = listing
            .filter(|node| node.path() == current)
            .and_then(|node| node.find(child))
            .filter(|entry| entry.is_subdirectory())
            .and_then(|entry| current.child(entry.name()).ok());

        match next {
            Some(path) => {
                debug_assert!(self.current().is_parent_of(&path));
                self.frames.push(path);
                Ok(self.current())
            }
            None => Err(TocError::InvalidDescent {
                name: child.to_string(),
                path: current.clone(),
            }),
        }
    }

    /// Pop one frame; no-op at root
    ///
    /// Returns `true` if the stack changed.
    pub fn ascend(&mut self) -> bool {
        if self.frames.len() > 1 {
            self.frames.pop();
            true
        } else {
            false
        }
    }

    /// Back to `[root]`
    ///
    /// Returns `true` if the stack changed.
    pub fn reset(&mut self) -> bool {
        let changed = self.frames.len() > 1;
        self.frames.truncate(1);
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Entry;

    fn path(s: &str) -> DirPath {
        s.parse().unwrap()
    }

    fn listing(p: &str) -> DirectoryNode {
        DirectoryNode::new(
            path(p),
            vec![
                Entry::subdirectory("fio").unwrap(),
                Entry::file("summary.csv").unwrap(),
            ],
            1,
        )
        .unwrap()
    }

    #[test]
    fn starts_at_root() {
        let stack = NavigationStack::new(path("/runs"));
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.current(), &path("/runs"));
        assert_eq!(stack.root(), &path("/runs"));
    }

    #[test]
    fn descend_into_subdirectory() {
        let mut stack = NavigationStack::new(path("/runs"));
        let node = listing("/runs");
        let next = stack.descend("fio", Some(&node)).unwrap().clone();
        assert_eq!(next, path("/runs/fio"));
        assert_eq!(stack.depth(), 2);
    }

    #[test]
    fn descend_rejects_file() {
        let mut stack = NavigationStack::new(DirPath::root());
        let node = listing("/");
        let err = stack.descend("summary.csv", Some(&node)).unwrap_err();
        assert!(matches!(err, TocError::InvalidDescent { ref name, .. } if name == "summary.csv"));
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn descend_rejects_unknown_and_unloaded() {
        let mut stack = NavigationStack::new(DirPath::root());
        assert!(stack.descend("fio", None).is_err());
        assert!(stack.descend("nope", Some(&listing("/"))).is_err());
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn descend_rejects_listing_of_other_path() {
        let mut stack = NavigationStack::new(DirPath::root());
        assert!(stack.descend("fio", Some(&listing("/elsewhere"))).is_err());
    }

    #[test]
    fn ascend_at_root_is_noop() {
        let mut stack = NavigationStack::new(DirPath::root());
        assert!(!stack.ascend());
        assert!(!stack.ascend());
        assert!(stack.current().is_root());
    }

    #[test]
    fn descend_ascend_round_trip() {
        let mut stack = NavigationStack::new(DirPath::root());
        let before = stack.clone();
        stack.descend("fio", Some(&listing("/"))).unwrap();
        assert!(stack.ascend());
        assert_eq!(stack, before);
    }

    #[test]
    fn reset_returns_to_root() {
        let mut stack = NavigationStack::new(DirPath::root());
        stack.descend("fio", Some(&listing("/"))).unwrap();
        assert!(stack.reset());
        assert_eq!(stack.depth(), 1);
        assert!(!stack.reset());
    }
}

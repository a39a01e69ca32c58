//! Independent file-handling views, one [`Session`] per tab.

use crate::session::Session;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabId(pub u32);

#[derive(Clone, Debug)]
pub struct Tab {
    pub id: TabId,
    pub label: String,
    pub session: Session,
}

impl Tab {
    fn new(id: TabId) -> Self {
        Self { id, label: format!("Tab {}", id.0), session: Session::new() }
    }
}

#[derive(Clone, Debug)]
pub struct Workspace {
    tabs: Vec<Tab>,
    active: usize,
}

impl Default for Workspace {
    fn default() -> Self {
        Self { tabs: vec![Tab::new(TabId(1))], active: 0 }
    }
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn ids(&self) -> Vec<TabId> {
        self.tabs.iter().map(|t| t.id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn active_id(&self) -> Option<TabId> {
        self.tabs.get(self.active).map(|t| t.id)
    }

    fn index_of(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == id)
    }

    /// New tab after the highest existing id; becomes active.
    pub fn add_tab(&mut self) -> TabId {
        let next = self.tabs.iter().map(|t| t.id.0).max().unwrap_or(0) + 1;
        let id = TabId(next);
        self.tabs.push(Tab::new(id));
        self.active = self.tabs.len() - 1;
        log::debug!("added tab {next}");
        id
    }

    pub fn close_tab(&mut self, id: TabId) -> Option<Tab> {
        let idx = self.index_of(id)?;
        let tab = self.tabs.remove(idx);
        if idx <= self.active {
            self.active = self.active.saturating_sub(1);
        }
        Some(tab)
    }

    /// Blank labels are rejected and the old label kept.
    pub fn rename_tab(&mut self, id: TabId, label: &str) -> bool {
        let label = label.trim();
        if label.is_empty() {
            return false;
        }
        match self.tab_mut(id) {
            Some(tab) => {
                tab.label = label.to_string();
                true
            }
            None => false,
        }
    }

    pub fn select_tab(&mut self, id: TabId) -> bool {
        match self.index_of(id) {
            Some(idx) => {
                self.active = idx;
                true
            }
            None => false,
        }
    }

    pub fn tab(&self, id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    fn tab_mut(&mut self, id: TabId) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.id == id)
    }

    pub fn session(&self, id: TabId) -> Option<&Session> {
        self.tab(id).map(|t| &t.session)
    }

    pub fn session_mut(&mut self, id: TabId) -> Option<&mut Session> {
        self.tab_mut(id).map(|t| &mut t.session)
    }

    pub fn active_session_mut(&mut self) -> Option<&mut Session> {
        self.tabs.get_mut(self.active).map(|t| &mut t.session)
    }

    /// A library file was deleted; reset every tab that had it loaded.
    pub fn file_deleted(&mut self, file_id: &str) -> usize {
        let mut reset = 0;
        for tab in &mut self.tabs {
            if tab.session.file_deleted(file_id) {
                reset += 1;
            }
        }
        reset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{FileRole, SessionPhase};

    #[test]
    fn test_starts_with_one_tab() {
        let ws = Workspace::new();
        assert_eq!(ws.tabs().len(), 1);
        assert_eq!(ws.tabs()[0].label, "Tab 1");
        assert_eq!(ws.active_id(), Some(TabId(1)));
    }

    #[test]
    fn test_add_uses_max_plus_one() {
        let mut ws = Workspace::new();
        let two = ws.add_tab();
        let three = ws.add_tab();
        ws.close_tab(two);
        let four = ws.add_tab();
        assert_eq!((two, three, four), (TabId(2), TabId(3), TabId(4)));
        assert_eq!(ws.tab(four).unwrap().label, "Tab 4");
        assert_eq!(ws.active_id(), Some(four));
    }

    #[test]
    fn test_close_adjusts_active() {
        let mut ws = Workspace::new();
        ws.add_tab();
        ws.add_tab();
        ws.select_tab(TabId(2));
        ws.close_tab(TabId(1));
        assert_eq!(ws.active_id(), Some(TabId(2)));
        ws.close_tab(TabId(3));
        assert_eq!(ws.active_id(), Some(TabId(2)));
        ws.close_tab(TabId(2));
        assert!(ws.is_empty());
        assert_eq!(ws.active_id(), None);
        assert!(ws.active_session_mut().is_none());
        assert_eq!(ws.add_tab(), TabId(1));
    }

    #[test]
    fn test_rename_rejects_blank() {
        let mut ws = Workspace::new();
        assert!(!ws.rename_tab(TabId(1), "   "));
        assert!(ws.rename_tab(TabId(1), " LTE capture "));
        assert_eq!(ws.tabs()[0].label, "LTE capture");
        assert!(!ws.rename_tab(TabId(7), "x"));
    }

    #[test]
    fn test_sessions_are_independent() {
        let mut ws = Workspace::new();
        let b = ws.add_tab();
        ws.session_mut(TabId(1)).unwrap().select_file(FileRole::Capture, "a.cfile").unwrap();
        assert_eq!(ws.session(TabId(1)).unwrap().phase(), SessionPhase::Selecting);
        assert_eq!(ws.session(b).unwrap().phase(), SessionPhase::Empty);
    }

    #[test]
    fn test_delete_resets_tabs_with_file() {
        let mut ws = Workspace::new();
        let b = ws.add_tab();
        ws.session_mut(TabId(1)).unwrap().begin_load("f1");
        ws.session_mut(b).unwrap().begin_load("f2");
        assert_eq!(ws.file_deleted("f1"), 1);
        assert_eq!(ws.session(TabId(1)).unwrap().phase(), SessionPhase::Empty);
        assert_eq!(ws.session(b).unwrap().phase(), SessionPhase::Loaded("f2".into()));
    }
}

use std::collections::HashSet;

/// Comment ids already handed out. Grows for the life of the owner; never pruned.
#[derive(Debug, Default)]
pub struct SeenComments {
    ids: HashSet<String>,
}

impl SeenComments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `comment_id`; returns false if it was already recorded.
    pub fn admit(&mut self, comment_id: &str) -> bool {
        if self.ids.contains(comment_id) {
            return false;
        }
        self.ids.insert(comment_id.to_string())
    }

    pub fn contains(&self, comment_id: &str) -> bool {
        self.ids.contains(comment_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

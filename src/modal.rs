use crate::content::LinkKind;
use crate::content::Project;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalState {
    Closed,
    Open(String),
    /// Fading out; the content stays in place until the fade finishes.
    Closing(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Backdrop,
    Button,
    Escape,
}

/// What the view has to animate after a state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    None,
    /// Grow the overlay out of the card with this id.
    Morph { card: String },
    /// Swap the content of the open overlay in place.
    Replace { from: String, to: String },
    /// Shrink the overlay back into this card and start the fade.
    Dismiss { card: String, reason: CloseReason },
}

/// The project detail overlay. Only one is ever open; opening another project swaps it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modal {
    state: ModalState,
}

impl Default for Modal {
    fn default() -> Self {
        Self::new()
    }
}

impl Modal {
    pub fn new() -> Self {
        Self {
            state: ModalState::Closed,
        }
    }

    pub fn state(&self) -> &ModalState {
        &self.state
    }

    pub fn open_id(&self) -> Option<&str> {
        match &self.state {
            ModalState::Open(id) => Some(id.as_str()),
            _ => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ModalState::Open(_))
    }

    pub fn open(&mut self, id: &str) -> Transition {
        let transition = match &self.state {
            ModalState::Open(current) if current == id => return Transition::None,
            ModalState::Open(current) => Transition::Replace {
                from: current.clone(),
                to: id.to_owned(),
            },
            ModalState::Closed | ModalState::Closing(_) => Transition::Morph {
                card: id.to_owned(),
            },
        };
        self.state = ModalState::Open(id.to_owned());
        transition
    }

    pub fn close(&mut self, reason: CloseReason) -> Transition {
        match std::mem::replace(&mut self.state, ModalState::Closed) {
            ModalState::Open(id) => {
                self.state = ModalState::Closing(id.clone());
                Transition::Dismiss { card: id, reason }
            }
            other => {
                self.state = other;
                Transition::None
            }
        }
    }

    /// Handles a `KeyboardEvent.key` value.
    pub fn key(&mut self, key: &str) -> Transition {
        match key {
            "Escape" | "Esc" => self.close(CloseReason::Escape),
            _ => Transition::None,
        }
    }

    /// Called when the fade-out finishes. Returns false if the overlay was reopened meanwhile.
    pub fn finish_close(&mut self) -> bool {
        if let ModalState::Closing(_) = self.state {
            self.state = ModalState::Closed;
            true
        } else {
            false
        }
    }
}

/// The text and links the overlay shows for a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalView {
    pub id: String,
    pub title: String,
    pub category: &'static str,
    pub image: String,
    pub description: String,
    pub badges: Vec<String>,
    pub tags: Vec<String>,
    pub links: Vec<(LinkKind, String)>,
}

impl From<&Project> for ModalView {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id.clone(),
            title: project.title.clone(),
            category: project.category.label(),
            image: project.image.clone(),
            description: project.description.clone(),
            badges: project.badges.clone(),
            tags: project.tags.clone(),
            links: project
                .links
                .iter()
                .map(|(kind, url)| (kind, url.to_owned()))
                .collect(),
        }
    }
}

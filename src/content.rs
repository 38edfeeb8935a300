//! The page's static content: the project gallery and the resume timelines.
//!
//! Everything is compiled in from the JSON files under `content/` and never changes at runtime.

use std::collections::HashSet;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::error::Error;
use crate::error::Result;

const PROJECTS_JSON: &str = include_str!("../content/projects.json");
const RESUME_JSON: &str = include_str!("../content/resume.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Webapp,
    Music,
    Infrastructure,
    Fullstack,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Webapp,
        Category::Music,
        Category::Infrastructure,
        Category::Fullstack,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Webapp => "Web App",
            Category::Music => "Music",
            Category::Infrastructure => "Infrastructure",
            Category::Fullstack => "Full Stack",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Live,
    Source,
    AppStore,
    PlayStore,
}

impl LinkKind {
    pub fn label(self) -> &'static str {
        match self {
            LinkKind::Live => "Live site",
            LinkKind::Source => "Source",
            LinkKind::AppStore => "App Store",
            LinkKind::PlayStore => "Google Play",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Links {
    pub live: Option<String>,
    pub source: Option<String>,
    pub app_store: Option<String>,
    pub play_store: Option<String>,
}

impl Links {
    /// The links that are present, in the order they're shown.
    pub fn iter(&self) -> impl Iterator<Item = (LinkKind, &str)> {
        [
            (LinkKind::Live, &self.live),
            (LinkKind::Source, &self.source),
            (LinkKind::AppStore, &self.app_store),
            (LinkKind::PlayStore, &self.play_store),
        ]
        .into_iter()
        .filter_map(|(kind, url)| url.as_deref().map(|url| (kind, url)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub category: Category,
    pub image: String,
    #[serde(default)]
    pub links: Links,
    pub description: String,
    #[serde(default)]
    pub badges: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineItem {
    pub title: String,
    pub organization: String,
    pub period: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct Resume {
    #[serde(default)]
    experience: Vec<TimelineItem>,
    #[serde(default)]
    education: Vec<TimelineItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    projects: Vec<Project>,
    experience: Vec<TimelineItem>,
    education: Vec<TimelineItem>,
}

impl Catalog {
    /// The content shipped with the page.
    pub fn embedded() -> Result<Catalog> {
        Catalog::from_json(PROJECTS_JSON, RESUME_JSON)
    }

    pub fn from_json(projects: &str, resume: &str) -> Result<Catalog> {
        let projects: Vec<Project> = serde_json::from_str(projects).map_err(Error::Content)?;
        let resume: Resume = serde_json::from_str(resume).map_err(Error::Content)?;
        Catalog::new(projects, resume.experience, resume.education)
    }

    pub fn new(
        projects: Vec<Project>,
        experience: Vec<TimelineItem>,
        education: Vec<TimelineItem>,
    ) -> Result<Catalog> {
        let mut seen = HashSet::with_capacity(projects.len());
        for project in projects.iter() {
            if !seen.insert(project.id.as_str()) {
                return Err(Error::DuplicateProjectId(project.id.clone()));
            }
        }

        Ok(Catalog {
            projects,
            experience,
            education,
        })
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Project> {
        self.projects.iter().filter(move |p| p.category == category)
    }

    pub fn experience(&self) -> &[TimelineItem] {
        &self.experience
    }

    pub fn education(&self) -> &[TimelineItem] {
        &self.education
    }
}

//! Static portfolio content and the fixed page sections.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    About,
    Skills,
    Experience,
    Projects,
    Contact,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::About,
        Section::Skills,
        Section::Experience,
        Section::Projects,
        Section::Contact,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Section::About => "about",
            Section::Skills => "skills",
            Section::Experience => "experience",
            Section::Projects => "projects",
            Section::Contact => "contact",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Section::About => "About",
            Section::Skills => "Skills",
            Section::Experience => "Experience",
            Section::Projects => "Projects",
            Section::Contact => "Contact",
        }
    }

    pub fn from_id(id: &str) -> Option<Section> {
        Self::ALL.into_iter().find(|s| s.id() == id)
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    pub fn next(self) -> Section {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Section {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Portfolio {
    pub owner: Owner,
    pub skills: Vec<Skill>,
    pub experience: Vec<Experience>,
    pub projects: Vec<Project>,
    pub contact: Contact,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Owner {
    pub name: String,
    pub bio: String,
    pub resume: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Skill {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Experience {
    pub title: String,
    pub company: String,
    pub duration: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Project {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    pub github: Option<String>,
    pub live: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Contact {
    pub pitch: String,
    pub email: String,
    pub phone: String,
    pub location: String,
}

impl Portfolio {
    /// Reads a TOML content file with the same shape as the built-in content.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read content file {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("invalid content file {}", path.display()))
    }
}

fn skill(name: &str, description: &str) -> Skill {
    Skill {
        name: name.into(),
        description: description.into(),
    }
}

impl Default for Portfolio {
    fn default() -> Self {
        Self {
            owner: Owner {
                name: "Alex Morgan".into(),
                bio: "Developer with strong full-stack and backend expertise, experienced in real-time \
                      systems, WebRTC, and AI-powered applications. Passionate about building performant, \
                      scalable services. Strong foundation in data structures, algorithms, and system design."
                    .into(),
                resume: Some("https://example.com/alex-morgan-resume.pdf".into()),
            },
            skills: vec![
                skill("React", "Building interactive user interfaces with reusable components."),
                skill("Next.js", "Production-ready React applications with server-side rendering."),
                skill("JavaScript", "Core language for web development, enabling dynamic content."),
                skill("TypeScript", "Superset of JavaScript that adds static typing."),
                skill("Node.js", "Server-side JavaScript runtime for scalable applications."),
                skill("Express.js", "Minimalist web framework for Node.js, used for building APIs."),
                skill("Tailwind CSS", "Utility-first CSS framework for rapid UI development."),
                skill("Redux", "Predictable state container for JavaScript apps."),
                skill("MySQL", "Open-source relational database management system."),
                skill("Firebase", "Application development platform with hosted backends."),
                skill("Docker", "Developing, shipping, and running applications in containers."),
                skill("Git", "Version control system for collaborative development."),
                skill("Python", "Versatile language for backend logic, scripting, and data analysis."),
                skill("C++", "High-performance language for system-level programming."),
                skill("Java", "Object-oriented language widely used for enterprise applications."),
            ],
            experience: vec![
                Experience {
                    title: "Frontend Developer".into(),
                    company: "Northwind Labs".into(),
                    duration: "Apr 2025 - Present".into(),
                    description: "Building and improving user interfaces for a fintech product.".into(),
                },
                Experience {
                    title: "Intern".into(),
                    company: "Brightside Studio".into(),
                    duration: "Feb 2024 - Dec 2024".into(),
                    description: "Developed and maintained client websites, gaining hands-on web experience."
                        .into(),
                },
            ],
            projects: vec![
                Project {
                    title: "Exercise Form Tracker".into(),
                    description: "Pose-detection service that scores form accuracy for push-ups, squats, \
                                  and curls from recorded video."
                        .into(),
                    technologies: vec!["FastAPI".into(), "Python".into(), "React".into(), "MediaPipe".into()],
                    github: Some("https://github.com/example/form-tracker".into()),
                    live: Some("https://form-tracker.example.com".into()),
                },
                Project {
                    title: "HireHub".into(),
                    description: "Job portal where employers post openings and applicants apply, with \
                                  email notifications."
                        .into(),
                    technologies: vec!["React".into(), "Firebase".into(), "Tailwind CSS".into()],
                    github: Some("https://github.com/example/hirehub".into()),
                    live: Some("https://hirehub.example.com".into()),
                },
                Project {
                    title: "FeedbackFlow".into(),
                    description: "Real-time feedback form with a live-updating admin dashboard.".into(),
                    technologies: vec!["React".into(), "Tailwind CSS".into(), "Framer Motion".into()],
                    github: Some("https://github.com/example/feedbackflow".into()),
                    live: None,
                },
                Project {
                    title: "E-commerce Platform".into(),
                    description: "Storefront with authentication, product listings, cart, and payments.".into(),
                    technologies: vec![
                        "React".into(),
                        "Node.js".into(),
                        "Express".into(),
                        "MongoDB".into(),
                        "Stripe".into(),
                    ],
                    github: Some("https://github.com/example/shop".into()),
                    live: Some("https://shop.example.com".into()),
                },
            ],
            contact: Contact {
                pitch: "Have a project in mind or a question to discuss? Reach out, and let's bring your \
                        ideas to reality."
                    .into(),
                email: "alex.morgan@example.com".into(),
                phone: "+1 555 0134".into(),
                location: "Lisbon, Portugal".into(),
            },
        }
    }
}

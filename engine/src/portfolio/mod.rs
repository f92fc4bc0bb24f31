//! Static portfolio datasets
//!
//! The profile, skills and projects shown by `neofetch`, `api get` and the
//! AI gateway's profile context. Loaded once, never mutated.

use serde::Serialize;

/// Owner of the portfolio.
pub const OWNER_NAME: &str = "Shaik Nelofor";

/// Short role line used by `neofetch` and the profile context.
pub const OWNER_ROLE: &str = "Creative Developer & UI/UX Designer";

pub const CONTACT: &str = "neluashaik204@gmail.com";

pub const EXPERIENCE: &str = "MERN Stack Intern at Addwise Technologies. Studying at SRM University AP (2023-2027) and previously at Narayana Intermediate College (2021-2023).";

pub const SKILLS: &[&str] = &[
    "Python",
    "JavaScript",
    "SQL",
    "C++",
    "C",
    "Machine Learning",
    "HTML5 & CSS3",
    "Bootstrap",
    "DOM Manipulation",
    "Flask",
    "React.js",
    "REST APIs",
    "MongoDB",
    "MySQL",
    "NoSQL",
    "Data Structures",
    "Algorithms",
];

/// A featured project.
///
/// Only `title` and `description` are served by `api get projects` and the
/// profile context; the rest feeds project analysis.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Project {
    pub title: &'static str,
    pub description: &'static str,
    #[serde(skip)]
    pub long_description: &'static str,
    #[serde(skip)]
    pub tech_stack: &'static [&'static str],
}

pub const PROJECTS: &[Project] = &[
    Project {
        title: "Smart Device Management System",
        description: "An internship capstone project to design and develop a full-stack device management system using the MERN stack.",
        long_description: "Designed and developed a full-stack Smart Device Management System using the MERN stack (MongoDB, Express.js, React.js, Node.js). Integrated unique 16-digit QR codes for each device, enabling seamless device registration and tracking. Implemented role-based access control (RBAC) to securely manage user privileges and device ownership.",
        tech_stack: &[
            "MERN Stack",
            "React.js",
            "Node.js",
            "MongoDB",
            "Express.js",
            "RBAC",
            "QR Codes",
        ],
    },
    Project {
        title: "FoodLens",
        description: "A full-stack web application to scan and analyze food products in real-time using Gemini AI.",
        long_description: "Developed a full-stack web application (FoodLens) using Flask, Python, HTML/CSS/JS, OpenFoodFacts API, and Gemini AI to scan and analyze food products in real-time. Integrated Gemini AI to provide smart suggestions, health alerts, and personalized food alternatives based on ingredients, additives, and nutrition values. Designed a dynamic frontend and implemented age-specific consumption advice to deliver clear, instant insights and improve food choices across user demographics.",
        tech_stack: &[
            "Flask",
            "Python",
            "HTML/CSS",
            "JavaScript",
            "Gemini AI",
            "OpenFoodFacts API",
        ],
    },
    Project {
        title: "Expense Tracker",
        description: "A standalone desktop application to manage and visualize daily expenses.",
        long_description: "Built a standalone Expense Tracker desktop application using Python and Tkinter, enabling users to manage and visualize their daily expenses. Designed a user-friendly GUI with input forms for expense entry, categorized tracking (Food, Travel, Bills, etc.), and real-time summary updates. Added visual feedback with charts and budget alerts, helping users stay within budget and better understand their spending habits.",
        tech_stack: &["Python", "Tkinter"],
    },
    Project {
        title: "Finlatics Machine Learning",
        description: "Course project applying Linear Regression and K-Means Clustering to real-world datasets.",
        long_description: "Applied Linear Regression on a real-world Sales dataset to predict revenue trends based on variables like marketing spend and region. Implemented K-Means Clustering on a Facebook dataset to segment users based on metrics like likes, shares, and post frequency.",
        tech_stack: &[
            "Machine Learning",
            "Python",
            "Linear Regression",
            "K-Means Clustering",
        ],
    },
    Project {
        title: "CogniX AI",
        description: "A clean, responsive frontend for an AI assistant using Gemini AI.",
        long_description: "Designed a clean, responsive frontend for CogniX AI using HTML, CSS, and JavaScript, enabling users to interact with the AI assistant seamlessly. Integrated Gemini API to enhance prompt understanding and generate accurate, context-aware responses with a clean, user-friendly interface.",
        tech_stack: &["HTML", "CSS", "JavaScript", "Gemini AI"],
    },
];

/// Case-insensitive lookup by project title.
pub fn find_project(title: &str) -> Option<&'static Project> {
    let title = title.trim();
    PROJECTS
        .iter()
        .find(|project| project.title.eq_ignore_ascii_case(title))
}

/// Static payload describing the owner, sent with every AI query.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileContext {
    pub name: &'static str,
    pub role: &'static str,
    pub skills: Vec<&'static str>,
    pub experience: &'static str,
    pub projects: Vec<Project>,
    pub contact: &'static str,
}

impl ProfileContext {
    pub fn builtin() -> Self {
        Self {
            name: OWNER_NAME,
            role: OWNER_ROLE,
            skills: SKILLS.to_vec(),
            experience: EXPERIENCE,
            projects: PROJECTS.to_vec(),
            contact: CONTACT,
        }
    }
}

/// Datasets served by `api get <resource>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    Projects,
    Skills,
}

impl Dataset {
    pub const NAMES: &'static [&'static str] = &["projects", "skills"];

    /// Case-insensitive lookup by resource name.
    pub fn parse(resource: &str) -> Option<Self> {
        match resource.to_ascii_lowercase().as_str() {
            "projects" => Some(Self::Projects),
            "skills" => Some(Self::Skills),
            _ => None,
        }
    }

    /// Pretty-printed JSON body of the dataset.
    pub fn to_json(self) -> String {
        let value = match self {
            Dataset::Projects => serde_json::json!(PROJECTS),
            Dataset::Skills => serde_json::json!(SKILLS),
        };
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "[]".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_context_serialization() {
        let json = serde_json::to_value(ProfileContext::builtin()).unwrap();
        let first = &json["projects"][0];
        assert_eq!(first["title"], "Smart Device Management System");
        assert_eq!(json["contact"], CONTACT);
        assert_eq!(json["skills"].as_array().unwrap().len(), SKILLS.len());
    }

    #[test]
    fn test_projects_json_omits_analysis_fields() {
        let json: serde_json::Value = serde_json::from_str(&Dataset::Projects.to_json()).unwrap();
        let first = json[0].as_object().unwrap();
        assert_eq!(first.len(), 2);
        assert!(first.contains_key("title"));
        assert!(!first.contains_key("tech_stack"));
    }

    #[test]
    fn test_find_project_ignores_case() {
        let project = find_project("  foodlens ").unwrap();
        assert_eq!(project.title, "FoodLens");
        assert!(project.tech_stack.contains(&"Gemini AI"));
        assert!(find_project("cognix ai").is_some());
        assert!(find_project("Todo App").is_none());
    }

    #[test]
    fn test_dataset_parse() {
        assert_eq!(Dataset::parse("projects"), Some(Dataset::Projects));
        assert_eq!(Dataset::parse("SKILLS"), Some(Dataset::Skills));
        assert_eq!(Dataset::parse("users"), None);
    }

    #[test]
    fn test_skills_dataset_json() {
        let json: Vec<String> = serde_json::from_str(&Dataset::Skills.to_json()).unwrap();
        assert_eq!(json.first().map(String::as_str), Some("Python"));
    }
}

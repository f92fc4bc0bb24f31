//! Project analysis
//!
//! A short tech-lead style write-up of one catalog project, generated by the
//! gateway from the project's long description and tech stack.

use tracing::{debug, warn};

use super::{AiGateway, GatewayError};
use crate::portfolio::Project;
use crate::secrets::scrub_secrets;

/// Shown when the gateway answers with nothing usable.
pub const ANALYSIS_UNAVAILABLE: &str = "Sorry, the AI analysis could not be generated at this time.";

/// Shown for every other gateway failure.
pub const ANALYSIS_FAILED: &str =
    "An error occurred while generating the analysis. Please try again later.";

pub fn analysis_prompt(project: &Project) -> String {
    format!(
        "You are an expert Senior Tech Lead providing a brief analysis of a software project. \
         Based on the following details, provide a concise, expert analysis (around 2-3 sentences) \
         covering the strengths of the tech stack choice and a potential challenge or innovative \
         next step. Be insightful and professional. Project Title: \"{}\", Description: \"{}\", \
         Tech Stack: {}",
        project.title,
        project.long_description,
        project.tech_stack.join(", ")
    )
}

/// Analyze `project`. Failures are logged and turned into a fixed message.
pub async fn analyze_project(gateway: &dyn AiGateway, project: &Project) -> String {
    debug!(project = project.title, gateway = gateway.name(), "requesting analysis");

    match gateway.complete(&analysis_prompt(project)).await {
        Ok(text) => text,
        Err(GatewayError::EmptyResponse) => ANALYSIS_UNAVAILABLE.to_string(),
        Err(e) => {
            warn!(
                project = project.title,
                error = %scrub_secrets(&e.to_string()),
                "project analysis failed"
            );
            ANALYSIS_FAILED.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::OfflineGateway;
    use crate::portfolio::find_project;

    #[test]
    fn test_prompt_carries_project_details() {
        let project = find_project("Expense Tracker").unwrap();
        let prompt = analysis_prompt(project);
        assert!(prompt.starts_with("You are an expert Senior Tech Lead"));
        assert!(prompt.contains("Project Title: \"Expense Tracker\""));
        assert!(prompt.contains("using Python and Tkinter"));
        assert!(prompt.ends_with("Tech Stack: Python, Tkinter"));
    }

    #[tokio::test]
    async fn test_offline_analysis_fails_politely() {
        let project = find_project("FoodLens").unwrap();
        assert_eq!(
            analyze_project(&OfflineGateway, project).await,
            ANALYSIS_FAILED
        );
    }
}

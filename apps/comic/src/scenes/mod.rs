//! Story → scene splitting.
//!
//! The LLM storyboards the prompt into scenes with optional dialogue. When
//! that fails, or returns nothing usable, the story is split on sentence
//! boundaries instead so generation can still proceed.

pub mod prompts;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::LlmClient;
use crate::scenes::prompts::{SCENE_SPLIT_PROMPT_TEMPLATE, SCENE_SPLIT_SYSTEM};

/// One panel's worth of story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    pub description: String,
    #[serde(default)]
    pub dialogue: Option<String>,
}

impl Scene {
    pub fn silent(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            dialogue: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Storyboard {
    scenes: Vec<Scene>,
}

/// Where a scene list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneSource {
    Llm,
    SentenceSplit,
}

/// Splits a story into at most `max_scenes` scenes, in story order.
pub async fn split_story(
    story: &str,
    max_scenes: usize,
    llm: Option<&LlmClient>,
) -> (Vec<Scene>, SceneSource) {
    if let Some(llm) = llm {
        let prompt = build_split_prompt(story, max_scenes);
        let system = format!("{SCENE_SPLIT_SYSTEM}\n\n{JSON_ONLY_SYSTEM}");
        match llm.complete_json::<Storyboard>(&prompt, &system).await {
            Ok(board) => {
                let scenes = clean_scenes(board.scenes, max_scenes);
                if !scenes.is_empty() {
                    info!(scenes = scenes.len(), "Storyboarded story via LLM");
                    return (scenes, SceneSource::Llm);
                }
                warn!("LLM storyboard contained no usable scenes; splitting sentences");
            }
            Err(e) => warn!("LLM storyboard failed, splitting sentences: {e}"),
        }
    }

    let mut scenes: Vec<Scene> = split_sentences(story)
        .into_iter()
        .map(Scene::silent)
        .collect();
    scenes.truncate(max_scenes);
    (scenes, SceneSource::SentenceSplit)
}

/// Splits on `.`, trims each fragment, and drops empty ones.
pub fn split_sentences(text: &str) -> Vec<String> {
    text.split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub(crate) fn build_split_prompt(story: &str, max_scenes: usize) -> String {
    SCENE_SPLIT_PROMPT_TEMPLATE
        .replace("{max_scenes}", &max_scenes.to_string())
        .replace("{story}", story.trim())
}

/// Trims text, drops scenes without a description, blanks empty dialogue, and caps the count.
fn clean_scenes(scenes: Vec<Scene>, max_scenes: usize) -> Vec<Scene> {
    scenes
        .into_iter()
        .filter_map(|scene| {
            let description = scene.description.trim().to_string();
            if description.is_empty() {
                return None;
            }
            let dialogue = scene
                .dialogue
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty());
            Some(Scene {
                description,
                dialogue,
            })
        })
        .take(max_scenes)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAT_AND_MOUSE: &str = "A cat chases a mouse through a kitchen. The mouse hides in a \
        cookie jar. The cat knocks over the jar. Cookies and mouse scatter everywhere.";

    #[test]
    fn test_split_sentences_keeps_order() {
        assert_eq!(
            split_sentences(CAT_AND_MOUSE),
            vec![
                "A cat chases a mouse through a kitchen",
                "The mouse hides in a cookie jar",
                "The cat knocks over the jar",
                "Cookies and mouse scatter everywhere",
            ]
        );
    }

    #[test]
    fn test_split_sentences_drops_empty_fragments() {
        assert_eq!(split_sentences(" .. Hello.  . World "), vec!["Hello", "World"]);
        assert!(split_sentences("   ").is_empty());
    }

    #[tokio::test]
    async fn test_split_story_without_llm_truncates() {
        let (scenes, source) = split_story(CAT_AND_MOUSE, 3, None).await;
        assert_eq!(source, SceneSource::SentenceSplit);
        assert_eq!(scenes.len(), 3);
        assert_eq!(scenes[2], Scene::silent("The cat knocks over the jar"));
    }

    #[test]
    fn test_storyboard_deserializes_optional_dialogue() {
        let json = r#"{"scenes": [
            {"description": "A cat stalks a mouse", "dialogue": "Dinner time!"},
            {"description": "The mouse dives into a jar", "dialogue": null},
            {"description": "Cookies everywhere"}
        ]}"#;
        let board: Storyboard = serde_json::from_str(json).unwrap();
        assert_eq!(board.scenes.len(), 3);
        assert_eq!(board.scenes[0].dialogue.as_deref(), Some("Dinner time!"));
        assert!(board.scenes[1].dialogue.is_none());
        assert!(board.scenes[2].dialogue.is_none());
    }

    #[test]
    fn test_clean_scenes_trims_and_caps() {
        let scenes = vec![
            Scene {
                description: "  A kitchen ".to_string(),
                dialogue: Some("   ".to_string()),
            },
            Scene::silent("   "),
            Scene {
                description: "A jar".to_string(),
                dialogue: Some(" Eek! ".to_string()),
            },
            Scene::silent("Cookies"),
        ];
        let cleaned = clean_scenes(scenes, 2);
        assert_eq!(
            cleaned,
            vec![
                Scene::silent("A kitchen"),
                Scene {
                    description: "A jar".to_string(),
                    dialogue: Some("Eek!".to_string()),
                },
            ]
        );
    }

    #[test]
    fn test_build_split_prompt_fills_placeholders() {
        let prompt = build_split_prompt(CAT_AND_MOUSE, 4);
        assert!(prompt.contains("at most 4 comic panels"));
        assert!(prompt.contains("cookie jar"));
        assert!(!prompt.contains("{story}"));
    }
}
